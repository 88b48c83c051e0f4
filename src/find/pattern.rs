//! Pattern compilation
//!
//! A [`Pattern`] is the executable form of one user-entered find string
//! under a flag set. Regex patterns carry a forward matcher compiled up front
//! and a reverse matcher built lazily on the first backward search. Literal
//! patterns carry neither: literal search is delegated to the document.

use crate::error::PatternError;
use crate::find::scan;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::cell::OnceCell;

// ─────────────────────────────────────────────────────────────────────────────
// Flags
// ─────────────────────────────────────────────────────────────────────────────

/// Mode flags of the find field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFlags {
    /// Match case exactly
    pub respect_case: bool,
    /// Only match at word boundaries
    pub whole_word: bool,
    /// Treat the find text as a regular expression
    pub is_regex: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Compiler
// ─────────────────────────────────────────────────────────────────────────────

/// Compile `raw` as a regular expression.
///
/// The whole document is one haystack, so `^`/`$` match at line breaks and
/// `.` matches newlines. Case is folded unless `case_sensitive` is set.
/// `whole_word` wraps the expression in word-boundary assertions.
pub fn compile_regex(raw: &str, case_sensitive: bool, whole_word: bool) -> Result<Regex, PatternError> {
    let source = if whole_word {
        format!(r"\b(?:{})\b", raw)
    } else {
        raw.to_string()
    };

    RegexBuilder::new(&source)
        .multi_line(true)
        .dot_matches_new_line(true)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| {
            debug!("Invalid regex pattern '{}': {}", raw, e);
            PatternError::InvalidSyntax(e.to_string())
        })
}

/// Compile a literal find string into an equivalent regex.
///
/// Metacharacters are escaped; case sensitivity is taken from the explicit
/// flag. Whole-word filtering is left to the caller
/// ([`crate::string_utils::is_whole_word`]), since `\b` cannot anchor a
/// literal that starts or ends with punctuation.
pub fn compile_literal(raw: &str, case_sensitive: bool) -> Result<Regex, PatternError> {
    if raw.is_empty() {
        return Err(PatternError::Empty);
    }
    compile_regex(&regex::escape(raw), case_sensitive, false)
}

// ─────────────────────────────────────────────────────────────────────────────
// Reverse Matcher
// ─────────────────────────────────────────────────────────────────────────────

/// Backward-searching form of a compiled regex.
///
/// Finds the last match before a limit, with the text to the left of the
/// limit as context for anchors and boundaries.
#[derive(Debug, Clone)]
pub struct ReverseMatcher {
    regex: Regex,
}

impl ReverseMatcher {
    fn new(regex: Regex) -> Self {
        Self { regex }
    }

    /// Byte span of the last match in `text[..limit]`.
    pub fn find_before(&self, text: &str, limit: usize) -> Option<(usize, usize)> {
        scan::backward(&self.regex, text, limit, |_, _| true)
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern
// ─────────────────────────────────────────────────────────────────────────────

/// A user find string compiled under a flag set.
///
/// Replaced wholesale whenever the text or a flag changes; never mutated.
#[derive(Debug)]
pub struct Pattern {
    raw: String,
    flags: PatternFlags,
    forward: Option<Regex>,
    reverse: OnceCell<ReverseMatcher>,
}

impl Pattern {
    /// Compile `raw` under `flags`.
    ///
    /// # Errors
    ///
    /// - `PatternError::Empty` for an empty find string
    /// - `PatternError::InvalidSyntax` for a malformed regex
    pub fn compile(raw: &str, flags: PatternFlags) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }

        let forward = if flags.is_regex {
            Some(compile_regex(raw, flags.respect_case, flags.whole_word)?)
        } else {
            None
        };

        Ok(Self {
            raw: raw.to_string(),
            flags,
            forward,
            reverse: OnceCell::new(),
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    pub fn is_regex(&self) -> bool {
        self.flags.is_regex
    }

    /// Forward matcher; `None` for literal patterns.
    pub fn forward(&self) -> Option<&Regex> {
        self.forward.as_ref()
    }

    /// Reverse matcher, built on first use; `None` for literal patterns.
    pub fn reverse(&self) -> Option<&ReverseMatcher> {
        let forward = self.forward.as_ref()?;
        Some(
            self.reverse
                .get_or_init(|| ReverseMatcher::new(forward.clone())),
        )
    }

    /// Whether the reverse matcher has been built yet.
    pub fn has_reverse(&self) -> bool {
        self.reverse.get().is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
