//! Single and bulk replacement
//!
//! A single replace rewrites the span of the last search result. A bulk
//! replace is split in two: [`plan_replace_all`] collects every edit
//! without touching the document, and [`apply_replace_all`] performs the
//! planned edits as one undo step once the caller has confirmed.

use crate::document::TextAccess;
use crate::error::{PatternError, ReplaceError};
use crate::find::expand::expand;
use crate::find::pattern::{compile_literal, compile_regex, PatternFlags};
use crate::find::range::RangeTracker;
use crate::find::scan;
use crate::find::search::{Match, MatchCaptures, MatchRegion};
use crate::string_utils::{
    char_index_to_byte_index, is_whole_word, next_char_boundary, CharCounter,
};
use log::{info, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Single Replace
// ─────────────────────────────────────────────────────────────────────────────

/// Text that replaces `found`.
///
/// Regex matches expand back-references; literal matches take the
/// replacement verbatim.
pub fn expand_replacement(
    found: &Match,
    replacement: &str,
    is_regex: bool,
) -> Result<String, ReplaceError> {
    match (&found.captures, is_regex) {
        (Some(captures), true) => expand(replacement, captures),
        _ => Ok(replacement.to_string()),
    }
}

/// Replace the span of `found` and select the inserted text.
///
/// Expansion happens before any edit, so a failed expansion leaves the
/// document untouched.
pub fn replace_one<D>(
    doc: &mut D,
    found: &Match,
    replacement: &str,
    is_regex: bool,
) -> Result<MatchRegion, ReplaceError>
where
    D: TextAccess + ?Sized,
{
    let text = expand_replacement(found, replacement, is_regex)?;
    let end = doc.insert_text_at((found.start, found.end), &text);
    doc.set_selection(found.start, end);
    Ok(MatchRegion {
        start: found.start,
        end,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Bulk Replace
// ─────────────────────────────────────────────────────────────────────────────

/// One edit of a bulk replace, in character offsets of the unedited text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEdit {
    pub start: usize,
    pub end: usize,
    /// Expanded replacement text
    pub text: String,
}

/// A computed but not yet applied bulk replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacePlan {
    pub find_text: String,
    pub replace_text: String,
    /// Non-overlapping edits in ascending order
    pub edits: Vec<PlannedEdit>,
    /// Document revision the plan was computed against
    pub revision: u64,
}

impl ReplacePlan {
    pub fn count(&self) -> usize {
        self.edits.len()
    }

    /// Summary shown to the user before confirming.
    pub fn preview(&self) -> MatchPreview {
        MatchPreview {
            find_text: self.find_text.clone(),
            replace_text: self.replace_text.clone(),
            count: self.edits.len(),
        }
    }
}

/// What a bulk replace would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPreview {
    pub find_text: String,
    pub replace_text: String,
    pub count: usize,
}

/// Collect every non-overlapping match of `find` inside the active range,
/// scanning forward from the range start, with its expanded replacement.
///
/// The scan visits the same matches as a `First` search followed by `Next`
/// searches: whole-word literals use the document's word rule, and the
/// first match leaking past the range end stops the scan.
///
/// # Errors
///
/// - `ReplaceError::EmptyPattern` for an empty find string
/// - `ReplaceError::InvalidPattern` for a regex that does not compile
/// - `ReplaceError::ExpansionFailed` if any match fails to expand; nothing
///   is planned in that case
pub fn plan_replace_all<D>(
    find: &str,
    replace: &str,
    flags: PatternFlags,
    range: &RangeTracker,
    doc: &D,
) -> Result<ReplacePlan, ReplaceError>
where
    D: TextAccess + ?Sized,
{
    let compiled = if flags.is_regex {
        if find.is_empty() {
            Err(PatternError::Empty)
        } else {
            compile_regex(find, flags.respect_case, flags.whole_word)
        }
    } else {
        compile_literal(find, flags.respect_case)
    };
    let re = compiled.map_err(|e| match e {
        PatternError::Empty => ReplaceError::EmptyPattern,
        PatternError::InvalidSyntax(diag) => ReplaceError::InvalidPattern(diag),
    })?;

    let text = doc.full_text();
    let (lo, hi) = range.effective_bounds(doc.char_len());
    let lo_byte = char_index_to_byte_index(text, lo);
    let hi_byte = char_index_to_byte_index(text, hi);

    let mut counter = CharCounter::new(text);
    let mut edits = Vec::new();
    let mut last_end: Option<usize> = None;
    let mut pos = lo_byte;
    let literal_whole_word = flags.whole_word && !flags.is_regex;

    while pos <= text.len() {
        let previous_end = last_end;
        let accept = |s: usize, e: usize| {
            // An empty match touching the previous match is not a new occurrence
            let repeat = s == e && previous_end == Some(s);
            !repeat && (!literal_whole_word || is_whole_word(text, s, e))
        };
        let Some((start, end)) = scan::forward(&re, text, pos, accept) else {
            break;
        };
        // A hit leaking past the range end ends the scan, as it ends a Next search
        if end > hi_byte {
            break;
        }

        let replacement = if flags.is_regex {
            let Some(caps) = re.captures_at(text, start) else {
                break;
            };
            expand(replace, &MatchCaptures::from_captures(&re, &caps))?
        } else {
            replace.to_string()
        };
        edits.push(PlannedEdit {
            start: counter.char_index(start),
            end: counter.char_index(end),
            text: replacement,
        });

        last_end = Some(end);
        pos = if start == end {
            next_char_boundary(text, end)
        } else {
            end
        };
    }

    Ok(ReplacePlan {
        find_text: find.to_string(),
        replace_text: replace.to_string(),
        edits,
        revision: doc.revision(),
    })
}

/// Apply `plan` as one undo step and return the number of replacements.
///
/// Edits run from last to first so earlier offsets stay valid. A plan
/// computed against another revision of the document is dropped.
pub fn apply_replace_all<D>(plan: &ReplacePlan, doc: &mut D, range: &mut RangeTracker) -> usize
where
    D: TextAccess + ?Sized,
{
    if doc.revision() != plan.revision {
        warn!(
            "Replace-all for '{}' discarded: document changed since preview",
            plan.find_text
        );
        return 0;
    }
    if plan.edits.is_empty() {
        return 0;
    }

    doc.begin_atomic_edit();
    for edit in plan.edits.iter().rev() {
        doc.insert_text_at((edit.start, edit.end), &edit.text);
        range.shift_for_edit(edit.start, edit.end - edit.start, edit.text.chars().count());
    }
    doc.end_atomic_edit();

    info!(
        "Replaced {} occurrence(s) of '{}' with '{}'",
        plan.edits.len(),
        plan.find_text,
        plan.replace_text
    );
    plan.edits.len()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn literal() -> PatternFlags {
        PatternFlags {
            respect_case: true,
            ..PatternFlags::default()
        }
    }

    fn regex() -> PatternFlags {
        PatternFlags {
            respect_case: true,
            is_regex: true,
            ..PatternFlags::default()
        }
    }

    fn replace_all(doc: &mut Document, find: &str, replace: &str, flags: PatternFlags) -> usize {
        let mut range = RangeTracker::default();
        let plan = plan_replace_all(find, replace, flags, &range, doc).unwrap();
        apply_replace_all(&plan, doc, &mut range)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Single Replace Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_replace_one_literal_selects_inserted_text() {
        let mut doc = Document::new("cat bat cat");
        let region = replace_one(&mut doc, &Match::new(8, 11), "dog", false).unwrap();
        assert_eq!(doc.text(), "cat bat dog");
        assert_eq!(region, MatchRegion { start: 8, end: 11 });
        assert_eq!(doc.cursor_selection(), (8, 11));
    }

    #[test]
    fn test_replace_one_literal_ignores_backslashes() {
        let mut doc = Document::new("ab");
        let found = Match::new(0, 1);
        replace_one(&mut doc, &found, r"\1", false).unwrap();
        assert_eq!(doc.text(), r"\1b");
    }

    #[test]
    fn test_replace_one_expansion_failure_keeps_document() {
        let re = regex::Regex::new("(a)").unwrap();
        let caps = re.captures("a").unwrap();
        let found = Match {
            start: 0,
            end: 1,
            captures: Some(MatchCaptures::from_captures(&re, &caps)),
        };
        let mut doc = Document::new("a");
        let err = replace_one(&mut doc, &found, r"\5", true).unwrap_err();
        assert!(matches!(err, ReplaceError::ExpansionFailed(_)));
        assert_eq!(doc.text(), "a");
        assert!(!doc.can_undo());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bulk Replace Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_replace_all_non_overlapping() {
        let mut doc = Document::new("aaa");
        assert_eq!(replace_all(&mut doc, "a", "bb", literal()), 3);
        assert_eq!(doc.text(), "bbbbbb");
    }

    #[test]
    fn test_replace_all_with_back_references() {
        let mut doc = Document::new("ann@lee, bo@kim");
        assert_eq!(replace_all(&mut doc, r"(\w+)@(\w+)", r"\2@\1", regex()), 2);
        assert_eq!(doc.text(), "lee@ann, kim@bo");
    }

    #[test]
    fn test_replace_all_is_one_undo_step() {
        let mut doc = Document::new("x y x y x");
        assert_eq!(replace_all(&mut doc, "x", "zz", literal()), 3);
        assert_eq!(doc.undo_count(), 1);
        assert!(doc.undo());
        assert_eq!(doc.text(), "x y x y x");
    }

    #[test]
    fn test_replace_all_idempotent_when_replacement_has_no_match() {
        let mut doc = Document::new("one two one");
        assert_eq!(replace_all(&mut doc, "one", "three", literal()), 2);
        let after_first = doc.text().to_string();
        assert_eq!(replace_all(&mut doc, "one", "three", literal()), 0);
        assert_eq!(doc.text(), after_first);
    }

    #[test]
    fn test_replace_all_respects_range() {
        let text = format!("cat {} cat {} cat", "-".repeat(60), "-".repeat(60));
        let mut doc = Document::new(text);
        let mut range = RangeTracker::default();
        // Covers only the middle cat
        range.activate(10, 120, 1).unwrap();

        let plan = plan_replace_all("cat", "dog", literal(), &range, &doc).unwrap();
        assert_eq!(plan.count(), 1);
        assert_eq!(apply_replace_all(&plan, &mut doc, &mut range), 1);
        assert!(doc.text().starts_with("cat "));
        assert!(doc.text().ends_with(" cat"));
        assert_eq!(doc.text().matches("dog").count(), 1);
    }

    #[test]
    fn test_replace_all_shifts_range() {
        let text = format!("ab{}", " ".repeat(120));
        let mut doc = Document::new(text);
        let mut range = RangeTracker::default();
        range.activate(0, 110, 1).unwrap();

        let plan = plan_replace_all("ab", "abcd", literal(), &range, &doc).unwrap();
        apply_replace_all(&plan, &mut doc, &mut range);
        assert_eq!(range.effective_bounds(doc.char_len()), (0, 112));
    }

    #[test]
    fn test_replace_all_empty_regex_matches() {
        let mut doc = Document::new("ab\ncd");
        assert_eq!(replace_all(&mut doc, "^", "> ", regex()), 2);
        assert_eq!(doc.text(), "> ab\n> cd");
    }

    #[test]
    fn test_replace_all_skips_empty_match_after_previous() {
        let mut doc = Document::new("aab");
        assert_eq!(replace_all(&mut doc, "a*", "-", regex()), 2);
        assert_eq!(doc.text(), "-b-");
    }

    #[test]
    fn test_replace_all_whole_word_literal_with_punctuation() {
        let mut doc = Document::new("call foo. then foo. end, foo.x");
        let flags = PatternFlags {
            whole_word: true,
            ..literal()
        };
        assert_eq!(replace_all(&mut doc, "foo.", "bar()", flags), 2);
        assert_eq!(doc.text(), "call bar() then bar() end, foo.x");

        let mut doc = Document::new("-x a-x -x");
        assert_eq!(replace_all(&mut doc, "-x", "+y", flags), 2);
        assert_eq!(doc.text(), "+y a-x +y");
    }

    #[test]
    fn test_replace_all_stops_at_match_leaving_range() {
        let text = format!("{}tail end", "w ".repeat(60));
        let mut doc = Document::new(text);
        let mut range = RangeTracker::default();
        // Ends inside "tail"
        range.activate(0, 122, 1).unwrap();

        let plan = plan_replace_all(r"\w+", "v", regex(), &range, &doc).unwrap();
        assert_eq!(plan.count(), 60);
        assert_eq!(apply_replace_all(&plan, &mut doc, &mut range), 60);
        assert!(doc.text().ends_with("v tail end"));
    }

    #[test]
    fn test_replace_all_greedy_pattern_leaving_range() {
        let text = format!("{}\nrest", "z".repeat(200));
        let doc = Document::new(text);
        let mut range = RangeTracker::default();
        range.activate(0, 150, 1).unwrap();

        // Dot matches newlines, so the first hit runs to the end of the text
        let plan = plan_replace_all(".*", "", regex(), &range, &doc).unwrap();
        assert_eq!(plan.count(), 0);
    }

    #[test]
    fn test_replace_all_multibyte_offsets() {
        let mut doc = Document::new("på å på");
        assert_eq!(replace_all(&mut doc, "på", "on", literal()), 2);
        assert_eq!(doc.text(), "on å on");
    }

    #[test]
    fn test_plan_errors() {
        let doc = Document::new("text");
        let range = RangeTracker::default();
        assert_eq!(
            plan_replace_all("", "x", literal(), &range, &doc).unwrap_err(),
            ReplaceError::EmptyPattern
        );
        assert!(matches!(
            plan_replace_all("(", "x", regex(), &range, &doc).unwrap_err(),
            ReplaceError::InvalidPattern(_)
        ));
        assert!(matches!(
            plan_replace_all("(t)", r"\3", regex(), &range, &doc).unwrap_err(),
            ReplaceError::ExpansionFailed(_)
        ));
    }

    #[test]
    fn test_plan_does_not_mutate() {
        let doc = Document::new("a a a");
        let plan = plan_replace_all("a", "b", literal(), &RangeTracker::default(), &doc).unwrap();
        assert_eq!(plan.preview().count, 3);
        assert_eq!(doc.text(), "a a a");
        assert_eq!(doc.revision(), plan.revision);
    }

    #[test]
    fn test_stale_plan_is_discarded() {
        let mut doc = Document::new("a a a");
        let mut range = RangeTracker::default();
        let plan = plan_replace_all("a", "b", literal(), &range, &doc).unwrap();
        doc.insert_text_at((0, 0), "z");
        assert_eq!(apply_replace_all(&plan, &mut doc, &mut range), 0);
        assert_eq!(doc.text(), "za a a");
    }
}
