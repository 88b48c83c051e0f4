//! Directional search
//!
//! One search call picks a start position from a [`SearchStartPolicy`],
//! runs the pattern forward or backward from it, and clips the hit against
//! the active range. Positions are character offsets.

use crate::document::TextAccess;
use crate::find::pattern::Pattern;
use crate::find::range::RangeTracker;
use crate::find::scan;
use crate::string_utils::{byte_index_to_char_index, char_index_to_byte_index};
use log::debug;
use regex::{Captures, Regex};
use std::collections::HashMap;

// ─────────────────────────────────────────────────────────────────────────────
// Start Policy
// ─────────────────────────────────────────────────────────────────────────────

/// Where a single search starts and which way it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStartPolicy {
    /// Forward from the end of the current selection
    Next,
    /// Backward from the start of the current selection
    Prior,
    /// Forward from the top of the scope
    First,
    /// Backward from the bottom of the scope
    Last,
}

impl SearchStartPolicy {
    /// Build a policy from its two independent switches.
    pub fn from_flags(backward: bool, at_limit: bool) -> Self {
        match (backward, at_limit) {
            (false, false) => SearchStartPolicy::Next,
            (true, false) => SearchStartPolicy::Prior,
            (false, true) => SearchStartPolicy::First,
            (true, true) => SearchStartPolicy::Last,
        }
    }

    pub fn is_backward(self) -> bool {
        matches!(self, SearchStartPolicy::Prior | SearchStartPolicy::Last)
    }

    pub fn at_limit(self) -> bool {
        matches!(self, SearchStartPolicy::First | SearchStartPolicy::Last)
    }

    /// Character offset the search starts from.
    pub fn start_position(self, bounds: (usize, usize), selection: (usize, usize)) -> usize {
        let (range_start, range_end) = bounds;
        match self {
            SearchStartPolicy::First => range_start,
            SearchStartPolicy::Last => range_end,
            SearchStartPolicy::Next => range_start.max(selection.1),
            SearchStartPolicy::Prior => range_end.min(selection.0),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match Types
// ─────────────────────────────────────────────────────────────────────────────

/// Owned capture groups of a regex match, enough for back-reference
/// expansion after the document has moved on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchCaptures {
    /// Group texts; index 0 is the whole match, `None` for unmatched groups
    groups: Vec<Option<String>>,
    /// Named group → index
    names: HashMap<String, usize>,
}

impl MatchCaptures {
    /// Copy the groups of `caps`, produced by `regex`.
    pub fn from_captures(regex: &Regex, caps: &Captures<'_>) -> Self {
        let groups = (0..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
            .collect();
        let names = regex
            .capture_names()
            .enumerate()
            .filter_map(|(i, name)| name.map(|n| (n.to_string(), i)))
            .collect();
        Self { groups, names }
    }

    /// Number of groups, including group 0.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Text of group `index`: `None` if there is no such group,
    /// `Some("")` if the group exists but did not participate.
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups
            .get(index)
            .map(|text| text.as_deref().unwrap_or(""))
    }

    /// Index of the group called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }
}

/// One located occurrence, as a half-open character span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    /// Capture groups, for regex matches only
    pub captures: Option<MatchCaptures>,
}

impl Match {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            captures: None,
        }
    }

    pub fn region(&self) -> MatchRegion {
        MatchRegion {
            start: self.start,
            end: self.end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Absolute character span handed to the UI for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRegion {
    pub start: usize,
    pub end: usize,
}

impl MatchRegion {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

/// Find the next match of `pattern` under `policy`.
///
/// Returns `None` when nothing matches or when the hit leaks outside the
/// active range. Neither case is an error.
pub fn find<D>(
    policy: SearchStartPolicy,
    pattern: &Pattern,
    range: &RangeTracker,
    current_selection: (usize, usize),
    doc: &D,
) -> Option<Match>
where
    D: TextAccess + ?Sized,
{
    let bounds = range.effective_bounds(doc.char_len());
    let start = policy.start_position(bounds, current_selection);

    let found = if pattern.is_regex() {
        find_regex(policy, pattern, start, current_selection, doc.full_text())
    } else {
        let flags = pattern.flags();
        doc.find_literal(
            pattern.raw(),
            start,
            policy.is_backward(),
            flags.respect_case,
            flags.whole_word,
        )
        .map(|(s, e)| Match::new(s, e))
    };

    match found {
        Some(m) if range.contains(m.start, m.end) => {
            debug!("{:?} search for '{}' matched [{}, {})", policy, pattern.raw(), m.start, m.end);
            Some(m)
        }
        Some(m) => {
            debug!(
                "{:?} search for '{}' hit [{}, {}) outside the range",
                policy,
                pattern.raw(),
                m.start,
                m.end
            );
            None
        }
        None => {
            debug!("{:?} search for '{}' found nothing", policy, pattern.raw());
            None
        }
    }
}

fn find_regex(
    policy: SearchStartPolicy,
    pattern: &Pattern,
    start: usize,
    selection: (usize, usize),
    text: &str,
) -> Option<Match> {
    let forward = pattern.forward()?;
    let from = char_index_to_byte_index(text, start);

    let (s, e) = if policy.is_backward() {
        pattern.reverse()?.find_before(text, from)?
    } else {
        // An empty match right where the selection ends is not a new occurrence
        let touching = policy == SearchStartPolicy::Next && selection.1 == start;
        scan::forward(forward, text, from, |s, e| !(touching && s == e && s == from))?
    };

    let start_char = byte_index_to_char_index(text, s);
    let end_char = start_char + text[s..e].chars().count();
    let captures = forward
        .captures_at(text, s)
        .filter(|caps| caps.get(0).map_or(false, |m| m.start() == s && m.end() == e))
        .map(|caps| MatchCaptures::from_captures(forward, &caps));

    Some(Match {
        start: start_char,
        end: end_char,
        captures,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
