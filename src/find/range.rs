//! Search range tracking
//!
//! The active scope is either the whole document or a fixed character
//! interval taken from a selection. Matches are found against the whole text
//! and clipped here afterwards, because the underlying find primitives only
//! know a starting position, not an upper bound.

use crate::error::RangeError;
use log::debug;

/// The active search scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTracker {
    active: bool,
    start: usize,
    end: usize,
    /// Activation accepts a selection of at least this many characters...
    min_chars: usize,
    /// ...or one spanning at least this many lines
    min_lines: usize,
}

impl Default for RangeTracker {
    fn default() -> Self {
        Self::new(100, 4)
    }
}

impl RangeTracker {
    /// Whole-document scope with the given activation thresholds.
    pub fn new(min_chars: usize, min_lines: usize) -> Self {
        Self {
            active: false,
            start: 0,
            end: 0,
            min_chars,
            min_lines,
        }
    }

    /// Limit searching to `[selection_start, selection_end)`.
    ///
    /// Accepted when the selection meets either threshold. On failure the
    /// previous scope is kept.
    pub fn activate(
        &mut self,
        selection_start: usize,
        selection_end: usize,
        total_lines_in_selection: usize,
    ) -> Result<(), RangeError> {
        let (start, end) = if selection_start <= selection_end {
            (selection_start, selection_end)
        } else {
            (selection_end, selection_start)
        };
        if start == end {
            return Err(RangeError::EmptySelection);
        }

        let chars = end - start;
        if chars < self.min_chars && total_lines_in_selection < self.min_lines {
            debug!(
                "Range refused: {} chars, {} lines (needs {} chars or {} lines)",
                chars, total_lines_in_selection, self.min_chars, self.min_lines
            );
            return Err(RangeError::TooSmall {
                chars,
                lines: total_lines_in_selection,
            });
        }

        debug!("Search range set to [{}, {})", start, end);
        self.active = true;
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Return to whole-document scope.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.start = 0;
        self.end = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `(start, end)` of the scope; the whole document when inactive.
    pub fn effective_bounds(&self, document_length: usize) -> (usize, usize) {
        if self.active {
            (self.start.min(document_length), self.end.min(document_length))
        } else {
            (0, document_length)
        }
    }

    /// Whether a match span lies entirely inside the scope.
    pub fn contains(&self, match_start: usize, match_end: usize) -> bool {
        !self.active || (self.start <= match_start && match_end <= self.end)
    }

    /// Keep the range over the same text after `[at, at + removed)` was
    /// replaced by `inserted` characters.
    pub fn shift_for_edit(&mut self, at: usize, removed: usize, inserted: usize) {
        if !self.active {
            return;
        }
        let edit_end = at + removed;
        let shift = |pos: usize| -> usize {
            if pos >= edit_end {
                pos - removed + inserted
            } else if pos > at {
                // Position inside the replaced span collapses to its end
                at + inserted
            } else {
                pos
            }
        };
        self.start = shift(self.start);
        self.end = shift(self.end).max(self.start);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_whole_document() {
        let range = RangeTracker::default();
        assert!(!range.is_active());
        assert_eq!(range.effective_bounds(42), (0, 42));
        assert!(range.contains(0, 42));
    }

    #[test]
    fn test_activate_too_small() {
        let mut range = RangeTracker::default();
        let err = range.activate(10, 13, 1).unwrap_err();
        assert_eq!(err, RangeError::TooSmall { chars: 3, lines: 1 });
        assert!(!range.is_active());
    }

    #[test]
    fn test_activate_by_length_alone() {
        let mut range = RangeTracker::default();
        assert!(range.activate(0, 150, 1).is_ok());
        assert_eq!(range.effective_bounds(1000), (0, 150));
    }

    #[test]
    fn test_activate_by_lines_alone() {
        let mut range = RangeTracker::default();
        assert!(range.activate(5, 25, 4).is_ok());
        assert_eq!(range.effective_bounds(1000), (5, 25));
    }

    #[test]
    fn test_activate_reversed_selection() {
        let mut range = RangeTracker::default();
        range.activate(300, 100, 1).unwrap();
        assert_eq!(range.effective_bounds(1000), (100, 300));
    }

    #[test]
    fn test_activate_empty_selection() {
        let mut range = RangeTracker::new(1, 1);
        assert_eq!(range.activate(7, 7, 1), Err(RangeError::EmptySelection));
    }

    #[test]
    fn test_failed_activation_keeps_previous_scope() {
        let mut range = RangeTracker::default();
        range.activate(0, 200, 1).unwrap();
        assert!(range.activate(0, 2, 1).is_err());
        assert_eq!(range.effective_bounds(1000), (0, 200));
    }

    #[test]
    fn test_deactivate() {
        let mut range = RangeTracker::default();
        range.activate(0, 200, 1).unwrap();
        range.deactivate();
        assert_eq!(range.effective_bounds(50), (0, 50));
    }

    #[test]
    fn test_contains() {
        let mut range = RangeTracker::default();
        range.activate(100, 300, 1).unwrap();
        assert!(range.contains(100, 300));
        assert!(range.contains(150, 160));
        assert!(!range.contains(99, 120));
        assert!(!range.contains(290, 301));
    }

    #[test]
    fn test_bounds_clamped_to_document() {
        let mut range = RangeTracker::default();
        range.activate(100, 300, 1).unwrap();
        assert_eq!(range.effective_bounds(200), (100, 200));
    }

    #[test]
    fn test_shift_for_edit() {
        let mut range = RangeTracker::default();
        range.activate(100, 300, 1).unwrap();

        // Inside the range: only the end moves
        range.shift_for_edit(150, 3, 6);
        assert_eq!(range.effective_bounds(1000), (100, 303));

        // Before the range: both move
        range.shift_for_edit(10, 5, 0);
        assert_eq!(range.effective_bounds(1000), (95, 298));

        // After the range: nothing moves
        range.shift_for_edit(500, 5, 50);
        assert_eq!(range.effective_bounds(1000), (95, 298));
    }
}
