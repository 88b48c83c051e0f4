//! In-memory document with selection and snapshot undo.

use crate::document::TextAccess;
use crate::find::compile_literal;
use crate::find::scan;
use crate::string_utils::{
    byte_index_to_char_index, char_index_to_byte_index, is_whole_word,
};
use log::debug;

/// Text and selection captured before an undoable edit.
#[derive(Debug, Clone)]
struct Snapshot {
    text: String,
    selection: (usize, usize),
}

/// An editable text document.
///
/// Holds the text, an anchor/position selection in character offsets, and
/// bounded undo/redo stacks of whole-text snapshots. Edits made between
/// `begin_atomic_edit` and `end_atomic_edit` share one undo snapshot.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    /// Cached character count of `text`
    char_len: usize,
    /// Selection anchor (character offset)
    anchor: usize,
    /// Cursor position (character offset)
    position: usize,
    /// Undo history stack
    undo_stack: Vec<Snapshot>,
    /// Redo history stack
    redo_stack: Vec<Snapshot>,
    /// Maximum undo history size
    max_undo_size: usize,
    /// Nesting depth of open atomic edit groups
    atomic_depth: usize,
    /// Whether the open group already pushed its snapshot
    group_recorded: bool,
    /// Bumped on every change to the text
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    /// Create a document holding `text`, cursor at the top.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self {
            text,
            char_len,
            anchor: 0,
            position: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_size: 100,
            atomic_depth: 0,
            group_recorded: false,
            revision: 0,
        }
    }

    /// The document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the document and return its text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Undo the last edit (or edit group).
    ///
    /// Returns `true` if undo was performed.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(previous);
        true
    }

    /// Redo the last undone edit.
    ///
    /// Returns `true` if redo was performed.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(next);
        true
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of items in the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            selection: (self.anchor, self.position),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.char_len = self.text.chars().count();
        self.anchor = snapshot.selection.0.min(self.char_len);
        self.position = snapshot.selection.1.min(self.char_len);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Push the pre-edit state unless the open group already did.
    fn record_edit(&mut self) {
        if self.atomic_depth > 0 {
            if self.group_recorded {
                return;
            }
            self.group_recorded = true;
        }
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_undo_size {
            self.undo_stack.remove(0);
        }
        // Clear redo stack on new edit
        self.redo_stack.clear();
    }
}

impl TextAccess for Document {
    fn full_text(&self) -> &str {
        &self.text
    }

    fn char_len(&self) -> usize {
        self.char_len
    }

    fn cursor_selection(&self) -> (usize, usize) {
        (self.anchor.min(self.position), self.anchor.max(self.position))
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        self.anchor = start.min(self.char_len);
        self.position = end.min(self.char_len);
    }

    fn find_literal(
        &self,
        text: &str,
        from: usize,
        backward: bool,
        case_sensitive: bool,
        whole_word: bool,
    ) -> Option<(usize, usize)> {
        let re = match compile_literal(text, case_sensitive) {
            Ok(re) => re,
            Err(e) => {
                debug!("Literal find for '{}' skipped: {}", text, e);
                return None;
            }
        };

        let haystack = self.text.as_str();
        let from = char_index_to_byte_index(haystack, from);
        let accept = |s: usize, e: usize| !whole_word || is_whole_word(haystack, s, e);
        let (start, end) = if backward {
            scan::backward(&re, haystack, from, accept)?
        } else {
            scan::forward(&re, haystack, from, accept)?
        };

        let start_char = byte_index_to_char_index(haystack, start);
        let end_char = start_char + haystack[start..end].chars().count();
        Some((start_char, end_char))
    }

    fn insert_text_at(&mut self, range: (usize, usize), replacement: &str) -> usize {
        let start = range.0.min(range.1).min(self.char_len);
        let end = range.0.max(range.1).min(self.char_len);

        self.record_edit();

        let start_byte = char_index_to_byte_index(&self.text, start);
        let end_byte = char_index_to_byte_index(&self.text, end);
        self.text.replace_range(start_byte..end_byte, replacement);

        let inserted = replacement.chars().count();
        self.char_len = self.char_len - (end - start) + inserted;
        self.revision = self.revision.wrapping_add(1);

        let cursor = start + inserted;
        self.anchor = cursor;
        self.position = cursor;
        cursor
    }

    fn begin_atomic_edit(&mut self) {
        if self.atomic_depth == 0 {
            self.group_recorded = false;
        }
        self.atomic_depth += 1;
    }

    fn end_atomic_edit(&mut self) {
        self.atomic_depth = self.atomic_depth.saturating_sub(1);
        if self.atomic_depth == 0 {
            self.group_recorded = false;
        }
    }

    fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    fn block_text(&self, index: usize) -> Option<&str> {
        self.text
            .split('\n')
            .nth(index)
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Selection Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_new_document() {
        let doc = Document::new("héllo");
        assert_eq!(doc.char_len(), 5);
        assert_eq!(doc.cursor_selection(), (0, 0));
        assert_eq!(doc.revision(), 0);
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_selection_is_ordered_and_clamped() {
        let mut doc = Document::new("hello");
        doc.set_selection(4, 1);
        assert_eq!(doc.cursor_selection(), (1, 4));
        doc.set_selection(2, 99);
        assert_eq!(doc.cursor_selection(), (2, 5));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Literal Find Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_find_literal_forward() {
        let doc = Document::new("cat bat cat");
        assert_eq!(doc.find_literal("cat", 0, false, true, false), Some((0, 3)));
        assert_eq!(doc.find_literal("cat", 1, false, true, false), Some((8, 11)));
        assert_eq!(doc.find_literal("cat", 9, false, true, false), None);
    }

    #[test]
    fn test_find_literal_backward() {
        let doc = Document::new("cat bat cat");
        assert_eq!(doc.find_literal("cat", 11, true, true, false), Some((8, 11)));
        assert_eq!(doc.find_literal("cat", 8, true, true, false), Some((0, 3)));
        assert_eq!(doc.find_literal("cat", 2, true, true, false), None);
    }

    #[test]
    fn test_find_literal_case_and_word() {
        let doc = Document::new("Cat concat CAT");
        assert_eq!(doc.find_literal("cat", 0, false, true, false), Some((7, 10)));
        assert_eq!(doc.find_literal("cat", 0, false, false, false), Some((0, 3)));
        assert_eq!(doc.find_literal("cat", 1, false, false, true), Some((11, 14)));
    }

    #[test]
    fn test_find_literal_whole_word_with_punctuation() {
        let doc = Document::new("call foo. then foo.x end");
        assert_eq!(doc.find_literal("foo.", 0, false, true, true), Some((5, 9)));
        assert_eq!(doc.find_literal("foo.", 6, false, true, true), None);
        assert_eq!(doc.find_literal("foo.", 24, true, true, true), Some((5, 9)));
    }

    #[test]
    fn test_find_literal_escapes_metacharacters() {
        let doc = Document::new("a.b axb a.b");
        assert_eq!(doc.find_literal("a.b", 1, false, true, false), Some((8, 11)));
    }

    #[test]
    fn test_find_literal_char_offsets() {
        let doc = Document::new("på på");
        assert_eq!(doc.find_literal("på", 1, false, true, false), Some((3, 5)));
        assert_eq!(doc.find_literal("PÅ", 5, true, false, false), Some((3, 5)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edit & Undo Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_insert_text_at() {
        let mut doc = Document::new("hello world");
        let cursor = doc.insert_text_at((6, 11), "there");
        assert_eq!(doc.text(), "hello there");
        assert_eq!(cursor, 11);
        assert_eq!(doc.cursor_selection(), (11, 11));
        assert_eq!(doc.revision(), 1);
    }

    #[test]
    fn test_insert_multibyte() {
        let mut doc = Document::new("æøå");
        doc.insert_text_at((1, 2), "oe");
        assert_eq!(doc.text(), "æoeå");
        assert_eq!(doc.char_len(), 4);
    }

    #[test]
    fn test_undo_redo_single_edit() {
        let mut doc = Document::new("abc");
        doc.set_selection(1, 2);
        doc.insert_text_at((1, 2), "XYZ");
        assert!(doc.undo());
        assert_eq!(doc.text(), "abc");
        assert_eq!(doc.cursor_selection(), (1, 2));
        assert!(doc.redo());
        assert_eq!(doc.text(), "aXYZc");
        assert!(!doc.redo());
    }

    #[test]
    fn test_atomic_edit_is_one_undo_step() {
        let mut doc = Document::new("a a a");
        doc.begin_atomic_edit();
        doc.insert_text_at((4, 5), "b");
        doc.insert_text_at((2, 3), "b");
        doc.begin_atomic_edit();
        doc.insert_text_at((0, 1), "b");
        doc.end_atomic_edit();
        doc.end_atomic_edit();

        assert_eq!(doc.text(), "b b b");
        assert_eq!(doc.undo_count(), 1);
        assert!(doc.undo());
        assert_eq!(doc.text(), "a a a");
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut doc = Document::new("x");
        doc.insert_text_at((0, 1), "y");
        doc.undo();
        assert!(doc.can_redo());
        doc.insert_text_at((0, 0), "z");
        assert!(!doc.can_redo());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_lines() {
        let doc = Document::new("one\r\ntwo\n\nfour");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.block_text(0), Some("one"));
        assert_eq!(doc.block_text(2), Some(""));
        assert_eq!(doc.block_text(3), Some("four"));
        assert_eq!(doc.block_text(4), None);
        assert_eq!(Document::default().line_count(), 1);
    }
}
