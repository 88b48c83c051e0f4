//! Document access for Scour
//!
//! The find/replace engine never owns the text it searches. It talks to the
//! document through the [`TextAccess`] contract: a read-only snapshot of the
//! full text, a cursor selection in character offsets, a native literal find,
//! and a cursor-based edit primitive with atomic grouping for undo.
//!
//! [`Document`] is an in-memory implementation used by the command-line
//! front end and by the tests.

mod buffer;

pub use buffer::Document;

/// The minimal text-access contract the engine consumes.
///
/// All positions are character offsets into [`TextAccess::full_text`].
pub trait TextAccess {
    /// Read-only snapshot of the whole document. Invalidated by any edit.
    fn full_text(&self) -> &str;

    /// Document length in characters.
    fn char_len(&self) -> usize;

    /// Current selection as `(start, end)` with `start <= end`.
    /// An empty selection is the bare cursor.
    fn cursor_selection(&self) -> (usize, usize);

    /// Select `[start, end)`. The cursor ends up at `end`.
    fn set_selection(&mut self, start: usize, end: usize);

    /// Native literal search.
    ///
    /// Forward: the first occurrence starting at or after `from`.
    /// Backward: the last occurrence of a left-to-right scan of the text
    /// before `from`.
    fn find_literal(
        &self,
        text: &str,
        from: usize,
        backward: bool,
        case_sensitive: bool,
        whole_word: bool,
    ) -> Option<(usize, usize)>;

    /// Replace `[start, end)` with `replacement` as a single edit and return
    /// the cursor position just after the inserted text.
    fn insert_text_at(&mut self, range: (usize, usize), replacement: &str) -> usize;

    /// Open an edit group; every edit until the matching
    /// [`TextAccess::end_atomic_edit`] is undone in one step.
    fn begin_atomic_edit(&mut self);

    /// Close the innermost edit group.
    fn end_atomic_edit(&mut self);

    /// Number of lines (blocks). An empty document has one.
    fn line_count(&self) -> usize;

    /// Text of line `index` without its terminator.
    fn block_text(&self, index: usize) -> Option<&str>;

    /// Counter bumped by every change to the text.
    fn revision(&self) -> u64;
}
