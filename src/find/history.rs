//! Recall history for the find and replace fields.

/// Most-recent-first list of strings used in one field.
///
/// Pushing a string already present moves it to the front instead of
/// storing it twice. Empty strings are never recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecallHistory {
    entries: Vec<String>,
    capacity: usize,
}

impl Default for RecallHistory {
    fn default() -> Self {
        Self::new(10)
    }
}

impl RecallHistory {
    /// Create an empty history holding at most `capacity` strings.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a use of `text`.
    pub fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(existing) = self.entries.iter().position(|e| e == text) {
            let entry = self.entries.remove(existing);
            self.entries.insert(0, entry);
            return;
        }
        self.entries.insert(0, text.to_string());
        self.entries.truncate(self.capacity);
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
