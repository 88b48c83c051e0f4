//! User settings for Scour
//!
//! This module defines the `Settings` struct that holds the user-configurable
//! defaults of the find/replace engine, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Find/replace preferences.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Initial Find Flags
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether a fresh find field is case-sensitive
    pub respect_case: bool,

    /// Whether a fresh find field matches whole words only
    pub whole_word: bool,

    /// Whether a fresh find field is a regular expression
    pub regex: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Search Range
    // ─────────────────────────────────────────────────────────────────────────
    /// A selection of at least this many characters may become a search range
    pub range_min_chars: usize,

    /// A selection spanning at least this many lines may become a search range
    pub range_min_lines: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Fields & History
    // ─────────────────────────────────────────────────────────────────────────
    /// Maximum number of strings remembered per field
    pub recall_capacity: usize,

    /// Number of replace fields (and replace buttons)
    pub replace_field_count: usize,

    /// Whether replace-all asks for confirmation before mutating
    pub confirm_replace_all: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            respect_case: false,
            whole_word: false,
            regex: false,

            range_min_chars: 100,
            range_min_lines: 4,

            recall_capacity: 10,
            replace_field_count: 3,
            confirm_replace_all: true,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Maximum number of remembered strings per field.
    pub const MAX_RECALL_CAPACITY: usize = 100;
    /// Maximum number of replace fields.
    pub const MAX_REPLACE_FIELDS: usize = 9;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.range_min_chars = self.range_min_chars.max(1);
        self.range_min_lines = self.range_min_lines.max(1);

        self.recall_capacity = self.recall_capacity.clamp(1, Self::MAX_RECALL_CAPACITY);
        self.replace_field_count = self
            .replace_field_count
            .clamp(1, Self::MAX_REPLACE_FIELDS);
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
