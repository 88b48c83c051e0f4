//! Find/replace panel state for Scour
//!
//! `FindPanel` is what a front end drives: it owns the find field, the
//! replace fields with their recall histories, the search range, and the
//! bookkeeping that ties a replace to the search result it rewrites. The
//! document is passed in on every call and never stored.

use crate::config::Settings;
use crate::document::TextAccess;
use crate::error::{PatternError, RangeError, ReplaceError};
use crate::find::history::RecallHistory;
use crate::find::macros::MacroButton;
use crate::find::pattern::{Pattern, PatternFlags};
use crate::find::range::RangeTracker;
use crate::find::replace::{
    apply_replace_all, plan_replace_all, replace_one, MatchPreview, ReplacePlan,
};
use crate::find::search::{find, Match, MatchRegion, SearchStartPolicy};
use crate::string_utils::char_index_to_byte_index;
use log::{debug, info};

// ─────────────────────────────────────────────────────────────────────────────
// Fields
// ─────────────────────────────────────────────────────────────────────────────

/// The find field: its text, mode flags and compiled form.
#[derive(Debug)]
struct FindField {
    text: String,
    flags: PatternFlags,
    pattern: Result<Pattern, PatternError>,
    edited: bool,
    history: RecallHistory,
}

impl FindField {
    fn record_use(&mut self) {
        if self.edited {
            self.history.push(&self.text);
            self.edited = false;
        }
    }
}

/// One replace field with its own recall history.
#[derive(Debug, Clone)]
pub struct ReplaceField {
    text: String,
    /// Changed since it was last used
    edited: bool,
    history: RecallHistory,
}

impl ReplaceField {
    fn new(capacity: usize) -> Self {
        Self {
            text: String::new(),
            edited: false,
            history: RecallHistory::new(capacity),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn history(&self) -> &RecallHistory {
        &self.history
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.edited = true;
        }
    }

    fn record_use(&mut self) {
        if self.edited {
            self.history.push(&self.text);
            self.edited = false;
        }
    }
}

/// A bulk replace waiting for confirmation.
#[derive(Debug, Clone)]
struct PendingReplace {
    button_id: usize,
    plan: ReplacePlan,
}

// ─────────────────────────────────────────────────────────────────────────────
// Panel
// ─────────────────────────────────────────────────────────────────────────────

/// Find/replace state for one document view.
#[derive(Debug)]
pub struct FindPanel {
    find: FindField,
    replace_fields: Vec<ReplaceField>,
    range: RangeTracker,
    /// Most recent successful search result
    last_match: Option<Match>,
    /// The document selection is exactly `last_match`
    selection_is_search_result: bool,
    pending: Option<PendingReplace>,
}

impl FindPanel {
    /// Create an empty panel configured from `settings`.
    pub fn new(settings: &Settings) -> Self {
        let capacity = settings.recall_capacity;
        Self {
            find: FindField {
                text: String::new(),
                flags: PatternFlags {
                    respect_case: settings.respect_case,
                    whole_word: settings.whole_word,
                    is_regex: settings.regex,
                },
                pattern: Err(PatternError::Empty),
                edited: false,
                history: RecallHistory::new(capacity),
            },
            replace_fields: (0..settings.replace_field_count.max(1))
                .map(|_| ReplaceField::new(capacity))
                .collect(),
            range: RangeTracker::new(settings.range_min_chars, settings.range_min_lines),
            last_match: None,
            selection_is_search_result: false,
            pending: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Find Field
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the find text and flags and recompile.
    ///
    /// On error the field keeps the text but cannot search until fixed.
    pub fn set_pattern(
        &mut self,
        raw: &str,
        is_regex: bool,
        respect_case: bool,
        whole_word: bool,
    ) -> Result<(), PatternError> {
        let flags = PatternFlags {
            respect_case,
            whole_word,
            is_regex,
        };
        if self.find.text != raw {
            self.find.text = raw.to_string();
            self.find.edited = true;
        }
        self.find.flags = flags;
        self.find.pattern = Pattern::compile(raw, flags);

        // Captures of an old match belong to the old pattern
        self.last_match = None;
        self.selection_is_search_result = false;
        self.pending = None;

        match &self.find.pattern {
            Ok(_) => Ok(()),
            Err(e) => {
                debug!("Find field unusable: {}", e);
                Err(e.clone())
            }
        }
    }

    /// Change the find text, keeping the flags.
    pub fn set_find_text(&mut self, raw: &str) -> Result<(), PatternError> {
        let flags = self.find.flags;
        self.set_pattern(raw, flags.is_regex, flags.respect_case, flags.whole_word)
    }

    /// Change the flags, keeping the find text.
    pub fn set_flags(&mut self, flags: PatternFlags) -> Result<(), PatternError> {
        let raw = self.find.text.clone();
        self.set_pattern(&raw, flags.is_regex, flags.respect_case, flags.whole_word)
    }

    pub fn find_text(&self) -> &str {
        &self.find.text
    }

    pub fn flags(&self) -> PatternFlags {
        self.find.flags
    }

    /// Why the find field cannot search, if it cannot.
    pub fn pattern_error(&self) -> Option<&PatternError> {
        self.find.pattern.as_ref().err()
    }

    pub fn find_history(&self) -> &RecallHistory {
        &self.find.history
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replace Fields
    // ─────────────────────────────────────────────────────────────────────────

    pub fn replace_field_count(&self) -> usize {
        self.replace_fields.len()
    }

    pub fn replace_field(&self, button_id: usize) -> Option<&ReplaceField> {
        self.replace_fields.get(button_id)
    }

    pub fn set_replace_text(&mut self, button_id: usize, text: &str) -> Result<(), ReplaceError> {
        let field = self
            .replace_fields
            .get_mut(button_id)
            .ok_or(ReplaceError::UnknownField(button_id))?;
        field.set_text(text);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Range
    // ─────────────────────────────────────────────────────────────────────────

    /// Limit searching to the current selection of `doc`.
    pub fn activate_range<D>(&mut self, doc: &D) -> Result<(), RangeError>
    where
        D: TextAccess + ?Sized,
    {
        let (start, end) = doc.cursor_selection();
        let text = doc.full_text();
        let selected =
            &text[char_index_to_byte_index(text, start)..char_index_to_byte_index(text, end)];
        let lines = selected.matches('\n').count() + 1;
        self.range.activate(start, end, lines)
    }

    pub fn deactivate_range(&mut self) {
        self.range.deactivate();
    }

    pub fn range(&self) -> &RangeTracker {
        &self.range
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    /// Run one search and select the match.
    ///
    /// On failure the selection is left as it was.
    pub fn search<D>(&mut self, doc: &mut D, policy: SearchStartPolicy) -> Option<MatchRegion>
    where
        D: TextAccess + ?Sized,
    {
        let pattern = match &self.find.pattern {
            Ok(pattern) => pattern,
            Err(e) => {
                debug!("Search skipped: {}", e);
                return None;
            }
        };

        let found = find(policy, pattern, &self.range, doc.cursor_selection(), &*doc)?;
        let region = found.region();
        doc.set_selection(region.start, region.end);
        self.find.record_use();
        self.last_match = Some(found);
        self.selection_is_search_result = true;
        Some(region)
    }

    /// Tell the panel the user moved the selection.
    pub fn selection_changed(&mut self) {
        self.selection_is_search_result = false;
    }

    pub fn selection_is_search_result(&self) -> bool {
        self.selection_is_search_result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replace
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the last search result with replace field `button_id`,
    /// optionally searching on in either direction afterwards.
    pub fn replace<D>(
        &mut self,
        doc: &mut D,
        button_id: usize,
        and_next: bool,
        and_prior: bool,
    ) -> Result<(), ReplaceError>
    where
        D: TextAccess + ?Sized,
    {
        if button_id >= self.replace_fields.len() {
            return Err(ReplaceError::UnknownField(button_id));
        }
        let found = match &self.last_match {
            Some(m)
                if self.selection_is_search_result
                    && doc.cursor_selection() == (m.start, m.end) =>
            {
                m.clone()
            }
            _ => {
                debug!("Replace refused: selection is not a search result");
                return Err(ReplaceError::NotASearchResult);
            }
        };

        let field = &mut self.replace_fields[button_id];
        let region = replace_one(doc, &found, &field.text, self.find.flags.is_regex)?;
        field.record_use();

        self.range
            .shift_for_edit(found.start, found.end - found.start, region.len());
        self.last_match = None;
        self.selection_is_search_result = false;
        self.pending = None;

        if and_next {
            self.search(doc, SearchStartPolicy::Next);
        } else if and_prior {
            self.search(doc, SearchStartPolicy::Prior);
        }
        Ok(())
    }

    /// Compute a bulk replace with replace field `button_id` and hold it
    /// for [`FindPanel::confirm_replace_all`]. The document is not touched.
    pub fn replace_all<D>(&mut self, doc: &D, button_id: usize) -> Result<MatchPreview, ReplaceError>
    where
        D: TextAccess + ?Sized,
    {
        self.pending = None;
        let field = self
            .replace_fields
            .get(button_id)
            .ok_or(ReplaceError::UnknownField(button_id))?;

        let plan = plan_replace_all(&self.find.text, &field.text, self.find.flags, &self.range, doc)?;
        let preview = plan.preview();
        if plan.count() == 0 {
            debug!("Replace-all found no occurrences of '{}'", self.find.text);
        } else {
            self.pending = Some(PendingReplace { button_id, plan });
        }
        Ok(preview)
    }

    /// Preview of the bulk replace waiting for confirmation.
    pub fn pending_preview(&self) -> Result<MatchPreview, ReplaceError> {
        self.pending
            .as_ref()
            .map(|p| p.plan.preview())
            .ok_or(ReplaceError::NoPendingPreview)
    }

    /// Apply the pending bulk replace. Returns the number of replacements.
    pub fn confirm_replace_all<D>(&mut self, doc: &mut D) -> usize
    where
        D: TextAccess + ?Sized,
    {
        let Some(pending) = self.pending.take() else {
            debug!("Nothing to confirm");
            return 0;
        };

        let count = apply_replace_all(&pending.plan, doc, &mut self.range);
        if count > 0 {
            self.find.record_use();
            if let Some(field) = self.replace_fields.get_mut(pending.button_id) {
                field.record_use();
            }
            self.last_match = None;
            self.selection_is_search_result = false;
        }
        count
    }

    /// Drop the pending bulk replace.
    pub fn cancel_replace_all(&mut self) {
        if self.pending.take().is_some() {
            debug!("Replace-all cancelled");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Macros
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy a macro button into the fields.
    ///
    /// Keys the button leaves out keep their current values. With `insel`
    /// the range is taken from the current selection of `doc`; a refused
    /// range leaves the panel unchanged.
    pub fn load_macro<D>(&mut self, doc: &D, button: &MacroButton) -> crate::error::Result<()>
    where
        D: TextAccess + ?Sized,
    {
        match button.in_selection {
            Some(true) => self.activate_range(doc)?,
            Some(false) => self.deactivate_range(),
            None => {}
        }

        for index in 0..self.replace_fields.len() {
            if let Some(text) = button.replacement(index) {
                self.replace_fields[index].set_text(text);
            }
        }

        let current = self.find.flags;
        let raw = button.find.clone().unwrap_or_else(|| self.find.text.clone());
        let compiled = self.set_pattern(
            &raw,
            button.is_regex.unwrap_or(current.is_regex),
            button.respect_case.unwrap_or(current.respect_case),
            button.whole_word.unwrap_or(current.whole_word),
        );

        info!("Loaded macro '{}'", button.label);
        compiled.map_err(Into::into)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
