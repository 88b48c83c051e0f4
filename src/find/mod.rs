//! Find and replace engine for Scour
//!
//! This module contains the search and replace machinery:
//! - Pattern compilation with a lazily built reverse matcher
//! - Search range tracking and directional search
//! - Single and bulk replacement with back-reference expansion
//! - Recall histories, user macro buttons, and the panel that ties them together

mod expand;
mod history;
mod macros;
mod panel;
mod pattern;
mod range;
mod replace;
pub(crate) mod scan;
mod search;

pub use expand::expand;
pub use history::RecallHistory;
pub use macros::MacroButton;
pub use panel::{FindPanel, ReplaceField};
pub use pattern::{compile_literal, compile_regex, Pattern, PatternFlags, ReverseMatcher};
pub use range::RangeTracker;
pub use replace::{
    apply_replace_all, expand_replacement, plan_replace_all, replace_one, MatchPreview,
    PlannedEdit, ReplacePlan,
};
pub use search::{find, Match, MatchCaptures, MatchRegion, SearchStartPolicy};
