//! User macro buttons
//!
//! A macro button is a saved find/replace setup: the find text, up to three
//! replacement texts and the mode flags. Records arrive as JSON and are
//! checked against a fixed schema; any violation rejects the whole record.

use crate::error::MacroError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Expected type of one schema key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// String of at most this many characters
    Text(usize),
    Flag,
}

/// Every key a macro record may carry.
const SCHEMA: &[(&str, FieldKind)] = &[
    ("label", FieldKind::Text(32)),
    ("tooltip", FieldKind::Text(128)),
    ("find", FieldKind::Text(1024)),
    ("rep1", FieldKind::Text(1024)),
    ("rep2", FieldKind::Text(1024)),
    ("rep3", FieldKind::Text(1024)),
    ("case", FieldKind::Flag),
    ("word", FieldKind::Flag),
    ("regex", FieldKind::Flag),
    ("insel", FieldKind::Flag),
    ("andnext", FieldKind::Flag),
    ("andprior", FieldKind::Flag),
];

/// A validated macro button record.
///
/// Absent keys stay `None` and leave the corresponding panel state alone
/// when the macro is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacroButton {
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep1: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep2: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep3: Option<String>,

    #[serde(rename = "case", default, skip_serializing_if = "Option::is_none")]
    pub respect_case: Option<bool>,

    #[serde(rename = "word", default, skip_serializing_if = "Option::is_none")]
    pub whole_word: Option<bool>,

    #[serde(rename = "regex", default, skip_serializing_if = "Option::is_none")]
    pub is_regex: Option<bool>,

    /// Limit the search to the current selection
    #[serde(rename = "insel", default, skip_serializing_if = "Option::is_none")]
    pub in_selection: Option<bool>,

    /// Search forward after replacing
    #[serde(rename = "andnext", default, skip_serializing_if = "Option::is_none")]
    pub and_next: Option<bool>,

    /// Search backward after replacing
    #[serde(rename = "andprior", default, skip_serializing_if = "Option::is_none")]
    pub and_prior: Option<bool>,
}

impl MacroButton {
    /// Parse and validate a JSON record.
    pub fn from_json(json: &str) -> Result<Self, MacroError> {
        let value: Value = serde_json::from_str(json).map_err(|e| MacroError::Json(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(MacroError::NotAnObject);
        };
        validate(&map)?;
        serde_json::from_value(Value::Object(map)).map_err(|e| MacroError::Json(e.to_string()))
    }

    /// Serialize back to JSON, omitting absent keys.
    pub fn to_json(&self) -> Result<String, MacroError> {
        serde_json::to_string_pretty(self).map_err(|e| MacroError::Json(e.to_string()))
    }

    /// Replacement text for the zero-based replace field `index`.
    pub fn replacement(&self, index: usize) -> Option<&str> {
        match index {
            0 => self.rep1.as_deref(),
            1 => self.rep2.as_deref(),
            2 => self.rep3.as_deref(),
            _ => None,
        }
    }
}

fn validate(map: &Map<String, Value>) -> Result<(), MacroError> {
    for (key, value) in map {
        let Some(&(_, kind)) = SCHEMA.iter().find(|(name, _)| *name == key.as_str()) else {
            return Err(MacroError::UnknownKey(key.clone()));
        };
        match (kind, value) {
            (FieldKind::Text(max), Value::String(text)) => {
                if text.chars().count() > max {
                    return Err(MacroError::TooLong {
                        key: key.clone(),
                        max,
                    });
                }
            }
            (FieldKind::Flag, Value::Bool(_)) => {}
            (FieldKind::Text(_), _) => {
                return Err(MacroError::WrongType {
                    key: key.clone(),
                    expected: "string",
                });
            }
            (FieldKind::Flag, _) => {
                return Err(MacroError::WrongType {
                    key: key.clone(),
                    expected: "boolean",
                });
            }
        }
    }

    match map.get("label") {
        Some(Value::String(label)) if !label.is_empty() => Ok(()),
        _ => Err(MacroError::MissingLabel),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
