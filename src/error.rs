//! Centralized error handling for Scour
//!
//! This module provides the crate-wide `Error` type (I/O and configuration
//! failures) plus the recoverable domain errors raised by the find/replace
//! engine: pattern compilation, range activation, replacement and macro
//! validation. None of them is fatal; the worst outcome of any of them is
//! "this operation did nothing".

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the crate.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    /// Failed to read a document from disk
    FileRead { path: PathBuf, source: io::Error },

    /// Failed to write a document back to disk
    FileWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Engine Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The find pattern could not be compiled
    Pattern(PatternError),

    /// The search range could not be activated
    Range(RangeError),

    /// A replace operation was refused
    Replace(ReplaceError),

    /// A user macro record failed validation
    Macro(MacroError),

    /// Generic application error with a message
    Application(String),
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<PatternError> for Error {
    fn from(err: PatternError) -> Self {
        Error::Pattern(err)
    }
}

impl From<RangeError> for Error {
    fn from(err: RangeError) -> Self {
        Error::Range(err)
    }
}

impl From<ReplaceError> for Error {
    fn from(err: ReplaceError) -> Self {
        Error::Replace(err)
    }
}

impl From<MacroError> for Error {
    fn from(err: MacroError) -> Self {
        Error::Macro(err)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileRead { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            // Engine Errors
            Error::Pattern(err) => write!(f, "{}", err),
            Error::Range(err) => write!(f, "{}", err),
            Error::Replace(err) => write!(f, "{}", err),
            Error::Macro(err) => write!(f, "{}", err),
            Error::Application(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::FileRead { source, .. } => Some(source),
            Error::FileWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::Pattern(err) => Some(err),
            Error::Range(err) => Some(err),
            Error::Replace(err) => Some(err),
            Error::Macro(err) => Some(err),
            Error::ConfigDirNotFound | Error::Application(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failure to turn a user-entered find string into a usable matcher.
///
/// Recoverable: the find field is unusable for search/replace until the
/// text or flags are corrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Malformed regular expression, with the engine's diagnostic
    InvalidSyntax(String),
    /// The find field is empty
    Empty,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::InvalidSyntax(diag) => write!(f, "Invalid regular expression: {}", diag),
            PatternError::Empty => write!(f, "Find text is empty"),
        }
    }
}

impl std::error::Error for PatternError {}

// ─────────────────────────────────────────────────────────────────────────────
// Range Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Refusal to activate a search range. The previous scope is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Selection is below both the character and the line threshold
    TooSmall { chars: usize, lines: usize },
    /// There is no selection to take the range from
    EmptySelection,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::TooSmall { chars, lines } => write!(
                f,
                "Selection too small for a search range ({} characters, {} lines)",
                chars, lines
            ),
            RangeError::EmptySelection => write!(f, "No selection to limit the search to"),
        }
    }
}

impl std::error::Error for RangeError {}

// ─────────────────────────────────────────────────────────────────────────────
// Replace Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Refusal of a single or bulk replace. The document is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceError {
    /// The current selection did not come from the last search
    NotASearchResult,
    /// Back-reference expansion of the replacement text failed
    ExpansionFailed(String),
    /// Bulk replace with an empty literal find string
    EmptyPattern,
    /// Bulk replace with a regex that does not compile
    InvalidPattern(String),
    /// No replace field with this index
    UnknownField(usize),
    /// `confirm_replace_all` without a preceding `replace_all`
    NoPendingPreview,
}

impl fmt::Display for ReplaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplaceError::NotASearchResult => {
                write!(f, "Selection is not the result of a search")
            }
            ReplaceError::ExpansionFailed(diag) => {
                write!(f, "Cannot expand replacement: {}", diag)
            }
            ReplaceError::EmptyPattern => write!(f, "Find text is empty"),
            ReplaceError::InvalidPattern(diag) => {
                write!(f, "Invalid regular expression: {}", diag)
            }
            ReplaceError::UnknownField(id) => write!(f, "No replace field #{}", id),
            ReplaceError::NoPendingPreview => write!(f, "No replace-all is waiting for confirmation"),
        }
    }
}

impl std::error::Error for ReplaceError {}

// ─────────────────────────────────────────────────────────────────────────────
// Macro Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Rejection of a user macro button record. The whole record is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroError {
    /// Not parseable as JSON
    Json(String),
    /// Top-level value is not an object
    NotAnObject,
    /// Key not in the schema
    UnknownKey(String),
    /// Value of the wrong type for its key
    WrongType { key: String, expected: &'static str },
    /// String value longer than the schema allows
    TooLong { key: String, max: usize },
    /// Every button needs a label
    MissingLabel,
}

impl fmt::Display for MacroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroError::Json(msg) => write!(f, "Macro is not valid JSON: {}", msg),
            MacroError::NotAnObject => write!(f, "Macro must be a JSON object"),
            MacroError::UnknownKey(key) => write!(f, "Unknown macro key '{}'", key),
            MacroError::WrongType { key, expected } => {
                write!(f, "Macro key '{}' must be a {}", key, expected)
            }
            MacroError::TooLong { key, max } => {
                write!(f, "Macro key '{}' is longer than {} characters", key, max)
            }
            MacroError::MissingLabel => write!(f, "Macro has no label"),
        }
    }
}

impl std::error::Error for MacroError {}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_creation() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test error");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_file_write_error() {
        let path = PathBuf::from("/test/file.txt");
        let io_err = io::Error::new(io::ErrorKind::Other, "write failed");
        let err = Error::FileWrite {
            path: path.clone(),
            source: io_err,
        };
        assert!(matches!(err, Error::FileWrite { path: p, .. } if p == path));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_result: std::result::Result<String, _> = serde_json::from_str("invalid json");
        let err = Error::from(json_result.unwrap_err());
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_display_config_dir_not_found() {
        let err = Error::ConfigDirNotFound;
        assert_eq!(format!("{}", err), "Configuration directory not found");
    }

    #[test]
    fn test_pattern_error_display() {
        let err = PatternError::InvalidSyntax("unclosed class".to_string());
        assert!(err.to_string().contains("unclosed class"));
        assert_eq!(PatternError::Empty.to_string(), "Find text is empty");
    }

    #[test]
    fn test_range_error_display() {
        let err = RangeError::TooSmall { chars: 3, lines: 1 };
        let msg = err.to_string();
        assert!(msg.contains("3 characters"));
        assert!(msg.contains("1 lines"));
    }

    #[test]
    fn test_domain_errors_convert_into_error() {
        let err: Error = ReplaceError::NotASearchResult.into();
        assert!(matches!(err, Error::Replace(ReplaceError::NotASearchResult)));

        let err: Error = RangeError::EmptySelection.into();
        assert!(matches!(err, Error::Range(_)));

        let err: Error = MacroError::MissingLabel.into();
        assert_eq!(err.to_string(), "Macro has no label");
    }

    #[test]
    fn test_error_source_for_domain_errors() {
        use std::error::Error as StdError;
        let err = Error::Pattern(PatternError::Empty);
        assert!(err.source().is_some());

        let err = Error::Application("test".to_string());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default_ok() {
        let result: super::Result<i32> = Ok(42);
        assert_eq!(result.unwrap_or_warn_default(0, "test context"), 42);
    }

    #[test]
    fn test_unwrap_or_warn_default_err() {
        let result: super::Result<i32> = Err(Error::Application("test".to_string()));
        assert_eq!(result.unwrap_or_warn_default(0, "test context"), 0);
    }
}
