//! Configuration module for Scour
//!
//! This module handles the engine's user preferences, including
//! serialization/deserialization to/from JSON and persistent storage to
//! platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
