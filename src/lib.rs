//! Scour: a find/replace engine for text documents.
//!
//! The engine searches a document through the [`document::TextAccess`]
//! contract, so any text model can host it. [`find::FindPanel`] is the
//! entry point for front ends; the free functions in [`find`] expose the
//! individual steps.

pub mod config;
pub mod document;
pub mod error;
pub mod find;
pub mod string_utils;
