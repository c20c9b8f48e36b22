//! Error types for Weakmap operations.
//!
//! This module provides the main error type [`WeakmapError`] which wraps the
//! failures that can occur around the layout core: reading and decoding topic
//! data, invalid configuration, and export. The layout itself never fails;
//! data-quality problems are reported as [`Diagnostic`](crate::Diagnostic)s.

use std::io;

use thiserror::Error;

/// The main error type for Weakmap operations.
///
/// # Diagnostic Variants
///
/// The `Input` variant keeps the decoded source next to the JSON error, so
/// callers can point at the offending line and column.
#[derive(Debug, Error)]
pub enum WeakmapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid topic data: {err}")]
    Input { err: serde_json::Error, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for WeakmapError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl WeakmapError {
    /// Create a new `Input` error with the associated source text.
    pub fn new_input_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Input {
            err,
            src: src.into(),
        }
    }
}
