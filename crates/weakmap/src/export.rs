//! Export of finished weakness maps.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting a laid-out [`WeaknessMap`] into an output format. It is the last
//! stage of the pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Topic records
//!     ↓ graph
//! TopicGraph + Diagnostics
//!     ↓ layering
//! Layering
//!     ↓ layout
//! WeaknessMap
//!     ↓ export (this module)
//! SVG / JSON
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//! - [`json`]: a JSON layout document via [`json::Json`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`WeakmapError::Export`] at the crate
//! boundary.
//!
//! [`WeakmapError::Export`]: crate::WeakmapError::Export

pub mod json;
pub mod svg;

use std::io;

use crate::map::WeaknessMap;

/// Abstraction for map export backends.
pub trait Exporter {
    /// Writes `map` in the backend's format to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the map cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_map(&self, map: &WeaknessMap, out: &mut dyn io::Write) -> Result<(), Error>;

    /// Renders `map` into a string.
    ///
    /// # Errors
    ///
    /// Same as [`Exporter::export_map`], plus [`Error::Render`] when the
    /// output is not valid UTF-8.
    fn export_to_string(&self, map: &WeaknessMap) -> Result<String, Error> {
        let mut buffer = Vec::new();
        self.export_map(map, &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| Error::Render(err.to_string()))
    }
}

/// Errors that can occur during map export.
///
/// This type is converted into [`WeakmapError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`WeakmapError::Export`]: crate::WeakmapError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
