//! Error types for the store and font-loading seams.
//!
//! The geometry core itself never fails; these only surface from collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by a shape or page store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request was rejected before touching any data.
    #[error("invalid request: {0}")]
    Validation(String),

    /// No record with this id.
    #[error("not found: {0}")]
    NotFound(String),

    /// A record with this id already exists.
    #[error("already exists: {0}")]
    Conflict(String),

    /// The store could not be reached or gave up.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures while loading font faces for text measurement.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("failed to read font file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font data for {family:?} is not a usable face")]
    Invalid {
        family: String,
        #[source]
        source: ab_glyph::InvalidFont,
    },
}
