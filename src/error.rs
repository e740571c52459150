//! Error types for the SSRT engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading data or exporting results.
///
/// Statistical degeneracies (empty trial categories, undefined estimates,
/// race-model violations) are deliberately not errors: they are absorbed into
/// documented defaults or surfaced as per-row `ReliabilityFlag`s so a single
/// bad participant never aborts the batch.
#[derive(Debug, Error)]
pub enum SsrtError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Cannot derive a participant id from file name: {0}")]
    BadFileName(String),

    #[error("No participant data files found in {0}")]
    EmptyInputDir(PathBuf),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),
}
