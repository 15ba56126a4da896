//! Error types for MeritMap

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading artifacts or evaluating a profile
#[derive(Debug, Error)]
pub enum MeritMapError {
    #[error("Failed to read {artifact} artifact at {path}: {source}")]
    ArtifactLoad {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt {artifact} artifact: {source}")]
    ArtifactParse {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Schema mismatch in {context}: expected {expected}, got {got}")]
    SchemaMismatch {
        context: String,
        expected: String,
        got: String,
    },

    #[error("Non-finite decision score ({0}); model artifacts overflow for this profile")]
    NonFiniteScore(f64),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown branch: {0}")]
    UnknownBranch(String),

    #[error("Invalid override: {0}")]
    InvalidOverride(String),
}

impl MeritMapError {
    /// Shorthand for a vector-length mismatch against the fitted schema
    pub(crate) fn length_mismatch(context: impl Into<String>, expected: usize, got: usize) -> Self {
        MeritMapError::SchemaMismatch {
            context: context.into(),
            expected: format!("{expected} values"),
            got: format!("{got} values"),
        }
    }
}
