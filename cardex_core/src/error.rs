use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain or interpret a pack. Fatal to the init attempt that hit
/// it; whatever index was already built stays in place.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load pack: {0}")]
    Transport(String),

    #[error("Failed to load pack: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Failed to read pack file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pack too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Pack is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pack JSON format not recognized (expected array or object).")]
    FormatNotRecognized,
}

/// Failure to fetch a single raw record during refresh. The index is left
/// untouched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Raw fetch failed: {0}")]
    Transport(String),

    #[error("Raw fetch failed: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Raw record too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Raw record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
