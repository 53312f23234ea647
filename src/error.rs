// src/error.rs
// =============================================================================
// Error types shared by the walker, the assembler and the front ends.
//
// Two layers:
// - ServiceError: what the GitHub collaborator reports (status + message)
// - ScribeError: what a caller of the pipeline has to handle
//
// Per-file download/decode failures are NOT errors here. They are recorded
// as ContentWarning values and assembly keeps going.
// =============================================================================

use serde::Serialize;
use thiserror::Error;

/// Failure reported by the listing or fetch collaborator.
///
/// Clone so test doubles can hand out the same error more than once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The API answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never got an answer (DNS, TLS, timeout, ...)
    #[error("request failed: {0}")]
    Transport(String),

    /// The answer was not the JSON shape we expected
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::Decode(e.to_string())
        } else {
            ServiceError::Transport(e.to_string())
        }
    }
}

/// A file that was found but left out of the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentWarning {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ScribeError {
    /// Malformed repository reference, raised before any network call
    #[error("invalid repository reference: {0}")]
    InvalidRepository(String),

    /// A directory listing failed; the whole traversal is abandoned
    #[error("failed to list '{path}': {source}")]
    Listing {
        path: String,
        #[source]
        source: ServiceError,
    },

    /// Traversal succeeded but produced nothing worth delivering
    #[error("no eligible code files found ({} skipped)", .warnings.len())]
    NothingToDo { warnings: Vec<ContentWarning> },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
