//! Error types for jsu-upload.

use thiserror::Error;

use crate::data::UploadPhase;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("missing required upload option: {0}")]
    MissingOption(&'static str),

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    /// Retries for `phase` were exhausted. `message` is the server's error
    /// when it sent one.
    #[error("{message}")]
    Failed { phase: UploadPhase, message: String },

    #[error("Upload cancelled.")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, UploadError>;
