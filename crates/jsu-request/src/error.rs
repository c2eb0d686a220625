//! Error types for jsu-request.

use thiserror::Error;

/// Message carried by a suppressed duplicate.
pub const DUPLICATED_MESSAGE: &str = "Duplicated request aborted";

#[derive(Debug, Error)]
pub enum RequestError {
    /// An identical request is still in flight; nothing was sent.
    #[error("Duplicated request aborted")]
    Duplicated { fingerprint: String },

    #[error("{0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RequestError {
    pub fn is_duplicated(&self) -> bool { matches!(self, RequestError::Duplicated { .. }) }
}

pub type Result<T> = std::result::Result<T, RequestError>;
