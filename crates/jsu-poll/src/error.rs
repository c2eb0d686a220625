//! Error types for jsu-poll.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    /// Timers need a tokio runtime to be spawned on.
    #[error("polling requires a tokio runtime")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

pub type Result<T> = std::result::Result<T, PollError>;
