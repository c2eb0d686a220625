use std::fmt;

use jsu_request::JsonReply;

/// Which call of the upload protocol a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Chunk,
    Complete,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadPhase::Chunk => write!(f, "chunk"),
            UploadPhase::Complete => write!(f, "complete"),
        }
    }
}

/// Upload state machine.
///
/// `SendingChunk` loops over the source, then `Completing` runs once the last
/// chunk is acknowledged. Retries re-enter the same state with `retries + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    SendingChunk { offset: u64, retries: u32 },
    Completing { upload_id: String, retries: u32 },
    Done { upload_id: String },
    Failed { phase: UploadPhase, message: String },
}

/// What the retry hook learns about a failed call.
#[derive(Debug, Clone, Copy)]
pub struct RetryContext<'a> {
    pub phase: UploadPhase,
    /// Retry number about to run, starting at 1.
    pub attempt: u32,
    /// Byte offset the retry will start from (chunk phase).
    pub offset: u64,
    /// Reply of the failed call.
    pub reply: &'a JsonReply,
}
