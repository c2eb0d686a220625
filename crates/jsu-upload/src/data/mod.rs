mod options;
mod source;
mod state;

pub use options::{FailureCallback, ProgressCallback, RetryHook, SuccessCallback, UploadOptions};
pub use source::UploadSource;
pub use state::{RetryContext, UploadPhase, UploadState};
