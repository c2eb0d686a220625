//! Sequential chunked upload with retry and server-directed resume.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Options, sources and the upload state machine
//! - [`core`] - Pure chunk, progress, naming and backoff arithmetic
//! - [`effects`] - The [`ChunkedUpload`] driver on top of a [`jsu_request::Client`]
//!
//! # Key Features
//!
//! - **Sequential chunks**: chunk N+1 is built only after chunk N was acknowledged
//! - **Resume**: a server-reported `offset` on failure moves the next attempt there
//! - **Pluggable waits**: a retry hook may supply the future a retry waits on
//! - **One terminal callback**: success or failure fires exactly once per session

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use self::core::{Backoff, suffixed_file_name};
pub use data::{
    FailureCallback, ProgressCallback, RetryContext, RetryHook, SuccessCallback, UploadOptions, UploadPhase, UploadSource,
    UploadState,
};
pub use effects::{CancelHandle, ChunkedUpload};
pub use error::{Result, UploadError};
