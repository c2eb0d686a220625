//! Client-side utility toolkit.
//!
//! Three peer mechanisms, each in its own crate and re-exported here:
//! - [`request`] - HTTP requests with in-flight duplicate suppression
//! - [`upload`] - Sequential chunked upload with retry and resume
//! - [`poll`] - Visibility-aware periodic polling
//!
//! plus the stateless helpers of [`util`]. [`Toolkit`] ties a request client,
//! a translation catalog and the detected user agent together, configured
//! from a [`JsuConfig`].

mod config;
mod error;
mod toolkit;

pub use jsu_poll as poll;
pub use jsu_request as request;
pub use jsu_upload as upload;
pub use jsu_util as util;

pub use config::{ENV_PREFIX, JsuConfig, PollConfig, RequestConfig, UploadConfig};
pub use error::{ConfigError, Result};
pub use toolkit::Toolkit;
