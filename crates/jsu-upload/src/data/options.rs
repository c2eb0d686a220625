use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::core::Backoff;
use crate::data::RetryContext;

/// Receives upload progress in percent (0-100).
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Called before every retry.
///
/// Returning a future makes the retry wait for it instead of the configured
/// [`Backoff`]; returning `None` keeps the default delay.
pub type RetryHook = Arc<dyn for<'a> Fn(&RetryContext<'a>) -> Option<BoxFuture<'static, ()>> + Send + Sync>;

/// Receives the final `upload_id`.
pub type SuccessCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Receives the failure message.
pub type FailureCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Configuration for a [`ChunkedUpload`](crate::ChunkedUpload).
///
/// # Examples
///
/// ```
/// use jsu_upload::UploadOptions;
///
/// let options = UploadOptions::new("/upload/", "/upload/complete/")
///     .file_name_suffix("_raw")
///     .extra_field("channel", "7")
///     .max_retry(5);
/// assert_eq!(options.chunk_size, 20_000_000);
/// ```
#[derive(Clone)]
pub struct UploadOptions {
    /// Endpoint receiving each chunk.
    pub upload_url: String,

    /// Endpoint called once every chunk is stored.
    pub complete_url: String,

    /// Inserted before the extension of the uploaded file name.
    ///
    /// Default: None
    pub file_name_suffix: Option<String>,

    /// Headers sent with every chunk and completion call.
    pub extra_headers: Vec<(String, String)>,

    /// Form fields sent with every chunk and completion call.
    pub extra_fields: Vec<(String, String)>,

    /// Retries allowed per step before the upload fails.
    ///
    /// Default: 30
    pub max_retry: u32,

    /// Wait before a retry when the retry hook does not supply one.
    ///
    /// Default: fixed 10 seconds
    pub backoff: Backoff,

    /// Bytes per chunk call.
    ///
    /// Default: 20 000 000
    pub chunk_size: u64,

    pub on_progress: Option<ProgressCallback>,
    pub on_retry: Option<RetryHook>,
    pub on_success: Option<SuccessCallback>,
    pub on_failure: Option<FailureCallback>,
}

impl UploadOptions {
    pub fn new(upload_url: impl Into<String>, complete_url: impl Into<String>) -> Self {
        Self {
            upload_url: upload_url.into(),
            complete_url: complete_url.into(),
            file_name_suffix: None,
            extra_headers: Vec::new(),
            extra_fields: Vec::new(),
            max_retry: 30,
            backoff: Backoff::default(),
            chunk_size: 20_000_000,
            on_progress: None,
            on_retry: None,
            on_success: None,
            on_failure: None,
        }
    }

    #[must_use]
    pub fn file_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_name_suffix = Some(suffix.into());
        self
    }

    #[must_use]
    pub fn extra_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn extra_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_fields.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn max_retry(mut self, max_retry: u32) -> Self {
        self.max_retry = max_retry;
        self
    }

    /// Fixed wait between retries.
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.backoff = Backoff::Fixed(delay);
        self
    }

    #[must_use]
    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn on_progress(mut self, callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_retry(
        mut self,
        hook: impl for<'a> Fn(&RetryContext<'a>) -> Option<BoxFuture<'static, ()>> + Send + Sync + 'static,
    ) -> Self {
        self.on_retry = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_success(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_failure(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_failure = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hook = |set: bool| if set { Some("{ ... }") } else { None };
        f.debug_struct("UploadOptions")
            .field("upload_url", &self.upload_url)
            .field("complete_url", &self.complete_url)
            .field("file_name_suffix", &self.file_name_suffix)
            .field("extra_headers", &self.extra_headers)
            .field("extra_fields", &self.extra_fields)
            .field("max_retry", &self.max_retry)
            .field("backoff", &self.backoff)
            .field("chunk_size", &self.chunk_size)
            .field("on_progress", &hook(self.on_progress.is_some()))
            .field("on_retry", &hook(self.on_retry.is_some()))
            .field("on_success", &hook(self.on_success.is_some()))
            .field("on_failure", &hook(self.on_failure.is_some()))
            .finish()
    }
}
