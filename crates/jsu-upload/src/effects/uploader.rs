use std::sync::Arc;

use jsu_request::{Client, FormData, HttpTransport, JsonReply, Request, UploadProgress};
use tracing::{debug, error, warn};

use crate::core::{chunk_count, chunk_end, chunk_progress, content_range, suffixed_file_name};
use crate::data::{RetryContext, UploadOptions, UploadPhase, UploadSource, UploadState};
use crate::effects::cancel::CancelHandle;
use crate::error::{Result, UploadError};

/// One upload session of a single source.
///
/// Chunks are sent strictly in order: the next chunk is only built after the
/// previous one was acknowledged with an `upload_id`. Once the source is
/// exhausted the completion call finalizes the session.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use jsu_request::{Client, HttpTransport};
/// use jsu_upload::{ChunkedUpload, UploadOptions, UploadSource};
///
/// # async fn demo<T: HttpTransport>(client: Arc<Client<T>>) -> Result<(), Box<dyn std::error::Error>> {
/// let source = UploadSource::from_path("video.mp4").await?;
/// let options = UploadOptions::new("https://example.com/upload/", "https://example.com/upload/complete/")
///     .on_progress(|percent| println!("{percent}%"));
/// let upload_id = ChunkedUpload::new(client, source, options)?.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct ChunkedUpload<T: HttpTransport> {
    client: Arc<Client<T>>,
    source: UploadSource,
    options: UploadOptions,
    file_name: String,
    cancel: CancelHandle,
}

impl<T: HttpTransport> ChunkedUpload<T> {
    pub fn new(client: Arc<Client<T>>, source: UploadSource, options: UploadOptions) -> Result<Self> {
        if options.upload_url.is_empty() {
            return Err(UploadError::MissingOption("upload_url"));
        }
        if options.complete_url.is_empty() {
            return Err(UploadError::MissingOption("complete_url"));
        }
        if options.chunk_size == 0 {
            return Err(UploadError::InvalidChunkSize);
        }

        let file_name = suffixed_file_name(source.name(), options.file_name_suffix.as_deref());
        Ok(Self {
            client,
            source,
            options,
            file_name,
            cancel: CancelHandle::new(),
        })
    }

    /// Handle that stops this upload from another task.
    pub fn cancel_handle(&self) -> CancelHandle { self.cancel.clone() }

    /// File name sent with every chunk, suffix applied.
    pub fn file_name(&self) -> &str { &self.file_name }

    /// Drive the session to its end.
    ///
    /// Exactly one of the success and failure callbacks fires before this
    /// returns, with the same outcome as the returned value.
    pub async fn run(self) -> Result<String> {
        let mut cancelled = self.cancel.subscribe();
        let cancelled = async move { cancelled.wait_for(|c| *c).await.is_ok() };

        let outcome = tokio::select! {
            outcome = self.drive() => outcome,
            true = cancelled => Err(UploadError::Cancelled),
        };

        match &outcome {
            Ok(upload_id) => {
                debug!(file = %self.file_name, %upload_id, "upload finished");
                if let Some(callback) = &self.options.on_success {
                    callback(upload_id);
                }
            }
            Err(e) => {
                error!(file = %self.file_name, error = %e, "upload failed");
                if let Some(callback) = &self.options.on_failure {
                    callback(&e.to_string());
                }
            }
        }
        outcome
    }

    async fn drive(&self) -> Result<String> {
        debug!(
            file = %self.file_name,
            size = self.source.len(),
            chunks = chunk_count(self.source.len(), self.options.chunk_size),
            "starting upload"
        );
        self.report_progress(0);

        let mut upload_id = None;
        let mut state = UploadState::SendingChunk { offset: 0, retries: 0 };
        loop {
            state = match state {
                UploadState::SendingChunk { offset, retries } => self.send_chunk(offset, retries, &mut upload_id).await,
                UploadState::Completing { upload_id, retries } => self.complete(upload_id, retries).await,
                UploadState::Done { upload_id } => return Ok(upload_id),
                UploadState::Failed { phase, message } => return Err(UploadError::Failed { phase, message }),
            };
        }
    }

    async fn send_chunk(&self, offset: u64, retries: u32, upload_id: &mut Option<String>) -> UploadState {
        let total = self.source.len();
        let end = chunk_end(offset, self.options.chunk_size, total);
        let chunk_len = end - offset;

        let mut form = FormData::new()
            .file("file", self.file_name.clone(), self.source.slice(offset, end))
            .text("retries", retries);
        if let Some(id) = upload_id.as_deref() {
            form.append_text("upload_id", id);
        }
        for (name, value) in &self.options.extra_fields {
            form.append_text(name.clone(), value);
        }

        let mut request = Request::post(self.options.upload_url.clone())
            .header("Content-Range", content_range(offset, end, total))
            .headers(self.options.extra_headers.iter().cloned())
            .form(form);
        if let Some(callback) = self.options.on_progress.clone() {
            let progress: UploadProgress = Arc::new(move |loaded: u64, loaded_total: u64| {
                callback(chunk_progress(offset, chunk_len, loaded, loaded_total, total));
            });
            request = request.on_upload_progress(progress);
        }

        debug!(file = %self.file_name, offset, end, total, retries, "sending chunk");
        let reply = self.client.send_json(request).await;
        if reply.status != 0 {
            self.report_progress(chunk_progress(offset, chunk_len, 1, 1, total));
        }

        if reply.status == 200
            && let Some(id) = reply.str_field("upload_id")
        {
            *upload_id = Some(id.to_string());
            if end >= total {
                return UploadState::Completing {
                    upload_id: id.to_string(),
                    retries: 0,
                };
            }
            return UploadState::SendingChunk { offset: end, retries: 0 };
        }

        if retries >= self.options.max_retry {
            return UploadState::Failed {
                phase: UploadPhase::Chunk,
                message: failure_message(&reply),
            };
        }

        let resume_at = match reply.u64_field("offset") {
            Some(server_offset) if server_offset != offset => server_offset.min(total),
            _ => offset,
        };
        warn!(
            file = %self.file_name,
            status = reply.status,
            offset,
            resume_at,
            attempt = retries + 1,
            "chunk upload failed, retrying"
        );
        self.wait_before_retry(
            RetryContext {
                phase: UploadPhase::Chunk,
                attempt: retries + 1,
                offset: resume_at,
                reply: &reply,
            },
            retries,
        )
        .await;
        UploadState::SendingChunk {
            offset: resume_at,
            retries: retries + 1,
        }
    }

    async fn complete(&self, upload_id: String, retries: u32) -> UploadState {
        let total = self.source.len();
        let mut form = FormData::new()
            .text("upload_id", &upload_id)
            .text("expected_size", total)
            .text("retries", retries);
        for (name, value) in &self.options.extra_fields {
            form.append_text(name.clone(), value);
        }
        let request = Request::post(self.options.complete_url.clone())
            .headers(self.options.extra_headers.iter().cloned())
            .form(form);

        debug!(file = %self.file_name, %upload_id, retries, "completing upload");
        let reply = self.client.send_json(request).await;

        if reply.status == 200
            && let Some(id) = reply.str_field("upload_id")
        {
            self.report_progress(100);
            return UploadState::Done {
                upload_id: id.to_string(),
            };
        }

        if retries >= self.options.max_retry {
            return UploadState::Failed {
                phase: UploadPhase::Complete,
                message: failure_message(&reply),
            };
        }

        warn!(file = %self.file_name, status = reply.status, attempt = retries + 1, "completion failed, retrying");
        self.wait_before_retry(
            RetryContext {
                phase: UploadPhase::Complete,
                attempt: retries + 1,
                offset: total,
                reply: &reply,
            },
            retries,
        )
        .await;
        UploadState::Completing {
            upload_id,
            retries: retries + 1,
        }
    }

    async fn wait_before_retry(&self, context: RetryContext<'_>, retries: u32) {
        let custom = self.options.on_retry.as_ref().and_then(|hook| hook(&context));
        match custom {
            Some(wait) => wait.await,
            None => tokio::time::sleep(self.options.backoff.delay(retries)).await,
        }
    }

    fn report_progress(&self, percent: u8) {
        if let Some(callback) = &self.options.on_progress {
            callback(percent);
        }
    }
}

fn failure_message(reply: &JsonReply) -> String {
    match reply.error() {
        Some(message) => message.to_string(),
        None => format!("Upload request failed with status {}.", reply.status),
    }
}
