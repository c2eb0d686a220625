use std::future::Future;
use std::sync::Arc;

use crate::data::{Request, Response};

/// Asynchronous HTTP transport abstraction.
///
/// This is the only place a request leaves the process. [`Client`](crate::Client)
/// wraps a transport with fingerprinting, so implementations stay unaware of
/// duplicate suppression.
///
/// # Implementations
///
/// - [`ReqwestTransport`]: Production implementation using `reqwest`
/// - Scripted mocks for testing
pub trait HttpTransport: Send + Sync {
    /// Error type for transport failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send `request` as-is and return the full response.
    ///
    /// Non-2xx statuses are responses, not errors. Implementations may report
    /// body progress through `request.on_upload_progress`.
    fn send(&self, request: &Request) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

impl<T: HttpTransport> HttpTransport for Arc<T> {
    type Error = T::Error;

    fn send(&self, request: &Request) -> impl Future<Output = Result<Response, Self::Error>> + Send {
        (**self).send(request)
    }
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::sync::atomic::{AtomicU64, Ordering};

    use bytes::Bytes;
    use futures_util::{Stream, StreamExt};
    use reqwest::multipart::{Form, Part};

    use super::*;
    use crate::data::{Body, FormData, FormValue, Method, UploadProgress};

    /// Size of the slices a file part is streamed in when progress is observed.
    const PROGRESS_SLICE: usize = 64 * 1024;

    /// Production HTTP transport using reqwest.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        /// Create a new ReqwestTransport with default configuration.
        pub fn new() -> Result<Self, reqwest::Error> {
            let client = reqwest::Client::builder().build()?;
            Ok(Self { client })
        }

        pub fn from_client(client: reqwest::Client) -> Self { Self { client } }
    }

    impl HttpTransport for ReqwestTransport {
        type Error = reqwest::Error;

        async fn send(&self, request: &Request) -> Result<Response, Self::Error> {
            let mut builder = self.client.request(method(request.method), request.full_url());

            for (key, value) in &request.headers {
                builder = builder.header(key, value);
            }

            builder = match &request.body {
                Body::Empty => builder,
                Body::Text(text) => builder.body(text.clone()),
                Body::Bytes(data) => builder.body(data.clone()),
                Body::Json(value) => builder.body(value.to_string()),
                Body::Form(form) => builder.multipart(multipart(form, request.on_upload_progress.clone())?),
            };

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
                .collect();
            let body = response.bytes().await?;

            Ok(Response {
                status,
                headers,
                body,
            })
        }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Trace => reqwest::Method::TRACE,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    fn multipart(form: &FormData, progress: Option<UploadProgress>) -> Result<Form, reqwest::Error> {
        let total = form.file_bytes();
        let sent = Arc::new(AtomicU64::new(0));
        let mut out = Form::new();

        for (name, value) in form.fields() {
            out = match value {
                FormValue::Text(text) => out.text(name.clone(), text.clone()),
                FormValue::File {
                    filename,
                    content_type,
                    data,
                } => {
                    let part = match &progress {
                        Some(callback) => Part::stream_with_length(
                            reqwest::Body::wrap_stream(progress_stream(
                                data.clone(),
                                total,
                                Arc::clone(&sent),
                                Arc::clone(callback),
                            )),
                            data.len() as u64,
                        ),
                        None => Part::bytes(data.to_vec()),
                    };
                    let mut part = part.file_name(filename.clone());
                    if let Some(content_type) = content_type {
                        part = part.mime_str(content_type)?;
                    }
                    out.part(name.clone(), part)
                }
            };
        }
        Ok(out)
    }

    fn progress_stream(
        data: Bytes,
        total: u64,
        sent: Arc<AtomicU64>,
        callback: UploadProgress,
    ) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
        let slices: Vec<Bytes> = (0..data.len())
            .step_by(PROGRESS_SLICE)
            .map(|start| data.slice(start..(start + PROGRESS_SLICE).min(data.len())))
            .collect();

        futures_util::stream::iter(slices).map(move |slice| {
            let len = slice.len() as u64;
            let now = sent.fetch_add(len, Ordering::Relaxed) + len;
            callback(now, total);
            Ok(slice)
        })
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestTransport;
