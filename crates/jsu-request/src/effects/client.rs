use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::Fingerprint;
use crate::data::{Body, ClientOptions, JsonReply, Request, Response};
use crate::effects::http::HttpTransport;
use crate::effects::registry::InFlightRegistry;
use crate::error::{RequestError, Result};

/// Request sender with duplicate suppression.
///
/// Every request goes through [`send`](Self::send), which prepares it
/// (cache-buster, CSRF header, content type), fingerprints the prepared form,
/// and refuses to dispatch while an identical request is in flight.
pub struct Client<T: HttpTransport> {
    transport: T,
    registry: Arc<InFlightRegistry>,
    options: ClientOptions,
}

impl<T: HttpTransport> Client<T> {
    pub fn new(transport: T) -> Self { Self::with_options(transport, ClientOptions::default()) }

    pub fn with_options(transport: T, options: ClientOptions) -> Self {
        let registry = Arc::new(InFlightRegistry::with_ttl(options.in_flight_ttl));
        Self::with_registry(transport, options, registry)
    }

    /// Client sharing `registry` with other clients.
    pub fn with_registry(transport: T, options: ClientOptions, registry: Arc<InFlightRegistry>) -> Self {
        Self {
            transport,
            registry,
            options,
        }
    }

    pub fn registry(&self) -> &Arc<InFlightRegistry> { &self.registry }

    pub fn options(&self) -> &ClientOptions { &self.options }

    pub fn transport(&self) -> &T { &self.transport }

    /// Apply client-wide request decoration.
    ///
    /// Query params are folded into the URL, a cache-buster is appended unless
    /// the request opted into caching, unsafe methods receive the CSRF header and
    /// JSON bodies receive their content type.
    pub fn prepare(&self, mut request: Request) -> Request {
        if !request.cache {
            let stamp = chrono::Utc::now().timestamp_millis();
            request.params.push((self.options.cache_buster.clone(), stamp.to_string()));
        }
        request.url = request.full_url();
        request.params.clear();

        if !request.method.is_safe()
            && let Some(token) = &self.options.csrf_token
        {
            request.headers.push((self.options.csrf_header.clone(), token.clone()));
        }

        if matches!(request.body, Body::Json(_)) && request.header_values("Content-Type").next().is_none() {
            request
                .headers
                .push(("Content-Type".to_string(), "application/json; charset=UTF-8".to_string()));
        }
        request
    }

    /// Prepare and dispatch `request`.
    ///
    /// Returns [`RequestError::Duplicated`] without touching the transport when
    /// an identical request is in flight. The fingerprint is released when the
    /// exchange finishes, fails, or the returned future is dropped.
    pub async fn send(&self, request: Request) -> Result<Response> {
        let request = self.prepare(request);
        let fingerprint = Fingerprint::of(&request, &self.options.cache_buster);

        let Some(guard) = self.registry.try_acquire(fingerprint.clone()) else {
            warn!(method = %request.method, url = %request.url, "duplicated request aborted");
            return Err(RequestError::Duplicated {
                fingerprint: fingerprint.into(),
            });
        };

        debug!(method = %request.method, url = %request.url, "sending request");
        let result = self.transport.send(&request).await;
        guard.release();

        match result {
            Ok(response) => {
                debug!(status = response.status, url = %request.url, "request finished");
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, url = %request.url, "request failed");
                Err(RequestError::Transport(Box::new(e)))
            }
        }
    }

    /// Dispatch `request` and fold every outcome into a [`JsonReply`].
    pub async fn send_json(&self, request: Request) -> JsonReply {
        match self.send(request).await {
            Ok(response) => JsonReply::from_response(&response),
            Err(e) => JsonReply::from_error(e.to_string()),
        }
    }
}
