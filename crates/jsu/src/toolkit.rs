use std::sync::Arc;

use jsu_request::{Client, HttpTransport};
use jsu_upload::{ChunkedUpload, UploadSource};
use jsu_util::{Catalog, UserAgent};
use tracing::debug;

use crate::config::JsuConfig;

/// Shared client-side state: one request client, one translation catalog
/// and the detected user agent.
///
/// Uploaders built here share the toolkit's client, so their chunks take
/// part in the same duplicate suppression as every other request.
///
/// # Examples
///
/// ```
/// use jsu::{JsuConfig, Toolkit};
/// use jsu::request::{HttpTransport, Request, Response};
///
/// struct Offline;
///
/// impl HttpTransport for Offline {
///     type Error = std::io::Error;
///
///     async fn send(&self, _request: &Request) -> Result<Response, Self::Error> {
///         Err(std::io::Error::other("offline"))
///     }
/// }
///
/// let toolkit = Toolkit::new(Offline, JsuConfig::default(), "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0");
/// assert_eq!(toolkit.user_agent().os_name.as_str(), "linux");
/// assert_eq!(toolkit.catalog().current_lang(), "en");
/// ```
pub struct Toolkit<T: HttpTransport> {
    client: Arc<Client<T>>,
    config: JsuConfig,
    catalog: Catalog,
    user_agent: UserAgent,
}

impl<T: HttpTransport> Toolkit<T> {
    pub fn new(transport: T, config: JsuConfig, user_agent: &str) -> Self {
        let client = Arc::new(Client::with_options(transport, config.client_options()));
        let user_agent = UserAgent::parse(user_agent);
        debug!(browser = %user_agent.browser_name, os = %user_agent.os_name, "toolkit ready");
        Self {
            client,
            config,
            catalog: Catalog::new(),
            user_agent,
        }
    }

    pub fn client(&self) -> &Arc<Client<T>> { &self.client }

    pub fn config(&self) -> &JsuConfig { &self.config }

    pub fn catalog(&self) -> &Catalog { &self.catalog }

    pub fn catalog_mut(&mut self) -> &mut Catalog { &mut self.catalog }

    pub fn user_agent(&self) -> &UserAgent { &self.user_agent }

    /// Upload session for `source` with the configured retry and chunk policy.
    ///
    /// Callbacks and extras can still be set through [`uploader_with`](Self::uploader_with).
    pub fn uploader(
        &self,
        source: UploadSource,
        upload_url: impl Into<String>,
        complete_url: impl Into<String>,
    ) -> jsu_upload::Result<ChunkedUpload<T>> {
        self.uploader_with(source, upload_url, complete_url, |options| options)
    }

    /// Like [`uploader`](Self::uploader), letting `customize` adjust the options first.
    pub fn uploader_with(
        &self,
        source: UploadSource,
        upload_url: impl Into<String>,
        complete_url: impl Into<String>,
        customize: impl FnOnce(jsu_upload::UploadOptions) -> jsu_upload::UploadOptions,
    ) -> jsu_upload::Result<ChunkedUpload<T>> {
        let options = customize(self.config.upload_options(upload_url, complete_url));
        ChunkedUpload::new(Arc::clone(&self.client), source, options)
    }
}

#[cfg(feature = "reqwest")]
impl Toolkit<jsu_request::ReqwestTransport> {
    /// Toolkit over a default reqwest client.
    pub fn with_reqwest(config: JsuConfig, user_agent: &str) -> Result<Self, jsu_request::RequestError> {
        let transport =
            jsu_request::ReqwestTransport::new().map_err(|e| jsu_request::RequestError::Transport(Box::new(e)))?;
        Ok(Self::new(transport, config, user_agent))
    }
}
