use std::time::Duration;

/// Configuration for a [`Client`](crate::Client).
///
/// # Examples
///
/// ```
/// use jsu_request::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::default()
///     .csrf_token(Some("token".to_string()))
///     .in_flight_ttl(Some(Duration::from_secs(120)));
/// assert_eq!(options.cache_buster, "_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Query key of the cache-busting parameter.
    ///
    /// It is appended to uncached requests and ignored when fingerprinting.
    ///
    /// Default: `_`
    pub cache_buster: String,

    /// Header carrying the CSRF token on unsafe methods.
    ///
    /// Default: `X-CSRFToken`
    pub csrf_header: String,

    /// CSRF token sent on POST, PUT, PATCH and DELETE when present.
    ///
    /// Default: None
    pub csrf_token: Option<String>,

    /// Age after which an in-flight fingerprint no longer blocks identical requests.
    ///
    /// `None` keeps fingerprints until their request finishes.
    ///
    /// Default: None
    pub in_flight_ttl: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            cache_buster: "_".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            csrf_token: None,
            in_flight_ttl: None,
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn cache_buster(mut self, key: impl Into<String>) -> Self {
        self.cache_buster = key.into();
        self
    }

    #[must_use]
    pub fn csrf_header(mut self, name: impl Into<String>) -> Self {
        self.csrf_header = name.into();
        self
    }

    #[must_use]
    pub fn csrf_token(mut self, token: Option<String>) -> Self {
        self.csrf_token = token.filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn in_flight_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.in_flight_ttl = ttl;
        self
    }
}
