use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use jsu_request::ClientOptions;
use jsu_upload::{Backoff, UploadOptions};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Prefix of the environment variables read by [`JsuConfig::load`].
pub const ENV_PREFIX: &str = "JSU_";

/// Toolkit configuration.
///
/// Layers, later ones winning: built-in defaults, an optional TOML file,
/// then `JSU_`-prefixed environment variables where `__` separates the
/// section from the key (`JSU_UPLOAD__MAX_RETRY=5`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsuConfig {
    pub request: RequestConfig,
    pub upload: UploadConfig,
    pub poll: PollConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub cache_buster: String,
    pub csrf_header: String,
    pub csrf_token: Option<String>,
    /// Unset keeps fingerprints until their request finishes.
    pub in_flight_ttl_ms: Option<u64>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        let options = ClientOptions::default();
        Self {
            cache_buster: options.cache_buster,
            csrf_header: options.csrf_header,
            csrf_token: None,
            in_flight_ttl_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_retry: u32,
    pub retry_delay_ms: u64,
    /// When set, the wait doubles from `retry_delay_ms` with each retry up to this cap.
    pub max_retry_delay_ms: Option<u64>,
    pub chunk_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_retry: 30,
            retry_delay_ms: 10_000,
            max_retry_delay_ms: None,
            chunk_size: 20_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
}

impl UploadConfig {
    pub fn backoff(&self) -> Backoff {
        let base = Duration::from_millis(self.retry_delay_ms);
        match self.max_retry_delay_ms {
            Some(max_ms) => Backoff::Exponential {
                base,
                max: Duration::from_millis(max_ms).max(base),
            },
            None => Backoff::Fixed(base),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self { Self { interval_ms: 10_000 } }
}

impl JsuConfig {
    /// Defaults overlaid with `path` (skipped when missing) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> { Ok(Self::figment(path).extract()?) }

    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(JsuConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default()
            .cache_buster(self.request.cache_buster.clone())
            .csrf_header(self.request.csrf_header.clone())
            .csrf_token(self.request.csrf_token.clone())
            .in_flight_ttl(self.request.in_flight_ttl_ms.map(Duration::from_millis))
    }

    /// Upload options for one session, callbacks left unset.
    pub fn upload_options(&self, upload_url: impl Into<String>, complete_url: impl Into<String>) -> UploadOptions {
        UploadOptions::new(upload_url, complete_url)
            .max_retry(self.upload.max_retry)
            .backoff(self.upload.backoff())
            .chunk_size(self.upload.chunk_size)
    }

    pub fn poll_interval(&self) -> Duration { Duration::from_millis(self.poll.interval_ms) }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    fn load(path: Option<&str>) -> figment::error::Result<JsuConfig> { JsuConfig::figment(path.map(Path::new)).extract() }

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|_| {
            let config = load(None)?;
            assert_eq!(config, JsuConfig::default());
            assert_eq!(config.request.cache_buster, "_");
            assert_eq!(config.request.csrf_header, "X-CSRFToken");
            assert_eq!(config.upload.chunk_size, 20_000_000);
            assert_eq!(config.poll_interval(), Duration::from_secs(10));
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "jsu.toml",
                r#"
                [request]
                csrf_token = "abc"
                in_flight_ttl_ms = 60000

                [upload]
                max_retry = 5
                chunk_size = 1024
                "#,
            )?;
            jail.set_env("JSU_UPLOAD__MAX_RETRY", "2");
            jail.set_env("JSU_POLL__INTERVAL_MS", "500");

            let config = load(Some("jsu.toml"))?;
            assert_eq!(config.request.csrf_token.as_deref(), Some("abc"));
            assert_eq!(config.upload.max_retry, 2);
            assert_eq!(config.upload.chunk_size, 1024);
            assert_eq!(config.upload.retry_delay_ms, 10_000);
            assert_eq!(config.poll.interval_ms, 500);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_skipped() {
        Jail::expect_with(|_| {
            let config = load(Some("absent.toml"))?;
            assert_eq!(config, JsuConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("jsu.toml", "[upload]\nmax_retry = \"many\"\n")?;
            assert!(JsuConfig::load(Some(Path::new("jsu.toml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_conversions() {
        let mut config = JsuConfig::default();
        config.request.csrf_token = Some(String::new());
        config.request.in_flight_ttl_ms = Some(1500);
        config.upload.retry_delay_ms = 250;

        let client = config.client_options();
        assert_eq!(client.csrf_token, None);
        assert_eq!(client.in_flight_ttl, Some(Duration::from_millis(1500)));

        let upload = config.upload_options("/up/", "/up/done/");
        assert_eq!(upload.upload_url, "/up/");
        assert_eq!(upload.max_retry, 30);
        assert_eq!(upload.backoff, Backoff::Fixed(Duration::from_millis(250)));
    }

    #[test]
    fn test_retry_cap_selects_doubling_backoff() {
        Jail::expect_with(|jail| {
            jail.set_env("JSU_UPLOAD__RETRY_DELAY_MS", "500");
            jail.set_env("JSU_UPLOAD__MAX_RETRY_DELAY_MS", "4000");
            let config = load(None)?;

            let backoff = config.upload_options("/up/", "/up/done/").backoff;
            assert_eq!(
                backoff,
                Backoff::Exponential {
                    base: Duration::from_millis(500),
                    max: Duration::from_secs(4),
                }
            );
            assert_eq!(backoff.delay(2), Duration::from_secs(2));
            assert_eq!(backoff.delay(9), Duration::from_secs(4));
            Ok(())
        });
    }

    #[test]
    fn test_retry_cap_below_base_keeps_base() {
        let mut config = JsuConfig::default();
        config.upload.max_retry_delay_ms = Some(1);
        assert_eq!(config.upload.backoff().delay(3), Duration::from_secs(10));
    }
}
