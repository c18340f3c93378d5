//! Remote config overrides.
//!
//! Optionally fetches an override mapping from a network endpoint so a
//! fleet of boards can be retuned without touching each device. The
//! remote layer is best-effort: any failure degrades to the config that
//! was already merged, and must never block startup.

use std::time::Duration;

use moka::sync::Cache;
use serde_yaml::Value;
use tracing::{debug, warn};

/// Default TTL for the remote override cache.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for the remote fetcher, read from the `remote` config section.
#[derive(Debug, Clone)]
pub struct RemoteOptions {
    /// Endpoint serving the override document.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How long a fetched override is reused before re-checking.
    pub cache_ttl: Duration,
}

impl RemoteOptions {
    /// Options with the default timeout and cache TTL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RemoteFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("status {0}")]
    Status(u16),

    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("document is not a mapping")]
    NotMapping,
}

/// Fetcher for remote config overrides, with a TTL cache for periodic
/// re-checks.
pub struct RemoteConfig {
    url: String,
    http: reqwest::blocking::Client,
    cache: Cache<(), Value>,
}

impl RemoteConfig {
    /// Create a fetcher. Fails only if the HTTP client cannot be built.
    pub fn new(options: &RemoteOptions) -> Result<Self, reqwest::Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .build()?;

        let cache = Cache::builder()
            .time_to_live(options.cache_ttl)
            .max_capacity(1)
            .build();

        Ok(Self {
            url: options.url.clone(),
            http,
            cache,
        })
    }

    /// Fetch the override mapping, or `None` if no override is available.
    ///
    /// `force` bypasses the cache and always attempts a live fetch (the
    /// startup path). Otherwise a cached value is reused until its TTL
    /// expires. Every failure mode degrades to `None`.
    pub fn fetch(&self, force: bool) -> Option<Value> {
        if !force && let Some(cached) = self.cache.get(&()) {
            debug!(url = %self.url, "remote config served from cache");
            return Some(cached);
        }

        match self.fetch_live() {
            Ok(value) => {
                self.cache.insert((), value.clone());
                Some(value)
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "remote config fetch failed; continuing without overrides");
                None
            }
        }
    }

    fn fetch_live(&self) -> Result<Value, RemoteFetchError> {
        let response = self.http.get(&self.url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFetchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        let value: Value = serde_yaml::from_str(&body)?;
        if !value.is_mapping() {
            return Err(RemoteFetchError::NotMapping);
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(url: &str) -> RemoteOptions {
        RemoteOptions {
            url: url.to_string(),
            timeout: Duration::from_secs(2),
            cache_ttl: Duration::from_secs(60),
        }
    }

    #[test]
    fn fetches_and_parses_override() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/config.yml")
            .with_status(200)
            .with_body("ui:\n  interleave: true\n")
            .create();

        let remote = RemoteConfig::new(&options(&format!("{}/config.yml", server.url()))).unwrap();
        let value = remote.fetch(true).unwrap();

        assert_eq!(value["ui"]["interleave"], Value::Bool(true));
        mock.assert();
    }

    #[test]
    fn server_error_degrades_to_none() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/config.yml")
            .with_status(500)
            .with_body("boom")
            .create();

        let remote = RemoteConfig::new(&options(&format!("{}/config.yml", server.url()))).unwrap();
        assert!(remote.fetch(true).is_none());
    }

    #[test]
    fn unreachable_endpoint_degrades_to_none() {
        // Nothing is listening on this port.
        let remote = RemoteConfig::new(&options("http://127.0.0.1:9/config.yml")).unwrap();
        assert!(remote.fetch(true).is_none());
    }

    #[test]
    fn malformed_document_degrades_to_none() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/config.yml")
            .with_status(200)
            .with_body(": : not yaml : :")
            .create();

        let remote = RemoteConfig::new(&options(&format!("{}/config.yml", server.url()))).unwrap();
        assert!(remote.fetch(true).is_none());
    }

    #[test]
    fn scalar_document_degrades_to_none() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/config.yml")
            .with_status(200)
            .with_body("just a string")
            .create();

        let remote = RemoteConfig::new(&options(&format!("{}/config.yml", server.url()))).unwrap();
        assert!(remote.fetch(true).is_none());
    }

    #[test]
    fn cached_value_reused_until_expiry() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/config.yml")
            .with_status(200)
            .with_body("ui:\n  font_size: 16\n")
            .expect(1)
            .create();

        let remote = RemoteConfig::new(&options(&format!("{}/config.yml", server.url()))).unwrap();
        assert!(remote.fetch(false).is_some());
        // Second call is served from the cache, not the server.
        assert!(remote.fetch(false).is_some());
        mock.assert();
    }

    #[test]
    fn force_bypasses_cache() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/config.yml")
            .with_status(200)
            .with_body("ui:\n  font_size: 16\n")
            .expect(2)
            .create();

        let remote = RemoteConfig::new(&options(&format!("{}/config.yml", server.url()))).unwrap();
        assert!(remote.fetch(true).is_some());
        assert!(remote.fetch(true).is_some());
        mock.assert();
    }
}
