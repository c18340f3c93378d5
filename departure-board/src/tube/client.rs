//! TfL StopPoint arrivals client.

use serde_json::Value;

use super::error::TubeError;

/// Default base URL for the TfL unified API.
const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the tube client.
#[derive(Debug, Clone)]
pub struct TubeConfig {
    /// Registered application id.
    pub app_id: String,
    /// Registered application key.
    pub app_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl TubeConfig {
    /// Create a new config with the given credentials.
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// TfL arrivals client.
///
/// Arrival items are returned as raw JSON objects rather than typed
/// DTOs: the feed's field names have drifted across versions, and the
/// board adapter resolves them with a tolerant multi-name lookup.
#[derive(Debug, Clone)]
pub struct TubeClient {
    http: reqwest::blocking::Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl TubeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TubeConfig) -> Result<Self, TubeError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id,
            app_key: config.app_key,
        })
    }

    /// Get live arrivals for a StopPoint.
    ///
    /// A body that is not a JSON array is [`TubeError::UnexpectedShape`]:
    /// the integration point this adapter relies on is gone, and that
    /// must surface rather than degrade.
    pub fn arrivals(&self, stop_point_id: &str) -> Result<Vec<Value>, TubeError> {
        let url = format!("{}/StopPoint/{stop_point_id}/Arrivals", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("app_id", &self.app_id), ("app_key", &self.app_key)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TubeError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text()?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| TubeError::UnexpectedShape(format!("not JSON: {e}")))?;

        match value {
            Value::Array(items) => Ok(items),
            other => Err(TubeError::UnexpectedShape(format!(
                "expected an array of arrivals, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
