//! RealTimeTrains HTTP client.
//!
//! Blocking client for the RTT JSON API. Handles basic auth, URL path
//! construction, and conversion of error statuses into typed errors. A
//! refresh cycle issues its calls strictly sequentially, so there is no
//! connection pooling or request concurrency to manage here.

use chrono::{Datelike, NaiveDate};

use super::error::RttError;
use super::types::{LocationLineup, ServiceInfo};

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the RTT client.
#[derive(Debug, Clone)]
pub struct RttConfig {
    /// Base URL of the API, e.g. `https://api.rtt.io/api/v1`.
    pub base_url: String,
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl RttConfig {
    /// Create a new config with the given endpoint and credentials.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Query parameters for a station lineup.
#[derive(Debug, Clone, Default)]
pub struct LineupQuery {
    /// Filter to services calling at this station afterwards.
    pub to_station: Option<String>,
    /// Request the arrivals lineup instead of departures.
    pub arrivals: bool,
    /// Specific date; omitted means "now".
    pub date: Option<NaiveDate>,
    /// Specific time as `HHMM`; requires `date` to be set.
    pub time_hhmm: Option<String>,
}

/// RTT API client.
#[derive(Debug, Clone)]
pub struct RttClient {
    http: reqwest::blocking::Client,
    base_url: String,
    username: String,
    password: String,
}

impl RttClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RttConfig) -> Result<Self, RttError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username,
            password: config.password,
        })
    }

    /// Get the lineup of services at a station.
    ///
    /// An unknown station (404) yields an empty lineup rather than an
    /// error; any other non-success status is an [`RttError::Api`].
    pub fn location_lineup(
        &self,
        station: &str,
        query: &LineupQuery,
    ) -> Result<LocationLineup, RttError> {
        let mut path = format!("/json/search/{station}");
        if let Some(to) = &query.to_station {
            path.push_str(&format!("/to/{to}"));
        }
        if query.arrivals {
            path.push_str("/arrivals");
        }
        if let Some(date) = query.date {
            path.push_str(&format!(
                "/{:04}/{:02}/{:02}",
                date.year(),
                date.month(),
                date.day()
            ));
            if let Some(time) = &query.time_hhmm {
                if !is_hhmm(time) {
                    return Err(RttError::InvalidRequest(format!(
                        "time must be HHMM, e.g. 0810 (got {time:?})"
                    )));
                }
                path.push_str(&format!("/{time}"));
            }
        }

        self.get_json(&path, LocationLineup::default())
    }

    /// Get the full itinerary of one service on a given date.
    ///
    /// 404 (unknown service or date) yields an empty info document.
    pub fn service_info(&self, service_uid: &str, run_date: NaiveDate) -> Result<ServiceInfo, RttError> {
        let path = format!(
            "/json/service/{service_uid}/{:04}/{:02}/{:02}",
            run_date.year(),
            run_date.month(),
            run_date.day()
        );

        self.get_json(&path, ServiceInfo::default())
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        on_not_found: T,
    ) -> Result<T, RttError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(on_not_found);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RttError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RttError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| RttError::Json {
            message: e.to_string(),
        })
    }
}

fn is_hhmm(s: &str) -> bool {
    s.len() == 4
        && s.bytes().all(|b| b.is_ascii_digit())
        && s[..2].parse::<u8>().is_ok_and(|h| h < 24)
        && s[2..].parse::<u8>().is_ok_and(|m| m < 60)
}
