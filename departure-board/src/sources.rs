//! Config-driven entry points for the two board sources.
//!
//! This is where config keys are actually looked up, so a missing
//! credential or station code surfaces here as a `MissingKey` error at
//! the point of use, not at load time.

use crate::board::{CombineMode, DepartureRow};
use crate::config::{Config, ConfigError};
use crate::rtt::{self, BoardOptions, RttClient, RttConfig, RttError};
use crate::tube::{self, TubeClient, TubeConfig, TubeError};

/// Errors from building clients or fetching a source board.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rtt(#[from] RttError),

    #[error(transparent)]
    Tube(#[from] TubeError),
}

/// Build an RTT client from the `rtt` config section.
pub fn rtt_client_from(cfg: &Config) -> Result<RttClient, SourceError> {
    let config = RttConfig::new(
        cfg.require_str("rtt.base_url")?,
        cfg.require_str("rtt.username")?,
        cfg.require_str("rtt.password")?,
    );
    Ok(RttClient::new(config)?)
}

/// Build a TfL client from the `tfl` config section.
pub fn tube_client_from(cfg: &Config) -> Result<TubeClient, SourceError> {
    let config = TubeConfig::new(cfg.require_str("tfl.app_id")?, cfg.require_str("tfl.app_key")?);
    Ok(TubeClient::new(config)?)
}

/// Fetch the National Rail board using the `defaults.national_rail`
/// config section.
pub fn national_rail_board(
    cfg: &Config,
    client: &RttClient,
) -> Result<Vec<DepartureRow>, SourceError> {
    let mut options = BoardOptions::new(cfg.require_str("defaults.national_rail.crs")?)
        .with_arrivals(cfg.bool_or("defaults.national_rail.arrivals", false))
        .with_limit(limit(cfg.i64_or("defaults.national_rail.limit", 6)));
    if let Some(to_crs) = cfg.str_at("defaults.national_rail.to_crs") {
        options = options.with_to_crs(to_crs);
    }

    Ok(rtt::fetch_board(client, &options)?)
}

/// Fetch the Underground board using the `defaults.tube` config section.
pub fn tube_board(cfg: &Config, client: &TubeClient) -> Result<Vec<DepartureRow>, SourceError> {
    let stop_point_id = cfg.require_str("defaults.tube.stop_point_id")?;
    let limit = limit(cfg.i64_or("defaults.tube.limit", 6));

    Ok(tube::fetch_board(client, stop_point_id, limit)?)
}

/// The combine mode selected by `ui.interleave`.
pub fn combine_mode(cfg: &Config) -> CombineMode {
    if cfg.bool_or("ui.interleave", false) {
        CombineMode::Interleave
    } else {
        CombineMode::Concatenate
    }
}

fn limit(value: i64) -> usize {
    value.max(0) as usize
}
