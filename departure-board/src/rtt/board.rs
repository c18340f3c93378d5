//! Conversion of RTT lineups into common departure rows.
//!
//! This is the National Rail half of the board: query the station
//! lineup, normalize each service into a [`DepartureRow`], and
//! optionally enrich rows with their calling pattern via a second
//! per-service lookup. Enrichment is strictly best-effort; a failed
//! lookup yields an empty `CallingAt`, never a failed row.

use chrono::NaiveDate;
use tracing::debug;

use crate::board::{DepartureRow, NO_PLATFORM, NO_TIME};

use super::client::{LineupQuery, RttClient};
use super::error::RttError;
use super::types::{LineupService, LocationDetail, ServiceInfo};

/// Calling patterns are capped at this many stop names.
const MAX_CALLING_AT: usize = 20;

/// Options for building a National Rail board.
#[derive(Debug, Clone)]
pub struct BoardOptions {
    /// Station to show the board for.
    pub crs: String,
    /// Only show services calling at this station afterwards.
    pub to_crs: Option<String>,
    /// Show arrivals rather than departures.
    pub arrivals: bool,
    /// Maximum number of rows to produce.
    pub limit: usize,
    /// Whether to look up the calling pattern for each row.
    pub include_calling_at: bool,
    /// Skip services not flagged as passenger services.
    pub passenger_only: bool,
}

impl BoardOptions {
    /// Departure board for a station, with the usual defaults.
    pub fn new(crs: impl Into<String>) -> Self {
        Self {
            crs: crs.into(),
            to_crs: None,
            arrivals: false,
            limit: 12,
            include_calling_at: true,
            passenger_only: true,
        }
    }

    /// Filter to services calling at a destination.
    pub fn with_to_crs(mut self, to_crs: impl Into<String>) -> Self {
        self.to_crs = Some(to_crs.into());
        self
    }

    /// Switch to the arrivals lineup.
    pub fn with_arrivals(mut self, arrivals: bool) -> Self {
        self.arrivals = arrivals;
        self
    }

    /// Set the row limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Toggle the per-service calling pattern lookup.
    pub fn with_calling_at(mut self, include: bool) -> Self {
        self.include_calling_at = include;
        self
    }

    /// Include non-passenger workings (freight, ECS).
    pub fn with_passenger_only(mut self, passenger_only: bool) -> Self {
        self.passenger_only = passenger_only;
        self
    }
}

/// Fetch the station lineup and normalize it into departure rows.
///
/// Rows are emitted in lineup order with a provisional 1-based index.
/// Production stops as soon as `limit` rows exist: services past the
/// limit are never enrichment-queried.
pub fn fetch_board(client: &RttClient, options: &BoardOptions) -> Result<Vec<DepartureRow>, RttError> {
    let query = LineupQuery {
        to_station: options.to_crs.clone(),
        arrivals: options.arrivals,
        ..LineupQuery::default()
    };
    let lineup = client.location_lineup(&options.crs, &query)?;
    let services = lineup.services.unwrap_or_default();

    let mut rows = Vec::new();
    for service in &services {
        if rows.len() >= options.limit {
            break;
        }
        if options.passenger_only && !service.is_passenger.unwrap_or(false) {
            continue;
        }
        rows.push(service_to_row(client, service, options, rows.len() as u32 + 1));
    }

    Ok(rows)
}

fn service_to_row(
    client: &RttClient,
    service: &LineupService,
    options: &BoardOptions,
    index: u32,
) -> DepartureRow {
    let detail = service.location_detail.clone().unwrap_or_default();

    let destination = first_destination(&detail);
    let operator = service
        .atoc_name
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());
    let platform = detail
        .platform
        .clone()
        .unwrap_or_else(|| NO_PLATFORM.to_string());

    let display_as = detail.display_as.as_deref().unwrap_or("").to_uppercase();
    let is_cancelled =
        service.planned_cancel.unwrap_or(false) || display_as.starts_with("CANCELLED");

    let (booked, realtime) = if options.arrivals {
        (&detail.gbtt_booked_arrival, &detail.realtime_arrival)
    } else {
        (&detail.gbtt_booked_departure, &detail.realtime_departure)
    };
    let sch = match booked {
        Some(t) => format_hhmm(t),
        None => NO_TIME.to_string(),
    };
    let expt = match realtime {
        Some(t) => format_hhmm(t),
        None => sch.clone(),
    };

    let calling_at = if options.include_calling_at {
        enrich_calling_at(client, service, &options.crs, options.arrivals)
    } else {
        String::new()
    };

    let uid = service.service_uid.as_deref().unwrap_or("");
    let run_date = service.run_date.as_deref().unwrap_or("");

    DepartureRow {
        index,
        id: format!("{uid}-{run_date}"),
        operator,
        destination,
        sch_arrival: sch,
        expt_arrival: expt,
        calling_at,
        platforms: platform,
        is_cancelled,
        disruption_reason: String::new(),
        display_text: service
            .running_identity
            .clone()
            .or_else(|| service.train_identity.clone())
            .unwrap_or_default(),
    }
}

/// First listed destination's description, or empty.
fn first_destination(detail: &LocationDetail) -> String {
    detail
        .destination
        .as_deref()
        .and_then(|destinations| destinations.first())
        .and_then(|pair| pair.description.clone())
        .unwrap_or_default()
}

/// Best-effort calling pattern lookup. Every failure path (missing
/// identifying fields, bad run date, request failure) collapses to an
/// empty string.
fn enrich_calling_at(
    client: &RttClient,
    service: &LineupService,
    station_crs: &str,
    arrivals: bool,
) -> String {
    let (Some(uid), Some(run_date)) = (&service.service_uid, &service.run_date) else {
        return String::new();
    };
    let Ok(date) = NaiveDate::parse_from_str(run_date, "%Y-%m-%d") else {
        debug!(uid, run_date, "unparseable run date; skipping calling pattern");
        return String::new();
    };

    match client.service_info(uid, date) {
        Ok(info) => calling_at_station(&info, station_crs, arrivals),
        Err(e) => {
            debug!(uid, error = %e, "calling pattern lookup failed");
            String::new()
        }
    }
}

/// Names of the public calls strictly before (arrivals) or after
/// (departures) the given station, capped and comma-joined.
fn calling_at_station(info: &ServiceInfo, station_crs: &str, arrivals: bool) -> String {
    let locations = match &info.locations {
        Some(locations) => locations.as_slice(),
        None => return String::new(),
    };

    let Some(position) = locations
        .iter()
        .position(|l| l.crs.as_deref() == Some(station_crs))
    else {
        return String::new();
    };

    let slice = if arrivals {
        &locations[..position]
    } else {
        &locations[position + 1..]
    };

    let names: Vec<&str> = slice
        .iter()
        .filter(|l| l.is_public())
        .filter_map(|l| l.description.as_deref())
        .take(MAX_CALLING_AT)
        .collect();

    names.join(", ")
}

/// Format a 4-digit `HHMM` string as `HH:MM`; anything else is `--:--`.
fn format_hhmm(s: &str) -> String {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}:{}", &s[..2], &s[2..])
    } else {
        NO_TIME.to_string()
    }
}
