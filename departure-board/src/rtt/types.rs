//! RTT API response DTOs.
//!
//! These map directly to the RealTimeTrains JSON API. `Option` is used
//! liberally because the API omits fields rather than sending nulls in
//! many cases, and freight/ECS workings lack most passenger fields.

use serde::Deserialize;

/// Response from the location lineup search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationLineup {
    /// Services at this location. Absent on a 404 (unknown station).
    pub services: Option<Vec<LineupService>>,
}

/// One service in a station lineup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupService {
    /// Stable service identifier, e.g. "W12345".
    pub service_uid: Option<String>,

    /// ISO date the service runs, e.g. "2026-08-25".
    pub run_date: Option<String>,

    /// Operating company display name.
    pub atoc_name: Option<String>,

    /// Whether this is a passenger service (freight/ECS omit or set false).
    pub is_passenger: Option<bool>,

    /// Whether the service was cancelled in the plan of the day.
    pub planned_cancel: Option<bool>,

    /// Realtime identity, e.g. "1P20".
    pub running_identity: Option<String>,

    /// Timetabled identity; fallback when no realtime identity exists.
    pub train_identity: Option<String>,

    /// Details of the service at the searched location.
    pub location_detail: Option<LocationDetail>,
}

/// Per-location detail for a lineup service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    /// Destination(s); the first entry's description is displayed.
    pub destination: Option<Vec<LocationPair>>,

    /// Platform at the searched location.
    pub platform: Option<String>,

    /// Display mode, e.g. "CALL" or "CANCELLED_CALL".
    pub display_as: Option<String>,

    /// Public timetable departure, `HHMM`.
    pub gbtt_booked_departure: Option<String>,

    /// Realtime departure, `HHMM`.
    pub realtime_departure: Option<String>,

    /// Public timetable arrival, `HHMM`.
    pub gbtt_booked_arrival: Option<String>,

    /// Realtime arrival, `HHMM`.
    pub realtime_arrival: Option<String>,
}

/// An origin or destination entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPair {
    /// Public-facing location name.
    pub description: Option<String>,
}

/// Response from the service info endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    /// Every location in the service's itinerary, in running order.
    pub locations: Option<Vec<ServiceLocation>>,
}

/// One stop in a service itinerary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocation {
    /// CRS code of this location, if it has one.
    pub crs: Option<String>,

    /// Public-facing location name.
    pub description: Option<String>,

    /// Whether the public may board/alight here. The API has used both
    /// spellings across versions, so both are modeled.
    pub is_public_call: Option<bool>,
    pub is_call_public: Option<bool>,
}

impl ServiceLocation {
    /// Whether this is a public call, under either field spelling.
    pub fn is_public(&self) -> bool {
        self.is_public_call.unwrap_or(false) || self.is_call_public.unwrap_or(false)
    }
}
