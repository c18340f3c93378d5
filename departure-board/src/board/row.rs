//! The common departure row.
//!
//! Both adapters normalize into this one shape. The renderer and the
//! merge logic rely on every field being populated, whichever source a
//! row came from, so neither adapter is allowed to leave a field unset.

use serde::Serialize;

/// Sentinel rendered when a time is missing or unparseable.
pub const NO_TIME: &str = "--:--";

/// Sentinel rendered when no platform is known.
pub const NO_PLATFORM: &str = "-";

/// One line on the departure board, normalized from either source.
///
/// Serialized field names are the canonical board keys consumed by
/// downstream renderers, so they keep their historical capitalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureRow {
    /// 1-based position on the board. Reassigned after merging, so the
    /// value an adapter sets here is provisional.
    #[serde(rename = "Index")]
    pub index: u32,

    /// Stable identifier for the service or vehicle.
    #[serde(rename = "ID")]
    pub id: String,

    /// Display name of the operating company.
    #[serde(rename = "Operator")]
    pub operator: String,

    /// Destination name.
    #[serde(rename = "Destination")]
    pub destination: String,

    /// Scheduled time as `HH:MM`, or `--:--` if unknown.
    #[serde(rename = "SchArrival")]
    pub sch_arrival: String,

    /// Expected (realtime) time as `HH:MM`, or `--:--` if unknown.
    #[serde(rename = "ExptArrival")]
    pub expt_arrival: String,

    /// Comma-joined intermediate public stops. May be empty.
    #[serde(rename = "CallingAt")]
    pub calling_at: String,

    /// Platform name, or `-` if unknown.
    #[serde(rename = "Platforms")]
    pub platforms: String,

    /// Whether the service is cancelled.
    #[serde(rename = "IsCancelled")]
    pub is_cancelled: bool,

    /// Reason for disruption. Currently always empty; neither upstream
    /// feed exposes one in the fields we read.
    #[serde(rename = "DisruptionReason")]
    pub disruption_reason: String,

    /// Short identity label: train headcode, or line name and direction.
    #[serde(rename = "DisplayText")]
    pub display_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_canonical_field_names() {
        let row = DepartureRow {
            index: 1,
            id: "W12345-2026-08-25".to_string(),
            operator: "Greater Anglia".to_string(),
            destination: "London Liverpool Street".to_string(),
            sch_arrival: "08:05".to_string(),
            expt_arrival: "08:07".to_string(),
            calling_at: "Ipswich, Colchester".to_string(),
            platforms: "2".to_string(),
            is_cancelled: false,
            disruption_reason: String::new(),
            display_text: "1P20".to_string(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Index"], 1);
        assert_eq!(json["ID"], "W12345-2026-08-25");
        assert_eq!(json["Operator"], "Greater Anglia");
        assert_eq!(json["SchArrival"], "08:05");
        assert_eq!(json["ExptArrival"], "08:07");
        assert_eq!(json["CallingAt"], "Ipswich, Colchester");
        assert_eq!(json["Platforms"], "2");
        assert_eq!(json["IsCancelled"], false);
        assert_eq!(json["DisruptionReason"], "");
        assert_eq!(json["DisplayText"], "1P20");
    }
}
