//! Conversion of TfL arrival items into common departure rows.
//!
//! The arrivals feed has shipped several shapes over the years, with
//! fields renamed between versions. Rather than branching per field,
//! every value is resolved through an ordered candidate list: the first
//! present, non-null name wins, and a literal default covers the case
//! where none match. Adding a newly renamed field is a one-line change
//! to the candidate list.

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::board::{DepartureRow, NO_PLATFORM, NO_TIME};

use super::client::TubeClient;
use super::error::TubeError;

/// Fetch live arrivals for a stop and normalize them into rows.
///
/// `SchArrival` is always the missing-time sentinel: the feed only
/// carries expected times. Stops once `limit` rows are produced.
pub fn fetch_board(
    client: &TubeClient,
    stop_point_id: &str,
    limit: usize,
) -> Result<Vec<DepartureRow>, TubeError> {
    let items = client.arrivals(stop_point_id)?;
    Ok(items_to_rows(&items, limit))
}

/// Normalize raw arrival items, independent of transport.
pub fn items_to_rows(items: &[Value], limit: usize) -> Vec<DepartureRow> {
    items
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, item)| item_to_row(item, i as u32 + 1))
        .collect()
}

fn item_to_row(item: &Value, index: u32) -> DepartureRow {
    let destination = pick_string(item, &["Destination", "destinationName"]).unwrap_or_default();
    let expected = pick_string(item, &["Expected", "expectedArrival"]).unwrap_or_default();
    let platform =
        pick_string(item, &["Platform", "platformName"]).unwrap_or_else(|| NO_PLATFORM.to_string());
    let line = pick_string(item, &["Line", "lineName", "lineId"])
        .unwrap_or_else(|| "Underground".to_string());
    let direction = pick_string(item, &["Direction", "direction"]).unwrap_or_default();
    let id =
        pick_string(item, &["Id", "id", "vehicleId"]).unwrap_or_else(|| format!("{line}-{index}"));

    DepartureRow {
        index,
        id,
        operator: "London Underground".to_string(),
        destination,
        sch_arrival: NO_TIME.to_string(),
        expt_arrival: iso_to_hhmm(&expected),
        calling_at: String::new(),
        platforms: platform,
        is_cancelled: false,
        disruption_reason: String::new(),
        display_text: format!("{line} {direction}").trim().to_string(),
    }
}

/// Resolve a field through an ordered candidate list: the first name
/// present with a non-null value wins.
fn pick<'a>(item: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| item.get(name))
        .find(|value| !value.is_null())
}

/// Like [`pick`], rendered as a string. Numbers are formatted; other
/// shapes count as absent.
fn pick_string(item: &Value, names: &[&str]) -> Option<String> {
    match pick(item, names)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Convert an ISO-8601 timestamp to local wall-clock `HH:MM`, or the
/// missing-time sentinel if absent or unparseable.
fn iso_to_hhmm(s: &str) -> String {
    if s.is_empty() {
        return NO_TIME.to_string();
    }
    match DateTime::parse_from_rfc3339(s) {
        Ok(t) => t.with_timezone(&Local).format("%H:%M").to_string(),
        Err(_) => NO_TIME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pick_takes_first_present_non_null() {
        let item = json!({"Destination": null, "destinationName": "Brixton"});
        assert_eq!(
            pick_string(&item, &["Destination", "destinationName"]),
            Some("Brixton".to_string())
        );

        let item = json!({"Destination": "Walthamstow Central"});
        assert_eq!(
            pick_string(&item, &["Destination", "destinationName"]),
            Some("Walthamstow Central".to_string())
        );

        let item = json!({"somethingElse": true});
        assert_eq!(pick_string(&item, &["Destination", "destinationName"]), None);
    }

    #[test]
    fn pick_string_formats_numbers() {
        let item = json!({"vehicleId": 214});
        assert_eq!(
            pick_string(&item, &["Id", "id", "vehicleId"]),
            Some("214".to_string())
        );
    }

    #[test]
    fn iso_timestamps_render_as_local_hhmm() {
        // Round-trip through chrono so the expectation holds in any
        // local timezone the tests run under.
        let parsed = DateTime::parse_from_rfc3339("2026-08-25T17:03:00Z").unwrap();
        let expected = parsed.with_timezone(&Local).format("%H:%M").to_string();
        assert_eq!(iso_to_hhmm("2026-08-25T17:03:00Z"), expected);

        assert_eq!(iso_to_hhmm(""), NO_TIME);
        assert_eq!(iso_to_hhmm("not a timestamp"), NO_TIME);
        assert_eq!(iso_to_hhmm("2026-08-25"), NO_TIME);
    }

    #[test]
    fn item_with_modern_field_names_maps_fully() {
        let item = json!({
            "id": "1836505603",
            "destinationName": "Brixton",
            "expectedArrival": "2026-08-25T17:03:00Z",
            "platformName": "Northbound - Platform 1",
            "lineName": "Victoria",
            "direction": "inbound",
        });

        let rows = items_to_rows(&[item], 10);
        let row = &rows[0];

        assert_eq!(row.index, 1);
        assert_eq!(row.id, "1836505603");
        assert_eq!(row.operator, "London Underground");
        assert_eq!(row.destination, "Brixton");
        assert_eq!(row.sch_arrival, NO_TIME);
        assert_ne!(row.expt_arrival, NO_TIME);
        assert_eq!(row.calling_at, "");
        assert_eq!(row.platforms, "Northbound - Platform 1");
        assert!(!row.is_cancelled);
        assert_eq!(row.display_text, "Victoria inbound");
    }

    #[test]
    fn bare_item_falls_back_to_defaults() {
        let rows = items_to_rows(&[json!({})], 10);
        let row = &rows[0];

        assert_eq!(row.destination, "");
        assert_eq!(row.expt_arrival, NO_TIME);
        assert_eq!(row.platforms, NO_PLATFORM);
        assert_eq!(row.id, "Underground-1");
        assert_eq!(row.display_text, "Underground");
    }

    #[test]
    fn limit_truncates_output() {
        let items: Vec<Value> = (0..10)
            .map(|i| json!({"lineName": "Circle", "vehicleId": i}))
            .collect();

        let rows = items_to_rows(&items, 4);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].index, 4);
        assert_eq!(rows[3].id, "3");
    }
}
