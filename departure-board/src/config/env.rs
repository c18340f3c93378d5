//! Environment overlay for the config pipeline.
//!
//! Builds a sparse partial config from a fixed set of recognized
//! environment variables (the `.env` surface when running in Docker).
//! Only keys whose variable is actually present land in the overlay, so
//! an unset variable never overrides the file config. The overlay uses
//! the same nested section shape as the config document and is applied
//! with [`deep_merge`](super::merge::deep_merge).

use serde_yaml::{Mapping, Value};

/// Untyped passthrough variables, copied verbatim into the `extras`
/// section for features outside the core (scroll speed, animations,
/// header text and friends). The core never interprets these.
const EXTRA_VARS: &[(&str, &str)] = &[
    ("TIME_FORMAT", "time_format"),
    ("SPEED", "speed"),
    ("DELAY", "delay"),
    ("RECOVERY_TIME", "recovery_time"),
    ("NUMBER_OF_CARDS", "number_of_cards"),
    ("ROTATION", "rotation"),
    ("REQUEST_LIMIT", "request_limit"),
    ("STATIC_UPDATE_LIMIT", "static_update_limit"),
    ("ENERGY_SAVING_MODE", "energy_saving_mode"),
    ("INACTIVE_HOURS", "inactive_hours"),
    ("UPDATE_DAYS", "update_days"),
    ("EXCLUDED_PLATFORMS", "excluded_platforms"),
    ("HEADER", "header"),
    ("HEADER_ALIGNMENT", "header_alignment"),
    ("DESIGN", "design"),
    ("SHOW_CALLING_AT_FOR_DIRECT", "show_calling_at_for_direct"),
    ("HIDE_PLATFORM", "hide_platform"),
    ("SHOW_INDEX", "show_index"),
    ("REDUCED_ANIMATIONS", "reduced_animations"),
    ("FIX_NEXT_TO_ARRIVE", "fix_next_to_arrive"),
    ("NO_SPLASHSCREEN", "no_splashscreen"),
    ("EXCLUDE_LINES", "exclude_lines"),
    ("DIRECTION", "direction"),
    ("WARNING_TIME", "warning_time"),
    ("INCREASED_ANIMATIONS", "increased_animations"),
    ("DISPLAY", "display"),
    ("MAX_FRAMES", "max_frames"),
    ("NO_PIP_UPDATE", "no_pip_update"),
];

/// Interpret an environment string as a boolean.
///
/// Accepts `1`, `true`, `yes`, `y`, `on` (case-insensitive) as true and
/// anything else as false. The default applies only when the value is
/// absent or empty.
pub fn env_bool(raw: Option<&str>, default: bool) -> bool {
    match raw {
        None | Some("") => default,
        Some(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        ),
    }
}

/// Interpret an environment string as a base-10 integer, falling back to
/// the default when absent, empty, or unparseable.
pub fn env_int(raw: Option<&str>, default: i64) -> i64 {
    match raw {
        None | Some("") => default,
        Some(s) => s.trim().parse().unwrap_or(default),
    }
}

/// Build the overlay from the process environment.
pub fn overlay_from_env() -> Value {
    overlay_from(|key| std::env::var(key).ok())
}

/// Build the overlay from an arbitrary lookup function.
///
/// The lookup distinguishes "present but empty" (`Some("")`) from
/// "unset" (`None`); some keys care about that difference.
pub fn overlay_from(get: impl Fn(&str) -> Option<String>) -> Value {
    let mut overlay = Mapping::new();

    // RTT credentials/endpoint.
    let mut rtt = Mapping::new();
    set_nonempty_str(&mut rtt, "base_url", get("RTT_BASE_URL"));
    set_nonempty_str(&mut rtt, "username", get("RTT_USERNAME"));
    set_nonempty_str(&mut rtt, "password", get("RTT_PASSWORD"));
    set_section(&mut overlay, "rtt", rtt);

    // TfL credentials.
    let mut tfl = Mapping::new();
    set_nonempty_str(&mut tfl, "app_id", get("TFL_APP_ID"));
    set_nonempty_str(&mut tfl, "app_key", get("TFL_APP_KEY"));
    set_section(&mut overlay, "tfl", tfl);

    // National Rail defaults.
    let mut nr = Mapping::new();
    set_nonempty_str(&mut nr, "crs", get("NR_CRS"));
    // Present-but-empty explicitly clears the destination filter, which
    // is different from leaving any file-configured filter in place.
    if let Some(val) = get("NR_TO_CRS") {
        let value = if val.is_empty() { Value::Null } else { Value::from(val) };
        set(&mut nr, "to_crs", value);
    }
    if let Some(val) = get("NR_ARRIVALS") {
        set(&mut nr, "arrivals", Value::Bool(env_bool(Some(&val), false)));
    }
    if let Some(val) = get("NR_LIMIT") {
        set(&mut nr, "limit", Value::from(env_int(Some(&val), 6)));
    }

    // Tube defaults.
    let mut tube = Mapping::new();
    set_nonempty_str(&mut tube, "stop_point_id", get("TUBE_STOPPOINT"));
    if let Some(val) = get("TUBE_LIMIT") {
        set(&mut tube, "limit", Value::from(env_int(Some(&val), 6)));
    }

    if !nr.is_empty() || !tube.is_empty() {
        let mut defaults = Mapping::new();
        set_section(&mut defaults, "national_rail", nr);
        set_section(&mut defaults, "tube", tube);
        set_section(&mut overlay, "defaults", defaults);
    }

    // UI options.
    let mut ui = Mapping::new();
    set_nonempty_str(&mut ui, "font_path", get("FONT_PATH"));
    if let Some(val) = get("FONT_BOLD_PATH") {
        let value = if val.is_empty() { Value::Null } else { Value::from(val) };
        set(&mut ui, "font_bold_path", value);
    }
    if let Some(val) = get("FONT_SIZE") {
        set(&mut ui, "font_size", Value::from(env_int(Some(&val), 22)));
    }
    if let Some(val) = get("LINE_HEIGHT") {
        set(&mut ui, "line_height", Value::from(env_int(Some(&val), 24)));
    }
    if let Some(val) = get("LEFT_MARGIN") {
        set(&mut ui, "left_margin", Value::from(env_int(Some(&val), 4)));
    }
    if let Some(val) = get("INTERLEAVE") {
        set(&mut ui, "interleave", Value::Bool(env_bool(Some(&val), false)));
    }
    set_section(&mut overlay, "ui", ui);

    // Remote config fetch.
    let mut remote = Mapping::new();
    if let Some(val) = get("REMOTE_ENABLED") {
        set(&mut remote, "enabled", Value::Bool(env_bool(Some(&val), true)));
    }
    set_nonempty_str(&mut remote, "url", get("REMOTE_URL"));
    if let Some(val) = get("REMOTE_TIMEOUT_SECONDS") {
        set(&mut remote, "timeout_seconds", Value::from(env_int(Some(&val), 5)));
    }
    if let Some(val) = get("REMOTE_CACHE_TTL_SECONDS") {
        set(&mut remote, "cache_ttl_seconds", Value::from(env_int(Some(&val), 60)));
    }
    set_section(&mut overlay, "remote", remote);

    // Untyped passthrough.
    let mut extras = Mapping::new();
    for (var, key) in EXTRA_VARS {
        if let Some(val) = get(var) {
            set(&mut extras, key, Value::from(val));
        }
    }
    set_section(&mut overlay, "extras", extras);

    Value::Mapping(overlay)
}

fn set(map: &mut Mapping, key: &str, value: Value) {
    map.insert(Value::from(key), value);
}

/// Set a string key only when the variable is present and non-empty.
fn set_nonempty_str(map: &mut Mapping, key: &str, raw: Option<String>) {
    if let Some(val) = raw
        && !val.is_empty()
    {
        set(map, key, Value::from(val));
    }
}

/// Attach a section only if it picked up at least one key.
fn set_section(map: &mut Mapping, key: &str, section: Mapping) {
    if !section.is_empty() {
        set(map, key, Value::Mapping(section));
    }
}
