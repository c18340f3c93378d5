//! Configuration pipeline.
//!
//! The effective config is composed fresh on every invocation from up to
//! three layers, deep-merged pairwise in this fixed order:
//!
//! 1. the local YAML file,
//! 2. an overlay built from recognized environment variables,
//! 3. optional remote overrides fetched over HTTP.
//!
//! Later layers win ties. The remote layer is best-effort and never
//! blocks startup. No schema is enforced up front: missing required keys
//! surface as [`ConfigError::MissingKey`] at the point of use.

mod env;
mod error;
mod merge;
mod remote;

pub use env::{env_bool, env_int, overlay_from, overlay_from_env};
pub use error::ConfigError;
pub use merge::deep_merge;
pub use remote::{RemoteConfig, RemoteOptions};

use std::path::Path;
use std::time::Duration;

use serde_yaml::{Mapping, Value};
use tracing::warn;

/// An immutable config document: a nested mapping of string keys to
/// scalars, mappings, or sequences.
///
/// Accessors take dotted paths (`"defaults.national_rail.crs"`). The
/// `require_*` variants are for keys the caller cannot proceed without;
/// the `*_or` variants fall back to a default for optional tuning knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct Config(Value);

impl Config {
    /// Wrap an already-parsed document.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// An empty config.
    pub fn empty() -> Self {
        Self(Value::Mapping(Mapping::new()))
    }

    /// The underlying document, for merging.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn at(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.0, |value, key| value.get(key))
    }

    /// String at `path`, if present and a string.
    pub fn str_at(&self, path: &str) -> Option<&str> {
        self.at(path).and_then(Value::as_str)
    }

    /// String at `path`, or a lookup failure. Explicit null counts as
    /// missing (the `NR_TO_CRS=""` convention produces nulls).
    pub fn require_str(&self, path: &str) -> Result<&str, ConfigError> {
        match self.at(path) {
            None | Some(Value::Null) => Err(ConfigError::MissingKey(path.to_string())),
            Some(value) => value.as_str().ok_or_else(|| ConfigError::WrongType {
                key: path.to_string(),
                expected: "string",
            }),
        }
    }

    /// Boolean at `path`, or the default when absent or not a boolean.
    pub fn bool_or(&self, path: &str, default: bool) -> bool {
        self.at(path).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Integer at `path`, or the default when absent or not an integer.
    pub fn i64_or(&self, path: &str, default: i64) -> i64 {
        self.at(path).and_then(Value::as_i64).unwrap_or(default)
    }
}

/// Load and parse a config file.
///
/// An empty document (or one holding only comments) yields an empty
/// mapping. An unreadable file is a hard error; so is a document whose
/// top level is something other than a mapping.
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text)
}

fn parse_document(text: &str) -> Result<Config, ConfigError> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    match value {
        Value::Null => Ok(Config::empty()),
        Value::Mapping(_) => Ok(Config::new(value)),
        _ => Err(ConfigError::Parse("top level is not a mapping".to_string())),
    }
}

/// Run the full pipeline: file, then environment overlay, then remote
/// overrides if enabled.
///
/// Returns the merged config alongside the remote fetcher (when remote
/// config is enabled and usable) so the caller can re-check for
/// overrides on later refresh cycles through its TTL cache.
pub fn load_with_overrides(
    path: impl AsRef<Path>,
) -> Result<(Config, Option<RemoteConfig>), ConfigError> {
    load_with_overlay(path, overlay_from_env())
}

fn load_with_overlay(
    path: impl AsRef<Path>,
    env_overlay: Value,
) -> Result<(Config, Option<RemoteConfig>), ConfigError> {
    let base = load(path)?;
    let merged = Config::new(deep_merge(base.as_value(), &env_overlay));

    if !merged.bool_or("remote.enabled", false) {
        return Ok((merged, None));
    }

    let Some(url) = merged.str_at("remote.url") else {
        warn!("remote config enabled but remote.url is not set; skipping");
        return Ok((merged, None));
    };

    let options = RemoteOptions {
        url: url.to_string(),
        timeout: seconds(merged.i64_or("remote.timeout_seconds", 5)),
        cache_ttl: seconds(merged.i64_or("remote.cache_ttl_seconds", 60)),
    };

    let remote = match RemoteConfig::new(&options) {
        Ok(remote) => remote,
        Err(e) => {
            warn!(error = %e, "cannot build remote config client; skipping");
            return Ok((merged, None));
        }
    };

    // Startup always does a live fetch; the TTL cache only covers
    // periodic re-checks afterwards.
    let merged = match remote.fetch(true) {
        Some(overrides) => Config::new(deep_merge(merged.as_value(), &overrides)),
        None => merged,
    };

    Ok((merged, Some(remote)))
}

fn seconds(value: i64) -> Duration {
    Duration::from_secs(value.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn loads_a_mapping() {
        let file = config_file("rtt:\n  username: alice\n");
        let cfg = load(file.path()).unwrap();
        assert_eq!(cfg.str_at("rtt.username"), Some("alice"));
    }

    #[test]
    fn empty_document_is_an_empty_mapping() {
        let file = config_file("");
        assert_eq!(load(file.path()).unwrap(), Config::empty());

        let file = config_file("# only comments\n");
        assert_eq!(load(file.path()).unwrap(), Config::empty());
    }

    #[test]
    fn unreadable_file_is_a_hard_error() {
        let err = load("/definitely/not/here/config.yml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn non_mapping_top_level_is_a_parse_error() {
        let file = config_file("- a\n- b\n");
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn require_str_distinguishes_missing_null_and_wrong_type() {
        let file = config_file("defaults:\n  national_rail:\n    to_crs: null\n    limit: 6\n");
        let cfg = load(file.path()).unwrap();

        assert!(matches!(
            cfg.require_str("defaults.national_rail.crs"),
            Err(ConfigError::MissingKey(_))
        ));
        assert!(matches!(
            cfg.require_str("defaults.national_rail.to_crs"),
            Err(ConfigError::MissingKey(_))
        ));
        assert!(matches!(
            cfg.require_str("defaults.national_rail.limit"),
            Err(ConfigError::WrongType { .. })
        ));
    }

    #[test]
    fn defaults_apply_for_absent_scalars() {
        let cfg = Config::empty();
        assert!(!cfg.bool_or("ui.interleave", false));
        assert_eq!(cfg.i64_or("defaults.tube.limit", 6), 6);
    }

    #[test]
    fn env_overlay_wins_over_file() {
        let file = config_file("rtt:\n  username: from-file\n  password: secret\n");
        let overlay = overlay_from(|key| {
            (key == "RTT_USERNAME").then(|| "from-env".to_string())
        });

        let (cfg, remote) = load_with_overlay(file.path(), overlay).unwrap();

        assert_eq!(cfg.str_at("rtt.username"), Some("from-env"));
        assert_eq!(cfg.str_at("rtt.password"), Some("secret"));
        assert!(remote.is_none());
    }

    #[test]
    fn remote_overrides_win_over_file_and_env() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/overrides.yml")
            .with_status(200)
            .with_body("ui:\n  font_size: 30\n")
            .create();

        let file = config_file(&format!(
            "ui:\n  font_size: 22\nremote:\n  enabled: true\n  url: {}/overrides.yml\n",
            server.url()
        ));
        let overlay = overlay_from(|key| {
            (key == "FONT_SIZE").then(|| "18".to_string())
        });

        let (cfg, remote) = load_with_overlay(file.path(), overlay).unwrap();

        assert_eq!(cfg.i64_or("ui.font_size", 0), 30);
        assert!(remote.is_some());
    }

    #[test]
    fn remote_failure_leaves_merged_config_unchanged() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/overrides.yml")
            .with_status(503)
            .create();

        let body = format!(
            "ui:\n  font_size: 22\nremote:\n  enabled: true\n  url: {}/overrides.yml\n",
            server.url()
        );
        let file = config_file(&body);

        let (with_remote, _) =
            load_with_overlay(file.path(), overlay_from(no_env)).unwrap();

        // Same file with remote disabled: the configs must be identical
        // apart from the `remote.enabled` flag itself.
        let disabled = config_file(&body.replace("enabled: true", "enabled: false"));
        let (without_remote, _) =
            load_with_overlay(disabled.path(), overlay_from(no_env)).unwrap();

        assert_eq!(with_remote.i64_or("ui.font_size", 0), 22);
        assert_eq!(
            with_remote.i64_or("ui.font_size", 0),
            without_remote.i64_or("ui.font_size", 0)
        );
    }

    #[test]
    fn remote_disabled_by_default() {
        let file = config_file("remote:\n  url: http://127.0.0.1:9/x\n");
        let (_, remote) = load_with_overlay(file.path(), overlay_from(no_env)).unwrap();
        assert!(remote.is_none());
    }

    #[test]
    fn remote_enabled_without_url_is_skipped() {
        let file = config_file("remote:\n  enabled: true\n");
        let (cfg, remote) = load_with_overlay(file.path(), overlay_from(no_env)).unwrap();
        assert!(remote.is_none());
        assert!(cfg.bool_or("remote.enabled", false));
    }
}
