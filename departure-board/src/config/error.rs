//! Config pipeline error types.

use std::path::PathBuf;

/// Errors from loading or interrogating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be opened or read at all.
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was not valid YAML, or its top level was not a mapping.
    #[error("cannot parse config: {0}")]
    Parse(String),

    /// A required key was absent at the point of use.
    #[error("missing config key: {0}")]
    MissingKey(String),

    /// A key was present but held the wrong kind of value.
    #[error("config key {key} is not a {expected}")]
    WrongType { key: String, expected: &'static str },
}
