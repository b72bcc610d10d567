use planner::error::ConfigError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating reader settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file is not valid JSON or has unexpected fields.
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A duration value could not be parsed.
    #[error("Invalid duration for '{field}': {value}")]
    InvalidDuration { field: &'static str, value: String },

    /// A value is out of its accepted range.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// The query section does not describe a valid query.
    #[error("Invalid query settings: {0}")]
    Query(#[from] ConfigError),
}
