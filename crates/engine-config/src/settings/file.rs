use crate::settings::error::SettingsError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fs, path::Path};

pub const DEFAULT_CLUSTER_URL: &str = "http://localhost:9200";

/// Raw settings as written in the JSON settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub cluster: ClusterSection,
    pub query: QuerySection,
    pub session: SessionSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterSection {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    /// Transport timeout, e.g. `"30s"`.
    pub request_timeout: Option<String>,
}

impl Default for ClusterSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_CLUSTER_URL.to_string(),
            username: None,
            password: None,
            api_key: None,
            request_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySection {
    pub indexes: Vec<String>,
    pub types: Vec<String>,
    pub query: Option<Value>,
    pub must_exist: Vec<String>,
    pub must_not_exist: Vec<String>,
    pub batch_size: Option<i64>,
    pub scroll_timeout: Option<String>,
    pub random: bool,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSection {
    pub buffer_capacity: Option<usize>,
    pub shutdown_grace: Option<String>,
    pub poll_interval: Option<String>,
}

impl SettingsFile {
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(raw)?)
    }
}
