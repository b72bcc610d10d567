use crate::settings::{
    error::SettingsError,
    file::{ClusterSection, QuerySection, SessionSection, SettingsFile},
    validated::{SessionConfig, ValidatedSettings},
};
use connectors::elasticsearch::{Auth, ElasticsearchConfig};
use planner::query::{duration::parse_duration, spec::QuerySpec};
use std::time::Duration;
use tracing::{info, warn};

/// Turns raw settings into a `ValidatedSettings`.
pub struct SettingsValidator {
    file: SettingsFile,
}

impl SettingsValidator {
    pub fn new(file: SettingsFile) -> Self {
        Self { file }
    }

    pub fn validate(self) -> Result<ValidatedSettings, SettingsError> {
        let SettingsFile {
            cluster,
            query,
            session,
        } = self.file;

        let cluster = Self::validate_cluster(cluster)?;
        let spec = Self::validate_query(query)?;
        let session = Self::validate_session(session)?;

        info!(
            url = %cluster.url,
            indexes = ?spec.indexes(),
            batch_size = spec.batch_size(),
            limit = spec.limit(),
            buffer_capacity = session.buffer_capacity,
            "Settings validation completed."
        );

        Ok(ValidatedSettings {
            cluster,
            spec,
            session,
        })
    }

    fn validate_cluster(cluster: ClusterSection) -> Result<ElasticsearchConfig, SettingsError> {
        let url = cluster.url.trim();
        if url.is_empty() {
            return Err(SettingsError::InvalidValue {
                field: "cluster.url",
                reason: "must not be empty".to_string(),
            });
        }

        let auth = match (cluster.api_key, cluster.username) {
            (Some(api_key), username) => {
                if username.is_some() {
                    warn!("Both an API key and a username are configured. Using the API key.");
                }
                Auth::ApiKey(api_key)
            }
            (None, Some(username)) => Auth::Basic {
                username,
                password: cluster.password,
            },
            (None, None) => {
                if cluster.password.is_some() {
                    warn!("Cluster password given without a username. Ignoring it.");
                }
                Auth::None
            }
        };

        let mut config = ElasticsearchConfig::new(url).with_auth(auth);
        if let Some(raw) = cluster.request_timeout {
            config = config.with_request_timeout(duration("cluster.request_timeout", &raw)?);
        }
        Ok(config)
    }

    fn validate_query(query: QuerySection) -> Result<QuerySpec, SettingsError> {
        let mut builder = QuerySpec::builder()
            .indexes(query.indexes)
            .types(query.types)
            .must_exist(query.must_exist)
            .must_not_exist(query.must_not_exist)
            .random(query.random);

        if let Some(q) = query.query {
            builder = builder.query(q);
        }
        if let Some(size) = query.batch_size {
            builder = builder.batch_size(size);
        }
        if let Some(timeout) = query.scroll_timeout {
            builder = builder.scroll_timeout(&timeout);
        }
        if let Some(limit) = query.limit {
            builder = builder.limit(limit);
        }

        Ok(builder.build()?)
    }

    fn validate_session(session: SessionSection) -> Result<SessionConfig, SettingsError> {
        let mut config = SessionConfig::default();

        if let Some(capacity) = session.buffer_capacity {
            if capacity == 0 {
                return Err(SettingsError::InvalidValue {
                    field: "session.buffer_capacity",
                    reason: "must be at least 1".to_string(),
                });
            }
            config.buffer_capacity = capacity;
        }
        if let Some(raw) = session.shutdown_grace {
            config.shutdown_grace = duration("session.shutdown_grace", &raw)?;
        }
        if let Some(raw) = session.poll_interval {
            config.poll_interval = duration("session.poll_interval", &raw)?;
        }

        Ok(config)
    }
}

fn duration(field: &'static str, raw: &str) -> Result<Duration, SettingsError> {
    parse_duration(raw).ok_or_else(|| SettingsError::InvalidDuration {
        field,
        value: raw.to_string(),
    })
}
