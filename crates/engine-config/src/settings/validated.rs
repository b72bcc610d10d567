use connectors::elasticsearch::ElasticsearchConfig;
use engine_processing::buffer::DEFAULT_BUFFER_CAPACITY;
use planner::query::spec::QuerySpec;
use std::time::Duration;

pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Session tuning shared by the reader facade and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of records held between drains.
    pub buffer_capacity: usize,
    /// How long `stop` waits for the worker before aborting it.
    pub shutdown_grace: Duration,
    /// Pause between drains when the buffer came back empty.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Immutable, validated configuration for one read session.
#[derive(Debug, Clone)]
pub struct ValidatedSettings {
    pub cluster: ElasticsearchConfig,
    pub spec: QuerySpec,
    pub session: SessionConfig,
}

impl ValidatedSettings {
    pub fn cluster(&self) -> &ElasticsearchConfig {
        &self.cluster
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn session(&self) -> SessionConfig {
        self.session
    }
}
