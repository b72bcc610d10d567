use engine_config::settings::validated::SessionConfig;
use std::time::Duration;

/// Tuning of a single reader session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    pub buffer_capacity: usize,
    pub shutdown_grace: Duration,
}

impl ReaderOptions {
    pub fn from_settings(session: &SessionConfig) -> Self {
        Self {
            buffer_capacity: session.buffer_capacity,
            shutdown_grace: session.shutdown_grace,
        }
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self::from_settings(&SessionConfig::default())
    }
}
