use serde::Serialize;
use std::fmt;

/// Lifecycle of a read session as published by the fetch worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    /// Not started yet.
    Idle,
    Running,
    /// Every available hit, or the configured limit, has been read.
    Exhausted,
    /// The scroll protocol failed; no further records will be produced.
    Failed(String),
    /// Stopped on request before the scroll finished.
    Stopped,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Exhausted | SessionStatus::Failed(_) | SessionStatus::Stopped
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SessionStatus::Failed(_))
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => f.write_str("Idle"),
            SessionStatus::Running => f.write_str("Running"),
            SessionStatus::Exhausted => f.write_str("Exhausted"),
            SessionStatus::Failed(reason) => write!(f, "Failed: {reason}"),
            SessionStatus::Stopped => f.write_str("Stopped"),
        }
    }
}
