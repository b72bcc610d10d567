use thiserror::Error;

/// Misuse of the reader facade.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The call is not valid in the reader's current state.
    #[error("Invalid reader state: {0}")]
    InvalidState(String),

    /// `start` was called outside of a tokio runtime.
    #[error("No tokio runtime available to run the fetch worker")]
    NoRuntime,
}
