use connectors::error::AdapterError;
use engine_config::settings::error::SettingsError;
use engine_runtime::error::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to set up the cluster client: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Reader error: {0}")]
    Session(#[from] SessionError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Read session failed: {0}")]
    SessionFailed(String),

    #[error("Shutdown requested")]
    ShutdownRequested,
}

impl CliError {
    /// Process exit status: 130 for an interrupted read, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::ShutdownRequested => 130,
            _ => 1,
        }
    }
}
