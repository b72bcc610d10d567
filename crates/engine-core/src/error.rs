use connectors::error::AdapterError;
use thiserror::Error;

/// Failure of the scroll protocol itself. Fatal to the read session.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Failed to open scroll over {indexes:?}: {source}")]
    Open {
        indexes: Vec<String>,
        #[source]
        source: AdapterError,
    },

    #[error("Failed to continue scroll after {delivered} records: {source}")]
    Continue {
        delivered: u64,
        #[source]
        source: AdapterError,
    },

    #[error("Cluster returned hits without a scroll id")]
    MissingScrollId,
}
