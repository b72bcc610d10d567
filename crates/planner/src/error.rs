use thiserror::Error;

/// Invalid query values caught while building a `QuerySpec`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No index was given to read from.
    #[error("At least one index must be specified")]
    NoIndexes,

    /// An index or type name was empty or blank.
    #[error("Blank {kind} name")]
    BlankName { kind: &'static str },

    /// A filter field name was empty or blank.
    #[error("Blank field name in '{list}' filter list")]
    BlankField { list: &'static str },

    /// The structured query was not a JSON object.
    #[error("Query must be a JSON object, got: {0}")]
    InvalidQuery(String),
}
