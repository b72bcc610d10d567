use thiserror::Error;

/// A single hit could not be turned into a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Hit '{id}' has no source document")]
    MissingSource { id: String },

    #[error("Hit '{id}' source is not a JSON object")]
    NotAnObject { id: String },

    #[error("Failed to decode hit '{id}': {message}")]
    Invalid { id: String, message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("The record buffer is closed")]
    Closed,
}
