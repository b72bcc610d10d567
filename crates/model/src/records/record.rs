use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded record, ready to be handed to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub collection: String,

    /// Position of the record in the session's delivery order, starting at 0.
    pub sequence: u64,

    pub document: Value,
    pub ts: DateTime<Utc>,
}

impl Record {
    pub fn new(id: &str, collection: &str, document: Value) -> Self {
        Record {
            id: id.to_string(),
            collection: collection.to_string(),
            sequence: 0,
            document,
            ts: Utc::now(),
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.document.get(field)
    }
}
