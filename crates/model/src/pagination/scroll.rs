use crate::{
    query::{filter::Filter, order::HitOrder},
    records::hit::Hit,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, time::Duration};

/// Opaque handle of a server-side scroll context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrollId(String);

impl ScrollId {
    pub fn new(id: impl Into<String>) -> Self {
        ScrollId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScrollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Scroll ids are long base64 blobs; the prefix is enough for logs.
        let end = self
            .0
            .char_indices()
            .nth(16)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        if end < self.0.len() {
            write!(f, "{}…", &self.0[..end])
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Everything the cluster needs to open a scroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub indexes: Vec<String>,

    /// Empty means every type.
    pub types: Vec<String>,

    pub query: Option<Value>,
    pub filter: Option<Filter>,

    /// Hits per batch.
    pub size: usize,

    /// How long the cluster keeps the scroll context alive between calls.
    pub keep_alive: Duration,

    pub order: HitOrder,
}

/// One batch of hits returned by an open or continue scroll call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPage {
    pub scroll_id: Option<ScrollId>,
    pub hits: Vec<Hit>,
    pub total_hits: u64,
}

impl ScrollPage {
    pub fn new(scroll_id: Option<ScrollId>, hits: Vec<Hit>, total_hits: u64) -> Self {
        ScrollPage {
            scroll_id,
            hits,
            total_hits,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
