use crate::error::AdapterError;
use model::{
    pagination::scroll::{ScrollId, ScrollPage},
    records::hit::Hit,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "_scroll_id", default)]
    scroll_id: Option<String>,
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<Hit>,
}

/// Older clusters report a bare number, newer ones `{ "value": n, "relation": .. }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) | TotalHits::Object { value: n } => *n,
        }
    }
}

/// Parses a search or scroll response body into a page.
pub fn parse_scroll_page(body: &[u8]) -> Result<ScrollPage, AdapterError> {
    let response: SearchResponse = serde_json::from_slice(body)?;
    let total_hits = response
        .hits
        .total
        .as_ref()
        .map(TotalHits::value)
        .unwrap_or(response.hits.hits.len() as u64);

    Ok(ScrollPage::new(
        response.scroll_id.map(ScrollId::new),
        response.hits.hits,
        total_hits,
    ))
}
