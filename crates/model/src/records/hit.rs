use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw search hit as returned by the cluster, before decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_index", default)]
    pub index: String,

    /// Mapping type, only reported by older clusters.
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

impl Hit {
    pub fn new(index: &str, id: &str, source: Value) -> Self {
        Hit {
            id: id.to_string(),
            index: index.to_string(),
            doc_type: None,
            score: None,
            source: Some(source),
        }
    }

    pub fn has_source(&self) -> bool {
        self.source.as_ref().is_some_and(|s| !s.is_null())
    }
}
