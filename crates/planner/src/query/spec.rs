use crate::{error::ConfigError, query::duration::parse_duration};
use model::query::order::HitOrder;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const DEFAULT_SCROLL_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Effectively unbounded.
pub const DEFAULT_LIMIT: u64 = 1_000_000_000;

/// Immutable description of a scroll read.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    indexes: Vec<String>,
    types: Vec<String>,
    query: Option<Value>,
    must_exist: Vec<String>,
    must_not_exist: Vec<String>,
    batch_size: usize,
    scroll_timeout: Duration,
    order: HitOrder,
    limit: u64,
}

impl QuerySpec {
    pub fn builder() -> QuerySpecBuilder {
        QuerySpecBuilder::default()
    }

    pub fn indexes(&self) -> &[String] {
        &self.indexes
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn query(&self) -> Option<&Value> {
        self.query.as_ref()
    }

    pub fn must_exist(&self) -> &[String] {
        &self.must_exist
    }

    pub fn must_not_exist(&self) -> &[String] {
        &self.must_not_exist
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn scroll_timeout(&self) -> Duration {
        self.scroll_timeout
    }

    pub fn order(&self) -> HitOrder {
        self.order
    }

    pub fn is_random(&self) -> bool {
        self.order == HitOrder::Random
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

#[derive(Debug, Clone, Default)]
enum Timeout {
    #[default]
    Unset,
    Raw(String),
    Exact(Duration),
}

/// Builder for `QuerySpec`.
///
/// Out-of-range tuning values fall back to their defaults; only structural
/// problems (no index, blank names, a non-object query) fail the build.
#[derive(Debug, Clone, Default)]
pub struct QuerySpecBuilder {
    indexes: Vec<String>,
    types: Vec<String>,
    query: Option<Value>,
    must_exist: Vec<String>,
    must_not_exist: Vec<String>,
    batch_size: Option<i64>,
    scroll_timeout: Timeout,
    random: bool,
    limit: Option<i64>,
}

impl QuerySpecBuilder {
    pub fn index(mut self, index: &str) -> Self {
        self.indexes.push(index.to_string());
        self
    }

    pub fn indexes<I, S>(mut self, indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexes.extend(indexes.into_iter().map(Into::into));
        self
    }

    pub fn doc_type(mut self, doc_type: &str) -> Self {
        self.types.push(doc_type.to_string());
        self
    }

    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn must_exist<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.must_exist.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn must_not_exist<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.must_not_exist.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn batch_size(mut self, size: i64) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Scroll keep-alive as a duration string such as `5m` or `30s`.
    pub fn scroll_timeout(mut self, timeout: &str) -> Self {
        self.scroll_timeout = Timeout::Raw(timeout.to_string());
        self
    }

    pub fn scroll_timeout_duration(mut self, timeout: Duration) -> Self {
        self.scroll_timeout = Timeout::Exact(timeout);
        self
    }

    pub fn random(mut self, random: bool) -> Self {
        self.random = random;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> Result<QuerySpec, ConfigError> {
        if self.indexes.is_empty() {
            return Err(ConfigError::NoIndexes);
        }
        if self.indexes.iter().any(|i| i.trim().is_empty()) {
            return Err(ConfigError::BlankName { kind: "index" });
        }
        if self.types.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::BlankName { kind: "type" });
        }
        if self.must_exist.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::BlankField { list: "must_exist" });
        }
        if self.must_not_exist.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::BlankField {
                list: "must_not_exist",
            });
        }
        if let Some(query) = &self.query
            && !query.is_object()
        {
            return Err(ConfigError::InvalidQuery(query.to_string()));
        }

        let batch_size = match self.batch_size {
            Some(size) if size > 0 => usize::try_from(size).unwrap_or(DEFAULT_BATCH_SIZE),
            Some(size) => {
                warn!(batch_size = size, "Invalid batch size; using default.");
                DEFAULT_BATCH_SIZE
            }
            None => DEFAULT_BATCH_SIZE,
        };

        let scroll_timeout = match self.scroll_timeout {
            Timeout::Unset => DEFAULT_SCROLL_TIMEOUT,
            Timeout::Exact(timeout) if !timeout.is_zero() => timeout,
            Timeout::Exact(_) => {
                warn!("Zero scroll timeout; using default.");
                DEFAULT_SCROLL_TIMEOUT
            }
            Timeout::Raw(raw) => parse_duration(&raw).unwrap_or_else(|| {
                warn!(scroll_timeout = %raw, "Unparseable scroll timeout; using default.");
                DEFAULT_SCROLL_TIMEOUT
            }),
        };

        let limit = match self.limit {
            Some(limit) if limit >= 0 => limit as u64,
            _ => DEFAULT_LIMIT,
        };

        let order = if self.random {
            HitOrder::Random
        } else {
            HitOrder::Index
        };

        Ok(QuerySpec {
            indexes: self.indexes,
            types: self.types,
            query: self.query,
            must_exist: self.must_exist,
            must_not_exist: self.must_not_exist,
            batch_size,
            scroll_timeout,
            order,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_apply_when_unset() {
        let spec = QuerySpec::builder().index("activity").build().unwrap();

        assert_eq!(spec.batch_size(), DEFAULT_BATCH_SIZE);
        assert_eq!(spec.scroll_timeout(), DEFAULT_SCROLL_TIMEOUT);
        assert_eq!(spec.limit(), DEFAULT_LIMIT);
        assert_eq!(spec.order(), HitOrder::Index);
        assert!(spec.types().is_empty());
        assert!(spec.query().is_none());
    }

    #[test]
    fn invalid_tuning_values_fall_back_to_defaults() {
        let spec = QuerySpec::builder()
            .index("activity")
            .batch_size(0)
            .scroll_timeout("five minutes")
            .limit(-1)
            .build()
            .unwrap();

        assert_eq!(spec.batch_size(), DEFAULT_BATCH_SIZE);
        assert_eq!(spec.scroll_timeout(), DEFAULT_SCROLL_TIMEOUT);
        assert_eq!(spec.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn explicit_values_are_kept() {
        let spec = QuerySpec::builder()
            .indexes(["a", "b"])
            .doc_type("post")
            .query(json!({ "match_all": {} }))
            .must_exist(["lang"])
            .must_not_exist(["deleted"])
            .batch_size(2)
            .scroll_timeout("30s")
            .random(true)
            .limit(0)
            .build()
            .unwrap();

        assert_eq!(spec.indexes(), ["a".to_string(), "b".to_string()]);
        assert_eq!(spec.types(), ["post".to_string()]);
        assert_eq!(spec.batch_size(), 2);
        assert_eq!(spec.scroll_timeout(), Duration::from_secs(30));
        assert!(spec.is_random());
        assert_eq!(spec.limit(), 0);
        assert_eq!(spec.must_exist(), ["lang".to_string()]);
        assert_eq!(spec.must_not_exist(), ["deleted".to_string()]);
    }

    #[test]
    fn structural_problems_fail_the_build() {
        assert_eq!(QuerySpec::builder().build(), Err(ConfigError::NoIndexes));
        assert_eq!(
            QuerySpec::builder().index(" ").build(),
            Err(ConfigError::BlankName { kind: "index" })
        );
        assert_eq!(
            QuerySpec::builder()
                .index("activity")
                .must_exist([""])
                .build(),
            Err(ConfigError::BlankField { list: "must_exist" })
        );
        assert!(matches!(
            QuerySpec::builder()
                .index("activity")
                .query(json!([1, 2]))
                .build(),
            Err(ConfigError::InvalidQuery(_))
        ));
    }
}
