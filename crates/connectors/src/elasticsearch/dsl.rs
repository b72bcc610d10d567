//! Request bodies for the scroll endpoints.

use model::{
    pagination::scroll::{ScrollId, ScrollRequest},
    query::{filter::Filter, order::HitOrder},
};
use planner::query::duration::format_duration;
use serde_json::{Map, Value, json};
use std::time::Duration;

/// Renders a filter as a query DSL clause.
pub fn filter_clause(filter: &Filter) -> Value {
    match filter {
        Filter::Exists { field } => json!({ "exists": { "field": field } }),
        Filter::Missing { field } => json!({
            "bool": { "must_not": [ { "exists": { "field": field } } ] }
        }),
        Filter::And(clauses) => json!({
            "bool": { "filter": clauses.iter().map(filter_clause).collect::<Vec<_>>() }
        }),
    }
}

fn sort_clause(order: HitOrder) -> Value {
    match order {
        HitOrder::Index => json!(["_doc"]),
        HitOrder::Random => json!([{
            "_script": {
                "type": "number",
                "script": { "lang": "painless", "source": "Math.random()" },
                "order": "asc"
            }
        }]),
    }
}

/// Body of the initial `_search?scroll=` request.
///
/// The field filter goes into `post_filter` so it narrows hits without
/// touching scoring of the main query.
pub fn open_scroll_body(request: &ScrollRequest) -> Value {
    let mut body = Map::new();
    body.insert("size".to_string(), json!(request.size));

    if let Some(query) = &request.query {
        body.insert("query".to_string(), query.clone());
    }
    if let Some(filter) = &request.filter {
        body.insert("post_filter".to_string(), filter_clause(filter));
    }
    body.insert("sort".to_string(), sort_clause(request.order));

    Value::Object(body)
}

pub fn continue_scroll_body(scroll_id: &ScrollId, keep_alive: Duration) -> Value {
    json!({
        "scroll": keep_alive_param(keep_alive),
        "scroll_id": scroll_id.as_str(),
    })
}

pub fn clear_scroll_body(scroll_id: &ScrollId) -> Value {
    json!({ "scroll_id": [scroll_id.as_str()] })
}

/// Keep-alive in the cluster's time-unit syntax.
pub fn keep_alive_param(keep_alive: Duration) -> String {
    format_duration(keep_alive)
}
