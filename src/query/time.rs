// Time bound handling for --from/--to

use crate::error::{EsqError, Result};
use chrono::DateTime;
use serde_json::{Map, Value};

/// Prefix of Elasticsearch date math expressions such as `now-1h`
pub const RELATIVE_MARKER: &str = "now";

/// Whether the bound is left to Elasticsearch date math
pub fn is_relative(value: &str) -> bool {
    value.starts_with(RELATIVE_MARKER)
}

/// Check a bound is either relative or an RFC 3339 timestamp
pub fn check_bound(flag: &'static str, value: &str) -> Result<()> {
    if is_relative(value) {
        return Ok(());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|source| EsqError::InvalidTimeBound {
            flag,
            value: value.to_string(),
            source,
        })
}

/// Build `{"range": {<field>: {"gte"?, "lte"?}}}`, or `None` without bounds
pub fn range_clause(field: &str, from: Option<&str>, to: Option<&str>) -> Option<Value> {
    if from.is_none() && to.is_none() {
        return None;
    }

    let mut bounds = Map::new();
    if let Some(from) = from {
        bounds.insert("gte".to_string(), Value::String(from.to_string()));
    }
    if let Some(to) = to {
        bounds.insert("lte".to_string(), Value::String(to.to_string()));
    }

    let mut range = Map::new();
    range.insert(field.to_string(), Value::Object(bounds));

    let mut clause = Map::new();
    clause.insert("range".to_string(), Value::Object(range));
    Some(Value::Object(clause))
}
