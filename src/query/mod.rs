//! Query normalization
//!
//! Turns whichever query source the user picked (KQL, Lucene, a DSL string or
//! a DSL file) plus an optional `--from`/`--to` range into the single request
//! body sent to `_search`.

mod time;

pub use time::{check_bound, is_relative, range_clause, RELATIVE_MARKER};

use crate::error::{EsqError, Result};
use crate::options::{QueryOptions, QuerySource};
use serde_json::{json, Map, Value};
use std::path::Path;

/// The normalized request body
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalQuery {
    body: Map<String, Value>,
}

impl CanonicalQuery {
    /// The top-level `query` clause, if any
    pub fn query(&self) -> Option<&Value> {
        self.body.get("query")
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }

    /// Compact JSON for transport
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.body).map_err(|e| EsqError::Json {
            source: e,
            context: "Failed to serialize query".to_string(),
        })
    }
}

/// Builds a [`CanonicalQuery`] from [`QueryOptions`]
pub struct QueryNormalizer;

impl QueryNormalizer {
    pub fn normalize(opts: &QueryOptions) -> Result<CanonicalQuery> {
        let mut body = match &opts.source {
            Some(QuerySource::File(path)) => Self::dsl_body(&Self::read_query_file(path)?)?,
            Some(QuerySource::Dsl(dsl)) => Self::dsl_body(dsl)?,
            Some(QuerySource::Kql(kql)) => Self::skeleton(json!({
                "query_string": {
                    "query": kql,
                    "analyze_wildcard": true,
                }
            })),
            Some(QuerySource::Lucene(lucene)) => Self::skeleton(json!({
                "query_string": {
                    "query": lucene,
                    "default_operator": "AND",
                }
            })),
            None => Map::new(),
        };

        if let Some(range) = range_clause(
            &opts.timestamp_field,
            opts.from.as_deref(),
            opts.to.as_deref(),
        ) {
            let existing = body
                .remove("query")
                .unwrap_or_else(|| json!({"match_all": {}}));
            body.insert(
                "query".to_string(),
                json!({"bool": {"must": [existing, range]}}),
            );
        }

        if let Some(source) = &opts.source {
            tracing::debug!(
                "Normalized {} query (time range: {})",
                source.kind(),
                opts.has_time_range()
            );
        }

        Ok(CanonicalQuery { body })
    }

    fn skeleton(query: Value) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("query".to_string(), query);
        body
    }

    fn read_query_file(path: &Path) -> Result<String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EsqError::QueryFileReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(content.trim().to_string())
    }

    fn dsl_body(dsl: &str) -> Result<Map<String, Value>> {
        serde_json::from_str(dsl).map_err(|e| EsqError::MalformedStructuredQuery { source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn normalize(opts: QueryOptions) -> Value {
        QueryNormalizer::normalize(&opts).unwrap().into_value()
    }

    #[test]
    fn test_kql_only() {
        let doc = normalize(QueryOptions::new(QuerySource::Kql("status:ok".to_string())));
        assert_eq!(
            doc,
            json!({"query": {"query_string": {"query": "status:ok", "analyze_wildcard": true}}})
        );
    }

    #[test]
    fn test_lucene_only() {
        let doc = normalize(QueryOptions::new(QuerySource::Lucene("field:value".to_string())));
        assert_eq!(
            doc,
            json!({"query": {"query_string": {"query": "field:value", "default_operator": "AND"}}})
        );
    }

    #[test]
    fn test_dsl_used_verbatim() {
        let dsl = r#"{"size":5,"query":{"term":{"a":"b"}},"sort":["_doc"]}"#;
        let doc = normalize(QueryOptions::new(QuerySource::Dsl(dsl.to_string())));
        assert_eq!(doc, serde_json::from_str::<Value>(dsl).unwrap());
    }

    #[test]
    fn test_kql_with_time_range() {
        let opts = QueryOptions {
            from: Some("now-1h".to_string()),
            to: Some("now".to_string()),
            ..QueryOptions::new(QuerySource::Kql("user:test".to_string()))
        };
        assert_eq!(
            normalize(opts),
            json!({"query": {"bool": {"must": [
                {"query_string": {"query": "user:test", "analyze_wildcard": true}},
                {"range": {"@timestamp": {"gte": "now-1h", "lte": "now"}}}
            ]}}})
        );
    }

    #[test]
    fn test_time_range_only() {
        let opts = QueryOptions {
            from: Some("2025-01-01T00:00:00Z".to_string()),
            ..QueryOptions::default()
        };
        assert_eq!(
            normalize(opts),
            json!({"query": {"bool": {"must": [
                {"match_all": {}},
                {"range": {"@timestamp": {"gte": "2025-01-01T00:00:00Z"}}}
            ]}}})
        );
    }

    #[test]
    fn test_dsl_with_time_range_keeps_other_keys() {
        let opts = QueryOptions {
            from: Some("now-1h".to_string()),
            ..QueryOptions::new(QuerySource::Dsl(
                r#"{"size":5,"query":{"term":{"a":"b"}}}"#.to_string(),
            ))
        };
        assert_eq!(
            normalize(opts),
            json!({
                "size": 5,
                "query": {"bool": {"must": [
                    {"term": {"a": "b"}},
                    {"range": {"@timestamp": {"gte": "now-1h"}}}
                ]}}
            })
        );
    }

    #[test]
    fn test_dsl_without_query_and_time_range_uses_match_all() {
        let opts = QueryOptions {
            to: Some("now".to_string()),
            timestamp_field: "timestamp".to_string(),
            ..QueryOptions::new(QuerySource::Dsl(r#"{"size":1}"#.to_string()))
        };
        assert_eq!(
            normalize(opts),
            json!({
                "size": 1,
                "query": {"bool": {"must": [
                    {"match_all": {}},
                    {"range": {"timestamp": {"lte": "now"}}}
                ]}}
            })
        );
    }

    #[test]
    fn test_query_file_is_trimmed_and_parsed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  {{\"query\":{{\"term\":{{\"file_field\":\"file_value\"}}}}}}\n").unwrap();

        let doc = normalize(QueryOptions::new(QuerySource::File(file.path().to_path_buf())));
        assert_eq!(doc, json!({"query": {"term": {"file_field": "file_value"}}}));
    }

    #[test]
    fn test_missing_query_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = QueryNormalizer::normalize(&QueryOptions::new(QuerySource::File(path.clone())))
            .unwrap_err();
        assert!(matches!(err, EsqError::QueryFileReadError { path: p, .. } if p == path));
    }

    #[test]
    fn test_malformed_dsl() {
        for dsl in ["{not json", "[1, 2]", "\"query\""] {
            let err = QueryNormalizer::normalize(&QueryOptions::new(QuerySource::Dsl(
                dsl.to_string(),
            )))
            .unwrap_err();
            assert!(matches!(err, EsqError::MalformedStructuredQuery { .. }), "{dsl}");
        }
    }

    #[test]
    fn test_compact_json() {
        let query = QueryNormalizer::normalize(&QueryOptions::new(QuerySource::Kql(
            "a:b".to_string(),
        )))
        .unwrap();
        let text = query.to_json().unwrap();
        assert!(!text.contains('\n'));
        assert!(!text.contains(": "));
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), query.into_value());
    }
}
