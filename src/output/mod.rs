//! Result serialization and output
//!
//! Results are serialized either as pretty JSON or as an indented plain-text
//! rendering, then handed to [`Sink`] for stdout or file output.

mod sink;
mod text;

pub use sink::Sink;

use crate::error::{EsqError, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Human-readable text
    Text,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Json, OutputFormat::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }

    fn supported() -> String {
        Self::ALL
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = EsqError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| EsqError::UnsupportedOutputFormat {
                format: s.to_string(),
                supported: Self::supported(),
            })
    }
}

/// Converts result values to bytes
pub struct Serializer;

impl Serializer {
    pub fn serialize(value: &Value, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Json => serde_json::to_vec_pretty(value).map_err(|e| EsqError::Json {
                source: e,
                context: "Failed to serialize results".to_string(),
            }),
            OutputFormat::Text => Ok(text::render(value).into_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_names() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);

        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid output format 'yaml'. Must be one of: json, text"
        );
    }

    #[test]
    fn test_json_two_space_indent() {
        let bytes = Serializer::serialize(&json!({"a": [1]}), OutputFormat::Json).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\n  \"a\": [\n    1\n  ]\n}"
        );
    }

    #[test]
    fn test_json_reparses_to_same_value() {
        let value = json!({
            "took": 5,
            "timed_out": false,
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "max_score": 1.5,
                "hits": [
                    {"_id": "a", "_score": 1.5, "_source": {"msg": "héllo \"quoted\"", "tags": []}},
                    {"_id": "b", "_score": null, "_source": {}}
                ]
            }
        });
        let bytes = Serializer::serialize(&value, OutputFormat::Json).unwrap();
        let reparsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(reparsed, value);
    }

    #[test]
    fn test_text_is_deterministic() {
        let value = json!({"b": 1, "a": {"y": [1, 2], "x": "s"}});
        let first = Serializer::serialize(&value, OutputFormat::Text).unwrap();
        let second = Serializer::serialize(&value.clone(), OutputFormat::Text).unwrap();
        assert_eq!(first, second);
    }
}
