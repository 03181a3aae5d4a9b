//! jq post-processing of search responses

mod jaq;

pub use jaq::{CompiledFilter, JaqEngine};

use crate::error::{EsqError, Result};
use serde_json::Value;

/// The two operations the pipeline needs from a jq implementation
pub trait FilterEngine {
    type Compiled;

    /// Parse and compile an expression
    fn parse(&self, expression: &str) -> Result<Self::Compiled>;

    /// Evaluate against `input`, stopping at the first evaluation error
    fn run(&self, compiled: &Self::Compiled, input: Value) -> Result<Vec<Value>>;
}

/// Applies an optional jq expression to a value
pub struct ResultFilter<E = JaqEngine> {
    engine: E,
}

impl ResultFilter<JaqEngine> {
    pub fn new() -> Self {
        Self { engine: JaqEngine }
    }
}

impl Default for ResultFilter<JaqEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: FilterEngine> ResultFilter<E> {
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Check an expression parses, without running it
    pub fn check(&self, expression: &str) -> Result<()> {
        self.engine.parse(expression).map(|_| ())
    }

    /// Run `expression` over `input`.
    ///
    /// An empty expression returns the input untouched. A single output is
    /// returned as-is; zero or several outputs are returned as an array.
    pub fn apply(&self, input: Value, expression: &str) -> Result<Value> {
        if expression.is_empty() {
            return Ok(input);
        }

        // Validation already parsed this once; a failure here is reported
        // as an evaluation error.
        let compiled = self.engine.parse(expression).map_err(|e| match e {
            EsqError::InvalidFilterExpression { message, .. } => {
                EsqError::FilterEvaluationError {
                    expression: expression.to_string(),
                    message,
                }
            }
            other => other,
        })?;

        let mut values = self.engine.run(&compiled, input)?;
        tracing::debug!("jq '{}' produced {} value(s)", expression, values.len());

        if values.len() == 1 {
            Ok(values.remove(0))
        } else {
            Ok(Value::Array(values))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> Value {
        json!({
            "took": 3,
            "hits": [
                {"_id": "1", "_source": {"status": "ok"}},
                {"_id": "2", "_source": {"status": "failed"}}
            ]
        })
    }

    #[test]
    fn test_empty_expression_is_identity() {
        let filter = ResultFilter::new();
        assert_eq!(filter.apply(response(), "").unwrap(), response());
    }

    #[test]
    fn test_single_output_is_unwrapped() {
        let filter = ResultFilter::new();
        let value = filter
            .apply(response(), ".hits[0]._source.status")
            .unwrap();
        assert_eq!(value, json!("ok"));
    }

    #[test]
    fn test_single_array_output_stays_array() {
        let filter = ResultFilter::new();
        let value = filter
            .apply(response(), ".hits | map(._id)")
            .unwrap();
        assert_eq!(value, json!(["1", "2"]));
    }

    #[test]
    fn test_many_outputs_become_sequence() {
        let filter = ResultFilter::new();
        let value = filter
            .apply(response(), ".hits[] | ._source.status")
            .unwrap();
        assert_eq!(value, json!(["ok", "failed"]));
    }

    #[test]
    fn test_no_outputs_become_empty_sequence() {
        let filter = ResultFilter::new();
        let value = filter.apply(response(), "empty").unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn test_construct_objects() {
        let filter = ResultFilter::new();
        let value = filter
            .apply(response(), ".hits | map({id: ._id, source: ._source})")
            .unwrap();
        assert_eq!(
            value,
            json!([
                {"id": "1", "source": {"status": "ok"}},
                {"id": "2", "source": {"status": "failed"}}
            ])
        );
    }

    #[test]
    fn test_evaluation_error() {
        let filter = ResultFilter::new();
        let err = filter.apply(response(), ".took | .[0]").unwrap_err();
        assert!(matches!(err, EsqError::FilterEvaluationError { .. }));
    }

    #[test]
    fn test_unparsable_expression_at_evaluation() {
        let filter = ResultFilter::new();
        let err = filter.apply(response(), ".hits[").unwrap_err();
        match err {
            EsqError::FilterEvaluationError { expression, .. } => assert_eq!(expression, ".hits["),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check() {
        let filter = ResultFilter::new();
        assert!(filter.check(".hits[] | ._id").is_ok());
        assert!(matches!(
            filter.check("{").unwrap_err(),
            EsqError::InvalidFilterExpression { .. }
        ));
    }
}
