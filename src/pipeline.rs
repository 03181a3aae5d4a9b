//! End-to-end search pipeline
//!
//! Validate -> normalize -> search -> jq -> serialize -> write. Every stage
//! takes its options explicitly; nothing is read from global state.

use crate::config::{ConfigValidator, Settings};
use crate::error::{EsqError, Result};
use crate::filter::ResultFilter;
use crate::options::OutputOptions;
use crate::output::{OutputFormat, Serializer, Sink};
use crate::query::QueryNormalizer;
use crate::search::SearchBackend;
use crate::validation::InputValidator;
use serde_json::Value;

/// Validate settings and build the request body, without searching
pub fn prepare(settings: &Settings) -> Result<String> {
    InputValidator::validate(&settings.query, &settings.auth, &settings.output)?;
    let query = QueryNormalizer::normalize(&settings.query.to_query_options())?;
    query.to_json()
}

/// Run a full search and write the results
pub fn run(settings: &Settings, backend: &dyn SearchBackend) -> Result<()> {
    InputValidator::validate_target(&settings.elastic)?;
    ConfigValidator::validate(settings)?;
    let body = prepare(settings)?;

    let index = settings.elastic.index().ok_or(EsqError::MissingIndex)?;
    let results = backend.search(index, &body, settings.query.size)?;

    let bytes = render(results, &settings.output)?;
    Sink::write(&bytes, settings.output.output_file().map(|p| p.as_path()))
}

/// Apply the jq expression, if any, and serialize
pub fn render(results: Value, output: &OutputOptions) -> Result<Vec<u8>> {
    let format: OutputFormat = output.format.parse()?;
    let processed = match output.jq() {
        Some(expression) => ResultFilter::new().apply(results, expression)?,
        None => results,
    };
    Serializer::serialize(&processed, format)
}
