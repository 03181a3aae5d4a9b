//! Input validation
//!
//! Runs before anything touches the network. Checks are fail-fast and
//! always run in the same order, so identical input reports the same error:
//!
//! 1. exactly one query source
//! 2. query file exists
//! 3. `--dsl` is a JSON object
//! 4. credentials are consistent
//! 5. output format is known
//! 6. output file does not exist yet
//! 7. jq expression parses
//! 8. `--from`/`--to` are relative or RFC 3339

use crate::error::{EsqError, Result};
use crate::filter::ResultFilter;
use crate::options::{AuthOptions, ElasticOptions, OutputOptions, QueryArgs};
use crate::output::OutputFormat;
use crate::query::check_bound;
use serde_json::{Map, Value};

/// Validates raw options
pub struct InputValidator;

impl InputValidator {
    pub fn validate(query: &QueryArgs, auth: &AuthOptions, output: &OutputOptions) -> Result<()> {
        Self::validate_query(query)?;
        Self::validate_auth(auth)?;
        Self::validate_output(output)?;
        Self::validate_time_range(query)?;
        Ok(())
    }

    /// Node and index are needed before a search can run
    pub fn validate_target(elastic: &ElasticOptions) -> Result<()> {
        if elastic.node().is_none() {
            return Err(EsqError::MissingNode);
        }
        if elastic.index().is_none() {
            return Err(EsqError::MissingIndex);
        }
        Ok(())
    }

    fn validate_query(query: &QueryArgs) -> Result<()> {
        let flags = query.set_sources();
        match flags.len() {
            0 => return Err(EsqError::NoQuerySource),
            1 => {}
            _ => return Err(EsqError::ConflictingQuerySources { flags }),
        }

        if let Some(path) = query.query_file() {
            if !path.exists() {
                return Err(EsqError::QueryFileNotFound { path: path.clone() });
            }
        }

        if let Some(dsl) = query.dsl() {
            serde_json::from_str::<Map<String, Value>>(dsl).map_err(|e| {
                EsqError::InvalidStructuredQuery {
                    message: e.to_string(),
                }
            })?;
        }

        Ok(())
    }

    fn validate_auth(auth: &AuthOptions) -> Result<()> {
        if auth.api_key().is_some() && (auth.username().is_some() || auth.password().is_some()) {
            return Err(EsqError::ConflictingCredentials);
        }
        if auth.password().is_some() && auth.username().is_none() {
            return Err(EsqError::PasswordWithoutUsername);
        }
        Ok(())
    }

    fn validate_output(output: &OutputOptions) -> Result<()> {
        output.format.parse::<OutputFormat>()?;

        if let Some(path) = output.output_file() {
            // symlink_metadata so a dangling link also counts as taken
            if path.symlink_metadata().is_ok() {
                return Err(EsqError::OutputFileExists { path: path.clone() });
            }
        }

        if let Some(expression) = output.jq() {
            ResultFilter::new().check(expression)?;
        }

        Ok(())
    }

    fn validate_time_range(query: &QueryArgs) -> Result<()> {
        if let Some(from) = query.from() {
            check_bound("--from", from)?;
        }
        if let Some(to) = query.to() {
            check_bound("--to", to)?;
        }
        Ok(())
    }
}
