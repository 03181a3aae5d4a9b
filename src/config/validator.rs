use crate::config::Settings;
use crate::error::{EsqError, Result, ValidationError};

/// Checks merged settings before a search, reporting every problem at once
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_elastic(settings, &mut errors);
        Self::validate_query(settings, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(EsqError::ConfigValidation { errors })
        }
    }

    fn validate_elastic(settings: &Settings, errors: &mut Vec<ValidationError>) {
        // Absent node/index are reported by the input validator as
        // MissingNode/MissingIndex; only malformed values are caught here.
        if let Some(node) = settings.elastic.node() {
            if !(node.starts_with("http://") || node.starts_with("https://")) {
                errors.push(ValidationError::new(
                    "elastic.node",
                    format!("Node URL must start with http:// or https://, got '{}'", node),
                ));
            }
        }

        if let Some(index) = settings.elastic.index() {
            if index.contains(char::is_whitespace) {
                errors.push(ValidationError::new(
                    "elastic.index",
                    format!("Index pattern cannot contain whitespace: '{}'", index),
                ));
            }
        }
    }

    fn validate_query(settings: &Settings, errors: &mut Vec<ValidationError>) {
        if settings.query.timestamp_field.trim().is_empty() {
            errors.push(ValidationError::new(
                "query.timestamp_field",
                "Timestamp field cannot be empty",
            ));
        }
    }
}
