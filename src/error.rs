use std::path::PathBuf;
use thiserror::Error;

/// Main error type for esq
#[derive(Error, Debug)]
pub enum EsqError {
    /// None of --kql, --dsl, --lucene or --query-file was given
    #[error("one of --kql, --dsl, --lucene, or --query-file must be provided")]
    NoQuerySource,

    /// More than one query source was given
    #[error("only one query source can be provided at a time, got: {}", .flags.join(", "))]
    ConflictingQuerySources { flags: Vec<&'static str> },

    /// --query-file points at nothing
    #[error("query file does not exist: {}", .path.display())]
    QueryFileNotFound { path: PathBuf },

    /// --dsl is not a JSON object
    #[error("--dsl must be a valid JSON object: {message}")]
    InvalidStructuredQuery { message: String },

    /// API key combined with basic auth
    #[error("--api-key cannot be used with --username or --password")]
    ConflictingCredentials,

    /// Password given without a username
    #[error("--password must be used with --username")]
    PasswordWithoutUsername,

    /// Output format is not one of the supported names
    #[error("invalid output format '{format}'. Must be one of: {supported}")]
    UnsupportedOutputFormat { format: String, supported: String },

    /// Refusing to overwrite an existing output file
    #[error("output file already exists: {}", .path.display())]
    OutputFileExists { path: PathBuf },

    /// jq expression failed to parse
    #[error("invalid jq expression '{expression}': {message}")]
    InvalidFilterExpression { expression: String, message: String },

    /// --from/--to is neither relative nor RFC 3339
    #[error("invalid {flag} timestamp '{value}': {source}")]
    InvalidTimeBound {
        flag: &'static str,
        value: String,
        source: chrono::ParseError,
    },

    /// No Elasticsearch node configured
    #[error("--node must be provided")]
    MissingNode,

    /// No index configured
    #[error("--index must be provided")]
    MissingIndex,

    /// Query file could not be read during normalization
    #[error("error reading query file '{}': {source}", .path.display())]
    QueryFileReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// DSL document could not be parsed during normalization
    #[error("invalid JSON for DSL query: {source}")]
    MalformedStructuredQuery { source: serde_json::Error },

    /// Transport-level search failure
    #[error("elasticsearch search failed: {source}")]
    SearchRequest { source: reqwest::Error },

    /// Elasticsearch answered with a non-success status
    #[error("search error: [{status}] {body}")]
    SearchFailed { status: u16, body: String },

    /// jq evaluation failed
    #[error("failed to apply jq '{expression}': {message}")]
    FilterEvaluationError { expression: String, message: String },

    /// Writing results to the destination failed
    #[error("failed to write output to '{}': {source}", .path.display())]
    OutputWriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for esq operations
pub type Result<T> = std::result::Result<T, EsqError>;
