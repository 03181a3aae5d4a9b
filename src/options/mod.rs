//! Option structs handed from the CLI/config layer to the query pipeline
//!
//! `QueryArgs` is the raw, loosely-typed form produced by merging flags,
//! environment and the config file. `QueryOptions` is the typed form the
//! normalizer consumes, with the query source collapsed into one variant.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of hits requested from Elasticsearch
pub const DEFAULT_SIZE: usize = 100;

/// Default field used for `--from`/`--to` range clauses
pub const DEFAULT_TIMESTAMP_FIELD: &str = "@timestamp";

/// Raw query options as collected from flags, env and config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kql: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dsl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lucene: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub size: usize,
    pub timestamp_field: String,
}

impl Default for QueryArgs {
    fn default() -> Self {
        Self {
            kql: None,
            dsl: None,
            lucene: None,
            query_file: None,
            from: None,
            to: None,
            size: DEFAULT_SIZE,
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
        }
    }
}

impl QueryArgs {
    pub fn kql(&self) -> Option<&str> {
        non_empty(&self.kql)
    }

    pub fn dsl(&self) -> Option<&str> {
        non_empty(&self.dsl)
    }

    pub fn lucene(&self) -> Option<&str> {
        non_empty(&self.lucene)
    }

    pub fn query_file(&self) -> Option<&PathBuf> {
        self.query_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub fn from(&self) -> Option<&str> {
        non_empty(&self.from)
    }

    pub fn to(&self) -> Option<&str> {
        non_empty(&self.to)
    }

    /// Flags of every query source that is set, in check order
    pub fn set_sources(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.kql().is_some() {
            flags.push("--kql");
        }
        if self.dsl().is_some() {
            flags.push("--dsl");
        }
        if self.lucene().is_some() {
            flags.push("--lucene");
        }
        if self.query_file().is_some() {
            flags.push("--query-file");
        }
        flags
    }

    /// Collapse the raw fields into typed options.
    ///
    /// Should only be called on validated input. If several sources are
    /// still present the file wins, then DSL, then KQL, then Lucene.
    pub fn to_query_options(&self) -> QueryOptions {
        let set = self.set_sources();
        if set.len() > 1 {
            tracing::warn!("Multiple query sources set ({}), using precedence order", set.join(", "));
        }

        let source = if let Some(path) = self.query_file() {
            Some(QuerySource::File(path.clone()))
        } else if let Some(dsl) = self.dsl() {
            Some(QuerySource::Dsl(dsl.to_string()))
        } else if let Some(kql) = self.kql() {
            Some(QuerySource::Kql(kql.to_string()))
        } else {
            self.lucene().map(|lucene| QuerySource::Lucene(lucene.to_string()))
        };

        QueryOptions {
            source,
            from: self.from().map(str::to_string),
            to: self.to().map(str::to_string),
            size: self.size,
            timestamp_field: self.timestamp_field.clone(),
        }
    }
}

/// Where the query text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// Kibana Query Language
    Kql(String),
    /// Raw Elasticsearch Query DSL document
    Dsl(String),
    /// Lucene query string
    Lucene(String),
    /// File holding a Query DSL document
    File(PathBuf),
}

impl QuerySource {
    pub fn kind(&self) -> &'static str {
        match self {
            QuerySource::Kql(_) => "kql",
            QuerySource::Dsl(_) => "dsl",
            QuerySource::Lucene(_) => "lucene",
            QuerySource::File(_) => "query-file",
        }
    }
}

/// Typed query options consumed by the normalizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub source: Option<QuerySource>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Passed through to the search call untouched
    pub size: usize,
    pub timestamp_field: String,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            source: None,
            from: None,
            to: None,
            size: DEFAULT_SIZE,
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
        }
    }
}

impl QueryOptions {
    pub fn new(source: QuerySource) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    pub fn has_time_range(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

/// Authentication options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Resolved credentials for the search client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    None,
    ApiKey(String),
    Basic { username: String, password: String },
}

impl AuthOptions {
    pub fn api_key(&self) -> Option<&str> {
        non_empty(&self.api_key)
    }

    pub fn username(&self) -> Option<&str> {
        non_empty(&self.username)
    }

    pub fn password(&self) -> Option<&str> {
        non_empty(&self.password)
    }

    /// API key wins; basic auth only applies when both halves are present
    pub fn credentials(&self) -> Credentials {
        if let Some(key) = self.api_key() {
            return Credentials::ApiKey(key.to_string());
        }
        match (self.username(), self.password()) {
            (Some(username), Some(password)) => Credentials::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
            _ => Credentials::None,
        }
    }

    /// Copy with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| "********".to_string());
        Self {
            api_key: mask(&self.api_key),
            username: self.username.clone(),
            password: mask(&self.password),
        }
    }
}

/// Output options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Output format name, see [`crate::output::OutputFormat`]
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jq: Option<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            output_file: None,
            jq: None,
        }
    }
}

impl OutputOptions {
    pub fn output_file(&self) -> Option<&PathBuf> {
        self.output_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub fn jq(&self) -> Option<&str> {
        non_empty(&self.jq)
    }
}

/// Target cluster and index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

impl ElasticOptions {
    pub fn node(&self) -> Option<&str> {
        non_empty(&self.node)
    }

    pub fn index(&self) -> Option<&str> {
        non_empty(&self.index)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
