//! CLI command definitions and parsing
use crate::config::Settings;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "esq",
    version,
    author = "fa7ad",
    about = "A CLI tool to query Elasticsearch",
    long_about = "Pass a query in KQL, Lucene, or Elasticsearch Query DSL (as an argument or a file) \
                  to search across your Elasticsearch indices. Results are printed as JSON or text \
                  and can be reshaped with a jq expression.\n\n\
                  Settings are read from the config file (~/.config/esq/config.toml by default), \
                  then ESQ_* environment variables, then flags."
)]
pub struct Cli {
    /// Config file path (defaults to ~/.config/esq/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub search: SearchArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags for a search run; unset flags fall back to env and config
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Elasticsearch node URL (e.g. http://localhost:9200)
    #[arg(short, long)]
    pub node: Option<String>,

    /// Elasticsearch index pattern (e.g. 'my-logs-*')
    #[arg(short, long)]
    pub index: Option<String>,

    /// Kibana Query Language (KQL) query string
    #[arg(long)]
    pub kql: Option<String>,

    /// Elasticsearch Query DSL JSON string
    #[arg(long)]
    pub dsl: Option<String>,

    /// Lucene query string
    #[arg(long)]
    pub lucene: Option<String>,

    /// Path to a file containing Query DSL (JSON)
    #[arg(short = 'f', long, value_name = "FILE")]
    pub query_file: Option<PathBuf>,

    /// Start time (RFC 3339 or relative like 'now-1d')
    #[arg(long)]
    pub from: Option<String>,

    /// End time (RFC 3339 or relative like 'now')
    #[arg(long)]
    pub to: Option<String>,

    /// Number of results to return [default: 100]
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Field used for --from/--to [default: @timestamp]
    #[arg(long)]
    pub timestamp_field: Option<String>,

    /// API key for authentication
    #[arg(long)]
    pub api_key: Option<String>,

    /// Username for basic authentication
    #[arg(long)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long)]
    pub password: Option<String>,

    /// Output format (json, text) [default: text]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write output to a new file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// jq expression applied to the response
    #[arg(short, long)]
    pub jq: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show merged configuration (secrets masked)
    Show,

    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Print the default configuration file path
    Path,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl SearchArgs {
    /// Overlay flags that were given on top of `settings`
    pub fn apply_to(self, settings: &mut Settings) {
        fn set<T>(target: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *target = value;
            }
        }

        set(&mut settings.elastic.node, self.node);
        set(&mut settings.elastic.index, self.index);

        set(&mut settings.query.kql, self.kql);
        set(&mut settings.query.dsl, self.dsl);
        set(&mut settings.query.lucene, self.lucene);
        set(&mut settings.query.query_file, self.query_file);
        set(&mut settings.query.from, self.from);
        set(&mut settings.query.to, self.to);
        if let Some(size) = self.size {
            settings.query.size = size;
        }
        if let Some(field) = self.timestamp_field {
            settings.query.timestamp_field = field;
        }

        set(&mut settings.auth.api_key, self.api_key);
        set(&mut settings.auth.username, self.username);
        set(&mut settings.auth.password, self.password);

        if let Some(format) = self.output {
            settings.output.format = format;
        }
        set(&mut settings.output.output_file, self.output_file);
        set(&mut settings.output.jq, self.jq);
    }
}
