//! esq - query Elasticsearch from the command line
//!
//! Accepts a query as KQL, Lucene, a Query DSL string or a Query DSL file,
//! optionally narrowed by a time range, normalizes it into one request body,
//! runs the search and renders the response as JSON or text, optionally
//! reshaped by a jq expression.

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod query;
pub mod search;
pub mod validation;

pub use error::{EsqError, Result};
