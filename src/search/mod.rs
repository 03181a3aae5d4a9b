//! Search execution against Elasticsearch
//!
//! The pipeline only sees [`SearchBackend`]; [`ElasticClient`] is the
//! blocking HTTP implementation used by the binary.

use crate::error::{EsqError, Result};
use crate::options::{AuthOptions, Credentials, ElasticOptions};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

/// Something that can run a `_search` request
pub trait SearchBackend {
    /// Run `query_document` (compact JSON) against `index`, returning the
    /// decoded response body
    fn search(&self, index: &str, query_document: &str, size: usize) -> Result<Value>;
}

/// Blocking Elasticsearch client
pub struct ElasticClient {
    node: String,
    credentials: Credentials,
    client: Client,
}

impl ElasticClient {
    pub fn new(elastic: &ElasticOptions, auth: &AuthOptions) -> Result<Self> {
        let node = elastic.node().ok_or(EsqError::MissingNode)?;
        let client = Client::builder()
            .build()
            .map_err(|e| EsqError::SearchRequest { source: e })?;

        Ok(Self {
            node: node.trim_end_matches('/').to_string(),
            credentials: auth.credentials(),
            client,
        })
    }

    pub fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.node, index)
    }
}

impl SearchBackend for ElasticClient {
    fn search(&self, index: &str, query_document: &str, size: usize) -> Result<Value> {
        let url = self.search_url(index);
        tracing::debug!("Searching {} (size {})", url, size);
        tracing::trace!("Query body: {}", query_document);

        let mut request = self
            .client
            .post(&url)
            .query(&[
                ("size", size.to_string()),
                ("track_total_hits", "true".to_string()),
            ])
            .header(CONTENT_TYPE, "application/json")
            .body(query_document.to_string());

        request = match &self.credentials {
            Credentials::ApiKey(key) => request.header("Authorization", format!("ApiKey {key}")),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::None => request,
        };

        let response = request
            .send()
            .map_err(|e| EsqError::SearchRequest { source: e })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(EsqError::SearchFailed {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .map_err(|e| EsqError::SearchRequest { source: e })?;
        serde_json::from_str(&text).map_err(|e| EsqError::Json {
            source: e,
            context: "Failed to parse search response body".to_string(),
        })
    }
}
