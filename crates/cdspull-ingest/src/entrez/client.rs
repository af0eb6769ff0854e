//! HTTP client for NCBI E-utilities
//!
//! One client serves both the search and the fetch side of the pipeline.
//! Identity values travel with every request as `email`, `api_key` and
//! `tool` query parameters.

use super::endpoints;
use super::types::SearchResponse;
use super::{FetchError, RecordFetcher, SequenceSearcher};
use crate::config::EntrezConfig;
use crate::genbank::{GenbankParser, GenbankRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use cdspull_common::PullError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// E-utilities client
pub struct EntrezClient {
    client: Client,
    config: EntrezConfig,
}

impl EntrezClient {
    /// Create a client from explicit configuration
    pub fn new(config: EntrezConfig) -> Result<Self> {
        if !config.has_identity() {
            warn!(
                email_set = config.email.is_some(),
                api_key_set = config.api_key.is_some(),
                "E-utilities identity incomplete; NCBI may throttle or reject requests"
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    fn identity_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("tool", self.config.tool.clone())];
        if let Some(ref email) = self.config.email {
            params.push(("email", email.clone()));
        }
        if let Some(ref key) = self.config.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// Run esearch and return the parsed response
    pub async fn esearch(&self, species: &str, gene: &str, max_results: usize) -> Result<SearchResponse> {
        let url = endpoints::esearch_url(&self.config.base_url);
        let mut params = vec![
            ("db", endpoints::SEARCH_DATABASE.to_string()),
            ("term", endpoints::search_term(species, gene)),
            ("retmax", max_results.to_string()),
        ];
        params.extend(self.identity_params());

        debug!(%url, species, gene, max_results, "Sending esearch request");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("esearch request failed for '{}'", species))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read esearch response for '{}'", species))?;

        if !status.is_success() {
            return Err(PullError::network(format!(
                "esearch returned HTTP {} for '{}'",
                status, species
            ))
            .into());
        }

        let parsed = SearchResponse::parse(&body)
            .with_context(|| format!("Invalid esearch response for '{}'", species))?;

        debug!(species, count = parsed.count, returned = parsed.ids.len(), "esearch complete");
        Ok(parsed)
    }

    /// Run efetch and return the raw GenBank text
    pub async fn efetch_genbank(&self, accession: &str) -> std::result::Result<String, FetchError> {
        let url = endpoints::efetch_url(&self.config.base_url);
        let mut params = vec![
            ("db", endpoints::FETCH_DATABASE.to_string()),
            ("id", accession.to_string()),
            ("rettype", endpoints::GENBANK_RETTYPE.to_string()),
            ("retmode", endpoints::TEXT_RETMODE.to_string()),
        ];
        params.extend(self.identity_params());

        debug!(%url, accession, "Sending efetch request");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| FetchError::transport(accession, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            return Err(FetchError::not_found(accession));
        }
        if !status.is_success() {
            return Err(FetchError::transport(accession, format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(accession, e.to_string()))?;

        if body.trim().is_empty() {
            return Err(FetchError::not_found(accession));
        }

        Ok(body)
    }
}

#[async_trait]
impl SequenceSearcher for EntrezClient {
    async fn search(&self, species: &str, gene: &str, max_results: usize) -> Result<Vec<String>> {
        let mut ids = self.esearch(species, gene, max_results).await?.ids;
        ids.truncate(max_results);
        Ok(ids)
    }
}

#[async_trait]
impl RecordFetcher for EntrezClient {
    async fn fetch(&self, accession: &str) -> std::result::Result<GenbankRecord, FetchError> {
        let text = self.efetch_genbank(accession).await?;
        GenbankParser::new()
            .parse_single(&text)
            .map_err(|source| FetchError::Parse {
                accession: accession.to_string(),
                source,
            })
    }
}
