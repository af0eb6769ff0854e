// Per-species extraction pipeline
//
// search -> first accession -> fetch -> feature-table lookup
//
// Each step short-circuits to `None`. Only the first accession returned by
// the search is ever fetched, and nothing is retried.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::PipelineConfig;
use crate::entrez::{EntrezClient, RecordFetcher, SequenceSearcher};
use crate::extract::{extract_translation, Translation};
use crate::genbank::GenbankRecord;

pub struct CdsPipeline {
    searcher: Arc<dyn SequenceSearcher>,
    fetcher: Arc<dyn RecordFetcher>,
    config: PipelineConfig,
}

impl CdsPipeline {
    /// Create a pipeline over explicit search and fetch implementations
    pub fn new(
        searcher: Arc<dyn SequenceSearcher>,
        fetcher: Arc<dyn RecordFetcher>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            searcher,
            fetcher,
            config,
        }
    }

    /// Create a pipeline that searches and fetches through one E-utilities client
    pub fn from_client(client: EntrezClient, config: PipelineConfig) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client, config)
    }

    pub fn gene(&self) -> &str {
        &self.config.gene
    }

    /// Fetch one record, reducing every failure to `None`
    ///
    /// `None` means the record could not be obtained, not that it does not
    /// exist. One warning naming the accession and the reason is logged per
    /// failure.
    pub async fn fetch_record(&self, accession: &str) -> Option<GenbankRecord> {
        match self.fetcher.fetch(accession).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    accession = e.accession(),
                    reason = e.reason(),
                    error = %e,
                    "Failed to fetch {}...",
                    accession
                );
                None
            },
        }
    }

    /// Translation of the configured gene for one species
    ///
    /// Search failures propagate; fetch failures and missing annotations
    /// yield `Ok(None)`.
    #[instrument(skip(self), fields(gene = %self.config.gene))]
    pub async fn extract_for_species(&self, species: &str) -> Result<Option<Translation>> {
        let gene = self.config.gene.as_str();

        let accessions = self
            .searcher
            .search(species, gene, self.config.max_results)
            .await
            .with_context(|| format!("Search for {} in '{}' failed", gene, species))?;

        let Some(accession) = accessions.first() else {
            info!("No {} gene sequences found for {}.", gene, species);
            return Ok(None);
        };

        let Some(record) = self.fetch_record(accession).await else {
            return Ok(None);
        };

        let translation = extract_translation(&record, gene);
        if translation.is_none() {
            info!(
                accession = record.display_id(),
                "No {} CDS annotated in record",
                gene
            );
        }

        Ok(translation)
    }
}
