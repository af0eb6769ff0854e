//! NCBI E-utilities access
//!
//! The pipeline depends on two seams, [`SequenceSearcher`] and
//! [`RecordFetcher`]. [`EntrezClient`] implements both over HTTP; tests
//! substitute in-memory doubles.

pub mod client;
pub mod endpoints;
pub mod types;

use crate::genbank::GenbankRecord;
use async_trait::async_trait;
use cdspull_common::PullError;
use thiserror::Error;

pub use client::EntrezClient;

/// Why a record could not be obtained
#[derive(Error, Debug)]
pub enum FetchError {
    /// The service has no record for the accession
    #[error("Record {accession} not found")]
    NotFound { accession: String },

    /// The request failed or the service answered with an error status
    #[error("Transport failure fetching {accession}: {message}")]
    Transport { accession: String, message: String },

    /// The response body is not a single valid GenBank record
    #[error("Failed to parse record {accession}: {source}")]
    Parse {
        accession: String,
        #[source]
        source: PullError,
    },
}

impl FetchError {
    pub fn not_found(accession: impl Into<String>) -> Self {
        Self::NotFound {
            accession: accession.into(),
        }
    }

    pub fn transport(accession: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            accession: accession.into(),
            message: message.into(),
        }
    }

    pub fn accession(&self) -> &str {
        match self {
            FetchError::NotFound { accession }
            | FetchError::Transport { accession, .. }
            | FetchError::Parse { accession, .. } => accession,
        }
    }

    /// Short machine-readable reason, used as a log field
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::NotFound { .. } => "not_found",
            FetchError::Transport { .. } => "transport",
            FetchError::Parse { .. } => "parse",
        }
    }
}

/// Looks up accession ids for a species/gene pair
#[async_trait]
pub trait SequenceSearcher: Send + Sync {
    /// Ordered accession ids, at most `max_results` of them
    ///
    /// An empty list is a valid answer; errors are for failed requests.
    async fn search(
        &self,
        species: &str,
        gene: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<String>>;
}

/// Retrieves one full record by accession
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    async fn fetch(&self, accession: &str) -> Result<GenbankRecord, FetchError>;
}
