//! Configuration for the E-utilities client and the extraction pipeline
//!
//! Credentials are carried in [`EntrezConfig`] and handed to the client at
//! construction time; nothing is stored in process-global state.

use crate::entrez::endpoints::DEFAULT_BASE_URL;
use std::path::PathBuf;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Tool name reported to NCBI with every request.
pub const DEFAULT_TOOL_NAME: &str = "cdspull";

/// Default timeout for a single E-utilities request in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gene looked up when none is given.
pub const DEFAULT_GENE: &str = "COX3";

/// Default upper bound on accession ids returned by a search.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// E-utilities connection and identity settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrezConfig {
    /// Base URL of the E-utilities service
    pub base_url: String,

    /// Contact address NCBI associates with the requests
    pub email: Option<String>,

    /// NCBI API key (raises the server-side rate limit)
    pub api_key: Option<String>,

    /// Tool name sent alongside the identity
    pub tool: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EntrezConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            email: None,
            api_key: None,
            tool: DEFAULT_TOOL_NAME.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EntrezConfig {
    /// Create new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// - `ENTREZ_EMAIL`, `ENTREZ_API_KEY`: process identity
    /// - `ENTREZ_BASE_URL`: service location override
    /// - `ENTREZ_TIMEOUT_SECS`: request timeout
    ///
    /// Missing identity values are not an error here.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(email) = non_empty_var("ENTREZ_EMAIL") {
            config.email = Some(email);
        }

        if let Some(key) = non_empty_var("ENTREZ_API_KEY") {
            config.api_key = Some(key);
        }

        if let Some(url) = non_empty_var("ENTREZ_BASE_URL") {
            config.base_url = url;
        }

        config.timeout_secs = parse_timeout(std::env::var("ENTREZ_TIMEOUT_SECS").ok());

        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout; zero is raised to one second
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds.max(1);
        self
    }

    /// Whether both identity values are configured
    pub fn has_identity(&self) -> bool {
        self.email.is_some() && self.api_key.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Timeout from its env value; unset, unparsable or zero gives the default
fn parse_timeout(raw: Option<String>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok())
        .filter(|&secs| secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Settings for one pipeline instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Gene used both as search filter and as feature-table match key
    pub gene: String,

    /// Upper bound on accession ids requested per search
    pub max_results: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gene: DEFAULT_GENE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gene(mut self, gene: impl Into<String>) -> Self {
        self.gene = gene.into();
        self
    }

    /// Set the search bound; zero is raised to one
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Output file used when none is given, e.g. `cox3_translations.json`
    pub fn default_output_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_translations.json", self.gene.to_lowercase()))
    }
}
