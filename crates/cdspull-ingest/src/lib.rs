//! cdspull Ingest Library
//!
//! Pulls one protein translation per species out of the NCBI nucleotide
//! database.
//!
//! For every species the pipeline runs one E-utilities search
//! (`{species}[Organism] AND {gene}[Gene]`), fetches the first hit as a
//! GenBank flat file, and scans its feature table for the first `CDS`
//! annotated with the gene. The batch runner repeats this over a species
//! list, prints a summary and writes the found translations as JSON.
//!
//! # Modules
//!
//! - [`entrez`]: E-utilities client and the search/fetch seams
//! - [`genbank`]: GenBank flat-file models and parser
//! - [`extract`]: feature-table translation lookup
//! - [`pipeline`]: per-species search → fetch → extract
//! - [`batch`]: species loop, summary report and JSON output
//!
//! # Example
//!
//! ```no_run
//! use cdspull_ingest::config::{EntrezConfig, PipelineConfig};
//! use cdspull_ingest::entrez::EntrezClient;
//! use cdspull_ingest::pipeline::CdsPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = EntrezClient::new(EntrezConfig::from_env())?;
//!     let pipeline = CdsPipeline::from_client(client, PipelineConfig::default());
//!
//!     if let Some(translation) = pipeline.extract_for_species("Homo sapiens").await? {
//!         println!("{}", translation);
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod entrez;
pub mod extract;
pub mod genbank;
pub mod pipeline;
pub mod progress;
pub mod species;

pub use batch::{BatchRunner, TranslationsMap};
pub use extract::{extract_translation, Translation, NO_TRANSLATION_SENTINEL};
pub use pipeline::CdsPipeline;
