//! cdspull - per-species CDS translation puller

use anyhow::{Context, Result};
use cdspull_common::logging::{init_logging, LogConfig, LogLevel};
use cdspull_ingest::config::{EntrezConfig, PipelineConfig, DEFAULT_GENE, DEFAULT_MAX_RESULTS};
use cdspull_ingest::entrez::EntrezClient;
use cdspull_ingest::genbank::GenbankParser;
use cdspull_ingest::progress::create_batch_progress;
use cdspull_ingest::species::{default_species, load_species_file, DEFAULT_SPECIES};
use cdspull_ingest::{extract_translation, BatchRunner, CdsPipeline};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "cdspull")]
#[command(author, version, about = "Pull CDS translations per species from NCBI")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Extract one translation per species and write them as JSON
    Run {
        /// Gene symbol to look up
        #[arg(short, long, default_value = DEFAULT_GENE)]
        gene: String,

        /// Upper bound on accession ids requested per search
        #[arg(short, long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,

        /// Species to process (repeatable; defaults to the built-in list)
        #[arg(short, long = "species")]
        species: Vec<String>,

        /// File with one species name per line
        #[arg(long, conflicts_with = "species")]
        species_file: Option<PathBuf>,

        /// Output file [default: {gene}_translations.json]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rewrite the output file after every species
        #[arg(long)]
        checkpoint: bool,
    },

    /// Extract the translation for a single species
    Extract {
        /// Species name, e.g. "Homo sapiens"
        #[arg(short, long)]
        species: String,

        /// Gene symbol to look up
        #[arg(short, long, default_value = DEFAULT_GENE)]
        gene: String,
    },

    /// Look up a gene in a local GenBank file
    Parse {
        /// GenBank flat file (one or more records)
        #[arg(short, long)]
        file: PathBuf,

        /// Gene symbol to look up
        #[arg(short, long, default_value = DEFAULT_GENE)]
        gene: String,
    },

    /// Print the built-in species list
    Species,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("cdspull")
        .build()
        .merge_env()?;

    // Dropping the guard flushes the file appender
    let _guard = init_logging(&log_config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Run {
            gene,
            max_results,
            species,
            species_file,
            output,
            checkpoint,
        } => {
            let species = match (species_file, species.is_empty()) {
                (Some(path), _) => load_species_file(&path)?,
                (None, false) => species,
                (None, true) => default_species(),
            };

            let config = PipelineConfig::new()
                .with_gene(gene)
                .with_max_results(max_results);
            let output = output.unwrap_or_else(|| config.default_output_path());

            let client = EntrezClient::new(EntrezConfig::from_env())?;
            let pipeline = CdsPipeline::from_client(client, config);
            let runner = BatchRunner::new(pipeline, &output)
                .with_checkpoint(checkpoint)
                .with_progress(create_batch_progress(species.len() as u64));

            runner.run(&species, &mut out).await?;
            writeln!(out, "\nResults saved to {}", output.display())?;
        },
        Command::Extract { species, gene } => {
            let client = EntrezClient::new(EntrezConfig::from_env())?;
            let pipeline = CdsPipeline::from_client(client, PipelineConfig::new().with_gene(&gene));

            match pipeline.extract_for_species(&species).await? {
                Some(translation) => writeln!(out, "{}", translation)?,
                None => writeln!(out, "No {} translation found for {}", gene, species)?,
            }
        },
        Command::Parse { file, gene } => {
            let handle = std::fs::File::open(&file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let records = GenbankParser::new().parse_all(handle)?;
            debug!(records = records.len(), file = %file.display(), "Parsed GenBank file");

            for record in &records {
                match extract_translation(record, &gene) {
                    Some(translation) => {
                        writeln!(out, "{}\t{}", record.display_id(), translation)?
                    },
                    None => writeln!(out, "{}\t<no {} CDS>", record.display_id(), gene)?,
                }
            }
        },
        Command::Species => {
            for name in DEFAULT_SPECIES {
                writeln!(out, "{}", name)?;
            }
        },
    }

    info!("Done");
    Ok(())
}
