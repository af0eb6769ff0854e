//! Batch runner
//!
//! Processes a species list one species at a time, prints a progress line
//! per species and a summary block, then writes every species with a
//! present result to a JSON file. With checkpointing enabled the file is
//! also rewritten after each species, so an aborted run keeps what it
//! already found.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::extract::Translation;
use crate::pipeline::CdsPipeline;

/// Species → translation results in first-seen order
///
/// Inserting a species that is already present replaces its value but
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationsMap {
    entries: Vec<(String, Option<Translation>)>,
}

impl TranslationsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, species: impl Into<String>, translation: Option<Translation>) {
        let species = species.into();
        match self.entries.iter_mut().find(|(name, _)| *name == species) {
            Some(entry) => entry.1 = translation,
            None => self.entries.push((species, translation)),
        }
    }

    /// `None` if the species was never processed, `Some(None)` if it was
    /// processed without result
    pub fn get(&self, species: &str) -> Option<Option<&Translation>> {
        self.entries
            .iter()
            .find(|(name, _)| name == species)
            .map(|(_, translation)| translation.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Translation>)> {
        self.entries
            .iter()
            .map(|(name, translation)| (name.as_str(), translation.as_ref()))
    }

    /// Entries that are written to disk: every species with a present value,
    /// the sentinel included
    pub fn persisted(&self) -> impl Iterator<Item = (&str, &Translation)> {
        self.entries
            .iter()
            .filter_map(|(name, translation)| translation.as_ref().map(|t| (name.as_str(), t)))
    }

    /// Pretty JSON object of [`TranslationsMap::persisted`], 4-space indent
    pub fn to_json(&self) -> cdspull_common::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        PersistedView(self).serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| cdspull_common::PullError::parse(e.to_string()))
    }

    /// Replace `path` with the JSON document
    ///
    /// The document is written to a sibling temp file first and renamed over
    /// the target.
    pub fn write_json(&self, path: &Path) -> cdspull_common::Result<()> {
        let json = self.to_json()?;
        let tmp = temp_path(path);
        std::fs::write(&tmp, json.as_bytes())?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

struct PersistedView<'a>(&'a TranslationsMap);

impl Serialize for PersistedView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (species, translation) in self.0.persisted() {
            map.serialize_entry(species, translation)?;
        }
        map.end()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "translations.json".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write the summary block
///
/// A species counts as found whenever its value is a non-empty string, so
/// the sentinel is reported as found with its own length.
pub fn write_summary<W: Write>(
    out: &mut W,
    gene: &str,
    translations: &TranslationsMap,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== Summary of {} Translations ===", gene)?;

    for (species, translation) in translations.iter() {
        match translation.filter(|t| !t.is_empty()) {
            Some(t) => writeln!(
                out,
                "[✓] {}: Translation found, {} amino acids",
                species,
                t.len()
            )?,
            None => writeln!(out, "[✗] {}: Translation not found", species)?,
        }
    }

    Ok(())
}

pub struct BatchRunner {
    pipeline: CdsPipeline,
    output_path: PathBuf,
    checkpoint: bool,
    progress: ProgressBar,
}

impl BatchRunner {
    pub fn new(pipeline: CdsPipeline, output_path: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            output_path: output_path.into(),
            checkpoint: false,
            progress: ProgressBar::hidden(),
        }
    }

    /// Rewrite the output file after every species
    pub fn with_checkpoint(mut self, checkpoint: bool) -> Self {
        self.checkpoint = checkpoint;
        self
    }

    /// Attach a progress bar; its length is set when the run starts
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Process `species` in order, report to `out` and write the output file
    ///
    /// Any error other than a failed fetch aborts the run. Without
    /// checkpointing nothing is written in that case.
    pub async fn run<W: Write>(&self, species: &[String], out: &mut W) -> Result<TranslationsMap> {
        let gene = self.pipeline.gene();
        let mut translations = TranslationsMap::new();

        info!(
            species = species.len(),
            gene,
            output = %self.output_path.display(),
            checkpoint = self.checkpoint,
            "Starting batch"
        );
        self.progress.set_length(species.len() as u64);

        for name in species {
            self.progress
                .suspend(|| writeln!(out, "Fetching {} translation for {}...", gene, name))?;

            let translation = self.pipeline.extract_for_species(name).await?;
            translations.insert(name.as_str(), translation);

            if self.checkpoint {
                self.persist(&translations)?;
            }
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();
        write_summary(out, gene, &translations)?;
        self.persist(&translations)?;

        info!(
            processed = translations.len(),
            persisted = translations.persisted().count(),
            output = %self.output_path.display(),
            "Batch complete"
        );

        Ok(translations)
    }

    fn persist(&self, translations: &TranslationsMap) -> Result<()> {
        translations
            .write_json(&self.output_path)
            .with_context(|| format!("Failed to write {}", self.output_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::entrez::{FetchError, RecordFetcher, SequenceSearcher};
    use crate::genbank::{Feature, GenbankRecord};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Species → accessions and accession → record lookup tables
    #[derive(Default)]
    struct Catalog {
        hits: HashMap<String, Vec<String>>,
        records: HashMap<String, GenbankRecord>,
        failing_species: Option<String>,
    }

    impl Catalog {
        fn with_species(mut self, species: &str, accession: &str, record: GenbankRecord) -> Self {
            self.hits
                .insert(species.to_string(), vec![accession.to_string()]);
            self.records.insert(accession.to_string(), record);
            self
        }
    }

    #[async_trait]
    impl SequenceSearcher for Catalog {
        async fn search(&self, species: &str, _gene: &str, _max: usize) -> Result<Vec<String>> {
            if self.failing_species.as_deref() == Some(species) {
                anyhow::bail!("esearch returned HTTP 500");
            }
            Ok(self.hits.get(species).cloned().unwrap_or_default())
        }
    }

    #[async_trait]
    impl RecordFetcher for Catalog {
        async fn fetch(&self, accession: &str) -> std::result::Result<GenbankRecord, FetchError> {
            self.records
                .get(accession)
                .cloned()
                .ok_or_else(|| FetchError::not_found(accession))
        }
    }

    fn cox3(translation: Option<&str>) -> GenbankRecord {
        let mut feature = Feature::new("CDS", "1..10").with_qualifier("gene", "COX3");
        if let Some(t) = translation {
            feature = feature.with_qualifier("translation", t);
        }
        GenbankRecord::with_features(vec![feature])
    }

    fn runner(catalog: Catalog, output: &Path) -> BatchRunner {
        let catalog = Arc::new(catalog);
        let pipeline = CdsPipeline::new(catalog.clone(), catalog, PipelineConfig::default());
        BatchRunner::new(pipeline, output)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_map_last_write_wins_in_place() {
        let mut map = TranslationsMap::new();
        map.insert("A", Some(Translation::Sequence("AAA".to_string())));
        map.insert("B", None);
        map.insert("A", None);

        let order: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(order, ["A", "B"]);
        assert_eq!(map.get("A"), Some(None));
        assert_eq!(map.get("C"), None);
        assert_eq!(map.persisted().count(), 0);
    }

    #[test]
    fn test_to_json_format() {
        let mut map = TranslationsMap::new();
        map.insert("Homo sapiens", Some(Translation::Sequence("MKT".to_string())));
        map.insert("Lemur catta", None);
        map.insert("Pan troglodytes", Some(Translation::Unavailable));

        let expected = "{\n    \"Homo sapiens\": \"MKT\",\n    \"Pan troglodytes\": \"<No translation available>\"\n}";
        assert_eq!(map.to_json().unwrap(), expected);
    }

    #[test]
    fn test_to_json_empty() {
        assert_eq!(TranslationsMap::new().to_json().unwrap(), "{}");
    }

    #[test]
    fn test_summary_quirks() {
        let mut map = TranslationsMap::new();
        map.insert("Homo sapiens", Some(Translation::Sequence("MKTW".to_string())));
        map.insert("Pan troglodytes", Some(Translation::Unavailable));
        map.insert("Lemur catta", None);
        map.insert("Ursus arctos", Some(Translation::Sequence(String::new())));

        let mut out = Vec::new();
        write_summary(&mut out, "COX3", &map).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = "\n=== Summary of COX3 Translations ===\n\
[✓] Homo sapiens: Translation found, 4 amino acids\n\
[✓] Pan troglodytes: Translation found, 26 amino acids\n\
[✗] Lemur catta: Translation not found\n\
[✗] Ursus arctos: Translation not found\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_write_json_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cox3_translations.json");
        std::fs::write(&path, "stale content from a previous run").unwrap();

        let mut map = TranslationsMap::new();
        map.insert("Felis catus", Some(Translation::Sequence("MTH".to_string())));
        map.write_json(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{\n    \"Felis catus\": \"MTH\"\n}");
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_run_reports_and_persists() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("cox3_translations.json");
        let catalog = Catalog::default()
            .with_species("Homo sapiens", "ABC123", cox3(Some("MKT")))
            .with_species("Pan troglodytes", "XYZ789", cox3(None));
        let runner = runner(catalog, &output);

        let mut out = Vec::new();
        let species = names(&["Homo sapiens", "Pan troglodytes", "Lemur catta"]);
        let map = runner.run(&species, &mut out).await.unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("Lemur catta"), Some(None));

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(
            "Fetching COX3 translation for Homo sapiens...\n\
Fetching COX3 translation for Pan troglodytes...\n\
Fetching COX3 translation for Lemur catta...\n"
        ));
        assert!(text.contains("[✓] Homo sapiens: Translation found, 3 amino acids"));
        assert!(text.contains("[✓] Pan troglodytes: Translation found, 26 amino acids"));
        assert!(text.contains("[✗] Lemur catta: Translation not found"));

        // Sentinel-valued species are persisted; absent ones are not
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let object = written.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["Homo sapiens"], "MKT");
        assert_eq!(object["Pan troglodytes"], "<No translation available>");
        assert!(!object.contains_key("Lemur catta"));
    }

    #[tokio::test]
    async fn test_duplicate_species_processed_twice() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.json");
        let catalog =
            Catalog::default().with_species("Castor canadensis", "CAS1", cox3(Some("MTHQ")));
        let runner = runner(catalog, &output);

        let mut out = Vec::new();
        let species = names(&["Castor canadensis", "Felis catus", "Castor canadensis"]);
        let map = runner.run(&species, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Fetching COX3 translation for Castor canadensis...").count(), 2);
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next().map(|(name, _)| name), Some("Castor canadensis"));
    }

    #[tokio::test]
    async fn test_error_without_checkpoint_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.json");
        let catalog = Catalog {
            failing_species: Some("Canis lupus".to_string()),
            ..Catalog::default()
        }
        .with_species("Felis catus", "FEL1", cox3(Some("MTH")));
        let runner = runner(catalog, &output);

        let mut out = Vec::new();
        let species = names(&["Felis catus", "Canis lupus", "Ursus arctos"]);
        let err = runner.run(&species, &mut out).await.unwrap_err();

        assert!(format!("{:#}", err).contains("HTTP 500"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_checkpoint_keeps_partial_results() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.json");
        let catalog = Catalog {
            failing_species: Some("Canis lupus".to_string()),
            ..Catalog::default()
        }
        .with_species("Felis catus", "FEL1", cox3(Some("MTH")));
        let runner = runner(catalog, &output).with_checkpoint(true);

        let mut out = Vec::new();
        let species = names(&["Felis catus", "Canis lupus", "Ursus arctos"]);
        assert!(runner.run(&species, &mut out).await.is_err());

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "{\n    \"Felis catus\": \"MTH\"\n}");
    }
}
