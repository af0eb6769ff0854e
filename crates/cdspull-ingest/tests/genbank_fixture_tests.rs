//! Parser and extractor tests over GenBank flat files on disk

use cdspull_ingest::genbank::{GenbankParser, Topology};
use cdspull_ingest::{extract_translation, Translation};
use std::fs::File;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_mitochondrial_record_header() {
    let file = File::open(fixture_path("homo_sapiens_mt.gb")).unwrap();
    let records = GenbankParser::new().parse_all(file).unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.locus_name, "NC_012920");
    assert_eq!(record.sequence_length, 240);
    assert_eq!(record.topology, Some(Topology::Circular));
    assert_eq!(record.division_code.as_deref(), Some("MAM"));
    assert_eq!(record.accession_version, "NC_012920.1");
    assert_eq!(record.version_number, Some(1));
    assert_eq!(record.taxonomy.last().map(String::as_str), Some("Homo"));
    assert_eq!(record.sequence.len(), 240);
    assert!(record.sequence.starts_with("ATGACCCACC"));
}

#[test]
fn test_mitochondrial_record_features() {
    let text = std::fs::read_to_string(fixture_path("homo_sapiens_mt.gb")).unwrap();
    let record = GenbankParser::new().parse_single(&text).unwrap();

    let types: Vec<&str> = record
        .features
        .iter()
        .map(|f| f.feature_type.as_str())
        .collect();
    assert_eq!(types, ["source", "gene", "CDS", "tRNA", "gene", "CDS"]);

    let cox3 = record.cds_features().nth(1).unwrap();
    assert_eq!(cox3.location, "join(181..220,221..240)");
    assert_eq!(
        cox3.first_qualifier("note"),
        Some("TAA stop codon is completed by the addition of 3' A residues to the mRNA")
    );
    assert_eq!(cox3.first_qualifier("codon_start"), Some("1"));

    // Wrapped translations are joined without separators
    let translation = cox3.first_qualifier("translation").unwrap();
    assert_eq!(translation.len(), 261);
    assert!(!translation.contains(char::is_whitespace));
}

#[test]
fn test_concatenated_records_extract_independently() {
    let mut text = std::fs::read_to_string(fixture_path("homo_sapiens_mt.gb")).unwrap();
    text.push_str(&std::fs::read_to_string(fixture_path("lemur_catta_partial.gb")).unwrap());

    let records = GenbankParser::new().parse_all(text.as_bytes()).unwrap();
    assert_eq!(records.len(), 2);

    let human = extract_translation(&records[0], "COX3").unwrap();
    assert!(human.is_sequence());

    let lemur = extract_translation(&records[1], "COX3");
    assert_eq!(lemur, Some(Translation::Unavailable));
    assert!(records[1].cds_features().next().unwrap().has_qualifier("pseudo"));

    // parse_single refuses multi-record input
    assert!(GenbankParser::new().parse_single(&text).is_err());
}
