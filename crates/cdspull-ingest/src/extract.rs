//! Feature-table translation lookup
//!
//! Three outcomes are kept apart:
//!
//! - `Some(Translation::Sequence(..))`: matching CDS with a `/translation`
//! - `Some(Translation::Unavailable)`: matching CDS without one
//! - `None`: no CDS annotated with the gene

use crate::genbank::GenbankRecord;
use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder reported for a matching CDS that carries no translation
pub const NO_TRANSLATION_SENTINEL: &str = "<No translation available>";

/// Translation recovered for one species
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Amino-acid sequence from the `/translation` qualifier
    Sequence(String),
    /// The gene is annotated but no translation is stored
    Unavailable,
}

impl Translation {
    /// The sequence, or the sentinel text for [`Translation::Unavailable`]
    pub fn as_str(&self) -> &str {
        match self {
            Translation::Sequence(seq) => seq,
            Translation::Unavailable => NO_TRANSLATION_SENTINEL,
        }
    }

    /// Character count of [`Translation::as_str`]
    ///
    /// The sentinel has a length too, which is what the summary report
    /// prints for it.
    pub fn len(&self) -> usize {
        self.as_str().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Translation::Sequence(_))
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Translation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Find the translation of `gene` in a record's feature table
///
/// Picks the first `CDS` feature, in file order, whose `/gene` values
/// contain `gene` exactly (case-sensitive, whole value).
pub fn extract_translation(record: &GenbankRecord, gene: &str) -> Option<Translation> {
    record
        .cds_features()
        .find(|feature| feature.qualifier_values("gene").iter().any(|g| g == gene))
        .map(|feature| match feature.first_qualifier("translation") {
            Some(seq) => Translation::Sequence(seq.to_string()),
            None => Translation::Unavailable,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genbank::Feature;

    fn cds(gene: &str, translation: Option<&str>) -> Feature {
        let feature = Feature::new("CDS", "1..10").with_qualifier("gene", gene);
        match translation {
            Some(t) => feature.with_qualifier("translation", t),
            None => feature,
        }
    }

    #[test]
    fn test_found() {
        let record = GenbankRecord::with_features(vec![cds("COX3", Some("MKT..."))]);
        assert_eq!(
            extract_translation(&record, "COX3"),
            Some(Translation::Sequence("MKT...".to_string()))
        );
    }

    #[test]
    fn test_no_features() {
        let record = GenbankRecord::with_features(vec![]);
        assert_eq!(extract_translation(&record, "COX3"), None);
    }

    #[test]
    fn test_no_cds_feature() {
        let record = GenbankRecord::with_features(vec![
            Feature::new("gene", "1..10").with_qualifier("gene", "COX3"),
            Feature::new("source", "1..100").with_qualifier("organism", "Homo sapiens"),
        ]);
        assert_eq!(extract_translation(&record, "COX3"), None);
    }

    #[test]
    fn test_missing_translation_gives_sentinel() {
        let record = GenbankRecord::with_features(vec![cds("COX3", None)]);
        let result = extract_translation(&record, "COX3");
        assert_eq!(result, Some(Translation::Unavailable));
        assert_eq!(result.unwrap().as_str(), "<No translation available>");
    }

    #[test]
    fn test_first_matching_cds_wins() {
        let record = GenbankRecord::with_features(vec![
            cds("COX1", Some("AAA")),
            cds("COX3", None),
            cds("COX3", Some("BBB")),
        ]);
        assert_eq!(
            extract_translation(&record, "COX3"),
            Some(Translation::Unavailable)
        );
    }

    #[test]
    fn test_gene_match_is_exact_and_case_sensitive() {
        let record = GenbankRecord::with_features(vec![
            cds("cox3", Some("lower")),
            cds("COX3a", Some("suffixed")),
            cds("MT-COX3", Some("prefixed")),
        ]);
        assert_eq!(extract_translation(&record, "COX3"), None);
    }

    #[test]
    fn test_any_gene_value_matches() {
        let feature = Feature::new("CDS", "1..10")
            .with_qualifier("gene", "COIII")
            .with_qualifier("gene", "COX3")
            .with_qualifier("translation", "MTH");
        let record = GenbankRecord::with_features(vec![feature]);
        assert_eq!(
            extract_translation(&record, "COX3").map(|t| t.to_string()),
            Some("MTH".to_string())
        );
    }

    #[test]
    fn test_cds_without_gene_qualifier_is_skipped() {
        let record = GenbankRecord::with_features(vec![
            Feature::new("CDS", "1..10").with_qualifier("translation", "NOPE"),
            cds("COX3", Some("YES")),
        ]);
        assert_eq!(
            extract_translation(&record, "COX3"),
            Some(Translation::Sequence("YES".to_string()))
        );
    }

    #[test]
    fn test_translation_len_and_serialization() {
        assert_eq!(Translation::Unavailable.len(), 26);
        assert_eq!(Translation::Sequence("MKT".to_string()).len(), 3);
        assert!(Translation::Sequence(String::new()).is_empty());

        let json = serde_json::to_string(&Translation::Unavailable).unwrap();
        assert_eq!(json, "\"<No translation available>\"");
    }
}
