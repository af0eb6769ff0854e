// Data models for GenBank records

use std::collections::HashMap;

/// Feature type tag of coding-sequence features
pub const CDS_FEATURE: &str = "CDS";

/// Molecule topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Linear,
    Circular,
}

/// One entry of the feature table
///
/// Qualifiers map a name to every value it was given, in file order; a
/// `/gene` qualifier may legitimately repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feature {
    pub feature_type: String, // "source", "gene", "CDS", "tRNA", ...
    pub location: String,     // e.g. "9207..9990" or "complement(1..50)"
    pub qualifiers: HashMap<String, Vec<String>>,
}

impl Feature {
    pub fn new(feature_type: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            feature_type: feature_type.into(),
            location: location.into(),
            qualifiers: HashMap::new(),
        }
    }

    /// Builder-style qualifier append
    pub fn with_qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_qualifier(key, value);
        self
    }

    pub fn add_qualifier(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.qualifiers
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// All values of a qualifier; empty when the qualifier is absent
    pub fn qualifier_values(&self, key: &str) -> &[String] {
        self.qualifiers.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of a qualifier
    pub fn first_qualifier(&self, key: &str) -> Option<&str> {
        self.qualifier_values(key).first().map(String::as_str)
    }

    pub fn has_qualifier(&self, key: &str) -> bool {
        self.qualifiers.contains_key(key)
    }

    pub fn is_cds(&self) -> bool {
        self.feature_type == CDS_FEATURE
    }
}

/// Complete GenBank record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenbankRecord {
    // LOCUS line
    pub locus_name: String,
    pub sequence_length: u64,
    pub molecule_type: String, // DNA, mRNA, ...
    pub topology: Option<Topology>,
    pub division_code: Option<String>, // PRI, MAM, ROD, ...
    pub modification_date: Option<String>,

    pub definition: String,
    pub accession: String,
    pub accession_version: String,
    pub version_number: Option<u32>, // "NC_012920.1" -> 1

    // SOURCE/ORGANISM
    pub organism: Option<String>,
    pub taxonomy: Vec<String>,

    // FEATURES, in file order
    pub features: Vec<Feature>,

    // ORIGIN
    pub sequence: String,
}

impl GenbankRecord {
    /// Record holding only a feature table
    pub fn with_features(features: Vec<Feature>) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }

    /// Coding-sequence features in file order
    pub fn cds_features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|f| f.is_cds())
    }

    /// Versioned accession when present, otherwise the locus name
    pub fn display_id(&self) -> &str {
        if !self.accession_version.is_empty() {
            &self.accession_version
        } else if !self.accession.is_empty() {
            &self.accession
        } else {
            &self.locus_name
        }
    }
}
