//! E-utilities endpoint and query builders

/// Public E-utilities service
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Database searched for accession ids
pub const SEARCH_DATABASE: &str = "nucleotide";

/// Database records are fetched from
pub const FETCH_DATABASE: &str = "nuccore";

/// efetch return type for GenBank flat files
pub const GENBANK_RETTYPE: &str = "gb";

/// efetch return mode for GenBank flat files
pub const TEXT_RETMODE: &str = "text";

/// Build esearch endpoint URL
pub fn esearch_url(base_url: &str) -> String {
    format!("{}/esearch.fcgi", base_url.trim_end_matches('/'))
}

/// Build efetch endpoint URL
pub fn efetch_url(base_url: &str) -> String {
    format!("{}/efetch.fcgi", base_url.trim_end_matches('/'))
}

/// Conjunctive organism + gene filter
pub fn search_term(species: &str, gene: &str) -> String {
    format!("{}[Organism] AND {}[Gene]", species, gene)
}
