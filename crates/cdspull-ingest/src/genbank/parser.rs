// GenBank flat file parser
//
// Parses GenBank flat file text (efetch rettype=gb) into GenbankRecord structs.
// Format documentation: https://www.ncbi.nlm.nih.gov/Sitemap/samplerecord.html

use super::models::{Feature, GenbankRecord, Topology};
use cdspull_common::{PullError, Result};
use std::io::{BufRead, BufReader, Read};

/// Column where feature locations and qualifiers start (0-based)
const QUALIFIER_COLUMN: usize = 21;

/// Indentation of header continuation lines (DEFINITION, ORGANISM lineage)
const HEADER_CONTINUATION: &str = "            ";

#[derive(Debug, Default, Clone, Copy)]
pub struct GenbankParser;

impl GenbankParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse all records from a reader
    ///
    /// Records are terminated by a `//` line. Any record that fails to parse
    /// fails the whole call.
    pub fn parse_all<R: Read>(&self, reader: R) -> Result<Vec<GenbankRecord>> {
        let buf_reader = BufReader::new(reader);
        let mut records = Vec::new();
        let mut current_lines: Vec<String> = Vec::new();

        for line in buf_reader.lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');

            if line.starts_with("//") {
                if has_content(&current_lines) {
                    records.push(self.parse_record(&current_lines)?);
                }
                current_lines.clear();
            } else {
                current_lines.push(line.to_string());
            }
        }

        if has_content(&current_lines) {
            return Err(PullError::parse(
                "Unterminated GenBank record (missing '//' line)",
            ));
        }

        Ok(records)
    }

    /// Parse text that must hold exactly one record
    pub fn parse_single(&self, text: &str) -> Result<GenbankRecord> {
        let mut records = self.parse_all(text.as_bytes())?;
        match records.len() {
            1 => Ok(records.remove(0)),
            0 => Err(PullError::parse("No GenBank record found")),
            n => Err(PullError::parse(format!(
                "Expected a single GenBank record, found {}",
                n
            ))),
        }
    }

    /// Parse a single record from lines
    fn parse_record(&self, lines: &[String]) -> Result<GenbankRecord> {
        let mut record = GenbankRecord::default();
        let mut saw_locus = false;

        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];

            if line.starts_with("LOCUS") {
                Self::parse_locus(line, &mut record)?;
                saw_locus = true;
            } else if line.starts_with("DEFINITION") {
                i = Self::parse_definition(lines, i, &mut record);
            } else if line.starts_with("ACCESSION") {
                Self::parse_accession(line, &mut record);
            } else if line.starts_with("VERSION") {
                Self::parse_version(line, &mut record);
            } else if line.starts_with("  ORGANISM") {
                i = Self::parse_organism(lines, i, &mut record);
            } else if line.starts_with("FEATURES") {
                i = Self::parse_features(lines, i, &mut record)?;
            } else if line.starts_with("ORIGIN") {
                i = Self::parse_origin(lines, i, &mut record);
            }

            i += 1;
        }

        if !saw_locus {
            return Err(PullError::parse("GenBank record has no LOCUS line"));
        }

        Ok(record)
    }

    /// Parse LOCUS line
    /// Format: LOCUS       NC_012920              16569 bp    DNA     circular PRI 14-NOV-2023
    fn parse_locus(line: &str, record: &mut GenbankRecord) -> Result<()> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(PullError::parse(format!("Invalid LOCUS line: {}", line)));
        }

        record.locus_name = parts[1].to_string();

        if let Some(length) = parts.get(2) {
            record.sequence_length = length
                .parse()
                .map_err(|_| PullError::parse(format!("Invalid sequence length in: {}", line)))?;
        }

        if let Some(molecule) = parts.get(4) {
            record.molecule_type = molecule.to_string();
        }

        for part in parts.iter().skip(5) {
            match part.to_lowercase().as_str() {
                "linear" => record.topology = Some(Topology::Linear),
                "circular" => record.topology = Some(Topology::Circular),
                _ if part.contains('-') => record.modification_date = Some(part.to_string()),
                _ if part.len() == 3 && part.chars().all(|c| c.is_ascii_uppercase()) => {
                    record.division_code = Some(part.to_string())
                },
                _ => {},
            }
        }

        Ok(())
    }

    /// Parse DEFINITION (can span multiple lines)
    fn parse_definition(lines: &[String], start: usize, record: &mut GenbankRecord) -> usize {
        let mut parts = Vec::new();

        if let Some(first) = lines[start].strip_prefix("DEFINITION") {
            parts.push(first.trim().to_string());
        }

        let mut i = start + 1;
        while i < lines.len() && lines[i].starts_with(HEADER_CONTINUATION) {
            parts.push(lines[i].trim().to_string());
            i += 1;
        }

        record.definition = parts.join(" ");
        i - 1
    }

    /// Parse ACCESSION line; secondary accessions are ignored
    fn parse_accession(line: &str, record: &mut GenbankRecord) {
        if let Some(acc) = line
            .strip_prefix("ACCESSION")
            .and_then(|rest| rest.split_whitespace().next())
        {
            record.accession = acc.to_string();
        }
    }

    /// Parse VERSION line
    /// Format: VERSION     NC_012920.1
    fn parse_version(line: &str, record: &mut GenbankRecord) {
        let Some(versioned) = line
            .strip_prefix("VERSION")
            .and_then(|rest| rest.split_whitespace().next())
        else {
            return;
        };

        record.accession_version = versioned.to_string();
        record.version_number = versioned
            .rsplit_once('.')
            .and_then(|(_, v)| v.parse().ok());
    }

    /// Parse ORGANISM section (includes taxonomy lineage)
    fn parse_organism(lines: &[String], start: usize, record: &mut GenbankRecord) -> usize {
        if let Some(org) = lines[start].strip_prefix("  ORGANISM") {
            record.organism = Some(org.trim().to_string());
        }

        let mut i = start + 1;
        let mut taxonomy = Vec::new();
        while i < lines.len() && lines[i].starts_with(HEADER_CONTINUATION) {
            let tax_line = lines[i].trim().trim_end_matches('.');
            taxonomy.extend(
                tax_line
                    .split(';')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
            );
            i += 1;
        }

        record.taxonomy = taxonomy;
        i - 1
    }

    /// Parse FEATURES section
    ///
    /// Feature keys sit in columns 6-21; locations, qualifiers and their
    /// continuations start at column 22. The section ends at the first line
    /// that does not start with a space.
    fn parse_features(lines: &[String], start: usize, record: &mut GenbankRecord) -> Result<usize> {
        let mut i = start + 1; // Skip "FEATURES             Location/Qualifiers"
        let mut feature: Option<Feature> = None;
        let mut qualifier: Option<(String, String)> = None;

        while i < lines.len() {
            let line = &lines[i];

            if !line.starts_with(' ') {
                break;
            }
            if line.trim().is_empty() {
                i += 1;
                continue;
            }

            let (key_columns, body) = split_at_column(line, QUALIFIER_COLUMN);
            let body = body.trim();

            if !key_columns.trim().is_empty() {
                Self::finish_feature(&mut feature, &mut qualifier, record)?;
                let (feature_type, location) = Self::parse_feature_header(line)?;
                feature = Some(Feature::new(feature_type, location));
            } else if let Some((_, value)) = qualifier.as_mut().filter(|q| is_open_quote(&q.1)) {
                value.push('\n');
                value.push_str(body);
            } else if let Some(rest) = body.strip_prefix('/') {
                Self::finish_qualifier(&mut feature, &mut qualifier)?;
                qualifier = Some(match rest.split_once('=') {
                    Some((key, value)) => (key.to_string(), value.to_string()),
                    None => (rest.to_string(), String::new()),
                });
            } else if let Some((_, value)) = qualifier.as_mut() {
                value.push('\n');
                value.push_str(body);
            } else if let Some(current) = feature.as_mut() {
                // Location continued over several lines
                current.location.push_str(body);
            } else {
                return Err(PullError::parse(format!(
                    "Feature table line outside of any feature: {}",
                    line
                )));
            }

            i += 1;
        }

        Self::finish_feature(&mut feature, &mut qualifier, record)?;
        Ok(i - 1)
    }

    /// Parse feature header line
    /// Format: "     CDS             9207..9990"
    fn parse_feature_header(line: &str) -> Result<(String, String)> {
        let trimmed = line.trim();
        let mut parts = trimmed.splitn(2, char::is_whitespace);

        match (parts.next(), parts.next()) {
            (Some(feature_type), Some(location)) if !location.trim().is_empty() => {
                Ok((feature_type.to_string(), location.trim().to_string()))
            },
            _ => Err(PullError::parse(format!("Invalid feature header: {}", line))),
        }
    }

    fn finish_feature(
        feature: &mut Option<Feature>,
        qualifier: &mut Option<(String, String)>,
        record: &mut GenbankRecord,
    ) -> Result<()> {
        Self::finish_qualifier(feature, qualifier)?;
        if let Some(done) = feature.take() {
            record.features.push(done);
        }
        Ok(())
    }

    fn finish_qualifier(
        feature: &mut Option<Feature>,
        qualifier: &mut Option<(String, String)>,
    ) -> Result<()> {
        let Some((key, raw)) = qualifier.take() else {
            return Ok(());
        };

        if is_open_quote(&raw) {
            return Err(PullError::parse(format!(
                "Unterminated quoted value for /{}",
                key
            )));
        }

        let current = feature
            .as_mut()
            .ok_or_else(|| PullError::parse(format!("Qualifier /{} outside of a feature", key)))?;
        let value = Self::normalize_qualifier_value(&key, &raw);
        current.add_qualifier(key, value);
        Ok(())
    }

    /// Join continuation lines and strip quoting
    ///
    /// Continuation lines are separated by `\n` in `raw`. Translations are
    /// concatenated, everything else is joined with a single space.
    fn normalize_qualifier_value(key: &str, raw: &str) -> String {
        let separator = if key == "translation" { "" } else { " " };
        let joined = raw
            .split('\n')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(separator);

        match joined
            .strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
        {
            Some(inner) => inner.replace("\"\"", "\""),
            None => joined,
        }
    }

    /// Parse ORIGIN section (sequence data)
    fn parse_origin(lines: &[String], start: usize, record: &mut GenbankRecord) -> usize {
        let mut i = start + 1; // Skip "ORIGIN" line
        let mut sequence = String::new();

        while i < lines.len() {
            let line = &lines[i];

            // Sequence lines start with a base position
            if !line.trim_start().starts_with(|c: char| c.is_ascii_digit()) {
                break;
            }

            sequence.extend(
                line.chars()
                    .filter(|c| c.is_ascii_alphabetic())
                    .map(|c| c.to_ascii_uppercase()),
            );
            i += 1;
        }

        record.sequence = sequence;
        i - 1
    }
}

fn has_content(lines: &[String]) -> bool {
    lines.iter().any(|l| !l.trim().is_empty())
}

/// A value opened with `"` stays open while its quote count is odd
/// (embedded quotes are doubled).
fn is_open_quote(value: &str) -> bool {
    value.starts_with('"') && value.matches('"').count() % 2 == 1
}

/// Split a line at a character column, tolerating short lines
fn split_at_column(line: &str, column: usize) -> (&str, &str) {
    match line.char_indices().nth(column) {
        Some((idx, _)) => line.split_at(idx),
        None => (line, ""),
    }
}
