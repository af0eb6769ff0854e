//! E-utilities response types

use cdspull_common::{PullError, Result};
use serde::Deserialize;

/// `eSearchResult` document returned by esearch
#[derive(Debug, Deserialize)]
struct ESearchResult {
    #[serde(rename = "Count", default)]
    count: Option<u64>,

    #[serde(rename = "IdList", default)]
    id_list: Option<IdList>,

    #[serde(rename = "ERROR", default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IdList {
    #[serde(rename = "Id", default)]
    ids: Vec<String>,
}

/// Parsed esearch answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    /// Total number of matches on the server (may exceed `ids.len()`)
    pub count: u64,
    /// Returned ids in server order
    pub ids: Vec<String>,
}

impl SearchResponse {
    /// Parse esearch XML
    ///
    /// An `<ERROR>` element is reported as a network error carrying the
    /// service message.
    pub fn parse(xml: &str) -> Result<Self> {
        let result: ESearchResult = quick_xml::de::from_str(xml)
            .map_err(|e| PullError::parse(format!("Failed to parse esearch XML: {}", e)))?;

        if let Some(message) = result.error {
            return Err(PullError::network(format!(
                "E-utilities search error: {}",
                message.trim()
            )));
        }

        let ids: Vec<String> = result
            .id_list
            .unwrap_or_default()
            .ids
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        Ok(Self {
            count: result.count.unwrap_or(ids.len() as u64),
            ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_esearch_ids_in_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" ?>
<!DOCTYPE eSearchResult PUBLIC "-//NLM//DTD esearch 20060628//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20060628/esearch.dtd">
<eSearchResult><Count>57</Count><RetMax>2</RetMax><RetStart>0</RetStart><IdList>
<Id>2613484107</Id>
<Id>1835931409</Id>
</IdList><TranslationSet/><QueryTranslation>"Homo sapiens"[Organism] AND COX3[Gene]</QueryTranslation></eSearchResult>
"#;
        let response = SearchResponse::parse(xml).unwrap();
        assert_eq!(response.count, 57);
        assert_eq!(response.ids, ["2613484107", "1835931409"]);
    }

    #[test]
    fn test_parse_esearch_empty() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" ?>
<eSearchResult><Count>0</Count><RetMax>0</RetMax><RetStart>0</RetStart><IdList/><TranslationSet/></eSearchResult>"#;
        let response = SearchResponse::parse(xml).unwrap();
        assert_eq!(response.count, 0);
        assert!(response.ids.is_empty());
    }

    #[test]
    fn test_parse_esearch_error_element() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" ?>
<eSearchResult><ERROR>Invalid db name specified: nucleotid</ERROR></eSearchResult>"#;
        let err = SearchResponse::parse(xml).unwrap_err();
        assert!(matches!(err, PullError::Network(_)));
        assert!(err.to_string().contains("Invalid db name"));
    }

    #[test]
    fn test_parse_esearch_garbage() {
        let err = SearchResponse::parse("").unwrap_err();
        assert!(matches!(err, PullError::Parse(_)));
    }
}
