//! Parsers for the small single-purpose API documents.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::FeedError;

#[derive(Debug, Deserialize)]
struct NationRegionDoc {
    #[serde(rename = "REGION")]
    region: String,
}

#[derive(Debug, Deserialize)]
struct RegionsByTagDoc {
    #[serde(rename = "REGIONS")]
    regions: Option<String>,
}

/// Extract the region name from a `nation=<id>&q=region` response.
///
/// # Errors
///
/// Returns [`FeedError::Data`] if the document has no non-empty `REGION`.
pub fn parse_nation_region(xml: &str) -> Result<String, FeedError> {
    let doc: NationRegionDoc = quick_xml::de::from_str(xml)?;
    let region = doc.region.trim();
    if region.is_empty() {
        return Err(FeedError::data("nation document has an empty REGION"));
    }
    Ok(region.to_owned())
}

/// Extract the comma-separated region list from a `regionsbytag` response.
///
/// Names are returned as the API gives them; the catalog normalises case
/// and underscores when matching.
///
/// # Errors
///
/// Returns [`FeedError::Data`] if the document is not a region list.
pub fn parse_region_list(xml: &str) -> Result<BTreeSet<String>, FeedError> {
    let doc: RegionsByTagDoc = quick_xml::de::from_str(xml)?;
    Ok(doc
        .regions
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
        .collect())
}
