//! Reader for the daily regions dump.
//!
//! The dump is a gzip-compressed XML document listing every region in the
//! order the world updates them. Only the name, nation count, and delegate
//! endorsements are kept; everything else in each `<REGION>` is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use augur_core::RegionRecord;
use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::info;

use crate::error::FeedError;

#[derive(Debug, Deserialize)]
struct RegionsDoc {
    #[serde(rename = "REGION", default)]
    regions: Vec<RegionDoc>,
}

#[derive(Debug, Deserialize)]
struct RegionDoc {
    #[serde(rename = "NAME")]
    name: String,
    #[serde(rename = "NUMNATIONS")]
    population: String,
    #[serde(rename = "DELEGATEVOTES", default)]
    endorsements: Option<String>,
}

impl RegionDoc {
    fn into_record(self, position: usize) -> Result<RegionRecord, FeedError> {
        let population = parse_count(&self.population).ok_or_else(|| {
            FeedError::data(format!(
                "region {:?} (#{position}) has bad NUMNATIONS {:?}",
                self.name, self.population
            ))
        })?;
        let endorsements = match self.endorsements.as_deref() {
            None => 0,
            Some(raw) => parse_count(raw).ok_or_else(|| {
                FeedError::data(format!(
                    "region {:?} (#{position}) has bad DELEGATEVOTES {raw:?}",
                    self.name
                ))
            })?,
        };
        Ok(RegionRecord {
            name: self.name.trim().to_owned(),
            population,
            endorsements,
        })
    }
}

fn parse_count(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

/// Parse an uncompressed regions document into records, in file order.
///
/// # Errors
///
/// Returns [`FeedError::Data`] if the XML is malformed or any region has a
/// non-numeric count. A single bad region fails the whole dump.
pub fn parse_regions<R: BufRead>(reader: R) -> Result<Vec<RegionRecord>, FeedError> {
    let doc: RegionsDoc = quick_xml::de::from_reader(reader)?;
    doc.regions
        .into_iter()
        .enumerate()
        .map(|(position, region)| region.into_record(position))
        .collect()
}

/// Read and parse a gzip-compressed regions dump from disk.
///
/// This is blocking I/O; async callers should run it on a blocking thread.
///
/// # Errors
///
/// Returns [`FeedError::Io`] if the file cannot be opened, or
/// [`FeedError::Data`] if it cannot be decompressed or parsed.
pub fn load_regions_dump(path: &Path) -> Result<Vec<RegionRecord>, FeedError> {
    let file = File::open(path)?;
    let records = parse_regions(BufReader::new(GzDecoder::new(file)))?;
    info!(
        path = %path.display(),
        regions = records.len(),
        "regions dump loaded"
    );
    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DUMP: &str = r"<REGIONS>
<REGION><NAME>The Pacific</NAME><FACTBOOK>Welcome</FACTBOOK><NUMNATIONS>12</NUMNATIONS>
<NATIONS>a:b</NATIONS><DELEGATEVOTES>5</DELEGATEVOTES>
<OFFICERS><OFFICER><NATION>a</NATION><AUTHORITY>XBC</AUTHORITY></OFFICER></OFFICERS></REGION>
<REGION><NAME>Lazarus</NAME><NUMNATIONS>0</NUMNATIONS><DELEGATEVOTES>0</DELEGATEVOTES></REGION>
<REGION><NAME>Osiris</NAME><NUMNATIONS>30</NUMNATIONS></REGION>
</REGIONS>";

    #[test]
    fn parses_records_in_file_order() {
        let records = parse_regions(DUMP.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![
                RegionRecord {
                    name: "The Pacific".to_owned(),
                    population: 12,
                    endorsements: 5,
                },
                RegionRecord {
                    name: "Lazarus".to_owned(),
                    population: 0,
                    endorsements: 0,
                },
                RegionRecord {
                    name: "Osiris".to_owned(),
                    population: 30,
                    endorsements: 0,
                },
            ]
        );
    }

    #[test]
    fn bad_count_fails_whole_dump() {
        let xml = "<REGIONS><REGION><NAME>A</NAME><NUMNATIONS>1</NUMNATIONS></REGION>\
                   <REGION><NAME>B</NAME><NUMNATIONS>-4</NUMNATIONS></REGION></REGIONS>";
        let err = parse_regions(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, FeedError::Data { .. }));
    }

    #[test]
    fn missing_name_fails() {
        let xml = "<REGIONS><REGION><NUMNATIONS>1</NUMNATIONS></REGION></REGIONS>";
        assert!(parse_regions(xml.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_regions_dump(Path::new("/nonexistent/regions.xml.gz")).unwrap_err();
        assert!(matches!(err, FeedError::Io { .. }));
    }
}
