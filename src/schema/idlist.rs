//! Codec for the serialized ID-list TEXT columns.
//!
//! Several tables store lists of row IDs as a single comma-separated
//! TEXT value (`Stages.stations`, `Parts.defects`, `Models.parts` and
//! friends). This module is the one place that format is written and
//! parsed, so sync code never string-splits by hand.

use thiserror::Error;

/// A value that could not be parsed out of a serialized ID list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdListError {
    #[error("Invalid ID in serialized list: {0:?}")]
    InvalidId(String),
}

/// Serialize a list of row IDs into the column format.
///
/// An empty slice encodes as the empty string.
pub fn encode(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a serialized ID list back into row IDs.
///
/// Tolerates surrounding whitespace and empty segments, so `""`,
/// `"1, 2"` and `"1,,2"` all parse. Anything non-numeric is an error.
pub fn decode(raw: &str) -> Result<Vec<i64>, IdListError> {
    let mut ids = Vec::new();
    for segment in raw.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let id = segment
            .parse::<i64>()
            .map_err(|_| IdListError::InvalidId(segment.to_string()))?;
        ids.push(id);
    }
    Ok(ids)
}
