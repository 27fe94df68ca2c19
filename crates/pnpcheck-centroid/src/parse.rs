use std::path::Path;

use indexmap::IndexMap;

use crate::error::CentroidError;
use crate::record::{Field, PlacementRecord};

const COMMENT_MARKER: char = '#';

/// Reads and parses a centroid file from disk.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<PlacementRecord>, CentroidError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| CentroidError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_str(&contents)
}

/// Parses centroid file contents into placement records.
///
/// The last `#`-prefixed line before the data rows is the header; its
/// whitespace-separated tokens (marker stripped) name the columns. Data rows
/// are zipped positionally against the header, each token becoming numeric or
/// text depending on whether it parses as a float. A `#`-prefixed line inside
/// the data section ends parsing (trailing comment block); lines that start
/// with whitespace are continuation noise and are skipped.
pub fn parse_str(input: &str) -> Result<Vec<PlacementRecord>, CentroidError> {
    if input.trim().is_empty() {
        return Err(CentroidError::Empty);
    }

    let mut header: Option<Vec<String>> = None;
    let mut in_data = false;
    let mut records = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        if raw.is_empty() || raw.starts_with(char::is_whitespace) {
            continue;
        }

        if raw.starts_with(COMMENT_MARKER) {
            if in_data {
                break;
            }
            // Last comment line before the data wins; a bare "#" separator
            // does not clobber an already-seen column list.
            let columns: Vec<String> = raw
                .trim_start_matches(COMMENT_MARKER)
                .split_whitespace()
                .map(str::to_string)
                .collect();
            if !columns.is_empty() {
                header = Some(columns);
            }
            continue;
        }

        in_data = true;
        let header = header.as_ref().ok_or(CentroidError::MissingHeader)?;

        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() < header.len() {
            return Err(CentroidError::ColumnMismatch {
                line: idx + 1,
                expected: header.len(),
                found: tokens.len(),
            });
        }

        let mut fields = IndexMap::with_capacity(header.len());
        for (name, &token) in header.iter().zip(&tokens) {
            fields.insert(name.clone(), Field::from_token(token));
        }
        records.push(PlacementRecord::new(fields));
    }

    if header.is_none() {
        return Err(CentroidError::MissingHeader);
    }

    Ok(records)
}
