use thiserror::Error;

#[derive(Debug, Error)]
pub enum CentroidError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("centroid file is empty")]
    Empty,

    #[error("no header line found (expected a '#'-prefixed column list before the data rows)")]
    MissingHeader,

    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
}
