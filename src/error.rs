use std::path::PathBuf;

/// Errors surfaced by collection, table I/O and comparison.
///
/// Data-quality issues inside a log (a pattern that never matched, a degenerate
/// timing) are not errors; they show up as absent cells or sentinels instead.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// Reading or writing a file or directory failed.
    #[error("io error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A log path does not decompose into group/instance/sample.
    #[error("malformed identity for {path}: {reason}")]
    MalformedIdentity {
        /// Offending log path.
        path: PathBuf,
        /// Why the decomposition failed.
        reason: String,
    },
    /// The results root contained no log files.
    #[error("no log files found under {0}")]
    EmptyResults(PathBuf),
    /// A table is missing a column required by the requested operation.
    #[error("table {path} has no column {column:?}")]
    MissingColumn {
        /// Table path.
        path: PathBuf,
        /// Name of the missing column.
        column: String,
    },
    /// A numeric cell could not be parsed.
    #[error("invalid value {value:?} in {path} row {row} column {column:?}")]
    InvalidCell {
        /// Table path.
        path: PathBuf,
        /// Zero-based data row.
        row: usize,
        /// Column header.
        column: String,
        /// Raw cell text.
        value: String,
    },
    /// CSV encoding or decoding failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// JSON encoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BenchError>;
