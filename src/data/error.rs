use thiserror::Error;

/// Errors raised by the data layer (loading, column lookup, aggregation).
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("no header row found after skipping {0} rows")]
    MissingHeader(usize),

    #[error("row {row}: expected {expected} fields but found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("expected a JSON array of objects: {0}")]
    JsonShape(String),
}
