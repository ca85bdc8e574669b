use thiserror::Error;

/// Failures in the table model and report pipeline.
///
/// I/O and parse failures travel as `anyhow::Error` with context attached;
/// these are the conditions the pipeline itself detects.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("dataset has {found} column(s) but at least {needed} are required")]
    TooFewColumns { needed: usize, found: usize },

    #[error("column {position} ('{name}') is {dtype}, expected a numeric column")]
    NonNumericColumn {
        position: usize,
        name: String,
        dtype: String,
    },

    #[error("column '{column}' has {found} values but {expected} were expected")]
    RaggedColumns {
        column: String,
        found: usize,
        expected: usize,
    },

    #[error("row {row} has {found} fields but the header has {expected}")]
    RowTooLong {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("dataset has {found} numeric column(s) but at least {needed} are required")]
    TooFewNumericColumns { needed: usize, found: usize },

    #[error("histogram needs between 1 and {max} bins")]
    InvalidBins { max: usize },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}
