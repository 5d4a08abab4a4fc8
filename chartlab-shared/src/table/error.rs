//! Error type for the table engine.

/// Failures while loading, filtering, or projecting a table
///
/// All variants are client errors at the HTTP boundary; none are fatal.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// File unreadable or malformed; carries the underlying cause text
    #[error("unable to read file: {0}")]
    Parse(String),

    /// Extension outside the csv/xls/xlsx allow-list
    #[error("unsupported file extension: .{0}")]
    Unsupported(String),

    /// A range predicate hit a cell that cannot convert to a number.
    /// The whole request fails rather than skipping the row.
    #[error("filtering error: column '{column}' has non-numeric value '{value}'")]
    Filter { column: String, value: String },

    /// A requested column is absent from the table
    #[error("unknown column: {0}")]
    ColumnNotFound(String),
}
