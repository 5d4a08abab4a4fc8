/// Series extractor: project two columns into parallel x/y arrays
///
/// The x axis is always rendered as text; the y axis keeps each cell's
/// native scalar type so numeric data charts as numbers.

use super::error::TableError;
use super::model::{CellValue, Table};

/// Parallel x/y value arrays produced for rendering
///
/// Both vectors always have exactly one entry per table row.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// X values, stringified
    pub x: Vec<String>,

    /// Y values, native scalar type preserved
    pub y: Vec<CellValue>,
}

impl Series {
    /// Number of points in the series
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Extracts the named x and y columns from a (possibly filtered) table
///
/// # Errors
///
/// Returns [`TableError::ColumnNotFound`] if either column is absent.
pub fn extract_series(table: &Table, xcol: &str, ycol: &str) -> Result<Series, TableError> {
    let xi = table
        .column_index(xcol)
        .ok_or_else(|| TableError::ColumnNotFound(xcol.to_string()))?;
    let yi = table
        .column_index(ycol)
        .ok_or_else(|| TableError::ColumnNotFound(ycol.to_string()))?;

    let mut x = Vec::with_capacity(table.row_count());
    let mut y = Vec::with_capacity(table.row_count());
    for row in table.rows() {
        x.push(row[xi].to_display());
        y.push(row[yi].clone());
    }

    Ok(Series { x, y })
}
