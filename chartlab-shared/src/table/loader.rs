/// Table loader: parse an uploaded file into a [`Table`]
///
/// Dispatch is by lowercased extension:
/// * `.csv`: delimited text via the `csv` crate
/// * `.xls` / `.xlsx`: binary workbooks via `calamine`
///
/// Anything else fails with [`TableError::Unsupported`]; unreadable or
/// malformed content fails with [`TableError::Parse`] carrying the cause.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use super::error::TableError;
use super::model::{CellValue, Table};

/// Loads a table from a file, dispatching on its extension
pub fn load_table(path: &Path) -> Result<Table, TableError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "xls" | "xlsx" => load_workbook(path)?,
        other => return Err(TableError::Unsupported(other.to_string())),
    };

    debug!(
        "Loaded {} ({} columns, {} rows)",
        path.display(),
        table.columns().len(),
        table.row_count()
    );

    Ok(table)
}

/// Checks whether a filename's extension is in the upload allow-list
pub fn is_supported_extension(filename: &str) -> bool {
    matches!(
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("csv" | "xls" | "xlsx")
    )
}

fn load_csv(path: &Path) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| TableError::Parse(e.to_string()))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| TableError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| TableError::Parse(e.to_string()))?;
        rows.push(record.iter().map(CellValue::parse).collect());
    }

    Ok(Table::new(columns, rows))
}

fn load_workbook(path: &Path) -> Result<Table, TableError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| TableError::Parse(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::Parse("workbook has no sheets".to_string()))?
        .map_err(|e| TableError::Parse(e.to_string()))?;

    let mut row_iter = range.rows();

    // First row is the header, matching how the original files are laid out
    let columns: Vec<String> = match row_iter.next() {
        Some(header) => header.iter().map(|c| c.to_string()).collect(),
        None => return Ok(Table::new(Vec::new(), Vec::new())),
    };

    let rows: Vec<Vec<CellValue>> = row_iter
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(Table::new(columns, rows))
}

/// Maps a calamine cell onto a [`CellValue`]
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        // Dates are kept as their spreadsheet serial number
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("{:?}", e)),
    }
}
