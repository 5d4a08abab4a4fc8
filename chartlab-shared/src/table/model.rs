/// In-memory table model
///
/// A [`Table`] is an ordered list of named columns plus rows of scalar
/// cells. No schema is assumed: every cell is independently a number, a
/// piece of text, or empty, whatever the source file declared.

use serde::{Deserialize, Serialize};

/// A single scalar cell value
///
/// Serializes untagged, so a `Number` becomes a JSON number, `Text` a
/// string, and `Empty` null, which is what chart frontends expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing cell
    Empty,

    /// Numeric cell (all numbers are kept as f64, like a spreadsheet)
    Number(f64),

    /// Textual cell
    Text(String),
}

impl CellValue {
    /// Parses a raw text field from a delimited file
    ///
    /// Empty fields become [`CellValue::Empty`]; fields that parse as a
    /// finite number become [`CellValue::Number`]; everything else stays
    /// text (so "NaN" and "inf" are treated as words, not numbers).
    pub fn parse(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(field.to_string()),
        }
    }

    /// Numeric view of the cell, if it has one
    ///
    /// `Text` that parses as a number converts; `Empty` has no numeric
    /// view and returns `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Empty => None,
        }
    }

    /// String form of the cell, as rendered on the x axis and in text
    /// filters. `Empty` renders as the empty string; whole-number floats
    /// render without a trailing `.0` ("1", not "1.0").
    pub fn to_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// JSON form used in row previews, where missing cells normalize to
    /// an empty string rather than null
    pub fn to_preview_json(&self) -> serde_json::Value {
        match self {
            CellValue::Empty => serde_json::Value::String(String::new()),
            other => other.to_json(),
        }
    }

    /// JSON form used in chart series: numbers stay numbers, `Empty` is
    /// null
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Empty => serde_json::Value::Null,
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// Renders a float the way a spreadsheet displays it
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// An ephemeral in-memory table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Builds a table, padding short rows with `Empty` so every row has
    /// exactly one cell per column
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
            row.truncate(width);
        }
        Self { columns, rows }
    }

    /// Column names, in source order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterates over rows as cell slices
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Position of a named column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copies out the rows flagged `true`, preserving order
    pub fn retain_rows(&self, keep: &[bool]) -> Table {
        debug_assert_eq!(keep.len(), self.rows.len());
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(row, _)| row.clone())
                .collect(),
        }
    }

    /// First `limit` rows as JSON objects keyed by column name, with
    /// missing cells rendered as empty strings
    pub fn preview(&self, limit: usize) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| {
                let obj: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(col, cell)| (col.clone(), cell.to_preview_json()))
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect()
    }
}
