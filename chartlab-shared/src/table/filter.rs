/// Filter engine: reduce a table with per-column predicates
///
/// A [`FilterSpec`] maps column names to predicates; a row survives only
/// if it passes ALL of them (logical AND). Every predicate is evaluated
/// against the original table and the verdicts are intersected, so the
/// result is the same whatever order the predicates arrive in.
///
/// The wire shape matches the chart frontend's config blob:
///
/// ```json
/// {
///   "age":    { "type": "range", "min": 18, "max": 65 },
///   "region": { "type": "text",  "text": "north" }
/// }
/// ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::TableError;
use super::model::{CellValue, Table};

/// A single per-column predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnFilter {
    /// Inclusive numeric range; either bound may be absent
    Range {
        min: Option<f64>,
        max: Option<f64>,
    },

    /// Case-insensitive substring match; an empty needle always passes
    Text {
        #[serde(default)]
        text: String,
    },

    /// Unrecognized predicate type; accepted and treated as a no-op
    /// rather than failing the request
    #[serde(other)]
    Ignored,
}

/// Per-column predicate map applied before charting
///
/// Columns absent from the table are silently ignored.
pub type FilterSpec = BTreeMap<String, ColumnFilter>;

/// Applies a filter specification, returning the reduced table
///
/// # Errors
///
/// A range predicate over a column containing text that cannot convert to
/// a number fails the whole call with [`TableError::Filter`]: a strict
/// all-or-nothing contract, not a per-row skip. Empty cells do not error;
/// they simply never satisfy a range bound.
pub fn apply_filters(table: &Table, filters: &FilterSpec) -> Result<Table, TableError> {
    let mut keep = vec![true; table.row_count()];

    for (column, filter) in filters {
        let Some(idx) = table.column_index(column) else {
            continue;
        };

        match filter {
            ColumnFilter::Range { min, max } => {
                if min.is_none() && max.is_none() {
                    continue;
                }

                // Convert the whole column up front: a single bad cell
                // fails the request even if other predicates would have
                // dropped its row, which keeps the outcome order-independent.
                let mut numeric = Vec::with_capacity(table.row_count());
                for row in table.rows() {
                    let n = match &row[idx] {
                        CellValue::Empty => f64::NAN,
                        cell => cell.as_f64().ok_or_else(|| TableError::Filter {
                            column: column.clone(),
                            value: cell.to_display(),
                        })?,
                    };
                    numeric.push(n);
                }

                for (flag, n) in keep.iter_mut().zip(&numeric) {
                    // NaN (empty cell) fails both comparisons
                    let pass = min.map_or(true, |m| *n >= m) && max.map_or(true, |m| *n <= m);
                    if !pass {
                        *flag = false;
                    }
                }
            }
            ColumnFilter::Text { text } => {
                if text.is_empty() {
                    continue;
                }
                let needle = text.to_lowercase();

                for (flag, row) in keep.iter_mut().zip(table.rows()) {
                    if !row[idx].to_display().to_lowercase().contains(&needle) {
                        *flag = false;
                    }
                }
            }
            ColumnFilter::Ignored => {}
        }
    }

    Ok(table.retain_rows(&keep))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pets_table() -> Table {
        Table::new(
            vec!["A".to_string(), "B".to_string()],
            vec![
                vec![CellValue::Number(1.0), CellValue::Text("cat".to_string())],
                vec![CellValue::Number(5.0), CellValue::Text("dog".to_string())],
                vec![
                    CellValue::Number(10.0),
                    CellValue::Text("cattle".to_string()),
                ],
            ],
        )
    }

    fn range(min: Option<f64>, max: Option<f64>) -> ColumnFilter {
        ColumnFilter::Range { min, max }
    }

    fn text(needle: &str) -> ColumnFilter {
        ColumnFilter::Text {
            text: needle.to_string(),
        }
    }

    #[test]
    fn test_range_min_only() {
        let mut spec = FilterSpec::new();
        spec.insert("A".to_string(), range(Some(2.0), None));

        let filtered = apply_filters(&pets_table(), &spec).unwrap();
        assert_eq!(filtered.row_count(), 2);
        let a: Vec<_> = filtered.rows().map(|r| r[0].clone()).collect();
        assert_eq!(a, vec![CellValue::Number(5.0), CellValue::Number(10.0)]);
    }

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let mut spec = FilterSpec::new();
        spec.insert("B".to_string(), text("CAT"));

        let filtered = apply_filters(&pets_table(), &spec).unwrap();
        let b: Vec<String> = filtered.rows().map(|r| r[1].to_display()).collect();
        assert_eq!(b, vec!["cat".to_string(), "cattle".to_string()]);
    }

    #[test]
    fn test_empty_needle_is_a_no_op() {
        let mut spec = FilterSpec::new();
        spec.insert("B".to_string(), text(""));

        let filtered = apply_filters(&pets_table(), &spec).unwrap();
        assert_eq!(filtered.row_count(), 3);
    }

    #[test]
    fn test_empty_spec_is_identity() {
        let table = pets_table();
        let filtered = apply_filters(&table, &FilterSpec::new()).unwrap();
        assert_eq!(filtered, table);
    }

    #[test]
    fn test_unknown_column_is_ignored() {
        let mut spec = FilterSpec::new();
        spec.insert("Z".to_string(), range(Some(0.0), None));

        let filtered = apply_filters(&pets_table(), &spec).unwrap();
        assert_eq!(filtered.row_count(), 3);
    }

    #[test]
    fn test_predicates_are_anded() {
        let mut spec = FilterSpec::new();
        spec.insert("A".to_string(), range(Some(2.0), None));
        spec.insert("B".to_string(), text("cat"));

        let filtered = apply_filters(&pets_table(), &spec).unwrap();
        // Only {A:10, B:"cattle"} passes both
        assert_eq!(filtered.row_count(), 1);
        assert_eq!(filtered.rows().next().unwrap()[0], CellValue::Number(10.0));
    }

    #[test]
    fn test_range_over_text_column_fails_whole_call() {
        let mut spec = FilterSpec::new();
        spec.insert("B".to_string(), range(Some(0.0), None));

        match apply_filters(&pets_table(), &spec) {
            Err(TableError::Filter { column, value }) => {
                assert_eq!(column, "B");
                assert_eq!(value, "cat");
            }
            other => panic!("expected Filter error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_cell_fails_range_without_error() {
        let table = Table::new(
            vec!["A".to_string()],
            vec![
                vec![CellValue::Number(3.0)],
                vec![CellValue::Empty],
            ],
        );
        let mut spec = FilterSpec::new();
        spec.insert("A".to_string(), range(Some(0.0), Some(10.0)));

        let filtered = apply_filters(&table, &spec).unwrap();
        assert_eq!(filtered.row_count(), 1);
    }

    #[test]
    fn test_numeric_text_converts_in_range() {
        let table = Table::new(
            vec!["A".to_string()],
            vec![vec![CellValue::Text("7".to_string())]],
        );
        let mut spec = FilterSpec::new();
        spec.insert("A".to_string(), range(Some(5.0), Some(10.0)));

        assert_eq!(apply_filters(&table, &spec).unwrap().row_count(), 1);
    }

    #[test]
    fn test_filter_spec_deserializes_from_frontend_shape() {
        let spec: FilterSpec = serde_json::from_str(
            r#"{
                "age":    { "type": "range", "min": 18 },
                "region": { "type": "text",  "text": "north" },
                "blank":  { "type": "text" }
            }"#,
        )
        .unwrap();

        assert_eq!(spec["age"], range(Some(18.0), None));
        assert_eq!(spec["region"], text("north"));
        assert_eq!(spec["blank"], text(""));
    }

    #[test]
    fn test_unrecognized_filter_type_is_a_no_op() {
        let spec: FilterSpec = serde_json::from_str(
            r#"{"A": {"type": "wavelength", "min": 5}}"#,
        )
        .unwrap();
        assert_eq!(spec["A"], ColumnFilter::Ignored);

        let filtered = apply_filters(&pets_table(), &spec).unwrap();
        assert_eq!(filtered.row_count(), 3);
    }
}
