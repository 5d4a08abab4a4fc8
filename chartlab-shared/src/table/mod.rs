//! The table engine: ephemeral tabular data derived from uploaded files.
//!
//! A [`Table`] is rebuilt from disk on every request: there is no
//! server-side caching, so concurrent requests each get an independent
//! read-only view. The pipeline is load → filter → extract:
//!
//! - `loader`: parse a csv/xls/xlsx file into a [`Table`]
//! - `filter`: reduce rows with per-column range/text predicates
//! - `series`: project two columns into parallel x/y arrays

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod series;

pub use error::TableError;
pub use filter::{apply_filters, ColumnFilter, FilterSpec};
pub use loader::load_table;
pub use model::{CellValue, Table};
pub use series::{extract_series, Series};
