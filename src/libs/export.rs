//! CSV export of whole tables.
//!
//! An export dumps every row of one table into a timestamped file named
//! `<table>_Export_<yyyy-MM-dd_HH-mm-ss>.csv`:
//!
//! - the first line is the header (column names)
//! - the primary-key column is left out of the header and of every row
//! - text cells are wrapped in double quotes with embedded quotes doubled
//! - numbers are written bare and `NULL` as an empty cell
//!
//! A table with N rows therefore always yields N + 1 lines. For that to hold
//! when only one column is exported, a row whose single cell is `NULL` is
//! written as `""` rather than as a blank line, which makes it read the
//! same as empty text.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logbook::db::db::Db;
//! use logbook::libs::export::Exporter;
//!
//! let db = Db::open("logbook.db")?;
//! let path = Exporter::new(db, ".").export_table("aircraft", "registration")?;
//! println!("written to {}", path.display());
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::db::Db;
use crate::db::value::Value;
use crate::libs::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{DateTime, Local};
use csv::{QuoteStyle, WriterBuilder};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Writes table dumps into a fixed output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    db: Db,
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(db: Db, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            output_dir: output_dir.into(),
        }
    }

    /// File name for an export of `table` taken at `at`.
    pub fn file_name(table: &str, at: DateTime<Local>) -> String {
        format!("{}_Export_{}.csv", table, at.format(FILE_TIMESTAMP_FORMAT))
    }

    /// Dumps `table` without its `key_column` and returns the written path.
    ///
    /// Fails when the table does not exist, when the output directory cannot
    /// be created, or on any write error.
    pub fn export_table(&self, table: &str, key_column: &str) -> Result<PathBuf> {
        let columns: Vec<String> = self.db.columns(table).into_iter().filter(|c| c != key_column).collect();
        if columns.is_empty() {
            msg_bail_anyhow!(Message::ExportTableMissing(table.to_string()));
        }

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(Self::file_name(table, Local::now()));

        let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
        let records = self.db.get_all_rows(table, &column_refs, None);

        // Quoting is applied per cell by `format_cell`, so the writer must not
        // add its own. A lone empty field still comes out as `""`.
        let mut wtr = WriterBuilder::new().quote_style(QuoteStyle::Never).from_path(&path)?;
        wtr.write_record(&columns)?;
        for record in &records {
            let cells: Vec<String> = column_refs.iter().map(|c| format_cell(record.get(c).unwrap_or(&Value::Null))).collect();
            wtr.write_record(&cells)?;
        }
        wtr.flush()?;

        debug!("exported {} rows of {table} to {}", records.len(), path.display());
        Ok(path)
    }
}

/// Renders one cell: text quoted with doubled inner quotes, everything else
/// bare.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => format!("\"{}\"", s.replace('"', "\"\"")),
        Value::Blob(bytes) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
    }
}
