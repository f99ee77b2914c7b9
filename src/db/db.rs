//! Generic record store over named SQLite tables.
//!
//! `Db` knows nothing about flights or aircraft. It creates tables, upserts
//! and deletes rows by primary key, and reads rows back as ordered
//! column/value lists ([`Record`]). The domain managers in
//! [`crate::db::aircraft`] and [`crate::db::flights`] translate those records
//! into typed values.
//!
//! ## Connection model
//!
//! Every operation opens a fresh connection, runs one statement and closes
//! the connection again before returning, on success and on failure alike.
//! No connection is ever held between calls or shared between threads, so a
//! single `Db` can be cloned freely into worker closures. Concurrent writers
//! are serialized by SQLite's own file locking; a busy timeout keeps a second
//! writer waiting instead of failing immediately.
//!
//! Opening a connection is retried a bounded number of times
//! ([`MAX_CONNECT_ATTEMPTS`]) before the operation gives up with
//! [`StoreError::Unavailable`].
//!
//! ## Failure contract
//!
//! Errors never cross the public API. Each public method logs the underlying
//! [`StoreError`] and converts it into a sentinel:
//!
//! - write operations return `false`
//! - row and column reads return an empty `Vec`
//! - [`Db::get_row_count`] returns `-1`
//! - [`Db::get_value`] returns `None`
//!
//! Callers therefore cannot tell "no rows" from "query failed" by the return
//! value alone; the log carries the difference.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logbook::db::db::Db;
//! use logbook::db::value::Value;
//!
//! let db = Db::open("logbook.db")?;
//! db.create_table(
//!     "aircraft",
//!     &["registration", "airframe", "engine"],
//!     &["TEXT NOT NULL UNIQUE", "TEXT", "TEXT"],
//!     Some("PRIMARY KEY (registration)"),
//! );
//! db.upsert_row(
//!     "aircraft",
//!     "registration",
//!     "C-FXCD",
//!     &[("airframe", Value::from("A320")), ("engine", Value::from("CFM56"))],
//! );
//! let rows = db.get_rows("aircraft", "registration", "C-FXCD", &[], None);
//! # Ok::<(), logbook::db::db::StoreError>(())
//! ```

use super::value::{Record, Value};
use rusqlite::{params_from_iter, Connection, Statement};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, warn};

pub const DB_FILE_NAME: &str = "logbook.db";

/// Upper bound on connection attempts per operation.
pub const MAX_CONNECT_ATTEMPTS: u32 = 3;

/// Pause between two connection attempts.
const CONNECT_BACKOFF: Duration = Duration::from_millis(50);

/// How long a connection waits on a locked database before reporting busy.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything that can go wrong inside the record store.
///
/// These errors are logged and folded into sentinel results at the public
/// boundary of [`Db`]; they surface as values only through
/// [`Db::open`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("table `{table}` declares {columns} columns but {types} column types")]
    ColumnMismatch { table: String, columns: usize, types: usize },

    #[error("table `{0}` must declare at least one column")]
    NoColumns(String),

    #[error("database unavailable after {attempts} connection attempts: {source}")]
    Unavailable {
        attempts: u32,
        #[source]
        source: rusqlite::Error,
    },

    #[error("cannot prepare database location {path}: {source}")]
    Location {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

type StoreResult<T> = Result<T, StoreError>;

/// Handle to the embedded database file.
///
/// Holds only the file path; see the module docs for the connection model.
#[derive(Debug, Clone)]
pub struct Db {
    path: PathBuf,
}

impl Db {
    /// Opens the store backed by the given file.
    ///
    /// The parent directory is created if it does not exist. The database
    /// file itself is created lazily by the first connection.
    pub fn open(path: impl Into<PathBuf>) -> Result<Db, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Location { path: parent.to_path_buf(), source })?;
        }
        Ok(Db { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens and closes one connection, reporting whether that worked.
    pub fn test_connection(&self) -> bool {
        self.lenient("test connection", self.with_connection(|_| Ok(true)), false)
    }

    /// Creates `table` if it does not exist yet.
    ///
    /// `columns` and `types` are paired by position and must have the same
    /// length; a mismatch is rejected before any connection is opened, so a
    /// table is never created partially. `extra` is appended verbatim after
    /// the column list, typically a `PRIMARY KEY (...)` clause.
    pub fn create_table(&self, table: &str, columns: &[&str], types: &[&str], extra: Option<&str>) -> bool {
        let result = build_create_table(table, columns, types, extra).and_then(|sql| {
            self.with_connection(|conn| {
                conn.execute(&sql, [])?;
                debug!("created table {table}");
                Ok(true)
            })
        });
        self.lenient("create table", result, false)
    }

    /// Drops `table` if it exists.
    pub fn drop_table(&self, table: &str) -> bool {
        let sql = format!("DROP TABLE IF EXISTS {}", quote_ident(table));
        self.lenient("drop table", self.execute_sql(&sql, &[]), false)
    }

    /// Deletes every row of `table`, keeping its schema.
    pub fn truncate_table(&self, table: &str) -> bool {
        let sql = format!("DELETE FROM {}", quote_ident(table));
        self.lenient("truncate table", self.execute_sql(&sql, &[]), false)
    }

    /// Inserts a row keyed by `key_column = key_value`, or overwrites every
    /// column named in `values` when that key already exists.
    ///
    /// The whole operation is a single `INSERT ... ON CONFLICT DO UPDATE`
    /// statement. The key and each value are bound as parameters; only the
    /// identifiers are spliced into the SQL text, quoted. An entry in
    /// `values` naming the key column itself is ignored.
    pub fn upsert_row(&self, table: &str, key_column: &str, key_value: &str, values: &[(&str, Value)]) -> bool {
        let values: Vec<&(&str, Value)> = values.iter().filter(|(column, _)| *column != key_column).collect();
        let columns: Vec<&str> = values.iter().map(|(column, _)| *column).collect();
        let sql = build_upsert(table, key_column, &columns);

        let mut params: Vec<Value> = Vec::with_capacity(values.len() + 1);
        params.push(Value::from(key_value));
        params.extend(values.iter().map(|(_, value)| value.clone()));

        self.lenient("upsert row", self.execute_sql(&sql, &params), false)
    }

    /// Single-column form of [`Db::upsert_row`].
    pub fn set_value(&self, table: &str, key_column: &str, key_value: &str, value_column: &str, value: Value) -> bool {
        self.upsert_row(table, key_column, key_value, &[(value_column, value)])
    }

    /// Deletes the rows whose `key_column` equals `key_value`.
    ///
    /// Matching zero rows is not an error.
    pub fn delete_row(&self, table: &str, key_column: &str, key_value: &str) -> bool {
        let sql = format!("DELETE FROM {} WHERE {} = ?1", quote_ident(table), quote_ident(key_column));
        self.lenient("delete row", self.execute_sql(&sql, &[Value::from(key_value)]), false)
    }

    /// Reads one cell of the first row matching the key.
    pub fn get_value(&self, table: &str, key_column: &str, key_value: &str, value_column: &str) -> Option<Value> {
        self.get_rows(table, key_column, key_value, &[value_column], None)
            .into_iter()
            .next()
            .and_then(|record| record.get(value_column).cloned())
    }

    /// Reads the rows whose `key_column` equals `key_value`.
    ///
    /// Only the requested `columns` are kept in each record, in the order
    /// given; an empty slice keeps every column. Requested columns the table
    /// does not have are silently left out. `extra` is appended verbatim
    /// after the `WHERE` clause and is not parameterized.
    pub fn get_rows(&self, table: &str, key_column: &str, key_value: &str, columns: &[&str], extra: Option<&str>) -> Vec<Record> {
        let sql = with_extra(format!("SELECT * FROM {} WHERE {} = ?1", quote_ident(table), quote_ident(key_column)), extra);
        let result = self.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            read_records(&mut stmt, columns, &[Value::from(key_value)])
        });
        self.lenient("get rows", result, Vec::new())
    }

    /// Reads every row of `table`. Column selection and `extra` behave as
    /// in [`Db::get_rows`].
    pub fn get_all_rows(&self, table: &str, columns: &[&str], extra: Option<&str>) -> Vec<Record> {
        let sql = with_extra(format!("SELECT * FROM {}", quote_ident(table)), extra);
        let result = self.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            read_records(&mut stmt, columns, &[])
        });
        self.lenient("get all rows", result, Vec::new())
    }

    /// Reads a single column across the table.
    ///
    /// `extra` is appended verbatim (for example
    /// `GROUP BY dep ORDER BY COUNT(dep) DESC`); the caller is responsible
    /// for keeping it safe.
    pub fn get_column(&self, table: &str, column: &str, extra: Option<&str>) -> Vec<Value> {
        let sql = with_extra(format!("SELECT {} FROM {}", quote_ident(column), quote_ident(table)), extra);
        let result = self.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([])?;
            let mut values = Vec::new();
            while let Some(row) = rows.next()? {
                values.push(Value::from(row.get_ref(0)?));
            }
            Ok(values)
        });
        self.lenient("get column", result, Vec::new())
    }

    /// Number of rows in `table`, or `-1` if the count could not be taken.
    pub fn get_row_count(&self, table: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let result = self.with_connection(|conn| Ok(conn.query_row(&sql, [], |row| row.get::<_, i64>(0))?));
        self.lenient("count rows", result, -1)
    }

    /// Column names of `table` in declaration order; empty if the table is
    /// missing.
    pub fn columns(&self, table: &str) -> Vec<String> {
        let sql = format!("SELECT * FROM {} LIMIT 0", quote_ident(table));
        let result = self.with_connection(|conn| {
            let stmt = conn.prepare(&sql)?;
            let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            Ok(names)
        });
        self.lenient("read columns", result, Vec::new())
    }

    /// Runs an arbitrary statement with positional parameters.
    pub fn execute(&self, statement: &str, params: &[Value]) -> bool {
        self.lenient("execute", self.execute_sql(statement, params), false)
    }

    fn execute_sql(&self, sql: &str, params: &[Value]) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute(sql, params_from_iter(params.iter()))?;
            debug!(changed, "executed `{sql}`");
            Ok(true)
        })
    }

    /// Runs `op` on a fresh connection and closes it afterwards, whatever
    /// `op` returned.
    pub(crate) fn with_connection<T>(&self, op: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let conn = self.connect()?;
        let result = op(&conn);
        if let Err((_, e)) = conn.close() {
            warn!("error closing connection to {}: {e}", self.path.display());
        }
        result
    }

    fn connect(&self) -> StoreResult<Connection> {
        let mut attempt = 1;
        loop {
            match Connection::open(&self.path).and_then(|conn| conn.busy_timeout(BUSY_TIMEOUT).map(|_| conn)) {
                Ok(conn) => return Ok(conn),
                Err(source) if attempt >= MAX_CONNECT_ATTEMPTS => {
                    return Err(StoreError::Unavailable { attempts: attempt, source });
                }
                Err(e) => {
                    warn!("connection attempt {attempt} to {} failed: {e}", self.path.display());
                    thread::sleep(CONNECT_BACKOFF * attempt);
                    attempt += 1;
                }
            }
        }
    }

    fn lenient<T>(&self, operation: &str, result: StoreResult<T>, fallback: T) -> T {
        result.unwrap_or_else(|e| {
            error!("{operation} failed on {}: {e}", self.path.display());
            fallback
        })
    }
}

/// Quotes an SQL identifier, doubling embedded quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn with_extra(sql: String, extra: Option<&str>) -> String {
    match extra.map(str::trim).filter(|e| !e.is_empty()) {
        Some(extra) => format!("{sql} {extra}"),
        None => sql,
    }
}

fn build_create_table(table: &str, columns: &[&str], types: &[&str], extra: Option<&str>) -> StoreResult<String> {
    if columns.len() != types.len() {
        return Err(StoreError::ColumnMismatch {
            table: table.to_string(),
            columns: columns.len(),
            types: types.len(),
        });
    }
    if columns.is_empty() {
        return Err(StoreError::NoColumns(table.to_string()));
    }

    let mut definitions: Vec<String> = columns.iter().zip(types).map(|(column, ty)| format!("{} {}", quote_ident(column), ty)).collect();
    if let Some(extra) = extra.map(str::trim).filter(|e| !e.is_empty()) {
        definitions.push(extra.to_string());
    }

    Ok(format!("CREATE TABLE IF NOT EXISTS {} ({})", quote_ident(table), definitions.join(", ")))
}

fn build_upsert(table: &str, key_column: &str, columns: &[&str]) -> String {
    let mut names = vec![quote_ident(key_column)];
    names.extend(columns.iter().map(|c| quote_ident(c)));
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{i}")).collect();

    let conflict = if columns.is_empty() {
        "DO NOTHING".to_string()
    } else {
        let assignments: Vec<String> = columns
            .iter()
            .map(|c| {
                let ident = quote_ident(c);
                format!("{ident} = excluded.{ident}")
            })
            .collect();
        format!("DO UPDATE SET {}", assignments.join(", "))
    };

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) {}",
        quote_ident(table),
        names.join(", "),
        placeholders.join(", "),
        quote_ident(key_column),
        conflict
    )
}

fn read_records(stmt: &mut Statement<'_>, columns: &[&str], params: &[Value]) -> StoreResult<Vec<Record>> {
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let selected: Vec<(usize, String)> = if columns.is_empty() {
        names.into_iter().enumerate().collect()
    } else {
        columns
            .iter()
            .filter_map(|wanted| names.iter().position(|n| n == wanted).map(|i| (i, wanted.to_string())))
            .collect()
    };

    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Record::new();
        for (index, name) in &selected {
            record.push(name.clone(), Value::from(row.get_ref(*index)?));
        }
        records.push(record);
    }
    Ok(records)
}
