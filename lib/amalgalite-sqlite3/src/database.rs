///
/// Instrumented SQLite connection.
///
/// Wraps a `rusqlite::Connection` (bundled SQLite) together with the
/// `TapRegistry` that observes it. Every statement handed to the connection
/// produces two events:
///
/// - `"trace"`: the SQL text, before the statement runs
/// - `"profile"`: `(sql, elapsed nanoseconds)`, after it completed
///
/// Either name may be left unregistered, in which case the event is dropped.
/// Query results are materialized into `Rows` so callers never hold a
/// statement borrowed from the connection.
///

use std::path::Path;
use std::time::Instant;

use amalgalite_taps::{Tap, TapRegistry};
use rusqlite::{types::Value as SqlValue, Connection};
use tracing::debug;

use crate::errors::DatabaseError;

pub const TRACE_TAP: &str = "trace";
pub const PROFILE_TAP: &str = "profile";

#[derive(Debug, Clone, PartialEq)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl Rows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }
}

/// Renders a column value the way the sqlite3 shell does.
pub fn format_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => String::new(),
        SqlValue::Integer(i) => i.to_string(),
        SqlValue::Real(r) => r.to_string(),
        SqlValue::Text(s) => s.clone(),
        SqlValue::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

pub fn sqlite_version() -> &'static str {
    rusqlite::version()
}

pub struct Database {
    conn: Connection,
    taps: TapRegistry,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening database");
        Ok(Self::from_connection(Connection::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            taps: TapRegistry::new(),
        }
    }

    pub fn with_taps(mut self, taps: TapRegistry) -> Self {
        self.taps = taps;
        self
    }

    pub fn taps(&self) -> &TapRegistry {
        &self.taps
    }

    pub fn taps_mut(&mut self) -> &mut TapRegistry {
        &mut self.taps
    }

    pub fn set_trace_tap(&mut self, tap: impl Tap + 'static) -> Option<Box<dyn Tap>> {
        self.taps.register(TRACE_TAP, tap)
    }

    pub fn set_profile_tap(&mut self, tap: impl Tap + 'static) -> Option<Box<dyn Tap>> {
        self.taps.register(PROFILE_TAP, tap)
    }

    pub fn clear_trace_tap(&mut self) -> Option<Box<dyn Tap>> {
        self.taps.unregister(TRACE_TAP)
    }

    pub fn clear_profile_tap(&mut self) -> Option<Box<dyn Tap>> {
        self.taps.unregister(PROFILE_TAP)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn instrument<T>(
        &self,
        sql: &str,
        run: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, DatabaseError> {
        self.taps.trace(TRACE_TAP, sql)?;
        let started = Instant::now();
        let out = run(&self.conn)?;
        let elapsed = started.elapsed();
        self.taps.profile(PROFILE_TAP, sql, elapsed)?;
        debug!(sql, elapsed_ns = elapsed.as_nanos() as u64, "statement finished");
        Ok(out)
    }

    /// Runs one statement and returns the number of rows it changed.
    pub fn execute(&self, sql: &str) -> Result<usize, DatabaseError> {
        self.instrument(sql, |conn| conn.execute(sql, ()))
    }

    pub fn execute_batch(&self, sql: &str) -> Result<(), DatabaseError> {
        self.instrument(sql, |conn| conn.execute_batch(sql))
    }

    pub fn query(&self, sql: &str) -> Result<Rows, DatabaseError> {
        self.instrument(sql, |conn| {
            let mut stmt = conn.prepare(sql)?;
            let col_count = stmt.column_count();
            let columns: Vec<String> = (0..col_count)
                .map(|i| stmt.column_name(i).unwrap_or("").to_string())
                .collect();

            let mapped = stmt.query_map((), |row| {
                (0..col_count)
                    .map(|i| row.get::<_, SqlValue>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?;
            let rows = mapped.collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(Rows { columns, rows })
        })
    }
}
