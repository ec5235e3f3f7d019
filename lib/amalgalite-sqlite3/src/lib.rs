//!
//! amalgalite-sqlite3 - Bundled SQLite with tap instrumentation
//!
//! Thin connection wrapper over `rusqlite` (compiled against the bundled
//! SQLite amalgamation) that reports every statement to the taps installed on
//! it.
//!
//! ## Events
//!
//! - `trace` - SQL text of each statement, before it runs
//! - `profile` - `(sql, nanoseconds)` for each completed statement
//!
//! ## Example
//!
//! ```rust
//! use amalgalite_sqlite3::Database;
//! use amalgalite_taps::{shared, ProfileTap, StringIo};
//!
//! let sink = shared(StringIo::new());
//! let mut db = Database::open_in_memory()?;
//! db.set_profile_tap(ProfileTap::with_method(sink.clone(), "sample")?);
//! db.execute_batch("CREATE TABLE t (x INTEGER)")?;
//!
//! assert_eq!(sink.borrow().samplers().count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!

pub mod database;
pub mod errors;

pub use database::{format_value, sqlite_version, Database, Rows, PROFILE_TAP, TRACE_TAP};
pub use errors::DatabaseError;
pub use rusqlite::types::Value;
