///
/// CLI error types.
///

use amalgalite_sqlite3::DatabaseError;
use amalgalite_taps::TapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Tap(#[from] TapError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
