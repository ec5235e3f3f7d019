///
/// Database error types.
///

use amalgalite_taps::TapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Tap error: {0}")]
    Tap(#[from] TapError),
}

impl DatabaseError {
    /// The extended SQLite result code, or -1 when the failure did not come
    /// from the library itself.
    pub fn code(&self) -> i64 {
        match self {
            DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => {
                err.extended_code as i64
            }
            _ => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_and_code() {
        let err = DatabaseError::from(rusqlite::Error::InvalidQuery);
        assert!(err.to_string().starts_with("SQLite error"));
        assert_eq!(err.code(), -1);

        let err = DatabaseError::from(TapError::UnknownSink("pipe".to_string()));
        assert!(err.to_string().contains("Tap error"));
        assert!(err.to_string().contains("pipe"));
        assert_eq!(err.code(), -1);
    }

    #[test]
    fn test_sqlite_failure_code() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = DatabaseError::from(conn.execute("NOT SQL", ()).unwrap_err());
        assert_eq!(err.code(), rusqlite::ffi::SQLITE_ERROR as i64);
    }
}
