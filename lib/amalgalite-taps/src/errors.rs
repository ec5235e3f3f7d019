///
/// Tap error types.
///
/// Construction of a tap over a delegate that does not answer to the requested
/// method is the one error the tap layer raises on its own. The remaining
/// variants cover named dispatch, tap configuration files, and delegate I/O
/// failures carried through the type-erased `Tap::forward`.
///

use thiserror::Error;

use crate::tap::TapKind;

#[derive(Debug, Error)]
pub enum TapError {
    #[error("{delegate} does not respond to {method}")]
    Configuration {
        delegate: &'static str,
        method: String,
    },

    #[error("{tap} tap cannot forward a {event} event")]
    EventMismatch { tap: TapKind, event: TapKind },

    #[error("Invalid tap configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown sink '{0}' (expected stdout, stderr or buffer)")]
    UnknownSink(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TapError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, TapError::Configuration { .. })
    }
}
