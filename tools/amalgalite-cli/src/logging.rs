//!
//! Diagnostic logging for the CLI.
//!
//! Diagnostics always go to stderr so they never interleave with query rows
//! or profile dumps written to stdout.
//!

use clap::ValueEnum;
use tracing::Level;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub fn as_tracing(&self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Each `-v` raises the level by one step, saturating at trace.
    pub fn raised_by(self, steps: u8) -> LogLevel {
        let all = [Self::Error, Self::Warn, Self::Info, Self::Debug, Self::Trace];
        let idx = all.iter().position(|l| *l == self).unwrap_or(1);
        all[(idx + steps as usize).min(all.len() - 1)]
    }
}

pub fn init(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level.as_tracing())
        .init();
}
