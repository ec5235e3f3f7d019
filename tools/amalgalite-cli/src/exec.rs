//!
//! `amalgalite exec` - run SQL with taps installed.
//!
//! Taps come from an optional configuration file and from the `--trace` /
//! `--profile` flags; flags override file entries of the same name. Each SQL
//! argument is one statement. Result rows are written tab-separated, and once
//! every statement has run the profile of each sink in use is dumped.
//!

use std::io::Write;
use std::path::PathBuf;

use amalgalite_sqlite3::{format_value, sqlite_version, Database, PROFILE_TAP, TRACE_TAP};
use amalgalite_taps::{SinkName, Sinks, TapConfig, TapKind, TapRegistry, TapSpec};
use tracing::{debug, info};

use crate::errors::CliError;

#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    pub db: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub trace: Option<SinkName>,
    pub profile: Option<SinkName>,
    pub statements: Vec<String>,
}

impl ExecOptions {
    pub fn tap_config(&self) -> Result<TapConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => TapConfig::load(path)?,
            None => TapConfig::default(),
        };
        if let Some(sink) = self.trace {
            config.insert(TRACE_TAP, TapSpec::new(TapKind::Trace, sink));
        }
        if let Some(sink) = self.profile {
            config.insert(PROFILE_TAP, TapSpec::new(TapKind::Profile, sink));
        }
        Ok(config)
    }
}

pub fn run(options: &ExecOptions, sinks: &Sinks, out: &mut impl Write) -> Result<(), CliError> {
    let config = options.tap_config()?;
    let mut taps = TapRegistry::new();
    config.install(&mut taps, sinks)?;

    let db = match &options.db {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    let db = db.with_taps(taps);
    info!(sqlite = sqlite_version(), taps = config.taps.len(), "database ready");

    for sql in &options.statements {
        let rows = db.query(sql)?;
        debug!(sql = sql.as_str(), rows = rows.len(), "statement done");
        for row in &rows.rows {
            let cells: Vec<String> = row.iter().map(format_value).collect();
            writeln!(out, "{}", cells.join("\t"))?;
        }
    }
    out.flush()?;

    for sink in config.sinks_in_use() {
        if sinks.has_samples(sink) {
            sinks.dump_profile(sink)?;
        }
    }
    Ok(())
}
