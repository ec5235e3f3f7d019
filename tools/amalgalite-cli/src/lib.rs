///
/// amalgalite CLI - library half of the `amalgalite` binary
///
/// The subcommands live here so they can be driven from tests with in-memory
/// input and output:
/// - exec: run SQL against bundled SQLite with taps installed
/// - stats: aggregate `name value` samples read from text
///
/// The `buffer` sink collects in memory while a subcommand runs; the binary
/// then hands it to `flush_buffer` so its contents reach stdout.
///

use std::io::Write;

use amalgalite_taps::Sinks;

pub mod errors;
pub mod exec;
pub mod logging;
pub mod stats;

pub use errors::CliError;
pub use exec::ExecOptions;
pub use logging::LogLevel;
pub use stats::StatsSummary;

/// Writes out and empties the buffer sink.
pub fn flush_buffer(sinks: &Sinks, out: &mut impl Write) -> Result<(), CliError> {
    let text = sinks.take_buffer();
    if !text.is_empty() {
        out.write_all(text.as_bytes())?;
        out.flush()?;
    }
    Ok(())
}
