///
/// amalgalite CLI - run SQL and aggregate profiles from the command line
///
/// Provides commands around the tap layer:
/// - amalgalite exec <sql>...: run statements with trace/profile taps installed
/// - amalgalite stats [file]: aggregate `name value` lines into a profile dump
///

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use amalgalite_cli::{exec, stats, CliError, ExecOptions, LogLevel};
use amalgalite_taps::{SinkName, Sinks};

#[derive(Parser)]
#[command(name = "amalgalite")]
#[command(author, version, about = "SQLite tracing and profiling taps", long_about = None)]
struct Cli {
    /// Raise diagnostic verbosity (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Diagnostic log level (overrides -v)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run SQL statements with taps installed
    Exec {
        /// Database file (in-memory when omitted)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Tap configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trace every statement to this sink (stdout, stderr, buffer)
        #[arg(long)]
        trace: Option<SinkName>,

        /// Profile every statement on this sink (stdout, stderr, buffer)
        #[arg(long)]
        profile: Option<SinkName>,

        /// Statements to run, one per argument
        #[arg(required = true)]
        sql: Vec<String>,
    },

    /// Aggregate `name value` lines into a profile dump
    Stats {
        /// Sink to collect into and dump from
        #[arg(long, default_value = "stdout")]
        sink: SinkName,

        /// Do not echo each sample
        #[arg(short, long)]
        quiet: bool,

        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
}

impl Cli {
    fn log_level(&self) -> LogLevel {
        self.log_level
            .unwrap_or_else(|| LogLevel::default().raised_by(self.verbose))
    }
}

fn main() {
    let cli = Cli::parse();
    amalgalite_cli::logging::init(cli.log_level());

    let sinks = Sinks::new();
    let result = match cli.command {
        Commands::Exec {
            db,
            config,
            trace,
            profile,
            sql,
        } => {
            let options = ExecOptions {
                db,
                config,
                trace,
                profile,
                statements: sql,
            };
            exec::run(&options, &sinks, &mut io::stdout().lock())
        }
        Commands::Stats { sink, quiet, file } => run_stats(file, sink, quiet, &sinks),
    };
    let flushed = amalgalite_cli::flush_buffer(&sinks, &mut io::stdout().lock());
    let result = result.and(flushed);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_stats(
    file: Option<PathBuf>,
    sink: SinkName,
    quiet: bool,
    sinks: &Sinks,
) -> Result<(), CliError> {
    let summary = match file {
        Some(path) => stats::run(BufReader::new(File::open(path)?), sink, quiet, sinks)?,
        None => stats::run(io::stdin().lock(), sink, quiet, sinks)?,
    };
    if summary.skipped > 0 {
        eprintln!("Skipped {} malformed line(s)", summary.skipped);
    }
    Ok(())
}
