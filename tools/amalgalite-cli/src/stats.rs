//!
//! `amalgalite stats` - aggregate samples from text.
//!
//! Each input line is `<name> <value>`: the last whitespace-separated token is
//! the value, everything before it is the metric name. Blank lines and lines
//! starting with `#` are ignored; lines whose value is not a number are
//! skipped with a warning.
//!

use std::io::BufRead;

use amalgalite_taps::{Number, SinkName, Sinks, Tap, TapConfig, TapEvent, TapKind, TapSpec};
use tracing::{info, warn};

use crate::errors::CliError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSummary {
    pub samples: usize,
    pub skipped: usize,
}

pub fn parse_sample_line(line: &str) -> Option<(&str, Number)> {
    let line = line.trim();
    let (name, value) = line.rsplit_once(char::is_whitespace)?;
    let name = name.trim_end();
    if name.is_empty() {
        return None;
    }
    Some((name, Number::parse(value)?))
}

pub fn run(
    input: impl BufRead,
    sink: SinkName,
    quiet: bool,
    sinks: &Sinks,
) -> Result<StatsSummary, CliError> {
    let method = if quiet { "sample" } else { "profile" };
    let tap = TapConfig::build(&TapSpec::new(TapKind::Profile, sink).with_method(method), sinks)?;

    let mut summary = StatsSummary::default();
    for (lineno, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_sample_line(trimmed) {
            Some((name, value)) => {
                tap.forward(&TapEvent::Profile { name, value })?;
                summary.samples += 1;
            }
            None => {
                warn!(line = lineno + 1, text = trimmed, "skipping malformed sample");
                summary.skipped += 1;
            }
        }
    }

    sinks.dump_profile(sink)?;
    info!(samples = summary.samples, skipped = summary.skipped, "profile dumped");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_sample_line() {
        assert_eq!(parse_sample_line("select 42"), Some(("select", Number::Int(42))));
        assert_eq!(
            parse_sample_line("  SELECT * FROM t   0.25 "),
            Some(("SELECT * FROM t", Number::Float(0.25)))
        );
        assert_eq!(parse_sample_line("lonely"), None);
        assert_eq!(parse_sample_line("name value"), None);
        assert_eq!(parse_sample_line(""), None);
    }

    #[test]
    fn test_run_quiet_dumps_only_samplers() {
        let sinks = Sinks::new();
        let input = Cursor::new("a 1\n# comment\n\nb 2\na 3\nbad line\n");
        let summary = run(input, SinkName::Buffer, true, &sinks).unwrap();

        assert_eq!(summary, StatsSummary { samples: 3, skipped: 1 });
        assert_eq!(
            sinks.buffer.borrow().string(),
            "[a] => sum: 4, sumsq: 10, n: 2, mean: 2.000000, stddev: 1.000000, min: 1, max: 3\n\
             [b] => sum: 2, sumsq: 4, n: 1, mean: 2.000000, stddev: 0.000000, min: 2, max: 2\n"
        );
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        assert_eq!(parse_sample_line("x nan"), None);
        assert_eq!(parse_sample_line("x inf"), None);

        let sinks = Sinks::new();
        let input = Cursor::new("x nan\nx 1.0\nx -inf\nx -5.0\n");
        let summary = run(input, SinkName::Buffer, true, &sinks).unwrap();

        assert_eq!(summary, StatsSummary { samples: 2, skipped: 2 });
        assert_eq!(
            sinks.buffer.borrow().string(),
            "[x] => sum: -4.0, sumsq: 26.0, n: 2, mean: -2.000000, stddev: 3.000000, min: -5.0, max: 1.0\n"
        );
    }

    #[test]
    fn test_run_echoes_each_sample() {
        let sinks = Sinks::new();
        run(Cursor::new("test 42\n"), SinkName::Buffer, false, &sinks).unwrap();
        assert_eq!(
            sinks.buffer.borrow().string(),
            "42 : test\n[test] => sum: 42, sumsq: 1764, n: 1, mean: 42.000000, stddev: 0.000000, min: 42, max: 42\n"
        );
    }
}
