//!
//! Console and stream sinks.
//!
//! A `ConsoleTap` is a delegate for both kinds of tap. As a trace target it
//! writes lines; as a profile target it keeps one `ProfileSampler` per
//! metric name and can dump all of them in the order they were first seen.
//!
//! ## Methods
//!
//! Trace (single string):
//! - `puts` - write the message and a newline
//! - `trace` - like `puts`, and counts the line in `trace_count()`
//! - `print` - write the message as is
//!
//! Profile (name, value):
//! - `profile` - record the sample and echo `<value> : <name>`
//! - `sample` - record the sample silently
//! - `output_profile_event` - echo only
//!
//! Profile names are normalized before use: every run of whitespace collapses
//! to a single space. Samplers are keyed by the normalized name and echoes
//! print it, so `"a\n  b"` is recorded and echoed as `a b`.
//!
//! ## Output
//!
//! ```text
//! 42 : test
//! [test] => sum: 42, sumsq: 1764, n: 1, mean: 42.000000, stddev: 0.000000, min: 42, max: 42
//! ```
//!

use std::io::{self, Write};

use indexmap::IndexMap;

use crate::number::Number;
use crate::sampler::ProfileSampler;
use crate::tap::{ProfileDelegate, ProfileMethod, TraceDelegate, TraceMethod};

pub struct ConsoleTap<W: Write> {
    io: W,
    samplers: IndexMap<String, ProfileSampler>,
    trace_count: u64,
}

pub type Stdout = ConsoleTap<io::Stdout>;
pub type Stderr = ConsoleTap<io::Stderr>;
pub type StringIo = ConsoleTap<Vec<u8>>;

/// Collapses every run of whitespace to one space, so the same statement
/// spread over several lines lands in a single sampler.
fn squeeze_whitespace(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

impl<W: Write> ConsoleTap<W> {
    pub fn from_writer(io: W) -> Self {
        Self {
            io,
            samplers: IndexMap::new(),
            trace_count: 0,
        }
    }

    pub fn puts(&mut self, msg: &str) -> io::Result<()> {
        self.io.write_all(msg.as_bytes())?;
        self.io.write_all(b"\n")
    }

    pub fn print(&mut self, msg: &str) -> io::Result<()> {
        self.io.write_all(msg.as_bytes())
    }

    pub fn trace(&mut self, msg: &str) -> io::Result<()> {
        self.trace_count += 1;
        self.puts(msg)
    }

    pub fn trace_count(&self) -> u64 {
        self.trace_count
    }

    pub fn profile<V: Into<Number>>(&mut self, name: &str, value: V) -> io::Result<()> {
        let value = value.into();
        let key = self.record(name, value);
        self.echo(&key, value)
    }

    pub fn sample<V: Into<Number>>(&mut self, name: &str, value: V) -> io::Result<()> {
        self.record(name, value.into());
        Ok(())
    }

    pub fn output_profile_event<V: Into<Number>>(&mut self, name: &str, value: V) -> io::Result<()> {
        self.echo(&squeeze_whitespace(name), value.into())
    }

    fn record(&mut self, name: &str, value: Number) -> String {
        let key = squeeze_whitespace(name);
        self.samplers
            .entry(key.clone())
            .or_insert_with(|| ProfileSampler::new(key.clone()))
            .sample(value);
        key
    }

    fn echo(&mut self, name: &str, value: Number) -> io::Result<()> {
        writeln!(self.io, "{} : {}", value, name)
    }

    pub fn dump_profile(&mut self) -> io::Result<()> {
        for sampler in self.samplers.values() {
            writeln!(self.io, "{}", sampler)?;
        }
        self.io.flush()
    }

    pub fn samplers(&self) -> impl Iterator<Item = &ProfileSampler> {
        self.samplers.values()
    }

    pub fn sampler(&self, name: &str) -> Option<&ProfileSampler> {
        self.samplers.get(name)
    }

    pub fn has_samples(&self) -> bool {
        !self.samplers.is_empty()
    }

    pub fn reset_profile(&mut self) {
        self.samplers.clear();
    }

    pub fn get_ref(&self) -> &W {
        &self.io
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.io
    }

    pub fn into_inner(self) -> W {
        self.io
    }
}

impl ConsoleTap<io::Stdout> {
    pub fn new() -> Self {
        Self::from_writer(io::stdout())
    }
}

impl Default for ConsoleTap<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleTap<io::Stderr> {
    pub fn new() -> Self {
        Self::from_writer(io::stderr())
    }
}

impl Default for ConsoleTap<io::Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleTap<Vec<u8>> {
    pub fn new() -> Self {
        Self::from_writer(Vec::new())
    }

    /// Everything written so far.
    pub fn string(&self) -> String {
        String::from_utf8_lossy(&self.io).into_owned()
    }

    pub fn clear(&mut self) {
        self.io.clear();
    }
}

impl Default for ConsoleTap<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TraceDelegate for ConsoleTap<W> {
    fn trace_method(name: &str) -> Option<TraceMethod<Self>> {
        match name {
            "puts" => Some(Self::puts),
            "trace" => Some(Self::trace),
            "print" => Some(Self::print),
            _ => None,
        }
    }
}

impl<W: Write> ProfileDelegate for ConsoleTap<W> {
    fn profile_method(name: &str) -> Option<ProfileMethod<Self>> {
        match name {
            "profile" => Some(Self::profile::<Number>),
            "sample" => Some(Self::sample::<Number>),
            "output_profile_event" => Some(Self::output_profile_event::<Number>),
            _ => None,
        }
    }
}
