///
/// # Tap Configuration
///
/// Taps can be declared in a TOML document instead of being wired up in code.
/// Each table under `[taps]` names one registry entry; entries are installed in
/// file order.
///
/// ## Example taps.toml
///
/// ```toml
/// [taps.trace]
/// kind = "trace"      # trace | profile
/// sink = "stderr"     # stdout | stderr | buffer
/// method = "puts"     # optional, defaults to "trace" / "profile"
///
/// [taps.profile]
/// kind = "profile"
/// sink = "stdout"
/// ```
///
/// Method names are checked when the taps are installed, not when the file is
/// parsed, so a file naming a method the sink lacks parses fine and then fails
/// to install with `TapError::Configuration`.
///

use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::console::{Stderr, Stdout, StringIo};
use crate::errors::TapError;
use crate::registry::TapRegistry;
use crate::tap::{
    shared, ProfileDelegate, ProfileTap, Shared, Tap, TapKind, TraceDelegate, TraceTap,
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TapConfig {
    #[serde(default)]
    pub taps: IndexMap<String, TapSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TapSpec {
    pub kind: TapKind,
    pub sink: SinkName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkName {
    Stdout,
    Stderr,
    Buffer,
}

impl SinkName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkName::Stdout => "stdout",
            SinkName::Stderr => "stderr",
            SinkName::Buffer => "buffer",
        }
    }
}

impl fmt::Display for SinkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkName {
    type Err = TapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(SinkName::Stdout),
            "stderr" => Ok(SinkName::Stderr),
            "buffer" => Ok(SinkName::Buffer),
            other => Err(TapError::UnknownSink(other.to_string())),
        }
    }
}

impl TapSpec {
    pub fn new(kind: TapKind, sink: SinkName) -> Self {
        Self {
            kind,
            sink,
            method: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn method(&self) -> &str {
        self.method
            .as_deref()
            .unwrap_or_else(|| self.kind.default_method())
    }
}

/// The shared sinks a configuration can point taps at.
pub struct Sinks {
    pub stdout: Shared<Stdout>,
    pub stderr: Shared<Stderr>,
    pub buffer: Shared<StringIo>,
}

impl Sinks {
    pub fn new() -> Self {
        Self {
            stdout: shared(Stdout::new()),
            stderr: shared(Stderr::new()),
            buffer: shared(StringIo::new()),
        }
    }

    pub fn has_samples(&self, sink: SinkName) -> bool {
        match sink {
            SinkName::Stdout => self.stdout.borrow().has_samples(),
            SinkName::Stderr => self.stderr.borrow().has_samples(),
            SinkName::Buffer => self.buffer.borrow().has_samples(),
        }
    }

    pub fn dump_profile(&self, sink: SinkName) -> io::Result<()> {
        match sink {
            SinkName::Stdout => self.stdout.borrow_mut().dump_profile(),
            SinkName::Stderr => self.stderr.borrow_mut().dump_profile(),
            SinkName::Buffer => self.buffer.borrow_mut().dump_profile(),
        }
    }

    /// Everything written to the buffer sink so far, leaving it empty.
    pub fn take_buffer(&self) -> String {
        let mut buffer = self.buffer.borrow_mut();
        let text = buffer.string();
        buffer.clear();
        text
    }

    /// Dumps every sink that has collected at least one sample.
    pub fn dump_all(&self) -> io::Result<()> {
        for sink in [SinkName::Stdout, SinkName::Stderr, SinkName::Buffer] {
            if self.has_samples(sink) {
                self.dump_profile(sink)?;
            }
        }
        Ok(())
    }
}

impl Default for Sinks {
    fn default() -> Self {
        Self::new()
    }
}

fn tap_over<D>(kind: TapKind, delegate: Shared<D>, method: &str) -> Result<Box<dyn Tap>, TapError>
where
    D: TraceDelegate + ProfileDelegate + 'static,
{
    Ok(match kind {
        TapKind::Trace => Box::new(TraceTap::with_method(delegate, method)?),
        TapKind::Profile => Box::new(ProfileTap::with_method(delegate, method)?),
    })
}

impl TapConfig {
    pub fn parse(content: &str) -> Result<Self, TapError> {
        toml::from_str(content).map_err(|e| TapError::InvalidConfig(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, TapError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: TapSpec) -> Option<TapSpec> {
        self.taps.insert(name.into(), spec)
    }

    pub fn build(spec: &TapSpec, sinks: &Sinks) -> Result<Box<dyn Tap>, TapError> {
        let method = spec.method();
        match spec.sink {
            SinkName::Stdout => tap_over(spec.kind, sinks.stdout.clone(), method),
            SinkName::Stderr => tap_over(spec.kind, sinks.stderr.clone(), method),
            SinkName::Buffer => tap_over(spec.kind, sinks.buffer.clone(), method),
        }
    }

    /// Builds every tap first, so a bad entry leaves the registry untouched.
    pub fn install(&self, registry: &mut TapRegistry, sinks: &Sinks) -> Result<(), TapError> {
        let mut built = Vec::with_capacity(self.taps.len());
        for (name, spec) in &self.taps {
            let tap = Self::build(spec, sinks).inspect_err(|e| {
                warn!(tap = %name, sink = %spec.sink, error = %e, "rejected tap configuration");
            })?;
            built.push((name.clone(), tap));
        }
        for (name, tap) in built {
            registry.register_boxed(name, tap);
        }
        Ok(())
    }

    pub fn sinks_in_use(&self) -> Vec<SinkName> {
        let mut used = Vec::new();
        for spec in self.taps.values() {
            if !used.contains(&spec.sink) {
                used.push(spec.sink);
            }
        }
        used
    }
}
