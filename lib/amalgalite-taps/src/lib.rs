//!
//! # amalgalite-taps - Tracing and profiling taps for amalgalite
//!
//! Taps are small observers that sit between an instrumented producer (a
//! database connection, a VM loop, a script) and an output sink. A trace tap
//! forwards single lines; a profile tap forwards `(name, value)` pairs that
//! profile-aware sinks aggregate into running statistics.
//!
//! ## Library Usage
//!
//! ```rust
//! use amalgalite_taps::{shared, ProfileTap, StringIo, TapRegistry, TraceTap};
//!
//! let sink = shared(StringIo::new());
//! let mut taps = TapRegistry::new();
//! taps.register("sql", TraceTap::with_method(sink.clone(), "puts")?);
//! taps.register("vm", ProfileTap::new(sink.clone())?);
//!
//! taps.trace("sql", "SELECT 1")?;
//! taps.profile("vm", "SELECT 1", 42)?;
//! sink.borrow_mut().dump_profile()?;
//!
//! assert!(sink.borrow().string().starts_with("SELECT 1\n42 : SELECT 1\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!

pub mod config;
pub mod console;
pub mod errors;
pub mod number;
pub mod registry;
pub mod sampler;
pub mod tap;

pub use config::{SinkName, Sinks, TapConfig, TapSpec};
pub use console::{ConsoleTap, Stderr, Stdout, StringIo};
pub use errors::TapError;
pub use number::Number;
pub use registry::{Dispatch, TapRegistry};
pub use sampler::{ProfileSampler, SamplerStats};
pub use tap::{
    shared, ProfileDelegate, ProfileMethod, ProfileTap, Shared, Tap, TapEvent, TapKind,
    TraceDelegate, TraceMethod, TraceTap, PROFILE_METHOD, TRACE_METHOD,
};
