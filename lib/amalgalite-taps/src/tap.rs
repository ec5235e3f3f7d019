///
/// # Delegating Taps
///
/// A tap wraps a delegate and the name of one of the delegate's methods, and
/// forwards every event it receives to that method.
///
/// ## Capabilities
///
/// Delegates advertise the methods they answer to by implementing one or both
/// capability traits:
///
/// - `TraceDelegate` resolves single-string methods (`puts`, `trace`, ...)
/// - `ProfileDelegate` resolves `(name, value)` methods (`profile`, ...)
///
/// A tap resolves its method name through the capability trait when it is
/// built. Unknown names fail right there with `TapError::Configuration`, and
/// the resolved function pointer is all the tap keeps, so forwarding never
/// looks names up again.
///
/// ## Ownership
///
/// Delegates are shared, not owned: the caller builds the delegate with
/// `shared()`, keeps a handle to read it back (for example to dump a profile),
/// and hands clones of the handle to as many taps as it likes.
///

use std::any::type_name;
use std::cell::RefCell;
use std::fmt;
use std::io;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::errors::TapError;
use crate::number::Number;

pub type Shared<D> = Rc<RefCell<D>>;

pub fn shared<D>(delegate: D) -> Shared<D> {
    Rc::new(RefCell::new(delegate))
}

pub type TraceMethod<D> = fn(&mut D, &str) -> io::Result<()>;
pub type ProfileMethod<D> = fn(&mut D, &str, Number) -> io::Result<()>;

pub trait TraceDelegate: Sized {
    fn trace_method(name: &str) -> Option<TraceMethod<Self>>;
}

pub trait ProfileDelegate: Sized {
    fn profile_method(name: &str) -> Option<ProfileMethod<Self>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TapKind {
    Trace,
    Profile,
}

impl TapKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TapKind::Trace => "trace",
            TapKind::Profile => "profile",
        }
    }

    pub fn default_method(&self) -> &'static str {
        match self {
            TapKind::Trace => TRACE_METHOD,
            TapKind::Profile => PROFILE_METHOD,
        }
    }
}

impl fmt::Display for TapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const TRACE_METHOD: &str = "trace";
pub const PROFILE_METHOD: &str = "profile";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapEvent<'a> {
    Trace(&'a str),
    Profile { name: &'a str, value: Number },
}

impl TapEvent<'_> {
    pub fn kind(&self) -> TapKind {
        match self {
            TapEvent::Trace(_) => TapKind::Trace,
            TapEvent::Profile { .. } => TapKind::Profile,
        }
    }
}

/// Object-safe view of a tap, as stored in a `TapRegistry`.
pub trait Tap {
    fn kind(&self) -> TapKind;

    fn method(&self) -> &str;

    fn forward(&self, event: &TapEvent<'_>) -> Result<(), TapError>;
}

fn missing<D>(method: &str) -> TapError {
    TapError::Configuration {
        delegate: type_name::<D>(),
        method: method.to_string(),
    }
}

fn with_delegate<D, T>(
    delegate: &Shared<D>,
    call: impl FnOnce(&mut D) -> io::Result<T>,
) -> io::Result<T> {
    let mut guard = delegate
        .try_borrow_mut()
        .map_err(|_| io::Error::other(format!("{} is already in use", type_name::<D>())))?;
    call(&mut guard)
}

pub struct TraceTap<D> {
    delegate: Shared<D>,
    method: String,
    call: TraceMethod<D>,
}

impl<D: TraceDelegate> TraceTap<D> {
    pub fn new(delegate: Shared<D>) -> Result<Self, TapError> {
        Self::with_method(delegate, TRACE_METHOD)
    }

    pub fn with_method(delegate: Shared<D>, method: &str) -> Result<Self, TapError> {
        let call = D::trace_method(method).ok_or_else(|| missing::<D>(method))?;
        Ok(Self {
            delegate,
            method: method.to_string(),
            call,
        })
    }

    pub fn trace(&self, msg: &str) -> io::Result<()> {
        with_delegate(&self.delegate, |d| (self.call)(d, msg))
    }

    pub fn delegate(&self) -> &Shared<D> {
        &self.delegate
    }
}

impl<D: TraceDelegate> Tap for TraceTap<D> {
    fn kind(&self) -> TapKind {
        TapKind::Trace
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn forward(&self, event: &TapEvent<'_>) -> Result<(), TapError> {
        match event {
            TapEvent::Trace(msg) => Ok(self.trace(msg)?),
            other => Err(TapError::EventMismatch {
                tap: TapKind::Trace,
                event: other.kind(),
            }),
        }
    }
}

impl<D> fmt::Debug for TraceTap<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceTap")
            .field("delegate", &type_name::<D>())
            .field("method", &self.method)
            .finish()
    }
}

pub struct ProfileTap<D> {
    delegate: Shared<D>,
    method: String,
    call: ProfileMethod<D>,
}

impl<D: ProfileDelegate> ProfileTap<D> {
    pub fn new(delegate: Shared<D>) -> Result<Self, TapError> {
        Self::with_method(delegate, PROFILE_METHOD)
    }

    pub fn with_method(delegate: Shared<D>, method: &str) -> Result<Self, TapError> {
        let call = D::profile_method(method).ok_or_else(|| missing::<D>(method))?;
        Ok(Self {
            delegate,
            method: method.to_string(),
            call,
        })
    }

    pub fn profile(&self, name: &str, value: impl Into<Number>) -> io::Result<()> {
        let value = value.into();
        with_delegate(&self.delegate, |d| (self.call)(d, name, value))
    }

    pub fn delegate(&self) -> &Shared<D> {
        &self.delegate
    }
}

impl<D: ProfileDelegate> Tap for ProfileTap<D> {
    fn kind(&self) -> TapKind {
        TapKind::Profile
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn forward(&self, event: &TapEvent<'_>) -> Result<(), TapError> {
        match event {
            TapEvent::Profile { name, value } => Ok(self.profile(name, *value)?),
            other => Err(TapError::EventMismatch {
                tap: TapKind::Profile,
                event: other.kind(),
            }),
        }
    }
}

impl<D> fmt::Debug for ProfileTap<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileTap")
            .field("delegate", &type_name::<D>())
            .field("method", &self.method)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects trace lines and profile pairs; answers to `log` and `record`.
    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
        pairs: Vec<(String, Number)>,
    }

    impl Recorder {
        fn log(&mut self, msg: &str) -> io::Result<()> {
            self.lines.push(msg.to_string());
            Ok(())
        }

        fn record(&mut self, name: &str, value: Number) -> io::Result<()> {
            self.pairs.push((name.to_string(), value));
            Ok(())
        }
    }

    impl TraceDelegate for Recorder {
        fn trace_method(name: &str) -> Option<TraceMethod<Self>> {
            match name {
                "log" => Some(Self::log),
                _ => None,
            }
        }
    }

    impl ProfileDelegate for Recorder {
        fn profile_method(name: &str) -> Option<ProfileMethod<Self>> {
            match name {
                "record" => Some(Self::record),
                _ => None,
            }
        }
    }

    struct Broken;

    impl Broken {
        fn fail(&mut self, _msg: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink went away"))
        }
    }

    impl TraceDelegate for Broken {
        fn trace_method(name: &str) -> Option<TraceMethod<Self>> {
            (name == "trace").then_some(Self::fail as TraceMethod<Self>)
        }
    }

    #[test]
    fn test_trace_tap_forwards_to_named_method() {
        let rec = shared(Recorder::default());
        let tap = TraceTap::with_method(rec.clone(), "log").unwrap();
        tap.trace("select 1").unwrap();
        tap.trace("select 2").unwrap();
        assert_eq!(rec.borrow().lines, vec!["select 1", "select 2"]);
        assert_eq!(tap.method(), "log");
        assert_eq!(tap.kind(), TapKind::Trace);
    }

    #[test]
    fn test_default_trace_method_is_checked_eagerly() {
        let err = TraceTap::new(shared(Recorder::default())).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("does not respond to trace"));
        assert!(err.to_string().contains("Recorder"));
    }

    #[test]
    fn test_profile_tap_forwards_pairs() {
        let rec = shared(Recorder::default());
        let tap = ProfileTap::with_method(rec.clone(), "record").unwrap();
        tap.profile("insert", 12).unwrap();
        tap.profile("insert", 0.5).unwrap();
        let pairs = &rec.borrow().pairs;
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("insert".to_string(), Number::Int(12)));
        assert_eq!(pairs[1].1, Number::Float(0.5));
    }

    #[test]
    fn test_profile_tap_rejects_unknown_method() {
        let err = ProfileTap::with_method(shared(Recorder::default()), "log").unwrap_err();
        assert!(matches!(
            err,
            TapError::Configuration { ref method, .. } if method == "log"
        ));
        assert!(ProfileTap::new(shared(Recorder::default())).is_err());
    }

    #[test]
    fn test_delegate_errors_pass_through_unchanged() {
        let tap = TraceTap::new(shared(Broken)).unwrap();
        let err = tap.trace("anything").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(err.to_string(), "sink went away");

        match tap.forward(&TapEvent::Trace("anything")) {
            Err(TapError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_forward_rejects_other_event_kind() {
        let rec = shared(Recorder::default());
        let trace = TraceTap::with_method(rec.clone(), "log").unwrap();
        let profile = ProfileTap::with_method(rec.clone(), "record").unwrap();

        let event = TapEvent::Profile {
            name: "x",
            value: Number::Int(1),
        };
        assert!(matches!(
            trace.forward(&event),
            Err(TapError::EventMismatch { tap: TapKind::Trace, event: TapKind::Profile })
        ));
        assert!(profile.forward(&event).is_ok());
        assert!(profile.forward(&TapEvent::Trace("x")).is_err());
        assert_eq!(rec.borrow().pairs.len(), 1);
        assert!(rec.borrow().lines.is_empty());
    }

    #[test]
    fn test_reentrant_delegate_use_is_an_error() {
        let rec = shared(Recorder::default());
        let tap = TraceTap::with_method(rec.clone(), "log").unwrap();
        let _held = rec.borrow_mut();
        assert!(tap.trace("blocked").is_err());
    }

    #[test]
    fn test_debug_names_delegate_and_method() {
        let tap = TraceTap::with_method(shared(Recorder::default()), "log").unwrap();
        let shown = format!("{:?}", tap);
        assert!(shown.contains("TraceTap"));
        assert!(shown.contains("Recorder"));
        assert!(shown.contains("log"));
    }
}
