///
/// Named tap dispatch.
///
/// Instrumented code refers to taps by stable names ("sql", "vm", ...) and
/// never by sink type. A `TapRegistry` maps those names to the active taps.
/// It is a plain value owned by whoever instruments: a database connection,
/// a test, the CLI. There is no process-wide instance.
///
/// Registering under an existing name replaces the previous tap in place.
///

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::errors::TapError;
use crate::number::Number;
use crate::tap::{Tap, TapEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Delivered,
    NotInstalled,
}

#[derive(Default)]
pub struct TapRegistry {
    taps: IndexMap<String, Box<dyn Tap>>,
}

impl TapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        tap: impl Tap + 'static,
    ) -> Option<Box<dyn Tap>> {
        self.register_boxed(name, Box::new(tap))
    }

    pub fn register_boxed(
        &mut self,
        name: impl Into<String>,
        tap: Box<dyn Tap>,
    ) -> Option<Box<dyn Tap>> {
        let name = name.into();
        debug!(tap = %name, kind = %tap.kind(), method = tap.method(), "registering tap");
        let previous = self.taps.insert(name, tap);
        if let Some(old) = &previous {
            debug!(kind = %old.kind(), method = old.method(), "replaced previous tap");
        }
        previous
    }

    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn Tap>> {
        self.taps.shift_remove(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn Tap> {
        self.taps.get(name).map(|tap| tap.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.taps.contains_key(name)
    }

    pub fn dispatch(&self, name: &str, event: &TapEvent<'_>) -> Result<Dispatch, TapError> {
        match self.taps.get(name) {
            Some(tap) => {
                tap.forward(event)?;
                Ok(Dispatch::Delivered)
            }
            None => {
                trace!(tap = name, kind = %event.kind(), "no tap installed");
                Ok(Dispatch::NotInstalled)
            }
        }
    }

    pub fn trace(&self, name: &str, msg: &str) -> Result<Dispatch, TapError> {
        self.dispatch(name, &TapEvent::Trace(msg))
    }

    pub fn profile(
        &self,
        name: &str,
        key: &str,
        value: impl Into<Number>,
    ) -> Result<Dispatch, TapError> {
        self.dispatch(
            name,
            &TapEvent::Profile {
                name: key,
                value: value.into(),
            },
        )
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.taps.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

impl std::fmt::Debug for TapRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.taps.iter().map(|(name, tap)| (name, tap.method())))
            .finish()
    }
}
