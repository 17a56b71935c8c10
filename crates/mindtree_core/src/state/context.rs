//! Ambient engine context passed into every mutation entry point.
//!
//! # Responsibility
//! - Supply timestamps, fresh ids, and the client identity without any
//!   module-level mutable state.
//!
//! # Invariants
//! - Generated ids are never the root id.
//! - The deterministic constructor yields a reproducible id/clock
//!   sequence for tests.

use crate::model::thought::{ThoughtId, Timestamp};
use std::fmt::{self, Debug, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Explicit ambient context for mutation operations.
///
/// Replaces module-level id counters and flags; every entry point takes
/// the context by `&mut` so composed pipelines share one id/clock
/// stream.
pub struct EngineContext {
    /// Session/client identifier stamped into `updated_by`.
    pub updated_by: String,
    /// Enables verbose diagnostic logging of individual steps.
    pub debug: bool,
    clock: Box<dyn FnMut() -> Timestamp>,
    ids: Box<dyn FnMut() -> ThoughtId>,
}

impl EngineContext {
    /// Context backed by the system clock and random v4 ids.
    pub fn new(updated_by: impl Into<String>) -> Self {
        Self {
            updated_by: updated_by.into(),
            debug: false,
            clock: Box::new(system_now_millis),
            ids: Box::new(Uuid::new_v4),
        }
    }

    /// Context with a counting clock and sequential ids, for tests and
    /// reproducible imports.
    pub fn deterministic(updated_by: impl Into<String>, start: Timestamp) -> Self {
        let mut tick = start;
        let mut serial: u128 = 0;
        Self {
            updated_by: updated_by.into(),
            debug: false,
            clock: Box::new(move || {
                tick += 1;
                tick
            }),
            ids: Box::new(move || {
                serial += 1;
                Uuid::from_u128(serial)
            }),
        }
    }

    /// Current timestamp in epoch milliseconds.
    pub fn now(&mut self) -> Timestamp {
        (self.clock)()
    }

    /// A fresh thought id.
    pub fn next_id(&mut self) -> ThoughtId {
        (self.ids)()
    }
}

impl Debug for EngineContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("updated_by", &self.updated_by)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

fn system_now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as Timestamp)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::EngineContext;
    use crate::model::thought::ROOT_ID;

    #[test]
    fn deterministic_context_is_reproducible() {
        let mut first = EngineContext::deterministic("test", 100);
        let mut second = EngineContext::deterministic("test", 100);
        assert_eq!(first.now(), second.now());
        assert_eq!(first.next_id(), second.next_id());
        assert_ne!(first.next_id(), ROOT_ID);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut ctx = EngineContext::deterministic("test", 0);
        let a = ctx.now();
        let b = ctx.now();
        assert!(b > a);
    }
}
