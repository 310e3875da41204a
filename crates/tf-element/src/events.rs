//! Scenario-scripted state-change events.
//!
//! Scenarios can script "at t = 12 s, vehicle 7 accelerates" style changes.
//! The registry is an ordinary per-session object owned by the scenario and
//! passed by reference wherever registration happens — there is no
//! process-wide dispatcher, so session teardown is just dropping the value.
//!
//! # Layout
//!
//! A `BTreeMap<Tick, Vec<ScheduledEvent>>`: most ticks carry no events, so
//! draining costs O(log W) in the number of distinct scheduled ticks
//! instead of a per-tick scan.

use std::collections::BTreeMap;

use tf_core::{ElementId, Tick};

/// The state change an event applies to its target element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventAction {
    /// Set the scalar speed, m/s.
    SetVelocity(f64),
    /// Set the longitudinal acceleration, m/s².
    SetAcceleration(f64),
}

/// One scripted event, resolved against the live collection by ElementId
/// when it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    pub element: ElementId,
    pub action: EventAction,
}

/// Per-session event table keyed by firing tick.
#[derive(Debug, Default)]
pub struct EventRegistry {
    inner: BTreeMap<Tick, Vec<ScheduledEvent>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` against `element` at `tick`.
    pub fn register(&mut self, tick: Tick, element: ElementId, action: EventAction) {
        self.inner
            .entry(tick)
            .or_default()
            .push(ScheduledEvent { element, action });
        self.total += 1;
    }

    /// Remove and return every event scheduled at or before `tick`,
    /// earliest tick first.  Events registered for a tick that already
    /// passed (e.g. scheduled mid-run) fire on the next drain rather than
    /// being lost.
    pub fn drain_due(&mut self, tick: Tick) -> Vec<ScheduledEvent> {
        let mut due = Vec::new();
        while let Some(entry) = self.inner.first_entry() {
            if *entry.key() > tick {
                break;
            }
            due.extend(entry.remove());
        }
        self.total -= due.len();
        due
    }

    /// Total events still scheduled.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
