//! Routing of externally supplied pose overrides to their target elements.

use tf_core::ElementId;
use tf_element::OverridePose;
use tf_road::RoadNetwork;

use crate::{ElementManager, SimError, SimResult};

/// One record of a per-tick override batch, as decoded from the external
/// control channel.  Targets are addressed by the stable `ElementId`, never
/// by graph position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideRecord {
    pub element: ElementId,
    pub pose: OverridePose,
}

/// Outcome counters for one routed batch.
///
/// A batch is never rejected as a whole: unknown targets and failed
/// relocalizations are recovered locally and the remaining records proceed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteSummary {
    /// Records adopted with a successful relocalization.
    pub applied: usize,
    /// Records whose ElementId matched nothing in the session (logged and
    /// skipped).
    pub unknown: usize,
    /// Records adopted but left spatially invalid (no lane or link within
    /// the relocation radius).
    pub relocation_failed: usize,
}

/// Dispatches override batches into the element collection.
///
/// The router only ever mutates per-element state through the manager; it
/// never touches the collection's structure or order, so routing may
/// interleave freely with the tick sweep.
#[derive(Debug)]
pub struct ManualOverrideRouter {
    /// How far from a lane an override pose may land and still be mapped
    /// onto the network, metres.
    pub relocate_radius_m: f64,
}

impl ManualOverrideRouter {
    pub fn new(relocate_radius_m: f64) -> Self {
        Self { relocate_radius_m }
    }

    /// Dispatch one batch.  Each record switches its target to Manual mode
    /// (idempotent) and adopts the supplied pose; see
    /// [`TrafficElement::apply_override`](tf_element::TrafficElement::apply_override)
    /// for the per-record semantics.
    pub fn route(
        &self,
        batch: &[OverrideRecord],
        manager: &mut ElementManager,
        network: &RoadNetwork,
    ) -> RouteSummary {
        let mut summary = RouteSummary::default();
        for record in batch {
            let Some(element) = manager.get_mut(record.element) else {
                log::warn!("override for unknown element {} skipped", record.element);
                summary.unknown += 1;
                continue;
            };
            match element.apply_override(record.pose, network, self.relocate_radius_m) {
                Ok(()) => summary.applied += 1,
                Err(err) => {
                    log::warn!("{err}; element kept with invalid geometry");
                    summary.relocation_failed += 1;
                }
            }
        }
        summary
    }

    /// Explicitly return `element` to Autonomous mode.
    pub fn clear(&self, element: ElementId, manager: &mut ElementManager) -> SimResult<()> {
        match manager.get_mut(element) {
            Some(e) => {
                e.clear_override();
                Ok(())
            }
            None => Err(SimError::UnknownElement(element)),
        }
    }
}

impl Default for ManualOverrideRouter {
    /// 20 m matches the manager's spawn relocation radius.
    fn default() -> Self {
        Self::new(20.0)
    }
}
