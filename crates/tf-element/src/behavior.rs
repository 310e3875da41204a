//! The `ElementBehavior` trait — the extension point for vehicle models.
//!
//! The actual car-following / lane-change mathematics live outside this
//! core; what matters here is the seam.  A behavior receives a read-only
//! view of the element, a [`SimContext`] over the whole collection, and a
//! deterministic per-element [`ElementRng`], and produces a [`Plan`] which
//! the element applies during its own update.

use tf_core::{ElementRng, SysId};

use crate::TrafficElement;

/// Read-only simulation state passed to every behavior callback.
///
/// Built by the element manager once per element during the tick sweep.
/// Because the sweep runs in dependency order, a follower's callback sees
/// its leaders in their **post-tick** state — that visibility is the whole
/// point of the declared edges.
///
/// # Lifetimes
///
/// All borrows live for one `plan` call.  The manager never allows mutable
/// access to the collection while a `SimContext` is live.
pub struct SimContext<'a> {
    /// Seconds covered by this tick.
    pub dt: f64,

    /// The full element collection, in update order.
    elements: &'a [TrafficElement],

    /// SysId index → slot in `elements`.
    slot_of_sys: &'a [usize],
}

impl<'a> SimContext<'a> {
    /// Build a context over the collection for a single `plan` call.
    #[inline]
    pub fn new(dt: f64, elements: &'a [TrafficElement], slot_of_sys: &'a [usize]) -> Self {
        Self { dt, elements, slot_of_sys }
    }

    /// Look up an element by its session SysId.
    ///
    /// Leaders reached through [`TrafficElement::leaders`] are already
    /// updated this tick; any other element may be pre- or post-tick
    /// depending on its position in the update order.
    pub fn element(&self, sys_id: SysId) -> Option<&'a TrafficElement> {
        self.slot_of_sys
            .get(sys_id.index())
            .and_then(|&slot| self.elements.get(slot))
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

/// What a behavior wants the element to do over the next `ctx.dt` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Plan {
    /// Longitudinal acceleration, m/s².
    pub acceleration: f64,
}

/// Pluggable per-element behavior.
///
/// Implementations must be `Send + Sync`: one behavior instance serves the
/// whole element collection, and per-element state belongs on the element,
/// not the model.
pub trait ElementBehavior: Send + Sync + 'static {
    /// Called once per autonomous element per tick, in dependency order.
    fn plan(
        &self,
        element: &TrafficElement,
        ctx: &SimContext<'_>,
        rng: &mut ElementRng,
    ) -> Plan;
}

/// Hold the current speed.  The stock behavior for scenarios exercising
/// only the scheduling and override machinery.
#[derive(Debug)]
pub struct ConstantSpeed;

impl ElementBehavior for ConstantSpeed {
    fn plan(
        &self,
        _element: &TrafficElement,
        _ctx: &SimContext<'_>,
        _rng: &mut ElementRng,
    ) -> Plan {
        Plan { acceleration: 0.0 }
    }
}

/// Brake to a stop and stay there.
pub struct Idle;

impl ElementBehavior for Idle {
    fn plan(
        &self,
        element: &TrafficElement,
        ctx: &SimContext<'_>,
        _rng: &mut ElementRng,
    ) -> Plan {
        if element.kinematics.velocity <= f64::EPSILON || ctx.dt <= 0.0 {
            Plan { acceleration: 0.0 }
        } else {
            // Shed all remaining speed within this tick, without reversing.
            Plan { acceleration: -(element.kinematics.velocity / ctx.dt) }
        }
    }
}

/// Match the first leader's speed while closing toward a fixed time gap.
///
/// A deliberately small car-following model: enough to give the declared
/// `follow` edges a consumer without importing a full IDM implementation.
/// Elements with no leaders hold their current speed.
pub struct FollowLeader {
    /// Desired temporal gap to the leader, seconds.
    pub time_gap_secs: f64,
    /// Proportional gain on the gap error, 1/s².
    pub gap_gain: f64,
}

impl Default for FollowLeader {
    fn default() -> Self {
        Self { time_gap_secs: 1.5, gap_gain: 0.25 }
    }
}

impl ElementBehavior for FollowLeader {
    fn plan(
        &self,
        element: &TrafficElement,
        ctx: &SimContext<'_>,
        _rng: &mut ElementRng,
    ) -> Plan {
        let leader = element
            .leaders()
            .first()
            .and_then(|&sys_id| ctx.element(sys_id));
        let Some(leader) = leader else {
            return Plan { acceleration: 0.0 };
        };

        // The leader is already in its post-tick state this sweep.
        let gap = element.kinematics.position.distance_2d(leader.kinematics.position);
        let desired_gap = self.time_gap_secs * element.kinematics.velocity.max(1.0);
        let speed_error = leader.kinematics.velocity - element.kinematics.velocity;

        Plan {
            acceleration: self.gap_gain * (gap - desired_gap)
                + speed_error / self.time_gap_secs,
        }
    }
}
