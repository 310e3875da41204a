//! The `TrafficElement` itself.

use tf_core::{ElementId, EnuPoint, EnuVec2, SysId};
use tf_order::DependencyEdge;
use tf_road::{LaneLocation, RoadNetwork};

use crate::{
    ElementError, ElementResult, GeometryData, Kinematics, ManualOverrideState, OverridePose, Plan,
};

/// Broad element category.  All kinds share the same update machinery; the
/// kind is carried for downstream consumers (sensor models, KPI counters).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    Vehicle,
    Pedestrian,
    Obstacle,
}

/// Author-declared behavior configuration, the source of the element's
/// dependency edges: an element that follows or merges around another must
/// be updated *after* it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorConfig {
    /// Initial scalar speed, m/s.
    pub initial_speed: f64,
    /// Element whose post-tick state this element's car-following reads.
    pub follow: Option<ElementId>,
    /// Element this element merges around during a lane change.
    pub merge_around: Option<ElementId>,
}

impl BehaviorConfig {
    /// The ElementIds this config references — the element's *leaders*.
    pub fn referenced_elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.follow.iter().chain(self.merge_around.iter()).copied()
    }
}

/// One traffic element: identity, declared behavior, kinematic and
/// geometric state, and the manual-override capability.
#[derive(Debug)]
pub struct TrafficElement {
    /// Dense per-session graph identity; assigned by the element manager at
    /// initialization, `INVALID` before that.
    pub sys_id: SysId,
    /// Stable author-visible identity.
    pub element_id: ElementId,
    pub kind: ElementKind,
    pub config: BehaviorConfig,

    pub kinematics: Kinematics,
    pub geometry: GeometryData,
    /// Current mapping onto the road network; `None` while off-network.
    pub location: Option<LaneLocation>,
    pub manual: ManualOverrideState,

    /// Leader SysIds resolved from `config` by the element manager; the
    /// source of this element's dependency edges.
    pub(crate) leaders: Vec<SysId>,
}

impl TrafficElement {
    /// Create an element at `spawn` with the given body dimensions.
    /// SysId and leaders stay unset until the manager initializes the
    /// session.
    pub fn new(
        element_id: ElementId,
        kind: ElementKind,
        config: BehaviorConfig,
        spawn: EnuPoint,
        (length, width, height): (f64, f64, f64),
    ) -> Self {
        let mut kinematics = Kinematics::at_rest(spawn);
        kinematics.velocity = config.initial_speed;
        Self {
            sys_id: SysId::INVALID,
            element_id,
            kind,
            config,
            kinematics,
            geometry: GeometryData::new(length, width, height),
            location: None,
            manual: ManualOverrideState::default(),
            leaders: Vec::new(),
        }
    }

    /// Install the session identity and resolved leaders.  Called by the
    /// element manager once per scenario initialization.
    pub fn bind_session(&mut self, sys_id: SysId, leaders: Vec<SysId>) {
        self.sys_id = sys_id;
        self.leaders = leaders;
    }

    /// Leader SysIds resolved from `config`, in declaration order
    /// (`follow` first, then `merge_around`).  All of them are updated
    /// before this element within a tick.
    pub fn leaders(&self) -> &[SysId] {
        &self.leaders
    }

    /// This element's declared dependency edges: one `leader -> self` edge
    /// per resolved leader.
    pub fn dependency_edges(&self) -> Vec<DependencyEdge> {
        self.leaders
            .iter()
            .map(|&leader| DependencyEdge::new(leader, self.sys_id))
            .collect()
    }

    /// Map the element onto the road network at its current position,
    /// adopting the lane direction as heading.  Used at scenario
    /// initialization; off-network elements stay unlocated and move in a
    /// straight line.
    pub fn localize(&mut self, network: &RoadNetwork, max_radius_m: f64) {
        self.location = network.relocate(self.kinematics.position, max_radius_m);
        if let Some(loc) = self.location {
            self.kinematics.heading = loc.dir;
        }
        self.geometry
            .compute_polygon(self.kinematics.position, self.kinematics.heading);
    }

    // ── Autonomous update ─────────────────────────────────────────────────

    /// Advance the element by `dt` seconds under `plan`.
    ///
    /// **No-op while the element is in Manual mode** — pose changes then
    /// come exclusively through [`apply_override`](Self::apply_override).
    pub fn update(&mut self, plan: Plan, dt: f64, network: &RoadNetwork) {
        if self.manual.is_manual() {
            return;
        }

        self.kinematics.acceleration = plan.acceleration;
        self.kinematics.velocity =
            (self.kinematics.velocity + plan.acceleration * dt).max(0.0);
        let step = self.kinematics.velocity * dt;

        match self.location {
            Some(loc) => {
                let lane = match network.lane(loc.lane) {
                    Ok(lane) => lane,
                    Err(_) => return, // stale location; keep last pose
                };
                let s = (loc.s + step).min(lane.length());
                let dir = lane.direction_at(s);
                let center = lane.point_at(s);
                // Preserve the lateral offset the element entered with.
                let lateral = dir.right() * -loc.lateral_offset;
                self.kinematics.position = center + lateral;
                self.kinematics.heading = dir;
                self.location = Some(LaneLocation { s, dir, ..loc });
            }
            None => {
                // Off-network: straight-line motion along the heading.
                let delta = self.kinematics.heading * step;
                self.kinematics.position = self.kinematics.position + delta;
            }
        }

        self.geometry
            .compute_polygon(self.kinematics.position, self.kinematics.heading);
    }

    // ── Manual override ───────────────────────────────────────────────────

    /// Adopt an externally supplied pose.
    ///
    /// Enters Manual mode (idempotent), finite-differences scalar velocity
    /// and acceleration against the previous override sample, relocalizes
    /// the mass-center onto the road network, and recomputes the bounding
    /// polygon.
    ///
    /// On relocalization failure the pose is still adopted but the element
    /// is left spatially invalid: `location` is cleared, `geometry.valid`
    /// goes false, and [`ElementError::Relocalization`] is returned.  The
    /// element stays present and stays Manual.
    pub fn apply_override(
        &mut self,
        pose: OverridePose,
        network: &RoadNetwork,
        max_radius_m: f64,
    ) -> ElementResult<()> {
        let (velocity, acceleration) =
            self.manual.adopt(pose, self.kinematics.velocity);
        self.kinematics.position = pose.position;
        self.kinematics.velocity = velocity;
        self.kinematics.acceleration = acceleration;

        match network.relocate(pose.position, max_radius_m) {
            Some(loc) => {
                self.location = Some(loc);
                self.kinematics.heading = loc.dir;
                self.geometry.compute_polygon(pose.position, loc.dir);
                Ok(())
            }
            None => {
                self.location = None;
                // Fall back to the supplied yaw so diagnostics still show a
                // plausible orientation, but mark the geometry unusable.
                self.kinematics.heading = EnuVec2::from_heading_rad(pose.orientation[2]);
                self.geometry.valid = false;
                Err(ElementError::Relocalization {
                    element: self.element_id,
                    position: pose.position,
                })
            }
        }
    }

    /// Explicitly return the element to Autonomous mode.  The element
    /// resumes normal updates from its last adopted pose.
    pub fn clear_override(&mut self) {
        self.manual.clear();
    }
}
