//! The manual-override state machine.
//!
//! # State machine
//!
//! ```text
//! Autonomous ── first apply_override ──► Manual
//! Manual     ── further overrides ─────► Manual      (pose re-adopted)
//! Manual     ── clear_override ────────► Autonomous  (explicit API only)
//! ```
//!
//! No other transitions exist.  "No override this tick" keeps the last
//! adopted pose; the element does not silently revert to Autonomous.

use tf_core::EnuPoint;

/// Who drives the element's pose this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManualMode {
    /// Pose produced by the element's own behavior/physics update.
    #[default]
    Autonomous,
    /// Pose adopted from externally supplied override records; the normal
    /// update is a no-op.
    Manual,
}

/// One externally supplied pose sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverridePose {
    pub position: EnuPoint,
    /// Velocity vector as supplied by the external source, m/s.  Kept for
    /// diagnostics; the adopted scalar speed is finite-differenced from
    /// consecutive positions instead, because external velocity feeds are
    /// frequently stale or absent.
    pub velocity: [f64; 3],
    /// Roll, pitch, yaw in radians.
    pub orientation: [f64; 3],
    /// Source timestamp in simulation seconds.
    pub timestamp_secs: f64,
}

/// Per-element manual-override runtime state.
#[derive(Debug, Default)]
pub struct ManualOverrideState {
    pub mode: ManualMode,
    /// Last adopted override sample; `None` until the first override after
    /// entering Manual mode.
    pub last: Option<OverridePose>,
}

impl ManualOverrideState {
    #[inline]
    pub fn is_manual(&self) -> bool {
        self.mode == ManualMode::Manual
    }

    /// Enter Manual mode (idempotent) and adopt `pose`, returning the
    /// finite-differenced `(velocity, acceleration)` against the previous
    /// sample and the previous scalar velocity.
    ///
    /// The first sample after entering Manual has no predecessor, and a
    /// non-increasing timestamp yields no usable Δt; both cases produce
    /// `(0.0, 0.0)`.
    pub fn adopt(&mut self, pose: OverridePose, prev_velocity: f64) -> (f64, f64) {
        self.mode = ManualMode::Manual;
        let derived = match self.last {
            Some(prev) => {
                let dt = pose.timestamp_secs - prev.timestamp_secs;
                if dt > 0.0 {
                    let velocity = prev.position.distance_2d(pose.position) / dt;
                    let acceleration = (velocity - prev_velocity) / dt;
                    (velocity, acceleration)
                } else {
                    (0.0, 0.0)
                }
            }
            None => (0.0, 0.0),
        };
        self.last = Some(pose);
        derived
    }

    /// Explicit `Manual -> Autonomous` transition.  Drops the stored sample
    /// so a later re-entry starts its finite differencing fresh.
    pub fn clear(&mut self) {
        self.mode = ManualMode::Autonomous;
        self.last = None;
    }
}
