//! Per-element kinematic and geometric state.

use tf_core::{EnuPoint, EnuVec2};

// ── Kinematics ────────────────────────────────────────────────────────────────

/// Kinematic state in the shared ENU frame.
///
/// Speed and acceleration are scalars along the travel direction; `heading`
/// is the lane-relative unit direction.  This mirrors the component layout
/// the rest of the simulation reads, whether the values were produced by a
/// behavior model or adopted from an external override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: EnuPoint,
    /// Scalar speed along `heading`, m/s.  Never negative.
    pub velocity: f64,
    /// Scalar acceleration along `heading`, m/s².
    pub acceleration: f64,
    /// Unit travel direction in the ENU plane.
    pub heading: EnuVec2,
}

impl Kinematics {
    pub fn at_rest(position: EnuPoint) -> Self {
        Self {
            position,
            velocity: 0.0,
            acceleration: 0.0,
            heading: EnuVec2::EAST,
        }
    }
}

// ── GeometryData ──────────────────────────────────────────────────────────────

/// Oriented bounding box of an element, recomputed whenever the pose
/// changes.  Downstream collision and occlusion queries read `polygon`;
/// they must treat `valid == false` as "exclude from spatial queries"
/// rather than assume the corners are meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryData {
    /// Body dimensions in metres.
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Corner order: front-left, front-right, rear-right, rear-left.
    pub polygon: [EnuPoint; 4],
    /// False after a failed relocalization until a later pose maps back
    /// onto the road network.
    pub valid: bool,
}

impl GeometryData {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            polygon: [EnuPoint::default(); 4],
            valid: false,
        }
    }

    /// Recompute the bounding polygon around `center` facing `heading`,
    /// and mark the geometry valid.
    pub fn compute_polygon(&mut self, center: EnuPoint, heading: EnuVec2) {
        let fwd = heading.normalized() * (self.length * 0.5);
        let right = heading.normalized().right() * (self.width * 0.5);
        self.polygon = [
            center + (fwd - right),
            center + (fwd + right),
            center + ((fwd * -1.0) + right),
            center + ((fwd * -1.0) - right),
        ];
        self.valid = true;
    }
}
