//! Local East-North-Up coordinate primitives.
//!
//! All kinematic state in the simulator lives in one shared ENU frame with
//! `f64` components: scenario extents are a few kilometres, so double
//! precision keeps projection arithmetic exact to well below a millimetre.

// ── EnuPoint ──────────────────────────────────────────────────────────────────

/// A position in the shared ENU frame, metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnuPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EnuPoint {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Horizontal (x, y) components as a vector.
    #[inline]
    pub fn xy(self) -> EnuVec2 {
        EnuVec2 { x: self.x, y: self.y }
    }

    /// Straight-line horizontal distance in metres, ignoring z.
    ///
    /// Lane geometry and relocalization are planar; elevation is carried
    /// through but never enters a distance test.
    #[inline]
    pub fn distance_2d(self, other: EnuPoint) -> f64 {
        (self.xy() - other.xy()).norm()
    }
}

impl std::fmt::Display for EnuPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

// ── EnuVec2 ───────────────────────────────────────────────────────────────────

/// A horizontal displacement or direction in the ENU frame.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnuVec2 {
    pub x: f64,
    pub y: f64,
}

impl EnuVec2 {
    pub const EAST: EnuVec2 = EnuVec2 { x: 1.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: EnuVec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the cross product — positive when `other` is to the
    /// left of `self`.  Used to sign lateral offsets.
    #[inline]
    pub fn cross(self, other: EnuVec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `EAST` for a zero vector.
    pub fn normalized(self) -> EnuVec2 {
        let n = self.norm();
        if n > f64::EPSILON {
            EnuVec2 { x: self.x / n, y: self.y / n }
        } else {
            EnuVec2::EAST
        }
    }

    /// Heading angle in radians, measured counter-clockwise from east.
    #[inline]
    pub fn heading_rad(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Unit vector for a heading angle in radians.
    #[inline]
    pub fn from_heading_rad(rad: f64) -> EnuVec2 {
        EnuVec2 { x: rad.cos(), y: rad.sin() }
    }

    /// Rotated 90 degrees clockwise (points to the right of `self`).
    #[inline]
    pub fn right(self) -> EnuVec2 {
        EnuVec2 { x: self.y, y: -self.x }
    }
}

impl std::ops::Add for EnuVec2 {
    type Output = EnuVec2;
    #[inline]
    fn add(self, rhs: EnuVec2) -> EnuVec2 {
        EnuVec2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for EnuVec2 {
    type Output = EnuVec2;
    #[inline]
    fn sub(self, rhs: EnuVec2) -> EnuVec2 {
        EnuVec2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f64> for EnuVec2 {
    type Output = EnuVec2;
    #[inline]
    fn mul(self, rhs: f64) -> EnuVec2 {
        EnuVec2 { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Add<EnuVec2> for EnuPoint {
    type Output = EnuPoint;
    #[inline]
    fn add(self, rhs: EnuVec2) -> EnuPoint {
        EnuPoint { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z }
    }
}
