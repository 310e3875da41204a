//! Lane centerline geometry.

use tf_core::{EnuPoint, EnuVec2, LaneId};

/// Whether a drivable curve is a section lane or a junction connecting link.
///
/// Both kinds participate identically in relocalization; the distinction is
/// carried so downstream consumers can treat junction traffic differently.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneKind {
    Lane,
    Link,
}

/// One drivable curve: a polyline centerline with a precomputed cumulative
/// arc-length table for O(log n) point-at-s lookups.
#[derive(Debug, Clone)]
pub struct Lane {
    pub id: LaneId,
    pub kind: LaneKind,
    /// Centerline vertices in the shared ENU frame; at least two points.
    pub centerline: Vec<EnuPoint>,
    /// `cum_len[i]` = arc length from the centerline start to vertex `i`.
    /// Same length as `centerline`; `cum_len[0] == 0.0`.
    cum_len: Vec<f64>,
}

impl Lane {
    /// Construct from a validated polyline (the builder checks degeneracy).
    pub(crate) fn new(id: LaneId, kind: LaneKind, centerline: Vec<EnuPoint>) -> Self {
        let mut cum_len = Vec::with_capacity(centerline.len());
        let mut total = 0.0;
        cum_len.push(0.0);
        for pair in centerline.windows(2) {
            total += pair[0].distance_2d(pair[1]);
            cum_len.push(total);
        }
        Self { id, kind, centerline, cum_len }
    }

    /// Total arc length of the centerline in metres.
    #[inline]
    pub fn length(&self) -> f64 {
        *self.cum_len.last().unwrap_or(&0.0)
    }

    pub fn segment_count(&self) -> usize {
        self.centerline.len().saturating_sub(1)
    }

    /// Arc length from the centerline start to vertex `i`.
    #[inline]
    pub(crate) fn cum_len_at(&self, i: usize) -> f64 {
        self.cum_len[i]
    }

    /// Position on the centerline at arc length `s`, clamped to
    /// `[0, length()]`.
    pub fn point_at(&self, s: f64) -> EnuPoint {
        let (seg, t) = self.locate(s);
        let a = self.centerline[seg];
        let b = self.centerline[seg + 1];
        EnuPoint::new(
            a.x + (b.x - a.x) * t,
            a.y + (b.y - a.y) * t,
            a.z + (b.z - a.z) * t,
        )
    }

    /// Unit tangent direction at arc length `s`.
    pub fn direction_at(&self, s: f64) -> EnuVec2 {
        let (seg, _) = self.locate(s);
        let a = self.centerline[seg];
        let b = self.centerline[seg + 1];
        (b.xy() - a.xy()).normalized()
    }

    /// Binary-search the segment containing arc length `s`; returns the
    /// segment index and the interpolation fraction within it.
    fn locate(&self, s: f64) -> (usize, f64) {
        let s = s.clamp(0.0, self.length());
        let seg = match self.cum_len.binary_search_by(|c| c.total_cmp(&s)) {
            Ok(i) => i.min(self.segment_count().saturating_sub(1)),
            Err(i) => i - 1,
        };
        let seg_len = self.cum_len[seg + 1] - self.cum_len[seg];
        let t = if seg_len > f64::EPSILON {
            (s - self.cum_len[seg]) / seg_len
        } else {
            0.0
        };
        (seg, t)
    }
}
