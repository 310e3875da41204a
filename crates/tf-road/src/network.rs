//! Road network container and relocalization query.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds one entry per centerline **segment**, not
//! per lane: nearest-neighbor search then works on exact point-to-segment
//! distance, so a long lane and a short link compete fairly regardless of
//! vertex density.  The tree is bulk-loaded once in `build()` and never
//! mutated afterwards.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use tf_core::{EnuPoint, EnuVec2, LaneId};

use crate::{Lane, LaneKind, RoadError, RoadResult};

// ── R-tree segment entry ──────────────────────────────────────────────────────

/// Entry stored in the R-tree: one centerline segment with its lane and
/// segment index.
#[derive(Clone, Debug)]
struct SegmentEntry {
    a: [f64; 2],
    b: [f64; 2],
    lane: LaneId,
    seg: usize,
}

impl SegmentEntry {
    /// Interpolation fraction of the closest point on `ab` to `p`,
    /// clamped to the segment.
    fn closest_t(&self, p: &[f64; 2]) -> f64 {
        let ab = [self.b[0] - self.a[0], self.b[1] - self.a[1]];
        let ap = [p[0] - self.a[0], p[1] - self.a[1]];
        let len2 = ab[0] * ab[0] + ab[1] * ab[1];
        if len2 <= f64::EPSILON {
            return 0.0;
        }
        ((ap[0] * ab[0] + ap[1] * ab[1]) / len2).clamp(0.0, 1.0)
    }
}

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a, self.b)
    }
}

impl PointDistance for SegmentEntry {
    /// Squared point-to-segment distance in the ENU plane.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let t = self.closest_t(point);
        let cx = self.a[0] + (self.b[0] - self.a[0]) * t;
        let cy = self.a[1] + (self.b[1] - self.a[1]) * t;
        let dx = point[0] - cx;
        let dy = point[1] - cy;
        dx * dx + dy * dy
    }
}

// ── LaneLocation ──────────────────────────────────────────────────────────────

/// The result of mapping a world position onto the road network: which lane
/// (or link), how far along it, how far off its centerline, and the local
/// lane direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneLocation {
    pub lane: LaneId,
    pub kind: LaneKind,
    /// Arc-length coordinate along the centerline, metres.
    pub s: f64,
    /// Signed lateral offset from the centerline, metres; positive left of
    /// the travel direction.
    pub lateral_offset: f64,
    /// Unit lane direction at `s`.
    pub dir: EnuVec2,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Immutable road network: lanes plus the segment R-tree.
///
/// Do not construct directly; use [`RoadNetworkBuilder`].
#[derive(Debug)]
pub struct RoadNetwork {
    lanes: Vec<Lane>,
    spatial_idx: RTree<SegmentEntry>,
}

impl RoadNetwork {
    /// A network with no lanes.  Every relocalization query returns `None`.
    pub fn empty() -> Self {
        Self {
            lanes: Vec::new(),
            spatial_idx: RTree::new(),
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn lane(&self, id: LaneId) -> RoadResult<&Lane> {
        self.lanes.get(id.index()).ok_or(RoadError::LaneNotFound(id))
    }

    /// Map `pos` onto the nearest lane or lane-link centerline within
    /// `max_radius_m`.
    ///
    /// Returns `None` when no centerline segment lies within the radius —
    /// the caller treats that as a relocalization failure.  z is ignored;
    /// lane geometry is planar.
    pub fn relocate(&self, pos: EnuPoint, max_radius_m: f64) -> Option<LaneLocation> {
        let p = [pos.x, pos.y];
        let entry = self.spatial_idx.nearest_neighbor(&p)?;
        if entry.distance_2(&p) > max_radius_m * max_radius_m {
            return None;
        }

        let lane = &self.lanes[entry.lane.index()];
        let t = entry.closest_t(&p);
        let seg_a = lane.centerline[entry.seg];
        let seg_b = lane.centerline[entry.seg + 1];
        let seg_vec = seg_b.xy() - seg_a.xy();
        let s = lane.cum_len_at(entry.seg) + seg_vec.norm() * t;
        let dir = seg_vec.normalized();

        // Sign of the lateral offset from the cross product: positive when
        // the query point is left of the travel direction.
        let to_point = pos.xy() - (seg_a.xy() + seg_vec * t);
        let lateral_offset = dir.cross(to_point).signum() * to_point.norm();

        Some(LaneLocation {
            lane: lane.id,
            kind: lane.kind,
            s,
            lateral_offset,
            dir,
        })
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use tf_core::EnuPoint;
/// use tf_road::{LaneKind, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_lane(LaneKind::Lane, vec![
///     EnuPoint::new(0.0, 0.0, 0.0),
///     EnuPoint::new(100.0, 0.0, 0.0),
/// ]);
/// let net = b.build().unwrap();
/// assert_eq!(net.lane_count(), 1);
/// ```
pub struct RoadNetworkBuilder {
    lanes: Vec<Lane>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { lanes: Vec::new() }
    }

    /// Add a lane or link centerline and return its `LaneId`
    /// (sequential from 0).
    pub fn add_lane(&mut self, kind: LaneKind, centerline: Vec<EnuPoint>) -> LaneId {
        let id = LaneId(self.lanes.len() as u32);
        self.lanes.push(Lane::new(id, kind, centerline));
        id
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Validate all centerlines and bulk-load the segment R-tree.
    pub fn build(self) -> RoadResult<RoadNetwork> {
        for lane in &self.lanes {
            if lane.segment_count() == 0 || lane.length() <= f64::EPSILON {
                return Err(RoadError::DegenerateCenterline(
                    lane.id,
                    lane.centerline.len(),
                ));
            }
        }

        let entries: Vec<SegmentEntry> = self
            .lanes
            .iter()
            .flat_map(|lane| {
                lane.centerline.windows(2).enumerate().map(|(seg, pair)| SegmentEntry {
                    a: [pair[0].x, pair[0].y],
                    b: [pair[1].x, pair[1].y],
                    lane: lane.id,
                    seg,
                })
            })
            .collect();

        Ok(RoadNetwork {
            lanes: self.lanes,
            spatial_idx: RTree::bulk_load(entries),
        })
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
