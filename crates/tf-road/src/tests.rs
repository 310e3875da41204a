//! Unit tests for tf-road.

use tf_core::{EnuPoint, LaneId};

use crate::{LaneKind, RoadError, RoadNetworkBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(x: f64, y: f64) -> EnuPoint {
    EnuPoint::new(x, y, 0.0)
}

/// One straight 100 m eastbound lane along y = 0, plus a 20 m junction link
/// curving off its end.
fn two_lane_network() -> crate::RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    b.add_lane(LaneKind::Lane, vec![p(0.0, 0.0), p(50.0, 0.0), p(100.0, 0.0)]);
    b.add_lane(LaneKind::Link, vec![p(100.0, 0.0), p(110.0, 2.0), p(118.0, 8.0)]);
    b.build().unwrap()
}

// ── Lane geometry ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod lane {
    use super::*;

    #[test]
    fn length_sums_segments() {
        let net = two_lane_network();
        let lane = net.lane(LaneId(0)).unwrap();
        assert!((lane.length() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn point_at_interpolates() {
        let net = two_lane_network();
        let lane = net.lane(LaneId(0)).unwrap();
        let mid = lane.point_at(75.0);
        assert!((mid.x - 75.0).abs() < 1e-9);
        assert!(mid.y.abs() < 1e-9);
    }

    #[test]
    fn point_at_clamps_to_ends() {
        let net = two_lane_network();
        let lane = net.lane(LaneId(0)).unwrap();
        assert_eq!(lane.point_at(-5.0), p(0.0, 0.0));
        assert_eq!(lane.point_at(500.0), p(100.0, 0.0));
    }

    #[test]
    fn direction_is_unit_tangent() {
        let net = two_lane_network();
        let lane = net.lane(LaneId(0)).unwrap();
        let dir = lane.direction_at(10.0);
        assert!((dir.x - 1.0).abs() < 1e-9);
        assert!(dir.y.abs() < 1e-9);
    }

    #[test]
    fn unknown_lane_is_an_error() {
        let net = two_lane_network();
        assert!(matches!(
            net.lane(LaneId(9)),
            Err(RoadError::LaneNotFound(LaneId(9)))
        ));
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn rejects_single_point_centerline() {
        let mut b = RoadNetworkBuilder::new();
        b.add_lane(LaneKind::Lane, vec![p(0.0, 0.0)]);
        assert!(matches!(
            b.build(),
            Err(RoadError::DegenerateCenterline(LaneId(0), 1))
        ));
    }

    #[test]
    fn rejects_zero_length_centerline() {
        let mut b = RoadNetworkBuilder::new();
        b.add_lane(LaneKind::Lane, vec![p(3.0, 3.0), p(3.0, 3.0)]);
        assert!(b.build().is_err());
    }

    #[test]
    fn empty_network_is_valid() {
        let net = crate::RoadNetwork::empty();
        assert!(net.is_empty());
        assert_eq!(net.relocate(p(0.0, 0.0), 1_000.0), None);
    }
}

// ── Relocalization ────────────────────────────────────────────────────────────

#[cfg(test)]
mod relocate {
    use super::*;

    #[test]
    fn snaps_to_nearest_lane_with_s_and_offset() {
        let net = two_lane_network();
        // 1.5 m left of the eastbound lane, 30 m along it.
        let loc = net.relocate(p(30.0, 1.5), 10.0).expect("on network");
        assert_eq!(loc.lane, LaneId(0));
        assert_eq!(loc.kind, LaneKind::Lane);
        assert!((loc.s - 30.0).abs() < 1e-9);
        assert!((loc.lateral_offset - 1.5).abs() < 1e-9);
        assert!((loc.dir.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn right_of_centerline_is_negative_offset() {
        let net = two_lane_network();
        let loc = net.relocate(p(30.0, -2.0), 10.0).unwrap();
        assert!((loc.lateral_offset + 2.0).abs() < 1e-9);
    }

    #[test]
    fn prefers_the_closer_link() {
        let net = two_lane_network();
        let loc = net.relocate(p(112.0, 3.5), 10.0).unwrap();
        assert_eq!(loc.lane, LaneId(1));
        assert_eq!(loc.kind, LaneKind::Link);
    }

    #[test]
    fn far_position_misses() {
        let net = two_lane_network();
        // 10 km from anything mapped.
        assert_eq!(net.relocate(p(10_000.0, 10_000.0), 20.0), None);
    }

    #[test]
    fn radius_is_a_hard_limit() {
        let net = two_lane_network();
        assert!(net.relocate(p(50.0, 4.9), 5.0).is_some());
        assert!(net.relocate(p(50.0, 5.1), 5.0).is_none());
    }

    #[test]
    fn s_accumulates_across_segments() {
        let net = two_lane_network();
        // Past the midpoint vertex of the two-segment lane.
        let loc = net.relocate(p(80.0, 0.2), 5.0).unwrap();
        assert!((loc.s - 80.0).abs() < 1e-9);
    }
}
