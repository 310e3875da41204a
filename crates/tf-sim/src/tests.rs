//! Unit tests for tf-sim.

use tf_core::{ElementId, EnuPoint, SimConfig, SysId, Tick};
use tf_element::{
    BehaviorConfig, ConstantSpeed, ElementKind, EventAction, ManualMode, OverridePose,
    TrafficElement,
};
use tf_road::{LaneKind, RoadNetwork, RoadNetworkBuilder};

use crate::{
    InitError, ManualOverrideRouter, NoopObserver, OverrideRecord, ScenarioBuilder, SimError,
    SimObserver,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(x: f64, y: f64) -> EnuPoint {
    EnuPoint::new(x, y, 0.0)
}

/// Single straight 500 m eastbound lane along y = 0.
fn straight_network() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();
    b.add_lane(LaneKind::Lane, vec![p(0.0, 0.0), p(500.0, 0.0)]);
    b.build().unwrap()
}

fn vehicle(id: u64, x: f64, config: BehaviorConfig) -> TrafficElement {
    TrafficElement::new(ElementId(id), ElementKind::Vehicle, config, p(x, 0.0), (4.5, 1.8, 1.5))
}

fn follows(leader: u64) -> BehaviorConfig {
    BehaviorConfig { follow: Some(ElementId(leader)), ..BehaviorConfig::default() }
}

fn config(total_ticks: u64) -> SimConfig {
    SimConfig { total_ticks, seed: 7, ..SimConfig::default() }
}

fn pose(x: f64, y: f64, t: f64) -> OverridePose {
    OverridePose {
        position: p(x, y),
        velocity: [0.0; 3],
        orientation: [0.0; 3],
        timestamp_secs: t,
    }
}

/// Position of `id` in the manager's update order.
fn slot_of<B: tf_element::ElementBehavior>(s: &crate::Scenario<B>, id: u64) -> usize {
    s.manager
        .elements()
        .iter()
        .position(|e| e.element_id == ElementId(id))
        .expect("element present")
}

// ── Initialization and ordering ───────────────────────────────────────────────

#[cfg(test)]
mod initialize {
    use super::*;

    #[test]
    fn followers_update_after_their_leaders() {
        // Author order is deliberately leader-last.
        let scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(30, 10.0, follows(20)))
            .element(vehicle(20, 30.0, follows(10)))
            .element(vehicle(10, 50.0, BehaviorConfig::default()))
            .build()
            .unwrap();

        assert!(slot_of(&scenario, 10) < slot_of(&scenario, 20));
        assert!(slot_of(&scenario, 20) < slot_of(&scenario, 30));
    }

    #[test]
    fn sys_ids_are_dense_in_author_order() {
        let scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(99, 10.0, BehaviorConfig::default()))
            .element(vehicle(11, 30.0, BehaviorConfig::default()))
            .build()
            .unwrap();

        assert_eq!(scenario.manager.get(ElementId(99)).unwrap().sys_id, SysId(0));
        assert_eq!(scenario.manager.get(ElementId(11)).unwrap().sys_id, SysId(1));
        assert_eq!(
            scenario.manager.get_by_sys_id(SysId(1)).unwrap().element_id,
            ElementId(11)
        );
    }

    #[test]
    fn unconstrained_elements_keep_creation_order_at_the_tail() {
        let scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 10.0, BehaviorConfig::default()))
            .element(vehicle(2, 20.0, follows(3)))
            .element(vehicle(3, 40.0, BehaviorConfig::default()))
            .element(vehicle(4, 60.0, BehaviorConfig::default()))
            .build()
            .unwrap();

        // Constrained pair 3 -> 2 first, then 1 and 4 in creation order.
        assert!(slot_of(&scenario, 3) < slot_of(&scenario, 2));
        assert!(slot_of(&scenario, 2) < slot_of(&scenario, 1));
        assert!(slot_of(&scenario, 1) < slot_of(&scenario, 4));
    }

    #[test]
    fn cyclic_dependencies_are_rejected_with_an_edge() {
        let err = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 10.0, follows(2)))
            .element(vehicle(2, 30.0, follows(1)))
            .build()
            .unwrap_err();

        match err {
            InitError::Cycle(edge) => {
                let pair = (edge.from, edge.to);
                assert!(pair == (SysId(0), SysId(1)) || pair == (SysId(1), SysId(0)));
            }
            other => panic!("expected Cycle, got {other:?}"),
        }
    }

    #[test]
    fn unknown_reference_is_rejected() {
        let err = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 10.0, follows(42)))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            InitError::UnknownReference { element: ElementId(1), missing: ElementId(42) }
        ));
    }

    #[test]
    fn duplicate_element_id_is_rejected() {
        let err = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(5, 10.0, BehaviorConfig::default()))
            .element(vehicle(5, 30.0, BehaviorConfig::default()))
            .build()
            .unwrap_err();

        assert!(matches!(err, InitError::DuplicateElement(ElementId(5))));
    }

    #[test]
    fn merge_target_also_creates_an_edge() {
        let cfg = BehaviorConfig {
            merge_around: Some(ElementId(8)),
            ..BehaviorConfig::default()
        };
        let scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(9, 10.0, cfg))
            .element(vehicle(8, 30.0, BehaviorConfig::default()))
            .build()
            .unwrap();

        assert!(slot_of(&scenario, 8) < slot_of(&scenario, 9));
    }
}

// ── Tick sweep ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick {
    use super::*;

    use tf_core::ElementRng;
    use tf_element::{ElementBehavior, Plan, SimContext};

    const GAP_M: f64 = 5.0;

    /// Places itself exactly `GAP_M` metres behind its first leader's
    /// current position, in one tick.
    struct HoldGap;

    impl ElementBehavior for HoldGap {
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
                return Plan::default();
            };
            let target = leader.kinematics.position.x - GAP_M;
            let desired_v = (target - element.kinematics.position.x) / ctx.dt;
            Plan { acceleration: (desired_v - element.kinematics.velocity) / ctx.dt }
        }
    }

    #[test]
    fn follower_context_sees_leader_post_tick_state() {
        let leader_cfg = BehaviorConfig { initial_speed: 10.0, ..BehaviorConfig::default() };
        let mut scenario = ScenarioBuilder::new(config(0), HoldGap)
            .network(straight_network())
            .element(vehicle(2, 0.0, follows(1)))
            .element(vehicle(1, 20.0, leader_cfg))
            .build()
            .unwrap();

        scenario.run_ticks(1, &mut NoopObserver); // dt = 20 ms

        let leader_x = scenario.manager.get(ElementId(1)).unwrap().kinematics.position.x;
        let follower_x = scenario.manager.get(ElementId(2)).unwrap().kinematics.position.x;

        // The follower's plan ran against the already-advanced leader, so
        // it lands behind 20.2, not behind the pre-tick 20.0.
        assert!((leader_x - 20.2).abs() < 1e-9);
        assert!((follower_x - (leader_x - GAP_M)).abs() < 1e-9);
    }

    #[test]
    fn autonomous_elements_advance_each_tick() {
        let cfg = BehaviorConfig { initial_speed: 10.0, ..BehaviorConfig::default() };
        let mut scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 0.0, cfg))
            .build()
            .unwrap();

        scenario.run_ticks(50, &mut NoopObserver); // 50 × 20 ms = 1 s
        let x = scenario.manager.get(ElementId(1)).unwrap().kinematics.position.x;
        assert!((x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn manual_elements_are_skipped_by_the_sweep() {
        let cfg = BehaviorConfig { initial_speed: 10.0, ..BehaviorConfig::default() };
        let mut scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 0.0, cfg.clone()))
            .element(vehicle(2, 50.0, cfg))
            .build()
            .unwrap();

        let summary = scenario.apply_overrides(&[OverrideRecord {
            element: ElementId(2),
            pose: pose(60.0, 0.0, 0.0),
        }]);
        assert_eq!(summary.applied, 1);

        scenario.run_ticks(50, &mut NoopObserver);

        // Element 1 advanced; element 2 held the overridden pose exactly.
        let e1 = scenario.manager.get(ElementId(1)).unwrap();
        let e2 = scenario.manager.get(ElementId(2)).unwrap();
        assert!((e1.kinematics.position.x - 10.0).abs() < 1e-9);
        assert_eq!(e2.kinematics.position, p(60.0, 0.0));
        assert_eq!(e2.manual.mode, ManualMode::Manual);
    }

    #[test]
    fn cleared_element_resumes_autonomous_updates() {
        let cfg = BehaviorConfig { initial_speed: 10.0, ..BehaviorConfig::default() };
        let mut scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 0.0, cfg))
            .build()
            .unwrap();

        scenario.apply_overrides(&[OverrideRecord {
            element: ElementId(1),
            pose: pose(100.0, 0.0, 0.0),
        }]);
        scenario.run_ticks(10, &mut NoopObserver);
        assert_eq!(
            scenario.manager.get(ElementId(1)).unwrap().kinematics.position.x,
            100.0
        );

        let router = ManualOverrideRouter::default();
        router.clear(ElementId(1), &mut scenario.manager).unwrap();
        scenario.run_ticks(50, &mut NoopObserver);
        // Resumed from the adopted pose with finite-differenced speed (0).
        let e = scenario.manager.get(ElementId(1)).unwrap();
        assert_eq!(e.manual.mode, ManualMode::Autonomous);
        assert_eq!(e.kinematics.position.x, 100.0);
    }

    #[test]
    fn scripted_event_changes_speed_at_its_tick() {
        let mut scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 0.0, BehaviorConfig::default()))
            .event(Tick(50), ElementId(1), EventAction::SetVelocity(10.0))
            .build()
            .unwrap();

        scenario.run_ticks(50, &mut NoopObserver);
        let at_rest = scenario.manager.get(ElementId(1)).unwrap().kinematics.position.x;
        assert_eq!(at_rest, 0.0, "stationary until the event fires");

        scenario.run_ticks(50, &mut NoopObserver); // event fires at tick 50
        let moved = scenario.manager.get(ElementId(1)).unwrap().kinematics.position.x;
        assert!((moved - 10.0).abs() < 1e-9);
    }

    #[test]
    fn events_against_manual_elements_are_dropped() {
        let mut scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 0.0, BehaviorConfig::default()))
            .event(Tick(5), ElementId(1), EventAction::SetVelocity(10.0))
            .build()
            .unwrap();

        scenario.apply_overrides(&[OverrideRecord {
            element: ElementId(1),
            pose: pose(10.0, 0.0, 0.0),
        }]);
        scenario.run_ticks(20, &mut NoopObserver);
        assert_eq!(
            scenario.manager.get(ElementId(1)).unwrap().kinematics.velocity,
            0.0
        );
    }
}

// ── Override routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod router {
    use super::*;

    #[test]
    fn unknown_targets_are_skipped_without_affecting_the_batch() {
        let mut scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 0.0, BehaviorConfig::default()))
            .build()
            .unwrap();

        let summary = scenario.apply_overrides(&[
            OverrideRecord { element: ElementId(77), pose: pose(5.0, 0.0, 0.0) },
            OverrideRecord { element: ElementId(1), pose: pose(25.0, 0.0, 0.0) },
        ]);

        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.applied, 1);
        assert_eq!(
            scenario.manager.get(ElementId(1)).unwrap().kinematics.position.x,
            25.0
        );
    }

    #[test]
    fn relocation_failures_are_counted_and_element_kept() {
        let mut scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 0.0, BehaviorConfig::default()))
            .build()
            .unwrap();

        let summary = scenario.apply_overrides(&[OverrideRecord {
            element: ElementId(1),
            pose: pose(10_000.0, 10_000.0, 0.0),
        }]);

        assert_eq!(summary.relocation_failed, 1);
        let e = scenario.manager.get(ElementId(1)).unwrap();
        assert_eq!(e.manual.mode, ManualMode::Manual);
        assert!(!e.geometry.valid);
    }

    #[test]
    fn clear_on_unknown_element_errors() {
        let mut scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 0.0, BehaviorConfig::default()))
            .build()
            .unwrap();

        let router = ManualOverrideRouter::default();
        let err = router.clear(ElementId(404), &mut scenario.manager).unwrap_err();
        assert!(matches!(err, SimError::UnknownElement(ElementId(404))));
    }
}

// ── Scenario loop ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use super::*;

    #[derive(Default)]
    struct CountingObserver {
        ticks: usize,
        snapshots: usize,
        ended: bool,
    }

    impl SimObserver for CountingObserver {
        fn on_tick_end(&mut self, _tick: Tick, _updated: usize) {
            self.ticks += 1;
        }
        fn on_snapshot(&mut self, _tick: Tick, elements: &[tf_element::TrafficElement]) {
            assert!(!elements.is_empty());
            self.snapshots += 1;
        }
        fn on_sim_end(&mut self, _final_tick: Tick) {
            self.ended = true;
        }
    }

    #[test]
    fn run_honors_total_ticks_and_snapshot_cadence() {
        let cfg = SimConfig {
            total_ticks: 100,
            snapshot_interval_ticks: 25,
            ..SimConfig::default()
        };
        let mut scenario = ScenarioBuilder::new(cfg, ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 0.0, BehaviorConfig::default()))
            .build()
            .unwrap();

        let mut observer = CountingObserver::default();
        scenario.run(&mut observer);

        assert_eq!(observer.ticks, 100);
        assert_eq!(observer.snapshots, 4); // ticks 0, 25, 50, 75
        assert!(observer.ended);
        assert_eq!(scenario.clock.current_tick, Tick(100));
    }

    #[test]
    fn run_ticks_steps_exactly_n() {
        let mut scenario = ScenarioBuilder::new(config(0), ConstantSpeed)
            .network(straight_network())
            .element(vehicle(1, 0.0, BehaviorConfig::default()))
            .build()
            .unwrap();

        scenario.run_ticks(7, &mut NoopObserver);
        assert_eq!(scenario.clock.current_tick, Tick(7));
    }
}
