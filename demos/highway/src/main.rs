//! highway — smallest runnable scenario for the trafficflow simulator.
//!
//! Three vehicles on a straight two-lane highway: a lead vehicle, a
//! follower declared via `follow` (so the scheduler updates it after the
//! leader every tick), and an unconstrained vehicle in the second lane.
//! Mid-run the lead vehicle is taken over by externally supplied poses at
//! 6 m/s, then released back to its behavior model.
//!
//! Writes `pose_snapshots.csv` and `tick_summaries.csv` to `./output`.

use std::fs;
use std::path::Path;

use anyhow::Result;

use tf_core::{ElementId, EnuPoint, SimConfig, Tick};
use tf_element::{
    BehaviorConfig, ElementKind, EventAction, FollowLeader, OverridePose, TrafficElement,
};
use tf_output::{CsvWriter, SnapshotObserver};
use tf_road::{LaneKind, RoadNetwork, RoadNetworkBuilder};
use tf_sim::{OverrideRecord, ScenarioBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: u64 = 42;
const TICK_DURATION_MS: u32 = 20; // 50 Hz
const TOTAL_TICKS: u64 = 3_000; // 1 minute
const SNAPSHOT_INTERVAL_TICKS: u64 = 50; // once per simulated second
const OUTPUT_DIR: &str = "output";

const LEAD: ElementId = ElementId(1);
const FOLLOWER: ElementId = ElementId(2);
const FREE: ElementId = ElementId(3);

const MANUAL_SPEED_MPS: f64 = 6.0;
const MANUAL_TICKS: u64 = 500; // 10 s of external poses

// ── Scenario pieces ───────────────────────────────────────────────────────────

/// Two parallel 600 m eastbound lanes, 3.5 m apart.
fn build_network() -> Result<RoadNetwork> {
    let mut b = RoadNetworkBuilder::new();
    b.add_lane(
        LaneKind::Lane,
        vec![EnuPoint::new(0.0, 0.0, 0.0), EnuPoint::new(600.0, 0.0, 0.0)],
    );
    b.add_lane(
        LaneKind::Lane,
        vec![EnuPoint::new(0.0, 3.5, 0.0), EnuPoint::new(600.0, 3.5, 0.0)],
    );
    Ok(b.build()?)
}

fn sedan(id: ElementId, x: f64, y: f64, config: BehaviorConfig) -> TrafficElement {
    TrafficElement::new(
        id,
        ElementKind::Vehicle,
        config,
        EnuPoint::new(x, y, 0.0),
        (4.5, 1.8, 1.5),
    )
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== highway — trafficflow scenario demo ===");
    println!("Vehicles: 3  |  Duration: 60 s  |  Seed: {SEED}");
    println!();

    let network = build_network()?;
    println!("Road network: {} lanes", network.lane_count());

    let config = SimConfig {
        tick_duration_ms: TICK_DURATION_MS,
        total_ticks: TOTAL_TICKS,
        seed: SEED,
        snapshot_interval_ticks: SNAPSHOT_INTERVAL_TICKS,
    };

    // Follower declared leader-last: initialization reorders the sweep so
    // the lead vehicle always updates first.
    let mut scenario = ScenarioBuilder::new(config.clone(), FollowLeader::default())
        .element(sedan(
            FOLLOWER,
            30.0,
            0.0,
            BehaviorConfig {
                initial_speed: 8.0,
                follow: Some(LEAD),
                ..BehaviorConfig::default()
            },
        ))
        .element(sedan(
            LEAD,
            60.0,
            0.0,
            BehaviorConfig { initial_speed: 8.0, ..BehaviorConfig::default() },
        ))
        .element(sedan(
            FREE,
            0.0,
            3.5,
            BehaviorConfig { initial_speed: 10.0, ..BehaviorConfig::default() },
        ))
        // Scripted slowdown for the free vehicle at t = 30 s.
        .event(Tick(1_500), FREE, EventAction::SetVelocity(4.0))
        .network(network)
        .build()?;

    fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut observer = SnapshotObserver::new(writer, &config);

    // Phase 1: everyone autonomous for 20 s.
    scenario.run_ticks(1_000, &mut observer);

    // Phase 2: external poses drive the lead vehicle at a steady
    // MANUAL_SPEED_MPS; the follower keeps reacting to the adopted poses.
    let mut x = scenario
        .manager
        .get(LEAD)
        .expect("lead vehicle is in the session")
        .kinematics
        .position
        .x;
    let mut applied = 0;
    for _ in 0..MANUAL_TICKS {
        x += MANUAL_SPEED_MPS * scenario.clock.dt_secs();
        let batch = [OverrideRecord {
            element: LEAD,
            pose: OverridePose {
                position: EnuPoint::new(x, 0.0, 0.0),
                velocity: [MANUAL_SPEED_MPS, 0.0, 0.0],
                orientation: [0.0, 0.0, 0.0],
                timestamp_secs: scenario.sim_time_secs(),
            },
        }];
        applied += scenario.apply_overrides(&batch).applied;
        scenario.run_ticks(1, &mut observer);
    }
    println!("Manual phase: {applied} override poses adopted");

    // Phase 3: release the lead vehicle and run out the clock.
    scenario.router.clear(LEAD, &mut scenario.manager)?;
    scenario.run(&mut observer);

    if let Some(err) = observer.take_error() {
        return Err(err.into());
    }

    println!();
    println!("Final positions at t = {:.0} s:", scenario.sim_time_secs());
    for id in [LEAD, FOLLOWER, FREE] {
        if let Some(e) = scenario.manager.get(id) {
            println!(
                "  {}: x = {:6.1} m  v = {:4.1} m/s",
                e.element_id, e.kinematics.position.x, e.kinematics.velocity
            );
        }
    }
    println!("Output written to {OUTPUT_DIR}/");
    Ok(())
}
