//! The `Scenario` session and its fluent builder.

use tf_core::{ElementId, SimClock, SimConfig, Tick};
use tf_element::{ElementBehavior, EventAction, EventRegistry, TrafficElement};
use tf_road::RoadNetwork;

use crate::{
    ElementManager, InitError, ManualOverrideRouter, OverrideRecord, RouteSummary, SimObserver,
};

// ── Scenario ──────────────────────────────────────────────────────────────────

/// One scenario session: configuration, clock, road network, the ordered
/// element collection, scripted events, and the override router.
///
/// Create via [`ScenarioBuilder`]; building runs the dependency sort, so a
/// `Scenario` value is always ready to tick.  All artifacts here are
/// session-scoped — reloading a scenario means building a new `Scenario`.
#[derive(Debug)]
pub struct Scenario<B: ElementBehavior> {
    pub config: SimConfig,
    pub clock: SimClock,
    pub manager: ElementManager,
    pub network: RoadNetwork,
    pub events: EventRegistry,
    pub behavior: B,
    pub router: ManualOverrideRouter,
}

impl<B: ElementBehavior> Scenario<B> {
    /// Run from the current tick to `config.end_tick()`, invoking observer
    /// hooks at every tick boundary.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }
            self.step_once(now, observer);
        }
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores
    /// `end_tick`).  Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.step_once(now, observer);
        }
    }

    /// Dispatch an override batch for the current tick.  May be called
    /// before or after [`run_ticks`](Self::run_ticks) within a tick; the
    /// router never disturbs the update order.
    pub fn apply_overrides(&mut self, batch: &[OverrideRecord]) -> RouteSummary {
        self.router.route(batch, &mut self.manager, &self.network)
    }

    /// Simulated seconds at the current clock position.
    pub fn sim_time_secs(&self) -> f64 {
        self.clock.sim_time_secs()
    }

    fn step_once<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        observer.on_tick_start(now);

        for event in self.events.drain_due(now) {
            self.manager.apply_event(event);
        }
        let updated = self
            .manager
            .tick(self.clock.dt_secs(), &self.behavior, &self.network);

        observer.on_tick_end(now, updated);
        if self.config.snapshot_interval_ticks > 0
            && now.0.is_multiple_of(self.config.snapshot_interval_ticks)
        {
            observer.on_snapshot(now, self.manager.elements());
        }
        self.clock.advance();
    }
}

// ── ScenarioBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Scenario<B>`].
///
/// # Example
///
/// ```rust,ignore
/// let mut scenario = ScenarioBuilder::new(config, ConstantSpeed)
///     .network(network)
///     .element(leader)
///     .element(follower)
///     .build()?;
/// scenario.run(&mut NoopObserver);
/// ```
pub struct ScenarioBuilder<B: ElementBehavior> {
    config: SimConfig,
    behavior: B,
    network: Option<RoadNetwork>,
    elements: Vec<TrafficElement>,
    events: EventRegistry,
}

impl<B: ElementBehavior> ScenarioBuilder<B> {
    pub fn new(config: SimConfig, behavior: B) -> Self {
        Self {
            config,
            behavior,
            network: None,
            elements: Vec::new(),
            events: EventRegistry::new(),
        }
    }

    /// Supply the road network.  If not called, an empty network is used
    /// and every element runs off-network (straight-line motion).
    pub fn network(mut self, network: RoadNetwork) -> Self {
        self.network = Some(network);
        self
    }

    /// Add one element, in author order.
    pub fn element(mut self, element: TrafficElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Add a batch of elements, preserving their order.
    pub fn elements(mut self, elements: impl IntoIterator<Item = TrafficElement>) -> Self {
        self.elements.extend(elements);
        self
    }

    /// Schedule a scripted state change.
    pub fn event(mut self, tick: Tick, element: ElementId, action: EventAction) -> Self {
        self.events.register(tick, element, action);
        self
    }

    /// Resolve references, run the dependency sort, and return a
    /// ready-to-tick [`Scenario`].
    ///
    /// Fails with [`InitError::Cycle`] when the declared dependencies are
    /// cyclic — the scenario is rejected before simulation starts, with the
    /// offending edge named in the error.
    pub fn build(self) -> Result<Scenario<B>, InitError> {
        let network = self.network.unwrap_or_else(RoadNetwork::empty);

        let mut manager = ElementManager::new();
        for element in self.elements {
            manager.push(element);
        }
        manager.initialize(&network, self.config.seed)?;

        Ok(Scenario {
            clock: self.config.make_clock(),
            config: self.config,
            manager,
            network,
            events: self.events,
            behavior: self.behavior,
            router: ManualOverrideRouter::default(),
        })
    }
}
