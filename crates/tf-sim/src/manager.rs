//! `ElementManager` — exclusive owner of the session's element collection.
//!
//! The manager is the only component that may reorder or remove elements.
//! The override router and scripted events mutate per-element state through
//! it, but never the collection's structure, so they can interleave with a
//! tick sweep without affecting ordering.

use rustc_hash::FxHashMap;

use tf_core::{ElementId, ElementRng, SysId};
use tf_element::{ElementBehavior, EventAction, ScheduledEvent, SimContext, TrafficElement};
use tf_order::{DependencyEdge, DependencyGraph};
use tf_road::RoadNetwork;

use crate::InitError;

/// How far from a lane an element may spawn or be manually placed and still
/// be mapped onto the network, metres.
const RELOCATE_RADIUS_M: f64 = 20.0;

/// Owns all traffic elements of one scenario session and drives them in
/// dependency order.
///
/// Create empty, [`push`](Self::push) elements in author order, then call
/// [`initialize`](Self::initialize) once before the first tick.  A new
/// scenario means a new manager; nothing is reused across sessions.
#[derive(Debug)]
pub struct ElementManager {
    /// The collection, in author order before `initialize` and in the
    /// computed update order afterwards.
    elements: Vec<TrafficElement>,
    /// Per-element RNGs, permuted alongside `elements` so index `i` always
    /// pairs with `elements[i]`.
    rngs: Vec<ElementRng>,
    /// ElementId → slot in `elements`.
    by_element_id: FxHashMap<ElementId, usize>,
    /// SysId index → slot in `elements`.
    by_sys_id: Vec<usize>,
    initialized: bool,
}

impl ElementManager {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            rngs: Vec::new(),
            by_element_id: FxHashMap::default(),
            by_sys_id: Vec::new(),
            initialized: false,
        }
    }

    /// Add an element during scenario construction.  SysIds are dense and
    /// follow insertion order; the collection may not grow after
    /// [`initialize`](Self::initialize).
    pub fn push(&mut self, element: TrafficElement) {
        debug_assert!(!self.initialized, "collection is sealed after initialize");
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The collection in its current order (update order once initialized).
    pub fn elements(&self) -> &[TrafficElement] {
        &self.elements
    }

    pub fn get(&self, id: ElementId) -> Option<&TrafficElement> {
        self.by_element_id.get(&id).map(|&slot| &self.elements[slot])
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut TrafficElement> {
        self.by_element_id
            .get(&id)
            .map(|&slot| &mut self.elements[slot])
    }

    pub fn get_by_sys_id(&self, sys_id: SysId) -> Option<&TrafficElement> {
        self.by_sys_id
            .get(sys_id.index())
            .map(|&slot| &self.elements[slot])
    }

    // ── Session initialization ────────────────────────────────────────────

    /// Build the dependency graph from every element's declared edges,
    /// compute the deterministic update order, and reorder the collection
    /// to match: topologically ordered elements first, unconstrained
    /// elements appended at the end in their original relative order.
    ///
    /// Also seeds per-element RNGs from `seed` and maps each element onto
    /// `network`.
    ///
    /// On [`InitError::Cycle`] the collection is left intact — deciding
    /// whether to abort the scenario load belongs to the caller, not here.
    pub fn initialize(&mut self, network: &RoadNetwork, seed: u64) -> Result<(), InitError> {
        let n = self.elements.len();

        // ── Assign dense SysIds and index by ElementId ────────────────────
        //
        // Vertex count comes from the element table length at this moment,
        // never from any counter that could span sessions.
        self.by_element_id.clear();
        self.by_element_id.reserve(n);
        for (i, element) in self.elements.iter_mut().enumerate() {
            if self
                .by_element_id
                .insert(element.element_id, i)
                .is_some()
            {
                return Err(InitError::DuplicateElement(element.element_id));
            }
            element.sys_id = SysId(i as u32);
        }

        // ── Resolve behavior references to leader SysIds ──────────────────
        let mut leaders_per_element: Vec<Vec<SysId>> = Vec::with_capacity(n);
        for element in &self.elements {
            let mut leaders = Vec::new();
            for referenced in element.config.referenced_elements() {
                match self.by_element_id.get(&referenced) {
                    Some(&slot) => leaders.push(SysId(slot as u32)),
                    None => {
                        return Err(InitError::UnknownReference {
                            element: element.element_id,
                            missing: referenced,
                        });
                    }
                }
            }
            leaders_per_element.push(leaders);
        }

        let mut edges: Vec<DependencyEdge> = Vec::new();
        for (element, leaders) in self.elements.iter_mut().zip(leaders_per_element) {
            let sys_id = element.sys_id;
            element.bind_session(sys_id, leaders);
            edges.extend(element.dependency_edges());
        }

        // ── Build, sort, reorder ──────────────────────────────────────────
        let graph = DependencyGraph::build(&edges, n)?;
        let result = graph.sort()?;

        log::debug!(
            "update order computed: raw={:?} ordered={:?} unordered={:?}",
            (0..n).collect::<Vec<_>>(),
            result.ordered,
            result.unordered,
        );

        // Full update order: constrained first, then the unconstrained tail
        // in creation order.
        let permutation: Vec<SysId> = result
            .ordered
            .iter()
            .chain(result.unordered.iter())
            .copied()
            .collect();
        debug_assert_eq!(permutation.len(), n);

        let mut slots: Vec<Option<TrafficElement>> =
            self.elements.drain(..).map(Some).collect();
        self.elements = permutation
            .iter()
            .map(|sys_id| slots[sys_id.index()].take().expect("permutation is a bijection"))
            .collect();

        // ── Rebuild lookups, seed RNGs, place on the network ──────────────
        self.by_sys_id = vec![usize::MAX; n];
        self.rngs = Vec::with_capacity(n);
        for (slot, element) in self.elements.iter_mut().enumerate() {
            self.by_element_id.insert(element.element_id, slot);
            self.by_sys_id[element.sys_id.index()] = slot;
            self.rngs.push(ElementRng::new(seed, element.element_id));
            element.localize(network, RELOCATE_RADIUS_M);
        }

        self.initialized = true;
        log::info!(
            "session initialized: {} elements, {} dependency edges",
            n,
            edges.len()
        );
        Ok(())
    }

    // ── Per-tick sweep ────────────────────────────────────────────────────

    /// Update every autonomous element, in the fixed dependency order.
    /// Manual elements are skipped — their pose is driven through the
    /// override router.  Returns the number of elements updated.
    ///
    /// Each `plan` call receives a [`SimContext`] over the collection;
    /// because the sweep respects the declared edges, a follower's context
    /// already holds its leaders' post-tick state.
    pub fn tick(
        &mut self,
        dt: f64,
        behavior: &dyn ElementBehavior,
        network: &RoadNetwork,
    ) -> usize {
        debug_assert!(self.initialized, "tick before initialize");
        let mut updated = 0;
        for slot in 0..self.elements.len() {
            if self.elements[slot].manual.is_manual() {
                continue;
            }
            let plan = {
                let ctx = SimContext::new(dt, &self.elements, &self.by_sys_id);
                behavior.plan(&self.elements[slot], &ctx, &mut self.rngs[slot])
            };
            self.elements[slot].update(plan, dt, network);
            updated += 1;
        }
        updated
    }

    /// Apply one fired scripted event.  Events against Manual elements are
    /// dropped: their state belongs to the external driver.
    pub fn apply_event(&mut self, event: ScheduledEvent) {
        let Some(element) = self.get_mut(event.element) else {
            log::warn!("event targets unknown element {}", event.element);
            return;
        };
        if element.manual.is_manual() {
            log::debug!("event on manually driven element {} dropped", event.element);
            return;
        }
        match event.action {
            EventAction::SetVelocity(v) => element.kinematics.velocity = v.max(0.0),
            EventAction::SetAcceleration(a) => element.kinematics.acceleration = a,
        }
    }
}

impl Default for ElementManager {
    fn default() -> Self {
        Self::new()
    }
}
