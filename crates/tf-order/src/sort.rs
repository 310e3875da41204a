//! Deterministic topological sort over a [`DependencyGraph`].

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tf_core::SysId;

use crate::{DependencyGraph, OrderError, OrderResult};

/// The computed update order for one scenario session.
///
/// `ordered` and `unordered` together partition the declared vertex set
/// exactly: every SysId in `[0, vertex_count)` appears in exactly one of
/// the two sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortResult {
    /// A topological order over the vertices referenced by at least one
    /// edge: for every edge `u -> v`, `u` appears before `v`.
    pub ordered: Vec<SysId>,

    /// Vertices with no declared edges, ascending SysId (their original
    /// creation order).  No ordering constraint applies to them.
    pub unordered: Vec<SysId>,
}

impl DependencyGraph {
    /// Compute the per-tick update order.
    ///
    /// Fails atomically with [`OrderError::Cycle`] when the graph is
    /// cyclic — no partial order is ever published.  Otherwise runs Kahn's
    /// algorithm with a min-heap of ready vertices, so among vertices whose
    /// dependencies are all satisfied the **lowest SysId is emitted first**.
    /// This tie-break is the determinism contract: the same graph produces
    /// an identical `ordered` sequence on every call.
    pub fn sort(&self) -> OrderResult<SortResult> {
        if let Some(edge) = self.find_cycle() {
            return Err(OrderError::Cycle(edge));
        }

        let n = self.vertex_count();
        let mut in_deg = self.in_degrees();

        let mut ready: BinaryHeap<Reverse<SysId>> = (0..n)
            .filter(|&v| in_deg[v] == 0)
            .map(|v| Reverse(SysId(v as u32)))
            .collect();

        let mut ordered = Vec::with_capacity(n);
        let mut unordered = Vec::new();

        while let Some(Reverse(v)) = ready.pop() {
            if self.is_constrained(v) {
                ordered.push(v);
            } else {
                unordered.push(v);
            }
            for next in self.successors(v) {
                in_deg[next.index()] -= 1;
                if in_deg[next.index()] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        // find_cycle returned None, so Kahn must consume every vertex.
        debug_assert_eq!(ordered.len() + unordered.len(), n);

        Ok(SortResult { ordered, unordered })
    }
}
