//! Dependency graph construction and cycle search.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing
//! edges.  Given a vertex `v`, its successors occupy the slice:
//!
//! ```text
//! succ[ out_start[v] .. out_start[v+1] ]
//! ```
//!
//! Edges are sorted by `(from, to)` at build time, so every successor list
//! is ascending — part of the determinism contract, since traversal order
//! feeds the reported cycle edge.

use tf_core::SysId;

use crate::{OrderError, OrderResult};

// ── DependencyEdge ────────────────────────────────────────────────────────────

/// A directed update constraint: `from` must be processed strictly before
/// `to` in the same tick, so that `to`'s update observes `from`'s
/// already-updated state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DependencyEdge {
    pub from: SysId,
    pub to: SysId,
}

impl DependencyEdge {
    #[inline]
    pub fn new(from: SysId, to: SysId) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from.0, self.to.0)
    }
}

// ── DependencyGraph ───────────────────────────────────────────────────────────

/// Directed dependency graph over the dense SysId range `[0, vertex_count)`.
///
/// Built once per scenario session from the union of all elements' declared
/// edges; never mutated afterwards.  Rebuilt in full on every scenario
/// (re)initialization — the vertex count is an explicit parameter taken
/// from the session's element table length, so a stale graph can never
/// leak across sessions with different populations.
#[derive(Debug)]
pub struct DependencyGraph {
    /// CSR row pointer.  Successors of vertex `v` are at
    /// `succ[out_start[v] .. out_start[v+1]]`.  Length = `vertex_count + 1`.
    out_start: Vec<u32>,

    /// Successor vertex of each edge, sorted by `(from, to)`.
    succ: Vec<SysId>,

    /// `constrained[v]` is true when `v` appears in at least one edge
    /// (either endpoint).  Drives the ordered/unordered partition.
    constrained: Vec<bool>,
}

/// DFS vertex colouring for the iterative cycle search.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl DependencyGraph {
    /// Build a graph with `vertex_count` vertices from declared edges.
    ///
    /// Fails with [`OrderError::EdgeOutOfBounds`] if any edge references a
    /// vertex `>= vertex_count`.  Duplicate edges are kept; they are
    /// harmless to both the cycle search and the sort.
    pub fn build(edges: &[DependencyEdge], vertex_count: usize) -> OrderResult<Self> {
        for &edge in edges {
            if edge.from.index() >= vertex_count || edge.to.index() >= vertex_count {
                return Err(OrderError::EdgeOutOfBounds { edge, vertex_count });
            }
        }

        let mut sorted = edges.to_vec();
        sorted.sort_unstable_by_key(|e| (e.from.0, e.to.0));

        // CSR row pointer via counting + prefix sum.
        let mut out_start = vec![0u32; vertex_count + 1];
        for e in &sorted {
            out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            out_start[i] += out_start[i - 1];
        }
        debug_assert_eq!(out_start[vertex_count] as usize, sorted.len());

        let succ: Vec<SysId> = sorted.iter().map(|e| e.to).collect();

        let mut constrained = vec![false; vertex_count];
        for e in &sorted {
            constrained[e.from.index()] = true;
            constrained[e.to.index()] = true;
        }

        Ok(Self { out_start, succ, constrained })
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.constrained.len()
    }

    pub fn edge_count(&self) -> usize {
        self.succ.len()
    }

    /// Whether `v` appears in at least one declared edge.
    #[inline]
    pub fn is_constrained(&self, v: SysId) -> bool {
        self.constrained[v.index()]
    }

    /// Iterator over the successors of `v`, ascending.
    #[inline]
    pub fn successors(&self, v: SysId) -> impl Iterator<Item = SysId> + '_ {
        let start = self.out_start[v.index()] as usize;
        let end = self.out_start[v.index() + 1] as usize;
        self.succ[start..end].iter().copied()
    }

    /// In-degree of every vertex.  Used by the sort's ready-queue seed.
    pub(crate) fn in_degrees(&self) -> Vec<u32> {
        let mut deg = vec![0u32; self.vertex_count()];
        for &to in &self.succ {
            deg[to.index()] += 1;
        }
        deg
    }

    // ── Cycle search ──────────────────────────────────────────────────────

    /// Search for a cycle; return one edge that closes it, or `None` when
    /// the graph is acyclic.
    ///
    /// Iterative depth-first traversal started from every vertex, so
    /// disconnected subgraphs are fully covered.  An edge to a vertex still
    /// on the traversal stack is a back edge and is reported as-is.  The
    /// search has no side effects and may be repeated freely.
    pub fn find_cycle(&self) -> Option<DependencyEdge> {
        let n = self.vertex_count();
        let mut mark = vec![Mark::Unvisited; n];
        // (vertex, successor cursor) pairs; explicit stack instead of
        // recursion so deep follower chains cannot overflow the call stack.
        let mut stack: Vec<(SysId, usize)> = Vec::new();

        for root in 0..n {
            if mark[root] != Mark::Unvisited {
                continue;
            }
            let root = SysId(root as u32);
            mark[root.index()] = Mark::OnStack;
            stack.push((root, 0));

            while let Some(&mut (v, ref mut cursor)) = stack.last_mut() {
                let start = self.out_start[v.index()] as usize;
                let end = self.out_start[v.index() + 1] as usize;

                if start + *cursor == end {
                    mark[v.index()] = Mark::Done;
                    stack.pop();
                    continue;
                }

                let next = self.succ[start + *cursor];
                *cursor += 1;

                match mark[next.index()] {
                    Mark::OnStack => return Some(DependencyEdge::new(v, next)),
                    Mark::Unvisited => {
                        mark[next.index()] = Mark::OnStack;
                        stack.push((next, 0));
                    }
                    Mark::Done => {}
                }
            }
        }
        None
    }
}
