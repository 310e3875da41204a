//! Unit tests for tf-order.

use tf_core::SysId;

use crate::{DependencyEdge, DependencyGraph, OrderError};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn edge(from: u32, to: u32) -> DependencyEdge {
    DependencyEdge::new(SysId(from), SysId(to))
}

fn graph(edges: &[(u32, u32)], n: usize) -> DependencyGraph {
    let edges: Vec<DependencyEdge> = edges.iter().map(|&(f, t)| edge(f, t)).collect();
    DependencyGraph::build(&edges, n).expect("valid graph")
}

/// Index of `v` in `seq`, panicking when absent.
fn position(seq: &[SysId], v: u32) -> usize {
    seq.iter().position(|&s| s == SysId(v)).expect("vertex in sequence")
}

/// `true` when `edge` closes a cycle: some path leads from `edge.to` back
/// to `edge.from`.
fn edge_is_in_cycle(g: &DependencyGraph, e: DependencyEdge) -> bool {
    let mut stack = vec![e.to];
    let mut seen = vec![false; g.vertex_count()];
    while let Some(v) = stack.pop() {
        if v == e.from {
            return true;
        }
        if std::mem::replace(&mut seen[v.index()], true) {
            continue;
        }
        stack.extend(g.successors(v));
    }
    false
}

// ── Build ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod build {
    use super::*;

    #[test]
    fn rejects_out_of_bounds_from() {
        let err = DependencyGraph::build(&[edge(4, 1)], 4).unwrap_err();
        assert_eq!(
            err,
            OrderError::EdgeOutOfBounds { edge: edge(4, 1), vertex_count: 4 }
        );
    }

    #[test]
    fn rejects_out_of_bounds_to() {
        let err = DependencyGraph::build(&[edge(0, 9)], 4).unwrap_err();
        assert!(matches!(err, OrderError::EdgeOutOfBounds { .. }));
    }

    #[test]
    fn empty_graph_builds() {
        let g = graph(&[], 3);
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 0);
        assert!(!g.is_constrained(SysId(0)));
    }

    #[test]
    fn successors_are_ascending() {
        let g = graph(&[(0, 3), (0, 1), (0, 2)], 4);
        let succ: Vec<SysId> = g.successors(SysId(0)).collect();
        assert_eq!(succ, vec![SysId(1), SysId(2), SysId(3)]);
    }

    #[test]
    fn constrained_marks_both_endpoints() {
        let g = graph(&[(1, 2)], 4);
        assert!(g.is_constrained(SysId(1)));
        assert!(g.is_constrained(SysId(2)));
        assert!(!g.is_constrained(SysId(0)));
        assert!(!g.is_constrained(SysId(3)));
    }
}

// ── Cycle detection ───────────────────────────────────────────────────────────

#[cfg(test)]
mod cycles {
    use super::*;

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let g = graph(&[(0, 1), (1, 2), (0, 2)], 3);
        assert_eq!(g.find_cycle(), None);
    }

    #[test]
    fn two_vertex_cycle_names_a_real_cycle_edge() {
        let g = graph(&[(1, 2), (2, 1)], 3);
        let e = g.find_cycle().expect("cycle expected");
        assert!(e == edge(1, 2) || e == edge(2, 1));
        assert!(edge_is_in_cycle(&g, e));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let g = graph(&[(2, 2)], 3);
        assert_eq!(g.find_cycle(), Some(edge(2, 2)));
    }

    #[test]
    fn cycle_in_disconnected_subgraph_is_found() {
        // Component {0,1} is acyclic; component {3,4,5} contains a cycle.
        let g = graph(&[(0, 1), (3, 4), (4, 5), (5, 3)], 6);
        let e = g.find_cycle().expect("cycle expected");
        assert!(edge_is_in_cycle(&g, e));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        // Two paths to the same vertex must not be mistaken for a back edge.
        let g = graph(&[(0, 1), (0, 2), (1, 3), (2, 3)], 4);
        assert_eq!(g.find_cycle(), None);
    }

    #[test]
    fn repeated_calls_are_stable() {
        let g = graph(&[(1, 2), (2, 1)], 3);
        assert_eq!(g.find_cycle(), g.find_cycle());
    }
}

// ── Topological sort ──────────────────────────────────────────────────────────

#[cfg(test)]
mod sort {
    use super::*;

    #[test]
    fn chain_with_shortcut_and_free_vertex() {
        // Edges 1->2, 2->3, 1->3 over 4 vertices: vertex 0 is unconstrained.
        let g = graph(&[(1, 2), (2, 3), (1, 3)], 4);
        let result = g.sort().unwrap();

        assert_eq!(result.unordered, vec![SysId(0)]);
        assert!(position(&result.ordered, 1) < position(&result.ordered, 2));
        assert!(position(&result.ordered, 2) < position(&result.ordered, 3));
        assert!(position(&result.ordered, 1) < position(&result.ordered, 3));
    }

    #[test]
    fn every_edge_is_respected() {
        let edges = [(0, 4), (4, 2), (2, 6), (0, 6), (5, 1), (1, 4)];
        let g = graph(&edges, 8);
        let result = g.sort().unwrap();
        for (u, v) in edges {
            assert!(
                position(&result.ordered, u) < position(&result.ordered, v),
                "edge {u} -> {v} violated in {:?}",
                result.ordered
            );
        }
    }

    #[test]
    fn partition_is_exact() {
        let g = graph(&[(1, 4), (4, 2)], 7);
        let result = g.sort().unwrap();

        let mut all: Vec<SysId> = result
            .ordered
            .iter()
            .chain(result.unordered.iter())
            .copied()
            .collect();
        all.sort_unstable();
        let expected: Vec<SysId> = (0..7).map(SysId).collect();
        assert_eq!(all, expected, "no vertex dropped, none duplicated");
    }

    #[test]
    fn cycle_fails_atomically() {
        let g = graph(&[(1, 2), (2, 1)], 2);
        let err = g.sort().unwrap_err();
        match err {
            OrderError::Cycle(e) => assert!(e == edge(1, 2) || e == edge(2, 1)),
            other => panic!("expected Cycle, got {other:?}"),
        }
    }

    #[test]
    fn ready_ties_break_lowest_sys_id_first() {
        // 0, 1, 2 are all immediately ready and all constrained (via 3).
        let g = graph(&[(0, 3), (1, 3), (2, 3)], 4);
        let result = g.sort().unwrap();
        assert_eq!(
            result.ordered,
            vec![SysId(0), SysId(1), SysId(2), SysId(3)]
        );
    }

    #[test]
    fn repeated_sorts_are_identical() {
        let g = graph(&[(3, 1), (1, 5), (0, 5), (2, 4), (4, 5)], 8);
        let first = g.sort().unwrap();
        let second = g.sort().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unordered_preserves_creation_order() {
        let g = graph(&[(2, 5)], 8);
        let result = g.sort().unwrap();
        assert_eq!(
            result.unordered,
            vec![SysId(0), SysId(1), SysId(3), SysId(4), SysId(6), SysId(7)]
        );
    }

    #[test]
    fn edge_free_graph_is_all_unordered() {
        let g = graph(&[], 4);
        let result = g.sort().unwrap();
        assert!(result.ordered.is_empty());
        assert_eq!(result.unordered.len(), 4);
    }
}
