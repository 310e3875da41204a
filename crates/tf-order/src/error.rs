//! Scheduler error type.

use thiserror::Error;

use crate::DependencyEdge;

/// Errors produced by `tf-order`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// An edge references a vertex outside `[0, vertex_count)`.
    #[error("edge {edge} references a vertex outside [0, {vertex_count})")]
    EdgeOutOfBounds {
        edge: DependencyEdge,
        vertex_count: usize,
    },

    /// The graph is cyclic; no valid update order exists.  Carries one edge
    /// that closes a cycle for diagnostics.
    #[error("dependency cycle detected through edge {0}")]
    Cycle(DependencyEdge),
}

pub type OrderResult<T> = Result<T, OrderError>;
