//! Session-level error types.

use thiserror::Error;

use tf_core::ElementId;
use tf_order::{DependencyEdge, OrderError};

/// Errors surfaced by `ElementManager::initialize` (via
/// `ScenarioBuilder::build`).  All of them are fatal to scenario
/// initialization; the caller decides whether to abort the load.
#[derive(Debug, Error)]
pub enum InitError {
    /// Two elements were declared with the same author-visible id.
    #[error("duplicate element id {0}")]
    DuplicateElement(ElementId),

    /// A behavior config references an element that does not exist in the
    /// session.
    #[error("element {element} references unknown element {missing}")]
    UnknownReference {
        element: ElementId,
        missing: ElementId,
    },

    /// The declared dependencies are cyclic; no valid update order exists.
    /// The element collection is left intact for inspection.
    #[error("dependency cycle detected through edge {0}")]
    Cycle(DependencyEdge),

    /// Graph construction failed (edge bounds violation).
    #[error(transparent)]
    Graph(OrderError),
}

impl From<OrderError> for InitError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Cycle(edge) => InitError::Cycle(edge),
            other => InitError::Graph(other),
        }
    }
}

/// Runtime errors after initialization.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("element {0} not found in the current session")]
    UnknownElement(ElementId),
}

pub type SimResult<T> = Result<T, SimError>;
