//! Element-subsystem error type.

use thiserror::Error;

use tf_core::{ElementId, EnuPoint};

/// Errors produced by `tf-element`.
#[derive(Debug, Error)]
pub enum ElementError {
    /// A manually placed element could not be mapped onto any lane or
    /// lane-link.  The element stays in the collection, stays Manual, and
    /// its geometry is flagged invalid until a later override relocalizes.
    #[error("element {element} could not be relocalized near {position}")]
    Relocalization {
        element: ElementId,
        position: EnuPoint,
    },
}

pub type ElementResult<T> = Result<T, ElementError>;
