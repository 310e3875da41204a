//! Road-network error type.

use thiserror::Error;

use tf_core::LaneId;

/// Errors produced by `tf-road`.
#[derive(Debug, Error)]
pub enum RoadError {
    /// A lane polyline needs at least two distinct points.
    #[error("lane {0} has a degenerate centerline ({1} points)")]
    DegenerateCenterline(LaneId, usize),

    #[error("lane {0} not found in network")]
    LaneNotFound(LaneId),
}

pub type RoadResult<T> = Result<T, RoadError>;
