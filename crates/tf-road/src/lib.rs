//! `tf-road` — road network geometry and relocalization queries.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`lane`]    | `Lane`, `LaneKind`, arc-length parametrisation            |
//! | [`network`] | `RoadNetwork` (R-tree over segments), `RoadNetworkBuilder`|
//! | [`error`]   | `RoadError`, `RoadResult<T>`                              |
//!
//! # Relocalization
//!
//! The one spatial query this crate exists for:
//! [`RoadNetwork::relocate`] maps an arbitrary ENU position to the nearest
//! lane or lane-link centerline, returning the lane, the arc-length
//! coordinate `s`, the signed lateral offset, and the local lane direction.
//! Manually driven elements use it every time an external pose arrives.

pub mod error;
pub mod lane;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{RoadError, RoadResult};
pub use lane::{Lane, LaneKind};
pub use network::{LaneLocation, RoadNetwork, RoadNetworkBuilder};
