//! `tf-order` — the dependency-ordered update scheduler.
//!
//! Some per-tick updates are only valid once another element's *new* state
//! is known: a follower must see its leader's post-tick position, a merging
//! vehicle must see the vehicle it merges around.  Elements declare these
//! constraints as directed edges, and this crate turns the edge set into a
//! fixed per-tick update order.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`graph`] | `DependencyEdge`, `DependencyGraph` (CSR), cycle search   |
//! | [`sort`]  | deterministic topological sort, `SortResult`              |
//! | [`error`] | `OrderError`, `OrderResult<T>`                            |
//!
//! # Determinism
//!
//! The sort uses Kahn's algorithm with a lowest-SysId-first min-heap of
//! ready vertices, so the same graph always yields the same order — a
//! correctness requirement, since reproducible runs depend on it.

pub mod error;
pub mod graph;
pub mod sort;

#[cfg(test)]
mod tests;

pub use error::{OrderError, OrderResult};
pub use graph::{DependencyEdge, DependencyGraph};
pub use sort::SortResult;
