//! `tf-sim` — the scenario session orchestrator.
//!
//! # Per-session life cycle
//!
//! ```text
//! ScenarioBuilder::build()
//!   ① assign dense SysIds from the element table
//!   ② resolve follow/merge references to leader SysIds
//!   ③ DependencyGraph::build + sort  (cycle ⇒ InitError::Cycle)
//!   ④ reorder the element vector: topological order first,
//!      unconstrained elements appended in creation order
//!
//! Scenario::run()
//!   for each tick:
//!     ⑤ fire due scripted events
//!     ⑥ sweep elements in the fixed order; Manual elements are skipped
//!   (externally driven poses arrive through Scenario::apply_overrides,
//!    which may interleave with ticks at any point)
//! ```
//!
//! The sequential sweep order **is** the correctness mechanism: it is the
//! only place the dependency contract — every declared `leader -> follower`
//! edge updates the leader first — is enforced.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`manager`]  | `ElementManager` — ownership, ordering, tick sweep     |
//! | [`router`]   | `ManualOverrideRouter`, `OverrideRecord`, `RouteSummary`|
//! | [`scenario`] | `Scenario`, `ScenarioBuilder`                          |
//! | [`observer`] | `SimObserver`, `NoopObserver`                          |
//! | [`error`]    | `InitError`, `SimError`                                |

pub mod error;
pub mod manager;
pub mod observer;
pub mod router;
pub mod scenario;

#[cfg(test)]
mod tests;

pub use error::{InitError, SimError, SimResult};
pub use manager::ElementManager;
pub use observer::{NoopObserver, SimObserver};
pub use router::{ManualOverrideRouter, OverrideRecord, RouteSummary};
pub use scenario::{Scenario, ScenarioBuilder};
