//! `tf-core` — foundational types for the `trafficflow` simulator.
//!
//! This crate is a dependency of every other `tf-*` crate.  It intentionally
//! has no `tf-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).  Nothing here can fail, so there is no core error
//! type; each sub-crate defines its own `thiserror` enum for the operations
//! that can.
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `SysId`, `ElementId`, `LaneId`                        |
//! | [`enu`]     | `EnuPoint`, `EnuVec2` (shared local ENU frame)        |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]     | `ElementRng` (per-element deterministic RNG)          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.       |

pub mod enu;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use enu::{EnuPoint, EnuVec2};
pub use ids::{ElementId, LaneId, SysId};
pub use rng::ElementRng;
pub use time::{SimClock, SimConfig, Tick};
