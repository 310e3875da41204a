//! `tf-element` — traffic elements and their runtime capabilities.
//!
//! A `TrafficElement` owns everything that is *per vehicle*: identity,
//! kinematic state, bounding geometry, behavior configuration (from which
//! its dependency edges are derived), and the manual-override state machine
//! that lets an external source drive its pose instead of the behavior
//! model.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`state`]    | `Kinematics`, `GeometryData`                            |
//! | [`manual`]   | `ManualMode`, `OverridePose`, `ManualOverrideState`     |
//! | [`element`]  | `TrafficElement`, `ElementKind`, `BehaviorConfig`       |
//! | [`behavior`] | `ElementBehavior`, `SimContext`, stock behaviors        |
//! | [`events`]   | `EventRegistry`, per-session scripted state changes     |
//! | [`error`]    | `ElementError`, `ElementResult<T>`                      |
//!
//! # Manual capability by composition
//!
//! Manual driving is not a separate element type: every element carries a
//! [`ManualOverrideState`] field and the update path dispatches on its mode
//! enum.  While the mode is `Manual` the normal physics update performs no
//! state mutation; pose changes come exclusively through
//! [`TrafficElement::apply_override`].

pub mod behavior;
pub mod element;
pub mod error;
pub mod events;
pub mod manual;
pub mod state;


pub use behavior::{ConstantSpeed, ElementBehavior, FollowLeader, Idle, Plan, SimContext};
pub use element::{BehaviorConfig, ElementKind, TrafficElement};
pub use error::{ElementError, ElementResult};
pub use events::{EventAction, EventRegistry, ScheduledEvent};
pub use manual::{ManualMode, ManualOverrideState, OverridePose};
pub use state::{GeometryData, Kinematics};
