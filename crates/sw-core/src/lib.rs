//! `sw-core`: foundational types for the swarm consensus simulator.
//!
//! This crate is a dependency of every other `sw-*` crate.  It has no `sw-*`
//! dependencies and only two external ones (`rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `ObstacleId`, `TargetId`                       |
//! | [`geo`]     | `Vec2`, `WorldBounds`, angle helpers, circular mean       |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                           |
//! | [`rng`]     | `SimRng`: the single seeded generator of a run           |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Vec2, WorldBounds, angle_diff, circular_mean, wrap_angle};
pub use ids::{AgentId, ObstacleId, TargetId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
