//! `sw-spatial`: the world the agents move through.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`obstacle`] | `Obstacle`, `Axis`; closed-form oscillator                 |
//! | [`target`]   | `Target`; nearest / nearest-unclaimed lookups              |
//! | [`index`]    | `NeighborIndex` (R-tree), `within_radius` (linear scan)    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod index;
pub mod obstacle;
pub mod target;


pub use index::{NeighborIndex, within_radius};
pub use obstacle::{Axis, Obstacle};
pub use target::{Target, nearest_target, nearest_unclaimed};
