//! `sw-agent`: Structure-of-Arrays agent storage for the swarm simulator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`store`]     | `AgentStore` (SoA arrays, cloned once per tick as the frozen previous buffer) |
//! | [`builder`]   | `AgentStoreBuilder`, `Placement`, `HeadingInit`            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types.     |

pub mod builder;
pub mod store;


pub use builder::{AgentStoreBuilder, HeadingInit, Placement};
pub use store::AgentStore;
