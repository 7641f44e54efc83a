//! `sw-sim`: the simulation engine of the swarm consensus simulator.
//!
//! # Double-buffered tick
//!
//! ```text
//! tick(dt):
//!   ① Clock      : advance tick + elapsed; place obstacles at elapsed.
//!   ② Index      : R-tree over the previous tick's positions.
//!   ③ Coordinate : OpinionModel::coordinate (sequential, engine RNG);
//!                  phase transitions, voter rounds, sync bookkeeping.
//!   ④ Compute    : per agent, from the frozen previous buffer:
//!                  update_opinion → steer → SteeringEngine::step
//!                  (parallel with the `parallel` feature).
//!   ⑤ Apply      : ascending AgentId: write the back buffer, claim
//!                  reached targets, swap buffers.
//!   → Snapshot
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the compute phase on Rayon's thread pool.         |
//! | `serde`    | Propagates serde derives to every config type.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sw_core::SimConfig;
//! use sw_opinion::{BoundedConfidence, ConfidenceConfig};
//! use sw_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), BoundedConfidence::new(ConfidenceConfig::default()))
//!     .build()?;
//! let last = sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use snapshot::{AgentSnapshot, ObstacleSnapshot, OpinionDistribution, Snapshot, TickMetrics};
