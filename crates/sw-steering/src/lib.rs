//! `sw-steering`: per-agent heading and position update.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`params`] | `SteeringParams`: radii, gains, turn limit, nominal speed      |
//! | [`forces`] | one function per force term                                     |
//! | [`engine`] | `SteeringEngine`, `SteeringInput`, `SteeringOutput`             |
//!
//! # Force model
//!
//! Every term produces a 2-D vector; the terms are summed and the sum is
//! normalised.  The normalised direction becomes the new heading (a zero sum
//! leaves the heading unchanged) and the agent advances `speed · dt` along
//! it:
//!
//! | Term       | Vector                                                          |
//! |------------|-----------------------------------------------------------------|
//! | cohesion   | unit vector to the neighbour centroid × gain                    |
//! | alignment  | unit vector at the neighbours' circular-mean heading × gain     |
//! | separation | Σ (self − other) over neighbours closer than the separation distance × gain |
//! | repulsion  | unit vector away from each obstacle within radius × gain / distance |
//! | goal       | unit vector at the heading turned toward the goal by at most `max_turn_rate` × gain |
//! | inertia    | unit vector at the current heading × gain                       |
//!
//! An agent that would leave the world has its heading reversed and its
//! position clamped to the boundary.

pub mod engine;
pub mod forces;
pub mod params;


pub use engine::{NeighborSample, SteeringEngine, SteeringInput, SteeringOutput};
pub use params::SteeringParams;
