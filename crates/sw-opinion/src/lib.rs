//! `sw-opinion`: how agents form and share opinions.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`context`]      | `TickContext<'a>`: read-only tick state shared by all agents |
//! | [`model`]        | `OpinionModel` trait, `OpinionUpdate`, `Steer`, `ColorClass` |
//! | [`travel_time`]  | `ThresholdTravelTime`: travel-time estimate + phase cycle  |
//! | [`phase`]        | `Phase`, `Leg`, `PhaseMachine` (transition table)           |
//! | [`voter`]        | pairwise voter-model exchange                               |
//! | [`majority`]     | `PeriodicMajority`: scheduled heading synchronisation      |
//! | [`confidence`]   | `BoundedConfidence`: Hegselmann–Krause averaging           |
//!
//! # Tick protocol
//!
//! The simulation engine drives a model in two steps every tick:
//!
//! 1. **Coordinate** (sequential, `&mut self`): population-wide logic that
//!    needs the whole previous state and the engine RNG, such as phase
//!    transitions and voter rounds.  May replace every opinion at once.
//!
//! 2. **Update** (per agent, `&self`, parallelisable): compute one agent's
//!    new opinion and steering mode from the frozen previous state and its
//!    neighbour list.
//!
//! Nothing written in step 2 is visible to other agents until the next tick.

pub mod confidence;
pub mod context;
pub mod majority;
pub mod model;
pub mod phase;
pub mod travel_time;
pub mod voter;


pub use confidence::{BoundedConfidence, ConfidenceConfig};
pub use context::TickContext;
pub use majority::{MajorityConfig, PeriodicMajority};
pub use model::{ColorClass, Coordination, Goal, OpinionDomain, OpinionModel, OpinionUpdate, Steer};
pub use phase::{Leg, Phase, PhaseMachine, Trigger};
pub use travel_time::{ThresholdTravelTime, TravelTimeConfig, estimate_travel_time};
pub use voter::{is_unanimous, voter_exchange, voter_partners};
