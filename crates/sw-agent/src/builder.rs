//! Fluent builder for the initial `AgentStore`.
//!
//! # Usage
//!
//! ```rust
//! use sw_agent::{AgentStoreBuilder, HeadingInit, Placement};
//! use sw_core::{SimRng, Vec2};
//!
//! let mut rng = SimRng::new(42);
//! let store = AgentStoreBuilder::new(20)
//!     .placement(Placement::Point(Vec2::new(4.0, 287.0)))
//!     .headings(HeadingInit::Fixed(0.0))
//!     .speed(1.0)
//!     .build(&mut rng)
//!     .unwrap();
//!
//! assert_eq!(store.count, 20);
//! ```
//!
//! Opinions are left at `0.0`; the simulation builder asks the opinion
//! model for each agent's initial value.

use std::f64::consts::TAU;

use sw_core::{CoreError, CoreResult, SimRng, Vec2, WorldBounds};
use sw_core::error::{ensure_in_range, ensure_positive};

use crate::AgentStore;

/// Where agents start.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Placement {
    /// Everyone starts on the same point (the voter scenario's origin).
    Point(Vec2),
    /// Independent uniform draws inside a rectangle.
    Uniform { min: Vec2, max: Vec2 },
    /// One explicit position per agent.
    Explicit(Vec<Vec2>),
}

impl Placement {
    /// Uniform placement over the whole world.
    pub fn anywhere(bounds: &WorldBounds) -> Self {
        Placement::Uniform { min: bounds.min, max: bounds.max }
    }
}

/// Initial headings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeadingInit {
    /// Uniform in `[0, 2π)`.
    Random,
    Fixed(f64),
    Explicit(Vec<f64>),
}

/// Fluent builder for [`AgentStore`].
pub struct AgentStoreBuilder {
    count:             usize,
    placement:         Placement,
    headings:          HeadingInit,
    speed:             f64,
    informed_fraction: f64,
}

impl AgentStoreBuilder {
    /// Create a builder for `count` agents, all at the origin with random
    /// headings, speed 1, and nobody informed.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            placement:         Placement::Point(Vec2::ZERO),
            headings:          HeadingInit::Random,
            speed:             1.0,
            informed_fraction: 0.0,
        }
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn headings(mut self, headings: HeadingInit) -> Self {
        self.headings = headings;
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Probability, drawn independently per agent, of being informed.
    pub fn informed_fraction(mut self, fraction: f64) -> Self {
        self.informed_fraction = fraction;
        self
    }

    /// Construct the store, drawing random placement, headings and roles
    /// from `rng` in agent order.
    ///
    /// # Errors
    ///
    /// - explicit position/heading lists whose length differs from `count`
    /// - non-positive speed, informed fraction outside `[0, 1]`
    /// - a uniform placement rectangle with `min > max`
    pub fn build(self, rng: &mut SimRng) -> CoreResult<AgentStore> {
        ensure_positive("agent speed", self.speed)?;
        ensure_in_range("informed_fraction", self.informed_fraction, 0.0, 1.0)?;

        let mut store = AgentStore::new(self.count);

        match self.placement {
            Placement::Point(p) => store.position.fill(p),
            Placement::Uniform { min, max } => {
                if !(min.x <= max.x && min.y <= max.y) {
                    return Err(CoreError::DegenerateBounds {
                        min: min.to_string(),
                        max: max.to_string(),
                    });
                }
                for p in store.position.iter_mut() {
                    *p = Vec2::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));
                }
            }
            Placement::Explicit(list) => {
                if list.len() != self.count {
                    return Err(CoreError::Config(format!(
                        "{} explicit positions given for {} agents",
                        list.len(),
                        self.count
                    )));
                }
                store.position = list;
            }
        }

        match self.headings {
            HeadingInit::Random => {
                for h in store.heading.iter_mut() {
                    *h = rng.gen_range(0.0..TAU);
                }
            }
            HeadingInit::Fixed(h) => store.heading.fill(sw_core::wrap_angle(h)),
            HeadingInit::Explicit(list) => {
                if list.len() != self.count {
                    return Err(CoreError::Config(format!(
                        "{} explicit headings given for {} agents",
                        list.len(),
                        self.count
                    )));
                }
                store.heading = list.into_iter().map(sw_core::wrap_angle).collect();
            }
        }

        store.speed.fill(self.speed);

        if self.informed_fraction > 0.0 {
            for flag in store.is_informed.iter_mut() {
                *flag = rng.gen_bool(self.informed_fraction);
            }
        }

        Ok(store)
    }
}
