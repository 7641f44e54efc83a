//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter paired with an
//! `elapsed` accumulator in simulated seconds:
//!
//!   elapsed = Σ dt over every tick run so far
//!
//! The tick counter drives anything scheduled "every N ticks" (the periodic
//! majority sync); `elapsed` drives the obstacle oscillators.  Both only
//! ever move forward.

use std::fmt;

use crate::error::{CoreError, CoreResult, ensure_positive};
use crate::geo::{Vec2, WorldBounds};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// `true` when this tick falls on a multiple of `period`.  A zero period
    /// never matches.
    #[inline]
    pub fn is_multiple_of(self, period: u64) -> bool {
        period != 0 && self.0 % period == 0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tick counter plus accumulated simulated time.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Number of ticks completed so far.
    pub current_tick: Tick,
    /// Simulated seconds elapsed since tick 0.
    pub elapsed: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete one tick of length `dt`.  `dt` must already be sanitised
    /// (finite, non-negative).
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.elapsed += dt;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t = {:.3})", self.current_tick, self.elapsed)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML file by the application crate and handed to
/// `SimBuilder`.  Policy-specific and steering parameters live in their own
/// crates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Rectangle every agent is confined to.
    pub bounds: WorldBounds,

    /// Number of agents to create at startup.
    pub agent_count: usize,

    /// Length of one tick in simulated seconds.  Used by `Sim::step`.
    pub dt: f64,

    /// Hard tick budget.  The run ends after this many ticks.
    pub max_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Two agents closer than this count as colliding in the metrics.
    pub collision_threshold: f64,

    /// An agent within this distance of a target has arrived.
    pub arrival_radius: f64,

    /// Write per-agent output every N ticks.  Metrics are written every tick.
    pub output_interval: u64,

    /// Goal installed at construction, as if `set_target` had been called.
    pub default_goal: Option<Vec2>,

    /// End the run early once every agent has `reached_goal`.
    pub stop_when_all_reached: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bounds:                WorldBounds::from_size(800.0, 800.0),
            agent_count:           20,
            dt:                    1.0,
            max_ticks:             5_000,
            seed:                  0,
            collision_threshold:   10.0,
            arrival_radius:        10.0,
            output_interval:       10,
            default_goal:          None,
            stop_when_all_reached: false,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.max_ticks)
    }

    /// Reject degenerate bounds and non-positive sizes.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.bounds.is_valid() {
            return Err(CoreError::DegenerateBounds {
                min: self.bounds.min.to_string(),
                max: self.bounds.max.to_string(),
            });
        }
        if self.agent_count == 0 {
            return Err(CoreError::Empty("agent population"));
        }
        ensure_positive("dt", self.dt)?;
        ensure_positive("collision_threshold", self.collision_threshold)?;
        ensure_positive("arrival_radius", self.arrival_radius)?;
        if self.output_interval == 0 {
            return Err(CoreError::Config("output_interval must be at least 1".into()));
        }
        if let Some(goal) = self.default_goal {
            if !self.bounds.contains(goal) {
                return Err(CoreError::OutsideBounds { what: "default goal", at: goal.to_string() });
            }
        }
        Ok(())
    }
}
