//! Moving obstacles.
//!
//! An obstacle has no mutable state.  Its position at elapsed time `t` is
//!
//! ```text
//! base + axis · amplitude · sin(2π · frequency · t)
//! ```
//!
//! and is recomputed from scratch every tick, so it can never drift from the
//! closed form however many ticks have run.

use std::f64::consts::TAU;

use sw_core::error::ensure_finite;
use sw_core::{CoreError, CoreResult, Vec2};

/// The axis an obstacle oscillates along.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    X,
    #[default]
    Y,
}

impl Axis {
    #[inline]
    pub fn unit(self) -> Vec2 {
        match self {
            Axis::X => Vec2::new(1.0, 0.0),
            Axis::Y => Vec2::new(0.0, 1.0),
        }
    }
}

/// A sinusoidally oscillating obstacle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    /// Centre of the oscillation.
    pub base: Vec2,
    /// Peak displacement from `base`.
    pub amplitude: f64,
    /// Oscillations per simulated second.
    pub frequency: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub axis: Axis,
}

impl Obstacle {
    /// Obstacle oscillating vertically, the common case.
    pub fn new(base: Vec2, amplitude: f64, frequency: f64) -> Self {
        Self { base, amplitude, frequency, axis: Axis::Y }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Position at elapsed time `t`.
    #[inline]
    pub fn position_at(&self, t: f64) -> Vec2 {
        let offset = self.amplitude * (TAU * self.frequency * t).sin();
        self.base + self.axis.unit() * offset
    }

    pub fn validate(&self) -> CoreResult<()> {
        ensure_finite("obstacle base x", self.base.x)?;
        ensure_finite("obstacle base y", self.base.y)?;
        ensure_finite("obstacle amplitude", self.amplitude)?;
        ensure_finite("obstacle frequency", self.frequency)?;
        if self.amplitude < 0.0 {
            return Err(CoreError::OutOfRange {
                name:  "obstacle amplitude",
                value: self.amplitude,
                min:   0.0,
                max:   f64::INFINITY,
            });
        }
        if self.frequency < 0.0 {
            return Err(CoreError::OutOfRange {
                name:  "obstacle frequency",
                value: self.frequency,
                min:   0.0,
                max:   f64::INFINITY,
            });
        }
        Ok(())
    }
}
