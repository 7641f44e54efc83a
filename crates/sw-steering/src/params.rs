//! Steering configuration.

use std::f64::consts::PI;

use sw_core::CoreResult;
use sw_core::error::{ensure_in_range, ensure_positive};

/// Radii and gain constants for every steering term.
///
/// A gain of `0.0` switches the corresponding term off.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SteeringParams {
    /// Neighbours closer than this feed cohesion, alignment and speed matching.
    pub sensing_radius: f64,
    /// Neighbours closer than this push the agent away.
    pub separation_distance: f64,
    /// Obstacles closer than this push the agent away.
    pub repulsion_radius: f64,

    pub cohesion_gain:   f64,
    pub alignment_gain:  f64,
    pub separation_gain: f64,
    pub repulsion_gain:  f64,
    pub goal_gain:       f64,
    pub inertia_gain:    f64,

    /// Largest heading change toward the goal in one tick, radians.
    pub max_turn_rate: f64,
    /// Nominal travel speed given to every agent at construction.
    pub speed: f64,
    /// Fraction of the gap to the mean neighbour speed closed each tick.
    pub speed_matching_gain: f64,
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            sensing_radius:      100.0,
            separation_distance: 30.0,
            repulsion_radius:    80.0,
            cohesion_gain:       0.02,
            alignment_gain:      0.05,
            separation_gain:     0.7,
            repulsion_gain:      0.8,
            goal_gain:           1.0,
            inertia_gain:        1.0,
            max_turn_rate:       0.1,
            speed:               1.0,
            speed_matching_gain: 0.0,
        }
    }
}

impl SteeringParams {
    /// Radius to query so every term sees the neighbours it needs.
    #[inline]
    pub fn query_radius(&self) -> f64 {
        self.sensing_radius.max(self.separation_distance)
    }

    pub fn validate(&self) -> CoreResult<()> {
        ensure_positive("sensing_radius", self.sensing_radius)?;
        ensure_positive("separation_distance", self.separation_distance)?;
        ensure_positive("repulsion_radius", self.repulsion_radius)?;
        for (name, gain) in [
            ("cohesion_gain", self.cohesion_gain),
            ("alignment_gain", self.alignment_gain),
            ("separation_gain", self.separation_gain),
            ("repulsion_gain", self.repulsion_gain),
            ("goal_gain", self.goal_gain),
            ("inertia_gain", self.inertia_gain),
        ] {
            ensure_in_range(name, gain, 0.0, f64::MAX)?;
        }
        ensure_in_range("max_turn_rate", self.max_turn_rate, f64::MIN_POSITIVE, PI)?;
        ensure_positive("speed", self.speed)?;
        ensure_in_range("speed_matching_gain", self.speed_matching_gain, 0.0, 1.0)?;
        Ok(())
    }
}
