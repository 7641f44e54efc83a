//! `SteeringEngine`: one agent, one tick.

use sw_core::{Vec2, WorldBounds, wrap_angle};

use crate::forces;
use crate::params::SteeringParams;

/// Read-only view of one neighbour, taken from the previous tick's buffer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NeighborSample {
    pub position: Vec2,
    pub heading:  f64,
    pub speed:    f64,
}

/// Everything the engine needs to move one agent.
#[derive(Clone, Debug)]
pub struct SteeringInput<'a> {
    pub position:  Vec2,
    pub heading:   f64,
    pub speed:     f64,
    /// Neighbours within [`SteeringParams::query_radius`], self excluded.
    pub neighbors: &'a [NeighborSample],
    /// Current (already oscillated) obstacle positions.
    pub obstacles: &'a [Vec2],
    /// Goal to steer toward, `None` when the agent is not goal-seeking.
    pub goal:      Option<Vec2>,
}

/// The agent's next kinematic state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SteeringOutput {
    pub position: Vec2,
    pub heading:  f64,
    pub speed:    f64,
    /// Summed (un-normalised) force vector, for diagnostics.
    pub force:    Vec2,
    /// `true` if the move would have left the world.
    pub bounced:  bool,
}

/// Composes the force terms and advances agents inside `bounds`.
#[derive(Clone, Debug)]
pub struct SteeringEngine {
    pub params: SteeringParams,
    pub bounds: WorldBounds,
}

impl SteeringEngine {
    pub fn new(params: SteeringParams, bounds: WorldBounds) -> Self {
        Self { params, bounds }
    }

    /// Sum of every force term for `input`.
    pub fn compose(&self, input: &SteeringInput<'_>) -> Vec2 {
        let p = &self.params;
        let flock: Vec<NeighborSample> = input
            .neighbors
            .iter()
            .copied()
            .filter(|n| input.position.distance(n.position) < p.sensing_radius)
            .collect();

        let mut force = forces::cohesion(input.position, &flock, p.cohesion_gain);
        force += forces::alignment(&flock, p.alignment_gain);
        force += forces::separation(
            input.position,
            input.neighbors,
            p.separation_distance,
            p.separation_gain,
        );
        force += forces::obstacle_repulsion(
            input.position,
            input.obstacles,
            p.repulsion_radius,
            p.repulsion_gain,
        );
        if let Some(goal) = input.goal {
            force += forces::goal_seek(
                input.position,
                input.heading,
                goal,
                p.max_turn_rate,
                p.goal_gain,
            );
        }
        force += forces::inertia(input.heading, p.inertia_gain);
        force
    }

    /// New speed after matching toward the mean speed of sensed neighbours.
    pub fn matched_speed(&self, input: &SteeringInput<'_>) -> f64 {
        let gain = self.params.speed_matching_gain;
        if gain == 0.0 {
            return input.speed;
        }
        let (sum, n) = input
            .neighbors
            .iter()
            .filter(|n| input.position.distance(n.position) < self.params.sensing_radius)
            .fold((0.0, 0usize), |(s, c), n| (s + n.speed, c + 1));
        if n == 0 {
            return input.speed;
        }
        let mean = sum / n as f64;
        input.speed + gain * (mean - input.speed)
    }

    /// Compute the agent's heading, speed and position after `dt`.
    pub fn step(&self, input: &SteeringInput<'_>, dt: f64) -> SteeringOutput {
        let force = self.compose(input);
        let direction = force.normalize_or_zero();
        let mut heading = if direction.is_zero() {
            input.heading
        } else {
            wrap_angle(direction.angle())
        };
        let speed = self.matched_speed(input);

        let proposed = input.position + Vec2::from_angle(heading) * (speed * dt);
        let (position, bounced) = if self.bounds.contains(proposed) {
            (proposed, false)
        } else {
            heading = wrap_angle(heading + std::f64::consts::PI);
            (self.bounds.clamp(proposed), true)
        };

        SteeringOutput { position, heading, speed, force, bounced }
    }
}
