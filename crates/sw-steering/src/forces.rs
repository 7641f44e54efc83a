//! Individual steering terms.
//!
//! Each function returns the term's contribution vector, already scaled by
//! its gain.  Terms with nothing to react to return [`Vec2::ZERO`].  None of
//! them divides by a zero length.

use sw_core::{Vec2, angle_diff, circular_mean};

use crate::NeighborSample;

/// Pull toward the centroid of `flock`.
pub fn cohesion(position: Vec2, flock: &[NeighborSample], gain: f64) -> Vec2 {
    if flock.is_empty() || gain == 0.0 {
        return Vec2::ZERO;
    }
    let sum = flock.iter().fold(Vec2::ZERO, |acc, n| acc + n.position);
    let centroid = sum * (1.0 / flock.len() as f64);
    (centroid - position).normalize_or_zero() * gain
}

/// Pull toward the circular-mean heading of `flock`.  Cancelling headings
/// contribute nothing.
pub fn alignment(flock: &[NeighborSample], gain: f64) -> Vec2 {
    if gain == 0.0 {
        return Vec2::ZERO;
    }
    match circular_mean(flock.iter().map(|n| n.heading)) {
        Some(mean) => Vec2::from_angle(mean) * gain,
        None => Vec2::ZERO,
    }
}

/// Push away from every neighbour strictly closer than `distance`.
pub fn separation(position: Vec2, neighbors: &[NeighborSample], distance: f64, gain: f64) -> Vec2 {
    let mut push = Vec2::ZERO;
    for n in neighbors {
        if position.distance(n.position) < distance {
            push += position - n.position;
        }
    }
    push * gain
}

/// Push away from each obstacle strictly inside `radius`, with magnitude
/// `gain / distance`.  An obstacle at distance zero is skipped.
pub fn obstacle_repulsion(position: Vec2, obstacles: &[Vec2], radius: f64, gain: f64) -> Vec2 {
    let mut push = Vec2::ZERO;
    for &o in obstacles {
        let away = position - o;
        let d = away.length();
        if d > 0.0 && d < radius {
            push += away * (gain / (d * d));
        }
    }
    push
}

/// Unit vector along the heading turned toward `goal` by at most
/// `max_turn`, times `gain`.  An agent already on the goal keeps going
/// straight.
pub fn goal_seek(position: Vec2, heading: f64, goal: Vec2, max_turn: f64, gain: f64) -> Vec2 {
    let to_goal = goal - position;
    if to_goal.is_zero() {
        return Vec2::from_angle(heading) * gain;
    }
    let turn = angle_diff(to_goal.angle(), heading).clamp(-max_turn, max_turn);
    Vec2::from_angle(heading + turn) * gain
}

/// Keep going the way the agent already faces.
#[inline]
pub fn inertia(heading: f64, gain: f64) -> Vec2 {
    Vec2::from_angle(heading) * gain
}
