//! Core agent storage.
//!
//! # Double buffering
//!
//! `AgentStore` is plain data and `Clone`.  Each tick the engine keeps the
//! previous store frozen, computes every agent's next state from it, and
//! writes the results into a second store which then replaces the first:
//!
//! ```ignore
//! // sw-sim tick loop (simplified):
//! let outcomes: Vec<_> = agents.agent_ids().map(|a| advance(a, &agents)).collect();
//! back.clone_from(&agents);
//! for (a, o) in agents.agent_ids().zip(outcomes) {
//!     back.position[a.index()] = o.position;
//! }
//! std::mem::swap(&mut agents, &mut back);
//! ```
//!
//! No agent ever observes a neighbour's state from the current tick, so the
//! result does not depend on iteration order.

use sw_core::{AgentId, Vec2};

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them:
///
/// ```ignore
/// let p = store.position[agent.index()];
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    // ── Kinematic state ───────────────────────────────────────────────────
    /// Current position, always inside the world bounds.
    pub position: Vec<Vec2>,

    /// Heading in radians, kept in `[0, 2π)`.
    pub heading: Vec<f64>,

    /// Travel speed in world units per simulated second.
    pub speed: Vec<f64>,

    // ── Opinion state ─────────────────────────────────────────────────────
    /// Scalar opinion: `0.0`/`1.0` for binary policies, `[0, 1]` for
    /// continuous ones.
    pub opinion: Vec<f64>,

    /// Set once the agent has agreed with its neighbours (or the
    /// population has reached unanimity).
    pub has_consensus: Vec<bool>,

    /// Set once the agent has arrived at its final goal; the agent stops.
    pub reached_goal: Vec<bool>,

    /// Informed agents hold goal knowledge; latent agents follow.
    pub is_informed: Vec<bool>,
}

impl AgentStore {
    /// Allocate `count` agents at the origin, heading 0, speed 1, opinion 0.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            position:      vec![Vec2::ZERO; count],
            heading:       vec![0.0; count],
            speed:         vec![1.0; count],
            opinion:       vec![0.0; count],
            has_consensus: vec![false; count],
            reached_goal:  vec![false; count],
            is_informed:   vec![false; count],
        }
    }

    /// Name and length of every SoA column, in declaration order.
    pub fn column_lengths(&self) -> [(&'static str, usize); 7] {
        [
            ("position", self.position.len()),
            ("heading", self.heading.len()),
            ("speed", self.speed.len()),
            ("opinion", self.opinion.len()),
            ("has_consensus", self.has_consensus.len()),
            ("reached_goal", self.reached_goal.len()),
            ("is_informed", self.is_informed.len()),
        ]
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        AgentId::range(self.count)
    }

    /// `true` once every agent has `reached_goal` (and there is at least one).
    pub fn all_reached(&self) -> bool {
        !self.is_empty() && self.reached_goal.iter().all(|&r| r)
    }

    /// Mean position of the whole population, `None` if empty.
    pub fn centroid(&self) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        let sum = self.position.iter().fold(Vec2::ZERO, |acc, &p| acc + p);
        Some(sum * (1.0 / self.count as f64))
    }
}
