//! Plain data row types written by output backends.

use sw_sim::{Snapshot, TickMetrics};

/// One agent at one output tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub tick:          u64,
    pub agent_id:      u32,
    pub x:             f64,
    pub y:             f64,
    pub heading:       f64,
    pub opinion:       f64,
    pub has_consensus: bool,
    pub reached_goal:  bool,
    pub is_informed:   bool,
    /// Agents plus obstacles closer than the collision threshold.
    pub collisions:    u64,
    pub color:         &'static str,
}

impl AgentSnapshotRow {
    /// One row per agent in `snapshot`, in id order.  `collisions` holds the
    /// per-agent counts from [`TickMetrics::agent_collisions`]; agents past
    /// its end get `0`.
    pub fn from_snapshot(snapshot: &Snapshot, collisions: &[usize]) -> Vec<AgentSnapshotRow> {
        snapshot
            .agents
            .iter()
            .enumerate()
            .map(|(i, a)| AgentSnapshotRow {
                tick:          snapshot.tick.0,
                agent_id:      a.id.0,
                x:             a.position.x,
                y:             a.position.y,
                heading:       a.heading,
                opinion:       a.opinion,
                has_consensus: a.has_consensus,
                reached_goal:  a.reached_goal,
                is_informed:   a.is_informed,
                collisions:    collisions.get(i).copied().unwrap_or(0) as u64,
                color:         a.color.as_str(),
            })
            .collect()
    }
}

/// Collision counts and opinion distribution for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRow {
    pub tick:                u64,
    pub elapsed:             f64,
    pub colliding_pairs:     u64,
    pub colliding_agents:    u64,
    pub obstacle_collisions: u64,
    pub reached:             u64,
    pub consensus:           u64,
    pub opinion_mean:        f64,
    pub opinion_variance:    f64,
    pub opinion_min:         f64,
    pub opinion_max:         f64,
    /// Histogram counts, lowest bin first.
    pub opinion_bins:        Vec<usize>,
}

impl From<&TickMetrics> for MetricsRow {
    fn from(m: &TickMetrics) -> Self {
        Self {
            tick:                m.tick.0,
            elapsed:             m.elapsed,
            colliding_pairs:     m.colliding_pairs as u64,
            colliding_agents:    m.colliding_agents as u64,
            obstacle_collisions: m.obstacle_collisions as u64,
            reached:             m.reached as u64,
            consensus:           m.consensus as u64,
            opinion_mean:        m.opinions.mean,
            opinion_variance:    m.opinions.variance,
            opinion_min:         m.opinions.min,
            opinion_max:         m.opinions.max,
            opinion_bins:        m.opinions.bins.clone(),
        }
    }
}
