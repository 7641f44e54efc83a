//! Immutable end-of-tick views handed to external collaborators.

use sw_core::{AgentId, ObstacleId, Tick, Vec2};
use sw_opinion::{ColorClass, OpinionDomain};
use sw_spatial::Target;

/// One agent as a renderer or writer sees it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub id:            AgentId,
    pub position:      Vec2,
    pub heading:       f64,
    pub opinion:       f64,
    pub has_consensus: bool,
    pub reached_goal:  bool,
    pub is_informed:   bool,
    pub color:         ColorClass,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObstacleSnapshot {
    pub id:       ObstacleId,
    /// Oscillated position at the snapshot's `elapsed`.
    pub position: Vec2,
}

/// Read-only copy of the whole world at the end of a tick.
///
/// Owns its data, so it stays valid however far the simulation moves on.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Ticks completed so far.  The snapshot taken before the first tick
    /// reports `Tick(0)`.
    pub tick:      Tick,
    /// Simulated seconds elapsed.
    pub elapsed:   f64,
    /// Name of the opinion model that produced this state.
    pub model:     &'static str,
    /// Population-wide phase, for models that cycle through phases.
    pub phase:     Option<&'static str>,
    pub agents:    Vec<AgentSnapshot>,
    pub obstacles: Vec<ObstacleSnapshot>,
    pub targets:   Vec<Target>,
}

impl Snapshot {
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.agents.iter().map(|a| a.position)
    }

    pub fn opinions(&self) -> impl Iterator<Item = f64> + '_ {
        self.agents.iter().map(|a| a.opinion)
    }

    pub fn reached_count(&self) -> usize {
        self.agents.iter().filter(|a| a.reached_goal).count()
    }

    pub fn consensus_count(&self) -> usize {
        self.agents.iter().filter(|a| a.has_consensus).count()
    }
}

// ── Metrics ───────────────────────────────────────────────────────────────────

/// Summary of the opinion values across the population.
#[derive(Clone, Debug, PartialEq)]
pub struct OpinionDistribution {
    pub mean:     f64,
    /// Population variance.
    pub variance: f64,
    pub min:      f64,
    pub max:      f64,
    /// Histogram over `[0, 1]`.  Binary domains get two bins (`0` and `1`);
    /// continuous domains get equal-width bins with the last one closed.
    pub bins:     Vec<usize>,
}

impl OpinionDistribution {
    pub fn from_values(values: &[f64], domain: OpinionDomain, continuous_bins: usize) -> Self {
        let bin_count = match domain {
            OpinionDomain::Binary => 2,
            OpinionDomain::Continuous => continuous_bins.max(1),
        };
        let mut bins = vec![0usize; bin_count];
        if values.is_empty() {
            return Self { mean: 0.0, variance: 0.0, min: 0.0, max: 0.0, bins };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        for &v in values {
            let b = ((v.clamp(0.0, 1.0) * bin_count as f64) as usize).min(bin_count - 1);
            bins[b] += 1;
        }

        Self { mean, variance, min, max, bins }
    }
}

/// What the metrics collaborator receives once per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickMetrics {
    pub tick:                Tick,
    pub elapsed:             f64,
    /// Unordered agent pairs closer than the collision threshold.
    pub colliding_pairs:     usize,
    /// Distinct agents that belong to at least one colliding pair.
    pub colliding_agents:    usize,
    /// Agent-obstacle pairs closer than the collision threshold, measured
    /// against the obstacle positions in the snapshot.
    pub obstacle_collisions: usize,
    /// Per agent, in id order: agents plus obstacles closer than the
    /// collision threshold.
    pub agent_collisions:    Vec<usize>,
    pub reached:             usize,
    pub consensus:           usize,
    pub opinions:            OpinionDistribution,
}

impl TickMetrics {
    /// Compute metrics for `snapshot`.  Pairwise, so quadratic in the
    /// population size.  Distances equal to the threshold do not count.
    pub fn from_snapshot(
        snapshot:            &Snapshot,
        collision_threshold: f64,
        domain:              OpinionDomain,
        continuous_bins:     usize,
    ) -> Self {
        let n = snapshot.agents.len();
        let mut agent_collisions = vec![0usize; n];
        let mut colliding_pairs = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                let d = snapshot.agents[i].position.distance(snapshot.agents[j].position);
                if d < collision_threshold {
                    colliding_pairs += 1;
                    agent_collisions[i] += 1;
                    agent_collisions[j] += 1;
                }
            }
        }
        let colliding_agents = agent_collisions.iter().filter(|&&c| c > 0).count();

        let mut obstacle_collisions = 0;
        for (i, agent) in snapshot.agents.iter().enumerate() {
            let hits = snapshot
                .obstacles
                .iter()
                .filter(|o| agent.position.distance(o.position) < collision_threshold)
                .count();
            obstacle_collisions += hits;
            agent_collisions[i] += hits;
        }

        let values: Vec<f64> = snapshot.opinions().collect();
        Self {
            tick: snapshot.tick,
            elapsed: snapshot.elapsed,
            colliding_pairs,
            colliding_agents,
            obstacle_collisions,
            agent_collisions,
            reached: snapshot.reached_count(),
            consensus: snapshot.consensus_count(),
            opinions: OpinionDistribution::from_values(&values, domain, continuous_bins),
        }
    }
}
