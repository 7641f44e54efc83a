//! Bounded-confidence averaging (Hegselmann–Krause).
//!
//! Every tick an agent's opinion becomes the mean of its own opinion and
//! every sensed neighbour's opinion within `epsilon` of it.  With no such
//! neighbour the mean is the agent's own value, so the opinion is unchanged.

use sw_core::error::{ensure_in_range, ensure_positive};
use sw_core::{AgentId, CoreResult, SimRng};

use crate::model::{ColorClass, OpinionDomain, OpinionModel, OpinionUpdate, Steer};
use crate::TickContext;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConfidenceConfig {
    /// Confidence threshold ε; neighbours further apart in opinion are ignored.
    pub epsilon: f64,
    /// Neighbours closer than this are sensed.
    pub sensing_radius: f64,
    /// An agent whose sensed neighbours all lie within this of its own
    /// opinion is marked as in consensus.
    pub consensus_tolerance: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self { epsilon: 0.2, sensing_radius: 100.0, consensus_tolerance: 1e-3 }
    }
}

impl ConfidenceConfig {
    pub fn validate(&self) -> CoreResult<()> {
        ensure_in_range("epsilon", self.epsilon, 0.0, 1.0)?;
        ensure_positive("sensing_radius", self.sensing_radius)?;
        ensure_in_range("consensus_tolerance", self.consensus_tolerance, 0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct BoundedConfidence {
    config: ConfidenceConfig,
}

impl BoundedConfidence {
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConfidenceConfig {
        &self.config
    }

    /// Mean of `own` and every value in `others` within ε of `own`.
    pub fn averaged(&self, own: f64, others: impl IntoIterator<Item = f64>) -> f64 {
        let (sum, n) = others
            .into_iter()
            .filter(|o| (o - own).abs() <= self.config.epsilon)
            .fold((own, 1usize), |(s, c), o| (s + o, c + 1));
        (sum / n as f64).clamp(0.0, 1.0)
    }
}

impl OpinionModel for BoundedConfidence {
    fn name(&self) -> &'static str {
        "bounded_confidence"
    }

    fn domain(&self) -> OpinionDomain {
        OpinionDomain::Continuous
    }

    fn validate(&self) -> CoreResult<()> {
        self.config.validate()
    }

    fn interaction_radius(&self) -> Option<f64> {
        Some(self.config.sensing_radius)
    }

    fn initial_opinion(&self, _agent: AgentId, _ctx: &TickContext<'_>, rng: &mut SimRng) -> f64 {
        rng.gen_range(0.0..=1.0)
    }

    fn update_opinion(&self, agent: AgentId, neighbors: &[AgentId], ctx: &TickContext<'_>) -> OpinionUpdate {
        let own = ctx.opinion(agent);
        let opinion = self.averaged(own, neighbors.iter().map(|&n| ctx.opinion(n)));
        let has_consensus = !neighbors.is_empty()
            && neighbors
                .iter()
                .all(|&n| (ctx.opinion(n) - own).abs() <= self.config.consensus_tolerance);
        OpinionUpdate { opinion, heading: None, has_consensus }
    }

    fn steer(&self, _agent: AgentId, _update: &OpinionUpdate, _ctx: &TickContext<'_>) -> Steer {
        Steer::Follow
    }

    fn color_class(&self, agent: AgentId, agents: &sw_agent::AgentStore) -> ColorClass {
        if agents.has_consensus[agent.index()] {
            ColorClass::Consensus
        } else {
            ColorClass::Default
        }
    }
}
