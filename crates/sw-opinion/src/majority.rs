//! Periodic majority synchronisation.
//!
//! On every tick that completes a whole consensus period, each agent
//! still on the move with at least one neighbour inside the interaction
//! radius takes the circular-mean heading of itself and those neighbours.
//! Headings that cancel out leave the heading unchanged.  The first time
//! that mean is defined the agent is synchronised (`has_consensus`, opinion
//! `1.0`) and from then on heads for the nearest target nobody has claimed
//! yet.  Unsynchronised agents keep flocking without a goal.

use tracing::debug;

use sw_agent::AgentStore;
use sw_core::error::{ensure_in_range, ensure_positive};
use sw_core::{AgentId, CoreError, CoreResult, SimRng, circular_mean, wrap_angle};
use sw_spatial::{nearest_target, nearest_unclaimed};

use crate::model::{ColorClass, Coordination, Goal, OpinionDomain, OpinionModel, OpinionUpdate, Steer};
use crate::TickContext;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MajorityConfig {
    /// Synchronise on ticks where `(tick + 1) % period == 0`, so the first
    /// sync happens once `period` ticks have completed.
    pub period: u64,
    /// Neighbours closer than this contribute to the mean heading.
    pub interaction_radius: f64,
    /// Probability an agent is informed rather than latent.
    pub informed_fraction: f64,
}

impl Default for MajorityConfig {
    fn default() -> Self {
        Self { period: 100, interaction_radius: 120.0, informed_fraction: 0.5 }
    }
}

impl MajorityConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.period == 0 {
            return Err(CoreError::Config("consensus period must be at least 1 tick".into()));
        }
        ensure_positive("interaction_radius", self.interaction_radius)?;
        ensure_in_range("informed_fraction", self.informed_fraction, 0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct PeriodicMajority {
    config: MajorityConfig,
}

impl PeriodicMajority {
    pub fn new(config: MajorityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MajorityConfig {
        &self.config
    }

    #[inline]
    fn is_sync_tick(&self, ctx: &TickContext<'_>) -> bool {
        (ctx.tick + 1).is_multiple_of(self.config.period)
    }
}

impl OpinionModel for PeriodicMajority {
    fn name(&self) -> &'static str {
        "periodic_majority"
    }

    fn domain(&self) -> OpinionDomain {
        OpinionDomain::Binary
    }

    fn validate(&self) -> CoreResult<()> {
        self.config.validate()
    }

    fn interaction_radius(&self) -> Option<f64> {
        Some(self.config.interaction_radius)
    }

    fn requires_targets(&self) -> bool {
        true
    }

    fn informed_fraction(&self) -> f64 {
        self.config.informed_fraction
    }

    fn initial_opinion(&self, _agent: AgentId, _ctx: &TickContext<'_>, _rng: &mut SimRng) -> f64 {
        0.0
    }

    fn coordinate(&mut self, ctx: &TickContext<'_>, _rng: &mut SimRng) -> Coordination {
        if self.is_sync_tick(ctx) {
            let synced = ctx.agents.has_consensus.iter().filter(|&&c| c).count();
            debug!(tick = ctx.tick.0, synced, total = ctx.agents.count, "periodic sync");
        }
        Coordination::default()
    }

    fn update_opinion(&self, agent: AgentId, neighbors: &[AgentId], ctx: &TickContext<'_>) -> OpinionUpdate {
        let i = agent.index();
        let mut has_consensus = ctx.agents.has_consensus[i];
        let mut heading = None;

        if self.is_sync_tick(ctx) && !ctx.agents.reached_goal[i] && !neighbors.is_empty() {
            let headings = std::iter::once(agent)
                .chain(neighbors.iter().copied())
                .map(|a| ctx.agents.heading[a.index()]);
            let mean = circular_mean(headings);
            if let Some(h) = mean {
                heading = Some(wrap_angle(h));
                has_consensus = true;
            }
        }

        OpinionUpdate {
            opinion: if has_consensus { 1.0 } else { 0.0 },
            heading,
            has_consensus,
        }
    }

    fn steer(&self, agent: AgentId, update: &OpinionUpdate, ctx: &TickContext<'_>) -> Steer {
        if ctx.agents.reached_goal[agent.index()] {
            return Steer::Hold;
        }
        if !update.has_consensus {
            return Steer::Free;
        }
        let from = ctx.position(agent);
        // Once every target is taken, settle on the nearest one anyway.
        match nearest_unclaimed(from, ctx.targets).or_else(|| nearest_target(from, ctx.targets)) {
            Some(t) => Steer::Seek(Goal { position: t.position, target: Some(t.id) }),
            None => Steer::Free,
        }
    }

    fn color_class(&self, agent: AgentId, agents: &AgentStore) -> ColorClass {
        let i = agent.index();
        if agents.is_informed[i] && agents.has_consensus[i] {
            ColorClass::Informed
        } else {
            ColorClass::Default
        }
    }
}
