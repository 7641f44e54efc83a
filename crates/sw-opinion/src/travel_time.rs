//! Threshold travel-time voting.
//!
//! # Estimate
//!
//! The time to reach a site is the straight-line distance over speed, plus a
//! fixed dwell of `repulsion_radius / speed` for every obstacle whose
//! repulsion disc the straight path would cross (obstacle strictly closer
//! than `repulsion_radius` to the segment).  Nothing is simulated; the dwell
//! is the same whatever the angle of approach.
//!
//! An agent's binary opinion is the site with the lower estimate; a tie goes
//! to site B.
//!
//! # Cycle
//!
//! Movement follows the [`PhaseMachine`] cycle.  Opinions are re-estimated
//! when a measuring leg ends and again on entering `ExchangeOrConsensus`.
//! Every tick spent there checks unanimity: a unanimous population is
//! pinned to the site with the lowest travel time summed over all agents and
//! sent there together; otherwise one voter round runs and the population
//! waits for the next tick.

use tracing::{debug, info};

use sw_agent::AgentStore;
use sw_core::error::{ensure_finite, ensure_positive};
use sw_core::{AgentId, CoreError, CoreResult, SimRng, Vec2};

use crate::model::{ColorClass, Coordination, Goal, OpinionDomain, OpinionModel, OpinionUpdate, Steer};
use crate::phase::{Leg, Phase, PhaseMachine, Trigger};
use crate::voter::{is_unanimous, voter_exchange, voter_partners};
use crate::TickContext;

/// Estimated time to travel `from → to` past `obstacles`.
pub fn estimate_travel_time(
    from:             Vec2,
    to:               Vec2,
    obstacles:        &[Vec2],
    repulsion_radius: f64,
    speed:            f64,
) -> f64 {
    let dwell = repulsion_radius / speed;
    let crossings = obstacles
        .iter()
        .filter(|o| o.distance_to_segment(from, to) < repulsion_radius)
        .count();
    from.distance(to) / speed + dwell * crossings as f64
}

// ── TravelTimeConfig ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TravelTimeConfig {
    pub site_a: Vec2,
    pub site_b: Vec2,
    /// Where the population returns between legs.
    pub origin: Vec2,
    /// Obstacle dwell radius used by the estimate.
    pub repulsion_radius: f64,
    /// Speed assumed by the estimate.
    pub speed: f64,
    /// A leg ends this far (along the travel axis) before its destination.
    pub arrival_radius: f64,
    /// Agent whose progress ends a leg.  `None` picks the highest id.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reference_agent: Option<u32>,
}

impl TravelTimeConfig {
    #[inline]
    pub fn site(&self, leg: Leg) -> Vec2 {
        match leg {
            Leg::A => self.site_a,
            Leg::B => self.site_b,
        }
    }

    /// Site with the lower estimate from `from`.  Ties go to B.
    pub fn preferred_leg(&self, from: Vec2, obstacles: &[Vec2]) -> Leg {
        let ta = estimate_travel_time(from, self.site_a, obstacles, self.repulsion_radius, self.speed);
        let tb = estimate_travel_time(from, self.site_b, obstacles, self.repulsion_radius, self.speed);
        if ta < tb { Leg::A } else { Leg::B }
    }

    pub fn validate(&self) -> CoreResult<()> {
        for (name, v) in [
            ("site_a.x", self.site_a.x),
            ("site_a.y", self.site_a.y),
            ("site_b.x", self.site_b.x),
            ("site_b.y", self.site_b.y),
            ("origin.x", self.origin.x),
            ("origin.y", self.origin.y),
        ] {
            ensure_finite(name, v)?;
        }
        ensure_positive("travel-time repulsion_radius", self.repulsion_radius)?;
        ensure_positive("travel-time speed", self.speed)?;
        ensure_positive("travel-time arrival_radius", self.arrival_radius)?;
        if self.site_a == self.origin || self.site_b == self.origin {
            return Err(CoreError::Config("a candidate site coincides with the origin".into()));
        }
        Ok(())
    }
}

// ── ThresholdTravelTime ───────────────────────────────────────────────────────

/// Travel-time voting driven by the motion-phase cycle.
#[derive(Clone, Debug)]
pub struct ThresholdTravelTime {
    config:  TravelTimeConfig,
    machine: PhaseMachine,
}

impl ThresholdTravelTime {
    pub fn new(config: TravelTimeConfig) -> Self {
        Self { config, machine: PhaseMachine::new() }
    }

    pub fn config(&self) -> &TravelTimeConfig {
        &self.config
    }

    pub fn machine(&self) -> &PhaseMachine {
        &self.machine
    }

    /// Endpoints of the current leg, `None` while holding for the exchange.
    pub fn leg_endpoints(&self) -> Option<(Vec2, Vec2)> {
        let c = &self.config;
        match self.machine.phase() {
            Phase::SeekTarget(leg) => Some((c.origin, c.site(leg))),
            Phase::ReturnToOrigin(leg) => Some((c.site(leg), c.origin)),
            Phase::ExchangeOrConsensus => None,
            Phase::SeekConsensusTarget => {
                self.machine.consensus().map(|leg| (c.origin, c.site(leg)))
            }
        }
    }

    /// Opinion every agent would hold from where it stands now.
    pub fn estimate_opinions(&self, ctx: &TickContext<'_>) -> Vec<f64> {
        ctx.agents
            .position
            .iter()
            .map(|&p| self.config.preferred_leg(p, ctx.obstacles).opinion())
            .collect()
    }

    /// Site with the lowest travel time summed over the whole population.
    pub fn aggregate_optimal(&self, ctx: &TickContext<'_>) -> Leg {
        let c = &self.config;
        let (mut total_a, mut total_b) = (0.0, 0.0);
        for &p in &ctx.agents.position {
            total_a += estimate_travel_time(p, c.site_a, ctx.obstacles, c.repulsion_radius, c.speed);
            total_b += estimate_travel_time(p, c.site_b, ctx.obstacles, c.repulsion_radius, c.speed);
        }
        if total_a < total_b { Leg::A } else { Leg::B }
    }

    fn crossed(&self, from: Vec2, to: Vec2, p: Vec2) -> bool {
        let axis = to - from;
        let len = axis.length();
        if len == 0.0 {
            return true;
        }
        (p - from).dot(axis) / len >= len - self.config.arrival_radius
    }

    fn reference(&self, agents: &AgentStore) -> Option<AgentId> {
        let count = agents.count as u32;
        match self.config.reference_agent {
            Some(i) if i < count => Some(AgentId(i)),
            _ => count.checked_sub(1).map(AgentId),
        }
    }

    fn guard_fired(&self, ctx: &TickContext<'_>) -> bool {
        let Some((from, to)) = self.leg_endpoints() else {
            return false;
        };
        match self.machine.phase().trigger() {
            Trigger::ReferenceArrived => self
                .reference(ctx.agents)
                .is_some_and(|a| self.crossed(from, to, ctx.position(a))),
            Trigger::AllArrived => ctx.agents.position.iter().all(|&p| self.crossed(from, to, p)),
            Trigger::Unanimous => false,
        }
    }

    fn exchange(&mut self, ctx: &TickContext<'_>, current: Vec<f64>, rng: &mut SimRng) -> Vec<f64> {
        if is_unanimous(&current) {
            let leg = self.aggregate_optimal(ctx);
            info!(
                tick = ctx.tick.0,
                site = ?leg,
                rounds = self.machine.exchange_rounds(),
                "consensus reached"
            );
            self.machine.set_consensus(leg);
            self.machine.advance(ctx.tick);
            return vec![leg.opinion(); current.len()];
        }

        let partners = voter_partners(current.len(), rng);
        let next = voter_exchange(&current, &partners);
        self.machine.record_exchange_round();
        let changed = current.iter().zip(&next).filter(|(a, b)| a != b).count();
        debug!(
            tick = ctx.tick.0,
            round = self.machine.exchange_rounds(),
            changed,
            "voter exchange round"
        );
        next
    }
}

impl OpinionModel for ThresholdTravelTime {
    fn name(&self) -> &'static str {
        "threshold_travel_time"
    }

    fn domain(&self) -> OpinionDomain {
        OpinionDomain::Binary
    }

    fn validate(&self) -> CoreResult<()> {
        self.config.validate()
    }

    fn initial_opinion(&self, agent: AgentId, ctx: &TickContext<'_>, _rng: &mut SimRng) -> f64 {
        self.config.preferred_leg(ctx.position(agent), ctx.obstacles).opinion()
    }

    fn coordinate(&mut self, ctx: &TickContext<'_>, rng: &mut SimRng) -> Coordination {
        let mut opinions = None;

        if self.guard_fired(ctx) {
            let left = self.machine.phase();
            let entered = self.machine.advance(ctx.tick);
            if matches!(left, Phase::SeekTarget(_)) || entered == Phase::ExchangeOrConsensus {
                opinions = Some(self.estimate_opinions(ctx));
            }
        }

        if self.machine.phase() == Phase::ExchangeOrConsensus {
            let current = opinions.unwrap_or_else(|| ctx.opinions.to_vec());
            opinions = Some(self.exchange(ctx, current, rng));
        }

        Coordination { opinions }
    }

    fn update_opinion(&self, agent: AgentId, _neighbors: &[AgentId], ctx: &TickContext<'_>) -> OpinionUpdate {
        OpinionUpdate {
            opinion:       ctx.opinion(agent),
            heading:       None,
            has_consensus: self.machine.phase() == Phase::SeekConsensusTarget,
        }
    }

    fn steer(&self, _agent: AgentId, _update: &OpinionUpdate, _ctx: &TickContext<'_>) -> Steer {
        match self.leg_endpoints() {
            Some((_, to)) => Steer::Seek(Goal::at(to)),
            None => Steer::Hold,
        }
    }

    fn color_class(&self, agent: AgentId, agents: &AgentStore) -> ColorClass {
        if agents.has_consensus[agent.index()] {
            ColorClass::Consensus
        } else {
            ColorClass::Default
        }
    }

    fn phase_label(&self) -> Option<&'static str> {
        Some(self.machine.phase().label())
    }
}
