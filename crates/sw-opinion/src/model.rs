//! The `OpinionModel` trait: the policy seam of the simulator.

use sw_agent::AgentStore;
use sw_core::{AgentId, CoreResult, SimRng, TargetId, Vec2};

use crate::TickContext;

/// The set of values an opinion may take.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpinionDomain {
    /// Exactly `0.0` or `1.0`.
    Binary,
    /// Anywhere in `[0.0, 1.0]`.
    Continuous,
}

impl OpinionDomain {
    #[inline]
    pub fn contains(self, value: f64) -> bool {
        match self {
            OpinionDomain::Binary => value == 0.0 || value == 1.0,
            OpinionDomain::Continuous => (0.0..=1.0).contains(&value),
        }
    }
}

/// A place to steer toward.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Goal {
    pub position: Vec2,
    /// Target to claim on arrival, if any.
    pub target: Option<TargetId>,
}

impl Goal {
    /// A goal that claims nothing on arrival.
    pub fn at(position: Vec2) -> Self {
        Self { position, target: None }
    }
}

/// How the steering engine should treat an agent this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Steer {
    /// Flocking and obstacle avoidance only, no goal.
    Free,
    /// Steer toward the externally set goal (`Sim::set_target`), or move
    /// freely while none is set.
    Follow,
    /// Steer toward a model-chosen goal.  An externally set goal overrides it.
    Seek(Goal),
    /// Stay in place.
    Hold,
}

/// One agent's opinion state after this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OpinionUpdate {
    pub opinion:       f64,
    /// Heading to adopt before steering, `None` to keep the current one.
    pub heading:       Option<f64>,
    pub has_consensus: bool,
}

/// Output of the population-wide coordination step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coordination {
    /// Replacement opinion for every agent, indexed by `AgentId`.
    pub opinions: Option<Vec<f64>>,
}

/// Colour class an external renderer should use for an agent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorClass {
    #[default]
    Default,
    Informed,
    Consensus,
}

impl ColorClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorClass::Default => "default",
            ColorClass::Informed => "informed",
            ColorClass::Consensus => "consensus",
        }
    }
}

/// Pluggable opinion policy.
///
/// # Required methods
///
/// [`name`](Self::name), [`domain`](Self::domain),
/// [`initial_opinion`](Self::initial_opinion),
/// [`update_opinion`](Self::update_opinion) and [`steer`](Self::steer).
/// Everything else has a neutral default.
///
/// # Thread safety
///
/// With the `parallel` feature sw-sim calls `update_opinion` and `steer` for
/// many agents at once, so implementations must be `Send + Sync`.  Mutable
/// model state may only change in [`coordinate`](Self::coordinate), which
/// always runs alone.
pub trait OpinionModel: Send + Sync + 'static {
    /// Short identifier used in logs and output.
    fn name(&self) -> &'static str;

    fn domain(&self) -> OpinionDomain;

    /// Check model parameters.  Called once by `SimBuilder::build`.
    fn validate(&self) -> CoreResult<()> {
        Ok(())
    }

    /// Radius of the neighbour list handed to `update_opinion`.  `None`
    /// means the model never looks at neighbours.
    fn interaction_radius(&self) -> Option<f64> {
        None
    }

    /// `true` if the model steers agents to targets and cannot run without
    /// at least one.
    fn requires_targets(&self) -> bool {
        false
    }

    /// Probability that an agent is created informed.
    fn informed_fraction(&self) -> f64 {
        0.0
    }

    /// Opinion an agent starts with.  `ctx` shows the initial placement with
    /// every opinion at `0.0`.  Only called when the simulation builder
    /// creates the agents itself; a caller-supplied store keeps its opinions.
    fn initial_opinion(&self, agent: AgentId, ctx: &TickContext<'_>, rng: &mut SimRng) -> f64;

    /// Sequential population-wide step, run once per tick before any
    /// per-agent update.
    fn coordinate(&mut self, _ctx: &TickContext<'_>, _rng: &mut SimRng) -> Coordination {
        Coordination::default()
    }

    /// One agent's new opinion.  `neighbors` lists the agents within
    /// [`interaction_radius`](Self::interaction_radius), self excluded, in
    /// ascending id order.
    fn update_opinion(
        &self,
        agent:     AgentId,
        neighbors: &[AgentId],
        ctx:       &TickContext<'_>,
    ) -> OpinionUpdate;

    /// How the agent should move this tick, given its fresh `update`.
    fn steer(&self, agent: AgentId, update: &OpinionUpdate, ctx: &TickContext<'_>) -> Steer;

    /// Colour class for the snapshot.
    fn color_class(&self, _agent: AgentId, _agents: &AgentStore) -> ColorClass {
        ColorClass::Default
    }

    /// Population-wide phase name, for models that have one.
    fn phase_label(&self) -> Option<&'static str> {
        None
    }
}
