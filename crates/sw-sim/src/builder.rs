//! Fluent builder for constructing a [`Sim`].

use tracing::debug;

use sw_agent::{AgentStore, AgentStoreBuilder, HeadingInit, Placement};
use sw_core::error::{ensure_finite, ensure_positive};
use sw_core::{CoreError, SimClock, SimConfig, SimRng, Tick, Vec2};
use sw_opinion::{OpinionModel, TickContext};
use sw_spatial::{Obstacle, Target};
use sw_steering::{SteeringEngine, SteeringParams};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<M>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: bounds, agent count, tick size, budget, seed, …
/// - `M: OpinionModel`: the opinion policy
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                     |
/// |--------------------|---------------------------------------------|
/// | `.steering(p)`     | `SteeringParams::default()`                 |
/// | `.obstacles(v)`    | none                                        |
/// | `.targets(v)`      | none                                        |
/// | `.placement(p)`    | uniform over the whole world                |
/// | `.headings(h)`     | uniform random                              |
/// | `.agents(store)`   | built from placement and headings           |
/// | `.histogram_bins(n)` | 10                                        |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, BoundedConfidence::new(ConfidenceConfig::default()))
///     .steering(params)
///     .obstacles(obstacles)
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<M: OpinionModel> {
    config:         SimConfig,
    model:          M,
    steering:       SteeringParams,
    obstacles:      Vec<Obstacle>,
    targets:        Vec<Vec2>,
    placement:      Option<Placement>,
    headings:       HeadingInit,
    agents:         Option<AgentStore>,
    histogram_bins: usize,
}

impl<M: OpinionModel> SimBuilder<M> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, model: M) -> Self {
        Self {
            config,
            model,
            steering:       SteeringParams::default(),
            obstacles:      Vec::new(),
            targets:        Vec::new(),
            placement:      None,
            headings:       HeadingInit::Random,
            agents:         None,
            histogram_bins: 10,
        }
    }

    pub fn steering(mut self, params: SteeringParams) -> Self {
        self.steering = params;
        self
    }

    pub fn obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Target positions; ids are assigned in order.
    pub fn targets(mut self, positions: Vec<Vec2>) -> Self {
        self.targets = positions;
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn headings(mut self, headings: HeadingInit) -> Self {
        self.headings = headings;
        self
    }

    /// Supply a ready-made agent store.  Its count and every column length
    /// must equal `config.agent_count`, headings must be finite and speeds
    /// positive.  Its opinions are kept as they are.
    pub fn agents(mut self, store: AgentStore) -> Self {
        self.agents = Some(store);
        self
    }

    /// Histogram bins used for continuous opinion distributions.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    /// Validate every input, create the agents, and return a ready-to-run
    /// [`Sim`].
    ///
    /// No tick runs before this succeeds, and once it does no tick can fail.
    pub fn build(self) -> SimResult<Sim<M>> {
        let config = self.config;
        config.validate()?;
        self.steering.validate()?;
        self.model.validate()?;
        for obstacle in &self.obstacles {
            obstacle.validate()?;
        }
        for &t in &self.targets {
            ensure_finite("target x", t.x)?;
            ensure_finite("target y", t.y)?;
            if !config.bounds.contains(t) {
                return Err(CoreError::OutsideBounds { what: "target", at: t.to_string() }.into());
            }
        }
        if self.model.requires_targets() && self.targets.is_empty() {
            return Err(CoreError::Empty("target list").into());
        }
        if self.histogram_bins == 0 {
            return Err(CoreError::Config("histogram_bins must be at least 1".into()).into());
        }

        let mut rng = SimRng::new(config.seed);
        let targets = Target::from_positions(&self.targets);
        let obstacle_positions: Vec<Vec2> =
            self.obstacles.iter().map(|o| o.position_at(0.0)).collect();

        // ── Agents ────────────────────────────────────────────────────────
        let (mut agents, supplied) = match self.agents {
            Some(store) => {
                if store.count != config.agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: config.agent_count,
                        got:      store.count,
                        what:     "agent store",
                    });
                }
                validate_store(&store)?;
                (store, true)
            }
            None => {
                let store = AgentStoreBuilder::new(config.agent_count)
                    .placement(self.placement.unwrap_or_else(|| Placement::anywhere(&config.bounds)))
                    .headings(self.headings)
                    .speed(self.steering.speed)
                    .informed_fraction(self.model.informed_fraction())
                    .build(&mut rng)?;
                (store, false)
            }
        };

        for &p in &agents.position {
            if !config.bounds.contains(p) {
                return Err(CoreError::OutsideBounds { what: "agent", at: p.to_string() }.into());
            }
        }

        if !supplied {
            let initial: Vec<f64> = {
                let ctx = TickContext::new(Tick::ZERO, 0.0, &agents, &obstacle_positions, &targets);
                agents
                    .agent_ids()
                    .map(|a| self.model.initial_opinion(a, &ctx, &mut rng))
                    .collect()
            };
            agents.opinion = initial;
        }

        let domain = self.model.domain();
        if let Some(&bad) = agents.opinion.iter().find(|&&o| !domain.contains(o)) {
            return Err(CoreError::OutOfRange { name: "initial opinion", value: bad, min: 0.0, max: 1.0 }.into());
        }

        debug!(
            model = self.model.name(),
            agents = agents.count,
            obstacles = self.obstacles.len(),
            targets = targets.len(),
            "simulation built"
        );

        Ok(Sim {
            clock:          SimClock::new(),
            steering:       SteeringEngine::new(self.steering, config.bounds),
            goal_override:  config.default_goal,
            back:           agents.clone(),
            config,
            agents,
            obstacles:      self.obstacles,
            obstacle_positions,
            targets,
            model:          self.model,
            rng,
            histogram_bins: self.histogram_bins,
        })
    }
}

/// Column lengths and kinematic values of a caller-supplied store.
fn validate_store(store: &AgentStore) -> SimResult<()> {
    for (what, got) in store.column_lengths() {
        if got != store.count {
            return Err(SimError::AgentCountMismatch { expected: store.count, got, what });
        }
    }
    for &h in &store.heading {
        ensure_finite("agent heading", h)?;
    }
    for &s in &store.speed {
        ensure_positive("agent speed", s)?;
    }
    Ok(())
}
