//! The `Sim` struct and its tick loop.

use tracing::{debug, info, warn};

use sw_agent::AgentStore;
use sw_core::error::ensure_finite;
use sw_core::{AgentId, CoreError, ObstacleId, SimClock, SimConfig, SimRng, TargetId, Vec2};
use sw_opinion::{OpinionModel, Steer, TickContext};
use sw_spatial::{NeighborIndex, Obstacle, Target};
use sw_steering::{NeighborSample, SteeringEngine, SteeringInput};

use crate::{AgentSnapshot, ObstacleSnapshot, SimObserver, SimResult, Snapshot, TickMetrics};

// ── Per-agent results of the compute phase ────────────────────────────────────

/// One agent's next state, computed from the frozen previous buffer and
/// written back in the apply phase.
struct AgentOutcome {
    position:      Vec2,
    heading:       f64,
    speed:         f64,
    opinion:       f64,
    has_consensus: bool,
    /// Target reached this tick, claimed in the apply phase.
    arrived:       Option<TargetId>,
}

/// Everything the compute phase reads.  Shared immutably across agents.
struct Stepper<'a, M: OpinionModel> {
    ctx:            TickContext<'a>,
    index:          &'a NeighborIndex,
    model:          &'a M,
    engine:         &'a SteeringEngine,
    goal_override:  Option<Vec2>,
    arrival_radius: f64,
    dt:             f64,
}

impl<M: OpinionModel> Stepper<'_, M> {
    fn advance(&self, agent: AgentId) -> AgentOutcome {
        let i = agent.index();
        let prev = self.ctx.agents;

        let neighbors = match self.model.interaction_radius() {
            Some(r) => self.index.neighbors(agent, r),
            None => Vec::new(),
        };
        let update = self.model.update_opinion(agent, &neighbors, &self.ctx);
        debug_assert!(self.model.domain().contains(update.opinion));
        let heading = update.heading.unwrap_or(prev.heading[i]);

        let stay = AgentOutcome {
            position:      prev.position[i],
            heading,
            speed:         prev.speed[i],
            opinion:       update.opinion,
            has_consensus: update.has_consensus,
            arrived:       None,
        };
        if prev.reached_goal[i] {
            return stay;
        }

        let (goal, target) = match self.model.steer(agent, &update, &self.ctx) {
            Steer::Hold => return stay,
            Steer::Free => (None, None),
            Steer::Follow => (self.goal_override, None),
            Steer::Seek(g) => match self.goal_override {
                Some(p) => (Some(p), None),
                None => (Some(g.position), g.target),
            },
        };

        let samples: Vec<NeighborSample> = self
            .index
            .neighbors(agent, self.engine.params.query_radius())
            .into_iter()
            .map(|n| NeighborSample {
                position: prev.position[n.index()],
                heading:  prev.heading[n.index()],
                speed:    prev.speed[n.index()],
            })
            .collect();

        let input = SteeringInput {
            position:  prev.position[i],
            heading,
            speed:     prev.speed[i],
            neighbors: &samples,
            obstacles: self.ctx.obstacles,
            goal,
        };
        let out = self.engine.step(&input, self.dt);

        let arrived = target.filter(|t| {
            self.ctx
                .targets
                .get(t.index())
                .is_some_and(|t| out.position.distance(t.position) < self.arrival_radius)
        });

        AgentOutcome {
            position:      out.position,
            heading:       out.heading,
            speed:         out.speed,
            opinion:       update.opinion,
            has_consensus: update.has_consensus,
            arrived,
        }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation engine.
///
/// `Sim<M>` owns every agent, obstacle and target plus the clock and the
/// single seeded RNG, and advances them all with [`tick`](Self::tick):
///
/// 1. **Clock**: sanitise `dt`, advance the tick counter and elapsed time,
///    and place every obstacle at the new elapsed time.
/// 2. **Index**: bulk-load an R-tree over the previous tick's positions.
/// 3. **Coordinate** (sequential): [`OpinionModel::coordinate`] with the
///    engine RNG; may replace every opinion at once.
/// 4. **Compute** (optionally parallel with the `parallel` feature): each
///    agent's opinion, steering mode, and kinematic step, read only from the
///    frozen previous buffer.
/// 5. **Apply** (sequential, ascending `AgentId`): write outcomes to the back
///    buffer, claim reached targets, then swap buffers.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<M: OpinionModel> {
    /// Global configuration (bounds, budget, seed, …).
    pub config: SimConfig,

    /// Tick counter and elapsed simulated time.
    pub clock: SimClock,

    /// Agent state at the end of the last tick (SoA arrays).
    pub agents: AgentStore,

    /// Obstacle parameters.  Positions are recomputed from these every tick.
    pub obstacles: Vec<Obstacle>,

    /// Targets and their claim state.
    pub targets: Vec<Target>,

    /// The opinion policy.
    pub model: M,

    /// Force composition and bounds handling.
    pub steering: SteeringEngine,

    pub(crate) obstacle_positions: Vec<Vec2>,
    pub(crate) back:               AgentStore,
    pub(crate) rng:                SimRng,
    pub(crate) goal_override:      Option<Vec2>,
    pub(crate) histogram_bins:     usize,
}

impl<M: OpinionModel> Sim<M> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Advance one tick of length `dt` and return the resulting snapshot.
    ///
    /// Never fails.  A negative or non-finite `dt` is treated as `0.0`.
    pub fn tick(&mut self, dt: f64) -> Snapshot {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!(dt, "invalid tick length; using 0");
            0.0
        };

        // ── Clock and obstacles ───────────────────────────────────────────
        let now = self.clock.current_tick;
        self.clock.advance(dt);
        let elapsed = self.clock.elapsed;
        for (slot, o) in self.obstacle_positions.iter_mut().zip(&self.obstacles) {
            *slot = o.position_at(elapsed);
        }

        let index = NeighborIndex::build(&self.agents.position);

        // ── Coordinate ────────────────────────────────────────────────────
        let base = TickContext::new(now, elapsed, &self.agents, &self.obstacle_positions, &self.targets);
        let mut coordinated = self.model.coordinate(&base, &mut self.rng).opinions;
        if coordinated.as_ref().is_some_and(|o| o.len() != self.agents.count) {
            warn!(model = self.model.name(), "coordination returned the wrong number of opinions; ignored");
            coordinated = None;
        }
        let ctx = match coordinated.as_deref() {
            Some(opinions) => base.with_opinions(opinions),
            None => base,
        };

        // ── Compute ───────────────────────────────────────────────────────
        let stepper = Stepper {
            ctx,
            index:          &index,
            model:          &self.model,
            engine:         &self.steering,
            goal_override:  self.goal_override,
            arrival_radius: self.config.arrival_radius,
            dt,
        };
        let outcomes = compute_outcomes(&stepper, self.agents.count);

        // ── Apply ─────────────────────────────────────────────────────────
        //
        // Ascending AgentId order, so the first agent to arrive at a target
        // claims it even when the compute phase ran in parallel.
        self.back.clone_from(&self.agents);
        for (i, o) in outcomes.into_iter().enumerate() {
            self.back.position[i] = o.position;
            self.back.heading[i] = o.heading;
            self.back.speed[i] = o.speed;
            self.back.opinion[i] = o.opinion;
            self.back.has_consensus[i] = o.has_consensus;
            if let Some(id) = o.arrived {
                self.back.reached_goal[i] = true;
                if let Some(t) = self.targets.get_mut(id.index()) {
                    if !t.claimed {
                        t.claimed = true;
                        debug!(tick = now.0, agent = i, target = id.0, "target claimed");
                    }
                }
            }
        }
        std::mem::swap(&mut self.agents, &mut self.back);

        self.snapshot()
    }

    /// Advance one tick of the configured length.
    pub fn step(&mut self) -> Snapshot {
        self.tick(self.config.dt)
    }

    /// Steer every goal-seeking agent to `(x, y)` from the next tick on,
    /// replacing model-chosen goals until [`clear_target`](Self::clear_target).
    pub fn set_target(&mut self, x: f64, y: f64) -> SimResult<()> {
        ensure_finite("target x", x)?;
        ensure_finite("target y", y)?;
        let goal = Vec2::new(x, y);
        if !self.config.bounds.contains(goal) {
            return Err(CoreError::OutsideBounds { what: "target", at: goal.to_string() }.into());
        }
        debug!(%goal, "goal override set");
        self.goal_override = Some(goal);
        Ok(())
    }

    /// Drop the goal set by [`set_target`](Self::set_target).
    pub fn clear_target(&mut self) {
        self.goal_override = None;
    }

    pub fn goal_override(&self) -> Option<Vec2> {
        self.goal_override
    }

    /// Read-only copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let a = &self.agents;
        Snapshot {
            tick:      self.clock.current_tick,
            elapsed:   self.clock.elapsed,
            model:     self.model.name(),
            phase:     self.model.phase_label(),
            agents:    a
                .agent_ids()
                .map(|id| {
                    let i = id.index();
                    AgentSnapshot {
                        id,
                        position:      a.position[i],
                        heading:       a.heading[i],
                        opinion:       a.opinion[i],
                        has_consensus: a.has_consensus[i],
                        reached_goal:  a.reached_goal[i],
                        is_informed:   a.is_informed[i],
                        color:         self.model.color_class(id, a),
                    }
                })
                .collect(),
            obstacles: self
                .obstacle_positions
                .iter()
                .enumerate()
                .map(|(i, &position)| ObstacleSnapshot { id: ObstacleId::from_index(i), position })
                .collect(),
            targets:   self.targets.clone(),
        }
    }

    /// Collision counts and opinion distribution for `snapshot`.
    pub fn metrics(&self, snapshot: &Snapshot) -> TickMetrics {
        TickMetrics::from_snapshot(
            snapshot,
            self.config.collision_threshold,
            self.model.domain(),
            self.histogram_bins,
        )
    }

    /// `true` once the tick budget is spent, or (with
    /// `stop_when_all_reached`) every agent has arrived.
    pub fn is_finished(&self) -> bool {
        self.clock.current_tick >= self.config.end_tick()
            || (self.config.stop_when_all_reached && self.agents.all_reached())
    }

    /// Run until [`is_finished`](Self::is_finished) and return the final
    /// snapshot.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> Snapshot {
        info!(
            model = self.model.name(),
            agents = self.agents.count,
            obstacles = self.obstacles.len(),
            max_ticks = self.config.max_ticks,
            seed = self.config.seed,
            "simulation started"
        );

        let mut last = self.snapshot();
        while !self.is_finished() {
            last = self.observed_step(observer);
        }

        info!(
            ticks = last.tick.0,
            elapsed = last.elapsed,
            reached = last.reached_count(),
            consensus = last.consensus_count(),
            "simulation finished"
        );
        observer.on_sim_end(&last);
        last
    }

    /// Run exactly `n` ticks from the current position (ignores the stop
    /// conditions).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> Snapshot {
        let mut last = self.snapshot();
        for _ in 0..n {
            last = self.observed_step(observer);
        }
        last
    }

    fn observed_step<O: SimObserver>(&mut self, observer: &mut O) -> Snapshot {
        observer.on_tick_start(self.clock.current_tick);
        let snapshot = self.step();
        observer.on_tick_end(&snapshot);
        observer.on_metrics(&self.metrics(&snapshot));
        if snapshot.tick.is_multiple_of(self.config.output_interval) {
            observer.on_snapshot(&snapshot);
        }
        snapshot
    }
}

/// Run the compute phase for agents `0..count`.
///
/// With the `parallel` Cargo feature agents are spread over Rayon's thread
/// pool; `collect` keeps them in id order either way.
fn compute_outcomes<M: OpinionModel>(stepper: &Stepper<'_, M>, count: usize) -> Vec<AgentOutcome> {
    #[cfg(not(feature = "parallel"))]
    {
        AgentId::range(count).map(|a| stepper.advance(a)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        (0..count)
            .into_par_iter()
            .map(|i| stepper.advance(AgentId::from_index(i)))
            .collect()
    }
}
