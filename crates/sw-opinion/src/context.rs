//! Read-only simulation state passed to every opinion-model callback.

use sw_agent::AgentStore;
use sw_core::{AgentId, Tick, Vec2};
use sw_spatial::Target;

/// A read-only view of the previous tick's state, built once per tick by
/// sw-sim and shared immutably across all agent callbacks.
///
/// # Lifetimes
///
/// All borrows live for one tick.  sw-sim never allows mutable access to
/// these structures while a `TickContext` is live.
#[derive(Copy, Clone)]
pub struct TickContext<'a> {
    /// Index of the tick being computed (the first tick is `Tick(0)`).
    pub tick: Tick,

    /// Simulated time at the end of this tick.  Obstacles are already
    /// placed at this time.
    pub elapsed: f64,

    /// Frozen agent state from the end of the previous tick.
    pub agents: &'a AgentStore,

    /// Opinions to read this tick.  Usually `agents.opinion`; replaced by
    /// the coordination step's output when a model rewrites opinions
    /// population-wide.
    pub opinions: &'a [f64],

    /// Current obstacle positions, indexed by `ObstacleId`.
    pub obstacles: &'a [Vec2],

    /// Targets with their claim state at the start of the tick.
    pub targets: &'a [Target],
}

impl<'a> TickContext<'a> {
    /// Context that reads opinions straight from the agent store.
    #[inline]
    pub fn new(
        tick:      Tick,
        elapsed:   f64,
        agents:    &'a AgentStore,
        obstacles: &'a [Vec2],
        targets:   &'a [Target],
    ) -> Self {
        Self { tick, elapsed, agents, opinions: &agents.opinion, obstacles, targets }
    }

    /// Same context, reading `opinions` instead.
    #[inline]
    pub fn with_opinions(self, opinions: &'a [f64]) -> Self {
        Self { opinions, ..self }
    }

    #[inline]
    pub fn opinion(&self, agent: AgentId) -> f64 {
        self.opinions[agent.index()]
    }

    #[inline]
    pub fn position(&self, agent: AgentId) -> Vec2 {
        self.agents.position[agent.index()]
    }
}
