//! Motion-phase cycle for the travel-time voter policy.
//!
//! The whole population moves through one shared phase at a time:
//!
//! ```text
//! SeekTarget(A) → ReturnToOrigin(A) → SeekTarget(B) → ReturnToOrigin(B)
//!       ↑                                                     ↓
//! SeekConsensusTarget  ←──────────  ExchangeOrConsensus  ←────┘
//! ```
//!
//! Each phase leaves only through its single outgoing edge, guarded by the
//! [`Trigger`] listed for it in [`TRANSITIONS`].  Deciding whether a trigger
//! fired is the caller's job; the machine only records where the population
//! is and moves it along the table.

use std::fmt;

use tracing::debug;

use sw_core::Tick;

/// One of the two candidate sites.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Leg {
    A,
    B,
}

impl Leg {
    /// Binary opinion encoding: site A is `0.0`, site B is `1.0`.
    #[inline]
    pub fn opinion(self) -> f64 {
        match self {
            Leg::A => 0.0,
            Leg::B => 1.0,
        }
    }

    /// Inverse of [`opinion`](Self::opinion).  Anything that is not `0.0`
    /// reads as site B.
    #[inline]
    pub fn from_opinion(value: f64) -> Leg {
        if value == 0.0 { Leg::A } else { Leg::B }
    }
}

/// Population-wide motion phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Travel from the origin to one site, measuring it.
    SeekTarget(Leg),
    /// Travel back to the origin after visiting a site.
    ReturnToOrigin(Leg),
    /// Hold position; check unanimity, otherwise run voter rounds.
    ExchangeOrConsensus,
    /// Travel together to the agreed site.
    SeekConsensusTarget,
}

/// Guard on a phase's outgoing edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// The reference agent crossed the leg's arrival threshold.
    ReferenceArrived,
    /// Every agent holds the same opinion.
    Unanimous,
    /// Every agent crossed the leg's arrival threshold.
    AllArrived,
}

/// The full transition table: `(from, guard, to)`.
pub const TRANSITIONS: [(Phase, Trigger, Phase); 6] = [
    (Phase::SeekTarget(Leg::A), Trigger::ReferenceArrived, Phase::ReturnToOrigin(Leg::A)),
    (Phase::ReturnToOrigin(Leg::A), Trigger::ReferenceArrived, Phase::SeekTarget(Leg::B)),
    (Phase::SeekTarget(Leg::B), Trigger::ReferenceArrived, Phase::ReturnToOrigin(Leg::B)),
    (Phase::ReturnToOrigin(Leg::B), Trigger::ReferenceArrived, Phase::ExchangeOrConsensus),
    (Phase::ExchangeOrConsensus, Trigger::Unanimous, Phase::SeekConsensusTarget),
    (Phase::SeekConsensusTarget, Trigger::AllArrived, Phase::SeekTarget(Leg::A)),
];

impl Phase {
    fn row(self) -> &'static (Phase, Trigger, Phase) {
        // Every phase has exactly one row; the table is exhaustive.
        let i = match self {
            Phase::SeekTarget(Leg::A) => 0,
            Phase::ReturnToOrigin(Leg::A) => 1,
            Phase::SeekTarget(Leg::B) => 2,
            Phase::ReturnToOrigin(Leg::B) => 3,
            Phase::ExchangeOrConsensus => 4,
            Phase::SeekConsensusTarget => 5,
        };
        &TRANSITIONS[i]
    }

    /// Guard that must fire to leave this phase.
    #[inline]
    pub fn trigger(self) -> Trigger {
        self.row().1
    }

    /// Phase entered when the guard fires.
    #[inline]
    pub fn next(self) -> Phase {
        self.row().2
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::SeekTarget(Leg::A) => "seek_target_a",
            Phase::SeekTarget(Leg::B) => "seek_target_b",
            Phase::ReturnToOrigin(Leg::A) => "return_from_a",
            Phase::ReturnToOrigin(Leg::B) => "return_from_b",
            Phase::ExchangeOrConsensus => "exchange_or_consensus",
            Phase::SeekConsensusTarget => "seek_consensus_target",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── PhaseMachine ──────────────────────────────────────────────────────────────

/// Current phase plus the bookkeeping that goes with it.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseMachine {
    phase:            Phase,
    /// Site agreed on in the last `ExchangeOrConsensus`.  Set while in
    /// `SeekConsensusTarget`.
    consensus:        Option<Leg>,
    /// Tick on which the current phase was entered.
    entered_at:       Tick,
    /// Full cycles completed (returns to `SeekTarget(A)`).
    cycles_completed: u64,
    /// Voter rounds run in the current `ExchangeOrConsensus` visit.
    exchange_rounds:  u64,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            phase:            Phase::SeekTarget(Leg::A),
            consensus:        None,
            entered_at:       Tick::ZERO,
            cycles_completed: 0,
            exchange_rounds:  0,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn consensus(&self) -> Option<Leg> {
        self.consensus
    }

    #[inline]
    pub fn entered_at(&self) -> Tick {
        self.entered_at
    }

    #[inline]
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    #[inline]
    pub fn exchange_rounds(&self) -> u64 {
        self.exchange_rounds
    }

    /// Count one voter round in the current exchange visit.
    pub fn record_exchange_round(&mut self) {
        self.exchange_rounds += 1;
    }

    /// Record the agreed site.  Only meaningful just before leaving
    /// `ExchangeOrConsensus`.
    pub fn set_consensus(&mut self, leg: Leg) {
        self.consensus = Some(leg);
    }

    /// Follow the current phase's outgoing edge.  Returns the new phase.
    pub fn advance(&mut self, now: Tick) -> Phase {
        let from = self.phase;
        let to = from.next();
        debug!(%now, %from, %to, trigger = ?from.trigger(), "phase transition");

        match to {
            Phase::ExchangeOrConsensus => self.exchange_rounds = 0,
            Phase::SeekTarget(Leg::A) => {
                self.consensus = None;
                self.cycles_completed += 1;
            }
            _ => {}
        }
        self.phase = to;
        self.entered_at = now;
        to
    }
}
