//! Built-in scenarios and the TOML file that overrides them.
//!
//! A scenario file may set any subset of the top-level sections below.  A
//! section that is present replaces the built-in one; keys missing inside a
//! present section take the library defaults.
//!
//! ```toml
//! scenario = "hk"
//!
//! [sim]
//! agent_count = 40
//! max_ticks   = 2000
//!
//! [[obstacles]]
//! base      = { x = 400.0, y = 400.0 }
//! amplitude = 60.0
//! frequency = 0.01
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use sw_agent::{HeadingInit, Placement};
use sw_core::{SimConfig, Vec2, WorldBounds};
use sw_opinion::{ConfidenceConfig, MajorityConfig, TravelTimeConfig};
use sw_spatial::Obstacle;
use sw_steering::SteeringParams;

// ── ScenarioKind ──────────────────────────────────────────────────────────────

/// Which opinion policy drives the run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Travel-time estimate, motion-phase cycle and voter exchange.
    Voter,
    /// Periodic heading synchronisation with informed and latent agents.
    Majority,
    /// Hegselmann–Krause bounded-confidence averaging.
    Hk,
}

// ── Scenario ──────────────────────────────────────────────────────────────────

/// Everything needed to build one simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub kind:           ScenarioKind,
    pub sim:            SimConfig,
    pub steering:       SteeringParams,
    pub placement:      Placement,
    pub headings:       HeadingInit,
    pub obstacles:      Vec<Obstacle>,
    pub targets:        Vec<Vec2>,
    pub travel_time:    TravelTimeConfig,
    pub majority:       MajorityConfig,
    pub confidence:     ConfidenceConfig,
    pub histogram_bins: usize,
}

impl Scenario {
    pub fn builtin(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::Voter => voter(),
            ScenarioKind::Majority => majority(),
            ScenarioKind::Hk => hk(),
        }
    }

    /// Apply the sections present in `file` on top of `self`.
    pub fn merge(mut self, file: ScenarioFile) -> Self {
        if let Some(v) = file.sim {
            self.sim = v;
        }
        if let Some(v) = file.steering {
            self.steering = v;
        }
        if let Some(v) = file.placement {
            self.placement = v;
        }
        if let Some(v) = file.headings {
            self.headings = v;
        }
        if let Some(v) = file.obstacles {
            self.obstacles = v;
        }
        if let Some(v) = file.targets {
            self.targets = v;
        }
        if let Some(v) = file.travel_time {
            self.travel_time = v;
        }
        if let Some(v) = file.majority {
            self.majority = v;
        }
        if let Some(v) = file.confidence {
            self.confidence = v;
        }
        if let Some(v) = file.histogram_bins {
            self.histogram_bins = v;
        }
        self
    }
}

/// On-disk form of a scenario.  Every section is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    pub scenario:       Option<ScenarioKind>,
    pub sim:            Option<SimConfig>,
    pub steering:       Option<SteeringParams>,
    pub placement:      Option<Placement>,
    pub headings:       Option<HeadingInit>,
    pub obstacles:      Option<Vec<Obstacle>>,
    pub targets:        Option<Vec<Vec2>>,
    pub travel_time:    Option<TravelTimeConfig>,
    pub majority:       Option<MajorityConfig>,
    pub confidence:     Option<ConfidenceConfig>,
    pub histogram_bins: Option<usize>,
}

impl ScenarioFile {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid scenario file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scenario file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }
}

// ── Built-in scenarios ────────────────────────────────────────────────────────

/// Twenty agents leave a point on the left edge, measure two candidate sites
/// on the right edge past five oscillating hurdles, and vote.
fn voter() -> Scenario {
    let bounds = WorldBounds::from_size(1300.0, 575.0);
    let origin = Vec2::new(4.0, 287.5);
    // One tick is one 60 Hz frame; speed is in units per second.
    let dt = 1.0 / 60.0;
    let speed = 60.0;

    Scenario {
        kind:           ScenarioKind::Voter,
        sim:            SimConfig {
            bounds,
            agent_count: 20,
            dt,
            max_ticks: 20_000,
            output_interval: 60,
            ..SimConfig::default()
        },
        steering:       SteeringParams {
            repulsion_radius: 85.0,
            speed,
            ..SteeringParams::default()
        },
        placement:      Placement::Point(origin),
        headings:       HeadingInit::Fixed(0.0),
        obstacles:      hurdles(&[
            (200.0, 300.0, 120.0, 0.1),
            (400.0, 400.0, 60.0, 0.3),
            (600.0, 500.0, 100.0, 0.1),
            (800.0, 250.0, 120.0, 0.1),
            (1000.0, 350.0, 70.0, 0.2),
        ]),
        targets:        Vec::new(),
        travel_time:    TravelTimeConfig {
            site_a:           Vec2::new(1250.0, 120.0),
            site_b:           Vec2::new(1250.0, 420.0),
            origin,
            repulsion_radius: 85.0,
            speed,
            arrival_radius:   25.0,
            reference_agent:  None,
        },
        majority:       MajorityConfig::default(),
        confidence:     ConfidenceConfig::default(),
        histogram_bins: 10,
    }
}

/// Seventy agents start in a strip on the left, synchronise headings every
/// hundred ticks, and head for two targets on the right.
fn majority() -> Scenario {
    let bounds = WorldBounds::from_size(900.0, 500.0);

    Scenario {
        kind:           ScenarioKind::Majority,
        sim:            SimConfig {
            bounds,
            agent_count: 70,
            max_ticks: 5_000,
            stop_when_all_reached: true,
            ..SimConfig::default()
        },
        steering:       SteeringParams {
            sensing_radius:      25.0,
            separation_distance: 50.0,
            repulsion_radius:    40.0,
            cohesion_gain:       0.8,
            alignment_gain:      0.9,
            separation_gain:     0.02,
            ..SteeringParams::default()
        },
        placement:      Placement::Uniform { min: Vec2::new(0.0, 0.0), max: Vec2::new(100.0, 500.0) },
        headings:       HeadingInit::Random,
        obstacles:      hurdles(&[
            (200.0, 200.0, 2.0, 0.05),
            (400.0, 300.0, 1.0, 0.06),
            (300.0, 150.0, 1.0, 0.03),
            (500.0, 250.0, 2.0, 0.04),
            (600.0, 100.0, 1.5, 0.07),
        ]),
        targets:        vec![Vec2::new(840.0, 125.0), Vec2::new(840.0, 375.0)],
        travel_time:    voter().travel_time,
        majority:       MajorityConfig { period: 100, interaction_radius: 120.0, informed_fraction: 0.5 },
        confidence:     ConfidenceConfig::default(),
        histogram_bins: 2,
    }
}

/// Fifteen agents flock around the centre of the world while averaging
/// continuous opinions.
fn hk() -> Scenario {
    let bounds = WorldBounds::from_size(800.0, 800.0);

    Scenario {
        kind:           ScenarioKind::Hk,
        sim:            SimConfig {
            bounds,
            agent_count: 15,
            max_ticks: 1_000,
            default_goal: Some(bounds.center()),
            ..SimConfig::default()
        },
        steering:       SteeringParams {
            sensing_radius:      100.0,
            separation_distance: 30.0,
            repulsion_radius:    80.0,
            cohesion_gain:       0.02,
            alignment_gain:      0.05,
            separation_gain:     0.7,
            repulsion_gain:      0.8,
            max_turn_rate:       0.1,
            speed:               2.0,
            ..SteeringParams::default()
        },
        placement:      Placement::anywhere(&bounds),
        headings:       HeadingInit::Random,
        obstacles:      hurdles(&[
            (250.0, 300.0, 40.0, 0.01),
            (550.0, 500.0, 40.0, 0.015),
        ]),
        targets:        Vec::new(),
        travel_time:    voter().travel_time,
        majority:       MajorityConfig::default(),
        confidence:     ConfidenceConfig { epsilon: 0.2, sensing_radius: 100.0, consensus_tolerance: 1e-3 },
        histogram_bins: 10,
    }
}

fn hurdles(spec: &[(f64, f64, f64, f64)]) -> Vec<Obstacle> {
    spec.iter()
        .map(|&(x, y, amplitude, frequency)| Obstacle::new(Vec2::new(x, y), amplitude, frequency))
        .collect()
}
