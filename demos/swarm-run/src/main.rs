//! swarm-run: headless runner for the swarm consensus simulator.
//!
//! Runs one of three scenarios (travel-time voter, periodic majority,
//! bounded confidence) to completion and writes `metrics.csv` and
//! `agent_snapshots.csv` for offline plotting.
//!
//! ```text
//! swarm-run --scenario majority --seed 7 --output output/majority
//! swarm-run --config demos/swarm-run/scenarios/hk_crowded.toml -v
//! ```

mod scenario;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sw_core::{Tick, Vec2};
use sw_opinion::{BoundedConfidence, OpinionModel, PeriodicMajority, ThresholdTravelTime};
use sw_output::{CsvWriter, OutputWriter, SimOutputObserver};
use sw_sim::{SimBuilder, SimObserver, Snapshot, TickMetrics};

use scenario::{Scenario, ScenarioFile, ScenarioKind};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "swarm-run")]
#[command(about = "Run a swarm consensus scenario headlessly", long_about = None)]
struct Args {
    /// Built-in scenario (overrides the `scenario` key of --config)
    #[arg(short = 'S', long, value_enum)]
    scenario: Option<ScenarioKind>,

    /// TOML file whose sections replace the built-in ones
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Master seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Tick budget
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Directory for the CSV time series (no files are written without it)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Goal installed before the first tick, as `x,y`
    #[arg(long, value_parser = parse_point)]
    target: Option<Vec2>,

    /// Log progress every N ticks
    #[arg(long, default_value_t = 500)]
    progress: u64,

    /// Debug-level logging (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x `{x}`: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y `{y}`: {e}"))?;
    Ok(Vec2::new(x, y))
}

/// Built-in scenario for `args`, with the config file and flag overrides
/// applied in that order.
fn resolve(args: &Args) -> Result<Scenario> {
    let file = match &args.config {
        Some(path) => ScenarioFile::load(path)?,
        None => ScenarioFile::default(),
    };
    let kind = args.scenario.or(file.scenario).unwrap_or(ScenarioKind::Voter);
    let mut scenario = Scenario::builtin(kind).merge(file);
    if let Some(seed) = args.seed {
        scenario.sim.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        scenario.sim.max_ticks = ticks;
    }
    Ok(scenario)
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs progress and forwards everything to the CSV observer, if any.
struct RunObserver<W: OutputWriter> {
    output:          Option<SimOutputObserver<W>>,
    progress_every:  u64,
    collision_ticks: u64,
    peak_pairs:      usize,
}

impl<W: OutputWriter> RunObserver<W> {
    fn new(output: Option<SimOutputObserver<W>>, progress_every: u64) -> Self {
        Self { output, progress_every, collision_ticks: 0, peak_pairs: 0 }
    }
}

impl<W: OutputWriter> SimObserver for RunObserver<W> {
    fn on_tick_start(&mut self, tick: Tick) {
        if let Some(o) = self.output.as_mut() {
            o.on_tick_start(tick);
        }
    }

    fn on_metrics(&mut self, m: &TickMetrics) {
        if m.colliding_pairs > 0 {
            self.collision_ticks += 1;
        }
        self.peak_pairs = self.peak_pairs.max(m.colliding_pairs);
        if m.tick.is_multiple_of(self.progress_every) {
            info!(
                tick = m.tick.0,
                collisions = m.colliding_pairs,
                obstacle_hits = m.obstacle_collisions,
                consensus = m.consensus,
                reached = m.reached,
                opinion_mean = m.opinions.mean,
                opinion_var = m.opinions.variance,
                "progress"
            );
        }
        if let Some(o) = self.output.as_mut() {
            o.on_metrics(m);
        }
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) {
        if let Some(o) = self.output.as_mut() {
            o.on_snapshot(snapshot);
        }
    }

    fn on_sim_end(&mut self, last: &Snapshot) {
        if let Some(o) = self.output.as_mut() {
            o.on_sim_end(last);
        }
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

fn builder<M: OpinionModel>(model: M, scenario: Scenario) -> SimBuilder<M> {
    SimBuilder::new(scenario.sim, model)
        .steering(scenario.steering)
        .obstacles(scenario.obstacles)
        .targets(scenario.targets)
        .placement(scenario.placement)
        .headings(scenario.headings)
        .histogram_bins(scenario.histogram_bins)
}

fn run<M: OpinionModel>(model: M, scenario: Scenario, args: &Args) -> Result<()> {
    let mut sim = builder(model, scenario).build().context("building simulation")?;

    if let Some(goal) = args.target {
        sim.set_target(goal.x, goal.y).context("--target")?;
    }

    let output = match &args.output {
        Some(dir) => {
            let writer = CsvWriter::new(dir)
                .with_context(|| format!("opening output directory {}", dir.display()))?;
            Some(SimOutputObserver::new(writer))
        }
        None => None,
    };
    let mut obs = RunObserver::new(output, args.progress.max(1));

    let t0 = Instant::now();
    let last = sim.run(&mut obs);
    let wall = t0.elapsed();

    if let Some(o) = obs.output.as_mut() {
        if let Some(e) = o.take_error() {
            warn!("output error: {e}");
        }
    }

    // ── Summary ───────────────────────────────────────────────────────────
    println!("Scenario      : {}", sim.model.name());
    println!("Ticks         : {} ({:.1} s simulated, {:.3} s wall)", last.tick.0, last.elapsed, wall.as_secs_f64());
    if let Some(phase) = last.phase {
        println!("Final phase   : {phase}");
    }
    println!("Consensus     : {}/{}", last.consensus_count(), last.agents.len());
    println!("Reached goal  : {}/{}", last.reached_count(), last.agents.len());
    println!("Collision ticks: {} (peak {} pairs)", obs.collision_ticks, obs.peak_pairs);
    let metrics = sim.metrics(&last);
    println!(
        "Opinions      : mean {:.4}  var {:.6}  range [{:.4}, {:.4}]",
        metrics.opinions.mean, metrics.opinions.variance, metrics.opinions.min, metrics.opinions.max
    );
    if let Some(dir) = &args.output {
        println!("Output        : {}", dir.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder().with_env_filter(log_filter(&args)).finish();
    tracing::subscriber::set_global_default(subscriber).context("installing tracing subscriber")?;

    let scenario = resolve(&args)?;
    if scenario.sim.max_ticks == 0 {
        bail!("tick budget must be at least 1");
    }
    info!(scenario = ?scenario.kind, seed = scenario.sim.seed, "starting");

    dispatch(scenario, &args)
}

/// `RUST_LOG` when set, otherwise `debug` with --verbose and `info` without.
fn log_filter(args: &Args) -> EnvFilter {
    let fallback = if args.verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Pick the opinion model for `scenario.kind` and run it.
fn dispatch(scenario: Scenario, args: &Args) -> Result<()> {
    match scenario.kind {
        ScenarioKind::Voter => {
            let model = ThresholdTravelTime::new(scenario.travel_time.clone());
            run(model, scenario, args)
        }
        ScenarioKind::Majority => {
            let model = PeriodicMajority::new(scenario.majority.clone());
            run(model, scenario, args)
        }
        ScenarioKind::Hk => {
            let model = BoundedConfidence::new(scenario.confidence.clone());
            run(model, scenario, args)
        }
    }
}
