// ── CLI parsing ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod cli_tests {
    use clap::Parser;
    use sw_core::Vec2;
    use tracing::level_filters::LevelFilter;

    use crate::scenario::ScenarioKind;
    use crate::{Args, log_filter, parse_point, resolve};

    fn scenario_dir() -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios")
    }

    #[test]
    fn parse_point_accepts_spaces() {
        assert_eq!(parse_point("12.5, -3").unwrap(), Vec2::new(12.5, -3.0));
    }

    #[test]
    fn parse_point_rejects_malformed() {
        assert!(parse_point("12.5").is_err());
        assert!(parse_point("a,1").is_err());
        assert!(parse_point("1,").is_err());
    }

    #[test]
    fn defaults_to_voter() {
        let args = Args::parse_from(["swarm-run"]);
        let scenario = resolve(&args).unwrap();
        assert_eq!(scenario.kind, ScenarioKind::Voter);
        assert_eq!(scenario.sim.agent_count, 20);
    }

    #[test]
    fn seed_and_ticks_override() {
        let args = Args::parse_from(["swarm-run", "-S", "hk", "--seed", "99", "--ticks", "12"]);
        let scenario = resolve(&args).unwrap();
        assert_eq!(scenario.kind, ScenarioKind::Hk);
        assert_eq!(scenario.sim.seed, 99);
        assert_eq!(scenario.sim.max_ticks, 12);
    }

    #[test]
    fn config_file_sets_kind() {
        let path = scenario_dir().join("hk_crowded.toml");
        let args = Args::parse_from(["swarm-run", "--config", path.to_str().unwrap()]);
        let scenario = resolve(&args).unwrap();
        assert_eq!(scenario.kind, ScenarioKind::Hk);
        assert_eq!(scenario.sim.agent_count, 60);
        assert_eq!(scenario.histogram_bins, 20);
    }

    #[test]
    fn flag_kind_beats_file_kind() {
        let path = scenario_dir().join("hk_crowded.toml");
        let args = Args::parse_from(["swarm-run", "-S", "voter", "-c", path.to_str().unwrap()]);
        let scenario = resolve(&args).unwrap();
        assert_eq!(scenario.kind, ScenarioKind::Voter);
        // The file's [sim] section still applies.
        assert_eq!(scenario.sim.agent_count, 60);
    }

    #[test]
    fn target_flag_parses() {
        let args = Args::parse_from(["swarm-run", "--target", "100,200"]);
        assert_eq!(args.target, Some(Vec2::new(100.0, 200.0)));
    }

    #[test]
    fn verbose_lowers_log_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let quiet = log_filter(&Args::parse_from(["swarm-run"]));
        let loud = log_filter(&Args::parse_from(["swarm-run", "-v"]));
        assert_eq!(quiet.max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(loud.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn missing_config_file_is_error() {
        let args = Args::parse_from(["swarm-run", "--config", "/nonexistent/scenario.toml"]);
        assert!(resolve(&args).is_err());
    }
}

// ── Scenario files ────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use std::fs;

    use sw_agent::{HeadingInit, Placement};
    use sw_core::Vec2;
    use sw_spatial::Axis;

    use crate::scenario::{Scenario, ScenarioFile, ScenarioKind};

    #[test]
    fn empty_file_changes_nothing() {
        let file = ScenarioFile::parse("").unwrap();
        let merged = Scenario::builtin(ScenarioKind::Majority).merge(file);
        assert_eq!(merged, Scenario::builtin(ScenarioKind::Majority));
    }

    #[test]
    fn present_section_replaces_builtin() {
        let file = ScenarioFile::parse(
            r#"
            headings = { fixed = 1.5 }
            placement = { point = { x = 10.0, y = 20.0 } }

            [sim]
            agent_count = 3

            [[obstacles]]
            base      = { x = 50.0, y = 50.0 }
            amplitude = 5.0
            frequency = 0.5
            axis      = "x"
            "#,
        )
        .unwrap();
        let merged = Scenario::builtin(ScenarioKind::Hk).merge(file);

        assert_eq!(merged.sim.agent_count, 3);
        // Keys absent from a present section take library defaults, not the built-in values.
        assert_eq!(merged.sim.max_ticks, sw_core::SimConfig::default().max_ticks);
        assert_eq!(merged.sim.default_goal, None);
        assert_eq!(merged.headings, HeadingInit::Fixed(1.5));
        assert_eq!(merged.placement, Placement::Point(Vec2::new(10.0, 20.0)));
        assert_eq!(merged.obstacles.len(), 1);
        assert_eq!(merged.obstacles[0].axis, Axis::X);
        // Untouched sections keep the built-in values.
        assert_eq!(merged.confidence, Scenario::builtin(ScenarioKind::Hk).confidence);
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(ScenarioFile::parse("[physics]\ngravity = 9.8\n").is_err());
    }

    #[test]
    fn unknown_kind_rejected() {
        assert!(ScenarioFile::parse("scenario = \"flocking\"\n").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.toml");
        fs::write(&path, "scenario = \"majority\"\nhistogram_bins = 4\n").unwrap();

        let file = ScenarioFile::load(&path).unwrap();
        assert_eq!(file.scenario, Some(ScenarioKind::Majority));
        assert_eq!(file.histogram_bins, Some(4));
    }

    #[test]
    fn shipped_files_parse() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
        for name in ["hk_crowded.toml", "voter_wide.toml"] {
            let file = ScenarioFile::load(&dir.join(name));
            assert!(file.is_ok(), "{name}: {:?}", file.err());
        }
    }
}

// ── Building and running ──────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use std::fs;

    use clap::Parser;
    use sw_opinion::{BoundedConfidence, PeriodicMajority, ThresholdTravelTime};
    use sw_sim::NoopObserver;

    use crate::scenario::{Scenario, ScenarioFile, ScenarioKind};
    use crate::{Args, builder, dispatch, resolve};

    #[test]
    fn voter_builtin_runs() {
        let scenario = Scenario::builtin(ScenarioKind::Voter);
        let bounds = scenario.sim.bounds;
        let model = ThresholdTravelTime::new(scenario.travel_time.clone());
        let mut sim = builder(model, scenario).build().unwrap();

        let last = sim.run_ticks(120, &mut NoopObserver);
        assert_eq!(last.tick.0, 120);
        assert_eq!(last.model, "threshold_travel_time");
        assert!(last.phase.is_some());
        assert!(last.positions().all(|p| bounds.contains(p)));
    }

    #[test]
    fn majority_builtin_runs() {
        let scenario = Scenario::builtin(ScenarioKind::Majority);
        let bounds = scenario.sim.bounds;
        let model = PeriodicMajority::new(scenario.majority.clone());
        let mut sim = builder(model, scenario).build().unwrap();

        assert_eq!(sim.targets.len(), 2);
        let last = sim.run_ticks(150, &mut NoopObserver);
        assert_eq!(last.agents.len(), 70);
        assert!(last.positions().all(|p| bounds.contains(p)));
        assert!(last.opinions().all(|o| o == 0.0 || o == 1.0));
    }

    #[test]
    fn hk_builtin_runs() {
        let scenario = Scenario::builtin(ScenarioKind::Hk);
        let model = BoundedConfidence::new(scenario.confidence.clone());
        let mut sim = builder(model, scenario).build().unwrap();

        assert!(sim.goal_override().is_some());
        let last = sim.run_ticks(50, &mut NoopObserver);
        assert!(last.opinions().all(|o| (0.0..=1.0).contains(&o)));
    }

    #[test]
    fn crowded_hk_file_builds() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/hk_crowded.toml");
        let file = ScenarioFile::load(&path).unwrap();
        let scenario = Scenario::builtin(ScenarioKind::Hk).merge(file);
        let model = BoundedConfidence::new(scenario.confidence.clone());
        let sim = builder(model, scenario).build().unwrap();
        assert_eq!(sim.agents.count, 60);
        assert_eq!(sim.obstacles.len(), 1);
    }

    #[test]
    fn dispatch_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("hk");
        let args = Args::parse_from([
            "swarm-run",
            "-S",
            "hk",
            "--ticks",
            "20",
            "--output",
            out.to_str().unwrap(),
        ]);
        let scenario = resolve(&args).unwrap();
        dispatch(scenario, &args).unwrap();

        let metrics = fs::read_to_string(out.join("metrics.csv")).unwrap();
        // Header plus one row per tick.
        assert_eq!(metrics.lines().count(), 21);
        let snapshots = fs::read_to_string(out.join("agent_snapshots.csv")).unwrap();
        // Header plus 15 agents at ticks 10 and 20.
        assert_eq!(snapshots.lines().count(), 31);
    }

    #[test]
    fn target_outside_world_fails() {
        let args = Args::parse_from(["swarm-run", "-S", "hk", "--ticks", "5", "--target", "5000,5000"]);
        let scenario = resolve(&args).unwrap();
        assert!(dispatch(scenario, &args).is_err());
    }
}
