//! Integration tests for sw-sim.

use approx::assert_abs_diff_eq;

use sw_agent::{AgentStore, HeadingInit, Placement};
use sw_core::{CoreError, SimConfig, Tick, Vec2, WorldBounds};
use sw_opinion::{
    BoundedConfidence, ColorClass, ConfidenceConfig, MajorityConfig, OpinionDomain,
    PeriodicMajority, ThresholdTravelTime, TravelTimeConfig,
};
use sw_spatial::Obstacle;

use crate::{NoopObserver, OpinionDistribution, SimBuilder, SimError, SimObserver, Snapshot, TickMetrics};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(agent_count: usize, max_ticks: u64) -> SimConfig {
    SimConfig {
        bounds:                WorldBounds::from_size(800.0, 800.0),
        agent_count,
        dt:                    1.0,
        max_ticks,
        seed:                  42,
        collision_threshold:   10.0,
        arrival_radius:        10.0,
        output_interval:       10,
        default_goal:          None,
        stop_when_all_reached: false,
    }
}

fn store_at(positions: &[(f64, f64)], headings: &[f64]) -> AgentStore {
    let mut store = AgentStore::new(positions.len());
    store.position = positions.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
    store.heading = headings.to_vec();
    store
}

fn hk(epsilon: f64, sensing_radius: f64) -> BoundedConfidence {
    BoundedConfidence::new(ConfidenceConfig { epsilon, sensing_radius, consensus_tolerance: 1e-3 })
}

fn variance(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

fn travel_config() -> TravelTimeConfig {
    TravelTimeConfig {
        site_a:           Vec2::new(400.0, 150.0),
        site_b:           Vec2::new(400.0, 450.0),
        origin:           Vec2::new(50.0, 300.0),
        repulsion_radius: 80.0,
        speed:            1.0,
        arrival_radius:   20.0,
        reference_agent:  None,
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_successfully_with_defaults() {
        let sim = SimBuilder::new(test_config(12, 10), hk(0.2, 100.0)).build().unwrap();
        assert_eq!(sim.agents.count, 12);
        assert!(sim.agents.position.iter().all(|&p| sim.config.bounds.contains(p)));
        assert!(sim.agents.opinion.iter().all(|o| (0.0..=1.0).contains(o)));
        assert_eq!(sim.clock.current_tick, Tick::ZERO);
    }

    #[test]
    fn agent_store_count_mismatch_errors() {
        let result = SimBuilder::new(test_config(5, 10), hk(0.2, 100.0))
            .agents(AgentStore::new(3))
            .build();
        assert!(matches!(
            result,
            Err(SimError::AgentCountMismatch { expected: 5, got: 3, .. })
        ));
    }

    #[test]
    fn invalid_config_is_rejected_before_any_tick() {
        let mut config = test_config(5, 10);
        config.dt = 0.0;
        assert!(matches!(
            SimBuilder::new(config, hk(0.2, 100.0)).build(),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn invalid_model_parameters_are_rejected() {
        assert!(SimBuilder::new(test_config(5, 10), hk(1.5, 100.0)).build().is_err());
        assert!(SimBuilder::new(test_config(5, 10), hk(0.2, -1.0)).build().is_err());
    }

    #[test]
    fn majority_requires_targets() {
        let result = SimBuilder::new(test_config(5, 10), PeriodicMajority::new(MajorityConfig::default())).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn target_outside_world_is_rejected() {
        let result = SimBuilder::new(test_config(5, 10), hk(0.2, 100.0))
            .targets(vec![Vec2::new(900.0, 10.0)])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn agent_outside_world_is_rejected() {
        let store = store_at(&[(10.0, 10.0), (-5.0, 10.0)], &[0.0, 0.0]);
        let result = SimBuilder::new(test_config(2, 10), hk(0.2, 100.0)).agents(store).build();
        assert!(result.is_err());
    }

    #[test]
    fn short_store_column_is_rejected() {
        let mut store = store_at(&[(10.0, 10.0), (20.0, 10.0)], &[0.0, 0.0]);
        store.opinion.truncate(1);
        let result = SimBuilder::new(test_config(2, 10), hk(0.2, 100.0)).agents(store).build();
        assert_eq!(
            result.err(),
            Some(SimError::AgentCountMismatch { expected: 2, got: 1, what: "opinion" })
        );

        let mut store = store_at(&[(10.0, 10.0), (20.0, 10.0)], &[0.0, 0.0]);
        store.is_informed.push(true);
        let result = SimBuilder::new(test_config(2, 10), hk(0.2, 100.0)).agents(store).build();
        assert!(matches!(result, Err(SimError::AgentCountMismatch { got: 3, what: "is_informed", .. })));
    }

    #[test]
    fn non_finite_heading_is_rejected() {
        let store = store_at(&[(10.0, 10.0), (20.0, 10.0)], &[0.0, f64::NAN]);
        let result = SimBuilder::new(test_config(2, 10), hk(0.2, 100.0)).agents(store).build();
        assert!(matches!(result, Err(SimError::Config(CoreError::NonFinite { .. }))));
    }

    #[test]
    fn bad_speed_is_rejected() {
        for bad in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            let mut store = store_at(&[(10.0, 10.0), (20.0, 10.0)], &[0.0, 0.0]);
            store.speed[0] = bad;
            let result = SimBuilder::new(test_config(2, 10), hk(0.2, 100.0)).agents(store).build();
            assert!(matches!(result, Err(SimError::Config(CoreError::NonPositive { .. }))), "speed {bad}");
        }
    }

    #[test]
    fn valid_supplied_store_steps_and_stays_in_bounds() {
        let store = store_at(&[(10.0, 10.0), (795.0, 795.0)], &[1.0, 0.5]);
        let mut sim = SimBuilder::new(test_config(2, 10), hk(0.2, 100.0)).agents(store).build().unwrap();
        for _ in 0..20 {
            let snap = sim.step();
            assert!(snap.positions().all(|p| p.is_finite() && sim.config.bounds.contains(p)));
        }
    }

    #[test]
    fn supplied_opinions_are_kept_and_checked() {
        let mut store = store_at(&[(10.0, 10.0), (20.0, 10.0)], &[0.0, 0.0]);
        store.opinion = vec![0.25, 0.75];
        let sim = SimBuilder::new(test_config(2, 10), hk(0.2, 100.0))
            .agents(store.clone())
            .build()
            .unwrap();
        assert_eq!(sim.agents.opinion, vec![0.25, 0.75]);

        // 0.25 is not a binary opinion.
        let config = travel_config();
        let result = SimBuilder::new(test_config(2, 10), ThresholdTravelTime::new(config))
            .agents(store)
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn travel_time_initial_opinions_come_from_the_estimate() {
        // Sites are symmetric about the origin, so every estimate ties and
        // ties go to site B.
        let sim = SimBuilder::new(test_config(4, 10), ThresholdTravelTime::new(travel_config()))
            .placement(Placement::Point(Vec2::new(50.0, 300.0)))
            .headings(HeadingInit::Fixed(0.0))
            .build()
            .unwrap();
        assert!(sim.agents.opinion.iter().all(|&o| o == 1.0));
    }

    #[test]
    fn same_seed_builds_identical_populations() {
        let a = SimBuilder::new(test_config(30, 10), hk(0.2, 100.0)).build().unwrap();
        let b = SimBuilder::new(test_config(30, 10), hk(0.2, 100.0)).build().unwrap();
        assert_eq!(a.agents, b.agents);

        let mut other = test_config(30, 10);
        other.seed = 43;
        let c = SimBuilder::new(other, hk(0.2, 100.0)).build().unwrap();
        assert_ne!(a.agents.opinion, c.agents.opinion);
    }
}

// ── Tick semantics ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_tests {
    use super::*;

    #[test]
    fn obstacles_follow_the_closed_form_exactly() {
        let obstacles = vec![
            Obstacle::new(Vec2::new(200.0, 300.0), 120.0, 0.1),
            Obstacle::new(Vec2::new(400.0, 400.0), 60.0, 0.3),
        ];
        let mut sim = SimBuilder::new(test_config(5, 100), hk(0.2, 100.0))
            .obstacles(obstacles.clone())
            .build()
            .unwrap();

        for _ in 0..50 {
            let snap = sim.tick(0.5);
            for (o, s) in obstacles.iter().zip(&snap.obstacles) {
                assert_eq!(s.position, o.position_at(snap.elapsed));
            }
        }
        assert_abs_diff_eq!(sim.clock.elapsed, 25.0);
    }

    #[test]
    fn invalid_dt_is_treated_as_zero() {
        let mut sim = SimBuilder::new(test_config(3, 100), hk(0.2, 100.0)).build().unwrap();
        let before = sim.agents.position.clone();

        let snap = sim.tick(f64::NAN);
        assert_eq!(snap.tick, Tick(1));
        assert_eq!(snap.elapsed, 0.0);
        assert_eq!(sim.agents.position, before);

        let snap = sim.tick(-2.0);
        assert_eq!(snap.tick, Tick(2));
        assert_eq!(snap.elapsed, 0.0);
    }

    #[test]
    fn snapshot_reflects_the_state_after_the_tick() {
        let mut sim = SimBuilder::new(test_config(6, 100), hk(0.2, 100.0)).build().unwrap();
        let snap = sim.step();
        assert_eq!(snap.tick, Tick(1));
        assert_eq!(snap.model, "bounded_confidence");
        assert_eq!(snap.phase, None);
        assert_eq!(snap, sim.snapshot());
        for (a, &p) in snap.agents.iter().zip(&sim.agents.position) {
            assert_eq!(a.position, p);
        }
    }

    #[test]
    fn agents_stay_in_bounds_and_in_domain() {
        let obstacles = vec![
            Obstacle::new(Vec2::new(300.0, 300.0), 100.0, 0.05),
            Obstacle::new(Vec2::new(500.0, 500.0), 50.0, 0.2),
        ];
        let targets = vec![Vec2::new(700.0, 100.0), Vec2::new(100.0, 700.0)];

        let mut hk_sim = SimBuilder::new(test_config(25, 300), hk(0.2, 100.0))
            .obstacles(obstacles.clone())
            .build()
            .unwrap();
        let mut majority = SimBuilder::new(test_config(25, 300), PeriodicMajority::new(MajorityConfig::default()))
            .obstacles(obstacles)
            .targets(targets)
            .build()
            .unwrap();

        for _ in 0..300 {
            let s = hk_sim.step();
            assert!(s.agents.iter().all(|a| hk_sim.config.bounds.contains(a.position)));
            assert!(s.opinions().all(|o| OpinionDomain::Continuous.contains(o)));

            let s = majority.step();
            assert!(s.agents.iter().all(|a| majority.config.bounds.contains(a.position)));
            assert!(s.opinions().all(|o| OpinionDomain::Binary.contains(o)));
            assert!(s.agents.iter().all(|a| a.heading.is_finite()));
        }
    }

    #[test]
    fn same_seed_same_trajectory() {
        let build = || {
            let mut config = test_config(10, 400);
            config.bounds = WorldBounds::from_size(600.0, 600.0);
            SimBuilder::new(config, ThresholdTravelTime::new(travel_config()))
                .obstacles(vec![Obstacle::new(Vec2::new(250.0, 250.0), 80.0, 0.1)])
                .placement(Placement::Uniform { min: Vec2::new(30.0, 280.0), max: Vec2::new(70.0, 320.0) })
                .build()
                .unwrap()
        };
        let mut a = build();
        let mut b = build();
        let last_a = a.run(&mut NoopObserver);
        let last_b = b.run(&mut NoopObserver);
        assert_eq!(last_a, last_b);
        assert_eq!(last_a.tick, Tick(400));
    }
}

// ── Opinion policies inside the engine ────────────────────────────────────────

#[cfg(test)]
mod policy_tests {
    use super::*;

    #[test]
    fn bounded_confidence_variance_decreases_then_converges() {
        let mut store = store_at(
            &[(100.0, 400.0), (200.0, 400.0), (300.0, 400.0), (400.0, 400.0), (500.0, 400.0)],
            &[0.0; 5],
        );
        store.opinion = vec![0.2, 0.35, 0.5, 0.65, 0.8];
        let start = variance(&store.opinion);

        let mut sim = SimBuilder::new(test_config(5, 100), hk(0.25, 1_000.0))
            .agents(store)
            .build()
            .unwrap();

        let first: Vec<f64> = sim.step().opinions().collect();
        assert!(variance(&first) < start);

        let last = sim.run_ticks(20, &mut NoopObserver);
        let values: Vec<f64> = last.opinions().collect();
        let spread = values.iter().copied().fold(f64::MIN, f64::max)
            - values.iter().copied().fold(f64::MAX, f64::min);
        assert!(spread < 1e-9, "opinions did not converge: {values:?}");
        assert_abs_diff_eq!(values[0], 0.5, epsilon = 1e-9);
        assert!(last.agents.iter().all(|a| a.has_consensus && a.color == ColorClass::Consensus));
    }

    #[test]
    fn bounded_confidence_without_neighbours_is_a_no_op() {
        let mut store = store_at(&[(100.0, 100.0), (700.0, 700.0)], &[0.0, 0.0]);
        store.opinion = vec![0.2, 0.9];
        let mut sim = SimBuilder::new(test_config(2, 10), hk(0.2, 100.0))
            .agents(store)
            .build()
            .unwrap();
        let snap = sim.step();
        assert_eq!(snap.opinions().collect::<Vec<_>>(), vec![0.2, 0.9]);
        assert!(snap.agents.iter().all(|a| !a.has_consensus));
    }

    #[test]
    fn majority_sync_marks_consensus_and_informed_colour() {
        let mut store = store_at(&[(100.0, 100.0), (150.0, 100.0)], &[0.0, std::f64::consts::FRAC_PI_2]);
        store.is_informed = vec![true, false];
        let model = PeriodicMajority::new(MajorityConfig { period: 5, ..MajorityConfig::default() });
        let mut sim = SimBuilder::new(test_config(2, 100), model)
            .agents(store)
            .targets(vec![Vec2::new(700.0, 700.0)])
            .build()
            .unwrap();

        // Ticks 0..=3 complete less than one period.
        for _ in 0..4 {
            let snap = sim.step();
            assert!(snap.agents.iter().all(|a| !a.has_consensus && a.opinion == 0.0));
        }
        let snap = sim.step();
        assert_eq!(snap.tick, Tick(5));
        assert!(snap.agents.iter().all(|a| a.has_consensus && a.opinion == 1.0));
        assert_eq!(snap.agents[0].color, ColorClass::Informed);
        assert_eq!(snap.agents[1].color, ColorClass::Default);
    }

    #[test]
    fn first_arrival_claims_the_target_and_stops() {
        let mut store = store_at(&[(100.0, 100.0)], &[0.0]);
        store.has_consensus = vec![true];
        let mut config = test_config(1, 1_000);
        config.stop_when_all_reached = true;
        let mut sim = SimBuilder::new(config, PeriodicMajority::new(MajorityConfig::default()))
            .agents(store)
            .targets(vec![Vec2::new(150.0, 100.0)])
            .build()
            .unwrap();

        let last = sim.run(&mut NoopObserver);
        assert!(last.targets[0].claimed);
        assert!(last.agents[0].reached_goal);
        assert!(last.tick < Tick(1_000));
        assert!(last.agents[0].position.distance(Vec2::new(150.0, 100.0)) < 10.0);

        let parked = sim.agents.position[0];
        sim.run_ticks(5, &mut NoopObserver);
        assert_eq!(sim.agents.position[0], parked);
    }

    #[test]
    fn travel_time_population_walks_the_phase_cycle() {
        let mut config = test_config(1, 20_000);
        config.bounds = WorldBounds::from_size(600.0, 600.0);
        let mut sim = SimBuilder::new(config, ThresholdTravelTime::new(travel_config()))
            .placement(Placement::Point(Vec2::new(50.0, 300.0)))
            .headings(HeadingInit::Fixed(0.0))
            .build()
            .unwrap();

        let mut seen: Vec<&'static str> = Vec::new();
        let mut consensus_snapshot: Option<Snapshot> = None;
        for _ in 0..20_000 {
            let snap = sim.step();
            let label = snap.phase.unwrap_or("none");
            if seen.last() != Some(&label) {
                seen.push(label);
            }
            if label == "seek_consensus_target" {
                consensus_snapshot = Some(snap);
                break;
            }
        }

        assert_eq!(
            seen,
            vec!["seek_target_a", "return_from_a", "seek_target_b", "return_from_b", "seek_consensus_target"]
        );
        let snap = consensus_snapshot.unwrap();
        assert!(snap.agents[0].has_consensus);
        assert_eq!(snap.agents[0].color, ColorClass::Consensus);
    }
}

// ── External goal ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod target_tests {
    use super::*;

    #[test]
    fn set_target_pulls_followers_toward_it() {
        let store = store_at(&[(400.0, 400.0)], &[0.0]);
        let mut sim = SimBuilder::new(test_config(1, 1_000), hk(0.2, 100.0))
            .agents(store)
            .build()
            .unwrap();
        let goal = Vec2::new(700.0, 400.0);
        sim.set_target(goal.x, goal.y).unwrap();
        assert_eq!(sim.goal_override(), Some(goal));

        let start = sim.agents.position[0].distance(goal);
        sim.run_ticks(100, &mut NoopObserver);
        assert!(sim.agents.position[0].distance(goal) < start - 50.0);

        sim.clear_target();
        assert_eq!(sim.goal_override(), None);
    }

    #[test]
    fn set_target_rejects_points_outside_the_world() {
        let mut sim = SimBuilder::new(test_config(2, 10), hk(0.2, 100.0)).build().unwrap();
        assert!(sim.set_target(900.0, 10.0).is_err());
        assert!(sim.set_target(f64::NAN, 10.0).is_err());
        assert_eq!(sim.goal_override(), None);
    }

    #[test]
    fn default_goal_is_installed_at_construction() {
        let mut config = test_config(2, 10);
        config.default_goal = Some(Vec2::new(400.0, 400.0));
        let sim = SimBuilder::new(config, hk(0.2, 100.0)).build().unwrap();
        assert_eq!(sim.goal_override(), Some(Vec2::new(400.0, 400.0)));
    }
}

// ── Observer and metrics ──────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        starts:    usize,
        ends:      usize,
        metrics:   usize,
        snapshots: Vec<Tick>,
        finished:  Option<Tick>,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _t: Tick) { self.starts += 1; }
        fn on_tick_end(&mut self, _s: &Snapshot) { self.ends += 1; }
        fn on_metrics(&mut self, _m: &TickMetrics) { self.metrics += 1; }
        fn on_snapshot(&mut self, s: &Snapshot) { self.snapshots.push(s.tick); }
        fn on_sim_end(&mut self, s: &Snapshot) { self.finished = Some(s.tick); }
    }

    #[test]
    fn run_stops_at_the_tick_budget() {
        let mut config = test_config(4, 7);
        config.output_interval = 2;
        let mut sim = SimBuilder::new(config, hk(0.2, 100.0)).build().unwrap();
        let mut obs = Counter::default();
        let last = sim.run(&mut obs);

        assert_eq!(last.tick, Tick(7));
        assert_eq!(sim.clock.current_tick, Tick(7));
        assert_eq!(obs.starts, 7);
        assert_eq!(obs.ends, 7);
        assert_eq!(obs.metrics, 7);
        assert_eq!(obs.snapshots, vec![Tick(2), Tick(4), Tick(6)]);
        assert_eq!(obs.finished, Some(Tick(7)));
        assert!(sim.is_finished());
    }

    #[test]
    fn run_ticks_ignores_the_budget() {
        let mut sim = SimBuilder::new(test_config(2, 3), hk(0.2, 100.0)).build().unwrap();
        sim.run_ticks(5, &mut NoopObserver);
        assert_eq!(sim.clock.current_tick, Tick(5));
    }

    #[test]
    fn collision_counts_pairs_and_agents() {
        let store = store_at(
            &[(0.0, 0.0), (5.0, 0.0), (100.0, 100.0), (103.0, 100.0), (300.0, 300.0)],
            &[0.0; 5],
        );
        let sim = SimBuilder::new(test_config(5, 10), hk(0.2, 100.0))
            .agents(store)
            .build()
            .unwrap();
        let m = sim.metrics(&sim.snapshot());
        assert_eq!(m.colliding_pairs, 2);
        assert_eq!(m.colliding_agents, 4);
        assert_eq!(m.opinions.bins.len(), 10);
    }

    #[test]
    fn distance_equal_to_threshold_is_not_a_collision() {
        let store = store_at(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)], &[0.0; 3]);
        let sim = SimBuilder::new(test_config(3, 10), hk(0.2, 100.0))
            .agents(store)
            .build()
            .unwrap();
        assert_eq!(sim.metrics(&sim.snapshot()).colliding_pairs, 0);
    }

    #[test]
    fn obstacle_hits_count_per_agent() {
        let store = store_at(&[(100.0, 100.0), (104.0, 100.0), (400.0, 400.0), (600.0, 600.0)], &[0.0; 4]);
        let obstacles = vec![
            Obstacle::new(Vec2::new(100.0, 108.0), 0.0, 0.1),
            Obstacle::new(Vec2::new(405.0, 400.0), 0.0, 0.1),
        ];
        let sim = SimBuilder::new(test_config(4, 10), hk(0.2, 100.0))
            .agents(store)
            .obstacles(obstacles)
            .build()
            .unwrap();
        let m = sim.metrics(&sim.snapshot());
        assert_eq!(m.colliding_pairs, 1);
        assert_eq!(m.colliding_agents, 2);
        // (104, 100) is ~8.9 from the first obstacle, (400, 400) is 5 from the second.
        assert_eq!(m.obstacle_collisions, 3);
        assert_eq!(m.agent_collisions, vec![2, 2, 1, 0]);
    }

    #[test]
    fn collision_counts_follow_the_stepped_world() {
        let store = store_at(&[(100.0, 100.0), (300.0, 300.0)], &[0.0; 2]);
        let mut sim = SimBuilder::new(test_config(2, 10), hk(0.2, 100.0))
            .agents(store)
            .obstacles(vec![Obstacle::new(Vec2::new(302.0, 300.0), 0.0, 0.1)])
            .build()
            .unwrap();
        let snap = sim.step();
        let m = sim.metrics(&snap);
        assert_eq!(m.tick, Tick(1));
        assert_eq!(m.agent_collisions.len(), 2);
        assert_eq!(m.agent_collisions[0], 0);
        // One tick at unit speed cannot carry the second agent out of range.
        assert_eq!(m.obstacle_collisions, 1);
        assert_eq!(m.agent_collisions[1], 1);
    }

    #[test]
    fn opinion_distribution_bins() {
        let binary = OpinionDistribution::from_values(&[0.0, 1.0, 1.0, 0.0, 1.0], OpinionDomain::Binary, 10);
        assert_eq!(binary.bins, vec![2, 3]);
        assert_abs_diff_eq!(binary.mean, 0.6);
        assert_abs_diff_eq!(binary.variance, 0.24, epsilon = 1e-12);

        let continuous =
            OpinionDistribution::from_values(&[0.0, 0.05, 0.5, 1.0], OpinionDomain::Continuous, 10);
        assert_eq!(continuous.bins.iter().sum::<usize>(), 4);
        assert_eq!(continuous.bins[0], 2);
        assert_eq!(continuous.bins[5], 1);
        assert_eq!(continuous.bins[9], 1);
        assert_eq!(continuous.min, 0.0);
        assert_eq!(continuous.max, 1.0);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn majority_stays_in_bounds_and_domain(seed in any::<u64>(), n in 2usize..30) {
            let mut config = test_config(n, 60);
            config.seed = seed;
            let mut sim = SimBuilder::new(config, PeriodicMajority::new(MajorityConfig {
                period:             10,
                interaction_radius: 150.0,
                informed_fraction:  0.5,
            }))
            .obstacles(vec![Obstacle::new(Vec2::new(400.0, 400.0), 80.0, 0.02)])
            .targets(vec![Vec2::new(700.0, 200.0), Vec2::new(700.0, 600.0)])
            .build()
            .unwrap();

            for _ in 0..60 {
                let snap = sim.step();
                for a in &snap.agents {
                    prop_assert!(a.position.is_finite() && a.heading.is_finite());
                    prop_assert!(sim.config.bounds.contains(a.position));
                    prop_assert!(a.opinion == 0.0 || a.opinion == 1.0);
                }
            }
        }

        #[test]
        fn full_visibility_hk_never_spreads(seed in any::<u64>(), n in 2usize..20) {
            let mut config = test_config(n, 10);
            config.seed = seed;
            let mut sim = SimBuilder::new(config, hk(1.0, 2000.0)).build().unwrap();

            let mut prev = variance(&sim.agents.opinion);
            for _ in 0..5 {
                let opinions: Vec<f64> = sim.step().opinions().collect();
                prop_assert!(opinions.iter().all(|o| (0.0..=1.0).contains(o)));
                let v = variance(&opinions);
                prop_assert!(v <= prev + 1e-12);
                prev = v;
            }
        }
    }
}
