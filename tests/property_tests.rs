//! Property-based tests for queue service, phase selection and starvation

use proptest::prelude::*;

use intersection_sim::simulation::{
    Direction, HeuristicPolicy, PhasePolicy, QueueState, SignalConfig, Simulation,
};

/// Longest any head-of-queue vehicle may wait under light traffic
const MAX_WAIT_BOUND: u64 = 250;

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #[test]
    fn serve_removes_min_of_rate_and_count(
        count in 0u32..40,
        rate in 1u32..10,
        dir in direction(),
    ) {
        let mut queues = QueueState::new();
        queues.arrive_many(dir, 0, count);

        let outcome = queues.serve(dir, 5, rate);

        prop_assert_eq!(outcome.served, count.min(rate));
        prop_assert_eq!(queues.count(dir), count.saturating_sub(rate));
        prop_assert_eq!(outcome.wait_sum, u64::from(outcome.served) * 5);
    }

    #[test]
    fn heuristic_never_keeps_current_phase(
        counts in prop::array::uniform4(0u32..6),
        arrival_ticks in prop::array::uniform4(0u64..20),
        current in direction(),
        threshold in 1u32..4,
    ) {
        let mut queues = QueueState::new();
        for direction in Direction::ALL {
            let i = direction.index();
            queues.arrive_many(direction, arrival_ticks[i], counts[i]);
        }

        let policy = HeuristicPolicy::new(threshold).expect("valid threshold");
        prop_assert_ne!(policy.choose(&queues, current, 30), current);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn waits_stay_bounded_under_light_traffic(
        seed in any::<u64>(),
        rate in 0.01f64..0.08,
    ) {
        let mut sim = Simulation::new(SignalConfig::default())
            .and_then(|sim| sim.with_random_arrivals(rate, Some(seed)))
            .expect("valid config");

        let mut worst = 0;
        for _ in 0..10_000 {
            sim.tick();
            let snapshot = sim.snapshot();
            worst = worst.max(snapshot.waits.iter().copied().max().unwrap_or(0));
        }

        prop_assert!(worst < MAX_WAIT_BOUND, "worst wait {} at rate {}", worst, rate);
    }
}
