//! Learning environment, reward shaping and episode driver tests

use intersection_sim::simulation::{
    decision_bonus, decode_phase, decode_sub_state, encode_state, evaluate, run_episode,
    AgentError, DecisionAgent, Direction, EnvConfig, LongestQueueAgent, PhaseState,
    RewardConfig, RoundRobinAgent, SignalConfig, StateVector, SubState, TrafficEnv, STATE_SIZE,
};

fn quiet_env(episode_length: u64) -> TrafficEnv {
    let config = EnvConfig::new(SignalConfig::default(), episode_length, 0.3).expect("valid config");
    TrafficEnv::with_arrivals(config, Box::new(|_: Direction| 0u32)).expect("valid config")
}

/// Step a fresh quiet environment up to the tick before ALLRED ends
fn env_at_clearance_end() -> TrafficEnv {
    let mut env = quiet_env(300);
    env.reset();
    let config = SignalConfig::default();
    for _ in 0..(config.cycle_length() - 1) {
        env.step(0);
    }
    let snapshot = env.snapshot();
    assert_eq!(snapshot.sub_state, SubState::AllRed);
    assert_eq!(snapshot.timer, 1);
    env
}

struct BrokenAgent;

impl DecisionAgent for BrokenAgent {
    fn name(&self) -> &str {
        "broken"
    }

    fn act(&mut self, _state: &StateVector) -> Result<usize, AgentError> {
        Err(AgentError::Failed("model not loaded".to_string()))
    }
}

#[test]
fn test_reset_state_vector() {
    let mut env = quiet_env(10);
    let state = env.reset();

    assert_eq!(state.len(), STATE_SIZE);
    assert_eq!(
        state,
        [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]
    );
}

#[test]
fn test_state_vector_layout() {
    let phase = PhaseState {
        phase: Direction::South,
        sub_state: SubState::Yellow,
        timer: 2,
    };
    let state = encode_state([3, 0, 7, 1], &phase);

    assert_eq!(&state[..4], &[3.0, 0.0, 7.0, 1.0]);
    assert_eq!(&state[4..8], &[0.0, 0.0, 1.0, 0.0]);
    assert_eq!(&state[8..], &[0.0, 1.0, 0.0]);
    assert_eq!(decode_phase(&state), Some(Direction::South));
    assert_eq!(decode_sub_state(&state), Some(SubState::Yellow));
}

#[test]
fn test_invalid_env_config_is_rejected() {
    assert!(EnvConfig::new(SignalConfig::default(), 0, 0.3).is_err());
    assert!(EnvConfig::new(SignalConfig::default(), 100, 0.0).is_err());
    assert!(EnvConfig::new(SignalConfig::default(), 100, f64::NAN).is_err());
    assert!(TrafficEnv::new(
        EnvConfig {
            arrival_rate: -1.0,
            ..EnvConfig::default()
        },
        Some(1)
    )
    .is_err());
}

#[test]
fn test_done_at_episode_length() {
    let mut env = quiet_env(5);
    env.reset();

    for _ in 0..4 {
        assert!(!env.step(0).done);
    }
    assert!(env.step(0).done);
    assert!(env.is_done());

    let state = env.reset();
    assert!(!env.is_done());
    assert_eq!(state[4], 1.0);
}

#[test]
fn test_same_seed_same_trajectory() {
    let config = EnvConfig::default();
    let actions: Vec<usize> = (0..config.episode_length as usize).map(|i| (i * 7) % 4).collect();

    let trajectory = |seed: u64| {
        let mut env = TrafficEnv::new(config, Some(seed)).expect("valid config");
        env.reset();
        actions
            .iter()
            .map(|&action| {
                let result = env.step(action);
                (result.state, result.reward, result.done)
            })
            .collect::<Vec<_>>()
    };

    let first = trajectory(42);
    assert_eq!(first, trajectory(42));
    assert_eq!(first.len(), actions.len());
    assert!(first.last().is_some_and(|step| step.2));
}

#[test]
fn test_reset_with_seed_replays_episode() {
    let mut env = TrafficEnv::new(EnvConfig::default(), None).expect("valid config");

    let play = |env: &mut TrafficEnv| {
        env.reset_with_seed(9);
        (0..60).map(|_| env.step(1).reward).collect::<Vec<_>>()
    };

    let first = play(&mut env);
    let second = play(&mut env);
    assert_eq!(first, second);
}

#[test]
fn test_action_ignored_outside_clearance_end() {
    let mut env = quiet_env(300);
    env.reset();

    for _ in 0..(SignalConfig::default().cycle_length() - 1) {
        let result = env.step(Direction::West.index());
        assert_eq!(decode_phase(&result.state), Some(Direction::North));
    }
}

#[test]
fn test_action_consumed_when_clearance_ends() {
    let mut env = env_at_clearance_end();
    let result = env.step(Direction::South.index());

    assert_eq!(result.outcome.transition.opened(), Some(Direction::South));
    assert_eq!(decode_phase(&result.state), Some(Direction::South));
    assert_eq!(decode_sub_state(&result.state), Some(SubState::Green));
}

#[test]
fn test_out_of_range_action_advances_round_robin() {
    let mut env = env_at_clearance_end();
    let result = env.step(11);
    assert_eq!(result.outcome.transition.opened(), Some(Direction::East));
}

#[test]
fn test_reward_penalises_queue_and_credits_service() {
    let mut env = quiet_env(300);
    env.reset();
    for _ in 0..4 {
        env.add_car(Direction::East);
    }
    // N is green but empty
    assert_eq!(env.step(0).reward, -4.0);

    let mut env = quiet_env(300);
    env.reset();
    env.add_car(Direction::North);
    env.add_car(Direction::North);
    // One served, one left
    assert_eq!(env.step(0).reward, 0.0);
}

#[test]
fn test_opening_longest_queue_beats_opening_empty_one() {
    let mut open_north = env_at_clearance_end();
    let mut open_east = env_at_clearance_end();
    for env in [&mut open_north, &mut open_east] {
        for _ in 0..3 {
            env.add_car(Direction::North);
        }
    }

    let north = open_north.step(Direction::North.index()).reward;
    let east = open_east.step(Direction::East.index()).reward;

    // -3 queued, +2 match, -0.5 * 2.25 imbalance, +1 imbalance resolved
    assert!((north - -1.125).abs() < 1e-9, "north reward {}", north);
    // -3 queued, -2 empty, -0.5 * 2.25 imbalance
    assert!((east - -6.125).abs() < 1e-9, "east reward {}", east);
    assert!(north > east);
}

#[test]
fn test_decision_bonus_terms() {
    let config = RewardConfig::default();

    // Balanced queues: only the match bonus applies
    assert_eq!(decision_bonus(&config, [2, 2, 1, 1], Direction::North), 2.0);
    // Everything empty: nothing to reward or punish
    assert_eq!(decision_bonus(&config, [0, 0, 0, 0], Direction::West), 0.0);
    // Non-empty, non-max choice with no imbalance
    assert_eq!(decision_bonus(&config, [2, 1, 1, 1], Direction::East), 0.0);
}

#[test]
fn test_heuristic_action_matches_policy_choice() {
    let mut env = quiet_env(300);
    env.reset();
    env.add_car(Direction::South);
    env.add_car(Direction::South);
    assert_eq!(env.heuristic_action(), Direction::South.index());
}

#[test]
fn test_baseline_agents() {
    let phase = PhaseState {
        phase: Direction::West,
        sub_state: SubState::AllRed,
        timer: 1,
    };
    let state = encode_state([1, 3, 3, 0], &phase);

    assert_eq!(LongestQueueAgent.act(&state), Ok(Direction::East.index()));
    assert_eq!(RoundRobinAgent.act(&state), Ok(Direction::North.index()));
    assert!(RoundRobinAgent.act(&[0.0; STATE_SIZE]).is_err());
}

#[test]
fn test_run_episode_plays_to_the_end() {
    let config = EnvConfig::new(SignalConfig::default(), 120, 0.3).expect("valid config");
    let mut env = TrafficEnv::new(config, None).expect("valid config");
    let mut agent = LongestQueueAgent;

    let summary = run_episode(&mut env, Some(&mut agent), Some(3));
    assert_eq!(summary.steps, 120);
    assert_eq!(summary.fallbacks, 0);
    assert_eq!(env.snapshot().tick, 120);
}

#[test]
fn test_broken_agent_plays_like_heuristic() {
    let config = EnvConfig::new(SignalConfig::default(), 200, 0.3).expect("valid config");
    let mut env = TrafficEnv::new(config, None).expect("valid config");

    let heuristic = run_episode(&mut env, None, Some(17));
    let mut agent = BrokenAgent;
    let broken = run_episode(&mut env, Some(&mut agent), Some(17));

    assert_eq!(broken.fallbacks, broken.steps);
    assert_eq!(heuristic.fallbacks, 0);
    assert_eq!(broken.total_reward, heuristic.total_reward);
    assert_eq!(broken.served, heuristic.served);
    assert_eq!(broken.final_queue, heuristic.final_queue);
}

#[test]
fn test_evaluate_is_reproducible() {
    let config = EnvConfig::new(SignalConfig::default(), 80, 0.3).expect("valid config");
    let mut env = TrafficEnv::new(config, None).expect("valid config");
    let mut agent = RoundRobinAgent;

    let first = evaluate(&mut env, Some(&mut agent), 3, Some(100));
    let second = evaluate(&mut env, Some(&mut agent), 3, Some(100));
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}
