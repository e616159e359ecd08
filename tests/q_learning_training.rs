//! Integration tests for epsilon-greedy Q-learning on the reference grid

mod common;

use std::sync::{Arc, Mutex};

use common::{approx_eq_tol, init_tracing, mouse_config, mouse_world};
use mouse_mdp::{
    Action, Dynamics, MetricsObserver, Planner, QLearningAgent, State, StepRecord,
    TracingObserver, TrainingObserver,
};
use rand::RngCore;

/// RNG that always yields zero: every roll explores (for ε > 0) and every
/// uniform choice picks the first listed action.
struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

/// Observer keeping every step record.
#[derive(Clone, Default)]
struct RecordingObserver {
    records: Arc<Mutex<Vec<StepRecord>>>,
}

impl TrainingObserver for RecordingObserver {
    fn on_step(&mut self, record: &StepRecord) -> mouse_mdp::Result<()> {
        self.records.lock().unwrap().push(*record);
        Ok(())
    }
}

fn seeded_agent(seed: u64) -> QLearningAgent {
    QLearningAgent::new(mouse_world(), &mouse_config().with_seed(seed)).expect("valid agent")
}

#[test]
fn test_invalid_actions_are_never_updated() {
    let config = mouse_config().with_seed(2024).with_q_init(3.5);
    let mut agent = QLearningAgent::new(mouse_world(), &config).unwrap();
    agent.train(3000, 50).unwrap();

    let world = mouse_world();
    let dynamics = Dynamics::new(&world);
    for state in world.states() {
        for action in Action::ALL {
            if !dynamics.is_valid(state, action) {
                assert_eq!(
                    agent.q_table().get(state, action).unwrap(),
                    3.5,
                    "{action} from {state} should be untouched"
                );
            }
        }
    }
}

#[test]
fn test_rewards_come_from_entered_cell() {
    let recorder = RecordingObserver::default();
    let mut agent = seeded_agent(17).with_observer(Box::new(recorder.clone()));
    agent.train(500, 40).unwrap();

    let world = mouse_world();
    let records = recorder.records.lock().unwrap();
    assert_eq!(records.len(), 501);
    for record in records.iter() {
        assert_eq!(record.reward, world.reward_at(record.next_state).unwrap());
    }
    // Each step starts where the previous one ended.
    for pair in records.windows(2) {
        assert_eq!(pair[0].next_state, pair[1].state);
    }
}

#[test]
fn test_observers_see_every_step() {
    init_tracing();
    let metrics = MetricsObserver::new();
    let mut agent = seeded_agent(3)
        .with_observer(Box::new(TracingObserver::new()))
        .with_observer(Box::new(metrics.clone()));

    let summary = agent.train(100, 30).unwrap();
    let snapshot = metrics.metrics();

    assert_eq!(snapshot.runs, 1);
    assert_eq!(snapshot.steps, 101);
    assert_eq!(snapshot.explored_steps, summary.explored_steps);
    assert!(approx_eq_tol(snapshot.total_reward, summary.total_reward, 1e-9));
    assert_eq!(snapshot.visits.values().sum::<usize>(), 101);
}

#[test]
fn test_zero_rng_walk_is_deterministic() {
    let metrics = MetricsObserver::new();
    let mut agent = QLearningAgent::with_rng(mouse_world(), &mouse_config(), ZeroRng)
        .unwrap()
        .with_observer(Box::new(metrics.clone()));

    // First valid action from (0,0) is Down, from (1,0) it is Up.
    let summary = agent.train(3, 100).unwrap();

    assert_eq!(summary.steps, 4);
    assert_eq!(summary.explored_steps, 4);
    assert_eq!(agent.position(), State::new(0, 0));
    let snapshot = metrics.metrics();
    assert_eq!(snapshot.visits[&State::new(1, 0)], 2);
    assert_eq!(snapshot.visits[&State::new(0, 0)], 2);
}

#[test]
fn test_long_exploration_learns_optimal_values() {
    let mut agent = seeded_agent(99);
    agent.train(20_000, 100).unwrap();

    // Cookie loop values: V(cookie) = 52 / 0.75, entering the cookie is worth
    // 100 + γ·V(cookie).
    let cookie = 52.0 / 0.75;
    let enter_cookie = 100.0 + 0.5 * cookie;
    let q = agent.q_table();
    assert!(approx_eq_tol(
        q.get(State::new(2, 1), Action::Right).unwrap(),
        enter_cookie,
        1e-3
    ));
    assert!(approx_eq_tol(
        q.get(State::new(1, 2), Action::Down).unwrap(),
        enter_cookie,
        1e-3
    ));

    let policy = agent.policy().unwrap();
    assert_eq!(policy.action(State::new(2, 1)), Some(Action::Right));
    assert_eq!(policy.action(State::new(1, 2)), Some(Action::Down));
    assert_eq!(policy.action(State::new(3, 2)), Some(Action::Up));
    assert_eq!(policy.action(State::new(2, 3)), Some(Action::Left));
    assert_eq!(policy.action(State::new(2, 0)), Some(Action::Right));
}

#[test]
fn test_planner_solve_trains_then_reads_policy() {
    let mut agent = seeded_agent(5).with_solve_schedule(5_000, 100);
    let policy = agent.solve().unwrap();

    assert_eq!(agent.name(), "Q-Learning");
    assert_eq!(agent.steps_taken(), 5_001);
    assert_eq!(policy, agent.policy().unwrap());

    let world = mouse_world();
    let dynamics = Dynamics::new(&world);
    for (state, action) in policy.iter() {
        assert!(dynamics.is_valid(state, action));
    }
}

#[test]
fn test_set_cell_through_agent() {
    let mut agent = seeded_agent(1);
    agent
        .set_cell(3, 3, mouse_mdp::CellType::Cookie)
        .unwrap();
    assert_eq!(
        agent.world().reward_at(State::new(3, 3)).unwrap(),
        100.0
    );
    assert!(agent.set_cell(4, 0, mouse_mdp::CellType::Cookie).is_err());
}
