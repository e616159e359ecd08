//! Properties of the dynamics model and value iteration across grid sizes

mod common;

use common::{mouse_config, mouse_world};
use mouse_mdp::{
    Action, CellType, Dynamics, Error, GridWorld, PolicyIterationSolver, RewardTable,
    SolverConfig, State, ValueFunction,
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

fn random_world(dimension: usize, rewards: RewardTable, rng: &mut StdRng) -> GridWorld {
    let mut world = GridWorld::new(dimension, CellType::Empty, rewards).unwrap();
    for row in 0..dimension {
        for col in 0..dimension {
            if rng.random_bool(0.3) {
                let cell = *CellType::ALL.choose(rng).unwrap();
                world.set_cell(row, col, cell).unwrap();
            }
        }
    }
    world
}

#[test]
fn test_validity_matches_bounds_on_every_border() {
    for dimension in 2..=6 {
        let world = GridWorld::new(dimension, CellType::Empty, RewardTable::default()).unwrap();
        let dynamics = Dynamics::new(&world);
        let last = dimension - 1;

        for state in world.states() {
            assert_eq!(dynamics.is_valid(state, Action::Up), state.row > 0);
            assert_eq!(dynamics.is_valid(state, Action::Down), state.row < last);
            assert_eq!(dynamics.is_valid(state, Action::Left), state.col > 0);
            assert_eq!(dynamics.is_valid(state, Action::Right), state.col < last);
            assert!(!dynamics.valid_actions(state).is_empty());
        }
    }
}

#[test]
fn test_step_reward_uses_next_cell_everywhere() {
    let world = mouse_world();
    let dynamics = Dynamics::new(&world);

    for state in world.states() {
        for action in dynamics.valid_actions(state) {
            let transition = dynamics.step(state, action).unwrap();
            let entered = world.cell(transition.next_state).unwrap();
            assert_eq!(
                transition.reward,
                f64::from(world.rewards().reward(entered)),
                "{action} from {state}"
            );
        }
    }
}

#[test]
fn test_sweeps_are_monotone_non_decreasing() {
    let solver = PolicyIterationSolver::new(mouse_world(), &mouse_config()).unwrap();
    let mut values = ValueFunction::zeros(4);

    for sweep in 0..60 {
        let (next, _) = solver.sweep(&values).unwrap();
        for (before, after) in values.as_slice().iter().zip(next.as_slice()) {
            assert!(after >= before, "sweep {sweep} decreased {before} to {after}");
        }
        values = next;
    }
}

#[test]
fn test_value_iteration_converges_up_to_ten_by_ten() {
    let mut rng = StdRng::seed_from_u64(31);

    for dimension in 2..=10 {
        let world = random_world(dimension, RewardTable::default(), &mut rng);
        let config = SolverConfig::default().with_grid_dimension(dimension);
        let report = PolicyIterationSolver::new(world, &config)
            .unwrap()
            .value_iteration()
            .unwrap();

        assert!(report.converged, "{dimension}x{dimension} did not converge");
        assert!(report.sweeps < config.max_sweeps);
        assert!(report.final_delta < config.convergence_threshold);
    }
}

#[test]
fn test_policy_iteration_is_stable_on_random_grids() {
    let mut rng = StdRng::seed_from_u64(8);

    for dimension in 2..=8 {
        let world = random_world(dimension, RewardTable::default(), &mut rng);
        let config = SolverConfig::default().with_grid_dimension(dimension);
        let mut solver = PolicyIterationSolver::new(world, &config).unwrap();
        let report = solver.policy_iterate().unwrap();
        assert!(report.stable, "{dimension}x{dimension} did not stabilise");

        let induced = solver.evaluate_policy(&report.policy).unwrap();
        assert_eq!(solver.extract_policy(&induced).unwrap(), report.policy);
    }
}

#[test]
fn test_out_of_range_cells_are_rejected() {
    let mut world = mouse_world();
    assert!(matches!(
        world.set_cell(0, 4, CellType::Cheese),
        Err(Error::CellOutOfBounds {
            row: 0,
            col: 4,
            dimension: 4
        })
    ));
    assert!(matches!(
        world.cell(State::new(7, 7)),
        Err(Error::CellOutOfBounds { .. })
    ));
}

#[test]
fn test_config_from_json_builds_matching_world() {
    let json = r#"{
        "grid_dimension": 5,
        "discount": 0.9,
        "rewards": {"Cheese": 3, "Cookie": 50, "Salad": -5, "No food": 0}
    }"#;
    let config = SolverConfig::from_json_str(json).unwrap();
    let mut world = GridWorld::from_config(&config).unwrap();
    world.set_cell(4, 4, CellType::Salad).unwrap();

    assert_eq!(world.dimension(), 5);
    assert_eq!(world.reward_at(State::new(4, 4)).unwrap(), -5.0);
    assert!(PolicyIterationSolver::new(world, &config).is_ok());
}
