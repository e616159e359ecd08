//! Epsilon-greedy Q-learning agent
//!
//! The agent walks a single persistent position across the grid. Every step
//! picks an action, moves, and applies the Q-learning update keyed by the
//! pre-move state and bootstrapped from the post-move state. There are no
//! episodes: the walk never resets on its own.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Error, Result,
    config::SolverConfig,
    gridworld::{Action, CellType, Dynamics, GridWorld, State},
    policy::Policy,
    ports::{Planner, TrainingObserver},
    q_learning::q_table::QTable,
};

/// Steps used by [`Planner::solve`] unless overridden.
pub const DEFAULT_SOLVE_STEPS: usize = 1000;
/// Exploration percentage used by [`Planner::solve`] unless overridden.
pub const DEFAULT_SOLVE_EPSILON: u32 = 50;

/// One applied Q-learning update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Update number since the agent was created or reset
    pub step: usize,
    /// Position before the move; keys the update
    pub state: State,
    pub action: Action,
    /// Whether the action was drawn at random
    pub explored: bool,
    /// Position after the move; bootstraps the target
    pub next_state: State,
    pub reward: f64,
    pub q_before: f64,
    pub q_after: f64,
}

/// Result of one [`QLearningAgent::train`] call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Updates applied, bootstrap step included
    pub steps: usize,
    pub explored_steps: usize,
    pub total_reward: f64,
    pub final_position: State,
}

/// Choose uniformly from an explicit, ordered action list.
///
/// Returns `None` for an empty list. With a seeded `rng` the choice is
/// reproducible because the list order is fixed by the caller.
pub fn select_uniform<R: Rng + ?Sized>(actions: &[Action], rng: &mut R) -> Option<Action> {
    actions.choose(rng).copied()
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns Q* by always updating toward the maximum next-state value,
/// regardless of the action the exploration policy takes next.
pub struct QLearningAgent<R = StdRng> {
    world: GridWorld,
    q_table: QTable,
    position: State,
    start: State,
    rng: R,
    rng_seed: Option<u64>,
    steps_taken: usize,
    solve_steps: usize,
    solve_epsilon: u32,
    observers: Vec<Box<dyn TrainingObserver>>,
}

impl QLearningAgent<StdRng> {
    /// Create a new Q-learning agent on `world`
    ///
    /// The RNG is seeded from `config.seed` when present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the config is invalid or
    /// its grid dimension differs from the world's.
    pub fn new(world: GridWorld, config: &SolverConfig) -> Result<Self> {
        let mut agent = Self::with_rng(world, config, build_rng(config.seed))?;
        agent.rng_seed = config.seed;
        Ok(agent)
    }
}

impl<R: Rng> QLearningAgent<R> {
    /// Create an agent drawing random numbers from `rng`.
    pub fn with_rng(world: GridWorld, config: &SolverConfig, rng: R) -> Result<Self> {
        config.validate()?;
        if config.grid_dimension != world.dimension() {
            return Err(Error::configuration(format!(
                "config grid dimension {} does not match world dimension {}",
                config.grid_dimension,
                world.dimension()
            )));
        }
        let start = config.start();
        world.state(start.row, start.col)?;

        Ok(Self {
            q_table: QTable::new(
                world.dimension(),
                config.learning_rate,
                config.discount,
                config.q_init,
            ),
            world,
            position: start,
            start,
            rng,
            rng_seed: None,
            steps_taken: 0,
            solve_steps: DEFAULT_SOLVE_STEPS,
            solve_epsilon: DEFAULT_SOLVE_EPSILON,
            observers: Vec::new(),
        })
    }

    /// Attach a training observer.
    pub fn with_observer(mut self, observer: Box<dyn TrainingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Steps and exploration percentage used by [`Planner::solve`].
    pub fn with_solve_schedule(mut self, steps: usize, epsilon_percent: u32) -> Self {
        self.solve_steps = steps;
        self.solve_epsilon = epsilon_percent;
        self
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    /// Mutable access to the grid for setup.
    ///
    /// Changing cells after training has started leaves the learned values
    /// describing a different world.
    pub fn world_mut(&mut self) -> &mut GridWorld {
        &mut self.world
    }

    /// Set the food type of one cell.
    pub fn set_cell(&mut self, row: usize, col: usize, cell: CellType) -> Result<()> {
        self.world.set_cell(row, col, cell)
    }

    /// Current agent position.
    pub fn position(&self) -> State {
        self.position
    }

    /// Read-only view of the learned values.
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Total updates applied so far.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Greedy policy read off the Q-table.
    pub fn policy(&self) -> Result<Policy> {
        self.q_table.greedy_policy(&Dynamics::new(&self.world))
    }

    /// Train for `steps` epsilon-greedy steps after one random bootstrap step.
    ///
    /// `epsilon_percent` is the chance, out of 100, that a step explores.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `epsilon_percent` exceeds
    /// 100, and propagates any observer error.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn train(&mut self, steps: usize, epsilon_percent: u32) -> Result<TrainingSummary> {
        check_epsilon(epsilon_percent)?;

        for observer in &mut self.observers {
            observer.on_training_start(steps + 1)?;
        }

        let mut summary = TrainingSummary {
            steps: 0,
            explored_steps: 0,
            total_reward: 0.0,
            final_position: self.position,
        };

        let bootstrap = self.random_valid_action()?;
        let record = self.advance(bootstrap, true)?;
        summary.record(&record);

        for _ in 0..steps {
            let record = self.step(epsilon_percent)?;
            summary.record(&record);
        }

        info!(
            steps = summary.steps,
            explored = summary.explored_steps,
            total_reward = summary.total_reward,
            final_position = %summary.final_position,
            "Q-learning run finished"
        );

        for observer in &mut self.observers {
            observer.on_training_end(&summary)?;
        }

        Ok(summary)
    }

    /// Apply a single epsilon-greedy training step.
    pub fn step(&mut self, epsilon_percent: u32) -> Result<StepRecord> {
        check_epsilon(epsilon_percent)?;
        let explore = self.rng.random_range(0..100) < epsilon_percent;
        let action = if explore {
            self.random_valid_action()?
        } else {
            self.q_table
                .best_valid_action(self.position, &Dynamics::new(&self.world))?
        };
        self.advance(action, explore)
    }

    fn random_valid_action(&mut self) -> Result<Action> {
        let valid = Dynamics::new(&self.world).valid_actions(self.position);
        select_uniform(&valid, &mut self.rng).ok_or(Error::NoValidActions {
            row: self.position.row,
            col: self.position.col,
        })
    }

    fn advance(&mut self, action: Action, explored: bool) -> Result<StepRecord> {
        let dynamics = Dynamics::new(&self.world);
        let state = self.position;
        let transition = dynamics.step(state, action)?;

        let q_before = self.q_table.get(state, action)?;
        let q_after = self.q_table.q_learning_update(
            state,
            action,
            transition.reward,
            transition.next_state,
            &dynamics,
        )?;

        self.position = transition.next_state;
        self.steps_taken += 1;

        let record = StepRecord {
            step: self.steps_taken,
            state,
            action,
            explored,
            next_state: transition.next_state,
            reward: transition.reward,
            q_before,
            q_after,
        };
        for observer in &mut self.observers {
            observer.on_step(&record)?;
        }
        Ok(record)
    }
}

impl<R: Rng + SeedableRng> QLearningAgent<R> {
    /// Restore the initial Q-values and start position.
    ///
    /// A seeded agent also rewinds its RNG, so training replays exactly.
    pub fn reset(&mut self) {
        self.q_table.reset();
        self.position = self.start;
        self.steps_taken = 0;
        if let Some(seed) = self.rng_seed {
            self.rng = R::seed_from_u64(seed);
        }
    }
}

impl<R: Rng> Planner for QLearningAgent<R> {
    fn solve(&mut self) -> Result<Policy> {
        self.train(self.solve_steps, self.solve_epsilon)?;
        self.policy()
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}

impl TrainingSummary {
    fn record(&mut self, record: &StepRecord) {
        self.steps += 1;
        if record.explored {
            self.explored_steps += 1;
        }
        self.total_reward += record.reward;
        self.final_position = record.next_state;
    }
}

fn check_epsilon(epsilon_percent: u32) -> Result<()> {
    if epsilon_percent > 100 {
        return Err(Error::configuration(format!(
            "exploration percentage must be in 0..=100, got {epsilon_percent}"
        )));
    }
    Ok(())
}
