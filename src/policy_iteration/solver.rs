//! Policy iteration solver

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::bellman::{action_value, evaluation_sweep, optimality_sweep};
use crate::{
    Error, Result,
    config::SolverConfig,
    gridworld::{Dynamics, GridWorld},
    policy::{Policy, ValueFunction},
    ports::Planner,
};

/// An action must beat the incumbent by more than this to replace it during
/// greedy extraction, so floating-point noise cannot flip ties.
pub const TIE_TOLERANCE: f64 = 1e-9;

/// Outcome of a value iteration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueIterationReport {
    pub values: ValueFunction,
    /// Sweeps performed
    pub sweeps: usize,
    /// Whether the last change fell below the threshold before the cap
    pub converged: bool,
    /// Largest per-state change in the final sweep
    pub final_delta: f64,
}

/// Outcome of a policy iteration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyIterationReport {
    pub policy: Policy,
    /// Value function the final policy was extracted from
    pub values: ValueFunction,
    /// Outer iterations performed
    pub iterations: usize,
    /// Whether the policy reached a fixed point before the cap
    pub stable: bool,
}

/// Model-based solver: value iteration, greedy extraction, and policy
/// iteration to a fixed point.
///
/// The solver has no agent position. It sweeps every state of the grid
/// through [`Dynamics`] and owns the value function of its latest run.
#[derive(Debug, Clone)]
pub struct PolicyIterationSolver {
    world: GridWorld,
    discount: f64,
    convergence_threshold: f64,
    max_sweeps: usize,
    max_policy_iterations: usize,
    values: Option<ValueFunction>,
    policy: Option<Policy>,
}

impl PolicyIterationSolver {
    /// Create a solver for `world`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the config is invalid or
    /// its grid dimension differs from the world's.
    pub fn new(world: GridWorld, config: &SolverConfig) -> Result<Self> {
        config.validate()?;
        if config.grid_dimension != world.dimension() {
            return Err(Error::configuration(format!(
                "config grid dimension {} does not match world dimension {}",
                config.grid_dimension,
                world.dimension()
            )));
        }

        Ok(Self {
            world,
            discount: config.discount,
            convergence_threshold: config.convergence_threshold,
            max_sweeps: config.max_sweeps,
            max_policy_iterations: config.max_policy_iterations,
            values: None,
            policy: None,
        })
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    /// Policy from the latest [`policy_iterate`](Self::policy_iterate) run.
    pub fn policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }

    /// Value function from the latest run.
    pub fn values(&self) -> Option<&ValueFunction> {
        self.values.as_ref()
    }

    /// One synchronous Bellman optimality sweep over every state.
    pub fn sweep(&self, values: &ValueFunction) -> Result<(ValueFunction, f64)> {
        optimality_sweep(&Dynamics::new(&self.world), values, self.discount)
    }

    /// Value iteration from an all-zero function.
    ///
    /// Stops when the largest change in a sweep drops below the convergence
    /// threshold, or after `max_sweeps` sweeps.
    #[tracing::instrument(level = "debug", skip(self), fields(dimension = self.world.dimension()))]
    pub fn value_iteration(&self) -> Result<ValueIterationReport> {
        let mut values = ValueFunction::zeros(self.world.dimension());
        let mut sweeps = 0;
        let mut delta = f64::INFINITY;

        while sweeps < self.max_sweeps {
            let (next, change) = self.sweep(&values)?;
            values = next;
            delta = change;
            sweeps += 1;
            if delta < self.convergence_threshold {
                break;
            }
        }

        let converged = delta < self.convergence_threshold;
        if converged {
            debug!(sweeps, delta, "value iteration converged");
        } else {
            warn!(
                sweeps,
                delta,
                threshold = self.convergence_threshold,
                "value iteration hit the sweep cap before converging"
            );
        }

        Ok(ValueIterationReport {
            values,
            sweeps,
            converged,
            final_delta: delta,
        })
    }

    /// Iterative evaluation of a fixed policy, from an all-zero function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] if the policy moves off the grid
    /// anywhere and [`Error::DimensionMismatch`] if it covers a different
    /// number of states.
    pub fn evaluate_policy(&self, policy: &Policy) -> Result<ValueFunction> {
        let dynamics = Dynamics::new(&self.world);
        let mut values = ValueFunction::zeros(self.world.dimension());

        for sweep in 1..=self.max_sweeps {
            let (next, delta) = evaluation_sweep(&dynamics, policy, &values, self.discount)?;
            values = next;
            if delta < self.convergence_threshold {
                debug!(sweeps = sweep, delta, "policy evaluation converged");
                return Ok(values);
            }
        }

        warn!(
            sweeps = self.max_sweeps,
            "policy evaluation hit the sweep cap before converging"
        );
        Ok(values)
    }

    /// Greedy policy with respect to `values`.
    ///
    /// Each state starts from its first valid action with a threshold of
    /// zero; only an action whose value exceeds the incumbent by more than
    /// [`TIE_TOLERANCE`] replaces it. States where nothing beats zero keep
    /// the default.
    pub fn extract_policy(&self, values: &ValueFunction) -> Result<Policy> {
        let dynamics = Dynamics::new(&self.world);
        let mut actions = Vec::with_capacity(self.world.num_states());

        for state in self.world.states() {
            let valid = dynamics.valid_actions(state);
            let default = *valid.first().ok_or(Error::NoValidActions {
                row: state.row,
                col: state.col,
            })?;

            let mut best_action = default;
            let mut best_value = 0.0;
            for action in valid {
                let q = action_value(&dynamics, values, state, action, self.discount)?;
                if q > best_value + TIE_TOLERANCE {
                    best_value = q;
                    best_action = action;
                }
            }
            actions.push(best_action);
        }

        Policy::new(self.world.dimension(), actions)
    }

    /// Policy iteration.
    ///
    /// The first round extracts a greedy policy from the converged value
    /// iteration result. Each later round evaluates the adopted policy and
    /// extracts a new greedy policy from that evaluation. The run stops as
    /// soon as a round reproduces the previous policy, or after
    /// `max_policy_iterations` rounds.
    #[tracing::instrument(level = "debug", skip(self), fields(dimension = self.world.dimension()))]
    pub fn policy_iterate(&mut self) -> Result<PolicyIterationReport> {
        let mut current: Option<Policy> = None;
        let mut values = ValueFunction::zeros(self.world.dimension());
        let mut iterations = 0;
        let mut stable = false;

        while iterations < self.max_policy_iterations {
            iterations += 1;
            values = match &current {
                None => self.value_iteration()?.values,
                Some(policy) => self.evaluate_policy(policy)?,
            };
            let candidate = self.extract_policy(&values)?;

            if let Some(previous) = &current {
                let changed = previous.differences(&candidate);
                debug!(iteration = iterations, changed, "policy improvement round");
                if changed == 0 {
                    stable = true;
                    break;
                }
            }
            current = Some(candidate);
        }

        let policy = current.ok_or_else(|| Error::configuration("no policy iteration rounds ran"))?;
        if stable {
            info!(iterations, "policy iteration reached a fixed point");
        } else {
            warn!(
                iterations,
                "policy iteration hit the iteration cap without a fixed point"
            );
        }

        self.values = Some(values.clone());
        self.policy = Some(policy.clone());

        Ok(PolicyIterationReport {
            policy,
            values,
            iterations,
            stable,
        })
    }
}

impl Planner for PolicyIterationSolver {
    fn solve(&mut self) -> Result<Policy> {
        Ok(self.policy_iterate()?.policy)
    }

    fn name(&self) -> &str {
        "Policy Iteration"
    }
}
