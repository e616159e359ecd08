//! Deterministic transition and reward model

use serde::{Deserialize, Serialize};

use super::{Action, GridWorld, State};
use crate::{Error, Result};

/// Outcome of applying a valid action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub next_state: State,
    /// Reward of the cell entered, i.e. the cell at `next_state`.
    pub reward: f64,
}

/// Transition model over a [`GridWorld`].
///
/// Dynamics is a stateless view: every method is a pure function of the
/// grid, the state and the action. Moves that would leave the grid are
/// invalid and excluded from consideration rather than clamped.
#[derive(Debug, Clone, Copy)]
pub struct Dynamics<'w> {
    world: &'w GridWorld,
}

impl<'w> Dynamics<'w> {
    pub fn new(world: &'w GridWorld) -> Self {
        Self { world }
    }

    pub fn world(&self) -> &'w GridWorld {
        self.world
    }

    /// Position reached by `action`, or `None` if it leaves the grid.
    ///
    /// Never mutates `state`; the input is taken by value.
    pub fn apply(&self, state: State, action: Action) -> Option<State> {
        let (d_row, d_col) = action.delta();
        let row = state.row.checked_add_signed(d_row)?;
        let col = state.col.checked_add_signed(d_col)?;
        self.world
            .contains(row, col)
            .then_some(State::new(row, col))
    }

    /// Whether `action` keeps the agent on the grid.
    pub fn is_valid(&self, state: State, action: Action) -> bool {
        self.apply(state, action).is_some()
    }

    /// Actions valid from `state`, in priority order.
    pub fn valid_actions(&self, state: State) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&action| self.is_valid(state, action))
            .collect()
    }

    /// Apply `action` to `state`.
    ///
    /// The reward is looked up at the *next* position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] if the move leaves the grid and
    /// [`Error::CellOutOfBounds`] if `state` itself is off the grid.
    pub fn step(&self, state: State, action: Action) -> Result<Transition> {
        self.world.state(state.row, state.col)?;
        let next_state = self.apply(state, action).ok_or(Error::InvalidAction {
            row: state.row,
            col: state.col,
            action,
        })?;
        let reward = self.world.reward_at(next_state)?;

        Ok(Transition { next_state, reward })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gridworld::{CellType, RewardTable};

    fn world() -> GridWorld {
        let mut world = GridWorld::new(3, CellType::Empty, RewardTable::default()).unwrap();
        world.set_cell(0, 0, CellType::Salad).unwrap();
        world.set_cell(1, 1, CellType::Cookie).unwrap();
        world
    }

    #[test]
    fn test_is_valid_matches_bounds_everywhere() {
        let world = world();
        let dynamics = Dynamics::new(&world);
        let n = world.dimension() as isize;

        for state in world.states() {
            for action in Action::ALL {
                let (d_row, d_col) = action.delta();
                let row = state.row as isize + d_row;
                let col = state.col as isize + d_col;
                let leaves = row < 0 || row >= n || col < 0 || col >= n;
                assert_eq!(
                    dynamics.is_valid(state, action),
                    !leaves,
                    "{action} from {state}"
                );
            }
        }
    }

    #[test]
    fn test_corner_has_two_valid_actions() {
        let world = world();
        let dynamics = Dynamics::new(&world);

        assert_eq!(
            dynamics.valid_actions(State::new(0, 0)),
            vec![Action::Down, Action::Right]
        );
        assert_eq!(
            dynamics.valid_actions(State::new(2, 2)),
            vec![Action::Up, Action::Left]
        );
        assert_eq!(dynamics.valid_actions(State::new(1, 1)), Action::ALL.to_vec());
    }

    #[test]
    fn test_step_rewards_the_entered_cell() {
        let world = world();
        let dynamics = Dynamics::new(&world);

        // Leaving the salad cell into the cookie row must not cost the salad penalty.
        let transition = dynamics.step(State::new(0, 0), Action::Right).unwrap();
        assert_eq!(transition.next_state, State::new(0, 1));
        assert_eq!(transition.reward, 0.0);

        let transition = dynamics.step(State::new(0, 1), Action::Down).unwrap();
        assert_eq!(transition.next_state, State::new(1, 1));
        assert_eq!(transition.reward, 100.0);

        let transition = dynamics.step(State::new(1, 0), Action::Up).unwrap();
        assert_eq!(transition.next_state, State::new(0, 0));
        assert_eq!(transition.reward, -2.0);
    }

    #[test]
    fn test_step_reports_invalid_action() {
        let world = world();
        let dynamics = Dynamics::new(&world);

        let err = dynamics.step(State::new(0, 2), Action::Up).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAction {
                row: 0,
                col: 2,
                action: Action::Up
            }
        ));
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let world = world();
        let dynamics = Dynamics::new(&world);
        let state = State::new(1, 2);

        assert_eq!(dynamics.apply(state, Action::Right), None);
        assert_eq!(dynamics.apply(state, Action::Left), Some(State::new(1, 1)));
        assert_eq!(state, State::new(1, 2));
    }
}
