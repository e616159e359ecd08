//! Bellman backups over the deterministic grid model
//!
//! Every sweep here is synchronous: new values are computed from the
//! previous function only and written to a fresh buffer.

use crate::{
    Error, Result,
    gridworld::{Action, Dynamics, State},
    policy::{Policy, ValueFunction},
};

/// q(s, a) = r(s, a) + γ V(s')
pub fn action_value(
    dynamics: &Dynamics<'_>,
    values: &ValueFunction,
    state: State,
    action: Action,
    discount: f64,
) -> Result<f64> {
    let transition = dynamics.step(state, action)?;
    let next_value = values
        .get(transition.next_state)
        .ok_or(Error::DimensionMismatch {
            expected: dynamics.world().num_states(),
            got: values.as_slice().len(),
        })?;
    Ok(transition.reward + discount * next_value)
}

/// One Bellman optimality sweep.
///
/// V'(s) = max over valid a of q(s, a). Returns the new function and the
/// largest absolute change.
pub fn optimality_sweep(
    dynamics: &Dynamics<'_>,
    values: &ValueFunction,
    discount: f64,
) -> Result<(ValueFunction, f64)> {
    check_dimension(dynamics, values.as_slice().len())?;
    let world = dynamics.world();

    let mut next = Vec::with_capacity(world.num_states());
    for state in world.states() {
        let mut best: Option<f64> = None;
        for action in dynamics.valid_actions(state) {
            let q = action_value(dynamics, values, state, action, discount)?;
            best = Some(best.map_or(q, |b: f64| b.max(q)));
        }
        next.push(best.ok_or(Error::NoValidActions {
            row: state.row,
            col: state.col,
        })?);
    }

    let next = ValueFunction::from_values(world.dimension(), next);
    let delta = next.max_abs_diff(values);
    Ok((next, delta))
}

/// One policy evaluation sweep: V'(s) = q(s, π(s)).
pub fn evaluation_sweep(
    dynamics: &Dynamics<'_>,
    policy: &Policy,
    values: &ValueFunction,
    discount: f64,
) -> Result<(ValueFunction, f64)> {
    check_dimension(dynamics, values.as_slice().len())?;
    check_dimension(dynamics, policy.as_slice().len())?;
    let world = dynamics.world();

    let next = policy
        .iter()
        .map(|(state, action)| action_value(dynamics, values, state, action, discount))
        .collect::<Result<Vec<_>>>()?;

    let next = ValueFunction::from_values(world.dimension(), next);
    let delta = next.max_abs_diff(values);
    Ok((next, delta))
}

fn check_dimension(dynamics: &Dynamics<'_>, got: usize) -> Result<()> {
    let expected = dynamics.world().num_states();
    if got != expected {
        return Err(Error::DimensionMismatch { expected, got });
    }
    Ok(())
}
