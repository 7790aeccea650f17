use crate::planning::{
    error::PlanError,
    ids::{ActionId, StateKey},
    mappings::{PolicyMap, ValueMap},
    model::PlanningModel,
};

/// Aggregate L1 distance below which two value mappings count as converged.
pub const VALUE_TOLERANCE: f64 = 1e-4;

/// Expected successor value of taking `action` in `state` under `values`.
///
/// `values` must cover every state of `model`.
pub fn expected_value<M>(model: &M, state: StateKey, action: ActionId, values: &ValueMap) -> f64
where
    M: PlanningModel + ?Sized,
{
    model
        .outcomes(state, action)
        .iter()
        .map(|outcome| outcome.prob * values[outcome.next])
        .sum()
}

/// Return the action with the highest expected value in `state`, with that value.
///
/// Ties go to the first action in the state's action order.
pub fn greedy_action<M>(
    model: &M,
    state: StateKey,
    values: &ValueMap,
) -> Result<(ActionId, f64), PlanError>
where
    M: PlanningModel + ?Sized,
{
    let num_actions = model.num_actions(state);
    if num_actions == 0 {
        return Err(PlanError::NoActions { state });
    }

    let first = ActionId::from(0);
    let mut best = (first, expected_value(model, state, first, values));
    for idx in 1..num_actions {
        let action = ActionId::from(idx);
        let candidate = expected_value(model, state, action, values);
        if candidate > best.1 {
            best = (action, candidate);
        }
    }

    Ok(best)
}

/// Sum of absolute per-state differences between two mappings.
pub fn l1_distance(new_values: &ValueMap, old_values: &ValueMap) -> f64 {
    new_values
        .as_slice()
        .iter()
        .zip(old_values.as_slice())
        .map(|(new, old)| (new - old).abs())
        .sum()
}

/// Aggregate L1 convergence test against [`VALUE_TOLERANCE`].
///
/// Many tiny per-state changes can add up and fail this test even when no
/// single state moved by more than the tolerance.
pub fn values_converged(new_values: &ValueMap, old_values: &ValueMap) -> bool {
    values_converged_within(new_values, old_values, VALUE_TOLERANCE)
}

/// Aggregate L1 convergence test against a caller-chosen tolerance.
pub fn values_converged_within(
    new_values: &ValueMap,
    old_values: &ValueMap,
    tolerance: f64,
) -> bool {
    new_values.len() == old_values.len() && l1_distance(new_values, old_values) < tolerance
}

/// True iff both policies choose the identical action in every state.
pub fn policy_converged(new_policy: &PolicyMap, old_policy: &PolicyMap) -> bool {
    new_policy == old_policy
}
