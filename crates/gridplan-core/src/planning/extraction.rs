use crate::planning::{
    bellman::greedy_action,
    error::PlanError,
    mappings::{PolicyMap, ValueMap, ensure_covers},
    model::PlanningModel,
};

/// Derive the greedy policy of a value mapping.
///
/// Reward and discount are constant per state, so ranking actions by expected
/// successor value alone gives the same argmax as a full backup.
pub fn extract_policy<M>(model: &M, values: &ValueMap) -> Result<PolicyMap, PlanError>
where
    M: PlanningModel + ?Sized,
{
    ensure_covers(model, values.len())?;

    let actions = model
        .state_keys()
        .map(|state| greedy_action(model, state, values).map(|(action, _)| action))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PolicyMap::from(actions))
}
