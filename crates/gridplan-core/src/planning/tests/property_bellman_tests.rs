use proptest::prelude::*;

use crate::{
    ActionId, PlanningModel, SolverConfig, ValueIteration, ValueMap, expected_value,
    extract_policy,
};

use super::ChainModel;

fn sup_distance(a: &ValueMap, b: &ValueMap) -> f64 {
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

proptest! {
    #[test]
    fn bellman_backup_contracts_by_the_discount(
        u in proptest::collection::vec(-10.0f64..10.0, 6),
        v in proptest::collection::vec(-10.0f64..10.0, 6),
    ) {
        let model = ChainModel::new(6, 1.0, -0.04, 0.9, 0.2);
        let solver = ValueIteration::new(&model, SolverConfig::default());
        let u = ValueMap::from(u);
        let v = ValueMap::from(v);

        let tu = solver.sweep(&u).expect("sweep should succeed");
        let tv = solver.sweep(&v).expect("sweep should succeed");

        prop_assert!(sup_distance(&tu, &tv) <= 0.9 * sup_distance(&u, &v) + 1e-9);
    }

    #[test]
    fn extracted_action_attains_the_maximum(
        values in proptest::collection::vec(-10.0f64..10.0, 6),
    ) {
        let model = ChainModel::new(6, 1.0, -0.04, 0.9, 0.2);
        let values = ValueMap::from(values);

        let policy = extract_policy(&model, &values).expect("extraction should succeed");

        for (state, chosen) in policy.iter() {
            let best = expected_value(&model, state, chosen, &values);
            for idx in 0..model.num_actions(state) {
                let other = expected_value(&model, state, ActionId::from(idx), &values);
                prop_assert!(best >= other);
                if idx < chosen.index() {
                    prop_assert!(other < best);
                }
            }
        }
    }
}
