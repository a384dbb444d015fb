//! Fixtures shared by the unit tests: a two-variable config and helpers around it.

use std::rc::Rc;

use serde_json::json;

use crate::library::{ConfigValue, CostEstimator, PathAccessor};
use crate::train_log::TrainLog;

pub(crate) fn fake_config(var_1: i64, var_2: i64) -> ConfigValue {
    ConfigValue::from(json!({ "var_1": var_1, "var_2": var_2 }))
}

pub(crate) fn var_1() -> PathAccessor {
    PathAccessor::new("var_1")
}

pub(crate) fn var_2() -> PathAccessor {
    PathAccessor::new("var_2")
}

pub(crate) fn values(values: &[i64]) -> Vec<ConfigValue> {
    values.iter().map(|v| ConfigValue::from(*v)).collect()
}

pub(crate) fn train_log(config: ConfigValue, metric: f64) -> TrainLog {
    TrainLog::new(
        config,
        [("automl_metric_val".to_string(), metric)].into_iter().collect(),
        None,
    )
    .unwrap()
}

/// History over `var_1` only, with `var_2` fixed to 1.
pub(crate) fn one_dim_history(entries: &[(i64, f64)]) -> Vec<TrainLog> {
    entries
        .iter()
        .map(|(v, metric)| train_log(fake_config(*v, 1), *metric))
        .collect()
}

pub(crate) fn two_dim_history(entries: &[(i64, i64, f64)]) -> Vec<TrainLog> {
    entries
        .iter()
        .map(|(v1, v2, metric)| train_log(fake_config(*v1, *v2), *metric))
        .collect()
}

pub(crate) const ONE_DIM_HISTORY: [&[(i64, f64)]; 7] = [
    &[(2, 1.), (3, 2.)],
    &[(1, 1.), (3, 2.)],
    &[(1, 3.), (3, 2.)],
    &[(1, 3.), (2, 2.)],
    &[(1, 3.), (5, 6.)],
    &[(2, 3.), (3, 6.), (4, 5.)],
    &[],
];

pub(crate) const TWO_DIM_HISTORY: [&[(i64, i64, f64)]; 9] = [
    &[(2, 1, 1.), (3, 2, 2.)],
    &[(1, 1, 1.), (1, 3, 2.)],
    &[(1, 1, 3.), (1, 2, 2.)],
    &[(1, 1, 3.), (2, 1, 2.), (1, 2, 2.)],
    &[(3, 4, 3.), (4, 3, 3.), (4, 4, 6.)],
    &[(2, 1, 3.), (3, 1, 6.), (4, 2, 5.)],
    &[],
    &[(1, 1, 3.), (2, 1, 3.5), (3, 1, 2.), (4, 1, 1.)],
    &[(1, 1, 3.), (2, 1, 3.5), (3, 1, 2.), (2, 2, 3.)],
];

pub(crate) fn zero_cost() -> Rc<dyn CostEstimator<()>> {
    Rc::new(|_: &ConfigValue, _: &()| 0.)
}

/// Cost is the value of `var_1`, so budgets can be checked by hand.
pub(crate) fn var_1_cost() -> Rc<dyn CostEstimator<()>> {
    Rc::new(|config: &ConfigValue, _: &()| {
        match config.as_map().and_then(|map| map.get("var_1")) {
            Some(ConfigValue::Integer(v)) => *v as f64,
            _ => 0.,
        }
    })
}

pub(crate) fn configs_1d(expected: &[i64]) -> Vec<ConfigValue> {
    expected.iter().map(|v| fake_config(*v, 1)).collect()
}

pub(crate) fn configs_2d(expected: &[(i64, i64)]) -> Vec<ConfigValue> {
    expected.iter().map(|(v1, v2)| fake_config(*v1, *v2)).collect()
}
