use std::rc::Rc;

use crate::errors::{Error, Result};
use crate::library::{ConfigAccessor, ConfigValue};
use crate::train_log::TrainLog;

pub trait CandidatePruner {
    fn prune(
        &self,
        base_config: &ConfigValue,
        candidates_in_order: &[ConfigValue],
        history: &[TrainLog],
    ) -> Result<Vec<ConfigValue>> {
        let mut result = Vec::new();
        for candidate in candidates_in_order {
            if self.is_valuable(base_config, candidate, candidates_in_order, history)? {
                result.push(candidate.clone());
            }
        }
        Ok(result)
    }

    fn is_valuable(
        &self,
        base_config: &ConfigValue,
        candidate: &ConfigValue,
        candidates: &[ConfigValue],
        history: &[TrainLog],
    ) -> Result<bool>;
}

/// Prunes under two assumptions:
/// 1. the candidates are given in monotonic order
/// 2. the metric over the candidates has a single peak, e.g. `[1, 2, 3, 2, 1]` is fine while
///    `[1, 2, 1, 2]` has two peaks
///
/// So with history `[c1: 1, c2: 2, c3: 3, c4: 2]` there is no need to try `c5`: `c3` already
/// beats `c4`, and the curve only goes down from there.
pub struct SinglePeakPruner {
    var_accessor: Rc<dyn ConfigAccessor>,
}

impl SinglePeakPruner {
    pub fn new(var_accessor: impl ConfigAccessor + 'static) -> Self {
        Self {
            var_accessor: Rc::new(var_accessor),
        }
    }

    /// Walks `candidate_configs` up to the candidate; fails as soon as the metric drops.
    fn worth_trying_one_side<'a>(
        candidate_config: &ConfigValue,
        candidate_configs: impl Iterator<Item = &'a ConfigValue>,
        history: &[TrainLog],
    ) -> Result<bool> {
        let mut highest_val: Option<f64> = None;
        for config in candidate_configs {
            if config == candidate_config {
                return Ok(true);
            }

            if let Some(metric_val) = Self::try_find_metric_val_for_config(config, history) {
                if highest_val.map_or(false, |highest| metric_val < highest) {
                    return Ok(false);
                }
                highest_val = Some(metric_val);
            }
        }

        Err(Error::CandidateNotInOrder {
            candidate: candidate_config.clone(),
        })
    }

    fn try_find_metric_val_for_config(config: &ConfigValue, history: &[TrainLog]) -> Option<f64> {
        history
            .iter()
            .find(|log| log.config() == config)
            .map(TrainLog::automl_metric_val)
    }
}

impl CandidatePruner for SinglePeakPruner {
    fn is_valuable(
        &self,
        base_config: &ConfigValue,
        candidate: &ConfigValue,
        candidates: &[ConfigValue],
        history: &[TrainLog],
    ) -> Result<bool> {
        let candidate_config = self.var_accessor.assign_val_to_config(base_config, candidate)?;
        let candidate_configs = candidates
            .iter()
            .map(|c| self.var_accessor.assign_val_to_config(base_config, c))
            .collect::<Result<Vec<_>>>()?;

        let valuable = Self::worth_trying_one_side(&candidate_config, candidate_configs.iter(), history)?
            && Self::worth_trying_one_side(&candidate_config, candidate_configs.iter().rev(), history)?;
        if !valuable {
            log::trace!("pruned candidate {}", candidate);
        }
        Ok(valuable)
    }
}
