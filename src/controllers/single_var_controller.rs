use std::rc::Rc;

use crate::{
    errors::Result,
    library::{ConfigValue, CostEstimator},
    train_log::{self, TrainLog},
};

use super::{shuffle_with_seed, AutomlController, SearchDimension};

pub struct SingleVarSearchController<D> {
    base_config: ConfigValue,
    cost_estimator: Rc<dyn CostEstimator<D>>,
    dataset: Rc<D>,
    search_dim: SearchDimension,
    random_seed: Option<u64>,
}

impl<D> SingleVarSearchController<D> {
    pub fn new(
        base_config: ConfigValue,
        cost_estimator: Rc<dyn CostEstimator<D>>,
        dataset: Rc<D>,
        search_dim: SearchDimension,
    ) -> Self {
        Self {
            base_config,
            cost_estimator,
            dataset,
            search_dim,
            random_seed: None,
        }
    }

    pub fn with_random_seed(mut self, random_seed: u64) -> Self {
        self.random_seed = Some(random_seed);
        self
    }

    pub fn search_dim(&self) -> &SearchDimension {
        &self.search_dim
    }

    /// History entries that differ from the base config in this controller's variable at most.
    pub fn keep_history_varied_from_base_config<'a>(
        &self,
        history: &'a [TrainLog],
    ) -> Result<Vec<&'a TrainLog>> {
        if history.is_empty() {
            return Ok(Vec::new());
        }

        let var_accessor = self.search_dim.var_accessor();
        let base_val = var_accessor.parse_value(&self.base_config)?;
        let mut result = Vec::new();
        for log in history {
            if var_accessor.assign_val_to_config(log.config(), &base_val)? == self.base_config {
                result.push(log);
            }
        }
        Ok(result)
    }
}

impl<D> AutomlController for SingleVarSearchController<D> {
    fn generate_training_configs(
        &mut self,
        budget: f64,
        history: &[TrainLog],
        n_trials: usize,
    ) -> Result<Vec<ConfigValue>> {
        let search_dim = &self.search_dim;
        let worth_trying = match search_dim.pruner() {
            Some(pruner) => {
                pruner.prune(&self.base_config, search_dim.candidates_order(), history)?
            }
            None => search_dim.candidates().to_vec(),
        };
        let mut candidate_configs = search_dim
            .candidates()
            .iter()
            .filter(|c| worth_trying.contains(c))
            .map(|c| search_dim.var_accessor().assign_val_to_config(&self.base_config, c))
            .collect::<Result<Vec<_>>>()?;
        let partial_history = self.keep_history_varied_from_base_config(history)?;

        shuffle_with_seed(&mut candidate_configs, self.random_seed);

        let mut used_budget = 0.;
        let mut result = Vec::new();
        for candidate_config in candidate_configs {
            if result.len() >= n_trials {
                break;
            }

            if partial_history
                .iter()
                .any(|log| log.config() == &candidate_config)
            {
                log::trace!("{} already tried", candidate_config);
                continue;
            }

            let cost = self.cost_estimator.estimate(&candidate_config, &self.dataset);
            if cost > budget - used_budget {
                log::trace!(
                    "{} costs {} with {} budget left",
                    candidate_config,
                    cost,
                    budget - used_budget
                );
                continue;
            }

            used_budget += cost;
            result.push(candidate_config);
        }

        log::debug!(
            "Generated {}/{} configs, using {}/{} budget",
            result.len(),
            n_trials,
            used_budget,
            budget
        );
        Ok(result)
    }

    fn find_best_config(&self, history: &[TrainLog]) -> Result<Option<ConfigValue>> {
        let history = self.keep_history_varied_from_base_config(history)?;
        Ok(train_log::find_best_config(history))
    }

    fn set_base_config(&mut self, config: &ConfigValue) -> Result<()> {
        self.base_config = config.clone();
        Ok(())
    }

    fn base_config(&self) -> &ConfigValue {
        &self.base_config
    }
}
