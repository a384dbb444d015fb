use std::rc::Rc;

use crate::{
    errors::Result,
    library::{ConfigValue, CostEstimator},
    train_log::TrainLog,
};

use super::{
    shuffle_with_seed, single_var_controller::SingleVarSearchController, AutomlController,
    SearchDimension,
};

/// Grid search over several variables of the config.
///
/// Configs are enumerated as the cartesian product of the dimensions' candidates, in
/// dimension order. Budget, history and pruners are only checked once a config is fully
/// assembled, and every dimension's pruner gets a say on it. Generation stops once
/// `n_trials` configs are collected or no more configs are worth trying.
pub struct GridSearchController<D> {
    base_config: ConfigValue,
    cost_estimator: Rc<dyn CostEstimator<D>>,
    dataset: Rc<D>,
    search_dims: Vec<SearchDimension>,
    random_seed: Option<u64>,
}

impl<D> GridSearchController<D> {
    pub fn new(
        base_config: ConfigValue,
        cost_estimator: Rc<dyn CostEstimator<D>>,
        dataset: Rc<D>,
        search_dims: Vec<SearchDimension>,
    ) -> Self {
        Self {
            base_config,
            cost_estimator,
            dataset,
            search_dims,
            random_seed: None,
        }
    }

    pub fn from_single_var_controllers(
        base_config: ConfigValue,
        cost_estimator: Rc<dyn CostEstimator<D>>,
        dataset: Rc<D>,
        single_var_controllers: &[SingleVarSearchController<D>],
    ) -> Self {
        let search_dims = single_var_controllers
            .iter()
            .map(|c| c.search_dim().clone())
            .collect();
        Self::new(base_config, cost_estimator, dataset, search_dims)
    }

    /// Shuffles the candidates of the last dimension; outer dimensions keep their order.
    pub fn with_random_seed(mut self, random_seed: u64) -> Self {
        self.random_seed = Some(random_seed);
        self
    }

    pub fn search_dims(&self) -> &[SearchDimension] {
        &self.search_dims
    }

    fn grid_search_configs(
        &self,
        c_idx: usize,
        base_config: &ConfigValue,
        mut result: Vec<ConfigValue>,
        budget: f64,
        n_trials: usize,
        history: &[TrainLog],
    ) -> Result<Vec<ConfigValue>> {
        if result.len() >= n_trials || c_idx == self.search_dims.len() || budget <= 0. {
            return Ok(result);
        }

        let search_dim = &self.search_dims[c_idx];
        if c_idx == self.search_dims.len() - 1 {
            let mut used_budget: f64 = result
                .iter()
                .map(|config| self.cost_estimator.estimate(config, &self.dataset))
                .sum();
            let mut candidate_configs = search_dim.candidate_configs(base_config)?;

            shuffle_with_seed(&mut candidate_configs, self.random_seed);

            for candidate_config in candidate_configs {
                if result.len() >= n_trials {
                    break;
                }

                if history.iter().any(|log| log.config() == &candidate_config) {
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

                if !self.is_valuable_in_all_dims(&candidate_config, history)? {
                    continue;
                }

                used_budget += cost;
                result.push(candidate_config);
            }
        } else {
            for candidate in search_dim.candidates() {
                let config = search_dim
                    .var_accessor()
                    .assign_val_to_config(base_config, candidate)?;
                result =
                    self.grid_search_configs(c_idx + 1, &config, result, budget, n_trials, history)?;
            }
        }

        Ok(result)
    }

    fn is_valuable_in_all_dims(&self, config: &ConfigValue, history: &[TrainLog]) -> Result<bool> {
        for search_dim in &self.search_dims {
            if let Some(pruner) = search_dim.pruner() {
                let candidate = search_dim.var_accessor().parse_value(config)?;
                if !pruner.is_valuable(config, &candidate, search_dim.candidates(), history)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

impl<D> AutomlController for GridSearchController<D> {
    fn generate_training_configs(
        &mut self,
        budget: f64,
        history: &[TrainLog],
        n_trials: usize,
    ) -> Result<Vec<ConfigValue>> {
        let result =
            self.grid_search_configs(0, &self.base_config, Vec::new(), budget, n_trials, history)?;
        log::debug!(
            "Grid search over {} dimensions generated {}/{} configs",
            self.search_dims.len(),
            result.len(),
            n_trials
        );
        Ok(result)
    }

    fn set_base_config(&mut self, config: &ConfigValue) -> Result<()> {
        self.base_config = config.clone();
        Ok(())
    }

    fn base_config(&self) -> &ConfigValue {
        &self.base_config
    }
}
