use crate::{errors::Result, library::ConfigValue, train_log::TrainLog};

use super::AutomlController;

/// Searches variables one stage at a time, in priority order.
///
/// - the first stage searches around the base config
/// - stage n searches around the best config found by stage n - 1
///
/// A stage that still has configs to try ends the round, even with fewer than `n_trials`
/// configs: later stages only run once every earlier stage is exhausted.
pub struct StageWiseSearchController {
    base_config: ConfigValue,
    controllers: Vec<Box<dyn AutomlController>>,
}

impl StageWiseSearchController {
    pub fn new(base_config: ConfigValue, controllers: Vec<Box<dyn AutomlController>>) -> Self {
        Self {
            base_config,
            controllers,
        }
    }

    pub fn controllers(&self) -> &[Box<dyn AutomlController>] {
        &self.controllers
    }
}

impl AutomlController for StageWiseSearchController {
    fn generate_training_configs(
        &mut self,
        budget: f64,
        history: &[TrainLog],
        n_trials: usize,
    ) -> Result<Vec<ConfigValue>> {
        let mut base_config = self.base_config.clone();
        for (stage, controller) in self.controllers.iter_mut().enumerate() {
            controller.set_base_config(&base_config)?;
            let candidates = controller.generate_training_configs(budget, history, n_trials)?;

            if !candidates.is_empty() {
                log::debug!("Stage {} generated {} configs", stage, candidates.len());
                return Ok(candidates);
            }

            if let Some(best_config) = controller.find_best_config(history)? {
                base_config = best_config;
            }
            log::debug!("Stage {} exhausted, moving on from {}", stage, base_config);
        }

        Ok(Vec::new())
    }

    fn set_base_config(&mut self, config: &ConfigValue) -> Result<()> {
        self.base_config = config.clone();
        Ok(())
    }

    fn base_config(&self) -> &ConfigValue {
        &self.base_config
    }
}
