pub mod alter_decorator;
pub mod grid_controller;
pub mod single_var_controller;
pub mod stage_wise_controller;

use std::rc::Rc;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    errors::{Error, Result},
    library::{ConfigAccessor, ConfigValue},
    pruners::CandidatePruner,
    train_log::{self, TrainLog},
};

pub trait AutomlController {
    /// Generates at most `n_trials` configs to try in the next round, with a total estimated
    /// cost of at most `budget`.
    fn generate_training_configs(
        &mut self,
        budget: f64,
        history: &[TrainLog],
        n_trials: usize,
    ) -> Result<Vec<ConfigValue>>;

    fn find_best_config(&self, history: &[TrainLog]) -> Result<Option<ConfigValue>> {
        Ok(train_log::find_best_config(history))
    }

    fn set_base_config(&mut self, config: &ConfigValue) -> Result<()>;

    fn base_config(&self) -> &ConfigValue;
}

impl<C: AutomlController + ?Sized> AutomlController for Box<C> {
    fn generate_training_configs(
        &mut self,
        budget: f64,
        history: &[TrainLog],
        n_trials: usize,
    ) -> Result<Vec<ConfigValue>> {
        (**self).generate_training_configs(budget, history, n_trials)
    }

    fn find_best_config(&self, history: &[TrainLog]) -> Result<Option<ConfigValue>> {
        (**self).find_best_config(history)
    }

    fn set_base_config(&mut self, config: &ConfigValue) -> Result<()> {
        (**self).set_base_config(config)
    }

    fn base_config(&self) -> &ConfigValue {
        (**self).base_config()
    }
}

/// One variable of the config to search over.
///
/// `candidates_order` decides the iteration order pruners see, `candidates` decides
/// which values exist and the order configs are generated in.
#[derive(Clone)]
pub struct SearchDimension {
    candidates: Vec<ConfigValue>,
    var_accessor: Rc<dyn ConfigAccessor>,
    pruner: Option<Rc<dyn CandidatePruner>>,
    candidates_order: Vec<ConfigValue>,
}

impl SearchDimension {
    pub fn new(candidates: Vec<ConfigValue>, var_accessor: impl ConfigAccessor + 'static) -> Self {
        Self {
            candidates_order: candidates.clone(),
            candidates,
            var_accessor: Rc::new(var_accessor),
            pruner: None,
        }
    }

    pub fn with_pruner(mut self, pruner: impl CandidatePruner + 'static) -> Self {
        self.pruner = Some(Rc::new(pruner));
        self
    }

    /// Fails unless `candidates_order` holds exactly the candidates. An empty order keeps
    /// the default.
    pub fn with_candidates_order(mut self, candidates_order: Vec<ConfigValue>) -> Result<Self> {
        if candidates_order.is_empty() {
            return Ok(self);
        }
        if candidates_order.len() != self.candidates.len()
            || !self.candidates.iter().all(|c| candidates_order.contains(c))
        {
            return Err(Error::CandidatesOrderMismatch {
                candidates: self.candidates.len(),
                order: candidates_order.len(),
            });
        }
        self.candidates_order = candidates_order;
        Ok(self)
    }

    pub fn candidates(&self) -> &[ConfigValue] {
        &self.candidates
    }

    pub fn candidates_order(&self) -> &[ConfigValue] {
        &self.candidates_order
    }

    pub fn var_accessor(&self) -> &dyn ConfigAccessor {
        self.var_accessor.as_ref()
    }

    pub fn pruner(&self) -> Option<&dyn CandidatePruner> {
        self.pruner.as_deref()
    }

    /// Config with this dimension's variable set to each candidate, in `candidates` order.
    pub(crate) fn candidate_configs(&self, base_config: &ConfigValue) -> Result<Vec<ConfigValue>> {
        self.candidates
            .iter()
            .map(|c| self.var_accessor.assign_val_to_config(base_config, c))
            .collect()
    }
}

pub(crate) fn shuffle_with_seed(configs: &mut [ConfigValue], random_seed: Option<u64>) {
    if let Some(seed) = random_seed {
        configs.shuffle(&mut StdRng::seed_from_u64(seed));
    }
}
