use std::rc::Rc;

use crate::{
    errors::Result,
    library::{ConfigAccessor, ConfigValue},
    train_log::TrainLog,
};

use super::AutomlController;

pub trait AlterStrategy {
    fn surrogate_value(&self, config: &ConfigValue) -> Result<ConfigValue>;
}

impl<F> AlterStrategy for F
where
    F: Fn(&ConfigValue) -> ConfigValue,
{
    fn surrogate_value(&self, config: &ConfigValue) -> Result<ConfigValue> {
        Ok(self(config))
    }
}

#[derive(Clone, Debug)]
pub struct ConstantValue(pub ConfigValue);

impl AlterStrategy for ConstantValue {
    fn surrogate_value(&self, _config: &ConfigValue) -> Result<ConfigValue> {
        Ok(self.0.clone())
    }
}

/// Temporarily overrides one variable of the base config while the inner controller searches.
///
/// E.g. when trying out horizontal flips 5 epochs are most likely enough, so the flip
/// controller can be decorated to search with 5 epochs. The best config is reported with
/// the variable's original value.
pub struct AlterDecorator<C> {
    controller: C,
    var_accessor: Rc<dyn ConfigAccessor>,
    alter_strategy: Box<dyn AlterStrategy>,
    backup_val: ConfigValue,
}

impl<C: AutomlController> AlterDecorator<C> {
    pub fn new(
        controller: C,
        base_config: &ConfigValue,
        var_accessor: impl ConfigAccessor + 'static,
        alter_strategy: impl AlterStrategy + 'static,
    ) -> Result<Self> {
        let backup_val = var_accessor.parse_value(base_config)?;
        let mut decorator = Self {
            controller,
            var_accessor: Rc::new(var_accessor),
            alter_strategy: Box::new(alter_strategy),
            backup_val,
        };
        decorator.set_base_config(base_config)?;
        Ok(decorator)
    }

    pub fn inner(&self) -> &C {
        &self.controller
    }

    fn alter_config(&self, config: &ConfigValue) -> Result<ConfigValue> {
        let surrogate = self.alter_strategy.surrogate_value(config)?;
        self.var_accessor.assign_val_to_config(config, &surrogate)
    }
}

impl<C: AutomlController> AutomlController for AlterDecorator<C> {
    fn generate_training_configs(
        &mut self,
        budget: f64,
        history: &[TrainLog],
        n_trials: usize,
    ) -> Result<Vec<ConfigValue>> {
        self.controller
            .generate_training_configs(budget, history, n_trials)
    }

    fn find_best_config(&self, history: &[TrainLog]) -> Result<Option<ConfigValue>> {
        match self.controller.find_best_config(history)? {
            Some(config) => Ok(Some(
                self.var_accessor
                    .assign_val_to_config(&config, &self.backup_val)?,
            )),
            None => Ok(None),
        }
    }

    fn set_base_config(&mut self, config: &ConfigValue) -> Result<()> {
        let altered = self.alter_config(config)?;
        self.controller.set_base_config(&altered)
    }

    fn base_config(&self) -> &ConfigValue {
        self.controller.base_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controllers::{single_var_controller::SingleVarSearchController, SearchDimension},
        pruners::SinglePeakPruner,
        testing::{fake_config, train_log, values, var_1, var_2, zero_cost},
    };

    fn var_1_controller() -> SingleVarSearchController<()> {
        SingleVarSearchController::new(
            fake_config(1, 1),
            zero_cost(),
            Rc::new(()),
            SearchDimension::new(values(&[1, 2, 3, 4]), var_1())
                .with_pruner(SinglePeakPruner::new(var_1())),
        )
    }

    #[test_log::test]
    fn searches_with_surrogate_and_reports_original_value() {
        let base_config = fake_config(1, 1);
        let mut c_a = AlterDecorator::new(
            var_1_controller(),
            &base_config,
            var_2(),
            ConstantValue(ConfigValue::from(3)),
        )
        .unwrap();

        let trials = c_a.generate_training_configs(1., &[], 2).unwrap();
        assert_eq!(trials, vec![fake_config(1, 3), fake_config(2, 3)]);
        for trial in &trials {
            assert_eq!(var_2().parse_value(trial).unwrap(), ConfigValue::from(3));
        }

        let best_config = c_a
            .find_best_config(&[train_log(fake_config(1, 3), 1.)])
            .unwrap()
            .unwrap();
        assert_eq!(var_2().parse_value(&best_config).unwrap(), ConfigValue::from(1));
        assert_eq!(best_config, fake_config(1, 1));
    }

    #[test]
    fn nothing_found_stays_nothing() {
        let c_a = AlterDecorator::new(
            var_1_controller(),
            &fake_config(1, 1),
            var_2(),
            ConstantValue(ConfigValue::from(3)),
        )
        .unwrap();
        assert_eq!(c_a.find_best_config(&[]).unwrap(), None);
        // Trained without the surrogate: not part of the decorated search.
        assert_eq!(
            c_a.find_best_config(&[train_log(fake_config(2, 1), 1.)]).unwrap(),
            None
        );
    }

    #[test]
    fn override_survives_rebasing() {
        let double_var_1 = |config: &ConfigValue| match var_1().parse_value(config) {
            Ok(ConfigValue::Integer(v)) => ConfigValue::from(v * 2),
            _ => ConfigValue::Null,
        };
        let mut c_a =
            AlterDecorator::new(var_1_controller(), &fake_config(1, 1), var_2(), double_var_1)
                .unwrap();
        assert_eq!(c_a.base_config(), &fake_config(1, 2));

        c_a.set_base_config(&fake_config(3, 9)).unwrap();
        assert_eq!(c_a.base_config(), &fake_config(3, 6));
        assert_eq!(c_a.inner().base_config(), &fake_config(3, 6));

        let trials = c_a.generate_training_configs(10., &[], 10).unwrap();
        assert!(trials
            .iter()
            .all(|trial| var_2().parse_value(trial).unwrap() == ConfigValue::from(6)));

        // The value restored is the one captured at construction.
        let best_config = c_a
            .find_best_config(&[train_log(fake_config(4, 6), 1.)])
            .unwrap();
        assert_eq!(best_config, Some(fake_config(4, 1)));
    }

    #[test]
    fn malformed_base_config_fails_construction() {
        let result = AlterDecorator::new(
            var_1_controller(),
            &ConfigValue::from(1),
            var_2(),
            ConstantValue(ConfigValue::from(3)),
        );
        assert!(result.is_err());
    }
}
