use std::{fs::File, path::Path, rc::Rc};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    controllers::{
        grid_controller::GridSearchController, single_var_controller::SingleVarSearchController,
        stage_wise_controller::StageWiseSearchController, AutomlController, SearchDimension,
    },
    errors::Result,
    library::{ConfigValue, CostEstimator, PathAccessor},
    pruners::SinglePeakPruner,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrunerKind {
    SinglePeak,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchStrategy {
    #[default]
    StageWise,
    Grid,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionConfig {
    pub path: String,
    pub candidates: Vec<ConfigValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates_order: Option<Vec<ConfigValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pruner: Option<PrunerKind>,
}

impl DimensionConfig {
    pub fn to_search_dimension(&self) -> Result<SearchDimension> {
        let mut search_dim =
            SearchDimension::new(self.candidates.clone(), PathAccessor::new(&self.path));
        if let Some(PrunerKind::SinglePeak) = self.pruner {
            search_dim = search_dim.with_pruner(SinglePeakPruner::new(PathAccessor::new(&self.path)));
        }
        if let Some(ref candidates_order) = self.candidates_order {
            search_dim = search_dim.with_candidates_order(candidates_order.clone())?;
        }
        Ok(search_dim)
    }
}

/// A search described as data, e.g. read from a JSON file:
///
/// ```json
/// {
///   "baseConfig": {"optim": {"lr": 0.1, "epochs": 10}},
///   "strategy": "stageWise",
///   "dimensions": [
///     {"path": "optim/lr", "candidates": [0.01, 0.1, 1.0], "pruner": "singlePeak"},
///     {"path": "optim/epochs", "candidates": [10, 20]}
///   ],
///   "randomSeed": 42
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    pub base_config: ConfigValue,
    #[serde(default)]
    pub strategy: SearchStrategy,
    pub dimensions: Vec<DimensionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
}

impl SearchConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Invalid search config")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open search config {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("Failed to read search config {}", path.display()))
    }

    pub fn dimensions(&self) -> Result<Vec<SearchDimension>> {
        self.dimensions
            .iter()
            .map(DimensionConfig::to_search_dimension)
            .collect()
    }

    pub fn build_controller<D: 'static>(
        &self,
        cost_estimator: Rc<dyn CostEstimator<D>>,
        dataset: Rc<D>,
    ) -> Result<Box<dyn AutomlController>> {
        let search_dims = self.dimensions()?;
        log::debug!(
            "Building {:?} search over {} dimensions",
            self.strategy,
            search_dims.len()
        );

        match self.strategy {
            SearchStrategy::Grid => {
                let mut controller = GridSearchController::new(
                    self.base_config.clone(),
                    cost_estimator,
                    dataset,
                    search_dims,
                );
                if let Some(seed) = self.random_seed {
                    controller = controller.with_random_seed(seed);
                }
                Ok(Box::new(controller))
            }
            SearchStrategy::StageWise => {
                let controllers = search_dims
                    .into_iter()
                    .map(|search_dim| {
                        let mut controller = SingleVarSearchController::new(
                            self.base_config.clone(),
                            cost_estimator.clone(),
                            dataset.clone(),
                            search_dim,
                        );
                        if let Some(seed) = self.random_seed {
                            controller = controller.with_random_seed(seed);
                        }
                        Box::new(controller) as Box<dyn AutomlController>
                    })
                    .collect();
                Ok(Box::new(StageWiseSearchController::new(
                    self.base_config.clone(),
                    controllers,
                )))
            }
        }
    }
}
