use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::library::ConfigValue;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrainLog")]
#[serde(rename_all = "camelCase")]
pub struct TrainLog {
    config: ConfigValue,
    metric: BTreeMap<String, f64>,
    automl_metric_name: String,
    time_cost: f64,
    err_msg: Option<String>,
}

impl TrainLog {
    /// `automl_metric_name` may only be omitted when `metric` has exactly one entry.
    pub fn new(
        config: ConfigValue,
        metric: BTreeMap<String, f64>,
        automl_metric_name: Option<&str>,
    ) -> Result<Self> {
        if metric.is_empty() {
            return Err(Error::EmptyMetric);
        }

        let automl_metric_name = match automl_metric_name {
            Some(name) => name.to_string(),
            None => {
                if metric.len() != 1 {
                    return Err(Error::AmbiguousMetric {
                        count: metric.len(),
                    });
                }
                metric.keys().next().cloned().unwrap_or_default()
            }
        };
        if !metric.contains_key(&automl_metric_name) {
            return Err(Error::UnknownMetric {
                name: automl_metric_name,
            });
        }

        Ok(Self {
            config,
            metric,
            automl_metric_name,
            time_cost: 0.,
            err_msg: None,
        })
    }

    pub fn with_time_cost(mut self, time_cost: f64) -> Self {
        self.time_cost = time_cost;
        self
    }

    pub fn with_err_msg(mut self, err_msg: impl Into<String>) -> Self {
        self.err_msg = Some(err_msg.into());
        self
    }

    pub fn config(&self) -> &ConfigValue {
        &self.config
    }

    pub fn metric(&self) -> &BTreeMap<String, f64> {
        &self.metric
    }

    pub fn automl_metric_name(&self) -> &str {
        &self.automl_metric_name
    }

    pub fn automl_metric_val(&self) -> f64 {
        self.metric
            .get(&self.automl_metric_name)
            .copied()
            .unwrap_or(f64::NAN)
    }

    pub fn time_cost(&self) -> f64 {
        self.time_cost
    }

    pub fn err_msg(&self) -> Option<&str> {
        self.err_msg.as_deref()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrainLog {
    config: ConfigValue,
    metric: BTreeMap<String, f64>,
    #[serde(default)]
    automl_metric_name: Option<String>,
    #[serde(default)]
    time_cost: f64,
    #[serde(default)]
    err_msg: Option<String>,
}

impl TryFrom<RawTrainLog> for TrainLog {
    type Error = Error;

    fn try_from(raw: RawTrainLog) -> Result<Self> {
        let mut log = TrainLog::new(raw.config, raw.metric, raw.automl_metric_name.as_deref())?
            .with_time_cost(raw.time_cost);
        log.err_msg = raw.err_msg;
        Ok(log)
    }
}

/// Config of the log with the highest automl metric. On ties the first one in `history` wins.
pub fn find_best_config<'a>(history: impl IntoIterator<Item = &'a TrainLog>) -> Option<ConfigValue> {
    let mut best: Option<&TrainLog> = None;
    for log in history {
        if best.map_or(true, |current| {
            log.automl_metric_val() > current.automl_metric_val()
        }) {
            best = Some(log);
        }
    }
    best.map(|log| log.config.clone())
}
