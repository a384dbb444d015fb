use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Separator between the levels of a config path, e.g. `optim/base_lr`.
pub const SEPARATOR: char = '/';

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Result<Self> {
        let mut config = ConfigValue::Map(BTreeMap::new());
        config.add_paths(paths)?;
        Ok(config)
    }

    pub fn add_paths<S: AsRef<str>>(&mut self, paths: &[S]) -> Result<()> {
        if paths.is_empty() {
            return Err(Error::InvalidPaths);
        }

        for path in paths {
            let path = path.as_ref();
            let mut temp = &mut *self;
            for part in path.split(SEPARATOR) {
                temp = match temp {
                    ConfigValue::Map(map) => map
                        .entry(part.to_string())
                        .or_insert_with(|| ConfigValue::Map(BTreeMap::new())),
                    _ => {
                        return Err(Error::NotAMapping {
                            path: path.to_string(),
                        })
                    }
                };
            }
        }
        Ok(())
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::List(values) => write!(f, "[{}]", values.iter().join(", ")),
            Self::Map(map) => write!(
                f,
                "{{{}}}",
                map.iter()
                    .map(|(key, value)| format!("{:?}: {}", key, value))
                    .join(", ")
            ),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Integer(value as i64)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(values: Vec<T>) -> Self {
        ConfigValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(v) => ConfigValue::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => ConfigValue::Integer(v),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(v) => ConfigValue::String(v),
            serde_json::Value::Array(values) => {
                ConfigValue::List(values.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(map) => ConfigValue::Map(
                map.into_iter()
                    .map(|(key, value)| (key, ConfigValue::from(value)))
                    .collect(),
            ),
        }
    }
}

pub trait ConfigAccessor {
    /// Returns a copy of `config` with the variable set to `val`. `config` is left untouched.
    fn assign_val_to_config(&self, config: &ConfigValue, val: &ConfigValue) -> Result<ConfigValue>;

    fn parse_value(&self, config: &ConfigValue) -> Result<ConfigValue>;
}

#[derive(Clone, Debug)]
pub struct PathAccessor {
    path: String,
    parents: Vec<String>,
    key: String,
}

impl PathAccessor {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let mut parents = path
            .split(SEPARATOR)
            .map(str::to_string)
            .collect::<Vec<_>>();
        let key = parents.pop().unwrap_or_default();
        Self { path, parents, key }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn not_a_mapping(&self) -> Error {
        Error::NotAMapping {
            path: self.path.clone(),
        }
    }

    fn missing_key(&self, key: &str) -> Error {
        Error::MissingKey {
            path: self.path.clone(),
            key: key.to_string(),
        }
    }

    fn throw_if_not_map(&self, config: &ConfigValue) -> Result<()> {
        match config {
            ConfigValue::Map(map) if !map.is_empty() => Ok(()),
            _ => Err(self.not_a_mapping()),
        }
    }

    fn parent_map<'a>(&self, config: &'a ConfigValue) -> Result<&'a BTreeMap<String, ConfigValue>> {
        let mut temp = config;
        for part in &self.parents {
            temp = match temp {
                ConfigValue::Map(map) => map.get(part).ok_or_else(|| self.missing_key(part))?,
                _ => return Err(self.not_a_mapping()),
            };
        }
        temp.as_map().ok_or_else(|| self.not_a_mapping())
    }

    fn parent_map_mut<'a>(
        &self,
        config: &'a mut ConfigValue,
    ) -> Result<&'a mut BTreeMap<String, ConfigValue>> {
        let mut temp = config;
        for part in &self.parents {
            temp = match temp {
                ConfigValue::Map(map) => map.get_mut(part).ok_or_else(|| self.missing_key(part))?,
                _ => return Err(self.not_a_mapping()),
            };
        }
        match temp {
            ConfigValue::Map(map) => Ok(map),
            _ => Err(self.not_a_mapping()),
        }
    }
}

impl ConfigAccessor for PathAccessor {
    fn assign_val_to_config(&self, config: &ConfigValue, val: &ConfigValue) -> Result<ConfigValue> {
        self.throw_if_not_map(config)?;

        let mut result = config.clone();
        self.parent_map_mut(&mut result)?
            .insert(self.key.clone(), val.clone());
        Ok(result)
    }

    fn parse_value(&self, config: &ConfigValue) -> Result<ConfigValue> {
        self.throw_if_not_map(config)?;

        self.parent_map(config)?
            .get(&self.key)
            .cloned()
            .ok_or_else(|| self.missing_key(&self.key))
    }
}

/// Estimates the cost of training `dataset` with a given config.
///
/// Must be deterministic for a given pair: budgets and duplicate checks
/// rely on asking twice and getting the same answer.
pub trait CostEstimator<Dataset: ?Sized> {
    fn estimate(&self, config: &ConfigValue, dataset: &Dataset) -> f64;
}

impl<T, Dataset> CostEstimator<Dataset> for T
where
    T: Fn(&ConfigValue, &Dataset) -> f64,
    Dataset: ?Sized,
{
    fn estimate(&self, config: &ConfigValue, dataset: &Dataset) -> f64 {
        self(config, dataset)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ConstantCost(pub f64);

impl<Dataset: ?Sized> CostEstimator<Dataset> for ConstantCost {
    fn estimate(&self, _config: &ConfigValue, _dataset: &Dataset) -> f64 {
        self.0
    }
}
