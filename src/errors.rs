use thiserror::Error;

use crate::library::ConfigValue;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("paths is not a non-empty list")]
    InvalidPaths,

    /// The accessor reached something that is not a (non-empty) map.
    #[error("config is not a map at '{path}'")]
    NotAMapping { path: String },

    #[error("key '{key}' is missing from config while accessing '{path}'")]
    MissingKey { path: String, key: String },

    #[error(
        "candidates order must be a permutation of the candidates: {candidates} candidates, {order} in order"
    )]
    CandidatesOrderMismatch { candidates: usize, order: usize },

    #[error("metric must contain at least one entry")]
    EmptyMetric,

    #[error("automl metric name is missing and there are {count} metrics provided")]
    AmbiguousMetric { count: usize },

    #[error("automl metric '{name}' is not present in metric")]
    UnknownMetric { name: String },

    #[error("candidate {candidate} not in candidate list")]
    CandidateNotInOrder { candidate: ConfigValue },
}
