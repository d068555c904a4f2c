//! Search-algorithm selection.
//!
//! Resolves an algorithm name against the registry, derives its default
//! constructor arguments from the search space, filters arguments against the
//! algorithm's accepted parameters and produces an [`AlgorithmInstance`]
//! descriptor. The tuning-runtime integration layer turns the descriptor into
//! a live searcher.
//!
//! Construction failures do not abort a multi-algorithm sweep: they come back
//! as [`Selection::Unavailable`] so the caller can move on to the next
//! algorithm. Only configuration mistakes (unknown name, bad args mode) are
//! errors.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use ft_types::{precondition_error, HpValue, HpoError, HpoResult, SearchSpace, SpaceEntry};

/// Constructor arguments keyed by parameter name.
pub type AlgorithmArgs = BTreeMap<String, Value>;

/// Parameters accepted by the Optuna searcher wrapper.
const OPTUNA_PARAMS: &[&str] = &[
    "space",
    "metric",
    "mode",
    "points_to_evaluate",
    "sampler",
    "seed",
    "evaluated_rewards",
];

/// Parameters accepted by the CFO and BlendSearch constructors.
const FLAML_PARAMS: &[&str] = &[
    "metric",
    "mode",
    "space",
    "low_cost_partial_config",
    "cat_hp_cost",
    "points_to_evaluate",
    "evaluated_rewards",
    "time_budget_s",
    "num_samples",
    "resource_attr",
    "min_resource",
    "max_resource",
    "reduction_factor",
    "global_search_alg",
    "config_constraints",
    "metric_constraints",
    "seed",
    "experimental",
];

/// Registered search algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchAlgo {
    Optuna,
    Cfo,
    #[serde(rename = "bs")]
    BlendSearch,
    Grid,
    #[serde(rename = "gridbert")]
    GridBert,
    #[serde(rename = "rs")]
    RandomSearch,
}

impl SearchAlgo {
    /// Registry order.
    pub const ALL: [SearchAlgo; 6] = [
        Self::Optuna,
        Self::Cfo,
        Self::BlendSearch,
        Self::Grid,
        Self::GridBert,
        Self::RandomSearch,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Optuna => "optuna",
            Self::Cfo => "cfo",
            Self::BlendSearch => "bs",
            Self::Grid => "grid",
            Self::GridBert => "gridbert",
            Self::RandomSearch => "rs",
        }
    }

    pub fn registered_keys() -> String {
        Self::ALL
            .iter()
            .map(SearchAlgo::key)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Constructor parameters of the wrapper type, or `None` when the
    /// algorithm has no wrapper and the caller sets it up elsewhere.
    pub fn accepted_params(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Optuna => Some(OPTUNA_PARAMS),
            Self::Cfo | Self::BlendSearch => Some(FLAML_PARAMS),
            Self::Grid | Self::GridBert | Self::RandomSearch => None,
        }
    }
}

impl std::str::FromStr for SearchAlgo {
    type Err = HpoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algo| algo.key() == s)
            .ok_or_else(|| HpoError::UnknownSearchAlgorithm {
                algorithm: s.to_string(),
                valid: Self::registered_keys(),
            })
    }
}

impl std::fmt::Display for SearchAlgo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Where the constructor arguments come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgsMode {
    /// Arguments derived from the search space.
    Default,
    /// Arguments supplied by the caller.
    Custom,
}

impl std::str::FromStr for ArgsMode {
    type Err = HpoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" | "dft" => Ok(Self::Default),
            "custom" | "cus" => Ok(Self::Custom),
            other => Err(precondition_error!(
                "search algorithm args mode {other} must be one of default, custom"
            )),
        }
    }
}

/// A search algorithm ready to be instantiated by the tuning runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmInstance {
    pub algorithm: SearchAlgo,
    pub args: AlgorithmArgs,
}

impl AlgorithmInstance {
    /// Build a descriptor, checking the shape of every known argument.
    pub fn new(algorithm: SearchAlgo, args: AlgorithmArgs) -> HpoResult<Self> {
        for (name, value) in &args {
            check_arg_shape(name, value)?;
        }
        Ok(Self { algorithm, args })
    }
}

fn check_arg_shape(name: &str, value: &Value) -> HpoResult<()> {
    let expected = match name {
        "metric" | "resource_attr" | "sampler" if !value.is_string() => "a string",
        "mode" if !matches!(value.as_str(), Some("min" | "max")) => "\"min\" or \"max\"",
        "seed" | "num_samples" if !(value.is_i64() || value.is_u64()) => "an integer",
        "time_budget_s" | "min_resource" | "max_resource" | "reduction_factor"
            if !value.is_number() =>
        {
            "a number"
        }
        "space" | "low_cost_partial_config" | "cat_hp_cost" if !value.is_object() => "an object",
        "points_to_evaluate"
            if !value
                .as_array()
                .is_some_and(|points| points.iter().all(Value::is_object)) =>
        {
            "an array of objects"
        }
        "evaluated_rewards" | "metric_constraints" | "config_constraints" if !value.is_array() => {
            "an array"
        }
        _ => return Ok(()),
    };
    Err(HpoError::InvalidArgument {
        name: name.to_string(),
        message: format!("expected {expected}, got {value}"),
    })
}

/// Why a registered algorithm could not be set up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlgorithmFailure {
    #[error("default arguments could not be derived: {0}")]
    DefaultArgs(String),
    #[error("constructor rejected arguments: {0}")]
    Construction(String),
}

/// Outcome of selecting a registered algorithm.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Descriptor built; `dropped` lists arguments the constructor does not accept.
    Built {
        instance: AlgorithmInstance,
        dropped: Vec<String>,
    },
    /// No wrapper type: the caller instantiates this algorithm itself.
    External(SearchAlgo),
    /// The algorithm is unavailable for this space or these arguments.
    Unavailable {
        algorithm: SearchAlgo,
        failure: AlgorithmFailure,
    },
}

impl Selection {
    /// The built descriptor, if any.
    pub fn into_instance(self) -> Option<AlgorithmInstance> {
        match self {
            Self::Built { instance, .. } => Some(instance),
            Self::External(_) | Self::Unavailable { .. } => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Select an algorithm by registry key.
///
/// Unknown names and args modes are errors. Everything that goes wrong after
/// the name is resolved is reported through [`Selection::Unavailable`].
pub fn select(
    name: &str,
    args_mode: &str,
    search_space: &SearchSpace,
    custom_args: AlgorithmArgs,
) -> HpoResult<Selection> {
    let args_mode: ArgsMode = args_mode.parse()?;
    let algorithm: SearchAlgo = name.parse()?;
    Ok(select_algorithm(algorithm, args_mode, search_space, custom_args))
}

pub fn select_algorithm(
    algorithm: SearchAlgo,
    args_mode: ArgsMode,
    search_space: &SearchSpace,
    custom_args: AlgorithmArgs,
) -> Selection {
    info!("Selecting search algorithm {} with {:?} arguments", algorithm, args_mode);

    let defaults = match default_args(algorithm, search_space) {
        Ok(defaults) => defaults,
        Err(e) => {
            warn!("Search algorithm {} unavailable: {}", algorithm, e);
            return Selection::Unavailable {
                algorithm,
                failure: AlgorithmFailure::DefaultArgs(e.to_string()),
            };
        }
    };
    let args = match args_mode {
        ArgsMode::Default => defaults,
        ArgsMode::Custom => custom_args,
    };

    let Some(accepted) = algorithm.accepted_params() else {
        debug!("Search algorithm {} has no wrapper type", algorithm);
        return Selection::External(algorithm);
    };
    let (args, dropped) = filter_args(args, accepted);
    if !dropped.is_empty() {
        debug!("Dropped arguments not accepted by {}: {:?}", algorithm, dropped);
    }

    match AlgorithmInstance::new(algorithm, args) {
        Ok(instance) => Selection::Built { instance, dropped },
        Err(e) => {
            warn!("Search algorithm {} unavailable: {}", algorithm, e);
            Selection::Unavailable {
                algorithm,
                failure: AlgorithmFailure::Construction(e.to_string()),
            }
        }
    }
}

/// Keep only accepted parameters. Returns the kept arguments and the names of
/// the dropped ones.
pub fn filter_args(args: AlgorithmArgs, accepted: &[&str]) -> (AlgorithmArgs, Vec<String>) {
    let mut dropped = Vec::new();
    let kept = args
        .into_iter()
        .filter(|(name, _)| {
            let keep = accepted.contains(&name.as_str());
            if !keep {
                dropped.push(name.clone());
            }
            keep
        })
        .collect();
    (kept, dropped)
}

/// Default constructor arguments derived from the search space.
pub fn default_args(algorithm: SearchAlgo, space: &SearchSpace) -> HpoResult<AlgorithmArgs> {
    let mut args = AlgorithmArgs::new();
    match algorithm {
        SearchAlgo::Cfo | SearchAlgo::BlendSearch => {
            let epochs = min_epoch(space)?;
            let batch_size = max_batch_size(space)?;
            args.insert(
                "low_cost_partial_config".to_string(),
                json!({
                    "num_train_epochs": epochs.to_json(),
                    "per_device_train_batch_size": batch_size.to_json(),
                }),
            );
        }
        SearchAlgo::Optuna
        | SearchAlgo::Grid
        | SearchAlgo::GridBert
        | SearchAlgo::RandomSearch => {}
    }
    Ok(args)
}

/// Arguments used in experiment runs, where only the epoch count is pinned
/// to its cheapest value. Registered for CFO only.
pub fn experiment_args(algorithm: SearchAlgo, space: &SearchSpace) -> HpoResult<AlgorithmArgs> {
    if algorithm != SearchAlgo::Cfo {
        return Err(HpoError::UnknownSearchAlgorithm {
            algorithm: algorithm.key().to_string(),
            valid: SearchAlgo::Cfo.key().to_string(),
        });
    }
    let epochs = min_epoch(space)?;
    let mut args = AlgorithmArgs::new();
    args.insert(
        "low_cost_partial_config".to_string(),
        json!({ "num_train_epochs": epochs.to_json() }),
    );
    Ok(args)
}

/// Cheapest epoch count in the space: the minimum candidate (or the lower
/// edge of a range), raised to at least one epoch. A candidate is returned
/// as-is so integer epochs stay integers.
fn min_epoch(space: &SearchSpace) -> HpoResult<HpValue> {
    let name = "num_train_epochs";
    let cheapest = match space.get(name) {
        Some(SpaceEntry::Range(range)) => HpValue::Float(range.lower),
        Some(SpaceEntry::Choice(values)) => {
            let min = numeric_extreme(name, values, f64::min)?;
            candidate_for(values, min)
        }
        None => return Err(HpoError::UnknownHyperparameter(name.to_string())),
    };
    match cheapest.as_f64() {
        Some(epochs) if epochs > 1.0 => Ok(cheapest),
        _ => Ok(HpValue::Int(1)),
    }
}

/// Largest batch size in the space. Only discrete batch sizes are supported.
fn max_batch_size(space: &SearchSpace) -> HpoResult<HpValue> {
    let name = "per_device_train_batch_size";
    let values = match space.get(name) {
        Some(SpaceEntry::Choice(values)) => values,
        Some(SpaceEntry::Range(_)) => {
            return Err(HpoError::InvalidArgument {
                name: name.to_string(),
                message: "expected discrete candidates, got a continuous range".to_string(),
            })
        }
        None => return Err(HpoError::UnknownHyperparameter(name.to_string())),
    };
    let max = numeric_extreme(name, values, f64::max)?;
    Ok(candidate_for(values, max))
}

/// The candidate holding `target`, keeping its original integer/float form.
fn candidate_for(values: &[HpValue], target: f64) -> HpValue {
    values
        .iter()
        .find(|value| value.as_f64() == Some(target))
        .cloned()
        .unwrap_or(HpValue::Float(target))
}

fn numeric_extreme(name: &str, values: &[HpValue], pick: fn(f64, f64) -> f64) -> HpoResult<f64> {
    let mut numbers = values.iter().map(|value| {
        value.as_f64().ok_or_else(|| HpoError::InvalidArgument {
            name: name.to_string(),
            message: format!("non-numeric candidate {value}"),
        })
    });
    let first = numbers.next().ok_or_else(|| HpoError::InvalidArgument {
        name: name.to_string(),
        message: "no candidates".to_string(),
    })??;
    numbers.try_fold(first, |acc, value| -> HpoResult<f64> { Ok(pick(acc, value?)) })
}
