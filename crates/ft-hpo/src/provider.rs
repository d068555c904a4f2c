//! Per-model grid search spaces.
//!
//! The composer asks a [`GridSpaceProvider`] for the published fine-tuning
//! grid of each model family. [`BuiltinGridProvider`] carries the grids
//! reported for ELECTRA, RoBERTa and BERT on GLUE-style tasks.

use ft_types::{HpoError, HpoResult, SearchSpace};
use tracing::debug;

/// Source of per-model grid search spaces.
pub trait GridSpaceProvider: Send + Sync {
    fn grid_space(
        &self,
        model_type: &str,
        model_size: &str,
        dataset: &str,
        subdataset: Option<&str>,
    ) -> HpoResult<SearchSpace>;
}

/// Model families the built-in provider knows about.
pub const BUILTIN_MODEL_TYPES: [&str; 3] = ["electra", "roberta", "bert"];

/// Subdatasets fine-tuned for 10 epochs instead of 3 in the ELECTRA recipe.
const ELECTRA_LONG_SUBDATASETS: [&str; 2] = ["rte", "stsb"];

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinGridProvider;

impl BuiltinGridProvider {
    pub fn new() -> Self {
        Self
    }

    fn electra(model_size: &str, subdataset: Option<&str>) -> HpoResult<SearchSpace> {
        let learning_rate: Vec<f64> = match model_size {
            "small" => vec![1e-4, 3e-4],
            "base" => vec![5e-5, 1e-4, 1.5e-4],
            "large" => vec![5e-5],
            other => return Err(invalid_size("electra", other, "small, base, large")),
        };
        let long_schedule =
            subdataset.is_some_and(|name| ELECTRA_LONG_SUBDATASETS.contains(&name));
        let epochs: i64 = if long_schedule { 10 } else { 3 };

        Ok(SearchSpace::new()
            .add_choice("learning_rate", learning_rate)
            .add_choice("per_device_train_batch_size", [32_i64])
            .add_choice("num_train_epochs", [epochs])
            .add_choice("warmup_ratio", [0.1])
            .add_choice("weight_decay", [0.0])
            .add_choice("adam_epsilon", [1e-6])
            .add_choice("hidden_dropout_prob", [0.1])
            .add_choice("attention_probs_dropout_prob", [0.1]))
    }

    fn roberta(model_size: &str) -> HpoResult<SearchSpace> {
        if !matches!(model_size, "base" | "large") {
            return Err(invalid_size("roberta", model_size, "base, large"));
        }
        Ok(SearchSpace::new()
            .add_choice("learning_rate", [1e-5, 2e-5, 3e-5])
            .add_choice("per_device_train_batch_size", [16_i64, 32])
            .add_choice("num_train_epochs", [10_i64])
            .add_choice("warmup_ratio", [0.06])
            .add_choice("weight_decay", [0.1])
            .add_choice("adam_epsilon", [1e-6])
            .add_choice("hidden_dropout_prob", [0.1])
            .add_choice("attention_probs_dropout_prob", [0.1]))
    }

    fn bert(model_size: &str) -> HpoResult<SearchSpace> {
        if !matches!(model_size, "base" | "large") {
            return Err(invalid_size("bert", model_size, "base, large"));
        }
        Ok(SearchSpace::new()
            .add_choice("learning_rate", [2e-5, 3e-5, 5e-5])
            .add_choice("per_device_train_batch_size", [16_i64, 32])
            .add_choice("num_train_epochs", [2_i64, 3, 4]))
    }
}

impl GridSpaceProvider for BuiltinGridProvider {
    fn grid_space(
        &self,
        model_type: &str,
        model_size: &str,
        dataset: &str,
        subdataset: Option<&str>,
    ) -> HpoResult<SearchSpace> {
        debug!(
            "Loading grid for {} ({}) on {}/{}",
            model_type,
            model_size,
            dataset,
            subdataset.unwrap_or("-")
        );
        match model_type {
            "electra" => Self::electra(model_size, subdataset),
            "roberta" => Self::roberta(model_size),
            "bert" => Self::bert(model_size),
            other => Err(HpoError::UnknownModelType {
                model_type: other.to_string(),
                valid: BUILTIN_MODEL_TYPES.join(", "),
            }),
        }
    }
}

fn invalid_size(model_type: &str, model_size: &str, valid: &str) -> HpoError {
    HpoError::InvalidArgument {
        name: "model_size".to_string(),
        message: format!("{model_type} has no {model_size} variant, expected one of {valid}"),
    }
}
