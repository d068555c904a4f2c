//! Knowledge about the downstream trainer's argument set.

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

use ft_types::{HpValue, HpoError, HpoResult, Task};

/// Field names accepted by the trainer's argument struct. Anything else in a
/// trial configuration belongs to the model config.
pub const TRAINER_FIELDS: &[&str] = &[
    "output_dir",
    "learning_rate",
    "weight_decay",
    "adam_beta1",
    "adam_beta2",
    "adam_epsilon",
    "max_grad_norm",
    "num_train_epochs",
    "max_steps",
    "lr_scheduler_type",
    "warmup_ratio",
    "warmup_steps",
    "per_device_train_batch_size",
    "per_device_eval_batch_size",
    "gradient_accumulation_steps",
    "evaluation_strategy",
    "save_strategy",
    "eval_steps",
    "save_steps",
    "logging_steps",
    "seed",
    "fp16",
    "disable_tqdm",
];

/// Default value the trainer uses for a field, for the fields that take part
/// in search spaces.
pub fn trainer_default(name: &str) -> Option<HpValue> {
    let value = match name {
        "learning_rate" => HpValue::Float(5e-5),
        "weight_decay" => HpValue::Float(0.0),
        "adam_beta1" => HpValue::Float(0.9),
        "adam_beta2" => HpValue::Float(0.999),
        "adam_epsilon" => HpValue::Float(1e-8),
        "max_grad_norm" => HpValue::Float(1.0),
        "num_train_epochs" => HpValue::Float(3.0),
        "max_steps" => HpValue::Int(-1),
        "lr_scheduler_type" => HpValue::Text("linear".to_string()),
        "warmup_ratio" => HpValue::Float(0.0),
        "warmup_steps" => HpValue::Int(0),
        "per_device_train_batch_size" => HpValue::Int(8),
        "per_device_eval_batch_size" => HpValue::Int(8),
        "gradient_accumulation_steps" => HpValue::Int(1),
        "seed" => HpValue::Int(42),
        _ => return None,
    };
    Some(value)
}

pub fn is_trainer_field(name: &str) -> bool {
    TRAINER_FIELDS.contains(&name)
}

/// Split a sampled trial configuration into trainer arguments and per-model
/// config overrides.
pub fn separate_config<V: Clone>(
    config: &BTreeMap<String, V>,
) -> (BTreeMap<String, V>, BTreeMap<String, V>) {
    config
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .partition(|(key, _)| is_trainer_field(key))
}

/// Size of the classification head for a task.
pub fn num_labels<L: Eq + Hash>(task: Task, labels: &[L]) -> usize {
    match task {
        Task::SeqRegression => 1,
        Task::SeqClassification => labels.iter().collect::<HashSet<_>>().len(),
    }
}

/// Steps between checkpoints so that each epoch (or the whole run, if it is
/// shorter than one epoch) gets `ckpt_per_epoch` checkpoints.
pub fn checkpoint_freq(
    train_data_size: usize,
    ckpt_per_epoch: usize,
    num_train_epochs: f64,
    batch_size: usize,
) -> HpoResult<usize> {
    if batch_size == 0 || ckpt_per_epoch == 0 {
        return Err(HpoError::InvalidArgument {
            name: (if batch_size == 0 { "batch_size" } else { "ckpt_per_epoch" }).to_string(),
            message: "must be positive".to_string(),
        });
    }
    let epochs = num_train_epochs.min(1.0);
    let steps = epochs * train_data_size as f64 / batch_size as f64 / ckpt_per_epoch as f64;
    Ok(steps as usize + 1)
}
