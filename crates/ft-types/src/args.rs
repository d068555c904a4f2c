use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config_error;
use crate::errors::HpoResult;

/// Run-level settings for an HPO job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HpoArgs {
    /// Root directory for logs and outputs.
    pub output_dir: PathBuf,
    /// Pretrained model, either a hub identifier or a local path.
    pub model_path: String,
    pub fp16: bool,
    /// Tokenizer padding/truncation length.
    pub max_seq_length: usize,
    /// Checkpoints written per training epoch.
    pub ckpt_per_epoch: usize,
}

impl Default for HpoArgs {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data/output/"),
            model_path: "facebook/muppet-roberta-base".to_string(),
            fp16: true,
            max_seq_length: 128,
            ckpt_per_epoch: 1,
        }
    }
}

impl HpoArgs {
    pub fn with_model_path(mut self, model_path: impl Into<String>) -> Self {
        self.model_path = model_path.into();
        self
    }

    pub fn with_max_seq_length(mut self, max_seq_length: usize) -> Self {
        self.max_seq_length = max_seq_length;
        self
    }

    pub fn with_ckpt_per_epoch(mut self, ckpt_per_epoch: usize) -> Self {
        self.ckpt_per_epoch = ckpt_per_epoch;
        self
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> HpoResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let args: Self = serde_json::from_str(&raw)?;
        args.validate()?;
        Ok(args)
    }

    pub fn validate(&self) -> HpoResult<()> {
        if self.max_seq_length == 0 {
            return Err(config_error!("max_seq_length must be positive"));
        }
        if self.ckpt_per_epoch == 0 {
            return Err(config_error!("ckpt_per_epoch must be positive"));
        }
        if self.model_path.is_empty() {
            return Err(config_error!("model_path must not be empty"));
        }
        Ok(())
    }
}
