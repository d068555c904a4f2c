//! Command-line flags for the run-level [`HpoArgs`].

use clap::{ArgAction, Args};
use std::path::PathBuf;

use ft_types::{HpoArgs, HpoResult};

/// Run settings, either as individual flags or a JSON file that replaces them.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Root directory for logs and outputs
    #[arg(long = "output_dir", default_value = "data/output/")]
    pub output_dir: PathBuf,

    /// Pretrained model, hub identifier or local path
    #[arg(long = "model_path", default_value = "facebook/muppet-roberta-base")]
    pub model_path: String,

    /// Train with mixed precision
    #[arg(long = "fp16", default_value_t = true, action = ArgAction::Set)]
    pub fp16: bool,

    /// Tokenizer padding/truncation length
    #[arg(long = "max_seq_length", default_value_t = 128)]
    pub max_seq_length: usize,

    /// Checkpoints written per training epoch
    #[arg(long = "ckpt_per_epoch", default_value_t = 1)]
    pub ckpt_per_epoch: usize,

    /// JSON file with run settings; takes precedence over the flags above
    #[arg(long = "run_config")]
    pub run_config: Option<PathBuf>,
}

impl RunArgs {
    /// Validated run settings.
    pub fn load(&self) -> HpoResult<HpoArgs> {
        if let Some(path) = &self.run_config {
            return HpoArgs::from_json_file(path);
        }
        let args = HpoArgs {
            output_dir: self.output_dir.clone(),
            model_path: self.model_path.clone(),
            fp16: self.fp16,
            max_seq_length: self.max_seq_length,
            ckpt_per_epoch: self.ckpt_per_epoch,
        };
        args.validate()?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    #[test]
    fn flag_defaults_match_run_defaults() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        assert_eq!(cli.run.load().unwrap(), HpoArgs::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = TestCli::try_parse_from([
            "test",
            "--model_path",
            "google/electra-base-discriminator",
            "--fp16",
            "false",
            "--max_seq_length",
            "256",
        ])
        .unwrap();
        let args = cli.run.load().unwrap();
        assert_eq!(args.model_path, "google/electra-base-discriminator");
        assert!(!args.fp16);
        assert_eq!(args.max_seq_length, 256);
        assert_eq!(args.ckpt_per_epoch, 1);
    }

    #[test]
    fn invalid_flags_rejected() {
        let cli = TestCli::try_parse_from(["test", "--ckpt_per_epoch", "0"]).unwrap();
        assert!(cli.run.load().is_err());
    }

    #[test]
    fn config_file_replaces_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_seq_length": 64}}"#).unwrap();
        let path = file.path().to_str().unwrap();

        let cli = TestCli::try_parse_from(["test", "--max_seq_length", "512", "--run_config", path])
            .unwrap();
        let args = cli.run.load().unwrap();
        assert_eq!(args.max_seq_length, 64);
    }
}
