//! Compose a search space (and optionally a search algorithm) and print it as
//! JSON for the tuning runtime.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use ft_cli::{
    init_logging, read_json_file, LoggingConfig, RunArgs, SelectionReport, SpaceReport,
};
use ft_hpo::{select, AlgorithmArgs, BoundPolicy, ComposeArgs, SpaceComposer, SpaceRequest};
use ft_types::{BoundSpec, SearchSpace};

#[derive(Parser)]
#[command(name = "hpo_space")]
#[command(version)]
#[command(about = "Compose HPO search spaces for fine-tuning", long_about = None)]
struct Cli {
    /// Search space mode (uni, gnr, uni_test, cus, buni)
    #[arg(short, long)]
    mode: String,

    /// Model family, e.g. electra
    #[arg(long, default_value = "electra")]
    model_type: String,

    /// Model size, e.g. base
    #[arg(long, default_value = "base")]
    model_size: String,

    /// Dataset name, e.g. glue
    #[arg(long, default_value = "glue")]
    dataset: String,

    /// Sub dataset name, e.g. rte
    #[arg(long)]
    subdataset: Option<String>,

    /// JSON file with per-hyperparameter {l, u} bounds (buni)
    #[arg(long)]
    bound: Option<PathBuf>,

    /// Trimming rule for bounded grid unions
    #[arg(long, value_enum, default_value = "index-scan")]
    bound_policy: BoundPolicyArg,

    /// JSON file with the search space to pass through (cus)
    #[arg(long)]
    custom_space: Option<PathBuf>,

    /// Search algorithm to set up for the composed space
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Where the algorithm arguments come from (default, custom)
    #[arg(long, default_value = "default")]
    algo_args_mode: String,

    /// JSON file with custom algorithm arguments
    #[arg(long)]
    algo_args: Option<PathBuf>,

    #[command(flatten)]
    run: RunArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum BoundPolicyArg {
    IndexScan,
    Inclusive,
}

impl From<BoundPolicyArg> for BoundPolicy {
    fn from(arg: BoundPolicyArg) -> Self {
        match arg {
            BoundPolicyArg::IndexScan => BoundPolicy::IndexScan,
            BoundPolicyArg::Inclusive => BoundPolicy::Inclusive,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig {
        log_level: cli.log_level.clone(),
        json_logs: cli.json_logs,
    });

    let run = cli.run.load()?;
    info!(
        output_dir = %run.output_dir.display(),
        model_path = %run.model_path,
        fp16 = run.fp16,
        max_seq_length = run.max_seq_length,
        ckpt_per_epoch = run.ckpt_per_epoch,
        "Run settings loaded"
    );

    let mut args = ComposeArgs::default();
    if let Some(path) = &cli.bound {
        args = args.with_bound(read_json_file::<BoundSpec>(path)?);
    }
    if let Some(path) = &cli.custom_space {
        args = args.with_hpo_space(read_json_file::<SearchSpace>(path)?);
    }

    let mut request = SpaceRequest::new(&cli.model_type, &cli.model_size, &cli.dataset);
    if let Some(subdataset) = &cli.subdataset {
        request = request.with_subdataset(subdataset);
    }

    let composer = SpaceComposer::default().with_bound_policy(cli.bound_policy.into());
    let search_space = composer.compose_named(&cli.mode, &request, &args)?;

    let search_algorithm = match &cli.algorithm {
        Some(name) => {
            let custom_args = match &cli.algo_args {
                Some(path) => read_json_file::<AlgorithmArgs>(path)?,
                None => AlgorithmArgs::new(),
            };
            let selection = select(name, &cli.algo_args_mode, &search_space, custom_args)?;
            Some(SelectionReport::from(selection))
        }
        None => None,
    };

    info!("Composed {} hyperparameters", search_space.len());
    let report = SpaceReport {
        search_space,
        search_algorithm,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
