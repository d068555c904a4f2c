//! Entry point for analysing finished HPO runs. Only the argument surface
//! exists so far: it validates and logs its inputs, then exits.

use clap::{Parser, ValueEnum};
use std::path::{Component, Path, PathBuf};
use tracing::info;

use ft_cli::{init_logging, LoggingConfig};

#[derive(Parser)]
#[command(name = "run_analysis")]
#[command(about = "Analyse HPO results", long_about = None)]
struct Cli {
    /// Server the results were produced on
    #[arg(long = "server_name", value_enum)]
    server_name: ServerName,

    /// Azure storage key
    #[arg(long = "azure_key")]
    azure_key: Option<String>,

    /// Analysis mode
    #[arg(long, value_enum)]
    mode: AnalysisMode,

    /// Directory holding key.json (defaults to ../../)
    #[arg(long = "key_path")]
    key_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log_level", default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ServerName {
    Tmdev,
    Dgx,
    Azureml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AnalysisMode {
    Summary,
    Analysis,
    Plot,
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() && !normalized.has_root() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig {
        log_level: cli.log_level.clone(),
        ..LoggingConfig::default()
    });

    let key_path = match cli.key_path {
        Some(path) => path,
        None => normalize(&std::env::current_dir()?.join("../..")),
    };

    info!(
        server = ?cli.server_name,
        mode = ?cli.mode,
        azure_key = cli.azure_key.is_some(),
        key_path = %key_path.display(),
        "run_analysis started"
    );
    Ok(())
}
