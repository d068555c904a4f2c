//! Shared plumbing for the `hpo_space` and `run_analysis` binaries.

pub mod logging;
pub mod output;
pub mod run_args;

pub use logging::{init_logging, LoggingConfig};
pub use output::{read_json_file, SelectionReport, SpaceReport};
pub use run_args::RunArgs;
