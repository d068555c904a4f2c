//! # ft-hpo
//!
//! Search-space composition and search-algorithm selection for fine-tuning
//! pretrained language models.
//!
//! Provides per-model grid providers, the search-space composer (grid unions,
//! bounded unions, generic spaces), the search-algorithm selector with
//! per-algorithm argument allow-lists, grid expansion, and helpers for
//! splitting trial configurations and tokenizing text inputs.

mod algo;
mod compose;
mod grid;
mod provider;
mod tokenize;
mod trainer;

pub use algo::{
    default_args, experiment_args, filter_args, select, select_algorithm, AlgorithmArgs,
    AlgorithmFailure, AlgorithmInstance, ArgsMode, SearchAlgo, Selection,
};
pub use compose::{
    custom_space, generic_grid_space, generic_space, merge_spaces, smoke_test_space,
    sorted_candidates, trim_sorted, BoundPolicy, ComposeArgs, SpaceComposer, SpaceMode,
    SpaceRequest, UNION_MODEL_TYPES,
};
pub use grid::{grid_config, grid_to_list, Configuration, GridAxis, GridConfig};
pub use provider::{BuiltinGridProvider, GridSpaceProvider, BUILTIN_MODEL_TYPES};
pub use tokenize::{tokenize_text, Encoding, TokenizedBatch, Tokenizer};
pub use trainer::{
    checkpoint_freq, is_trainer_field, num_labels, separate_config, trainer_default,
    TRAINER_FIELDS,
};
