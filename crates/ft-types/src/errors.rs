use thiserror::Error;

/// Main error type for search-space composition and algorithm selection
#[derive(Error, Debug)]
pub enum HpoError {
    #[error("Unrecognized search space mode {mode}, mode name should be one of {valid}")]
    UnknownSearchSpaceMode { mode: String, valid: String },

    #[error("Unrecognized search algorithm {algorithm}, algorithm name should be one of {valid}")]
    UnknownSearchAlgorithm { algorithm: String, valid: String },

    #[error("Unrecognized model type {model_type}, model type should be one of {valid}")]
    UnknownModelType { model_type: String, valid: String },

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Precondition violated: {0}")]
    PreconditionViolated(String),

    #[error("Hyperparameter not found in search space: {0}")]
    UnknownHyperparameter(String),

    #[error("Candidates for {name} cannot be sorted: {reason}")]
    NotSortable { name: String, reason: String },

    #[error("Invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for HPO operations
pub type HpoResult<T> = Result<T, HpoError>;

/// Macro for creating precondition errors
#[macro_export]
macro_rules! precondition_error {
    ($($arg:tt)*) => {
        $crate::HpoError::PreconditionViolated(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::HpoError::Config(format!($($arg)*))
    };
}
