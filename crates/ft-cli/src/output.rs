//! JSON documents read and written by the binaries.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use ft_hpo::{AlgorithmInstance, SearchAlgo, Selection};
use ft_types::SearchSpace;

/// Printed by `hpo_space`.
#[derive(Debug, Clone, Serialize)]
pub struct SpaceReport {
    pub search_space: SearchSpace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_algorithm: Option<SelectionReport>,
}

/// Serializable view of a [`Selection`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectionReport {
    Built {
        instance: AlgorithmInstance,
        dropped: Vec<String>,
    },
    External {
        algorithm: SearchAlgo,
    },
    Unavailable {
        algorithm: SearchAlgo,
        reason: String,
    },
}

impl From<Selection> for SelectionReport {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::Built { instance, dropped } => Self::Built { instance, dropped },
            Selection::External(algorithm) => Self::External { algorithm },
            Selection::Unavailable { algorithm, failure } => Self::Unavailable {
                algorithm,
                reason: failure.to_string(),
            },
        }
    }
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
