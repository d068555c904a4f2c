use serde::{Deserialize, Serialize};

/// Fine-tuning task family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    SeqClassification,
    SeqRegression,
}

impl Task {
    /// Tasks whose inputs go through the text tokenizer.
    pub fn is_nlp_task(&self) -> bool {
        matches!(self, Self::SeqClassification | Self::SeqRegression)
    }
}

impl std::str::FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seq-classification" | "seq-classif" => Ok(Self::SeqClassification),
            "seq-regression" => Ok(Self::SeqRegression),
            _ => Err(format!(
                "Unknown task: {s}. Use: seq-classification, seq-regression"
            )),
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SeqClassification => write!(f, "seq-classification"),
            Self::SeqRegression => write!(f, "seq-regression"),
        }
    }
}
