//! Search space definitions shared by the composer and the algorithm selector.
//!
//! A [`SearchSpace`] maps hyperparameter names to either a discrete candidate
//! list or a continuous `{l, u, space}` range. On the wire it is a JSON object
//! in insertion order, which is the shape the tuning runtime consumes.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Window edge used when a bound omits `l` or `u`.
pub const DEFAULT_BOUND: f64 = 100_000.0;

/// A single discrete candidate value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HpValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl HpValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// Numeric ordering across integers and floats. `None` when either side is text.
    pub fn numeric_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.as_f64()?.total_cmp(&other.as_f64()?))
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Int(v) => serde_json::Value::from(*v),
            Self::Float(v) => serde_json::Value::from(*v),
            Self::Text(v) => serde_json::Value::from(v.as_str()),
        }
    }
}

impl PartialEq for HpValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Text(_), _) | (_, Self::Text(_)) => false,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl From<i64> for HpValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for HpValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for HpValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl fmt::Display for HpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Sampling scale of a continuous range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Log,
    Linear,
}

/// Continuous range descriptor, serialized as `{l, u, space}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    #[serde(rename = "l")]
    pub lower: f64,
    #[serde(rename = "u")]
    pub upper: f64,
    pub space: Scale,
}

/// How one hyperparameter is searched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpaceEntry {
    /// Ordered discrete candidates.
    Choice(Vec<HpValue>),
    /// Bounded continuous range.
    Range(RangeSpec),
}

impl SpaceEntry {
    pub fn choice<V: Into<HpValue>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Choice(values.into_iter().map(Into::into).collect())
    }

    pub fn log(lower: f64, upper: f64) -> Self {
        Self::Range(RangeSpec { lower, upper, space: Scale::Log })
    }

    pub fn linear(lower: f64, upper: f64) -> Self {
        Self::Range(RangeSpec { lower, upper, space: Scale::Linear })
    }

    pub fn as_choice(&self) -> Option<&[HpValue]> {
        match self {
            Self::Choice(values) => Some(values),
            Self::Range(_) => None,
        }
    }

    /// Number of discrete candidates (`None` for continuous ranges).
    pub fn cardinality(&self) -> Option<usize> {
        self.as_choice().map(<[HpValue]>::len)
    }
}

/// A single named dimension of the search space.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDef {
    pub name: String,
    pub entry: SpaceEntry,
}

/// The full search space: hyperparameters in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchSpace {
    pub parameters: Vec<ParameterDef>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_choice<V: Into<HpValue>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.insert(name, SpaceEntry::choice(values));
        self
    }

    pub fn add_log_range(mut self, name: impl Into<String>, lower: f64, upper: f64) -> Self {
        self.insert(name, SpaceEntry::log(lower, upper));
        self
    }

    pub fn add_linear_range(mut self, name: impl Into<String>, lower: f64, upper: f64) -> Self {
        self.insert(name, SpaceEntry::linear(lower, upper));
        self
    }

    /// Insert or replace an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, entry: SpaceEntry) {
        let name = name.into();
        match self.parameters.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.entry = entry,
            None => self.parameters.push(ParameterDef { name, entry }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SpaceEntry> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.entry)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpaceEntry)> {
        self.parameters.iter().map(|p| (p.name.as_str(), &p.entry))
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Total number of grid points (returns `None` if any parameter is a
    /// continuous range).
    pub fn grid_size(&self) -> Option<usize> {
        let mut total: usize = 1;
        for param in &self.parameters {
            total = total.checked_mul(param.entry.cardinality()?)?;
        }
        Some(total)
    }
}

impl Serialize for SearchSpace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.parameters.len()))?;
        for param in &self.parameters {
            map.serialize_entry(&param.name, &param.entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SearchSpace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpaceVisitor;

        impl<'de> Visitor<'de> for SpaceVisitor {
            type Value = SearchSpace;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from hyperparameter name to a candidate list or {l, u, space}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SearchSpace, A::Error> {
                let mut space = SearchSpace::new();
                while let Some((name, entry)) = access.next_entry::<String, SpaceEntry>()? {
                    space.insert(name, entry);
                }
                Ok(space)
            }
        }

        deserializer.deserialize_map(SpaceVisitor)
    }
}

/// Optional lower/upper cutoffs for one discrete hyperparameter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bound {
    #[serde(rename = "l", default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(rename = "u", default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

impl Bound {
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    pub fn lower_or_default(&self) -> f64 {
        self.lower.unwrap_or(-DEFAULT_BOUND)
    }

    pub fn upper_or_default(&self) -> f64 {
        self.upper.unwrap_or(DEFAULT_BOUND)
    }
}

/// Per-hyperparameter bounds, keyed by name.
pub type BoundSpec = BTreeMap<String, Bound>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values_compare_across_variants() {
        assert_eq!(HpValue::Int(3), HpValue::Float(3.0));
        assert_ne!(HpValue::Int(3), HpValue::Text("3".into()));
        assert_eq!(
            HpValue::Int(2).numeric_cmp(&HpValue::Float(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(HpValue::from("linear").numeric_cmp(&HpValue::Int(1)), None);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut space = SearchSpace::new()
            .add_choice("learning_rate", [1e-5, 2e-5])
            .add_choice("per_device_train_batch_size", [16_i64, 32]);
        space.insert("learning_rate", SpaceEntry::log(1e-6, 1e-3));

        let names: Vec<&str> = space.names().collect();
        assert_eq!(names, vec!["learning_rate", "per_device_train_batch_size"]);
        assert_eq!(space.get("learning_rate"), Some(&SpaceEntry::log(1e-6, 1e-3)));
    }

    #[test]
    fn grid_size_none_for_ranges() {
        let space = SearchSpace::new()
            .add_choice("a", [1_i64, 2, 3])
            .add_choice("b", [0.1, 0.2]);
        assert_eq!(space.grid_size(), Some(6));

        let space = space.add_linear_range("warmup_ratio", 0.0, 0.3);
        assert_eq!(space.grid_size(), None);
    }

    #[test]
    fn search_space_json_shape() {
        let space = SearchSpace::new()
            .add_log_range("learning_rate", 1e-6, 1e-3)
            .add_choice("per_device_train_batch_size", [4_i64, 8]);

        let json = serde_json::to_value(&space).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "learning_rate": {"l": 1e-6, "u": 1e-3, "space": "log"},
                "per_device_train_batch_size": [4, 8]
            })
        );
    }

    #[test]
    fn search_space_parses_in_order() {
        let raw = r#"{"weight_decay": {"l": 0.0, "u": 0.3, "space": "linear"},
                      "num_train_epochs": [3, 10],
                      "lr_scheduler_type": ["linear", "cosine"]}"#;
        let space: SearchSpace = serde_json::from_str(raw).unwrap();

        let names: Vec<&str> = space.names().collect();
        assert_eq!(names, vec!["weight_decay", "num_train_epochs", "lr_scheduler_type"]);
        assert_eq!(space.get("weight_decay"), Some(&SpaceEntry::linear(0.0, 0.3)));
        assert_eq!(
            space.get("lr_scheduler_type").and_then(SpaceEntry::as_choice),
            Some(&[HpValue::from("linear"), HpValue::from("cosine")][..])
        );
    }

    #[test]
    fn bound_defaults_apply_per_side() {
        let bounds: BoundSpec =
            serde_json::from_str(r#"{"learning_rate": {"u": 1e-4}, "warmup_ratio": {}}"#).unwrap();

        let lr = bounds["learning_rate"];
        assert_eq!(lr.lower_or_default(), -DEFAULT_BOUND);
        assert_eq!(lr.upper_or_default(), 1e-4);

        let warmup = bounds["warmup_ratio"];
        assert_eq!(warmup, Bound::default());
        assert_eq!(warmup.upper_or_default(), DEFAULT_BOUND);
    }
}
