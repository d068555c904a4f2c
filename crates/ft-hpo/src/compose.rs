//! Search-space composition.
//!
//! Turns a search-space mode plus a model/dataset request into the
//! [`SearchSpace`] handed to the tuning runtime: unions of per-model grids,
//! bounded unions, fixed generic spaces, or a caller-supplied space.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

use ft_types::{Bound, BoundSpec, HpValue, HpoError, HpoResult, SearchSpace, SpaceEntry};

use crate::provider::{BuiltinGridProvider, GridSpaceProvider};
use crate::trainer::trainer_default;

/// Families whose grids are merged by the grid-union modes, in merge order.
pub const UNION_MODEL_TYPES: [&str; 3] = ["electra", "roberta", "bert"];

/// How a search space is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceMode {
    /// Union of the per-model grids plus trainer defaults (`uni`).
    #[serde(rename = "uni")]
    GridUnion,
    /// Fixed continuous ranges (`gnr`).
    #[serde(rename = "gnr")]
    Generic,
    /// One value per hyperparameter, for pipeline checks (`uni_test`).
    #[serde(rename = "uni_test")]
    SmokeTest,
    /// Caller-supplied space (`cus`).
    #[serde(rename = "cus")]
    Custom,
    /// Grid union trimmed by per-key bounds (`buni`).
    #[serde(rename = "buni")]
    BoundedGridUnion,
    /// Fixed discrete lists. Not in the string registry.
    #[serde(rename = "gnr_grid")]
    GenericGrid,
    /// Model grid narrowed to tighter ranges. Not in the string registry.
    #[serde(rename = "small")]
    Small,
}

impl SpaceMode {
    /// Modes reachable by name, in registry order.
    pub const REGISTERED: [SpaceMode; 5] = [
        Self::GridUnion,
        Self::Generic,
        Self::SmokeTest,
        Self::Custom,
        Self::BoundedGridUnion,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::GridUnion => "uni",
            Self::Generic => "gnr",
            Self::SmokeTest => "uni_test",
            Self::Custom => "cus",
            Self::BoundedGridUnion => "buni",
            Self::GenericGrid => "gnr_grid",
            Self::Small => "small",
        }
    }

    pub fn registered_keys() -> String {
        Self::REGISTERED
            .iter()
            .map(SpaceMode::key)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::str::FromStr for SpaceMode {
    type Err = HpoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::REGISTERED
            .into_iter()
            .find(|mode| mode.key() == s)
            .ok_or_else(|| HpoError::UnknownSearchSpaceMode {
                mode: s.to_string(),
                valid: Self::registered_keys(),
            })
    }
}

impl std::fmt::Display for SpaceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Which model and dataset a space is composed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceRequest {
    pub model_type: String,
    pub model_size: String,
    pub dataset: String,
    pub subdataset: Option<String>,
}

impl SpaceRequest {
    pub fn new(
        model_type: impl Into<String>,
        model_size: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Self {
        Self {
            model_type: model_type.into(),
            model_size: model_size.into(),
            dataset: dataset.into(),
            subdataset: None,
        }
    }

    pub fn with_subdataset(mut self, subdataset: impl Into<String>) -> Self {
        self.subdataset = Some(subdataset.into());
        self
    }
}

/// Mode-specific inputs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComposeArgs {
    /// Space returned by [`SpaceMode::Custom`].
    pub hpo_space: Option<SearchSpace>,
    /// Cutoffs applied by [`SpaceMode::BoundedGridUnion`].
    pub bound: Option<BoundSpec>,
}

impl ComposeArgs {
    pub fn with_hpo_space(mut self, space: SearchSpace) -> Self {
        self.hpo_space = Some(space);
        self
    }

    pub fn with_bound(mut self, bound: BoundSpec) -> Self {
        self.bound = Some(bound);
        self
    }
}

/// Trimming rule for bounded grid unions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundPolicy {
    /// Cut at the first value above `upper` and at the last value below
    /// `lower`. The value found below `lower` is kept.
    #[default]
    IndexScan,
    /// Keep exactly the values in `[lower, upper]`.
    Inclusive,
}

/// Builds search spaces from a grid provider.
pub struct SpaceComposer {
    provider: Box<dyn GridSpaceProvider>,
    bound_policy: BoundPolicy,
}

impl std::fmt::Debug for SpaceComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceComposer")
            .field("bound_policy", &self.bound_policy)
            .finish_non_exhaustive()
    }
}

impl Default for SpaceComposer {
    fn default() -> Self {
        Self::new(Box::new(BuiltinGridProvider::new()))
    }
}

impl SpaceComposer {
    pub fn new(provider: Box<dyn GridSpaceProvider>) -> Self {
        Self {
            provider,
            bound_policy: BoundPolicy::default(),
        }
    }

    pub fn with_bound_policy(mut self, policy: BoundPolicy) -> Self {
        self.bound_policy = policy;
        self
    }

    /// Compose the space for a mode given by its registry key.
    pub fn compose_named(
        &self,
        mode: &str,
        request: &SpaceRequest,
        args: &ComposeArgs,
    ) -> HpoResult<SearchSpace> {
        self.compose(mode.parse()?, request, args)
    }

    pub fn compose(
        &self,
        mode: SpaceMode,
        request: &SpaceRequest,
        args: &ComposeArgs,
    ) -> HpoResult<SearchSpace> {
        info!(
            "Composing {} search space for {} {} on {}",
            mode, request.model_type, request.model_size, request.dataset
        );
        let space = match mode {
            SpaceMode::Custom => custom_space(args)?,
            SpaceMode::GridUnion => self.grid_union(request)?,
            SpaceMode::BoundedGridUnion => {
                let bound = args
                    .bound
                    .as_ref()
                    .ok_or_else(|| HpoError::MissingArgument("bound".to_string()))?;
                self.bounded_grid_union(request, bound)?
            }
            SpaceMode::Generic => generic_space(),
            SpaceMode::GenericGrid => generic_grid_space(),
            SpaceMode::SmokeTest => smoke_test_space(),
            SpaceMode::Small => self.small(request)?,
        };
        debug!(
            "Composed {} hyperparameters: {:?}",
            space.len(),
            space.names().collect::<Vec<_>>()
        );
        Ok(space)
    }

    fn model_grid(&self, model_type: &str, request: &SpaceRequest) -> HpoResult<SearchSpace> {
        self.provider.grid_space(
            model_type,
            &request.model_size,
            &request.dataset,
            request.subdataset.as_deref(),
        )
    }

    /// Union of every family's grid. The trainer default of each known
    /// hyperparameter is always among the candidates.
    pub fn grid_union(&self, request: &SpaceRequest) -> HpoResult<SearchSpace> {
        let mut union = SearchSpace::new();
        for model_type in UNION_MODEL_TYPES {
            let grid = self.model_grid(model_type, request)?;
            merge_spaces(&mut union, &grid);

            let mut defaults = SearchSpace::new();
            for name in union.names() {
                if let Some(value) = trainer_default(name) {
                    defaults.insert(name, SpaceEntry::Choice(vec![value]));
                }
            }
            merge_spaces(&mut union, &defaults);
        }
        Ok(union)
    }

    /// Grid union with each bounded hyperparameter trimmed to its window.
    pub fn bounded_grid_union(
        &self,
        request: &SpaceRequest,
        bound: &BoundSpec,
    ) -> HpoResult<SearchSpace> {
        let mut space = self.grid_union(request)?;
        for (name, window) in bound {
            let entry = space
                .get(name)
                .ok_or_else(|| HpoError::UnknownHyperparameter(name.clone()))?;
            let sorted = sorted_candidates(name, entry)?;
            let trimmed = trim_sorted(&sorted, window, self.bound_policy);
            debug!(
                "Bounded {} from {} to {} candidates",
                name,
                sorted.len(),
                trimmed.len()
            );
            space.insert(name.as_str(), SpaceEntry::Choice(trimmed));
        }
        Ok(space)
    }

    /// The requested model's grid with the main training knobs narrowed.
    pub fn small(&self, request: &SpaceRequest) -> HpoResult<SearchSpace> {
        let grid = self.model_grid(&request.model_type, request)?;
        let mut space = SearchSpace::new();
        for (name, entry) in grid.iter() {
            let narrowed = match name {
                // A single fixed learning rate is kept; lists and ranges are narrowed.
                "learning_rate" if !matches!(entry.cardinality(), Some(0 | 1)) => {
                    SpaceEntry::log(3e-5, 1.5e-4)
                }
                "num_train_epochs" => SpaceEntry::linear(2.0, 4.0),
                "per_device_train_batch_size" => SpaceEntry::choice([16_i64, 32, 64]),
                "warmup_ratio" => SpaceEntry::linear(0.0, 0.2),
                "weight_decay" => SpaceEntry::linear(0.0, 0.3),
                _ => entry.clone(),
            };
            space.insert(name, narrowed);
        }
        Ok(space)
    }
}

/// The caller-supplied space, unchanged.
pub fn custom_space(args: &ComposeArgs) -> HpoResult<SearchSpace> {
    args.hpo_space
        .clone()
        .ok_or_else(|| HpoError::MissingArgument("hpo_space".to_string()))
}

pub fn generic_space() -> SearchSpace {
    SearchSpace::new()
        .add_log_range("learning_rate", 1e-6, 1e-3)
        .add_log_range("num_train_epochs", 1.0, 10.0)
        .add_choice("per_device_train_batch_size", [4_i64, 8, 16, 32, 48])
        .add_linear_range("warmup_ratio", 0.0, 0.3)
        .add_linear_range("weight_decay", 0.0, 0.3)
}

pub fn generic_grid_space() -> SearchSpace {
    SearchSpace::new()
        .add_choice(
            "learning_rate",
            [1e-5, 2e-5, 3e-5, 4e-5, 5e-5, 1e-4, 1.5e-4],
        )
        .add_choice("num_train_epochs", [3_i64, 10])
        .add_choice("per_device_train_batch_size", [16_i64, 32])
        .add_choice(
            "warmup_ratio",
            [HpValue::Int(0), HpValue::Float(0.06), HpValue::Float(0.1)],
        )
        .add_choice("weight_decay", [HpValue::Int(0), HpValue::Float(0.1)])
}

pub fn smoke_test_space() -> SearchSpace {
    SearchSpace::new()
        .add_choice("learning_rate", [1e-5])
        .add_choice("weight_decay", [0.0])
        .add_choice("adam_epsilon", [1e-8])
        .add_choice("warmup_ratio", [0.1])
        .add_choice("per_device_train_batch_size", [2_i64])
        .add_choice("hidden_dropout_prob", [0.1])
        .add_choice("attention_probs_dropout_prob", [0.1])
        .add_choice("num_train_epochs", [0.1])
}

/// Merge `other` into `base`. Candidate lists are unioned in order with
/// numeric duplicates dropped. An existing range absorbs incoming candidates;
/// an incoming range replaces whatever was there.
pub fn merge_spaces(base: &mut SearchSpace, other: &SearchSpace) {
    for (name, incoming) in other.iter() {
        let merged = match (base.get(name), incoming) {
            (Some(SpaceEntry::Choice(existing)), SpaceEntry::Choice(extra)) => {
                let mut values = existing.clone();
                for value in extra {
                    if !values.contains(value) {
                        values.push(value.clone());
                    }
                }
                SpaceEntry::Choice(values)
            }
            (Some(existing @ SpaceEntry::Range(_)), SpaceEntry::Choice(_)) => existing.clone(),
            _ => incoming.clone(),
        };
        base.insert(name, merged);
    }
}

/// Candidates of a discrete entry in ascending numeric order.
pub fn sorted_candidates(name: &str, entry: &SpaceEntry) -> HpoResult<Vec<HpValue>> {
    let values = entry.as_choice().ok_or_else(|| HpoError::NotSortable {
        name: name.to_string(),
        reason: "continuous range has no candidate list".to_string(),
    })?;
    if let Some(text) = values.iter().find(|value| !value.is_numeric()) {
        return Err(HpoError::NotSortable {
            name: name.to_string(),
            reason: format!("non-numeric candidate {text}"),
        });
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.numeric_cmp(b).unwrap_or(Ordering::Equal));
    Ok(sorted)
}

/// Trim an ascending candidate list to a bound window.
pub fn trim_sorted(sorted: &[HpValue], bound: &Bound, policy: BoundPolicy) -> Vec<HpValue> {
    let lower = bound.lower_or_default();
    let upper = bound.upper_or_default();
    let above = |value: &HpValue| value.as_f64().is_some_and(|v| v > upper);
    let below = |value: &HpValue| value.as_f64().is_some_and(|v| v < lower);

    match policy {
        BoundPolicy::IndexScan => {
            let upper_id = sorted.iter().position(above).unwrap_or(sorted.len());
            let lower_id = sorted.iter().rposition(below).unwrap_or(0);
            if lower_id >= upper_id {
                return Vec::new();
            }
            sorted[lower_id..upper_id].to_vec()
        }
        BoundPolicy::Inclusive => sorted
            .iter()
            .filter(|value| !above(*value) && !below(*value))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(values: &[f64]) -> Vec<HpValue> {
        values.iter().copied().map(HpValue::Float).collect()
    }

    fn request() -> SpaceRequest {
        SpaceRequest::new("electra", "base", "glue").with_subdataset("rte")
    }

    /// Provider returning the same fixed grid for every family.
    struct FixedProvider(SearchSpace);

    impl GridSpaceProvider for FixedProvider {
        fn grid_space(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: Option<&str>,
        ) -> HpoResult<SearchSpace> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn mode_registry_keys() {
        assert_eq!("uni".parse::<SpaceMode>().unwrap(), SpaceMode::GridUnion);
        assert_eq!("buni".parse::<SpaceMode>().unwrap(), SpaceMode::BoundedGridUnion);
        assert_eq!("uni_test".parse::<SpaceMode>().unwrap(), SpaceMode::SmokeTest);
        assert!("small".parse::<SpaceMode>().is_err());
    }

    #[test]
    fn mode_serializes_as_registry_key() {
        for mode in SpaceMode::REGISTERED {
            let json = serde_json::to_value(mode).unwrap();
            assert_eq!(json, serde_json::Value::from(mode.key()));
            assert_eq!(serde_json::from_value::<SpaceMode>(json).unwrap(), mode);
        }
        assert_eq!(
            serde_json::to_value(SpaceMode::GenericGrid).unwrap(),
            serde_json::Value::from("gnr_grid")
        );
    }

    #[test]
    fn unknown_mode_names_valid_set() {
        let composer = SpaceComposer::default();
        let err = composer
            .compose_named("not_a_mode", &request(), &ComposeArgs::default())
            .unwrap_err();
        match err {
            HpoError::UnknownSearchSpaceMode { mode, valid } => {
                assert_eq!(mode, "not_a_mode");
                assert_eq!(valid, "uni, gnr, uni_test, cus, buni");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn custom_requires_space() {
        let composer = SpaceComposer::default();
        let err = composer
            .compose(SpaceMode::Custom, &request(), &ComposeArgs::default())
            .unwrap_err();
        assert!(matches!(err, HpoError::MissingArgument(ref name) if name == "hpo_space"));

        let space = SearchSpace::new().add_choice("seed", [1_i64, 2]);
        let args = ComposeArgs::default().with_hpo_space(space.clone());
        let composed = composer.compose(SpaceMode::Custom, &request(), &args).unwrap();
        assert_eq!(composed, space);
    }

    #[test]
    fn grid_union_merges_families_and_defaults() {
        let composer = SpaceComposer::default();
        let space = composer.grid_union(&request()).unwrap();

        let lr = space.get("learning_rate").and_then(SpaceEntry::as_choice).unwrap();
        for expected in [5e-5, 1e-4, 1.5e-4, 1e-5, 2e-5, 3e-5] {
            assert!(lr.contains(&HpValue::Float(expected)), "missing {expected}");
        }
        // 5e-5 is both an electra candidate and the trainer default
        assert_eq!(lr.iter().filter(|v| **v == HpValue::Float(5e-5)).count(), 1);

        let batch = space
            .get("per_device_train_batch_size")
            .and_then(SpaceEntry::as_choice)
            .unwrap();
        assert!(batch.contains(&HpValue::Int(8)));

        // dropout has no trainer default and stays as published
        assert_eq!(
            space.get("hidden_dropout_prob"),
            Some(&SpaceEntry::choice([0.1]))
        );
    }

    #[test]
    fn bounded_union_requires_bound() {
        let composer = SpaceComposer::default();
        let err = composer
            .compose(SpaceMode::BoundedGridUnion, &request(), &ComposeArgs::default())
            .unwrap_err();
        assert!(matches!(err, HpoError::MissingArgument(ref name) if name == "bound"));
    }

    #[test]
    fn bounded_union_index_scan_keeps_value_below_lower() {
        let grid = SearchSpace::new()
            .add_choice("learning_rate", [5e-4, 1e-6, 1e-4, 1e-5, 5e-5]);
        let composer = SpaceComposer::new(Box::new(FixedProvider(grid)));

        let mut bound = BoundSpec::new();
        bound.insert("learning_rate".into(), Bound::new(Some(1e-5), Some(1e-4)));
        let args = ComposeArgs::default().with_bound(bound);

        let space = composer
            .compose(SpaceMode::BoundedGridUnion, &request(), &args)
            .unwrap();
        assert_eq!(
            space.get("learning_rate"),
            Some(&SpaceEntry::Choice(floats(&[1e-6, 1e-5, 5e-5, 1e-4])))
        );
    }

    #[test]
    fn bounded_union_inclusive_policy() {
        let grid = SearchSpace::new()
            .add_choice("learning_rate", [1e-6, 1e-5, 5e-5, 1e-4, 5e-4]);
        let composer = SpaceComposer::new(Box::new(FixedProvider(grid)))
            .with_bound_policy(BoundPolicy::Inclusive);

        let mut bound = BoundSpec::new();
        bound.insert("learning_rate".into(), Bound::new(Some(1e-5), Some(1e-4)));

        let space = composer.bounded_grid_union(&request(), &bound).unwrap();
        assert_eq!(
            space.get("learning_rate"),
            Some(&SpaceEntry::Choice(floats(&[1e-5, 5e-5, 1e-4])))
        );
    }

    #[test]
    fn bounded_union_rejects_unknown_and_ranges() {
        let grid = SearchSpace::new().add_linear_range("warmup_ratio", 0.0, 0.3);
        let composer = SpaceComposer::new(Box::new(FixedProvider(grid)));

        let mut bound = BoundSpec::new();
        bound.insert("seed".into(), Bound::default());
        assert!(matches!(
            composer.bounded_grid_union(&request(), &bound),
            Err(HpoError::UnknownHyperparameter(_))
        ));

        let mut bound = BoundSpec::new();
        bound.insert("warmup_ratio".into(), Bound::new(None, Some(0.1)));
        assert!(matches!(
            composer.bounded_grid_union(&request(), &bound),
            Err(HpoError::NotSortable { .. })
        ));
    }

    #[test]
    fn index_scan_edge_cases() {
        let sorted = floats(&[1.0, 2.0, 3.0]);

        // everything below lower: the last value survives the scan
        let all_low = Bound::new(Some(10.0), None);
        assert_eq!(trim_sorted(&sorted, &all_low, BoundPolicy::IndexScan), floats(&[3.0]));
        assert!(trim_sorted(&sorted, &all_low, BoundPolicy::Inclusive).is_empty());

        // everything above upper
        let all_high = Bound::new(None, Some(0.5));
        assert!(trim_sorted(&sorted, &all_high, BoundPolicy::IndexScan).is_empty());

        // default window keeps everything
        assert_eq!(trim_sorted(&sorted, &Bound::default(), BoundPolicy::IndexScan), sorted);
    }

    #[test]
    fn fixed_spaces_ignore_request() {
        let composer = SpaceComposer::default();
        let other = SpaceRequest::new("funnel", "xlarge", "squad");
        let args = ComposeArgs::default();

        for mode in [SpaceMode::Generic, SpaceMode::GenericGrid, SpaceMode::SmokeTest] {
            let a = composer.compose(mode, &request(), &args).unwrap();
            let b = composer.compose(mode, &other, &args).unwrap();
            assert_eq!(a, b, "{mode} depends on the request");
        }

        let smoke = smoke_test_space();
        assert_eq!(smoke.len(), 8);
        assert!(smoke.iter().all(|(_, entry)| entry.cardinality() == Some(1)));
        assert_eq!(generic_space().len(), 5);
        assert_eq!(generic_grid_space().grid_size(), Some(7 * 2 * 2 * 3 * 2));
    }

    #[test]
    fn small_narrows_training_knobs() {
        let composer = SpaceComposer::default();
        let space = composer.small(&request()).unwrap();

        assert_eq!(space.get("learning_rate"), Some(&SpaceEntry::log(3e-5, 1.5e-4)));
        assert_eq!(space.get("num_train_epochs"), Some(&SpaceEntry::linear(2.0, 4.0)));
        assert_eq!(
            space.get("per_device_train_batch_size"),
            Some(&SpaceEntry::choice([16_i64, 32, 64]))
        );
        assert_eq!(space.get("warmup_ratio"), Some(&SpaceEntry::linear(0.0, 0.2)));
        assert_eq!(space.get("weight_decay"), Some(&SpaceEntry::linear(0.0, 0.3)));
        assert_eq!(space.get("adam_epsilon"), Some(&SpaceEntry::choice([1e-6])));
    }

    #[test]
    fn small_keeps_single_learning_rate() {
        let composer = SpaceComposer::default();
        let large = SpaceRequest::new("electra", "large", "glue");
        let space = composer.compose(SpaceMode::Small, &large, &ComposeArgs::default()).unwrap();
        assert_eq!(space.get("learning_rate"), Some(&SpaceEntry::choice([5e-5])));
    }

    #[test]
    fn small_narrows_learning_rate_range() {
        let grid = SearchSpace::new()
            .add_log_range("learning_rate", 1e-6, 1e-3)
            .add_choice("seed", [42_i64]);
        let composer = SpaceComposer::new(Box::new(FixedProvider(grid)));
        let space = composer.small(&request()).unwrap();
        assert_eq!(space.get("learning_rate"), Some(&SpaceEntry::log(3e-5, 1.5e-4)));
        assert_eq!(space.get("seed"), Some(&SpaceEntry::choice([42_i64])));
    }

    #[test]
    fn merge_keeps_existing_ranges() {
        let mut base = SearchSpace::new()
            .add_linear_range("warmup_ratio", 0.0, 0.3)
            .add_choice("seed", [1_i64])
            .add_choice("weight_decay", [0.0]);
        let other = SearchSpace::new()
            .add_choice("warmup_ratio", [0.1])
            .add_choice("seed", [1_i64, 2])
            .add_linear_range("weight_decay", 0.0, 0.3)
            .add_choice("adam_epsilon", [1e-6]);
        merge_spaces(&mut base, &other);

        assert_eq!(base.get("warmup_ratio"), Some(&SpaceEntry::linear(0.0, 0.3)));
        assert_eq!(base.get("seed"), Some(&SpaceEntry::choice([1_i64, 2])));
        assert_eq!(base.get("weight_decay"), Some(&SpaceEntry::linear(0.0, 0.3)));
        let names: Vec<&str> = base.names().collect();
        assert_eq!(names, vec!["warmup_ratio", "seed", "weight_decay", "adam_epsilon"]);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_bounded_output_is_contiguous_run(
            values in prop::collection::vec(-1000i64..1000, 0..20),
            lower in prop::option::of(-1200i64..1200),
            upper in prop::option::of(-1200i64..1200),
        ) {
            let entry = SpaceEntry::choice(values.clone());
            let sorted = sorted_candidates("x", &entry).unwrap();
            let bound = Bound::new(lower.map(|v| v as f64), upper.map(|v| v as f64));
            let trimmed = trim_sorted(&sorted, &bound, BoundPolicy::IndexScan);

            if !trimmed.is_empty() {
                prop_assert!(sorted.windows(trimmed.len()).any(|w| w == &trimmed[..]));
            }
            let upper = bound.upper_or_default();
            let lower = bound.lower_or_default();
            for value in &trimmed {
                prop_assert!(value.as_f64().unwrap() <= upper);
            }
            for value in trimmed.iter().skip(1) {
                prop_assert!(value.as_f64().unwrap() >= lower);
            }
        }

        #[test]
        fn prop_inclusive_output_within_window(
            values in prop::collection::vec(-1000i64..1000, 0..20),
            lower in -1200i64..1200,
            upper in -1200i64..1200,
        ) {
            let sorted = sorted_candidates("x", &SpaceEntry::choice(values)).unwrap();
            let bound = Bound::new(Some(lower as f64), Some(upper as f64));
            for value in trim_sorted(&sorted, &bound, BoundPolicy::Inclusive) {
                let v = value.as_f64().unwrap();
                prop_assert!(v >= lower as f64 && v <= upper as f64);
            }
        }

        #[test]
        fn prop_default_window_keeps_everything(
            values in prop::collection::vec(-99_999i64..99_999, 0..20),
        ) {
            let sorted = sorted_candidates("x", &SpaceEntry::choice(values)).unwrap();
            let trimmed = trim_sorted(&sorted, &Bound::default(), BoundPolicy::IndexScan);
            prop_assert_eq!(trimmed, sorted);
        }
    }
}
