//! Grid expansion: materialize `{name: {grid_search: [...]}}` mappings into an
//! explicit list of configurations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ft_types::{HpValue, HpoError, HpoResult, SearchSpace};

/// Candidate list for one grid dimension, in the tuning runtime's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    pub grid_search: Vec<HpValue>,
}

pub type GridConfig = BTreeMap<String, GridAxis>;

/// One fully specified trial configuration.
pub type Configuration = BTreeMap<String, HpValue>;

/// Grid description of a space. Every entry must be discrete.
pub fn grid_config(space: &SearchSpace) -> HpoResult<GridConfig> {
    space
        .iter()
        .map(|(name, entry)| -> HpoResult<(String, GridAxis)> {
            let values = entry.as_choice().ok_or_else(|| HpoError::InvalidArgument {
                name: name.to_string(),
                message: "continuous range cannot be gridded".to_string(),
            })?;
            Ok((name.to_string(), GridAxis { grid_search: values.to_vec() }))
        })
        .collect()
}

/// Cartesian product of all grid axes.
pub fn grid_to_list(grid: &GridConfig) -> Vec<Configuration> {
    let mut result: Vec<Configuration> = vec![Configuration::new()];
    for (name, axis) in grid {
        let mut next = Vec::with_capacity(result.len() * axis.grid_search.len());
        for existing in &result {
            for value in &axis.grid_search {
                let mut combo = existing.clone();
                combo.insert(name.clone(), value.clone());
                next.push(combo);
            }
        }
        result = next;
    }
    result
}
