// Copyright 2025 Lars Brubaker
// License: MIT
//
// Tunables for triangulation and path search, loadable from TOML.
// Every field has a default so a partial file (or none at all) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geom::Real;

mod defaults {
    use crate::geom::Real;

    pub fn bounding_margin() -> Real {
        0.3
    }
    pub fn max_iterations() -> usize {
        100_000
    }
    pub fn equal_epsilon() -> Real {
        0.001
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub triangulation: TriangulationConfig,

    #[serde(default)]
    pub pathfinding: PathfindingConfig,
}

impl NavConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Sweep settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TriangulationConfig {
    /// Fraction of the input extent by which the two artificial bounding
    /// points sit outside the input.
    #[serde(default = "defaults::bounding_margin")]
    pub bounding_margin: Real,

    /// Abort with `StepLimitExceeded` after this many sweep steps.
    #[serde(default)]
    pub step_limit: Option<usize>,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            bounding_margin: defaults::bounding_margin(),
            step_limit: None,
        }
    }
}

/// Path search and smoothing settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PathfindingConfig {
    #[serde(default)]
    pub astar: AStarSettings,

    #[serde(default)]
    pub funnel: FunnelSettings,
}

/// Edge cost used by A*.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMetric {
    /// Centroid distance.
    #[default]
    Euclidean,
    /// Centroid distance truncated to a whole number.
    Truncated,
}

impl CostMetric {
    #[inline]
    pub fn apply(self, d: Real) -> Real {
        match self {
            CostMetric::Euclidean => d,
            CostMetric::Truncated => d.trunc(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AStarSettings {
    /// Maximum nodes to expand before giving up.
    #[serde(default = "defaults::max_iterations")]
    pub max_iterations: usize,

    #[serde(default)]
    pub cost: CostMetric,
}

impl Default for AStarSettings {
    fn default() -> Self {
        Self {
            max_iterations: defaults::max_iterations(),
            cost: CostMetric::Euclidean,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunnelSettings {
    /// Distance under which two funnel points count as the same point.
    #[serde(default = "defaults::equal_epsilon")]
    pub equal_epsilon: Real,
}

impl Default for FunnelSettings {
    fn default() -> Self {
        Self {
            equal_epsilon: defaults::equal_epsilon(),
        }
    }
}
