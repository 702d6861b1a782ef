use std::path::Path;

use anyhow::{ensure, Context, Result};
use geostore::DistanceMetric;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the resolver. Missing keys in a config file take
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Street candidates must score strictly above this.
    pub fuzzy_threshold: f64,
    /// Weight of the alias similarity in the street score.
    pub alias_weight: f64,
    /// Ranked street candidates kept per lookup.
    pub max_candidates: usize,
    /// Options listed in an ambiguous result.
    pub max_options: usize,
    /// Street suggestions listed in a no-match result.
    pub max_suggestions: usize,
    /// Radius around a corner within which a building marks a monoblock zone.
    pub nearby_radius: f64,
    /// How `nearby_radius` is measured.
    pub distance: DistanceMetric,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.30,
            alias_weight: 0.9,
            max_candidates: 5,
            max_options: 8,
            max_suggestions: 8,
            nearby_radius: 120.0,
            distance: DistanceMetric::Planar,
        }
    }
}

impl ResolverConfig {
    /// Read a JSON config file and validate it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!((0.0..=1.0).contains(&self.fuzzy_threshold), "fuzzy_threshold must lie in [0, 1], got {}", self.fuzzy_threshold);
        ensure!(self.alias_weight.is_finite() && self.alias_weight >= 0.0, "alias_weight must be finite and non-negative, got {}", self.alias_weight);
        ensure!(self.nearby_radius.is_finite() && self.nearby_radius > 0.0, "nearby_radius must be finite and positive, got {}", self.nearby_radius);
        ensure!(self.max_candidates > 0, "max_candidates must be positive");
        ensure!(self.max_options > 0, "max_options must be positive");
        ensure!(self.max_suggestions > 0, "max_suggestions must be positive");
        Ok(())
    }
}
