//! Pushdown configuration.

use crate::planner::shape::RuleShape;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_MAX_PASSES: usize = 8;

/// Which rules run and how strictly projections are treated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PushdownConfig {
    /// Enabled rule shapes
    pub shapes: Vec<RuleShape>,
    /// Decline bottom projections with computed outputs
    pub strict_projections: bool,
    /// Upper bound on optimizer passes over a plan
    pub max_passes: usize,
}

impl Default for PushdownConfig {
    fn default() -> Self {
        Self {
            shapes: RuleShape::ALL.to_vec(),
            strict_projections: false,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl PushdownConfig {
    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: PushdownConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            bail!("max_passes must be at least 1");
        }
        Ok(())
    }

    /// Enabled shapes without duplicates, longest chain first
    pub fn ordered_shapes(&self) -> Vec<RuleShape> {
        let mut shapes: Vec<RuleShape> = Vec::with_capacity(self.shapes.len());
        for shape in &self.shapes {
            if !shapes.contains(shape) {
                shapes.push(*shape);
            }
        }
        shapes.sort_by_key(|shape| std::cmp::Reverse(shape.depth()));
        shapes
    }
}
