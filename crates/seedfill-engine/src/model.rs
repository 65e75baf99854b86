use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-model seeding configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Number of records to create. `None` falls back to the engine default.
    pub count: Option<u64>,
    /// Field names to leave out of every generated row.
    pub empty_fields: BTreeSet<String>,
}

impl SeedConfig {
    pub fn with_count(count: u64) -> Self {
        Self {
            count: Some(count),
            empty_fields: BTreeSet::new(),
        }
    }
}

/// Per-run configuration: model name to its seeding config.
pub type SeedPlan = BTreeMap<String, SeedConfig>;

/// Policy for the record count of models that do not set one.
///
/// Both historical behaviors are available: a fixed constant and a uniform
/// draw per generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountDefault {
    Fixed(u64),
    Uniform { min: u64, max: u64 },
}

impl CountDefault {
    pub fn draw(&self, rng: &mut impl Rng) -> u64 {
        match self {
            CountDefault::Fixed(count) => *count,
            CountDefault::Uniform { min, max } => rng.random_range(*min..=*max),
        }
    }
}

impl Default for CountDefault {
    fn default() -> Self {
        CountDefault::Fixed(20)
    }
}

/// Options for the seeding engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedOptions {
    /// Record count for models whose config leaves `count` unset.
    pub default_count: CountDefault,
    /// Maximum number of full passes over the pending set before the run
    /// is declared stalled.
    pub max_sweeps: u32,
    /// Seed for the run RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            default_count: CountDefault::default(),
            max_sweeps: 32,
            seed: None,
        }
    }
}

/// Summary of one seeded model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    pub model: String,
    pub rows_inserted: u64,
    /// Sweep on which the model was fully populated (1-based).
    pub sweep: u32,
}

/// Report for a seeding run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedReport {
    pub models: Vec<ModelReport>,
    pub sweeps: u32,
    pub rows_total: u64,
}
