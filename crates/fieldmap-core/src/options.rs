//! Engine options and their TOML configuration file.
//!
//! ```toml
//! [matching]
//! name_weight = 0.7
//! type_weight = 0.3
//! fuzzy_threshold = 0.6
//! oracle_policy = "validated"
//! strategy = "tiered"
//!
//! [limits]
//! max_depth = 64
//!
//! [synonyms]
//! groups = [["customer", "client"], ["addr", "address"]]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::DEFAULT_MAX_DEPTH;
use crate::error::{Result, SchemaError};
use crate::oracle::SynonymTable;
use crate::score::{NAME_WEIGHT, ScoreWeights, TYPE_WEIGHT};

/// Default strict lower bound for a fuzzy-tier match.
pub const FUZZY_THRESHOLD: f64 = 0.6;

/// How pairs returned by the semantic oracle are admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OraclePolicy {
    /// Accept every pair verbatim. Only exact-tier sources are protected.
    #[default]
    Trusted,
    /// Drop pairs naming fields outside the offered lists, and pairs whose
    /// target was already claimed by an earlier pair.
    Validated,
}

/// Which rule generator the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStrategy {
    /// Exact, semantic, then fuzzy matching per level; rules for leaves only.
    #[default]
    Tiered,
    /// Exact-name walk followed by name/structure similarity over all pairs.
    Structural,
}

/// Runtime options of the mapping engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    pub weights: ScoreWeights,
    pub fuzzy_threshold: f64,
    pub oracle_policy: OraclePolicy,
    pub strategy: MappingStrategy,
    /// Maximum nesting depth accepted by the builder, root included.
    pub max_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            fuzzy_threshold: FUZZY_THRESHOLD,
            oracle_policy: OraclePolicy::default(),
            strategy: MappingStrategy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineOptions {
    #[must_use]
    pub fn with_strategy(mut self, strategy: MappingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_oracle_policy(mut self, policy: OraclePolicy) -> Self {
        self.oracle_policy = policy;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Contents of a TOML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub matching: MatchingSection,
    #[serde(default)]
    pub limits: LimitsSection,
    #[serde(default)]
    pub synonyms: SynonymsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingSection {
    #[serde(default = "default_name_weight")]
    pub name_weight: f64,
    #[serde(default = "default_type_weight")]
    pub type_weight: f64,
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    #[serde(default)]
    pub oracle_policy: OraclePolicy,
    #[serde(default)]
    pub strategy: MappingStrategy,
}

impl Default for MatchingSection {
    fn default() -> Self {
        Self {
            name_weight: NAME_WEIGHT,
            type_weight: TYPE_WEIGHT,
            fuzzy_threshold: FUZZY_THRESHOLD,
            oracle_policy: OraclePolicy::default(),
            strategy: MappingStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsSection {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynonymsSection {
    #[serde(default)]
    pub groups: Vec<Vec<String>>,
}

fn default_name_weight() -> f64 {
    NAME_WEIGHT
}

fn default_type_weight() -> f64 {
    TYPE_WEIGHT
}

fn default_fuzzy_threshold() -> f64 {
    FUZZY_THRESHOLD
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl EngineConfig {
    /// Parse configuration text without validating value ranges.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read, parse, and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|error| SchemaError::io(path, error))?;
        let config = Self::from_toml_str(&text).map_err(|source| SchemaError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let matching = &self.matching;
        for (key, weight) in [
            ("name_weight", matching.name_weight),
            ("type_weight", matching.type_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SchemaError::invalid_config(format!(
                    "matching.{key} must be a non-negative number, got {weight}"
                )));
            }
        }
        if matching.name_weight + matching.type_weight > 1.0 + f64::EPSILON {
            return Err(SchemaError::invalid_config(
                "matching.name_weight + matching.type_weight must not exceed 1.0",
            ));
        }
        if !(0.0..=1.0).contains(&matching.fuzzy_threshold) {
            return Err(SchemaError::invalid_config(format!(
                "matching.fuzzy_threshold must be within [0, 1], got {}",
                matching.fuzzy_threshold
            )));
        }
        if self.limits.max_depth == 0 {
            return Err(SchemaError::invalid_config("limits.max_depth must be at least 1"));
        }
        Ok(())
    }

    pub fn options(&self) -> EngineOptions {
        EngineOptions {
            weights: ScoreWeights {
                name: self.matching.name_weight,
                type_agreement: self.matching.type_weight,
            },
            fuzzy_threshold: self.matching.fuzzy_threshold,
            oracle_policy: self.matching.oracle_policy,
            strategy: self.matching.strategy,
            max_depth: self.limits.max_depth,
        }
    }

    /// Synonym oracle built from `[synonyms]`, if any group is configured.
    pub fn synonym_table(&self) -> Option<SynonymTable> {
        let table = SynonymTable::new(&self.synonyms.groups);
        (!table.is_empty()).then_some(table)
    }
}
