//! The mapping engine facade.

use std::path::Path;

use tracing::debug;

use fieldmap_model::{MappingConfiguration, SchemaNode};

use crate::builder::build_schema_with_limit;
use crate::error::Result;
use crate::generator::MappingGenerator;
use crate::options::{EngineConfig, EngineOptions, MappingStrategy};
use crate::oracle::{NoSemanticMatches, SemanticOracle};
use crate::structural::generate_structural;

/// Builds schema trees and generates mapping configurations.
///
/// The engine holds no state between calls, so one instance can serve
/// concurrent requests as long as its oracle can.
pub struct MappingEngine {
    options: EngineOptions,
    oracle: Box<dyn SemanticOracle + Send + Sync>,
}

impl MappingEngine {
    /// Engine with the given options and no semantic oracle.
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            oracle: Box::new(NoSemanticMatches),
        }
    }

    #[must_use]
    pub fn with_oracle(mut self, oracle: impl SemanticOracle + Send + Sync + 'static) -> Self {
        self.oracle = Box::new(oracle);
        self
    }

    /// Engine configured from a parsed file; `[synonyms]` becomes the oracle.
    pub fn from_config(config: &EngineConfig) -> Self {
        let engine = Self::new(config.options());
        match config.synonym_table() {
            Some(table) => engine.with_oracle(table),
            None => engine,
        }
    }

    /// Load, validate, and apply a TOML configuration file.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = EngineConfig::load(path)?;
        debug!(path = %path.display(), "loaded engine config");
        Ok(Self::from_config(&config))
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Parse a JSON document into a schema tree, honouring `max_depth`.
    pub fn build_schema(&self, json: &str) -> Result<SchemaNode> {
        build_schema_with_limit(json, self.options.max_depth)
    }

    /// Generate rules for two schema trees with the configured strategy.
    pub fn generate(&self, source: &SchemaNode, target: &SchemaNode) -> MappingConfiguration {
        match self.options.strategy {
            MappingStrategy::Tiered => {
                MappingGenerator::new(self.oracle.as_ref(), &self.options).generate(source, target)
            }
            MappingStrategy::Structural => generate_structural(source, target),
        }
    }

    /// Build both documents and generate their mapping.
    ///
    /// # Errors
    ///
    /// Fails when either document is malformed or nests too deeply.
    pub fn map_documents(&self, source_json: &str, target_json: &str) -> Result<MappingConfiguration> {
        let source = self.build_schema(source_json)?;
        let target = self.build_schema(target_json)?;
        Ok(self.generate(&source, &target))
    }
}

impl Default for MappingEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl std::fmt::Debug for MappingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingEngine")
            .field("options", &self.options)
            .field("oracle", &self.oracle.name())
            .finish()
    }
}
