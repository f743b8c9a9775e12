//! Schema mapping engine.
//!
//! Two JSON documents are canonicalized into [`SchemaNode`] trees by the
//! [`builder`]. The [`generator`] then walks both trees level by level,
//! pairing children with the three-tier [`FieldMatcher`] (exact name,
//! [`SemanticOracle`] proposals, fuzzy name/type similarity) and emitting one
//! `direct` [`MappingRule`] per matched source leaf. The [`structural`]
//! strategy is an alternative generator driven by exact names and subtree
//! shape instead of an oracle.
//!
//! [`MappingEngine`] ties these together behind [`EngineOptions`].
//!
//! [`SchemaNode`]: fieldmap_model::SchemaNode
//! [`MappingRule`]: fieldmap_model::MappingRule

#![deny(unsafe_code)]

pub mod builder;
pub mod engine;
pub mod error;
pub mod generator;
pub mod matcher;
pub mod options;
pub mod oracle;
pub mod score;
pub mod structural;

pub use builder::{DEFAULT_MAX_DEPTH, build_schema, build_schema_with_limit, schema_from_value};
pub use engine::MappingEngine;
pub use error::{OracleError, Result, SchemaError};
pub use generator::MappingGenerator;
pub use matcher::{FieldMatch, FieldMatcher, FieldMatches, MatchTier};
pub use options::{EngineConfig, EngineOptions, FUZZY_THRESHOLD, MappingStrategy, OraclePolicy};
pub use oracle::{CompletionOracle, NoSemanticMatches, OracleMatches, SemanticOracle, SynonymTable};
pub use score::{ScoreWeights, combined_similarity, name_similarity, structural_similarity};
pub use structural::generate_structural;
