//! Data types shared by the fieldmap engine and its front ends.
//!
//! - [`SchemaNode`]: canonical typed tree built from a JSON document
//! - [`MappingRule`] / [`MappingConfiguration`]: the engine's output
//! - [`ConfidenceThresholds`]: bucketing of rule confidence for reports

#![deny(unsafe_code)]

pub mod confidence;
pub mod mapping;
pub mod node;

pub use confidence::{ConfidenceLevel, ConfidenceThresholds};
pub use mapping::{MappingConfiguration, MappingRule, Transformation};
pub use node::{ARRAY_ITEM_NAME, NodeType, SchemaNode, join_path};
