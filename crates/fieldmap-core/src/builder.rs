//! Canonicalization of arbitrary JSON into a [`SchemaNode`] tree.
//!
//! Arrays are sampled from their first element only: they are assumed to be
//! homogeneous, so a heterogeneous array reflects only the shape of element 0.

use serde_json::Value;
use tracing::debug;

use fieldmap_model::{ARRAY_ITEM_NAME, NodeType, SchemaNode};

use crate::error::{Result, SchemaError};

/// Default nesting limit, matching `serde_json`'s own recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parse a JSON document and build its schema tree.
///
/// # Errors
///
/// [`SchemaError::Parse`] when the input is not well-formed JSON,
/// [`SchemaError::TooDeep`] when it nests deeper than [`DEFAULT_MAX_DEPTH`].
pub fn build_schema(json: &str) -> Result<SchemaNode> {
    build_schema_with_limit(json, DEFAULT_MAX_DEPTH)
}

/// Parse a JSON document and build its schema tree with an explicit depth limit.
///
/// The root counts as depth 1.
pub fn build_schema_with_limit(json: &str, max_depth: usize) -> Result<SchemaNode> {
    let value: Value = serde_json::from_str(json)?;
    let root = schema_from_value(&value, max_depth)?;
    debug!(
        root_type = %root.node_type(),
        fields = root.children().len(),
        "built schema tree"
    );
    Ok(root)
}

/// Build a schema tree from an already-parsed JSON value.
pub fn schema_from_value(value: &Value, max_depth: usize) -> Result<SchemaNode> {
    convert(value, "", 1, max_depth)
}

/// The schema type a JSON value is classified as.
pub fn value_type(value: &Value) -> NodeType {
    match value {
        Value::Object(_) => NodeType::Object,
        Value::Array(_) => NodeType::Array,
        Value::String(_) => NodeType::String,
        Value::Number(_) => NodeType::Number,
        Value::Bool(_) => NodeType::Boolean,
        Value::Null => NodeType::Null,
    }
}

fn convert(value: &Value, name: &str, depth: usize, limit: usize) -> Result<SchemaNode> {
    if depth > limit {
        return Err(SchemaError::TooDeep { depth, limit });
    }
    let node = match value {
        // Every member is kept, including names that differ only by case.
        Value::Object(members) => {
            let children = members
                .iter()
                .map(|(key, member)| convert(member, key, depth + 1, limit))
                .collect::<Result<Vec<_>>>()?;
            SchemaNode::object(name, children)
        }
        Value::Array(elements) => {
            let item = elements
                .first()
                .map(|first| convert(first, ARRAY_ITEM_NAME, depth + 1, limit))
                .transpose()?;
            SchemaNode::array(name, item)
        }
        scalar => SchemaNode::leaf(name, value_type(scalar)),
    };
    Ok(node)
}
