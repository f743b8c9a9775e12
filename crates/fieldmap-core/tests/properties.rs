//! Property tests for the similarity scorers and the schema builder.

use proptest::prelude::*;
use serde_json::Value;

use fieldmap_core::builder::value_type;
use fieldmap_core::{
    DEFAULT_MAX_DEPTH, EngineOptions, MappingEngine, name_similarity, schema_from_value,
    structural_similarity,
};
use fieldmap_model::{ARRAY_ITEM_NAME, NodeType, SchemaNode};

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z_]{1,6}", inner, 0..4)
                .prop_map(|members| Value::Object(members.into_iter().collect())),
        ]
    })
}

fn assert_mirrors(node: &SchemaNode, value: &Value) {
    assert_eq!(node.node_type(), value_type(value));
    match value {
        Value::Object(members) => {
            assert_eq!(node.children().len(), members.len());
            for (child, (key, member)) in node.children().iter().zip(members) {
                assert_eq!(child.name(), key.as_str());
                assert_mirrors(child, member);
            }
        }
        Value::Array(elements) => match elements.first() {
            Some(first) => {
                assert_eq!(node.children().len(), 1);
                assert_eq!(node.children()[0].name(), ARRAY_ITEM_NAME);
                assert_mirrors(&node.children()[0], first);
            }
            None => assert!(node.children_opt().is_none()),
        },
        _ => assert!(node.children_opt().is_none()),
    }
}

fn node_type() -> impl Strategy<Value = NodeType> {
    prop_oneof![
        Just(NodeType::String),
        Just(NodeType::Number),
        Just(NodeType::Boolean),
        Just(NodeType::Null),
    ]
}

proptest! {
    #[test]
    fn name_similarity_is_reflexive(name in "\\PC{0,24}") {
        prop_assert_eq!(name_similarity(&name, &name), 1.0);
    }

    #[test]
    fn name_similarity_is_symmetric(left in "\\PC{0,16}", right in "\\PC{0,16}") {
        prop_assert_eq!(name_similarity(&left, &right), name_similarity(&right, &left));
    }

    #[test]
    fn name_similarity_is_bounded(left in "\\PC{0,16}", right in "\\PC{0,16}") {
        let score = name_similarity(&left, &right);
        prop_assert!((0.0..=1.0).contains(&score), "score {score} out of range");
    }

    #[test]
    fn leaf_is_structurally_identical_to_itself(name in "[a-z]{0,8}", kind in node_type()) {
        let leaf = SchemaNode::leaf(name, kind);
        prop_assert_eq!(structural_similarity(&leaf, &leaf), 1.0);
    }

    #[test]
    fn differing_types_are_structurally_unrelated(left in node_type(), right in node_type()) {
        prop_assume!(left != right);
        let left = SchemaNode::leaf("a", left);
        let right = SchemaNode::leaf("a", right);
        prop_assert_eq!(structural_similarity(&left, &right), 0.0);
    }

    #[test]
    fn builder_mirrors_json_kinds(value in json_value()) {
        let root = schema_from_value(&value, DEFAULT_MAX_DEPTH).unwrap();
        assert_mirrors(&root, &value);
    }

    #[test]
    fn overall_confidence_is_the_rule_mean(source in json_value(), target in json_value()) {
        let engine = MappingEngine::new(EngineOptions::default());
        let config = engine.generate(
            &schema_from_value(&source, DEFAULT_MAX_DEPTH).unwrap(),
            &schema_from_value(&target, DEFAULT_MAX_DEPTH).unwrap(),
        );
        if config.is_empty() {
            prop_assert_eq!(config.overall_confidence(), 0.0);
        } else {
            let sum: f64 = config.rules().iter().map(|r| r.confidence_score).sum();
            let mean = sum / config.len() as f64;
            prop_assert!((config.overall_confidence() - mean).abs() < 1e-12);
        }
    }
}
