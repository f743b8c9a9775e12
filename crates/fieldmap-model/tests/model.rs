//! Tests for fieldmap-model types.

use fieldmap_model::{
    ConfidenceLevel, ConfidenceThresholds, MappingConfiguration, MappingRule, NodeType,
    SchemaNode,
};

#[test]
fn configuration_serializes_with_camel_case_keys() {
    let config = MappingConfiguration::from_rules(
        vec![MappingRule::direct("name", "name", 1.0)],
        "test",
    );
    let value = serde_json::to_value(&config).expect("serialize configuration");

    assert_eq!(value["overallConfidence"], 1.0);
    assert_eq!(value["notes"], "test");
    let rule = &value["rules"][0];
    assert_eq!(rule["sourcePath"], "name");
    assert_eq!(rule["targetPath"], "name");
    assert_eq!(rule["transformation"], "direct");
    assert_eq!(rule["confidenceScore"], 1.0);
}

#[test]
fn configuration_round_trips() {
    let config = MappingConfiguration::from_rules(
        vec![
            MappingRule::direct("customer.name", "client.fullName", 0.82),
            MappingRule::direct("customer.id", "client.id", 1.0),
        ],
        "round trip",
    );
    let json = serde_json::to_string(&config).expect("serialize configuration");
    let round: MappingConfiguration = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(round, config);
}

#[test]
fn deserialized_configuration_recomputes_mean() {
    let json = r#"{
        "rules": [
            {"sourcePath": "a", "targetPath": "a", "transformation": "direct", "confidenceScore": 0.82},
            {"sourcePath": "b", "targetPath": "c", "transformation": "direct", "confidenceScore": 1.0}
        ],
        "overallConfidence": 0.1,
        "notes": "external"
    }"#;
    let config: MappingConfiguration = serde_json::from_str(json).expect("deserialize");

    assert_eq!(config.overall_confidence(), (0.82 + 1.0) / 2.0);
    assert_eq!(config.notes(), "external");
    assert_eq!(config.len(), 2);
}

#[test]
fn schema_node_serializes_type_and_omits_absent_children() {
    let node = SchemaNode::object("", vec![SchemaNode::leaf("age", NodeType::Number)]);
    let value = serde_json::to_value(&node).expect("serialize node");

    assert_eq!(value["type"], "object");
    assert_eq!(value["children"][0]["name"], "age");
    assert_eq!(value["children"][0]["type"], "number");
    assert!(value["children"][0].get("children").is_none());
    assert!(value.get("metadata").is_none());
}

#[test]
fn metadata_is_carried_but_optional() {
    let node = SchemaNode::leaf("id", NodeType::String).with_metadata("format", "uuid");
    assert_eq!(node.metadata().get("format").map(String::as_str), Some("uuid"));
}

#[test]
fn shared_targets_are_reported_together() {
    let config = MappingConfiguration::from_rules(
        vec![
            MappingRule::direct("firstName", "name", 0.7),
            MappingRule::direct("lastName", "name", 0.65),
        ],
        "overlap",
    );
    assert_eq!(config.rules_for_target("name").len(), 2);
    assert_eq!(
        config.rule_for_source("lastName").map(|r| r.target_path.as_str()),
        Some("name")
    );
}

#[test]
fn count_by_level_skips_uncategorized() {
    let config = MappingConfiguration::from_rules(
        vec![
            MappingRule::direct("a", "a", 1.0),
            MappingRule::direct("b", "b", 0.85),
            MappingRule::direct("c", "c", 0.62),
            MappingRule::direct("d", "d", 0.3),
        ],
        "levels",
    );
    let counts = config.count_by_level(&ConfidenceThresholds::default());
    assert_eq!(counts.get(&ConfidenceLevel::High), Some(&1));
    assert_eq!(counts.get(&ConfidenceLevel::Medium), Some(&1));
    assert_eq!(counts.get(&ConfidenceLevel::Low), Some(&1));
    assert_eq!(counts.values().sum::<usize>(), 3);
}
