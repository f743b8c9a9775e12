use fieldmap_core::{
    EngineOptions, MappingEngine, MappingStrategy, OraclePolicy, SchemaError, SynonymTable,
};
use fieldmap_model::{MappingConfiguration, Transformation};

const SOURCE: &str = r#"{
    "customer": {"first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"},
    "orders": [{"sku": "A-1", "qty": 2}],
    "active": true
}"#;

const TARGET: &str = r#"{
    "customer": {"firstName": "Ada", "lastName": "Lovelace", "emailAddress": "ada@example.com"},
    "orders": [{"sku": "A-1", "quantity": 2}],
    "active": false
}"#;

fn render(config: &MappingConfiguration) -> String {
    let mut lines: Vec<String> = config
        .rules()
        .iter()
        .map(|rule| {
            format!(
                "{} -> {} ({:.4})",
                rule.source_path, rule.target_path, rule.confidence_score
            )
        })
        .collect();
    lines.push(format!("overall {:.4}", config.overall_confidence()));
    lines.join("\n")
}

#[test]
fn identical_scalar_field_maps_with_full_confidence() {
    let config = MappingEngine::default()
        .map_documents(r#"{"name": "Alice"}"#, r#"{"name": "Alice"}"#)
        .unwrap();

    assert_eq!(config.len(), 1);
    let rule = &config.rules()[0];
    assert_eq!(rule.source_path, "name");
    assert_eq!(rule.target_path, "name");
    assert_eq!(rule.transformation, Transformation::Direct);
    assert_eq!(rule.confidence_score, 1.0);
    assert_eq!(config.overall_confidence(), 1.0);
}

#[test]
fn renamed_field_falls_back_to_fuzzy_tier() {
    let config = MappingEngine::default()
        .map_documents(r#"{"fullName": "Alice"}"#, r#"{"name": "Alice"}"#)
        .unwrap();

    // 0.7 * name_similarity("fullname", "name") + 0.3 clears the 0.6 threshold.
    insta::assert_snapshot!(render(&config), @r"
    fullName -> name (0.6500)
    overall 0.6500
    ");
}

#[test]
fn array_items_are_addressed_through_item() {
    let config = MappingEngine::default()
        .map_documents(r#"{"items": [{"sku": "A"}]}"#, r#"{"items": [{"sku": "A"}]}"#)
        .unwrap();

    assert_eq!(config.len(), 1);
    let rule = &config.rules()[0];
    assert_eq!(rule.source_path, "items.item.sku");
    assert_eq!(rule.target_path, "items.item.sku");
    assert_eq!(rule.confidence_score, 1.0);
}

#[test]
fn childless_source_root_yields_empty_configuration() {
    let engine = MappingEngine::default();
    for target in [r#"{"a": 1}"#, "{}", "[]", "7"] {
        let config = engine.map_documents("{}", target).unwrap();
        assert!(config.is_empty());
        assert_eq!(config.overall_confidence(), 0.0);
    }
}

#[test]
fn nested_documents_without_oracle() {
    let config = MappingEngine::default()
        .map_documents(SOURCE, TARGET)
        .unwrap();

    // email/emailAddress and qty/quantity stay just under the fuzzy threshold.
    insta::assert_snapshot!(render(&config), @r"
    customer.first_name -> customer.firstName (1.0000)
    customer.last_name -> customer.lastName (1.0000)
    orders.item.sku -> orders.item.sku (1.0000)
    active -> active (1.0000)
    overall 1.0000
    ");
}

#[test]
fn nested_documents_with_synonym_oracle() {
    let engine = MappingEngine::default()
        .with_oracle(SynonymTable::new([["email", "emailAddress"], ["qty", "quantity"]]));
    let config = engine.map_documents(SOURCE, TARGET).unwrap();

    insta::assert_snapshot!(render(&config), @r"
    customer.first_name -> customer.firstName (1.0000)
    customer.last_name -> customer.lastName (1.0000)
    customer.email -> customer.emailAddress (0.5917)
    orders.item.sku -> orders.item.sku (1.0000)
    orders.item.qty -> orders.item.quantity (0.5625)
    active -> active (1.0000)
    overall 0.8590
    ");
}

#[test]
fn validated_policy_keeps_consistent_oracle_pairs() {
    let engine = MappingEngine::new(
        EngineOptions::default().with_oracle_policy(OraclePolicy::Validated),
    )
    .with_oracle(SynonymTable::new([["email", "emailAddress"], ["qty", "quantity"]]));
    let config = engine.map_documents(SOURCE, TARGET).unwrap();
    assert_eq!(config.len(), 6);
}

#[test]
fn structural_strategy_maps_intermediate_nodes() {
    let engine = MappingEngine::new(
        EngineOptions::default().with_strategy(MappingStrategy::Structural),
    );
    let config = engine.map_documents(SOURCE, TARGET).unwrap();

    assert!(config.rule_for_source("customer").is_some());
    assert!(config.rule_for_source("orders.item").is_some());
    for target in ["customer.firstName", "customer.lastName", "active"] {
        assert_eq!(config.rules_for_target(target).len(), 1, "{target}");
    }
}

#[test]
fn malformed_document_is_reported() {
    let err = MappingEngine::default()
        .map_documents(r#"{"name": "#, "{}")
        .unwrap_err();
    assert!(matches!(err, SchemaError::Parse(_)));
}

#[test]
fn configuration_serializes_with_camel_case_keys() {
    let config = MappingEngine::default()
        .map_documents(r#"{"name": "Alice"}"#, r#"{"name": "Alice"}"#)
        .unwrap();
    let value = serde_json::to_value(&config).unwrap();

    assert_eq!(value["rules"][0]["sourcePath"], "name");
    assert_eq!(value["rules"][0]["targetPath"], "name");
    assert_eq!(value["rules"][0]["transformation"], "direct");
    assert_eq!(value["rules"][0]["confidenceScore"], 1.0);
    assert_eq!(value["overallConfidence"], 1.0);
    assert!(value["notes"].is_string());
}
