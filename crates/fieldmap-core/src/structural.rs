//! Structural strategy: exact-name walk, then similarity over every pair.
//!
//! Unlike the tiered generator this strategy emits rules for intermediate
//! nodes as well as leaves, and its second pass compares every source child
//! with every target child at each level. Subtree scores are memoized per
//! node pair and only computed for unclaimed targets. A target path receives
//! at most one rule; a source path may receive several.

use std::collections::{BTreeMap, HashSet};

use tracing::{info, info_span};

use fieldmap_model::{MappingConfiguration, MappingRule, SchemaNode, join_path};

use crate::score::{StructuralCache, name_similarity};

/// Strict lower bound of `(name + structure) / 2` in the similarity pass.
pub const STRUCTURAL_THRESHOLD: f64 = 0.4;

/// Generate rules with the structural strategy.
pub fn generate_structural(source: &SchemaNode, target: &SchemaNode) -> MappingConfiguration {
    let span = info_span!("mapping", strategy = "structural");
    let _guard = span.enter();

    let mut rules = Vec::new();
    exact_level(source, target, "", "", &mut rules);

    let mut claimed: HashSet<String> = rules.iter().map(|r| r.target_path.clone()).collect();
    let mut cache = StructuralCache::new();
    if source.children_opt().is_some() && target.children_opt().is_some() {
        for source_child in source.children() {
            for target_child in target.children() {
                similarity_pair(
                    source_child,
                    target_child,
                    "",
                    "",
                    &mut cache,
                    &mut claimed,
                    &mut rules,
                );
            }
        }
    }

    let config = MappingConfiguration::from_rules(
        rules,
        "Generated with exact-name and structural similarity matching",
    );
    info!(
        rules = config.len(),
        overall_confidence = config.overall_confidence(),
        "generated mapping"
    );
    config
}

/// Pass 1: identically named children, recursively. Pairs are looked up by
/// exact name, so only type agreement decides whether a rule is emitted.
fn exact_level(
    source: &SchemaNode,
    target: &SchemaNode,
    source_path: &str,
    target_path: &str,
    rules: &mut Vec<MappingRule>,
) {
    let mut by_name: BTreeMap<&str, &SchemaNode> = BTreeMap::new();
    for child in target.children() {
        by_name.insert(child.name(), child);
    }
    for source_child in source.children() {
        let Some(target_child) = by_name.get(source_child.name()) else {
            continue;
        };
        let child_source_path = join_path(source_path, source_child.name());
        let child_target_path = join_path(target_path, target_child.name());
        if source_child.node_type() == target_child.node_type() {
            rules.push(MappingRule::direct(
                child_source_path.clone(),
                child_target_path.clone(),
                1.0,
            ));
        }
        exact_level(
            source_child,
            target_child,
            &child_source_path,
            &child_target_path,
            rules,
        );
    }
}

/// Pass 2: score one pair, then recurse into every child pair.
fn similarity_pair<'n>(
    source: &'n SchemaNode,
    target: &'n SchemaNode,
    source_ancestor: &str,
    target_ancestor: &str,
    cache: &mut StructuralCache<'n>,
    claimed: &mut HashSet<String>,
    rules: &mut Vec<MappingRule>,
) {
    let source_path = join_path(source_ancestor, source.name());
    let target_path = join_path(target_ancestor, target.name());

    if !claimed.contains(&target_path) {
        let score = (name_similarity(source.name(), target.name())
            + cache.similarity(source, target))
            / 2.0;
        if score > STRUCTURAL_THRESHOLD {
            claimed.insert(target_path.clone());
            rules.push(MappingRule::direct(
                source_path.clone(),
                target_path.clone(),
                score,
            ));
        }
    }

    if source.children_opt().is_some() && target.children_opt().is_some() {
        for source_child in source.children() {
            for target_child in target.children() {
                similarity_pair(
                    source_child,
                    target_child,
                    &source_path,
                    &target_path,
                    cache,
                    claimed,
                    rules,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_schema;

    fn generate(source: &str, target: &str) -> MappingConfiguration {
        generate_structural(&build_schema(source).unwrap(), &build_schema(target).unwrap())
    }

    #[test]
    fn exact_pass_covers_intermediate_nodes() {
        let config = generate(
            r#"{"customer": {"id": 1}}"#,
            r#"{"customer": {"id": 2}}"#,
        );
        let rules: Vec<(&str, &str, f64)> = config
            .rules()
            .iter()
            .map(|r| (r.source_path.as_str(), r.target_path.as_str(), r.confidence_score))
            .collect();
        assert_eq!(
            rules,
            vec![("customer", "customer", 1.0), ("customer.id", "customer.id", 1.0)]
        );
        assert_eq!(config.overall_confidence(), 1.0);
    }

    #[test]
    fn exact_pass_requires_type_agreement() {
        let config = generate(r#"{"id": 1}"#, r#"{"id": "1"}"#);
        // Leaves of different types: name 1.0, structure 0.0, averaged to 0.5.
        assert_eq!(config.len(), 1);
        let rule = &config.rules()[0];
        assert_eq!(rule.target_path, "id");
        assert!((rule.confidence_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn similarity_pass_matches_renamed_leaves() {
        let config = generate(r#"{"fullName": "Ada"}"#, r#"{"name": "Ada"}"#);
        // (0.5 name + 1.0 structure) / 2
        assert_eq!(config.len(), 1);
        let rule = &config.rules()[0];
        assert_eq!((rule.source_path.as_str(), rule.target_path.as_str()), ("fullName", "name"));
        assert!((rule.confidence_score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn each_target_path_is_claimed_once() {
        let config = generate(
            r#"{"first_name": "Ada", "last_name": "Lovelace"}"#,
            r#"{"name": "Ada Lovelace"}"#,
        );
        assert_eq!(config.rules_for_target("name").len(), 1);
        assert_eq!(config.rules()[0].source_path, "first_name");
    }

    #[test]
    fn wide_nested_document_maps_onto_itself() {
        let leaves: Vec<String> = (0..4).map(|i| format!(r#""f{i}": {i}"#)).collect();
        let mut document = format!("{{{}}}", leaves.join(", "));
        for depth in 0..3 {
            let siblings: Vec<String> = (0..4)
                .map(|i| format!(r#""n{depth}_{i}": {document}"#))
                .collect();
            document = format!("{{{}}}", siblings.join(", "));
        }
        let schema = build_schema(&document).unwrap();

        let config = generate_structural(&schema, &schema);
        // 4 + 16 + 64 object nodes plus 256 leaves, all matched by name.
        assert_eq!(config.len(), 340);
        assert_eq!(config.overall_confidence(), 1.0);
        let targets: HashSet<&str> = config.rules().iter().map(|r| r.target_path.as_str()).collect();
        assert_eq!(targets.len(), config.len());
    }

    #[test]
    fn empty_roots_generate_nothing() {
        let config = generate("{}", r#"{"a": 1}"#);
        assert!(config.is_empty());
        assert_eq!(config.overall_confidence(), 0.0);
    }
}
