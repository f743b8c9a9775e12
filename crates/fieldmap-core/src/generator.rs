//! Tiered rule generation: walk matched node pairs and emit leaf rules.

use tracing::{info, info_span, trace};

use fieldmap_model::{MappingConfiguration, MappingRule, SchemaNode, join_path};

use crate::matcher::FieldMatcher;
use crate::options::EngineOptions;
use crate::oracle::SemanticOracle;
use crate::score::{ScoreWeights, combined_similarity};

/// Walks two schema trees level by level with the [`FieldMatcher`].
///
/// Every matched pair whose source is a leaf yields one `direct` rule scored
/// by [`combined_similarity`]; leaf-ness is judged on the source side only.
/// Non-leaf sources are matched child-by-child against any target that has a
/// child list, even an empty one, at one oracle call per such pair.
pub struct MappingGenerator<'a> {
    matcher: FieldMatcher<'a>,
    weights: ScoreWeights,
}

impl<'a> MappingGenerator<'a> {
    pub fn new(oracle: &'a dyn SemanticOracle, options: &EngineOptions) -> Self {
        Self {
            matcher: FieldMatcher::new(oracle, options),
            weights: options.weights,
        }
    }

    /// Generate the mapping configuration for two roots.
    ///
    /// Nothing is generated when either root is a scalar or an empty array.
    /// The roots' own names never appear in a path.
    pub fn generate(&self, source: &SchemaNode, target: &SchemaNode) -> MappingConfiguration {
        let span = info_span!("mapping", strategy = "tiered", oracle = self.matcher.oracle_name());
        let _guard = span.enter();

        let mut rules = Vec::new();
        if source.children_opt().is_some() && target.children_opt().is_some() {
            self.walk_level(source.children(), target.children(), "", "", &mut rules);
        }

        let config = MappingConfiguration::from_rules(
            rules,
            format!(
                "Generated with exact, semantic ({}) and fuzzy field matching",
                self.matcher.oracle_name()
            ),
        );
        info!(
            rules = config.len(),
            overall_confidence = config.overall_confidence(),
            "generated mapping"
        );
        config
    }

    fn walk_level(
        &self,
        sources: &[SchemaNode],
        targets: &[SchemaNode],
        source_path: &str,
        target_path: &str,
        rules: &mut Vec<MappingRule>,
    ) {
        let matches = self.matcher.match_fields(sources, targets);
        for field in &matches {
            let (Some(source), Some(target)) =
                (find_child(sources, &field.source), find_child(targets, &field.target))
            else {
                trace!(
                    source = %field.source,
                    target = %field.target,
                    "skipping match for a field that does not exist"
                );
                continue;
            };
            self.walk_pair(source, target, source_path, target_path, rules);
        }
    }

    fn walk_pair(
        &self,
        source: &SchemaNode,
        target: &SchemaNode,
        source_ancestor: &str,
        target_ancestor: &str,
        rules: &mut Vec<MappingRule>,
    ) {
        let source_path = join_path(source_ancestor, source.name());
        let target_path = join_path(target_ancestor, target.name());

        if source.is_leaf() {
            let confidence = combined_similarity(source, target, &self.weights);
            rules.push(MappingRule::direct(source_path, target_path, confidence));
            return;
        }
        if target.children_opt().is_none() {
            return;
        }
        self.walk_level(
            source.children(),
            target.children(),
            &source_path,
            &target_path,
            rules,
        );
    }
}

fn find_child<'n>(nodes: &'n [SchemaNode], name: &str) -> Option<&'n SchemaNode> {
    nodes.iter().find(|node| node.name() == name)
}
