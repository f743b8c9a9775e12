//! Three-tier alignment of two sibling field sets.
//!
//! 1. **Exact**: identical (case-sensitive) names.
//! 2. **Semantic**: pairs proposed by the [`SemanticOracle`] for the fields
//!    left over by tier 1.
//! 3. **Fuzzy**: for the fields left over by tiers 1 and 2, each source takes
//!    its best [`combined_similarity`] target above the threshold.
//!
//! Matching is local: a target may be picked by several sources in the fuzzy
//! tier, and nothing enforces a one-to-one assignment across tiers.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, trace, warn};

use fieldmap_model::SchemaNode;

use crate::options::{EngineOptions, OraclePolicy};
use crate::oracle::{OracleMatches, SemanticOracle};
use crate::score::{ScoreWeights, combined_similarity};

/// The tier that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    Exact,
    Semantic,
    Fuzzy,
}

impl MatchTier {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Semantic => "semantic",
            Self::Fuzzy => "fuzzy",
        }
    }
}

/// One source-to-target field correspondence.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    pub source: String,
    pub target: String,
    pub tier: MatchTier,
    /// Combined similarity, recorded for fuzzy matches only.
    pub score: Option<f64>,
}

/// Result of matching one level: at most one target per source name.
///
/// Entries follow the declaration order of the source fields. Oracle pairs
/// naming a source outside the offered list (possible under
/// [`OraclePolicy::Trusted`]) come last, in name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMatches {
    entries: Vec<FieldMatch>,
}

impl FieldMatches {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldMatch> {
        self.entries.iter()
    }

    pub fn get(&self, source: &str) -> Option<&FieldMatch> {
        self.entries.iter().find(|entry| entry.source == source)
    }

    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.get(source).map(|entry| entry.target.as_str())
    }

    pub fn count(&self, tier: MatchTier) -> usize {
        self.entries.iter().filter(|entry| entry.tier == tier).count()
    }
}

impl<'a> IntoIterator for &'a FieldMatches {
    type Item = &'a FieldMatch;
    type IntoIter = std::slice::Iter<'a, FieldMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Aligns the children of two schema nodes.
pub struct FieldMatcher<'a> {
    oracle: &'a dyn SemanticOracle,
    weights: ScoreWeights,
    fuzzy_threshold: f64,
    oracle_policy: OraclePolicy,
}

impl<'a> FieldMatcher<'a> {
    pub fn new(oracle: &'a dyn SemanticOracle, options: &EngineOptions) -> Self {
        Self {
            oracle,
            weights: options.weights,
            fuzzy_threshold: options.fuzzy_threshold,
            oracle_policy: options.oracle_policy,
        }
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Match `sources` against `targets`.
    ///
    /// Calls the oracle exactly once, even when either side is empty. An
    /// oracle failure is logged and treated as "no semantic matches".
    pub fn match_fields(&self, sources: &[SchemaNode], targets: &[SchemaNode]) -> FieldMatches {
        // Tier 1: exact names.
        let target_names: HashSet<&str> = targets.iter().map(SchemaNode::name).collect();
        let exact: BTreeSet<&str> = sources
            .iter()
            .map(SchemaNode::name)
            .filter(|name| target_names.contains(name))
            .collect();

        let remaining_sources: Vec<&SchemaNode> = sources
            .iter()
            .filter(|node| !exact.contains(node.name()))
            .collect();
        let remaining_targets: Vec<&SchemaNode> = targets
            .iter()
            .filter(|node| !exact.contains(node.name()))
            .collect();

        // Tier 2: semantic oracle.
        let semantic = self.semantic_matches(&remaining_sources, &remaining_targets, &exact);

        // Tier 3: fuzzy similarity over what is left.
        let claimed: HashSet<&str> = semantic.values().map(String::as_str).collect();
        let fuzzy_sources: Vec<&SchemaNode> = remaining_sources
            .into_iter()
            .filter(|node| !semantic.contains_key(node.name()))
            .collect();
        let fuzzy_targets: Vec<&SchemaNode> = remaining_targets
            .into_iter()
            .filter(|node| !claimed.contains(node.name()))
            .collect();
        let fuzzy = self.fuzzy_matches(&fuzzy_sources, &fuzzy_targets);

        let matches = assemble(sources, &exact, &semantic, &fuzzy);
        debug!(
            sources = sources.len(),
            targets = targets.len(),
            exact = matches.count(MatchTier::Exact),
            semantic = matches.count(MatchTier::Semantic),
            fuzzy = matches.count(MatchTier::Fuzzy),
            "matched fields"
        );
        matches
    }

    fn semantic_matches(
        &self,
        sources: &[&SchemaNode],
        targets: &[&SchemaNode],
        exact: &BTreeSet<&str>,
    ) -> OracleMatches {
        let source_names: Vec<&str> = sources.iter().map(|node| node.name()).collect();
        let target_names: Vec<&str> = targets.iter().map(|node| node.name()).collect();

        let proposed = match self.oracle.propose_matches(&source_names, &target_names) {
            Ok(proposed) => proposed,
            Err(error) => {
                warn!(
                    oracle = self.oracle.name(),
                    %error,
                    "semantic oracle failed; continuing with fuzzy matching"
                );
                return OracleMatches::new();
            }
        };

        let mut accepted = OracleMatches::new();
        let mut claimed_targets = BTreeSet::new();
        let mut dropped = 0usize;
        for (source, target) in proposed {
            // Exact matches are never overridden, whatever the policy.
            if exact.contains(source.as_str()) {
                dropped += 1;
                continue;
            }
            if self.oracle_policy == OraclePolicy::Validated
                && (!source_names.contains(&source.as_str())
                    || !target_names.contains(&target.as_str())
                    || !claimed_targets.insert(target.clone()))
            {
                dropped += 1;
                continue;
            }
            accepted.insert(source, target);
        }
        if dropped > 0 {
            warn!(
                oracle = self.oracle.name(),
                dropped,
                policy = ?self.oracle_policy,
                "discarded semantic matches"
            );
        }
        accepted
    }

    /// Best target per source above the threshold.
    ///
    /// On equal scores the target evaluated last (in target order) wins.
    fn fuzzy_matches<'n>(
        &self,
        sources: &[&'n SchemaNode],
        targets: &[&'n SchemaNode],
    ) -> BTreeMap<&'n str, (&'n str, f64)> {
        let mut matches = BTreeMap::new();
        for source in sources {
            let mut best: Option<(&str, f64)> = None;
            for target in targets {
                let score = combined_similarity(source, target, &self.weights);
                if score > self.fuzzy_threshold && best.is_none_or(|(_, top)| score >= top) {
                    best = Some((target.name(), score));
                }
            }
            if let Some((target, score)) = best {
                trace!(source = source.name(), target, score, "fuzzy match");
                matches.insert(source.name(), (target, score));
            }
        }
        matches
    }
}

fn assemble(
    sources: &[SchemaNode],
    exact: &BTreeSet<&str>,
    semantic: &OracleMatches,
    fuzzy: &BTreeMap<&str, (&str, f64)>,
) -> FieldMatches {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    for source in sources {
        let name = source.name();
        if !seen.insert(name) {
            continue;
        }
        let entry = if exact.contains(name) {
            FieldMatch {
                source: name.to_string(),
                target: name.to_string(),
                tier: MatchTier::Exact,
                score: None,
            }
        } else if let Some(target) = semantic.get(name) {
            FieldMatch {
                source: name.to_string(),
                target: target.clone(),
                tier: MatchTier::Semantic,
                score: None,
            }
        } else if let Some((target, score)) = fuzzy.get(name) {
            FieldMatch {
                source: name.to_string(),
                target: (*target).to_string(),
                tier: MatchTier::Fuzzy,
                score: Some(*score),
            }
        } else {
            continue;
        };
        entries.push(entry);
    }
    for (source, target) in semantic {
        if !seen.contains(source.as_str()) {
            entries.push(FieldMatch {
                source: source.clone(),
                target: target.clone(),
                tier: MatchTier::Semantic,
                score: None,
            });
        }
    }
    FieldMatches { entries }
}
