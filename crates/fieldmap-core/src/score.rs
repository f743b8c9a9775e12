//! Lexical and structural similarity between schema fields.
//!
//! Name similarity is a normalized Levenshtein score; structural similarity
//! is a coarse signal that only rewards children with identical names.

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::ptr;

use rapidfuzz::distance::levenshtein;
use serde::{Deserialize, Serialize};

use fieldmap_model::SchemaNode;

/// Default weight of name similarity in the combined score.
pub const NAME_WEIGHT: f64 = 0.7;
/// Default weight of type agreement in the combined score.
pub const TYPE_WEIGHT: f64 = 0.3;

/// Weights of the combined name/type similarity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub name: f64,
    pub type_agreement: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            name: NAME_WEIGHT,
            type_agreement: TYPE_WEIGHT,
        }
    }
}

/// Lowercase and strip `_`, `-` and spaces. No other characters are touched.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(['_', '-', ' '], "")
}

/// Normalized edit-distance similarity in `[0, 1]`.
///
/// `1 - distance / max(len)` over the normalized names; two names that both
/// normalize to the empty string score `1.0`.
pub fn name_similarity(left: &str, right: &str) -> f64 {
    let left = normalize_name(left);
    let right = normalize_name(right);
    let max_len = left.chars().count().max(right.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein::distance(left.chars(), right.chars());
    1.0 - distance as f64 / max_len as f64
}

/// Recursive structural agreement of two subtrees in `[0, 1]`.
///
/// Differing types score `0.0`; two childless nodes score `1.0`. Otherwise
/// each child name present on both sides contributes its name similarity and
/// the recursive score of the two children, and the sum is averaged. Children
/// are indexed by name with the last duplicate winning.
pub fn structural_similarity(left: &SchemaNode, right: &SchemaNode) -> f64 {
    StructuralCache::new().similarity(left, right)
}

/// [`structural_similarity`] memoized per node pair.
///
/// Pairs are keyed by node address; the borrow keeps both trees alive and
/// unchanged for as long as the cache exists.
#[derive(Debug, Default)]
pub struct StructuralCache<'n> {
    scores: HashMap<(*const SchemaNode, *const SchemaNode), f64>,
    trees: PhantomData<&'n SchemaNode>,
}

impl<'n> StructuralCache<'n> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn similarity(&mut self, left: &'n SchemaNode, right: &'n SchemaNode) -> f64 {
        let key = (ptr::from_ref(left), ptr::from_ref(right));
        if let Some(&score) = self.scores.get(&key) {
            return score;
        }
        let score = self.compute(left, right);
        self.scores.insert(key, score);
        score
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn compute(&mut self, left: &'n SchemaNode, right: &'n SchemaNode) -> f64 {
        if left.node_type() != right.node_type() {
            return 0.0;
        }
        if left.is_leaf() && right.is_leaf() {
            return 1.0;
        }

        let left_index = index_children(left);
        let right_index = index_children(right);

        let mut total = 0.0;
        let mut units = 0usize;
        for (name, &left_child) in &left_index {
            if let Some(&right_child) = right_index.get(name) {
                total += name_similarity(name, name);
                total += self.similarity(left_child, right_child);
                units += 2;
            }
        }

        if units == 0 {
            0.0
        } else {
            total / units as f64
        }
    }
}

/// Weighted name similarity plus type agreement.
///
/// With the default weights this is
/// `0.7 * name_similarity + 0.3 * (1.0 if types match else 0.0)`.
pub fn combined_similarity(source: &SchemaNode, target: &SchemaNode, weights: &ScoreWeights) -> f64 {
    let name = name_similarity(source.name(), target.name());
    let type_agreement = if source.node_type() == target.node_type() {
        1.0
    } else {
        0.0
    };
    weights.name * name + weights.type_agreement * type_agreement
}

fn index_children(node: &SchemaNode) -> BTreeMap<&str, &SchemaNode> {
    let mut index = BTreeMap::new();
    for child in node.children() {
        index.insert(child.name(), child);
    }
    index
}
