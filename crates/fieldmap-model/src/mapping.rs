//! Mapping rules and the configuration that aggregates them.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::confidence::{ConfidenceLevel, ConfidenceThresholds};

/// How a matched value is carried from source to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transformation {
    /// Copy the value unchanged.
    #[default]
    Direct,
}

impl Transformation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
        }
    }
}

/// One proposed field-level transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRule {
    /// Dotted path from the source root to the matched field.
    pub source_path: String,
    /// Dotted path from the target root to the matched field.
    pub target_path: String,
    pub transformation: Transformation,
    /// Confidence score in `[0.0, 1.0]`.
    pub confidence_score: f64,
}

impl MappingRule {
    /// A `direct` rule; the confidence is clamped into `[0.0, 1.0]`.
    pub fn direct(
        source_path: impl Into<String>,
        target_path: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
            transformation: Transformation::Direct,
            confidence_score: confidence.clamp(0.0, 1.0),
        }
    }
}

/// The engine's output: rules in generation order plus their mean confidence.
///
/// Deserializing recomputes `overallConfidence` from the rules; any value in
/// the input is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ConfigurationRepr")]
pub struct MappingConfiguration {
    rules: Vec<MappingRule>,
    overall_confidence: f64,
    notes: String,
}

impl MappingConfiguration {
    /// Aggregate rules, computing `overall_confidence` as their arithmetic
    /// mean (`0.0` when there are none).
    pub fn from_rules(rules: Vec<MappingRule>, notes: impl Into<String>) -> Self {
        let overall_confidence = mean_confidence(&rules);
        Self {
            rules,
            overall_confidence,
            notes: notes.into(),
        }
    }

    pub fn empty(notes: impl Into<String>) -> Self {
        Self::from_rules(Vec::new(), notes)
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<MappingRule> {
        self.rules
    }

    pub fn overall_confidence(&self) -> f64 {
        self.overall_confidence
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule reading from the given source path.
    pub fn rule_for_source(&self, source_path: &str) -> Option<&MappingRule> {
        self.rules.iter().find(|rule| rule.source_path == source_path)
    }

    /// Every rule writing to the given target path.
    ///
    /// More than one rule may share a target; matching is local per level and
    /// does not enforce a one-to-one assignment.
    pub fn rules_for_target(&self, target_path: &str) -> Vec<&MappingRule> {
        self.rules
            .iter()
            .filter(|rule| rule.target_path == target_path)
            .collect()
    }

    /// Returns the count of rules at each confidence level.
    #[must_use]
    pub fn count_by_level(
        &self,
        thresholds: &ConfidenceThresholds,
    ) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for rule in &self.rules {
            if let Some(level) = thresholds.categorize(rule.confidence_score) {
                *counts.entry(level).or_insert(0) += 1;
            }
        }
        counts
    }

    #[must_use]
    pub fn min_confidence(&self) -> Option<f64> {
        self.rules
            .iter()
            .map(|rule| rule.confidence_score)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    #[must_use]
    pub fn max_confidence(&self) -> Option<f64> {
        self.rules
            .iter()
            .map(|rule| rule.confidence_score)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }
}

#[derive(Deserialize)]
struct ConfigurationRepr {
    rules: Vec<MappingRule>,
    notes: String,
}

impl From<ConfigurationRepr> for MappingConfiguration {
    fn from(repr: ConfigurationRepr) -> Self {
        Self::from_rules(repr.rules, repr.notes)
    }
}

fn mean_confidence(rules: &[MappingRule]) -> f64 {
    if rules.is_empty() {
        return 0.0;
    }
    let sum: f64 = rules.iter().map(|rule| rule.confidence_score).sum();
    sum / rules.len() as f64
}
