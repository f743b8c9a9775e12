//! The semantic match capability used by the second matching tier.
//!
//! An oracle receives the still-unmatched source and target field names of
//! one level and proposes name-to-name pairs by meaning. The engine does not
//! care how the pairs are produced: a language model behind
//! [`CompletionOracle`], a static [`SynonymTable`], or nothing at all.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::OracleError;
use crate::score::normalize_name;

/// Source name to target name pairs proposed by an oracle.
pub type OracleMatches = BTreeMap<String, String>;

/// Proposes semantic matches between two lists of field names.
pub trait SemanticOracle {
    /// Short label used in logs and provenance notes.
    fn name(&self) -> &str;

    /// Propose pairs drawn from `source` and `target`. Either list may be empty.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] when the backing service is unavailable or
    /// answers with something that cannot be interpreted.
    fn propose_matches(
        &self,
        source: &[&str],
        target: &[&str],
    ) -> Result<OracleMatches, OracleError>;
}

/// Oracle that never proposes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSemanticMatches;

impl SemanticOracle for NoSemanticMatches {
    fn name(&self) -> &str {
        "none"
    }

    fn propose_matches(
        &self,
        _source: &[&str],
        _target: &[&str],
    ) -> Result<OracleMatches, OracleError> {
        Ok(OracleMatches::new())
    }
}

/// Static groups of interchangeable field names.
///
/// Names are compared after [`normalize_name`], so `first_name` and
/// `firstName` are always considered the same word. Each source takes the
/// first unclaimed target it shares a group with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymTable {
    groups: Vec<BTreeSet<String>>,
}

impl SynonymTable {
    pub fn new<I, G, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        groups
            .into_iter()
            .fold(Self::default(), |table, group| table.with_group(group))
    }

    /// Add one group; empty groups are ignored.
    #[must_use]
    pub fn with_group<G, S>(mut self, group: G) -> Self
    where
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let group: BTreeSet<String> = group
            .into_iter()
            .map(|name| normalize_name(name.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();
        if !group.is_empty() {
            self.groups.push(group);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn are_synonyms(&self, left: &str, right: &str) -> bool {
        let left = normalize_name(left);
        let right = normalize_name(right);
        if left == right {
            return true;
        }
        self.groups
            .iter()
            .any(|group| group.contains(&left) && group.contains(&right))
    }
}

impl SemanticOracle for SynonymTable {
    fn name(&self) -> &str {
        "synonym-table"
    }

    fn propose_matches(
        &self,
        source: &[&str],
        target: &[&str],
    ) -> Result<OracleMatches, OracleError> {
        let mut claimed = BTreeSet::new();
        let mut matches = OracleMatches::new();
        for source_name in source {
            let found = target
                .iter()
                .find(|target_name| {
                    !claimed.contains(*target_name) && self.are_synonyms(source_name, target_name)
                })
                .copied();
            if let Some(target_name) = found {
                claimed.insert(target_name);
                matches.insert((*source_name).to_string(), target_name.to_string());
            }
        }
        Ok(matches)
    }
}

/// Oracle backed by a text-completion function, typically a language model.
///
/// The function receives the prompt built by [`matching_prompt`] and returns
/// the raw reply, which is read with [`parse_match_lines`].
pub struct CompletionOracle<F> {
    label: String,
    complete: F,
}

impl<F> CompletionOracle<F>
where
    F: Fn(&str) -> Result<String, OracleError>,
{
    pub fn new(label: impl Into<String>, complete: F) -> Self {
        Self {
            label: label.into(),
            complete,
        }
    }
}

impl<F> std::fmt::Debug for CompletionOracle<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionOracle")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<F> SemanticOracle for CompletionOracle<F>
where
    F: Fn(&str) -> Result<String, OracleError>,
{
    fn name(&self) -> &str {
        &self.label
    }

    fn propose_matches(
        &self,
        source: &[&str],
        target: &[&str],
    ) -> Result<OracleMatches, OracleError> {
        if source.is_empty() || target.is_empty() {
            return Ok(OracleMatches::new());
        }
        let reply = (self.complete)(&matching_prompt(source, target))?;
        Ok(parse_match_lines(&reply))
    }
}

/// Prompt asking a language model to pair two field lists by meaning.
pub fn matching_prompt(source: &[&str], target: &[&str]) -> String {
    format!(
        "Analyze these two sets of field names from JSON schemas and suggest the most likely \
         matches based on their semantic meaning. Return only the matching pairs in the format \
         \"source:target\", one pair per line.\n\
         \n\
         Source fields: {}\n\
         Target fields: {}\n\
         \n\
         Consider:\n\
         1. Synonyms (e.g., \"customer\" and \"client\")\n\
         2. Abbreviations (e.g., \"addr\" and \"address\")\n\
         3. Different naming conventions (e.g., \"first_name\" and \"firstName\")\n\
         4. Related concepts (e.g., \"price\" and \"amount\")\n",
        source.join(", "),
        target.join(", "),
    )
}

/// Read `source:target` pairs, one per line.
///
/// A line counts only when it splits on `:` into exactly two non-blank parts;
/// everything else (prose, bullet headers, `a:b:c`) is skipped. A later line
/// for the same source replaces an earlier one.
pub fn parse_match_lines(reply: &str) -> OracleMatches {
    let mut matches = OracleMatches::new();
    for line in reply.lines() {
        let mut parts = line.split(':');
        let (Some(source), Some(target), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        let (source, target) = (source.trim(), target.trim());
        if source.is_empty() || target.is_empty() {
            continue;
        }
        matches.insert(source.to_string(), target.to_string());
    }
    matches
}
