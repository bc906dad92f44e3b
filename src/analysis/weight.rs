//! Weight analysis: how the tree is spread across groupIds and scopes.
//!
//! Both views are raw occurrence counts. Every node counts, including
//! duplicates and omitted conflicts, so the numbers describe the size of
//! the printed tree rather than the set of distinct artifacts.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::parser::types::{walk_forest, MavenNode, Scope};

/// Label of the bucket collecting entries below the threshold.
pub const OTHER_LABEL: &str = "Other";

/// One slice of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    /// GroupId, scope, or [`OTHER_LABEL`].
    pub name: String,
    /// Number of node occurrences.
    pub value: usize,
    /// Share of all nodes, in percent.
    pub percent: f64,
}

/// A frequency distribution with small entries collapsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    /// Total number of nodes the percentages refer to.
    pub total: usize,
    /// Entries sorted by value descending; "Other" comes last if present.
    pub entries: Vec<Share>,
}

impl Distribution {
    /// Builds a distribution from counts in first-seen order.
    ///
    /// Entries whose share is below `threshold_percent` are summed into a
    /// single [`OTHER_LABEL`] entry appended after the rest. Entries with
    /// equal counts keep their input order.
    pub fn collapse(counts: Vec<(String, usize)>, total: usize, threshold_percent: f64) -> Self {
        if total == 0 {
            return Self::default();
        }

        let percent_of = |value: usize| value as f64 / total as f64 * 100.0;

        let mut entries: Vec<Share> = counts
            .into_iter()
            .map(|(name, value)| Share {
                name,
                value,
                percent: percent_of(value),
            })
            .collect();
        entries.sort_by(|a, b| b.value.cmp(&a.value));

        let (mut kept, small): (Vec<Share>, Vec<Share>) = entries
            .into_iter()
            .partition(|share| share.percent >= threshold_percent);

        let other: usize = small.iter().map(|share| share.value).sum();
        if other > 0 {
            kept.push(Share {
                name: OTHER_LABEL.to_string(),
                value: other,
                percent: percent_of(other),
            });
        }

        Self { total, entries: kept }
    }

    /// Keeps at most `limit` entries.
    pub fn truncate(mut self, limit: usize) -> Self {
        self.entries.truncate(limit);
        self
    }

    /// Returns true if the distribution has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&Share> {
        self.entries.iter().find(|share| share.name == name)
    }
}

/// Counts node occurrences per groupId, in first-seen order.
pub fn group_counts(forest: &[MavenNode]) -> Vec<(String, usize)> {
    let mut counts = OrderedCounts::default();
    walk_forest(forest, |node| counts.add(&node.group_id));
    counts.into_vec()
}

/// Counts node occurrences per scope.
///
/// The six canonical scopes are always present (possibly at zero) and come
/// first; any other scope string follows in first-seen order. Nodes without
/// a scope are not counted.
pub fn scope_counts(forest: &[MavenNode]) -> Vec<(String, usize)> {
    let mut counts = OrderedCounts::default();
    for scope in Scope::ALL {
        counts.touch(scope.as_str());
    }
    walk_forest(forest, |node| {
        if let Some(scope) = &node.scope {
            counts.add(scope);
        }
    });
    counts.into_vec()
}

/// Distribution of node occurrences across groupIds.
///
/// # Example
///
/// ```
/// use mvnscope::analysis::group_weights;
/// use mvnscope::config::AnalysisConfig;
/// use mvnscope::parser::parse_str;
///
/// let forest = parse_str("\
/// com.example:app:jar:1.0
/// +- org.springframework:spring-core:jar:5.3.20:compile
/// \\- org.springframework:spring-jcl:jar:5.3.20:compile");
///
/// let weights = group_weights(&forest, &AnalysisConfig::default());
/// assert_eq!(weights.entries[0].name, "org.springframework");
/// assert_eq!(weights.entries[0].value, 2);
/// ```
pub fn group_weights(forest: &[MavenNode], config: &AnalysisConfig) -> Distribution {
    Distribution::collapse(
        group_counts(forest),
        total_nodes(forest),
        config.other_threshold_percent,
    )
    .truncate(config.max_group_entries)
}

/// Distribution of node occurrences across scopes.
///
/// Percentages are relative to all nodes, including scope-less roots.
pub fn scope_distribution(forest: &[MavenNode], config: &AnalysisConfig) -> Distribution {
    Distribution::collapse(
        scope_counts(forest),
        total_nodes(forest),
        config.other_threshold_percent,
    )
}

fn total_nodes(forest: &[MavenNode]) -> usize {
    forest.iter().map(MavenNode::subtree_size).sum()
}

/// Counter that remembers the order in which keys first appeared.
#[derive(Default)]
struct OrderedCounts {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl OrderedCounts {
    fn touch(&mut self, key: &str) -> &mut usize {
        if !self.counts.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.counts.entry(key.to_string()).or_insert(0)
    }

    fn add(&mut self, key: &str) {
        *self.touch(key) += 1;
    }

    fn into_vec(mut self) -> Vec<(String, usize)> {
        self.order
            .into_iter()
            .map(|key| {
                let count = self.counts.remove(&key).unwrap_or(0);
                (key, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn counts(pairs: &[(&str, usize)]) -> Vec<(String, usize)> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_collapse_small_entries_into_other() {
        let dist = Distribution::collapse(
            counts(&[("small-a", 1), ("big", 90), ("small-b", 1), ("mid", 8)]),
            100,
            2.0,
        );
        let names: Vec<&str> = dist.entries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["big", "mid", OTHER_LABEL]);
        assert_eq!(dist.get(OTHER_LABEL).unwrap().value, 2);
        assert!((dist.get("big").unwrap().percent - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_collapse_threshold_is_inclusive() {
        let dist = Distribution::collapse(counts(&[("edge", 2), ("rest", 98)]), 100, 2.0);
        assert!(dist.get("edge").is_some());
        assert!(dist.get(OTHER_LABEL).is_none());
    }

    #[test]
    fn test_collapse_ties_keep_input_order() {
        let dist = Distribution::collapse(counts(&[("b", 5), ("a", 5), ("c", 10)]), 20, 0.0);
        let names: Vec<&str> = dist.entries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_collapse_empty_total() {
        let dist = Distribution::collapse(counts(&[("compile", 0)]), 0, 2.0);
        assert!(dist.is_empty());
        assert_eq!(dist.total, 0);
    }

    #[test]
    fn test_group_weights_count_every_occurrence() {
        let text = "\
com.example:app:jar:1.0
+- org.slf4j:slf4j-api:jar:1.7.36:compile
\\- ch.qos.logback:logback-classic:jar:1.2.11:compile
   \\- (org.slf4j:slf4j-api:jar:1.7.32:compile - omitted for conflict with 1.7.36)";
        let forest = parse_str(text);
        let weights = group_weights(&forest, &AnalysisConfig::default());
        assert_eq!(weights.total, 4);
        assert_eq!(weights.entries[0].name, "org.slf4j");
        assert_eq!(weights.entries[0].value, 2);
        assert_eq!(weights.entries.len(), 3);
    }

    #[test]
    fn test_group_weights_capped() {
        let mut text = String::from("g:root:jar:1\n");
        for i in 0..20 {
            text.push_str(&format!("+- group{i}:a:jar:1:compile\n"));
        }
        let forest = parse_str(&text);
        let config = AnalysisConfig::default();
        let weights = group_weights(&forest, &config);
        assert_eq!(weights.entries.len(), config.max_group_entries);
    }

    #[test]
    fn test_scope_counts_have_stable_shape() {
        let forest = parse_str("g:root:jar:1\n+- a:b:jar:1:test");
        let scopes = scope_counts(&forest);
        let names: Vec<&str> = scopes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["compile", "test", "provided", "runtime", "system", "import"]
        );
        assert_eq!(scopes[1].1, 1);
        assert_eq!(scopes[0].1, 0);
    }

    #[test]
    fn test_scope_counts_keep_unknown_scopes() {
        let forest = parse_str("g:root:jar:1\n+- a:b:jar:1:weird");
        let scopes = scope_counts(&forest);
        assert_eq!(scopes.len(), 7);
        assert_eq!(scopes[6], ("weird".to_string(), 1));
    }

    #[test]
    fn test_scope_distribution_relative_to_all_nodes() {
        let text = "\
g:root:jar:1
+- a:a:jar:1:compile
+- b:b:jar:1:compile
\\- c:c:jar:1:test";
        let forest = parse_str(text);
        let dist = scope_distribution(&forest, &AnalysisConfig::default());
        assert_eq!(dist.total, 4);
        let compile = dist.get("compile").unwrap();
        assert_eq!(compile.value, 2);
        assert!((compile.percent - 50.0).abs() < 1e-9);
        // Unused scopes fall below the threshold and contribute nothing.
        assert!(dist.get("provided").is_none());
        assert!(dist.get(OTHER_LABEL).is_none());
    }

    #[test]
    fn test_empty_forest_distributions() {
        let config = AnalysisConfig::default();
        assert!(group_weights(&[], &config).is_empty());
        assert!(scope_distribution(&[], &config).is_empty());
        assert_eq!(scope_counts(&[]).len(), 6);
    }
}
