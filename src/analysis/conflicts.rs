//! Version conflict detection over a parsed dependency forest.
//!
//! Groups every occurrence by `groupId:artifactId` and reports the groups
//! that appear with more than one version. Maven's own mediation is taken
//! as given: the winner is the first occurrence Maven kept active.

use std::collections::{BTreeSet, HashMap};

use crate::parser::types::{walk_forest, MavenNode};

/// A `groupId:artifactId` seen with at least two distinct versions.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictGroup<'a> {
    /// The `groupId:artifactId` key.
    pub key: String,
    /// Distinct versions, sorted.
    pub versions: Vec<String>,
    /// Every occurrence in traversal order.
    pub occurrences: Vec<&'a MavenNode>,
    /// First occurrence that is neither a conflict nor a duplicate.
    pub winner: Option<&'a MavenNode>,
    /// Occurrences Maven omitted for conflict.
    pub omitted: Vec<&'a MavenNode>,
}

impl<'a> ConflictGroup<'a> {
    /// Number of distinct versions.
    pub fn count(&self) -> usize {
        self.versions.len()
    }

    /// The groupId part of the key.
    pub fn group_id(&self) -> &str {
        self.key.split(':').next().unwrap_or_default()
    }

    /// The artifactId part of the key.
    pub fn artifact_id(&self) -> &str {
        self.key.split(':').nth(1).unwrap_or_default()
    }

    /// Returns a one-line description.
    ///
    /// For example: "org.slf4j:slf4j-api: 1.7.25, 1.7.36 (resolved 1.7.36)"
    pub fn description(&self) -> String {
        let resolved = self
            .winner
            .map_or_else(|| "unresolved".to_string(), |w| format!("resolved {}", w.version));
        format!("{}: {} ({})", self.key, self.versions.join(", "), resolved)
    }
}

/// Collects every multi-version group, most versions first.
///
/// Groups with the same number of versions keep the order in which their
/// key first appeared.
///
/// # Example
///
/// ```
/// use mvnscope::analysis::conflict_groups;
/// use mvnscope::parser::parse_str;
///
/// let forest = parse_str("\
/// com.example:app:jar:1.0
/// +- org.slf4j:slf4j-api:jar:1.7.36:compile
/// \\- ch.qos.logback:logback-classic:jar:1.2.11:compile
///    \\- (org.slf4j:slf4j-api:jar:1.7.32:compile - omitted for conflict with 1.7.36)");
///
/// let groups = conflict_groups(&forest);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].key, "org.slf4j:slf4j-api");
/// assert_eq!(groups[0].count(), 2);
/// assert_eq!(groups[0].winner.unwrap().version, "1.7.36");
/// ```
pub fn conflict_groups(forest: &[MavenNode]) -> Vec<ConflictGroup<'_>> {
    let mut order: Vec<String> = Vec::new();
    let mut seen: HashMap<String, (BTreeSet<&str>, Vec<&MavenNode>)> = HashMap::new();

    walk_forest(forest, |node| {
        let key = node.key();
        let entry = seen.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (BTreeSet::new(), Vec::new())
        });
        entry.0.insert(node.version.as_str());
        entry.1.push(node);
    });

    let mut groups: Vec<ConflictGroup<'_>> = order
        .into_iter()
        .filter_map(|key| {
            let (versions, occurrences) = seen.remove(&key)?;
            if versions.len() < 2 {
                return None;
            }
            let winner = occurrences.iter().copied().find(|n| n.is_active());
            let omitted = occurrences.iter().copied().filter(|n| n.is_conflict).collect();
            Some(ConflictGroup {
                key,
                versions: versions.into_iter().map(str::to_string).collect(),
                occurrences,
                winner,
                omitted,
            })
        })
        .collect();

    // Stable sort keeps first-appearance order among equal counts.
    groups.sort_by(|a, b| b.count().cmp(&a.count()));
    groups
}

/// Returns the `limit` groups with the most versions.
pub fn top_conflicts(forest: &[MavenNode], limit: usize) -> Vec<ConflictGroup<'_>> {
    let mut groups = conflict_groups(forest);
    groups.truncate(limit);
    groups
}
