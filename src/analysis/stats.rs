//! Counters and search over a dependency forest.

use serde::Serialize;

use crate::parser::types::{walk_forest, MavenNode};

/// Summary counters for a whole forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    /// Number of root nodes.
    pub roots: usize,
    /// Number of nodes, roots included.
    pub total: usize,
    /// Nodes omitted for conflict.
    pub conflicts: usize,
    /// Nodes omitted as duplicates.
    pub duplicates: usize,
    /// Nodes whose version was managed.
    pub managed: usize,
    /// Deepest depth seen (0 when only roots exist).
    pub max_depth: usize,
}

impl TreeStats {
    /// Counts nodes and annotations across the forest.
    ///
    /// # Example
    ///
    /// ```
    /// use mvnscope::analysis::TreeStats;
    /// use mvnscope::parser::parse_str;
    ///
    /// let forest = parse_str("\
    /// com.example:app:jar:1.0
    /// \\- (junit:junit:jar:4.12:test - omitted for duplicate)");
    ///
    /// let stats = TreeStats::collect(&forest);
    /// assert_eq!(stats.total, 2);
    /// assert_eq!(stats.duplicates, 1);
    /// ```
    pub fn collect(forest: &[MavenNode]) -> Self {
        let mut stats = Self {
            roots: forest.len(),
            ..Self::default()
        };
        walk_forest(forest, |node| {
            stats.total += 1;
            stats.conflicts += usize::from(node.is_conflict);
            stats.duplicates += usize::from(node.is_duplicate);
            stats.managed += usize::from(node.is_managed);
            stats.max_depth = stats.max_depth.max(node.depth);
        });
        stats
    }
}

/// Returns true if `term` occurs in the node's groupId, artifactId or version.
///
/// Matching is a case-insensitive substring test. An empty term matches
/// nothing.
pub fn matches_term(node: &MavenNode, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    let needle = term.to_lowercase();
    [&node.group_id, &node.artifact_id, &node.version]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Collects every node matching `term`, in pre-order.
pub fn search<'a>(forest: &'a [MavenNode], term: &str) -> Vec<&'a MavenNode> {
    let mut hits = Vec::new();
    walk_forest(forest, |node| {
        if matches_term(node, term) {
            hits.push(node);
        }
    });
    hits
}

/// Collects the root-to-node chain of every node matching `term`, in pre-order.
///
/// Each chain starts at a root and ends at the matching node. The forest is
/// walked once, keeping the current ancestors on a stack.
///
/// # Example
///
/// ```
/// use mvnscope::analysis::search_paths;
/// use mvnscope::parser::parse_str;
///
/// let forest = parse_str("\
/// com.example:app:jar:1.0
/// \\- ch.qos.logback:logback-classic:jar:1.2.11:compile
///    \\- org.slf4j:slf4j-api:jar:1.7.32:compile");
///
/// let paths = search_paths(&forest, "slf4j");
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].len(), 3);
/// ```
pub fn search_paths<'a>(forest: &'a [MavenNode], term: &str) -> Vec<Vec<&'a MavenNode>> {
    fn descend<'a>(
        node: &'a MavenNode,
        term: &str,
        stack: &mut Vec<&'a MavenNode>,
        paths: &mut Vec<Vec<&'a MavenNode>>,
    ) {
        stack.push(node);
        if matches_term(node, term) {
            paths.push(stack.clone());
        }
        for child in &node.children {
            descend(child, term, stack, paths);
        }
        stack.pop();
    }

    let mut paths = Vec::new();
    if term.is_empty() {
        return paths;
    }
    let mut stack = Vec::new();
    for root in forest {
        descend(root, term, &mut stack, &mut paths);
    }
    paths
}

/// What lies underneath a node, used to decorate collapsed rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubtreeSummary {
    /// Some descendant is omitted for conflict.
    pub has_conflict: bool,
    /// Some descendant has a managed version.
    pub has_managed: bool,
}

impl SubtreeSummary {
    /// Summarizes the descendants of `node` (the node itself excluded).
    pub fn of(node: &MavenNode) -> Self {
        let mut summary = Self::default();
        for child in &node.children {
            child.walk(&mut |n| {
                summary.has_conflict |= n.is_conflict;
                summary.has_managed |= n.is_managed;
            });
        }
        summary
    }
}
