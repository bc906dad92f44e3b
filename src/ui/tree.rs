//! Tree data structures for dependency visualization
//!
//! Provides `TreeNode`, which mirrors the parsed forest with expand state,
//! and `FlattenedNode` for rendering the tree as a scrollable list in the TUI.

use crate::analysis::SubtreeSummary;
use crate::parser::types::{MavenNode, Scope};

/// A node in the dependency tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Id of the parsed node this mirrors
    pub id: String,
    /// Maven groupId
    pub group_id: String,
    /// Maven artifactId
    pub artifact_id: String,
    /// Version as printed by Maven
    pub version: String,
    /// Scope, absent for the root
    pub scope: Option<String>,
    /// Child dependencies
    pub children: Vec<TreeNode>,
    /// Whether this node is expanded in the UI
    pub expanded: bool,
    /// Depth in the tree (0 = root)
    pub depth: usize,
    /// Annotation flags copied from the parsed node
    pub flags: NodeFlags,
    /// Version Maven picked instead (conflicts only)
    pub conflict_winner: Option<String>,
    /// Version before dependency management (managed only)
    pub managed_version: Option<String>,
    /// Whether some descendant is omitted for conflict
    pub subtree_conflict: bool,
    /// Whether some descendant has a managed version
    pub subtree_managed: bool,
}

/// Annotation flags of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeFlags {
    /// Omitted for conflict
    pub conflict: bool,
    /// Omitted as duplicate
    pub duplicate: bool,
    /// Version managed
    pub managed: bool,
}

impl NodeFlags {
    fn of(node: &MavenNode) -> Self {
        Self {
            conflict: node.is_conflict,
            duplicate: node.is_duplicate,
            managed: node.is_managed,
        }
    }
}

impl TreeNode {
    /// Mirror a parsed node and its whole subtree
    ///
    /// Everything starts collapsed.
    pub fn from_maven(node: &MavenNode) -> Self {
        let summary = SubtreeSummary::of(node);
        Self {
            id: node.id.clone(),
            group_id: node.group_id.clone(),
            artifact_id: node.artifact_id.clone(),
            version: node.version.clone(),
            scope: node.scope.clone(),
            children: node.children.iter().map(TreeNode::from_maven).collect(),
            expanded: false,
            depth: node.depth,
            flags: NodeFlags::of(node),
            conflict_winner: node.conflict_winner.clone(),
            managed_version: node.managed_version.clone(),
            subtree_conflict: summary.has_conflict,
            subtree_managed: summary.has_managed,
        }
    }

    /// Mirror a whole forest, with the roots expanded
    pub fn from_forest(forest: &[MavenNode]) -> Vec<TreeNode> {
        forest
            .iter()
            .map(|root| {
                let mut node = TreeNode::from_maven(root);
                node.expanded = node.has_children();
                node
            })
            .collect()
    }

    /// `groupId:artifactId`
    pub fn name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Toggle the expanded state
    pub fn toggle_expanded(&mut self) {
        if !self.children.is_empty() {
            self.expanded = !self.expanded;
        }
    }

    /// Check if this node has children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Expand every node on the way to a conflict
    ///
    /// Returns true if this subtree contains a conflict node. Nodes with
    /// no conflict underneath keep their current state.
    pub fn expand_conflicts(&mut self) -> bool {
        let mut found = false;
        for child in &mut self.children {
            found |= child.expand_conflicts();
        }
        if found {
            self.expanded = true;
        }
        found || self.flags.conflict
    }

    /// Expand every ancestor of the node with the given id
    ///
    /// Returns true if the node was found in this subtree.
    pub fn expand_to(&mut self, id: &str) -> bool {
        if self.id == id {
            return true;
        }
        for child in &mut self.children {
            if child.expand_to(id) {
                self.expanded = true;
                return true;
            }
        }
        false
    }

    /// Flatten the tree into a list for rendering
    ///
    /// Only includes nodes that are visible (i.e., all ancestors are expanded)
    pub fn flatten(&self) -> Vec<FlattenedNode> {
        let mut result = Vec::new();
        self.flatten_recursive(&mut result, true, 0, &mut Vec::new());
        result
    }

    fn flatten_recursive(
        &self,
        result: &mut Vec<FlattenedNode>,
        is_last: bool,
        level: usize,
        ancestors_last: &mut Vec<bool>,
    ) {
        result.push(FlattenedNode {
            id: self.id.clone(),
            name: self.name(),
            version: self.version.clone(),
            scope: self.scope.clone(),
            depth: self.depth,
            is_expanded: self.expanded,
            has_children: self.has_children(),
            is_last_child: is_last,
            prefix: tree_prefix(ancestors_last, is_last, level),
            flags: self.flags,
            conflict_winner: self.conflict_winner.clone(),
            managed_version: self.managed_version.clone(),
            hidden_conflict: !self.expanded && self.subtree_conflict,
        });

        if self.expanded {
            // Roots draw no connector, so they add no guide column
            if level > 0 {
                ancestors_last.push(is_last);
            }
            let child_count = self.children.len();
            for (i, child) in self.children.iter().enumerate() {
                let is_last_child = i == child_count - 1;
                child.flatten_recursive(result, is_last_child, level + 1, ancestors_last);
            }
            if level > 0 {
                ancestors_last.pop();
            }
        }
    }

    /// Find a node at a given flattened index and toggle its expansion
    ///
    /// Returns true if the toggle was successful
    pub fn toggle_at_index(&mut self, target_index: usize) -> bool {
        let mut current_index = 0;
        self.toggle_at_index_recursive(target_index, &mut current_index)
    }

    fn toggle_at_index_recursive(
        &mut self,
        target_index: usize,
        current_index: &mut usize,
    ) -> bool {
        if *current_index == target_index {
            self.toggle_expanded();
            return true;
        }
        *current_index += 1;

        if self.expanded {
            for child in &mut self.children {
                if child.toggle_at_index_recursive(target_index, current_index) {
                    return true;
                }
            }
        }
        false
    }
}

/// Flatten several roots into one list
pub fn flatten_forest(roots: &[TreeNode]) -> Vec<FlattenedNode> {
    let mut result = Vec::new();
    for (i, root) in roots.iter().enumerate() {
        root.flatten_recursive(&mut result, i + 1 == roots.len(), 0, &mut Vec::new());
    }
    result
}

/// Toggle the node at a flattened index across several roots
pub fn toggle_in_forest(roots: &mut [TreeNode], target_index: usize) -> bool {
    let mut current_index = 0;
    roots
        .iter_mut()
        .any(|root| root.toggle_at_index_recursive(target_index, &mut current_index))
}

/// Build the tree prefix (indentation and branch lines)
fn tree_prefix(ancestors_last: &[bool], is_last: bool, level: usize) -> String {
    if level == 0 {
        return String::new();
    }

    let mut prefix = String::new();
    for &last in ancestors_last {
        prefix.push_str(if last { "    " } else { "│   " });
    }
    prefix.push_str(if is_last { "└── " } else { "├── " });
    prefix
}

/// A flattened representation of a tree node for rendering
#[derive(Debug, Clone)]
pub struct FlattenedNode {
    /// Id of the parsed node
    pub id: String,
    /// `groupId:artifactId`
    pub name: String,
    /// Version as printed by Maven
    pub version: String,
    /// Scope, absent for the root
    pub scope: Option<String>,
    /// Depth in the tree
    pub depth: usize,
    /// Whether this node is currently expanded
    pub is_expanded: bool,
    /// Whether this node has children
    pub has_children: bool,
    /// Whether this is the last child of its parent
    pub is_last_child: bool,
    /// Guide lines and branch connector drawn before the row
    pub prefix: String,
    /// Annotation flags
    pub flags: NodeFlags,
    /// Version Maven picked instead (conflicts only)
    pub conflict_winner: Option<String>,
    /// Version before dependency management (managed only)
    pub managed_version: Option<String>,
    /// Collapsed, with a conflict somewhere underneath
    pub hidden_conflict: bool,
}

impl FlattenedNode {
    /// Build a standalone row for a parsed node (used for search results)
    pub fn from_maven(node: &MavenNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.key(),
            version: node.version.clone(),
            scope: node.scope.clone(),
            depth: node.depth,
            is_expanded: false,
            has_children: false,
            is_last_child: true,
            prefix: String::new(),
            flags: NodeFlags::of(node),
            conflict_winner: node.conflict_winner.clone(),
            managed_version: node.managed_version.clone(),
            hidden_conflict: false,
        }
    }

    /// Get the expansion indicator character
    pub fn expansion_indicator(&self) -> &'static str {
        if !self.has_children {
            "  "
        } else if self.is_expanded {
            "▼ "
        } else {
            "▶ "
        }
    }

    /// Canonical scope of the row, if any
    pub fn scope_kind(&self) -> Option<Scope> {
        self.scope.as_deref().and_then(|s| s.parse().ok())
    }
}
