//! Shared types for dependency-tree parsing.
//!
//! This module defines the node model produced by the parser and the
//! annotation variants Maven attaches to verbose tree entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback value for coordinate fields missing from a short coordinate.
pub const UNKNOWN: &str = "unknown";

/// Packaging assumed when a coordinate omits it.
pub const DEFAULT_PACKAGING: &str = "jar";

/// One occurrence of a dependency at one position of the tree.
///
/// The same `groupId:artifactId:version` may appear at several positions;
/// each occurrence is its own node. A node exclusively owns its children.
///
/// # Example
///
/// ```
/// use mvnscope::parser::parse_str;
///
/// let forest = parse_str("com.example:app:jar:1.0.0");
/// assert_eq!(forest.len(), 1);
/// assert_eq!(forest[0].artifact_id, "app");
/// assert_eq!(forest[0].depth, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenNode {
    /// Synthetic identifier, unique within one parse.
    pub id: String,

    /// Maven groupId (e.g. "org.slf4j").
    pub group_id: String,

    /// Maven artifactId (e.g. "slf4j-api").
    pub artifact_id: String,

    /// Packaging type (jar, pom, war, ...).
    #[serde(rename = "type")]
    pub packaging: String,

    /// Version string exactly as printed by Maven.
    pub version: String,

    /// Dependency scope; absent for the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Child dependencies in order of appearance.
    #[serde(default)]
    pub children: Vec<MavenNode>,

    /// Distance from the root (0 = root).
    pub depth: usize,

    /// Source line this node was parsed from.
    pub raw_line: String,

    /// Omitted because Maven selected another version.
    #[serde(default)]
    pub is_conflict: bool,

    /// Omitted because it was already resolved elsewhere in the tree.
    #[serde(default)]
    pub is_duplicate: bool,

    /// Version overridden by a `dependencyManagement` entry.
    #[serde(default)]
    pub is_managed: bool,

    /// Version Maven picked instead of this one (conflicts only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_winner: Option<String>,

    /// Version this node had before management (managed only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_version: Option<String>,

    /// Annotation text that followed the coordinate, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MavenNode {
    /// Creates a plain node from coordinate fields.
    ///
    /// Empty fields fall back to [`UNKNOWN`] (or [`DEFAULT_PACKAGING`] for
    /// the packaging type).
    pub fn new(
        id: impl Into<String>,
        group_id: &str,
        artifact_id: &str,
        packaging: &str,
        version: &str,
        depth: usize,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: or_default(group_id, UNKNOWN),
            artifact_id: or_default(artifact_id, UNKNOWN),
            packaging: or_default(packaging, DEFAULT_PACKAGING),
            version: or_default(version, UNKNOWN),
            scope: None,
            children: Vec::new(),
            depth,
            raw_line: String::new(),
            is_conflict: false,
            is_duplicate: false,
            is_managed: false,
            conflict_winner: None,
            managed_version: None,
            comment: None,
        }
    }

    /// Builds a node from colon-separated coordinate fields.
    ///
    /// Returns `None` when fewer than three fields are present.
    pub fn from_fields(id: impl Into<String>, fields: &[&str], depth: usize) -> Option<Self> {
        if fields.len() < 3 {
            return None;
        }
        let field = |i: usize| fields.get(i).copied().unwrap_or("");
        let mut node = Self::new(id, field(0), field(1), field(2), field(3), depth);
        node.scope = fields
            .get(4)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        Some(node)
    }

    /// Sets the source line.
    pub fn with_raw_line(mut self, raw_line: impl Into<String>) -> Self {
        self.raw_line = raw_line.into();
        self
    }

    /// Records an annotation on this node.
    ///
    /// A conflict always wins over a duplicate, so a node never carries
    /// both omission reasons.
    pub fn apply_annotation(&mut self, annotation: &Annotation) {
        match annotation {
            Annotation::Conflict { winner } => {
                self.is_conflict = true;
                self.is_duplicate = false;
                self.conflict_winner = winner.clone();
            }
            Annotation::Duplicate => {
                if !self.is_conflict {
                    self.is_duplicate = true;
                }
            }
            Annotation::Managed { from } => {
                self.is_managed = true;
                self.managed_version = from.clone();
            }
            Annotation::Other(_) => {}
        }
    }

    /// Returns the `groupId:artifactId` key used to group occurrences.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Returns `groupId:artifactId:version`.
    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// Returns the canonical scope, if the scope is one of the six known ones.
    pub fn scope_kind(&self) -> Option<Scope> {
        self.scope.as_deref().and_then(|s| s.parse().ok())
    }

    /// Returns true if this node is the resolved, active occurrence.
    pub fn is_active(&self) -> bool {
        !self.is_conflict && !self.is_duplicate
    }

    /// Returns true if this node has children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Visits this node and all descendants in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a MavenNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(MavenNode::subtree_size).sum::<usize>()
    }
}

impl fmt::Display for MavenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.group_id, self.artifact_id, self.packaging, self.version
        )?;
        if let Some(scope) = &self.scope {
            write!(f, ":{}", scope)?;
        }
        Ok(())
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Visits every node of a forest in pre-order.
pub fn walk_forest<'a>(forest: &'a [MavenNode], mut visit: impl FnMut(&'a MavenNode)) {
    for root in forest {
        root.walk(&mut visit);
    }
}

/// An annotation Maven attaches to a verbose tree entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// `omitted for conflict with <winner>`
    Conflict {
        /// The version Maven selected instead.
        winner: Option<String>,
    },
    /// `omitted for duplicate`
    Duplicate,
    /// `version managed from <from>`
    Managed {
        /// The version before `dependencyManagement` applied.
        from: Option<String>,
    },
    /// Any other note (e.g. `omitted for cycle`, `scope not updated`).
    Other(String),
}

/// The six canonical Maven dependency scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Default scope, available everywhere.
    Compile,
    /// Only for compiling and running tests.
    Test,
    /// Provided by the container at runtime.
    Provided,
    /// Not needed for compilation, only at runtime.
    Runtime,
    /// Like provided, but from an explicit path.
    System,
    /// BOM import in `dependencyManagement`.
    Import,
}

impl Scope {
    /// All scopes in display order.
    pub const ALL: [Scope; 6] = [
        Scope::Compile,
        Scope::Test,
        Scope::Provided,
        Scope::Runtime,
        Scope::System,
        Scope::Import,
    ];

    /// Returns the scope as Maven spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Test => "test",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::System => "system",
            Scope::Import => "import",
        }
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .iter()
            .copied()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| format!("Unknown scope: '{}'", s))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
