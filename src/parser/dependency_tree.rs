//! Parser for `mvn dependency:tree` output.
//!
//! Reconstructs the dependency forest from Maven's indentation-based text
//! rendering, including the annotations added by `-Dverbose`.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::types::{Annotation, MavenNode};

/// Branch markers used by Maven's tree renderer.
const MARKERS: [&str; 2] = ["+-", "\\-"];

/// Byte length of either branch marker.
const MARKER_LEN: usize = 2;

/// Width of one indentation unit (`"|  "`, `"   "`, `"+- "`, `"\- "`).
const INDENT_WIDTH: usize = 3;

/// Separators between a coordinate and its annotation, in priority order.
const COMMENT_SEPARATORS: [&str; 4] = [" - omitted", " (version managed", " - ", " ("];

/// Errors that can occur while reading dependency-tree output.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the input from disk.
    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),

    /// The input contained nothing but whitespace.
    #[error("Input is empty")]
    EmptyInput,

    /// No root coordinate could be found in the input.
    #[error("No dependency tree found; expected the output of 'mvn dependency:tree'")]
    NoRoot,
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses dependency-tree output into a forest.
///
/// Never fails: unparsable lines are skipped, and input without a usable
/// root yields an empty vector.
///
/// # Example
///
/// ```
/// use mvnscope::parser::parse_str;
///
/// let text = "\
/// [INFO] com.example:my-project:jar:1.0.0
/// [INFO] +- org.apache.commons:commons-lang3:jar:3.12.0:compile
/// [INFO] \\- (org.slf4j:slf4j-api:jar:1.7.25:compile - omitted for conflict with 1.7.36)";
///
/// let forest = parse_str(text);
/// let root = &forest[0];
/// assert_eq!(root.children.len(), 2);
/// assert_eq!(root.children[0].scope.as_deref(), Some("compile"));
/// assert!(root.children[1].is_conflict);
/// assert_eq!(root.children[1].conflict_winner.as_deref(), Some("1.7.36"));
/// ```
pub fn parse_str(text: &str) -> Vec<MavenNode> {
    let mut builder = TreeBuilder::default();
    let mut skipped = 0usize;

    for (index, line) in text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .enumerate()
    {
        let clean = strip_info_prefix(line.trim_end());

        let Some((offset, byte_pos)) = find_marker(clean) else {
            if builder.has_root() {
                continue;
            }
            match parse_root_line(index, clean) {
                Some(root) => {
                    tracing::debug!(id = %root.id, coordinate = %root, "found root declaration");
                    builder.push_root(root);
                }
                None => skipped += 1,
            }
            continue;
        };

        let level = offset / INDENT_WIDTH + 1;
        match parse_branch_line(index, line, &clean[byte_pos + MARKER_LEN..], level) {
            Some(node) => builder.attach(node, level),
            None => {
                tracing::debug!(line = index, text = %line.trim(), "skipping unparsable line");
                skipped += 1;
            }
        }
    }

    let forest = builder.finish();
    tracing::info!(
        roots = forest.len(),
        nodes = forest.iter().map(MavenNode::subtree_size).sum::<usize>(),
        skipped,
        "parsed dependency tree"
    );
    forest
}

/// Parses dependency-tree output, reporting an error when nothing was found.
///
/// # Example
///
/// ```
/// use mvnscope::parser::{parse_checked, ParseError};
///
/// assert!(matches!(parse_checked("   \n"), Err(ParseError::EmptyInput)));
/// assert!(matches!(parse_checked("BUILD SUCCESS"), Err(ParseError::NoRoot)));
/// assert_eq!(parse_checked("g:a:jar:1.0").unwrap().len(), 1);
/// ```
pub fn parse_checked(text: &str) -> ParseResult<Vec<MavenNode>> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let forest = parse_str(text);
    if forest.is_empty() {
        return Err(ParseError::NoRoot);
    }
    Ok(forest)
}

/// Reads and parses a file containing dependency-tree output.
pub fn parse_file(path: &Path) -> ParseResult<Vec<MavenNode>> {
    let content = fs::read_to_string(path)?;
    parse_checked(&content)
}

/// Classifies an annotation comment into its clauses.
///
/// Maven joins several notes with `;`, e.g.
/// `version managed from 1.0; omitted for duplicate`. Each clause becomes
/// one [`Annotation`]; blank comments yield nothing.
///
/// # Example
///
/// ```
/// use mvnscope::parser::{classify_comment, Annotation};
///
/// let notes = classify_comment(" - omitted for conflict with 1.7.36");
/// assert_eq!(notes, vec![Annotation::Conflict { winner: Some("1.7.36".into()) }]);
/// ```
pub fn classify_comment(comment: &str) -> Vec<Annotation> {
    comment
        .split(';')
        .map(|clause| clause.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .filter(|clause| !clause.is_empty())
        .map(classify_clause)
        .collect()
}

fn classify_clause(clause: &str) -> Annotation {
    if clause.contains("omitted for conflict") {
        Annotation::Conflict {
            winner: capture_version(winner_regex(), clause),
        }
    } else if clause.contains("omitted for duplicate") {
        Annotation::Duplicate
    } else if clause.contains("version managed from") {
        Annotation::Managed {
            from: capture_version(managed_regex(), clause),
        }
    } else {
        Annotation::Other(clause.to_string())
    }
}

fn winner_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"with\s+([\w.\-]+)").expect("valid regex"))
}

fn managed_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"from\s+([\w.\-]+)").expect("valid regex"))
}

fn capture_version(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Splits a dependency string into its coordinate and annotation comment.
///
/// The first matching separator wins; without one the whole string is the
/// coordinate.
pub fn split_annotation(dep: &str) -> (&str, Option<&str>) {
    COMMENT_SEPARATORS
        .iter()
        .find_map(|sep| dep.find(sep))
        .map_or((dep.trim(), None), |at| {
            (dep[..at].trim(), Some(dep[at..].trim()))
        })
}

/// Removes a leading `[INFO]` token and the single separator after it.
///
/// Anything past the separator is tree indentation: the children of the
/// last top-level dependency are printed as `[INFO]    \- ...`.
fn strip_info_prefix(line: &str) -> &str {
    match line.strip_prefix("[INFO]") {
        Some(rest) => rest
            .strip_prefix(' ')
            .or_else(|| rest.strip_prefix('\t'))
            .unwrap_or(rest),
        None => line,
    }
}

/// Returns the character offset and the byte position of the first branch
/// marker.
///
/// Depth is measured in characters so stray multi-byte glyphs in the
/// indentation don't inflate it.
fn find_marker(line: &str) -> Option<(usize, usize)> {
    let byte_pos = MARKERS.iter().filter_map(|m| line.find(m)).min()?;
    Some((line[..byte_pos].chars().count(), byte_pos))
}

fn parse_root_line(index: usize, clean: &str) -> Option<MavenNode> {
    let coordinate = clean.trim();
    if coordinate.chars().any(char::is_whitespace) {
        return None;
    }
    let fields: Vec<&str> = coordinate.split(':').collect();
    MavenNode::from_fields(format!("root-{}", index), &fields, 0)
        .map(|node| node.with_raw_line(clean))
}

fn parse_branch_line(index: usize, line: &str, after_marker: &str, level: usize) -> Option<MavenNode> {
    let mut dep = after_marker.trim();
    if let Some(inner) = dep.strip_prefix('(').and_then(|d| d.strip_suffix(')')) {
        dep = inner;
    }

    let (coordinate, comment) = split_annotation(dep);
    let fields: Vec<&str> = coordinate.split(':').collect();
    let mut node = MavenNode::from_fields(format!("node-{}", index), &fields, level)?
        .with_raw_line(line.trim_end());

    if let Some(comment) = comment {
        for annotation in classify_comment(comment) {
            node.apply_annotation(&annotation);
        }
        node.comment = Some(comment.to_string());
    }
    Some(node)
}

/// Assembles the forest from a stream of nodes tagged with indentation levels.
///
/// Holds the open path from the current root to the most recent node. A
/// node is moved into its parent's `children` once it is popped, so the
/// stack owns every node that may still receive children.
#[derive(Debug, Default)]
struct TreeBuilder {
    /// Open ancestors as `(indentation level, node)`.
    stack: Vec<(usize, MavenNode)>,
    /// Completed roots.
    roots: Vec<MavenNode>,
    /// Whether any root has been opened.
    rooted: bool,
}

impl TreeBuilder {
    fn has_root(&self) -> bool {
        self.rooted
    }

    fn push_root(&mut self, root: MavenNode) {
        self.close_to(0);
        self.rooted = true;
        self.stack.push((0, root));
    }

    fn attach(&mut self, mut node: MavenNode, level: usize) {
        if !self.rooted {
            tracing::debug!("no root declaration before first branch; using placeholder root");
            self.push_root(placeholder_root());
        }

        // Roots sit at level 0 and branches start at level 1, so the current
        // root is never closed here.
        self.close_to(level);

        let parent_depth = self.stack.last().map_or(0, |(_, parent)| parent.depth);
        node.depth = parent_depth + 1;
        self.stack.push((level, node));
    }

    /// Pops every open node at `level` or deeper.
    fn close_to(&mut self, level: usize) {
        while self.stack.last().is_some_and(|(top, _)| *top >= level) {
            self.pop();
        }
    }

    fn pop(&mut self) {
        let Some((_, node)) = self.stack.pop() else {
            return;
        };
        match self.stack.last_mut() {
            Some((_, parent)) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn finish(mut self) -> Vec<MavenNode> {
        while !self.stack.is_empty() {
            self.pop();
        }
        self.roots
    }
}

fn placeholder_root() -> MavenNode {
    MavenNode::new("root-placeholder", "unknown", "root", "pom", "0.0.0", 0).with_raw_line("root")
}
