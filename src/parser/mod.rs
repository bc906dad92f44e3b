//! Parser module for mvnscope.
//!
//! Turns captured `mvn dependency:tree` output into a forest of
//! [`MavenNode`]s. Both the plain and the `-Dverbose` dialects are
//! understood; verbose annotations become flags on the nodes.
//!
//! # Example
//!
//! ```
//! use mvnscope::parser::parse_str;
//!
//! let text = "\
//! com.example:app:jar:1.0.0
//! +- com.fasterxml:classmate:jar:1.6.0:compile (version managed from 1.5.1)
//! \\- junit:junit:jar:4.13.2:test";
//!
//! let forest = parse_str(text);
//! let managed = &forest[0].children[0];
//! assert!(managed.is_managed);
//! assert_eq!(managed.managed_version.as_deref(), Some("1.5.1"));
//! ```

pub mod dependency_tree;
pub mod types;

// Re-export commonly used types for convenience
pub use dependency_tree::{
    classify_comment, parse_checked, parse_file, parse_str, split_annotation, ParseError,
    ParseResult,
};

pub use types::{walk_forest, Annotation, MavenNode, Scope};
