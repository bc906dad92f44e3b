//! Analysis of a parsed dependency forest.
//!
//! This module derives the aggregate views shown by the report and the
//! TUI from the forest produced by [`crate::parser`].
//!
//! # Features
//!
//! - Group occurrences by `groupId:artifactId` and flag multi-version groups
//! - Rank conflict groups by how many versions they carry
//! - Measure how the tree is spread across groupIds and scopes
//! - Count conflicts, duplicates and managed versions
//! - Case-insensitive search, with the root-to-node chain of each hit
//!
//! # Example
//!
//! ```
//! use mvnscope::analysis::{group_weights, top_conflicts, TreeStats};
//! use mvnscope::config::AnalysisConfig;
//! use mvnscope::parser::parse_str;
//!
//! let forest = parse_str("\
//! com.example:app:jar:1.0
//! +- org.slf4j:slf4j-api:jar:1.7.36:compile
//! \\- ch.qos.logback:logback-classic:jar:1.2.11:compile
//!    \\- (org.slf4j:slf4j-api:jar:1.7.32:compile - omitted for conflict with 1.7.36)");
//!
//! let config = AnalysisConfig::default();
//! assert_eq!(top_conflicts(&forest, config.top_conflicts).len(), 1);
//! assert_eq!(TreeStats::collect(&forest).conflicts, 1);
//! assert_eq!(group_weights(&forest, &config).entries[0].name, "org.slf4j");
//! ```

pub mod conflicts;
pub mod stats;
pub mod weight;

// Re-export main types for convenience
pub use conflicts::{conflict_groups, top_conflicts, ConflictGroup};
pub use stats::{matches_term, search, search_paths, SubtreeSummary, TreeStats};
pub use weight::{
    group_counts, group_weights, scope_counts, scope_distribution, Distribution, Share,
    OTHER_LABEL,
};
