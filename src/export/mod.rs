//! Export functionality for dependency-tree analysis results.
//!
//! This module provides exporters for outputting the parsed forest and its
//! aggregates in various formats: JSON, CSV, Markdown and a Maven-style
//! text tree.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod tree;

use crate::analysis::{
    conflict_groups, group_weights, scope_distribution, ConflictGroup, Distribution, TreeStats,
};
use crate::config::AnalysisConfig;
use crate::parser::MavenNode;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - one row per node
    Csv,
    /// Markdown format - documentation/reporting
    Markdown,
    /// Text tree - the forest re-rendered the way Maven prints it
    Tree,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "tree" => Ok(ExportFormat::Tree),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: tree, json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Tree => write!(f, "tree"),
        }
    }
}

/// Data container for export operations.
///
/// Holds the forest together with every aggregate an exporter may print.
#[derive(Debug, Clone)]
pub struct ExportData<'a> {
    /// The parsed forest
    pub forest: &'a [MavenNode],
    /// Node and annotation counters
    pub stats: TreeStats,
    /// Conflict groups, most versions first, limited to the configured top-N
    pub conflicts: Vec<ConflictGroup<'a>>,
    /// Number of conflict groups before the top-N limit
    pub total_conflict_groups: usize,
    /// Occurrences per groupId
    pub group_weights: Distribution,
    /// Occurrences per scope
    pub scopes: Distribution,
}

impl<'a> ExportData<'a> {
    /// Run every analysis over the forest.
    pub fn new(forest: &'a [MavenNode], config: &AnalysisConfig) -> Self {
        let mut conflicts = conflict_groups(forest);
        let total_conflict_groups = conflicts.len();
        conflicts.truncate(config.top_conflicts);

        Self {
            forest,
            stats: TreeStats::collect(forest),
            conflicts,
            total_conflict_groups,
            group_weights: group_weights(forest, config),
            scopes: scope_distribution(forest, config),
        }
    }

    /// Coordinate of the first root, used as the report title.
    pub fn project(&self) -> Option<String> {
        self.forest.first().map(MavenNode::to_string)
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData<'_>,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Csv => csv::CsvExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
        ExportFormat::Tree => tree::TreeExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData<'_>) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Short status label of a node: `conflict`, `duplicate` or `active`.
pub fn status_label(node: &MavenNode) -> &'static str {
    if node.is_conflict {
        "conflict"
    } else if node.is_duplicate {
        "duplicate"
    } else {
        "active"
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Small verbose tree with one conflict, one duplicate and one managed node.
    pub const SAMPLE: &str = "\
com.example:shop:jar:2.1.0
+- org.springframework:spring-core:jar:5.3.20:compile
|  \\- org.springframework:spring-jcl:jar:5.3.20:compile (version managed from 5.3.18)
+- org.slf4j:slf4j-api:jar:1.7.36:compile
+- ch.qos.logback:logback-classic:jar:1.2.11:compile
|  +- (org.slf4j:slf4j-api:jar:1.7.32:compile - omitted for conflict with 1.7.36)
|  \\- ch.qos.logback:logback-core:jar:1.2.11:compile
\\- junit:junit:jar:4.13.2:test
   \\- (org.hamcrest:hamcrest-core:jar:1.3:test - omitted for duplicate)";
}
