//! JSON export implementation.
//!
//! Exports the forest and its aggregates in JSON format for machine-readable
//! output. Keys are camelCase so the node objects keep the same shape as
//! [`MavenNode`]'s own serialization.

use super::{ExportData, Exporter};
use crate::analysis::{ConflictGroup, Share, TreeStats};
use crate::parser::MavenNode;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Summary statistics for JSON output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<String>,
    #[serde(flatten)]
    stats: &'a TreeStats,
    conflict_groups: usize,
}

/// Serializable conflict group for JSON output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonConflict<'a> {
    key: &'a str,
    group_id: &'a str,
    artifact_id: &'a str,
    versions: &'a [String],
    occurrences: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<&'a str>,
    omitted: Vec<&'a str>,
}

impl<'a> From<&'a ConflictGroup<'a>> for JsonConflict<'a> {
    fn from(group: &'a ConflictGroup<'a>) -> Self {
        Self {
            key: &group.key,
            group_id: group.group_id(),
            artifact_id: group.artifact_id(),
            versions: &group.versions,
            occurrences: group.occurrences.len(),
            winner: group.winner.map(|w| w.version.as_str()),
            omitted: group.omitted.iter().map(|n| n.id.as_str()).collect(),
        }
    }
}

/// Root JSON export structure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    summary: JsonSummary<'a>,
    conflicts: Vec<JsonConflict<'a>>,
    group_weights: &'a [Share],
    scopes: &'a [Share],
    forest: &'a [MavenNode],
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        let export = JsonExport {
            summary: JsonSummary {
                project: data.project(),
                stats: &data.stats,
                conflict_groups: data.total_conflict_groups,
            },
            conflicts: data.conflicts.iter().map(JsonConflict::from).collect(),
            group_weights: &data.group_weights.entries,
            scopes: &data.scopes.entries,
            forest: data.forest,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
