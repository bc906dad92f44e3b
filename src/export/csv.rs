//! CSV export implementation.
//!
//! Exports every node of the forest as one row, in pre-order, for
//! spreadsheet use.

use super::{status_label, ExportData, Exporter};
use crate::parser::walk_forest;
use std::io::{self, Write};

/// Column header written before the rows.
pub const HEADER: &str = "id,depth,groupId,artifactId,type,version,scope,status,winner,managedFrom";

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)?;

        // walk_forest takes an infallible visitor, so keep the first error
        let mut result = Ok(());
        walk_forest(data.forest, |node| {
            if result.is_err() {
                return;
            }
            let depth = node.depth.to_string();
            let fields: [&str; 10] = [
                &node.id,
                &depth,
                &node.group_id,
                &node.artifact_id,
                &node.packaging,
                &node.version,
                node.scope.as_deref().unwrap_or(""),
                status_label(node),
                node.conflict_winner.as_deref().unwrap_or(""),
                node.managed_version.as_deref().unwrap_or(""),
            ];
            let row: Vec<String> = fields.iter().map(|f| Self::escape_field(f)).collect();
            result = writeln!(writer, "{}", row.join(","));
        });

        result
    }
}
