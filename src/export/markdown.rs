//! Markdown export implementation.
//!
//! Exports the analysis report in Markdown format for documentation and
//! code review comments.

use super::{ExportData, Exporter};
use crate::analysis::Distribution;
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl MarkdownExporter {
    /// Write a name/count/percent table for a distribution.
    fn write_distribution<W: Write>(
        writer: &mut W,
        title: &str,
        column: &str,
        distribution: &Distribution,
    ) -> io::Result<()> {
        if distribution.is_empty() {
            return Ok(());
        }

        writeln!(writer, "## {}", title)?;
        writeln!(writer)?;
        writeln!(writer, "| {} | Count | Share |", column)?;
        writeln!(writer, "|{}|-------|-------|", "-".repeat(column.len() + 2))?;
        for share in &distribution.entries {
            writeln!(
                writer,
                "| {} | {} | {:.1}% |",
                share.name, share.value, share.percent
            )?;
        }
        writeln!(writer)
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Maven Dependency Report")?;
        writeln!(writer)?;
        if let Some(project) = data.project() {
            writeln!(writer, "**Project:** `{}`", project)?;
            writeln!(writer)?;
        }

        // Summary section
        let stats = &data.stats;
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Total Nodes | {} |", stats.total)?;
        writeln!(writer, "| Max Depth | {} |", stats.max_depth)?;
        writeln!(writer, "| Omitted for Conflict | {} |", stats.conflicts)?;
        writeln!(writer, "| Omitted as Duplicate | {} |", stats.duplicates)?;
        writeln!(writer, "| Managed Versions | {} |", stats.managed)?;
        writeln!(
            writer,
            "| Multi-Version Artifacts | {} |",
            data.total_conflict_groups
        )?;
        writeln!(writer)?;

        // Version conflicts
        if !data.conflicts.is_empty() {
            writeln!(writer, "## Version Conflicts")?;
            writeln!(writer)?;
            if data.conflicts.len() < data.total_conflict_groups {
                writeln!(
                    writer,
                    "Showing the top {} of {} artifacts with several versions.",
                    data.conflicts.len(),
                    data.total_conflict_groups
                )?;
                writeln!(writer)?;
            }
            writeln!(writer, "| Artifact | Versions | Resolved | Omitted |")?;
            writeln!(writer, "|----------|----------|----------|---------|")?;
            for group in &data.conflicts {
                let resolved = group.winner.map_or("-", |w| w.version.as_str());
                writeln!(
                    writer,
                    "| `{}` | {} | {} | {} |",
                    group.key,
                    group.versions.join(", "),
                    resolved,
                    group.omitted.len()
                )?;
            }
            writeln!(writer)?;
        }

        Self::write_distribution(writer, "Group Weights", "Group", &data.group_weights)?;
        Self::write_distribution(writer, "Scopes", "Scope", &data.scopes)?;

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by mvnscope*")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::export::fixtures::SAMPLE;
    use crate::parser::parse_str;

    fn render(text: &str, config: &AnalysisConfig) -> String {
        let forest = parse_str(text);
        let data = ExportData::new(&forest, config);
        let mut output = Vec::new();
        MarkdownExporter.export(&data, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_markdown_export_basic() {
        let md_str = render(SAMPLE, &AnalysisConfig::default());

        assert!(md_str.contains("# Maven Dependency Report"));
        assert!(md_str.contains("**Project:** `com.example:shop:jar:2.1.0`"));
        assert!(md_str.contains("| Total Nodes | 9 |"));
        assert!(md_str.contains("| Omitted for Conflict | 1 |"));
        assert!(md_str.contains("| Managed Versions | 1 |"));
    }

    #[test]
    fn test_markdown_export_conflict_table() {
        let md_str = render(SAMPLE, &AnalysisConfig::default());

        assert!(md_str.contains("## Version Conflicts"));
        assert!(md_str.contains("| `org.slf4j:slf4j-api` | 1.7.32, 1.7.36 | 1.7.36 | 1 |"));
        assert!(!md_str.contains("Showing the top"));
    }

    #[test]
    fn test_markdown_export_truncated_conflicts_note() {
        let text = "\
g:root:jar:1
+- a:a:jar:1:compile
+- a:a:jar:2:compile
+- b:b:jar:1:compile
\\- b:b:jar:2:compile";
        let config = AnalysisConfig {
            top_conflicts: 1,
            ..AnalysisConfig::default()
        };
        let md_str = render(text, &config);
        assert!(md_str.contains("Showing the top 1 of 2 artifacts"));
    }

    #[test]
    fn test_markdown_export_distributions() {
        let md_str = render(SAMPLE, &AnalysisConfig::default());

        assert!(md_str.contains("## Group Weights"));
        assert!(md_str.contains("| org.springframework | 2 | 22.2% |"));
        assert!(md_str.contains("## Scopes"));
        assert!(md_str.contains("| compile | 6 | 66.7% |"));
        assert!(md_str.contains("| Scope | Count | Share |\n|-------|-------|-------|"));
    }

    #[test]
    fn test_markdown_export_footer() {
        let md_str = render(SAMPLE, &AnalysisConfig::default());

        assert!(md_str.contains("---"));
        assert!(md_str.contains("*Generated by mvnscope*"));
    }

    #[test]
    fn test_markdown_export_no_conflict_section_when_clean() {
        let md_str = render("g:root:jar:1\n\\- a:a:jar:1:compile", &AnalysisConfig::default());

        assert!(!md_str.contains("## Version Conflicts"));
        assert!(md_str.contains("| Multi-Version Artifacts | 0 |"));
    }
}
