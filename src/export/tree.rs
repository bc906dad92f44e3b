//! Text tree export implementation.
//!
//! Re-renders the forest the way `mvn dependency:tree -Dverbose` prints it,
//! so the output can be fed back into the parser or diffed against Maven.

use super::{ExportData, Exporter};
use crate::parser::{classify_comment, Annotation, MavenNode};
use std::io::{self, Write};

/// Text tree exporter implementation.
pub struct TreeExporter;

impl TreeExporter {
    /// Formats a node the way Maven prints it after the branch marker.
    ///
    /// Omitted nodes are wrapped in parentheses with their notes after
    /// `" - "`; active nodes with notes get them in trailing parentheses.
    pub fn label(node: &MavenNode) -> String {
        let mut notes = Vec::new();
        if node.is_managed {
            notes.push(match &node.managed_version {
                Some(from) => format!("version managed from {}", from),
                None => "version managed".to_string(),
            });
        }
        if node.is_conflict {
            notes.push(match &node.conflict_winner {
                Some(winner) => format!("omitted for conflict with {}", winner),
                None => "omitted for conflict".to_string(),
            });
        } else if node.is_duplicate {
            notes.push("omitted for duplicate".to_string());
        }
        if let Some(comment) = &node.comment {
            notes.extend(classify_comment(comment).into_iter().filter_map(|a| match a {
                Annotation::Other(text) => Some(text),
                _ => None,
            }));
        }

        if !node.is_active() {
            format!("({} - {})", node, notes.join("; "))
        } else if notes.is_empty() {
            node.to_string()
        } else {
            format!("{} ({})", node, notes.join("; "))
        }
    }

    fn write_children<W: Write>(
        writer: &mut W,
        children: &[MavenNode],
        prefix: &str,
    ) -> io::Result<()> {
        for (i, child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            let marker = if last { "\\- " } else { "+- " };
            writeln!(writer, "{}{}{}", prefix, marker, Self::label(child))?;

            let next = format!("{}{}", prefix, if last { "   " } else { "|  " });
            Self::write_children(writer, &child.children, &next)?;
        }
        Ok(())
    }
}

impl Exporter for TreeExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        for root in data.forest {
            writeln!(writer, "{}", root)?;
            Self::write_children(writer, &root.children, "")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::export::fixtures::SAMPLE;
    use crate::parser::parse_str;

    fn render(text: &str) -> String {
        let forest = parse_str(text);
        let data = ExportData::new(&forest, &AnalysisConfig::default());
        let mut output = Vec::new();
        TreeExporter.export(&data, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_tree_export_matches_maven_layout() {
        assert_eq!(render(SAMPLE).trim_end(), SAMPLE);
    }

    #[test]
    fn test_tree_export_strips_info_prefix() {
        let text = "\
[INFO] com.example:app:jar:1.0
[INFO] +- a:b:jar:1.0:compile
[INFO] |  \\- c:d:jar:2.0:runtime
[INFO] \\- e:f:jar:3.0:test";
        assert_eq!(
            render(text),
            "com.example:app:jar:1.0\n+- a:b:jar:1.0:compile\n|  \\- c:d:jar:2.0:runtime\n\\- e:f:jar:3.0:test\n"
        );
    }

    #[test]
    fn test_tree_export_reparses_to_same_forest() {
        let forest = parse_str(SAMPLE);
        let rendered = render(SAMPLE);
        assert_eq!(parse_str(&rendered), forest);
    }

    #[test]
    fn test_label_combined_notes() {
        let text = "\
g:root:jar:1
\\- (x:y:jar:1.0:compile - version managed from 0.9; omitted for duplicate)";
        let forest = parse_str(text);
        let node = &forest[0].children[0];
        assert_eq!(
            TreeExporter::label(node),
            "(x:y:jar:1.0:compile - version managed from 0.9; omitted for duplicate)"
        );
    }

    #[test]
    fn test_label_keeps_other_notes() {
        let forest = parse_str("g:root:jar:1\n\\- x:y:jar:1.0:compile (scope not updated to compile)");
        let node = &forest[0].children[0];
        assert_eq!(
            TreeExporter::label(node),
            "x:y:jar:1.0:compile (scope not updated to compile)"
        );
    }

    #[test]
    fn test_tree_export_empty_forest() {
        assert_eq!(render(""), "");
    }
}
