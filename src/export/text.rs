//! Plain text export implementation.
//!
//! Renders the analysis for terminal output.

use super::{ExportData, Exporter, LoadOrderOutcome};
use std::io::{self, Write};

/// Plain text exporter implementation.
pub struct TextExporter;

const RULE: &str = "==================================================";

impl Exporter for TextExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", RULE)?;
        writeln!(writer, "DEPENDENCY GRAPH ANALYSIS: {}", data.source)?;
        writeln!(writer, "{}", RULE)?;
        writeln!(writer)?;

        writeln!(writer, "Packages:")?;
        for package in &data.packages {
            writeln!(
                writer,
                "  {} -> [{}]",
                package.name,
                package.dependencies.join(", ")
            )?;
        }
        writeln!(writer)?;

        writeln!(writer, "Statistics:")?;
        writeln!(writer, "  packages:            {}", data.summary.packages)?;
        writeln!(writer, "  declaring packages:  {}", data.summary.declared)?;
        writeln!(writer, "  dependency edges:    {}", data.summary.edges)?;
        writeln!(writer, "  leaf packages:       {}", data.summary.leaves)?;
        writeln!(writer)?;

        if data.cycles.is_empty() {
            writeln!(writer, "Circular dependencies: none")?;
        } else {
            writeln!(writer, "Circular dependencies ({}):", data.cycles.len())?;
            for (i, cycle) in data.cycles.iter().enumerate() {
                writeln!(writer, "  {}. {}", i + 1, cycle)?;
            }
        }
        writeln!(writer)?;

        if !data.traversals.is_empty() {
            writeln!(writer, "Traversal (max depth {}):", data.max_depth)?;
            for traversal in &data.traversals {
                writeln!(
                    writer,
                    "  {}: [{}]",
                    traversal.start,
                    traversal.order.join(", ")
                )?;
            }
            writeln!(writer)?;
        }

        if let Some(outcome) = &data.load_order {
            write_load_order(outcome, writer)?;
        }

        Ok(())
    }
}

/// Writes a load-order outcome as a numbered list.
pub fn write_load_order<W: Write>(outcome: &LoadOrderOutcome, writer: &mut W) -> io::Result<()> {
    match outcome {
        LoadOrderOutcome::Ordered { root, order } => {
            writeln!(writer, "Load order for {} ({} packages):", root, order.len())?;
            for (i, package) in order.iter().enumerate() {
                writeln!(writer, "  {}. {}", i + 1, package)?;
            }
        }
        LoadOrderOutcome::Cyclic { root, unresolved } => {
            writeln!(
                writer,
                "Load order for {}: circular dependencies among {}",
                root,
                unresolved.join(", ")
            )?;
        }
        LoadOrderOutcome::NotFound { root } => {
            writeln!(writer, "Load order for {}: package not found", root)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn export_text(data: &ExportData) -> String {
        let mut output = Vec::new();
        TextExporter.export(data, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_text_export_graph_listing() {
        let graph = parse_str("A: B, C\nB: C\nC:");
        let text = export_text(&ExportData::analyze("deps.txt", &graph, 3));

        assert!(text.contains("DEPENDENCY GRAPH ANALYSIS: deps.txt"));
        assert!(text.contains("  A -> [B, C]\n"));
        assert!(text.contains("  C -> []\n"));
        assert!(text.contains("Circular dependencies: none"));
        assert!(text.contains("  A: [A, B, C]\n"));
    }

    #[test]
    fn test_text_export_cycles() {
        let graph = parse_str("A: B\nB: A");
        let text = export_text(&ExportData::analyze("deps.txt", &graph, 3));

        assert!(text.contains("Circular dependencies (1):"));
        assert!(text.contains("  1. A -> B -> A"));
    }

    #[test]
    fn test_write_load_order() {
        let mut output = Vec::new();
        let outcome = LoadOrderOutcome::Ordered {
            root: "A".into(),
            order: vec!["B".into(), "A".into()],
        };
        write_load_order(&outcome, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Load order for A (2 packages):\n  1. B\n  2. A\n"
        );
    }

    #[test]
    fn test_write_load_order_not_found() {
        let mut output = Vec::new();
        let outcome = LoadOrderOutcome::NotFound { root: "Z".into() };
        write_load_order(&outcome, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Load order for Z: package not found\n"
        );
    }
}
