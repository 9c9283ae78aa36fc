//! Markdown export implementation.
//!
//! Exports dependency analysis results in Markdown format for documentation and reporting.

use super::{ExportData, Exporter, LoadOrderOutcome};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Dependency Analysis Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Source:** {}", data.source)?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Packages | {} |", data.summary.packages)?;
        writeln!(writer, "| Declaring Dependencies | {} |", data.summary.declared)?;
        writeln!(writer, "| Dependency Edges | {} |", data.summary.edges)?;
        writeln!(writer, "| Leaf Packages | {} |", data.summary.leaves)?;
        writeln!(writer, "| Circular Dependencies | {} |", data.summary.cycles)?;
        writeln!(
            writer,
            "| Packages in Cycles | {} |",
            data.summary.packages_in_cycles
        )?;
        writeln!(writer)?;

        // Graph
        writeln!(writer, "## Packages")?;
        writeln!(writer)?;
        writeln!(writer, "| Package | Dependencies | In Cycle |")?;
        writeln!(writer, "|---------|--------------|----------|")?;
        for package in &data.packages {
            let deps = if package.dependencies.is_empty() {
                "-".to_string()
            } else {
                package.dependencies.join(", ")
            };
            let marker = if package.in_cycle { "yes" } else { "" };
            writeln!(writer, "| {} | {} | {} |", package.name, deps, marker)?;
        }
        writeln!(writer)?;

        // Circular dependencies
        if !data.cycles.is_empty() {
            writeln!(writer, "## Circular Dependencies")?;
            writeln!(writer)?;
            writeln!(writer, "The following circular dependencies were detected:")?;
            writeln!(writer)?;
            for (i, cycle) in data.cycles.iter().enumerate() {
                writeln!(writer, "{}. `{}`", i + 1, cycle.cycle_path())?;
            }
            writeln!(writer)?;
        }

        // Traversals
        if !data.traversals.is_empty() {
            writeln!(writer, "## Traversal (max depth {})", data.max_depth)?;
            writeln!(writer)?;
            writeln!(writer, "| Start | Visited |")?;
            writeln!(writer, "|-------|---------|")?;
            for traversal in &data.traversals {
                writeln!(
                    writer,
                    "| {} | {} |",
                    traversal.start,
                    traversal.order.join(" → ")
                )?;
            }
            writeln!(writer)?;
        }

        // Load order
        match &data.load_order {
            Some(LoadOrderOutcome::Ordered { root, order }) => {
                writeln!(writer, "## Load Order for `{}`", root)?;
                writeln!(writer)?;
                for (i, package) in order.iter().enumerate() {
                    writeln!(writer, "{}. {}", i + 1, package)?;
                }
                writeln!(writer)?;
            }
            Some(LoadOrderOutcome::Cyclic { root, unresolved }) => {
                writeln!(writer, "## Load Order for `{}`", root)?;
                writeln!(writer)?;
                writeln!(
                    writer,
                    "**No load order:** circular dependencies among {}",
                    unresolved.join(", ")
                )?;
                writeln!(writer)?;
            }
            Some(LoadOrderOutcome::NotFound { root }) => {
                writeln!(writer, "## Load Order for `{}`", root)?;
                writeln!(writer)?;
                writeln!(writer, "**No load order:** package not found")?;
                writeln!(writer)?;
            }
            None => {}
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by loadorder*")?;

        Ok(())
    }
}
