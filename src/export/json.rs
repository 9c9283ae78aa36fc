//! JSON export implementation.
//!
//! Exports dependency analysis results in JSON format for machine-readable output.

use super::{ExportData, Exporter, LoadOrderOutcome, PackageEntry, Summary, TraversalEntry};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable cycle info for JSON output.
#[derive(Serialize)]
struct JsonCycle<'a> {
    packages: &'a [String],
    path: String,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    source: &'a str,
    max_depth: usize,
    summary: &'a Summary,
    packages: &'a [PackageEntry],
    circular_dependencies: Vec<JsonCycle<'a>>,
    traversals: &'a [TraversalEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    load_order: Option<&'a LoadOrderOutcome>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let circular_dependencies = data
            .cycles
            .iter()
            .map(|c| JsonCycle {
                packages: &c.nodes,
                path: c.cycle_path(),
            })
            .collect();

        let export = JsonExport {
            source: &data.source,
            max_depth: data.max_depth,
            summary: &data.summary,
            packages: &data.packages,
            circular_dependencies,
            traversals: &data.traversals,
            load_order: data.load_order.as_ref(),
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn export_json(data: &ExportData) -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter.export(data, &mut output).unwrap();
        let json_str = String::from_utf8(output).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn test_json_export_basic() {
        let graph = parse_str("A: B, C\nB: C\nC:");
        let data = ExportData::analyze("deps.txt", &graph, 3);
        let parsed = export_json(&data);

        assert_eq!(parsed["source"], "deps.txt");
        assert_eq!(parsed["max_depth"], 3);
        assert_eq!(parsed["summary"]["packages"], 3);
        assert_eq!(parsed["summary"]["edges"], 3);
        assert_eq!(parsed["packages"][0]["name"], "A");
        assert_eq!(parsed["packages"][0]["dependencies"][1], "C");
        assert!(parsed.get("load_order").is_none());
    }

    #[test]
    fn test_json_export_with_cycles() {
        let graph = parse_str("A: B\nB: A");
        let data = ExportData::analyze("deps.txt", &graph, 3);
        let parsed = export_json(&data);

        let cycles = parsed["circular_dependencies"].as_array().unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0]["path"], "A -> B -> A");
        assert_eq!(cycles[0]["packages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_json_export_load_order() {
        let graph = parse_str("A: B, C\nB: C\nC:");
        let data = ExportData::analyze("deps.txt", &graph, 3).with_load_order(&graph, "A");
        let parsed = export_json(&data);

        assert_eq!(parsed["load_order"]["status"], "ordered");
        assert_eq!(parsed["load_order"]["root"], "A");
        assert_eq!(
            parsed["load_order"]["order"],
            serde_json::json!(["C", "B", "A"])
        );
    }

    #[test]
    fn test_json_export_cyclic_load_order() {
        let graph = parse_str("A: B\nB: A");
        let data = ExportData::analyze("deps.txt", &graph, 3).with_load_order(&graph, "A");
        let parsed = export_json(&data);

        assert_eq!(parsed["load_order"]["status"], "cyclic");
        assert_eq!(
            parsed["load_order"]["unresolved"],
            serde_json::json!(["A", "B"])
        );
    }
}
