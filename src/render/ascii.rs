//! Plain-text diagram summary for chat-based approval flows.

use crate::model::{ConnectionKind, Diagram};
use crate::spec::ParsedRequirements;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

const SIGNAL_PATH_LIMIT: usize = 10;

pub fn ascii_summary(diagram: &Diagram, parsed: &ParsedRequirements) -> String {
    let mut out = String::new();

    // Header box. Fixed-width banner, so the variable fields are clipped and
    // padded to keep the right border aligned.
    let name = clip_pad(&diagram.metadata.project, 30);
    let system_type = clip_pad(&diagram.metadata.system_type, 29);

    out.push('\n');
    out.push_str("╔════════════════════════════════════════════╗\n");
    let _ = writeln!(out, "║   BLOCK DIAGRAM: {}  ║", name);
    out.push_str("╠════════════════════════════════════════════╣\n");
    let _ = writeln!(out, "║   System Type: {} ║", system_type);
    let _ = writeln!(out, "║   Total Blocks: {}║", clip_pad(&diagram.blocks.len().to_string(), 28));
    let _ = writeln!(out, "║   Connections: {}║", clip_pad(&diagram.connections.len().to_string(), 29));
    let _ = writeln!(out, "║   Power Rails: {}║", clip_pad(&diagram.power_tree.len().to_string(), 29));
    out.push_str("╚════════════════════════════════════════════╝\n");

    // Blocks grouped by category, categories in lexicographic order.
    out.push_str("\nSYSTEM ARCHITECTURE:\n");
    let mut by_category: BTreeMap<&str, Vec<&crate::model::Block>> = BTreeMap::new();
    for block in &diagram.blocks {
        by_category.entry(block.category.as_str()).or_default().push(block);
    }
    for (index, (category, blocks)) in by_category.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}:", index + 1, category.to_uppercase().replace('_', " "));
        for (i, block) in blocks.iter().enumerate() {
            let letter = (b'a' + (i % 26) as u8) as char;
            let _ = writeln!(out, "   {}. {} [{}]", letter, block.label, block.kind);
        }
    }

    out.push_str("\nPOWER DISTRIBUTION:\n");
    if diagram.power_tree.is_empty() {
        out.push_str("  (Power tree to be generated)\n");
    } else {
        for (i, rail) in diagram.power_tree.iter().enumerate() {
            let _ = writeln!(out, "  {}. {} @ {} → {}", i + 1, rail.rail, rail.current, rail.purpose);
        }
    }

    // First few non-power paths; power edges already appear above.
    out.push_str("\nCRITICAL SIGNAL PATHS:\n");
    let signal_paths = diagram
        .connections
        .iter()
        .filter(|c| c.kind != ConnectionKind::Power);
    for (i, conn) in signal_paths.take(SIGNAL_PATH_LIMIT).enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} → [{}] → {}",
            i + 1,
            diagram.label_of(&conn.from),
            conn.label,
            diagram.label_of(&conn.to)
        );
    }
    if diagram.connections.len() > SIGNAL_PATH_LIMIT {
        let _ = writeln!(
            out,
            "\n  ... and {} more connections",
            diagram.connections.len() - SIGNAL_PATH_LIMIT
        );
    }

    out.push_str("\nDESIGN NOTES:\n");
    let power_domains: BTreeSet<&str> =
        diagram.power_tree.iter().map(|r| r.rail.as_str()).collect();
    let _ = writeln!(out, "- Total components identified: {}", diagram.blocks.len());
    let _ = writeln!(out, "- Power domains: {}", power_domains.len());
    let _ = writeln!(out, "- Interface types: {}", interface_type_count(parsed));
    out.push_str("- This is a preliminary block diagram for approval\n");

    out
}

fn interface_type_count(parsed: &ParsedRequirements) -> usize {
    let kinds: BTreeSet<&str> = parsed
        .primary_components
        .as_ref()
        .map(|c| c.interfaces_communication.iter().map(|i| i.kind()).collect())
        .unwrap_or_default();
    kinds.len()
}

/// Clip to `width` characters and pad with spaces to exactly `width`.
fn clip_pad(text: &str, width: usize) -> String {
    let mut s: String = text.chars().take(width).collect();
    let len = s.chars().count();
    s.extend(std::iter::repeat(' ').take(width - len));
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build_diagram;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn summary_for(value: serde_json::Value, project: &str, system_type: &str) -> String {
        let parsed: ParsedRequirements = serde_json::from_value(value).unwrap();
        let diagram = build_diagram(&parsed, project, system_type, fixed_now());
        ascii_summary(&diagram, &parsed)
    }

    #[test]
    fn header_fields_are_clipped_and_padded() {
        let summary = summary_for(
            json!({}),
            "A_Project_Name_That_Is_Way_Too_Long_For_The_Box",
            "Digital_Controller",
        );

        // Clipped at 30 characters, two trailing spaces before the border.
        assert!(summary.contains("║   BLOCK DIAGRAM: A_Project_Name_That_Is_Way_Too  ║"));
        assert!(summary.contains("║   System Type: Digital_Controller            ║"));
    }

    #[test]
    fn blocks_are_grouped_and_lettered_by_category() {
        let summary = summary_for(
            json!({
                "primary_components": {
                    "power_system": { "rails_needed": ["5V", "3.3V"] }
                }
            }),
            "P",
            "T",
        );

        // power sorts before processing; three power blocks lettered a-c.
        assert!(summary.contains("1. POWER:\n"));
        assert!(summary.contains("   a. Input 12V [power_input]\n"));
        assert!(summary.contains("   b. 5V @ TBD [power_regulator]\n"));
        assert!(summary.contains("   c. 3.3V @ TBD [power_regulator]\n"));
        assert!(summary.contains("2. PROCESSING:\n"));
        assert!(summary.contains("   a. MCU [processor]\n"));
    }

    #[test]
    fn power_distribution_lists_rails() {
        let summary = summary_for(
            json!({
                "primary_components": {
                    "power_system": {
                        "rails_needed": [{ "voltage": "5V", "current": "2A", "purpose": "logic" }]
                    }
                }
            }),
            "P",
            "T",
        );
        assert!(summary.contains("  1. 5V @ 2A → logic\n"));
    }

    #[test]
    fn signal_paths_skip_power_edges_and_cap_at_ten() {
        let summary = summary_for(
            json!({
                "primary_components": {
                    "interfaces_communication": [
                        "SPI", "I2C", "UART",
                        { "type": "Ethernet" }, { "type": "USB" }, { "type": "CAN" }
                    ]
                }
            }),
            "P",
            "T",
        );

        assert!(summary.contains("  1. MCU → [SPI] → SPI\n"));
        assert!(summary.contains("  10. "));
        assert!(!summary.contains("  11. "));
        assert!(summary.contains("more connections"));
    }

    #[test]
    fn design_notes_count_distinct_interface_types() {
        let summary = summary_for(
            json!({
                "primary_components": {
                    "interfaces_communication": ["SPI", "SPI", { "type": "CAN" }]
                }
            }),
            "P",
            "T",
        );
        assert!(summary.contains("- Interface types: 2\n"));
        assert!(summary.contains("- This is a preliminary block diagram for approval\n"));
    }
}
