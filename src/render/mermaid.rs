//! Mermaid flowchart output for block diagrams.

use crate::model::Diagram;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;

/// Styling appended to every flowchart; class names follow the block shapes.
const CLASS_DEFS: &str = "    classDef processorStyle fill:#4A90E2,stroke:#2E5C8A,stroke-width:3px,color:#fff\n    classDef powerStyle fill:#F5A623,stroke:#D68910,stroke-width:2px,color:#fff\n    classDef interfaceStyle fill:#7ED321,stroke:#5FA319,stroke-width:2px,color:#fff\n";

pub fn mermaid_flowchart(diagram: &Diagram) -> String {
    let mut out = String::from("flowchart TD\n");

    // Shape encodes the block type: processors get the double-bracket
    // subroutine shape, anything power-related a rounded box.
    for block in &diagram.blocks {
        let label = escape_label(&block.label);
        if block.kind == "processor" {
            let _ = writeln!(out, "    {}[[\"{}\"]]", block.id, label);
        } else if block.kind.contains("power") {
            let _ = writeln!(out, "    {}(\"{}\")", block.id, label);
        } else {
            let _ = writeln!(out, "    {}[\"{}\"]", block.id, label);
        }
    }

    out.push('\n');

    for conn in &diagram.connections {
        if conn.from.is_empty() || conn.to.is_empty() {
            continue;
        }
        if conn.label.is_empty() {
            let _ = writeln!(out, "    {} --> {}", conn.from, conn.to);
        } else {
            let _ = writeln!(
                out,
                "    {} -->|\"{}\"| {}",
                conn.from,
                escape_label(&conn.label),
                conn.to
            );
        }
    }

    out.push('\n');
    out.push_str(CLASS_DEFS);
    out
}

/// mermaid.ink renders base64-encoded Mermaid source straight from the URL.
pub fn mermaid_image_url(mermaid: &str) -> String {
    format!("https://mermaid.ink/img/{}", STANDARD.encode(mermaid))
}

// Double quotes would terminate the Mermaid label early.
fn escape_label(label: &str) -> String {
    label.replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Category, Connection, ConnectionKind, Diagram, Metadata, Position};
    use pretty_assertions::assert_eq;

    fn block(id: &str, kind: &str, label: &str) -> Block {
        Block {
            id: id.to_string(),
            kind: kind.to_string(),
            label: label.to_string(),
            category: Category::Other,
            position: Position::default(),
        }
    }

    fn diagram(blocks: Vec<Block>, connections: Vec<Connection>) -> Diagram {
        Diagram {
            version: "2.0".to_string(),
            kind: "hardware_block_diagram".to_string(),
            metadata: Metadata::default(),
            blocks,
            connections,
            power_tree: Vec::new(),
            signal_domains: Vec::new(),
        }
    }

    #[test]
    fn shapes_follow_block_type() {
        let d = diagram(
            vec![
                block("B1", "processor", "STM32"),
                block("B2", "power_input", "Input 12V"),
                block("B3", "interface", "CAN"),
            ],
            vec![],
        );
        let code = mermaid_flowchart(&d);

        assert!(code.starts_with("flowchart TD\n"));
        assert!(code.contains("    B1[[\"STM32\"]]\n"));
        assert!(code.contains("    B2(\"Input 12V\")\n"));
        assert!(code.contains("    B3[\"CAN\"]\n"));
        assert!(code.contains("classDef processorStyle"));
    }

    #[test]
    fn edges_render_with_and_without_labels() {
        let d = diagram(
            vec![block("B1", "processor", "MCU"), block("B2", "memory", "Flash")],
            vec![
                Connection {
                    from: "B1".to_string(),
                    to: "B2".to_string(),
                    label: "SPI".to_string(),
                    kind: ConnectionKind::Data,
                },
                Connection {
                    from: "B2".to_string(),
                    to: "B1".to_string(),
                    label: String::new(),
                    kind: ConnectionKind::Signal,
                },
            ],
        );
        let code = mermaid_flowchart(&d);

        assert!(code.contains("    B1 -->|\"SPI\"| B2\n"));
        assert!(code.contains("    B2 --> B1\n"));
    }

    #[test]
    fn double_quotes_in_labels_become_single() {
        let d = diagram(vec![block("B1", "sensor", "0-5V \"shunt\" sense")], vec![]);
        let code = mermaid_flowchart(&d);
        assert!(code.contains("B1[\"0-5V 'shunt' sense\"]"));
    }

    #[test]
    fn image_url_embeds_base64_source() {
        let url = mermaid_image_url("flowchart TD\n");
        assert!(url.starts_with("https://mermaid.ink/img/"));

        let encoded = url.trim_start_matches("https://mermaid.ink/img/");
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "flowchart TD\n");
    }
}
