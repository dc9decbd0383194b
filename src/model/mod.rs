//! Block diagram model: blocks, connections, power tree.

mod build;

pub use build::build_diagram;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DIAGRAM_VERSION: &str = "2.0";
pub const DIAGRAM_TYPE: &str = "hardware_block_diagram";

/// Grouping bucket a block belongs to; drives the summary layout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Power,
    Processing,
    Memory,
    Communication,
    External,
    Analog,
    Sensing,
    PowerStage,
    Rf,
    Timing,
    Ui,
    Storage,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Power => "power",
            Category::Processing => "processing",
            Category::Memory => "memory",
            Category::Communication => "communication",
            Category::External => "external",
            Category::Analog => "analog",
            Category::Sensing => "sensing",
            Category::PowerStage => "power_stage",
            Category::Rf => "rf",
            Category::Timing => "timing",
            Category::Ui => "ui",
            Category::Storage => "storage",
            Category::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Signal,
    Power,
    Data,
    Analog,
    Rf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Default for Position {
    // Center of the canvas; used when a hand-written diagram omits positions.
    fn default() -> Self {
        Position { x: 500, y: 300 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Sequential id: "B1", "B2", ... in insertion order.
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub label: String,

    pub category: Category,

    #[serde(default)]
    pub position: Position,
}

/// Directed labeled edge between two blocks. Edges are only ever created
/// toward blocks already inserted, so no referential check is performed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,

    #[serde(default)]
    pub label: String,

    #[serde(rename = "type")]
    pub kind: ConnectionKind,
}

/// One voltage rail of the power distribution tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerRail {
    pub rail: String,
    pub regulator_id: String,
    pub purpose: String,
    pub current: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub project: String,

    #[serde(default)]
    pub system_type: String,

    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created: String,

    #[serde(default)]
    pub design_complexity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub version: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub blocks: Vec<Block>,

    #[serde(default)]
    pub connections: Vec<Connection>,

    #[serde(default)]
    pub power_tree: Vec<PowerRail>,

    #[serde(default)]
    pub signal_domains: Vec<String>,
}

impl Diagram {
    /// Block label lookup; "Unknown" for ids with no matching block.
    pub fn label_of(&self, id: &str) -> &str {
        self.blocks
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.label.as_str())
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramStats {
    pub total_blocks: usize,
    pub total_connections: usize,
    pub power_rails: usize,
    pub categories: usize,
}

impl DiagramStats {
    pub fn for_diagram(diagram: &Diagram) -> Self {
        let categories: BTreeSet<Category> =
            diagram.blocks.iter().map(|b| b.category).collect();

        DiagramStats {
            total_blocks: diagram.blocks.len(),
            total_connections: diagram.connections.len(),
            power_rails: diagram.power_tree.len(),
            categories: categories.len(),
        }
    }
}
