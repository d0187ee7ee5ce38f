//! Process topology data model and JSON loading

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse topology: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Unique identifier for a process component (e.g. "V-101", "P-102")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Equipment kind, matching the type tags of the topology file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Tank,
    Pump,
    Valve,
    HeatExchanger,
    Column,
    Compressor,
    Reactor,
    Furnace,
}

impl ComponentKind {
    /// Human-readable label for the info panel
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tank => "Vessel",
            Self::Pump => "Pump",
            Self::Valve => "Valve",
            Self::HeatExchanger => "Heat exchanger",
            Self::Column => "Column",
            Self::Compressor => "Compressor",
            Self::Reactor => "Reactor",
            Self::Furnace => "Furnace",
        }
    }
}

/// Medium carried by a connection; a presentation tag, orthogonal to routing.
///
/// Serde tags match the legacy topology files ("produkt", "luft", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medium {
    #[serde(rename = "produkt")]
    Product,
    #[serde(rename = "gas")]
    Gas,
    #[serde(rename = "luft")]
    Air,
    #[serde(rename = "vatten")]
    Water,
    #[serde(rename = "ånga")]
    Steam,
}

impl Medium {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Gas => "gas",
            Self::Air => "air",
            Self::Water => "water",
            Self::Steam => "steam",
        }
    }
}

/// A unit operation placed on the ground plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ground placement [x, y, z]
    pub position: [f64; 3],
}

/// A directed pipe connection between two components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub from: ComponentId,
    pub to: ComponentId,
    pub medium: Medium,
}

/// Static process topology, loaded once at scene-build time.
///
/// No validation beyond endpoint existence is performed when routes are
/// built; duplicate ids, cycles, and self-loops are not rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessTopology {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
}

impl ProcessTopology {
    /// Parse a topology from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a topology from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let contents = std::fs::read_to_string(&path)?;
        let topology = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            components = topology.components.len(),
            connections = topology.connections.len(),
            "Topology parsed"
        );
        Ok(topology)
    }

    /// Look up a component by id
    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| &c.id == id)
    }
}
