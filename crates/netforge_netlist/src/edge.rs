//! Directional connections between ports.

use crate::ids::{NodeId, PortId};
use serde::{Deserialize, Serialize};

/// A connection from an output port to an input port.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Node owning the driving output port.
    pub source_node: NodeId,
    /// The driving output port.
    pub source_port: PortId,
    /// Node owning the driven input port.
    pub target_node: NodeId,
    /// The driven input port.
    pub target_port: PortId,
}

impl Edge {
    /// Creates an edge `source_node.source_port -> target_node.target_port`.
    pub fn new(source_node: &str, source_port: &str, target_node: &str, target_port: &str) -> Self {
        Self {
            source_node: NodeId::new(source_node),
            source_port: PortId::new(source_port),
            target_node: NodeId::new(target_node),
            target_port: PortId::new(target_port),
        }
    }
}
