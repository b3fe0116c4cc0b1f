//! The immutable snapshot handed to the generator.

use crate::edge::Edge;
use crate::node::Node;
use serde::{Deserialize, Serialize};

/// A complete node/edge snapshot of one schematic.
///
/// The generator never mutates a snapshot; editing happens in the external
/// editor between generation calls.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    /// Nodes in editor order. Emission order follows this order.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Edges in editor order.
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Netlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node.
    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Appends an edge `source.source_port -> target.target_port`.
    pub fn connect(&mut self, source: &str, source_port: &str, target: &str, target_port: &str) -> &mut Self {
        self.edges.push(Edge::new(source, source_port, target, target_port));
        self
    }

    /// Finds a node by id with a linear scan.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    /// Finds a node by its user-visible name with a linear scan.
    pub fn node_named(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{IoAttrs, NodeKind};
    use crate::port::Port;

    fn input(id: &str) -> Node {
        Node::new(id, id, NodeKind::InputPort(IoAttrs {
            bandwidth: 1,
            struct_type: None,
        }))
        .with_port(Port::output("data_out", 1))
    }

    #[test]
    fn builder_and_lookup() {
        let mut nl = Netlist::new();
        nl.add_node(input("a")).add_node(input("b"));
        nl.connect("a", "data_out", "b", "data_in");
        assert_eq!(nl.nodes.len(), 2);
        assert_eq!(nl.edges.len(), 1);
        assert!(nl.node("b").is_some());
        assert!(nl.node("missing").is_none());
        assert_eq!(nl.node_named("a").unwrap().id.as_str(), "a");
    }
}
