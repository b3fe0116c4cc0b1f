//! Edge-endpoint connectivity index.

use netforge_netlist::{Netlist, Node};
use std::collections::HashMap;

/// One end of an edge: a port on a node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Endpoint<'a> {
    /// Node id.
    pub node: &'a str,
    /// Port id on that node.
    pub port: &'a str,
}

/// Lookup tables answering "what drives this input" and "what does this
/// output drive", built once per generation call.
///
/// Edges naming nodes that are not in the snapshot are indexed like any
/// other edge; they simply never resolve to a [`Node`].
#[derive(Debug, Default)]
pub struct ConnectivityIndex<'a> {
    drivers: HashMap<&'a str, HashMap<&'a str, Vec<Endpoint<'a>>>>,
    loads: HashMap<&'a str, HashMap<&'a str, Vec<Endpoint<'a>>>>,
    nodes: HashMap<&'a str, &'a Node>,
}

impl<'a> ConnectivityIndex<'a> {
    /// Indexes every node and edge of a snapshot.
    pub fn build(netlist: &'a Netlist) -> Self {
        let mut index = Self::default();
        for node in &netlist.nodes {
            index.nodes.entry(node.id.as_str()).or_insert(node);
        }
        for edge in &netlist.edges {
            let source = Endpoint {
                node: edge.source_node.as_str(),
                port: edge.source_port.as_str(),
            };
            let target = Endpoint {
                node: edge.target_node.as_str(),
                port: edge.target_port.as_str(),
            };
            index
                .drivers
                .entry(target.node)
                .or_default()
                .entry(target.port)
                .or_default()
                .push(source);
            index
                .loads
                .entry(source.node)
                .or_default()
                .entry(source.port)
                .or_default()
                .push(target);
        }
        index
    }

    /// The endpoint driving an input port. With several drivers the first
    /// edge in snapshot order wins.
    pub fn driver(&self, node: &str, port: &str) -> Option<Endpoint<'a>> {
        self.drivers
            .get(node)
            .and_then(|ports| ports.get(port))
            .and_then(|eps| eps.first().copied())
    }

    /// Every endpoint an output port drives, in edge order.
    pub fn loads(&self, node: &str, port: &str) -> &[Endpoint<'a>] {
        self.loads
            .get(node)
            .and_then(|ports| ports.get(port))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    /// The node driving an input port, when both the edge and the node exist.
    pub fn driver_node(&self, node: &str, port: &str) -> Option<(&'a Node, &'a str)> {
        let ep = self.driver(node, port)?;
        Some((self.node(ep.node)?, ep.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netforge_netlist::{IoAttrs, NodeKind, Port};

    fn io(id: &str, output: bool) -> Node {
        let attrs = IoAttrs {
            bandwidth: 1,
            struct_type: None,
        };
        if output {
            Node::new(id, id, NodeKind::OutputPort(attrs)).with_port(Port::input("data_in", 1))
        } else {
            Node::new(id, id, NodeKind::InputPort(attrs)).with_port(Port::output("data_out", 1))
        }
    }

    #[test]
    fn drivers_and_loads() {
        let mut nl = Netlist::new();
        nl.add_node(io("a", false))
            .add_node(io("x", true))
            .add_node(io("y", true));
        nl.connect("a", "data_out", "x", "data_in")
            .connect("a", "data_out", "y", "data_in");
        let index = ConnectivityIndex::build(&nl);

        let driver = index.driver("x", "data_in").unwrap();
        assert_eq!(driver, Endpoint { node: "a", port: "data_out" });
        let loads: Vec<_> = index.loads("a", "data_out").iter().map(|e| e.node).collect();
        assert_eq!(loads, vec!["x", "y"]);
        assert!(index.driver("a", "data_out").is_none());
        assert!(index.loads("x", "data_in").is_empty());
    }

    #[test]
    fn lookups_accept_temporary_keys() {
        let mut nl = Netlist::new();
        nl.add_node(io("a", false)).add_node(io("x", true));
        nl.connect("a", "data_out", "x", "data_in");
        let index = ConnectivityIndex::build(&nl);

        let loads = {
            let node = String::from("a");
            let port = String::from("data_out");
            index.loads(&node, &port)
        };
        assert_eq!(loads, &[Endpoint { node: "x", port: "data_in" }]);
        let driver = {
            let node = String::from("x");
            index.driver(&node, "data_in")
        };
        assert_eq!(driver.map(|e| e.node), Some("a"));
    }

    #[test]
    fn first_driver_wins() {
        let mut nl = Netlist::new();
        nl.add_node(io("a", false))
            .add_node(io("b", false))
            .add_node(io("x", true));
        nl.connect("b", "data_out", "x", "data_in")
            .connect("a", "data_out", "x", "data_in");
        let index = ConnectivityIndex::build(&nl);
        assert_eq!(index.driver("x", "data_in").unwrap().node, "b");
    }

    #[test]
    fn dangling_edge_has_no_driver_node() {
        let mut nl = Netlist::new();
        nl.add_node(io("x", true));
        nl.connect("ghost", "data_out", "x", "data_in");
        let index = ConnectivityIndex::build(&nl);
        assert!(index.driver("x", "data_in").is_some());
        assert!(index.driver_node("x", "data_in").is_none());
    }
}
