//! Net naming and splitter slice resolution.
//!
//! Every read of a signal goes through [`NetResolver::resolve_input`], which
//! turns "the port this input is wired to" into an [`Expr`]: a plain net, a
//! bit slice of a splitter's input, or a placeholder when nothing drives the
//! port. Every write goes through [`NetResolver::output_net`] so that readers
//! and writers always agree on a net's name.

use crate::hdl::Expr;
use crate::index::{ConnectivityIndex, Endpoint};
use netforge_netlist::{Node, NodeKind, Port};
use std::collections::HashMap;

/// A splitter output as seen by one consumer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SliceBinding {
    /// Name of the splitter.
    pub owner: String,
    /// Splitter output port id.
    pub owner_port: String,
    /// Name of the node reading the slice.
    pub consumer: String,
    /// Expression the consumer reads in place of the splitter output.
    pub expr: Expr,
}

/// Resolves use sites and output nets against a [`ConnectivityIndex`].
#[derive(Debug)]
pub struct NetResolver<'i, 'a> {
    index: &'i ConnectivityIndex<'a>,
    slices: HashMap<(String, String, String), SliceBinding>,
    depth_limit: usize,
}

impl<'i, 'a> NetResolver<'i, 'a> {
    /// Builds a resolver, precomputing the slice binding of every splitter
    /// output for every consumer it feeds.
    pub fn new(index: &'i ConnectivityIndex<'a>, splitters: &[&'a Node]) -> Self {
        let mut resolver = Self {
            index,
            slices: HashMap::new(),
            depth_limit: splitters.len() + 1,
        };
        let mut bindings = Vec::new();
        for splitter in splitters {
            for port in splitter.outputs() {
                let expr = resolver.splitter_output(splitter, port, 0);
                for load in index.loads(splitter.id.as_str(), port.id.as_str()) {
                    let Some(consumer) = index.node(load.node) else {
                        continue;
                    };
                    bindings.push(SliceBinding {
                        owner: splitter.name.clone(),
                        owner_port: port.id.to_string(),
                        consumer: consumer.name.clone(),
                        expr: expr.clone(),
                    });
                }
            }
        }
        for binding in bindings {
            let key = (
                binding.owner.clone(),
                binding.owner_port.clone(),
                binding.consumer.clone(),
            );
            resolver.slices.entry(key).or_insert(binding);
        }
        resolver
    }

    /// All slice bindings, in no particular order.
    pub fn slice_bindings(&self) -> impl Iterator<Item = &SliceBinding> {
        self.slices.values()
    }

    /// The expression a node reads on one of its input ports.
    pub fn resolve_input(&self, node: &Node, port: &Port) -> Expr {
        match self.index.driver_node(node.id.as_str(), port.id.as_str()) {
            Some((driver, driver_port)) => self.read(driver, driver_port, node),
            None => Expr::Unconnected {
                width: port.bandwidth,
            },
        }
    }

    /// Resolves an input port by id, falling back to a placeholder of
    /// `width` bits when the node lacks the port.
    pub fn resolve_port(&self, node: &Node, port_id: &str, width: u32) -> Expr {
        match node.port(port_id) {
            Some(port) => self.resolve_input(node, port),
            None => Expr::Unconnected { width: Some(width) },
        }
    }

    /// Name of the net an output port writes.
    pub fn output_net(&self, node: &Node, port: &Port) -> String {
        if node.kind.drives_own_outputs() {
            let landing = self
                .index
                .loads(node.id.as_str(), port.id.as_str())
                .iter()
                .filter_map(|load| self.index.node(load.node))
                .find(|load| matches!(load.kind, NodeKind::OutputPort(_)));
            if let Some(output) = landing {
                return output.name.clone();
            }
        }
        let is_primary = node.primary_output().map(|p| p.id == port.id).unwrap_or(false);
        if is_primary && !matches!(node.kind, NodeKind::ModuleInstance(_)) {
            node.name.clone()
        } else {
            format!("{}_{}", node.name, port.id)
        }
    }

    /// The node driving one of `node`'s input ports, if it exists.
    pub fn driver(&self, node: &Node, port: &Port) -> Option<&'a Node> {
        self.index
            .driver_node(node.id.as_str(), port.id.as_str())
            .map(|(driver, _)| driver)
    }

    /// Every endpoint an output port of `node` drives.
    pub fn loads(&self, node: &Node, port: &Port) -> &[Endpoint<'a>] {
        self.index.loads(node.id.as_str(), port.id.as_str())
    }

    /// Name of the net a node's primary output writes, or the node's name
    /// when it has no output port.
    pub fn primary_net(&self, node: &Node) -> String {
        match node.primary_output() {
            Some(port) => self.output_net(node, port),
            None => node.name.clone(),
        }
    }

    /// Name of the net an output port writes, looked up by port id. Nodes
    /// missing the port write `fallback`.
    pub fn output_net_by_id(&self, node: &Node, port_id: &str, fallback: String) -> String {
        match node.port(port_id) {
            Some(port) => self.output_net(node, port),
            None => fallback,
        }
    }

    fn read(&self, driver: &Node, driver_port: &str, consumer: &Node) -> Expr {
        match &driver.kind {
            NodeKind::Splitter(_) => {
                let key = (
                    driver.name.clone(),
                    driver_port.to_string(),
                    consumer.name.clone(),
                );
                match self.slices.get(&key) {
                    Some(binding) => binding.expr.clone(),
                    None => self.splitter_output_by_id(driver, driver_port, 0),
                }
            }
            NodeKind::Unknown => Expr::Unconnected {
                width: driver.port(driver_port).and_then(|p| p.bandwidth),
            },
            kind if kind.drives_own_outputs() => match driver.port(driver_port) {
                Some(port) => Expr::Net(self.output_net(driver, port)),
                None => Expr::Unconnected { width: None },
            },
            _ => Expr::Net(driver.name.clone()),
        }
    }

    fn splitter_output_by_id(&self, splitter: &Node, port_id: &str, depth: usize) -> Expr {
        match splitter.port(port_id) {
            Some(port) => self.splitter_output(splitter, port, depth),
            None => Expr::Unconnected { width: None },
        }
    }

    /// The slice of the splitter's base net that `port` carries. Chained
    /// splitters are followed back to the first non-splitter net, composing
    /// ranges on the way.
    fn splitter_output(&self, splitter: &Node, port: &Port, depth: usize) -> Expr {
        let Some(range) = port.slice() else {
            return Expr::Unconnected {
                width: port.bandwidth,
            };
        };
        let unconnected = Expr::Unconnected {
            width: Some(range.width()),
        };
        if depth > self.depth_limit {
            return unconnected;
        }
        let Some(input) = splitter.data_inputs().next() else {
            return unconnected;
        };
        let Some((driver, driver_port)) = self
            .index
            .driver_node(splitter.id.as_str(), input.id.as_str())
        else {
            return unconnected;
        };
        let base = match &driver.kind {
            NodeKind::Splitter(_) => self.splitter_output_by_id(driver, driver_port, depth + 1),
            _ => self.read(driver, driver_port, splitter),
        };
        match base {
            Expr::Net(net) => Expr::Slice { net, range },
            Expr::Slice { net, range: parent } => Expr::Slice {
                net,
                range: range.offset(parent.lo),
            },
            _ => unconnected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netforge_netlist::{BitRange, ClockEdge, IoAttrs, Netlist, RegisterAttrs, SplitterAttrs};

    fn input(id: &str, width: u32) -> Node {
        Node::new(id, id, NodeKind::InputPort(IoAttrs {
            bandwidth: width,
            struct_type: None,
        }))
        .with_port(Port::output("data_out", width))
    }

    fn output(id: &str, width: u32) -> Node {
        Node::new(id, id, NodeKind::OutputPort(IoAttrs {
            bandwidth: width,
            struct_type: None,
        }))
        .with_port(Port::input("data_in", width))
    }

    fn splitter(id: &str, width: u32, slices: &[(&str, u32, u32)]) -> Node {
        let mut node = Node::new(id, id, NodeKind::Splitter(SplitterAttrs { bandwidth: width }))
            .with_port(Port::input("data_in", width));
        for (port, start, end) in slices {
            node = node.with_port(Port::output(port, end - start + 1).with_slice(*start, *end));
        }
        node
    }

    fn register(id: &str) -> Node {
        Node::new(id, id, NodeKind::Register(RegisterAttrs {
            bandwidth: 4,
            clock_edge: ClockEdge::Rising,
            reset: None,
            enable: false,
            inverted_output: false,
        }))
        .with_port(Port::input("clk", 1))
        .with_port(Port::input("data_in", 4))
        .with_port(Port::output("data_out", 4))
    }

    fn splitters(nl: &Netlist) -> Vec<&Node> {
        nl.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Splitter(_)))
            .collect()
    }

    #[test]
    fn unconnected_input_keeps_port_width() {
        let mut nl = Netlist::new();
        nl.add_node(output("y", 8));
        let index = ConnectivityIndex::build(&nl);
        let resolver = NetResolver::new(&index, &[]);
        let y = nl.node("y").unwrap();
        let expr = resolver.resolve_input(y, y.port("data_in").unwrap());
        assert_eq!(expr, Expr::Unconnected { width: Some(8) });
    }

    #[test]
    fn plain_driver_reads_node_name() {
        let mut nl = Netlist::new();
        nl.add_node(input("a", 1)).add_node(output("y", 1));
        nl.connect("a", "data_out", "y", "data_in");
        let index = ConnectivityIndex::build(&nl);
        let resolver = NetResolver::new(&index, &[]);
        let y = nl.node("y").unwrap();
        assert_eq!(
            resolver.resolve_input(y, y.port("data_in").unwrap()),
            Expr::net("a")
        );
    }

    #[test]
    fn splitter_output_becomes_slice() {
        let mut nl = Netlist::new();
        nl.add_node(input("A", 8))
            .add_node(splitter("s", 8, &[("lo", 0, 3), ("hi", 4, 7)]))
            .add_node(output("top", 4));
        nl.connect("A", "data_out", "s", "data_in")
            .connect("s", "hi", "top", "data_in");
        let index = ConnectivityIndex::build(&nl);
        let resolver = NetResolver::new(&index, &splitters(&nl));
        let top = nl.node("top").unwrap();
        assert_eq!(
            resolver.resolve_input(top, top.port("data_in").unwrap()),
            Expr::Slice {
                net: "A".to_string(),
                range: BitRange::new(4, 7),
            }
        );
        assert_eq!(resolver.slice_bindings().count(), 1);
    }

    #[test]
    fn chained_splitters_compose_ranges() {
        let mut nl = Netlist::new();
        nl.add_node(input("A", 8))
            .add_node(splitter("s1", 8, &[("hi", 4, 7)]))
            .add_node(splitter("s2", 4, &[("b", 1, 1)]))
            .add_node(output("bit", 1));
        nl.connect("A", "data_out", "s1", "data_in")
            .connect("s1", "hi", "s2", "data_in")
            .connect("s2", "b", "bit", "data_in");
        let index = ConnectivityIndex::build(&nl);
        let resolver = NetResolver::new(&index, &splitters(&nl));
        let bit = nl.node("bit").unwrap();
        let expr = resolver.resolve_input(bit, bit.port("data_in").unwrap());
        let Expr::Slice { net, range } = expr else {
            panic!("expected slice, got {expr:?}");
        };
        assert_eq!(net, "A");
        assert_eq!(range, BitRange::new(5, 5));
    }

    #[test]
    fn splitter_cycle_degrades_to_placeholder() {
        let mut nl = Netlist::new();
        nl.add_node(splitter("s1", 2, &[("o", 0, 0)]))
            .add_node(splitter("s2", 2, &[("o", 0, 0)]))
            .add_node(output("y", 1));
        nl.connect("s1", "o", "s2", "data_in")
            .connect("s2", "o", "s1", "data_in")
            .connect("s2", "o", "y", "data_in");
        let index = ConnectivityIndex::build(&nl);
        let resolver = NetResolver::new(&index, &splitters(&nl));
        let y = nl.node("y").unwrap();
        assert!(resolver
            .resolve_input(y, y.port("data_in").unwrap())
            .is_unconnected());
    }

    #[test]
    fn register_writes_output_port_net() {
        let mut nl = Netlist::new();
        nl.add_node(register("r")).add_node(output("q", 4));
        nl.connect("r", "data_out", "q", "data_in");
        let index = ConnectivityIndex::build(&nl);
        let resolver = NetResolver::new(&index, &[]);
        let r = nl.node("r").unwrap();
        assert_eq!(resolver.output_net(r, r.port("data_out").unwrap()), "q");
        let q = nl.node("q").unwrap();
        assert_eq!(
            resolver.resolve_input(q, q.port("data_in").unwrap()),
            Expr::net("q")
        );
    }

    #[test]
    fn register_without_output_port_load_uses_own_name() {
        let mut nl = Netlist::new();
        nl.add_node(register("r"));
        let index = ConnectivityIndex::build(&nl);
        let resolver = NetResolver::new(&index, &[]);
        let r = nl.node("r").unwrap();
        assert_eq!(resolver.output_net(r, r.port("data_out").unwrap()), "r");
    }
}
