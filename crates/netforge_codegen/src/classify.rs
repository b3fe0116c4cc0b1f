//! Buckets nodes by the statement rule that lowers them.

use netforge_netlist::{Netlist, Node, NodeKind};
use std::collections::HashSet;

/// Nodes grouped by kind, each bucket in snapshot order.
#[derive(Debug, Default)]
pub struct Buckets<'a> {
    /// Module inputs.
    pub inputs: Vec<&'a Node>,
    /// Module outputs.
    pub outputs: Vec<&'a Node>,
    /// Boolean gates.
    pub gates: Vec<&'a Node>,
    /// Multiplexers.
    pub multiplexers: Vec<&'a Node>,
    /// Arithmetic and compare units.
    pub arithmetic: Vec<&'a Node>,
    /// Encoders and decoders.
    pub coders: Vec<&'a Node>,
    /// Splitters.
    pub splitters: Vec<&'a Node>,
    /// Combiners.
    pub combiners: Vec<&'a Node>,
    /// Sub-module instances.
    pub instances: Vec<&'a Node>,
    /// Memories.
    pub memories: Vec<&'a Node>,
    /// Registers.
    pub registers: Vec<&'a Node>,
    /// Names of nodes whose own statement drives their output nets.
    pub excluded_names: HashSet<&'a str>,
    /// Names of module-level ports.
    pub port_names: HashSet<&'a str>,
}

impl<'a> Buckets<'a> {
    /// Sorts every node of a snapshot into its bucket. Unknown kinds land in none.
    pub fn classify(netlist: &'a Netlist) -> Self {
        let mut buckets = Self::default();
        for node in &netlist.nodes {
            let bucket = match &node.kind {
                NodeKind::InputPort(_) => &mut buckets.inputs,
                NodeKind::OutputPort(_) => &mut buckets.outputs,
                NodeKind::LogicGate(_) => &mut buckets.gates,
                NodeKind::Multiplexer(_) => &mut buckets.multiplexers,
                NodeKind::ArithmeticUnit(_) | NodeKind::CompareUnit(_) => &mut buckets.arithmetic,
                NodeKind::Encoder(_) | NodeKind::Decoder(_) => &mut buckets.coders,
                NodeKind::Splitter(_) => &mut buckets.splitters,
                NodeKind::Combiner => &mut buckets.combiners,
                NodeKind::ModuleInstance(_) => &mut buckets.instances,
                NodeKind::Memory(_) => &mut buckets.memories,
                NodeKind::Register(_) => &mut buckets.registers,
                NodeKind::Unknown => continue,
            };
            bucket.push(node);
            if node.kind.drives_own_outputs() {
                buckets.excluded_names.insert(node.name.as_str());
            }
            if matches!(node.kind, NodeKind::InputPort(_) | NodeKind::OutputPort(_)) {
                buckets.port_names.insert(node.name.as_str());
            }
        }
        buckets
    }

    /// Internal nodes in statement order: gates, multiplexers, arithmetic,
    /// coders, splitters, combiners, instances, memories, registers.
    pub fn internal(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.gates
            .iter()
            .chain(&self.multiplexers)
            .chain(&self.arithmetic)
            .chain(&self.coders)
            .chain(&self.splitters)
            .chain(&self.combiners)
            .chain(&self.instances)
            .chain(&self.memories)
            .chain(&self.registers)
            .copied()
    }
}
