//! Structural validation of a snapshot before code generation.
//!
//! The generator trusts the editor to deliver unique names, single-driver
//! inputs and width-compatible edges, and only degrades gracefully on
//! missing connections. This pass checks those preconditions explicitly and
//! reports violations as error diagnostics, so callers can refuse to emit
//! HDL for a snapshot whose output could not be trusted.

use crate::edge::Edge;
use crate::netlist::Netlist;
use crate::node::{CoderAttrs, MemoryAttrs, Node, NodeKind};
use crate::port::{well_known, Port};
use netforge_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label, Location};
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Diagnostic codes emitted by [`validate`].
pub mod codes {
    use super::{Category, DiagnosticCode};

    /// Two nodes share a name.
    pub const DUPLICATE_NAME: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);
    /// Two nodes share an id.
    pub const DUPLICATE_ID: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);
    /// An edge names a node that is not in the snapshot.
    pub const MISSING_NODE: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);
    /// An edge names a port its node does not have.
    pub const MISSING_PORT: DiagnosticCode = DiagnosticCode::new(Category::Error, 104);
    /// An edge does not run from an output to an input.
    pub const DIRECTION: DiagnosticCode = DiagnosticCode::new(Category::Error, 105);
    /// An input port has more than one driver.
    pub const FAN_IN: DiagnosticCode = DiagnosticCode::new(Category::Error, 106);
    /// The two ends of an edge carry different widths or types.
    pub const WIDTH_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Error, 107);
    /// A splitter output has no range or a range outside its input.
    pub const BAD_SLICE: DiagnosticCode = DiagnosticCode::new(Category::Error, 108);
    /// Combinational logic feeds back into itself.
    pub const COMBINATIONAL_LOOP: DiagnosticCode = DiagnosticCode::new(Category::Error, 109);
    /// A width is zero or too large to generate.
    pub const WIDTH_RANGE: DiagnosticCode = DiagnosticCode::new(Category::Error, 110);
    /// A multiplexer's data ports disagree with its `inputs` attribute.
    pub const MUX_INPUT_COUNT: DiagnosticCode = DiagnosticCode::new(Category::Warning, 102);
    /// A node of unknown kind will be skipped.
    pub const UNKNOWN_KIND: DiagnosticCode = DiagnosticCode::new(Category::Warning, 103);
}

/// Checks the structural preconditions of `netlist`, emitting one diagnostic
/// per violation into `sink`.
///
/// Never fails: callers inspect [`DiagnosticSink::has_errors`] afterwards.
pub fn validate(netlist: &Netlist, sink: &DiagnosticSink) {
    let nodes = node_map(netlist);

    check_unique(netlist, sink);
    check_edges(netlist, &nodes, sink);
    check_fan_in(netlist, &nodes, sink);
    check_width_ranges(netlist, sink);
    check_splitters(netlist, sink);
    check_multiplexers(netlist, sink);
    check_unknown_kinds(netlist, sink);
    check_combinational_loops(netlist, &nodes, sink);
}

/// Maps node ids to nodes. The first node wins when ids collide.
fn node_map(netlist: &Netlist) -> HashMap<&str, &Node> {
    let mut map = HashMap::new();
    for node in &netlist.nodes {
        map.entry(node.id.as_str()).or_insert(node);
    }
    map
}

fn check_unique(netlist: &Netlist, sink: &DiagnosticSink) {
    let mut names: HashMap<&str, &Node> = HashMap::new();
    let mut ids: HashMap<&str, &Node> = HashMap::new();

    for node in &netlist.nodes {
        if let Some(first) = names.get(node.name.as_str()) {
            sink.emit(
                Diagnostic::error(
                    codes::DUPLICATE_NAME,
                    format!("node name `{}` is used more than once", node.name),
                    Location::node(&node.name),
                )
                .with_label(Label::secondary(
                    Location::node(&first.name),
                    format!("first used by the {} with id `{}`", first.kind.label(), first.id),
                ))
                .with_help("node names become HDL identifiers and must be unique"),
            );
        } else {
            names.insert(&node.name, node);
        }

        if ids.contains_key(node.id.as_str()) {
            sink.emit(Diagnostic::error(
                codes::DUPLICATE_ID,
                format!("node id `{}` is used more than once", node.id),
                Location::node(&node.name),
            ));
        } else {
            ids.insert(node.id.as_str(), node);
        }
    }
}

fn describe(edge: &Edge) -> String {
    format!(
        "edge {}.{} -> {}.{}",
        edge.source_node, edge.source_port, edge.target_node, edge.target_port
    )
}

/// Resolves both ends of an edge, returning `None` if any end is missing.
fn endpoints<'a>(
    edge: &Edge,
    nodes: &HashMap<&str, &'a Node>,
) -> Option<((&'a Node, &'a Port), (&'a Node, &'a Port))> {
    let src = nodes.get(edge.source_node.as_str())?;
    let tgt = nodes.get(edge.target_node.as_str())?;
    let src_port = src.port(edge.source_port.as_str())?;
    let tgt_port = tgt.port(edge.target_port.as_str())?;
    Some(((src, src_port), (tgt, tgt_port)))
}

fn check_edges(netlist: &Netlist, nodes: &HashMap<&str, &Node>, sink: &DiagnosticSink) {
    for edge in &netlist.edges {
        let src = nodes.get(edge.source_node.as_str());
        let tgt = nodes.get(edge.target_node.as_str());

        for (id, node) in [(&edge.source_node, src), (&edge.target_node, tgt)] {
            if node.is_none() {
                sink.emit(
                    Diagnostic::error(
                        codes::MISSING_NODE,
                        format!("{} refers to missing node `{id}`", describe(edge)),
                        Location::DESIGN,
                    )
                    .with_note("the edge is ignored during generation"),
                );
            }
        }

        let (Some(src), Some(tgt)) = (src, tgt) else {
            continue;
        };

        let src_port = src.port(edge.source_port.as_str());
        let tgt_port = tgt.port(edge.target_port.as_str());
        for (node, port_id, port) in [
            (src, &edge.source_port, src_port),
            (tgt, &edge.target_port, tgt_port),
        ] {
            if port.is_none() {
                sink.emit(Diagnostic::error(
                    codes::MISSING_PORT,
                    format!("{} refers to missing port `{port_id}`", describe(edge)),
                    Location::node(&node.name),
                ));
            }
        }

        let (Some(src_port), Some(tgt_port)) = (src_port, tgt_port) else {
            continue;
        };

        if !src_port.is_output() || !tgt_port.is_input() {
            sink.emit(
                Diagnostic::error(
                    codes::DIRECTION,
                    format!("{} does not run from an output to an input", describe(edge)),
                    Location::port(&tgt.name, tgt_port.id.as_str()),
                )
                .with_label(Label::secondary(
                    Location::port(&src.name, src_port.id.as_str()),
                    "source end",
                )),
            );
            continue;
        }

        if let Some(message) = type_mismatch(src_port, tgt_port) {
            sink.emit(
                Diagnostic::error(
                    codes::WIDTH_MISMATCH,
                    format!("{}: {message}", describe(edge)),
                    Location::port(&tgt.name, tgt_port.id.as_str()),
                )
                .with_label(Label::secondary(
                    Location::port(&src.name, src_port.id.as_str()),
                    "driver",
                )),
            );
        }
    }
}

fn type_mismatch(src: &Port, tgt: &Port) -> Option<String> {
    match (&src.struct_type, &tgt.struct_type) {
        (Some(a), Some(b)) if a != b => {
            return Some(format!(
                "struct type `{}::{}` drives `{}::{}`",
                a.package, a.type_name, b.package, b.type_name
            ));
        }
        (Some(_), None) | (None, Some(_)) => {
            return Some("struct-typed and bit-vector ports are connected".to_string());
        }
        _ => {}
    }
    match (src.bandwidth, tgt.bandwidth) {
        (Some(a), Some(b)) if a != b => Some(format!("{a}-bit output drives {b}-bit input")),
        _ => None,
    }
}

fn check_fan_in(netlist: &Netlist, nodes: &HashMap<&str, &Node>, sink: &DiagnosticSink) {
    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut drivers: HashMap<(&str, &str), Vec<&Edge>> = HashMap::new();
    for edge in &netlist.edges {
        let key = (edge.target_node.as_str(), edge.target_port.as_str());
        let entry = drivers.entry(key).or_default();
        if entry.is_empty() {
            order.push(key);
        }
        entry.push(edge);
    }

    for key in order {
        let edges = &drivers[&key];
        if edges.len() < 2 {
            continue;
        }
        let target_name = nodes.get(key.0).map_or(key.0, |n| n.name.as_str());
        let mut diag = Diagnostic::error(
            codes::FAN_IN,
            format!(
                "input port `{}` of `{target_name}` has {} drivers",
                key.1,
                edges.len()
            ),
            Location::port(target_name, key.1),
        )
        .with_note("only the first driver is used during generation");
        for edge in edges {
            let source_name = nodes
                .get(edge.source_node.as_str())
                .map_or(edge.source_node.as_str(), |n| n.name.as_str());
            diag = diag.with_label(Label::secondary(
                Location::port(source_name, edge.source_port.as_str()),
                "driver",
            ));
        }
        sink.emit(diag);
    }
}

/// The width attribute of a node, when its kind has one.
fn attr_bandwidth(kind: &NodeKind) -> Option<u32> {
    match kind {
        NodeKind::InputPort(a) | NodeKind::OutputPort(a) => {
            a.struct_type.is_none().then_some(a.bandwidth)
        }
        NodeKind::LogicGate(a) => a.struct_type.is_none().then_some(a.bandwidth),
        NodeKind::Multiplexer(a) => a.struct_type.is_none().then_some(a.bandwidth),
        NodeKind::ArithmeticUnit(a) => Some(a.bandwidth),
        NodeKind::CompareUnit(a) => Some(a.bandwidth),
        NodeKind::Encoder(a) | NodeKind::Decoder(a) => Some(a.bandwidth),
        NodeKind::Splitter(a) => Some(a.bandwidth),
        NodeKind::Memory(a) => Some(a.bandwidth),
        NodeKind::Register(a) => Some(a.bandwidth),
        NodeKind::Combiner | NodeKind::ModuleInstance(_) | NodeKind::Unknown => None,
    }
}

/// The largest width a node's kind can be generated with, and what it limits.
fn width_limit(kind: &NodeKind) -> Option<(u32, u32, &'static str)> {
    match kind {
        NodeKind::Decoder(a) => Some((a.bandwidth, CoderAttrs::MAX_DECODER_INPUT, "input")),
        NodeKind::Encoder(a) => Some((a.bandwidth, CoderAttrs::MAX_ENCODER_INPUT, "input")),
        NodeKind::Memory(a) => {
            Some((a.address_bandwidth, MemoryAttrs::MAX_ADDRESS_WIDTH, "address"))
        }
        _ => None,
    }
}

fn check_width_ranges(netlist: &Netlist, sink: &DiagnosticSink) {
    for node in &netlist.nodes {
        if attr_bandwidth(&node.kind) == Some(0) {
            sink.emit(Diagnostic::error(
                codes::WIDTH_RANGE,
                format!("{} `{}` has zero width", node.kind.label(), node.name),
                Location::node(&node.name),
            ));
        }
        if let NodeKind::Memory(a) = &node.kind {
            if a.address_bandwidth == 0 {
                sink.emit(Diagnostic::error(
                    codes::WIDTH_RANGE,
                    format!("memory `{}` has a zero-width address", node.name),
                    Location::node(&node.name),
                ));
            }
        }
        if let Some((width, max, what)) = width_limit(&node.kind) {
            if width > max {
                sink.emit(
                    Diagnostic::error(
                        codes::WIDTH_RANGE,
                        format!(
                            "{} `{}` has a {width}-bit {what}",
                            node.kind.label(),
                            node.name
                        ),
                        Location::node(&node.name),
                    )
                    .with_help(format!("the widest supported {what} is {max} bits")),
                );
            }
        }
        for port in &node.ports {
            if port.bandwidth == Some(0) {
                sink.emit(Diagnostic::error(
                    codes::WIDTH_RANGE,
                    format!("port `{}` of `{}` has zero width", port.id, node.name),
                    Location::port(&node.name, port.id.as_str()),
                ));
            }
        }
    }
}

fn check_splitters(netlist: &Netlist, sink: &DiagnosticSink) {
    for node in &netlist.nodes {
        let NodeKind::Splitter(attrs) = &node.kind else {
            continue;
        };
        for port in node.outputs() {
            match port.slice() {
                None => sink.emit(Diagnostic::error(
                    codes::BAD_SLICE,
                    format!("splitter output `{}` has no bit range", port.id),
                    Location::port(&node.name, port.id.as_str()),
                )),
                Some(range) if range.hi >= attrs.bandwidth => sink.emit(
                    Diagnostic::error(
                        codes::BAD_SLICE,
                        format!(
                            "splitter output `{}` selects bits {}..{} of a {}-bit input",
                            port.id, range.hi, range.lo, attrs.bandwidth
                        ),
                        Location::port(&node.name, port.id.as_str()),
                    )
                    .with_help(format!(
                        "the highest selectable bit is {}",
                        attrs.bandwidth.saturating_sub(1)
                    )),
                ),
                Some(_) => {}
            }
        }
    }
}

fn check_multiplexers(netlist: &Netlist, sink: &DiagnosticSink) {
    for node in &netlist.nodes {
        let NodeKind::Multiplexer(attrs) = &node.kind else {
            continue;
        };
        let count = node.data_inputs().count();
        if count != attrs.inputs as usize {
            sink.emit(Diagnostic::warning(
                codes::MUX_INPUT_COUNT,
                format!(
                    "multiplexer `{}` declares {} inputs but has {count} data ports",
                    node.name, attrs.inputs
                ),
                Location::node(&node.name),
            ));
        }
    }
}

fn check_unknown_kinds(netlist: &Netlist, sink: &DiagnosticSink) {
    for node in &netlist.nodes {
        if node.kind == NodeKind::Unknown {
            sink.emit(Diagnostic::warning(
                codes::UNKNOWN_KIND,
                format!("node `{}` has an unknown kind and will be skipped", node.name),
                Location::node(&node.name),
            ));
        }
    }
}

/// Returns `true` if a value entering `target.port` can reach the target's
/// outputs without passing through a clock edge.
fn is_combinational_through(source: &Node, target: &Node, target_port: &str) -> bool {
    match (&source.kind, &target.kind) {
        (NodeKind::Register(_), _) | (NodeKind::ModuleInstance(_), _) => false,
        (_, NodeKind::Memory(_)) => target_port == well_known::ADDRESS,
        _ => true,
    }
}

fn check_combinational_loops(
    netlist: &Netlist,
    nodes: &HashMap<&str, &Node>,
    sink: &DiagnosticSink,
) {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();
    for (pos, node) in netlist.nodes.iter().enumerate() {
        index
            .entry(node.id.as_str())
            .or_insert_with(|| graph.add_node(pos));
    }

    for edge in &netlist.edges {
        let Some(((src, _), (tgt, tgt_port))) = endpoints(edge, nodes) else {
            continue;
        };
        if !is_combinational_through(src, tgt, tgt_port.id.as_str()) {
            continue;
        }
        let a = index[src.id.as_str()];
        let b = index[tgt.id.as_str()];
        graph.update_edge(a, b, ());
    }

    let mut loops: Vec<Vec<usize>> = kosaraju_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut members: Vec<usize> = scc.iter().map(|ix| graph[*ix]).collect();
            members.sort_unstable();
            members
        })
        .collect();
    loops.sort();

    for members in loops {
        let names: Vec<String> = members
            .iter()
            .map(|pos| format!("`{}`", netlist.nodes[*pos].name))
            .collect();
        let first = &netlist.nodes[members[0]];
        sink.emit(
            Diagnostic::error(
                codes::COMBINATIONAL_LOOP,
                format!("combinational loop through {}", names.join(", ")),
                Location::node(&first.name),
            )
            .with_help("break the loop with a register"),
        );
    }
}
