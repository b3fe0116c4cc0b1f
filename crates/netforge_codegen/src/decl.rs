//! Declaration emitters: one internal net per non-port node output.

use crate::classify::Buckets;
use crate::hdl::{Decl, Storage};
use crate::resolve::NetResolver;
use netforge_common::{decoded_width, encoded_width};
use netforge_netlist::{well_known, Node, NodeKind, Port, SignalType};

/// The type carried by a port: its struct type, or its bandwidth in bits.
/// Unsized ports without a struct type are treated as scalars.
pub fn port_type(port: &Port) -> SignalType {
    match &port.struct_type {
        Some(st) => SignalType::Struct(st.clone()),
        None => SignalType::Bits(port.bandwidth.unwrap_or(1)),
    }
}

/// Name of the inverted-output net of a register.
pub fn inverted_net(resolver: &NetResolver<'_, '_>, node: &Node) -> String {
    resolver.output_net_by_id(node, well_known::DATA_OUT_N, format!("{}_n", node.name))
}

/// Name of the array backing a memory.
pub fn memory_array(node: &Node) -> String {
    format!("{}_mem", node.name)
}

/// Emits the declarations of every internal node, in statement order.
///
/// Nets that coincide with a module port are not redeclared, and a name is
/// declared at most once.
pub fn emit_declarations(buckets: &Buckets<'_>, resolver: &NetResolver<'_, '_>) -> Vec<Decl> {
    let mut decls: Vec<Decl> = Vec::new();
    let mut declare = |decl: Decl| {
        let name = decl.name();
        if buckets.port_names.contains(name) || decls.iter().any(|d| d.name() == name) {
            return;
        }
        decls.push(decl);
    };
    for node in buckets.internal() {
        for decl in node_declarations(node, resolver) {
            declare(decl);
        }
    }
    decls
}

fn signal(name: String, ty: SignalType) -> Decl {
    Decl::Signal {
        name,
        ty,
        storage: Storage::Wire,
    }
}

fn node_declarations(node: &Node, resolver: &NetResolver<'_, '_>) -> Vec<Decl> {
    match &node.kind {
        NodeKind::LogicGate(_)
        | NodeKind::Multiplexer(_)
        | NodeKind::ArithmeticUnit(_)
        | NodeKind::CompareUnit(_) => node
            .signal_type()
            .map(|ty| vec![signal(resolver.primary_net(node), ty)])
            .unwrap_or_default(),
        NodeKind::Decoder(attrs) => vec![signal(
            resolver.primary_net(node),
            SignalType::Bits(decoded_width(attrs.bandwidth)),
        )],
        NodeKind::Encoder(attrs) => vec![signal(
            resolver.primary_net(node),
            SignalType::Bits(encoded_width(attrs.bandwidth)),
        )],
        NodeKind::Combiner => {
            let ty = node
                .primary_output()
                .map(port_type)
                .unwrap_or(SignalType::Bits(1));
            vec![signal(resolver.primary_net(node), ty)]
        }
        NodeKind::ModuleInstance(_) => node
            .outputs()
            .filter(|port| !resolver.loads(node, port).is_empty())
            .map(|port| signal(resolver.output_net(node, port), port_type(port)))
            .collect(),
        NodeKind::Memory(attrs) => vec![
            Decl::Memory {
                name: memory_array(node),
                word_width: attrs.bandwidth,
                depth: attrs.depth(),
            },
            signal(
                resolver.output_net_by_id(node, well_known::DATA_OUT, node.name.clone()),
                SignalType::Bits(attrs.bandwidth),
            ),
        ],
        NodeKind::Register(attrs) => {
            let ty = SignalType::Bits(attrs.bandwidth);
            let mut decls = vec![signal(
                resolver.output_net_by_id(node, well_known::DATA_OUT, node.name.clone()),
                ty.clone(),
            )];
            if attrs.inverted_output {
                decls.push(signal(inverted_net(resolver, node), ty));
            }
            decls
        }
        NodeKind::Splitter(_)
        | NodeKind::InputPort(_)
        | NodeKind::OutputPort(_)
        | NodeKind::Unknown => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ConnectivityIndex;
    use netforge_netlist::{
        ClockEdge, CoderAttrs, InstanceAttrs, IoAttrs, MemoryAttrs, Netlist, RegisterAttrs,
    };

    fn output(id: &str, width: u32) -> Node {
        Node::new(id, id, NodeKind::OutputPort(IoAttrs {
            bandwidth: width,
            struct_type: None,
        }))
        .with_port(Port::input("data_in", width))
    }

    fn declare(nl: &Netlist) -> Vec<Decl> {
        let buckets = Buckets::classify(nl);
        let index = ConnectivityIndex::build(nl);
        let resolver = NetResolver::new(&index, &buckets.splitters);
        emit_declarations(&buckets, &resolver)
    }

    fn bits(decls: &[Decl], name: &str) -> Option<u32> {
        decls.iter().find_map(|d| match d {
            Decl::Signal { name: n, ty, .. } if n == name => ty.width(),
            _ => None,
        })
    }

    #[test]
    fn coder_widths() {
        let mut nl = Netlist::new();
        nl.add_node(
            Node::new("d", "dec", NodeKind::Decoder(CoderAttrs { bandwidth: 3 }))
                .with_port(Port::input("data_in", 3))
                .with_port(Port::output("data_out", 8)),
        )
        .add_node(
            Node::new("e", "enc", NodeKind::Encoder(CoderAttrs { bandwidth: 5 }))
                .with_port(Port::input("data_in", 5))
                .with_port(Port::output("data_out", 3)),
        );
        let decls = declare(&nl);
        assert_eq!(bits(&decls, "dec"), Some(8));
        assert_eq!(bits(&decls, "enc"), Some(3));
    }

    #[test]
    fn register_feeding_output_is_not_redeclared() {
        let mut nl = Netlist::new();
        nl.add_node(
            Node::new("r", "r", NodeKind::Register(RegisterAttrs {
                bandwidth: 4,
                clock_edge: ClockEdge::Rising,
                reset: None,
                enable: false,
                inverted_output: true,
            }))
            .with_port(Port::input("clk", 1))
            .with_port(Port::input("data_in", 4))
            .with_port(Port::output("data_out", 4))
            .with_port(Port::output("data_out_n", 4)),
        )
        .add_node(output("q", 4));
        nl.connect("r", "data_out", "q", "data_in");
        let decls = declare(&nl);
        let names: Vec<_> = decls.iter().map(Decl::name).collect();
        assert_eq!(names, vec!["r_data_out_n"]);
    }

    #[test]
    fn memory_declares_array_and_read_net() {
        let mut nl = Netlist::new();
        nl.add_node(
            Node::new("m", "ram", NodeKind::Memory(MemoryAttrs {
                bandwidth: 8,
                address_bandwidth: 4,
                clock_edge: ClockEdge::Rising,
            }))
            .with_port(Port::output("data_out", 8)),
        );
        let decls = declare(&nl);
        assert_eq!(
            decls[0],
            Decl::Memory {
                name: "ram_mem".to_string(),
                word_width: 8,
                depth: 16,
            }
        );
        assert_eq!(bits(&decls, "ram"), Some(8));
    }

    #[test]
    fn instance_declares_only_connected_outputs() {
        let mut nl = Netlist::new();
        nl.add_node(
            Node::new("u", "u_alu", NodeKind::ModuleInstance(InstanceAttrs {
                module: "alu".to_string(),
                parameters: Vec::new(),
            }))
            .with_port(Port::output("sum", 4))
            .with_port(Port::output("carry", 1)),
        )
        .add_node(output("c", 1))
        .add_node(
            Node::new("g", "g", NodeKind::Combiner)
                .with_port(Port::input("in0", 4))
                .with_port(Port::output("data_out", 4)),
        );
        nl.connect("u", "sum", "g", "in0")
            .connect("u", "carry", "c", "data_in");
        let decls = declare(&nl);
        let names: Vec<_> = decls.iter().map(Decl::name).collect();
        assert_eq!(names, vec!["g", "u_alu_sum"]);
    }
}
