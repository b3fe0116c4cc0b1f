//! Netlist-to-HDL code generator for netforge.
//!
//! [`generate`] lowers an immutable [`Netlist`] snapshot into one Verilog
//! module or VHDL entity. The work happens in a fixed series of passes:
//!
//! 1. [`ConnectivityIndex`] answers driver and load queries over the edges.
//! 2. [`Buckets`] sorts nodes by the rule that lowers them.
//! 3. [`NetResolver`] names every net and rewrites splitter outputs into
//!    bit slices of the splitter's input.
//! 4. The declaration and statement emitters build a dialect-neutral tree
//!    ([`hdl`]), which [`frame::assemble`] wraps into a [`Module`].
//! 5. A [`Printer`] renders the module using the dialect's [`Vocabulary`].
//!
//! Generation never fails. Missing connections degrade to zero placeholders
//! and are reported once per port as [`UNCONNECTED`] warnings.

#![warn(missing_docs)]

pub mod classify;
pub mod decl;
pub mod frame;
pub mod hdl;
pub mod index;
pub mod print;
pub mod resolve;
pub mod stmt;
pub mod vocab;

pub use classify::Buckets;
pub use hdl::Module;
pub use index::{ConnectivityIndex, Endpoint};
pub use netforge_config::Dialect;
pub use print::Printer;
pub use resolve::{NetResolver, SliceBinding};
pub use vocab::Vocabulary;

use netforge_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Location};
use netforge_netlist::{Netlist, NodeKind};

/// An input port has no driver and was replaced by a zero placeholder.
pub const UNCONNECTED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);

/// Formatting options for generated text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Spaces per indentation level.
    pub indent: usize,
    /// Whether to emit a "generated by" comment on the first line.
    pub header: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            header: true,
        }
    }
}

/// Generates the HDL text of `netlist` as a module/entity named `module_name`.
///
/// Output is deterministic: the same snapshot, name, dialect and options
/// always produce the same bytes. Unconnected inputs are reported to `sink`.
pub fn generate(
    netlist: &Netlist,
    module_name: &str,
    dialect: Dialect,
    options: &CodegenOptions,
    sink: &DiagnosticSink,
) -> String {
    let buckets = Buckets::classify(netlist);
    let index = ConnectivityIndex::build(netlist);
    let resolver = NetResolver::new(&index, &buckets.splitters);
    report_unconnected(&buckets, &index, sink);
    let module = frame::assemble(module_name, &buckets, &resolver);
    Printer::new(dialect, options.indent).print(&module, options.header)
}

/// Builds the dialect-neutral module for `netlist` without printing it.
pub fn build_module(netlist: &Netlist, module_name: &str) -> Module {
    let buckets = Buckets::classify(netlist);
    let index = ConnectivityIndex::build(netlist);
    let resolver = NetResolver::new(&index, &buckets.splitters);
    frame::assemble(module_name, &buckets, &resolver)
}

/// Emits one [`UNCONNECTED`] warning per input port without a live driver.
pub fn report_unconnected(buckets: &Buckets<'_>, index: &ConnectivityIndex<'_>, sink: &DiagnosticSink) {
    for node in buckets.internal().chain(buckets.outputs.iter().copied()) {
        for port in node.inputs() {
            if index
                .driver_node(node.id.as_str(), port.id.as_str())
                .is_some()
            {
                continue;
            }
            let location = Location::port(node.name.clone(), port.id.to_string());
            let diag = match node.kind {
                NodeKind::OutputPort(_) => Diagnostic::warning(
                    UNCONNECTED,
                    format!("output port `{}` has no driver", node.name),
                    location,
                )
                .with_help("no assignment is emitted for it"),
                _ => Diagnostic::warning(
                    UNCONNECTED,
                    format!(
                        "input `{}` of {} `{}` is unconnected",
                        port.id,
                        node.kind.label(),
                        node.name
                    ),
                    location,
                )
                .with_help("a constant zero is substituted"),
            };
            sink.emit(diag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netforge_netlist::{
        ClockEdge, CoderAttrs, GateAttrs, GateOp, IoAttrs, Node, Port, RegisterAttrs,
        SplitterAttrs,
    };

    fn input(name: &str, width: u32) -> Node {
        Node::new(name, name, NodeKind::InputPort(IoAttrs {
            bandwidth: width,
            struct_type: None,
        }))
        .with_port(Port::output("data_out", width))
    }

    fn output(name: &str, width: u32) -> Node {
        Node::new(name, name, NodeKind::OutputPort(IoAttrs {
            bandwidth: width,
            struct_type: None,
        }))
        .with_port(Port::input("data_in", width))
    }

    fn and_gate(out: &str) -> Netlist {
        let mut nl = Netlist::new();
        nl.add_node(input("a", 1))
            .add_node(input("b", 1))
            .add_node(
                Node::new("c", "c", NodeKind::LogicGate(GateAttrs {
                    op: GateOp::And,
                    bandwidth: 1,
                    struct_type: None,
                }))
                .with_port(Port::input("in0", 1))
                .with_port(Port::input("in1", 1))
                .with_port(Port::output("data_out", 1)),
            )
            .add_node(output(out, 1));
        nl.connect("a", "data_out", "c", "in0")
            .connect("b", "data_out", "c", "in1")
            .connect("c", "data_out", out, "data_in");
        nl
    }

    fn gen(nl: &Netlist, dialect: Dialect) -> (String, DiagnosticSink) {
        let sink = DiagnosticSink::new();
        let text = generate(nl, "top", dialect, &CodegenOptions::default(), &sink);
        (text, sink)
    }

    #[test]
    fn and_gate_verilog() {
        let (text, sink) = gen(&and_gate("out"), Dialect::Verilog);
        let expected = "\
// Generated by netforge. Do not edit.

module top (
    input a,
    input b,
    output out
);

    wire c;

    assign c = a & b;
    assign out = c;

endmodule
";
        assert_eq!(text, expected);
        assert_eq!(sink.warning_count(), 0);
    }

    #[test]
    fn and_gate_vhdl() {
        let (text, _) = gen(&and_gate("y"), Dialect::Vhdl);
        let expected = "\
-- Generated by netforge. Do not edit.
library ieee;
use ieee.std_logic_1164.all;
use ieee.numeric_std.all;

entity top is
    port (
        a : in std_logic;
        b : in std_logic;
        y : out std_logic
    );
end entity top;

architecture rtl of top is
    signal c : std_logic;
begin
    c <= a and b;
    y <= c;
end architecture rtl;
";
        assert_eq!(text, expected);
    }

    #[test]
    fn header_can_be_disabled() {
        let sink = DiagnosticSink::new();
        let options = CodegenOptions {
            indent: 2,
            header: false,
        };
        let text = generate(&and_gate("out"), "top", Dialect::Verilog, &options, &sink);
        assert!(text.starts_with("module top (\n  input a,\n"));
    }

    #[test]
    fn output_is_deterministic() {
        let nl = and_gate("out");
        let (first, _) = gen(&nl, Dialect::Vhdl);
        let (second, _) = gen(&nl, Dialect::Vhdl);
        assert_eq!(first, second);
    }

    #[test]
    fn decoder_has_four_arms_and_default() {
        let mut nl = Netlist::new();
        nl.add_node(input("sel", 2))
            .add_node(
                Node::new("d", "dec", NodeKind::Decoder(CoderAttrs { bandwidth: 2 }))
                    .with_port(Port::input("data_in", 2))
                    .with_port(Port::output("data_out", 4)),
            )
            .add_node(output("onehot", 4));
        nl.connect("sel", "data_out", "d", "data_in")
            .connect("d", "data_out", "onehot", "data_in");
        let (text, _) = gen(&nl, Dialect::Verilog);
        assert!(text.contains("    reg [3:0] dec;\n"));
        for (label, bits) in [("00", "0001"), ("01", "0010"), ("10", "0100"), ("11", "1000")] {
            assert!(text.contains(&format!("2'b{label}: dec = 4'b{bits};")), "{text}");
        }
        assert_eq!(text.matches("default:").count(), 1);
        assert!(text.contains("default: dec = 4'b0;"));

        let (vhdl, _) = gen(&nl, Dialect::Vhdl);
        assert!(vhdl.contains("process (sel)\n"));
        assert!(vhdl.contains("when \"10\" => dec <= \"0100\";"));
        assert!(vhdl.contains("when others => dec <= (others => '0');"));
    }

    #[test]
    fn register_driving_output_has_single_driver() {
        let mut nl = Netlist::new();
        nl.add_node(input("clk", 1))
            .add_node(input("d", 4))
            .add_node(
                Node::new("r", "r", NodeKind::Register(RegisterAttrs {
                    bandwidth: 4,
                    clock_edge: ClockEdge::Rising,
                    reset: None,
                    enable: false,
                    inverted_output: false,
                }))
                .with_port(Port::input("clk", 1))
                .with_port(Port::input("data_in", 4))
                .with_port(Port::output("data_out", 4)),
            )
            .add_node(output("q", 4));
        nl.connect("clk", "data_out", "r", "clk")
            .connect("d", "data_out", "r", "data_in")
            .connect("r", "data_out", "q", "data_in");
        let (text, _) = gen(&nl, Dialect::Verilog);
        let expected = "\
// Generated by netforge. Do not edit.

module top (
    input clk,
    input [3:0] d,
    output reg [3:0] q
);

    always @(posedge clk) begin
        q <= d;
    end

endmodule
";
        assert_eq!(text, expected);
        assert!(!text.contains("assign q"));
    }

    #[test]
    fn splitter_reads_become_slices() {
        let mut nl = Netlist::new();
        nl.add_node(input("A", 8))
            .add_node(
                Node::new("s", "s", NodeKind::Splitter(SplitterAttrs { bandwidth: 8 }))
                    .with_port(Port::input("data_in", 8))
                    .with_port(Port::output("lo", 4).with_slice(0, 3))
                    .with_port(Port::output("hi", 4).with_slice(4, 7))
                    .with_port(Port::output("msb", 1).with_slice(7, 7)),
            )
            .add_node(output("top_nibble", 4))
            .add_node(output("sign", 1));
        nl.connect("A", "data_out", "s", "data_in")
            .connect("s", "hi", "top_nibble", "data_in")
            .connect("s", "msb", "sign", "data_in");
        let (verilog, _) = gen(&nl, Dialect::Verilog);
        assert!(verilog.contains("assign top_nibble = A[7:4];"));
        assert!(verilog.contains("assign sign = A[7];"));
        assert!(!verilog.contains("wire"));
        let (vhdl, _) = gen(&nl, Dialect::Vhdl);
        assert!(vhdl.contains("top_nibble <= A(7 downto 4);"));
        assert!(vhdl.contains("sign <= A(7);"));
    }

    #[test]
    fn unconnected_inputs_warn_once_per_port() {
        let mut nl = Netlist::new();
        nl.add_node(input("a", 1))
            .add_node(
                Node::new("c", "c", NodeKind::LogicGate(GateAttrs {
                    op: GateOp::Xor,
                    bandwidth: 1,
                    struct_type: None,
                }))
                .with_port(Port::input("in0", 1))
                .with_port(Port::input("in1", 1))
                .with_port(Port::output("data_out", 1)),
            )
            .add_node(output("y", 1))
            .add_node(output("dangling", 1));
        nl.connect("a", "data_out", "c", "in0")
            .connect("c", "data_out", "y", "data_in");
        let (text, sink) = gen(&nl, Dialect::Verilog);
        assert!(text.contains("assign c = a ^ 1'b0 /* unconnected */;"));
        assert!(!text.contains("assign dangling"));
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.code == UNCONNECTED));
        assert!(diags[0].message.contains("`in1`"));
        assert!(diags[1].message.contains("`dangling`"));
    }

    #[test]
    fn unknown_nodes_are_ignored() {
        let mut nl = and_gate("out");
        nl.add_node(Node::new("x", "probe", NodeKind::Unknown).with_port(Port::input("p", 1)));
        let (with_unknown, sink) = gen(&nl, Dialect::Verilog);
        let (plain, _) = gen(&and_gate("out"), Dialect::Verilog);
        assert_eq!(with_unknown, plain);
        assert_eq!(sink.warning_count(), 0);
    }

    #[test]
    fn build_module_exposes_the_tree() {
        let module = build_module(&and_gate("out"), "top");
        assert_eq!(module.name, "top");
        assert_eq!(module.ports.len(), 3);
        assert_eq!(module.decls.len(), 1);
        assert_eq!(module.stmts.len(), 2);
    }
}
