//! Structural validation: crafted snapshots must trip exactly the expected
//! diagnostic codes, and a failing snapshot must not be generated.

use netforge_conformance::{full_pipeline, generate_unchecked, parse_netlist};
use netforge_config::Dialect;

fn input(id: &str, width: u32) -> String {
    format!(
        r#"{{"id": "{id}", "name": "{id}", "kind": {{"type": "InputPort", "bandwidth": {width}}},
            "ports": [{{"id": "data_out", "group": "output", "bandwidth": {width}}}]}}"#
    )
}

fn gate(id: &str) -> String {
    format!(
        r#"{{"id": "{id}", "name": "{id}", "kind": {{"type": "LogicGate", "op": "XOR"}},
            "ports": [{{"id": "in0", "group": "input", "bandwidth": 1}},
                      {{"id": "in1", "group": "input", "bandwidth": 1}},
                      {{"id": "data_out", "group": "output", "bandwidth": 1}}]}}"#
    )
}

fn edge(src: &str, src_port: &str, tgt: &str, tgt_port: &str) -> String {
    format!(
        r#"{{"sourceNode": "{src}", "sourcePort": "{src_port}", "targetNode": "{tgt}", "targetPort": "{tgt_port}"}}"#
    )
}

fn snapshot(nodes: &[String], edges: &[String]) -> String {
    format!(
        r#"{{"nodes": [{}], "edges": [{}]}}"#,
        nodes.join(", "),
        edges.join(", ")
    )
}

fn codes_for(nodes: &[String], edges: &[String]) -> Vec<String> {
    let result = full_pipeline(&parse_netlist(&snapshot(nodes, edges)), Dialect::Verilog);
    result.codes()
}

#[test]
fn duplicate_name() {
    let dup = r#"{"id": "b", "name": "a", "kind": {"type": "InputPort"}}"#.to_string();
    assert_eq!(codes_for(&[input("a", 1), dup], &[]), vec!["E101"]);
}

#[test]
fn duplicate_id() {
    let dup = r#"{"id": "a", "name": "other", "kind": {"type": "InputPort"}}"#.to_string();
    assert_eq!(codes_for(&[input("a", 1), dup], &[]), vec!["E102"]);
}

#[test]
fn edge_to_missing_node() {
    let codes = codes_for(&[input("a", 1)], &[edge("a", "data_out", "ghost", "in0")]);
    assert_eq!(codes, vec!["E103"]);
}

#[test]
fn edge_to_missing_port() {
    let codes = codes_for(
        &[input("a", 1), gate("g")],
        &[edge("a", "data_out", "g", "in7")],
    );
    assert!(codes.contains(&"E104".to_string()), "{codes:?}");
}

#[test]
fn edge_against_direction() {
    let codes = codes_for(
        &[input("a", 1), gate("g")],
        &[edge("g", "in0", "a", "data_out")],
    );
    assert!(codes.contains(&"E105".to_string()), "{codes:?}");
}

#[test]
fn two_drivers_on_one_input() {
    let codes = codes_for(
        &[input("a", 1), input("b", 1), gate("g")],
        &[
            edge("a", "data_out", "g", "in0"),
            edge("b", "data_out", "g", "in0"),
            edge("b", "data_out", "g", "in1"),
        ],
    );
    assert_eq!(codes, vec!["E106"]);
}

#[test]
fn width_mismatch() {
    let codes = codes_for(
        &[input("a", 4), input("b", 1), gate("g")],
        &[edge("a", "data_out", "g", "in0"), edge("b", "data_out", "g", "in1")],
    );
    assert_eq!(codes, vec!["E107"]);
}

#[test]
fn splitter_slice_outside_input() {
    let splitter = r#"{"id": "s", "name": "s", "kind": {"type": "Splitter", "bandwidth": 8},
        "ports": [{"id": "data_in", "group": "input", "bandwidth": 8},
                  {"id": "hi", "group": "output", "bandwidth": 4, "startBit": 6, "endBit": 9},
                  {"id": "raw", "group": "output", "bandwidth": 1}]}"#
        .to_string();
    let codes = codes_for(&[input("a", 8), splitter], &[edge("a", "data_out", "s", "data_in")]);
    assert_eq!(codes, vec!["E108", "E108"]);
}

#[test]
fn combinational_loop() {
    let codes = codes_for(
        &[input("a", 1), gate("g1"), gate("g2")],
        &[
            edge("a", "data_out", "g1", "in0"),
            edge("g2", "data_out", "g1", "in1"),
            edge("a", "data_out", "g2", "in0"),
            edge("g1", "data_out", "g2", "in1"),
        ],
    );
    assert_eq!(codes, vec!["E109"]);
}

#[test]
fn loop_through_register_is_fine() {
    let reg = r#"{"id": "r", "name": "r", "kind": {"type": "Register"},
        "ports": [{"id": "clk", "group": "input", "bandwidth": 1},
                  {"id": "data_in", "group": "input", "bandwidth": 1},
                  {"id": "data_out", "group": "output", "bandwidth": 1}]}"#
        .to_string();
    let result = full_pipeline(
        &parse_netlist(&snapshot(
            &[input("clk", 1), input("a", 1), gate("g"), reg],
            &[
                edge("clk", "data_out", "r", "clk"),
                edge("a", "data_out", "g", "in0"),
                edge("r", "data_out", "g", "in1"),
                edge("g", "data_out", "r", "data_in"),
            ],
        )),
        Dialect::Verilog,
    );
    assert!(!result.has_errors, "{:?}", result.codes());
    assert!(result.text.contains("always @(posedge clk) begin"));
}

#[test]
fn mux_input_count_is_a_warning() {
    let mux = r#"{"id": "m", "name": "m", "kind": {"type": "Multiplexer", "inputs": 4},
        "ports": [{"id": "in0", "group": "input", "bandwidth": 1},
                  {"id": "in1", "group": "input", "bandwidth": 1},
                  {"id": "select", "group": "input", "bandwidth": 2},
                  {"id": "data_out", "group": "output", "bandwidth": 1}]}"#
        .to_string();
    let result = full_pipeline(
        &parse_netlist(&snapshot(
            &[input("a", 1), input("b", 1), input("s", 2), mux],
            &[
                edge("a", "data_out", "m", "in0"),
                edge("b", "data_out", "m", "in1"),
                edge("s", "data_out", "m", "select"),
            ],
        )),
        Dialect::Verilog,
    );
    assert_eq!(result.codes(), vec!["W102"]);
    assert!(!result.has_errors);
    // Missing data inputs are filled with placeholders.
    assert!(result.text.contains("2'b11: m = 1'b0 /* unconnected */;"), "{}", result.text);
}

#[test]
fn unknown_kind_is_skipped_with_warning() {
    let lamp = r#"{"id": "l", "name": "blink", "kind": {"type": "Lamp"}}"#.to_string();
    let result = full_pipeline(
        &parse_netlist(&snapshot(&[input("a", 1), lamp], &[])),
        Dialect::Verilog,
    );
    assert_eq!(result.codes(), vec!["W103"]);
    assert!(!result.text.contains("blink"));
}

#[test]
fn errors_prevent_generation() {
    let dup = r#"{"id": "b", "name": "a", "kind": {"type": "InputPort"}}"#.to_string();
    let result = full_pipeline(
        &parse_netlist(&snapshot(&[input("a", 1), dup], &[])),
        Dialect::Vhdl,
    );
    assert!(result.has_errors);
    assert_eq!(result.error_count, 1);
    assert!(result.text.is_empty());
}

fn zero_width_decoder() -> String {
    r#"{"id": "d", "name": "dec", "kind": {"type": "Decoder", "bandwidth": 0},
        "ports": [{"id": "data_in", "group": "input", "bandwidth": 0},
                  {"id": "data_out", "group": "output", "bandwidth": 1}]}"#
        .to_string()
}

#[test]
fn zero_width_is_rejected() {
    assert_eq!(codes_for(&[zero_width_decoder()], &[]), vec!["E110", "E110"]);
}

#[test]
fn oversized_decoder_is_rejected() {
    let wide = r#"{"id": "d", "name": "dec", "kind": {"type": "Decoder", "bandwidth": 32}}"#.to_string();
    let result = full_pipeline(&parse_netlist(&snapshot(&[wide], &[])), Dialect::Verilog);
    assert_eq!(result.codes(), vec!["E110"]);
    assert!(result.text.is_empty());
}

#[test]
fn unvalidated_zero_width_decoder_stays_well_formed() {
    let netlist = parse_netlist(&snapshot(&[zero_width_decoder()], &[]));

    let verilog = generate_unchecked(&netlist, Dialect::Verilog).text;
    assert!(verilog.contains("assign dec = 1'b0 /* unconnected */;"), "{verilog}");
    assert!(!verilog.contains("0'b"));
    assert!(!verilog.contains("case"));

    let vhdl = generate_unchecked(&netlist, Dialect::Vhdl).text;
    assert!(vhdl.contains("dec <= '0';"), "{vhdl}");
    assert!(!vhdl.contains("when \"\""));
    assert!(!vhdl.contains("to_unsigned(0, 0)"));
}
