//! Placed primitive instances and their kind-specific attributes.

use crate::ids::NodeId;
use crate::port::{well_known, Port};
use serde::{Deserialize, Serialize};

fn one() -> u32 {
    1
}

/// A named composite type defined in an HDL package.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructType {
    /// Package that defines the type.
    pub package: String,
    /// Type name inside the package.
    pub type_name: String,
}

/// The type of a net: a raw bit vector or a named struct.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum SignalType {
    /// A bit vector of the given width. Width 1 is a scalar.
    Bits(u32),
    /// A package-qualified composite type.
    Struct(StructType),
}

impl SignalType {
    fn from_parts(bandwidth: u32, struct_type: &Option<StructType>) -> Self {
        match struct_type {
            Some(st) => SignalType::Struct(st.clone()),
            None => SignalType::Bits(bandwidth),
        }
    }

    /// The bit width, or `None` for struct types.
    pub fn width(&self) -> Option<u32> {
        match self {
            SignalType::Bits(w) => Some(*w),
            SignalType::Struct(_) => None,
        }
    }
}

/// Boolean operator of a [`NodeKind::LogicGate`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateOp {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Negated conjunction.
    Nand,
    /// Negated disjunction.
    Nor,
    /// Exclusive or.
    Xor,
    /// Negated exclusive or.
    Xnor,
    /// Inversion of a single input.
    Not,
}

impl GateOp {
    /// Returns `true` for operators whose result is the complement of a base operator.
    pub fn is_negated(self) -> bool {
        matches!(self, GateOp::Nand | GateOp::Nor | GateOp::Xnor | GateOp::Not)
    }
}

/// Operator of a [`NodeKind::ArithmeticUnit`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Remainder.
    Mod,
}

/// Operator of a [`NodeKind::CompareUnit`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Ge,
    /// Less than or equal.
    Le,
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
}

/// Active clock edge of a sequential primitive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockEdge {
    /// Rising edge; for resets, active high.
    #[default]
    Rising,
    /// Falling edge; for resets, active low.
    Falling,
}

/// Whether a register reset is sampled by the clock or acts immediately.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetKind {
    /// Checked only on the active clock edge.
    Sync,
    /// Part of the sensitivity list; overrides the clock.
    Async,
}

/// Reset configuration of a register.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Synchronous or asynchronous.
    pub kind: ResetKind,
    /// Active edge (rising = active high).
    #[serde(default)]
    pub edge: ClockEdge,
}

/// Attributes of module-level input and output ports.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IoAttrs {
    /// Bit width.
    #[serde(default = "one")]
    pub bandwidth: u32,
    /// Struct type, when the port carries one.
    #[serde(default)]
    pub struct_type: Option<StructType>,
}

/// Attributes of a boolean gate.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateAttrs {
    /// Boolean operator.
    pub op: GateOp,
    /// Bit width of operands and result.
    #[serde(default = "one")]
    pub bandwidth: u32,
    /// Struct type, when the gate operates on one.
    #[serde(default)]
    pub struct_type: Option<StructType>,
}

/// Attributes of a multiplexer.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuxAttrs {
    /// Number of data inputs.
    #[serde(default = "two")]
    pub inputs: u32,
    /// Bit width of each data input and the output.
    #[serde(default = "one")]
    pub bandwidth: u32,
    /// Struct type, when the selected data is one.
    #[serde(default)]
    pub struct_type: Option<StructType>,
}

fn two() -> u32 {
    2
}

/// Attributes of an arithmetic unit.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArithAttrs {
    /// Arithmetic operator.
    pub op: ArithOp,
    /// Result width.
    #[serde(default = "one")]
    pub bandwidth: u32,
}

/// Attributes of a comparator.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareAttrs {
    /// Comparison operator.
    pub op: CompareOp,
    /// Operand width. The result is always one bit.
    #[serde(default = "one")]
    pub bandwidth: u32,
}

/// Attributes shared by encoders and decoders.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoderAttrs {
    /// Input width.
    #[serde(default = "one")]
    pub bandwidth: u32,
}

impl CoderAttrs {
    /// Widest decoder input: the one-hot output then has 1024 bits.
    pub const MAX_DECODER_INPUT: u32 = 10;
    /// Widest one-hot encoder input.
    pub const MAX_ENCODER_INPUT: u32 = 1024;
}

/// Attributes of a bit splitter.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitterAttrs {
    /// Width of the split input.
    #[serde(default = "one")]
    pub bandwidth: u32,
}

/// A parameter (Verilog) or generic (VHDL) override on an instance.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name in the instantiated module.
    pub name: String,
    /// Value text, emitted verbatim.
    pub value: String,
}

/// Attributes of a sub-module instance.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceAttrs {
    /// Name of the instantiated module or entity.
    pub module: String,
    /// Parameter overrides, in emission order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// Attributes of a memory.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryAttrs {
    /// Word width.
    #[serde(default = "one")]
    pub bandwidth: u32,
    /// Address width; the memory holds `2^address_bandwidth` words.
    #[serde(default = "one")]
    pub address_bandwidth: u32,
    /// Clock edge of the write port.
    #[serde(default)]
    pub clock_edge: ClockEdge,
}

impl MemoryAttrs {
    /// Widest address bus.
    pub const MAX_ADDRESS_WIDTH: u32 = 32;

    /// Number of words.
    pub fn depth(&self) -> u64 {
        1u64.checked_shl(self.address_bandwidth).unwrap_or(u64::MAX)
    }
}

/// Attributes of a register.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttrs {
    /// Stored width.
    #[serde(default = "one")]
    pub bandwidth: u32,
    /// Capturing clock edge.
    #[serde(default)]
    pub clock_edge: ClockEdge,
    /// Reset configuration, if the register has a reset.
    #[serde(default)]
    pub reset: Option<ResetConfig>,
    /// Whether the register has an `enable` port gating capture.
    #[serde(default)]
    pub enable: bool,
    /// Whether the register drives a complemented second output.
    #[serde(default)]
    pub inverted_output: bool,
}

/// The closed set of primitive kinds, each with its own attributes.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Module input.
    InputPort(IoAttrs),
    /// Module output.
    OutputPort(IoAttrs),
    /// Boolean gate.
    LogicGate(GateAttrs),
    /// N-way multiplexer.
    Multiplexer(MuxAttrs),
    /// Arithmetic operator.
    ArithmeticUnit(ArithAttrs),
    /// Comparator.
    CompareUnit(CompareAttrs),
    /// One-hot to binary encoder.
    Encoder(CoderAttrs),
    /// Binary to one-hot decoder.
    Decoder(CoderAttrs),
    /// Splits its input into bit slices.
    Splitter(SplitterAttrs),
    /// Concatenates its inputs.
    Combiner,
    /// Instance of another module.
    ModuleInstance(InstanceAttrs),
    /// Word-addressed memory.
    Memory(MemoryAttrs),
    /// Clocked register.
    Register(RegisterAttrs),
    /// A kind this version does not know; ignored by every stage.
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    /// Short human-readable name of the kind.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::InputPort(_) => "input port",
            NodeKind::OutputPort(_) => "output port",
            NodeKind::LogicGate(_) => "logic gate",
            NodeKind::Multiplexer(_) => "multiplexer",
            NodeKind::ArithmeticUnit(_) => "arithmetic unit",
            NodeKind::CompareUnit(_) => "compare unit",
            NodeKind::Encoder(_) => "encoder",
            NodeKind::Decoder(_) => "decoder",
            NodeKind::Splitter(_) => "splitter",
            NodeKind::Combiner => "combiner",
            NodeKind::ModuleInstance(_) => "module instance",
            NodeKind::Memory(_) => "memory",
            NodeKind::Register(_) => "register",
            NodeKind::Unknown => "unknown",
        }
    }

    /// Returns `true` for kinds whose own statement writes the net an
    /// output port would otherwise copy from.
    pub fn drives_own_outputs(&self) -> bool {
        matches!(
            self,
            NodeKind::ModuleInstance(_) | NodeKind::Memory(_) | NodeKind::Register(_)
        )
    }
}

/// A placed primitive instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Identifier, unique within the snapshot.
    pub id: NodeId,
    /// User-chosen name, emitted verbatim as a net or instance name.
    pub name: String,
    /// Kind and kind-specific attributes.
    pub kind: NodeKind,
    /// Ports in declared order.
    #[serde(default)]
    pub ports: Vec<Port>,
}

impl Node {
    /// Creates a node with no ports.
    pub fn new(id: &str, name: &str, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(id),
            name: name.to_string(),
            kind,
            ports: Vec::new(),
        }
    }

    /// Appends a port.
    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    /// Looks up a port by id.
    pub fn port(&self, id: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.id.as_str() == id)
    }

    /// Input-group ports in declared order.
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_input())
    }

    /// Output-group ports in declared order.
    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_output())
    }

    /// Input ports that carry operands, skipping control ports.
    pub fn data_inputs(&self) -> impl Iterator<Item = &Port> {
        self.inputs().filter(|p| !well_known::is_control(p.id.as_str()))
    }

    /// The first output port, which carries the node's own net.
    pub fn primary_output(&self) -> Option<&Port> {
        self.outputs().next()
    }

    /// The type of the node's primary output net, for kinds that have one
    /// fixed by attributes.
    pub fn signal_type(&self) -> Option<SignalType> {
        match &self.kind {
            NodeKind::InputPort(a) | NodeKind::OutputPort(a) => {
                Some(SignalType::from_parts(a.bandwidth, &a.struct_type))
            }
            NodeKind::LogicGate(a) => Some(SignalType::from_parts(a.bandwidth, &a.struct_type)),
            NodeKind::Multiplexer(a) => Some(SignalType::from_parts(a.bandwidth, &a.struct_type)),
            NodeKind::ArithmeticUnit(a) => Some(SignalType::Bits(a.bandwidth)),
            NodeKind::CompareUnit(_) => Some(SignalType::Bits(1)),
            NodeKind::Memory(a) => Some(SignalType::Bits(a.bandwidth)),
            NodeKind::Register(a) => Some(SignalType::Bits(a.bandwidth)),
            _ => None,
        }
    }
}
