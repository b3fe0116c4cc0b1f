//! Connection points on nodes.

use crate::ids::PortId;
use crate::node::StructType;
use serde::{Deserialize, Serialize};

/// Port ids with a fixed meaning across primitives.
///
/// Every input-group port whose id is not a control port listed here is a
/// data input, taken in declared order.
pub mod well_known {
    /// Clock input of registers and memories.
    pub const CLK: &str = "clk";
    /// Reset input of registers.
    pub const RESET: &str = "reset";
    /// Capture enable of registers.
    pub const ENABLE: &str = "enable";
    /// Select input of multiplexers.
    pub const SELECT: &str = "select";
    /// Data input of registers and memories.
    pub const DATA_IN: &str = "data_in";
    /// Primary data output.
    pub const DATA_OUT: &str = "data_out";
    /// Inverted output of registers.
    pub const DATA_OUT_N: &str = "data_out_n";
    /// Address input of memories.
    pub const ADDRESS: &str = "address";
    /// Write enable of memories.
    pub const WRITE_ENABLE: &str = "write_enable";

    /// Returns `true` for ports that steer a primitive rather than carry its operands.
    pub fn is_control(id: &str) -> bool {
        matches!(id, CLK | RESET | ENABLE | SELECT | ADDRESS | WRITE_ENABLE)
    }
}

/// Direction of a port. Edges always run from an output to an input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortGroup {
    /// The port consumes a signal.
    Input,
    /// The port produces a signal.
    Output,
}

/// An inclusive bit range `[hi:lo]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BitRange {
    /// Least significant bit, inclusive.
    pub lo: u32,
    /// Most significant bit, inclusive.
    pub hi: u32,
}

impl BitRange {
    /// Creates a range from two bit positions given in either order.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    /// Number of bits covered, saturating at `u32::MAX`.
    pub fn width(&self) -> u32 {
        self.hi.saturating_sub(self.lo).saturating_add(1)
    }

    /// Re-bases this range onto a parent range that starts at `parent_lo`.
    pub fn offset(self, parent_lo: u32) -> Self {
        Self {
            lo: self.lo.saturating_add(parent_lo),
            hi: self.hi.saturating_add(parent_lo),
        }
    }
}

/// A connection point on a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// Identifier unique within the owning node.
    pub id: PortId,
    /// Direction of the port.
    pub group: PortGroup,
    /// Bit width; absent for composite (struct) ports.
    #[serde(default)]
    pub bandwidth: Option<u32>,
    /// First bit of the slice a Splitter output carries.
    #[serde(default)]
    pub start_bit: Option<u32>,
    /// Last bit of the slice a Splitter output carries.
    #[serde(default)]
    pub end_bit: Option<u32>,
    /// Named composite type carried instead of a bit vector.
    #[serde(default)]
    pub struct_type: Option<StructType>,
}

impl Port {
    /// Creates an input port of the given width.
    pub fn input(id: &str, bandwidth: u32) -> Self {
        Self::new(id, PortGroup::Input, Some(bandwidth))
    }

    /// Creates an output port of the given width.
    pub fn output(id: &str, bandwidth: u32) -> Self {
        Self::new(id, PortGroup::Output, Some(bandwidth))
    }

    fn new(id: &str, group: PortGroup, bandwidth: Option<u32>) -> Self {
        Self {
            id: PortId::new(id),
            group,
            bandwidth,
            start_bit: None,
            end_bit: None,
            struct_type: None,
        }
    }

    /// Attaches a bit slice to this port.
    pub fn with_slice(mut self, start_bit: u32, end_bit: u32) -> Self {
        self.start_bit = Some(start_bit);
        self.end_bit = Some(end_bit);
        self
    }

    /// Marks this port as carrying a struct type.
    pub fn with_struct(mut self, struct_type: StructType) -> Self {
        self.bandwidth = None;
        self.struct_type = Some(struct_type);
        self
    }

    /// Returns `true` for input-group ports.
    pub fn is_input(&self) -> bool {
        self.group == PortGroup::Input
    }

    /// Returns `true` for output-group ports.
    pub fn is_output(&self) -> bool {
        self.group == PortGroup::Output
    }

    /// The bit slice this port carries, when both ends are set.
    pub fn slice(&self) -> Option<BitRange> {
        match (self.start_bit, self.end_bit) {
            (Some(start), Some(end)) => Some(BitRange::new(start, end)),
            _ => None,
        }
    }
}
