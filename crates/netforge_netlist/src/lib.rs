//! Netlist snapshot model consumed by the netforge code generator.
//!
//! A [`Netlist`] is an immutable snapshot of a schematic drawn in an
//! external editor: typed [`Node`]s carrying ordered [`Port`]s, connected by
//! directional [`Edge`]s. Node attributes are a tagged sum type
//! ([`NodeKind`]) so each primitive only carries the fields it uses.
//!
//! The crate also loads snapshots from the editor's JSON format and offers a
//! structural [`validate`] pre-pass for the preconditions the generator
//! itself trusts (unique names, single drivers, compatible widths).

#![warn(missing_docs)]

pub mod edge;
pub mod error;
pub mod ids;
pub mod loader;
pub mod netlist;
pub mod node;
pub mod port;
pub mod validate;

pub use edge::Edge;
pub use error::NetlistError;
pub use ids::{NodeId, PortId};
pub use loader::{load_netlist, netlist_from_str};
pub use netlist::Netlist;
pub use node::{
    ArithAttrs, ArithOp, ClockEdge, CoderAttrs, CompareAttrs, CompareOp, GateAttrs, GateOp,
    InstanceAttrs, IoAttrs, MemoryAttrs, MuxAttrs, Node, NodeKind, Parameter, RegisterAttrs,
    ResetConfig, ResetKind, SignalType, SplitterAttrs, StructType,
};
pub use port::{well_known, BitRange, Port, PortGroup};
pub use validate::validate;
