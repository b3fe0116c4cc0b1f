//! Locations inside a netlist snapshot that diagnostics point at.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the netlist: a node, optionally narrowed to one of its ports.
///
/// Netlists come from a graphical editor, so there are no byte offsets to
/// point at. Diagnostics instead name the node (by its user-visible name)
/// and, where relevant, the port.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    /// The user-visible node name, if the diagnostic concerns a node.
    pub node: Option<String>,
    /// The port id on that node, if the diagnostic concerns a port.
    pub port: Option<String>,
}

impl Location {
    /// A location that refers to the whole design.
    pub const DESIGN: Location = Location {
        node: None,
        port: None,
    };

    /// A location referring to a node.
    pub fn node(name: impl Into<String>) -> Self {
        Self {
            node: Some(name.into()),
            port: None,
        }
    }

    /// A location referring to a port on a node.
    pub fn port(node: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            node: Some(node.into()),
            port: Some(port.into()),
        }
    }

    /// Returns `true` if this location refers to the whole design.
    pub fn is_design(&self) -> bool {
        self.node.is_none()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.node, &self.port) {
            (Some(node), Some(port)) => write!(f, "node `{node}`, port `{port}`"),
            (Some(node), None) => write!(f, "node `{node}`"),
            (None, _) => write!(f, "design"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        assert_eq!(format!("{}", Location::node("and1")), "node `and1`");
        assert_eq!(
            format!("{}", Location::port("mux", "select")),
            "node `mux`, port `select`"
        );
        assert_eq!(format!("{}", Location::DESIGN), "design");
    }

    #[test]
    fn design_location() {
        assert!(Location::DESIGN.is_design());
        assert!(!Location::node("r").is_design());
    }
}
