//! Reading netlist snapshots in the editor's JSON format.

use crate::error::NetlistError;
use crate::netlist::Netlist;
use std::path::Path;

/// Loads a netlist snapshot from a JSON file.
pub fn load_netlist(path: &Path) -> Result<Netlist, NetlistError> {
    let content = std::fs::read_to_string(path)?;
    netlist_from_str(&content)
}

/// Parses a netlist snapshot from JSON text.
pub fn netlist_from_str(content: &str) -> Result<Netlist, NetlistError> {
    Ok(serde_json::from_str(content)?)
}
