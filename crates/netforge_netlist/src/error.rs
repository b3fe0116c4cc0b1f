//! Errors raised while loading a netlist snapshot.

/// Errors that can occur when reading a netlist snapshot.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// The snapshot file could not be read.
    #[error("failed to read netlist: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot is not valid netlist JSON.
    #[error("failed to parse netlist: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_io_error() {
        let err = NetlistError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(format!("{err}").starts_with("failed to read netlist:"));
    }

    #[test]
    fn display_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = NetlistError::from(json_err);
        assert!(format!("{err}").starts_with("failed to parse netlist:"));
    }
}
