//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "netforge.toml";

/// Loads and validates `netforge.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `netforge.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks required fields and value ranges.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.netlist.is_empty() {
        return Err(ConfigError::MissingField("project.netlist".to_string()));
    }
    if !is_identifier(config.project.top_name()) {
        return Err(ConfigError::ValidationError(format!(
            "top name '{}' is not a valid HDL identifier",
            config.project.top_name()
        )));
    }
    if config.codegen.dialects.is_empty() {
        return Err(ConfigError::ValidationError(
            "codegen.dialects must name at least one dialect".to_string(),
        ));
    }
    if config.codegen.indent == 0 {
        return Err(ConfigError::ValidationError(
            "codegen.indent must be at least 1".to_string(),
        ));
    }
    config.lint.denied_codes()?;
    config.lint.allowed_codes()?;
    Ok(())
}

/// Returns `true` for names usable as both a Verilog module and a VHDL entity.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
