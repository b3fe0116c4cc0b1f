//! Configuration types deserialized from `netforge.toml`.

use crate::error::ConfigError;
use netforge_diagnostics::DiagnosticCode;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// The top-level project configuration parsed from `netforge.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata and the snapshot to generate from.
    pub project: ProjectMeta,
    /// Code generation settings.
    #[serde(default)]
    pub codegen: CodegenConfig,
    /// Diagnostic overrides.
    #[serde(default)]
    pub lint: LintConfig,
}

/// Core project metadata required in every `netforge.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// Path to the netlist snapshot (JSON), relative to the project root.
    pub netlist: String,
    /// Name of the generated module/entity. Defaults to the project name.
    #[serde(default)]
    pub top: Option<String>,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

impl ProjectMeta {
    /// The module/entity name to emit.
    pub fn top_name(&self) -> &str {
        self.top.as_deref().unwrap_or(&self.name)
    }
}

/// A target HDL dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Verilog-2005 with SystemVerilog package-qualified struct types.
    Verilog,
    /// VHDL-2008 RTL.
    Vhdl,
}

impl Dialect {
    /// File extension of generated sources, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Dialect::Verilog => "v",
            Dialect::Vhdl => "vhd",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Verilog => write!(f, "verilog"),
            Dialect::Vhdl => write!(f, "vhdl"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "verilog" | "v" => Ok(Dialect::Verilog),
            "vhdl" | "vhd" => Ok(Dialect::Vhdl),
            other => Err(format!("unknown dialect '{other}'")),
        }
    }
}

/// Code generation settings.
#[derive(Debug, Deserialize)]
pub struct CodegenConfig {
    /// Dialects to generate.
    ///
    /// Accepts either a single string (`dialects = "vhdl"`) or a list
    /// (`dialects = ["verilog", "vhdl"]`).
    #[serde(default = "default_dialects", deserialize_with = "deserialize_dialects")]
    pub dialects: Vec<Dialect>,
    /// Output directory, relative to the project root.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Whether to emit a "generated by" header comment.
    #[serde(default = "default_true")]
    pub header: bool,
    /// Spaces per indentation level.
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Whether to run structural validation before generating.
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            dialects: default_dialects(),
            output_dir: default_output_dir(),
            header: true,
            indent: default_indent(),
            validate: true,
        }
    }
}

fn default_dialects() -> Vec<Dialect> {
    vec![Dialect::Verilog]
}

fn default_output_dir() -> String {
    "build/hdl".to_string()
}

fn default_true() -> bool {
    true
}

fn default_indent() -> usize {
    4
}

/// Deserializes a dialect field that can be a single string or a list.
fn deserialize_dialects<'de, D>(deserializer: D) -> Result<Vec<Dialect>, D::Error>
where
    D: Deserializer<'de>,
{
    struct DialectOrVec;

    impl<'de> Visitor<'de> for DialectOrVec {
        type Value = Vec<Dialect>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a dialect name or a list of dialect names")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.parse::<Dialect>().map(|d| vec![d]).map_err(E::custom)
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(name) = seq.next_element::<String>()? {
                let dialect = name.parse::<Dialect>().map_err(de::Error::custom)?;
                if !vec.contains(&dialect) {
                    vec.push(dialect);
                }
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(DialectOrVec)
}

/// Diagnostic overrides.
#[derive(Debug, Default, Deserialize)]
pub struct LintConfig {
    /// Codes to promote to errors (e.g. `"W101"`).
    #[serde(default)]
    pub deny: Vec<String>,
    /// Codes to suppress.
    #[serde(default)]
    pub allow: Vec<String>,
}

impl LintConfig {
    /// Parses the `deny` list into diagnostic codes.
    pub fn denied_codes(&self) -> Result<HashSet<DiagnosticCode>, ConfigError> {
        parse_codes(&self.deny)
    }

    /// Parses the `allow` list into diagnostic codes.
    pub fn allowed_codes(&self) -> Result<HashSet<DiagnosticCode>, ConfigError> {
        parse_codes(&self.allow)
    }
}

fn parse_codes(names: &[String]) -> Result<HashSet<DiagnosticCode>, ConfigError> {
    names
        .iter()
        .map(|n| n.parse::<DiagnosticCode>().map_err(ConfigError::ValidationError))
        .collect()
}
