//! Conformance test helpers for netforge.
//!
//! Provides shared pipeline functions that take a netlist snapshot through
//! the full pipeline (load → validate → generate) and return structured
//! results for assertion in integration tests.

#![warn(missing_docs)]

use std::path::{Path, PathBuf};

use netforge_codegen::CodegenOptions;
use netforge_config::{Dialect, ProjectConfig};
use netforge_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use netforge_netlist::Netlist;

/// Result of running the validate → generate pipeline.
pub struct PipelineResult {
    /// Generated HDL text, or empty when validation failed.
    pub text: String,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// Codes of all emitted diagnostics, rendered as `E101`-style strings.
    pub fn codes(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.code.to_string()).collect()
    }
}

/// Directory holding the JSON snapshots used by the integration tests.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Loads a snapshot from `tests/fixtures/<name>.json`.
pub fn load_fixture(name: &str) -> Netlist {
    let path = fixtures_dir().join(format!("{name}.json"));
    netforge_netlist::load_netlist(&path)
        .unwrap_or_else(|e| panic!("fixture `{name}` failed to load: {e}"))
}

/// Parses a snapshot from inline JSON.
pub fn parse_netlist(json: &str) -> Netlist {
    netforge_netlist::netlist_from_str(json).unwrap()
}

/// Creates a minimal `ProjectConfig` pointing at `netlist`.
pub fn make_config(netlist: &str) -> ProjectConfig {
    let toml_str = format!(
        r#"
[project]
name = "conformance_test"
netlist = "{netlist}"
"#
    );
    toml::from_str(&toml_str).unwrap()
}

/// Creates a `ProjectConfig` with lint deny/allow overrides.
pub fn make_config_with_lint(netlist: &str, deny: &[&str], allow: &[&str]) -> ProjectConfig {
    let deny_list: Vec<String> = deny.iter().map(|s| format!("\"{}\"", s)).collect();
    let allow_list: Vec<String> = allow.iter().map(|s| format!("\"{}\"", s)).collect();
    let toml_str = format!(
        r#"
[project]
name = "conformance_test"
netlist = "{netlist}"

[lint]
deny = [{deny}]
allow = [{allow}]
"#,
        deny = deny_list.join(", "),
        allow = allow_list.join(", "),
    );
    toml::from_str(&toml_str).unwrap()
}

/// Validates and generates `netlist` as a module named `top`.
pub fn full_pipeline(netlist: &Netlist, dialect: Dialect) -> PipelineResult {
    run_pipeline(netlist, dialect, DiagnosticSink::new())
}

/// Like [`full_pipeline`], applying the lint overrides of `config`.
pub fn full_pipeline_with_config(
    netlist: &Netlist,
    dialect: Dialect,
    config: &ProjectConfig,
) -> PipelineResult {
    let sink = DiagnosticSink::with_overrides(
        config.lint.denied_codes().unwrap(),
        config.lint.allowed_codes().unwrap(),
    );
    run_pipeline(netlist, dialect, sink)
}

/// Generates without the validation pass, for snapshots that violate
/// structural preconditions on purpose.
pub fn generate_unchecked(netlist: &Netlist, dialect: Dialect) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let text = netforge_codegen::generate(netlist, "top", dialect, &CodegenOptions::default(), &sink);
    finish(text, &sink)
}

fn run_pipeline(netlist: &Netlist, dialect: Dialect, sink: DiagnosticSink) -> PipelineResult {
    netforge_netlist::validate(netlist, &sink);
    if sink.has_errors() {
        return finish(String::new(), &sink);
    }
    let text = netforge_codegen::generate(netlist, "top", dialect, &CodegenOptions::default(), &sink);
    finish(text, &sink)
}

fn finish(text: String, sink: &DiagnosticSink) -> PipelineResult {
    let diagnostics = sink.take_all();
    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    PipelineResult {
        text,
        has_errors: error_count > 0,
        diagnostics,
        error_count,
        warning_count,
    }
}
