//! Shared pipeline helpers for CLI commands.
//!
//! Contains common utilities used by `generate`, `check`, and `build`:
//! project root resolution, snapshot loading, diagnostic sink construction
//! from lint settings, and diagnostic rendering.

use std::path::{Path, PathBuf};

use netforge_config::{LintConfig, ProjectConfig, CONFIG_FILE};
use netforge_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use netforge_netlist::Netlist;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `netforge.toml`.
///
/// Returns the directory containing `netforge.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `netforge.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Loads the project configuration if one applies to this invocation.
///
/// An explicit `--config` must load; without it, a missing `netforge.toml`
/// simply means the command runs with defaults.
pub fn optional_config(
    global: &GlobalArgs,
) -> Result<Option<ProjectConfig>, Box<dyn std::error::Error>> {
    let root = match resolve_project_root(global) {
        Ok(root) => root,
        Err(_) if global.config.is_none() => return Ok(None),
        Err(e) => return Err(e),
    };
    if global.config.is_none() && !root.join(CONFIG_FILE).is_file() {
        return Ok(None);
    }
    Ok(Some(netforge_config::load_config(&root)?))
}

/// Builds a diagnostic sink honoring the configured and command-line lint overrides.
///
/// Command-line flags win: a code in `--allow` is removed from the
/// configured deny list and vice versa.
pub fn make_sink(
    lint: Option<&LintConfig>,
    allow: &[String],
    deny: &[String],
) -> Result<DiagnosticSink, Box<dyn std::error::Error>> {
    let mut merged = LintConfig {
        deny: lint.map(|l| l.deny.clone()).unwrap_or_default(),
        allow: lint.map(|l| l.allow.clone()).unwrap_or_default(),
    };
    for code in deny {
        merged.allow.retain(|c| c != code);
        if !merged.deny.contains(code) {
            merged.deny.push(code.clone());
        }
    }
    for code in allow {
        merged.deny.retain(|c| c != code);
        if !merged.allow.contains(code) {
            merged.allow.push(code.clone());
        }
    }
    Ok(DiagnosticSink::with_overrides(
        merged.denied_codes()?,
        merged.allowed_codes()?,
    ))
}

/// Reads a netlist snapshot, reporting its size in verbose mode.
pub fn load_snapshot(path: &Path, global: &GlobalArgs) -> Result<Netlist, Box<dyn std::error::Error>> {
    let netlist = netforge_netlist::load_netlist(path)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    if global.verbose {
        eprintln!(
            "   Loaded {} ({} nodes, {} edges)",
            path.display(),
            netlist.nodes.len(),
            netlist.edges.len()
        );
    }
    Ok(netlist)
}

/// The module name used when none is given: the snapshot's file stem.
pub fn default_top(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("top")
        .to_string()
}

/// Renders all diagnostics in the sink to stderr.
///
/// Returns the number of diagnostics rendered.
pub fn render_diagnostics(sink: &DiagnosticSink, color: bool) -> usize {
    let diagnostics = sink.diagnostics();
    let renderer = TerminalRenderer::new(color);
    for diag in &diagnostics {
        eprintln!("{}", renderer.render(diag));
    }
    diagnostics.len()
}

/// Prints the error/warning tally unless quiet.
pub fn print_summary(sink: &DiagnosticSink, global: &GlobalArgs) {
    if !global.quiet {
        eprintln!(
            "   Result: {} error(s), {} warning(s)",
            sink.error_count(),
            sink.warning_count()
        );
    }
}
