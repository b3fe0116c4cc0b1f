//! `netforge build`: generate every configured dialect of a project.
//!
//! Orchestrates the project pipeline:
//! 1. Find the project root and load `netforge.toml`
//! 2. Read the configured netlist snapshot
//! 3. Validate it (unless `[codegen] validate = false`)
//! 4. Generate each dialect into `output_dir/<top>.<ext>`
//!
//! A file whose current content already hashes to the freshly generated text
//! is left untouched.

use std::path::{Path, PathBuf};

use netforge_codegen::CodegenOptions;
use netforge_common::ContentHash;
use netforge_config::{Dialect, ProjectConfig};
use netforge_diagnostics::DiagnosticSink;

use crate::pipeline::{load_snapshot, make_sink, print_summary, render_diagnostics, resolve_project_root};
use crate::{BuildArgs, GlobalArgs};

/// What happened to one output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file did not exist or differed, and was written.
    Written,
    /// The file already held identical content.
    Unchanged,
}

/// Runs the `netforge build` command.
///
/// Returns exit code 0 on success, 1 on error.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = netforge_config::load_config(&project_dir)?;

    if !global.quiet {
        eprintln!("   Building {}", config.project.name);
    }

    let sink = make_sink(Some(&config.lint), &[], &[])?;
    let netlist_path = project_dir.join(&config.project.netlist);
    let netlist = load_snapshot(&netlist_path, global)?;

    if config.codegen.validate {
        netforge_netlist::validate(&netlist, &sink);
        if sink.has_errors() {
            render_diagnostics(&sink, global.color);
            print_summary(&sink, global);
            return Ok(1);
        }
    }

    let dialects = resolve_dialects(&config, args);
    let output_dir = determine_output_dir(&project_dir, &config, args.output_dir.as_deref());
    std::fs::create_dir_all(&output_dir)?;

    let options = CodegenOptions {
        indent: config.codegen.indent,
        header: config.codegen.header,
    };
    let top = config.project.top_name();

    // Unconnected inputs do not depend on the dialect: report them once.
    let scratch = DiagnosticSink::new();
    let mut outputs = Vec::new();
    for (i, dialect) in dialects.into_iter().enumerate() {
        let report = if i == 0 { &sink } else { &scratch };
        let text = netforge_codegen::generate(&netlist, top, dialect, &options, report);
        let path = output_dir.join(format!("{top}.{}", dialect.extension()));
        outputs.push((path, text));
    }

    render_diagnostics(&sink, global.color);
    if sink.has_errors() {
        print_summary(&sink, global);
        return Ok(1);
    }

    for (path, text) in &outputs {
        let outcome = write_if_changed(path, text, args.force)?;
        if !global.quiet {
            match outcome {
                WriteOutcome::Written => eprintln!(
                    "      Wrote {} ({})",
                    path.display(),
                    ContentHash::of_text(text).short()
                ),
                WriteOutcome::Unchanged => {
                    if global.verbose {
                        eprintln!("  Unchanged {}", path.display());
                    }
                }
            }
        }
    }

    print_summary(&sink, global);
    Ok(0)
}

/// The dialects to generate: the command-line choice, or the configured list.
fn resolve_dialects(config: &ProjectConfig, args: &BuildArgs) -> Vec<Dialect> {
    match args.dialect {
        Some(d) => vec![Dialect::from(d)],
        None => config.codegen.dialects.clone(),
    }
}

/// Determines the output directory.
///
/// Priority: CLI `--output-dir` > `[codegen] output_dir`, both relative to
/// the project root unless absolute.
fn determine_output_dir(
    project_dir: &Path,
    config: &ProjectConfig,
    cli_output_dir: Option<&str>,
) -> PathBuf {
    let dir = cli_output_dir.unwrap_or(&config.codegen.output_dir);
    project_dir.join(dir)
}

/// Writes `text` to `path` unless the file already holds exactly that text.
pub fn write_if_changed(
    path: &Path,
    text: &str,
    force: bool,
) -> Result<WriteOutcome, std::io::Error> {
    if !force && ContentHash::of_file(path) == Some(ContentHash::of_text(text)) {
        return Ok(WriteOutcome::Unchanged);
    }
    std::fs::write(path, text)?;
    Ok(WriteOutcome::Written)
}
