//! `netforge generate`: translate one snapshot into one HDL file.
//!
//! Pipeline:
//!
//! 1. Load `netforge.toml` if one applies (for lint and formatting settings)
//! 2. Read the netlist snapshot
//! 3. Validate its structure, unless `--no-validate`
//! 4. Generate the requested dialect
//! 5. Write to `--output` or stdout

use std::path::Path;

use netforge_codegen::CodegenOptions;
use netforge_config::Dialect;

use crate::pipeline::{
    default_top, load_snapshot, make_sink, optional_config, print_summary, render_diagnostics,
};
use crate::{GenerateArgs, GlobalArgs};

/// Runs the `netforge generate` command.
///
/// Returns exit code 0 on success, 1 if validation or a denied warning
/// produced errors. Nothing is written in the failing case.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = optional_config(global)?;
    let lint = config.as_ref().map(|c| &c.lint);
    let sink = make_sink(lint, &[], &[])?;

    let path = Path::new(&args.netlist);
    let netlist = load_snapshot(path, global)?;

    let top = args.top.clone().unwrap_or_else(|| default_top(path));
    let dialect = Dialect::from(args.dialect);
    let options = config
        .as_ref()
        .map(|c| CodegenOptions {
            indent: c.codegen.indent,
            header: c.codegen.header,
        })
        .unwrap_or_default();

    if !global.quiet {
        eprintln!("   Generating {top} ({dialect}) from {}", path.display());
    }

    let validate = !args.no_validate && config.as_ref().map_or(true, |c| c.codegen.validate);
    if validate {
        netforge_netlist::validate(&netlist, &sink);
        if sink.has_errors() {
            render_diagnostics(&sink, global.color);
            print_summary(&sink, global);
            return Ok(1);
        }
    }

    let text = netforge_codegen::generate(&netlist, &top, dialect, &options, &sink);

    render_diagnostics(&sink, global.color);
    if sink.has_errors() {
        print_summary(&sink, global);
        return Ok(1);
    }

    match args.output {
        Some(ref out) => {
            let out = Path::new(out);
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, &text)?;
            if !global.quiet {
                eprintln!("      Wrote {}", out.display());
            }
        }
        None => print!("{text}"),
    }

    if global.verbose {
        print_summary(&sink, global);
    }
    Ok(0)
}
