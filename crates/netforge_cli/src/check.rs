//! `netforge check`: structural validation without writing any HDL.
//!
//! Runs the validation pass, then a dry generation so unconnected inputs are
//! reported exactly as `generate` would report them. Diagnostics go to
//! stderr as text or to stdout as JSON.

use std::path::Path;

use netforge_codegen::CodegenOptions;
use netforge_config::Dialect;
use netforge_diagnostics::DiagnosticSink;

use crate::pipeline::{load_snapshot, make_sink, optional_config, print_summary, render_diagnostics};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `netforge check` command.
///
/// Returns exit code 0 if no errors, 1 if there are errors.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = optional_config(global)?;
    let sink = make_sink(config.as_ref().map(|c| &c.lint), &args.allow, &args.deny)?;

    let path = Path::new(&args.netlist);
    let netlist = load_snapshot(path, global)?;

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Checking {}", path.display());
    }

    check_netlist(&netlist, &sink);

    match args.format {
        ReportFormat::Text => {
            render_diagnostics(&sink, global.color);
            print_summary(&sink, global);
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&sink.diagnostics())
                .unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }

    if sink.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Validates `netlist` and, when it is structurally sound, reports its
/// unconnected inputs.
///
/// Unconnected-input analysis runs on a discarded generation so it shares
/// one code path with real output.
pub fn check_netlist(netlist: &netforge_netlist::Netlist, sink: &DiagnosticSink) {
    netforge_netlist::validate(netlist, sink);
    if sink.has_errors() {
        return;
    }
    let _ = netforge_codegen::generate(
        netlist,
        "check",
        Dialect::Verilog,
        &CodegenOptions::default(),
        sink,
    );
}
