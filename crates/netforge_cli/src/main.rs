//! netforge CLI: turns schematic netlist snapshots into HDL source.
//!
//! Provides `netforge generate` for one-off translation of a snapshot,
//! `netforge check` for structural validation without emitting code, and
//! `netforge build` for generating every configured dialect of a project.

#![warn(missing_docs)]

mod build;
mod check;
mod generate;
mod pipeline;

use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use netforge_config::Dialect;

/// netforge: HDL generation from schematic netlists.
#[derive(Parser, Debug)]
#[command(name = "netforge", version, about = "netforge netlist-to-HDL generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `netforge.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate HDL for a single netlist snapshot.
    Generate(GenerateArgs),

    /// Validate a netlist snapshot and report unconnected signals.
    Check(CheckArgs),

    /// Generate every configured dialect of the current project.
    Build(BuildArgs),
}

/// Arguments for `netforge generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the netlist snapshot (JSON).
    pub netlist: String,

    /// Target dialect.
    #[arg(long, value_enum, default_value_t = HdlDialect::Verilog)]
    pub dialect: HdlDialect,

    /// Name of the generated module/entity. Defaults to the snapshot's file stem.
    #[arg(long)]
    pub top: Option<String>,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Skip the structural validation pass.
    #[arg(long)]
    pub no_validate: bool,
}

/// Arguments for `netforge check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the netlist snapshot (JSON).
    pub netlist: String,

    /// Diagnostic codes to suppress (e.g. `W101`).
    #[arg(long, num_args = 1..)]
    pub allow: Vec<String>,

    /// Diagnostic codes to promote to errors.
    #[arg(long, num_args = 1..)]
    pub deny: Vec<String>,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `netforge build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Generate only this dialect instead of the configured list.
    #[arg(long, value_enum)]
    pub dialect: Option<HdlDialect>,

    /// Override the configured output directory.
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Rewrite every file even when its content is unchanged.
    #[arg(long)]
    pub force: bool,
}

/// Target dialect selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HdlDialect {
    /// Verilog-2005.
    Verilog,
    /// VHDL-2008.
    Vhdl,
}

impl From<HdlDialect> for Dialect {
    fn from(d: HdlDialect) -> Self {
        match d {
            HdlDialect::Verilog => Dialect::Verilog,
            HdlDialect::Vhdl => Dialect::Vhdl,
        }
    }
}

/// Output format for diagnostic reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Color output mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect terminal color support.
    Auto,
    /// Always emit color codes.
    Always,
    /// Never emit color codes.
    Never,
}

/// Global arguments passed to all subcommands.
#[derive(Debug)]
pub struct GlobalArgs {
    /// Suppress all output except errors.
    pub quiet: bool,
    /// Enable verbose output.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Build(ref args) => build::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Rough terminal detection: treats a set `TERM` as a color-capable terminal.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok()
}
