//! Kiln CLI: runs incremental-build scenarios against the reference engine.
//!
//! `kiln run` drives every round of a scenario and prints its diagnostics,
//! `kiln diff` lists the file-set changes between rounds without building,
//! and `kiln check` only loads and validates the scenario file.

#![warn(missing_docs)]

mod check;
mod diff;
mod run;
mod scenario;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Kiln: a deterministic harness for incremental builds.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Incremental build scenario harness")]
pub struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every round of a scenario and report diagnostics.
    Run(RunArgs),
    /// Print the files created and deleted by each round.
    Diff(ScenarioArgs),
    /// Load and validate a scenario without building it.
    Check(ScenarioArgs),
}

/// Arguments for `kiln run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scenario file, or a directory containing `kiln.toml`.
    pub scenario: String,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Terminal)]
    pub format: ReportFormat,

    /// Override the scenario's build mode.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Print emitted output files after the last round.
    #[arg(long)]
    pub show_output: bool,
}

/// Arguments for commands that only read the scenario.
#[derive(Parser, Debug)]
pub struct ScenarioArgs {
    /// Scenario file, or a directory containing `kiln.toml`.
    pub scenario: String,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// rustc-style output with source snippets.
    Terminal,
    /// One line per diagnostic: `path(line,col): error TSnnnn: message`.
    Compact,
    /// One JSON object per diagnostic.
    Json,
}

/// Build mode selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// One long-lived watch program fed by change notifications.
    Watch,
    /// A fresh build per round seeded with the previous handle.
    Batch,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from the environment.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether debug logging is on.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };
    let global = GlobalArgs {
        verbose: cli.verbose,
        color,
    };

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Diff(ref args) => diff::run(args),
        Command::Check(ref args) => check::run(args),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr subscriber. `KILN_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("KILN_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_run_default() {
        let cli = Cli::parse_from(["kiln", "run", "scenario.toml"]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(args.scenario, "scenario.toml");
                assert_eq!(args.format, ReportFormat::Terminal);
                assert!(args.mode.is_none());
                assert!(!args.show_output);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_run_with_args() {
        let cli = Cli::parse_from([
            "kiln",
            "run",
            "scenarios/delete",
            "--format",
            "compact",
            "--mode",
            "batch",
            "--show-output",
        ]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(args.format, ReportFormat::Compact);
                assert_eq!(args.mode, Some(ModeArg::Batch));
                assert!(args.show_output);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["kiln", "--verbose", "--color", "never", "diff", "s.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
        assert!(matches!(cli.command, Command::Diff(_)));
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["kiln", "check", "dir"]);
        match cli.command {
            Command::Check(ref args) => assert_eq!(args.scenario, "dir"),
            _ => panic!("expected Check command"),
        }
    }
}
