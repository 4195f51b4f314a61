use std::path::PathBuf;
use std::process::ExitCode;

use anstream::eprintln;
use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;

use pymeta_static::EnvVars;

use crate::commands::{ExitStatus, OutputFormat};
use crate::printer::Printer;

mod commands;
mod logging;
mod printer;

/// Print the core metadata of a Python wheel or source distribution.
///
/// Source distributions are built into a wheel first, with `python -m build`.
#[derive(Parser)]
#[command(name = "pymeta", author, version, about)]
struct Cli {
    /// The wheel (`.whl`) or source distribution (`.tar.gz`) to read.
    path: PathBuf,

    /// Only print the `Requires-Dist` entries, one per line.
    #[arg(long)]
    requires_dist: bool,

    /// The format to print the metadata in.
    #[arg(long, value_enum, default_value_t)]
    output_format: OutputFormat,

    /// The Python interpreter used to build source distributions, which must have the `build`
    /// package installed.
    ///
    /// Defaults to the first `python3` or `python` on the `PATH`.
    #[arg(long, short, env = EnvVars::PYMETA_PYTHON)]
    python: Option<PathBuf>,

    /// Do not print any output.
    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,

    /// Use verbose output.
    #[arg(long, short, conflicts_with = "quiet")]
    verbose: bool,
}

fn inner() -> Result<ExitStatus> {
    let cli = Cli::parse();

    logging::setup_logging(if cli.verbose {
        logging::Level::Verbose
    } else {
        logging::Level::Default
    })?;

    let printer = if cli.quiet {
        Printer::Quiet
    } else if cli.verbose {
        Printer::Verbose
    } else {
        Printer::Default
    };

    commands::metadata(
        &cli.path,
        cli.python,
        cli.requires_dist,
        cli.output_format,
        printer,
    )
}

fn main() -> ExitCode {
    match inner() {
        Ok(code) => code.into(),
        Err(err) => {
            #[allow(clippy::print_stderr)]
            {
                let mut causes = err.chain();
                if let Some(error) = causes.next() {
                    eprintln!("{}: {}", "error".red().bold(), error);
                }
                for err in causes {
                    eprintln!("  {}: {}", "Caused by".red().bold(), err);
                }
            }
            ExitStatus::Error.into()
        }
    }
}
