use std::fmt::Write;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tracing::debug;

use pymeta_build::BuildFrontend;
use pymeta_distribution::read_metadata;
use pymeta_metadata::MetadataRecord;

use crate::commands::ExitStatus;
use crate::printer::Printer;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// RFC 822 style `Field: value` lines, as in the `METADATA` file.
    #[default]
    Text,
    /// A JSON object mapping each field to the list of its values.
    Json,
}

/// Print the metadata of a wheel or source distribution.
pub(crate) fn metadata(
    path: &Path,
    python: Option<PathBuf>,
    requires_dist: bool,
    output_format: OutputFormat,
    printer: Printer,
) -> Result<ExitStatus> {
    let record = read(path, python, printer)
        .with_context(|| format!("Failed to read metadata from `{}`", path.display()))?;
    debug!("Read {} metadata fields", record.len());

    let mut stdout = printer.stdout();
    match (output_format, requires_dist) {
        (OutputFormat::Text, false) => write!(stdout, "{record}")?,
        (OutputFormat::Text, true) => {
            for requirement in record.requires_dist() {
                writeln!(stdout, "{requirement}")?;
            }
        }
        (OutputFormat::Json, false) => {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&record)?)?;
        }
        (OutputFormat::Json, true) => {
            writeln!(
                stdout,
                "{}",
                serde_json::to_string_pretty(record.requires_dist())?
            )?;
        }
    }

    Ok(ExitStatus::Success)
}

fn read(path: &Path, python: Option<PathBuf>, printer: Printer) -> Result<MetadataRecord> {
    Ok(read_metadata(path, || {
        let frontend = BuildFrontend::find(python)?;
        writeln!(
            printer.stderr(),
            "{} {} {}",
            "Building".bold().green(),
            path.display(),
            format!("with {}", frontend.python().display()).dimmed()
        )
        .map_err(io::Error::other)?;
        Ok(frontend)
    })?)
}
