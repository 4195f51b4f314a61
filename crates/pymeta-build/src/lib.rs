//! Build wheels from source trees by running the `build` frontend in a subprocess.
//!
//! <https://build.pypa.io/en/stable/>

use std::env;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use pymeta_static::EnvVars;

/// e.g. `pygraphviz/graphviz_wrap.c:3020:10: fatal error: graphviz/cgraph.h: No such file or directory`
static MISSING_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r".*\.(c|c..|h|h..):\d+:\d+: fatal error: (?<header>.*\.(h|h..)): No such file or directory",
    )
    .unwrap()
});

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Failed to find a Python interpreter (tried `python3` and `python`)")]
    PythonNotFound(#[source] which::Error),
    #[error("Failed to run {0}")]
    CommandFailed(PathBuf, #[source] io::Error),
    #[error("{message} ({exit_status}):\n--- stdout:\n{stdout}\n--- stderr:\n{stderr}\n---")]
    BuildBackend {
        message: String,
        exit_status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    /// Nudge the user towards installing the missing dev library
    #[error("{message} ({exit_status}):\n--- stdout:\n{stdout}\n--- stderr:\n{stderr}\n---")]
    MissingHeader {
        message: String,
        exit_status: ExitStatus,
        stdout: String,
        stderr: String,
        #[source]
        missing_header_cause: MissingHeaderCause,
    },
}

#[derive(Debug, Error)]
pub struct MissingHeaderCause {
    header: String,
    source_tree: String,
}

impl Display for MissingHeaderCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "This error likely indicates that you need to install a library that provides \"{}\" for {}",
            self.header, self.source_tree
        )
    }
}

impl Error {
    fn from_command_output(message: String, output: &Output, source_tree: &str) -> Self {
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        // The compiler error is usually among the last lines, before the build backend's own
        // error summary.
        if let Some(header) = stderr.lines().rev().take(10).find_map(|line| {
            Some(MISSING_HEADER_RE.captures(line.trim())?["header"].to_string())
        }) {
            return Self::MissingHeader {
                message,
                exit_status: output.status,
                stdout,
                stderr,
                missing_header_cause: MissingHeaderCause {
                    header,
                    source_tree: source_tree.to_string(),
                },
            };
        }

        Self::BuildBackend {
            message,
            exit_status: output.status,
            stdout,
            stderr,
        }
    }
}

/// Runs `<python> -m build --wheel` to turn a source tree into a wheel.
///
/// The interpreter must have the `build` package installed. Each call spawns one subprocess and
/// waits for it without a timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFrontend {
    python: PathBuf,
}

impl BuildFrontend {
    /// Use the given Python interpreter.
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// Pick the Python interpreter: the explicit one if given, otherwise `PYMETA_PYTHON`,
    /// otherwise the first of `python3` and `python` on the `PATH`.
    pub fn find(python: Option<PathBuf>) -> Result<Self, Error> {
        if let Some(python) = python {
            return Ok(Self::new(python));
        }

        if let Some(python) = env::var_os(EnvVars::PYMETA_PYTHON).filter(|value| !value.is_empty())
        {
            debug!(
                "Using Python from {}: {}",
                EnvVars::PYMETA_PYTHON,
                Path::new(&python).display()
            );
            return Ok(Self::new(python));
        }

        let python = which::which("python3")
            .or_else(|_| which::which("python"))
            .map_err(Error::PythonNotFound)?;
        debug!("Using Python from `PATH`: {}", python.display());
        Ok(Self::new(python))
    }

    /// The Python interpreter that runs the build frontend.
    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Build a wheel from `source_tree` into `wheel_dir`, returning the path of the wheel.
    ///
    /// The build counts as successful when exactly one `.whl` file ends up in `wheel_dir`. A
    /// non-zero exit status is tolerated (with a warning) if the wheel was produced anyway.
    #[instrument(skip_all, fields(source_tree = %source_tree.display()))]
    pub fn build_wheel(&self, source_tree: &Path, wheel_dir: &Path) -> Result<PathBuf, Error> {
        fs_err::create_dir_all(wheel_dir)?;

        debug!(
            "Running `{} -m build --wheel --outdir {} {}`",
            self.python.display(),
            wheel_dir.display(),
            source_tree.display()
        );
        let output = Command::new(&self.python)
            .args(["-m", "build", "--wheel", "--outdir"])
            .arg(wheel_dir)
            .arg(source_tree)
            .output()
            .map_err(|err| Error::CommandFailed(self.python.clone(), err))?;
        debug!(
            "Build frontend stdout:\n{}",
            String::from_utf8_lossy(&output.stdout).trim_end()
        );
        debug!(
            "Build frontend stderr:\n{}",
            String::from_utf8_lossy(&output.stderr).trim_end()
        );

        let wheels = find_wheels(wheel_dir)?;
        if let [wheel] = wheels.as_slice() {
            if !output.status.success() {
                warn!(
                    "Build frontend exited with {}, but produced {}",
                    output.status,
                    wheel.display()
                );
            }
            return Ok(wheel.clone());
        }

        let source_tree_name = source_tree
            .file_name()
            .unwrap_or(source_tree.as_os_str())
            .to_string_lossy();
        let message = if output.status.success() {
            format!(
                "Build frontend produced {} wheels for `{source_tree_name}`, expected exactly one",
                wheels.len()
            )
        } else {
            format!("Failed building a wheel for `{source_tree_name}`")
        };
        Err(Error::from_command_output(
            message,
            &output,
            &source_tree_name,
        ))
    }
}

/// The `.whl` files directly inside `dir`, sorted by name.
fn find_wheels(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut wheels = Vec::new();
    for entry in fs_err::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("whl"))
        {
            wheels.push(path);
        }
    }
    wheels.sort();
    Ok(wheels)
}
