/// Declares all environment variables used throughout `pymeta` and its crates.
pub struct EnvVars;

impl EnvVars {
    /// Equivalent to the `--python` command-line argument. The Python interpreter used to run
    /// the build frontend (`python -m build`) when extracting metadata from a source
    /// distribution.
    pub const PYMETA_PYTHON: &'static str = "PYMETA_PYTHON";

    /// The standard `RUST_LOG` environment variable, used to filter the log output.
    pub const RUST_LOG: &'static str = "RUST_LOG";
}
