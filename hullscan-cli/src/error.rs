//! CLI-specific error types and exit code mapping

use hullscan_core::error::HullscanError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Invalid invocation (missing target, stdin is a terminal, bad flag value).
    /// Reported before the scan pipeline is entered.
    #[error("{0}")]
    Usage(String),

    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// The scan completed and found vulnerabilities.
    #[error("{0}")]
    VulnerabilitiesFound(String),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from the scan pipeline.
    #[error("{0}")]
    Core(#[from] HullscanError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                               |
    /// |------|---------------------------------------|
    /// | 0    | Success                               |
    /// | 1    | Scan / report error                   |
    /// | 2    | Configuration error                   |
    /// | 4    | Scan found vulnerabilities            |
    /// | 10   | IO error                              |
    /// | 64   | Usage error (EX_USAGE)                |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 64,
            Self::Config(_) => 2,
            Self::VulnerabilitiesFound(_) => 4,
            Self::Io(_) => 10,
            Self::Core(_) => 1,
        }
    }
}
