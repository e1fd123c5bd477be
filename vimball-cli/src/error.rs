//! CLI error type.

use std::fmt;
use std::path::PathBuf;

use vimball::config::ConfigError;
use vimball::VimballError;

/// Exit status for every fatal condition.
pub const FATAL_EXIT_CODE: i32 = 5;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// The vimfiles directory does not exist.
    NoVimfiles(PathBuf),
    /// No recipe or vimball was given.
    NoInputFiles,
    /// The single argument is neither a command nor a vimball.
    UnknownCommand(String),
    /// Configuration could not be loaded or applied.
    Config(String),
    /// No version number was found for a plugin.
    VersionNotFound(String),
    /// No vim.org script id was found for a plugin.
    ScriptIdNotFound(String),
    /// A library operation failed.
    Vimball(VimballError),
    /// Some inputs of a batch failed; the rest were processed.
    BatchFailed {
        command: &'static str,
        failed: usize,
        total: usize,
    },
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        FATAL_EXIT_CODE
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NoVimfiles(dir) => write!(
                f,
                "Where are your vimfiles? {} is not a directory. \
                 Use --vimfiles or set vimfiles in the config file.",
                dir.display()
            ),
            CliError::NoInputFiles => write!(f, "No input files"),
            CliError::UnknownCommand(arg) => write!(
                f,
                "Unknown command '{}'. Command must be one of: vba, install, list",
                arg
            ),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::VersionNotFound(name) => {
                write!(f, "Cannot find version number for {}", name)
            }
            CliError::ScriptIdNotFound(name) => write!(f, "No script id found for {}", name),
            CliError::Vimball(e) => write!(f, "{}", e),
            CliError::BatchFailed {
                command,
                failed,
                total,
            } => write!(f, "{}: {} of {} inputs failed", command, failed, total),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Vimball(e) => Some(e),
            _ => None,
        }
    }
}

impl From<VimballError> for CliError {
    fn from(e: VimballError) -> Self {
        CliError::Vimball(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
