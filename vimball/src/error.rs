//! Error types for vimball operations.

use std::io;
use std::path::PathBuf;

use crate::archive::DecodeError;
use crate::config::ConfigError;

/// Result type for vimball operations.
pub type VimballResult<T> = Result<T, VimballError>;

/// Errors that can occur while packing or installing vimballs.
#[derive(Debug)]
pub enum VimballError {
    /// Failed to read a file or directory.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// The archive at `path` could not be decoded.
    Decode { path: PathBuf, source: DecodeError },

    /// A recipe member could not be located on disk.
    MissingSource { recipe: PathBuf, path: PathBuf },

    /// An archive member would be written outside the install directory.
    UnsafeEntryPath { archive: PathBuf, entry: String },

    /// A rewrite rule pattern is not a valid regular expression.
    InvalidRewriteRule { pattern: String, source: regex::Error },

    /// Configuration could not be loaded.
    Config(ConfigError),

    /// An external command exited unsuccessfully.
    CommandFailed { command: String, reason: String },
}

impl std::fmt::Display for VimballError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::Decode { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            Self::MissingSource { recipe, path } => {
                write!(
                    f,
                    "file does not exist: {} (recipe {})",
                    path.display(),
                    recipe.display()
                )
            }
            Self::UnsafeEntryPath { archive, entry } => {
                write!(
                    f,
                    "refusing to install {} from {}: path leaves the install directory",
                    entry,
                    archive.display()
                )
            }
            Self::InvalidRewriteRule { pattern, source } => {
                write!(f, "invalid rewrite pattern '{}': {}", pattern, source)
            }
            Self::Config(e) => write!(f, "configuration error: {}", e),
            Self::CommandFailed { command, reason } => {
                write!(f, "command failed ({}): {}", command, reason)
            }
        }
    }
}

impl std::error::Error for VimballError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } => Some(source),
            Self::WriteFailed { source, .. } => Some(source),
            Self::CreateDirFailed { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::InvalidRewriteRule { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for VimballError {
    fn from(e: ConfigError) -> Self {
        VimballError::Config(e)
    }
}

impl VimballError {
    /// Whether this error came from the archive format itself rather than I/O.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
