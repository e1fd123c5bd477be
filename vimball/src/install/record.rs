//! The `.VimballRecord` install log.
//!
//! One line is appended per install:
//!
//! ```text
//! foo.vba: call delete("/home/me/.vim/plugin/foo.vim")|call delete("/home/me/.vim/doc/foo.txt")
//! ```
//!
//! Vim's vimball plugin reads these lines to uninstall an archive.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::archive::VBA_EXTENSION;
use crate::effects::Effects;
use crate::error::VimballResult;

/// The append-only record file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRecord {
    path: PathBuf,
}

impl InstallRecord {
    /// Record stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record line for archive `stem` whose members were installed at `files`.
    pub fn format_line(stem: &str, files: &[PathBuf]) -> String {
        let commands: Vec<String> = files
            .iter()
            .map(|file| format!("call delete({:?})", absolute(file).to_string_lossy()))
            .collect();
        format!("{}.{}: {}", stem, VBA_EXTENSION, commands.join("|"))
    }

    /// Append the line for `stem` through `effects`.
    pub fn append(&self, effects: &mut Effects, stem: &str, files: &[PathBuf]) -> VimballResult<()> {
        debug!(record = %self.path.display(), "Save vimball-record information");
        effects.append_line(&self.path, &Self::format_line(stem, files))
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
