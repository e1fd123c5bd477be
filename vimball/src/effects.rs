//! Filesystem side effects with dry-run support.
//!
//! Every mutation made by the packer and installer goes through [`Effects`].
//! In dry-run mode nothing is touched; each action is logged and journaled
//! exactly as a real run would log it. Directories and files "created" during
//! a dry run are remembered so that later checks (does this directory exist?
//! is this an overwrite?) answer the way they would after a real run.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::error::{VimballError, VimballResult};

/// A mutating action, performed or planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A directory was created.
    CreateDir(PathBuf),
    /// A file was written (created or truncated).
    WriteFile(PathBuf),
    /// A line was appended to a file.
    AppendFile(PathBuf),
    /// A shell command was run.
    RunCommand(String),
}

/// Performs (or, in dry-run mode, only logs) filesystem mutations.
#[derive(Debug, Default)]
pub struct Effects {
    dry_run: bool,
    created: HashSet<PathBuf>,
    journal: Vec<Action>,
}

impl Effects {
    /// Create an effects handle.
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Whether mutations are suppressed.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Every action taken so far, in order.
    pub fn actions(&self) -> &[Action] {
        &self.journal
    }

    /// Whether `path` exists, counting paths created earlier in a dry run.
    pub fn exists(&self, path: &Path) -> bool {
        self.created.contains(path) || path.exists()
    }

    /// Make sure `dir` exists, creating each missing segment from the
    /// outermost one down to `dir` itself.
    ///
    /// A segment that appears concurrently ("already exists") counts as
    /// success. Returns the directories that were created, outermost first.
    pub fn ensure_dir(&mut self, dir: &Path) -> VimballResult<Vec<PathBuf>> {
        if dir.as_os_str().is_empty() || dir == Path::new(".") {
            return Ok(Vec::new());
        }

        let mut missing: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|d| !d.as_os_str().is_empty() && !self.exists(d))
            .map(Path::to_path_buf)
            .collect();
        missing.reverse();

        for segment in &missing {
            info!(dir = %segment.display(), "mkdir");
            if !self.dry_run {
                match fs::create_dir(segment) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                    Err(e) => {
                        return Err(VimballError::CreateDirFailed {
                            path: segment.clone(),
                            source: e,
                        })
                    }
                }
            }
            self.created.insert(segment.clone());
            self.journal.push(Action::CreateDir(segment.clone()));
        }

        Ok(missing)
    }

    /// Write `contents` to `path`, replacing any existing file.
    pub fn write_file(&mut self, path: &Path, contents: &[u8]) -> VimballResult<()> {
        info!(path = %path.display(), "Write file");
        if self.exists(path) {
            warn!(path = %path.display(), "Overwrite existing file");
        }

        if !self.dry_run {
            fs::write(path, contents).map_err(|e| VimballError::WriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        self.created.insert(path.to_path_buf());
        self.journal.push(Action::WriteFile(path.to_path_buf()));
        Ok(())
    }

    /// Append `line` plus a newline to `path`, creating the file if needed.
    pub fn append_line(&mut self, path: &Path, line: &str) -> VimballResult<()> {
        info!(path = %path.display(), "Append to file");

        if !self.dry_run {
            let write_err = |e: io::Error| VimballError::WriteFailed {
                path: path.to_path_buf(),
                source: e,
            };
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(write_err)?;
            writeln!(file, "{}", line).map_err(write_err)?;
        }

        self.created.insert(path.to_path_buf());
        self.journal.push(Action::AppendFile(path.to_path_buf()));
        Ok(())
    }

    /// Run `command` through the platform shell.
    pub fn run_command(&mut self, command: &str) -> VimballResult<()> {
        info!(command, "Run command");
        self.journal.push(Action::RunCommand(command.to_string()));

        if self.dry_run {
            return Ok(());
        }

        let output = shell(command)
            .output()
            .map_err(|e| VimballError::CommandFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VimballError::CommandFailed {
                command: command.to_string(),
                reason: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        Ok(())
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

#[cfg(not(unix))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_each_segment_outermost_first() {
        let temp = TempDir::new().unwrap();
        let leaf = temp.path().join("a/b/c");
        let mut effects = Effects::new(false);

        let created = effects.ensure_dir(&leaf).unwrap();
        assert_eq!(
            created,
            vec![
                temp.path().join("a"),
                temp.path().join("a/b"),
                temp.path().join("a/b/c"),
            ]
        );
        assert!(leaf.is_dir());

        // Second call is a no-op.
        assert!(effects.ensure_dir(&leaf).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_dir_trivial_paths() {
        let mut effects = Effects::new(false);
        assert!(effects.ensure_dir(Path::new("")).unwrap().is_empty());
        assert!(effects.ensure_dir(Path::new(".")).unwrap().is_empty());
        assert!(effects.actions().is_empty());
    }

    #[test]
    fn test_ensure_dir_through_a_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain");
        fs::write(&file, "x").unwrap();

        let mut effects = Effects::new(false);
        let err = effects.ensure_dir(&file.join("sub")).unwrap_err();
        assert!(matches!(err, VimballError::CreateDirFailed { .. }));
    }

    #[test]
    fn test_dry_run_touches_nothing_but_journals_the_same() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("plugin");
        let file = dir.join("foo.vim");

        let mut dry = Effects::new(true);
        dry.ensure_dir(&dir).unwrap();
        dry.write_file(&file, b"x\n").unwrap();
        // Directory is remembered as created.
        assert!(dry.ensure_dir(&dir).unwrap().is_empty());
        assert!(!dir.exists());

        let mut live = Effects::new(false);
        live.ensure_dir(&dir).unwrap();
        live.write_file(&file, b"x\n").unwrap();
        assert!(live.ensure_dir(&dir).unwrap().is_empty());
        assert_eq!(fs::read(&file).unwrap(), b"x\n");

        assert_eq!(dry.actions(), live.actions());
    }

    #[test]
    fn test_append_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".VimballRecord");
        let mut effects = Effects::new(false);

        effects.append_line(&path, "one").unwrap();
        effects.append_line(&path, "two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_reports_failure() {
        let mut effects = Effects::new(false);
        effects.run_command("true").unwrap();
        let err = effects.run_command("exit 3").unwrap_err();
        assert!(matches!(err, VimballError::CommandFailed { .. }));
    }

    #[test]
    fn test_dry_run_command_not_executed() {
        let mut effects = Effects::new(true);
        effects
            .run_command("definitely-not-a-real-command --flag")
            .unwrap();
        assert_eq!(
            effects.actions(),
            &[Action::RunCommand(
                "definitely-not-a-real-command --flag".to_string()
            )]
        );
    }
}
