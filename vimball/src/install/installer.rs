//! Installing and listing vimballs.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::archive::{archive_stem, read_archive_bytes, Archive, RECIPE_EXTENSION};
use crate::batch::BatchReport;
use crate::config::VimballConfig;
use crate::effects::Effects;
use crate::error::{VimballError, VimballResult};
use crate::pack::Recipe;

use super::record::InstallRecord;

/// Placeholder in the helptags command replaced by the `doc` directory.
pub const DOC_PLACEHOLDER: &str = "%s";

/// What an install wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// The archive that was installed.
    pub archive: PathBuf,
    /// Directory the members were written under.
    pub install_root: PathBuf,
    /// Installed files in archive order.
    pub files: Vec<PathBuf>,
}

/// Extracts vimballs according to a [`VimballConfig`].
pub struct Installer<'a> {
    config: &'a VimballConfig,
    effects: Effects,
}

impl<'a> Installer<'a> {
    /// Create an installer.
    pub fn new(config: &'a VimballConfig) -> Self {
        Self {
            config,
            effects: Effects::new(config.dry_run),
        }
    }

    /// Actions performed so far.
    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    /// Install the archive at `path`.
    ///
    /// Every member path is checked before anything is written; an archive
    /// that fails to decode or holds an unsafe path leaves the disk untouched.
    pub fn install(&mut self, path: &Path) -> VimballResult<InstallReport> {
        let archive = load(path)?;
        for entry in archive.entries() {
            check_entry_path(path, &entry.path)?;
        }

        let stem = archive_stem(path).unwrap_or_default();
        let install_root = self.config.install_root_for(&stem);
        warn!(archive = %path.display(), dir = %install_root.display(), "Install");

        let mut files = Vec::with_capacity(archive.entries().len());
        for entry in archive.entries() {
            let file = install_root.join(&entry.path);
            if let Some(dir) = file.parent() {
                self.effects.ensure_dir(dir)?;
            }
            self.effects.write_file(&file, &entry.content())?;
            files.push(file);
        }

        if self.config.save_recipes {
            self.save_recipe(&stem, &archive.recipe())?;
        }

        if self.config.record {
            InstallRecord::new(self.config.record_path()).append(&mut self.effects, &stem, &files)?;
        }

        Ok(InstallReport {
            archive: path.to_path_buf(),
            install_root,
            files,
        })
    }

    /// Member paths of the archive at `path`, in order.
    pub fn list(&self, path: &Path) -> VimballResult<Vec<String>> {
        info!(archive = %path.display(), "List");
        let archive = load(path)?;
        Ok(archive.recipe().into_iter().map(str::to_string).collect())
    }

    /// Install every archive, continuing after failures.
    pub fn install_all<I, P>(&mut self, archives: I) -> BatchReport<InstallReport>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = BatchReport::default();
        for archive in archives {
            let archive = archive.as_ref();
            let result = self.install(archive);
            if let Err(e) = &result {
                error!(archive = %archive.display(), error = %e, "Failed to install vimball");
            }
            report.record(archive.to_path_buf(), result);
        }
        report
    }

    /// List every archive, continuing after failures.
    pub fn list_all<I, P>(&self, archives: I) -> BatchReport<Vec<String>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = BatchReport::default();
        for archive in archives {
            let archive = archive.as_ref();
            let result = self.list(archive);
            if let Err(e) = &result {
                error!(archive = %archive.display(), error = %e, "Failed to list vimball");
            }
            report.record(archive.to_path_buf(), result);
        }
        report
    }

    /// Run the helptags command for `<install_dir>/doc`.
    ///
    /// Returns `false` when no command is configured or the directory does
    /// not exist.
    pub fn post_install(&mut self) -> VimballResult<bool> {
        let Some(template) = self.config.helptags.as_deref() else {
            return Ok(false);
        };

        let doc = self.config.install_dir.join("doc");
        if !self.effects.exists(&doc) {
            debug!(dir = %doc.display(), "No doc directory, skipping helptags");
            return Ok(false);
        }

        let command = template.replace(DOC_PLACEHOLDER, &doc.to_string_lossy());
        info!(command = %command, "Create helptags");
        self.effects.run_command(&command)?;
        Ok(true)
    }

    fn save_recipe(&mut self, stem: &str, members: &[&str]) -> VimballResult<()> {
        let dir = self.config.recipes_dir();
        let file = dir.join(format!("{}.{}", stem, RECIPE_EXTENSION));
        debug!(recipe = %file.display(), "Save recipe file");

        self.effects.ensure_dir(&dir)?;
        self.effects
            .write_file(&file, Recipe::to_text(members).as_bytes())
    }
}

fn load(path: &Path) -> VimballResult<Archive> {
    let bytes = read_archive_bytes(path)?;
    Archive::decode(&bytes).map_err(|e| VimballError::Decode {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Reject member paths that are empty, absolute, or climb out of the
/// install directory.
fn check_entry_path(archive: &Path, entry: &str) -> VimballResult<()> {
    let path = Path::new(entry);
    let contained = path.components().next().is_some()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if contained {
        Ok(())
    } else {
        Err(VimballError::UnsafeEntryPath {
            archive: archive.to_path_buf(),
            entry: entry.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{gzip, Entry, HEADER};
    use crate::effects::Action;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        config: VimballConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let vimfiles = temp.path().join("vim");
            fs::create_dir_all(&vimfiles).unwrap();
            let config = VimballConfig::new(&vimfiles).with_helptags(None);
            Self { temp, config }
        }

        fn vimfiles(&self) -> &Path {
            &self.config.vimfiles
        }

        fn archive(&self, name: &str, entries: Vec<Entry>) -> PathBuf {
            let path = self.temp.path().join(name);
            fs::write(&path, Archive::new(entries).encode()).unwrap();
            path
        }

        fn foo(&self) -> PathBuf {
            self.archive(
                "foo.vba",
                vec![
                    Entry::from_text("plugin/foo.vim", "a\nb\n"),
                    Entry::from_text("doc/foo.txt", "c\n"),
                ],
            )
        }
    }

    #[test]
    fn test_install_writes_members() {
        let fx = Fixture::new();
        let archive = fx.foo();

        let mut installer = Installer::new(&fx.config);
        let report = installer.install(&archive).unwrap();

        assert_eq!(report.install_root, fx.vimfiles());
        assert_eq!(
            report.files,
            vec![
                fx.vimfiles().join("plugin/foo.vim"),
                fx.vimfiles().join("doc/foo.txt"),
            ]
        );
        assert_eq!(
            fs::read_to_string(fx.vimfiles().join("plugin/foo.vim")).unwrap(),
            "a\nb\n"
        );
        assert_eq!(
            fs::read_to_string(fx.vimfiles().join("doc/foo.txt")).unwrap(),
            "c\n"
        );
    }

    #[test]
    fn test_repo_mode_installs_under_archive_name() {
        let fx = Fixture::new();
        let archive = fx.archive("foo.vba", vec![Entry::from_text("plugin/foo.vim", "x\n")]);
        let config = fx.config.clone().with_repo_mode(true).with_record(false);

        let mut installer = Installer::new(&config);
        installer.install(&archive).unwrap();

        assert!(fx.vimfiles().join("bundle/foo/plugin/foo.vim").is_file());
        assert!(!fx.vimfiles().join("plugin").exists());
    }

    #[test]
    fn test_install_appends_record() {
        let fx = Fixture::new();
        let archive = fx.foo();

        let mut installer = Installer::new(&fx.config);
        installer.install(&archive).unwrap();

        let record = fs::read_to_string(fx.config.record_path()).unwrap();
        let expected = format!(
            "foo.vba: call delete(\"{}\")|call delete(\"{}\")\n",
            fx.vimfiles().join("plugin/foo.vim").display(),
            fx.vimfiles().join("doc/foo.txt").display()
        );
        assert_eq!(record, expected);
    }

    #[test]
    fn test_install_saves_recipe() {
        let fx = Fixture::new();
        let archive = fx.foo();
        let config = fx.config.clone().with_save_recipes(true).with_record(false);

        let mut installer = Installer::new(&config);
        installer.install(&archive).unwrap();

        let recipe = fx.vimfiles().join("vimballs/recipes/foo.recipe");
        assert_eq!(
            fs::read_to_string(recipe).unwrap(),
            "plugin/foo.vim\ndoc/foo.txt\n"
        );
    }

    #[test]
    fn test_gzipped_archive_installs() {
        let fx = Fixture::new();
        let plain = Archive::new(vec![Entry::from_text("plugin/z.vim", "z\n")]).encode();
        let path = fx.temp.path().join("z.vba.gz");
        fs::write(&path, gzip(&plain).unwrap()).unwrap();

        let mut installer = Installer::new(&fx.config);
        let report = installer.install(&path).unwrap();
        assert_eq!(report.files, vec![fx.vimfiles().join("plugin/z.vim")]);
        assert!(fs::read_to_string(fx.config.record_path())
            .unwrap()
            .starts_with("z.vba: "));
    }

    #[test]
    fn test_bad_signature_writes_nothing() {
        let fx = Fixture::new();
        let path = fx.temp.path().join("bad.vba");
        fs::write(&path, "not a vimball\nat all\nreally\nplugin/x.vim\t[[[1\n1\nx\n").unwrap();

        let mut installer = Installer::new(&fx.config);
        let err = installer.install(&path).unwrap_err();
        assert!(err.is_format_error());
        assert!(installer.effects().actions().is_empty());
        assert!(!fx.config.record_path().exists());
    }

    #[test]
    fn test_parse_error_writes_nothing() {
        let fx = Fixture::new();
        let path = fx.temp.path().join("trunc.vba");
        fs::write(&path, format!("{}plugin/a.vim\t[[[1\n1\na\nplugin/b.vim\t[[[1\n5\nb\n", HEADER))
            .unwrap();

        let mut installer = Installer::new(&fx.config);
        assert!(matches!(
            installer.install(&path),
            Err(VimballError::Decode { .. })
        ));
        assert!(!fx.vimfiles().join("plugin").exists());
    }

    #[test]
    fn test_unsafe_paths_rejected_before_writing() {
        let fx = Fixture::new();
        for bad in ["../escape.vim", "/etc/passwd", "plugin/../../x.vim"] {
            let archive = fx.archive(
                "evil.vba",
                vec![
                    Entry::from_text("plugin/ok.vim", "ok\n"),
                    Entry::from_text(bad, "x\n"),
                ],
            );

            let mut installer = Installer::new(&fx.config);
            match installer.install(&archive) {
                Err(VimballError::UnsafeEntryPath { entry, .. }) => assert_eq!(entry, bad),
                other => panic!("expected unsafe path error, got {:?}", other),
            }
            assert!(installer.effects().actions().is_empty());
        }
        assert!(!fx.vimfiles().join("plugin").exists());
    }

    #[test]
    fn test_dry_run_matches_live_run() {
        let fx = Fixture::new();
        let archive = fx.foo();

        let dry_config = fx.config.clone().with_dry_run(true);
        let mut dry = Installer::new(&dry_config);
        dry.install(&archive).unwrap();
        assert!(!fx.vimfiles().join("plugin").exists());
        assert!(!fx.config.record_path().exists());

        let mut live = Installer::new(&fx.config);
        live.install(&archive).unwrap();

        assert_eq!(dry.effects().actions(), live.effects().actions());
        assert_eq!(
            live.effects().actions().last(),
            Some(&Action::AppendFile(fx.config.record_path()))
        );
    }

    #[test]
    fn test_list() {
        let fx = Fixture::new();
        let archive = fx.foo();

        let installer = Installer::new(&fx.config);
        assert_eq!(
            installer.list(&archive).unwrap(),
            vec!["plugin/foo.vim", "doc/foo.txt"]
        );
        assert!(installer.effects().actions().is_empty());
    }

    #[test]
    fn test_install_all_continues_after_failure() {
        let fx = Fixture::new();
        let good = fx.foo();
        let missing = fx.temp.path().join("missing.vba");

        let mut installer = Installer::new(&fx.config);
        let report = installer.install_all([&missing, &good]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.succeeded.len(), 1);
        assert!(fx.vimfiles().join("plugin/foo.vim").exists());
    }

    #[test]
    fn test_post_install_without_command_or_doc_dir() {
        let fx = Fixture::new();
        let mut installer = Installer::new(&fx.config);
        assert!(!installer.post_install().unwrap());

        let config = fx.config.clone().with_helptags(Some("true %s".to_string()));
        let mut installer = Installer::new(&config);
        assert!(!installer.post_install().unwrap());
        assert!(installer.effects().actions().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_post_install_runs_helptags_in_doc_dir() {
        let fx = Fixture::new();
        let archive = fx.foo();
        let config = fx
            .config
            .clone()
            .with_helptags(Some("touch %s/tags".to_string()));

        let mut installer = Installer::new(&config);
        installer.install(&archive).unwrap();
        assert!(installer.post_install().unwrap());
        assert!(fx.vimfiles().join("doc/tags").is_file());
    }

    #[test]
    fn test_dry_run_post_install_only_logs() {
        let fx = Fixture::new();
        let archive = fx.foo();
        let config = fx
            .config
            .clone()
            .with_dry_run(true)
            .with_helptags(Some("exit 1 %s".to_string()));

        let mut installer = Installer::new(&config);
        installer.install(&archive).unwrap();
        // The doc directory only exists virtually.
        assert!(installer.post_install().unwrap());
        let doc = fx.vimfiles().join("doc");
        assert_eq!(
            installer.effects().actions().last(),
            Some(&Action::RunCommand(format!("exit 1 {}", doc.display())))
        );
    }

    #[test]
    fn test_check_entry_path() {
        let archive = Path::new("a.vba");
        assert!(check_entry_path(archive, "plugin/a.vim").is_ok());
        assert!(check_entry_path(archive, "./plugin/a.vim").is_ok());
        assert!(check_entry_path(archive, "").is_err());
        assert!(check_entry_path(archive, "..").is_err());
    }
}
