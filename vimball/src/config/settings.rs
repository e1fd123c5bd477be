//! Resolved configuration handed to the packer and installer.

use std::path::{Path, PathBuf};

use crate::error::VimballResult;
use crate::resolve::{ResolutionConfig, RewriteRules};

use super::discovery::VIMBALLS_DIR;
use super::file::ConfigFile;

/// Default helptags command; `%s` is replaced by the `doc` directory.
pub const DEFAULT_HELPTAGS: &str = r#"vim -T dumb -c "helptags %s" -cq"#;

/// Default directory, under the install root, for repository-mode installs.
pub const DEFAULT_REPO_DIR: &str = "bundle";

/// Name of the install record file in the vimfiles directory.
pub const RECORD_FILENAME: &str = ".VimballRecord";

/// Subdirectory of `vimballs` where installed recipes are saved.
pub const RECIPES_DIR: &str = "recipes";

/// Immutable configuration for one run.
///
/// Built once from the configuration file and command-line overrides, then
/// passed by reference to every component.
#[derive(Debug, Clone)]
pub struct VimballConfig {
    /// The user's vimfiles directory; recipe members are relative to it.
    pub vimfiles: PathBuf,

    /// Root that archives are installed into.
    pub install_dir: PathBuf,

    /// Where built vimballs are written.
    pub outdir: PathBuf,

    /// Member lookup settings. `resolution.primary_root` is `vimfiles`.
    pub resolution: ResolutionConfig,

    /// Rules applied to member names as they are written into an archive.
    pub name_rewrites: RewriteRules,

    /// Write `.vba.gz` instead of `.vba`.
    pub compress: bool,

    /// Skip rebuilding archives that are newer than all of their members.
    pub incremental: bool,

    /// Log actions without performing them.
    pub dry_run: bool,

    /// Install each archive under `<install_dir>/<repo_dir>/<name>`.
    pub repo_mode: bool,

    /// Directory used by repository mode.
    pub repo_dir: String,

    /// Append installs to the record file.
    pub record: bool,

    /// Save the member list of installed archives as recipes.
    pub save_recipes: bool,

    /// Command run after installing, if any.
    pub helptags: Option<String>,
}

impl VimballConfig {
    /// Configuration with defaults for the given vimfiles directory.
    pub fn new(vimfiles: impl Into<PathBuf>) -> Self {
        let vimfiles = vimfiles.into();
        Self {
            install_dir: vimfiles.clone(),
            outdir: vimfiles.join(VIMBALLS_DIR),
            resolution: ResolutionConfig::new(vimfiles.clone()),
            name_rewrites: RewriteRules::new(),
            compress: false,
            incremental: false,
            dry_run: false,
            repo_mode: false,
            repo_dir: DEFAULT_REPO_DIR.to_string(),
            record: true,
            save_recipes: false,
            helptags: Some(DEFAULT_HELPTAGS.to_string()),
            vimfiles,
        }
    }

    /// Build configuration from a loaded file.
    ///
    /// # Errors
    ///
    /// Fails if a `[gsub]` or `[rewrite]` pattern is not a valid regex.
    pub fn from_config_file(file: &ConfigFile, vimfiles: impl Into<PathBuf>) -> VimballResult<Self> {
        let mut config = Self::new(vimfiles);

        if let Some(dir) = &file.installdir {
            config.install_dir = dir.clone();
        }
        if let Some(dir) = &file.outdir {
            config.outdir = dir.clone();
        }
        config.compress = file.compress.unwrap_or(config.compress);
        config.incremental = file.update.unwrap_or(config.incremental);
        config.dry_run = file.dry_run.unwrap_or(config.dry_run);
        config.repo_mode = file.repo.unwrap_or(config.repo_mode);
        config.record = file.record.unwrap_or(config.record);
        config.save_recipes = file.save_recipes.unwrap_or(config.save_recipes);
        if let Some(dir) = &file.repodir {
            config.repo_dir = dir.clone();
        }
        if let Some(cmd) = &file.helptags {
            config.helptags = Some(cmd.clone()).filter(|c| !c.trim().is_empty());
        }

        config.resolution.alternate_roots = file.roots.clone();
        config.resolution.repo_name_template = file.repo_fmt.clone();
        config.resolution.replacements = file.replacements.iter().cloned().collect();
        config.resolution.rewrite_rules = RewriteRules::from_pairs(file.gsub.iter().cloned())?;
        config.name_rewrites = RewriteRules::from_pairs(file.rewrite.iter().cloned())?;

        Ok(config)
    }

    /// Set the output directory.
    pub fn with_outdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.outdir = dir.into();
        self
    }

    /// Set the install directory.
    pub fn with_install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_dir = dir.into();
        self
    }

    /// Enable or disable gzip output.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Enable or disable incremental packing.
    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable or disable repository-mode installs.
    pub fn with_repo_mode(mut self, repo_mode: bool) -> Self {
        self.repo_mode = repo_mode;
        self
    }

    /// Set the repository-mode directory.
    pub fn with_repo_dir(mut self, dir: impl Into<String>) -> Self {
        self.repo_dir = dir.into();
        self
    }

    /// Enable or disable the install record.
    pub fn with_record(mut self, record: bool) -> Self {
        self.record = record;
        self
    }

    /// Enable or disable saving recipes on install.
    pub fn with_save_recipes(mut self, save: bool) -> Self {
        self.save_recipes = save;
        self
    }

    /// Set or clear the helptags command.
    pub fn with_helptags(mut self, command: Option<String>) -> Self {
        self.helptags = command;
        self
    }

    /// Replace member lookup settings, keeping `vimfiles` as primary root.
    pub fn with_resolution(mut self, resolution: ResolutionConfig) -> Self {
        self.resolution = ResolutionConfig {
            primary_root: self.vimfiles.clone(),
            ..resolution
        };
        self
    }

    /// Set the member-name rewrite rules.
    pub fn with_name_rewrites(mut self, rules: RewriteRules) -> Self {
        self.name_rewrites = rules;
        self
    }

    /// Path of the install record file.
    pub fn record_path(&self) -> PathBuf {
        self.vimfiles.join(RECORD_FILENAME)
    }

    /// Directory where installed recipes are saved.
    pub fn recipes_dir(&self) -> PathBuf {
        self.install_dir.join(VIMBALLS_DIR).join(RECIPES_DIR)
    }

    /// Directory an archive named `stem` installs into.
    pub fn install_root_for(&self, stem: &str) -> PathBuf {
        if self.repo_mode {
            self.install_dir.join(&self.repo_dir).join(stem)
        } else {
            self.install_dir.clone()
        }
    }

    /// Output path for the archive built from recipe `name`.
    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.outdir
            .join(crate::archive::archive_filename(name, self.compress))
    }

    /// Recipe file for archive `name` in the output directory.
    pub fn recipe_path(&self, name: &str) -> PathBuf {
        self.outdir
            .join(format!("{}.{}", name, crate::archive::RECIPE_EXTENSION))
    }

    /// Key/value listing of the effective settings.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let roots: Vec<String> = self
            .resolution
            .alternate_roots
            .iter()
            .map(|p| show(p))
            .collect();

        vec![
            ("vimfiles", show(&self.vimfiles)),
            ("installdir", show(&self.install_dir)),
            ("outdir", show(&self.outdir)),
            ("compress", self.compress.to_string()),
            ("update", self.incremental.to_string()),
            ("dry_run", self.dry_run.to_string()),
            ("record", self.record.to_string()),
            ("repo", self.repo_mode.to_string()),
            ("repodir", self.repo_dir.clone()),
            ("save_recipes", self.save_recipes.to_string()),
            ("helptags", self.helptags.clone().unwrap_or_default()),
            ("roots", roots.join(", ")),
            (
                "repo_fmt",
                self.resolution.repo_name_template.clone().unwrap_or_default(),
            ),
            (
                "replacements",
                self.resolution.replacements.len().to_string(),
            ),
            ("gsub", self.resolution.rewrite_rules.len().to_string()),
            ("rewrite", self.name_rewrites.len().to_string()),
        ]
    }
}

fn show(path: &Path) -> String {
    path.display().to_string()
}
