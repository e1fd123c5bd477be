//! Building vimballs from recipes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, error, info, warn};

use crate::archive::{gzip, Archive, Entry};
use crate::batch::BatchReport;
use crate::config::VimballConfig;
use crate::effects::Effects;
use crate::error::{VimballError, VimballResult};
use crate::resolve::PathResolver;

use super::recipe::Recipe;

/// Result of packing one recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackOutcome {
    /// The archive was (re)built.
    Written {
        /// Archive file path.
        target: PathBuf,
        /// Number of members packed.
        members: usize,
    },
    /// Incremental mode found the archive newer than every member.
    UpToDate {
        /// Archive file path.
        target: PathBuf,
    },
}

impl PackOutcome {
    /// The archive path this outcome refers to.
    pub fn target(&self) -> &Path {
        match self {
            Self::Written { target, .. } | Self::UpToDate { target } => target,
        }
    }
}

/// Builds vimballs according to a [`VimballConfig`].
pub struct Packer<'a> {
    config: &'a VimballConfig,
    effects: Effects,
}

impl<'a> Packer<'a> {
    /// Create a packer.
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

    /// Load the recipe at `recipe_path` and pack it.
    pub fn pack(&mut self, recipe_path: &Path) -> VimballResult<PackOutcome> {
        let recipe = Recipe::load(recipe_path)?;
        self.pack_recipe(&recipe)
    }

    /// Pack every recipe, continuing after failures.
    pub fn pack_all<I, P>(&mut self, recipes: I) -> BatchReport<PackOutcome>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = BatchReport::default();
        for recipe in recipes {
            let recipe = recipe.as_ref();
            let result = self.pack(recipe);
            if let Err(e) = &result {
                error!(recipe = %recipe.display(), error = %e, "Failed to build vimball");
            }
            report.record(recipe.to_path_buf(), result);
        }
        report
    }

    /// Pack an already loaded recipe.
    pub fn pack_recipe(&mut self, recipe: &Recipe) -> VimballResult<PackOutcome> {
        let config = self.config;
        let name = recipe.name();
        let target = config.archive_path(name);
        let mut resolver = PathResolver::new(&config.resolution, name);

        if config.incremental && target.exists() {
            if self.is_up_to_date(recipe, &mut resolver, &target)? {
                info!(target = %target.display(), "VBA is up to date");
                return Ok(PackOutcome::UpToDate { target });
            }
        }

        let mut entries = Vec::with_capacity(recipe.members().len());
        for member in recipe.members() {
            let resolution = resolver.resolve(member);
            let path = self.require_source(recipe, resolution.path)?;
            debug!(member = %member, path = %path.display(), "Packing member");

            let content = fs::read(&path).map_err(|e| VimballError::ReadFailed {
                path: path.clone(),
                source: e,
            })?;
            let entry = Entry::from_bytes(self.member_name(member), &content);
            if entry.lines.is_empty() {
                warn!(
                    path = %path.display(),
                    "Empty member; the resulting vimball cannot be installed"
                );
            }
            entries.push(entry);
        }

        if let Some(dir) = target.parent() {
            self.effects.ensure_dir(dir)?;
        }

        let mut bytes = Archive::new(entries).encode();
        if config.compress {
            bytes = gzip(&bytes).map_err(|e| VimballError::WriteFailed {
                path: target.clone(),
                source: e,
            })?;
        }

        warn!(target = %target.display(), "Save as");
        self.effects.write_file(&target, &bytes)?;

        Ok(PackOutcome::Written {
            target,
            members: recipe.members().len(),
        })
    }

    /// Whether the archive at `target` is at least as new as every member.
    fn is_up_to_date(
        &self,
        recipe: &Recipe,
        resolver: &mut PathResolver<'_>,
        target: &Path,
    ) -> VimballResult<bool> {
        let target_mtime = modified(target)?;

        for member in recipe.members() {
            let path = self.require_source(recipe, resolver.resolve(member).path)?;
            if modified(&path)? > target_mtime {
                debug!(path = %path.display(), "Member is newer than vimball");
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn require_source(&self, recipe: &Recipe, path: PathBuf) -> VimballResult<PathBuf> {
        if path.is_file() {
            return Ok(path);
        }
        let recipe = recipe
            .source()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(recipe.name()));
        error!(path = %path.display(), recipe = %recipe.display(), "File does not exist");
        Err(VimballError::MissingSource { recipe, path })
    }

    /// Name stored in the archive: the member relative to the vimfiles
    /// directory with forward slashes, then the name rewrite rules.
    fn member_name(&self, member: &str) -> String {
        let root = &self.config.resolution.primary_root;
        let primary = self.config.resolution.primary_path(member);
        let relative = primary
            .strip_prefix(root)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| member.to_string());
        self.config.name_rewrites.apply(&relative.replace('\\', "/"))
    }
}

fn modified(path: &Path) -> VimballResult<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| VimballError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })
}
