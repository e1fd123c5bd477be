//! Locating the real file behind a recipe member.
//!
//! A recipe lists members relative to the primary root (the vimfiles
//! directory). While developing, a plugin often lives in its own repository
//! elsewhere, so a member that is not under the primary root is looked up, in
//! order, in:
//!
//! 1. the primary root itself,
//! 2. the repository directory already discovered for this archive,
//! 3. `<alternate root>/<repository name>` for each alternate root,
//! 4. an explicit replacement table,
//! 5. the primary path passed through the rewrite rules.
//!
//! The repository discovered in step 3 is memoised for the lifetime of the
//! resolver, which is one pack operation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::probe::{DiskProbe, FileProbe};
use super::rules::RewriteRules;

/// Placeholder for the archive name in a repository name template.
pub const REPO_NAME_PLACEHOLDER: &str = "%s";

/// Where resolution looks for member files. Immutable for a run.
#[derive(Debug, Clone, Default)]
pub struct ResolutionConfig {
    /// Root that recipe members are relative to.
    pub primary_root: PathBuf,

    /// Roots searched, in order, for a repository named after the archive.
    pub alternate_roots: Vec<PathBuf>,

    /// Template for the repository directory name, e.g. `vim-%s`.
    ///
    /// When unset the archive name is used verbatim.
    pub repo_name_template: Option<String>,

    /// Explicit primary-path to real-path replacements.
    pub replacements: HashMap<PathBuf, PathBuf>,

    /// Rules applied to the primary path when nothing else matched.
    pub rewrite_rules: RewriteRules,
}

impl ResolutionConfig {
    /// Create a configuration with only a primary root.
    pub fn new(primary_root: impl Into<PathBuf>) -> Self {
        Self {
            primary_root: primary_root.into(),
            ..Default::default()
        }
    }

    /// Add an alternate root.
    pub fn with_alternate_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.alternate_roots.push(root.into());
        self
    }

    /// Set the repository name template.
    pub fn with_repo_name_template(mut self, template: impl Into<String>) -> Self {
        self.repo_name_template = Some(template.into());
        self
    }

    /// Add an explicit replacement for a primary-root path.
    pub fn with_replacement(mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        self.replacements.insert(from.into(), to.into());
        self
    }

    /// Set the rewrite rules.
    pub fn with_rewrite_rules(mut self, rules: RewriteRules) -> Self {
        self.rewrite_rules = rules;
        self
    }

    /// Path of `member` under the primary root.
    pub fn primary_path(&self, member: &str) -> PathBuf {
        self.primary_root.join(member)
    }

    /// Repository directory name for `archive_name`.
    pub fn repo_dir_name(&self, archive_name: &str) -> String {
        match &self.repo_name_template {
            Some(template) => template.replace(REPO_NAME_PLACEHOLDER, archive_name),
            None => archive_name.to_string(),
        }
    }
}

/// Outcome of the alternate-root search for one archive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RepoMemo {
    /// No search has been made yet.
    #[default]
    Unsearched,
    /// A repository directory was found.
    Found(PathBuf),
    /// Every alternate root was searched without a hit.
    Exhausted,
}

/// Which rule produced a resolved path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Found under the primary root.
    Primary,
    /// Under a repository directory found in an alternate root.
    Repository,
    /// Taken from the replacement table.
    Replacement,
    /// The primary path after rewrite rules; may not exist.
    Rewritten,
}

/// A resolved member path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The path to read.
    pub path: PathBuf,
    /// How the path was obtained.
    pub origin: Origin,
}

impl Resolution {
    /// Whether the path was located on disk (primary root or repository).
    ///
    /// Replacement and rewritten paths are returned unchecked.
    pub fn found(&self) -> bool {
        matches!(self.origin, Origin::Primary | Origin::Repository)
    }
}

/// Resolves the members of one archive.
pub struct PathResolver<'a, P = DiskProbe> {
    config: &'a ResolutionConfig,
    archive_name: String,
    memo: RepoMemo,
    probe: P,
}

impl<'a> PathResolver<'a, DiskProbe> {
    /// Create a resolver for `archive_name` backed by the real filesystem.
    pub fn new(config: &'a ResolutionConfig, archive_name: impl Into<String>) -> Self {
        Self::with_probe(config, archive_name, DiskProbe)
    }
}

impl<'a, P: FileProbe> PathResolver<'a, P> {
    /// Create a resolver using a custom existence probe.
    pub fn with_probe(
        config: &'a ResolutionConfig,
        archive_name: impl Into<String>,
        probe: P,
    ) -> Self {
        Self {
            config,
            archive_name: archive_name.into(),
            memo: RepoMemo::Unsearched,
            probe,
        }
    }

    /// The archive this resolver serves.
    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    /// Current state of the repository memo.
    pub fn memo(&self) -> &RepoMemo {
        &self.memo
    }

    /// The repository directory discovered for this archive, if any.
    pub fn repository(&self) -> Option<&Path> {
        match &self.memo {
            RepoMemo::Found(dir) => Some(dir),
            _ => None,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ResolutionConfig {
        self.config
    }

    /// The probe in use.
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Resolve `member` to the file that should be read for it.
    pub fn resolve(&mut self, member: &str) -> Resolution {
        let primary = self.config.primary_path(member);
        if self.probe.exists(&primary) {
            return Resolution {
                path: primary,
                origin: Origin::Primary,
            };
        }

        if self.memo == RepoMemo::Unsearched {
            self.memo = self.search_repository(member);
        }

        if let RepoMemo::Found(repo) = &self.memo {
            return Resolution {
                path: repo.join(member),
                origin: Origin::Repository,
            };
        }

        if let Some(replacement) = self.config.replacements.get(&primary) {
            debug!(
                member,
                replacement = %replacement.display(),
                "Using explicit replacement"
            );
            return Resolution {
                path: replacement.clone(),
                origin: Origin::Replacement,
            };
        }

        let rewritten = self
            .config
            .rewrite_rules
            .apply(&primary.to_string_lossy());
        debug!(member, path = %rewritten, "Falling back to rewritten path");
        Resolution {
            path: PathBuf::from(rewritten),
            origin: Origin::Rewritten,
        }
    }

    /// Probe each alternate root for a repository holding `member`.
    fn search_repository(&self, member: &str) -> RepoMemo {
        let repo_name = self.config.repo_dir_name(&self.archive_name);

        for root in &self.config.alternate_roots {
            let repo = root.join(&repo_name);
            let candidate = repo.join(member);
            debug!(candidate = %candidate.display(), "Probing alternate root");
            if self.probe.exists(&candidate) {
                debug!(
                    archive = %self.archive_name,
                    repo = %repo.display(),
                    "Found repository"
                );
                return RepoMemo::Found(repo);
            }
        }

        debug!(archive = %self.archive_name, "No repository in alternate roots");
        RepoMemo::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    /// Disk probe that counts calls.
    #[derive(Default)]
    struct CountingProbe {
        calls: Cell<usize>,
    }

    impl FileProbe for CountingProbe {
        fn exists(&self, path: &Path) -> bool {
            self.calls.set(self.calls.get() + 1);
            path.exists()
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "\" test\n").unwrap();
    }

    struct Fixture {
        _temp: TempDir,
        primary: PathBuf,
        alt1: PathBuf,
        alt2: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let primary = temp.path().join("vimfiles");
        let alt1 = temp.path().join("src1");
        let alt2 = temp.path().join("src2");
        for dir in [&primary, &alt1, &alt2] {
            fs::create_dir_all(dir).unwrap();
        }
        Fixture {
            _temp: temp,
            primary,
            alt1,
            alt2,
        }
    }

    fn config(fx: &Fixture) -> ResolutionConfig {
        ResolutionConfig::new(&fx.primary)
            .with_alternate_root(&fx.alt1)
            .with_alternate_root(&fx.alt2)
    }

    #[test]
    fn test_primary_root_wins_over_alternates() {
        let fx = fixture();
        touch(&fx.primary.join("plugin/foo.vim"));
        touch(&fx.alt1.join("foo/plugin/foo.vim"));

        let config = config(&fx);
        let mut resolver = PathResolver::new(&config, "foo");
        let res = resolver.resolve("plugin/foo.vim");

        assert_eq!(res.origin, Origin::Primary);
        assert_eq!(res.path, fx.primary.join("plugin/foo.vim"));
        assert!(res.found());
        assert_eq!(resolver.memo(), &RepoMemo::Unsearched);
    }

    #[test]
    fn test_first_alternate_root_hit_is_memoised() {
        let fx = fixture();
        touch(&fx.alt2.join("foo/plugin/foo.vim"));
        touch(&fx.alt2.join("foo/doc/foo.txt"));

        let config = config(&fx);
        let mut resolver = PathResolver::with_probe(&config, "foo", CountingProbe::default());

        let res = resolver.resolve("plugin/foo.vim");
        assert_eq!(res.origin, Origin::Repository);
        assert_eq!(res.path, fx.alt2.join("foo/plugin/foo.vim"));
        assert_eq!(resolver.repository(), Some(fx.alt2.join("foo").as_path()));
        // primary + alt1 + alt2
        assert_eq!(resolver.probe().calls.get(), 3);

        let res = resolver.resolve("doc/foo.txt");
        assert_eq!(res.path, fx.alt2.join("foo/doc/foo.txt"));
        // primary only; the repository is not re-probed
        assert_eq!(resolver.probe().calls.get(), 4);
    }

    #[test]
    fn test_memoised_repository_returned_without_probing_member() {
        let fx = fixture();
        touch(&fx.alt1.join("foo/plugin/foo.vim"));

        let config = config(&fx);
        let mut resolver = PathResolver::new(&config, "foo");
        resolver.resolve("plugin/foo.vim");

        let res = resolver.resolve("autoload/missing.vim");
        assert_eq!(res.origin, Origin::Repository);
        assert_eq!(res.path, fx.alt1.join("foo/autoload/missing.vim"));
        assert!(!res.path.exists());
    }

    #[test]
    fn test_exhausted_search_is_not_repeated() {
        let fx = fixture();
        let config = config(&fx);
        let mut resolver = PathResolver::with_probe(&config, "foo", CountingProbe::default());

        let res = resolver.resolve("plugin/foo.vim");
        assert_eq!(res.origin, Origin::Rewritten);
        assert!(!res.found());
        assert_eq!(resolver.memo(), &RepoMemo::Exhausted);
        assert_eq!(resolver.probe().calls.get(), 3);

        resolver.resolve("doc/foo.txt");
        // Only the primary root is probed the second time.
        assert_eq!(resolver.probe().calls.get(), 4);
    }

    #[test]
    fn test_repo_name_template() {
        let fx = fixture();
        touch(&fx.alt1.join("vim-foo/plugin/foo.vim"));

        let config = config(&fx).with_repo_name_template("vim-%s");
        assert_eq!(config.repo_dir_name("foo"), "vim-foo");

        let mut resolver = PathResolver::new(&config, "foo");
        let res = resolver.resolve("plugin/foo.vim");
        assert_eq!(res.path, fx.alt1.join("vim-foo/plugin/foo.vim"));
    }

    #[test]
    fn test_explicit_replacement_is_verbatim() {
        let fx = fixture();
        let primary = fx.primary.join("plugin/foo.vim");
        let config = config(&fx)
            .with_replacement(&primary, "/elsewhere/foo.vim")
            .with_rewrite_rules(RewriteRules::from_pairs([("foo", "bar")]).unwrap());

        let mut resolver = PathResolver::new(&config, "foo");
        let res = resolver.resolve("plugin/foo.vim");
        assert_eq!(res.origin, Origin::Replacement);
        assert_eq!(res.path, PathBuf::from("/elsewhere/foo.vim"));
    }

    #[test]
    fn test_rewrite_rules_applied_to_primary_path() {
        let fx = fixture();
        let primary_str = fx.primary.to_string_lossy().to_string();
        let rules = RewriteRules::from_pairs([
            (regex::escape(&primary_str), "/checkout".to_string()),
            ("plugin".to_string(), "autoload".to_string()),
        ])
        .unwrap();
        let config = config(&fx).with_rewrite_rules(rules);

        let mut resolver = PathResolver::new(&config, "foo");
        let res = resolver.resolve("plugin/foo.vim");
        assert_eq!(res.origin, Origin::Rewritten);
        assert_eq!(res.path, PathBuf::from("/checkout/autoload/foo.vim"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let fx = fixture();
        touch(&fx.alt1.join("foo/plugin/foo.vim"));
        let config = config(&fx);

        let first = PathResolver::new(&config, "foo").resolve("plugin/foo.vim");
        let mut resolver = PathResolver::new(&config, "foo");
        resolver.resolve("plugin/foo.vim");
        let second = resolver.resolve("plugin/foo.vim");
        assert_eq!(first, second);
    }

    #[test]
    fn test_separate_archives_do_not_share_memo() {
        let fx = fixture();
        touch(&fx.alt1.join("foo/plugin/foo.vim"));
        touch(&fx.alt1.join("bar/plugin/bar.vim"));
        let config = config(&fx);

        let mut foo = PathResolver::new(&config, "foo");
        let mut bar = PathResolver::new(&config, "bar");
        assert_eq!(
            foo.resolve("plugin/foo.vim").path,
            fx.alt1.join("foo/plugin/foo.vim")
        );
        assert_eq!(
            bar.resolve("plugin/bar.vim").path,
            fx.alt1.join("bar/plugin/bar.vim")
        );
    }
}
