//! Configuration assembly and helpers shared across CLI commands.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use vimball::config::{default_config_path, detect_vimfiles, ConfigFile, VimballConfig};
use vimball::BatchReport;

use crate::error::CliError;

/// Settings given on the command line. `None` and `false` leave the
/// configuration file value in place; `Some(false)` comes from a `--no-*` flag.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub vimfiles: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub outdir: Option<PathBuf>,
    pub dry_run: Option<bool>,
    pub no_helptags: bool,
    pub record: Option<bool>,
    pub save_recipes: Option<bool>,
    pub repo: Option<bool>,
    pub update: Option<bool>,
    pub compress: Option<bool>,
}

/// Resolved configuration plus where it came from.
#[derive(Debug)]
pub struct Settings {
    pub config: VimballConfig,
    pub config_path: PathBuf,
    pub config_loaded: bool,
}

impl Settings {
    /// Fail unless the vimfiles directory exists.
    pub fn require_vimfiles(&self) -> Result<(), CliError> {
        if self.config.vimfiles.is_dir() {
            Ok(())
        } else {
            Err(CliError::NoVimfiles(self.config.vimfiles.clone()))
        }
    }
}

/// Build the run configuration: CLI > config file > defaults.
pub fn load_settings(overrides: &ConfigOverrides) -> Result<Settings, CliError> {
    let detected = overrides.vimfiles.clone().or_else(detect_vimfiles);

    let config_path = match (&overrides.config, &detected) {
        (Some(path), _) => path.clone(),
        (None, Some(vimfiles)) => default_config_path(vimfiles),
        (None, None) => default_config_path(Path::new(".")),
    };
    debug!(path = %config_path.display(), "Reading configuration");
    let file = ConfigFile::load(&config_path)?;

    let vimfiles = overrides
        .vimfiles
        .clone()
        .or_else(|| file.vimfiles.clone())
        .or(detected)
        .unwrap_or_else(|| {
            warn!("Couldn't find your vimfiles directory");
            warn!("Please use the -b command-line option, or set it in your config file");
            PathBuf::from(".")
        });

    let config = VimballConfig::from_config_file(&file, vimfiles)?;
    Ok(Settings {
        config: apply_overrides(config, overrides),
        config_loaded: file.source.is_some(),
        config_path,
    })
}

/// Apply command-line settings on top of `config`.
pub fn apply_overrides(mut config: VimballConfig, overrides: &ConfigOverrides) -> VimballConfig {
    if let Some(dir) = &overrides.outdir {
        config = config.with_outdir(dir);
    }
    if let Some(record) = overrides.record {
        config = config.with_record(record);
    }
    if overrides.no_helptags {
        config = config.with_helptags(None);
    }
    if let Some(dry_run) = overrides.dry_run {
        config = config.with_dry_run(dry_run);
    }
    if let Some(save) = overrides.save_recipes {
        config = config.with_save_recipes(save);
    }
    if let Some(repo) = overrides.repo {
        config = config.with_repo_mode(repo);
    }
    if let Some(update) = overrides.update {
        config = config.with_incremental(update);
    }
    if let Some(compress) = overrides.compress {
        config = config.with_compress(compress);
    }
    config
}

/// Turn a batch report into the command result.
pub fn check_report<T>(command: &'static str, report: &BatchReport<T>) -> Result<(), CliError> {
    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::BatchFailed {
            command,
            failed: report.failed.len(),
            total: report.len(),
        })
    }
}
