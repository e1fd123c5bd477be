//! The INI configuration file.
//!
//! ```ini
//! [vimball]
//! outdir = /home/me/.vim/vimballs
//! compress = true
//! roots = /src/vim:/src/other
//! repo_fmt = vim-%s
//!
//! [replacements]
//! foo = /home/me/.vim/plugin/foo.vim -> /src/foo/plugin/foo.vim
//!
//! [gsub]
//! common = ^/home/me/.vim/ -> /src/common/
//!
//! [rewrite]
//! after = ^after/ -> plugin/
//! ```
//!
//! Every setting is optional; unset values fall back to the defaults of
//! [`VimballConfig`](super::VimballConfig).

use std::env;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption, Properties};
use thiserror::Error;

/// Main settings section.
pub const MAIN_SECTION: &str = "vimball";
/// Explicit path replacements used by member resolution.
pub const REPLACEMENTS_SECTION: &str = "replacements";
/// Rewrite rules applied to unresolved member paths.
pub const GSUB_SECTION: &str = "gsub";
/// Rewrite rules applied to member names written into the archive.
pub const REWRITE_SECTION: &str = "rewrite";

/// Separator between the two halves of a rule or replacement value.
pub const RULE_ARROW: &str = "->";

/// Errors that can occur while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A value has the wrong shape.
    #[error("invalid value for {section}.{key}: '{value}' ({reason})")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Raw settings as they appear in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// Where the settings were loaded from, if a file existed.
    pub source: Option<PathBuf>,

    pub vimfiles: Option<PathBuf>,
    pub installdir: Option<PathBuf>,
    pub outdir: Option<PathBuf>,
    pub compress: Option<bool>,
    pub update: Option<bool>,
    pub dry_run: Option<bool>,
    pub record: Option<bool>,
    pub repo: Option<bool>,
    pub repodir: Option<String>,
    pub save_recipes: Option<bool>,
    /// Helptags command template; an empty value disables it.
    pub helptags: Option<String>,
    pub roots: Vec<PathBuf>,
    pub repo_fmt: Option<String>,

    /// `(primary path, real path)` pairs.
    pub replacements: Vec<(PathBuf, PathBuf)>,
    /// `(pattern, replacement)` resolver rules in file order.
    pub gsub: Vec<(String, String)>,
    /// `(pattern, replacement)` member-name rules in file order.
    pub rewrite: Vec<(String, String)>,
}

impl ConfigFile {
    /// Load settings from `path`.
    ///
    /// A missing file is not an error and yields empty settings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file_opt(path, parse_options()).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        let mut file = Self::from_ini(&ini)?;
        file.source = Some(path.to_path_buf());
        Ok(file)
    }

    /// Parse settings from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str_opt(text, parse_options()).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut file = Self::default();

        if let Some(main) = ini.section(Some(MAIN_SECTION)) {
            file.vimfiles = main.get("vimfiles").map(PathBuf::from);
            file.installdir = main.get("installdir").map(PathBuf::from);
            file.outdir = main.get("outdir").map(PathBuf::from);
            file.compress = get_bool(main, "compress")?;
            file.update = get_bool(main, "update")?;
            file.dry_run = get_bool(main, "dry_run")?;
            file.record = get_bool(main, "record")?;
            file.repo = get_bool(main, "repo")?;
            file.repodir = main.get("repodir").map(str::to_string);
            file.save_recipes = get_bool(main, "save_recipes")?;
            file.helptags = main.get("helptags").map(str::to_string);
            file.roots = main
                .get("roots")
                .map(|v| env::split_paths(v).filter(|p| !p.as_os_str().is_empty()).collect())
                .unwrap_or_default();
            file.repo_fmt = main.get("repo_fmt").map(str::to_string);
        }

        file.replacements = get_pairs(ini, REPLACEMENTS_SECTION)?
            .into_iter()
            .map(|(from, to)| (PathBuf::from(from), PathBuf::from(to)))
            .collect();
        file.gsub = get_pairs(ini, GSUB_SECTION)?;
        file.rewrite = get_pairs(ini, REWRITE_SECTION)?;

        Ok(file)
    }
}

/// Quote and escape processing would mangle regex backslashes.
fn parse_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    }
}

fn get_bool(section: &Properties, key: &str) -> Result<Option<bool>, ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(Some(true)),
        "false" | "no" | "off" | "0" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidValue {
            section: MAIN_SECTION.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

/// Read `<label> = <left> -> <right>` entries of a section in file order.
fn get_pairs(ini: &Ini, name: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let Some(section) = ini.section(Some(name)) else {
        return Ok(Vec::new());
    };

    section
        .iter()
        .map(|(label, value)| {
            value
                .split_once(RULE_ARROW)
                .map(|(left, right)| (left.trim().to_string(), right.trim().to_string()))
                .filter(|(left, _)| !left.is_empty())
                .ok_or_else(|| ConfigError::InvalidValue {
                    section: name.to_string(),
                    key: label.to_string(),
                    value: value.to_string(),
                    reason: format!("expected '<from> {} <to>'", RULE_ARROW),
                })
        })
        .collect()
}
