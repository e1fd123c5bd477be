//! Configuration loading and the resolved run configuration.
//!
//! [`ConfigFile`] mirrors the INI file on disk; [`VimballConfig`] is the
//! immutable value built from it (plus command-line overrides) and passed to
//! the packer and installer.

mod discovery;
mod file;
mod settings;

pub use discovery::{
    config_path_for_host, default_config_path, detect_vimfiles, find_vimfiles, CONFIG_FILENAME,
    VIMBALLS_DIR, VIMFILES_DIR_NAMES, VIMFILES_ENV,
};
pub use file::{
    ConfigError, ConfigFile, GSUB_SECTION, MAIN_SECTION, REPLACEMENTS_SECTION, REWRITE_SECTION,
    RULE_ARROW,
};
pub use settings::{
    VimballConfig, DEFAULT_HELPTAGS, DEFAULT_REPO_DIR, RECIPES_DIR, RECORD_FILENAME,
};
