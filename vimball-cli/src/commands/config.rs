//! Informational options: `--print-config`, `--print-version` and
//! `--print-script-id`.

use vimball::config::VimballConfig;
use vimball::metadata::{recipe_script_id, recipe_version};

use super::common::Settings;
use crate::error::CliError;

/// Print the effective configuration.
pub fn print_config(settings: &Settings) -> Result<(), CliError> {
    let status = if settings.config_loaded {
        ""
    } else {
        " (not found, using defaults)"
    };
    println!(
        "Configuration file: {}{}",
        settings.config_path.display(),
        status
    );
    println!();
    println!("[vimball]");

    for (key, value) in settings.config.describe() {
        if value.is_empty() {
            println!("  {} = (not set)", key);
        } else {
            println!("  {} = {}", key, value);
        }
    }

    Ok(())
}

/// Print the version of the plugin built from `<outdir>/<name>.recipe`.
pub fn print_version(config: &VimballConfig, name: &str) -> Result<(), CliError> {
    match recipe_version(config, name)? {
        Some(version) => {
            println!("{}", version);
            Ok(())
        }
        None => Err(CliError::VersionNotFound(name.to_string())),
    }
}

/// Print the vim.org script id of the plugin built from `<outdir>/<name>.recipe`.
pub fn print_script_id(config: &VimballConfig, name: &str) -> Result<(), CliError> {
    match recipe_script_id(config, name)? {
        Some(id) => {
            println!("{}", id);
            Ok(())
        }
        None => Err(CliError::ScriptIdNotFound(name.to_string())),
    }
}
