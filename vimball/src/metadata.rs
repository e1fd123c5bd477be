//! Script metadata embedded in plugin sources.
//!
//! Two conventions are recognised:
//!
//! - `let g:loaded_<name> = 217` marks the plugin version (`2.17`).
//! - `" GetLatestVimScripts: 1234 1 :AutoInstall: foo.vim` carries the
//!   script id on vim.org.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::config::VimballConfig;
use crate::error::{VimballError, VimballResult};
use crate::pack::Recipe;
use crate::resolve::PathResolver;

/// Plugin version declared in any of `files`, formatted `major.minor`.
///
/// The first `let [g:]loaded_<name> = NNN` line wins.
pub fn plugin_version(files: &[PathBuf], name: &str) -> VimballResult<Option<String>> {
    let pattern = format!(r"^let (g:)?loaded_{} = (\d+)$", regex::escape(name));
    let re = compile(&pattern)?;

    for file in files {
        debug!(file = %file.display(), "Looking for version number");
        for line in read_lines(file)? {
            let Some(caps) = re.captures(&line) else {
                continue;
            };
            if let Ok(version) = caps[2].parse::<u64>() {
                let formatted = format!("{}.{:02}", version / 100, version % 100);
                debug!(name, version = %formatted, "Found version number");
                return Ok(Some(formatted));
            }
        }
    }
    Ok(None)
}

/// Non-zero vim.org script id declared in any of `files`.
///
/// The `GetLatestVimScripts` line must name the file it appears in.
pub fn script_id(files: &[PathBuf]) -> VimballResult<Option<u64>> {
    for file in files {
        let Some(basename) = file.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let pattern = format!(
            r#"^" GetLatestVimScripts: (\d+) +\d+ +(:AutoInstall: +)?{}$"#,
            regex::escape(&basename)
        );
        let re = compile(&pattern)?;

        for line in read_lines(file)? {
            let id = re
                .captures(&line)
                .and_then(|caps| caps[1].parse::<u64>().ok())
                .filter(|id| *id != 0);
            if let Some(id) = id {
                debug!(file = %file.display(), id, "Found script id");
                return Ok(Some(id));
            }
        }
    }
    Ok(None)
}

/// On-disk locations of the members of `recipe`.
pub fn member_files(config: &VimballConfig, recipe: &Recipe) -> Vec<PathBuf> {
    let mut resolver = PathResolver::new(&config.resolution, recipe.name());
    recipe
        .members()
        .iter()
        .map(|member| resolver.resolve(member).path)
        .collect()
}

/// Version of the plugin built from `<outdir>/<name>.recipe`.
pub fn recipe_version(config: &VimballConfig, name: &str) -> VimballResult<Option<String>> {
    let recipe = Recipe::load(&config.recipe_path(name))?;
    plugin_version(&member_files(config, &recipe), name)
}

/// vim.org script id of the plugin built from `<outdir>/<name>.recipe`.
pub fn recipe_script_id(config: &VimballConfig, name: &str) -> VimballResult<Option<u64>> {
    let recipe = Recipe::load(&config.recipe_path(name))?;
    script_id(&member_files(config, &recipe))
}

fn compile(pattern: &str) -> VimballResult<Regex> {
    Regex::new(pattern).map_err(|e| VimballError::InvalidRewriteRule {
        pattern: pattern.to_string(),
        source: e,
    })
}

fn read_lines(path: &Path) -> VimballResult<Vec<String>> {
    let bytes = fs::read(path).map_err(|e| VimballError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect())
}
