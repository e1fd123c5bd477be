//! Locating the vimfiles directory and the configuration file.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that names the vimfiles directory explicitly.
pub const VIMFILES_ENV: &str = "VIMFILES";

/// Directory names Vim uses for user runtime files.
pub const VIMFILES_DIR_NAMES: &[&str] = &[".vim", "vimfiles"];

/// Subdirectory of vimfiles holding vimballs, recipes and the config file.
pub const VIMBALLS_DIR: &str = "vimballs";

/// Name of the host-independent configuration file.
pub const CONFIG_FILENAME: &str = "config.ini";

/// Detect the user's vimfiles directory.
///
/// `$VIMFILES` wins outright. Otherwise `.vim` and then `vimfiles` are tried
/// under the home directory, `$USERPROFILE` and `$VIM`.
pub fn detect_vimfiles() -> Option<PathBuf> {
    if let Some(dir) = env::var_os(VIMFILES_ENV) {
        return Some(PathBuf::from(dir));
    }

    let bases: Vec<PathBuf> = [
        dirs::home_dir(),
        env::var_os("USERPROFILE").map(PathBuf::from),
        env::var_os("VIM").map(PathBuf::from),
    ]
    .into_iter()
    .flatten()
    .collect();

    find_vimfiles(&bases)
}

/// First existing `<base>/<name>` directory, trying names in the outer loop.
pub fn find_vimfiles(bases: &[PathBuf]) -> Option<PathBuf> {
    VIMFILES_DIR_NAMES.iter().find_map(|name| {
        bases
            .iter()
            .map(|base| base.join(name))
            .find(|candidate| candidate.is_dir())
    })
}

/// Default configuration file for `vimfiles`.
///
/// A host-specific `config_<hostname>.ini` is preferred when it exists.
pub fn default_config_path(vimfiles: &Path) -> PathBuf {
    config_path_for_host(vimfiles, env::var("HOSTNAME").ok().as_deref())
}

/// Configuration file for `vimfiles` on `hostname`.
pub fn config_path_for_host(vimfiles: &Path, hostname: Option<&str>) -> PathBuf {
    let dir = vimfiles.join(VIMBALLS_DIR);
    if let Some(host) = hostname.filter(|h| !h.is_empty()) {
        let host_config = dir.join(format!("config_{}.ini", host));
        if host_config.exists() {
            return host_config;
        }
    }
    dir.join(CONFIG_FILENAME)
}
