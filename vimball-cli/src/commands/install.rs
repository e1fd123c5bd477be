//! `install` command - extract vimballs into the vimfiles tree.

use std::path::PathBuf;

use tracing::{info, warn};
use vimball::config::VimballConfig;
use vimball::install::Installer;

use super::common::check_report;
use crate::error::CliError;

/// Run the install command, then rebuild help tags.
///
/// A failing helptags command is logged; the installed files stay in place
/// and the exit status reflects the installs only.
pub fn run(config: &VimballConfig, vimballs: &[PathBuf]) -> Result<(), CliError> {
    let mut installer = Installer::new(config);
    let report = installer.install_all(vimballs);

    for (_, installed) in &report.succeeded {
        info!(
            archive = %installed.archive.display(),
            files = installed.files.len(),
            "Installed vimball"
        );
    }

    if let Err(e) = installer.post_install() {
        warn!(error = %e, "Failed to create helptags");
    }
    check_report("install", &report)
}
