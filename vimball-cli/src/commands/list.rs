//! `list` command - print the members of vimballs.

use std::path::PathBuf;

use vimball::config::VimballConfig;
use vimball::install::Installer;

use super::common::check_report;
use crate::error::CliError;

/// Run the list command.
pub fn run(config: &VimballConfig, vimballs: &[PathBuf]) -> Result<(), CliError> {
    let installer = Installer::new(config);
    let report = installer.list_all(vimballs);

    for (_, members) in &report.succeeded {
        for member in members {
            println!("{}", member);
        }
    }

    check_report("list", &report)
}
