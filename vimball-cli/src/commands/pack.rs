//! `vba` command - build vimballs from recipes.

use std::path::PathBuf;

use tracing::info;
use vimball::config::VimballConfig;
use vimball::pack::{PackOutcome, Packer};

use super::common::check_report;
use crate::error::CliError;

/// Run the vba command.
pub fn run(config: &VimballConfig, recipes: &[PathBuf]) -> Result<(), CliError> {
    let mut packer = Packer::new(config);
    let report = packer.pack_all(recipes);

    for (recipe, outcome) in &report.succeeded {
        match outcome {
            PackOutcome::Written { target, members } => info!(
                recipe = %recipe.display(),
                target = %target.display(),
                members,
                "Built vimball"
            ),
            PackOutcome::UpToDate { target } => info!(
                recipe = %recipe.display(),
                target = %target.display(),
                "Skipped up-to-date vimball"
            ),
        }
    }

    check_report("vba", &report)
}
