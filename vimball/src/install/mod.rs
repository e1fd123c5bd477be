//! Installing vimballs into a vimfiles tree.

mod installer;
mod record;

pub use installer::{InstallReport, Installer, DOC_PLACEHOLDER};
pub use record::InstallRecord;
