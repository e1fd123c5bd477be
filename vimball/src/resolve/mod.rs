//! Member path resolution for packing.
//!
//! See [`PathResolver`] for the lookup order.

mod probe;
mod resolver;
mod rules;

pub use probe::{DiskProbe, FileProbe};
pub use resolver::{
    Origin, PathResolver, RepoMemo, Resolution, ResolutionConfig, REPO_NAME_PLACEHOLDER,
};
pub use rules::{RewriteRule, RewriteRules};
