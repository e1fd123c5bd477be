//! Filesystem existence checks used by path resolution.

use std::path::Path;

/// Answers "does this path exist?" for the resolver.
///
/// Every probe made while resolving a member goes through this trait, so
/// alternative implementations can count or fake filesystem lookups.
pub trait FileProbe {
    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskProbe;

impl FileProbe for DiskProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl<P: FileProbe + ?Sized> FileProbe for &P {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}
