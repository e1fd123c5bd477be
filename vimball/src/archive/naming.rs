//! Archive and recipe naming conventions.
//!
//! - Archive files: `<name>.vba`, or `<name>.vba.gz` when compressed
//! - Recipes: `<name>.recipe`
//! - Saved recipes and record lines are keyed by the archive stem `<name>`

use std::path::Path;

/// Extension of an uncompressed vimball.
pub const VBA_EXTENSION: &str = "vba";

/// Suffix added to compressed vimballs.
pub const GZ_SUFFIX: &str = ".gz";

/// Extension of recipe files.
pub const RECIPE_EXTENSION: &str = "recipe";

/// File name of the archive built from recipe `name`.
///
/// # Examples
///
/// ```
/// use vimball::archive::archive_filename;
///
/// assert_eq!(archive_filename("foo", false), "foo.vba");
/// assert_eq!(archive_filename("foo", true), "foo.vba.gz");
/// ```
pub fn archive_filename(name: &str, compress: bool) -> String {
    if compress {
        format!("{}.{}{}", name, VBA_EXTENSION, GZ_SUFFIX)
    } else {
        format!("{}.{}", name, VBA_EXTENSION)
    }
}

/// Base name of an archive file: the `.gz` suffix and then one extension
/// are removed.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vimball::archive::archive_stem;
///
/// assert_eq!(archive_stem(Path::new("/tmp/foo.vba")), Some("foo".to_string()));
/// assert_eq!(archive_stem(Path::new("foo.vba.gz")), Some("foo".to_string()));
/// assert_eq!(archive_stem(Path::new("foo-1.2.vmb")), Some("foo-1.2".to_string()));
/// ```
pub fn archive_stem(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let name = name.strip_suffix(GZ_SUFFIX).unwrap_or(name);
    let stem = Path::new(name).file_stem()?.to_str()?;
    Some(stem.to_string())
}

/// Archive name for a recipe file: the file name minus a `.recipe` suffix.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vimball::archive::recipe_name;
///
/// assert_eq!(recipe_name(Path::new("vimballs/foo.recipe")), Some("foo".to_string()));
/// assert_eq!(recipe_name(Path::new("foo.list")), Some("foo.list".to_string()));
/// ```
pub fn recipe_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let suffix = format!(".{}", RECIPE_EXTENSION);
    Some(name.strip_suffix(&suffix).unwrap_or(name).to_string())
}

/// Whether a command-line argument names a vimball (`.vba` or `.vba.gz`).
pub fn looks_like_vimball(arg: &str) -> bool {
    let arg = arg.strip_suffix(GZ_SUFFIX).unwrap_or(arg);
    arg.ends_with(&format!(".{}", VBA_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_stem_without_extension() {
        assert_eq!(archive_stem(Path::new("foo")), Some("foo".to_string()));
    }

    #[test]
    fn test_archive_stem_no_file_name() {
        assert_eq!(archive_stem(Path::new("/")), None);
    }

    #[test]
    fn test_looks_like_vimball() {
        assert!(looks_like_vimball("foo.vba"));
        assert!(looks_like_vimball("dist/foo.vba.gz"));
        assert!(!looks_like_vimball("foo.recipe"));
        assert!(!looks_like_vimball("foo.gz"));
    }

    #[test]
    fn test_recipe_name_plain() {
        assert_eq!(recipe_name(Path::new("bar.recipe")), Some("bar".to_string()));
    }
}
