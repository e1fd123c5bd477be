//! Recipe files: the ordered member list of an archive.

use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::recipe_name;
use crate::error::{VimballError, VimballResult};

/// An ordered list of member paths relative to the vimfiles directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    name: String,
    source: Option<PathBuf>,
    members: Vec<String>,
}

impl Recipe {
    /// Create a recipe from member paths.
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
            members,
        }
    }

    /// Parse recipe text: one member per line, whitespace trimmed, blank lines
    /// skipped.
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        let members = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(name, members)
    }

    /// Load a recipe file. The archive name is the file name without its
    /// `.recipe` suffix.
    pub fn load(path: &Path) -> VimballResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| VimballError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let name = recipe_name(path).unwrap_or_default();

        let mut recipe = Self::parse(name, &text);
        recipe.source = Some(path.to_path_buf());
        Ok(recipe)
    }

    /// Archive name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the recipe was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Member paths in order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Recipe file content for the given members.
    pub fn to_text<S: AsRef<str>>(members: &[S]) -> String {
        let mut out = String::new();
        for member in members {
            out.push_str(member.as_ref());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_blank_lines_and_trims() {
        let recipe = Recipe::parse("foo", "plugin/foo.vim\n\n  doc/foo.txt  \r\n\t\n");
        assert_eq!(recipe.members(), &["plugin/foo.vim", "doc/foo.txt"]);
        assert_eq!(recipe.name(), "foo");
    }

    #[test]
    fn test_load_names_recipe_after_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("foo.recipe");
        fs::write(&path, "autoload/foo.vim\nplugin/foo.vim\n").unwrap();

        let recipe = Recipe::load(&path).unwrap();
        assert_eq!(recipe.name(), "foo");
        assert_eq!(recipe.source(), Some(path.as_path()));
        assert_eq!(recipe.members().len(), 2);
    }

    #[test]
    fn test_load_missing_recipe() {
        let err = Recipe::load(Path::new("/nonexistent/foo.recipe")).unwrap_err();
        assert!(matches!(err, VimballError::ReadFailed { .. }));
    }

    #[test]
    fn test_to_text_preserves_order() {
        let text = Recipe::to_text(&["b.vim", "a.vim"]);
        assert_eq!(text, "b.vim\na.vim\n");
        assert_eq!(
            Recipe::parse("x", &text).members(),
            &["b.vim".to_string(), "a.vim".to_string()]
        );
    }
}
