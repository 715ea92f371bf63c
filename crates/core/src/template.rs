//! Template lookup.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result of looking up a template by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLookup {
    /// The template file exists.
    Found(PathBuf),
    /// No file with the exact expected name exists.
    Missing { expected: PathBuf },
}

impl TemplateLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::Missing { .. } => None,
        }
    }
}

/// Maps template names to `<name><extension>` files inside a folder.
///
/// Matching is exact and case-sensitive against the folder listing, so a
/// case-insensitive file system cannot turn `sup-a` into `SUP-A.dxf`.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    folder: PathBuf,
    extension: String,
}

impl TemplateResolver {
    pub fn new(folder: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            extension: extension.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Expected file name for a template.
    pub fn file_name(&self, template_name: &str) -> String {
        format!("{}{}", template_name, self.extension)
    }

    /// Looks up a template. Never fails: unreadable folders and unsafe names
    /// are reported as misses.
    pub async fn resolve(&self, template_name: &str) -> TemplateLookup {
        let file_name = self.file_name(template_name);
        let expected = self.folder.join(&file_name);

        if !is_plain_name(template_name) {
            debug!("Template name {:?} is not a plain file name", template_name);
            return TemplateLookup::Missing { expected };
        }

        match self.listing_contains(&OsString::from(&file_name)).await {
            Ok(true) if expected.is_file() => TemplateLookup::Found(expected),
            Ok(_) => TemplateLookup::Missing { expected },
            Err(e) => {
                debug!("Cannot list template folder {:?}: {}", self.folder, e);
                TemplateLookup::Missing { expected }
            }
        }
    }

    async fn listing_contains(&self, file_name: &OsString) -> std::io::Result<bool> {
        let mut entries = tokio::fs::read_dir(&self.folder).await?;
        while let Some(entry) = entries.next_entry().await? {
            if &entry.file_name() == file_name {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Whether a name can be used as a single path component.
pub(crate) fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn folder_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            std::fs::write(dir.path().join(file), b"0\nEOF\n").unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_resolve_existing_template() {
        let dir = folder_with(&["SUP-A.dxf"]);
        let resolver = TemplateResolver::new(dir.path(), ".dxf");

        let lookup = resolver.resolve("SUP-A").await;
        assert_eq!(lookup, TemplateLookup::Found(dir.path().join("SUP-A.dxf")));
        assert!(lookup.is_found());
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let dir = folder_with(&["SUP-A.dxf"]);
        let resolver = TemplateResolver::new(dir.path(), ".dxf");

        assert!(!resolver.resolve("sup-a").await.is_found());
    }

    #[tokio::test]
    async fn test_resolve_does_not_infer_extension() {
        let dir = folder_with(&["SUP-A.DXF", "SUP-B"]);
        let resolver = TemplateResolver::new(dir.path(), ".dxf");

        assert!(!resolver.resolve("SUP-A").await.is_found());
        assert!(!resolver.resolve("SUP-B").await.is_found());
    }

    #[tokio::test]
    async fn test_missing_reports_expected_path() {
        let dir = folder_with(&[]);
        let resolver = TemplateResolver::new(dir.path(), ".dxf");

        let lookup = resolver.resolve("SUP-X").await;
        assert_eq!(
            lookup,
            TemplateLookup::Missing {
                expected: dir.path().join("SUP-X.dxf")
            }
        );
        assert!(lookup.path().is_none());
    }

    #[tokio::test]
    async fn test_missing_folder_is_a_miss() {
        let resolver = TemplateResolver::new("/nonexistent/templates", ".dxf");
        assert!(!resolver.resolve("SUP-A").await.is_found());
    }

    #[tokio::test]
    async fn test_path_like_names_are_misses() {
        let dir = folder_with(&["SUP-A.dxf"]);
        let nested = dir.path().join("sub");
        std::fs::create_dir(&nested).unwrap();
        let resolver = TemplateResolver::new(&nested, ".dxf");

        assert!(!resolver.resolve("../SUP-A").await.is_found());
        assert!(!resolver.resolve("").await.is_found());
    }

    #[test]
    fn test_is_plain_name() {
        assert!(is_plain_name("POS-001"));
        assert!(is_plain_name("SUP A.1"));
        assert!(!is_plain_name("a/b"));
        assert!(!is_plain_name("a\\b"));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name("tab\tname"));
    }
}
