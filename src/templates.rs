//! Bundled rule templates and resolution of a template into file content.

use std::io;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::RulesError;

/// Extension of every bundled template and every generated rules file.
pub const TEMPLATE_EXTENSION: &str = "mdc";

/// Inserted between the template stem and the extension of the output file.
const RULES_SUFFIX: &str = "-rules";

static EMBEDDED: &[(&str, &str)] = &[
    ("general.mdc", include_str!("../templates/general.mdc")),
    ("typescript.mdc", include_str!("../templates/typescript.mdc")),
    ("custom-rules.mdc", include_str!("../templates/custom-rules.mdc")),
    ("react.mdc", include_str!("../templates/react.mdc")),
    ("vue.mdc", include_str!("../templates/vue.mdc")),
    ("nextjs.mdc", include_str!("../templates/nextjs.mdc")),
    ("html-website.mdc", include_str!("../templates/html-website.mdc")),
    ("flutter.mdc", include_str!("../templates/flutter.mdc")),
    ("react-native.mdc", include_str!("../templates/react-native.mdc")),
    ("uniapp.mdc", include_str!("../templates/uniapp.mdc")),
    ("android.mdc", include_str!("../templates/android.mdc")),
    ("ios.mdc", include_str!("../templates/ios.mdc")),
    ("nodejs.mdc", include_str!("../templates/nodejs.mdc")),
    ("python.mdc", include_str!("../templates/python.mdc")),
    ("golang.mdc", include_str!("../templates/golang.mdc")),
    ("fastadmin.mdc", include_str!("../templates/fastadmin.mdc")),
    (
        "chrome-extension.mdc",
        include_str!("../templates/chrome-extension.mdc"),
    ),
    (
        "wechat-miniprogram.mdc",
        include_str!("../templates/wechat-miniprogram.mdc"),
    ),
];

/// Read-only source of template files.
pub trait TemplateStore {
    /// Returns `Ok(None)` when no file with this name exists.
    fn read(&self, file_name: &str) -> io::Result<Option<String>>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// Templates compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedTemplates;

impl TemplateStore for EmbeddedTemplates {
    fn read(&self, file_name: &str) -> io::Result<Option<String>> {
        Ok(EMBEDDED
            .iter()
            .find(|(name, _)| *name == file_name)
            .map(|(_, content)| content.to_string()))
    }

    fn location(&self) -> String {
        "<embedded>".to_string()
    }
}

/// Templates read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateStore for DirectoryTemplates {
    fn read(&self, file_name: &str) -> io::Result<Option<String>> {
        // Only plain file names live in the store.
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name == ".." {
            return Ok(None);
        }

        match std::fs::read_to_string(self.root.join(file_name)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Content ready to be written, with the file name it should be written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub content: String,
    pub file_name: String,
}

/// Output file name for a template: `general.mdc` becomes `general-rules.mdc`.
pub fn rules_file_name(template_file: &str) -> String {
    let extension = format!(".{}", TEMPLATE_EXTENSION);
    let stem = template_file
        .strip_suffix(extension.as_str())
        .unwrap_or(template_file);
    format!("{}{}{}", stem, RULES_SUFFIX, extension)
}

/// Read a template from the store and pair it with its output file name.
pub fn resolve(store: &dyn TemplateStore, file_name: &str) -> Result<ResolvedContent, RulesError> {
    let content = store
        .read(file_name)
        .map_err(|source| {
            warn!(template = %file_name, error = %source, "template_read_failed");
            RulesError::TemplateRead {
                name: file_name.to_string(),
                source,
            }
        })?
        .ok_or_else(|| {
            warn!(template = %file_name, store = %store.location(), "template_not_found");
            RulesError::TemplateNotFound {
                name: file_name.to_string(),
            }
        })?;

    if content.trim().is_empty() {
        warn!(template = %file_name, "template_empty");
        return Err(RulesError::TemplateEmpty {
            name: file_name.to_string(),
        });
    }

    debug!(template = %file_name, bytes = content.len(), "template_resolved");
    Ok(ResolvedContent {
        content,
        file_name: rules_file_name(file_name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::flattened;
    use tempfile::TempDir;

    #[test]
    fn test_rules_file_name() {
        assert_eq!(rules_file_name("general.mdc"), "general-rules.mdc");
        assert_eq!(rules_file_name("react.mdc"), "react-rules.mdc");
        assert_eq!(rules_file_name("custom-rules.mdc"), "custom-rules-rules.mdc");
    }

    #[test]
    fn test_rules_file_name_without_extension() {
        assert_eq!(rules_file_name("notes"), "notes-rules.mdc");
        assert_eq!(rules_file_name("notes.txt"), "notes.txt-rules.mdc");
    }

    #[test]
    fn test_every_catalog_template_is_embedded() {
        for entry in flattened() {
            let resolved = resolve(&EmbeddedTemplates, entry.template.file_name);
            assert!(
                resolved.is_ok(),
                "{} did not resolve: {:?}",
                entry.template.file_name,
                resolved.err()
            );
        }
    }

    #[test]
    fn test_every_embedded_template_is_in_catalog() {
        let catalog: Vec<_> = flattened().iter().map(|e| e.template.file_name).collect();
        for (name, _) in EMBEDDED {
            assert_eq!(
                catalog.iter().filter(|n| *n == name).count(),
                1,
                "{} should be listed exactly once",
                name
            );
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for entry in flattened() {
            let first = resolve(&EmbeddedTemplates, entry.template.file_name).unwrap();
            let second = resolve(&EmbeddedTemplates, entry.template.file_name).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_resolve_embedded_returns_file_text() {
        let resolved = resolve(&EmbeddedTemplates, "react.mdc").unwrap();
        assert_eq!(resolved.content, include_str!("../templates/react.mdc"));
        assert_eq!(resolved.file_name, "react-rules.mdc");
    }

    #[test]
    fn test_resolve_unknown_template() {
        let err = resolve(&EmbeddedTemplates, "cobol.mdc").unwrap_err();
        assert!(matches!(err, RulesError::TemplateNotFound { ref name } if name == "cobol.mdc"));
    }

    #[test]
    fn test_directory_store_reads_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("vue.mdc"), "# Vue\n").unwrap();

        let store = DirectoryTemplates::new(dir.path());
        let resolved = resolve(&store, "vue.mdc").unwrap();
        assert_eq!(resolved.content, "# Vue\n");
        assert_eq!(resolved.file_name, "vue-rules.mdc");
    }

    #[test]
    fn test_directory_store_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryTemplates::new(dir.path());
        let err = resolve(&store, "vue.mdc").unwrap_err();
        assert!(matches!(err, RulesError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_directory_store_whitespace_only_is_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("blank.mdc"), "  \n\t\n").unwrap();

        let store = DirectoryTemplates::new(dir.path());
        let err = resolve(&store, "blank.mdc").unwrap_err();
        assert!(matches!(err, RulesError::TemplateEmpty { ref name } if name == "blank.mdc"));
    }

    #[test]
    fn test_directory_store_rejects_paths() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("store");
        std::fs::create_dir(&inner).unwrap();
        std::fs::write(dir.path().join("secret.mdc"), "outside").unwrap();

        let store = DirectoryTemplates::new(&inner);
        assert!(store.read("../secret.mdc").unwrap().is_none());
        assert!(store.read("..").unwrap().is_none());
    }
}
