#![warn(missing_docs)]
//! `skratchpad-lang` - data-driven language configuration for SkratchPad.
//!
//! This crate stays dependency-free. It describes the one language the editor highlights:
//! its display name, default file extension, the file-type filters offered by the file
//! picker, and its comment tokens (used by the lexer).

use std::path::{Path, PathBuf};

/// Comment tokens for a given language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `#`).
    pub line: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// A file-type filter offered by the file picker.
///
/// Filters are advisory: they are displayed to the user but never enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    /// Human readable name, e.g. `Python Files`.
    pub name: String,
    /// Glob-like patterns, e.g. `*.py` or `*.*`.
    pub patterns: Vec<String>,
}

impl FileFilter {
    /// Create a filter from a name and its patterns.
    pub fn new<I, S>(name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Label as shown in the picker, e.g. `Python Files (*.py)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.patterns.join(", "))
    }

    /// Returns `true` if `path` matches one of the patterns.
    ///
    /// Supported pattern shapes: `*`, `*.*` (anything) and `*.ext` (case-insensitive extension).
    pub fn matches(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|ext| ext.to_str());
        self.patterns.iter().any(|pattern| match pattern.as_str() {
            "*" | "*.*" => true,
            pattern => match (pattern.strip_prefix("*."), ext) {
                (Some(want), Some(ext)) => want.eq_ignore_ascii_case(ext),
                _ => false,
            },
        })
    }
}

/// Language configuration consumed by the editor shell and the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Display name, e.g. `Python`.
    pub name: String,
    /// Default extension without the leading dot, e.g. `py`.
    pub default_extension: String,
    /// Filters offered by open/save pickers, in display order.
    pub filters: Vec<FileFilter>,
    /// Comment tokens.
    pub comments: CommentConfig,
}

impl LanguageConfig {
    /// The Python configuration used by SkratchPad.
    pub fn python() -> Self {
        Self {
            name: "Python".to_string(),
            default_extension: "py".to_string(),
            filters: vec![
                FileFilter::new("Python Files", ["*.py"]),
                FileFilter::new("Text Files", ["*.txt"]),
                FileFilter::new("All Files", ["*.*"]),
            ],
            comments: CommentConfig::line("#"),
        }
    }

    /// Append the default extension when `path` has none.
    ///
    /// Paths that already carry an extension (any extension) are returned unchanged.
    pub fn with_default_extension(&self, path: impl Into<PathBuf>) -> PathBuf {
        let mut path = path.into();
        if path.extension().is_none() && !self.default_extension.is_empty() {
            path.set_extension(&self.default_extension);
        }
        path
    }

    /// Returns `true` if `path` matches the language's own filter (the first one).
    pub fn is_source_file(&self, path: &Path) -> bool {
        self.filters.first().is_some_and(|f| f.matches(path))
    }

    /// The first filter matching `path`, in display order.
    pub fn matching_filter(&self, path: &Path) -> Option<&FileFilter> {
        self.filters.iter().find(|f| f.matches(path))
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self::python()
    }
}
