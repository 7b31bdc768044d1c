//! Extension-to-language mapping.
//!
//! A config table, not logic: the default covers the usual suspects and
//! deployments can override or extend it. Unknown extensions yield no
//! language and are omitted from detection, never an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default extension -> language table.
const DEFAULT_LANGUAGES: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("rs", "rust"),
    ("go", "go"),
    ("java", "java"),
    ("rb", "ruby"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("cs", "csharp"),
    ("php", "php"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("scala", "scala"),
    ("sql", "sql"),
    ("sh", "bash"),
    ("yml", "yaml"),
    ("yaml", "yaml"),
    ("json", "json"),
    ("xml", "xml"),
    ("html", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("md", "markdown"),
];

/// Maps file extensions to language names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageMap {
    extensions: HashMap<String, String>,
}

impl Default for LanguageMap {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_LANGUAGES
                .iter()
                .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
                .collect(),
        }
    }
}

impl LanguageMap {
    /// Creates an empty map (useful for tests and full overrides).
    pub fn empty() -> Self {
        Self {
            extensions: HashMap::new(),
        }
    }

    /// Adds or replaces one extension mapping. Extensions are matched
    /// without the leading dot, case-insensitively.
    pub fn insert(&mut self, extension: impl Into<String>, language: impl Into<String>) {
        self.extensions
            .insert(extension.into().to_lowercase(), language.into());
    }

    /// Detects the language for a file path from its extension.
    ///
    /// Returns `None` for unknown or missing extensions.
    pub fn detect(&self, path: &str) -> Option<&str> {
        let file_name = path.rsplit('/').next()?;
        let (_, extension) = file_name.rsplit_once('.')?;
        self.extensions
            .get(&extension.to_lowercase())
            .map(String::as_str)
    }
}
