//! Extension-based file classification.
//!
//! This module maps file extensions to the category folders files are sorted
//! into (e.g., "Images", "Documents"). Extensions are stored with their
//! leading dot and matched case-insensitively.
//!
//! # Examples
//!
//! ```
//! use filesorter::rules::ExtensionRules;
//!
//! let rules = ExtensionRules::default();
//! assert_eq!(rules.classify("holiday.jpg"), Some("Images"));
//! assert_eq!(rules.classify("notes.TXT"), Some("Documents"));
//! assert_eq!(rules.classify("data.xyz"), None);
//! ```
use std::collections::HashMap;

/// The built-in extension table.
const DEFAULT_RULES: &[(&str, &str)] = &[
    (".jpg", "Images"),
    (".jpeg", "Images"),
    (".png", "Images"),
    (".pdf", "Documents"),
    (".doc", "Documents"),
    (".docx", "Documents"),
    (".txt", "Documents"),
    (".mp3", "Music"),
    (".wav", "Music"),
    (".mp4", "Video"),
    (".avi", "Video"),
    (".zip", "Archives"),
    (".rar", "Archives"),
];

/// Immutable mapping from lowercase extension (with leading dot) to category name.
///
/// A table is built once and handed to the organizer; nothing mutates it
/// during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRules {
    extension_map: HashMap<String, String>,
}

impl ExtensionRules {
    /// Creates an empty table that classifies nothing.
    pub fn empty() -> Self {
        Self {
            extension_map: HashMap::new(),
        }
    }

    /// Builds a table from `(extension, category)` pairs.
    ///
    /// Extensions may be given with or without the leading dot and in any case.
    ///
    /// ```
    /// use filesorter::rules::ExtensionRules;
    ///
    /// let rules = ExtensionRules::from_pairs([("rs", "Code"), (".TOML", "Code")]);
    /// assert_eq!(rules.classify("main.rs"), Some("Code"));
    /// assert_eq!(rules.classify("Cargo.toml"), Some("Code"));
    /// ```
    pub fn from_pairs<I, E, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, C)>,
        E: AsRef<str>,
        C: Into<String>,
    {
        let extension_map = pairs
            .into_iter()
            .map(|(ext, category)| (normalize_extension(ext.as_ref()), category.into()))
            .collect();
        Self { extension_map }
    }

    /// Returns a copy of this table with one more mapping.
    pub fn with_rule(mut self, ext: &str, category: impl Into<String>) -> Self {
        self.extension_map
            .insert(normalize_extension(ext), category.into());
        self
    }

    /// Looks up the category for an extension such as `.png` or `PNG`.
    pub fn category_for_extension(&self, ext: &str) -> Option<&str> {
        if ext.is_empty() {
            return None;
        }
        self.extension_map
            .get(&normalize_extension(ext))
            .map(String::as_str)
    }

    /// Determines the category for a file name, or `None` if its extension
    /// has no rule.
    pub fn classify(&self, file_name: &str) -> Option<&str> {
        self.category_for_extension(extension_of(file_name))
    }

    /// All distinct category names, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> =
            self.extension_map.values().map(String::as_str).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

impl Default for ExtensionRules {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_RULES.iter().copied())
    }
}

/// Returns the extension of a file name: everything from the last `.` to the
/// end, in its original case, or `""` when the name contains no dot.
///
/// ```
/// use filesorter::rules::extension_of;
///
/// assert_eq!(extension_of("archive.tar.GZ"), ".GZ");
/// assert_eq!(extension_of("Makefile"), "");
/// ```
pub fn extension_of(file_name: &str) -> &str {
    file_name
        .rfind('.')
        .map(|idx| &file_name[idx..])
        .unwrap_or("")
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}
