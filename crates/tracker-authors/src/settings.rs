//! Persisted author preferences.

use serde::{Deserialize, Serialize};

/// Separator of the single-string author list preference.
pub const AUTHOR_LIST_SEPARATOR: char = ',';

/// Serializable author registry state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorSettings {
    /// Registered authors, excluding the implicit unknown author.
    pub authors: Vec<String>,
    /// Active author; `None` means the unknown author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    /// Owners shown as valid.
    pub selected: Vec<String>,
}

/// Split a comma-separated author list, dropping blank entries.
pub fn parse_author_list(text: &str) -> Vec<String> {
    text.split(AUTHOR_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join names into the comma-separated form.
pub fn format_author_list<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(&AUTHOR_LIST_SEPARATOR.to_string())
}
