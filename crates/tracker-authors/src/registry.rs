//! Known authors, the active author and the display selection.

use std::collections::BTreeSet;

use tracing::{debug, warn};
use tracker_model::Listeners;

use crate::error::{AuthorError, Result};
use crate::normalize::normalize_author_name;
use crate::settings::AuthorSettings;

/// Sentinel author that always exists and cannot be removed.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Change notification from an [`AuthorRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorEvent {
    /// An author was added or removed.
    ListChanged,
    /// The active author changed.
    ActiveChanged { old: String, new: String },
    /// The display selection changed.
    SelectionChanged,
}

/// Registry of author identities.
///
/// The selection is a display filter only: it decides which owners count as
/// valid in the outline and never restricts who may edit.
#[derive(Debug)]
pub struct AuthorRegistry {
    authors: BTreeSet<String>,
    active: String,
    selected: BTreeSet<String>,
    events: Listeners<AuthorEvent>,
}

impl Default for AuthorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorRegistry {
    /// Registry holding only the unknown author, which is active.
    pub fn new() -> Self {
        Self {
            authors: BTreeSet::from([UNKNOWN_AUTHOR.to_string()]),
            active: UNKNOWN_AUTHOR.to_string(),
            selected: BTreeSet::new(),
            events: Listeners::new(),
        }
    }

    /// Listener bus for registry changes.
    pub fn events(&self) -> &Listeners<AuthorEvent> {
        &self.events
    }

    /// Known authors, sorted. Always includes [`UNKNOWN_AUTHOR`].
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.authors.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    /// Always `false`: the unknown author is never removed.
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.authors.contains(&normalize_author_name(name))
    }

    /// Register an author and make it active.
    ///
    /// Returns the normalized name. Adding a known author only activates it.
    pub fn add(&mut self, name: &str) -> Result<String> {
        let normalized = normalize_author_name(name);
        if normalized.is_empty() {
            return Err(AuthorError::EmptyName {
                raw: name.to_string(),
            });
        }
        if self.authors.insert(normalized.clone()) {
            debug!(author = %normalized, "registered author");
            self.events.emit(&AuthorEvent::ListChanged);
        }
        self.activate(normalized.clone());
        Ok(normalized)
    }

    /// Remove an author. Removing [`UNKNOWN_AUTHOR`] or an unregistered name
    /// is a no-op and returns `false`.
    ///
    /// If the removed author was active, the unknown author becomes active.
    pub fn remove(&mut self, name: &str) -> bool {
        let normalized = normalize_author_name(name);
        if normalized == UNKNOWN_AUTHOR || !self.authors.remove(&normalized) {
            return false;
        }
        debug!(author = %normalized, "removed author");
        self.events.emit(&AuthorEvent::ListChanged);
        if self.active == normalized {
            self.activate(UNKNOWN_AUTHOR.to_string());
        }
        if self.selected.remove(&normalized) {
            self.events.emit(&AuthorEvent::SelectionChanged);
        }
        true
    }

    /// Remove the active author (no-op when the unknown author is active).
    pub fn remove_active(&mut self) -> bool {
        let active = self.active.clone();
        self.remove(&active)
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        let normalized = normalize_author_name(name);
        if !self.authors.contains(&normalized) {
            return Err(AuthorError::UnknownAuthor(name.to_string()));
        }
        self.activate(normalized);
        Ok(())
    }

    fn activate(&mut self, name: String) {
        if self.active == name {
            return;
        }
        let old = std::mem::replace(&mut self.active, name.clone());
        self.events
            .emit(&AuthorEvent::ActiveChanged { old, new: name });
    }

    /// Owners currently shown as valid.
    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Whether an element owner passes the display filter. Owners are
    /// compared verbatim.
    pub fn is_selected(&self, owner: &str) -> bool {
        self.selected.contains(owner)
    }

    /// Replace the display selection. Blank entries are dropped; names need
    /// not be registered.
    pub fn set_selected<I, S>(&mut self, owners: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected: BTreeSet<String> = owners
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if selected != self.selected {
            self.selected = selected;
            self.events.emit(&AuthorEvent::SelectionChanged);
        }
    }

    /// Add one owner to the selection.
    pub fn select(&mut self, owner: &str) {
        let owner = owner.trim();
        if !owner.is_empty() && self.selected.insert(owner.to_string()) {
            self.events.emit(&AuthorEvent::SelectionChanged);
        }
    }

    /// Remove one owner from the selection.
    pub fn deselect(&mut self, owner: &str) {
        if self.selected.remove(owner.trim()) {
            self.events.emit(&AuthorEvent::SelectionChanged);
        }
    }

    /// Snapshot for persistence. The unknown author is implicit.
    pub fn to_settings(&self) -> AuthorSettings {
        AuthorSettings {
            authors: self
                .authors
                .iter()
                .filter(|a| a.as_str() != UNKNOWN_AUTHOR)
                .cloned()
                .collect(),
            active: (self.active != UNKNOWN_AUTHOR).then(|| self.active.clone()),
            selected: self.selected.iter().cloned().collect(),
        }
    }

    /// Rebuild a registry from persisted settings.
    ///
    /// Names that normalize to nothing are skipped; an active author that is
    /// not in the list falls back to the unknown author.
    pub fn from_settings(settings: &AuthorSettings) -> Self {
        let mut registry = Self::new();
        for name in &settings.authors {
            let normalized = normalize_author_name(name);
            if normalized.is_empty() {
                warn!(author = %name, "skipping author with empty normalized name");
                continue;
            }
            registry.authors.insert(normalized);
        }
        if let Some(active) = &settings.active {
            let normalized = normalize_author_name(active);
            if registry.authors.contains(&normalized) {
                registry.active = normalized;
            } else {
                warn!(author = %active, "active author is not registered");
            }
        }
        registry.selected = settings
            .selected
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        registry
    }
}
