//! Attribute set: a declared key list plus current values.

use std::collections::BTreeMap;

use super::key::AttributeKey;
use super::record::AttributeRecord;
use super::value::AttributeValue;
use crate::error::{ModelError, Result};
use crate::events::AttributeEvent;

/// Attribute storage for one element.
///
/// Every set carries the list of keys its element supports. Reading or
/// writing a key outside that list is rejected instead of silently ignored.
/// Mutations return the change event they produced, if any, so the owner can
/// forward it to listeners.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeSet {
    declared: Vec<AttributeKey>,
    values: BTreeMap<AttributeKey, AttributeValue>,
}

impl AttributeSet {
    /// Create a set supporting exactly the given keys.
    pub fn new(declared: impl IntoIterator<Item = AttributeKey>) -> Self {
        let mut keys: Vec<AttributeKey> = Vec::new();
        for key in declared {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Self {
            declared: keys,
            values: BTreeMap::new(),
        }
    }

    /// Attribute table of a leaf component.
    pub fn for_component() -> Self {
        let mut keys = vec![AttributeKey::Facing, AttributeKey::Label];
        keys.extend(AttributeKey::TRACKING);
        Self::new(keys)
    }

    /// Static attribute table of a circuit definition.
    pub fn for_circuit() -> Self {
        let mut keys = vec![AttributeKey::CircuitName, AttributeKey::Label];
        keys.extend(AttributeKey::TRACKING);
        Self::new(keys)
    }

    /// Declared keys, in declaration order.
    pub fn attributes(&self) -> &[AttributeKey] {
        &self.declared
    }

    pub fn contains(&self, key: AttributeKey) -> bool {
        self.declared.contains(&key)
    }

    fn check_declared(&self, key: AttributeKey) -> Result<()> {
        if self.contains(key) {
            Ok(())
        } else {
            Err(ModelError::unsupported(key))
        }
    }

    /// Current value of a declared key.
    pub fn get(&self, key: AttributeKey) -> Result<Option<&AttributeValue>> {
        self.check_declared(key)?;
        Ok(self.values.get(&key))
    }

    /// Current text of a declared text key.
    pub fn text(&self, key: AttributeKey) -> Result<Option<&str>> {
        Ok(self.get(key)?.and_then(AttributeValue::as_text))
    }

    /// Write a value. Writing an equal value is a no-op and yields no event.
    pub fn set(
        &mut self,
        key: AttributeKey,
        value: impl Into<AttributeValue>,
    ) -> Result<Option<AttributeEvent>> {
        self.check_declared(key)?;
        let value = value.into();
        if value.kind() != key.kind() {
            return Err(ModelError::AttributeKindMismatch {
                key,
                expected: key.kind(),
                found: value.kind(),
            });
        }
        if self.values.get(&key) == Some(&value) {
            return Ok(None);
        }
        let old = self.values.insert(key, value.clone());
        Ok(Some(AttributeEvent::ValueChanged {
            key,
            old,
            new: Some(value),
        }))
    }

    /// Remove the value of a declared key.
    pub fn clear(&mut self, key: AttributeKey) -> Result<Option<AttributeEvent>> {
        self.check_declared(key)?;
        Ok(self.values.remove(&key).map(|old| AttributeEvent::ValueChanged {
            key,
            old: Some(old),
            new: None,
        }))
    }

    /// Add a key to the declared list.
    pub fn declare(&mut self, key: AttributeKey) -> Option<AttributeEvent> {
        if self.contains(key) {
            return None;
        }
        self.declared.push(key);
        Some(AttributeEvent::ListChanged)
    }

    /// Remove a key from the declared list, dropping its value.
    pub fn undeclare(&mut self, key: AttributeKey) -> Option<AttributeEvent> {
        let before = self.declared.len();
        self.declared.retain(|k| *k != key);
        if self.declared.len() == before {
            return None;
        }
        self.values.remove(&key);
        Some(AttributeEvent::ListChanged)
    }

    /// Non-blank `Label` text, if declared and set.
    pub fn display_label(&self) -> Option<String> {
        self.values
            .get(&AttributeKey::Label)
            .and_then(AttributeValue::as_text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Extract the tracking fields.
    ///
    /// Undeclared keys and blank text both read as absent.
    pub fn tracking_record(&self) -> AttributeRecord {
        let text = |key: AttributeKey| {
            self.values
                .get(&key)
                .and_then(AttributeValue::as_text)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };
        AttributeRecord {
            owner: text(AttributeKey::Owner),
            date: self
                .values
                .get(&AttributeKey::Date)
                .and_then(AttributeValue::as_timestamp)
                .copied(),
            version: text(AttributeKey::Version),
            uuid: text(AttributeKey::Uuid),
            integrity: text(AttributeKey::Integrity),
        }
    }

    /// Events that turn `self` into `after`.
    pub fn diff(&self, after: &AttributeSet) -> Vec<AttributeEvent> {
        let mut events = Vec::new();
        if self.declared != after.declared {
            events.push(AttributeEvent::ListChanged);
        }
        for key in AttributeKey::ALL {
            let old = self.values.get(&key);
            let new = after.values.get(&key);
            if old != new {
                events.push(AttributeEvent::ValueChanged {
                    key,
                    old: old.cloned(),
                    new: new.cloned(),
                });
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::value::{Direction, parse_timestamp};

    #[test]
    fn test_undeclared_key_is_rejected() {
        let mut set = AttributeSet::new([AttributeKey::Label]);
        assert!(matches!(
            set.set(AttributeKey::Owner, "alice"),
            Err(ModelError::UnsupportedAttributeKey { .. })
        ));
        assert!(matches!(
            set.get(AttributeKey::Owner),
            Err(ModelError::UnsupportedAttributeKey { .. })
        ));
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let mut set = AttributeSet::for_component();
        let err = set.set(AttributeKey::Date, "yesterday").unwrap_err();
        assert!(matches!(err, ModelError::AttributeKindMismatch { .. }));
        assert!(set.set(AttributeKey::Facing, Direction::North).is_ok());
    }

    #[test]
    fn test_set_reports_change_once() {
        let mut set = AttributeSet::for_component();
        let event = set.set(AttributeKey::Label, "g1").unwrap();
        assert_eq!(
            event,
            Some(AttributeEvent::ValueChanged {
                key: AttributeKey::Label,
                old: None,
                new: Some("g1".into()),
            })
        );
        assert_eq!(set.set(AttributeKey::Label, "g1").unwrap(), None);
        assert_eq!(set.text(AttributeKey::Label).unwrap(), Some("g1"));
    }

    #[test]
    fn test_clear_and_declare() {
        let mut set = AttributeSet::new([AttributeKey::Label]);
        assert_eq!(set.clear(AttributeKey::Label).unwrap(), None);
        assert_eq!(set.declare(AttributeKey::Owner), Some(AttributeEvent::ListChanged));
        assert_eq!(set.declare(AttributeKey::Owner), None);
        set.set(AttributeKey::Owner, "bob").unwrap();
        assert_eq!(set.undeclare(AttributeKey::Owner), Some(AttributeEvent::ListChanged));
        assert!(!set.contains(AttributeKey::Owner));
    }

    #[test]
    fn test_tracking_record_treats_blank_as_absent() {
        let mut set = AttributeSet::for_component();
        set.set(AttributeKey::Owner, "  ").unwrap();
        set.set(AttributeKey::Version, "1.0").unwrap();
        let date = parse_timestamp("2024-01-02 03:04:05").unwrap();
        set.set(AttributeKey::Date, date).unwrap();

        let record = set.tracking_record();
        assert_eq!(record.owner, None);
        assert_eq!(record.version.as_deref(), Some("1.0"));
        assert_eq!(record.date, Some(date));
        assert_eq!(record.integrity, None);
    }

    #[test]
    fn test_diff() {
        let before = AttributeSet::for_component();
        let mut after = before.clone();
        after.set(AttributeKey::Owner, "alice").unwrap();
        after.declare(AttributeKey::CircuitName);

        let events = before.diff(&after);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], AttributeEvent::ListChanged);
        assert_eq!(events[1].key(), Some(AttributeKey::Owner));
    }
}
