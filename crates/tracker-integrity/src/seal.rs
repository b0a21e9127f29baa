//! Stamping authorship metadata and writing the integrity hash.

use chrono::{Local, NaiveDateTime, Timelike};
use tracing::debug;
use tracker_model::{AttributeKey, AttributeSet, ModelError};
use uuid::Uuid;

use crate::codec::IntegrityCodec;
use crate::error::Result;

/// Metadata written into fields that are still empty when sealing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealStamp {
    pub owner: String,
    pub date: NaiveDateTime,
    pub version: String,
    pub uuid: String,
}

impl SealStamp {
    /// Stamp for `owner` at the current local time with a fresh UUID.
    pub fn new(owner: impl Into<String>, version: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        Self {
            owner: owner.into(),
            date: now.with_nanosecond(0).unwrap_or(now),
            version: version.into(),
            uuid: Uuid::new_v4().to_string(),
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = date;
        self
    }

    #[must_use]
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }
}

impl IntegrityCodec {
    /// Fill missing tracking fields from `stamp` and write a fresh integrity
    /// hash. Fields that already carry a value are kept.
    ///
    /// Returns the written hash. The set must declare every tracking key.
    pub fn seal(&self, set: &mut AttributeSet, stamp: &SealStamp) -> Result<String> {
        if let Some(missing) = AttributeKey::TRACKING
            .into_iter()
            .find(|key| !set.contains(*key))
        {
            return Err(ModelError::unsupported(missing).into());
        }

        let current = set.tracking_record();
        if current.owner.is_none() {
            set.set(AttributeKey::Owner, stamp.owner.as_str())?;
        }
        if current.date.is_none() {
            set.set(AttributeKey::Date, stamp.date)?;
        }
        if current.version.is_none() {
            set.set(AttributeKey::Version, stamp.version.as_str())?;
        }
        if current.uuid.is_none() {
            set.set(AttributeKey::Uuid, stamp.uuid.as_str())?;
        }

        let digest = self.digest(&set.tracking_record());
        set.set(AttributeKey::Integrity, digest.as_str())?;
        debug!(owner = ?set.tracking_record().owner, "sealed tracking record");
        Ok(digest)
    }
}
