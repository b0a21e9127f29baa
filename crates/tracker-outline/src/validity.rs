//! Per-node ownership and integrity predicates.

use serde::Serialize;
use tracker_authors::AuthorRegistry;
use tracker_integrity::{IntegrityCodec, IntegrityStatus};
use tracker_model::{AttributeRecord, ElementRef, HierarchySource};

/// Validity of one outline node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeValidity {
    pub owner_valid: bool,
    pub integrity: IntegrityStatus,
}

impl NodeValidity {
    /// Validity of an element with no tracking data.
    pub const NEUTRAL: Self = Self {
        owner_valid: true,
        integrity: IntegrityStatus::NotApplicable,
    };

    /// Whether a reviewer should look at this node.
    pub fn is_flagged(&self) -> bool {
        !self.owner_valid || self.integrity.is_invalid()
    }
}

impl Default for NodeValidity {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Evaluates records against the author selection and integrity codec.
///
/// Nothing is cached and nothing is rolled up from descendants.
#[derive(Debug, Clone, Copy)]
pub struct ValidityAggregator<'a> {
    authors: &'a AuthorRegistry,
    codec: &'a IntegrityCodec,
}

impl<'a> ValidityAggregator<'a> {
    pub fn new(authors: &'a AuthorRegistry, codec: &'a IntegrityCodec) -> Self {
        Self { authors, codec }
    }

    /// True without an owner; otherwise the owner must be selected.
    pub fn owner_valid(&self, record: &AttributeRecord) -> bool {
        record
            .owner
            .as_deref()
            .is_none_or(|owner| self.authors.is_selected(owner))
    }

    pub fn integrity(&self, record: &AttributeRecord) -> IntegrityStatus {
        self.codec.verify(record)
    }

    pub fn evaluate(&self, record: &AttributeRecord) -> NodeValidity {
        NodeValidity {
            owner_valid: self.owner_valid(record),
            integrity: self.integrity(record),
        }
    }

    /// Validity of an element; neutral if it no longer exists.
    pub fn evaluate_element<S>(&self, source: &S, element: ElementRef) -> NodeValidity
    where
        S: HierarchySource + ?Sized,
    {
        source
            .tracking_record(element)
            .map(|record| self.evaluate(&record))
            .unwrap_or_default()
    }
}
