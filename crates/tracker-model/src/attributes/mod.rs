//! Enum-keyed attribute storage.
//!
//! Provides:
//! - `AttributeKey` / `AttributeKind` - the closed set of attribute keys
//! - `AttributeValue` - typed values, tagged by kind
//! - `AttributeSet` - declared keys plus current values
//! - `AttributeRecord` - the five tracking fields used for validity

mod key;
mod record;
mod set;
mod value;

pub use key::{AttributeKey, AttributeKind};
pub use record::AttributeRecord;
pub use set::AttributeSet;
pub use value::{AttributeValue, Direction, TIMESTAMP_FORMAT, format_timestamp, parse_timestamp};
