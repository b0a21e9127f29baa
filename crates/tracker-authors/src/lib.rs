//! Author identities for the design tracker.
//!
//! An [`AuthorRegistry`] keeps the set of known authors (names normalized to
//! lower-case ASCII), the active author used when sealing, and a selection of
//! owners that the outline treats as authorized.

mod error;
mod normalize;
mod registry;
mod settings;

pub use error::{AuthorError, Result};
pub use normalize::normalize_author_name;
pub use registry::{AuthorEvent, AuthorRegistry, UNKNOWN_AUTHOR};
pub use settings::{AUTHOR_LIST_SEPARATOR, AuthorSettings, format_author_list, parse_author_list};
