//! Live hierarchical outline of an instantiated design.
//!
//! The outline mirrors the hierarchy graph as a lazily loaded tree of
//! circuit and component nodes, kept current by structural and attribute
//! events. Each node carries an ownership/integrity overlay computed on
//! demand from its tracking record.
//!
//! - `tree` - node arena and the `Unloaded | Loaded` state
//! - `ordering` - deterministic child ordering
//! - `engine` - [`TreeSyncEngine`]: loading, reloading, notifications
//! - `path` - [`PathResolver`]: state to outline path without loading
//! - `validity` - per-node owner and integrity predicates
//! - `model` - read-only presentation queries
//! - `session` - [`OutlineSession`]: single-owner event pump
//! - `owners` - owner discovery over the whole graph
//!
//! # Example
//!
//! ```ignore
//! use tracker_outline::{OutlineConfig, OutlineSession};
//!
//! let mut session = OutlineSession::new(design, root, authors, codec, OutlineConfig::default());
//! session.expand_to_depth(None)?;
//! let model = session.model();
//! for index in 0..model.child_count(model.root()) {
//!     let node = model.child(model.root(), index).unwrap();
//!     println!("{}", model.label(node).unwrap_or_default());
//! }
//! ```

mod config;
mod engine;
mod error;
mod model;
mod ordering;
mod owners;
mod path;
mod session;
mod tree;
mod validity;

pub use config::OutlineConfig;
pub use engine::{OutlineEvent, TreeSyncEngine};
pub use error::{OutlineError, Result};
pub use model::{IconKey, OutlineModel};
pub use ordering::{Category, SortKey, display_name};
pub use owners::discover_owners;
pub use path::PathResolver;
pub use session::{OutlineSession, PumpReport};
pub use tree::{CircuitNode, ComponentNode, LoadState, NodeId, NodeKind, OutlineNode, OutlineTree};
pub use validity::{NodeValidity, ValidityAggregator};
