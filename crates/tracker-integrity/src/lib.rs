//! Tamper evidence for design tracking metadata.
//!
//! A tracking record's owner, date, version and UUID are concatenated into a
//! canonical string, salted with a build-time constant and digested. The
//! stored `integrity` attribute is valid when it equals that digest.
//!
//! # Example
//!
//! ```ignore
//! use tracker_integrity::{IntegrityCodec, IntegrityConfig, IntegrityStatus};
//!
//! let codec = IntegrityCodec::new(&IntegrityConfig::default())?;
//! assert_eq!(codec.verify(&record), IntegrityStatus::Valid);
//! ```

mod algorithm;
mod codec;
mod config;
mod error;
mod seal;

pub use algorithm::DigestAlgorithm;
pub use codec::{BUILD_SALT, DEFAULT_SALT, IntegrityCodec, IntegrityStatus};
pub use config::IntegrityConfig;
pub use error::{IntegrityError, Result};
pub use seal::SealStamp;
