//! Library side of the `tracker` binary.

pub mod config;
pub mod design;
pub mod logging;
pub mod render;
