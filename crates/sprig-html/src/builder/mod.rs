//! Forest construction module.

/// Forest builder implementation.
pub mod core;

pub use core::{ForestBuilder, StartCondition};
