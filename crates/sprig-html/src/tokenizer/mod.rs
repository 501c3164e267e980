//! Markup tokenizer module.
//!
//! A reduced tag scanner for scraping: it recognizes start tags with quoted
//! attributes, end tags, and raw character data, and silently skips comments
//! and markup declarations. Everything it cannot make sense of is flagged
//! through the warning system and dropped, never raised.

/// Tokenizer state machine implementation.
pub mod core;
/// Helper methods for state transitions, input handling, and emission.
pub mod helpers;
/// Token types produced by the tokenizer.
pub mod token;

pub use core::{Tokenizer, TokenizerState};
pub use token::{Attribute, Token};
