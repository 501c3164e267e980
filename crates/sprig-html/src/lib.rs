//! Streaming markup tokenizer and forest builder for the Sprig scraping
//! parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** - a character-driven state machine turning markup text
//!   into start-tag, end-tag, and character tokens. Attribute values must be
//!   quoted; unquoted and valueless attributes are dropped with a warning.
//!   Comments and markup declarations are skipped outright.
//! - **Forest Builder** - tree construction over the token stream: nesting,
//!   void elements, inline-text accumulation, ignore-set suppression, and
//!   segmentation of one input into multiple independent [`Tree`]s governed
//!   by a [`StartCondition`].
//!
//! This is a best-effort scraping parser, not a conforming HTML
//! implementation: character references are not decoded, tag names are kept
//! byte-exact, and malformed input degrades to partial results instead of
//! failing.

/// Tree construction over the token stream.
pub mod builder;
/// Markup tokenizer for converting input into tokens.
pub mod tokenizer;

use std::io::{self, Read};

pub use builder::{ForestBuilder, StartCondition};
pub use sprig_dom::Tree;
pub use tokenizer::{Attribute, Token, Tokenizer};

/// Scan `markup` once and return the forest of completed trees, in input
/// order.
///
/// `start` selects which tag seeds each tree's root; `ignored_tags` are
/// dropped outright together with everything nested inside them. Malformed
/// input never fails the call: the scan degrades to whatever trees were
/// completed.
#[must_use]
pub fn build_forest(markup: &str, start: StartCondition, ignored_tags: &[&str]) -> Vec<Tree> {
    let mut tokenizer = Tokenizer::new(markup.to_string());
    tokenizer.run();
    ForestBuilder::new(tokenizer.into_tokens(), start, ignored_tags).run()
}

/// Read all markup from `reader` and build the forest from it.
///
/// # Errors
///
/// Returns the underlying I/O error if the reader fails or the content is
/// not valid UTF-8.
pub fn build_forest_from_reader<R: Read>(
    mut reader: R,
    start: StartCondition,
    ignored_tags: &[&str],
) -> io::Result<Vec<Tree>> {
    let mut markup = String::new();
    let _ = reader.read_to_string(&mut markup)?;
    Ok(build_forest(&markup, start, ignored_tags))
}
