//! Tree construction over the token stream.
//!
//! One left-to-right pass turns tokens into zero or more completed
//! [`Tree`]s. The builder owns all of the edge-case policy: which tag seeds
//! a root, which tags are void, which are suppressed, and how inline text is
//! accumulated and attached.

use std::collections::HashSet;

use sprig_common::warning::warn_once;
use sprig_dom::{AttributesMap, Tree};

use crate::tokenizer::{Attribute, Token};

/// Tags that never carry a separate closing tag: encountering one opens and
/// immediately closes a node in the same step.
const VOID_TAGS: [&str; 18] = [
    "area", "base", "br", "col", "command", "embed", "hr", "iframe", "img", "input", "keygen",
    "link", "menuitem", "meta", "param", "source", "track", "wbr",
];

/// Inline break tags: instead of resetting the accumulated text at the tag
/// boundary, they append a newline marker, so adjacent inline fragments
/// merge across them.
const BREAK_TAGS: [&str; 1] = ["br"];

fn is_void(name: &str) -> bool {
    VOID_TAGS.contains(&name)
}

fn is_break(name: &str) -> bool {
    BREAK_TAGS.contains(&name)
}

/// The rule deciding which start tag becomes a tree's root.
///
/// While the current tree has no root, every scanned start tag is tested
/// against this condition; non-matching tags are skipped shallowly (a
/// matching tag may be nested arbitrarily deep inside them). The condition
/// is re-evaluated after each completed tree, so one scan can seed many
/// trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StartCondition {
    /// The very first tag scanned becomes the root.
    #[default]
    FirstTag,
    /// Only a tag with this exact name becomes a root.
    TagName(String),
    /// Only a tag whose `class` attribute equals this exact value becomes a
    /// root.
    ClassValue(String),
}

impl StartCondition {
    fn matches(&self, name: &str, attributes: &AttributesMap) -> bool {
        match self {
            Self::FirstTag => true,
            Self::TagName(tag) => name == tag,
            Self::ClassValue(class) => attributes.get("class").is_some_and(|value| value == class),
        }
    }
}

/// Builds a forest of [`Tree`]s from a token stream.
///
/// Single pass, no suspension points, no shared state between runs;
/// concurrent builds on independent inputs need no coordination.
pub struct ForestBuilder {
    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// The active start condition.
    start: StartCondition,

    /// Tag names dropped outright, subtrees included.
    ignored: HashSet<String>,

    /// Completed trees, in input order.
    forest: Vec<Tree>,

    /// The tree currently under construction.
    current: Tree,

    /// One pending-text buffer per open scope; the top belongs to the
    /// cursor node. Attached to a node when it closes.
    text_scopes: Vec<String>,

    /// Stack of ignored tag names currently suppressing input. Same-name
    /// nesting pushes again so the matching close ends suppression.
    suppressed: Vec<String>,
}

impl ForestBuilder {
    /// Create a builder over a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>, start: StartCondition, ignored_tags: &[&str]) -> Self {
        Self {
            tokens,
            start,
            ignored: ignored_tags.iter().copied().map(String::from).collect(),
            forest: Vec::new(),
            current: Tree::new(),
            text_scopes: Vec::new(),
            suppressed: Vec::new(),
        }
    }

    /// Run the builder and return the forest.
    ///
    /// A tree is appended only once its root has been set, so trailing
    /// whitespace after the last close never yields a spurious empty tree.
    /// A tree left open at end of input (unbalanced markup) is still
    /// returned, flagged through the warning system.
    #[must_use]
    pub fn run(mut self) -> Vec<Tree> {
        let tokens = std::mem::take(&mut self.tokens);
        for token in tokens {
            // Once the previous tree has fully closed, the next token (of
            // any kind) flushes it and seeds a fresh one.
            self.flush_completed_tree();
            match token {
                Token::Character { data } => self.process_character(data),
                Token::StartTag {
                    name,
                    self_closing,
                    attributes,
                } => self.process_start_tag(name, self_closing, attributes),
                Token::EndTag { name, .. } => self.process_end_tag(&name),
                Token::EndOfFile => break,
            }
        }
        self.finish()
    }

    fn flush_completed_tree(&mut self) {
        if !self.current.is_open() {
            let finished = std::mem::take(&mut self.current);
            self.forest.push(finished);
            self.text_scopes.clear();
        }
    }

    /// Raw newlines are never accumulated; the only newline markers in a
    /// `"text"` attribute come from break tags.
    fn process_character(&mut self, data: char) {
        if data == '\n' || !self.suppressed.is_empty() {
            return;
        }
        if let Some(buffer) = self.text_scopes.last_mut() {
            buffer.push(data);
        }
    }

    fn process_start_tag(&mut self, name: String, self_closing: bool, attributes: Vec<Attribute>) {
        let childless = self_closing || is_void(&name);

        if !self.suppressed.is_empty() {
            // Only same-name nesting needs tracking; everything else inside
            // the suppressed region is dropped without bookkeeping.
            let same_name = self.suppressed.last().is_some_and(|active| *active == name);
            if same_name && !childless {
                self.suppressed.push(name);
            }
            return;
        }

        if self.ignored.contains(&name) {
            self.reset_text();
            if !childless {
                self.suppressed.push(name);
            }
            return;
        }

        let attributes = fold_attributes(attributes);

        if self.current.root().is_none() && !self.start.matches(&name, &attributes) {
            return;
        }

        if childless {
            let breaking = is_break(&name);
            let _ = self.current.append_void(name, attributes);
            if breaking {
                self.append_break();
            } else {
                self.reset_text();
            }
        } else {
            let _ = self.current.open_node(name, attributes);
            self.text_scopes.push(String::new());
        }
    }

    fn process_end_tag(&mut self, name: &str) {
        if !self.suppressed.is_empty() {
            if self.suppressed.last().is_some_and(|active| active == name) {
                let _ = self.suppressed.pop();
                self.reset_text();
            }
            return;
        }

        if self.ignored.contains(name) {
            // Stray close of an ignored tag: a boundary, but never a cursor
            // move.
            self.reset_text();
            return;
        }

        if self.current.root().is_some() && self.current.is_open() {
            let text = self.text_scopes.pop().unwrap_or_default();
            self.current.attach_text(text);
            self.current.close_node();
        } else if self.start == StartCondition::FirstTag {
            // With a tag-name or class condition, closes seen while hunting
            // for a root are expected. Unconditionally, they are a bracket
            // imbalance: flag and keep scanning.
            warn_once("Builder", &format!("closing tag </{name}> with no open scope, skipped"));
        }
    }

    fn finish(mut self) -> Vec<Tree> {
        if self.current.root().is_some() {
            if self.current.is_open() {
                warn_once("Builder", "unbalanced markup: input ended with open tags");
            }
            self.forest.push(self.current);
        }
        self.forest
    }

    fn reset_text(&mut self) {
        if let Some(buffer) = self.text_scopes.last_mut() {
            buffer.clear();
        }
    }

    fn append_break(&mut self) {
        if let Some(buffer) = self.text_scopes.last_mut() {
            buffer.push('\n');
        }
    }
}

/// Fold the tokenizer's attribute list into a map. Duplicate names resolve
/// to the last occurrence.
fn fold_attributes(attributes: Vec<Attribute>) -> AttributesMap {
    let mut map = AttributesMap::new();
    for attr in attributes {
        let _ = map.insert(attr.name, attr.value);
    }
    map
}
