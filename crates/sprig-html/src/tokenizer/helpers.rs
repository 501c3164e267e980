//! Helper methods for the tokenizer.
//!
//! Groups the machinery the state handlers lean on: state transitions,
//! input consumption and lookahead, token emission, and the policy helpers
//! that drop unsupported attribute syntax with a warning.

use sprig_common::warning::warn_once;

use super::core::{Tokenizer, TokenizerState};
use super::token::Token;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl Tokenizer {
    /// Transition to a new state. The next character will be consumed on the
    /// next iteration of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// Transition to a new state without consuming the current character;
    /// the same character is processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl Tokenizer {
    /// Return the character at the current position and advance past it, or
    /// `None` at end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        if let Some(c) = self.input[self.current_pos..].chars().next() {
            self.current_pos += c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    /// Peek at the codepoint `offset` positions ahead without consuming.
    #[must_use]
    pub(super) fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// Check whether the upcoming characters match `target` exactly.
    #[must_use]
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        target
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek_codepoint(i) == Some(expected))
    }

    /// Advance past `target`. The caller must have verified with
    /// [`Tokenizer::next_few_characters_are`] that it is present; safe for
    /// the ASCII markers this tokenizer looks for.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// Whitespace inside tags: space, tab, line feed, form feed, and
    /// carriage return (pages with CRLF endings are common in the wild).
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C' | '\r')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl Tokenizer {
    /// Emit the current tag token into the output stream.
    pub(super) fn emit_token(&mut self) {
        if let Some(token) = self.current_token.take() {
            self.token_stream.push(token);
        }
    }

    /// Emit a character token directly, bypassing `current_token`.
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.token_stream.push(Token::new_character(c));
    }

    /// Emit the end-of-file token.
    pub(super) fn emit_eof_token(&mut self) {
        self.token_stream.push(Token::new_eof());
    }
}

// =============================================================================
// Attribute Policy Helpers
// =============================================================================

impl Tokenizer {
    /// Drop the pending attribute because no `=value` followed its name.
    pub(super) fn discard_valueless_attribute(&mut self) {
        warn_once(
            "Tokenizer",
            "valueless attribute dropped (only key=\"value\" pairs are kept)",
        );
        if let Some(ref mut token) = self.current_token {
            token.remove_current_attribute();
        }
    }

    /// Drop the pending attribute because its value was not quoted.
    pub(super) fn discard_unquoted_value(&mut self) {
        warn_once(
            "Tokenizer",
            "unquoted attribute value dropped (only key=\"value\" pairs are kept)",
        );
        if let Some(ref mut token) = self.current_token {
            token.remove_current_attribute();
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl Tokenizer {
    /// Flag a recoverable scanning anomaly. Anomalies are never fatal: the
    /// machine drops the confusing construct and keeps scanning.
    pub(super) fn log_parse_error(&self) {
        let pos = self.current_pos;
        warn_once("Tokenizer", &format!("parse error at position {pos}"));
    }

    /// Flag the malformed-tag condition: input ended inside a tag. The
    /// partial token is discarded and the scan truncates.
    pub(super) fn log_unterminated_tag(&self) {
        let pos = self.current_pos;
        warn_once(
            "Tokenizer",
            &format!("unterminated tag at end of input (position {pos}), scan truncated"),
        );
    }
}
