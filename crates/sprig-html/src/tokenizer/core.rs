//! The tokenizer state machine.
//!
//! A deliberately small cousin of a conforming HTML tokenizer: one state per
//! scanning situation, one handler per state, a reconsume flag for "process
//! this character again in the new state". The machine never fails; at worst
//! it flags an anomaly, drops what it was scanning, and carries on.

use strum_macros::Display;

use super::token::Token;

/// The scanning states of the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Raw text between tags.
    Data,
    /// Just consumed `<`.
    TagOpen,
    /// Just consumed `</`.
    EndTagOpen,
    /// Inside a tag name.
    TagName,
    /// Just consumed `/` before the closing `>` of a tag.
    SelfClosingStartTag,
    /// Between the tag name (or a finished attribute) and the next
    /// attribute name.
    BeforeAttributeName,
    /// Inside an attribute name.
    AttributeName,
    /// After an attribute name, before knowing whether a value follows.
    AfterAttributeName,
    /// Just consumed `=`, before the attribute value.
    BeforeAttributeValue,
    /// Inside a double-quoted attribute value.
    AttributeValueDoubleQuoted,
    /// Inside a single-quoted attribute value.
    AttributeValueSingleQuoted,
    /// Inside an unquoted attribute value. Unsupported by policy: the value
    /// is consumed and the attribute dropped.
    AttributeValueUnquoted,
    /// Just finished a quoted attribute value.
    AfterAttributeValueQuoted,
    /// Just consumed `<!`; deciding between a comment and other markup
    /// declarations.
    MarkupDeclarationOpen,
    /// Inside `<!-- ... -->`; content is discarded.
    Comment,
    /// Consumed `-` inside a comment.
    CommentEndDash,
    /// Consumed `--` inside a comment; `>` ends it.
    CommentEnd,
    /// Inside a declaration or bogus tag being skipped up to `>`.
    BogusMarkup,
}

/// The markup tokenizer.
///
/// Feed it the whole input up front, call [`Tokenizer::run`], then take the
/// token stream with [`Tokenizer::into_tokens`].
pub struct Tokenizer {
    pub(super) state: TokenizerState,
    pub(super) input: String,
    pub(super) current_pos: usize,
    pub(super) current_input_character: Option<char>,
    pub(super) current_token: Option<Token>,
    pub(super) at_eof: bool,
    pub(super) token_stream: Vec<Token>,
    // When true, the next iteration of the main loop will not consume a new
    // character. "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,
}

impl Tokenizer {
    /// Create a new tokenizer for the given input. The initial state is the
    /// data state.
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            state: TokenizerState::Data,
            input,
            current_pos: 0,
            current_input_character: None,
            current_token: None,
            at_eof: false,
            token_stream: Vec::new(),
            reconsume: false,
        }
    }

    /// Run the state machine over the whole input. The stream always ends
    /// with an [`Token::EndOfFile`].
    pub fn run(&mut self) {
        while !self.at_eof {
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_input_character = self.consume();
            }
            match self.state {
                TokenizerState::Data => self.handle_data_state(),
                TokenizerState::TagOpen => self.handle_tag_open_state(),
                TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
                TokenizerState::TagName => self.handle_tag_name_state(),
                TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
                TokenizerState::AttributeName => self.handle_attribute_name_state(),
                TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
                TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.handle_attribute_value_quoted_state('"');
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.handle_attribute_value_quoted_state('\'');
                }
                TokenizerState::AttributeValueUnquoted => {
                    self.handle_attribute_value_unquoted_state();
                }
                TokenizerState::AfterAttributeValueQuoted => {
                    self.handle_after_attribute_value_quoted_state();
                }
                TokenizerState::MarkupDeclarationOpen => {
                    self.handle_markup_declaration_open_state();
                }
                TokenizerState::Comment => self.handle_comment_state(),
                TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
                TokenizerState::CommentEnd => self.handle_comment_end_state(),
                TokenizerState::BogusMarkup => self.handle_bogus_markup_state(),
            }
        }
    }

    /// Consume the tokenizer and return the token stream.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Raw text between tags. Everything except `<` is emitted verbatim as a
    /// character token; no character-reference decoding.
    fn handle_data_state(&mut self) {
        match self.current_input_character {
            Some('<') => {
                self.switch_to(TokenizerState::TagOpen);
            }
            None => {
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(c) => {
                self.emit_character_token(c);
            }
        }
    }

    fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // Comment or declaration; the handler peeks, so do not consume.
            Some('!') => {
                self.reconsume_in(TokenizerState::MarkupDeclarationOpen);
            }
            Some('/') => {
                self.switch_to(TokenizerState::EndTagOpen);
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // Processing instructions and similar junk: skip to `>`.
            Some('?') => {
                self.log_parse_error();
                self.reconsume_in(TokenizerState::BogusMarkup);
            }
            None => {
                self.log_parse_error();
                self.emit_character_token('<');
                self.emit_eof_token();
                self.at_eof = true;
            }
            // A lone `<` in text ("1 < 2"): keep it as a character.
            Some(_) => {
                self.log_parse_error();
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // `</>` has no name to close; drop it.
            Some('>') => {
                self.log_parse_error();
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.log_parse_error();
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(_) => {
                self.log_parse_error();
                self.reconsume_in(TokenizerState::BogusMarkup);
            }
        }
    }

    /// Tag names are kept byte-exact: start conditions and ignore sets
    /// compare by exact equality.
    fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_unterminated_tag();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_tag_name(c);
                }
            }
        }
    }

    fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                if let Some(ref mut token) = self.current_token {
                    token.set_self_closing();
                }
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_unterminated_tag();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(_) => {
                self.log_parse_error();
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_unterminated_tag();
                self.emit_eof_token();
                self.at_eof = true;
            }
            // A stray `=` before any name still starts an attribute, so the
            // scan stays aligned; the attribute is dropped later anyway.
            Some('=') => {
                self.log_parse_error();
                if let Some(ref mut token) = self.current_token {
                    token.start_new_attribute();
                    token.append_to_current_attribute_name('=');
                }
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                if let Some(ref mut token) = self.current_token {
                    token.start_new_attribute();
                }
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('=') => {
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some(c @ ('"' | '\'' | '<')) => {
                self.log_parse_error();
                if let Some(ref mut token) = self.current_token {
                    token.append_to_current_attribute_name(c);
                }
            }
            Some(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_current_attribute_name(c);
                }
            }
        }
    }

    /// Reached only with a pending name-only attribute. If no `=` follows,
    /// the attribute is valueless and gets dropped by policy.
    fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterAttributeName);
            }
            Some('=') => {
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some('/') => {
                self.discard_valueless_attribute();
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') => {
                self.discard_valueless_attribute();
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_unterminated_tag();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(_) => {
                self.discard_valueless_attribute();
                if let Some(ref mut token) = self.current_token {
                    token.start_new_attribute();
                }
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some('"') => {
                self.switch_to(TokenizerState::AttributeValueDoubleQuoted);
            }
            Some('\'') => {
                self.switch_to(TokenizerState::AttributeValueSingleQuoted);
            }
            // `key=>` has no value at all.
            Some('>') => {
                self.discard_valueless_attribute();
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_unterminated_tag();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(_) => {
                self.reconsume_in(TokenizerState::AttributeValueUnquoted);
            }
        }
    }

    /// Both quoted value states share one handler; only the terminating
    /// quote differs. A `>` inside the quotes is ordinary value content, so
    /// the tag scan runs to the matching `>` after the closing quote.
    fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => {
                self.switch_to(TokenizerState::AfterAttributeValueQuoted);
            }
            None => {
                self.log_unterminated_tag();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(c) => {
                if let Some(ref mut token) = self.current_token {
                    token.append_to_current_attribute_value(c);
                }
            }
        }
    }

    /// Unquoted values are unsupported: the characters are consumed to keep
    /// the scan aligned, then the whole attribute is dropped.
    fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.discard_unquoted_value();
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('>') => {
                self.discard_unquoted_value();
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_unterminated_tag();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(_) => {}
        }
    }

    fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.log_unterminated_tag();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(_) => {
                self.log_parse_error();
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// Entered on `<!` with the `!` as current character. Comments get their
    /// own states so an embedded `>` does not end them early; anything else
    /// (doctypes, CDATA) is skipped to the next `>`.
    fn handle_markup_declaration_open_state(&mut self) {
        if self.next_few_characters_are("--") {
            self.consume_string("--");
            self.switch_to(TokenizerState::Comment);
        } else {
            self.switch_to(TokenizerState::BogusMarkup);
        }
    }

    fn handle_comment_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::CommentEndDash);
            }
            None => {
                self.log_parse_error();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(_) => {}
        }
    }

    fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::CommentEnd);
            }
            None => {
                self.log_parse_error();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(_) => {
                self.switch_to(TokenizerState::Comment);
            }
        }
    }

    fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
            }
            // `--->`: stay here until the `>`.
            Some('-') => {
                self.switch_to(TokenizerState::CommentEnd);
            }
            None => {
                self.log_parse_error();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(_) => {
                self.switch_to(TokenizerState::Comment);
            }
        }
    }

    fn handle_bogus_markup_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.log_parse_error();
                self.emit_eof_token();
                self.at_eof = true;
            }
            Some(_) => {}
        }
    }
}
