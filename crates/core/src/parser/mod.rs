//! Grammar parser: token stream to concrete syntax tree.
//!
//! Recursive descent over the block grammar. The parser never fails on
//! malformed input: every problem is recorded in the [`ErrorCollector`]
//! and the scan recovers at the enclosing block boundary, so callers
//! always get back a (possibly partial) [`Document`] plus an error list.

use crate::cst::Document;
use crate::error::{ErrorCollector, SyntaxError};
use crate::lexer::{Spanned, Token};

mod blocks;

pub(crate) struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    errors: &'a mut ErrorCollector,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Spanned], errors: &'a mut ErrorCollector) -> Self {
        Parser {
            tokens,
            pos: 0,
            errors,
        }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn advance(&mut self) -> &Spanned {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn is_word(&self, w: &str) -> bool {
        matches!(self.peek(), Token::Word(x) if x == w)
    }

    /// Record a syntax error at the current token.
    fn error(&mut self, message: impl Into<String>) {
        let (line, column) = {
            let s = self.cur();
            (s.line, s.column)
        };
        self.errors.record(SyntaxError::new(line, column, message));
    }

    /// Consume a `{`, or record an error naming the block that needed it.
    fn expect_lbrace(&mut self, context: &str) -> bool {
        if self.peek() == &Token::LBrace {
            self.advance();
            true
        } else {
            self.error(format!(
                "expected '{{' after '{}', got {}",
                context,
                self.peek().describe()
            ));
            false
        }
    }

    /// Consume a `}`, or record an error naming the unclosed block.
    fn expect_rbrace(&mut self, context: &str) -> bool {
        if self.peek() == &Token::RBrace {
            self.advance();
            true
        } else {
            self.error(format!(
                "expected '}}' to close '{}', got {}",
                context,
                self.peek().describe()
            ));
            false
        }
    }

    /// Skip tokens until a `}` at the current nesting level, leaving that
    /// `}` for the enclosing block loop to consume as its terminator.
    fn recover_to_rbrace(&mut self) {
        let mut depth: i32 = 0;
        loop {
            match self.peek() {
                Token::Eof => break,
                Token::LBrace => {
                    depth += 1;
                    self.advance();
                }
                Token::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}

/// Parse a token stream into a document tree.
///
/// Always returns a tree; malformed regions are absent from it and
/// described in the collector instead.
pub fn parse(tokens: &[Spanned], errors: &mut ErrorCollector) -> Document {
    let mut p = Parser::new(tokens, errors);
    p.parse_document()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
