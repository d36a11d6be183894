//! AST synthesizer coordinator
//!
//! This module provides the [`AstSynthesizer`] struct: a recursive descent
//! pass over the token trace recorded by the predictive parser. It is
//! independent of the concrete parse tree and builds the typed AST directly.
//!
//! # Synthesizer Architecture
//!
//! - This module: synthesizer state, helper methods, error recording
//! - `declarations`: variable, array and function declarations, parameters
//! - `statements`: compound, selection, iteration, return and expression statements
//! - `expressions`: assignment and the operator precedence levels
//!
//! # Error Handling
//!
//! A failed expectation records a positioned [`SyntaxError`] and synchronizes:
//! tokens are discarded up to one that can start or end a statement or
//! declaration, and a `;` or `}` found there is consumed. Only the first error
//! of each line is recorded. The construct being parsed is dropped, except that
//! a construct missing only its closing `;` or `}` is kept.
//!
//! Statements and expressions may nest at most [`MAX_NESTING_DEPTH`] levels.
//! Deeper input is reported once and skipped like any other error, which keeps
//! the recursion (and every later pass over the AST) within a bounded stack.

use crate::parser::ast::*;
use crate::parser::errors::{SyntaxError, SyntaxErrorKind};
use crate::parser::lexer::{Token, TokenKind};

/// Lexemes that stop synchronization.
pub const SYNC_LEXEMES: [&str; 11] = [
    ";", "{", "}", "if", "repeat", "return", "int", "void", "else", "until", "$",
];

/// Deepest nesting of statements and expressions accepted.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Result of one synthesis pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub program: Program,
    pub errors: Vec<SyntaxError>,
}

/// Recursive descent AST builder over a token trace
pub struct AstSynthesizer<'a> {
    pub(crate) tokens: &'a [Token],
    pub(crate) position: usize,
    end: Token,
    errors: Vec<SyntaxError>,
    last_error_line: Option<usize>,
    depth: usize,
}

impl<'a> AstSynthesizer<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let end_line = tokens.last().map_or(0, |t| t.line);
        Self {
            tokens,
            position: 0,
            end: Token::eof(end_line),
            errors: Vec::new(),
            last_error_line: None,
            depth: 0,
        }
    }

    /// Parse the whole trace.
    pub fn synthesize(mut self) -> Synthesis {
        let program = self.parse_program();
        log::debug!(
            "synthesized {} top-level declarations with {} errors",
            program.declarations.len(),
            self.errors.len()
        );
        Synthesis {
            program,
            errors: self.errors,
        }
    }

    fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        loop {
            program.declarations.extend(self.parse_declaration_list());
            if self.is_at_end() {
                break;
            }
            let before = self.position;
            let leftover = self.peek().to_string();
            self.error(SyntaxErrorKind::Unexpected(leftover));
            if self.position == before {
                self.advance();
            }
        }

        program
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.end)
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> &Token {
        self.tokens.get(self.position + n).unwrap_or(&self.end)
    }

    pub(crate) fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    pub(crate) fn check(&self, lexeme: &str) -> bool {
        let token = self.peek();
        !token.is_eof() && token.lexeme == lexeme
    }

    pub(crate) fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn match_token(&mut self, lexeme: &str) -> bool {
        if self.check(lexeme) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn is_type_keyword(&self) -> bool {
        self.check("int") || self.check("void")
    }

    /// Consumes `lexeme` or records it as missing.
    pub(crate) fn expect_token(&mut self, lexeme: &str) -> Option<()> {
        if self.match_token(lexeme) {
            Some(())
        } else {
            self.error(SyntaxErrorKind::Missing(lexeme.to_string()));
            None
        }
    }

    /// Like [`Self::expect_token`] for a closing `;` or `}`; the caller keeps
    /// its node either way.
    pub(crate) fn expect_terminator(&mut self, lexeme: &str) {
        if !self.match_token(lexeme) {
            self.error(SyntaxErrorKind::Missing(lexeme.to_string()));
        }
    }

    pub(crate) fn expect_semicolon(&mut self) {
        self.expect_terminator(";");
    }

    pub(crate) fn expect_identifier(&mut self) -> Option<(String, usize)> {
        if self.check_kind(TokenKind::Id) {
            let token = self.peek();
            let found = (token.lexeme.clone(), token.line);
            self.advance();
            Some(found)
        } else {
            self.error(SyntaxErrorKind::Missing("ID".to_string()));
            None
        }
    }

    /// Records the current token as out of place.
    pub(crate) fn error_at_current(&mut self) {
        let kind = if self.is_at_end() {
            SyntaxErrorKind::UnexpectedEof
        } else {
            SyntaxErrorKind::Illegal(self.peek().to_string())
        };
        self.error(kind);
    }

    /// Runs `parse` one nesting level deeper.
    pub(crate) fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let depth = self.depth;
        self.descend()?;
        let parsed = parse(self);
        self.depth = depth;
        parsed
    }

    /// Enters one more nesting level. Past the limit the error is recorded and
    /// at least one token is skipped, so callers looping on the same token
    /// still make progress.
    pub(crate) fn descend(&mut self) -> Option<()> {
        if self.depth < MAX_NESTING_DEPTH {
            self.depth += 1;
            return Some(());
        }
        let before = self.position;
        self.error(SyntaxErrorKind::TooDeep(MAX_NESTING_DEPTH));
        if self.position == before {
            self.advance();
        }
        None
    }

    pub(crate) fn error(&mut self, kind: SyntaxErrorKind) {
        let line = self.peek().line;
        if self.last_error_line != Some(line) {
            log::debug!("synthesizer error at line {}: {}", line, kind);
            self.errors.push(SyntaxError { line, kind });
            self.last_error_line = Some(line);
        }
        self.synchronize();
    }

    fn synchronize(&mut self) {
        while !self.is_at_end() && !SYNC_LEXEMES.contains(&self.peek().lexeme.as_str()) {
            self.advance();
        }
        if self.check(";") || self.check("}") {
            self.advance();
        }
    }
}

/// Convenience wrapper: synthesize an AST from a token trace.
pub fn synthesize(tokens: &[Token]) -> Synthesis {
    AstSynthesizer::new(tokens).synthesize()
}
