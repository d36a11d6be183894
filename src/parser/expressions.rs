//! Expression parsing implementation
//!
//! This module handles parsing of C-minus expressions by recursive descent,
//! one method per precedence level.
//!
//! # Precedence
//!
//! From loosest to tightest:
//!
//! - Assignment `=` (right-associative, target is a simple or indexed variable)
//! - Relational `<`, `==`, `<=` (non-chaining)
//! - Additive `+`, `-` (left-associative)
//! - Multiplicative `*` (left-associative)
//! - Primary: `( expr )`, variable, call, number
//!
//! An expression that starts with a variable is parsed variable first; the
//! variable then becomes either an assignment target or the leftmost operand.
//! The `primary` arguments below carry that operand down the levels.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`AstSynthesizer`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::AstSynthesizer;

impl AstSynthesizer<'_> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.nested(Self::parse_assignment)
    }

    fn parse_assignment(&mut self) -> Option<Expr> {
        if self.check_kind(TokenKind::Id) && self.peek_ahead(1).lexeme != "(" {
            let var = self.parse_var()?;
            if self.match_token("=") {
                let value = self.parse_expression()?;
                return Some(Expr::Assign {
                    target: var,
                    value: Box::new(value),
                });
            }
            return self.parse_simple_expression(Some(Expr::Var(var)));
        }

        self.parse_simple_expression(None)
    }

    fn parse_simple_expression(&mut self, primary: Option<Expr>) -> Option<Expr> {
        let left = self.parse_additive(primary)?;

        match self.binary_operator(&[BinOp::Lt, BinOp::Eq, BinOp::Le]) {
            Some(op) => {
                self.advance();
                let right = self.parse_additive(None)?;
                Some(Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            None => Some(left),
        }
    }

    fn parse_additive(&mut self, primary: Option<Expr>) -> Option<Expr> {
        let mut expr = self.parse_term(primary)?;

        while let Some(op) = self.binary_operator(&[BinOp::Add, BinOp::Sub]) {
            // Each operator deepens the left-nested tree.
            self.descend()?;
            self.advance();
            let right = self.parse_term(None)?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Some(expr)
    }

    fn parse_term(&mut self, primary: Option<Expr>) -> Option<Expr> {
        let mut expr = match primary {
            Some(expr) => expr,
            None => self.parse_factor()?,
        };

        while self.check("*") {
            self.descend()?;
            self.advance();
            let right = self.parse_factor()?;
            expr = Expr::Binary {
                op: BinOp::Mul,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Some(expr)
    }

    fn parse_factor(&mut self) -> Option<Expr> {
        if self.match_token("(") {
            let expr = self.parse_expression()?;
            self.expect_token(")")?;
            return Some(expr);
        }

        if self.check_kind(TokenKind::Id) {
            if self.peek_ahead(1).lexeme == "(" {
                return self.parse_call();
            }
            return self.parse_var().map(Expr::Var);
        }

        if self.check_kind(TokenKind::Num) {
            let literal = self.peek().lexeme.clone();
            self.advance();
            return Some(Expr::Num(literal));
        }

        self.error_at_current();
        None
    }

    /// Parse `ID` or `ID [ expr ]`
    fn parse_var(&mut self) -> Option<Var> {
        let (name, line) = self.expect_identifier()?;

        if self.match_token("[") {
            let index = self.parse_expression()?;
            self.expect_token("]")?;
            return Some(Var::Array {
                name,
                index: Box::new(index),
                line,
            });
        }

        Some(Var::Simple { name, line })
    }

    /// Parse `ID ( args )`
    fn parse_call(&mut self) -> Option<Expr> {
        let (name, line) = self.expect_identifier()?;
        self.expect_token("(")?;

        let mut args = Vec::new();
        if !self.check(")") {
            args.push(self.parse_expression()?);
            while self.match_token(",") {
                args.push(self.parse_expression()?);
            }
        }
        self.expect_token(")")?;

        Some(Expr::Call { name, args, line })
    }

    /// The lookahead as one of `ops`, without consuming it.
    fn binary_operator(&self, ops: &[BinOp]) -> Option<BinOp> {
        let token = self.peek();
        if token.kind != TokenKind::Symbol {
            return None;
        }
        BinOp::from_lexeme(&token.lexeme).filter(|op| ops.contains(op))
    }
}
