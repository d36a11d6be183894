//! Statement parsing implementation
//!
//! This module handles parsing of all C-minus statement types:
//!
//! - Compound statements: `{ declarations statements }`
//! - Selection: `if ( expr ) stmt [ else stmt ]`
//! - Iteration: `repeat stmt until ( expr )`
//! - Jumps: `return [expr] ;`, `break ;`
//! - Expression and empty statements
//!
//! # Grammar
//!
//! ```text
//! statement ::= compound_stmt | if_stmt | repeat_stmt | return_stmt
//!             | "break" ";" | ";" | expression ";"
//! ```
//!
//! `else` binds to the nearest `if`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`AstSynthesizer`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::AstSynthesizer;

impl AstSynthesizer<'_> {
    /// Parse `{ declarations statements }`
    pub(crate) fn parse_compound_stmt(&mut self) -> Option<CompoundStmt> {
        self.expect_token("{")?;
        let declarations = self.parse_declaration_list();
        let statements = self.parse_statement_list();
        self.expect_terminator("}");

        Some(CompoundStmt {
            declarations,
            statements,
        })
    }

    /// Parse statements while the lookahead can start one
    fn parse_statement_list(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while self.starts_statement() {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
        }
        statements
    }

    fn starts_statement(&self) -> bool {
        const FIRST: [&str; 7] = ["if", "repeat", "return", "break", ";", "{", "("];
        FIRST.iter().any(|lexeme| self.check(lexeme))
            || self.check_kind(TokenKind::Id)
            || self.check_kind(TokenKind::Num)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        self.nested(Self::parse_statement_kind)
    }

    fn parse_statement_kind(&mut self) -> Option<Stmt> {
        if self.check("{") {
            return self.parse_compound_stmt().map(Stmt::Compound);
        }

        if self.match_token("if") {
            return self.parse_if_statement();
        }

        if self.match_token("repeat") {
            return self.parse_repeat_statement();
        }

        if self.match_token("return") {
            return self.parse_return_statement();
        }

        if self.check("break") {
            let line = self.peek().line;
            self.advance();
            self.expect_semicolon();
            return Some(Stmt::Break { line });
        }

        if self.match_token(";") {
            return Some(Stmt::Empty);
        }

        let expr = self.parse_expression()?;
        self.expect_semicolon();
        Some(Stmt::Expr(expr))
    }

    fn parse_if_statement(&mut self) -> Option<Stmt> {
        self.expect_token("(")?;
        let condition = self.parse_expression()?;
        self.expect_token(")")?;
        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.match_token("else") {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Some(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_repeat_statement(&mut self) -> Option<Stmt> {
        let body = Box::new(self.parse_statement()?);
        self.expect_token("until")?;
        self.expect_token("(")?;
        let condition = self.parse_expression()?;
        self.expect_token(")")?;

        Some(Stmt::Repeat { body, condition })
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        if self.match_token(";") {
            return Some(Stmt::Return(None));
        }

        let value = self.parse_expression()?;
        self.expect_semicolon();
        Some(Stmt::Return(Some(value)))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::errors::SyntaxError;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::synthesize;

    fn body(statements: &str) -> (Vec<Stmt>, Vec<SyntaxError>) {
        let source = format!("void main(void) {{ {} }}", statements);
        let (tokens, _) = Lexer::tokenize(&source);
        let tokens: Vec<_> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        let synthesis = synthesize(&tokens);
        let statements = match synthesis.program.declarations.into_iter().next() {
            Some(Declaration::Fun { body, .. }) => body.statements,
            _ => Vec::new(),
        };
        (statements, synthesis.errors)
    }

    #[test]
    fn test_if_else() {
        let (statements, errors) = body("if (x < 1) y = 1; else y = 2;");

        assert!(errors.is_empty(), "{:?}", errors);
        match &statements[0] {
            Stmt::If {
                condition,
                else_branch,
                ..
            } => {
                assert!(matches!(condition, Expr::Binary { op: BinOp::Lt, .. }));
                assert!(else_branch.is_some());
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_dangling_else_binds_inner() {
        let (statements, errors) = body("if (a) if (b) x = 1; else x = 2;");

        assert!(errors.is_empty());
        match &statements[0] {
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert!(else_branch.is_none());
                assert!(matches!(
                    then_branch.as_ref(),
                    Stmt::If { else_branch: Some(_), .. }
                ));
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_until() {
        let (statements, errors) = body("repeat { x = x + 1; break; } until (x == 10)");

        assert!(errors.is_empty(), "{:?}", errors);
        match &statements[0] {
            Stmt::Repeat { body, condition } => {
                assert!(matches!(condition, Expr::Binary { op: BinOp::Eq, .. }));
                match body.as_ref() {
                    Stmt::Compound(block) => {
                        assert_eq!(block.statements.len(), 2);
                        assert!(matches!(block.statements[1], Stmt::Break { line: 1 }));
                    }
                    other => panic!("Expected compound body, got {:?}", other),
                }
            }
            other => panic!("Expected repeat statement, got {:?}", other),
        }
    }

    #[test]
    fn test_return_and_empty() {
        let (statements, errors) = body("return; ; return x;");

        assert!(errors.is_empty());
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0], Stmt::Return(None));
        assert_eq!(statements[1], Stmt::Empty);
        assert!(matches!(statements[2], Stmt::Return(Some(_))));
    }

    #[test]
    fn test_local_declarations() {
        let source = "void main(void) { int i; int b[2]; i = 0; }";
        let (tokens, _) = Lexer::tokenize(source);
        let tokens: Vec<_> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        let synthesis = synthesize(&tokens);

        match &synthesis.program.declarations[0] {
            Declaration::Fun { body, .. } => {
                assert_eq!(body.declarations.len(), 2);
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_broken_statement_is_dropped() {
        let (statements, errors) = body("if (x ; y = 2;");

        assert_eq!(errors, vec![SyntaxError::missing(1, ")")]);
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Stmt::Expr(Expr::Assign { .. })));
    }
}
