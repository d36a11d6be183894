//! Declaration parsing implementation
//!
//! This module handles the declarations of a C-minus program:
//!
//! - Variables: `int x;`
//! - Arrays: `int a[10];`
//! - Functions: `void f(int x, int y[]) { ... }`
//!
//! # Grammar
//!
//! ```text
//! declaration ::= type ID ( var_tail | fun_tail )
//! var_tail    ::= ";" | "[" NUM "]" ";"
//! fun_tail    ::= "(" params ")" compound_stmt
//! params      ::= "void" | param ( "," param )*
//! param       ::= type ID ( "[" "]" )?
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`AstSynthesizer`] struct.

use crate::parser::ast::*;
use crate::parser::errors::SyntaxErrorKind;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::AstSynthesizer;

impl AstSynthesizer<'_> {
    /// Parse declarations while the lookahead is a type keyword
    pub(crate) fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        while self.is_type_keyword() {
            if let Some(declaration) = self.parse_declaration() {
                declarations.push(declaration);
            }
        }
        declarations
    }

    fn parse_declaration(&mut self) -> Option<Declaration> {
        let ty = self.parse_type_specifier()?;
        let (name, line) = self.expect_identifier()?;

        if self.check("(") {
            self.parse_fun_declaration(ty, name, line)
        } else {
            self.parse_var_declaration(ty, name, line)
        }
    }

    pub(crate) fn parse_type_specifier(&mut self) -> Option<TypeSpec> {
        let ty = TypeSpec::from_lexeme(&self.peek().lexeme);
        match ty {
            Some(ty) if self.check_kind(TokenKind::Keyword) => {
                self.advance();
                Some(ty)
            }
            _ => {
                self.error_at_current();
                None
            }
        }
    }

    fn parse_var_declaration(&mut self, ty: TypeSpec, name: String, line: usize) -> Option<Declaration> {
        if !self.match_token("[") {
            self.expect_semicolon();
            return Some(Declaration::Var { ty, name, line });
        }

        if !self.check_kind(TokenKind::Num) {
            self.error(SyntaxErrorKind::Missing("NUM".to_string()));
            return None;
        }
        let size = self.peek().lexeme.clone();
        self.advance();
        self.expect_token("]")?;
        self.expect_semicolon();

        Some(Declaration::Array {
            ty,
            name,
            size,
            line,
        })
    }

    fn parse_fun_declaration(&mut self, ty: TypeSpec, name: String, line: usize) -> Option<Declaration> {
        self.expect_token("(")?;
        let params = self.parse_params()?;
        self.expect_token(")")?;
        let body = self.parse_compound_stmt()?;

        Some(Declaration::Fun {
            ty,
            name,
            params,
            body,
            line,
        })
    }

    /// Parse a parameter list, excluding the parentheses
    fn parse_params(&mut self) -> Option<Vec<Param>> {
        if self.check("void") && self.peek_ahead(1).lexeme == ")" {
            self.advance();
            return Some(vec![Param::Void]);
        }
        if self.check(")") {
            return Some(Vec::new());
        }

        let mut params = vec![self.parse_param()?];
        while self.match_token(",") {
            params.push(self.parse_param()?);
        }
        Some(params)
    }

    fn parse_param(&mut self) -> Option<Param> {
        let ty = self.parse_type_specifier()?;
        let (name, line) = self.expect_identifier()?;

        if self.match_token("[") {
            self.expect_token("]")?;
            Some(Param::Array { ty, name, line })
        } else {
            Some(Param::Scalar { ty, name, line })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::errors::SyntaxError;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::synthesize;

    fn program(source: &str) -> (Program, Vec<SyntaxError>) {
        let (tokens, _) = Lexer::tokenize(source);
        let tokens: Vec<_> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        let synthesis = synthesize(&tokens);
        (synthesis.program, synthesis.errors)
    }

    #[test]
    fn test_parse_array_declaration() {
        let (program, errors) = program("int a[10];");

        assert!(errors.is_empty());
        assert_eq!(
            program.declarations,
            vec![Declaration::Array {
                ty: TypeSpec::Int,
                name: "a".to_string(),
                size: "10".to_string(),
                line: 1,
            }]
        );
    }

    #[test]
    fn test_parse_params() {
        let (program, errors) = program("int f(int x, int y[]) { return x; }");

        assert!(errors.is_empty(), "{:?}", errors);
        match &program.declarations[0] {
            Declaration::Fun { params, .. } => {
                assert_eq!(params.len(), 2);
                assert!(matches!(&params[0], Param::Scalar { name, .. } if name == "x"));
                assert!(matches!(&params[1], Param::Array { name, .. } if name == "y"));
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_array_size_must_be_number() {
        let (program, errors) = program("int a[n];\nint b;");

        assert_eq!(errors, vec![SyntaxError::missing(1, "NUM")]);
        assert_eq!(program.declarations.len(), 1);
        assert_eq!(program.declarations[0].name(), "b");
    }

    #[test]
    fn test_missing_identifier() {
        let (program, errors) = program("int ;\nvoid main(void) { }");

        assert_eq!(errors, vec![SyntaxError::missing(1, "ID")]);
        assert_eq!(program.declarations.len(), 1);
    }
}
