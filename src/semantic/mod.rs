//! Optional semantic checks
//!
//! A small hook run over the AST after synthesis. It is off unless
//! `[semantic] enabled = true`, and reports:
//!
//! - variables and parameters declared `void`
//! - uses of names that were never declared
//! - redeclarations (behind its own `check_redeclaration` switch)
//!
//! Names share one flat scope, the same one the code generator uses. The
//! output function is predefined.

use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::SemanticConfig;
use crate::parser::ast::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticErrorKind {
    VoidVariable(String),
    Redeclaration(String),
    Undefined(String),
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticErrorKind::VoidVariable(name) => write!(f, "Illegal type of void for '{}'", name),
            SemanticErrorKind::Redeclaration(name) => write!(f, "Redeclaration of '{}'", name),
            SemanticErrorKind::Undefined(name) => write!(f, "'{}' is not defined", name),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}: Semantic Error! {kind}")]
pub struct SemanticError {
    pub line: usize,
    pub kind: SemanticErrorKind,
}

/// Flat-scope checker fed by [`Self::define`] and [`Self::check_use`].
#[derive(Debug, Clone)]
pub struct SemanticAnalyzer {
    symbols: FxHashMap<String, TypeSpec>,
    check_redeclaration: bool,
    errors: Vec<SemanticError>,
}

impl SemanticAnalyzer {
    pub fn new(config: &SemanticConfig, output_function: &str) -> Self {
        let mut symbols = FxHashMap::default();
        symbols.insert(output_function.to_string(), TypeSpec::Void);
        Self {
            symbols,
            check_redeclaration: config.check_redeclaration,
            errors: Vec::new(),
        }
    }

    /// Declares a variable or parameter. A `void` one is reported but still
    /// declared, so its uses are not reported again.
    pub fn define(&mut self, name: &str, ty: TypeSpec, line: usize) {
        if ty == TypeSpec::Void {
            self.report(line, SemanticErrorKind::VoidVariable(name.to_string()));
        }
        self.bind(name, ty, line);
    }

    /// Declares a function; `void` is a legal return type.
    pub fn define_function(&mut self, name: &str, ty: TypeSpec, line: usize) {
        self.bind(name, ty, line);
    }

    pub fn check_use(&mut self, name: &str, line: usize) {
        if !self.symbols.contains_key(name) {
            self.report(line, SemanticErrorKind::Undefined(name.to_string()));
        }
    }

    /// Walk `program` and return every diagnostic in source order of discovery.
    pub fn analyze(mut self, program: &Program) -> Vec<SemanticError> {
        for declaration in &program.declarations {
            self.visit_declaration(declaration);
        }
        log::debug!("semantic pass found {} errors", self.errors.len());
        self.errors
    }

    fn bind(&mut self, name: &str, ty: TypeSpec, line: usize) {
        if self.symbols.contains_key(name) {
            if self.check_redeclaration {
                self.report(line, SemanticErrorKind::Redeclaration(name.to_string()));
            }
            return;
        }
        self.symbols.insert(name.to_string(), ty);
    }

    fn report(&mut self, line: usize, kind: SemanticErrorKind) {
        log::debug!("semantic error at line {}: {}", line, kind);
        self.errors.push(SemanticError { line, kind });
    }

    // ===== AST walk =====

    fn visit_declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Var { ty, name, line } | Declaration::Array { ty, name, line, .. } => {
                self.define(name, *ty, *line)
            }
            Declaration::Fun {
                ty,
                name,
                params,
                body,
                line,
            } => {
                self.define_function(name, *ty, *line);
                for param in params {
                    match param {
                        Param::Void => {}
                        Param::Scalar { ty, name, line } | Param::Array { ty, name, line } => {
                            self.define(name, *ty, *line)
                        }
                    }
                }
                self.visit_compound(body);
            }
        }
    }

    fn visit_compound(&mut self, block: &CompoundStmt) {
        for declaration in &block.declarations {
            self.visit_declaration(declaration);
        }
        for statement in &block.statements {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Compound(block) => self.visit_compound(block),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.visit_expression(condition);
                self.visit_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_statement(else_branch);
                }
            }
            Stmt::Repeat { body, condition } => {
                self.visit_statement(body);
                self.visit_expression(condition);
            }
            Stmt::Return(Some(value)) | Stmt::Expr(value) => self.visit_expression(value),
            Stmt::Return(None) | Stmt::Break { .. } | Stmt::Empty => {}
        }
    }

    fn visit_expression(&mut self, expr: &Expr) {
        match expr {
            Expr::Assign { target, value } => {
                self.visit_var(target);
                self.visit_expression(value);
            }
            Expr::Binary { left, right, .. } => {
                self.visit_expression(left);
                self.visit_expression(right);
            }
            Expr::Var(var) => self.visit_var(var),
            Expr::Call { name, args, line } => {
                self.check_use(name, *line);
                for arg in args {
                    self.visit_expression(arg);
                }
            }
            Expr::Num(_) => {}
        }
    }

    fn visit_var(&mut self, var: &Var) {
        self.check_use(var.name(), var.line());
        if let Var::Array { index, .. } = var {
            self.visit_expression(index);
        }
    }
}

/// One report line per error, or the no-error sentence.
pub fn render_semantic_report(errors: &[SemanticError]) -> String {
    if errors.is_empty() {
        return "There is no semantic error.\n".to_string();
    }
    errors.iter().map(|e| format!("{}\n", e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::synthesize;

    fn analyze_with(source: &str, check_redeclaration: bool) -> Vec<SemanticError> {
        let (tokens, _) = Lexer::tokenize(source);
        let tokens: Vec<_> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        let program = synthesize(&tokens).program;
        let config = SemanticConfig {
            enabled: true,
            check_redeclaration,
        };
        SemanticAnalyzer::new(&config, "output").analyze(&program)
    }

    fn analyze(source: &str) -> Vec<SemanticError> {
        analyze_with(source, false)
    }

    #[test]
    fn test_clean_program() {
        let errors = analyze("int x; int a[3]; void main(void) { x = a[0]; output(x); }");
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_void_variable() {
        let errors = analyze("void x;\nvoid main(void) { x = 1; }");

        assert_eq!(
            errors,
            vec![SemanticError {
                line: 1,
                kind: SemanticErrorKind::VoidVariable("x".to_string()),
            }]
        );
        assert_eq!(errors[0].to_string(), "1: Semantic Error! Illegal type of void for 'x'");
    }

    #[test]
    fn test_undefined_names() {
        let errors = analyze("void main(void) {\n y = 1;\n f(z[0]);\n}");

        let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "2: Semantic Error! 'y' is not defined",
                "3: Semantic Error! 'f' is not defined",
                "3: Semantic Error! 'z' is not defined",
            ]
        );
    }

    #[test]
    fn test_params_and_functions_are_defined() {
        let errors = analyze("int f(int n, int v[]) { return v[n]; }\nvoid main(void) { f(1, 2); }");
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_redeclaration_switch() {
        let source = "int x;\nint x;\nvoid main(void) { }";

        assert!(analyze_with(source, false).is_empty());
        assert_eq!(
            analyze_with(source, true),
            vec![SemanticError {
                line: 2,
                kind: SemanticErrorKind::Redeclaration("x".to_string()),
            }]
        );
    }

    #[test]
    fn test_render_report() {
        assert_eq!(render_semantic_report(&[]), "There is no semantic error.\n");

        let mut analyzer = SemanticAnalyzer::new(&SemanticConfig::default(), "output");
        analyzer.check_use("q", 4);
        assert_eq!(
            render_semantic_report(&analyzer.analyze(&Program::default())),
            "4: Semantic Error! 'q' is not defined\n"
        );
    }
}
