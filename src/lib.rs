//! # Introduction
//!
//! `cminus` is a front end for C-minus, a small C-like teaching language. It
//! parses a program with a table-driven LL(1) parser that recovers from syntax
//! errors, rebuilds a typed AST from the tokens the parser accepted, and lowers
//! that AST to three-address code (TAC) with resolved jump targets.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → PredictiveParser → token trace → AstSynthesizer → AST → CodeGenerator → TAC
//!                        ↓                                              ↓
//!                  parse tree, syntax errors                 semantic errors (optional)
//! ```
//!
//! 1. [`grammar`]: the grammar model (FIRST, FOLLOW, PREDICT) and the
//!    predictive [`grammar::ParseTable`] with synchronization entries.
//! 2. [`parser`]: the token source, the predictive parser with panic-mode
//!    recovery, the parse tree, and the recursive-descent AST synthesizer.
//! 3. [`semantic`]: an optional checker for `void` variables and undeclared
//!    names, off by default.
//! 4. [`codegen`]: the TAC generator with its flat symbol table and
//!    backpatching.
//! 5. [`output`]: writes every artifact of a run to a directory.
//!
//! The table is built once per [`Compiler`] and reused by every
//! [`Compiler::compile`] call.
//!
//! ## Supported language
//!
//! Types: `int`, `void`, one-dimensional `int` arrays.
//! Control flow: `if/else`, `repeat ... until`, `break`, `return`.
//! Operators: `=`, `<`, `==`, `<=`, `+`, `-`, `*`.
//! Built-ins: `output`.

pub mod codegen;
pub mod config;
pub mod error;
pub mod grammar;
pub mod output;
pub mod parser;
pub mod semantic;

use codegen::{Instruction, SymbolTable};
use config::Config;
use error::{CompileError, CompileResult};
use grammar::{GrammarModel, ParseTable};
use parser::ast::Program;
use parser::errors::{merge_reports, render_syntax_report};
use parser::lexer::LexicalError;
use parser::{Lexer, ParseTree, PredictiveParser, SyntaxError};
use semantic::{SemanticAnalyzer, SemanticError};

/// Every artifact of one compilation
#[derive(Debug, Clone)]
pub struct Compilation {
    pub tree: ParseTree,
    /// Diagnostics from the predictive parser
    pub parse_errors: Vec<SyntaxError>,
    /// Diagnostics from the AST synthesizer
    pub ast_errors: Vec<SyntaxError>,
    pub lexical_errors: Vec<LexicalError>,
    pub program: Program,
    /// `None` when the semantic hook is disabled
    pub semantic_errors: Option<Vec<SemanticError>>,
    pub code: Vec<Instruction>,
    pub symbols: SymbolTable,
    /// Significant tokens the parser read, including the end marker
    pub tokens_consumed: usize,
}

impl Compilation {
    /// Parser and synthesizer diagnostics merged by line.
    pub fn syntax_errors(&self) -> Vec<SyntaxError> {
        merge_reports(&self.parse_errors, &self.ast_errors)
    }

    pub fn syntax_report(&self) -> String {
        render_syntax_report(&self.syntax_errors())
    }

    pub fn tac_listing(&self) -> String {
        codegen::render_code(&self.code)
    }

    /// The AST as JSON, or `{}` if the synthesizer had to recover.
    pub fn ast_json(&self) -> CompileResult<String> {
        if !self.ast_errors.is_empty() {
            return Ok("{}".to_string());
        }
        Ok(self.program.to_json()?)
    }

    pub fn has_syntax_errors(&self) -> bool {
        !self.parse_errors.is_empty() || !self.ast_errors.is_empty()
    }
}

/// Pipeline driver holding the configuration and the prebuilt parse table
#[derive(Debug, Clone)]
pub struct Compiler {
    config: Config,
    table: ParseTable,
}

impl Compiler {
    /// Builds the parse table from the configured grammar file, or from the
    /// built-in C-minus grammar when none is set.
    pub fn new(config: Config) -> CompileResult<Self> {
        let grammar = match &config.grammar {
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
                    path: path.clone(),
                    source,
                })?;
                log::info!("using grammar {}", path.display());
                GrammarModel::parse(&source)?
            }
            None => GrammarModel::cminus()?,
        };
        let table = ParseTable::build(&grammar);
        Ok(Compiler { config, table })
    }

    pub fn with_defaults() -> CompileResult<Self> {
        Self::new(Config::default())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    /// Runs every phase on `source`. Diagnostics are collected, never raised;
    /// code generation runs on whatever AST was recovered.
    pub fn compile(&self, source: &str) -> Compilation {
        let mut lexer = Lexer::new(source);
        let outcome = PredictiveParser::new(&self.table)
            .with_trace(true)
            .parse(&mut lexer);
        let lexical_errors = lexer.into_errors();
        log::debug!(
            "parser consumed {} tokens with {} errors",
            outcome.tokens_consumed,
            outcome.errors.len()
        );

        let synthesis = parser::parse::synthesize(&outcome.trace);

        let semantic_errors = self.config.semantic.enabled.then(|| {
            SemanticAnalyzer::new(&self.config.semantic, &self.config.codegen.output_function)
                .analyze(&synthesis.program)
        });

        let generated = codegen::generate(&synthesis.program, &self.config.codegen);

        Compilation {
            tree: outcome.tree,
            parse_errors: outcome.errors,
            ast_errors: synthesis.errors,
            lexical_errors,
            program: synthesis.program,
            semantic_errors,
            code: generated.code,
            symbols: generated.symbols,
            tokens_consumed: outcome.tokens_consumed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_valid_program() {
        let compiler = Compiler::with_defaults().unwrap();
        let compilation = compiler.compile("int x ; void main ( void ) { x = 1 + 2 ; }");

        assert!(!compilation.has_syntax_errors());
        assert_eq!(compilation.syntax_report(), "There is no syntax error.\n");
        assert_eq!(
            compilation.tac_listing(),
            "0\t(ADD, #1, #2, 1000)\n1\t(ASSIGN, 1000, , 500)\n"
        );
        assert!(compilation.semantic_errors.is_none());
    }

    #[test]
    fn test_compiler_is_reusable() {
        let compiler = Compiler::with_defaults().unwrap();
        let first = compiler.compile("int x void main ( void ) { }");
        let second = compiler.compile("int y; void main(void) { y = 2; }");

        assert!(first.has_syntax_errors());
        assert!(!second.has_syntax_errors());
        assert_eq!(first.ast_json().unwrap(), "{}");
    }

    #[test]
    fn test_semantic_hook_runs_when_enabled() {
        let mut config = Config::default();
        config.semantic.enabled = true;
        let compiler = Compiler::new(config).unwrap();

        let compilation = compiler.compile("void main(void) { x = 1; output(2); }");
        assert_eq!(
            compilation.semantic_errors.map(|errors| errors.len()),
            Some(1)
        );
    }

    #[test]
    fn test_missing_grammar_file() {
        let config = Config {
            grammar: Some("/nonexistent/grammar.txt".into()),
            ..Config::default()
        };
        assert!(matches!(Compiler::new(config), Err(CompileError::Io { .. })));
    }
}
