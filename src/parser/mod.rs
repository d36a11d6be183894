//! C-minus front end
//!
//! This module turns a token stream into a parse tree and an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens) behind the [`TokenSource`] trait
//! - [`predictive`]: Table-driven LL(1) parsing with panic-mode recovery (tokens → parse tree)
//! - [`tree`]: The concrete parse tree and its textual dump
//! - [`parse`]: AST synthesis by recursive descent over the parser's token trace
//! - [`ast`]: AST node definitions and the JSON export record
//! - [`errors`]: Syntax diagnostics shared by both passes
//!
//! # Supported Language
//!
//! - Types: `int`, `void`; scalar and one-dimensional array variables
//! - Statements: compound, `if`/`else`, `repeat ... until`, `break`, `return`, expressions
//! - Expressions: `=`, `<`, `==`, `<=`, `+`, `-`, `*`, calls, parentheses
//! - Comments: `/* ... */` and `// ...`
//!
//! # Two Passes
//!
//! The predictive parser validates the input against the grammar and records
//! the significant tokens it consumed. The synthesizer then re-reads that trace
//! with hand-written recursive descent to build the typed AST, so the AST's shape
//! does not depend on the grammar's factoring.

pub mod ast;
mod declarations;
pub mod errors;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod predictive;
mod statements;
pub mod tree;

pub use errors::{SyntaxError, SyntaxErrorKind};
pub use lexer::{Lexer, Token, TokenKind, TokenSource};
pub use parse::{AstSynthesizer, Synthesis, MAX_NESTING_DEPTH};
pub use predictive::{ParseOutcome, PredictiveParser};
pub use tree::ParseTree;
