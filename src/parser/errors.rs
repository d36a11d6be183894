//! Syntax diagnostics
//!
//! Both the predictive parser and the AST synthesizer record [`SyntaxError`]s.
//! They are recovered diagnostics, not failures: parsing always runs to the
//! end of the input and the errors are reported afterwards.

use std::fmt;
use thiserror::Error;

/// What went wrong at a position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// An expected symbol was not found; nothing was consumed.
    Missing(String),
    /// A token with no table entry was discarded.
    Illegal(String),
    /// End of input reached while something was still expected.
    UnexpectedEof,
    /// A token left over, or one that cannot start the expected construct.
    Unexpected(String),
    /// Statements or expressions nested past the given number of levels.
    TooDeep(usize),
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::Missing(symbol) => write!(f, "missing {}", symbol),
            SyntaxErrorKind::Illegal(token) => write!(f, "illegal {}", token),
            SyntaxErrorKind::UnexpectedEof => write!(f, "unexpected EOF"),
            SyntaxErrorKind::Unexpected(token) => write!(f, "unexpected {}", token),
            SyntaxErrorKind::TooDeep(limit) => write!(f, "nesting deeper than {} levels", limit),
        }
    }
}

/// A positioned syntax diagnostic
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("#{line} : syntax error, {kind}")]
pub struct SyntaxError {
    pub line: usize,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn missing(line: usize, symbol: impl Into<String>) -> Self {
        SyntaxError {
            line,
            kind: SyntaxErrorKind::Missing(symbol.into()),
        }
    }

    pub fn illegal(line: usize, token: impl Into<String>) -> Self {
        SyntaxError {
            line,
            kind: SyntaxErrorKind::Illegal(token.into()),
        }
    }

    pub fn unexpected(line: usize, token: impl Into<String>) -> Self {
        SyntaxError {
            line,
            kind: SyntaxErrorKind::Unexpected(token.into()),
        }
    }

    pub fn unexpected_eof(line: usize) -> Self {
        SyntaxError {
            line,
            kind: SyntaxErrorKind::UnexpectedEof,
        }
    }
}

/// One report line per error, or the no-error sentence.
pub fn render_syntax_report(errors: &[SyntaxError]) -> String {
    if errors.is_empty() {
        return "There is no syntax error.\n".to_string();
    }
    errors.iter().map(|e| format!("{}\n", e)).collect()
}

/// Interleaves the parser's and the synthesizer's diagnostics by line.
///
/// Within a line the parser's come first; an error reported identically by
/// both passes is kept once.
pub fn merge_reports(parser: &[SyntaxError], synthesizer: &[SyntaxError]) -> Vec<SyntaxError> {
    let mut tagged: Vec<(usize, u8, &SyntaxError)> = parser
        .iter()
        .map(|e| (e.line, 0, e))
        .chain(synthesizer.iter().map(|e| (e.line, 1, e)))
        .collect();
    // Stable, so each pass keeps its own order within a line.
    tagged.sort_by_key(|(line, pass, _)| (*line, *pass));

    let mut merged: Vec<SyntaxError> = Vec::with_capacity(tagged.len());
    for (_, _, error) in tagged {
        if !merged.contains(error) {
            merged.push(error.clone());
        }
    }
    merged
}
