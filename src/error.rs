//! Operational errors of the compiler driver.
//!
//! Diagnostics about the compiled program (lexical, syntax, semantic) are plain
//! values collected in a [`crate::Compilation`]; this module only covers the
//! failures that stop the driver itself.

use std::path::PathBuf;

use thiserror::Error;

use crate::grammar::GrammarError;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("could not access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("could not parse config '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("AST export failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for driver operations.
pub type CompileResult<T> = Result<T, CompileError>;
