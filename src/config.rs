//! Compiler configuration.
//!
//! Loaded from a TOML file passed via `cminusc --config cminus.toml`. Every
//! field has a default, so an empty file (or no file) gives the stock
//! C-minus setup.
//!
//! # Example
//!
//! ```toml
//! grammar = "grammars/cminus.grammar"
//!
//! [codegen]
//! variable_base = 500
//! temporary_base = 1000
//! word_size = 4
//! output_function = "output"
//!
//! [semantic]
//! enabled = true
//! check_redeclaration = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codegen::constants::{OUTPUT_FUNCTION, TEMPORARY_BASE, VARIABLE_BASE, WORD_SIZE};
use crate::error::CompileError;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grammar file replacing the built-in C-minus grammar.
    pub grammar: Option<PathBuf>,
    pub codegen: CodegenConfig,
    pub semantic: SemanticConfig,
}

/// `[codegen]` section: address layout of the generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// First address handed to declared variables.
    pub variable_base: usize,
    /// First address handed to temporaries.
    pub temporary_base: usize,
    /// Address stride between consecutive slots.
    pub word_size: usize,
    /// Call name lowered to `PRINT`.
    pub output_function: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            variable_base: VARIABLE_BASE,
            temporary_base: TEMPORARY_BASE,
            word_size: WORD_SIZE,
            output_function: OUTPUT_FUNCTION.to_string(),
        }
    }
}

/// `[semantic]` section: the optional checking hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    pub enabled: bool,
    pub check_redeclaration: bool,
}

// ── Functions ─────────────────────────────────────────────────────────────────

impl Config {
    /// Read and parse a configuration file from `path`.
    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let content = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml(&content).map_err(|source| CompileError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
