//! Artifact writer.
//!
//! One compilation produces these files in the output directory:
//!
//! | File                 | Content                                        |
//! |----------------------|------------------------------------------------|
//! | `syntax_errors.txt`  | parser and synthesizer diagnostics, by line    |
//! | `parse_tree.txt`     | box-drawing dump of the parse tree             |
//! | `ast.json`           | the AST, or `{}` if the synthesizer recovered  |
//! | `output.txt`         | the TAC listing                                |
//! | `symbol_table.txt`   | `name\taddress` per declared name              |
//! | `lexical_errors.txt` | scanner diagnostics grouped by line            |
//! | `semantic_errors.txt`| only when the semantic hook ran                |

use std::path::Path;

use crate::error::{CompileError, CompileResult};
use crate::parser::lexer::render_lexical_report;
use crate::semantic::render_semantic_report;
use crate::Compilation;

pub const SYNTAX_ERRORS_FILE: &str = "syntax_errors.txt";
pub const PARSE_TREE_FILE: &str = "parse_tree.txt";
pub const AST_FILE: &str = "ast.json";
pub const CODE_FILE: &str = "output.txt";
pub const SYMBOL_TABLE_FILE: &str = "symbol_table.txt";
pub const LEXICAL_ERRORS_FILE: &str = "lexical_errors.txt";
pub const SEMANTIC_ERRORS_FILE: &str = "semantic_errors.txt";

/// Write every artifact of `compilation` into `dir`, creating it if needed.
pub fn write_artifacts(dir: &Path, compilation: &Compilation) -> CompileResult<()> {
    std::fs::create_dir_all(dir).map_err(|source| CompileError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    write_file(dir, SYNTAX_ERRORS_FILE, &compilation.syntax_report())?;
    write_file(dir, PARSE_TREE_FILE, &compilation.tree.render())?;
    write_file(dir, AST_FILE, &compilation.ast_json()?)?;
    write_file(dir, CODE_FILE, &compilation.tac_listing())?;
    write_file(dir, SYMBOL_TABLE_FILE, &compilation.symbols.render())?;
    write_file(
        dir,
        LEXICAL_ERRORS_FILE,
        &render_lexical_report(&compilation.lexical_errors),
    )?;
    if let Some(errors) = &compilation.semantic_errors {
        write_file(dir, SEMANTIC_ERRORS_FILE, &render_semantic_report(errors))?;
    }

    log::info!("artifacts written to {}", dir.display());
    Ok(())
}

fn write_file(dir: &Path, name: &str, content: &str) -> CompileResult<()> {
    let path = dir.join(name);
    std::fs::write(&path, content).map_err(|source| CompileError::Io { path, source })
}
