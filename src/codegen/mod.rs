//! Three-address code generation
//!
//! This module lowers the AST to TAC:
//! - [`engine`]: the [`CodeGenerator`] state, emission and backpatching
//! - [`tac`]: instructions, opcodes and operands
//! - [`symbols`]: the flat symbol table and address allocators
//! - [`constants`]: default address layout
//!
//! # Memory Model
//!
//! Declared names get addresses from 500 upward and temporaries from 1000
//! upward, one word (4) apart; arrays take one word per element. When the
//! declarations outgrow the gap, temporaries start right after the last
//! variable slot instead. An array too large for the address space gets a
//! single slot. All of this is configurable through
//! [`crate::config::CodegenConfig`].
//!
//! # Failure Model
//!
//! Generation never fails. Anything that cannot be resolved (undeclared names,
//! calls other than `output`) contributes no instructions, so the pass also
//! runs on ASTs recovered from erroneous input.

pub mod constants;
pub mod engine;
mod expressions;
mod layout;
mod loops;
mod statements;
pub mod symbols;
pub mod tac;

pub use engine::{generate, CodeGenerator, Generated};
pub use symbols::{SymbolEntry, SymbolTable};
pub use tac::{render_code, Instruction, Opcode, Operand};
