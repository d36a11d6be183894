//! Declaration and statement lowering
//!
//! Adds `impl CodeGenerator` methods for declarations, compound blocks,
//! selection, `return` and expression statements. Loops live in
//! [`super::loops`].
//!
//! `if` lowering:
//!
//! ```text
//!     JPF cond, , ELSE        (or END without an else branch)
//!     <then>
//!     JP , , END              (only with an else branch)
//! ELSE:
//!     <else>
//! END:
//! ```

use crate::codegen::engine::CodeGenerator;
use crate::codegen::layout::declared_slots;
use crate::codegen::symbols::SymbolEntry;
use crate::codegen::tac::Opcode;
use crate::parser::ast::*;

impl CodeGenerator {
    pub(crate) fn gen_declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Var { ty, name, .. } => self.declare(name, *ty, false, 1),
            Declaration::Array { ty, name, size, .. } => {
                self.declare(name, *ty, true, declared_slots(size));
            }
            Declaration::Fun {
                name, params, body, ..
            } => {
                log::debug!("lowering function {}", name);
                for param in params {
                    match param {
                        Param::Void => {}
                        Param::Scalar { ty, name, .. } => self.declare(name, *ty, false, 1),
                        Param::Array { ty, name, .. } => self.declare(name, *ty, true, 1),
                    }
                }
                self.gen_compound(body);
            }
        }
    }

    /// Binds `name` to a fresh block of `slots` addresses (at least one).
    ///
    /// A block that does not fit the address space shrinks to a single slot.
    fn declare(&mut self, name: &str, ty: TypeSpec, is_array: bool, slots: usize) {
        if self.symbols.lookup(name).is_some() {
            log::warn!("ignoring duplicate declaration of '{}'", name);
            return;
        }
        let (address, slots) = match self.variables.allocate_block(slots) {
            Some(address) => (address, slots.max(1)),
            None => {
                log::warn!("'{}' needs {} slots, too large; reserving one", name, slots);
                match self.variables.allocate() {
                    Some(address) => (address, 1),
                    None => {
                        log::warn!("no address left for '{}'", name);
                        return;
                    }
                }
            }
        };
        self.symbols.insert(SymbolEntry {
            name: name.to_string(),
            address,
            ty,
            is_array,
            slots,
        });
    }

    pub(crate) fn gen_compound(&mut self, block: &CompoundStmt) {
        for declaration in &block.declarations {
            self.gen_declaration(declaration);
        }
        for statement in &block.statements {
            self.gen_statement(statement);
        }
    }

    pub(crate) fn gen_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Compound(block) => self.gen_compound(block),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => self.gen_if(condition, then_branch, else_branch.as_deref()),
            Stmt::Repeat { body, condition } => self.gen_repeat(body, condition),
            Stmt::Break { line } => self.gen_break(*line),
            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.gen_expression(value);
                }
            }
            Stmt::Expr(expr) => {
                self.gen_expression(expr);
            }
            Stmt::Empty => {}
        }
    }

    fn gen_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) {
        let Some(condition) = self.gen_expression(condition) else {
            log::debug!("skipping if statement with unresolved condition");
            return;
        };

        let jump_false = self.emit(Opcode::Jpf, Some(condition), None, None);
        self.gen_statement(then_branch);

        match else_branch {
            Some(else_branch) => {
                let jump_end = self.emit(Opcode::Jp, None, None, None);
                self.backpatch(jump_false, self.next_line());
                self.gen_statement(else_branch);
                self.backpatch(jump_end, self.next_line());
            }
            None => self.backpatch(jump_false, self.next_line()),
        }
    }
}
