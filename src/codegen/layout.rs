//! Variable region sizing
//!
//! Temporaries must start past the last variable slot, but locals of later
//! functions are bound after earlier bodies already used temporaries. This pass
//! sizes the variable region before any code is emitted: every name is charged
//! the largest block any of its declarations asks for, so the estimate never
//! falls short of what lowering actually binds.

use rustc_hash::FxHashMap;

use crate::codegen::symbols::AddressAllocator;
use crate::parser::ast::*;

/// Slots a declaration reserves, before the at-least-one rule.
pub(crate) fn declared_slots(size: &str) -> usize {
    size.parse::<usize>().unwrap_or(0)
}

/// Address one past the variable region `program` needs when names are
/// bound from `variables`.
pub(crate) fn variable_region_end(program: &Program, variables: &AddressAllocator) -> usize {
    let mut layout = Layout::default();
    for declaration in &program.declarations {
        layout.declaration(declaration);
    }

    let mut region = variables.clone();
    for slots in layout.order.iter().map(|name| layout.slots[name]) {
        if region.allocate_block(slots).is_none() && region.allocate().is_none() {
            break;
        }
    }
    region.peek()
}

#[derive(Default)]
struct Layout<'a> {
    /// Names in first-declaration order
    order: Vec<&'a str>,
    slots: FxHashMap<&'a str, usize>,
}

impl<'a> Layout<'a> {
    fn bind(&mut self, name: &'a str, slots: usize) {
        let slots = slots.max(1);
        match self.slots.get_mut(name) {
            Some(widest) => *widest = (*widest).max(slots),
            None => {
                self.order.push(name);
                self.slots.insert(name, slots);
            }
        }
    }

    fn declaration(&mut self, declaration: &'a Declaration) {
        match declaration {
            Declaration::Var { name, .. } => self.bind(name, 1),
            Declaration::Array { name, size, .. } => self.bind(name, declared_slots(size)),
            Declaration::Fun { params, body, .. } => {
                for param in params {
                    match param {
                        Param::Void => {}
                        Param::Scalar { name, .. } | Param::Array { name, .. } => self.bind(name, 1),
                    }
                }
                self.compound(body);
            }
        }
    }

    fn compound(&mut self, block: &'a CompoundStmt) {
        for declaration in &block.declarations {
            self.declaration(declaration);
        }
        for statement in &block.statements {
            self.statement(statement);
        }
    }

    fn statement(&mut self, statement: &'a Stmt) {
        match statement {
            Stmt::Compound(block) => self.compound(block),
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.statement(else_branch);
                }
            }
            Stmt::Repeat { body, .. } => self.statement(body),
            Stmt::Return(_) | Stmt::Break { .. } | Stmt::Empty | Stmt::Expr(_) => {}
        }
    }
}
