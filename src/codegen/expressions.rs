//! Expression lowering
//!
//! Every method returns the [`Operand`] holding the expression's value, or
//! `None` when part of the expression cannot be resolved (an undeclared name,
//! a literal out of range). An unresolved expression emits nothing further up.
//!
//! Array elements are addressed indirectly:
//!
//! ```text
//! MULT index, #word, t1
//! ADD  #base, t1, t2      ; element is @t2
//! ```

use crate::codegen::engine::CodeGenerator;
use crate::codegen::tac::{Opcode, Operand};
use crate::parser::ast::*;

impl CodeGenerator {
    pub(crate) fn gen_expression(&mut self, expr: &Expr) -> Option<Operand> {
        match expr {
            Expr::Num(literal) => match literal.parse::<i64>() {
                Ok(value) => Some(Operand::Immediate(value)),
                Err(_) => {
                    log::warn!("integer literal {} is out of range", literal);
                    None
                }
            },
            Expr::Var(var) => self.gen_var(var),
            Expr::Assign { target, value } => {
                let target = self.gen_var(target);
                let value = self.gen_expression(value);
                let (target, value) = (target?, value?);
                self.emit(Opcode::Assign, Some(value), None, Some(target));
                Some(target)
            }
            Expr::Binary { op, left, right } => {
                let left = self.gen_expression(left);
                let right = self.gen_expression(right);
                let (left, right) = (left?, right?);
                let temp = self.new_temporary()?;
                self.emit((*op).into(), Some(left), Some(right), Some(Operand::Address(temp)));
                Some(Operand::Address(temp))
            }
            Expr::Call { name, args, line } => {
                self.gen_call(name, args, *line);
                None
            }
        }
    }

    fn gen_var(&mut self, var: &Var) -> Option<Operand> {
        let Some(entry) = self.symbols.lookup(var.name()) else {
            log::debug!("'{}' at line {} is not declared", var.name(), var.line());
            return None;
        };
        let base = entry.address;

        match var {
            Var::Simple { .. } => Some(Operand::Address(base)),
            Var::Array { index, line, .. } => {
                let (Ok(word), Ok(base)) = (i64::try_from(self.word_size), i64::try_from(base)) else {
                    log::warn!("'{}' at line {} is not addressable by an immediate", var.name(), line);
                    return None;
                };
                let index = self.gen_expression(index)?;
                let offset = self.new_temporary()?;
                self.emit(
                    Opcode::Mult,
                    Some(index),
                    Some(Operand::Immediate(word)),
                    Some(Operand::Address(offset)),
                );
                let element = self.new_temporary()?;
                self.emit(
                    Opcode::Add,
                    Some(Operand::Immediate(base)),
                    Some(Operand::Address(offset)),
                    Some(Operand::Address(element)),
                );
                Some(Operand::Indirect(element))
            }
        }
    }

    /// Only the output function is lowered; other calls have no code.
    fn gen_call(&mut self, name: &str, args: &[Expr], line: usize) {
        if name != self.output_function {
            log::debug!("call to '{}' at line {} is not lowered", name, line);
            return;
        }
        if let Some(value) = args.first().and_then(|arg| self.gen_expression(arg)) {
            self.emit(Opcode::Print, Some(value), None, None);
        }
    }
}
