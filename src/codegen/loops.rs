//! `repeat ... until` and `break` lowering.
//!
//! ```text
//! TOP:
//!     <body>
//!     JPF cond, , TOP
//! END:
//! ```
//!
//! Each `break` in the body emits `JP , , ?`; the jumps are collected on the
//! innermost entry of `loops` and patched to `END` once the loop is closed.

use crate::codegen::engine::CodeGenerator;
use crate::codegen::tac::{Opcode, Operand};
use crate::parser::ast::{Expr, Stmt};

impl CodeGenerator {
    pub(crate) fn gen_repeat(&mut self, body: &Stmt, condition: &Expr) {
        let top = self.next_line();
        self.loops.push(Vec::new());

        self.gen_statement(body);
        match self.gen_expression(condition) {
            Some(condition) => {
                self.emit(Opcode::Jpf, Some(condition), None, Some(Operand::Line(top)));
            }
            None => log::debug!("repeat loop at line {} has an unresolved condition", top),
        }

        let end = self.next_line();
        for jump in self.loops.pop().unwrap_or_default() {
            self.backpatch(jump, end);
        }
    }

    pub(crate) fn gen_break(&mut self, source_line: usize) {
        if self.loops.is_empty() {
            log::warn!("ignoring break outside a loop at line {}", source_line);
            return;
        }
        let jump = self.emit(Opcode::Jp, None, None, None);
        if let Some(breaks) = self.loops.last_mut() {
            breaks.push(jump);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::engine::test_support::*;

    #[test]
    fn test_repeat_jumps_back_to_top() {
        let generated = generate_source(
            "int i; void main(void) { i = 0; repeat i = i + 1; until (i == 3) }",
        );

        assert_eq!(
            listing(&generated),
            vec![
                "0\t(ASSIGN, #0, , 500)",
                "1\t(ADD, 500, #1, 1000)",
                "2\t(ASSIGN, 1000, , 500)",
                "3\t(EQ, 500, #3, 1004)",
                "4\t(JPF, 1004, , 1)",
            ]
        );
    }

    #[test]
    fn test_break_jumps_past_loop() {
        let generated = generate_source(
            "int i; void main(void) { repeat { if (i < 2) break; i = 1; } until (i) output(i); }",
        );

        assert_eq!(
            listing(&generated),
            vec![
                "0\t(LT, 500, #2, 1000)",
                "1\t(JPF, 1000, , 3)",
                "2\t(JP, , , 5)",
                "3\t(ASSIGN, #1, , 500)",
                "4\t(JPF, 500, , 0)",
                "5\t(PRINT, 500, , )",
            ]
        );
    }

    #[test]
    fn test_nested_loops_patch_their_own_breaks() {
        let generated = generate_source(
            "int i; void main(void) { repeat { repeat break; until (i) break; } until (i) }",
        );

        assert_eq!(
            listing(&generated),
            vec![
                "0\t(JP, , , 2)",
                "1\t(JPF, 500, , 0)",
                "2\t(JP, , , 4)",
                "3\t(JPF, 500, , 0)",
            ]
        );
    }

    #[test]
    fn test_break_outside_loop_is_ignored() {
        let generated = generate_source("void main(void) { break; }");
        assert!(generated.code.is_empty());
    }

    #[test]
    fn test_unresolved_condition_keeps_body() {
        let generated = generate_source(
            "int i; void main(void) { repeat { i = 1; break; } until (j) i = 2; }",
        );

        assert_eq!(
            listing(&generated),
            vec![
                "0\t(ASSIGN, #1, , 500)",
                "1\t(JP, , , 2)",
                "2\t(ASSIGN, #2, , 500)",
            ]
        );
    }
}
