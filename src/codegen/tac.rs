//! Three-address code
//!
//! An [`Instruction`] is `(line, op, arg1, arg2, result)`. Lines are indices into
//! the instruction list and double as jump targets. Only `result` is ever
//! rewritten after emission (by backpatching).

use std::fmt;

use crate::parser::ast::BinOp;

/// TAC operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Assign,
    Add,
    Sub,
    Mult,
    Eq,
    Lt,
    Le,
    /// Jump to `result` if `arg1` is false.
    Jpf,
    /// Unconditional jump to `result`.
    Jp,
    Print,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Assign => "ASSIGN",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mult => "MULT",
            Opcode::Eq => "EQ",
            Opcode::Lt => "LT",
            Opcode::Le => "LE",
            Opcode::Jpf => "JPF",
            Opcode::Jp => "JP",
            Opcode::Print => "PRINT",
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::Jpf | Opcode::Jp)
    }
}

impl From<BinOp> for Opcode {
    fn from(op: BinOp) -> Self {
        match op {
            BinOp::Add => Opcode::Add,
            BinOp::Sub => Opcode::Sub,
            BinOp::Mul => Opcode::Mult,
            BinOp::Lt => Opcode::Lt,
            BinOp::Eq => Opcode::Eq,
            BinOp::Le => Opcode::Le,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Instruction operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Direct memory address: `500`
    Address(usize),
    /// Immediate value: `#5`
    Immediate(i64),
    /// Memory at the address stored in the given slot: `@1004`
    Indirect(usize),
    /// Jump target
    Line(usize),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Address(addr) => write!(f, "{}", addr),
            Operand::Immediate(value) => write!(f, "#{}", value),
            Operand::Indirect(addr) => write!(f, "@{}", addr),
            Operand::Line(line) => write!(f, "{}", line),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub line: usize,
    pub op: Opcode,
    pub arg1: Option<Operand>,
    pub arg2: Option<Operand>,
    pub result: Option<Operand>,
}

impl Instruction {
    pub fn new(
        line: usize,
        op: Opcode,
        arg1: Option<Operand>,
        arg2: Option<Operand>,
        result: Option<Operand>,
    ) -> Self {
        Self {
            line,
            op,
            arg1,
            arg2,
            result,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |operand: &Option<Operand>| operand.map(|o| o.to_string()).unwrap_or_default();
        write!(
            f,
            "{}\t({}, {}, {}, {})",
            self.line,
            self.op,
            show(&self.arg1),
            show(&self.arg2),
            show(&self.result)
        )
    }
}

/// One instruction per line, in order.
pub fn render_code(code: &[Instruction]) -> String {
    code.iter().map(|instr| format!("{}\n", instr)).collect()
}
