// Generation engine for the TAC back end

use crate::codegen::layout::variable_region_end;
use crate::codegen::symbols::{AddressAllocator, SymbolTable};
use crate::codegen::tac::{Instruction, Opcode, Operand};
use crate::config::CodegenConfig;
use crate::parser::ast::Program;

/// Output of one generation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generated {
    pub code: Vec<Instruction>,
    pub symbols: SymbolTable,
}

/// Tree walker that lowers an AST to three-address code
pub struct CodeGenerator {
    /// Emitted instructions; the index is the line number
    pub(crate) code: Vec<Instruction>,

    /// Flat symbol table shared by globals, locals and parameters
    pub(crate) symbols: SymbolTable,

    /// Allocator for declared names
    pub(crate) variables: AddressAllocator,

    /// Allocator for temporaries
    pub(crate) temporaries: AddressAllocator,

    /// Scale applied to array indices
    pub(crate) word_size: usize,

    /// Call name lowered to `PRINT`
    pub(crate) output_function: String,

    /// Pending `break` jumps, one list per enclosing loop
    pub(crate) loops: Vec<Vec<usize>>,
}

impl CodeGenerator {
    pub fn new(config: &CodegenConfig) -> Self {
        CodeGenerator {
            code: Vec::new(),
            symbols: SymbolTable::new(),
            variables: AddressAllocator::new(config.variable_base, config.word_size),
            temporaries: AddressAllocator::new(config.temporary_base, config.word_size),
            word_size: config.word_size,
            output_function: config.output_function.clone(),
            loops: Vec::new(),
        }
    }

    /// Lower the whole program. Never fails: unresolved pieces emit nothing.
    ///
    /// Temporaries start at the configured base, or past the variable region
    /// when the program's declarations reach beyond it.
    pub fn generate(mut self, program: &Program) -> Generated {
        let variable_end = variable_region_end(program, &self.variables);
        if variable_end > self.temporaries.peek() {
            log::warn!(
                "variables reach address {}, moving temporaries past the configured base {}",
                variable_end,
                self.temporaries.peek()
            );
            self.temporaries = AddressAllocator::new(variable_end, self.word_size);
        }

        for declaration in &program.declarations {
            self.gen_declaration(declaration);
        }
        log::debug!(
            "generated {} instructions, {} symbols",
            self.code.len(),
            self.symbols.len()
        );
        Generated {
            code: self.code,
            symbols: self.symbols,
        }
    }

    // ===== Emission =====

    /// Appends an instruction and returns its line.
    pub(crate) fn emit(
        &mut self,
        op: Opcode,
        arg1: Option<Operand>,
        arg2: Option<Operand>,
        result: Option<Operand>,
    ) -> usize {
        let line = self.code.len();
        let instruction = Instruction::new(line, op, arg1, arg2, result);
        log::trace!("emit {}", instruction);
        self.code.push(instruction);
        line
    }

    /// Points the jump at `line` to `target`.
    pub(crate) fn backpatch(&mut self, line: usize, target: usize) {
        if let Some(instruction) = self.code.get_mut(line) {
            debug_assert!(instruction.op.is_jump());
            instruction.result = Some(Operand::Line(target));
        }
    }

    /// Line the next emitted instruction will get
    pub(crate) fn next_line(&self) -> usize {
        self.code.len()
    }

    pub(crate) fn new_temporary(&mut self) -> Option<usize> {
        let temporary = self.temporaries.allocate();
        if temporary.is_none() {
            log::warn!("temporary region exhausted at {}", self.temporaries.peek());
        }
        temporary
    }
}

/// Convenience wrapper: lower `program` with the given address layout.
pub fn generate(program: &Program, config: &CodegenConfig) -> Generated {
    CodeGenerator::new(config).generate(program)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::parser::lexer::Lexer;
    use crate::parser::parse::synthesize;

    pub(crate) fn generate_source(source: &str) -> Generated {
        let (tokens, _) = Lexer::tokenize(source);
        let tokens: Vec<_> = tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect();
        let synthesis = synthesize(&tokens);
        generate(&synthesis.program, &CodegenConfig::default())
    }

    pub(crate) fn listing(generated: &Generated) -> Vec<String> {
        generated.code.iter().map(|i| i.to_string()).collect()
    }
}
