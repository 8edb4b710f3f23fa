/// Quil-subset compiler pipeline.
///
/// Pipeline: source text → Lexer → Parser (with validation) → `Program`
///
/// Each stage is a separate module with a clean boundary.
/// Lex and parse errors carry source line numbers.
pub mod ir;
pub mod lexer;
pub mod parser;

pub use ir::{
    ArithmeticOperator, Expression, InfixOperator, Instruction, MemoryReference, MemoryRegion,
    Operand, Program, ScalarType,
};
pub use parser::parse;

use thiserror::Error;

/// Error type shared across all compiler stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Unrecognized character or malformed literal
    #[error("lex error on line {line}: {msg}")]
    Lex { line: usize, msg: String },
    /// Syntactically invalid instruction
    #[error("parse error on line {line}: {msg}")]
    Parse { line: usize, msg: String },
    /// Semantically invalid program (undeclared region, bad label, ...)
    #[error("validation error: {msg}")]
    Validation { msg: String },
}

/// Lex, parse and validate a source string.
#[tracing::instrument(level = "debug", skip(source), fields(bytes = source.len()))]
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let tokens = lexer::tokenize(source)?;
    let program = parser::parse(tokens)?;
    tracing::debug!(
        qubits = program.num_qubits,
        instructions = program.instructions.len(),
        regions = program.memory_regions.len(),
        "compiled program"
    );
    Ok(program)
}
