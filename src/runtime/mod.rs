/// Shot runtime.
///
/// The runtime layer sits between a compiled `Program` and a backend:
///   - PC-based execution with classical control flow
///   - Classical memory (declared regions, bound parameters, measurements)
///
/// Architecture:
///   source → Compiler (lexer+parser+IR) → Backend → Runtime Executor (per shot)
pub mod executor;
pub mod memory;

pub use executor::{Executor, ShotStats, MAX_STEPS};
pub use memory::ClassicalMemory;

use thiserror::Error;

/// Failure inside a single shot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("execution exceeded {limit} steps; possible infinite loop in program")]
    StepLimitExceeded { limit: usize },
    #[error("{msg}")]
    Fault { msg: String },
}
