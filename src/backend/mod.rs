/// Backend seam.
///
/// A backend receives a compiled program, the bound parameters and a shot
/// count, and hands back raw classical memory for every shot. Typing and
/// shape checks happen afterwards in the dispatcher, so a backend only has
/// to report what was written.
pub mod qvm;

pub use qvm::Qvm;

use std::collections::HashMap;
use thiserror::Error;

use crate::compiler::Program;
use crate::parameters::BoundParameters;

/// Raw contents of one register after one shot.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValues {
    Integer(Vec<i64>),
    Real(Vec<f64>),
}

impl RawValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(v) => v.len(),
            Self::Real(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Register name → raw values, for the registers written during one shot.
pub type ShotMemory = HashMap<String, RawValues>;

/// Everything a backend needs for one dispatch.
#[derive(Debug, Clone, Copy)]
pub struct RunRequest<'a> {
    pub program: &'a Program,
    pub parameters: &'a BoundParameters,
    pub shots: u16,
    /// Registers the caller will read; a backend may omit everything else.
    pub readouts: &'a [&'a str],
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("program needs {required} qubits but the backend allows at most {max}")]
    TooManyQubits { required: usize, max: usize },

    #[error("shot {shot} exceeded the step limit of {limit}")]
    StepLimitExceeded { shot: usize, limit: usize },

    #[error("shot {shot} failed: {msg}")]
    Runtime { shot: usize, msg: String },

    #[error("failed: {0}")]
    Failed(String),
}

pub trait Backend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Run `request.shots` shots. The result holds exactly one entry per
    /// shot, in shot order.
    fn run(&self, request: &RunRequest<'_>) -> Result<Vec<ShotMemory>, BackendError>;
}
