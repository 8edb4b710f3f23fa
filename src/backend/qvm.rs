/// Local state-vector backend.
///
/// Every shot gets a fresh `Simulator` and fresh `ClassicalMemory`, with
/// bound parameters loaded before the first instruction. Shots are
/// independent, so they fan out over the rayon pool when
/// `parallel_shots` is set; the indexed collect keeps shot order.
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::{Backend, BackendError, RunRequest, ShotMemory};
use crate::config::QvmConfig;
use crate::core::{Simulator, MAX_QUBITS};
use crate::runtime::{ClassicalMemory, Executor, RuntimeError};

#[derive(Debug, Clone, Default)]
pub struct Qvm {
    config: QvmConfig,
}

impl Qvm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: QvmConfig) -> Self {
        Self { config }
    }

    /// Fix the base seed; shot `k` runs with `seed + k`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_parallel_shots(mut self, parallel: bool) -> Self {
        self.config.parallel_shots = parallel;
        self
    }

    pub fn config(&self) -> &QvmConfig {
        &self.config
    }

    fn run_shot(
        &self,
        executor: &Executor<'_>,
        request: &RunRequest<'_>,
        shot: usize,
    ) -> Result<ShotMemory, BackendError> {
        let program = executor.program();
        let width = program.num_qubits.max(1);
        let mut sim = match self.config.seed {
            Some(seed) => Simulator::with_seed(width, seed.wrapping_add(shot as u64)),
            None => Simulator::new(width),
        };

        let mut memory = ClassicalMemory::new(program);
        for name in request.parameters.names() {
            let length = program.region(name).map_or(0, |region| region.length);
            memory
                .bind(name, &request.parameters.values(name, length))
                .map_err(|err| BackendError::Runtime { shot, msg: err.to_string() })?;
        }

        executor.run_shot(&mut sim, &mut memory).map_err(|err| match err {
            RuntimeError::StepLimitExceeded { limit } => BackendError::StepLimitExceeded { shot, limit },
            RuntimeError::Fault { msg } => BackendError::Runtime { shot, msg },
        })?;

        Ok(memory.snapshot(request.readouts))
    }
}

impl Backend for Qvm {
    fn name(&self) -> &str {
        "qvm"
    }

    #[instrument(level = "debug", name = "qvm_run", skip_all, fields(shots = request.shots))]
    fn run(&self, request: &RunRequest<'_>) -> Result<Vec<ShotMemory>, BackendError> {
        let max = self.config.max_qubits.min(MAX_QUBITS);
        let required = request.program.num_qubits;
        if required > max {
            return Err(BackendError::TooManyQubits { required, max });
        }
        request
            .parameters
            .validate(request.program)
            .map_err(|err| BackendError::Failed(err.to_string()))?;

        let executor = Executor::new(request.program, self.config.max_steps);
        let shots = usize::from(request.shots);
        debug!(qubits = required, parallel = self.config.parallel_shots, "running shots");

        if self.config.parallel_shots && shots > 1 {
            (0..shots)
                .into_par_iter()
                .map(|shot| self.run_shot(&executor, request, shot))
                .collect()
        } else {
            (0..shots).map(|shot| self.run_shot(&executor, request, shot)).collect()
        }
    }
}
