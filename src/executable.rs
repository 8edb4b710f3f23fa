/// Executable: a compiled program plus everything a dispatch needs.
///
/// Building an `Executable` compiles once. Shot count, parameter bindings
/// and the read-set only record intent; they are checked against the
/// program on every `execute`, never cached, because any of them may have
/// changed since the last dispatch.
///
/// ```
/// use qexec::Executable;
///
/// let mut exe = Executable::from_quil(
///     "DECLARE ro BIT[2]\nH 0\nCNOT 0 1\nMEASURE 0 ro[0]\nMEASURE 1 ro[1]",
/// )?;
/// exe.set_shots(3).read_from("ro");
///
/// let store = exe.execute().into_result()?;
/// let rows = store.get_data("ro").and_then(|d| d.as_byte()).unwrap_or_default();
/// assert_eq!(rows.len(), 3);
/// assert!(rows.iter().all(|row| row[0] == row[1]));
/// # Ok::<(), qexec::Error>(())
/// ```
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, debug_span, trace};

use crate::backend::{Backend, Qvm, RunRequest};
use crate::compiler::{compile, Program};
use crate::config::Config;
use crate::error::Error;
use crate::parameters::{BoundParameters, ReadSet};
use crate::result::{ExecutionResult, ResultStore};

#[derive(Clone)]
pub struct Executable {
    program: Arc<Program>,
    shots: u16,
    parameters: BoundParameters,
    reads: ReadSet,
    backend: Option<Arc<dyn Backend>>,
}

impl Executable {
    /// Compile `source` and wrap it with one shot, no bindings and an empty
    /// read-set.
    pub fn from_quil(source: &str) -> Result<Self, Error> {
        Ok(Self::from_program(compile(source)?))
    }

    pub fn from_program(program: Program) -> Self {
        Self {
            program: Arc::new(program),
            shots: 1,
            parameters: BoundParameters::new(),
            reads: ReadSet::new(),
            backend: None,
        }
    }

    /// Dispatch to `backend` instead of a local `Qvm`.
    pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_shots(mut self, shots: u16) -> Self {
        self.shots = shots;
        self
    }

    /// Zero is accepted here and rejected at dispatch.
    pub fn set_shots(&mut self, shots: u16) -> &mut Self {
        self.shots = shots;
        self
    }

    pub fn shots(&self) -> u16 {
        self.shots
    }

    /// Bind `name[index] = value` for later dispatches. Unknown names and
    /// out-of-range indices surface as an error result from `execute`.
    pub fn set_param(&mut self, name: impl Into<String>, index: usize, value: f64) -> &mut Self {
        self.parameters.set(name, index, value);
        self
    }

    /// Ask for register `name` in every later result. Idempotent. With no
    /// request at all, dispatch reads `ro`.
    pub fn read_from(&mut self, name: impl Into<String>) -> &mut Self {
        self.reads.insert(name);
        self
    }

    pub fn parameters(&self) -> &BoundParameters {
        &self.parameters
    }

    pub fn read_set(&self) -> &ReadSet {
        &self.reads
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Shared handle to the compiled program.
    pub fn shared_program(&self) -> Arc<Program> {
        Arc::clone(&self.program)
    }

    /// Dispatch on the attached backend, or on a `Qvm` configured from
    /// `Config::load()` when none is attached.
    pub fn execute(&self) -> ExecutionResult {
        match &self.backend {
            Some(backend) => self.execute_on(backend.as_ref()),
            None => self.execute_on(&Qvm::from_config(Config::load().qvm)),
        }
    }

    pub fn execute_on(&self, backend: &dyn Backend) -> ExecutionResult {
        let span = debug_span!(
            "execute",
            backend = backend.name(),
            shots = self.shots,
            registers = self.reads.len()
        );
        let _enter = span.enter();

        let result = self.dispatch(backend);
        match &result {
            Ok(store) => debug!(elapsed = ?store.duration(), "dispatch succeeded"),
            Err(err) => debug!(error = %err, kind = ?err.kind(), "dispatch rejected"),
        }
        result.into()
    }

    fn dispatch(&self, backend: &dyn Backend) -> Result<ResultStore, Error> {
        if self.shots == 0 {
            return Err(Error::ShotsMustBePositive);
        }
        self.parameters.validate(&self.program)?;
        let reads = self.reads.or_default_readout();
        reads.validate(&self.program)?;

        let readouts: Vec<&str> = reads.iter().collect();
        let request = RunRequest {
            program: &self.program,
            parameters: &self.parameters,
            shots: self.shots,
            readouts: &readouts,
        };

        let started = Instant::now();
        let shots = backend.run(&request)?;
        let duration = started.elapsed();

        ResultStore::decode(&self.program, &reads, shots, usize::from(self.shots), duration)
    }

    /// Release the executable. Equivalent to dropping it.
    pub fn release(self) {}
}

impl Drop for Executable {
    fn drop(&mut self) {
        trace!(
            instructions = self.program.instructions.len(),
            "releasing executable"
        );
    }
}

impl fmt::Debug for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executable")
            .field("program", &self.program)
            .field("shots", &self.shots)
            .field("parameters", &self.parameters)
            .field("reads", &self.reads)
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, RawValues, ShotMemory};
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PARAMETRIC: &str = "DECLARE ro BIT\nDECLARE theta REAL\nRX(pi/2) 0\nRZ(theta) 0\nRX(-pi/2) 0\nMEASURE 0 ro[0]";

    /// Backend that returns canned memory and counts calls.
    struct Canned {
        shot: ShotMemory,
        calls: AtomicUsize,
    }

    impl Backend for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn run(&self, request: &RunRequest<'_>) -> Result<Vec<ShotMemory>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![self.shot.clone(); usize::from(request.shots)])
        }
    }

    struct Broken;

    impl Backend for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn run(&self, _: &RunRequest<'_>) -> Result<Vec<ShotMemory>, BackendError> {
            Err(BackendError::Failed("simulator crashed".into()))
        }
    }

    fn seeded() -> Qvm {
        Qvm::new().with_seed(1)
    }

    #[test]
    fn test_defaults() {
        let exe = Executable::from_quil("DECLARE ro BIT\nMEASURE 0 ro").unwrap();
        assert_eq!(exe.shots(), 1);
        assert!(exe.parameters().is_empty());
        assert!(exe.read_set().is_empty());
        assert_eq!(exe.program().measure_count, 1);
    }

    #[test]
    fn test_compile_error_surfaces_at_create() {
        let err = Executable::from_quil("BOGUS 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compilation);
    }

    #[test]
    fn test_zero_shots_rejected_at_dispatch() {
        let mut exe = Executable::from_quil("DECLARE ro BIT\nMEASURE 0 ro").unwrap();
        exe.set_shots(0).read_from("ro");
        let result = exe.execute_on(&seeded());
        assert_eq!(result.error(), Some(&Error::ShotsMustBePositive));
    }

    #[test]
    fn test_shot_check_precedes_parameter_check() {
        let mut exe = Executable::from_quil(PARAMETRIC).unwrap();
        exe.set_shots(0).set_param("nope", 0, 1.0);
        assert_eq!(exe.execute_on(&seeded()).error().map(Error::kind), Some(ErrorKind::Precondition));
    }

    #[test]
    fn test_parameter_check_precedes_register_check() {
        let mut exe = Executable::from_quil(PARAMETRIC).unwrap();
        exe.set_param("nope", 0, 1.0).read_from("missing");
        assert_eq!(exe.execute_on(&seeded()).error().map(Error::kind), Some(ErrorKind::Parameter));
    }

    #[test]
    fn test_validation_failure_never_reaches_backend() {
        let backend = Canned { shot: ShotMemory::new(), calls: AtomicUsize::new(0) };
        let mut exe = Executable::from_quil(PARAMETRIC).unwrap();
        exe.read_from("missing");
        assert!(!exe.execute_on(&backend).is_success());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_backend_failure_is_error_result() {
        let mut exe = Executable::from_quil(PARAMETRIC).unwrap();
        exe.read_from("ro");
        let result = exe.execute_on(&Broken);
        let err = result.error().unwrap();
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert!(err.to_string().contains("simulator crashed"));
    }

    #[test]
    fn test_dispatch_after_backend_failure_succeeds() {
        let mut exe = Executable::from_quil(PARAMETRIC).unwrap();
        exe.read_from("ro").set_param("theta", 0, 0.0);
        assert!(!exe.execute_on(&Broken).is_success());

        let result = exe.execute_on(&seeded());
        assert!(result.is_success(), "{result:?}");
        assert_eq!(result.get_data("ro").unwrap().as_byte().unwrap(), &[vec![0i8]]);
    }

    #[test]
    fn test_attached_backend_is_used() {
        let mut shot = ShotMemory::new();
        shot.insert("ro".into(), RawValues::Integer(vec![1]));
        let backend = Arc::new(Canned { shot, calls: AtomicUsize::new(0) });
        let mut exe = Executable::from_quil(PARAMETRIC)
            .unwrap()
            .with_backend(backend.clone())
            .with_shots(4);
        exe.read_from("ro");

        let store = exe.execute().into_result().unwrap();
        assert_eq!(store.get_data("ro").unwrap().as_byte().unwrap(), vec![vec![1i8]; 4].as_slice());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_parameter_rebinding_between_dispatches() {
        let mut exe = Executable::from_quil(PARAMETRIC).unwrap();
        exe.read_from("ro").set_shots(8);

        exe.set_param("theta", 0, 0.0);
        let zero = exe.execute_on(&seeded()).into_result().unwrap();
        exe.set_param("theta", 0, std::f64::consts::PI);
        let one = exe.execute_on(&seeded()).into_result().unwrap();

        assert!(zero.get_data("ro").unwrap().as_byte().unwrap().iter().all(|row| row[0] == 0));
        assert!(one.get_data("ro").unwrap().as_byte().unwrap().iter().all(|row| row[0] == 1));
    }

    #[test]
    fn test_release_and_clone_share_program() {
        let exe = Executable::from_quil("H 0").unwrap();
        let copy = exe.clone();
        assert!(Arc::ptr_eq(&exe.shared_program(), &copy.shared_program()));
        exe.release();
        assert_eq!(copy.program().gate_count, 1);
    }
}
