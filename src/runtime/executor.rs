/// Shot executor.
///
/// Runs a `Program` once against a `Simulator` and a `ClassicalMemory`
/// using a program counter:
///
///   - Gates apply to the simulator; angles are evaluated against memory at
///     the moment the gate executes, so bound parameters take effect there
///   - MEASURE collapses a qubit and optionally stores 0/1 into a cell
///   - MOVE and arithmetic update memory in place
///   - LABEL is a no-op; JUMP, JUMP-WHEN and JUMP-UNLESS move the PC
///   - HALT ends the shot early
///
/// Infinite-loop guard:
///   Execution is capped at `max_steps` instructions per shot.
use std::collections::HashMap;
use tracing::trace;
use crate::compiler::ir::{Expression, Instruction, MemoryReference, Program};
use crate::core::Simulator;
use super::{memory::ClassicalMemory, RuntimeError};

/// Default upper bound on instructions executed in one shot.
pub const MAX_STEPS: usize = 1_000_000;

/// Counters for one completed shot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShotStats {
    /// Total instruction steps executed (accounts for loops and branches).
    pub steps_executed: usize,
    /// Gate applications, counting repeats inside loops.
    pub gate_count: usize,
    /// Conditional jumps that were taken.
    pub branch_count: usize,
}

/// Reusable per-program executor. Holds the label table so each shot only
/// pays for the walk itself; shareable across threads.
#[derive(Debug)]
pub struct Executor<'p> {
    program: &'p Program,
    labels: HashMap<&'p str, usize>,
    max_steps: usize,
}

/// Label name → index of the instruction after the label.
fn build_label_table(instructions: &[Instruction]) -> HashMap<&str, usize> {
    instructions
        .iter()
        .enumerate()
        .filter_map(|(i, instr)| match instr {
            Instruction::Label(name) => Some((name.as_str(), i + 1)),
            _ => None,
        })
        .collect()
}

impl<'p> Executor<'p> {
    pub fn new(program: &'p Program, max_steps: usize) -> Self {
        Self { program, labels: build_label_table(&program.instructions), max_steps }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    fn jump_target(&self, label: &str) -> Result<usize, RuntimeError> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| RuntimeError::Fault { msg: format!("undefined label '@{label}' at runtime") })
    }

    fn angle(theta: &Expression, memory: &ClassicalMemory) -> Result<f64, RuntimeError> {
        for reference in theta.addresses() {
            memory.read_real(reference)?;
        }
        Ok(theta.evaluate(&|reference: &MemoryReference| memory.read_real(reference).unwrap_or(f64::NAN)))
    }

    /// Execute one shot. `sim` must be at least `program.num_qubits` wide.
    pub fn run_shot(
        &self,
        sim: &mut Simulator,
        memory: &mut ClassicalMemory,
    ) -> Result<ShotStats, RuntimeError> {
        let instructions = &self.program.instructions;
        let mut stats = ShotStats::default();
        let mut pc: usize = 0;

        while pc < instructions.len() {
            if stats.steps_executed >= self.max_steps {
                return Err(RuntimeError::StepLimitExceeded { limit: self.max_steps });
            }
            stats.steps_executed += 1;

            let instr = &instructions[pc];
            if instr.is_gate() {
                stats.gate_count += 1;
            }

            match instr {
                // ── Single-qubit gates ──────────────────────────────────
                Instruction::I(_)                   => {}
                Instruction::H(q)                   => { sim.h(*q); }
                Instruction::X(q)                   => { sim.x(*q); }
                Instruction::Y(q)                   => { sim.y(*q); }
                Instruction::Z(q)                   => { sim.z(*q); }
                Instruction::S(q)                   => { sim.s(*q); }
                Instruction::T(q)                   => { sim.t(*q); }
                Instruction::Rx { qubit, theta }    => { sim.rx(*qubit, Self::angle(theta, memory)?); }
                Instruction::Ry { qubit, theta }    => { sim.ry(*qubit, Self::angle(theta, memory)?); }
                Instruction::Rz { qubit, theta }    => { sim.rz(*qubit, Self::angle(theta, memory)?); }
                Instruction::Phase { qubit, theta } => { sim.phase(*qubit, Self::angle(theta, memory)?); }

                // ── Multi-qubit gates ───────────────────────────────────
                Instruction::Cnot { control, target } => { sim.cnot(*control, *target); }
                Instruction::Cz   { control, target } => { sim.cz(*control, *target); }
                Instruction::Swap { qubit_a, qubit_b }=> { sim.swap(*qubit_a, *qubit_b); }
                Instruction::Toffoli { control0, control1, target } => {
                    sim.toffoli(*control0, *control1, *target);
                }

                // ── Measurement and reset ───────────────────────────────
                Instruction::Measure { qubit, target } => {
                    let outcome = sim.measure(*qubit);
                    if let Some(target) = target {
                        memory.write_integer(target, i64::from(outcome))?;
                    }
                }
                Instruction::Reset(Some(q)) => { sim.reset_qubit(*q); }
                Instruction::Reset(None) => sim.reset(),

                // ── Classical memory ────────────────────────────────────
                Instruction::Move { destination, source } => memory.move_value(destination, source)?,
                Instruction::Arithmetic { operator, destination, source } => {
                    memory.arithmetic(*operator, destination, source)?
                }

                // ── Control flow ────────────────────────────────────────
                Instruction::Label(_) => {}
                Instruction::Jump { label } => {
                    pc = self.jump_target(label)?;
                    continue;
                }
                Instruction::JumpWhen { label, condition } => {
                    if memory.read_integer(condition)? != 0 {
                        pc = self.jump_target(label)?;
                        stats.branch_count += 1;
                        continue;
                    }
                }
                Instruction::JumpUnless { label, condition } => {
                    if memory.read_integer(condition)? == 0 {
                        pc = self.jump_target(label)?;
                        stats.branch_count += 1;
                        continue;
                    }
                }
                Instruction::Halt => break,
            }

            pc += 1;
        }

        trace!(
            steps = stats.steps_executed,
            gates = stats.gate_count,
            branches = stats.branch_count,
            "shot complete"
        );
        Ok(stats)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
