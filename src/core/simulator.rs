/// Chainable state-vector simulator.
///
/// One `Simulator` is one shot: the backend builds a fresh instance per shot
/// and discards it afterwards. Measurement randomness comes from an owned
/// `StdRng`, seeded explicitly for reproducible runs or from OS entropy.
use super::gates::{self, apply_cnot, apply_cz, apply_single_qubit_gate, apply_swap, apply_toffoli};
use super::state::StateVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct Simulator {
    pub state: StateVector,
    rng: StdRng,
}

impl Simulator {
    /// Register of `num_qubits` in |0...0⟩ with an entropy-seeded RNG.
    pub fn new(num_qubits: usize) -> Self {
        Self { state: StateVector::new(num_qubits), rng: StdRng::from_entropy() }
    }

    /// Deterministic measurement outcomes for a given seed.
    pub fn with_seed(num_qubits: usize, seed: u64) -> Self {
        Self { state: StateVector::new(num_qubits), rng: StdRng::seed_from_u64(seed) }
    }

    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits
    }

    // ── Single-qubit gates ────────────────────────────────────────────────

    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::hadamard(), qubit)
    }

    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::pauli_x(), qubit)
    }

    pub fn y(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::pauli_y(), qubit)
    }

    pub fn z(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::pauli_z(), qubit)
    }

    pub fn s(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::s_gate(), qubit)
    }

    pub fn t(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::t_gate(), qubit)
    }

    pub fn rx(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.apply(&gates::rx(theta), qubit)
    }

    pub fn ry(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.apply(&gates::ry(theta), qubit)
    }

    pub fn rz(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.apply(&gates::rz(theta), qubit)
    }

    pub fn phase(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.apply(&gates::phase_gate(theta), qubit)
    }

    pub fn apply(&mut self, gate: &gates::Matrix2x2, qubit: usize) -> &mut Self {
        apply_single_qubit_gate(&mut self.state, gate, qubit);
        self
    }

    // ── Multi-qubit gates ─────────────────────────────────────────────────

    pub fn cnot(&mut self, control: usize, target: usize) -> &mut Self {
        apply_cnot(&mut self.state, control, target);
        self
    }

    pub fn cz(&mut self, control: usize, target: usize) -> &mut Self {
        apply_cz(&mut self.state, control, target);
        self
    }

    pub fn swap(&mut self, qubit_a: usize, qubit_b: usize) -> &mut Self {
        apply_swap(&mut self.state, qubit_a, qubit_b);
        self
    }

    pub fn toffoli(&mut self, control0: usize, control1: usize, target: usize) -> &mut Self {
        apply_toffoli(&mut self.state, control0, control1, target);
        self
    }

    // ── Measurement and reset ─────────────────────────────────────────────

    /// Measure `qubit`, collapsing the state. `true` is |1⟩.
    pub fn measure(&mut self, qubit: usize) -> bool {
        let r = self.rng.gen::<f64>();
        self.state.collapse(qubit, r)
    }

    /// Active reset of one qubit: measure, then flip back to |0⟩ if needed.
    pub fn reset_qubit(&mut self, qubit: usize) -> &mut Self {
        if self.measure(qubit) {
            self.x(qubit);
        }
        self
    }

    /// Reset the whole register to |0...0⟩.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Basis-state probabilities without collapsing.
    pub fn probabilities(&self) -> Vec<f64> {
        self.state.amplitudes.iter().map(|a| a.norm_sq()).collect()
    }

    pub fn qubit_probability_one(&self, qubit: usize) -> f64 {
        self.state.marginal_probability_one(qubit)
    }
}
