/// Gate matrices and state-vector kernels.
///
/// Single-qubit gates are 2×2 unitaries applied to every amplitude pair that
/// differs only in the target bit, O(2^n) per gate. Controlled gates permute
/// or phase amplitudes directly.
use super::complex::Complex;
use super::state::StateVector;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

/// Row-major 2×2 complex matrix.
pub type Matrix2x2 = [[Complex; 2]; 2];

pub fn identity() -> Matrix2x2 {
    [[Complex::one(), Complex::zero()], [Complex::zero(), Complex::one()]]
}

pub fn hadamard() -> Matrix2x2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

pub fn pauli_x() -> Matrix2x2 {
    [[Complex::zero(), Complex::one()], [Complex::one(), Complex::zero()]]
}

pub fn pauli_y() -> Matrix2x2 {
    [[Complex::zero(), -Complex::i()], [Complex::i(), Complex::zero()]]
}

pub fn pauli_z() -> Matrix2x2 {
    phase_gate(std::f64::consts::PI)
}

pub fn s_gate() -> Matrix2x2 {
    [[Complex::one(), Complex::zero()], [Complex::zero(), Complex::i()]]
}

pub fn t_gate() -> Matrix2x2 {
    phase_gate(FRAC_PI_4)
}

/// Rx(θ) = [[cos θ/2, -i sin θ/2], [-i sin θ/2, cos θ/2]]
pub fn rx(theta: f64) -> Matrix2x2 {
    let cos = Complex::new((theta / 2.0).cos(), 0.0);
    let i_sin = Complex::new(0.0, -(theta / 2.0).sin());
    [[cos, i_sin], [i_sin, cos]]
}

/// Ry(θ) = [[cos θ/2, -sin θ/2], [sin θ/2, cos θ/2]]
pub fn ry(theta: f64) -> Matrix2x2 {
    let cos = Complex::new((theta / 2.0).cos(), 0.0);
    let sin = Complex::new((theta / 2.0).sin(), 0.0);
    [[cos, -sin], [sin, cos]]
}

/// Rz(θ) = diag(e^(-iθ/2), e^(iθ/2))
pub fn rz(theta: f64) -> Matrix2x2 {
    [
        [Complex::from_polar(1.0, -theta / 2.0), Complex::zero()],
        [Complex::zero(), Complex::from_polar(1.0, theta / 2.0)],
    ]
}

/// P(θ) = diag(1, e^(iθ))
pub fn phase_gate(theta: f64) -> Matrix2x2 {
    [[Complex::one(), Complex::zero()], [Complex::zero(), Complex::from_polar(1.0, theta)]]
}

// ── Kernels ───────────────────────────────────────────────────────────────

pub fn apply_single_qubit_gate(state: &mut StateVector, gate: &Matrix2x2, target: usize) {
    assert!(target < state.num_qubits, "target qubit out of range");

    let mask = 1 << target;
    for i in 0..state.dim() {
        if i & mask != 0 {
            continue;
        }
        let j = i | mask;
        let a0 = state.amplitudes[i];
        let a1 = state.amplitudes[j];
        state.amplitudes[i] = gate[0][0] * a0 + gate[0][1] * a1;
        state.amplitudes[j] = gate[1][0] * a0 + gate[1][1] * a1;
    }
}

pub fn apply_cnot(state: &mut StateVector, control: usize, target: usize) {
    assert!(control < state.num_qubits && target < state.num_qubits, "qubit out of range");
    assert_ne!(control, target, "control and target must differ");

    let control_mask = 1 << control;
    let target_mask = 1 << target;
    for i in 0..state.dim() {
        if i & control_mask != 0 && i & target_mask == 0 {
            state.amplitudes.swap(i, i | target_mask);
        }
    }
}

pub fn apply_cz(state: &mut StateVector, control: usize, target: usize) {
    assert!(control < state.num_qubits && target < state.num_qubits, "qubit out of range");
    assert_ne!(control, target, "control and target must differ");

    let mask = (1 << control) | (1 << target);
    for i in 0..state.dim() {
        if i & mask == mask {
            state.amplitudes[i] = -state.amplitudes[i];
        }
    }
}

pub fn apply_swap(state: &mut StateVector, qubit_a: usize, qubit_b: usize) {
    assert!(qubit_a < state.num_qubits && qubit_b < state.num_qubits, "qubit out of range");
    assert_ne!(qubit_a, qubit_b, "SWAP requires two different qubits");

    let mask_a = 1 << qubit_a;
    let mask_b = 1 << qubit_b;
    for i in 0..state.dim() {
        // visit each differing pair once: a set, b clear
        if i & mask_a != 0 && i & mask_b == 0 {
            state.amplitudes.swap(i, (i & !mask_a) | mask_b);
        }
    }
}

pub fn apply_toffoli(state: &mut StateVector, control0: usize, control1: usize, target: usize) {
    let n = state.num_qubits;
    assert!(control0 < n && control1 < n && target < n, "qubit out of range");
    assert!(control0 != control1 && control0 != target && control1 != target);

    let controls = (1 << control0) | (1 << control1);
    let target_mask = 1 << target;
    for i in 0..state.dim() {
        if i & controls == controls && i & target_mask == 0 {
            state.amplitudes.swap(i, i | target_mask);
        }
    }
}
