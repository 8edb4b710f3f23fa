/// State vector for an n-qubit register.
///
/// Holds one amplitude per basis state (2^n total). Qubit 0 is the least
/// significant bit of the basis index.
use super::complex::Complex;

/// Hard ceiling on register width; 2^30 amplitudes is already 16 GiB.
pub const MAX_QUBITS: usize = 30;

#[derive(Debug, Clone)]
pub struct StateVector {
    pub num_qubits: usize,
    pub amplitudes: Vec<Complex>,
}

impl StateVector {
    /// New register in |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        assert!(num_qubits >= 1, "at least one qubit required");
        assert!(num_qubits <= MAX_QUBITS, "num_qubits exceeds {MAX_QUBITS}");

        let mut amplitudes = vec![Complex::zero(); 1 << num_qubits];
        amplitudes[0] = Complex::one();
        Self { num_qubits, amplitudes }
    }

    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(Complex::norm_sq).sum()
    }

    /// Rescale to unit length after a projection.
    pub fn normalize(&mut self) {
        let total = self.total_probability();
        assert!(total > 1e-12, "state vector collapsed to zero");
        let inv_norm = 1.0 / total.sqrt();
        for amp in self.amplitudes.iter_mut() {
            *amp = amp.scale(inv_norm);
        }
    }

    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex::zero());
        self.amplitudes[0] = Complex::one();
    }

    #[inline(always)]
    pub fn qubit_bit(basis_idx: usize, qubit: usize) -> bool {
        (basis_idx >> qubit) & 1 == 1
    }

    /// P(qubit = 1), marginalized over every other qubit.
    pub fn marginal_probability_one(&self, qubit: usize) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| Self::qubit_bit(*i, qubit))
            .map(|(_, a)| a.norm_sq())
            .sum()
    }

    /// Projective measurement of `qubit` driven by a uniform sample `rng` in [0, 1).
    ///
    /// Zeroes every amplitude inconsistent with the outcome and renormalizes.
    pub fn collapse(&mut self, qubit: usize, rng: f64) -> bool {
        let outcome = rng < self.marginal_probability_one(qubit);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if Self::qubit_bit(i, qubit) != outcome {
                *amp = Complex::zero();
            }
        }
        self.normalize();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let sv = StateVector::new(2);
        assert_eq!(sv.dim(), 4);
        assert_eq!(sv.amplitudes[0], Complex::one());
        assert!(sv.amplitudes[1..].iter().all(|a| *a == Complex::zero()));
    }

    #[test]
    fn test_qubit_bit_is_lsb_first() {
        // 5 = 0b101
        assert!(StateVector::qubit_bit(5, 0));
        assert!(!StateVector::qubit_bit(5, 1));
        assert!(StateVector::qubit_bit(5, 2));
    }

    #[test]
    fn test_collapse_superposition() {
        let mut sv = StateVector::new(1);
        let amp = Complex::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        sv.amplitudes[0] = amp;
        sv.amplitudes[1] = amp;
        assert!((sv.marginal_probability_one(0) - 0.5).abs() < 1e-10);

        assert!(sv.collapse(0, 0.1));
        assert!((sv.amplitudes[1].norm_sq() - 1.0).abs() < 1e-10);
        assert!((sv.total_probability() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_reset() {
        let mut sv = StateVector::new(2);
        sv.amplitudes[0] = Complex::zero();
        sv.amplitudes[3] = Complex::one();
        sv.reset();
        assert_eq!(sv.amplitudes[0], Complex::one());
        assert_eq!(sv.amplitudes[3], Complex::zero());
    }
}
