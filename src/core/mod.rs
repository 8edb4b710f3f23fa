pub mod complex;
pub mod gates;
pub mod simulator;
pub mod state;

pub use complex::Complex;
pub use gates::Matrix2x2;
pub use simulator::Simulator;
pub use state::{StateVector, MAX_QUBITS};
