//! Dense state vectors for varq
//!
//! This crate owns the amplitude-level work of the simulator:
//!
//! - [`StateVector`]: a `2^n` complex vector with little-endian qubit order
//! - [`kernels`]: in-place application of 2×2 and 4×4 matrices, optionally
//!   controlled
//! - [`measurement`]: projective collapse and [`SamplingTable`] for repeated
//!   shots
//! - [`observable`]: Pauli-sum and sparse-matrix Hamiltonians acting on a state
//!
//! # Example
//!
//! ```
//! use num_complex::Complex64;
//! use varq_core::operators::{Hamiltonian, QubitOperator};
//! use varq_state::StateVector;
//!
//! let h = std::f64::consts::FRAC_1_SQRT_2;
//! let hadamard = [
//!     [Complex64::new(h, 0.0), Complex64::new(h, 0.0)],
//!     [Complex64::new(h, 0.0), Complex64::new(-h, 0.0)],
//! ];
//! let mut state = StateVector::new(1).unwrap();
//! state.apply_single_qubit(&hadamard, 0, 0).unwrap();
//!
//! let x0 = Hamiltonian::from_operator(QubitOperator::from_term("X0", 1.0).unwrap()).unwrap();
//! assert!((state.expectation(&x0).unwrap().re - 1.0).abs() < 1e-12);
//! ```

pub mod error;
pub mod kernels;
pub mod measurement;
pub mod observable;
pub mod state_vector;

pub use error::{Result, StateError};
pub use measurement::SamplingTable;
pub use observable::pauli_sandwich;
pub use state_vector::{StateVector, MAX_QUBITS, ZERO_NORM_TOLERANCE};
