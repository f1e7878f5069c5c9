//! Core types for the varq variational simulation toolkit
//!
//! This crate provides the object model consumed by a simulator:
//! - [`QubitId`]: qubit addressing
//! - [`Gate`] / [`GateOp`]: the closed gate catalog and gates bound to qubits
//! - [`ParameterResolver`]: linear parameter expressions with encoder/ansatz roles
//! - [`Circuit`] / [`CircuitBuilder`]: immutable circuits
//! - [`operators`]: Pauli sums, Hamiltonians and CSR matrices
//!
//! # Example
//! ```
//! use varq_core::{CircuitBuilder, ParameterResolver};
//!
//! let mut builder = CircuitBuilder::new();
//! builder.h(0).unwrap().cx(1, 0).unwrap().ry(1, "theta").unwrap();
//! let circuit = builder.build();
//! assert_eq!(circuit.n_qubits(), 2);
//! assert_eq!(circuit.ansatz_params(), vec!["theta"]);
//! ```

pub mod circuit;
pub mod circuit_builder;
pub mod error;
pub mod gate;
pub mod noise;
pub mod operators;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use circuit_builder::CircuitBuilder;
pub use error::QuantumError;
pub use gate::{FixedGate, Gate, GateOp, RotationGate};
pub use noise::{KrausOperator, NoiseChannel};
pub use num_complex::Complex64;
pub use parameter::{ParameterResolver, ParameterValues};
pub use qubit::{QubitId, MAX_QUBITS};

/// Type alias for results in varq core
pub type Result<T> = std::result::Result<T, QuantumError>;
