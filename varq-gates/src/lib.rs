//! Gate matrices for the varq gate catalog
//!
//! - [`matrices`]: constant matrices and parametric generators (rotations,
//!   U3, FSim) plus rotation derivatives
//! - [`GateMatrix`]: the matrix of a [`varq_core::Gate`] bound to parameter values
//!
//! # Example
//! ```
//! use varq_core::{Gate, ParameterValues};
//! use varq_gates::GateMatrix;
//! use std::f64::consts::PI;
//!
//! let mut values = ParameterValues::new();
//! values.insert("theta".into(), PI);
//! let m = GateMatrix::for_gate(&Gate::rx("theta"), &values).unwrap();
//! assert!(m.is_unitary(1e-12));
//! ```

pub mod gate_matrix;
pub mod matrices;
pub mod matrix_ops;

pub use gate_matrix::GateMatrix;
pub use matrices::{Matrix2, Matrix4};
