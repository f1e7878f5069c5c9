//! State-vector simulation for variational quantum algorithms
//!
//! The crate evolves a dense amplitude vector through [`varq_core::Circuit`]s
//! and exposes the operations a variational workflow needs:
//!
//! - gate and circuit application with named parameter values
//! - projective measurement and repeated-shot [`Simulator::sample`]
//! - expectation values of [`varq_core::operators::Hamiltonian`]s
//! - batched expectation-with-gradient operators ([`GradOps`]) built on the
//!   adjoint method and evaluated on a rayon pool
//!
//! Logging goes through the `log` facade under the `varq_sim::*` targets;
//! install any logger (for instance `env_logger`) to see it.
//!
//! # Example
//!
//! ```
//! use varq_core::operators::{Hamiltonian, QubitOperator};
//! use varq_core::{CircuitBuilder, ParameterValues};
//! use varq_sim::Simulator;
//!
//! let mut builder = CircuitBuilder::new();
//! builder.h(0).unwrap();
//! let circuit = builder.build();
//!
//! let mut sim = Simulator::new(1).unwrap();
//! sim.apply_circuit(&circuit, &ParameterValues::new()).unwrap();
//!
//! let x0 = Hamiltonian::from_operator(QubitOperator::from_term("X0", 1.0).unwrap()).unwrap();
//! assert!((sim.expectation(&x0).unwrap().re - 1.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod error;
mod execution;
pub mod gradient;
pub mod result;
pub mod simulator;

pub use config::SimulatorConfig;
pub use error::{Result, SimulatorError};
pub use gradient::{thread_balance, GradOps, GradResult, Mode};
pub use result::MeasureResult;
pub use simulator::{Simulator, BACKEND_NAME};
