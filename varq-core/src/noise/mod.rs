//! Single-qubit noise channels
//!
//! Channels are described in the Kraus formalism:
//!
//! - **Pauli channels**: bit flip, phase flip, bit-phase flip, depolarizing
//! - **Amplitude damping**: energy relaxation (T1 decay)
//! - **Phase damping**: dephasing (T2 decay)
//! - **Custom Kraus sets**
//!
//! A state-vector simulator applies a channel as a quantum trajectory, so a
//! circuit containing channels is stochastic and must be sampled shot by shot.

pub mod channels;
pub mod types;

pub use channels::COMPLETENESS_TOLERANCE;
pub use types::{KrausOperator, Matrix2, NoiseChannel};
