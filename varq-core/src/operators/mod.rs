//! Pauli operators, Hamiltonians and sparse matrices

pub mod hamiltonian;
pub mod pauli;
pub mod qubit_operator;
pub mod sparse;

pub use hamiltonian::{Hamiltonian, HowTo};
pub use pauli::{Pauli, PauliMasks, PauliTerm};
pub use qubit_operator::{QubitOperator, DEFAULT_COMPRESS_TOLERANCE};
pub use sparse::CsrMatrix;
