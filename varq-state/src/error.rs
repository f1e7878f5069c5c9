//! Error types for state vector operations

use thiserror::Error;

/// Errors that can occur during state vector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Invalid state dimension
    #[error("Invalid state dimension {dimension}, expected a power of 2 of at least 2")]
    InvalidDimension { dimension: usize },

    /// Qubit count outside what a dense vector can hold
    #[error("Cannot allocate a {num_qubits}-qubit state (supported: 1..={max})")]
    InvalidQubitCount { num_qubits: usize, max: usize },

    /// State not normalized
    #[error("State vector not normalized, norm = {norm}")]
    NotNormalized { norm: f64 },

    /// Vector with no weight, cannot be normalized
    #[error("State vector has zero norm")]
    ZeroNorm,

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Operator acting on more qubits than the state holds
    #[error("Operator acts on {operator_qubits} qubits but the state has {state_qubits}")]
    OperatorTooWide {
        operator_qubits: usize,
        state_qubits: usize,
    },
}

/// Result type for state vector operations
pub type Result<T> = std::result::Result<T, StateError>;
