//! Error types for varq core objects

use crate::QubitId;
use thiserror::Error;

/// Errors raised while constructing gates, circuits, parameters and operators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// Qubit index beyond the declared qubit count
    #[error("Qubit index {index} out of range for {num_qubits} qubits")]
    QubitOutOfRange { index: usize, num_qubits: usize },

    /// Gate applied to wrong number of target qubits
    #[error("Gate '{gate}' requires {expected} target qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Duplicate qubit in gate operation
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(QubitId),

    /// A qubit is used both as target and control
    #[error("Qubit {0} used as both target and control")]
    OverlappingQubits(QubitId),

    /// A named parameter was not supplied
    #[error("Parameter '{0}' is required but no value was supplied")]
    ParameterMissing(String),

    /// A parameter name is used as both encoder and ansatz parameter
    #[error("Parameter '{0}' cannot be both encoder and ansatz parameter")]
    ParameterRoleConflict(String),

    /// Gate has no representation for the requested operation
    #[error("Unsupported gate: {0}")]
    UnsupportedGate(String),

    /// Bad construction-time argument
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Illegal Hamiltonian representation transition
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Text form of an operator could not be parsed
    #[error("Failed to parse '{input}': {reason}")]
    Parse { input: String, reason: String },
}

impl QuantumError {
    /// Create an out-of-range qubit error
    pub fn qubit_out_of_range(index: usize, num_qubits: usize) -> Self {
        Self::QubitOutOfRange { index, num_qubits }
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidQubitCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_out_of_range_error() {
        let err = QuantumError::qubit_out_of_range(5, 3);
        let msg = format!("{}", err);
        assert!(msg.contains("5"));
        assert!(msg.contains("3"));
    }

    #[test]
    fn test_invalid_qubit_count_error() {
        let err = QuantumError::invalid_qubit_count("XX", 2, 1);
        let msg = format!("{}", err);
        assert!(msg.contains("XX"));
        assert!(msg.contains("2"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn test_role_conflict_message() {
        let err = QuantumError::ParameterRoleConflict("a".to_string());
        assert!(err.to_string().contains("'a'"));
    }
}
