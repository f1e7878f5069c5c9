//! Error types for the simulator

use thiserror::Error;
use varq_core::QuantumError;
use varq_state::StateError;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Errors that can occur during simulation
///
/// Every error is raised at the point of detection. After a failure inside
/// [`crate::Simulator::apply_circuit`] the simulator state is unspecified and
/// should be reset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulatorError {
    /// Bad construction-time argument
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Qubit index not addressed by the simulator
    #[error("Qubit index {index} out of range for {num_qubits} qubits")]
    QubitOutOfRange { index: usize, num_qubits: usize },

    /// A named parameter has no bound value
    #[error("Parameter '{0}' is required but no value was supplied")]
    ParameterMissing(String),

    /// A parameter is both encoder and ansatz
    #[error("Parameter '{0}' cannot be both encoder and ansatz parameter")]
    ParameterRoleConflict(String),

    /// The state-vector backend cannot apply this gate
    #[error("Unsupported gate: {0}")]
    UnsupportedGate(String),

    /// Variational evaluation over a circuit with measurements
    #[error("Circuit for variational algorithm cannot have measure gate")]
    MeasurementNotAllowed,

    /// Variational evaluation over a circuit with noise channels
    #[error("Noise circuit is not supported by the gradient evaluation")]
    NoiseNotSupported,

    /// Sizes of a state, vector or Hamiltonian disagree
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Simulator narrower than a circuit or a partner simulator
    #[error("Qubit count mismatch: simulator has {simulator} qubits, but {required} are required")]
    QubitCountMismatch { simulator: usize, required: usize },

    /// Illegal Hamiltonian representation transition
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl SimulatorError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<QuantumError> for SimulatorError {
    fn from(err: QuantumError) -> Self {
        match err {
            QuantumError::QubitOutOfRange { index, num_qubits } => {
                Self::QubitOutOfRange { index, num_qubits }
            }
            QuantumError::ParameterMissing(name) => Self::ParameterMissing(name),
            QuantumError::ParameterRoleConflict(name) => Self::ParameterRoleConflict(name),
            QuantumError::UnsupportedGate(msg) => Self::UnsupportedGate(msg),
            QuantumError::InvalidState(msg) => Self::InvalidState(msg),
            other => Self::InvalidConfig(other.to_string()),
        }
    }
}

impl From<StateError> for SimulatorError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::InvalidQubitIndex { index, num_qubits } => {
                Self::QubitOutOfRange { index, num_qubits }
            }
            StateError::DimensionMismatch { .. } | StateError::OperatorTooWide { .. } => {
                Self::DimensionMismatch(err.to_string())
            }
            other => Self::InvalidConfig(other.to_string()),
        }
    }
}
