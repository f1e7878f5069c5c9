//! Dense matrices for bound gates
//!
//! [`GateMatrix::for_gate`] resolves a gate's parameters against a value map
//! and returns its 2×2 or 4×4 matrix. [`GateMatrix::derivative`] gives the
//! derivative of a rotation with respect to its angle.

use crate::matrices::{self, Matrix2, Matrix4};
use crate::matrix_ops;
use varq_core::{FixedGate, Gate, ParameterValues, QuantumError, Result, RotationGate};

/// Matrix of a one- or two-target gate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateMatrix {
    Single(Matrix2),
    Two(Matrix4),
}

impl GateMatrix {
    /// Matrix of a parameter-free gate
    pub fn fixed(gate: FixedGate) -> Self {
        use FixedGate::*;
        match gate {
            I => Self::Single(matrices::IDENTITY),
            X => Self::Single(matrices::PAULI_X),
            Y => Self::Single(matrices::PAULI_Y),
            Z => Self::Single(matrices::PAULI_Z),
            H => Self::Single(matrices::HADAMARD),
            S => Self::Single(matrices::S_GATE),
            Sdag => Self::Single(matrices::S_GATE_DAGGER),
            T => Self::Single(matrices::T_GATE),
            Tdag => Self::Single(matrices::T_GATE_DAGGER),
            Swap => Self::Two(matrices::SWAP),
            ISwap => Self::Two(matrices::ISWAP),
            ISwapDag => Self::Two(matrices::ISWAP_DAGGER),
        }
    }

    /// Matrix of a rotation at angle `theta`
    pub fn rotation(gate: RotationGate, theta: f64) -> Self {
        use RotationGate::*;
        match gate {
            RX => Self::Single(matrices::rotation_x(theta)),
            RY => Self::Single(matrices::rotation_y(theta)),
            RZ => Self::Single(matrices::rotation_z(theta)),
            PhaseShift => Self::Single(matrices::phase_shift(theta)),
            XX => Self::Two(matrices::rxx(theta)),
            YY => Self::Two(matrices::ryy(theta)),
            ZZ => Self::Two(matrices::rzz(theta)),
        }
    }

    /// d/dθ of the rotation matrix at `theta`
    pub fn rotation_derivative(gate: RotationGate, theta: f64) -> Self {
        use RotationGate::*;
        match gate {
            RX => Self::Single(matrices::rotation_diff(
                &matrices::PAULI_X,
                &matrices::rotation_x(theta),
            )),
            RY => Self::Single(matrices::rotation_diff(
                &matrices::PAULI_Y,
                &matrices::rotation_y(theta),
            )),
            RZ => Self::Single(matrices::rotation_diff(
                &matrices::PAULI_Z,
                &matrices::rotation_z(theta),
            )),
            PhaseShift => Self::Single(matrices::phase_shift_diff(theta)),
            XX => Self::Two(matrices::rotation_diff(
                &matrices::pauli_pair(&matrices::PAULI_X),
                &matrices::rxx(theta),
            )),
            YY => Self::Two(matrices::rotation_diff(
                &matrices::pauli_pair(&matrices::PAULI_Y),
                &matrices::ryy(theta),
            )),
            ZZ => Self::Two(matrices::rotation_diff(
                &matrices::pauli_pair(&matrices::PAULI_Z),
                &matrices::rzz(theta),
            )),
        }
    }

    /// Resolve parameters and build the gate's matrix
    ///
    /// # Errors
    /// - `ParameterMissing` if a named parameter has no value
    /// - `UnsupportedGate` for measurements and noise channels
    pub fn for_gate(gate: &Gate, values: &ParameterValues) -> Result<Self> {
        Ok(match gate {
            Gate::Fixed(g) => Self::fixed(*g),
            Gate::Rotation(r, pr) => Self::rotation(*r, pr.combine(values)?),
            Gate::U3 { theta, phi, lambda } => Self::Single(matrices::u3(
                theta.combine(values)?,
                phi.combine(values)?,
                lambda.combine(values)?,
            )),
            Gate::FSim { theta, phi } => {
                Self::Two(matrices::fsim(theta.combine(values)?, phi.combine(values)?))
            }
            Gate::Measure(_) | Gate::Channel(_) => {
                return Err(QuantumError::UnsupportedGate(format!(
                    "{} has no unitary matrix",
                    gate.name()
                )))
            }
        })
    }

    /// Derivative of a rotation gate with respect to its bound angle
    ///
    /// The chain rule factor of the angle expression is left to the caller.
    ///
    /// # Errors
    /// `UnsupportedGate` unless the gate is a single-angle rotation.
    pub fn derivative(gate: &Gate, values: &ParameterValues) -> Result<Self> {
        match gate {
            Gate::Rotation(r, pr) => Ok(Self::rotation_derivative(*r, pr.combine(values)?)),
            other => Err(QuantumError::UnsupportedGate(format!(
                "{} has no angle derivative",
                other.name()
            ))),
        }
    }

    /// Conjugate transpose
    pub fn dagger(&self) -> Self {
        match self {
            Self::Single(m) => Self::Single(matrix_ops::adjoint(m)),
            Self::Two(m) => Self::Two(matrix_ops::adjoint(m)),
        }
    }

    pub fn num_targets(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Two(_) => 2,
        }
    }

    pub fn is_unitary(&self, tolerance: f64) -> bool {
        match self {
            Self::Single(m) => matrix_ops::is_unitary(m, tolerance),
            Self::Two(m) => matrix_ops::is_unitary(m, tolerance),
        }
    }
}
