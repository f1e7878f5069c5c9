//! Hamiltonians and their backend representation
//!
//! A Hamiltonian starts either as a real Pauli sum ([`HowTo::Origin`]) or as
//! an explicit sparse matrix ([`HowTo::Frontend`]). A Pauli sum may be widened
//! once to a larger register, which materialises it as a sparse matrix
//! ([`HowTo::Backend`]). No other transition exists.

use super::qubit_operator::QubitOperator;
use super::sparse::CsrMatrix;
use crate::{QuantumError, Result};
use log::debug;
use num_complex::Complex64;
use std::fmt;
use std::sync::OnceLock;

/// Largest imaginary part accepted on a Pauli coefficient
pub const IMAG_TOLERANCE: f64 = 1e-12;

/// Representation tag of a [`Hamiltonian`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HowTo {
    Origin,
    Backend,
    Frontend,
}

/// A hermitian observable
///
/// # Example
/// ```
/// use varq_core::operators::{Hamiltonian, HowTo, QubitOperator};
///
/// let op = QubitOperator::from_term("Z0 Y1", 0.3).unwrap();
/// let ham = Hamiltonian::from_operator(op).unwrap();
/// assert_eq!(ham.n_qubits(), 2);
///
/// let ham = ham.sparse(4).unwrap();
/// assert_eq!(ham.how_to(), HowTo::Backend);
/// assert!(ham.sparse(5).is_err());
/// ```
#[derive(Debug, Clone)]
pub enum Hamiltonian {
    /// Pauli sum, width inferred from the referenced qubits
    Origin { op: QubitOperator, n_qubits: usize },
    /// Pauli sum widened to `n_qubits` and materialised
    Backend {
        op: QubitOperator,
        n_qubits: usize,
        matrix: CsrMatrix,
    },
    /// Explicit sparse matrix; its conjugate transpose is built on first use
    Frontend {
        matrix: CsrMatrix,
        herm: OnceLock<CsrMatrix>,
    },
}

impl Hamiltonian {
    /// Wrap a Pauli sum
    ///
    /// Imaginary parts are dropped after checking they vanish.
    ///
    /// # Errors
    /// `InvalidConfig` if a coefficient has an imaginary part above
    /// [`IMAG_TOLERANCE`].
    pub fn from_operator(op: QubitOperator) -> Result<Self> {
        if let Some((term, c)) = op.terms().find(|(_, c)| c.im.abs() > IMAG_TOLERANCE) {
            return Err(QuantumError::invalid_config(format!(
                "Hamiltonian coefficients must be real, term [{}] has {}",
                term, c
            )));
        }
        let mut real = QubitOperator::default();
        for (term, c) in op.terms() {
            real.add_term(term.clone(), Complex64::new(c.re, 0.0));
        }
        let n_qubits = real.n_qubits();
        Ok(Self::Origin { op: real, n_qubits })
    }

    /// Wrap an explicit sparse matrix
    pub fn from_sparse(matrix: CsrMatrix) -> Self {
        Self::Frontend {
            matrix,
            herm: OnceLock::new(),
        }
    }

    /// Widen a Pauli-sum Hamiltonian to `n_qubits` qubits
    ///
    /// # Errors
    /// - `InvalidState` unless the Hamiltonian is still [`HowTo::Origin`]
    /// - `InvalidConfig` if `n_qubits` is smaller than the referenced width
    pub fn sparse(self, n_qubits: usize) -> Result<Self> {
        match self {
            Self::Origin { op, n_qubits: own } => {
                if n_qubits < own {
                    return Err(QuantumError::invalid_config(format!(
                        "cannot sparse a {} qubit Hamiltonian to {} qubits",
                        own, n_qubits
                    )));
                }
                let matrix = CsrMatrix::from_operator(&op, n_qubits)?;
                debug!(
                    target: "varq_core::hamiltonian",
                    "materialised {} terms on {} qubits, nnz={}",
                    op.len(),
                    n_qubits,
                    matrix.nnz()
                );
                Ok(Self::Backend {
                    op,
                    n_qubits,
                    matrix,
                })
            }
            Self::Backend { .. } => Err(QuantumError::InvalidState(
                "Hamiltonian is already sparse".to_string(),
            )),
            Self::Frontend { .. } => Err(QuantumError::InvalidState(
                "a sparse-matrix Hamiltonian cannot be widened".to_string(),
            )),
        }
    }

    pub fn how_to(&self) -> HowTo {
        match self {
            Self::Origin { .. } => HowTo::Origin,
            Self::Backend { .. } => HowTo::Backend,
            Self::Frontend { .. } => HowTo::Frontend,
        }
    }

    pub fn n_qubits(&self) -> usize {
        match self {
            Self::Origin { n_qubits, .. } | Self::Backend { n_qubits, .. } => *n_qubits,
            Self::Frontend { matrix, .. } => matrix.n_qubits(),
        }
    }

    /// The Pauli sum, unless the Hamiltonian is a bare matrix
    pub fn operator(&self) -> Option<&QubitOperator> {
        match self {
            Self::Origin { op, .. } | Self::Backend { op, .. } => Some(op),
            Self::Frontend { .. } => None,
        }
    }

    /// The sparse matrix, once one exists
    pub fn matrix(&self) -> Option<&CsrMatrix> {
        match self {
            Self::Origin { .. } => None,
            Self::Backend { matrix, .. } | Self::Frontend { matrix, .. } => Some(matrix),
        }
    }

    /// Matrix of `H†`
    ///
    /// Pauli sums are hermitian, so only the frontend form differs from
    /// [`Hamiltonian::matrix`]; it is computed once and cached.
    pub fn hermitian_matrix(&self) -> Option<&CsrMatrix> {
        match self {
            Self::Origin { .. } => None,
            Self::Backend { matrix, .. } => Some(matrix),
            Self::Frontend { matrix, herm } => Some(herm.get_or_init(|| {
                debug!(
                    target: "varq_core::hamiltonian",
                    "caching conjugate transpose of {}",
                    matrix
                );
                matrix.dagger()
            })),
        }
    }
}

impl fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Origin { op, .. } | Self::Backend { op, .. } => write!(f, "{}", op),
            Self::Frontend { matrix, .. } => write!(f, "{}", matrix),
        }
    }
}
