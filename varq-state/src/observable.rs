//! Hamiltonian action and expectation values
//!
//! Pauli sums are never materialised: a Pauli string maps basis state `b` to
//! `b ^ x` with phase `i^{#Y} · (-1)^{popcount(b & z)}`, so each term costs
//! one pass over the amplitudes. Sparse-matrix Hamiltonians go through a
//! CSR matrix-vector product.

use crate::error::{Result, StateError};
use crate::state_vector::StateVector;
use num_complex::Complex64;
use varq_core::operators::{CsrMatrix, Hamiltonian, PauliMasks, QubitOperator};

/// `⟨bra|P|ket⟩` for one Pauli string
pub fn pauli_sandwich(bra: &[Complex64], ket: &[Complex64], masks: &PauliMasks) -> Complex64 {
    ket.iter()
        .enumerate()
        .map(|(b, amp)| {
            let (image, phase) = masks.apply(b);
            bra[image].conj() * phase * amp
        })
        .sum()
}

impl StateVector {
    fn check_operator_width(&self, operator_qubits: usize) -> Result<()> {
        if operator_qubits > self.num_qubits() {
            return Err(StateError::OperatorTooWide {
                operator_qubits,
                state_qubits: self.num_qubits(),
            });
        }
        Ok(())
    }

    fn check_matrix(&self, matrix: &CsrMatrix) -> Result<()> {
        if matrix.dim() != self.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: matrix.dim(),
            });
        }
        Ok(())
    }

    /// `⟨self|op|ket⟩` for a Pauli sum
    pub fn operator_sandwich(&self, op: &QubitOperator, ket: &StateVector) -> Result<Complex64> {
        self.check_operator_width(op.n_qubits())?;
        if ket.dimension() != self.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: ket.dimension(),
            });
        }
        Ok(op
            .terms()
            .map(|(term, coeff)| {
                coeff * pauli_sandwich(self.amplitudes(), ket.amplitudes(), &term.masks())
            })
            .sum())
    }

    /// `op|self⟩`, left unnormalized
    pub fn apply_operator(&self, op: &QubitOperator) -> Result<StateVector> {
        self.check_operator_width(op.n_qubits())?;
        let mut out = vec![Complex64::new(0.0, 0.0); self.dimension()];
        for (term, coeff) in op.terms() {
            let masks = term.masks();
            for (b, amp) in self.amplitudes().iter().enumerate() {
                let (image, phase) = masks.apply(b);
                out[image] += coeff * phase * amp;
            }
        }
        StateVector::from_amplitudes(out)
    }

    /// `matrix|self⟩`, left unnormalized
    pub fn apply_sparse(&self, matrix: &CsrMatrix) -> Result<StateVector> {
        self.check_matrix(matrix)?;
        let out = matrix
            .matvec(self.amplitudes())
            .map_err(|_| StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: matrix.dim(),
            })?;
        StateVector::from_amplitudes(out)
    }

    /// `H|self⟩`, or `H†|self⟩` when `dagger` is set
    ///
    /// # Errors
    /// - `OperatorTooWide` if a Pauli sum references a qubit beyond the state
    /// - `DimensionMismatch` if a sparse matrix has another dimension
    pub fn apply_hamiltonian(&self, ham: &Hamiltonian, dagger: bool) -> Result<StateVector> {
        match ham {
            Hamiltonian::Origin { op, .. } => self.apply_operator(op),
            Hamiltonian::Backend { matrix, .. } => self.apply_sparse(matrix),
            Hamiltonian::Frontend { matrix, .. } if !dagger => self.apply_sparse(matrix),
            Hamiltonian::Frontend { matrix, .. } => {
                self.apply_sparse(ham.hermitian_matrix().unwrap_or(matrix))
            }
        }
    }

    /// `⟨self|H|self⟩`
    ///
    /// # Example
    /// ```
    /// use varq_core::operators::{Hamiltonian, QubitOperator};
    /// use varq_state::StateVector;
    ///
    /// let z0 = Hamiltonian::from_operator(QubitOperator::from_term("Z0", 1.0).unwrap()).unwrap();
    /// let state = StateVector::new(1).unwrap();
    /// assert_eq!(state.expectation(&z0).unwrap().re, 1.0);
    /// ```
    pub fn expectation(&self, ham: &Hamiltonian) -> Result<Complex64> {
        self.sandwich(ham, self)
    }

    /// `⟨self|H|ket⟩`
    pub fn sandwich(&self, ham: &Hamiltonian, ket: &StateVector) -> Result<Complex64> {
        match ham {
            Hamiltonian::Origin { op, .. } => self.operator_sandwich(op, ket),
            _ => {
                let h_ket = ket.apply_hamiltonian(ham, false)?;
                self.inner(&h_ket)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ham(text: &str, coeff: f64) -> Hamiltonian {
        Hamiltonian::from_operator(QubitOperator::from_term(text, coeff).unwrap()).unwrap()
    }

    fn bell() -> StateVector {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        StateVector::from_amplitudes(vec![
            Complex64::new(h, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(h, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_z_on_basis_states() {
        let zero = StateVector::new(1).unwrap();
        let one =
            StateVector::from_amplitudes(vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)])
                .unwrap();
        assert_relative_eq!(zero.expectation(&ham("Z0", 1.0)).unwrap().re, 1.0);
        assert_relative_eq!(one.expectation(&ham("Z0", 1.0)).unwrap().re, -1.0);
    }

    #[test]
    fn test_bell_correlations() {
        let s = bell();
        assert_relative_eq!(s.expectation(&ham("Z0 Z1", 1.0)).unwrap().re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.expectation(&ham("X0 X1", 1.0)).unwrap().re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.expectation(&ham("Y0 Y1", 1.0)).unwrap().re, -1.0, epsilon = 1e-12);
        assert_relative_eq!(s.expectation(&ham("Z0", 1.0)).unwrap().re, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_y_phase() {
        // Y|0⟩ = i|1⟩
        let s = StateVector::new(1).unwrap();
        let op = QubitOperator::from_term("Y0", 1.0).unwrap();
        let out = s.apply_operator(&op).unwrap();
        assert_eq!(out.amplitudes()[1], Complex64::new(0.0, 1.0));
        assert_eq!(out.amplitudes()[0], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_sparse_matches_pauli_sum() {
        let op = QubitOperator::from_term("X0 Y1", 0.7).unwrap()
            + QubitOperator::from_term("Z1", -0.3).unwrap();
        let origin = Hamiltonian::from_operator(op).unwrap();
        let backend = origin.clone().sparse(2).unwrap();
        let s = StateVector::from_amplitudes(vec![
            Complex64::new(0.5, 0.1),
            Complex64::new(0.2, -0.4),
            Complex64::new(-0.3, 0.2),
            Complex64::new(0.6, 0.0),
        ])
        .unwrap();
        let a = s.expectation(&origin).unwrap();
        let b = s.expectation(&backend).unwrap();
        assert_relative_eq!(a.re, b.re, epsilon = 1e-12);
        assert_relative_eq!(a.im, b.im, epsilon = 1e-12);
    }

    #[test]
    fn test_frontend_dagger() {
        // |0⟩⟨1| scaled by i: dagger maps |0⟩ to -i|1⟩
        let m = CsrMatrix::from_triplets(2, vec![(0, 1, Complex64::new(0.0, 1.0))]).unwrap();
        let h = Hamiltonian::from_sparse(m);
        let s = StateVector::new(1).unwrap();
        let plain = s.apply_hamiltonian(&h, false).unwrap();
        assert_relative_eq!(plain.norm(), 0.0);
        let dag = s.apply_hamiltonian(&h, true).unwrap();
        assert_eq!(dag.amplitudes()[1], Complex64::new(0.0, -1.0));
    }

    #[test]
    fn test_width_checks() {
        let s = StateVector::new(1).unwrap();
        assert!(matches!(
            s.expectation(&ham("Z3", 1.0)),
            Err(StateError::OperatorTooWide {
                operator_qubits: 4,
                state_qubits: 1
            })
        ));
        let backend = ham("Z0", 1.0).sparse(2).unwrap();
        assert!(matches!(
            s.expectation(&backend),
            Err(StateError::DimensionMismatch { .. })
        ));
    }
}
