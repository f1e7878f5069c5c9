//! Dense state vector over `2^n` basis states
//!
//! Qubit `q` is bit `q` of the basis index (little-endian), so `|q1 q0⟩ = |10⟩`
//! sits at index 2.

use crate::error::{Result, StateError};
use crate::kernels::{self, Matrix2, Matrix4};
use num_complex::Complex64;

/// Largest register a dense vector is allowed to allocate
pub const MAX_QUBITS: usize = varq_core::MAX_QUBITS;

/// Norm below which a vector counts as zero
pub const ZERO_NORM_TOLERANCE: f64 = 1e-12;

/// Complex amplitude vector of an `n`-qubit register
///
/// # Example
///
/// ```
/// use varq_state::StateVector;
///
/// let state = StateVector::new(2).unwrap();
/// assert_eq!(state.num_qubits(), 2);
/// assert_eq!(state.dimension(), 4);
/// assert_eq!(state.amplitudes()[0].re, 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// Create a state vector initialized to |0...0⟩
    ///
    /// # Errors
    /// `InvalidQubitCount` if `num_qubits` is 0 or above [`MAX_QUBITS`]
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(StateError::InvalidQubitCount {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Wrap raw amplitudes without normalizing them
    ///
    /// # Errors
    /// `InvalidDimension` unless the length is a power of two of at least 2
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Result<Self> {
        let dimension = amplitudes.len();
        if dimension < 2 || !dimension.is_power_of_two() {
            return Err(StateError::InvalidDimension { dimension });
        }
        Ok(Self {
            num_qubits: dimension.trailing_zeros() as usize,
            amplitudes,
        })
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes, `2^num_qubits`
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    #[inline]
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Restore |0...0⟩ in place
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }

    /// Overwrite the amplitudes with a vector of the same dimension
    pub fn assign(&mut self, amplitudes: &[Complex64]) -> Result<()> {
        if amplitudes.len() != self.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: amplitudes.len(),
            });
        }
        self.amplitudes.copy_from_slice(amplitudes);
        Ok(())
    }

    /// Squared L2 norm
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    pub fn norm(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.norm() - 1.0).abs() < epsilon
    }

    /// Rescale to unit norm, returning the norm before scaling
    ///
    /// # Errors
    /// `ZeroNorm` when the norm is below [`ZERO_NORM_TOLERANCE`]
    pub fn normalize(&mut self) -> Result<f64> {
        let norm = self.norm();
        if norm < ZERO_NORM_TOLERANCE {
            return Err(StateError::ZeroNorm);
        }
        let inv = 1.0 / norm;
        for amp in &mut self.amplitudes {
            *amp *= inv;
        }
        Ok(norm)
    }

    /// `⟨self|other⟩`
    pub fn inner(&self, other: &StateVector) -> Result<Complex64> {
        self.inner_slice(other.amplitudes())
    }

    /// `⟨self|v⟩` for a raw amplitude slice
    pub fn inner_slice(&self, v: &[Complex64]) -> Result<Complex64> {
        if v.len() != self.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: v.len(),
            });
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(v)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Probability of a computational basis state
    pub fn probability(&self, basis_state: usize) -> Result<f64> {
        self.amplitudes
            .get(basis_state)
            .map(Complex64::norm_sqr)
            .ok_or(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: basis_state,
            })
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Ensure `qubit` addresses this register
    #[inline]
    pub fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    fn check_mask(&self, mask: usize) -> Result<()> {
        if mask >> self.num_qubits != 0 {
            return Err(StateError::InvalidQubitIndex {
                index: (usize::BITS - 1 - mask.leading_zeros()) as usize,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Apply a 2×2 matrix to `target` where every qubit of `control_mask` is 1
    pub fn apply_single_qubit(
        &mut self,
        matrix: &Matrix2,
        target: usize,
        control_mask: usize,
    ) -> Result<()> {
        self.check_qubit(target)?;
        self.check_mask(control_mask)?;
        kernels::apply_single_qubit(&mut self.amplitudes, matrix, target, control_mask);
        Ok(())
    }

    /// Apply a 4×4 matrix to `(t0, t1)` where every qubit of `control_mask` is 1
    ///
    /// The matrix is indexed by the local basis `b(t0) + 2·b(t1)`.
    pub fn apply_two_qubit(
        &mut self,
        matrix: &Matrix4,
        t0: usize,
        t1: usize,
        control_mask: usize,
    ) -> Result<()> {
        self.check_qubit(t0)?;
        self.check_qubit(t1)?;
        self.check_mask(control_mask)?;
        kernels::apply_two_qubit(&mut self.amplitudes, matrix, t0, t1, control_mask);
        Ok(())
    }

    /// Zero every amplitude outside the subspace where all of `control_mask` is 1
    pub fn project_controls(&mut self, control_mask: usize) -> Result<()> {
        self.check_mask(control_mask)?;
        kernels::zero_uncontrolled(&mut self.amplitudes, control_mask);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_new_state_is_zero_ket() {
        for n in 1..=4 {
            let state = StateVector::new(n).unwrap();
            assert_eq!(state.dimension(), 1 << n);
            assert_eq!(state.amplitudes()[0], c(1.0, 0.0));
            assert!(state.amplitudes()[1..].iter().all(|a| *a == c(0.0, 0.0)));
        }
    }

    #[test]
    fn test_qubit_count_bounds() {
        assert!(matches!(
            StateVector::new(0),
            Err(StateError::InvalidQubitCount { num_qubits: 0, .. })
        ));
        assert!(StateVector::new(MAX_QUBITS + 1).is_err());
    }

    #[test]
    fn test_from_amplitudes_dimension() {
        assert!(StateVector::from_amplitudes(vec![c(1.0, 0.0); 3]).is_err());
        assert!(StateVector::from_amplitudes(vec![c(1.0, 0.0)]).is_err());
        let s = StateVector::from_amplitudes(vec![c(0.0, 0.0); 8]).unwrap();
        assert_eq!(s.num_qubits(), 3);
    }

    #[test]
    fn test_normalize() {
        let mut s = StateVector::from_amplitudes(vec![c(3.0, 0.0), c(0.0, 4.0)]).unwrap();
        assert_relative_eq!(s.normalize().unwrap(), 5.0, epsilon = 1e-12);
        assert!(s.is_normalized(1e-12));
        assert_relative_eq!(s.amplitudes()[1].im, 0.8, epsilon = 1e-12);

        let mut zero = StateVector::from_amplitudes(vec![c(0.0, 0.0); 2]).unwrap();
        assert_eq!(zero.normalize(), Err(StateError::ZeroNorm));
    }

    #[test]
    fn test_inner_product() {
        let a = StateVector::from_amplitudes(vec![c(0.0, 1.0), c(0.0, 0.0)]).unwrap();
        let b = StateVector::from_amplitudes(vec![c(1.0, 0.0), c(0.0, 0.0)]).unwrap();
        // ⟨a|b⟩ = conj(i) = -i
        assert_eq!(a.inner(&b).unwrap(), c(0.0, -1.0));
        let wide = StateVector::new(2).unwrap();
        assert!(a.inner(&wide).is_err());
    }

    #[test]
    fn test_reset_and_assign() {
        let mut s = StateVector::new(1).unwrap();
        s.assign(&[c(0.0, 0.0), c(1.0, 0.0)]).unwrap();
        assert_relative_eq!(s.probability(1).unwrap(), 1.0);
        s.reset();
        assert_relative_eq!(s.probability(0).unwrap(), 1.0);
        assert!(s.assign(&[c(1.0, 0.0)]).is_err());
    }

    #[test]
    fn test_qubit_checks() {
        let mut s = StateVector::new(2).unwrap();
        let x = [[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]];
        assert_eq!(
            s.apply_single_qubit(&x, 2, 0),
            Err(StateError::InvalidQubitIndex {
                index: 2,
                num_qubits: 2
            })
        );
        assert!(s.apply_single_qubit(&x, 0, 1 << 3).is_err());
        s.apply_single_qubit(&x, 1, 0).unwrap();
        assert_relative_eq!(s.probability(2).unwrap(), 1.0);
    }
}
