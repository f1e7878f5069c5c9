//! Qubit addressing

use crate::{QuantumError, Result};
use std::fmt;

/// Widest register any varq component addresses
///
/// Qubit indices must stay below this bound so that basis-index masks and
/// `2^n` dimensions fit in a `usize`.
pub const MAX_QUBITS: usize = 40;

/// Index of one qubit of a register
///
/// Qubit `q` corresponds to bit `q` of a basis-state index, so a register of
/// `n` qubits spans basis indices `0..2^n`.
///
/// # Example
/// ```
/// use varq_core::QubitId;
///
/// let q0 = QubitId::new(0);
/// let q3 = QubitId::new(3);
/// assert!(q0 < q3);
/// assert_eq!(q3.mask(), 0b1000);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct QubitId(usize);

impl QubitId {
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Single-bit mask selecting this qubit in a basis index
    ///
    /// Only meaningful for indices below [`MAX_QUBITS`].
    #[inline]
    pub const fn mask(&self) -> usize {
        1 << self.0
    }

    /// Fail with `QubitOutOfRange` unless the qubit fits in `num_qubits`
    pub fn check_range(&self, num_qubits: usize) -> Result<()> {
        if self.0 >= num_qubits {
            return Err(QuantumError::qubit_out_of_range(self.0, num_qubits));
        }
        Ok(())
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QubitId> for usize {
    #[inline]
    fn from(qid: QubitId) -> Self {
        qid.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_ordering() {
        assert!(QubitId::new(0) < QubitId::new(1));
        assert_eq!(QubitId::new(2), QubitId::from(2));
    }

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId::new(5)), "q5");
    }

    #[test]
    fn test_qubit_mask() {
        assert_eq!(QubitId::new(0).mask(), 1);
        assert_eq!(QubitId::new(4).mask(), 16);
    }

    #[test]
    fn test_check_range() {
        assert!(QubitId::new(2).check_range(3).is_ok());
        assert_eq!(
            QubitId::new(3).check_range(3),
            Err(QuantumError::qubit_out_of_range(3, 3))
        );
    }
}
