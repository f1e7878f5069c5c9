//! Compressed sparse row matrices for Hamiltonians
//!
//! Only the operations a state-vector backend needs are provided:
//! construction, matrix-vector products and the conjugate transpose.

use super::qubit_operator::QubitOperator;
use crate::{QuantumError, Result};
use num_complex::Complex64;
use std::fmt;

/// Square complex matrix in CSR layout
///
/// Row `r` holds entries `data[indptr[r]..indptr[r + 1]]` at columns
/// `indices[indptr[r]..indptr[r + 1]]`, sorted by column.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    dim: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<Complex64>,
}

impl CsrMatrix {
    /// Validate and wrap raw CSR arrays
    ///
    /// # Errors
    /// `InvalidConfig` if the dimension is not a power of two of at least 2,
    /// or the arrays are inconsistent.
    pub fn new(
        dim: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<Complex64>,
    ) -> Result<Self> {
        if dim < 2 || !dim.is_power_of_two() {
            return Err(QuantumError::invalid_config(format!(
                "sparse matrix dimension must be a power of two >= 2, got {}",
                dim
            )));
        }
        if indptr.len() != dim + 1 || indptr[0] != 0 {
            return Err(QuantumError::invalid_config(format!(
                "indptr must have {} entries starting at 0",
                dim + 1
            )));
        }
        if indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(QuantumError::invalid_config("indptr must be non-decreasing"));
        }
        if indices.len() != data.len() || indptr[dim] != data.len() {
            return Err(QuantumError::invalid_config(format!(
                "{} indices and {} values for {} stored entries",
                indices.len(),
                data.len(),
                indptr[dim]
            )));
        }
        if let Some(&c) = indices.iter().find(|&&c| c >= dim) {
            return Err(QuantumError::invalid_config(format!(
                "column index {} out of range for dimension {}",
                c, dim
            )));
        }
        let mut m = Self {
            dim,
            indptr,
            indices,
            data,
        };
        m.sort_rows();
        Ok(m)
    }

    /// Build from `(row, col, value)` triplets, summing duplicates
    pub fn from_triplets(
        dim: usize,
        triplets: impl IntoIterator<Item = (usize, usize, Complex64)>,
    ) -> Result<Self> {
        let mut rows: Vec<Vec<(usize, Complex64)>> = vec![Vec::new(); dim];
        for (r, c, v) in triplets {
            if r >= dim || c >= dim {
                return Err(QuantumError::invalid_config(format!(
                    "entry ({}, {}) out of range for dimension {}",
                    r, c, dim
                )));
            }
            rows[r].push((c, v));
        }
        Self::from_rows(dim, rows)
    }

    /// Materialise a Pauli sum on `n_qubits` qubits
    ///
    /// # Errors
    /// `InvalidConfig` if the operator references qubits beyond `n_qubits`,
    /// or `n_qubits` exceeds [`MAX_QUBITS`](crate::MAX_QUBITS).
    pub fn from_operator(op: &QubitOperator, n_qubits: usize) -> Result<Self> {
        if n_qubits > crate::MAX_QUBITS {
            return Err(QuantumError::invalid_config(format!(
                "cannot materialise a {} qubit operator, the limit is {}",
                n_qubits,
                crate::MAX_QUBITS
            )));
        }
        if op.n_qubits() > n_qubits {
            return Err(QuantumError::invalid_config(format!(
                "operator on {} qubits cannot be embedded in {} qubits",
                op.n_qubits(),
                n_qubits
            )));
        }
        let dim = 1usize << n_qubits;
        let masks: Vec<_> = op.terms().map(|(t, c)| (t.masks(), c)).collect();
        let rows = (0..dim)
            .map(|r| {
                masks
                    .iter()
                    .map(|(m, coeff)| {
                        // H[r][b] is nonzero for b = r ^ x
                        let b = r ^ m.x;
                        let (_, phase) = m.apply(b);
                        (b, coeff * phase)
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(dim, rows)
    }

    fn from_rows(dim: usize, rows: Vec<Vec<(usize, Complex64)>>) -> Result<Self> {
        let mut indptr = Vec::with_capacity(dim + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for mut row in rows {
            row.sort_by_key(|(c, _)| *c);
            let mut last: Option<usize> = None;
            for (c, v) in row {
                if last == Some(c) {
                    if let Some(d) = data.last_mut() {
                        *d += v;
                    }
                } else {
                    indices.push(c);
                    data.push(v);
                    last = Some(c);
                }
            }
            indptr.push(data.len());
        }
        Self::new(dim, indptr, indices, data)
    }

    fn sort_rows(&mut self) {
        for r in 0..self.dim {
            let (lo, hi) = (self.indptr[r], self.indptr[r + 1]);
            if self.indices[lo..hi].windows(2).all(|w| w[0] <= w[1]) {
                continue;
            }
            let mut row: Vec<_> = self.indices[lo..hi]
                .iter()
                .copied()
                .zip(self.data[lo..hi].iter().copied())
                .collect();
            row.sort_by_key(|(c, _)| *c);
            for (k, (c, v)) in row.into_iter().enumerate() {
                self.indices[lo + k] = c;
                self.data[lo + k] = v;
            }
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn n_qubits(&self) -> usize {
        self.dim.trailing_zeros() as usize
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// `(col, value)` pairs of row `r`
    pub fn row(&self, r: usize) -> impl Iterator<Item = (usize, Complex64)> + '_ {
        let (lo, hi) = (self.indptr[r], self.indptr[r + 1]);
        self.indices[lo..hi].iter().copied().zip(self.data[lo..hi].iter().copied())
    }

    pub fn get(&self, r: usize, c: usize) -> Complex64 {
        self.row(r)
            .find(|(col, _)| *col == c)
            .map_or(Complex64::new(0.0, 0.0), |(_, v)| v)
    }

    /// `M · v`
    ///
    /// # Errors
    /// `InvalidConfig` if `v` does not have length `dim`.
    pub fn matvec(&self, v: &[Complex64]) -> Result<Vec<Complex64>> {
        if v.len() != self.dim {
            return Err(QuantumError::invalid_config(format!(
                "vector of length {} for a {}x{} matrix",
                v.len(),
                self.dim,
                self.dim
            )));
        }
        Ok((0..self.dim)
            .map(|r| self.row(r).map(|(c, val)| val * v[c]).sum())
            .collect())
    }

    /// Conjugate transpose
    pub fn dagger(&self) -> Self {
        let mut rows: Vec<Vec<(usize, Complex64)>> = vec![Vec::new(); self.dim];
        for r in 0..self.dim {
            for (c, v) in self.row(r) {
                rows[c].push((r, v.conj()));
            }
        }
        let mut indptr = Vec::with_capacity(self.dim + 1);
        let mut indices = Vec::with_capacity(self.nnz());
        let mut data = Vec::with_capacity(self.nnz());
        indptr.push(0);
        for row in rows {
            // rows are filled in increasing r, so columns are already sorted
            for (c, v) in row {
                indices.push(c);
                data.push(v);
            }
            indptr.push(data.len());
        }
        Self {
            dim: self.dim,
            indptr,
            indices,
            data,
        }
    }

    /// Whether `M == M†` within `tolerance`
    pub fn is_hermitian(&self, tolerance: f64) -> bool {
        let d = self.dagger();
        (0..self.dim).all(|r| {
            self.row(r).all(|(c, v)| (v - d.get(r, c)).norm() <= tolerance)
                && d.row(r).all(|(c, v)| (v - self.get(r, c)).norm() <= tolerance)
        })
    }
}

impl fmt::Display for CsrMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CsrMatrix({}x{}, {} qubits, nnz={})",
            self.dim,
            self.dim,
            self.n_qubits(),
            self.nnz()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_rejects_bad_dimension() {
        assert!(CsrMatrix::new(3, vec![0, 0, 0, 0], vec![], vec![]).is_err());
        assert!(CsrMatrix::new(1, vec![0, 0], vec![], vec![]).is_err());
        assert!(CsrMatrix::new(2, vec![0, 1, 1], vec![2], vec![c(1.0, 0.0)]).is_err());
        assert!(CsrMatrix::new(2, vec![0, 1], vec![0], vec![c(1.0, 0.0)]).is_err());
    }

    #[test]
    fn test_unsorted_rows_are_sorted() {
        let m =
            CsrMatrix::new(2, vec![0, 2, 2], vec![1, 0], vec![c(2.0, 0.0), c(1.0, 0.0)]).unwrap();
        assert_eq!(m.row(0).collect::<Vec<_>>(), vec![(0, c(1.0, 0.0)), (1, c(2.0, 0.0))]);
    }

    #[test]
    fn test_pauli_y_matrix() {
        let y = QubitOperator::from_term("Y0", 1.0).unwrap();
        let m = CsrMatrix::from_operator(&y, 1).unwrap();
        assert_eq!(m.get(0, 1), c(0.0, -1.0));
        assert_eq!(m.get(1, 0), c(0.0, 1.0));
        assert_eq!(m.get(0, 0), c(0.0, 0.0));
        assert!(m.is_hermitian(1e-12));
    }

    #[test]
    fn test_embedding_and_duplicates() {
        let op = QubitOperator::from_term("Z1", 1.0).unwrap() + QubitOperator::identity(1.0);
        let m = CsrMatrix::from_operator(&op, 2).unwrap();
        assert_eq!(m.dim(), 4);
        // I + Z1 = diag(2, 2, 0, 0)
        assert_eq!(m.get(0, 0), c(2.0, 0.0));
        assert_eq!(m.get(2, 2), c(0.0, 0.0));
        assert_eq!(m.nnz(), 4);
        assert!(CsrMatrix::from_operator(&op, 1).is_err());
    }

    #[test]
    fn test_matvec_and_dagger() {
        let m = CsrMatrix::from_triplets(
            2,
            vec![(0, 1, c(0.0, 2.0)), (1, 1, c(1.0, 0.0)), (1, 1, c(1.0, 0.0))],
        )
        .unwrap();
        let out = m.matvec(&[c(1.0, 0.0), c(1.0, 0.0)]).unwrap();
        assert_abs_diff_eq!(out[0].im, 2.0);
        assert_abs_diff_eq!(out[1].re, 2.0);
        let d = m.dagger();
        assert_eq!(d.get(1, 0), c(0.0, -2.0));
        assert!(!m.is_hermitian(1e-12));
        assert!(m.matvec(&[c(1.0, 0.0)]).is_err());
    }
}
