//! Small fixed-size matrix helpers

use num_complex::Complex64;

/// `a · b`
pub fn matmul<const N: usize>(
    a: &[[Complex64; N]; N],
    b: &[[Complex64; N]; N],
) -> [[Complex64; N]; N] {
    let mut out = [[Complex64::new(0.0, 0.0); N]; N];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = (0..N).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// Conjugate transpose
pub fn adjoint<const N: usize>(m: &[[Complex64; N]; N]) -> [[Complex64; N]; N] {
    let mut out = [[Complex64::new(0.0, 0.0); N]; N];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = m[j][i].conj();
        }
    }
    out
}

/// Whether `U†U = I` within `tolerance`
pub fn is_unitary<const N: usize>(m: &[[Complex64; N]; N], tolerance: f64) -> bool {
    let product = matmul(&adjoint(m), m);
    product.iter().enumerate().all(|(i, row)| {
        row.iter().enumerate().all(|(j, v)| {
            let expected = if i == j { 1.0 } else { 0.0 };
            (v - Complex64::new(expected, 0.0)).norm() <= tolerance
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrices::{HADAMARD, S_GATE, S_GATE_DAGGER};

    #[test]
    fn test_adjoint_of_s() {
        assert_eq!(adjoint(&S_GATE), S_GATE_DAGGER);
    }

    #[test]
    fn test_hadamard_unitary() {
        assert!(is_unitary(&HADAMARD, 1e-12));
        let mut scaled = HADAMARD;
        scaled[0][0] *= 2.0;
        assert!(!is_unitary(&scaled, 1e-12));
    }
}
