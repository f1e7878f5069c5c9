//! Gate matrices of the varq catalog
//!
//! Two-qubit matrices use the local basis index `b(t0) + 2·b(t1)`, where
//! `t0` is the first target of the gate. Every two-qubit gate of the catalog
//! is symmetric under exchange of its targets.

use num_complex::Complex64;

/// Row-major 2×2 complex matrix
pub type Matrix2 = [[Complex64; 2]; 2];
/// Row-major 4×4 complex matrix
pub type Matrix4 = [[Complex64; 4]; 4];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// H = 1/√2 [[1, 1], [1, -1]]
pub const HADAMARD: Matrix2 = [
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(INV_SQRT2, 0.0)],
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(-INV_SQRT2, 0.0)],
];

pub const PAULI_X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];

pub const PAULI_Y: Matrix2 = [[ZERO, NEG_I], [I, ZERO]];

pub const PAULI_Z: Matrix2 = [[ONE, ZERO], [ZERO, NEG_ONE]];

pub const IDENTITY: Matrix2 = [[ONE, ZERO], [ZERO, ONE]];

/// S = diag(1, i)
pub const S_GATE: Matrix2 = [[ONE, ZERO], [ZERO, I]];

pub const S_GATE_DAGGER: Matrix2 = [[ONE, ZERO], [ZERO, NEG_I]];

/// T = diag(1, e^{iπ/4})
pub const T_GATE: Matrix2 = [[ONE, ZERO], [ZERO, Complex64::new(INV_SQRT2, INV_SQRT2)]];

pub const T_GATE_DAGGER: Matrix2 = [[ONE, ZERO], [ZERO, Complex64::new(INV_SQRT2, -INV_SQRT2)]];

pub const SWAP: Matrix4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

/// iSWAP: |01⟩ ↔ i|10⟩
pub const ISWAP: Matrix4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, I, ZERO],
    [ZERO, I, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

pub const ISWAP_DAGGER: Matrix4 = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, NEG_I, ZERO],
    [ZERO, NEG_I, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

#[inline]
fn cis(theta: f64) -> Complex64 {
    Complex64::new(theta.cos(), theta.sin())
}

/// RX(θ) = [[cos(θ/2), -i·sin(θ/2)], [-i·sin(θ/2), cos(θ/2)]]
#[inline]
pub fn rotation_x(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
        [Complex64::new(0.0, -s), Complex64::new(c, 0.0)],
    ]
}

/// RY(θ) = [[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]
#[inline]
pub fn rotation_y(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
        [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
    ]
}

/// RZ(θ) = diag(e^{-iθ/2}, e^{iθ/2})
#[inline]
pub fn rotation_z(theta: f64) -> Matrix2 {
    [[cis(-theta / 2.0), ZERO], [ZERO, cis(theta / 2.0)]]
}

/// PS(θ) = diag(1, e^{iθ})
#[inline]
pub fn phase_shift(theta: f64) -> Matrix2 {
    [[ONE, ZERO], [ZERO, cis(theta)]]
}

/// U3(θ,φ,λ) = [[cos(θ/2), -e^{iλ}·sin(θ/2)], [e^{iφ}·sin(θ/2), e^{i(φ+λ)}·cos(θ/2)]]
#[inline]
pub fn u3(theta: f64, phi: f64, lambda: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), -cis(lambda) * s],
        [cis(phi) * s, cis(phi + lambda) * c],
    ]
}

/// XX(θ) = exp(-iθ/2 X⊗X)
#[inline]
pub fn rxx(theta: f64) -> Matrix4 {
    let (s, c) = (theta / 2.0).sin_cos();
    let c = Complex64::new(c, 0.0);
    let s = Complex64::new(0.0, -s);
    [
        [c, ZERO, ZERO, s],
        [ZERO, c, s, ZERO],
        [ZERO, s, c, ZERO],
        [s, ZERO, ZERO, c],
    ]
}

/// YY(θ) = exp(-iθ/2 Y⊗Y)
#[inline]
pub fn ryy(theta: f64) -> Matrix4 {
    let (s, c) = (theta / 2.0).sin_cos();
    let c = Complex64::new(c, 0.0);
    let s = Complex64::new(0.0, s);
    [
        [c, ZERO, ZERO, s],
        [ZERO, c, -s, ZERO],
        [ZERO, -s, c, ZERO],
        [s, ZERO, ZERO, c],
    ]
}

/// ZZ(θ) = exp(-iθ/2 Z⊗Z)
#[inline]
pub fn rzz(theta: f64) -> Matrix4 {
    let neg = cis(-theta / 2.0);
    let pos = cis(theta / 2.0);
    [
        [neg, ZERO, ZERO, ZERO],
        [ZERO, pos, ZERO, ZERO],
        [ZERO, ZERO, pos, ZERO],
        [ZERO, ZERO, ZERO, neg],
    ]
}

/// FSim(θ, φ): partial swap in the single-excitation block, phase e^{-iφ} on |11⟩
#[inline]
pub fn fsim(theta: f64, phi: f64) -> Matrix4 {
    let (s, c) = theta.sin_cos();
    let c = Complex64::new(c, 0.0);
    let s = Complex64::new(0.0, -s);
    [
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, c, s, ZERO],
        [ZERO, s, c, ZERO],
        [ZERO, ZERO, ZERO, cis(-phi)],
    ]
}

/// dPS/dθ = diag(0, i·e^{iθ})
#[inline]
pub fn phase_shift_diff(theta: f64) -> Matrix2 {
    [[ZERO, ZERO], [ZERO, I * cis(theta)]]
}

/// `(-i/2)·P·R_P(θ)`, the derivative of `R_P(θ) = exp(-iθ/2 P)`
pub fn rotation_diff<const N: usize>(
    generator: &[[Complex64; N]; N],
    rotation: &[[Complex64; N]; N],
) -> [[Complex64; N]; N] {
    let mut out = crate::matrix_ops::matmul(generator, rotation);
    let factor = Complex64::new(0.0, -0.5);
    for row in out.iter_mut() {
        for v in row.iter_mut() {
            *v *= factor;
        }
    }
    out
}

/// P⊗P for a single-qubit Pauli P in the local two-qubit basis
pub fn pauli_pair(p: &Matrix2) -> Matrix4 {
    let mut out = [[ZERO; 4]; 4];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            *v = p[r & 1][c & 1] * p[r >> 1][c >> 1];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix_ops::{adjoint, is_unitary, matmul};
    use approx::assert_relative_eq;

    #[test]
    fn test_pauli_x_squaring() {
        let result = matmul(&PAULI_X, &PAULI_X);
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(result[i][j].re, IDENTITY[i][j].re, epsilon = 1e-10);
                assert_relative_eq!(result[i][j].im, IDENTITY[i][j].im, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_rxx_is_exponential_of_pauli_pair() {
        let xx = pauli_pair(&PAULI_X);
        let theta: f64 = 0.37;
        let (s, c) = (theta / 2.0).sin_cos();
        let m = rxx(theta);
        for r in 0..4 {
            for col in 0..4 {
                let id = if r == col { c } else { 0.0 };
                let expected = Complex64::new(id, 0.0) + Complex64::new(0.0, -s) * xx[r][col];
                assert_relative_eq!(m[r][col].re, expected.re, epsilon = 1e-12);
                assert_relative_eq!(m[r][col].im, expected.im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_fsim_unitary_and_inverse() {
        let f = fsim(0.4, 1.1);
        assert!(is_unitary(&f, 1e-12));
        let back = matmul(&fsim(-0.4, -1.1), &f);
        assert!(is_unitary(&back, 1e-12));
        assert_relative_eq!(back[3][3].re, 1.0, epsilon = 1e-12);
        assert_eq!(adjoint(&ISWAP), ISWAP_DAGGER);
    }

    #[test]
    fn test_rotation_diff_matches_finite_difference() {
        let theta = 0.8;
        let h = 1e-6;
        let analytic = rotation_diff(&PAULI_Y, &rotation_y(theta));
        let plus = rotation_y(theta + h);
        let minus = rotation_y(theta - h);
        for i in 0..2 {
            for j in 0..2 {
                let fd = (plus[i][j] - minus[i][j]) / (2.0 * h);
                assert_relative_eq!(analytic[i][j].re, fd.re, epsilon = 1e-8);
                assert_relative_eq!(analytic[i][j].im, fd.im, epsilon = 1e-8);
            }
        }
    }
}
