//! In-place gate kernels on raw amplitude slices
//!
//! Every kernel walks the basis indices whose target bits are all 0 and
//! rewrites the group of amplitudes reachable by flipping the target bits.
//! A group is skipped unless every qubit of `control_mask` is 1, which leaves
//! the control-0 subspace untouched.

use num_complex::Complex64;

/// Row-major 2×2 complex matrix
pub type Matrix2 = [[Complex64; 2]; 2];
/// Row-major 4×4 complex matrix
pub type Matrix4 = [[Complex64; 4]; 4];

#[inline]
fn controlled(i: usize, control_mask: usize) -> bool {
    i & control_mask == control_mask
}

/// Apply a 2×2 matrix to qubit `target`
///
/// The matrix need not be unitary; Kraus operators and gate derivatives go
/// through the same kernel.
pub fn apply_single_qubit(
    state: &mut [Complex64],
    matrix: &Matrix2,
    target: usize,
    control_mask: usize,
) {
    let target_mask = 1usize << target;
    let [[m00, m01], [m10, m11]] = *matrix;

    for i in 0..state.len() {
        if i & target_mask != 0 || !controlled(i, control_mask) {
            continue;
        }
        let j = i | target_mask;
        let (a0, a1) = (state[i], state[j]);
        state[i] = m00 * a0 + m01 * a1;
        state[j] = m10 * a0 + m11 * a1;
    }
}

/// Apply a 4×4 matrix to qubits `(t0, t1)`, local index `b(t0) + 2·b(t1)`
pub fn apply_two_qubit(
    state: &mut [Complex64],
    matrix: &Matrix4,
    t0: usize,
    t1: usize,
    control_mask: usize,
) {
    let m0 = 1usize << t0;
    let m1 = 1usize << t1;
    let both = m0 | m1;

    for i in 0..state.len() {
        if i & both != 0 || !controlled(i, control_mask) {
            continue;
        }
        let idx = [i, i | m0, i | m1, i | both];
        let old = idx.map(|k| state[k]);
        for (row, &k) in matrix.iter().zip(idx.iter()) {
            state[k] = row.iter().zip(old.iter()).map(|(m, a)| m * a).sum();
        }
    }
}

/// Zero the amplitudes where some qubit of `control_mask` is 0
pub fn zero_uncontrolled(state: &mut [Complex64], control_mask: usize) {
    if control_mask == 0 {
        return;
    }
    for (i, amp) in state.iter_mut().enumerate() {
        if !controlled(i, control_mask) {
            *amp = Complex64::new(0.0, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ZERO: Complex64 = Complex64::new(0.0, 0.0);
    const ONE: Complex64 = Complex64::new(1.0, 0.0);
    const X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];

    fn basis(dim: usize, k: usize) -> Vec<Complex64> {
        let mut v = vec![ZERO; dim];
        v[k] = ONE;
        v
    }

    #[test]
    fn test_single_qubit_flip() {
        let mut state = basis(4, 0);
        apply_single_qubit(&mut state, &X, 1, 0);
        assert_eq!(state, basis(4, 2));
    }

    #[test]
    fn test_controlled_flip_respects_control() {
        // control q0 = 0: nothing happens
        let mut state = basis(4, 0);
        apply_single_qubit(&mut state, &X, 1, 0b01);
        assert_eq!(state, basis(4, 0));

        // control q0 = 1: |01⟩ -> |11⟩
        let mut state = basis(4, 1);
        apply_single_qubit(&mut state, &X, 1, 0b01);
        assert_eq!(state, basis(4, 3));
    }

    #[test]
    fn test_two_qubit_local_ordering() {
        // Matrix sending local |01⟩ (t0 set) to local |10⟩ (t1 set)
        let mut m = [[ZERO; 4]; 4];
        m[0][0] = ONE;
        m[2][1] = ONE;
        m[1][2] = ONE;
        m[3][3] = ONE;
        // t0 = qubit 2, t1 = qubit 0: basis |100⟩ (index 4) has t0 set
        let mut state = basis(8, 4);
        apply_two_qubit(&mut state, &m, 2, 0, 0);
        assert_eq!(state, basis(8, 1));
    }

    #[test]
    fn test_two_qubit_with_control() {
        let mut swap = [[ZERO; 4]; 4];
        swap[0][0] = ONE;
        swap[1][2] = ONE;
        swap[2][1] = ONE;
        swap[3][3] = ONE;
        // Fredkin: control q2, swap q0 and q1 on |101⟩ -> |110⟩
        let mut state = basis(8, 0b101);
        apply_two_qubit(&mut state, &swap, 0, 1, 0b100);
        assert_eq!(state, basis(8, 0b110));

        let mut state = basis(8, 0b001);
        apply_two_qubit(&mut state, &swap, 0, 1, 0b100);
        assert_eq!(state, basis(8, 0b001));
    }

    #[test]
    fn test_zero_uncontrolled() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let mut state = vec![Complex64::new(h, 0.0), ZERO, ZERO, Complex64::new(h, 0.0)];
        zero_uncontrolled(&mut state, 0b10);
        assert_eq!(state[0], ZERO);
        assert_relative_eq!(state[3].re, h);
    }
}
