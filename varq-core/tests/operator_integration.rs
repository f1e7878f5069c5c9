//! Integration tests for Pauli operator algebra and Hamiltonians

use std::collections::BTreeSet;
use varq_core::operators::{
    CsrMatrix, Hamiltonian, HowTo, QubitOperator, DEFAULT_COMPRESS_TOLERANCE,
};
use varq_core::Complex64;

fn terms_set(op: &QubitOperator) -> BTreeSet<String> {
    op.to_string().split('+').map(|s| s.trim().to_string()).collect()
}

fn q(text: &str) -> QubitOperator {
    QubitOperator::from_term(text, 1.0).unwrap()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_numeric_coefficients() {
    assert_eq!(terms_set(&(q("Z1 Z2") + q("X1"))), set(&["1 [Z1 Z2]", "1 [X1]"]));
    assert_eq!(terms_set(&(q("X1") * q("Y1"))), set(&["(1j) [Z1]"]));
    assert_eq!(terms_set(&(q("Y1") * q("Z1"))), set(&["(1j) [X1]"]));
    assert_eq!(terms_set(&(q("Z1") * q("X1"))), set(&["(1j) [Y1]"]));

    let prod = q("Z1 z2") * q("X1 X2");
    assert_eq!(terms_set(&prod), set(&["-1 [Y1 Y2]"]));
    let prod = 2.0 * (prod * 2.0) / 2.0;
    assert_eq!(terms_set(&prod), set(&["-2 [Y1 Y2]"]));

    assert_eq!(terms_set(&(q("Z1 z2") * q("Z1 Z2"))), set(&["1 []"]));
    assert_eq!(terms_set(&-QubitOperator::identity(1.0)), set(&["-1 []"]));
    assert_eq!(QubitOperator::default().to_string(), "0");
}

#[test]
fn test_compress_drops_small_terms() {
    let op = q("Z1 z2") + 1e-9 * q("X1 z2");
    assert_eq!(
        terms_set(&op.compress(DEFAULT_COMPRESS_TOLERANCE)),
        set(&["1 [Z1 Z2]"])
    );

    let a = q("Z1 Z2") + 1e-4 * q("X1 Z2");
    let b = q("Z3 X2") + 1e-5 * q("X1 Y2");
    let prod = a * b;
    assert_eq!(prod.len(), 4);
    assert_eq!(prod.compress(DEFAULT_COMPRESS_TOLERANCE).len(), 3);
}

#[test]
fn test_subtraction_display() {
    assert_eq!((q("X0") - q("Y0")).to_string(), "1 [X0] +\n-1 [Y0] ");
}

#[test]
fn test_split_sums_back() {
    let op = q("X0 Y1") + QubitOperator::from_term("Z2 X3", -3.0).unwrap();
    let rebuilt: QubitOperator = op.split().sum();
    assert_eq!(rebuilt, op);
}

#[test]
fn test_dumps_loads() {
    let op = QubitOperator::from_term("X0 Y1", 1.2).unwrap()
        + QubitOperator::from_term("Z0 X1", Complex64::new(0.0, 2.1)).unwrap();
    assert_eq!(QubitOperator::loads(&op.dumps().unwrap()).unwrap(), op);
}

#[test]
fn test_hamiltonian_matrix_matches_products() {
    // (X0 + Z1)^2 = 2 I + 2 X0 Z1
    let h = q("X0") + q("Z1");
    let squared = &h * &h;
    let m = CsrMatrix::from_operator(&squared.compress(1e-12), 2).unwrap();
    let base = CsrMatrix::from_operator(&h, 2).unwrap();
    for col in 0..4 {
        let mut e = vec![Complex64::new(0.0, 0.0); 4];
        e[col] = Complex64::new(1.0, 0.0);
        let once = base.matvec(&e).unwrap();
        let twice = base.matvec(&once).unwrap();
        let direct = m.matvec(&e).unwrap();
        for (a, b) in twice.iter().zip(direct.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    let ham = Hamiltonian::from_operator(h).unwrap().sparse(2).unwrap();
    assert_eq!(ham.how_to(), HowTo::Backend);
    assert!(ham.matrix().unwrap().is_hermitian(1e-12));
}
