//! Weighted sums of Pauli strings

use super::pauli::PauliTerm;
use crate::{QuantumError, Result};
use indexmap::IndexMap;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Default threshold used by [`QubitOperator::compress`]
pub const DEFAULT_COMPRESS_TOLERANCE: f64 = 1e-8;

/// A sum of Pauli strings with complex coefficients, e.g. `0.5 X1 X5 + 0.3 Z1 Z2`
///
/// Terms keep their order of first insertion.
///
/// # Example
/// ```
/// use varq_core::operators::QubitOperator;
///
/// let op = QubitOperator::from_term("X0 Y3", 0.5).unwrap()
///     + QubitOperator::from_term("X0 Y3", 0.6).unwrap();
/// assert_eq!(op.to_string(), "1.1 [X0 Y3] ");
/// assert_eq!(QubitOperator::default().to_string(), "0");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QubitOperator {
    terms: IndexMap<PauliTerm, Complex64>,
}

#[derive(Serialize, Deserialize)]
struct Dump {
    terms: IndexMap<String, Complex64>,
}

impl QubitOperator {
    /// `coeff · I`
    pub fn identity(coeff: impl Into<Complex64>) -> Self {
        Self::from_pauli(PauliTerm::identity(), coeff)
    }

    /// A single term parsed from text like `"X0 Y3"`
    pub fn from_term(text: &str, coeff: impl Into<Complex64>) -> Result<Self> {
        Ok(Self::from_pauli(PauliTerm::parse(text)?, coeff))
    }

    pub fn from_pauli(term: PauliTerm, coeff: impl Into<Complex64>) -> Self {
        let mut terms = IndexMap::new();
        terms.insert(term, coeff.into());
        Self { terms }
    }

    /// Add `coeff · term` in place
    pub fn add_term(&mut self, term: PauliTerm, coeff: Complex64) {
        *self.terms.entry(term).or_insert(Complex64::new(0.0, 0.0)) += coeff;
    }

    pub fn terms(&self) -> impl Iterator<Item = (&PauliTerm, Complex64)> {
        self.terms.iter().map(|(t, c)| (t, *c))
    }

    /// One single-term operator per term
    pub fn split(&self) -> impl Iterator<Item = Self> + '_ {
        self.terms.iter().map(|(t, c)| Self::from_pauli(t.clone(), *c))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Qubits spanned by the operator
    pub fn n_qubits(&self) -> usize {
        self.terms.keys().map(PauliTerm::n_qubits).max().unwrap_or(0)
    }

    /// Drop terms whose coefficient magnitude is at most `tolerance`
    pub fn compress(&self, tolerance: f64) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .filter(|(_, c)| c.norm() > tolerance)
                .map(|(t, c)| (t.clone(), *c))
                .collect(),
        }
    }

    /// Total number of single-qubit Paulis over all terms
    pub fn count_gates(&self) -> usize {
        self.terms.keys().map(PauliTerm::weight).sum()
    }

    /// Whether the operator is exactly one term
    pub fn is_singlet(&self) -> bool {
        self.terms.len() == 1
    }

    /// Split a single-term operator into one operator per Pauli factor
    ///
    /// # Errors
    /// `InvalidConfig` unless the operator has exactly one term.
    pub fn singlet(&self) -> Result<Vec<Self>> {
        let (term, _) = match self.terms.first() {
            Some(first) if self.is_singlet() => first,
            _ => {
                return Err(QuantumError::invalid_config(format!(
                    "singlet requires a single-term operator, got {} terms",
                    self.terms.len()
                )))
            }
        };
        Ok(term
            .factors()
            .iter()
            .map(|&(q, p)| Self::from_pauli(PauliTerm::single(q, p), 1.0))
            .collect())
    }

    /// Coefficient of the singlet term
    pub fn singlet_coeff(&self) -> Result<Complex64> {
        match self.terms.first() {
            Some((_, c)) if self.is_singlet() => Ok(*c),
            _ => Err(QuantumError::invalid_config("operator is not a singlet")),
        }
    }

    /// Complex conjugate of every coefficient (Pauli strings are hermitian)
    pub fn hermitian(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(t, c)| (t.clone(), c.conj())).collect(),
        }
    }

    /// Whether every imaginary part is within `tolerance` of zero
    pub fn is_real(&self, tolerance: f64) -> bool {
        self.terms.values().all(|c| c.im.abs() <= tolerance)
    }

    /// JSON form: `{"terms": {"X0 Y3": [re, im], ...}}`
    pub fn dumps(&self) -> Result<String> {
        let dump = Dump {
            terms: self.terms.iter().map(|(t, c)| (t.to_string(), *c)).collect(),
        };
        serde_json::to_string(&dump)
            .map_err(|e| QuantumError::parse("QubitOperator", e.to_string()))
    }

    /// Inverse of [`QubitOperator::dumps`]
    pub fn loads(json: &str) -> Result<Self> {
        let dump: Dump =
            serde_json::from_str(json).map_err(|e| QuantumError::parse(json, e.to_string()))?;
        let mut op = Self::default();
        for (text, coeff) in dump.terms {
            op.add_term(PauliTerm::parse(&text)?, coeff);
        }
        Ok(op)
    }

    fn scale(mut self, factor: Complex64) -> Self {
        self.terms.values_mut().for_each(|c| *c *= factor);
        self
    }
}

fn format_coeff(c: Complex64) -> String {
    if c.im == 0.0 {
        format!("{}", c.re)
    } else if c.re == 0.0 {
        format!("({}j)", c.im)
    } else {
        format!("({}{:+}j)", c.re, c.im)
    }
}

impl fmt::Display for QubitOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (term, coeff)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, "+\n")?;
            }
            write!(f, "{} [{}] ", format_coeff(*coeff), term)?;
        }
        Ok(())
    }
}

impl AddAssign<&QubitOperator> for QubitOperator {
    fn add_assign(&mut self, rhs: &QubitOperator) {
        for (t, c) in &rhs.terms {
            self.add_term(t.clone(), *c);
        }
    }
}

impl Add for QubitOperator {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += &rhs;
        self
    }
}

impl Sum for QubitOperator {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, op| acc + op)
    }
}

impl Sub for QubitOperator {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Neg for QubitOperator {
    type Output = Self;

    fn neg(self) -> Self {
        self.scale(Complex64::new(-1.0, 0.0))
    }
}

impl Mul<&QubitOperator> for &QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: &QubitOperator) -> QubitOperator {
        let mut out = QubitOperator::default();
        for (ta, ca) in &self.terms {
            for (tb, cb) in &rhs.terms {
                let (phase, t) = ta.product(tb);
                out.add_term(t, phase * ca * cb);
            }
        }
        out
    }
}

impl Mul for QubitOperator {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl Mul<f64> for QubitOperator {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(Complex64::new(rhs, 0.0))
    }
}

impl Mul<Complex64> for QubitOperator {
    type Output = Self;

    fn mul(self, rhs: Complex64) -> Self {
        self.scale(rhs)
    }
}

impl Mul<QubitOperator> for f64 {
    type Output = QubitOperator;

    fn mul(self, rhs: QubitOperator) -> QubitOperator {
        rhs * self
    }
}

impl Div<f64> for QubitOperator {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        self.scale(Complex64::new(1.0 / rhs, 0.0))
    }
}

impl Div<Complex64> for QubitOperator {
    type Output = Self;

    fn div(self, rhs: Complex64) -> Self {
        self.scale(rhs.inv())
    }
}
