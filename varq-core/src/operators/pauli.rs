//! Single-qubit Paulis and Pauli strings
//!
//! A [`PauliTerm`] is a tensor product of X, Y and Z acting on distinct
//! qubits, stored sorted by qubit index. Identities are implicit, so the
//! empty term is the identity operator.

use crate::{QuantumError, Result};
use num_complex::Complex64;
use smallvec::SmallVec;
use std::fmt;

/// Non-identity single-qubit Pauli
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pauli {
    X,
    Y,
    Z,
}

impl Pauli {
    /// Parse `X`, `Y` or `Z`, case-insensitively
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// Product `self · other` as a phase and the resulting Pauli (`None` for I)
    ///
    /// `XY = iZ`, `YZ = iX`, `ZX = iY`; reversed orders pick up `-i`.
    pub fn product(self, other: Pauli) -> (Complex64, Option<Pauli>) {
        use Pauli::*;
        let i = Complex64::new(0.0, 1.0);
        match (self, other) {
            (a, b) if a == b => (Complex64::new(1.0, 0.0), None),
            (X, Y) => (i, Some(Z)),
            (Y, X) => (-i, Some(Z)),
            (Y, Z) => (i, Some(X)),
            (Z, Y) => (-i, Some(X)),
            (Z, X) => (i, Some(Y)),
            (X, Z) => (-i, Some(Y)),
            _ => unreachable!("equal Paulis handled above"),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Tensor product of Paulis on distinct qubits, sorted by qubit
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PauliTerm {
    factors: SmallVec<[(usize, Pauli); 4]>,
}

impl PauliTerm {
    /// The identity term
    pub fn identity() -> Self {
        Self::default()
    }

    /// One Pauli on one qubit already known to be in range
    pub(crate) fn single(qubit: usize, pauli: Pauli) -> Self {
        let mut factors = SmallVec::new();
        factors.push((qubit, pauli));
        Self { factors }
    }

    /// Build from `(qubit, Pauli)` pairs
    ///
    /// # Errors
    /// `InvalidConfig` if a qubit appears twice or is not below
    /// [`MAX_QUBITS`](crate::MAX_QUBITS).
    pub fn new(factors: impl IntoIterator<Item = (usize, Pauli)>) -> Result<Self> {
        let mut factors: SmallVec<[(usize, Pauli); 4]> = factors.into_iter().collect();
        factors.sort_by_key(|(q, _)| *q);
        if let Some((q, _)) = factors.last().filter(|(q, _)| *q >= crate::MAX_QUBITS) {
            return Err(QuantumError::invalid_config(format!(
                "qubit {} exceeds the {} qubit limit",
                q,
                crate::MAX_QUBITS
            )));
        }
        if let Some(w) = factors.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(QuantumError::invalid_config(format!(
                "qubit {} appears twice in a Pauli term",
                w[0].0
            )));
        }
        Ok(Self { factors })
    }

    /// Parse whitespace separated factors such as `"X0 y3 Z12"`
    ///
    /// The empty string is the identity.
    ///
    /// # Example
    /// ```
    /// use varq_core::operators::{Pauli, PauliTerm};
    ///
    /// let term = PauliTerm::parse("Z2 x0").unwrap();
    /// assert_eq!(term.factors(), &[(0, Pauli::X), (2, Pauli::Z)]);
    /// assert!(PauliTerm::parse("X1 YY").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let factors = text
            .split_whitespace()
            .map(|token| {
                let mut chars = token.chars();
                let pauli = chars
                    .next()
                    .and_then(Pauli::from_char)
                    .ok_or_else(|| QuantumError::parse(text, format!("bad factor '{}'", token)))?;
                let digits = chars.as_str();
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(QuantumError::parse(
                        text,
                        format!("factor '{}' needs a qubit index", token),
                    ));
                }
                let qubit = digits
                    .parse::<usize>()
                    .map_err(|e| QuantumError::parse(text, e.to_string()))?;
                Ok((qubit, pauli))
            })
            .collect::<Result<SmallVec<[(usize, Pauli); 4]>>>()?;
        Self::new(factors)
    }

    pub fn factors(&self) -> &[(usize, Pauli)] {
        &self.factors
    }

    pub fn is_identity(&self) -> bool {
        self.factors.is_empty()
    }

    /// Number of non-identity factors
    pub fn weight(&self) -> usize {
        self.factors.len()
    }

    /// Qubits spanned: largest index plus one, zero for the identity
    pub fn n_qubits(&self) -> usize {
        self.factors.last().map_or(0, |(q, _)| q + 1)
    }

    /// Bits flipped by the term (X and Y factors)
    pub fn x_mask(&self) -> usize {
        self.factors
            .iter()
            .filter(|(_, p)| *p != Pauli::Z)
            .fold(0, |m, (q, _)| m | (1 << q))
    }

    /// Bits picking up a sign (Y and Z factors)
    pub fn z_mask(&self) -> usize {
        self.factors
            .iter()
            .filter(|(_, p)| *p != Pauli::X)
            .fold(0, |m, (q, _)| m | (1 << q))
    }

    pub fn num_y(&self) -> usize {
        self.factors.iter().filter(|(_, p)| *p == Pauli::Y).count()
    }

    /// Precomputed masks for applying the term to basis states
    pub fn masks(&self) -> PauliMasks {
        let i_pow = [
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(-1.0, 0.0),
            Complex64::new(0.0, -1.0),
        ];
        PauliMasks {
            x: self.x_mask(),
            z: self.z_mask(),
            y_phase: i_pow[self.num_y() % 4],
        }
    }

    /// Product `self · other` as a phase and a canonical term
    pub fn product(&self, other: &PauliTerm) -> (Complex64, PauliTerm) {
        let mut phase = Complex64::new(1.0, 0.0);
        let mut out: SmallVec<[(usize, Pauli); 4]> = SmallVec::new();
        let (mut a, mut b) = (self.factors.iter().peekable(), other.factors.iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (Some(&&(qa, pa)), Some(&&(qb, pb))) if qa == qb => {
                    let (p, r) = pa.product(pb);
                    phase *= p;
                    if let Some(r) = r {
                        out.push((qa, r));
                    }
                    a.next();
                    b.next();
                }
                (Some(&&fa), Some(&&fb)) => {
                    if fa.0 < fb.0 {
                        out.push(fa);
                        a.next();
                    } else {
                        out.push(fb);
                        b.next();
                    }
                }
                (Some(&&fa), None) => {
                    out.push(fa);
                    a.next();
                }
                (None, Some(&&fb)) => {
                    out.push(fb);
                    b.next();
                }
                (None, None) => break,
            }
        }
        (phase, PauliTerm { factors: out })
    }
}

/// Bit-parity form of a Pauli string
///
/// `P|b⟩ = i^{#Y} · (-1)^{popcount(b & z)} · |b ^ x⟩`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauliMasks {
    pub x: usize,
    pub z: usize,
    pub y_phase: Complex64,
}

impl PauliMasks {
    /// Image index and phase of basis state `b`
    #[inline]
    pub fn apply(&self, b: usize) -> (usize, Complex64) {
        let phase = if (b & self.z).count_ones() % 2 == 1 {
            -self.y_phase
        } else {
            self.y_phase
        };
        (b ^ self.x, phase)
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (q, p)) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}{}", p, q)?;
        }
        Ok(())
    }
}
