//! Kraus decomposition and validation of each noise channel

use super::types::{KrausOperator, Matrix2, NoiseChannel};
use crate::{QuantumError, Result};
use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

const IDENTITY: Matrix2 = [[ONE, ZERO], [ZERO, ONE]];
const PAULI_X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];
const PAULI_Y: Matrix2 = [[ZERO, Complex64::new(0.0, -1.0)], [I, ZERO]];
const PAULI_Z: Matrix2 = [[ONE, ZERO], [ZERO, Complex64::new(-1.0, 0.0)]];

/// Tolerance for the completeness check of user supplied Kraus sets
pub const COMPLETENESS_TOLERANCE: f64 = 1e-8;

fn check_probability(what: &str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(QuantumError::invalid_config(format!(
            "{} must be in [0, 1], got {}",
            what, p
        )));
    }
    Ok(())
}

/// Kraus set of a Pauli channel with the given X, Y, Z probabilities
fn pauli_kraus(px: f64, py: f64, pz: f64) -> Vec<KrausOperator> {
    let p_id = (1.0 - px - py - pz).max(0.0);
    [(IDENTITY, p_id), (PAULI_X, px), (PAULI_Y, py), (PAULI_Z, pz)]
        .into_iter()
        .filter(|(_, p)| *p > 0.0)
        .map(|(m, p)| KrausOperator::scaled(m, p.sqrt()))
        .collect()
}

impl NoiseChannel {
    /// Check probabilities and, for custom channels, the completeness relation
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Pauli { px, py, pz } => {
                check_probability("px", *px)?;
                check_probability("py", *py)?;
                check_probability("pz", *pz)?;
                check_probability("px + py + pz", px + py + pz)
            }
            Self::BitFlip(p)
            | Self::PhaseFlip(p)
            | Self::BitPhaseFlip(p)
            | Self::Depolarizing(p) => {
                check_probability("p", *p)
            }
            Self::AmplitudeDamping(g) | Self::PhaseDamping(g) => check_probability("gamma", *g),
            Self::Kraus { name, operators } => {
                if operators.is_empty() {
                    return Err(QuantumError::invalid_config(format!(
                        "Kraus channel '{}' has no operators",
                        name
                    )));
                }
                if !self.verify_completeness(COMPLETENESS_TOLERANCE) {
                    return Err(QuantumError::invalid_config(format!(
                        "Kraus channel '{}' violates Σ K†K = I",
                        name
                    )));
                }
                Ok(())
            }
        }
    }

    /// Kraus operators of this channel; zero-weight branches are omitted
    pub fn kraus_operators(&self) -> Vec<KrausOperator> {
        match self {
            Self::Pauli { px, py, pz } => pauli_kraus(*px, *py, *pz),
            Self::BitFlip(p) => pauli_kraus(*p, 0.0, 0.0),
            Self::PhaseFlip(p) => pauli_kraus(0.0, 0.0, *p),
            Self::BitPhaseFlip(p) => pauli_kraus(0.0, *p, 0.0),
            Self::Depolarizing(p) => pauli_kraus(p / 3.0, p / 3.0, p / 3.0),
            Self::AmplitudeDamping(g) => vec![
                KrausOperator::new([[ONE, ZERO], [ZERO, Complex64::from((1.0 - g).sqrt())]]),
                KrausOperator::new([[ZERO, Complex64::from(g.sqrt())], [ZERO, ZERO]]),
            ],
            Self::PhaseDamping(g) => vec![
                KrausOperator::new([[ONE, ZERO], [ZERO, Complex64::from((1.0 - g).sqrt())]]),
                KrausOperator::new([[ZERO, ZERO], [ZERO, Complex64::from(g.sqrt())]]),
            ],
            Self::Kraus { operators, .. } => operators.clone(),
        }
    }

    /// Check Σ K_i† K_i ≈ I within `tolerance`
    pub fn verify_completeness(&self, tolerance: f64) -> bool {
        let operators = self.kraus_operators();
        if operators.is_empty() {
            return false;
        }

        let mut sum = [[ZERO; 2]; 2];
        for kraus in &operators {
            let adj = kraus.adjoint();
            for (i, row) in sum.iter_mut().enumerate() {
                for (j, entry) in row.iter_mut().enumerate() {
                    *entry += adj.get(i, 0) * kraus.get(0, j) + adj.get(i, 1) * kraus.get(1, j);
                }
            }
        }

        sum.iter().enumerate().all(|(i, row)| {
            row.iter()
                .enumerate()
                .all(|(j, v)| (v - if i == j { ONE } else { ZERO }).norm() <= tolerance)
        })
    }
}
