//! Projective measurement and branch-probability sampling
//!
//! [`StateVector::measure`] collapses a single qubit in place.
//! [`SamplingTable`] freezes the marginal distribution of a set of qubits so
//! that many shots can be drawn from one state without replaying a circuit.

use crate::error::{Result, StateError};
use crate::state_vector::{StateVector, ZERO_NORM_TOLERANCE};
use num_complex::Complex64;

impl StateVector {
    /// Probability of reading 1 on `qubit`
    pub fn probability_one(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        Ok(self
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(idx, _)| idx & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum())
    }

    /// Project `qubit` onto `outcome` and renormalize
    ///
    /// # Errors
    /// `ZeroNorm` if the requested branch carries no weight.
    pub fn collapse(&mut self, qubit: usize, outcome: u8) -> Result<()> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        let keep = if outcome == 0 { 0 } else { mask };
        let weight: f64 = self
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(idx, _)| idx & mask == keep)
            .map(|(_, amp)| amp.norm_sqr())
            .sum();
        let norm = weight.sqrt();
        if norm < ZERO_NORM_TOLERANCE {
            return Err(StateError::ZeroNorm);
        }

        let inv_norm = 1.0 / norm;
        for (idx, amp) in self.amplitudes_mut().iter_mut().enumerate() {
            if idx & mask == keep {
                *amp *= inv_norm;
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        Ok(())
    }

    /// Measure `qubit` with a uniform draw `random_value` in [0, 1)
    ///
    /// The outcome is 1 when `random_value` falls below the probability of 1.
    /// The state collapses onto the outcome.
    ///
    /// # Example
    /// ```
    /// use varq_state::StateVector;
    ///
    /// let mut state = StateVector::new(2).unwrap();
    /// assert_eq!(state.measure(0, 0.5).unwrap(), 0);
    /// ```
    pub fn measure(&mut self, qubit: usize, random_value: f64) -> Result<u8> {
        let p1 = self.probability_one(qubit)?;
        let outcome = u8::from(random_value < p1);
        self.collapse(qubit, outcome)?;
        Ok(outcome)
    }
}

/// Cumulative distribution of a set of qubits' joint outcomes
///
/// Outcomes are reported as basis indices restricted to the measured qubits:
/// bit `q` of a sample is the value read on qubit `q`, every other bit is 0.
#[derive(Debug, Clone)]
pub struct SamplingTable {
    outcomes: Vec<usize>,
    cumulative: Vec<f64>,
}

impl SamplingTable {
    /// Build the table for `qubits` of `state`
    ///
    /// Repeated qubits are measured once.
    pub fn new(state: &StateVector, qubits: &[usize]) -> Result<Self> {
        let mut measured: Vec<usize> = qubits.to_vec();
        measured.sort_unstable();
        measured.dedup();
        for &q in &measured {
            state.check_qubit(q)?;
        }

        let k = measured.len();
        let mut marginal = vec![0.0; 1 << k];
        for (idx, amp) in state.amplitudes().iter().enumerate() {
            marginal[compress(idx, &measured)] += amp.norm_sqr();
        }

        let mut outcomes = Vec::new();
        let mut cumulative = Vec::new();
        let mut acc = 0.0;
        for (local, p) in marginal.into_iter().enumerate() {
            if p <= 0.0 {
                continue;
            }
            acc += p;
            outcomes.push(expand(local, &measured));
            cumulative.push(acc);
        }
        if outcomes.is_empty() {
            return Err(StateError::ZeroNorm);
        }
        Ok(Self {
            outcomes,
            cumulative,
        })
    }

    /// Draw one outcome from a uniform `random_value` in [0, 1)
    pub fn sample(&self, random_value: f64) -> usize {
        let total = self.cumulative[self.cumulative.len() - 1];
        let r = random_value * total;
        let pos = self.cumulative.partition_point(|&c| c <= r);
        self.outcomes[pos.min(self.outcomes.len() - 1)]
    }

    /// Outcomes with non-zero probability and their probabilities
    pub fn distribution(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        let total = self.cumulative[self.cumulative.len() - 1];
        self.outcomes.iter().enumerate().map(move |(i, &o)| {
            let prev = if i == 0 { 0.0 } else { self.cumulative[i - 1] };
            (o, (self.cumulative[i] - prev) / total)
        })
    }
}

/// Pack the bits of `idx` at `qubits` into a dense index
fn compress(idx: usize, qubits: &[usize]) -> usize {
    qubits
        .iter()
        .enumerate()
        .fold(0, |acc, (j, &q)| acc | (((idx >> q) & 1) << j))
}

fn expand(local: usize, qubits: &[usize]) -> usize {
    qubits
        .iter()
        .enumerate()
        .fold(0, |acc, (j, &q)| acc | (((local >> j) & 1) << q))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plus_zero_plus() -> StateVector {
        // (|0⟩+|1⟩)/√2 on q0 and q2, q1 = 0
        let h = 0.5;
        let mut amps = vec![Complex64::new(0.0, 0.0); 8];
        for idx in [0b000, 0b001, 0b100, 0b101] {
            amps[idx] = Complex64::new(h, 0.0);
        }
        StateVector::from_amplitudes(amps).unwrap()
    }

    #[test]
    fn test_probability_one() {
        let s = plus_zero_plus();
        assert_relative_eq!(s.probability_one(0).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(s.probability_one(1).unwrap(), 0.0, epsilon = 1e-12);
        assert!(s.probability_one(3).is_err());
    }

    #[test]
    fn test_measure_collapses() {
        let mut s = plus_zero_plus();
        assert_eq!(s.measure(2, 0.1).unwrap(), 1);
        assert_relative_eq!(s.probability_one(2).unwrap(), 1.0, epsilon = 1e-12);
        assert!(s.is_normalized(1e-12));
        assert_eq!(s.measure(0, 0.9).unwrap(), 0);
        assert_relative_eq!(s.probability(0b100).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_collapse_onto_empty_branch() {
        let mut s = StateVector::new(1).unwrap();
        assert_eq!(s.collapse(0, 1), Err(StateError::ZeroNorm));
    }

    #[test]
    fn test_sampling_table_outcomes() {
        let s = plus_zero_plus();
        let table = SamplingTable::new(&s, &[2, 0, 2]).unwrap();
        let dist: Vec<(usize, f64)> = table.distribution().collect();
        assert_eq!(dist.len(), 4);
        for (outcome, p) in dist {
            assert_eq!(outcome & 0b010, 0);
            assert_relative_eq!(p, 0.25, epsilon = 1e-12);
        }
        assert_eq!(table.sample(0.0), 0b000);
        assert_eq!(table.sample(0.3), 0b001);
        assert_eq!(table.sample(0.99), 0b101);
    }

    #[test]
    fn test_sampling_table_skips_zero_probability() {
        let s = StateVector::new(2).unwrap();
        let table = SamplingTable::new(&s, &[0, 1]).unwrap();
        assert_eq!(table.distribution().count(), 1);
        assert_eq!(table.sample(0.999), 0);
    }
}
