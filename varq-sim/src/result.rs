//! Measurement result types

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use varq_core::QubitId;

/// Outcomes of the measurement gates of one circuit over a number of shots
///
/// Keys keep the order of their measurement gates in the circuit. Each
/// sample holds one bit per key in that order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureResult {
    keys_map: IndexMap<String, usize>,
    samples: Vec<Vec<u8>>,
}

impl MeasureResult {
    /// Empty result for the given `(key, qubit)` measurements
    pub fn new(measures: &[(String, QubitId)]) -> Self {
        Self {
            keys_map: measures
                .iter()
                .map(|(key, q)| (key.clone(), q.index()))
                .collect(),
            samples: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, sample: Vec<u8>) {
        debug_assert_eq!(sample.len(), self.keys_map.len());
        self.samples.push(sample);
    }

    /// Measurement keys in circuit order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys_map.keys().map(String::as_str)
    }

    /// Qubit measured under each key
    pub fn keys_map(&self) -> &IndexMap<String, usize> {
        &self.keys_map
    }

    pub fn samples(&self) -> &[Vec<u8>] {
        &self.samples
    }

    pub fn shots(&self) -> usize {
        self.samples.len()
    }

    /// Bits of one key across all shots
    pub fn key_samples(&self, key: &str) -> Option<Vec<u8>> {
        let idx = self.keys_map.get_index_of(key)?;
        Some(self.samples.iter().map(|s| s[idx]).collect())
    }

    /// Counts per bitstring, last key leftmost
    pub fn data(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for sample in &self.samples {
            let bits: String = sample
                .iter()
                .rev()
                .map(|&b| if b == 0 { '0' } else { '1' })
                .collect();
            *counts.entry(bits).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for MeasureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.keys().collect();
        let keys: Vec<&str> = keys.into_iter().rev().collect();
        writeln!(f, "shots: {}", self.shots())?;
        writeln!(f, "Keys: {}", keys.join(" "))?;
        for (bits, count) in self.data() {
            let share = if self.shots() == 0 {
                0.0
            } else {
                count as f64 / self.shots() as f64
            };
            writeln!(f, "{}: {} ({:.3})", bits, count, share)?;
        }
        Ok(())
    }
}
