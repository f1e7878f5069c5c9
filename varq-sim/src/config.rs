//! Simulator configuration

use crate::error::{Result, SimulatorError};
use varq_state::MAX_QUBITS;

/// Configuration for the state-vector simulator
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Seed of the simulator's random source
    ///
    /// Measurement outcomes and sampling seeds drawn without an explicit seed
    /// come from a generator seeded with this value.
    ///
    /// Default: 42
    pub seed: u64,

    /// Upper bound on worker threads for gradient evaluation
    ///
    /// `None` uses `std::thread::available_parallelism`.
    ///
    /// Default: None
    pub num_threads: Option<usize>,

    /// Largest register the simulator accepts
    ///
    /// Default: 30
    pub max_qubits: usize,

    /// Whether `set_state` rescales its input to unit norm
    ///
    /// When false, vectors whose norm differs from 1 are rejected.
    ///
    /// Default: true
    pub normalize_on_set_state: bool,
}

/// Norm deviation tolerated by strict `set_state`
pub const NORM_TOLERANCE: f64 = 1e-8;

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_threads: None,
            max_qubits: 30,
            normalize_on_set_state: true,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Single worker thread, for reproducible timing and debugging
    pub fn single_threaded() -> Self {
        Self {
            num_threads: Some(1),
            ..Default::default()
        }
    }

    /// Reject unnormalized vectors in `set_state`
    pub fn strict() -> Self {
        Self {
            normalize_on_set_state: false,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    pub fn with_normalize_on_set_state(mut self, enabled: bool) -> Self {
        self.normalize_on_set_state = enabled;
        self
    }

    /// Worker budget after resolving auto-detection
    pub fn worker_budget(&self) -> usize {
        self.num_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_qubits == 0 || self.max_qubits > MAX_QUBITS {
            return Err(SimulatorError::invalid_config(format!(
                "max_qubits must be in 1..={}, got {}",
                MAX_QUBITS, self.max_qubits
            )));
        }
        if self.num_threads == Some(0) {
            return Err(SimulatorError::invalid_config("num_threads must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_qubits, 30);
        assert!(config.normalize_on_set_state);
        assert!(config.validate().is_ok());
        assert!(config.worker_budget() >= 1);
    }

    #[test]
    fn test_presets() {
        assert_eq!(SimulatorConfig::single_threaded().worker_budget(), 1);
        assert!(!SimulatorConfig::strict().normalize_on_set_state);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SimulatorConfig::new()
            .with_seed(7)
            .with_threads(3)
            .with_max_qubits(12)
            .with_normalize_on_set_state(false);
        assert_eq!(config.seed, 7);
        assert_eq!(config.worker_budget(), 3);
        assert_eq!(config.max_qubits, 12);
        assert!(!config.normalize_on_set_state);
    }

    #[test]
    fn test_validate() {
        assert!(SimulatorConfig::new().with_threads(0).validate().is_err());
        assert!(SimulatorConfig::new().with_max_qubits(0).validate().is_err());
        assert!(SimulatorConfig::new().with_max_qubits(MAX_QUBITS + 1).validate().is_err());
    }
}
