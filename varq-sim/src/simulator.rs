//! State-vector simulator

use crate::config::{SimulatorConfig, NORM_TOLERANCE};
use crate::error::{Result, SimulatorError};
use crate::execution;
use crate::result::MeasureResult;
use log::{debug, info};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use varq_core::operators::Hamiltonian;
use varq_core::{Circuit, GateOp, ParameterValues};
use varq_state::{SamplingTable, StateVector, ZERO_NORM_TOLERANCE};

/// Name reported by [`Simulator::name`]
pub const BACKEND_NAME: &str = "state-vector";

/// Dense state-vector simulator of a fixed-width register
///
/// The simulator owns its amplitude vector and a seeded random source.
/// [`Simulator::copy`] produces an independent instance; nothing is shared.
///
/// # Example
///
/// ```
/// use varq_core::{CircuitBuilder, ParameterValues};
/// use varq_sim::Simulator;
///
/// let mut builder = CircuitBuilder::new();
/// builder.h(0).unwrap().cx(1, 0).unwrap();
/// let bell = builder.build();
///
/// let mut sim = Simulator::new(2).unwrap();
/// sim.apply_circuit(&bell, &ParameterValues::new()).unwrap();
/// assert!((sim.get_state()[3].re - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
    state: StateVector,
    rng: StdRng,
}

impl Simulator {
    /// Create a simulator in |0...0⟩ with the default configuration
    pub fn new(n_qubits: usize) -> Result<Self> {
        Self::with_config(n_qubits, SimulatorConfig::default())
    }

    pub fn with_seed(n_qubits: usize, seed: u64) -> Result<Self> {
        Self::with_config(n_qubits, SimulatorConfig::default().with_seed(seed))
    }

    /// Create a simulator with an explicit configuration
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration is invalid, `n_qubits` is 0, or
    /// `n_qubits` exceeds `config.max_qubits`.
    pub fn with_config(n_qubits: usize, config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        if n_qubits == 0 {
            return Err(SimulatorError::invalid_config("simulator needs at least one qubit"));
        }
        if n_qubits > config.max_qubits {
            return Err(SimulatorError::invalid_config(format!(
                "{} qubits exceed the configured maximum of {}",
                n_qubits, config.max_qubits
            )));
        }
        let state = StateVector::new(n_qubits)?;
        let rng = StdRng::seed_from_u64(config.seed);
        debug!(
            target: "varq_sim::simulator",
            "new {} qubit simulator, seed {}", n_qubits, config.seed
        );
        Ok(Self { config, state, rng })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    pub fn n_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    /// Bound the worker threads used by gradient evaluation
    pub fn set_thread_count(&mut self, num_threads: usize) -> Result<()> {
        if num_threads == 0 {
            return Err(SimulatorError::invalid_config("thread count must be > 0"));
        }
        self.config.num_threads = Some(num_threads);
        Ok(())
    }

    /// Independent copy: state, configuration and random source position
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub(crate) fn state_vector(&self) -> &StateVector {
        &self.state
    }

    pub(crate) fn check_circuit_width(&self, circuit: &Circuit) -> Result<()> {
        if circuit.n_qubits() > self.n_qubits() {
            return Err(SimulatorError::QubitCountMismatch {
                simulator: self.n_qubits(),
                required: circuit.n_qubits(),
            });
        }
        Ok(())
    }

    fn check_circuit(&self, circuit: &Circuit) -> Result<()> {
        self.check_circuit_width(circuit)?;
        for op in circuit.operations() {
            execution::check_supported(op)?;
        }
        Ok(())
    }

    /// Apply one gate with bound parameters
    ///
    /// Measurements collapse the state and return the sampled bit; noise
    /// channels apply one trajectory. Other gates return `None`.
    ///
    /// # Errors
    /// - `QubitOutOfRange` if the gate references a qubit ≥ `n_qubits`
    /// - `ParameterMissing` if a named parameter has no value
    /// - `UnsupportedGate` for gates the backend does not implement
    pub fn apply_gate(&mut self, op: &GateOp, values: &ParameterValues) -> Result<Option<u8>> {
        op.check_range(self.n_qubits())?;
        execution::apply_op(&mut self.state, op, values, &mut self.rng)
    }

    /// Apply every gate of `circuit` in order
    ///
    /// Returns a single-shot [`MeasureResult`] when the circuit measures.
    pub fn apply_circuit(
        &mut self,
        circuit: &Circuit,
        values: &ParameterValues,
    ) -> Result<Option<MeasureResult>> {
        self.check_circuit(circuit)?;
        info!(
            target: "varq_sim::simulator",
            "apply circuit: {} gates on {} qubits",
            circuit.len(),
            self.n_qubits()
        );
        let measures = circuit.measures();
        let mut result = MeasureResult::new(&measures);
        let sample = execution::run(
            &mut self.state,
            circuit.operations(),
            values,
            result.keys_map(),
            &mut self.rng,
        )?;
        if measures.is_empty() {
            return Ok(None);
        }
        result.push(sample);
        Ok(Some(result))
    }

    /// Projective measurement of one qubit
    pub fn measure(&mut self, qubit: usize) -> Result<u8> {
        let draw = self.rng.gen();
        Ok(self.state.measure(qubit, draw)?)
    }

    /// Sample the measurement gates of `circuit` over `shots` runs
    ///
    /// The simulator state is left untouched. Each call draws from a fresh
    /// generator seeded with `seed`, or with a seed taken from the
    /// simulator's own random source when `seed` is `None`.
    ///
    /// When every measurement comes after the last gate on its qubit and the
    /// circuit has no noise, the measurement-free part runs once and shots
    /// are drawn from the resulting distribution. Otherwise the whole circuit
    /// is replayed per shot.
    ///
    /// # Errors
    /// `InvalidConfig` if `shots` is 0 or the circuit has no measurement.
    pub fn sample(
        &mut self,
        circuit: &Circuit,
        values: &ParameterValues,
        shots: usize,
        seed: Option<u64>,
    ) -> Result<MeasureResult> {
        let measures = circuit.measures();
        if measures.is_empty() {
            return Err(SimulatorError::invalid_config(
                "circuit must have at least one measurement gate",
            ));
        }
        if shots == 0 {
            return Err(SimulatorError::invalid_config("sampling shots must be at least 1"));
        }
        self.check_circuit(circuit)?;

        let seed = seed.unwrap_or_else(|| self.rng.gen_range(1..(2u64 << 20)));
        let mut rng = StdRng::seed_from_u64(seed);
        let mut result = MeasureResult::new(&measures);

        if circuit.is_measure_end() && !circuit.is_noise_circuit() {
            info!(
                target: "varq_sim::sampling",
                "sampling {} shots from one evolution (seed {})",
                shots,
                seed
            );
            let mut state = self.state.clone();
            for op in circuit.remove_measure().operations() {
                execution::apply_unitary(&mut state, op, values)?;
            }
            let qubits: Vec<usize> = measures.iter().map(|(_, q)| q.index()).collect();
            let table = SamplingTable::new(&state, &qubits)?;
            for _ in 0..shots {
                let outcome = table.sample(rng.gen());
                result.push(qubits.iter().map(|q| ((outcome >> q) & 1) as u8).collect());
            }
        } else {
            info!(
                target: "varq_sim::sampling",
                "sampling {} shots by replaying the circuit (seed {})",
                shots,
                seed
            );
            for _ in 0..shots {
                let mut state = self.state.clone();
                let sample = execution::run(
                    &mut state,
                    circuit.operations(),
                    values,
                    result.keys_map(),
                    &mut rng,
                )?;
                result.push(sample);
            }
        }
        Ok(result)
    }

    /// `⟨ψ|H|ψ⟩` for the current state
    ///
    /// # Errors
    /// `DimensionMismatch` if the Hamiltonian acts beyond the register, or a
    /// sparse Hamiltonian has another dimension.
    pub fn expectation(&self, ham: &Hamiltonian) -> Result<Complex64> {
        Ok(self.state.expectation(ham)?)
    }

    /// Replace the state by `H|ψ⟩`; the result is not normalized
    pub fn apply_hamiltonian(&mut self, ham: &Hamiltonian) -> Result<()> {
        self.state = self.state.apply_hamiltonian(ham, false)?;
        Ok(())
    }

    /// Dense unitary of a measurement- and noise-free circuit
    ///
    /// Row-major, `2^n × 2^n` for the simulator width `n`.
    pub fn circuit_matrix(
        &self,
        circuit: &Circuit,
        values: &ParameterValues,
    ) -> Result<Vec<Vec<Complex64>>> {
        self.check_circuit(circuit)?;
        let dim = self.state.dimension();
        let mut matrix = vec![vec![Complex64::new(0.0, 0.0); dim]; dim];
        let mut column = StateVector::new(self.n_qubits())?;
        for k in 0..dim {
            let amps = column.amplitudes_mut();
            amps.fill(Complex64::new(0.0, 0.0));
            amps[k] = Complex64::new(1.0, 0.0);
            for op in circuit.operations() {
                execution::apply_unitary(&mut column, op, values)?;
            }
            for (row, amp) in matrix.iter_mut().zip(column.amplitudes()) {
                row[k] = *amp;
            }
        }
        Ok(matrix)
    }

    pub fn get_state(&self) -> &[Complex64] {
        self.state.amplitudes()
    }

    /// Non-zero amplitudes as `coeff¦bits⟩` lines, qubit 0 rightmost
    pub fn get_state_ket(&self) -> String {
        ket_lines(self.state.amplitudes(), self.n_qubits()).join("\n")
    }

    /// Overwrite the amplitude vector
    ///
    /// By default the vector is rescaled to unit norm. With
    /// `normalize_on_set_state` disabled, vectors off unit norm are rejected.
    ///
    /// # Errors
    /// - `InvalidConfig` if the length is not a power of two, the vector is
    ///   zero, or strict mode rejects its norm
    /// - `DimensionMismatch` if the length does not match the register
    pub fn set_state(&mut self, amplitudes: &[Complex64]) -> Result<()> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(SimulatorError::invalid_config(format!(
                "vec size {} is not a power of 2",
                len
            )));
        }
        if len != self.state.dimension() {
            return Err(SimulatorError::DimensionMismatch(format!(
                "{} qubits vec does not match with simulation qubits ({})",
                len.trailing_zeros(),
                self.n_qubits()
            )));
        }

        let mut state = StateVector::from_amplitudes(amplitudes.to_vec())?;
        let norm = state.norm();
        if norm < ZERO_NORM_TOLERANCE {
            return Err(SimulatorError::invalid_config("cannot set a zero state"));
        }
        if self.config.normalize_on_set_state {
            state.normalize()?;
        } else if (norm - 1.0).abs() > NORM_TOLERANCE {
            return Err(SimulatorError::invalid_config(format!(
                "state norm is {}, expected 1",
                norm
            )));
        }
        self.state = state;
        Ok(())
    }

    /// Restore |0...0⟩
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

fn format_amplitude(c: Complex64) -> String {
    let round = |x: f64| (x * 1e8).round() / 1e8;
    let (re, im) = (round(c.re), round(c.im));
    if im == 0.0 {
        format!("{}", re)
    } else if re == 0.0 {
        format!("{}j", im)
    } else {
        format!("({}{:+}j)", re, im)
    }
}

fn ket_lines(amplitudes: &[Complex64], n_qubits: usize) -> Vec<String> {
    amplitudes
        .iter()
        .enumerate()
        .filter(|(_, a)| a.norm() > 1e-8)
        .map(|(i, a)| format!("{}¦{:0width$b}⟩", format_amplitude(*a), i, width = n_qubits))
        .collect()
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.n_qubits();
        writeln!(
            f,
            "{} simulator with {} qubit{} (little endian).",
            self.name(),
            n,
            if n > 1 { "s" } else { "" }
        )?;
        writeln!(f, "Current quantum state:")?;
        if n < 4 {
            write!(f, "{}", self.get_state_ket())
        } else {
            write!(f, "{:?}", self.get_state())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use varq_core::{CircuitBuilder, FixedGate, QubitId};

    #[test]
    fn test_initialize() {
        let sim = Simulator::new(3).unwrap();
        assert_eq!(sim.get_state().len(), 8);
        assert_eq!(sim.get_state()[0], Complex64::new(1.0, 0.0));
        assert!(matches!(Simulator::new(0), Err(SimulatorError::InvalidConfig(_))));
        let cfg = SimulatorConfig::default().with_max_qubits(4);
        assert!(Simulator::with_config(5, cfg).is_err());
    }

    #[test]
    fn test_apply_gate_out_of_range() {
        let mut sim = Simulator::new(1).unwrap();
        let x = GateOp::new(FixedGate::X, &[QubitId::new(1)], &[]).unwrap();
        assert_eq!(
            sim.apply_gate(&x, &ParameterValues::new()),
            Err(SimulatorError::QubitOutOfRange {
                index: 1,
                num_qubits: 1
            })
        );
    }

    #[test]
    fn test_apply_circuit_returns_measurements_only_when_measuring() {
        let mut b = CircuitBuilder::new();
        b.x(0).unwrap();
        let plain = b.build();
        let mut sim = Simulator::new(2).unwrap();
        assert!(sim.apply_circuit(&plain, &ParameterValues::new()).unwrap().is_none());

        let mut b = CircuitBuilder::new();
        b.measure(0).unwrap();
        let measured = b.build();
        let res = sim.apply_circuit(&measured, &ParameterValues::new()).unwrap().unwrap();
        assert_eq!(res.samples(), &[vec![1u8]]);
    }

    #[test]
    fn test_set_state_normalizes() {
        let mut sim = Simulator::new(1).unwrap();
        sim.set_state(&[Complex64::new(3.0, 0.0), Complex64::new(4.0, 0.0)]).unwrap();
        assert_relative_eq!(sim.get_state()[0].re, 0.6, epsilon = 1e-12);
        assert!(sim.set_state(&[Complex64::new(1.0, 0.0); 3]).is_err());
        assert!(matches!(
            sim.set_state(&[Complex64::new(1.0, 0.0); 4]),
            Err(SimulatorError::DimensionMismatch(_))
        ));
        assert!(sim.set_state(&[Complex64::new(0.0, 0.0); 2]).is_err());
    }

    #[test]
    fn test_set_state_strict() {
        let mut sim = Simulator::with_config(1, SimulatorConfig::strict()).unwrap();
        assert!(sim.set_state(&[Complex64::new(3.0, 0.0), Complex64::new(4.0, 0.0)]).is_err());
        sim.set_state(&[Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)]).unwrap();
        assert_relative_eq!(sim.get_state()[1].im, 0.8);
    }

    #[test]
    fn test_ket_string_and_display() {
        let mut sim = Simulator::new(2).unwrap();
        let mut b = CircuitBuilder::new();
        b.x(1).unwrap();
        sim.apply_circuit(&b.build(), &ParameterValues::new()).unwrap();
        assert_eq!(sim.get_state_ket(), "1¦10⟩");
        let text = sim.to_string();
        assert!(text.starts_with("state-vector simulator with 2 qubits (little endian)."));
        assert!(text.ends_with("1¦10⟩"));
    }

    #[test]
    fn test_reset_and_copy_are_independent() {
        let mut sim = Simulator::new(1).unwrap();
        let x = GateOp::new(FixedGate::X, &[QubitId::new(0)], &[]).unwrap();
        sim.apply_gate(&x, &ParameterValues::new()).unwrap();
        let copy = sim.copy();
        sim.reset();
        assert_eq!(sim.get_state()[0], Complex64::new(1.0, 0.0));
        assert_eq!(copy.get_state()[1], Complex64::new(1.0, 0.0));
    }
}
