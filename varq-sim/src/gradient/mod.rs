//! Expectation values with gradients for variational circuits
//!
//! [`Simulator::get_expectation_with_grad`] validates a request once and
//! returns a [`GradOps`] handle. Calling the handle with parameter batches
//! evaluates, for every batch row and every Hamiltonian, the expectation and
//! its gradient with respect to every encoder and ansatz parameter.
//!
//! Encoder parameters vary per batch row; ansatz parameters are shared by the
//! whole batch. Gradients come from one adjoint sweep per Hamiltonian.
//!
//! # Example
//!
//! ```
//! use varq_core::operators::{Hamiltonian, QubitOperator};
//! use varq_core::{CircuitBuilder, ParameterResolver};
//! use varq_sim::Simulator;
//!
//! let mut b = CircuitBuilder::new();
//! b.rx(0, ParameterResolver::named("x").as_encoder()).unwrap();
//! b.ry(0, "w").unwrap();
//! let circuit = b.build();
//!
//! let ham = Hamiltonian::from_operator(QubitOperator::from_term("Z0", 1.0).unwrap()).unwrap();
//! let sim = Simulator::new(1).unwrap();
//! let ops = sim.get_expectation_with_grad(vec![ham], &circuit, None, None, None).unwrap();
//!
//! let res = ops.call_both(&[vec![0.1], vec![0.4]], &[0.3]).unwrap();
//! assert_eq!(res.value.len(), 2);
//! assert_eq!(res.encoder_grad.as_ref().unwrap()[0][0].len(), 1);
//! ```

pub(crate) mod adjoint;
pub mod parallel;

use crate::error::{Result, SimulatorError};
use crate::execution;
use crate::simulator::{Simulator, BACKEND_NAME};
use adjoint::Sweep;
use indexmap::IndexMap;
use log::{debug, info};
use num_complex::Complex64;
use rayon::prelude::*;
use std::fmt;
use varq_core::operators::Hamiltonian;
use varq_core::{Circuit, ParameterValues};
use varq_state::StateVector;

pub use parallel::thread_balance;

/// Which parameter roles a [`GradOps`] expects as input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only encoder parameters: one input, a batch of rows
    Encoder,
    /// Only ansatz parameters: one input, a single weight row
    Ansatz,
    /// Both: a batch of encoder rows and one weight row
    Both,
}

/// Output of a [`GradOps`] evaluation, indexed `[row][hamiltonian]`
#[derive(Debug, Clone, PartialEq)]
pub struct GradResult {
    pub value: Vec<Vec<Complex64>>,
    /// `[row][hamiltonian][encoder parameter]`, absent in ansatz mode
    pub encoder_grad: Option<Vec<Vec<Vec<Complex64>>>>,
    /// `[row][hamiltonian][ansatz parameter]`, absent in encoder mode
    pub ansatz_grad: Option<Vec<Vec<Vec<Complex64>>>>,
}

impl GradResult {
    /// Rows of `[value, grad_encoder..., grad_ansatz...]`
    pub fn packed(&self) -> Vec<Vec<Vec<Complex64>>> {
        self.value
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(h, v)| {
                        let mut packed = vec![*v];
                        if let Some(enc) = &self.encoder_grad {
                            packed.extend_from_slice(&enc[r][h]);
                        }
                        if let Some(ans) = &self.ansatz_grad {
                            packed.extend_from_slice(&ans[r][h]);
                        }
                        packed
                    })
                    .collect()
            })
            .collect()
    }
}

/// A validated expectation-with-gradient request
///
/// The handle holds its own copies of the circuits, Hamiltonians and the
/// initial states of the simulators it was built from, so later changes to
/// those simulators do not affect it.
pub struct GradOps {
    hams: Vec<Hamiltonian>,
    right: Circuit,
    right_herm: Circuit,
    left: Option<(Circuit, Circuit)>,
    right_state: StateVector,
    left_state: Option<StateVector>,
    encoder_params: Vec<String>,
    ansatz_params: Vec<String>,
    mode: Mode,
    budget: usize,
}

impl Simulator {
    /// Build a gradient operator for `hams` over `circ_right`
    ///
    /// Passing `circ_left` or `simulator_left` selects the non-hermitian
    /// form `⟨left|H|right⟩`, where the bra is `circ_left` (default
    /// `circ_right`) applied to the state of `simulator_left` (default this
    /// simulator). `parallel_worker` bounds the worker threads; the
    /// simulator's configured thread count applies otherwise.
    ///
    /// All checks happen here, before any simulation.
    ///
    /// # Errors
    /// - `DimensionMismatch` if a Hamiltonian does not fit the register
    /// - `NoiseNotSupported` / `MeasurementNotAllowed` for circuits with
    ///   noise channels or measurements
    /// - `QubitCountMismatch` if `simulator_left` has another width, or a
    ///   circuit is wider than the simulator
    /// - `ParameterRoleConflict` if a name is both encoder and ansatz
    /// - `UnsupportedGate` for gates the backend does not implement
    /// - `InvalidConfig` for `parallel_worker == Some(0)`
    pub fn get_expectation_with_grad(
        &self,
        hams: Vec<Hamiltonian>,
        circ_right: &Circuit,
        circ_left: Option<&Circuit>,
        simulator_left: Option<&Simulator>,
        parallel_worker: Option<usize>,
    ) -> Result<GradOps> {
        for ham in &hams {
            self.check_hamiltonian(ham)?;
        }
        if circ_right.is_noise_circuit() || circ_left.map_or(false, Circuit::is_noise_circuit) {
            return Err(SimulatorError::NoiseNotSupported);
        }
        if let Some(sim) = simulator_left {
            if sim.n_qubits() != self.n_qubits() {
                return Err(SimulatorError::QubitCountMismatch {
                    simulator: self.n_qubits(),
                    required: sim.n_qubits(),
                });
            }
        }
        let non_hermitian = circ_left.is_some() || simulator_left.is_some();
        let left = circ_left.unwrap_or(circ_right);
        if circ_right.has_measure() || left.has_measure() {
            return Err(SimulatorError::MeasurementNotAllowed);
        }
        if parallel_worker == Some(0) {
            return Err(SimulatorError::invalid_config("parallel_worker must be > 0"));
        }

        let mut encoder_params = circ_right.encoder_params();
        let mut ansatz_params = circ_right.ansatz_params();
        if non_hermitian {
            merge_names(&mut encoder_params, left.encoder_params());
            merge_names(&mut ansatz_params, left.ansatz_params());
        }
        if let Some(name) = encoder_params.iter().find(|n| ansatz_params.contains(n)) {
            return Err(SimulatorError::ParameterRoleConflict(name.clone()));
        }
        let mode = if ansatz_params.is_empty() && !encoder_params.is_empty() {
            Mode::Encoder
        } else if encoder_params.is_empty() {
            Mode::Ansatz
        } else {
            Mode::Both
        };

        self.check_circuit_width(circ_right)?;
        self.check_circuit_width(left)?;
        for op in circ_right.operations().chain(left.operations()) {
            execution::check_supported(op)?;
        }

        let left = if non_hermitian {
            Some((left.clone(), left.hermitian()?))
        } else {
            None
        };
        let left_state = non_hermitian.then(|| {
            simulator_left
                .unwrap_or(self)
                .state_vector()
                .clone()
        });

        debug!(
            target: "varq_sim::gradient",
            "gradient operator: {} hamiltonians, {} encoder, {} ansatz parameters, mode {:?}",
            hams.len(),
            encoder_params.len(),
            ansatz_params.len(),
            mode
        );

        Ok(GradOps {
            hams,
            right: circ_right.clone(),
            right_herm: circ_right.hermitian()?,
            left,
            right_state: self.state_vector().clone(),
            left_state,
            encoder_params,
            ansatz_params,
            mode,
            budget: parallel_worker.unwrap_or_else(|| self.config().worker_budget()),
        })
    }

    fn check_hamiltonian(&self, ham: &Hamiltonian) -> Result<()> {
        let fits = match ham.matrix() {
            Some(matrix) => matrix.n_qubits() == self.n_qubits(),
            None => ham.n_qubits() <= self.n_qubits(),
        };
        if !fits {
            return Err(SimulatorError::DimensionMismatch(format!(
                "Hamiltonian on {} qubits does not fit a {} qubit simulator",
                ham.n_qubits(),
                self.n_qubits()
            )));
        }
        Ok(())
    }
}

fn merge_names(into: &mut Vec<String>, extra: Vec<String>) {
    for name in extra {
        if !into.contains(&name) {
            into.push(name);
        }
    }
}

impl GradOps {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn encoder_params(&self) -> &[String] {
        &self.encoder_params
    }

    pub fn ansatz_params(&self) -> &[String] {
        &self.ansatz_params
    }

    pub fn n_qubits(&self) -> usize {
        self.right_state.num_qubits()
    }

    pub fn is_hermitian(&self) -> bool {
        self.left.is_none()
    }

    /// Evaluate with inputs given as 2-D arrays
    ///
    /// Encoder mode takes one batch, ansatz mode one single-row array of
    /// weights, both modes take the batch followed by the weights.
    ///
    /// # Errors
    /// `InvalidConfig` if the number or shape of inputs does not match.
    pub fn call(&self, inputs: &[Vec<Vec<f64>>]) -> Result<GradResult> {
        let expected = if self.mode == Mode::Both { 2 } else { 1 };
        if inputs.len() != expected {
            return Err(SimulatorError::invalid_config(format!(
                "need {} input{}, got {}",
                expected,
                if expected == 1 { "" } else { "s" },
                inputs.len()
            )));
        }
        match self.mode {
            Mode::Encoder => self.call_encoder(&inputs[0]),
            Mode::Ansatz => self.call_ansatz(single_row(&inputs[0])?),
            Mode::Both => self.call_both(&inputs[0], single_row(&inputs[1])?),
        }
    }

    pub fn call_encoder(&self, encoder: &[Vec<f64>]) -> Result<GradResult> {
        self.expect_mode(Mode::Encoder)?;
        self.evaluate(encoder, &[])
    }

    pub fn call_ansatz(&self, ansatz: &[f64]) -> Result<GradResult> {
        self.expect_mode(Mode::Ansatz)?;
        self.evaluate(&[Vec::new()], ansatz)
    }

    pub fn call_both(&self, encoder: &[Vec<f64>], ansatz: &[f64]) -> Result<GradResult> {
        self.expect_mode(Mode::Both)?;
        self.evaluate(encoder, ansatz)
    }

    fn expect_mode(&self, mode: Mode) -> Result<()> {
        if self.mode != mode {
            return Err(SimulatorError::invalid_config(format!(
                "operator expects {:?} inputs, called as {:?}",
                self.mode, mode
            )));
        }
        Ok(())
    }

    fn check_inputs(&self, encoder: &[Vec<f64>], ansatz: &[f64]) -> Result<()> {
        if encoder.is_empty() {
            return Err(SimulatorError::invalid_config("encoder batch is empty"));
        }
        if let Some(row) = encoder.iter().find(|r| r.len() != self.encoder_params.len()) {
            return Err(SimulatorError::invalid_config(format!(
                "encoder row has {} values, expected {}",
                row.len(),
                self.encoder_params.len()
            )));
        }
        if ansatz.len() != self.ansatz_params.len() {
            return Err(SimulatorError::invalid_config(format!(
                "ansatz has {} values, expected {}",
                ansatz.len(),
                self.ansatz_params.len()
            )));
        }
        Ok(())
    }

    fn evaluate(&self, encoder: &[Vec<f64>], ansatz: &[f64]) -> Result<GradResult> {
        self.check_inputs(encoder, ansatz)?;

        let (batch_threads, mea_threads) =
            thread_balance(encoder.len(), self.hams.len(), self.budget);
        info!(
            target: "varq_sim::gradient",
            "evaluating {} rows x {} hamiltonians on {}x{} workers",
            encoder.len(),
            self.hams.len(),
            batch_threads,
            mea_threads
        );

        let columns: IndexMap<String, usize> = self
            .encoder_params
            .iter()
            .chain(&self.ansatz_params)
            .cloned()
            .enumerate()
            .map(|(i, name)| (name, i))
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(batch_threads * mea_threads)
            .build()
            .map_err(|e| SimulatorError::invalid_config(e.to_string()))?;

        let row_chunk = parallel::chunk_len(encoder.len(), batch_threads);
        let ham_chunk = parallel::chunk_len(self.hams.len(), mea_threads);
        let rows: Vec<Vec<(Complex64, Vec<Complex64>)>> = pool.install(|| {
            encoder
                .par_chunks(row_chunk)
                .map(|chunk| {
                    chunk
                        .iter()
                        .map(|row| self.evaluate_row(row, ansatz, &columns, ham_chunk))
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()
                .map(|chunks| chunks.into_iter().flatten().collect())
        })?;

        Ok(self.unpack(rows))
    }

    fn evaluate_row(
        &self,
        row: &[f64],
        ansatz: &[f64],
        columns: &IndexMap<String, usize>,
        ham_chunk: usize,
    ) -> Result<Vec<(Complex64, Vec<Complex64>)>> {
        let values: ParameterValues = self
            .encoder_params
            .iter()
            .cloned()
            .zip(row.iter().copied())
            .chain(self.ansatz_params.iter().cloned().zip(ansatz.iter().copied()))
            .collect();

        let right = Sweep {
            circuit: &self.right,
            herm: &self.right_herm,
        };
        let phi_right = right.forward(&self.right_state, &values)?;
        let phi_left = match (&self.left, &self.left_state) {
            (Some((circuit, herm)), Some(state)) => {
                let sweep = Sweep { circuit, herm };
                Some((sweep.forward(state, &values)?, sweep))
            }
            _ => None,
        };
        debug!(target: "varq_sim::gradient", "row {:?}: forward pass done", row);

        let per_chunk = self
            .hams
            .par_chunks(ham_chunk)
            .map(|hams| {
                hams.iter()
                    .map(|ham| match &phi_left {
                        Some((phi_l, left)) => adjoint::non_hermitian_grad(
                            left, &right, ham, phi_l, &phi_right, &values, columns,
                        ),
                        None => adjoint::hermitian_grad(&right, ham, &phi_right, &values, columns),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(per_chunk.into_iter().flatten().collect())
    }

    fn unpack(&self, rows: Vec<Vec<(Complex64, Vec<Complex64>)>>) -> GradResult {
        let n_enc = self.encoder_params.len();
        let mut value = Vec::with_capacity(rows.len());
        let mut enc = Vec::with_capacity(rows.len());
        let mut ans = Vec::with_capacity(rows.len());
        for row in rows {
            let mut v_row = Vec::with_capacity(row.len());
            let mut e_row = Vec::with_capacity(row.len());
            let mut a_row = Vec::with_capacity(row.len());
            for (v, mut grads) in row {
                let a = grads.split_off(n_enc);
                v_row.push(v);
                e_row.push(grads);
                a_row.push(a);
            }
            value.push(v_row);
            enc.push(e_row);
            ans.push(a_row);
        }
        GradResult {
            value,
            encoder_grad: (self.mode != Mode::Ansatz).then_some(enc),
            ansatz_grad: (self.mode != Mode::Encoder).then_some(ans),
        }
    }
}

fn single_row(input: &[Vec<f64>]) -> Result<&[f64]> {
    match input {
        [row] => Ok(row),
        _ => Err(SimulatorError::invalid_config(format!(
            "ansatz input must be a single row, got {} rows",
            input.len()
        ))),
    }
}

impl fmt::Display for GradOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.n_qubits();
        write!(
            f,
            "{} qubit{} {} VQA Operator",
            n,
            if n == 1 { "" } else { "s" },
            BACKEND_NAME
        )
    }
}
