//! Adjoint-method sweeps
//!
//! Both sweeps walk a circuit backwards from its output state `φ`, carrying a
//! costate `λ`. At gate `k` the forward state is first rolled back through
//! `U_k†`; the derivative term is `⟨λ|∂U_k|φ_{k-1}⟩`, after which `λ` is
//! rolled back too. One forward and one backward pass give the gradient with
//! respect to every parameter.

use crate::error::Result;
use crate::execution;
use indexmap::IndexMap;
use num_complex::Complex64;
use varq_core::operators::Hamiltonian;
use varq_core::{Circuit, Gate, ParameterValues};
use varq_state::StateVector;

/// How a per-gate overlap enters the gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Contribution {
    /// `2·Re⟨λ|∂U φ⟩`, for `⟨φ|H|φ⟩` with hermitian `H`
    TwiceReal,
    /// `⟨λ|∂U φ⟩`, the ket side of `⟨φ_L|H|φ_R⟩`
    Ket,
    /// `conj⟨λ|∂U φ⟩`, the bra side of `⟨φ_L|H|φ_R⟩`
    Bra,
}

/// A circuit together with its hermitian conjugate
pub(crate) struct Sweep<'a> {
    pub circuit: &'a Circuit,
    pub herm: &'a Circuit,
}

impl Sweep<'_> {
    /// `U(values)|initial⟩`
    pub fn forward(&self, initial: &StateVector, values: &ParameterValues) -> Result<StateVector> {
        let mut state = initial.clone();
        for op in self.circuit.operations() {
            execution::apply_unitary(&mut state, op, values)?;
        }
        Ok(state)
    }

    /// Accumulate gradient contributions into `grads`
    ///
    /// `phi` is the circuit output, `lambda` the costate at the output.
    /// `columns` maps parameter names to their gradient column.
    pub fn backward(
        &self,
        mut phi: StateVector,
        mut lambda: StateVector,
        values: &ParameterValues,
        columns: &IndexMap<String, usize>,
        grads: &mut [Complex64],
        mode: Contribution,
    ) -> Result<()> {
        let ops = self.circuit.operations().collect::<Vec<_>>();
        for (op, herm) in ops.iter().rev().zip(self.herm.operations()) {
            execution::apply_unitary(&mut phi, herm, values)?;

            if let Gate::Rotation(_, pr) = op.gate() {
                if !pr.is_const() {
                    let mut mu = phi.clone();
                    execution::apply_derivative(&mut mu, op, values)?;
                    let overlap = lambda.inner(&mu)?;
                    let g = match mode {
                        Contribution::TwiceReal => Complex64::new(2.0 * overlap.re, 0.0),
                        Contribution::Ket => overlap,
                        Contribution::Bra => overlap.conj(),
                    };
                    for (name, coeff) in pr.terms() {
                        if let Some(&col) = columns.get(name) {
                            grads[col] += g * coeff;
                        }
                    }
                }
            }

            execution::apply_unitary(&mut lambda, herm, values)?;
        }
        Ok(())
    }
}

/// Value and gradient of `⟨φ|H|φ⟩` for the output `phi` of `sweep`
pub(crate) fn hermitian_grad(
    sweep: &Sweep<'_>,
    ham: &Hamiltonian,
    phi: &StateVector,
    values: &ParameterValues,
    columns: &IndexMap<String, usize>,
) -> Result<(Complex64, Vec<Complex64>)> {
    let lambda = phi.apply_hamiltonian(ham, false)?;
    let value = Complex64::new(phi.inner(&lambda)?.re, 0.0);
    let mut grads = vec![Complex64::new(0.0, 0.0); columns.len()];
    sweep.backward(
        phi.clone(),
        lambda,
        values,
        columns,
        &mut grads,
        Contribution::TwiceReal,
    )?;
    Ok((value, grads))
}

/// Value and gradient of `⟨φ_L|H|φ_R⟩`
pub(crate) fn non_hermitian_grad(
    left: &Sweep<'_>,
    right: &Sweep<'_>,
    ham: &Hamiltonian,
    phi_left: &StateVector,
    phi_right: &StateVector,
    values: &ParameterValues,
    columns: &IndexMap<String, usize>,
) -> Result<(Complex64, Vec<Complex64>)> {
    let h_right = phi_right.apply_hamiltonian(ham, false)?;
    let value = phi_left.inner(&h_right)?;
    let mut grads = vec![Complex64::new(0.0, 0.0); columns.len()];

    let h_dag_left = phi_left.apply_hamiltonian(ham, true)?;
    right.backward(
        phi_right.clone(),
        h_dag_left,
        values,
        columns,
        &mut grads,
        Contribution::Ket,
    )?;
    left.backward(
        phi_left.clone(),
        h_right,
        values,
        columns,
        &mut grads,
        Contribution::Bra,
    )?;
    Ok((value, grads))
}
