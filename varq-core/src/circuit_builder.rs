//! Incremental circuit construction

use crate::gate::{FixedGate, Gate, RotationGate};
use crate::{Circuit, GateOp, ParameterResolver, QuantumError, QubitId, Result};
use smallvec::SmallVec;

/// Builder for [`Circuit`]s
///
/// Every append validates the gate operation immediately. With a declared
/// width ([`CircuitBuilder::with_qubits`]) qubit indices beyond it are
/// rejected with `QubitOutOfRange`; without one the width is inferred.
///
/// # Example
/// ```
/// use varq_core::{CircuitBuilder, ParameterResolver};
///
/// let mut builder = CircuitBuilder::with_qubits(2);
/// builder
///     .rx(0, ParameterResolver::named("x").as_encoder())
///     .unwrap()
///     .cx(1, 0)
///     .unwrap();
/// assert!(builder.x(2).is_err());
///
/// let circuit = builder.build();
/// assert_eq!(circuit.len(), 2);
/// assert_eq!(circuit.encoder_params(), vec!["x"]);
/// ```
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    declared: Option<usize>,
    operations: Vec<GateOp>,
    keys: Vec<String>,
}

impl CircuitBuilder {
    /// Builder that infers the qubit count from the gates
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for a fixed register width
    pub fn with_qubits(num_qubits: usize) -> Self {
        Self {
            declared: Some(num_qubits),
            ..Self::default()
        }
    }

    #[inline]
    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    /// Append an already bound operation
    ///
    /// # Errors
    /// `QubitOutOfRange` beyond the declared width, `InvalidConfig` for a
    /// repeated measurement key.
    pub fn apply(&mut self, op: GateOp) -> Result<&mut Self> {
        if let Some(n) = self.declared {
            op.check_range(n)?;
        }
        if let Gate::Measure(key) = op.gate() {
            if self.keys.contains(key) {
                return Err(QuantumError::invalid_config(format!(
                    "measure key '{}' is used more than once",
                    key
                )));
            }
            self.keys.push(key.clone());
        }
        self.operations.push(op);
        Ok(self)
    }

    /// Bind `gate` to target and control indices and append it
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        targets: &[usize],
        controls: &[usize],
    ) -> Result<&mut Self> {
        let targets: SmallVec<[QubitId; 2]> = targets.iter().map(|&q| QubitId::new(q)).collect();
        let controls: SmallVec<[QubitId; 2]> =
            controls.iter().map(|&q| QubitId::new(q)).collect();
        let op = GateOp::new(gate, &targets, &controls)?;
        self.apply(op)
    }

    pub fn x(&mut self, q: usize) -> Result<&mut Self> {
        self.gate(FixedGate::X, &[q], &[])
    }

    pub fn h(&mut self, q: usize) -> Result<&mut Self> {
        self.gate(FixedGate::H, &[q], &[])
    }

    /// Controlled X on `target`, conditioned on `control`
    pub fn cx(&mut self, target: usize, control: usize) -> Result<&mut Self> {
        self.gate(FixedGate::X, &[target], &[control])
    }

    pub fn rx(&mut self, q: usize, pr: impl Into<ParameterResolver>) -> Result<&mut Self> {
        self.gate(Gate::Rotation(RotationGate::RX, pr.into()), &[q], &[])
    }

    pub fn ry(&mut self, q: usize, pr: impl Into<ParameterResolver>) -> Result<&mut Self> {
        self.gate(Gate::Rotation(RotationGate::RY, pr.into()), &[q], &[])
    }

    pub fn rz(&mut self, q: usize, pr: impl Into<ParameterResolver>) -> Result<&mut Self> {
        self.gate(Gate::Rotation(RotationGate::RZ, pr.into()), &[q], &[])
    }

    /// Measure `q` under the default key `q<index>`
    pub fn measure(&mut self, q: usize) -> Result<&mut Self> {
        self.apply(GateOp::measure(QubitId::new(q), None))
    }

    pub fn measure_as(&mut self, q: usize, key: &str) -> Result<&mut Self> {
        self.apply(GateOp::measure(QubitId::new(q), Some(key)))
    }

    /// Append every operation of `circuit`
    pub fn extend(&mut self, circuit: &Circuit) -> Result<&mut Self> {
        for op in circuit.operations() {
            self.apply(op.clone())?;
        }
        Ok(self)
    }

    /// Finish the circuit
    pub fn build(self) -> Circuit {
        let n_qubits = self.declared.unwrap_or(0);
        // keys were checked on every append
        let inferred = self.operations.iter().map(|op| op.max_qubit() + 1).max().unwrap_or(0);
        Circuit::from_parts(self.operations, inferred.max(n_qubits))
    }
}
