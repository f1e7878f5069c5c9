//! Immutable quantum circuits
//!
//! A [`Circuit`] is an ordered list of [`GateOp`]s. It is built once through
//! [`CircuitBuilder`](crate::CircuitBuilder); every transformation returns a
//! new circuit.

use crate::gate::Gate;
use crate::{GateOp, QuantumError, QubitId, Result};
use indexmap::IndexSet;
use std::fmt;

/// An ordered, immutable sequence of gate operations
///
/// # Example
/// ```
/// use varq_core::{CircuitBuilder, FixedGate};
///
/// let mut builder = CircuitBuilder::new();
/// builder.h(0).unwrap().cx(1, 0).unwrap().measure(1).unwrap();
/// let circuit = builder.build();
/// assert_eq!(circuit.n_qubits(), 2);
/// assert!(circuit.is_measure_end());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Circuit {
    n_qubits: usize,
    operations: Vec<GateOp>,
}

impl Circuit {
    /// Build a circuit from validated operations
    ///
    /// `min_qubits` widens the qubit count beyond what the gates reference.
    ///
    /// # Errors
    /// `InvalidConfig` if two measurements share a key.
    pub fn from_operations(operations: Vec<GateOp>, min_qubits: usize) -> Result<Self> {
        let mut keys = IndexSet::new();
        for op in &operations {
            if let Gate::Measure(key) = op.gate() {
                if !keys.insert(key.as_str()) {
                    return Err(QuantumError::invalid_config(format!(
                        "measure key '{}' is used more than once",
                        key
                    )));
                }
            }
        }
        let inferred = operations.iter().map(|op| op.max_qubit() + 1).max().unwrap_or(0);
        Ok(Self::from_parts(operations, inferred.max(min_qubits)))
    }

    pub(crate) fn from_parts(operations: Vec<GateOp>, n_qubits: usize) -> Self {
        Self {
            n_qubits,
            operations,
        }
    }

    /// Number of qubits: the largest referenced index plus one, or the
    /// declared width if larger
    #[inline]
    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> impl Iterator<Item = &GateOp> {
        self.operations.iter()
    }

    pub fn has_measure(&self) -> bool {
        self.operations.iter().any(|op| op.gate().is_measure())
    }

    /// Whether any gate is a noise channel
    pub fn is_noise_circuit(&self) -> bool {
        self.operations.iter().any(|op| op.gate().is_channel())
    }

    /// Whether the circuit has measurements and no gate touches a qubit after
    /// it has been measured
    pub fn is_measure_end(&self) -> bool {
        let mut measured = IndexSet::new();
        for op in &self.operations {
            if op.gate().is_measure() {
                measured.insert(op.targets()[0]);
            } else if op.qubits().any(|q| measured.contains(&q)) {
                return false;
            }
        }
        !measured.is_empty()
    }

    /// Whether any gate depends on a named parameter
    pub fn is_parameterized(&self) -> bool {
        self.operations.iter().any(|op| op.gate().is_parameterized())
    }

    /// All parameter names in order of first appearance
    pub fn params_names(&self) -> Vec<String> {
        self.collect_params(|_, _| true)
    }

    /// Names used in an encoder role somewhere in the circuit
    pub fn encoder_params(&self) -> Vec<String> {
        self.collect_params(|pr, name| pr.is_encoder(name))
    }

    /// Names used in an ansatz role somewhere in the circuit
    pub fn ansatz_params(&self) -> Vec<String> {
        self.collect_params(|pr, name| !pr.is_encoder(name))
    }

    fn collect_params(
        &self,
        keep: impl Fn(&crate::ParameterResolver, &str) -> bool,
    ) -> Vec<String> {
        let mut names = IndexSet::new();
        for op in &self.operations {
            for pr in op.gate().parameters() {
                for name in pr.params_name() {
                    if keep(pr, name) && !names.contains(name) {
                        names.insert(name.to_string());
                    }
                }
            }
        }
        names.into_iter().collect()
    }

    /// Measurement keys with their qubits, in circuit order
    pub fn measures(&self) -> Vec<(String, QubitId)> {
        self.operations
            .iter()
            .filter_map(|op| match op.gate() {
                Gate::Measure(key) => Some((key.clone(), op.targets()[0])),
                _ => None,
            })
            .collect()
    }

    /// Reverse gate order and replace every gate by its hermitian conjugate
    ///
    /// # Errors
    /// `UnsupportedGate` if the circuit contains measurements or channels.
    pub fn hermitian(&self) -> Result<Self> {
        let operations = self
            .operations
            .iter()
            .rev()
            .map(GateOp::hermitian)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            n_qubits: self.n_qubits,
            operations,
        })
    }

    /// Copy of the circuit without measurement gates
    pub fn remove_measure(&self) -> Self {
        self.filtered(|op| !op.gate().is_measure())
    }

    /// Only the measurement gates, in order
    pub fn measures_only(&self) -> Self {
        self.filtered(|op| op.gate().is_measure())
    }

    fn filtered(&self, keep: impl Fn(&GateOp) -> bool) -> Self {
        Self {
            n_qubits: self.n_qubits,
            operations: self.operations.iter().filter(|op| keep(op)).cloned().collect(),
        }
    }

    /// `self` followed by `other`
    ///
    /// # Errors
    /// `InvalidConfig` if the two circuits share a measurement key.
    pub fn then(&self, other: &Circuit) -> Result<Self> {
        let ops = self.operations.iter().chain(other.operations.iter()).cloned().collect();
        Self::from_operations(ops, self.n_qubits.max(other.n_qubits))
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit({} qubits, {} gates)", self.n_qubits, self.operations.len())?;
        for op in &self.operations {
            writeln!(f, "  {}", op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CircuitBuilder, FixedGate, ParameterResolver};

    #[test]
    fn test_empty_circuit() {
        let c = Circuit::default();
        assert_eq!(c.n_qubits(), 0);
        assert!(!c.is_measure_end());
        assert!(!c.has_measure());
    }

    #[test]
    fn test_n_qubits_from_controls() {
        let mut b = CircuitBuilder::new();
        b.cx(0, 4).unwrap();
        assert_eq!(b.build().n_qubits(), 5);
    }

    #[test]
    fn test_measure_end_detection() {
        let mut b = CircuitBuilder::new();
        b.h(0).unwrap().measure(0).unwrap().x(1).unwrap().measure(1).unwrap();
        assert!(b.build().is_measure_end());

        let mut b = CircuitBuilder::new();
        b.measure(0).unwrap().x(0).unwrap();
        assert!(!b.build().is_measure_end());

        let mut b = CircuitBuilder::new();
        b.measure(0).unwrap().cx(1, 0).unwrap();
        assert!(!b.build().is_measure_end());
    }

    #[test]
    fn test_parameter_roles() {
        let mut b = CircuitBuilder::new();
        b.rx(0, ParameterResolver::named("x").as_encoder())
            .unwrap()
            .ry(0, "a")
            .unwrap()
            .rz(1, ParameterResolver::named("b").with_term("x", 2.0))
            .unwrap();
        let c = b.build();
        assert_eq!(c.params_names(), vec!["x", "a", "b"]);
        assert_eq!(c.encoder_params(), vec!["x"]);
        assert_eq!(c.ansatz_params(), vec!["a", "b", "x"]);
        assert!(c.is_parameterized());
    }

    #[test]
    fn test_hermitian_reverses() {
        let mut b = CircuitBuilder::new();
        b.gate(FixedGate::S, &[0], &[]).unwrap().rx(1, "a").unwrap();
        let h = b.build().hermitian().unwrap();
        let ops: Vec<_> = h.operations().collect();
        assert_eq!(ops[0].gate().name(), "RX");
        assert_eq!(ops[1].gate(), &Gate::Fixed(FixedGate::Sdag));
    }

    #[test]
    fn test_hermitian_rejects_measure() {
        let mut b = CircuitBuilder::new();
        b.x(0).unwrap().measure(0).unwrap();
        assert!(matches!(
            b.build().hermitian(),
            Err(QuantumError::UnsupportedGate(_))
        ));
    }

    #[test]
    fn test_remove_and_keep_measures() {
        let mut b = CircuitBuilder::new();
        b.h(0).unwrap().measure(0).unwrap().h(1).unwrap().measure_as(1, "m1").unwrap();
        let c = b.build();
        assert_eq!(c.remove_measure().len(), 2);
        assert!(!c.remove_measure().has_measure());
        assert_eq!(c.measures_only().len(), 2);
        assert_eq!(
            c.measures(),
            vec![("q0".to_string(), QubitId::new(0)), ("m1".to_string(), QubitId::new(1))]
        );
    }

    #[test]
    fn test_then_checks_keys() {
        let mut b = CircuitBuilder::new();
        b.measure(0).unwrap();
        let c = b.build();
        assert!(c.then(&c).is_err());
        assert_eq!(c.remove_measure().then(&c).unwrap().len(), 1);
    }

    #[test]
    fn test_measure_end_with_high_qubit_index() {
        let mut b = CircuitBuilder::new();
        b.measure(64).unwrap();
        assert!(b.build().is_measure_end());

        let mut b = CircuitBuilder::new();
        b.measure(70).unwrap().measure(3).unwrap().x(3).unwrap();
        assert!(!b.build().is_measure_end());
    }
}
