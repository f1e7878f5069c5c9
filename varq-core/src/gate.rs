//! Gate catalog and gate operations
//!
//! Gates form a closed set of variants. Binding a gate to qubits produces an
//! immutable [`GateOp`]; a gate value itself never carries qubits.

use crate::noise::NoiseChannel;
use crate::{ParameterResolver, QuantumError, QubitId, Result};
use smallvec::SmallVec;
use std::fmt;

/// Parameter-free unitary gates
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FixedGate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdag,
    T,
    Tdag,
    Swap,
    ISwap,
    ISwapDag,
}

impl FixedGate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::H => "H",
            Self::S => "S",
            Self::Sdag => "Sdag",
            Self::T => "T",
            Self::Tdag => "Tdag",
            Self::Swap => "SWAP",
            Self::ISwap => "ISWAP",
            Self::ISwapDag => "ISWAPdag",
        }
    }

    pub fn num_targets(&self) -> usize {
        match self {
            Self::Swap | Self::ISwap | Self::ISwapDag => 2,
            _ => 1,
        }
    }

    pub fn hermitian(&self) -> Self {
        match self {
            Self::S => Self::Sdag,
            Self::Sdag => Self::S,
            Self::T => Self::Tdag,
            Self::Tdag => Self::T,
            Self::ISwap => Self::ISwapDag,
            Self::ISwapDag => Self::ISwap,
            other => *other,
        }
    }
}

/// Single-parameter rotations
///
/// `RX`, `RY`, `RZ` are `exp(-iθ/2 P)`; `XX`, `YY`, `ZZ` are `exp(-iθ/2 P⊗P)`
/// on two targets; `PhaseShift` is `diag(1, e^{iθ})`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RotationGate {
    RX,
    RY,
    RZ,
    PhaseShift,
    XX,
    YY,
    ZZ,
}

impl RotationGate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RX => "RX",
            Self::RY => "RY",
            Self::RZ => "RZ",
            Self::PhaseShift => "PS",
            Self::XX => "XX",
            Self::YY => "YY",
            Self::ZZ => "ZZ",
        }
    }

    pub fn num_targets(&self) -> usize {
        match self {
            Self::XX | Self::YY | Self::ZZ => 2,
            _ => 1,
        }
    }
}

/// A quantum operation, not yet bound to qubits
#[derive(Clone, Debug, PartialEq)]
pub enum Gate {
    Fixed(FixedGate),
    Rotation(RotationGate, ParameterResolver),
    /// Generic single-qubit unitary `U3(θ, φ, λ)`
    U3 {
        theta: ParameterResolver,
        phi: ParameterResolver,
        lambda: ParameterResolver,
    },
    /// Fermionic simulation gate on two targets
    FSim {
        theta: ParameterResolver,
        phi: ParameterResolver,
    },
    /// Projective Z measurement recorded under a key
    Measure(String),
    Channel(NoiseChannel),
}

impl Gate {
    pub fn rx(pr: impl Into<ParameterResolver>) -> Self {
        Self::Rotation(RotationGate::RX, pr.into())
    }

    pub fn ry(pr: impl Into<ParameterResolver>) -> Self {
        Self::Rotation(RotationGate::RY, pr.into())
    }

    pub fn rz(pr: impl Into<ParameterResolver>) -> Self {
        Self::Rotation(RotationGate::RZ, pr.into())
    }

    pub fn phase_shift(pr: impl Into<ParameterResolver>) -> Self {
        Self::Rotation(RotationGate::PhaseShift, pr.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Fixed(g) => g.name(),
            Self::Rotation(r, _) => r.name(),
            Self::U3 { .. } => "U3",
            Self::FSim { .. } => "FSim",
            Self::Measure(_) => "M",
            Self::Channel(c) => c.name(),
        }
    }

    /// Number of target qubits the gate acts on
    pub fn num_targets(&self) -> usize {
        match self {
            Self::Fixed(g) => g.num_targets(),
            Self::Rotation(r, _) => r.num_targets(),
            Self::FSim { .. } => 2,
            Self::U3 { .. } | Self::Measure(_) | Self::Channel(_) => 1,
        }
    }

    /// Whether the gate is a coherent unitary operation
    pub fn is_unitary(&self) -> bool {
        !matches!(self, Self::Measure(_) | Self::Channel(_))
    }

    pub fn is_measure(&self) -> bool {
        matches!(self, Self::Measure(_))
    }

    pub fn is_channel(&self) -> bool {
        matches!(self, Self::Channel(_))
    }

    /// Parameter expressions the gate depends on, in argument order
    pub fn parameters(&self) -> SmallVec<[&ParameterResolver; 3]> {
        match self {
            Self::Rotation(_, pr) => SmallVec::from_iter([pr]),
            Self::U3 { theta, phi, lambda } => SmallVec::from_iter([theta, phi, lambda]),
            Self::FSim { theta, phi } => SmallVec::from_iter([theta, phi]),
            _ => SmallVec::new(),
        }
    }

    /// True when any parameter expression references a named parameter
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|pr| !pr.is_const())
    }

    /// Hermitian conjugate of the gate
    ///
    /// # Errors
    /// `UnsupportedGate` for measurements and noise channels.
    pub fn hermitian(&self) -> Result<Self> {
        Ok(match self {
            Self::Fixed(g) => Self::Fixed(g.hermitian()),
            Self::Rotation(r, pr) => Self::Rotation(*r, -pr.clone()),
            Self::U3 { theta, phi, lambda } => Self::U3 {
                theta: -theta.clone(),
                phi: -lambda.clone(),
                lambda: -phi.clone(),
            },
            Self::FSim { theta, phi } => Self::FSim {
                theta: -theta.clone(),
                phi: -phi.clone(),
            },
            Self::Measure(_) | Self::Channel(_) => {
                return Err(QuantumError::UnsupportedGate(format!(
                    "{} has no hermitian form",
                    self.name()
                )))
            }
        })
    }

    /// Bind the gate to qubit indices, see [`GateOp::new`]
    pub fn on(self, targets: &[usize], controls: &[usize]) -> Result<GateOp> {
        let targets: SmallVec<[QubitId; 2]> = targets.iter().copied().map(QubitId::new).collect();
        let controls: SmallVec<[QubitId; 2]> = controls.iter().copied().map(QubitId::new).collect();
        GateOp::new(self, &targets, &controls)
    }
}

impl From<FixedGate> for Gate {
    fn from(g: FixedGate) -> Self {
        Self::Fixed(g)
    }
}

impl From<NoiseChannel> for Gate {
    fn from(c: NoiseChannel) -> Self {
        Self::Channel(c)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(g) => write!(f, "{}", g.name()),
            Self::Rotation(r, pr) => write!(f, "{}({})", r.name(), pr),
            Self::U3 { theta, phi, lambda } => write!(f, "U3({}, {}, {})", theta, phi, lambda),
            Self::FSim { theta, phi } => write!(f, "FSim({}, {})", theta, phi),
            Self::Measure(key) => write!(f, "M({})", key),
            Self::Channel(c) => write!(f, "{}", c),
        }
    }
}

/// A gate bound to target and control qubits
///
/// # Example
/// ```
/// use varq_core::{FixedGate, GateOp, QubitId};
///
/// let cnot = GateOp::new(FixedGate::X, &[QubitId::new(1)], &[QubitId::new(0)]).unwrap();
/// assert_eq!(cnot.max_qubit(), 1);
/// assert!(GateOp::new(FixedGate::X, &[QubitId::new(0)], &[QubitId::new(0)]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GateOp {
    gate: Gate,
    targets: SmallVec<[QubitId; 2]>,
    controls: SmallVec<[QubitId; 2]>,
}

impl GateOp {
    /// Bind a gate to qubits
    ///
    /// # Errors
    /// Returns error if:
    /// - Target count doesn't match the gate
    /// - A qubit index is not below [`MAX_QUBITS`](crate::MAX_QUBITS)
    /// - A qubit is repeated, or used as both target and control
    /// - Controls are given for a measurement or noise channel
    /// - A noise channel has invalid probabilities
    pub fn new(gate: impl Into<Gate>, targets: &[QubitId], controls: &[QubitId]) -> Result<Self> {
        let gate = gate.into();
        if targets.len() != gate.num_targets() {
            return Err(QuantumError::invalid_qubit_count(
                gate.name(),
                gate.num_targets(),
                targets.len(),
            ));
        }

        for q in targets.iter().chain(controls) {
            q.check_range(crate::MAX_QUBITS)?;
        }
        for (i, q) in targets.iter().enumerate() {
            if targets[i + 1..].contains(q) {
                return Err(QuantumError::DuplicateQubit(*q));
            }
        }
        for (i, q) in controls.iter().enumerate() {
            if controls[i + 1..].contains(q) {
                return Err(QuantumError::DuplicateQubit(*q));
            }
            if targets.contains(q) {
                return Err(QuantumError::OverlappingQubits(*q));
            }
        }

        if !gate.is_unitary() && !controls.is_empty() {
            return Err(QuantumError::invalid_config(format!(
                "{} cannot take control qubits",
                gate.name()
            )));
        }
        if let Gate::Channel(channel) = &gate {
            channel.validate()?;
        }

        Ok(Self {
            gate,
            targets: SmallVec::from_slice(targets),
            controls: SmallVec::from_slice(controls),
        })
    }

    /// Measurement of `qubit`, keyed `q<index>` unless a key is given
    pub fn measure(qubit: QubitId, key: Option<&str>) -> Self {
        let key = key.map_or_else(|| format!("q{}", qubit.index()), str::to_string);
        Self {
            gate: Gate::Measure(key),
            targets: SmallVec::from_slice(&[qubit]),
            controls: SmallVec::new(),
        }
    }

    #[inline]
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    #[inline]
    pub fn targets(&self) -> &[QubitId] {
        &self.targets
    }

    #[inline]
    pub fn controls(&self) -> &[QubitId] {
        &self.controls
    }

    /// Targets followed by controls
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.targets.iter().chain(self.controls.iter()).copied()
    }

    /// Largest qubit index referenced
    pub fn max_qubit(&self) -> usize {
        self.qubits().map(|q| q.index()).max().unwrap_or(0)
    }

    /// Bit mask of all control qubits
    pub fn control_mask(&self) -> usize {
        self.controls.iter().fold(0, |m, q| m | q.mask())
    }

    /// Fail with `QubitOutOfRange` if any qubit is outside `num_qubits`
    pub fn check_range(&self, num_qubits: usize) -> Result<()> {
        self.qubits().try_for_each(|q| q.check_range(num_qubits))
    }

    /// Same qubits, hermitian-conjugate gate
    pub fn hermitian(&self) -> Result<Self> {
        Ok(Self {
            gate: self.gate.hermitian()?,
            targets: self.targets.clone(),
            controls: self.controls.clone(),
        })
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.gate)?;
        for (i, q) in self.targets.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", q.index())?;
        }
        if !self.controls.is_empty() {
            write!(f, " <-:")?;
            for q in &self.controls {
                write!(f, " {}", q.index())?;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(i: usize) -> QubitId {
        QubitId::new(i)
    }

    #[test]
    fn test_target_count_checked() {
        let err = GateOp::new(FixedGate::Swap, &[q(0)], &[]).unwrap_err();
        assert_eq!(err, QuantumError::invalid_qubit_count("SWAP", 2, 1));
    }

    #[test]
    fn test_duplicate_and_overlap() {
        assert_eq!(
            GateOp::new(FixedGate::Swap, &[q(1), q(1)], &[]).unwrap_err(),
            QuantumError::DuplicateQubit(q(1))
        );
        assert_eq!(
            GateOp::new(FixedGate::X, &[q(1)], &[q(2), q(2)]).unwrap_err(),
            QuantumError::DuplicateQubit(q(2))
        );
        assert_eq!(
            GateOp::new(FixedGate::X, &[q(1)], &[q(1)]).unwrap_err(),
            QuantumError::OverlappingQubits(q(1))
        );
    }

    #[test]
    fn test_measure_rejects_controls() {
        let err = GateOp::new(Gate::Measure("m".into()), &[q(0)], &[q(1)]).unwrap_err();
        assert!(matches!(err, QuantumError::InvalidConfig(_)));
    }

    #[test]
    fn test_measure_default_key() {
        let op = GateOp::measure(q(3), None);
        assert_eq!(op.gate(), &Gate::Measure("q3".into()));
        let op = GateOp::measure(q(3), Some("m"));
        assert_eq!(op.gate(), &Gate::Measure("m".into()));
    }

    #[test]
    fn test_hermitian_forms() {
        assert_eq!(FixedGate::S.hermitian(), FixedGate::Sdag);
        assert_eq!(FixedGate::ISwapDag.hermitian(), FixedGate::ISwap);
        assert_eq!(FixedGate::H.hermitian(), FixedGate::H);

        let rx = Gate::rx(ParameterResolver::named("a").with_constant(0.5));
        match rx.hermitian().unwrap() {
            Gate::Rotation(RotationGate::RX, pr) => {
                assert_eq!(pr.coeff("a"), Some(-1.0));
                assert_eq!(pr.const_value(), -0.5);
            }
            other => panic!("unexpected gate {:?}", other),
        }

        assert!(Gate::Measure("m".into()).hermitian().is_err());
        assert!(Gate::Channel(NoiseChannel::BitFlip(0.1)).hermitian().is_err());
    }

    #[test]
    fn test_u3_hermitian_swaps_phases() {
        let u3 = Gate::U3 {
            theta: 1.0.into(),
            phi: 2.0.into(),
            lambda: 3.0.into(),
        };
        let Gate::U3 { theta, phi, lambda } = u3.hermitian().unwrap() else {
            panic!("expected U3");
        };
        assert_eq!(theta.const_value(), -1.0);
        assert_eq!(phi.const_value(), -3.0);
        assert_eq!(lambda.const_value(), -2.0);
    }

    #[test]
    fn test_invalid_channel_rejected() {
        let err = GateOp::new(NoiseChannel::Depolarizing(1.5), &[q(0)], &[]).unwrap_err();
        assert!(matches!(err, QuantumError::InvalidConfig(_)));
    }

    #[test]
    fn test_display() {
        let op = GateOp::new(Gate::rx("a"), &[q(1)], &[q(0)]).unwrap();
        assert_eq!(op.to_string(), "RX(a)(1 <-: 0)");
        assert_eq!(op.control_mask(), 1);
    }

    #[test]
    fn test_qubit_beyond_limit_rejected() {
        let limit = crate::MAX_QUBITS;
        assert!(matches!(
            GateOp::new(FixedGate::X, &[q(limit)], &[]),
            Err(QuantumError::QubitOutOfRange { index, .. }) if index == limit
        ));
        assert!(matches!(
            GateOp::new(FixedGate::X, &[q(0)], &[q(64)]),
            Err(QuantumError::QubitOutOfRange { index: 64, .. })
        ));
        let op = GateOp::new(FixedGate::X, &[q(0)], &[q(limit - 1)]).unwrap();
        assert_eq!(op.control_mask(), 1 << (limit - 1));
    }
}
