//! Kraus operators and the closed set of single-qubit noise channels

use num_complex::Complex64;
use std::fmt;

/// Row-major 2×2 complex matrix
pub type Matrix2 = [[Complex64; 2]; 2];

/// A single-qubit Kraus operator
///
/// A channel with operators {K_i} satisfying Σ K_i† K_i = I transforms a
/// density matrix as ρ → Σ_i K_i ρ K_i†. On a pure state the simulator
/// unravels it as a trajectory: branch `i` is chosen with probability
/// ‖K_i ψ‖² and the state is renormalised.
#[derive(Clone, Debug, PartialEq)]
pub struct KrausOperator {
    pub matrix: Matrix2,
}

impl KrausOperator {
    pub fn new(matrix: Matrix2) -> Self {
        Self { matrix }
    }

    /// `scale · M`
    pub fn scaled(matrix: Matrix2, scale: f64) -> Self {
        let mut m = matrix;
        for row in m.iter_mut() {
            for v in row.iter_mut() {
                *v *= scale;
            }
        }
        Self { matrix: m }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row][col]
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> Self {
        let m = &self.matrix;
        Self {
            matrix: [[m[0][0].conj(), m[1][0].conj()], [m[0][1].conj(), m[1][1].conj()]],
        }
    }
}

/// Single-qubit noise channel
///
/// Probabilities are checked by [`NoiseChannel::validate`] when the channel
/// is placed in a circuit through [`GateOp::new`](crate::GateOp::new).
#[derive(Clone, Debug, PartialEq)]
pub enum NoiseChannel {
    /// X, Y and Z errors with independent probabilities
    Pauli { px: f64, py: f64, pz: f64 },
    BitFlip(f64),
    PhaseFlip(f64),
    BitPhaseFlip(f64),
    /// Uniform Pauli error, `p/3` for each of X, Y and Z
    Depolarizing(f64),
    /// Energy relaxation with decay rate γ
    AmplitudeDamping(f64),
    /// Dephasing with rate γ
    PhaseDamping(f64),
    /// User supplied operators
    Kraus {
        name: String,
        operators: Vec<KrausOperator>,
    },
}

impl NoiseChannel {
    pub fn name(&self) -> &str {
        match self {
            Self::Pauli { .. } => "PC",
            Self::BitFlip(_) => "BFC",
            Self::PhaseFlip(_) => "PFC",
            Self::BitPhaseFlip(_) => "BPFC",
            Self::Depolarizing(_) => "DC",
            Self::AmplitudeDamping(_) => "ADC",
            Self::PhaseDamping(_) => "PDC",
            Self::Kraus { name, .. } => name,
        }
    }
}

impl fmt::Display for NoiseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pauli { px, py, pz } => write!(f, "PC(px={}, py={}, pz={})", px, py, pz),
            Self::BitFlip(p)
            | Self::PhaseFlip(p)
            | Self::BitPhaseFlip(p)
            | Self::Depolarizing(p) => write!(f, "{}(p={})", self.name(), p),
            Self::AmplitudeDamping(g) | Self::PhaseDamping(g) => {
                write!(f, "{}(γ={})", self.name(), g)
            }
            Self::Kraus { name, operators } => write!(f, "{}[{} ops]", name, operators.len()),
        }
    }
}
