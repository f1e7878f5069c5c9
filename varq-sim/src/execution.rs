//! Gate application on a state vector
//!
//! The functions here are shared by the simulator, sampling and gradient
//! sweeps. They never check the register width of a whole circuit; callers do
//! that once up front.

use crate::error::{Result, SimulatorError};
use indexmap::IndexMap;
use log::trace;
use rand::Rng;
use varq_core::noise::NoiseChannel;
use varq_core::{Gate, GateOp, ParameterValues};
use varq_gates::GateMatrix;
use varq_state::{StateVector, ZERO_NORM_TOLERANCE};

/// Reject gates the state-vector backend does not implement
pub(crate) fn check_supported(op: &GateOp) -> Result<()> {
    match op.gate() {
        Gate::U3 { .. } | Gate::FSim { .. } => Err(SimulatorError::UnsupportedGate(format!(
            "{} gate is not supported by the state-vector simulator",
            op.gate().name()
        ))),
        _ => Ok(()),
    }
}

fn apply_matrix(state: &mut StateVector, m: &GateMatrix, op: &GateOp) -> Result<()> {
    let targets = op.targets();
    let mask = op.control_mask();
    match m {
        GateMatrix::Single(m) => state.apply_single_qubit(m, targets[0].index(), mask)?,
        GateMatrix::Two(m) => {
            state.apply_two_qubit(m, targets[0].index(), targets[1].index(), mask)?
        }
    }
    Ok(())
}

/// Apply a unitary gate with bound parameters
pub(crate) fn apply_unitary(
    state: &mut StateVector,
    op: &GateOp,
    values: &ParameterValues,
) -> Result<()> {
    check_supported(op)?;
    let m = GateMatrix::for_gate(op.gate(), values)?;
    trace!(target: "varq_sim::simulator", "apply {}", op);
    apply_matrix(state, &m, op)
}

/// Replace `state` by `∂U/∂θ · state` for a rotation gate
///
/// A controlled rotation only depends on θ in the subspace where every
/// control is 1, so the rest of the state is zeroed.
pub(crate) fn apply_derivative(
    state: &mut StateVector,
    op: &GateOp,
    values: &ParameterValues,
) -> Result<()> {
    let m = GateMatrix::derivative(op.gate(), values)?;
    apply_matrix(state, &m, op)?;
    state.project_controls(op.control_mask())?;
    Ok(())
}

/// Apply a noise channel as one quantum trajectory
///
/// A Kraus branch `K_i` is chosen with probability `‖K_i ψ‖²` and the state
/// is replaced by the normalized branch.
pub(crate) fn apply_channel<R: Rng>(
    state: &mut StateVector,
    channel: &NoiseChannel,
    qubit: usize,
    rng: &mut R,
) -> Result<()> {
    state.check_qubit(qubit)?;
    let draw: f64 = rng.gen();
    let mut acc = 0.0;
    let mut fallback = None;

    for (i, kraus) in channel.kraus_operators().iter().enumerate() {
        let mut branch = state.clone();
        branch.apply_single_qubit(&kraus.matrix, qubit, 0)?;
        let p = branch.norm_sqr();
        if p <= ZERO_NORM_TOLERANCE * ZERO_NORM_TOLERANCE {
            continue;
        }
        acc += p;
        if draw < acc {
            trace!(target: "varq_sim::simulator", "{} on q{}: branch {}", channel.name(), qubit, i);
            branch.normalize()?;
            *state = branch;
            return Ok(());
        }
        fallback = Some(branch);
    }

    // Rounding left `acc` just below `draw`: take the last live branch.
    match fallback {
        Some(mut branch) => {
            branch.normalize()?;
            *state = branch;
            Ok(())
        }
        None => Err(SimulatorError::invalid_config(format!(
            "{} annihilates the state",
            channel.name()
        ))),
    }
}

/// Apply any gate; measurements return their outcome
pub(crate) fn apply_op<R: Rng>(
    state: &mut StateVector,
    op: &GateOp,
    values: &ParameterValues,
    rng: &mut R,
) -> Result<Option<u8>> {
    match op.gate() {
        Gate::Measure(key) => {
            let qubit = op.targets()[0].index();
            let bit = state.measure(qubit, rng.gen())?;
            trace!(target: "varq_sim::simulator", "measure {} on q{} -> {}", key, qubit, bit);
            Ok(Some(bit))
        }
        Gate::Channel(channel) => {
            apply_channel(state, channel, op.targets()[0].index(), rng)?;
            Ok(None)
        }
        _ => {
            apply_unitary(state, op, values)?;
            Ok(None)
        }
    }
}

/// Run every gate of `ops` and collect measurement bits by key column
pub(crate) fn run<'a, R: Rng>(
    state: &mut StateVector,
    ops: impl Iterator<Item = &'a GateOp>,
    values: &ParameterValues,
    keys: &IndexMap<String, usize>,
    rng: &mut R,
) -> Result<Vec<u8>> {
    let mut sample = vec![0u8; keys.len()];
    for op in ops {
        if let Some(bit) = apply_op(state, op, values, rng)? {
            if let Gate::Measure(key) = op.gate() {
                if let Some(col) = keys.get_index_of(key) {
                    sample[col] = bit;
                }
            }
        }
    }
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use varq_core::{FixedGate, QubitId};

    #[test]
    fn test_u3_rejected() {
        let op = GateOp::new(
            Gate::U3 {
                theta: 0.1.into(),
                phi: 0.2.into(),
                lambda: 0.3.into(),
            },
            &[QubitId::new(0)],
            &[],
        )
        .unwrap();
        let mut s = StateVector::new(1).unwrap();
        assert!(matches!(
            apply_unitary(&mut s, &op, &ParameterValues::new()),
            Err(SimulatorError::UnsupportedGate(_))
        ));
    }

    #[test]
    fn test_controlled_derivative_is_projected() {
        // CRX on |+0⟩: the control-0 half must vanish
        let mut s = StateVector::new(2).unwrap();
        let h = GateOp::new(FixedGate::H, &[QubitId::new(0)], &[]).unwrap();
        apply_unitary(&mut s, &h, &ParameterValues::new()).unwrap();
        let crx = GateOp::new(Gate::rx(0.3), &[QubitId::new(1)], &[QubitId::new(0)]).unwrap();
        apply_derivative(&mut s, &crx, &ParameterValues::new()).unwrap();
        assert_relative_eq!(s.amplitudes()[0].norm(), 0.0);
        assert!(s.amplitudes()[1].norm() > 0.1);
    }

    #[test]
    fn test_bit_flip_trajectory() {
        let channel = NoiseChannel::BitFlip(1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut s = StateVector::new(1).unwrap();
        apply_channel(&mut s, &channel, 0, &mut rng).unwrap();
        assert_relative_eq!(s.probability(1).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_amplitude_damping_decays_excited_state() {
        let channel = NoiseChannel::AmplitudeDamping(1.0);
        let mut rng = StdRng::seed_from_u64(9);
        let mut s = StateVector::new(1).unwrap();
        let x = GateOp::new(FixedGate::X, &[QubitId::new(0)], &[]).unwrap();
        apply_unitary(&mut s, &x, &ParameterValues::new()).unwrap();
        apply_channel(&mut s, &channel, 0, &mut rng).unwrap();
        assert_relative_eq!(s.probability(0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_run_collects_by_key() {
        let mut keys = IndexMap::new();
        keys.insert("first".to_string(), 1);
        keys.insert("second".to_string(), 0);
        let ops = vec![
            GateOp::new(FixedGate::X, &[QubitId::new(1)], &[]).unwrap(),
            GateOp::measure(QubitId::new(1), Some("first")),
            GateOp::measure(QubitId::new(0), Some("second")),
        ];
        let mut s = StateVector::new(2).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let sample = run(&mut s, ops.iter(), &ParameterValues::new(), &keys, &mut rng).unwrap();
        assert_eq!(sample, vec![1, 0]);
    }
}
