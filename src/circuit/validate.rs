/// Whole-sequence validation.
///
/// A simulator validates the complete sequence before it touches a single
/// amplitude, so a malformed op late in the circuit never leaves a
/// half-evolved state behind.
use super::ir::{GateKind, GateOp, GateSequence};
use crate::error::{Result, SimError};

/// Check every op of `sequence`; the first violation is returned.
pub fn validate(sequence: &GateSequence) -> Result<()> {
    if sequence.num_qubits() == 0 {
        return Err(SimError::invalid_circuit("circuit must declare at least one qubit"));
    }
    for (index, op) in sequence.ops().iter().enumerate() {
        validate_op(op, index, sequence.num_qubits(), sequence.num_clbits())?;
    }
    Ok(())
}

/// Check a single op against a register of `num_qubits` / `num_clbits`.
pub(crate) fn validate_op(
    op: &GateOp,
    index: usize,
    num_qubits: usize,
    num_clbits: usize,
) -> Result<()> {
    let arity = op.kind.arity();
    if op.targets.len() != arity {
        return Err(SimError::invalid_op(
            index,
            format!("{} expects {arity} target(s), got {}", op.kind, op.targets.len()),
        ));
    }

    let qubits = op.qubits();
    for &q in &qubits {
        if q >= num_qubits {
            return Err(SimError::invalid_op(
                index,
                format!("qubit {q} out of range for {num_qubits}-qubit circuit"),
            ));
        }
    }
    for (i, q) in qubits.iter().enumerate() {
        if qubits[..i].contains(q) {
            return Err(SimError::invalid_op(
                index,
                format!("{} uses qubit {q} more than once", op.kind),
            ));
        }
    }

    match (op.kind.requires_angle(), op.angle) {
        (true, None) => {
            return Err(SimError::invalid_op(index, format!("{} requires an angle", op.kind)));
        }
        (true, Some(theta)) if !theta.is_finite() => {
            return Err(SimError::invalid_op(index, format!("angle {theta} is not finite")));
        }
        (false, Some(_)) => {
            return Err(SimError::invalid_op(index, format!("{} takes no angle", op.kind)));
        }
        _ => {}
    }

    match (op.kind, op.classical_target) {
        (GateKind::Measure, None) => {
            return Err(SimError::invalid_op(index, "MEASURE requires a classical target"));
        }
        (GateKind::Measure, Some(c)) if c >= num_clbits => {
            return Err(SimError::invalid_op(
                index,
                format!("classical bit {c} out of range for {num_clbits} classical bit(s)"),
            ));
        }
        (GateKind::Measure, Some(_)) => {
            if !op.controls.is_empty() {
                return Err(SimError::invalid_op(index, "MEASURE cannot be controlled"));
            }
            if op.condition.is_some() {
                return Err(SimError::invalid_op(index, "MEASURE cannot be conditioned"));
            }
        }
        (kind, Some(_)) => {
            return Err(SimError::invalid_op(
                index,
                format!("{kind} takes no classical target"),
            ));
        }
        (_, None) => {}
    }

    if let Some(cond) = op.condition {
        if cond.clbit >= num_clbits {
            return Err(SimError::invalid_op(
                index,
                format!(
                    "condition reads classical bit {} but circuit has {num_clbits}",
                    cond.clbit
                ),
            ));
        }
    }

    Ok(())
}
