/// Quantum Fourier Transform builders.
///
/// The transform is built from three reusable pieces that append to an
/// existing `GateSequence` on qubits `0..n`:
///
/// | Builder          | Emits                                                    |
/// |------------------|----------------------------------------------------------|
/// | `qft_rotations`  | for t = n-1 down to 0: `H(t)`, then `CP(π/2^(t-q), q, t)` for q < t |
/// | `swap_registers` | `SWAP(q, n-q-1)` for q < n/2                             |
/// | `qft_inverse`    | swaps, then for j: `CP(-π/2^(j-m), m, j)` for m < j, `H(j)` |
///
/// `qft` is `qft_rotations` followed by `swap_registers`; `qft_inverse` is
/// its exact adjoint.

use crate::circuit::GateSequence;
use std::f64::consts::PI;

/// One step of the rotation schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationStep {
    Hadamard { target: usize },
    Phase { angle: f64, control: usize, target: usize },
}

/// Ordered H / controlled-phase steps of the QFT rotation stage on `n`
/// qubits, highest target first. Empty for `n == 0`.
pub fn rotation_schedule(n: usize) -> Vec<RotationStep> {
    let mut steps = Vec::with_capacity(n * (n + 1) / 2);
    for target in (0..n).rev() {
        steps.push(RotationStep::Hadamard { target });
        for control in 0..target {
            steps.push(RotationStep::Phase {
                angle: PI / f64::powi(2.0, (target - control) as i32),
                control,
                target,
            });
        }
    }
    steps
}

/// Append the QFT rotation stage on qubits `0..n`.
pub fn qft_rotations(seq: &mut GateSequence, n: usize) -> &mut GateSequence {
    for step in rotation_schedule(n) {
        match step {
            RotationStep::Hadamard { target } => seq.h(target),
            RotationStep::Phase { angle, control, target } => seq.cphase(angle, control, target),
        };
    }
    seq
}

/// Reverse the qubit order of `0..n` with pairwise swaps.
pub fn swap_registers(seq: &mut GateSequence, n: usize) -> &mut GateSequence {
    for q in 0..n / 2 {
        seq.swap(q, n - q - 1);
    }
    seq
}

/// Append the forward QFT on qubits `0..n`.
pub fn qft(seq: &mut GateSequence, n: usize) -> &mut GateSequence {
    qft_rotations(seq, n);
    swap_registers(seq, n)
}

/// Append the inverse QFT on qubits `0..n`.
pub fn qft_inverse(seq: &mut GateSequence, n: usize) -> &mut GateSequence {
    swap_registers(seq, n);
    for j in 0..n {
        for m in 0..j {
            seq.cphase(-PI / f64::powi(2.0, (j - m) as i32), m, j);
        }
        seq.h(j);
    }
    seq
}

/// `n` qubits prepared in basis state `input`, transformed by `qft` and
/// measured qubit i into classical bit i. Bits of `input` at or above `n`
/// are ignored.
pub fn qft_circuit(n: usize, input: u64) -> GateSequence {
    let mut seq = GateSequence::new(n, n);
    for q in 0..n {
        if input.checked_shr(q as u32).is_some_and(|v| v & 1 == 1) {
            seq.x(q);
        }
    }
    qft(&mut seq, n);
    seq.measure_all();
    seq
}

/// Three-qubit QFT of |100⟩ (X on qubit 2). The measured distribution is
/// uniform over all eight outcomes.
pub fn qft_demo() -> GateSequence {
    qft_circuit(3, 0b100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{GateKind, GateOp};
    use crate::config::SimConfig;
    use crate::core::{Simulator, StateVector};

    fn angle_of(op: &GateOp) -> f64 {
        op.angle.unwrap_or(f64::NAN)
    }

    #[test]
    fn test_rotation_schedule_small_cases() {
        assert!(rotation_schedule(0).is_empty());
        assert_eq!(rotation_schedule(1), vec![RotationStep::Hadamard { target: 0 }]);
    }

    #[test]
    fn test_rotations_three_qubits_order() {
        let mut seq = GateSequence::new(3, 0);
        qft_rotations(&mut seq, 3);
        let ops = seq.ops();
        assert_eq!(ops.len(), 6);
        assert_eq!(ops[0], GateOp::h(2));
        assert_eq!(ops[1].targets, vec![0, 2]);
        assert!((angle_of(&ops[1]) - PI / 4.0).abs() < 1e-15);
        assert_eq!(ops[2].targets, vec![1, 2]);
        assert!((angle_of(&ops[2]) - PI / 2.0).abs() < 1e-15);
        assert_eq!(ops[3], GateOp::h(1));
        assert_eq!(ops[4].targets, vec![0, 1]);
        assert!((angle_of(&ops[4]) - PI / 2.0).abs() < 1e-15);
        assert_eq!(ops[5], GateOp::h(0));
    }

    #[test]
    fn test_swap_registers() {
        let mut seq = GateSequence::new(5, 0);
        swap_registers(&mut seq, 5);
        assert_eq!(seq.ops(), &[GateOp::swap(0, 4), GateOp::swap(1, 3)]);

        let mut single = GateSequence::new(1, 0);
        swap_registers(&mut single, 1);
        assert!(single.is_empty());
    }

    #[test]
    fn test_inverse_mirrors_forward() {
        let mut fwd = GateSequence::new(4, 0);
        qft(&mut fwd, 4);
        let mut inv = GateSequence::new(4, 0);
        qft_inverse(&mut inv, 4);

        assert_eq!(fwd.len(), inv.len());
        let fwd_kinds: Vec<GateKind> = fwd.ops().iter().map(|op| op.kind).collect();
        let inv_kinds: Vec<GateKind> = inv.ops().iter().rev().map(|op| op.kind).collect();
        assert_eq!(fwd_kinds, inv_kinds);

        // phases on the same target commute, so compare them as sorted sets
        let phases = |seq: &GateSequence, sign: f64| {
            let mut v: Vec<(usize, usize, i64)> = seq
                .ops()
                .iter()
                .filter(|op| op.kind == GateKind::CPhase)
                .map(|op| (op.targets[0], op.targets[1], (sign * angle_of(op) * 1e12).round() as i64))
                .collect();
            v.sort_unstable();
            v
        };
        assert_eq!(phases(&fwd, 1.0), phases(&inv, -1.0));
    }

    #[test]
    fn test_qft_circuit_prepares_input() {
        let seq = qft_demo();
        assert_eq!(seq.ops()[0], GateOp::x(2));
        assert_eq!(seq.num_qubits(), 3);
        assert_eq!(seq.measure_count(), 3);
        assert_eq!(seq.gate_count(), 1 + 6 + 1);
    }

    #[test]
    fn test_qft_circuit_ignores_high_input_bits() {
        let seq = qft_circuit(2, 0b1101);
        assert_eq!(seq.ops()[0], GateOp::x(0));
        assert_ne!(seq.ops()[1].kind, GateKind::X);
    }

    #[test]
    fn test_qft_of_basis_state_is_uniform() {
        let mut seq = GateSequence::new(3, 0);
        seq.x(2);
        qft(&mut seq, 3);
        let mut sim = Simulator::with_seed(3, 0, &SimConfig::default(), 0).unwrap();
        sim.run(&seq).unwrap();
        for p in sim.probabilities() {
            assert!((p - 0.125).abs() < 1e-12);
        }
    }

    #[test]
    fn test_round_trip_restores_basis_state() {
        let n = 4;
        for index in 0..(1usize << n) {
            let mut seq = GateSequence::new(n, 0);
            for q in 0..n {
                if index >> q & 1 == 1 {
                    seq.x(q);
                }
            }
            qft(&mut seq, n);
            qft_inverse(&mut seq, n);

            let mut sim = Simulator::with_seed(n, 0, &SimConfig::default(), 0).unwrap();
            sim.run(&seq).unwrap();
            let expected = StateVector::basis(n, index, n).unwrap();
            assert!(sim.state.max_distance(&expected) < 1e-9, "index {index}");
        }
    }
}
