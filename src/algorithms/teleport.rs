/// Quantum teleportation of a classical basis message.
///
/// Qubit roles: 0 = message, 1 = Alice's half of the pair, 2 = Bob's half.
///
/// Two forms are provided:
///   - `teleportation` models the classical channel with quantum-controlled
///     corrections (CNOT from Alice's qubit, CZ from the message qubit)
///   - `teleportation_feed_forward` measures Alice's qubits mid-circuit and
///     applies Bob's corrections conditioned on the classical bits
use crate::circuit::GateSequence;

pub const MESSAGE: usize = 0;
pub const ALICE: usize = 1;
pub const BOB: usize = 2;

/// Shared pair, message preparation and Alice's Bell-basis rotation.
fn prepare(seq: &mut GateSequence, message: bool) {
    seq.h(ALICE).cnot(ALICE, BOB);
    if message {
        seq.x(MESSAGE);
    }
    seq.cnot(MESSAGE, ALICE).h(MESSAGE);
}

/// Three qubits, one classical bit. Bob's measurement lands in classical
/// bit 0 and always equals `message`.
pub fn teleportation(message: bool) -> GateSequence {
    let mut seq = GateSequence::new(3, 1);
    prepare(&mut seq, message);
    seq.cnot(ALICE, BOB).cz(MESSAGE, BOB).measure(BOB, 0);
    seq
}

/// Three qubits, three classical bits. Alice's outcomes land in bits 0 and
/// 1; Bob's corrected qubit is measured into bit 2, which always equals
/// `message`.
pub fn teleportation_feed_forward(message: bool) -> GateSequence {
    let mut seq = GateSequence::new(3, 3);
    prepare(&mut seq, message);
    seq.measure(MESSAGE, 0)
        .measure(ALICE, 1)
        .x(BOB)
        .c_if(1, true)
        .z(BOB)
        .c_if(0, true)
        .measure(BOB, 2);
    seq
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::GateKind;
    use crate::config::SimConfig;
    use crate::runtime::execute_seeded;

    #[test]
    fn test_message_flag_controls_x() {
        assert_eq!(teleportation(true).len(), teleportation(false).len() + 1);
        assert!(teleportation(true).ops().iter().any(|op| op.kind == GateKind::X));
    }

    #[test]
    fn test_quantum_corrections_deliver_message() {
        for message in [false, true] {
            for seed in 0..10 {
                let r = execute_seeded(&teleportation(message), &SimConfig::default(), seed)
                    .unwrap();
                assert_eq!(r.outcome(0), Some(message));
            }
        }
    }

    #[test]
    fn test_feed_forward_delivers_message() {
        for message in [false, true] {
            for seed in 0..16 {
                let r = execute_seeded(
                    &teleportation_feed_forward(message),
                    &SimConfig::default(),
                    seed,
                )
                .unwrap();
                assert_eq!(r.outcome(2), Some(message), "seed {seed}");
                assert_eq!(r.gate_count + r.skipped_count, 6 + message as usize);
            }
        }
    }

    #[test]
    fn test_feed_forward_conditions() {
        let seq = teleportation_feed_forward(false);
        let conditioned: Vec<_> = seq.ops().iter().filter_map(|op| op.condition).collect();
        assert_eq!(conditioned.len(), 2);
        assert_eq!(conditioned[0].clbit, 1);
        assert_eq!(conditioned[1].clbit, 0);
    }
}
