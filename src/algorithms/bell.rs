/// Bell pair |Φ+⟩ = (|00⟩ + |11⟩) / √2.
use crate::circuit::GateSequence;

/// Two qubits, two classical bits: `H(0); CNOT(0,1)` then measure each
/// qubit into the matching classical bit. Ideal counts split evenly
/// between "00" and "11".
pub fn bell_pair() -> GateSequence {
    let mut seq = GateSequence::new(2, 2);
    seq.h(0).cnot(0, 1).measure(0, 0).measure(1, 1);
    seq
}
