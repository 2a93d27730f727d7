/// Quantum Phase Estimation for a phase gate.
///
/// Estimates θ in U|1⟩ = e^{2πiθ}|1⟩ for U = P(angle), θ = angle / 2π.
///
/// Register layout:
///   - qubits `0..n_counting`: counting register, read out into clbits `0..n_counting`
///   - qubit `n_counting`: eigenstate qubit, prepared in |1⟩
///
/// Counting qubit j picks up the kickback of U^(2^j). The outcome integer k
/// read from the counting register estimates θ ≈ k / 2^n_counting.
use super::qft::qft_inverse;
use crate::circuit::GateSequence;
use std::f64::consts::PI;

/// How controlled-U^(2^j) is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kickback {
    /// 2^j copies of CP(angle): 2^n - 1 phase gates in total.
    #[default]
    Repeated,
    /// A single CP(angle · 2^j) per counting qubit.
    Combined,
}

/// Phase estimation circuit with `n_counting + 1` qubits and `n_counting`
/// classical bits.
pub fn phase_estimation(n_counting: usize, angle: f64, kickback: Kickback) -> GateSequence {
    let eigenstate = n_counting;
    let mut seq = GateSequence::new(n_counting + 1, n_counting);

    for q in 0..n_counting {
        seq.h(q);
    }
    seq.x(eigenstate);

    for j in 0..n_counting {
        let power = 1u64 << j;
        match kickback {
            Kickback::Repeated => {
                for _ in 0..power {
                    seq.cphase(angle, j, eigenstate);
                }
            }
            Kickback::Combined => {
                seq.cphase(angle * power as f64, j, eigenstate);
            }
        }
    }

    qft_inverse(&mut seq, n_counting);
    for q in 0..n_counting {
        seq.measure(q, q);
    }
    seq
}

/// Three counting qubits estimating the T gate (angle π/4, θ = 1/8).
/// Every shot reads "001".
pub fn qpe() -> GateSequence {
    phase_estimation(3, PI / 4.0, Kickback::Repeated)
}

/// Phase encoded by counting-register outcome `outcome`.
pub fn estimated_phase(outcome: u64, n_counting: usize) -> f64 {
    outcome as f64 / f64::powi(2.0, n_counting as i32)
}
