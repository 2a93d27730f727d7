/// Gate matrices and their application to a state vector.
///
/// Single-qubit gates are 2×2 complex matrices. Every kernel takes a
/// `control_mask`: the gate only acts on basis states whose bits under the
/// mask are all 1 (mask 0 = unconditional). Controlled gates are therefore
/// the same kernels with a non-empty mask.
///
/// Application strategy: walk the 2^n basis states, pair up indices that
/// differ only in the target bit, apply the 2×2 matrix to each pair, O(2^n).
use super::state::StateVector;
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

/// Row-major: matrix[row][col]
pub type Matrix2x2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

// ── Standard Gate Matrices ─────────────────────────────────────────────────

/// H = (1/√2) * [[1, 1], [1, -1]]
pub fn hadamard() -> Matrix2x2 {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

/// X = [[0, 1], [1, 0]]
pub fn pauli_x() -> Matrix2x2 {
    [[ZERO, ONE], [ONE, ZERO]]
}

/// Z = [[1, 0], [0, -1]]
pub fn pauli_z() -> Matrix2x2 {
    [[ONE, ZERO], [ZERO, -ONE]]
}

/// P(θ) = [[1, 0], [0, e^(iθ)]]
pub fn phase_gate(theta: f64) -> Matrix2x2 {
    [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]]
}

/// Bit mask with one bit per qubit index.
#[inline]
pub fn mask_of(qubits: &[usize]) -> usize {
    qubits.iter().fold(0, |m, &q| m | (1 << q))
}

// ── Gate Application ───────────────────────────────────────────────────────

/// Apply `gate` to `target`, restricted to basis states matching `control_mask`.
pub fn apply_single_qubit_gate(
    state: &mut StateVector,
    gate: &Matrix2x2,
    target: usize,
    control_mask: usize,
) {
    debug_assert!(target < state.num_qubits, "target qubit out of range");
    debug_assert_eq!(control_mask & (1 << target), 0, "target is also a control");

    let target_mask = 1 << target;
    for i0 in 0..state.dim() {
        if i0 & target_mask != 0 || i0 & control_mask != control_mask {
            continue;
        }
        let i1 = i0 | target_mask;
        let a0 = state.amplitudes[i0];
        let a1 = state.amplitudes[i1];
        state.amplitudes[i0] = gate[0][0] * a0 + gate[0][1] * a1;
        state.amplitudes[i1] = gate[1][0] * a0 + gate[1][1] * a1;
    }
}

/// Controlled-NOT: flips `target` where all bits under `control_mask` are 1.
/// A permutation, so amplitudes are swapped rather than multiplied.
pub fn apply_controlled_x(state: &mut StateVector, target: usize, control_mask: usize) {
    debug_assert_eq!(control_mask & (1 << target), 0, "target is also a control");

    let target_mask = 1 << target;
    for i in 0..state.dim() {
        if i & control_mask == control_mask && i & target_mask == 0 {
            state.amplitudes.swap(i, i | target_mask);
        }
    }
}

/// Diagonal phase: multiplies every amplitude whose bits under `mask` are all
/// 1 by `phase`. CZ is `phase = -1` over {control, target}; CPHASE is
/// `phase = e^(iθ)` over the same pair. A plain Z is the single-bit case.
pub fn apply_phase(state: &mut StateVector, mask: usize, phase: Complex64) {
    for (i, amp) in state.amplitudes.iter_mut().enumerate() {
        if i & mask == mask {
            *amp *= phase;
        }
    }
}

/// SWAP of `qubit_a` and `qubit_b`, restricted to `control_mask`.
pub fn apply_swap(state: &mut StateVector, qubit_a: usize, qubit_b: usize, control_mask: usize) {
    debug_assert_ne!(qubit_a, qubit_b, "SWAP requires two different qubits");

    let mask_a = 1 << qubit_a;
    let mask_b = 1 << qubit_b;
    for i in 0..state.dim() {
        // visit each differing pair once: a set, b clear
        if i & mask_a != 0 && i & mask_b == 0 && i & control_mask == control_mask {
            let j = (i & !mask_a) | mask_b;
            state.amplitudes.swap(i, j);
        }
    }
}
