/// Circuit builders for the canonical algorithms.
///
/// Every builder is deterministic and returns (or appends to) a plain
/// `GateSequence`; nothing here touches a simulator.

pub mod bell;
pub mod qft;
pub mod qpe;
pub mod teleport;

pub use bell::bell_pair;
pub use qft::{
    qft, qft_circuit, qft_demo, qft_inverse, qft_rotations, rotation_schedule, swap_registers,
    RotationStep,
};
pub use qpe::{estimated_phase, phase_estimation, qpe, Kickback};
pub use teleport::{teleportation, teleportation_feed_forward};
