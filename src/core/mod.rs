/// Simulation engine: dense amplitude storage, gate kernels and the
/// single-shot simulator that drives them.
pub mod gates;
pub mod simulator;
pub mod state;

pub use gates::{mask_of, Matrix2x2};
pub use simulator::Simulator;
pub use state::StateVector;
