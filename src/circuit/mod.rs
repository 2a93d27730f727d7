/// Circuit representation: gate IR, whole-sequence validation and static
/// analysis.
///
/// Pipeline: builder → `GateSequence` → `validate` → simulator
pub mod analysis;
pub mod ir;
pub mod validate;

pub use analysis::{analyze, CircuitAnalysis};
pub use ir::{ClassicalCondition, GateKind, GateOp, GateSequence};
pub use validate::validate;
