/// Execution runtime.
///
/// Sits between the circuit builders and the caller:
///   - `executor` runs one shot with classical feed-forward
///   - `sampler` repeats shots under per-shot seeds and aggregates them
///   - `histogram` is the plain-data outcome table the sampler returns
///
/// Flow:
///   GateSequence → validate → Simulator (per shot) → OutcomeHistogram
pub mod executor;
pub mod histogram;
pub mod sampler;

pub use executor::{
    execute, execute_on, execute_seeded, ExecutionResult, ExecutionTrace, MeasurementRecord,
};
pub use histogram::{bits_to_key, OutcomeHistogram};
pub use sampler::{sample, SampleResult, Sampler};
