/// Single-shot circuit executor.
///
/// Runs a `GateSequence` from start to end on one `Simulator`:
///
///   - The whole sequence is validated before any amplitude is touched
///   - Gates and measurements apply in sequence order
///   - Ops with a classical condition consult the register at the moment
///     they are reached, so earlier measurements steer later corrections
///   - A probability snapshot is taken just before the first measurement
///
/// Classical register:
///   One slot per classical bit, initialised to 0, written by MEASURE.
use super::histogram::bits_to_key;
use crate::circuit::{validate, GateSequence};
use crate::config::SimConfig;
use crate::core::{Simulator, StateVector};
use crate::error::{Result, SimError};
use tracing::debug;

// ── Result types ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub qubit: usize,
    pub clbit: usize,
    pub outcome: bool,
    /// Index of the MEASURE op in the sequence.
    pub step: usize,
}

/// What happened during a run, independent of the final state.
#[derive(Debug, Default)]
pub struct ExecutionTrace {
    /// Measurement outcomes in execution order.
    pub measurements: Vec<MeasurementRecord>,
    /// Probability snapshot taken before the first measurement (if any).
    pub pre_measurement_probs: Option<Vec<f64>>,
    /// Unitary ops actually applied.
    pub gate_count: usize,
    /// Conditioned ops whose condition did not hold.
    pub skipped_count: usize,
    /// Recoverable drift diagnostics.
    pub diagnostics: Vec<SimError>,
}

#[derive(Debug)]
pub struct ExecutionResult {
    pub num_qubits: usize,
    pub state: StateVector,
    pub classical_bits: Vec<bool>,
    pub measurements: Vec<MeasurementRecord>,
    pub pre_measurement_probs: Option<Vec<f64>>,
    pub gate_count: usize,
    pub skipped_count: usize,
    pub diagnostics: Vec<SimError>,
}

impl ExecutionResult {
    /// Last outcome written into classical bit `clbit`, `None` if never measured.
    pub fn outcome(&self, clbit: usize) -> Option<bool> {
        self.measurements.iter().rfind(|m| m.clbit == clbit).map(|m| m.outcome)
    }

    /// Classical register as a bitstring, classical bit 0 rightmost.
    pub fn bitstring(&self) -> String {
        bits_to_key(&self.classical_bits)
    }

    pub fn final_probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    /// Basis states with probability above `threshold`, as
    /// `(ket_label, probability)` pairs sorted by index.
    pub fn significant_states(&self, probs: &[f64], threshold: f64) -> Vec<(String, f64)> {
        probs
            .iter()
            .enumerate()
            .filter(|(_, &p)| p > threshold)
            .map(|(i, &p)| (self.state.basis_label(i), p))
            .collect()
    }
}

// ── Execution ─────────────────────────────────────────────────────────────

/// Run `sequence` on an existing simulator.
///
/// Validation happens up front: on error the simulator is left exactly as
/// it was handed in.
pub fn execute_on(sim: &mut Simulator, sequence: &GateSequence) -> Result<ExecutionTrace> {
    validate(sequence)?;
    run_validated(sim, sequence)
}

/// Shot loop body shared with the sampler, which validates once per run
/// rather than once per shot.
pub(crate) fn run_validated(sim: &mut Simulator, sequence: &GateSequence) -> Result<ExecutionTrace> {
    if sim.num_qubits() != sequence.num_qubits() || sim.num_clbits() != sequence.num_clbits() {
        return Err(SimError::invalid_circuit(format!(
            "circuit needs {} qubit(s) / {} classical bit(s), simulator has {} / {}",
            sequence.num_qubits(),
            sequence.num_clbits(),
            sim.num_qubits(),
            sim.num_clbits()
        )));
    }

    let mut trace = ExecutionTrace::default();

    for (step, op) in sequence.ops().iter().enumerate() {
        if let Some(cond) = &op.condition {
            if !sim.condition_holds(cond) {
                trace.skipped_count += 1;
                continue;
            }
        }

        if op.is_measurement() && trace.pre_measurement_probs.is_none() {
            trace.pre_measurement_probs = Some(sim.probabilities());
        }

        match sim.apply_unchecked(step, op)? {
            Some(outcome) => trace.measurements.push(MeasurementRecord {
                qubit: op.targets[0],
                clbit: op.classical_target.unwrap_or_default(),
                outcome,
                step,
            }),
            None => trace.gate_count += 1,
        }
    }

    trace.diagnostics = sim.take_diagnostics();
    debug!(
        gates = trace.gate_count,
        measurements = trace.measurements.len(),
        skipped = trace.skipped_count,
        "shot complete"
    );
    Ok(trace)
}

/// Run `sequence` once on a fresh simulator seeded from `config`.
pub fn execute(sequence: &GateSequence, config: &SimConfig) -> Result<ExecutionResult> {
    // validate before allocating 2^n amplitudes
    validate(sequence)?;
    let sim = Simulator::new(sequence.num_qubits(), sequence.num_clbits(), config)?;
    finish(sim, sequence)
}

/// Run `sequence` once with an explicit seed.
pub fn execute_seeded(
    sequence: &GateSequence,
    config: &SimConfig,
    seed: u64,
) -> Result<ExecutionResult> {
    validate(sequence)?;
    let sim = Simulator::with_seed(sequence.num_qubits(), sequence.num_clbits(), config, seed)?;
    finish(sim, sequence)
}

fn finish(mut sim: Simulator, sequence: &GateSequence) -> Result<ExecutionResult> {
    let trace = execute_on(&mut sim, sequence)?;
    let (state, classical_bits) = sim.into_parts();
    Ok(ExecutionResult {
        num_qubits: sequence.num_qubits(),
        state,
        classical_bits,
        measurements: trace.measurements,
        pre_measurement_probs: trace.pre_measurement_probs,
        gate_count: trace.gate_count,
        skipped_count: trace.skipped_count,
        diagnostics: trace.diagnostics,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────
