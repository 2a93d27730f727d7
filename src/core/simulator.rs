/// Statevector simulator.
///
/// `Simulator` owns one register's worth of state for a single shot:
///   - the amplitude vector, starting at |0...0⟩
///   - the classical register written by measurements (all bits start at 0)
///   - a seeded RNG consumed by measurement draws
///   - drift diagnostics collected after unitary steps
///
/// It applies one `GateOp` at a time, checking each op against the
/// register. Whole-sequence validation and sequencing live in
/// `runtime::executor`.
use super::gates::{
    self, apply_controlled_x, apply_phase, apply_single_qubit_gate, apply_swap, mask_of,
};
use super::state::StateVector;
use crate::circuit::validate::validate_op;
use crate::circuit::{ClassicalCondition, GateKind, GateOp, GateSequence};
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::runtime::ExecutionTrace;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use tracing::warn;

pub struct Simulator {
    pub state: StateVector,
    /// Classical register, indexed by classical bit.
    pub classical: Vec<bool>,
    rng: StdRng,
    drift_tolerance: f64,
    diagnostics: Vec<SimError>,
}

impl Simulator {
    /// Fresh simulator seeded from `config.seed`, or OS entropy when unset.
    pub fn new(num_qubits: usize, num_clbits: usize, config: &SimConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(num_qubits, num_clbits, config, rng)
    }

    /// Fresh simulator with an explicit seed, ignoring `config.seed`.
    pub fn with_seed(
        num_qubits: usize,
        num_clbits: usize,
        config: &SimConfig,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(num_qubits, num_clbits, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        num_qubits: usize,
        num_clbits: usize,
        config: &SimConfig,
        rng: StdRng,
    ) -> Result<Self> {
        Ok(Self {
            state: StateVector::new(num_qubits, config.max_qubits)?,
            classical: vec![false; num_clbits],
            rng,
            drift_tolerance: config.drift_tolerance,
            diagnostics: Vec::new(),
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.classical.len()
    }

    /// Apply one op. Unitary ops return `None`; a measurement returns its
    /// outcome after collapsing the state and writing the classical bit.
    ///
    /// The op is checked against this register first, so a bad index is an
    /// `InvalidCircuit` error and the state is left untouched. An op whose
    /// classical condition does not hold is skipped and returns `None`.
    pub fn apply(&mut self, op_index: usize, op: &GateOp) -> Result<Option<bool>> {
        validate_op(op, op_index, self.num_qubits(), self.num_clbits())?;
        if let Some(cond) = &op.condition {
            if !self.condition_holds(cond) {
                return Ok(None);
            }
        }
        self.apply_unchecked(op_index, op)
    }

    /// `apply` without the per-op check or the condition. The caller has
    /// validated the whole sequence and evaluated the condition itself.
    pub(crate) fn apply_unchecked(&mut self, op_index: usize, op: &GateOp) -> Result<Option<bool>> {
        let controls = mask_of(&op.effective_controls());
        let state = &mut self.state;
        match op.kind {
            GateKind::Measure => {
                let clbit = op.classical_target.ok_or_else(|| {
                    SimError::invalid_op(op_index, "MEASURE requires a classical target")
                })?;
                return self.measure(op_index, op.targets[0], clbit).map(Some);
            }
            GateKind::H => apply_single_qubit_gate(state, &gates::hadamard(), op.targets[0], controls),
            GateKind::X => apply_controlled_x(state, op.targets[0], controls),
            GateKind::Z => apply_phase(state, controls | (1 << op.targets[0]), Complex64::new(-1.0, 0.0)),
            GateKind::Cnot => apply_controlled_x(state, op.targets[1], controls),
            GateKind::Cz => apply_phase(state, controls | (1 << op.targets[1]), Complex64::new(-1.0, 0.0)),
            GateKind::CPhase => {
                let theta = op
                    .angle
                    .ok_or_else(|| SimError::invalid_op(op_index, "CP requires an angle"))?;
                apply_phase(state, controls | (1 << op.targets[1]), Complex64::from_polar(1.0, theta));
            }
            GateKind::Swap => apply_swap(state, op.targets[0], op.targets[1], controls),
        }

        self.check_normalization(op_index)?;
        Ok(None)
    }

    /// Validate and run a whole sequence on this simulator, leaving the
    /// final state and classical register in place.
    pub fn run(&mut self, sequence: &GateSequence) -> Result<ExecutionTrace> {
        crate::runtime::execute_on(self, sequence)
    }

    /// Measure `qubit` into classical bit `clbit` with one uniform draw.
    fn measure(&mut self, op_index: usize, qubit: usize, clbit: usize) -> Result<bool> {
        let r: f64 = self.rng.gen();
        let outcome = self
            .state
            .collapse(qubit, r)
            .map_err(|total| SimError::NumericalDrift { op_index, norm: total.sqrt() })?;
        self.classical[clbit] = outcome;
        Ok(outcome)
    }

    /// True when the classical register satisfies `condition`. A bit outside
    /// the register never satisfies it.
    pub(crate) fn condition_holds(&self, condition: &ClassicalCondition) -> bool {
        self.classical
            .get(condition.clbit)
            .is_some_and(|&bit| bit == condition.value)
    }

    /// Compare the norm against the drift tolerance; renormalise and record a
    /// diagnostic if it strayed. Fatal only for a zero-norm state.
    pub fn check_normalization(&mut self, op_index: usize) -> Result<()> {
        let total = self.state.total_probability();
        if (total - 1.0).abs() <= self.drift_tolerance {
            return Ok(());
        }
        let norm = total.sqrt();
        warn!(op_index, norm, "state norm drifted; renormalizing");
        self.state
            .normalize()
            .map_err(|_| SimError::NumericalDrift { op_index, norm })?;
        self.diagnostics.push(SimError::NumericalDrift { op_index, norm });
        Ok(())
    }

    /// Born-rule probabilities of every basis state, without collapse.
    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    pub fn qubit_probability_one(&self, qubit: usize) -> f64 {
        self.state.marginal_probability_one(qubit)
    }

    pub fn diagnostics(&self) -> &[SimError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<SimError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Back to |0...0⟩ with a cleared classical register. The RNG keeps its
    /// position so consecutive shots stay independent.
    pub fn reset(&mut self) {
        self.state.reset();
        self.classical.iter_mut().for_each(|b| *b = false);
        self.diagnostics.clear();
    }

    /// Consume the simulator, keeping the final state and classical bits.
    pub fn into_parts(self) -> (StateVector, Vec<bool>) {
        (self.state, self.classical)
    }
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)?;
        write!(f, "Classical: [")?;
        for (i, bit) in self.classical.iter().enumerate() {
            write!(f, "c{}={}", i, *bit as u8)?;
            if i + 1 < self.classical.len() {
                write!(f, ", ")?;
            }
        }
        writeln!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sim(n: usize, c: usize) -> Simulator {
        Simulator::with_seed(n, c, &SimConfig::default(), 42).unwrap()
    }

    #[test]
    fn test_x_then_measure_is_one() {
        let mut s = sim(1, 1);
        s.apply(0, &GateOp::x(0)).unwrap();
        assert_eq!(s.apply(1, &GateOp::measure(0, 0)).unwrap(), Some(true));
        assert!(s.classical[0]);
    }

    #[test]
    fn test_unitary_returns_none() {
        let mut s = sim(1, 0);
        assert_eq!(s.apply(0, &GateOp::h(0)).unwrap(), None);
        assert!((s.qubit_probability_one(0) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_bell_probabilities() {
        let mut s = sim(2, 0);
        s.apply(0, &GateOp::h(0)).unwrap();
        s.apply(1, &GateOp::cnot(0, 1)).unwrap();
        let probs = s.probabilities();
        assert!((probs[0] - 0.5).abs() < 1e-10);
        assert!(probs[1].abs() < 1e-10);
        assert!(probs[2].abs() < 1e-10);
        assert!((probs[3] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_bell_measurements_agree() {
        for seed in 0..50 {
            let mut s = Simulator::with_seed(2, 2, &SimConfig::default(), seed).unwrap();
            s.apply(0, &GateOp::h(0)).unwrap();
            s.apply(1, &GateOp::cnot(0, 1)).unwrap();
            let a = s.apply(2, &GateOp::measure(0, 0)).unwrap();
            let b = s.apply(3, &GateOp::measure(1, 1)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_cz_and_z_phases() {
        let mut s = sim(2, 0);
        s.apply(0, &GateOp::x(0)).unwrap();
        s.apply(1, &GateOp::x(1)).unwrap();
        s.apply(2, &GateOp::cz(0, 1)).unwrap();
        assert!((s.state.amplitudes[3].re + 1.0).abs() < 1e-12);
        s.apply(3, &GateOp::z(0)).unwrap();
        assert!((s.state.amplitudes[3].re - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cphase_applies_angle() {
        let mut s = sim(2, 0);
        s.apply(0, &GateOp::x(0)).unwrap();
        s.apply(1, &GateOp::x(1)).unwrap();
        s.apply(2, &GateOp::cphase(PI / 2.0, 0, 1)).unwrap();
        assert!(s.state.amplitudes[3].re.abs() < 1e-12);
        assert!((s.state.amplitudes[3].im - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_extra_controls_gate_the_op() {
        // CNOT(0 -> 1) with extra control 2 clear: nothing happens
        let mut s = sim(3, 0);
        s.apply(0, &GateOp::x(0)).unwrap();
        s.apply(1, &GateOp::cnot(0, 1).controlled_by([2])).unwrap();
        assert!((s.state.probability(0b001) - 1.0).abs() < 1e-12);

        s.apply(2, &GateOp::x(2)).unwrap();
        s.apply(3, &GateOp::cnot(0, 1).controlled_by([2])).unwrap();
        assert!((s.state.probability(0b111) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mid_circuit_collapse_affects_later_gates() {
        // measure |+⟩, then H: the result is no longer deterministic |0⟩
        let mut s = sim(1, 1);
        s.apply(0, &GateOp::h(0)).unwrap();
        s.apply(1, &GateOp::measure(0, 0)).unwrap();
        s.apply(2, &GateOp::h(0)).unwrap();
        assert!((s.qubit_probability_one(0) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_condition_holds_reads_register() {
        let mut s = sim(1, 2);
        let cond = ClassicalCondition { clbit: 1, value: true };
        assert!(!s.condition_holds(&cond));
        s.classical[1] = true;
        assert!(s.condition_holds(&cond));
    }

    #[test]
    fn test_out_of_range_target_rejected() {
        let mut s = sim(1, 1);
        let err = s.apply(0, &GateOp::x(5)).unwrap_err();
        assert!(matches!(err, SimError::InvalidCircuit { op_index: Some(0), .. }));
        assert!((s.state.probability(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_clbit_rejected() {
        let mut s = sim(1, 1);
        let err = s.apply(4, &GateOp::measure(0, 3)).unwrap_err();
        assert!(matches!(err, SimError::InvalidCircuit { op_index: Some(4), .. }));
        assert_eq!(s.classical, vec![false]);
    }

    #[test]
    fn test_condition_out_of_range_rejected() {
        let mut s = sim(1, 1);
        let op = GateOp::x(0).conditioned_on(2, true);
        assert!(matches!(s.apply(0, &op), Err(SimError::InvalidCircuit { .. })));
    }

    #[test]
    fn test_apply_honours_condition() {
        let mut s = sim(1, 1);
        let op = GateOp::x(0).conditioned_on(0, true);
        assert_eq!(s.apply(0, &op).unwrap(), None);
        assert!(s.qubit_probability_one(0) < 1e-12);

        s.classical[0] = true;
        s.apply(1, &op).unwrap();
        assert!((s.qubit_probability_one(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_drift_is_recorded_and_repaired() {
        let mut s = sim(1, 0);
        s.state.amplitudes[0] = Complex64::new(1.01, 0.0);
        s.check_normalization(7).unwrap();
        assert!((s.state.total_probability() - 1.0).abs() < 1e-12);
        assert_eq!(s.diagnostics().len(), 1);
        assert!(matches!(s.diagnostics()[0], SimError::NumericalDrift { op_index: 7, .. }));
    }

    #[test]
    fn test_drift_within_tolerance_is_silent() {
        let mut s = sim(1, 0);
        s.state.amplitudes[0] = Complex64::new(1.0 + 1e-9, 0.0);
        s.check_normalization(0).unwrap();
        assert!(s.diagnostics().is_empty());
    }

    #[test]
    fn test_zero_norm_is_fatal() {
        let mut s = sim(1, 0);
        s.state.amplitudes[0] = Complex64::new(0.0, 0.0);
        assert!(matches!(
            s.check_normalization(3),
            Err(SimError::NumericalDrift { op_index: 3, .. })
        ));
    }

    #[test]
    fn test_seed_reproducibility() {
        let run = |seed| {
            let mut s = Simulator::with_seed(3, 3, &SimConfig::default(), seed).unwrap();
            for q in 0..3 {
                s.apply(q, &GateOp::h(q)).unwrap();
            }
            for q in 0..3 {
                s.apply(3 + q, &GateOp::measure(q, q)).unwrap();
            }
            s.classical
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_reset_clears_register() {
        let mut s = sim(1, 1);
        s.apply(0, &GateOp::x(0)).unwrap();
        s.apply(1, &GateOp::measure(0, 0)).unwrap();
        s.reset();
        assert!(!s.classical[0]);
        assert!((s.state.probability(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_run_whole_sequence() {
        let mut seq = GateSequence::new(2, 2);
        seq.x(0).cnot(0, 1).measure_all();
        let mut s = sim(2, 2);
        let trace = s.run(&seq).unwrap();
        assert_eq!(trace.gate_count, 2);
        assert_eq!(s.classical, vec![true, true]);
    }

    #[test]
    fn test_resource_limit_from_config() {
        let config = SimConfig::default().with_max_qubits(4);
        assert!(matches!(
            Simulator::new(5, 0, &config),
            Err(SimError::ResourceLimit { .. })
        ));
    }
}
