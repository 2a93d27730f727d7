/// Static circuit profiling.
///
/// Computes structural metrics **without** executing the circuit:
///
/// | Metric                 | Description                                               |
/// |------------------------|-----------------------------------------------------------|
/// | `gate_count`           | Non-measurement operations                                |
/// | `circuit_depth`        | Critical-path length assuming unbounded parallelism       |
/// | `multi_qubit_gate_count` | Ops touching two or more qubits (controls included)     |
/// | `gate_histogram`       | Per-mnemonic gate counts                                  |
/// | `qubit_utilization`    | Number of gates touching each qubit                       |
///
/// Gate counts matter when comparing equivalent constructions, e.g. repeated
/// versus combined controlled-phase kickback in phase estimation.
use super::ir::GateSequence;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct CircuitAnalysis {
    pub num_qubits: usize,
    pub num_clbits: usize,
    pub gate_count: usize,
    pub measure_count: usize,
    /// Minimum number of sequential time steps with unlimited qubit parallelism.
    /// Measurements occupy a time step on their qubit.
    pub circuit_depth: usize,
    pub multi_qubit_gate_count: usize,
    /// Ops guarded by a classical condition.
    pub conditioned_count: usize,
    pub gate_histogram: BTreeMap<String, usize>,
    /// Index = qubit; does **not** count measurements.
    pub qubit_utilization: Vec<usize>,
}

impl CircuitAnalysis {
    pub fn avg_gates_per_qubit(&self) -> f64 {
        if self.num_qubits == 0 { return 0.0; }
        self.gate_count as f64 / self.num_qubits as f64
    }

    /// Fraction of gates that are multi-qubit (entangling).
    pub fn entanglement_ratio(&self) -> f64 {
        if self.gate_count == 0 { return 0.0; }
        self.multi_qubit_gate_count as f64 / self.gate_count as f64
    }

    /// Count for one mnemonic, 0 when absent.
    pub fn count_of(&self, mnemonic: &str) -> usize {
        self.gate_histogram.get(mnemonic).copied().unwrap_or(0)
    }

    /// Human-readable profiling report.
    pub fn report(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("  Qubits         : {}\n", self.num_qubits));
        out.push_str(&format!("  Classical bits : {}\n", self.num_clbits));
        out.push_str(&format!("  Gate count     : {}\n", self.gate_count));
        out.push_str(&format!("  Circuit depth  : {}\n", self.circuit_depth));
        out.push_str(&format!(
            "  Multi-qubit    : {}  ({:.1}% entangling)\n",
            self.multi_qubit_gate_count,
            self.entanglement_ratio() * 100.0
        ));
        out.push_str(&format!("  Measurements   : {}\n", self.measure_count));
        if self.conditioned_count > 0 {
            out.push_str(&format!("  Conditioned    : {}\n", self.conditioned_count));
        }

        out.push_str("\n  Gate breakdown:\n");
        let mut hist: Vec<(&String, &usize)> = self.gate_histogram.iter().collect();
        hist.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (mnemonic, count) in hist {
            out.push_str(&format!("    {:8}  {count}\n", mnemonic));
        }

        out.push_str("\n  Qubit utilization (gate touches per qubit):\n");
        let max_uses = self.qubit_utilization.iter().copied().max().unwrap_or(1).max(1);
        for (q, &uses) in self.qubit_utilization.iter().enumerate() {
            let bar_len = (uses * 20 / max_uses).min(20);
            let bar = "█".repeat(bar_len);
            let pad = " ".repeat(20 - bar_len);
            out.push_str(&format!("    q{q:<2}  {bar}{pad}  {uses}\n"));
        }

        out
    }
}

/// Analyze a `GateSequence`. Runs in O(ops) and never simulates.
///
/// Out-of-range qubit indices are skipped rather than reported; run
/// `validate` first when the sequence is untrusted.
///
/// # Example
/// ```rust
/// use qalgo::circuit::{analyze, GateSequence};
///
/// let mut seq = GateSequence::new(2, 0);
/// seq.h(0).cnot(0, 1);
/// let a = analyze(&seq);
/// assert_eq!(a.circuit_depth, 2);
/// assert_eq!(a.multi_qubit_gate_count, 1);
/// ```
pub fn analyze(sequence: &GateSequence) -> CircuitAnalysis {
    let n = sequence.num_qubits();
    // qubit_time[q] = depth of the frontier on qubit q
    let mut qubit_time = vec![0usize; n];
    let mut gate_count = 0usize;
    let mut measure_count = 0usize;
    let mut multi_qubit_gate_count = 0usize;
    let mut conditioned_count = 0usize;
    let mut gate_histogram: BTreeMap<String, usize> = BTreeMap::new();
    let mut qubit_utilization = vec![0usize; n];

    for op in sequence.ops() {
        let qubits: Vec<usize> = op.qubits().into_iter().filter(|&q| q < n).collect();

        if !qubits.is_empty() {
            let start = qubits.iter().map(|&q| qubit_time[q]).max().unwrap_or(0);
            for &q in &qubits {
                qubit_time[q] = start + 1;
            }
        }

        if op.is_measurement() {
            measure_count += 1;
            continue;
        }

        gate_count += 1;
        *gate_histogram.entry(op.kind.mnemonic().to_string()).or_insert(0) += 1;
        for &q in &qubits {
            qubit_utilization[q] += 1;
        }
        if op.qubits().len() >= 2 {
            multi_qubit_gate_count += 1;
        }
        if op.condition.is_some() {
            conditioned_count += 1;
        }
    }

    CircuitAnalysis {
        num_qubits: n,
        num_clbits: sequence.num_clbits(),
        gate_count,
        measure_count,
        circuit_depth: qubit_time.iter().copied().max().unwrap_or(0),
        multi_qubit_gate_count,
        conditioned_count,
        gate_histogram,
        qubit_utilization,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::GateOp;

    fn seq(n: usize, build: impl FnOnce(&mut GateSequence)) -> GateSequence {
        let mut s = GateSequence::new(n, n);
        build(&mut s);
        s
    }

    // ── Depth computation ─────────────────────────────────────────────

    #[test]
    fn test_depth_empty_circuit() {
        assert_eq!(analyze(&GateSequence::new(1, 0)).circuit_depth, 0);
    }

    #[test]
    fn test_depth_sequential_on_same_qubit() {
        let a = analyze(&seq(1, |s| { s.h(0).x(0); }));
        assert_eq!(a.circuit_depth, 2);
    }

    #[test]
    fn test_depth_parallel_on_different_qubits() {
        let a = analyze(&seq(2, |s| { s.h(0).h(1); }));
        assert_eq!(a.circuit_depth, 1);
    }

    #[test]
    fn test_depth_ghz_three_qubits() {
        // H(0) at t=1; CNOT(0,1) at t=2; CNOT(0,2) at t=3
        let a = analyze(&seq(3, |s| { s.h(0).cnot(0, 1).cnot(0, 2); }));
        assert_eq!(a.circuit_depth, 3);
    }

    #[test]
    fn test_depth_includes_measurements() {
        let a = analyze(&seq(2, |s| { s.h(0).cnot(0, 1).measure_all(); }));
        assert_eq!(a.circuit_depth, 3);
        assert_eq!(a.measure_count, 2);
    }

    // ── Counts & histogram ────────────────────────────────────────────

    #[test]
    fn test_gate_histogram() {
        let a = analyze(&seq(2, |s| { s.h(0).h(1).cnot(0, 1).cphase(0.5, 0, 1); }));
        assert_eq!(a.count_of("H"), 2);
        assert_eq!(a.count_of("CNOT"), 1);
        assert_eq!(a.count_of("CP"), 1);
        assert_eq!(a.count_of("SWAP"), 0);
        assert_eq!(a.gate_histogram.len(), 3);
    }

    #[test]
    fn test_multi_qubit_count_includes_controlled_single_qubit_gates() {
        let a = analyze(&seq(3, |s| {
            s.h(0).cz(1, 2).swap(0, 2).push(GateOp::h(1).controlled_by([0]));
        }));
        assert_eq!(a.multi_qubit_gate_count, 3);
        assert_eq!(a.gate_count, 4);
        assert!((a.entanglement_ratio() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_qubit_utilization() {
        let a = analyze(&seq(3, |s| { s.h(0).cnot(0, 1).measure(2, 2); }));
        assert_eq!(a.qubit_utilization, vec![2, 1, 0]);
    }

    #[test]
    fn test_conditioned_count() {
        let a = analyze(&seq(2, |s| { s.measure(0, 0).x(1).c_if(0, true); }));
        assert_eq!(a.conditioned_count, 1);
        assert!(a.report().contains("Conditioned"));
    }

    #[test]
    fn test_avg_gates_per_qubit() {
        let a = analyze(&seq(4, |s| { s.h(0).h(1).h(2).h(3); }));
        assert!((a.avg_gates_per_qubit() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_lists_breakdown() {
        let report = analyze(&seq(2, |s| { s.h(0).cnot(0, 1); })).report();
        assert!(report.contains("Gate count     : 2"));
        assert!(report.contains("CNOT"));
        assert!(report.contains("q1"));
    }
}
