/// Circuit intermediate representation.
///
/// A circuit is a flat, ordered sequence of `GateOp`s wrapped in a
/// `GateSequence` that fixes the qubit and classical-bit counts. Insertion
/// order is execution order.
///
/// Design principles:
///   - One `GateKind` per instruction, no string dispatch at runtime
///   - Angles stored as f64 radians
///   - Sequences are plain data; validation happens when a simulator takes them
///   - Display output is one instruction per line
use std::fmt;

// ── GateKind ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    H,
    X,
    Z,
    Cnot,
    Cz,
    CPhase,
    Swap,
    Measure,
}

impl GateKind {
    /// Mnemonic used in listings and analysis histograms.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::H       => "H",
            Self::X       => "X",
            Self::Z       => "Z",
            Self::Cnot    => "CNOT",
            Self::Cz      => "CZ",
            Self::CPhase  => "CP",
            Self::Swap    => "SWAP",
            Self::Measure => "MEASURE",
        }
    }

    /// Number of entries `targets` must hold.
    pub fn arity(self) -> usize {
        match self {
            Self::H | Self::X | Self::Z | Self::Measure => 1,
            Self::Cnot | Self::Cz | Self::CPhase | Self::Swap => 2,
        }
    }

    /// True for kinds whose first target is an intrinsic control qubit.
    pub fn has_intrinsic_control(self) -> bool {
        matches!(self, Self::Cnot | Self::Cz | Self::CPhase)
    }

    pub fn requires_angle(self) -> bool {
        self == Self::CPhase
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

// ── GateOp ────────────────────────────────────────────────────────────────

/// Classical feed-forward guard: apply the op only if `clbit` holds `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassicalCondition {
    pub clbit: usize,
    pub value: bool,
}

/// One circuit instruction.
///
/// For CNOT, CZ and CPHASE `targets` is `[control, target]`. `controls`
/// holds any additional control qubits on top of that.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOp {
    pub kind: GateKind,
    pub targets: Vec<usize>,
    pub controls: Vec<usize>,
    pub angle: Option<f64>,
    pub classical_target: Option<usize>,
    pub condition: Option<ClassicalCondition>,
}

impl GateOp {
    fn new(kind: GateKind, targets: Vec<usize>) -> Self {
        Self {
            kind,
            targets,
            controls: Vec::new(),
            angle: None,
            classical_target: None,
            condition: None,
        }
    }

    pub fn h(qubit: usize) -> Self { Self::new(GateKind::H, vec![qubit]) }
    pub fn x(qubit: usize) -> Self { Self::new(GateKind::X, vec![qubit]) }
    pub fn z(qubit: usize) -> Self { Self::new(GateKind::Z, vec![qubit]) }

    pub fn cnot(control: usize, target: usize) -> Self {
        Self::new(GateKind::Cnot, vec![control, target])
    }

    pub fn cz(control: usize, target: usize) -> Self {
        Self::new(GateKind::Cz, vec![control, target])
    }

    pub fn cphase(angle: f64, control: usize, target: usize) -> Self {
        Self { angle: Some(angle), ..Self::new(GateKind::CPhase, vec![control, target]) }
    }

    pub fn swap(qubit_a: usize, qubit_b: usize) -> Self {
        Self::new(GateKind::Swap, vec![qubit_a, qubit_b])
    }

    pub fn measure(qubit: usize, clbit: usize) -> Self {
        Self { classical_target: Some(clbit), ..Self::new(GateKind::Measure, vec![qubit]) }
    }

    /// Add extra control qubits.
    pub fn controlled_by(mut self, controls: impl IntoIterator<Item = usize>) -> Self {
        self.controls.extend(controls);
        self
    }

    /// Guard on a classical bit value.
    pub fn conditioned_on(mut self, clbit: usize, value: bool) -> Self {
        self.condition = Some(ClassicalCondition { clbit, value });
        self
    }

    pub fn is_measurement(&self) -> bool {
        self.kind == GateKind::Measure
    }

    /// Every qubit the op touches: targets first, then extra controls.
    pub fn qubits(&self) -> Vec<usize> {
        self.targets.iter().chain(&self.controls).copied().collect()
    }

    /// Qubits that must be |1⟩ for the op to act: the intrinsic control
    /// (for CNOT/CZ/CPHASE) plus the extra controls.
    pub fn effective_controls(&self) -> Vec<usize> {
        let intrinsic = if self.kind.has_intrinsic_control() {
            self.targets.first().copied()
        } else {
            None
        };
        intrinsic.into_iter().chain(self.controls.iter().copied()).collect()
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for q in &self.targets {
            write!(f, " {q}")?;
        }
        if let Some(theta) = self.angle {
            write!(f, " {theta:.6}")?;
        }
        if let Some(c) = self.classical_target {
            write!(f, " -> {c}")?;
        }
        if !self.controls.is_empty() {
            let ctrl: Vec<String> = self.controls.iter().map(|q| q.to_string()).collect();
            write!(f, " ctrl[{}]", ctrl.join(","))?;
        }
        if let Some(cond) = self.condition {
            write!(f, " if c{}=={}", cond.clbit, cond.value as u8)?;
        }
        Ok(())
    }
}

// ── GateSequence ──────────────────────────────────────────────────────────

/// Ordered, append-only circuit with fixed register sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct GateSequence {
    num_qubits: usize,
    num_clbits: usize,
    ops: Vec<GateOp>,
}

impl GateSequence {
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self { num_qubits, num_clbits, ops: Vec::new() }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn ops(&self) -> &[GateOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Non-measurement operations.
    pub fn gate_count(&self) -> usize {
        self.ops.iter().filter(|op| !op.is_measurement()).count()
    }

    pub fn measure_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_measurement()).count()
    }

    pub fn has_measurements(&self) -> bool {
        self.ops.iter().any(GateOp::is_measurement)
    }

    pub fn push(&mut self, op: GateOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.push(GateOp::h(qubit))
    }

    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.push(GateOp::x(qubit))
    }

    pub fn z(&mut self, qubit: usize) -> &mut Self {
        self.push(GateOp::z(qubit))
    }

    pub fn cnot(&mut self, control: usize, target: usize) -> &mut Self {
        self.push(GateOp::cnot(control, target))
    }

    pub fn cz(&mut self, control: usize, target: usize) -> &mut Self {
        self.push(GateOp::cz(control, target))
    }

    pub fn cphase(&mut self, angle: f64, control: usize, target: usize) -> &mut Self {
        self.push(GateOp::cphase(angle, control, target))
    }

    pub fn swap(&mut self, qubit_a: usize, qubit_b: usize) -> &mut Self {
        self.push(GateOp::swap(qubit_a, qubit_b))
    }

    pub fn measure(&mut self, qubit: usize, clbit: usize) -> &mut Self {
        self.push(GateOp::measure(qubit, clbit))
    }

    /// Measure qubit i into classical bit i for every qubit that has a
    /// matching classical bit.
    pub fn measure_all(&mut self) -> &mut Self {
        for q in 0..self.num_qubits.min(self.num_clbits) {
            self.measure(q, q);
        }
        self
    }

    /// Attach a classical condition to the most recently appended op.
    /// No-op on an empty sequence.
    pub fn c_if(&mut self, clbit: usize, value: bool) -> &mut Self {
        if let Some(last) = self.ops.last_mut() {
            last.condition = Some(ClassicalCondition { clbit, value });
        }
        self
    }
}

impl fmt::Display for GateSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QREG {} CREG {}", self.num_qubits, self.num_clbits)?;
        for op in &self.ops {
            writeln!(f, "{op}")?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
