/// Dense quantum state vector.
///
/// An n-qubit register has 2^n basis states, one complex amplitude each.
/// Basis index bit `q` holds the value of qubit `q` (qubit 0 is the
/// least-significant bit). The vector must satisfy Σ|αᵢ|² = 1.
use crate::config::MAX_SUPPORTED_QUBITS;
use crate::error::{Result, SimError};
use num_complex::Complex64;
use std::fmt;

/// Below this total probability the state is considered annihilated.
const ZERO_NORM: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    pub num_qubits: usize,
    pub amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// Allocate |0...0⟩ for `num_qubits`, refusing registers larger than
    /// `max_qubits` (or the global ceiling).
    pub fn new(num_qubits: usize, max_qubits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(SimError::invalid_circuit("at least one qubit required"));
        }
        let maximum = max_qubits.min(MAX_SUPPORTED_QUBITS);
        if num_qubits > maximum {
            return Err(SimError::ResourceLimit {
                resource: "qubit",
                requested: num_qubits as u64,
                maximum: maximum as u64,
            });
        }

        let dim = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];
        amplitudes[0] = Complex64::new(1.0, 0.0);

        Ok(Self { num_qubits, amplitudes })
    }

    /// Computational basis state |index⟩.
    pub fn basis(num_qubits: usize, index: usize, max_qubits: usize) -> Result<Self> {
        let mut state = Self::new(num_qubits, max_qubits)?;
        if index >= state.dim() {
            return Err(SimError::invalid_circuit(format!(
                "basis index {index} out of range for {num_qubits} qubits"
            )));
        }
        state.amplitudes[0] = Complex64::new(0.0, 0.0);
        state.amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(state)
    }

    /// Dimension of the state space: 2^n
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Born-rule probability of basis state `index`.
    #[inline(always)]
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes[index].norm_sqr()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Total probability (≈ 1.0 for a physical state)
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Rescale to unit norm. Fails when there is nothing left to rescale.
    pub fn normalize(&mut self) -> std::result::Result<(), f64> {
        let total = self.total_probability();
        if total < ZERO_NORM {
            return Err(total);
        }
        let inv_norm = 1.0 / total.sqrt();
        for amp in self.amplitudes.iter_mut() {
            *amp *= inv_norm;
        }
        Ok(())
    }

    /// Reset to |0...0⟩
    pub fn reset(&mut self) {
        for amp in self.amplitudes.iter_mut() {
            *amp = Complex64::new(0.0, 0.0);
        }
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }

    #[inline(always)]
    pub fn qubit_bit(basis_idx: usize, qubit: usize) -> bool {
        (basis_idx >> qubit) & 1 == 1
    }

    /// Ket label for basis state `index`, qubit 0 rightmost.
    pub fn basis_label(&self, index: usize) -> String {
        (0..self.num_qubits)
            .rev()
            .map(|q| if Self::qubit_bit(index, q) { '1' } else { '0' })
            .collect()
    }

    /// Probability of measuring `qubit` as |1⟩, marginalised over the rest.
    pub fn marginal_probability_one(&self, qubit: usize) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| Self::qubit_bit(*i, qubit))
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Projective measurement of `qubit` driven by one uniform draw `r` in [0, 1).
    ///
    /// Outcome is |1⟩ iff `r < P(1)`. Inconsistent amplitudes are zeroed and
    /// the survivors renormalised. `Err` carries the residual norm if the
    /// projected state is empty.
    pub fn collapse(&mut self, qubit: usize, r: f64) -> std::result::Result<bool, f64> {
        let prob_one = self.marginal_probability_one(qubit);
        // rounding residue must never be selected as an outcome
        let outcome = if prob_one < ZERO_NORM {
            false
        } else if 1.0 - prob_one < ZERO_NORM {
            true
        } else {
            r < prob_one
        };

        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if Self::qubit_bit(i, qubit) != outcome {
                *amp = Complex64::new(0.0, 0.0);
            }
        }

        self.normalize()?;
        Ok(outcome)
    }

    /// Largest amplitude-wise distance to `other`.
    pub fn max_distance(&self, other: &StateVector) -> f64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "StateVector ({} qubits, dim={}):", self.num_qubits, self.dim())?;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let prob = amp.norm_sqr();
            if prob > 1e-12 {
                writeln!(
                    f,
                    "  |{}⟩  amplitude: {:.6}{:+.6}i  probability: {:.4}",
                    self.basis_label(i),
                    amp.re,
                    amp.im,
                    prob
                )?;
            }
        }
        Ok(())
    }
}
