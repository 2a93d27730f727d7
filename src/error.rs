/// Error types for the qalgo simulation engine.

use thiserror::Error;

/// Errors raised while validating, simulating or sampling a circuit.
#[derive(Error, Debug)]
pub enum SimError {
    /// Malformed gate sequence. `op_index` is `None` for circuit-level problems
    /// such as a zero-qubit declaration.
    #[error("invalid circuit{}: {reason}", fmt_op_index(.op_index))]
    InvalidCircuit {
        op_index: Option<usize>,
        reason: String,
    },

    #[error("{resource} limit exceeded: requested {requested}, maximum {maximum}")]
    ResourceLimit {
        resource: &'static str,
        requested: u64,
        maximum: u64,
    },

    /// Norm drifted away from 1.0. Recorded as a diagnostic when recoverable;
    /// returned only when the state has no norm left to restore.
    #[error("numerical drift after op {op_index}: norm {norm:.12}")]
    NumericalDrift { op_index: usize, norm: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn fmt_op_index(op_index: &Option<usize>) -> String {
    match op_index {
        Some(i) => format!(" at op {i}"),
        None => String::new(),
    }
}

impl SimError {
    pub(crate) fn invalid_op(op_index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidCircuit {
            op_index: Some(op_index),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_circuit(reason: impl Into<String>) -> Self {
        Self::InvalidCircuit {
            op_index: None,
            reason: reason.into(),
        }
    }

    /// True for the non-fatal drift diagnostic.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::NumericalDrift { .. })
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, SimError>;
