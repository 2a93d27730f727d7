/// Simulation configuration.
///
/// There is no process-wide simulator: every execution and sampling call
/// receives a `SimConfig` explicitly. Configs can be built in code, or loaded
/// from a TOML file where every key is optional:
///
/// ```toml
/// shots = 4096
/// max_qubits = 20
/// seed = 7
/// drift_tolerance = 1e-6
/// parallel = false
/// ```
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hard ceiling on qubits regardless of configuration: 2^30 amplitudes is
/// already 16 GiB of `Complex64`.
pub const MAX_SUPPORTED_QUBITS: usize = 30;

pub const DEFAULT_SHOTS: u32 = 1024;
pub const DEFAULT_MAX_QUBITS: usize = 24;
pub const DEFAULT_MAX_SHOTS: u32 = 10_000_000;
pub const DEFAULT_DRIFT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Shots used by `Sampler::run`.
    pub shots: u32,
    /// Largest register the simulator will allocate.
    pub max_qubits: usize,
    /// Largest shot count a sampler will accept.
    pub max_shots: u32,
    /// Base RNG seed. `None` draws one from OS entropy per sampling run.
    pub seed: Option<u64>,
    /// Allowed deviation of the state norm from 1.0 after a unitary step.
    pub drift_tolerance: f64,
    /// Spread shots over a rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            max_qubits: DEFAULT_MAX_QUBITS,
            max_shots: DEFAULT_MAX_SHOTS,
            seed: None,
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            parallel: false,
        }
    }
}

impl SimConfig {
    /// Default configuration with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_qubits == 0 {
            return Err(SimError::Config("max_qubits must be at least 1".into()));
        }
        if self.max_qubits > MAX_SUPPORTED_QUBITS {
            return Err(SimError::Config(format!(
                "max_qubits {} exceeds the supported ceiling of {MAX_SUPPORTED_QUBITS}",
                self.max_qubits
            )));
        }
        if !(self.drift_tolerance.is_finite() && self.drift_tolerance > 0.0) {
            return Err(SimError::Config(format!(
                "drift_tolerance must be a positive finite number, got {}",
                self.drift_tolerance
            )));
        }
        if self.shots > self.max_shots {
            return Err(SimError::Config(format!(
                "shots {} exceeds max_shots {}",
                self.shots, self.max_shots
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.shots, 1024);
        assert_eq!(config.max_qubits, 24);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = SimConfig::from_toml_str("shots = 64\nseed = 9\n").unwrap();
        assert_eq!(config.shots, 64);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_qubits, DEFAULT_MAX_QUBITS);
    }

    #[test]
    fn test_from_toml_empty_uses_defaults() {
        assert_eq!(SimConfig::from_toml_str("").unwrap(), SimConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = SimConfig::from_toml_str("shotz = 3").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_max_qubits_above_ceiling_rejected() {
        let err = SimConfig::from_toml_str("max_qubits = 31").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_non_positive_tolerance_rejected() {
        let config = SimConfig { drift_tolerance: 0.0, ..SimConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimConfig::from_file("/nonexistent/qalgo.toml").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
