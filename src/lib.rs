//! # qalgo
//!
//! Dense statevector simulation of four canonical quantum algorithms:
//! Bell pairs, teleportation, the Quantum Fourier Transform and Quantum
//! Phase Estimation.
//!
//! ## Quick Start
//!
//! ```rust
//! use qalgo::algorithms::bell_pair;
//! use qalgo::config::SimConfig;
//! use qalgo::runtime::Sampler;
//!
//! // Build the circuit: H(0); CNOT(0,1); measure both qubits
//! let circuit = bell_pair();
//!
//! // Sample 1000 shots with a fixed seed
//! let sampler = Sampler::new(SimConfig::seeded(7));
//! let counts = sampler.sample(&circuit, 1000).unwrap();
//!
//! // Only the correlated outcomes appear
//! assert_eq!(counts.get("00") + counts.get("11"), 1000);
//! println!("{counts}");
//! ```

pub mod algorithms;
pub mod circuit;
pub mod config;
pub mod core;
pub mod error;
pub mod runtime;

pub use circuit::{analyze, GateKind, GateOp, GateSequence};
pub use config::SimConfig;
pub use error::{Result, SimError};
pub use runtime::{execute, sample, OutcomeHistogram, Sampler};
