/// Multi-shot sampler.
///
/// Every shot re-runs the whole sequence on a fresh register with its own
/// RNG seeded `base_seed + shot` (wrapping), then records the classical
/// register as one histogram key. Because a shot's outcome depends only on
/// its own seed, the rayon path (feature `parallel`) produces exactly the
/// histogram the sequential loop does.
///
/// A circuit without measurements still produces one key per shot: the
/// untouched classical register, all zeros.
use super::executor::run_validated;
use super::histogram::{bits_to_key, OutcomeHistogram};
use crate::circuit::{validate, GateSequence};
use crate::config::{SimConfig, MAX_SUPPORTED_QUBITS};
use crate::core::Simulator;
use crate::error::{Result, SimError};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Histogram plus run statistics from `Sampler::run`.
#[derive(Debug, Clone, Serialize)]
pub struct SampleResult {
    pub histogram: OutcomeHistogram,
    /// Recoverable norm-drift corrections summed over all shots.
    pub drift_events: usize,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Per-worker accumulator; merging two is addition, so reduction order is
/// irrelevant.
#[derive(Debug, Default)]
struct Tally {
    histogram: OutcomeHistogram,
    drift_events: usize,
}

impl Tally {
    fn merge(mut self, other: Tally) -> Tally {
        self.histogram.merge(other.histogram);
        self.drift_events += other.drift_events;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sampler {
    config: SimConfig,
}

impl Sampler {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run `sequence` `shots` times and count the classical outcomes.
    pub fn sample(&self, sequence: &GateSequence, shots: u32) -> Result<OutcomeHistogram> {
        self.sample_with_stats(sequence, shots).map(|result| result.histogram)
    }

    /// Run `config.shots` shots and report drift and wall time alongside
    /// the histogram.
    pub fn run(&self, sequence: &GateSequence) -> Result<SampleResult> {
        self.sample_with_stats(sequence, self.config.shots)
    }

    fn sample_with_stats(&self, sequence: &GateSequence, shots: u32) -> Result<SampleResult> {
        self.check_limits(sequence, shots)?;
        validate(sequence)?;

        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let start = Instant::now();
        info!(
            qubits = sequence.num_qubits(),
            ops = sequence.len(),
            shots,
            base_seed,
            "sampling circuit"
        );

        let tally = if self.use_parallel() {
            self.tally_parallel(sequence, shots, base_seed)?
        } else {
            self.tally_sequential(sequence, shots, base_seed)?
        };

        let elapsed = start.elapsed();
        info!(
            outcomes = tally.histogram.len(),
            drift_events = tally.drift_events,
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            "sampling complete"
        );
        Ok(SampleResult {
            histogram: tally.histogram,
            drift_events: tally.drift_events,
            elapsed,
        })
    }

    fn check_limits(&self, sequence: &GateSequence, shots: u32) -> Result<()> {
        if shots > self.config.max_shots {
            return Err(SimError::ResourceLimit {
                resource: "shot",
                requested: shots as u64,
                maximum: self.config.max_shots as u64,
            });
        }
        let max_qubits = self.config.max_qubits.min(MAX_SUPPORTED_QUBITS);
        if sequence.num_qubits() > max_qubits {
            return Err(SimError::ResourceLimit {
                resource: "qubit",
                requested: sequence.num_qubits() as u64,
                maximum: max_qubits as u64,
            });
        }
        Ok(())
    }

    fn run_shot(&self, sequence: &GateSequence, seed: u64) -> Result<Tally> {
        let mut sim =
            Simulator::with_seed(sequence.num_qubits(), sequence.num_clbits(), &self.config, seed)?;
        let trace = run_validated(&mut sim, sequence)?;
        let mut histogram = OutcomeHistogram::new();
        histogram.record(bits_to_key(&sim.classical));
        Ok(Tally {
            histogram,
            drift_events: trace.diagnostics.len(),
        })
    }

    fn tally_sequential(&self, sequence: &GateSequence, shots: u32, base_seed: u64) -> Result<Tally> {
        let mut tally = Tally::default();
        for shot in 0..shots {
            let seed = base_seed.wrapping_add(shot as u64);
            tally = tally.merge(self.run_shot(sequence, seed)?);
        }
        Ok(tally)
    }

    #[cfg(feature = "parallel")]
    fn use_parallel(&self) -> bool {
        self.config.parallel
    }

    #[cfg(not(feature = "parallel"))]
    fn use_parallel(&self) -> bool {
        if self.config.parallel {
            debug!("parallel sampling requested but the `parallel` feature is disabled");
        }
        false
    }

    #[cfg(feature = "parallel")]
    fn tally_parallel(&self, sequence: &GateSequence, shots: u32, base_seed: u64) -> Result<Tally> {
        use rayon::prelude::*;

        debug!(threads = rayon::current_num_threads(), "sampling on rayon pool");
        (0..shots)
            .into_par_iter()
            .map(|shot| self.run_shot(sequence, base_seed.wrapping_add(shot as u64)))
            .try_fold(Tally::default, |acc, shot: Result<Tally>| -> Result<Tally> {
                Ok(acc.merge(shot?))
            })
            .try_reduce(Tally::default, |a, b| Ok(a.merge(b)))
    }

    #[cfg(not(feature = "parallel"))]
    fn tally_parallel(&self, sequence: &GateSequence, shots: u32, base_seed: u64) -> Result<Tally> {
        self.tally_sequential(sequence, shots, base_seed)
    }
}

/// Sample `sequence` with a default-configured sampler.
pub fn sample(sequence: &GateSequence, shots: u32) -> Result<OutcomeHistogram> {
    Sampler::default().sample(sequence, shots)
}
