// src/simulation/mod.rs

//! Simulator configuration and the entry point that hands out circuits.
//!
//! Gate application itself lives in [`embedding`]; a [`Simulator`] only
//! carries the settings every circuit it creates is built with.

pub mod embedding;
mod results;

pub use results::RunResult;

use crate::circuits::Circuit;
use crate::core::{MAX_QUBITS, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// What `measure_joint` does to the circuit state after sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JointMeasurement {
    /// Project onto the sampled outcome and renormalize, like a single-qubit
    /// measurement does.
    #[default]
    Collapse,
    /// Leave the state untouched.
    Preserve,
}

/// Settings shared by the circuits a [`Simulator`] creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Widest circuit accepted; clamped to the hard limit of 20.
    pub max_qubits: usize,
    /// Seed for each circuit's generator. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub joint_measurement: JointMeasurement,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: MAX_QUBITS,
            seed: None,
            joint_measurement: JointMeasurement::Collapse,
        }
    }
}

/// Creates circuits and reads them out.
///
/// A simulator owns one random stream. Each circuit it creates gets a
/// generator forked from that stream: a seeded simulator replays the same
/// sequence of circuits, while the circuits within that sequence measure
/// independently of each other.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
    rng: StdRng,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Creates a circuit of `qubit_count` qubits in `|0…0⟩`.
    ///
    /// # Errors
    /// `QubeError::Range` unless `1 <= qubit_count <= max_qubits`.
    pub fn create_circuit(&mut self, qubit_count: usize) -> Result<Circuit> {
        let rng = self.fork_rng();
        Circuit::with_rng(qubit_count, self.config.clone(), rng)
    }

    /// Reads out the queued measurements of `circuit`; see [`Circuit::run`].
    pub fn run(&self, circuit: &mut Circuit) -> Result<RunResult> {
        circuit.run()
    }

    /// A fresh generator seeded from this simulator's stream.
    pub(crate) fn fork_rng(&mut self) -> StdRng {
        StdRng::from_rng(&mut self.rng)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}
