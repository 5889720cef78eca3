// src/simulation/results.rs
use crate::core::QuantumState;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of [`Circuit::run`](crate::circuits::Circuit::run).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// The circuit state after the read-out collapse.
    final_state: QuantumState,
    /// Qubit index to measured bit, for every queued qubit.
    measurements: BTreeMap<usize, u8>,
    gate_count: usize,
}

impl RunResult {
    pub(crate) fn new(final_state: QuantumState, measurements: BTreeMap<usize, u8>, gate_count: usize) -> Self {
        Self { final_state, measurements, gate_count }
    }

    pub fn final_state(&self) -> &QuantumState {
        &self.final_state
    }

    pub fn measurements(&self) -> &BTreeMap<usize, u8> {
        &self.measurements
    }

    /// Bit measured for `qubit`, if it was queued.
    pub fn measurement(&self, qubit: usize) -> Option<u8> {
        self.measurements.get(&qubit).copied()
    }

    pub fn gate_count(&self) -> usize {
        self.gate_count
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Results:")?;
        writeln!(f, "  Gates applied: {}", self.gate_count)?;
        writeln!(f, "  Final state: {}", self.final_state)?;
        if self.measurements.is_empty() {
            writeln!(f, "  No qubits were measured.")?;
        } else {
            writeln!(f, "  Measurements:")?;
            for (qubit, bit) in &self.measurements {
                writeln!(f, "    q{}: {}", qubit, bit)?;
            }
        }
        Ok(())
    }
}
