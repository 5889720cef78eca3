// src/circuits/mod.rs

//! Live quantum circuits.
//!
//! A [`Circuit`] owns one state vector and applies every gate to it as soon
//! as the gate is requested. The gate log is kept for introspection and
//! drawing only and is never replayed: [`Circuit::run`] reads out the
//! current state instead of rebuilding it.

use crate::core::{MAX_QUBITS, QuantumState, QubeError, Result};
use crate::gates::{Gate, GateKind};
use crate::measurement;
use crate::simulation::{JointMeasurement, RunResult, SimulatorConfig};
use crate::targets::{TargetSpec, resolve_all};
use crate::validation::check_normalization;
use num_complex::Complex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

/// An `n`-qubit register with its own state, gate log and random source.
///
/// Created in `|0…0⟩` with `1 <= n <= 20`.
#[derive(Clone)]
pub struct Circuit {
    qubit_count: usize,
    state: QuantumState,
    gate_log: Vec<Gate>,
    /// Qubits that have gone through an in-circuit measurement.
    measured_qubits: BTreeSet<usize>,
    /// Qubits registered for read-out by `run`.
    queued: BTreeSet<usize>,
    rng: StdRng,
    config: SimulatorConfig,
}

impl Circuit {
    /// Creates a circuit with the default configuration.
    pub fn new(qubit_count: usize) -> Result<Self> {
        Self::with_config(qubit_count, SimulatorConfig::default())
    }

    /// Creates a circuit in `|0…0⟩`, seeding its generator from
    /// `config.seed` when given.
    ///
    /// # Errors
    /// `QubeError::Range` if `qubit_count` is 0 or above the configured (or
    /// hard) limit.
    pub fn with_config(qubit_count: usize, config: SimulatorConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(qubit_count, config, rng)
    }

    /// Creates a circuit that draws its measurements from `rng`.
    ///
    /// [`Simulator`](crate::simulation::Simulator) hands every circuit its
    /// own generator forked from a single stream, so circuits created from
    /// one seed are reproducible as a group without sharing outcomes.
    pub(crate) fn with_rng(qubit_count: usize, config: SimulatorConfig, rng: StdRng) -> Result<Self> {
        let limit = config.max_qubits.min(MAX_QUBITS);
        if qubit_count == 0 || qubit_count > limit {
            return Err(QubeError::range(format!(
                "qubit count must be between 1 and {}, got {}",
                limit, qubit_count
            )));
        }
        let state = QuantumState::zero(qubit_count)?;
        info!(qubits = qubit_count, seeded = config.seed.is_some(), "created circuit");
        Ok(Self {
            qubit_count,
            state,
            gate_log: Vec::new(),
            measured_qubits: BTreeSet::new(),
            queued: BTreeSet::new(),
            rng,
            config,
        })
    }

    /// Applies a bound gate to the live state and logs it.
    ///
    /// The state is untouched if the gate's operands are invalid.
    pub fn apply(&mut self, gate: Gate) -> Result<&mut Self> {
        self.state.apply(&gate)?;
        debug!(gate = %gate, "applied gate");
        self.gate_log.push(gate);
        Ok(self)
    }

    /// Applies a gate kind to already-resolved indices.
    ///
    /// All operands are validated before the first gate touches the state,
    /// so a failing call leaves the circuit unchanged.
    pub fn apply_kind(&mut self, kind: GateKind, indices: &[usize], params: &[f64]) -> Result<&mut Self> {
        let gates = kind.instantiate(indices, params)?;
        let mut scratch = self.state.clone();
        for gate in &gates {
            scratch.apply(gate)?;
        }
        self.state = scratch;
        for gate in gates {
            debug!(gate = %gate, "applied gate");
            self.gate_log.push(gate);
        }
        Ok(self)
    }

    /// The evaluator entry point: gate name, target descriptions and
    /// parameters as they appear in an `apply` statement.
    ///
    /// Targets are resolved in order and concatenated, then dispatched by
    /// gate family.
    pub fn apply_named(&mut self, name: &str, targets: &[TargetSpec], params: &[f64]) -> Result<&mut Self> {
        let kind: GateKind = name.parse()?;
        let resolved = resolve_all(targets, self.qubit_count)?;
        self.apply_kind(kind, resolved.indices(), params)
    }

    pub fn h(&mut self, q: usize) -> Result<&mut Self> {
        self.apply(Gate::H(q))
    }

    pub fn x(&mut self, q: usize) -> Result<&mut Self> {
        self.apply(Gate::X(q))
    }

    pub fn y(&mut self, q: usize) -> Result<&mut Self> {
        self.apply(Gate::Y(q))
    }

    pub fn z(&mut self, q: usize) -> Result<&mut Self> {
        self.apply(Gate::Z(q))
    }

    pub fn s(&mut self, q: usize) -> Result<&mut Self> {
        self.apply(Gate::S(q))
    }

    pub fn t(&mut self, q: usize) -> Result<&mut Self> {
        self.apply(Gate::T(q))
    }

    pub fn rx(&mut self, q: usize, theta: f64) -> Result<&mut Self> {
        self.apply(Gate::Rx { target: q, theta })
    }

    pub fn ry(&mut self, q: usize, theta: f64) -> Result<&mut Self> {
        self.apply(Gate::Ry { target: q, theta })
    }

    pub fn rz(&mut self, q: usize, theta: f64) -> Result<&mut Self> {
        self.apply(Gate::Rz { target: q, theta })
    }

    pub fn cnot(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.apply(Gate::Cnot { control, target })
    }

    pub fn cz(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.controlled_z_n(&[control, target])
    }

    pub fn ccz(&mut self, c0: usize, c1: usize, target: usize) -> Result<&mut Self> {
        self.controlled_z_n(&[c0, c1, target])
    }

    pub fn cccz(&mut self, c0: usize, c1: usize, c2: usize, target: usize) -> Result<&mut Self> {
        self.controlled_z_n(&[c0, c1, c2, target])
    }

    /// Controlled-Z over any number (>= 2) of qubits; the last is the target.
    pub fn controlled_z_n(&mut self, qubits: &[usize]) -> Result<&mut Self> {
        if qubits.len() < 2 {
            return Err(QubeError::validation(format!(
                "controlled-Z needs at least 2 qubits, got {}",
                qubits.len()
            )));
        }
        self.apply(Gate::controlled_z(qubits))
    }

    /// Measures one qubit and collapses the circuit state. The circuit stays
    /// usable afterwards.
    pub fn measure(&mut self, qubit: usize) -> Result<u8> {
        let bit = measurement::measure_in_place(&mut self.state, qubit, &mut self.rng)?;
        self.measured_qubits.insert(qubit);
        Ok(bit)
    }

    /// Measures `qubits` together from a single joint draw, returning one bit
    /// per requested index in request order.
    ///
    /// Under [`JointMeasurement::Collapse`] the state is projected onto the
    /// sampled outcome; under [`JointMeasurement::Preserve`] it is left as is.
    pub fn measure_joint(&mut self, qubits: &[usize]) -> Result<Vec<u8>> {
        let bits = measurement::sample_joint(&self.state, qubits, &mut self.rng)?;
        if self.config.joint_measurement == JointMeasurement::Collapse {
            measurement::collapse_to_outcome(&mut self.state, qubits, &bits)?;
        }
        self.measured_qubits.extend(qubits.iter().copied());
        Ok(bits)
    }

    /// Draws a joint outcome without touching the state, whatever the
    /// configured policy.
    pub fn sample_joint(&mut self, qubits: &[usize]) -> Result<Vec<u8>> {
        measurement::sample_joint(&self.state, qubits, &mut self.rng)
    }

    /// Registers `qubit` for read-out by [`Circuit::run`].
    pub fn queue_measure(&mut self, qubit: usize) -> Result<()> {
        crate::core::error::check_qubit(qubit, self.qubit_count)?;
        self.queued.insert(qubit);
        Ok(())
    }

    pub fn queue_measure_all(&mut self) {
        self.queued.extend(0..self.qubit_count);
    }

    /// Reads out the queued qubits from a snapshot of the current state.
    ///
    /// The queued qubits are sampled jointly and the snapshot collapsed onto
    /// the outcome; the circuit itself keeps its state.
    pub fn run(&mut self) -> Result<RunResult> {
        let mut final_state = self.state.clone();
        let qubits: Vec<usize> = self.queued.iter().copied().collect();
        let mut measurements = BTreeMap::new();
        if !qubits.is_empty() {
            let bits = measurement::sample_joint(&final_state, &qubits, &mut self.rng)?;
            measurement::collapse_to_outcome(&mut final_state, &qubits, &bits)?;
            measurements.extend(qubits.into_iter().zip(bits));
        }
        info!(gates = self.gate_log.len(), measured = measurements.len(), "ran circuit");
        Ok(RunResult::new(final_state, measurements, self.gate_log.len()))
    }

    /// Probability that `qubit` reads `value`.
    pub fn probability_of(&self, qubit: usize, value: u8) -> Result<f64> {
        self.state.probability_of(qubit, value)
    }

    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    pub fn state_vector(&self) -> &[Complex<f64>] {
        self.state.amplitudes()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.state.probabilities()
    }

    pub fn is_normalized(&self) -> bool {
        check_normalization(&self.state, None).is_ok()
    }

    /// Number of gates applied so far.
    pub fn depth(&self) -> usize {
        self.gate_log.len()
    }

    pub fn gate_log(&self) -> &[Gate] {
        &self.gate_log
    }

    pub fn measured_qubits(&self) -> &BTreeSet<usize> {
        &self.measured_qubits
    }

    pub fn queued_measurements(&self) -> &BTreeSet<usize> {
        &self.queued
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Text diagram of the gate log, one wire per qubit.
    pub fn draw(&self) -> String {
        self.to_string()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Collects gates and read-outs, then creates and fills a circuit in one go.
pub struct CircuitBuilder {
    qubit_count: usize,
    config: SimulatorConfig,
    gates: Vec<Gate>,
    queued: Vec<usize>,
}

impl CircuitBuilder {
    pub fn new(qubit_count: usize) -> Self {
        Self {
            qubit_count,
            config: SimulatorConfig::default(),
            gates: Vec::new(),
            queued: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: SimulatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn gate(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn gates<I>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        self.gates.extend(gates);
        self
    }

    pub fn measure(mut self, qubit: usize) -> Self {
        self.queued.push(qubit);
        self
    }

    /// Creates the circuit and applies the collected gates in order.
    pub fn build(self) -> Result<Circuit> {
        let mut circuit = Circuit::with_config(self.qubit_count, self.config)?;
        for gate in self.gates {
            circuit.apply(gate)?;
        }
        for qubit in self.queued {
            circuit.queue_measure(qubit)?;
        }
        Ok(circuit)
    }
}

//-------------------------------------------------------------------------
// Drawing
//-------------------------------------------------------------------------

const GATE_WIDTH: usize = 11;
const H_WIRE: char = '─';
const V_WIRE: char = '│';

fn format_gate(symbol: &str) -> String {
    let slen = symbol.chars().count();
    if slen >= GATE_WIDTH {
        symbol.chars().take(GATE_WIDTH).collect()
    } else {
        let total = GATE_WIDTH - slen;
        let pre = total / 2;
        let post = total - pre;
        format!("{}{}{}", H_WIRE.to_string().repeat(pre), symbol, H_WIRE.to_string().repeat(post))
    }
}

fn gate_symbol(gate: &Gate) -> String {
    match gate.parameter() {
        Some(theta) => format!("{}({:.2})", gate.name(), theta),
        None => gate.name(),
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.qubit_count;
        let readout: BTreeSet<usize> = self.queued.union(&self.measured_qubits).copied().collect();
        let columns = self.gate_log.len() + usize::from(!readout.is_empty());

        let wire = H_WIRE.to_string().repeat(GATE_WIDTH);
        let mut op_grid: Vec<Vec<String>> = vec![vec![wire; columns]; n];
        // v_connect[row][t]: connector drawn between row and row + 1
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; columns]; n];

        for (t, gate) in self.gate_log.iter().enumerate() {
            match gate {
                Gate::Cnot { control, target } => {
                    op_grid[*control][t] = format_gate("●");
                    op_grid[*target][t] = format_gate("⊕");
                }
                Gate::ControlledZ { .. } => {
                    for q in gate.qubits() {
                        op_grid[q][t] = format_gate("●");
                    }
                }
                _ => {
                    for q in gate.targets() {
                        op_grid[q][t] = format_gate(&gate_symbol(gate));
                    }
                }
            }
            let qubits = gate.qubits();
            if qubits.len() > 1 {
                let lo = qubits.iter().copied().min().unwrap_or(0);
                let hi = qubits.iter().copied().max().unwrap_or(0);
                for row in v_connect.iter_mut().take(hi).skip(lo) {
                    row[t] = V_WIRE;
                }
                for row in op_grid.iter_mut().take(hi).skip(lo + 1) {
                    if row[t].chars().all(|c| c == H_WIRE) {
                        row[t] = format_gate("┼");
                    }
                }
            }
        }
        if !readout.is_empty() {
            let last = columns - 1;
            for &q in &readout {
                op_grid[q][last] = format_gate("M");
            }
        }

        writeln!(f, "qube::Circuit[{} gates on {} qubits]", self.gate_log.len(), n)?;
        let label_width = format!("q{}: |0⟩ ", n - 1).chars().count();
        for r in 0..n {
            let label = format!("q{}: |0⟩ ", r);
            write!(f, "{:<width$}", label, width = label_width)?;
            writeln!(f, "{}", op_grid[r].join(""))?;
            if r + 1 < n && v_connect[r].iter().any(|c| *c != ' ') {
                write!(f, "{}", " ".repeat(label_width))?;
                for t in 0..columns {
                    let pad = GATE_WIDTH - 1;
                    let pre = pad / 2;
                    write!(f, "{}{}{}", " ".repeat(pre), v_connect[r][t], " ".repeat(pad - pre))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
