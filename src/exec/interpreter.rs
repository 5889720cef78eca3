// src/exec/interpreter.rs

//! Executes [`Program`]s against the circuit engine.

use super::program::{CircuitDefinition, Program, Statement};
use crate::circuits::Circuit;
use crate::core::{QuantumState, QubeError, Result, cnot_pair};
use crate::gates::{Dispatch, GateKind};
use crate::measurement;
use crate::simulation::{Simulator, SimulatorConfig};
use crate::targets::resolve_all;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// Deepest allowed chain of circuit bodies instantiating circuits.
pub const MAX_NESTING_DEPTH: usize = 64;

/// A value bound to a variable.
#[derive(Debug, Clone)]
pub enum Value {
    Bit(u8),
    Bits(Vec<u8>),
    /// A free-standing qubit value, outside any circuit.
    Qubit(QuantumState),
    Circuit(Circuit),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bit(b) => write!(f, "{}", b),
            Value::Bits(bits) => {
                let items: Vec<String> = bits.iter().map(|b| b.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Qubit(state) => write!(f, "{}", state),
            Value::Circuit(c) => write!(f, "<circuit of {} qubits, {} gates>", c.qubit_count(), c.depth()),
        }
    }
}

type Scope = HashMap<String, Value>;

/// Statement interpreter.
///
/// The active circuit is passed explicitly to every statement as
/// `Option<&mut Circuit>`: `None` at top level, the circuit under
/// construction inside a body. Each instantiation pushes a scope frame that
/// is dropped when the body ends, whether it succeeds or fails. Bindings made
/// in a body land in its frame, and an outer value the body mutates is copied
/// into the frame first, so neither the outer circuit nor the outer variables
/// can be disturbed by a nested instantiation.
///
/// # Examples
///
/// ```
/// # use qube::exec::{CircuitDefinition, Interpreter, ProgramBuilder, Statement, Value};
/// # use qube::simulation::SimulatorConfig;
/// # use qube::targets::TargetSpec;
/// # fn main() -> qube::Result<()> {
/// let bell = CircuitDefinition::new("bell", 2)
///     .with(Statement::Apply { gate: "H".into(), targets: vec![TargetSpec::Single(0)], params: vec![] })
///     .with(Statement::Apply { gate: "CNOT".into(), targets: vec![TargetSpec::List(vec![0, 1])], params: vec![] })
///     .with(Statement::MeasureJoint { targets: vec![TargetSpec::All], bind: "m".into() });
/// let program = ProgramBuilder::new()
///     .define(bell)
///     .pb_add(Statement::Instantiate { circuit: "bell".into(), bind: Some("c".into()) })
///     .build()?;
///
/// let mut interpreter = Interpreter::new(SimulatorConfig { seed: Some(7), ..Default::default() });
/// interpreter.run(&program)?;
/// assert!(matches!(interpreter.variable("c"), Some(Value::Circuit(_))));
/// // bindings made inside the body stay there
/// assert!(interpreter.variable("m").is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Interpreter {
    simulator: Simulator,
    globals: Scope,
    /// One frame per circuit body being executed, innermost last.
    frames: Vec<Scope>,
    /// Random source for standalone measurements.
    rng: StdRng,
}

impl Interpreter {
    pub fn new(config: SimulatorConfig) -> Self {
        let mut simulator = Simulator::new(config);
        let rng = simulator.fork_rng();
        Self {
            simulator,
            globals: HashMap::new(),
            frames: Vec::new(),
            rng,
        }
    }

    /// Executes the top-level statements of `program` in order.
    ///
    /// Variables persist between calls; errors stop execution at the failing
    /// statement.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        for statement in program.statements() {
            self.execute(program, statement, None)?;
        }
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.frames
            .iter()
            .rev()
            .chain(std::iter::once(&self.globals))
            .find_map(|scope| scope.get(name))
    }

    /// Top-level bindings.
    pub fn variables(&self) -> &HashMap<String, Value> {
        &self.globals
    }

    /// The bit bound to `name`.
    pub fn bit(&self, name: &str) -> Result<u8> {
        match self.lookup(name)? {
            Value::Bit(b) => Ok(*b),
            other => Err(QubeError::validation(format!("'{}' is not a bit: {}", name, other))),
        }
    }

    /// The bit list bound to `name`.
    pub fn bits(&self, name: &str) -> Result<&[u8]> {
        match self.lookup(name)? {
            Value::Bits(bits) => Ok(bits),
            other => Err(QubeError::validation(format!("'{}' is not a bit list: {}", name, other))),
        }
    }

    /// The circuit bound to `name`.
    pub fn circuit(&self, name: &str) -> Result<&Circuit> {
        match self.lookup(name)? {
            Value::Circuit(c) => Ok(c),
            other => Err(QubeError::validation(format!("'{}' is not a circuit: {}", name, other))),
        }
    }

    fn lookup(&self, name: &str) -> Result<&Value> {
        self.variable(name).ok_or_else(|| unknown(name))
    }

    fn qubit_value(&self, name: &str) -> Result<&QuantumState> {
        match self.lookup(name)? {
            Value::Qubit(state) => Ok(state),
            _ => Err(not_a_qubit(name)),
        }
    }

    fn bind(&mut self, name: &str, value: Value) {
        debug!(name, value = %value, scope = self.frames.len(), "bound variable");
        let scope = match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.globals,
        };
        scope.insert(name.to_string(), value);
    }

    fn execute(&mut self, program: &Program, statement: &Statement, active: Option<&mut Circuit>) -> Result<()> {
        debug!(statement = %statement, in_circuit = active.is_some(), "executing");
        match statement {
            Statement::Apply { gate, targets, params } => {
                let circuit = require_circuit(active, statement)?;
                circuit.apply_named(gate, targets, params)?;
            }
            Statement::Measure { qubit, bind } => {
                let circuit = require_circuit(active, statement)?;
                let bit = circuit.measure(*qubit)?;
                self.bind(bind, Value::Bit(bit));
            }
            Statement::MeasureJoint { targets, bind } => {
                let circuit = require_circuit(active, statement)?;
                let qubits = resolve_all(targets, circuit.qubit_count())?;
                let bits = circuit.measure_joint(qubits.indices())?;
                self.bind(bind, Value::Bits(bits));
            }
            Statement::QueueMeasure { targets } => {
                let circuit = require_circuit(active, statement)?;
                let qubits = resolve_all(targets, circuit.qubit_count())?;
                for &q in qubits.indices() {
                    circuit.queue_measure(q)?;
                }
            }
            Statement::Prepare { bind, notation } => {
                let state = QuantumState::from_notation(notation)?;
                self.bind(bind, Value::Qubit(state));
            }
            Statement::ApplyValue { gate, var, params } => {
                let kind: GateKind = gate.parse()?;
                let state = match scoped_mut(&mut self.globals, &mut self.frames, var)? {
                    Value::Qubit(state) => state,
                    _ => return Err(not_a_qubit(var)),
                };
                state.ensure_unmeasured("apply a gate to")?;
                let qubits: Vec<usize> = match kind.dispatch() {
                    Dispatch::Broadcast => (0..state.qubit_count()).collect(),
                    // most significant first: the left factor of a composed value
                    Dispatch::FixedArity => (0..state.qubit_count()).rev().collect(),
                };
                let mut scratch = state.clone();
                for g in kind.instantiate(&qubits, params)? {
                    scratch.apply(&g)?;
                }
                *state = scratch;
            }
            Statement::CnotValues { control, target, bind } => {
                let pair = cnot_pair(self.qubit_value(control)?, self.qubit_value(target)?)?;
                self.bind(bind, Value::Qubit(pair));
            }
            Statement::MeasureValue { var, bind } => {
                let state = match scoped_mut(&mut self.globals, &mut self.frames, var)? {
                    Value::Qubit(state) => state,
                    _ => return Err(not_a_qubit(var)),
                };
                let bit = measurement::measure_standalone(state, 0, &mut self.rng)?;
                self.bind(bind, Value::Bit(bit));
            }
            Statement::Instantiate { circuit, bind } => {
                let built = self.instantiate(program, circuit)?;
                if let Some(name) = bind {
                    self.bind(name, Value::Circuit(built));
                }
            }
            Statement::Run { var, bind } => {
                let circuit = match scoped_mut(&mut self.globals, &mut self.frames, var)? {
                    Value::Circuit(c) => c,
                    _ => return Err(QubeError::validation(format!("'{}' is not a circuit", var))),
                };
                let result = self.simulator.run(circuit)?;
                let bits: Vec<u8> = result.measurements().values().copied().collect();
                self.bind(bind, Value::Bits(bits));
            }
        }
        Ok(())
    }

    /// Builds a fresh circuit from the named definition and executes its body
    /// against it.
    fn instantiate(&mut self, program: &Program, name: &str) -> Result<Circuit> {
        let definition = program.definition(name).ok_or_else(|| unknown(name))?;
        if self.frames.len() >= MAX_NESTING_DEPTH {
            return Err(QubeError::validation(format!(
                "circuit '{}' exceeds the nesting limit of {}",
                name, MAX_NESTING_DEPTH
            )));
        }
        let mut circuit = self.simulator.create_circuit(definition.qubits)?;
        info!(circuit = name, qubits = definition.qubits, depth = self.frames.len(), "instantiating circuit");

        self.frames.push(Scope::new());
        let outcome = self.execute_body(program, definition, &mut circuit);
        self.frames.pop();

        outcome.map(|()| circuit)
    }

    fn execute_body(&mut self, program: &Program, definition: &CircuitDefinition, circuit: &mut Circuit) -> Result<()> {
        for (i, statement) in definition.body.iter().enumerate() {
            self.execute(program, statement, Some(&mut *circuit))
                .map_err(|source| QubeError::InCircuit {
                    circuit: definition.name.clone(),
                    statement: i + 1,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

/// Mutable access to `name` in the innermost scope. A value inherited from an
/// outer scope is copied into the innermost frame first.
fn scoped_mut<'a>(globals: &'a mut Scope, frames: &'a mut [Scope], name: &str) -> Result<&'a mut Value> {
    let Some((top, outer)) = frames.split_last_mut() else {
        return globals.get_mut(name).ok_or_else(|| unknown(name));
    };
    if !top.contains_key(name) {
        let inherited = outer
            .iter()
            .rev()
            .chain(std::iter::once(&*globals))
            .find_map(|scope| scope.get(name))
            .cloned()
            .ok_or_else(|| unknown(name))?;
        top.insert(name.to_string(), inherited);
    }
    top.get_mut(name).ok_or_else(|| unknown(name))
}

fn require_circuit<'a>(active: Option<&'a mut Circuit>, statement: &Statement) -> Result<&'a mut Circuit> {
    active.ok_or_else(|| QubeError::NoActiveCircuit {
        message: format!("'{}' can only be used inside a circuit body", statement),
    })
}

fn unknown(name: &str) -> QubeError {
    QubeError::UnknownName { name: name.to_string() }
}

fn not_a_qubit(var: &str) -> QubeError {
    QubeError::validation(format!("'{}' is not a qubit value", var))
}
