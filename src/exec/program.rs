// src/exec/program.rs

//! Statement-level programs: circuit definitions plus a top-level body.

use crate::core::{MAX_QUBITS, QubeError, Result};
use crate::targets::TargetSpec;
use std::collections::BTreeMap;
use std::fmt;

/// One executable statement.
///
/// `Apply`, `Measure`, `MeasureJoint` and `QueueMeasure` act on the active
/// circuit and fail outside a circuit body. The rest work anywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `apply GATE(params) targets…`
    Apply {
        gate: String,
        targets: Vec<TargetSpec>,
        params: Vec<f64>,
    },
    /// Measure one qubit of the active circuit and bind the bit.
    Measure { qubit: usize, bind: String },
    /// Measure the resolved qubits of the active circuit jointly and bind the
    /// bits in resolution order.
    MeasureJoint { targets: Vec<TargetSpec>, bind: String },
    /// Register qubits of the active circuit for read-out by `run`.
    QueueMeasure { targets: Vec<TargetSpec> },
    /// Bind a free-standing qubit value built from a state notation such as
    /// `|+⟩`.
    Prepare { bind: String, notation: String },
    /// Apply a gate to a free-standing qubit value, addressing all of its
    /// qubits. Multi-qubit gates take them most significant first, so on
    /// `a ⊗ b` a `CNOT` uses `a` as control.
    ApplyValue {
        gate: String,
        var: String,
        params: Vec<f64>,
    },
    /// CNOT on two free single-qubit values, binding the composed pair.
    /// `control` becomes the high-order qubit of the result.
    CnotValues { control: String, target: String, bind: String },
    /// Measure qubit 0 of a free-standing value. The value is consumed.
    MeasureValue { var: String, bind: String },
    /// Create a circuit from a definition, execute its body and optionally
    /// bind the result.
    Instantiate { circuit: String, bind: Option<String> },
    /// Read out a circuit variable (see `Circuit::run`) and bind the
    /// measured bits in ascending qubit order.
    Run { var: String, bind: String },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(targets: &[TargetSpec]) -> String {
            targets.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
        }
        match self {
            Statement::Apply { gate, targets, params } if params.is_empty() => {
                write!(f, "apply {} {}", gate, list(targets))
            }
            Statement::Apply { gate, targets, params } => {
                let ps: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "apply {}({}) {}", gate, ps.join(", "), list(targets))
            }
            Statement::Measure { qubit, bind } => write!(f, "{} = measure q{}", bind, qubit),
            Statement::MeasureJoint { targets, bind } => write!(f, "{} = measure {}", bind, list(targets)),
            Statement::QueueMeasure { targets } => write!(f, "measure {}", list(targets)),
            Statement::Prepare { bind, notation } => write!(f, "{} = {}", bind, notation),
            Statement::ApplyValue { gate, var, .. } => write!(f, "apply {} {}", gate, var),
            Statement::CnotValues { control, target, bind } => {
                write!(f, "{} = CNOT({}, {})", bind, control, target)
            }
            Statement::MeasureValue { var, bind } => write!(f, "{} = measure {}", bind, var),
            Statement::Instantiate { circuit, bind: Some(bind) } => write!(f, "{} = {}()", bind, circuit),
            Statement::Instantiate { circuit, bind: None } => write!(f, "{}()", circuit),
            Statement::Run { var, bind } => write!(f, "{} = run({})", bind, var),
        }
    }
}

/// A named circuit: its width and the statements of its body.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitDefinition {
    pub name: String,
    pub qubits: usize,
    pub body: Vec<Statement>,
}

impl CircuitDefinition {
    pub fn new(name: impl Into<String>, qubits: usize) -> Self {
        Self { name: name.into(), qubits, body: Vec::new() }
    }

    /// Appends a statement to the body.
    pub fn with(mut self, statement: Statement) -> Self {
        self.body.push(statement);
        self
    }
}

/// Circuit definitions plus the top-level statements that use them.
#[derive(Debug, Clone)]
pub struct Program {
    pub(crate) definitions: BTreeMap<String, CircuitDefinition>,
    pub(crate) main: Vec<Statement>,
}

impl Program {
    pub fn definition(&self, name: &str) -> Option<&CircuitDefinition> {
        self.definitions.get(name)
    }

    pub fn statements(&self) -> &[Statement] {
        &self.main
    }

    pub fn statement_count(&self) -> usize {
        self.main.len()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for def in self.definitions.values() {
            writeln!(f, "circuit {}({}) {{", def.name, def.qubits)?;
            for (i, statement) in def.body.iter().enumerate() {
                writeln!(f, "  {:04}: {}", i + 1, statement)?;
            }
            writeln!(f, "}}")?;
        }
        for (i, statement) in self.main.iter().enumerate() {
            writeln!(f, "{:04}: {}", i + 1, statement)?;
        }
        Ok(())
    }
}

/// Fluent construction of a [`Program`].
///
/// # Examples
/// ```
/// # use qube::exec::{CircuitDefinition, ProgramBuilder, Statement};
/// # use qube::targets::TargetSpec;
/// let bell = CircuitDefinition::new("bell", 2)
///     .with(Statement::Apply { gate: "H".into(), targets: vec![TargetSpec::Single(0)], params: vec![] })
///     .with(Statement::Apply { gate: "CNOT".into(), targets: vec![TargetSpec::Range { start: 0, end: 1 }], params: vec![] });
///
/// let program = ProgramBuilder::new()
///     .define(bell)
///     .pb_add(Statement::Instantiate { circuit: "bell".into(), bind: Some("c".into()) })
///     .build();
/// assert!(program.is_ok());
/// ```
#[derive(Default)]
pub struct ProgramBuilder {
    definitions: Vec<CircuitDefinition>,
    main: Vec<Statement>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(mut self, definition: CircuitDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Adds a top-level statement.
    pub fn pb_add(mut self, statement: Statement) -> Self {
        self.main.push(statement);
        self
    }

    pub fn add_many<I>(mut self, statements: I) -> Self
    where
        I: IntoIterator<Item = Statement>,
    {
        self.main.extend(statements);
        self
    }

    /// Builds the program, rejecting duplicate definition names and widths
    /// outside `[1, 20]`.
    pub fn build(self) -> Result<Program> {
        let mut definitions = BTreeMap::new();
        for def in self.definitions {
            if def.qubits == 0 || def.qubits > MAX_QUBITS {
                return Err(QubeError::range(format!(
                    "circuit '{}' declares {} qubits, allowed range is [1, {}]",
                    def.name, def.qubits, MAX_QUBITS
                )));
            }
            if definitions.contains_key(&def.name) {
                return Err(QubeError::validation(format!(
                    "circuit '{}' is defined more than once",
                    def.name
                )));
            }
            definitions.insert(def.name.clone(), def);
        }
        Ok(Program { definitions, main: self.main })
    }
}
