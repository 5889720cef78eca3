// src/lib.rs

//! `qube` - the quantum circuit execution engine of the Qube circuit language.
//!
//! The crate keeps a dense state vector of `2^n` complex amplitudes per
//! circuit, applies gates to it as they are requested, resolves declarative
//! target syntax (`~`, `(~, qT)`, `(qA:qB)`, ...) into qubit indices, and
//! measures with proper collapse, including joint measurement of several
//! qubits from a single draw.
//!
//! Qubit `q` is bit `q` of a basis index (qubit 0 is least significant);
//! printed kets show the most significant qubit first.

pub mod core;
pub mod gates;
pub mod simulation;
pub mod targets;
pub mod circuits;
pub mod measurement;
pub mod validation;
pub mod exec;

// Re-export the most common types for easier top-level use
pub use crate::core::{QuantumState, QubeError, Result, cnot_pair, entanglement_measure, fidelity};
pub use gates::{Dispatch, Gate, GateKind};
pub use targets::{ResolvedTargets, TargetSpec, resolve_targets};
pub use circuits::{Circuit, CircuitBuilder};
pub use simulation::{JointMeasurement, RunResult, Simulator, SimulatorConfig};
pub use exec::{CircuitDefinition, Interpreter, Program, ProgramBuilder, Statement, Value};
pub use validation::{check_normalization, check_unitary};

// Example 1: Bell pair
// Builds (|00⟩ + |11⟩)/√2 and checks that a joint measurement of both
// qubits always agrees.
/// ```
/// use qube::{Simulator, SimulatorConfig, QubeError};
///
/// # fn main() -> Result<(), QubeError> {
/// let mut simulator = Simulator::new(SimulatorConfig { seed: Some(42), ..Default::default() });
/// let mut circuit = simulator.create_circuit(2)?;
/// circuit.h(0)?.cnot(0, 1)?;
///
/// assert!((circuit.probability_of(0, 0)? - 0.5).abs() < 1e-10);
/// assert!((circuit.probability_of(1, 0)? - 0.5).abs() < 1e-10);
///
/// let bits = circuit.measure_joint(&[0, 1])?;
/// assert_eq!(bits[0], bits[1]);
/// println!("{}", circuit.draw());
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: evaluator-style application
// Gate names and target descriptions as an `apply` statement carries them.
/// ```
/// use qube::{Circuit, TargetSpec, QubeError};
///
/// # fn main() -> Result<(), QubeError> {
/// let mut circuit = Circuit::new(4)?;
/// circuit.apply_named("H", &[TargetSpec::All], &[])?;
/// // controls q0, q1, q3 then target q2: a CCCZ
/// circuit.apply_named("CZ", &[TargetSpec::AllToTarget(2)], &[])?;
/// circuit.apply_named("RY", &[TargetSpec::Range { start: 1, end: 2 }], &[0.25])?;
/// assert_eq!(circuit.depth(), 4 + 1 + 2);
/// assert_eq!(circuit.gate_log()[4].name(), "CCCZ");
///
/// let err = circuit.apply_named("CNOT", &[TargetSpec::All], &[]).unwrap_err();
/// assert!(matches!(err, QubeError::Validation { .. }));
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
