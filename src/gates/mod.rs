// src/gates/mod.rs

//! Gate vocabulary of the engine.
//!
//! [`GateKind`] is the closed set of gate names an `apply` statement may use;
//! [`Gate`] is a fully bound application of one of them (operands and angle
//! resolved). Turning a kind plus a resolved target list into concrete gates
//! is the job of [`GateKind::instantiate`], which carries the arity and
//! parameter rules for every family.

pub mod library;

use crate::core::{QubeError, Result};
use library::Matrix2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gate names accepted by the engine, without operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    H,
    X,
    Y,
    Z,
    S,
    T,
    Rx,
    Ry,
    Rz,
    Cnot,
    /// Multi-controlled Z with any arity >= 2 (`CZ` in source programs).
    Cz,
    /// `CCZ`: the controlled-Z family pinned to exactly 3 qubits.
    Ccz,
    /// `CCCZ`: the controlled-Z family pinned to exactly 4 qubits.
    Cccz,
}

/// How a gate family consumes a resolved target list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// One independent application per listed index.
    Broadcast,
    /// A single application that uses the whole list.
    FixedArity,
}

impl GateKind {
    /// Canonical upper-case name.
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::S => "S",
            GateKind::T => "T",
            GateKind::Rx => "RX",
            GateKind::Ry => "RY",
            GateKind::Rz => "RZ",
            GateKind::Cnot => "CNOT",
            GateKind::Cz => "CZ",
            GateKind::Ccz => "CCZ",
            GateKind::Cccz => "CCCZ",
        }
    }

    /// `true` for the single-qubit families (fixed and rotation).
    pub fn is_single_qubit(&self) -> bool {
        matches!(
            self,
            GateKind::H
                | GateKind::X
                | GateKind::Y
                | GateKind::Z
                | GateKind::S
                | GateKind::T
                | GateKind::Rx
                | GateKind::Ry
                | GateKind::Rz
        )
    }

    /// Number of numeric parameters the gate takes.
    pub fn parameter_count(&self) -> usize {
        match self {
            GateKind::Rx | GateKind::Ry | GateKind::Rz => 1,
            _ => 0,
        }
    }

    /// Broadcast for single-qubit families, fixed arity for the rest.
    pub fn dispatch(&self) -> Dispatch {
        if self.is_single_qubit() {
            Dispatch::Broadcast
        } else {
            Dispatch::FixedArity
        }
    }

    /// Binds this kind to a resolved target list and parameter list.
    ///
    /// Single-qubit kinds expand to one gate per index (broadcast). `CNOT`
    /// needs exactly two indices (control, target). The controlled-Z family
    /// takes the whole list as one gate: `CZ` accepts any arity >= 2 while
    /// `CCZ` and `CCCZ` pin it to 3 and 4.
    ///
    /// Index range and distinctness are checked when the gate is applied,
    /// against the state it is applied to.
    pub fn instantiate(&self, targets: &[usize], params: &[f64]) -> Result<Vec<Gate>> {
        let expected = self.parameter_count();
        if params.len() != expected {
            return Err(QubeError::validation(format!(
                "{} gate expects {} parameter{}, got {}",
                self.name(),
                expected,
                if expected == 1 { "" } else { "s" },
                params.len()
            )));
        }
        if targets.is_empty() {
            return Err(QubeError::validation(format!(
                "{} gate needs at least one target qubit",
                self.name()
            )));
        }

        match self.dispatch() {
            Dispatch::Broadcast => targets.iter().map(|&q| self.bind_single(q, params)).collect(),
            Dispatch::FixedArity => Ok(vec![self.bind_fixed(targets)?]),
        }
    }

    /// One single-qubit gate on `target`; `params` is already checked.
    fn bind_single(&self, target: usize, params: &[f64]) -> Result<Gate> {
        let theta = params.first().copied().unwrap_or_default();
        let gate = match self {
            GateKind::H => Gate::H(target),
            GateKind::X => Gate::X(target),
            GateKind::Y => Gate::Y(target),
            GateKind::Z => Gate::Z(target),
            GateKind::S => Gate::S(target),
            GateKind::T => Gate::T(target),
            GateKind::Rx => Gate::Rx { target, theta },
            GateKind::Ry => Gate::Ry { target, theta },
            GateKind::Rz => Gate::Rz { target, theta },
            GateKind::Cnot | GateKind::Cz | GateKind::Ccz | GateKind::Cccz => {
                return Err(QubeError::invariant(format!("{} is not a single-qubit gate", self.name())));
            }
        };
        Ok(gate)
    }

    /// One gate over the whole target list.
    fn bind_fixed(&self, targets: &[usize]) -> Result<Gate> {
        match self {
            GateKind::Cnot => {
                expect_arity(self, targets, 2)?;
                Ok(Gate::Cnot { control: targets[0], target: targets[1] })
            }
            GateKind::Cz => {
                if targets.len() < 2 {
                    return Err(QubeError::validation(format!(
                        "CZ gate expects at least 2 qubits, got {}",
                        targets.len()
                    )));
                }
                Ok(Gate::controlled_z(targets))
            }
            GateKind::Ccz => {
                expect_arity(self, targets, 3)?;
                Ok(Gate::controlled_z(targets))
            }
            GateKind::Cccz => {
                expect_arity(self, targets, 4)?;
                Ok(Gate::controlled_z(targets))
            }
            _ => Err(QubeError::invariant(format!("{} is not a multi-qubit gate", self.name()))),
        }
    }
}

fn expect_arity(kind: &GateKind, targets: &[usize], arity: usize) -> Result<()> {
    if targets.len() != arity {
        return Err(QubeError::validation(format!(
            "{} gate expects exactly {} qubits, got {}",
            kind.name(),
            arity,
            targets.len()
        )));
    }
    Ok(())
}

impl FromStr for GateKind {
    type Err = QubeError;

    /// Case-insensitive; `CX` is accepted as `CNOT`.
    fn from_str(s: &str) -> Result<Self> {
        let kind = match s.trim().to_ascii_uppercase().as_str() {
            "H" => GateKind::H,
            "X" => GateKind::X,
            "Y" => GateKind::Y,
            "Z" => GateKind::Z,
            "S" => GateKind::S,
            "T" => GateKind::T,
            "RX" => GateKind::Rx,
            "RY" => GateKind::Ry,
            "RZ" => GateKind::Rz,
            "CNOT" | "CX" => GateKind::Cnot,
            "CZ" => GateKind::Cz,
            "CCZ" => GateKind::Ccz,
            "CCCZ" => GateKind::Cccz,
            _ => return Err(QubeError::UnsupportedGate { name: s.to_string() }),
        };
        Ok(kind)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate bound to concrete qubit indices (and an angle for rotations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    H(usize),
    X(usize),
    Y(usize),
    Z(usize),
    S(usize),
    T(usize),
    Rx { target: usize, theta: f64 },
    Ry { target: usize, theta: f64 },
    Rz { target: usize, theta: f64 },
    Cnot { control: usize, target: usize },
    /// Phase flip on every basis state where all of `controls` and `target`
    /// are 1. CZ, CCZ, CCCZ and wider variants are this one gate at
    /// different arities.
    ControlledZ { controls: Vec<usize>, target: usize },
}

impl Gate {
    /// Builds a controlled-Z over `qubits`, the last one acting as target.
    ///
    /// `qubits` must hold at least one element; callers check arity first.
    pub(crate) fn controlled_z(qubits: &[usize]) -> Gate {
        let (target, controls) = match qubits.split_last() {
            Some((target, controls)) => (*target, controls.to_vec()),
            None => (0, Vec::new()),
        };
        Gate::ControlledZ { controls, target }
    }

    /// Display name; the controlled-Z family is named by arity (`CZ`,
    /// `CCZ`, `CCCZ`, `CCCCZ`, ...).
    pub fn name(&self) -> String {
        match self {
            Gate::H(_) => "H".to_string(),
            Gate::X(_) => "X".to_string(),
            Gate::Y(_) => "Y".to_string(),
            Gate::Z(_) => "Z".to_string(),
            Gate::S(_) => "S".to_string(),
            Gate::T(_) => "T".to_string(),
            Gate::Rx { .. } => "RX".to_string(),
            Gate::Ry { .. } => "RY".to_string(),
            Gate::Rz { .. } => "RZ".to_string(),
            Gate::Cnot { .. } => "CNOT".to_string(),
            Gate::ControlledZ { controls, .. } => format!("{}Z", "C".repeat(controls.len())),
        }
    }

    /// Target qubits (a single one for every gate in the library).
    pub fn targets(&self) -> Vec<usize> {
        match self {
            Gate::H(q) | Gate::X(q) | Gate::Y(q) | Gate::Z(q) | Gate::S(q) | Gate::T(q) => vec![*q],
            Gate::Rx { target, .. } | Gate::Ry { target, .. } | Gate::Rz { target, .. } => vec![*target],
            Gate::Cnot { target, .. } | Gate::ControlledZ { target, .. } => vec![*target],
        }
    }

    /// Control qubits; empty for uncontrolled gates.
    pub fn controls(&self) -> Vec<usize> {
        match self {
            Gate::Cnot { control, .. } => vec![*control],
            Gate::ControlledZ { controls, .. } => controls.clone(),
            _ => Vec::new(),
        }
    }

    /// Every qubit the gate touches, controls first.
    pub fn qubits(&self) -> Vec<usize> {
        let mut all = self.controls();
        all.extend(self.targets());
        all
    }

    /// Rotation angle, if any.
    pub fn parameter(&self) -> Option<f64> {
        match self {
            Gate::Rx { theta, .. } | Gate::Ry { theta, .. } | Gate::Rz { theta, .. } => Some(*theta),
            _ => None,
        }
    }

    /// The 2x2 unitary for single-qubit gates, `None` for controlled ones.
    pub fn matrix(&self) -> Option<Matrix2> {
        let m = match self {
            Gate::H(_) => library::hadamard(),
            Gate::X(_) => library::pauli_x(),
            Gate::Y(_) => library::pauli_y(),
            Gate::Z(_) => library::pauli_z(),
            Gate::S(_) => library::phase_s(),
            Gate::T(_) => library::phase_t(),
            Gate::Rx { theta, .. } => library::rotation_x(*theta),
            Gate::Ry { theta, .. } => library::rotation_y(*theta),
            Gate::Rz { theta, .. } => library::rotation_z(*theta),
            Gate::Cnot { .. } | Gate::ControlledZ { .. } => return None,
        };
        Some(m)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Cnot { control, target } => {
                write!(f, "CNOT(control=[{}], target=[{}])", control, target)
            }
            Gate::ControlledZ { controls, target } => {
                let list: Vec<String> = controls.iter().map(|c| c.to_string()).collect();
                write!(f, "{}(control=[{}], target=[{}])", self.name(), list.join(", "), target)
            }
            _ => match self.parameter() {
                Some(theta) => write!(f, "{}({:.4}, [{}])", self.name(), theta, self.targets()[0]),
                None => write!(f, "{}([{}])", self.name(), self.targets()[0]),
            },
        }
    }
}
