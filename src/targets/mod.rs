// src/targets/mod.rs

//! Resolves declarative target descriptions into concrete qubit indices.

use crate::core::error::check_qubit;
use crate::core::{QubeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A target description as written in an `apply` or `measure` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSpec {
    /// `qK`
    Single(usize),
    /// `[q0, q1, …]`, kept in the given order.
    List(Vec<usize>),
    /// `~`: every qubit of the circuit.
    All,
    /// `(~, qT)`: every other qubit as control, then `T`.
    AllToTarget(usize),
    /// `(qS, ~)`: every other qubit, then `S`.
    SourceToAll(usize),
    /// `(qA:qB)`, inclusive on both ends.
    Range { start: usize, end: usize },
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSpec::Single(q) => write!(f, "q{}", q),
            TargetSpec::List(qs) => {
                let items: Vec<String> = qs.iter().map(|q| format!("q{}", q)).collect();
                write!(f, "[{}]", items.join(", "))
            }
            TargetSpec::All => write!(f, "~"),
            TargetSpec::AllToTarget(t) => write!(f, "(~, q{})", t),
            TargetSpec::SourceToAll(s) => write!(f, "(q{}, ~)", s),
            TargetSpec::Range { start, end } => write!(f, "(q{}:q{})", start, end),
        }
    }
}

/// An ordered index list produced by [`resolve_targets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTargets {
    indices: Vec<usize>,
}

impl ResolvedTargets {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Every index in `[0, n)` except `skip`, ascending, followed by `skip`.
fn others_then(skip: usize, qubit_count: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..qubit_count).filter(|&q| q != skip).collect();
    indices.push(skip);
    indices
}

/// Resolves `spec` against a circuit of `qubit_count` qubits.
///
/// Every produced index is checked to lie in `[0, qubit_count)`.
/// Distinctness is not checked here; gates that need it check on use.
pub fn resolve_targets(spec: &TargetSpec, qubit_count: usize) -> Result<ResolvedTargets> {
    let indices = match spec {
        TargetSpec::Single(q) => {
            check_qubit(*q, qubit_count)?;
            vec![*q]
        }
        TargetSpec::List(qs) => {
            for &q in qs {
                check_qubit(q, qubit_count)?;
            }
            qs.clone()
        }
        TargetSpec::All => (0..qubit_count).collect(),
        TargetSpec::AllToTarget(target) => {
            check_qubit(*target, qubit_count)?;
            others_then(*target, qubit_count)
        }
        TargetSpec::SourceToAll(source) => {
            check_qubit(*source, qubit_count)?;
            others_then(*source, qubit_count)
        }
        TargetSpec::Range { start, end } => {
            if start > end {
                return Err(QubeError::validation(format!(
                    "invalid range q{}:q{}: start must not exceed end",
                    start, end
                )));
            }
            check_qubit(*start, qubit_count)?;
            check_qubit(*end, qubit_count)?;
            (*start..=*end).collect()
        }
    };
    Ok(ResolvedTargets { indices })
}

/// Resolves several descriptions and concatenates them in order, as for an
/// `apply` statement with more than one target argument.
pub fn resolve_all(specs: &[TargetSpec], qubit_count: usize) -> Result<ResolvedTargets> {
    let mut indices = Vec::new();
    for spec in specs {
        indices.extend(resolve_targets(spec, qubit_count)?.into_indices());
    }
    Ok(ResolvedTargets { indices })
}
