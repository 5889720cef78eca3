//! Error handling logic

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QubeError>;

/// Errors raised by the circuit execution engine.
///
/// The first group of variants is the user-facing taxonomy: every one of them
/// is recoverable at the evaluator boundary and is turned into a diagnostic.
/// [`QubeError::Invariant`] is reserved for internal programming errors
/// (an unnormalizable vector, a malformed amplitude buffer) and is kept apart
/// so callers can tell "bad program" from "bad engine".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QubeError {
    /// A qubit index or qubit count outside its valid bounds.
    #[error("Range error: {message}")]
    Range {
        /// Description of the offending value and its bounds.
        message: String,
    },

    /// Wrong parameter count, wrong target arity, or duplicate qubits where
    /// distinctness is required.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the failed check.
        message: String,
    },

    /// Operation on a standalone state that has already been measured.
    #[error("Reuse error: {message}")]
    Reuse {
        /// Description of the rejected operation.
        message: String,
    },

    /// Gate name outside the supported set.
    #[error("Unsupported gate '{name}'")]
    UnsupportedGate {
        /// The name as it was requested.
        name: String,
    },

    /// `apply` or in-circuit `measure` executed with no active circuit.
    #[error("No active circuit: {message}")]
    NoActiveCircuit {
        /// The statement that needed a circuit.
        message: String,
    },

    /// Reference to an unbound variable or an undefined circuit.
    #[error("Unknown name '{name}'")]
    UnknownName {
        /// The unresolved name.
        name: String,
    },

    /// An error raised while executing the body of a circuit definition,
    /// tagged with the 1-based position of the failing statement.
    #[error("error in circuit '{circuit}' at statement {statement}: {source}")]
    InCircuit {
        /// Name of the circuit definition being instantiated.
        circuit: String,
        /// 1-based position of the failing statement within the body.
        statement: usize,
        /// The underlying error.
        #[source]
        source: Box<QubeError>,
    },

    /// Internal invariant violation. Never caused by user input alone.
    #[error("Internal invariant violated: {message}")]
    Invariant {
        /// Description of the violated invariant.
        message: String,
    },
}

impl QubeError {
    /// Create a range error.
    pub fn range(message: impl Into<String>) -> Self {
        Self::Range { message: message.into() }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Create a reuse error.
    pub fn reuse(message: impl Into<String>) -> Self {
        Self::Reuse { message: message.into() }
    }

    /// Create an internal invariant error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant { message: message.into() }
    }

    /// `true` for everything in the user-facing taxonomy, `false` for
    /// internal invariant violations (looking through positional wrappers).
    pub fn is_user_error(&self) -> bool {
        match self {
            QubeError::Invariant { .. } => false,
            QubeError::InCircuit { source, .. } => source.is_user_error(),
            _ => true,
        }
    }

    /// Strips any [`QubeError::InCircuit`] wrappers and returns the error
    /// that was originally raised.
    pub fn root_cause(&self) -> &QubeError {
        match self {
            QubeError::InCircuit { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Checks that `qubit` addresses one of `qubit_count` qubits.
pub(crate) fn check_qubit(qubit: usize, qubit_count: usize) -> Result<()> {
    if qubit >= qubit_count {
        return Err(QubeError::range(format!(
            "qubit index {} out of range [0, {})",
            qubit, qubit_count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QubeError::range("qubit index 7 out of range [0, 3)");
        assert!(err.to_string().starts_with("Range error"));
        assert!(err.to_string().contains('7'));

        let err = QubeError::UnsupportedGate { name: "FOO".to_string() };
        assert_eq!(err.to_string(), "Unsupported gate 'FOO'");
    }

    #[test]
    fn test_in_circuit_wrapping() {
        let inner = QubeError::validation("CNOT expects 2 qubits, got 3");
        let err = QubeError::InCircuit {
            circuit: "bell".to_string(),
            statement: 2,
            source: Box::new(inner.clone()),
        };
        let text = err.to_string();
        assert!(text.contains("'bell'"));
        assert!(text.contains("statement 2"));
        assert!(text.contains("CNOT expects 2 qubits"));
        assert_eq!(err.root_cause(), &inner);
        assert!(err.is_user_error());
    }

    #[test]
    fn test_invariant_is_not_user_error() {
        let err = QubeError::invariant("zero-norm vector");
        assert!(!err.is_user_error());
        let wrapped = QubeError::InCircuit {
            circuit: "c".to_string(),
            statement: 1,
            source: Box::new(err),
        };
        assert!(!wrapped.is_user_error());
    }

    #[test]
    fn test_check_qubit() {
        assert!(check_qubit(2, 3).is_ok());
        assert!(matches!(check_qubit(3, 3), Err(QubeError::Range { .. })));
    }
}
