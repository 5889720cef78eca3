// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;
pub mod constants;

// Re-export public types for convenient access via `qube::core::TypeName`
pub use error::{QubeError, Result};
pub use state::{QuantumState, cnot_pair, entanglement_measure, fidelity};
pub use constants::qube_constants::{
    COLLAPSE_TOLERANCE, DISPLAY_TOLERANCE, MAX_QUBITS, NORM_TOLERANCE,
};
