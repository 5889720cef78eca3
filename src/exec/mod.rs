// src/exec/mod.rs

//! A small statement executor on top of the circuit engine.
//!
//! Programs consist of named circuit definitions and top-level statements.
//! Executing a definition creates a circuit, runs the body against it as the
//! active circuit, and reports failures with the position of the offending
//! statement.

mod interpreter;
mod program;

pub use interpreter::{Interpreter, MAX_NESTING_DEPTH, Value};
pub use program::{CircuitDefinition, Program, ProgramBuilder, Statement};
