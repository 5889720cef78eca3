// src/simulation/embedding.rs

//! Lifts gates onto an `n`-qubit state vector.
//!
//! Single-qubit gates are applied with a strided pair update that touches
//! each amplitude once. The dense Kronecker form of the same operator
//! ([`embed_single_qubit_operator`]) is kept for verification and for small
//! registers where an explicit matrix is wanted.
//!
//! Bit convention: qubit `q` is bit `q` of the basis index (LSB = qubit 0).
//! In the Kronecker product `I ⊗ … ⊗ U ⊗ … ⊗ I` the factor acting on qubit
//! `q` therefore sits at tensor position `n - 1 - q`.

use crate::core::error::check_qubit;
use crate::core::{QuantumState, QubeError, Result};
use crate::gates::Gate;
use crate::gates::library::Matrix2;
use num_complex::Complex;
use num_traits::{One, Zero};
use tracing::trace;

/// Dense row-major square matrix.
pub type DenseMatrix = Vec<Vec<Complex<f64>>>;

/// Applies any library gate to `state`, validating its operands first.
pub(crate) fn apply_gate(state: &mut QuantumState, gate: &Gate) -> Result<()> {
    trace!(gate = %gate, qubits = state.qubit_count(), "applying gate");
    match gate {
        Gate::Cnot { control, target } => apply_cnot(state, *control, *target),
        Gate::ControlledZ { controls, target } => {
            let mut qubits = controls.clone();
            qubits.push(*target);
            apply_controlled_z(state, &qubits)
        }
        single => match single.matrix() {
            Some(matrix) => {
                let target = single.targets()[0];
                apply_single_qubit(state, target, &matrix)
            }
            None => Err(QubeError::invariant(format!(
                "gate {} has no single-qubit matrix",
                single.name()
            ))),
        },
    }
}

/// Applies a 2x2 unitary to qubit `target` in place.
///
/// Iterates over the `2^(n-1)` index pairs `(i0, i1)` that differ only in
/// bit `target` and replaces them with `matrix · (amp[i0], amp[i1])`.
pub fn apply_single_qubit(state: &mut QuantumState, target: usize, matrix: &Matrix2) -> Result<()> {
    check_qubit(target, state.qubit_count())?;
    let mask = 1usize << target;
    let lower_mask = mask - 1;
    let half = state.dim() / 2;
    let amps = state.vector_mut();

    for i in 0..half {
        // Insert a 0 bit at position `target`.
        let i0 = ((i & !lower_mask) << 1) | (i & lower_mask);
        let i1 = i0 | mask;
        let a0 = amps[i0];
        let a1 = amps[i1];
        amps[i0] = matrix[0][0] * a0 + matrix[0][1] * a1;
        amps[i1] = matrix[1][0] * a0 + matrix[1][1] * a1;
    }
    Ok(())
}

/// Kronecker product of two dense matrices.
pub fn kron(a: &DenseMatrix, b: &DenseMatrix) -> DenseMatrix {
    let (ra, rb) = (a.len(), b.len());
    let (ca, cb) = (a.first().map_or(0, Vec::len), b.first().map_or(0, Vec::len));
    let mut out = vec![vec![Complex::zero(); ca * cb]; ra * rb];
    for (i, row_a) in a.iter().enumerate() {
        for (j, x) in row_a.iter().enumerate() {
            for (k, row_b) in b.iter().enumerate() {
                for (l, y) in row_b.iter().enumerate() {
                    out[i * rb + k][j * cb + l] = x * y;
                }
            }
        }
    }
    out
}

fn identity2() -> DenseMatrix {
    vec![
        vec![Complex::one(), Complex::zero()],
        vec![Complex::zero(), Complex::one()],
    ]
}

/// Builds the full `2^n x 2^n` operator that applies `matrix` to `target`.
///
/// Only sensible for small `n`; the strided update in
/// [`apply_single_qubit`] computes the same product without materializing it.
pub fn embed_single_qubit_operator(matrix: &Matrix2, target: usize, qubit_count: usize) -> Result<DenseMatrix> {
    if qubit_count == 0 {
        return Err(QubeError::range("cannot embed into a register of 0 qubits"));
    }
    check_qubit(target, qubit_count)?;
    let u: DenseMatrix = matrix.iter().map(|row| row.to_vec()).collect();
    let position = qubit_count - 1 - target;

    let mut op: DenseMatrix = vec![vec![Complex::one()]];
    for slot in 0..qubit_count {
        let factor = if slot == position { u.clone() } else { identity2() };
        op = kron(&op, &factor);
    }
    Ok(op)
}

/// Multiplies the state by a dense operator of matching dimension.
pub fn apply_dense(state: &mut QuantumState, operator: &DenseMatrix) -> Result<()> {
    let dim = state.dim();
    if operator.len() != dim || operator.iter().any(|row| row.len() != dim) {
        return Err(QubeError::validation(format!(
            "operator is not {}x{}",
            dim, dim
        )));
    }
    let next: Vec<Complex<f64>> = operator
        .iter()
        .map(|row| row.iter().zip(state.amplitudes()).map(|(m, a)| m * a).sum::<Complex<f64>>())
        .collect();
    state.replace_vector(next)
}

/// CNOT by basis permutation: every index with the control bit set swaps its
/// amplitude with the index whose target bit is flipped.
pub fn apply_cnot(state: &mut QuantumState, control: usize, target: usize) -> Result<()> {
    let n = state.qubit_count();
    check_qubit(control, n)?;
    check_qubit(target, n)?;
    if control == target {
        return Err(QubeError::validation(format!(
            "CNOT control and target must differ, both are {}",
            control
        )));
    }
    let control_mask = 1usize << control;
    let target_mask = 1usize << target;
    let amps = state.vector_mut();
    for i in 0..amps.len() {
        // Visit each swapped pair once, from its target=0 side.
        if i & control_mask != 0 && i & target_mask == 0 {
            amps.swap(i, i | target_mask);
        }
    }
    Ok(())
}

/// Multi-controlled Z over `qubits` (arity >= 2): negates the amplitude of
/// every basis state in which all listed qubits are 1.
///
/// CZ, CCZ, CCCZ and wider variants are this routine at different arities.
pub fn apply_controlled_z(state: &mut QuantumState, qubits: &[usize]) -> Result<()> {
    let n = state.qubit_count();
    if qubits.len() < 2 {
        return Err(QubeError::validation(format!(
            "controlled-Z needs at least 2 qubits, got {}",
            qubits.len()
        )));
    }
    let mut mask = 0usize;
    for &q in qubits {
        check_qubit(q, n)?;
        if mask & (1 << q) != 0 {
            return Err(QubeError::validation(format!(
                "controlled-Z qubits must be distinct, {} appears twice",
                q
            )));
        }
        mask |= 1 << q;
    }
    for (i, amp) in state.vector_mut().iter_mut().enumerate() {
        if i & mask == mask {
            *amp = -*amp;
        }
    }
    Ok(())
}
