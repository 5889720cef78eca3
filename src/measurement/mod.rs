// src/measurement/mod.rs

//! Measurement protocols.
//!
//! * [`measure_standalone`]: one qubit of a free-standing value. Collapses
//!   and marks the value measured; it cannot be used again.
//! * [`measure_in_place`]: one qubit of a circuit's state. Collapses but the
//!   state stays usable.
//! * [`sample_joint`]: one draw from the full joint distribution, read out
//!   for any subset of qubits. Never mutates the state; pair it with
//!   [`collapse_to_outcome`] for a collapsing joint measurement.
//!
//! Every function takes the random source as a parameter so callers decide
//! between seeded and entropy-backed generators.

use crate::core::error::check_qubit;
use crate::core::state::probability_unchecked;
use crate::core::{COLLAPSE_TOLERANCE, QuantumState, QubeError, Result};
use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;
use tracing::{debug, warn};

/// Measures `qubit` of a standalone value and marks the value measured.
pub fn measure_standalone<R: Rng + ?Sized>(state: &mut QuantumState, qubit: usize, rng: &mut R) -> Result<u8> {
    state.ensure_unmeasured("measure")?;
    let outcome = measure_in_place(state, qubit, rng)?;
    state.mark_measured();
    Ok(outcome)
}

/// Measures `qubit` of a circuit state: samples a bit with probability
/// `P(qubit = 0)` for 0, then collapses onto the consistent subspace.
pub fn measure_in_place<R: Rng + ?Sized>(state: &mut QuantumState, qubit: usize, rng: &mut R) -> Result<u8> {
    check_qubit(qubit, state.qubit_count())?;
    let p0 = probability_unchecked(state.amplitudes(), qubit, 0);
    let r: f64 = rng.random();
    let outcome: u8 = if r < p0 { 0 } else { 1 };
    debug!(qubit, p0, r, outcome, "measured qubit");
    collapse_to_outcome(state, &[qubit], &[outcome])?;
    Ok(outcome)
}

/// Samples one basis index from `|amp_i|²` by inverse CDF and returns the
/// bit of each requested qubit in request order.
///
/// If rounding leaves `r` beyond the accumulated mass the last index with
/// non-zero probability is taken.
pub fn sample_joint<R: Rng + ?Sized>(state: &QuantumState, qubits: &[usize], rng: &mut R) -> Result<Vec<u8>> {
    for &q in qubits {
        check_qubit(q, state.qubit_count())?;
    }
    let r: f64 = rng.random();
    let index = select_index(state.amplitudes(), r);
    debug!(index, r, "sampled joint outcome");
    Ok(qubits.iter().map(|&q| ((index >> q) & 1) as u8).collect())
}

/// First basis index whose cumulative probability exceeds `r`.
fn select_index(amplitudes: &[Complex<f64>], r: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_nonzero = 0;
    for (i, amp) in amplitudes.iter().enumerate() {
        let p = amp.norm_sqr();
        if p > 0.0 {
            last_nonzero = i;
        }
        cumulative += p;
        if cumulative > r {
            return i;
        }
    }
    last_nonzero
}

/// Projects the state onto the subspace where each `qubits[k]` reads
/// `bits[k]` and renormalizes.
///
/// If the retained probability is below [`COLLAPSE_TOLERANCE`] the state is
/// reset to `|0…0⟩` instead.
pub fn collapse_to_outcome(state: &mut QuantumState, qubits: &[usize], bits: &[u8]) -> Result<()> {
    if qubits.len() != bits.len() {
        return Err(QubeError::validation(format!(
            "collapse needs one bit per qubit, got {} qubits and {} bits",
            qubits.len(),
            bits.len()
        )));
    }
    let mut mask = 0usize;
    let mut pattern = 0usize;
    for (&q, &b) in qubits.iter().zip(bits) {
        check_qubit(q, state.qubit_count())?;
        mask |= 1 << q;
        if b != 0 {
            pattern |= 1 << q;
        }
    }

    let kept: f64 = state
        .amplitudes()
        .iter()
        .enumerate()
        .filter(|(i, _)| i & mask == pattern)
        .map(|(_, a)| a.norm_sqr())
        .sum();

    let amps = state.vector_mut();
    if kept < COLLAPSE_TOLERANCE {
        warn!(kept, "retained probability is negligible, resetting to |0…0⟩");
        amps.iter_mut().for_each(|a| *a = Complex::zero());
        amps[0] = Complex::new(1.0, 0.0);
        return Ok(());
    }

    let scale = 1.0 / kept.sqrt();
    for (i, amp) in amps.iter_mut().enumerate() {
        if i & mask == pattern {
            *amp *= scale;
        } else {
            *amp = Complex::zero();
        }
    }
    Ok(())
}
