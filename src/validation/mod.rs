// src/validation/mod.rs

//! Numerical sanity checks on states and gate matrices.

use crate::core::{NORM_TOLERANCE, QuantumState, QubeError, Result};
use crate::gates::library::Matrix2;
use num_complex::Complex;
use num_traits::{One, Zero};

const DEFAULT_UNITARY_TOLERANCE: f64 = 1e-12;

/// Checks that the squared norm of `state` is 1 within `tolerance`
/// (defaults to [`NORM_TOLERANCE`]).
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(QubeError::Invariant)` otherwise; a live state that fails this
///   check points at a bug in a gate or collapse routine.
pub fn check_normalization(state: &QuantumState, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(QubeError::invariant(format!(
            "state vector normalization failed: sum |c_i|^2 = {} (deviation > {})",
            norm_sq, effective_tolerance
        )))
    } else {
        Ok(())
    }
}

/// Checks `U†U = I` for a 2x2 matrix.
pub fn check_unitary(matrix: &Matrix2, tolerance: Option<f64>) -> Result<()> {
    let tol = tolerance.unwrap_or(DEFAULT_UNITARY_TOLERANCE);
    for i in 0..2 {
        for j in 0..2 {
            // (U†U)_ij = Σ_k conj(U_ki) U_kj
            let entry: Complex<f64> = (0..2).map(|k| matrix[k][i].conj() * matrix[k][j]).sum();
            let expected = if i == j { Complex::one() } else { Complex::zero() };
            if (entry - expected).norm() > tol {
                return Err(QubeError::validation(format!(
                    "matrix is not unitary: (U†U)[{}][{}] = {}",
                    i, j, entry
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_state_passes() -> Result<()> {
        let state = QuantumState::from_notation("|GHZ⟩")?;
        check_normalization(&state, None)
    }

    #[test]
    fn test_non_unitary_is_rejected() {
        let m: Matrix2 = [
            [Complex::new(1.0, 0.0), Complex::new(1.0, 0.0)],
            [Complex::zero(), Complex::new(1.0, 0.0)],
        ];
        assert!(matches!(check_unitary(&m, None), Err(QubeError::Validation { .. })));
    }
}
