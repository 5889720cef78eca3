// src/gates/library.rs

//! Fixed single-qubit unitaries and the rotation generators.
//!
//! Matrices are row-major `[[m00, m01], [m10, m11]]` acting on the column
//! vector `(amp_0, amp_1)` of one qubit.

use num_complex::Complex;
use num_traits::Zero;
use std::f64::consts::FRAC_1_SQRT_2;

/// A 2x2 complex matrix.
pub type Matrix2 = [[Complex<f64>; 2]; 2];

const ONE: Complex<f64> = Complex::new(1.0, 0.0);

/// Hadamard: `(1/√2)[[1,1],[1,-1]]`.
pub fn hadamard() -> Matrix2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

/// Pauli-X (bit flip).
pub fn pauli_x() -> Matrix2 {
    [[Complex::zero(), ONE], [ONE, Complex::zero()]]
}

/// Pauli-Y: `[[0,-i],[i,0]]`.
pub fn pauli_y() -> Matrix2 {
    let i = Complex::i();
    [[Complex::zero(), -i], [i, Complex::zero()]]
}

/// Pauli-Z (phase flip).
pub fn pauli_z() -> Matrix2 {
    [[ONE, Complex::zero()], [Complex::zero(), -ONE]]
}

/// S = `diag(1, i)`.
pub fn phase_s() -> Matrix2 {
    [[ONE, Complex::zero()], [Complex::zero(), Complex::i()]]
}

/// T = `diag(1, e^{iπ/4})`.
pub fn phase_t() -> Matrix2 {
    [
        [ONE, Complex::zero()],
        [Complex::zero(), Complex::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2)],
    ]
}

/// `RX(θ) = [[cos(θ/2), -i sin(θ/2)], [-i sin(θ/2), cos(θ/2)]]`.
pub fn rotation_x(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    let off = Complex::new(0.0, -s);
    [[Complex::new(c, 0.0), off], [off, Complex::new(c, 0.0)]]
}

/// `RY(θ) = [[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]`, all real.
pub fn rotation_y(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex::new(c, 0.0), Complex::new(-s, 0.0)],
        [Complex::new(s, 0.0), Complex::new(c, 0.0)],
    ]
}

/// `RZ(θ) = diag(e^{-iθ/2}, e^{iθ/2})`.
pub fn rotation_z(theta: f64) -> Matrix2 {
    [
        [Complex::from_polar(1.0, -theta / 2.0), Complex::zero()],
        [Complex::zero(), Complex::from_polar(1.0, theta / 2.0)],
    ]
}
