// src/core/state.rs

use super::constants::qube_constants::{DISPLAY_TOLERANCE, MAX_QUBITS, NORM_TOLERANCE};
use super::error::{QubeError, Result, check_qubit};
use crate::gates::Gate;
use crate::simulation::embedding;
use num_complex::Complex;
use num_traits::Zero;
use serde::Serialize;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

/// Dense state vector of an `n`-qubit register.
///
/// Amplitude `i` belongs to the basis state whose qubit `q` has the value
/// `(i >> q) & 1`: qubit 0 is the least-significant bit of the index. Every
/// probability, collapse and multi-qubit gate routine in the crate relies on
/// this convention. Display output prints the bits the other way round
/// (most-significant first), which is the usual ket notation.
///
/// The squared norm is 1 within [`NORM_TOLERANCE`]; constructors renormalize
/// whatever they are given. A standalone state becomes `measured` after a
/// destructive measurement and rejects any further use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantumState {
    amplitudes: Vec<Complex<f64>>,
    qubit_count: usize,
    measured: bool,
}

impl QuantumState {
    /// Creates a state from raw amplitudes, renormalizing if needed.
    ///
    /// The length must be a power of two of at least 2 and at most
    /// `2^MAX_QUBITS`.
    pub fn new(amplitudes: Vec<Complex<f64>>) -> Result<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(QubeError::validation(format!(
                "amplitude vector length must be a power of two >= 2, got {}",
                len
            )));
        }
        let qubit_count = len.trailing_zeros() as usize;
        if qubit_count > MAX_QUBITS {
            return Err(QubeError::range(format!(
                "state of {} qubits exceeds the limit of {}",
                qubit_count, MAX_QUBITS
            )));
        }
        let mut state = Self { amplitudes, qubit_count, measured: false };
        state.normalize()?;
        Ok(state)
    }

    /// The all-zero basis state `|0…0⟩` on `qubit_count` qubits.
    pub fn zero(qubit_count: usize) -> Result<Self> {
        Self::basis(qubit_count, 0)
    }

    /// The computational basis state with the given index.
    pub fn basis(qubit_count: usize, index: usize) -> Result<Self> {
        if qubit_count == 0 || qubit_count > MAX_QUBITS {
            return Err(QubeError::range(format!(
                "qubit count {} outside [1, {}]",
                qubit_count, MAX_QUBITS
            )));
        }
        let dim = 1usize << qubit_count;
        if index >= dim {
            return Err(QubeError::range(format!(
                "basis index {} out of range [0, {})",
                index, dim
            )));
        }
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[index] = Complex::new(1.0, 0.0);
        Ok(Self { amplitudes, qubit_count, measured: false })
    }

    /// Builds one of the named states (`|0⟩`, `|+⟩`, `|Φ+⟩`, `|GHZ⟩`, ...).
    ///
    /// Both `⟩` and `>` are accepted as the closing bracket.
    pub fn from_notation(notation: &str) -> Result<Self> {
        let key = notation.trim().replace('>', "⟩");
        let h = FRAC_1_SQRT_2;
        let w = 1.0 / 3f64.sqrt();
        let re = |v: &[f64]| v.iter().map(|x| Complex::new(*x, 0.0)).collect::<Vec<_>>();
        let amplitudes = match key.as_str() {
            "|0⟩" => re(&[1.0, 0.0]),
            "|1⟩" => re(&[0.0, 1.0]),
            "|+⟩" => re(&[h, h]),
            "|-⟩" => re(&[h, -h]),
            "|+i⟩" => vec![Complex::new(h, 0.0), Complex::new(0.0, h)],
            "|-i⟩" => vec![Complex::new(h, 0.0), Complex::new(0.0, -h)],
            "|00⟩" => re(&[1.0, 0.0, 0.0, 0.0]),
            "|01⟩" => re(&[0.0, 1.0, 0.0, 0.0]),
            "|10⟩" => re(&[0.0, 0.0, 1.0, 0.0]),
            "|11⟩" => re(&[0.0, 0.0, 0.0, 1.0]),
            "|Φ+⟩" => re(&[h, 0.0, 0.0, h]),
            "|Φ-⟩" => re(&[h, 0.0, 0.0, -h]),
            "|Ψ+⟩" => re(&[0.0, h, h, 0.0]),
            "|Ψ-⟩" => re(&[0.0, h, -h, 0.0]),
            "|000⟩" => re(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            "|GHZ⟩" => re(&[h, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, h]),
            "|W⟩" => re(&[0.0, w, w, 0.0, w, 0.0, 0.0, 0.0]),
            _ => {
                return Err(QubeError::validation(format!(
                    "unknown quantum state notation '{}'",
                    notation
                )));
            }
        };
        Self::new(amplitudes)
    }

    /// Read-only view of the amplitudes in storage order.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Mutable access for the embedding and measurement routines.
    pub(crate) fn vector_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Replaces the amplitude buffer wholesale. Length must not change.
    pub(crate) fn replace_vector(&mut self, amplitudes: Vec<Complex<f64>>) -> Result<()> {
        if amplitudes.len() != self.amplitudes.len() {
            return Err(QubeError::invariant(format!(
                "replacement vector has length {}, expected {}",
                amplitudes.len(),
                self.amplitudes.len()
            )));
        }
        self.amplitudes = amplitudes;
        Ok(())
    }

    /// Number of qubits `n`.
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Dimension `2^n` of the amplitude vector.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Whether a destructive standalone measurement has consumed this state.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    pub(crate) fn mark_measured(&mut self) {
        self.measured = true;
    }

    /// Fails with a reuse error if the state has already been measured.
    pub fn ensure_unmeasured(&self, action: &str) -> Result<()> {
        if self.measured {
            return Err(QubeError::reuse(format!(
                "cannot {} a qubit value that has already been measured",
                action
            )));
        }
        Ok(())
    }

    /// Sum of squared magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Rescales by `1/‖v‖` when the norm deviates from 1 beyond tolerance.
    pub fn normalize(&mut self) -> Result<()> {
        let norm_sq = self.norm_sqr();
        if !norm_sq.is_finite() || norm_sq < f64::EPSILON {
            return Err(QubeError::invariant(format!(
                "cannot normalize a vector with squared norm {}",
                norm_sq
            )));
        }
        if (norm_sq - 1.0).abs() > NORM_TOLERANCE {
            let scale = 1.0 / norm_sq.sqrt();
            for amp in self.amplitudes.iter_mut() {
                *amp *= scale;
            }
        }
        Ok(())
    }

    /// Probability that `qubit` reads `value` (0 or 1).
    pub fn probability_of(&self, qubit: usize, value: u8) -> Result<f64> {
        self.ensure_unmeasured("inspect")?;
        check_qubit(qubit, self.qubit_count)?;
        if value > 1 {
            return Err(QubeError::validation(format!(
                "qubit value must be 0 or 1, got {}",
                value
            )));
        }
        Ok(probability_unchecked(&self.amplitudes, qubit, value))
    }

    /// Probability of every basis index, in storage order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }

    /// Kronecker product `self ⊗ other`.
    ///
    /// `other` occupies the low-order qubits of the result: qubit `q` of
    /// `other` stays qubit `q`, qubit `q` of `self` becomes qubit
    /// `q + other.qubit_count()`.
    pub fn tensor_product(&self, other: &QuantumState) -> Result<Self> {
        self.ensure_unmeasured("combine")?;
        other.ensure_unmeasured("combine")?;
        let qubit_count = self.qubit_count + other.qubit_count;
        if qubit_count > MAX_QUBITS {
            return Err(QubeError::range(format!(
                "tensor product of {} qubits exceeds the limit of {}",
                qubit_count, MAX_QUBITS
            )));
        }
        let mut amplitudes = Vec::with_capacity(self.dim() * other.dim());
        for a in &self.amplitudes {
            for b in &other.amplitudes {
                amplitudes.push(a * b);
            }
        }
        Self::new(amplitudes)
    }

    /// Applies a gate directly to this state.
    ///
    /// This is the path used for free-standing qubit values. Circuits call it
    /// too, after their own bookkeeping.
    pub fn apply(&mut self, gate: &Gate) -> Result<()> {
        self.ensure_unmeasured("apply a gate to")?;
        embedding::apply_gate(self, gate)
    }
}

/// Sum of `|a_i|²` over indices whose `qubit` bit equals `value`.
pub(crate) fn probability_unchecked(amplitudes: &[Complex<f64>], qubit: usize, value: u8) -> f64 {
    let value = value as usize;
    amplitudes
        .iter()
        .enumerate()
        .filter(|(i, _)| (i >> qubit) & 1 == value)
        .map(|(_, c)| c.norm_sqr())
        .sum()
}

/// Renders basis index `index` as an `n`-character bit string,
/// most-significant qubit first.
pub fn basis_label(index: usize, qubit_count: usize) -> String {
    (0..qubit_count)
        .rev()
        .map(|q| if (index >> q) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Fidelity `|⟨a|b⟩|²` between two states of equal width.
pub fn fidelity(a: &QuantumState, b: &QuantumState) -> Result<f64> {
    if a.qubit_count() != b.qubit_count() {
        return Err(QubeError::validation(format!(
            "fidelity needs states of equal width, got {} and {} qubits",
            a.qubit_count(),
            b.qubit_count()
        )));
    }
    let overlap: Complex<f64> = a
        .amplitudes()
        .iter()
        .zip(b.amplitudes())
        .map(|(x, y)| x.conj() * y)
        .sum();
    Ok(overlap.norm_sqr())
}

/// CNOT on two free single-qubit values.
///
/// The pair is composed as `control ⊗ target`, so the control becomes qubit
/// 1 (the left character of a printed ket) and the target qubit 0. The inputs
/// are left as they were.
pub fn cnot_pair(control: &QuantumState, target: &QuantumState) -> Result<QuantumState> {
    if control.qubit_count() != 1 || target.qubit_count() != 1 {
        return Err(QubeError::validation(format!(
            "CNOT on free values needs two single qubits, got {} and {}",
            control.qubit_count(),
            target.qubit_count()
        )));
    }
    let mut combined = control.tensor_product(target)?;
    embedding::apply_cnot(&mut combined, 1, 0)?;
    Ok(combined)
}

/// Linear entropy `1 - Tr(ρ²)` of the reduced state of the most significant
/// qubit.
///
/// 0 for product states and single qubits, 0.5 for a maximally entangled
/// pair.
pub fn entanglement_measure(state: &QuantumState) -> Result<f64> {
    state.ensure_unmeasured("inspect")?;
    let n = state.qubit_count();
    if n < 2 {
        return Ok(0.0);
    }
    let mask = 1usize << (n - 1);
    let amps = state.amplitudes();
    let mut rho00 = 0.0f64;
    let mut rho11 = 0.0f64;
    let mut rho01: Complex<f64> = Complex::zero();
    for (i, a) in amps.iter().enumerate().filter(|(i, _)| i & mask == 0) {
        let b = amps[i | mask];
        rho00 += a.norm_sqr();
        rho11 += b.norm_sqr();
        rho01 += a * b.conj();
    }
    let purity = rho00 * rho00 + rho11 * rho11 + 2.0 * rho01.norm_sqr();
    Ok((1.0 - purity).max(0.0))
}

fn format_amplitude(f: &mut fmt::Formatter<'_>, amp: &Complex<f64>) -> fmt::Result {
    if amp.im.abs() < DISPLAY_TOLERANCE {
        write!(f, "{:.3}", amp.re)
    } else {
        write!(f, "({:.3}{:+.3}i)", amp.re, amp.im)
    }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qubit_count == 1 {
            format_amplitude(f, &self.amplitudes[0])?;
            write!(f, "|0⟩ + ")?;
            format_amplitude(f, &self.amplitudes[1])?;
            return write!(f, "|1⟩");
        }
        let mut first = true;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm_sqr() <= DISPLAY_TOLERANCE {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            format_amplitude(f, amp)?;
            write!(f, "|{}⟩", basis_label(i, self.qubit_count))?;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn test_new_renormalizes() -> Result<()> {
        let state = QuantumState::new(vec![Complex::new(3.0, 0.0), Complex::new(4.0, 0.0)])?;
        assert!((state.norm_sqr() - 1.0).abs() < TOL);
        assert!((state.amplitudes()[0].re - 0.6).abs() < TOL);
        assert!((state.amplitudes()[1].re - 0.8).abs() < TOL);
        Ok(())
    }

    #[test]
    fn test_new_rejects_bad_lengths() {
        let three = vec![Complex::new(1.0, 0.0); 3];
        assert!(matches!(QuantumState::new(three), Err(QubeError::Validation { .. })));
        let one = vec![Complex::new(1.0, 0.0)];
        assert!(matches!(QuantumState::new(one), Err(QubeError::Validation { .. })));
    }

    #[test]
    fn test_zero_vector_is_invariant_violation() {
        let err = QuantumState::new(vec![Complex::zero(); 4]).unwrap_err();
        assert!(matches!(err, QubeError::Invariant { .. }));
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_probability_uses_lsb_convention() -> Result<()> {
        // index 2 = binary 10: qubit 1 is set, qubit 0 is not
        let state = QuantumState::basis(2, 2)?;
        assert!((state.probability_of(0, 0)? - 1.0).abs() < TOL);
        assert!((state.probability_of(1, 1)? - 1.0).abs() < TOL);
        assert!(state.probability_of(2, 0).is_err());
        Ok(())
    }

    #[test]
    fn test_tensor_product_orders_operands() -> Result<()> {
        let one = QuantumState::from_notation("|1⟩")?;
        let zero = QuantumState::from_notation("|0⟩")?;
        // |1⟩ ⊗ |0⟩ -> index 0b10
        let combined = one.tensor_product(&zero)?;
        assert_eq!(combined.qubit_count(), 2);
        assert!((combined.amplitudes()[2].re - 1.0).abs() < TOL);
        assert!((combined.probability_of(1, 1)? - 1.0).abs() < TOL);
        Ok(())
    }

    #[test]
    fn test_measured_state_rejects_use() -> Result<()> {
        let mut state = QuantumState::from_notation("|+⟩")?;
        state.mark_measured();
        assert!(matches!(state.probability_of(0, 0), Err(QubeError::Reuse { .. })));
        let other = QuantumState::zero(1)?;
        assert!(matches!(state.tensor_product(&other), Err(QubeError::Reuse { .. })));
        Ok(())
    }

    #[test]
    fn test_display_prints_msb_first() -> Result<()> {
        let state = QuantumState::basis(3, 1)?;
        assert_eq!(state.to_string(), "1.000|001⟩");
        let plus = QuantumState::from_notation("|+>")?;
        assert_eq!(plus.to_string(), "0.707|0⟩ + 0.707|1⟩");
        let plus_i = QuantumState::from_notation("|+i⟩")?;
        assert_eq!(plus_i.to_string(), "0.707|0⟩ + (0.000+0.707i)|1⟩");
        Ok(())
    }

    #[test]
    fn test_fidelity() -> Result<()> {
        let plus = QuantumState::from_notation("|+⟩")?;
        let zero = QuantumState::zero(1)?;
        assert!((fidelity(&plus, &zero)? - 0.5).abs() < TOL);
        assert!((fidelity(&plus, &plus)? - 1.0).abs() < TOL);
        let bell = QuantumState::from_notation("|Φ+⟩")?;
        assert!(fidelity(&bell, &zero).is_err());
        Ok(())
    }

    #[test]
    fn test_cnot_pair_uses_control_as_high_qubit() -> Result<()> {
        let one = QuantumState::from_notation("|1⟩")?;
        let zero = QuantumState::from_notation("|0⟩")?;
        let flipped = cnot_pair(&one, &zero)?;
        assert!((flipped.amplitudes()[0b11].re - 1.0).abs() < TOL);
        assert_eq!(flipped.to_string(), "1.000|11⟩");
        // control |0⟩ leaves the target alone
        let kept = cnot_pair(&zero, &one)?;
        assert!((kept.amplitudes()[0b01].re - 1.0).abs() < TOL);
        assert!(!one.is_measured() && !zero.is_measured());
        Ok(())
    }

    #[test]
    fn test_cnot_pair_makes_bell_state() -> Result<()> {
        let plus = QuantumState::from_notation("|+⟩")?;
        let zero = QuantumState::zero(1)?;
        let bell = cnot_pair(&plus, &zero)?;
        let expected = QuantumState::from_notation("|Φ+⟩")?;
        assert!((fidelity(&bell, &expected)? - 1.0).abs() < TOL);
        Ok(())
    }

    #[test]
    fn test_cnot_pair_rejects_measured_or_wide_inputs() -> Result<()> {
        let mut used = QuantumState::from_notation("|1⟩")?;
        used.mark_measured();
        let fresh = QuantumState::zero(1)?;
        assert!(matches!(cnot_pair(&used, &fresh), Err(QubeError::Reuse { .. })));
        assert!(matches!(cnot_pair(&fresh, &used), Err(QubeError::Reuse { .. })));
        let pair = QuantumState::zero(2)?;
        assert!(matches!(cnot_pair(&pair, &fresh), Err(QubeError::Validation { .. })));
        Ok(())
    }

    #[test]
    fn test_entanglement_measure() -> Result<()> {
        assert_eq!(entanglement_measure(&QuantumState::from_notation("|+⟩")?)?, 0.0);
        let product = QuantumState::from_notation("|+⟩")?.tensor_product(&QuantumState::zero(1)?)?;
        assert!(entanglement_measure(&product)?.abs() < TOL);
        for name in ["|Φ+⟩", "|Φ-⟩", "|Ψ+⟩", "|Ψ-⟩", "|GHZ⟩"] {
            let state = QuantumState::from_notation(name)?;
            assert!((entanglement_measure(&state)? - 0.5).abs() < TOL, "{}", name);
        }
        Ok(())
    }

    #[test]
    fn test_unknown_notation() {
        assert!(QuantumState::from_notation("|2⟩").is_err());
    }
}
