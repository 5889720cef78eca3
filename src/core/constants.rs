//! Numerical tolerances and resource limits shared by the engine.

/// Tolerances and limits used by state handling and measurement.
pub mod qube_constants {
    /// Allowed deviation of the squared norm from 1 before a state is renormalized.
    pub const NORM_TOLERANCE: f64 = 1e-10;
    /// Retained probability mass below which a collapse falls back to `|0…0⟩`.
    pub const COLLAPSE_TOLERANCE: f64 = 1e-10;
    /// Amplitudes with squared magnitude below this are omitted from display.
    pub const DISPLAY_TOLERANCE: f64 = 1e-10;
    /// Hard upper bound on circuit width (2^20 amplitudes).
    pub const MAX_QUBITS: usize = 20;
}
