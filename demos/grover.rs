//! Two iterations of Grover search over 3 qubits, marking |101⟩.

use qube::{Circuit, QubeError, SimulatorConfig, TargetSpec};

const MARKED: usize = 0b101;

/// Phase-flips the marked basis state: X on its zero bits, CCZ, undo.
fn oracle(circuit: &mut Circuit) -> Result<(), QubeError> {
    let zeros: Vec<usize> = (0..3).filter(|q| (MARKED >> q) & 1 == 0).collect();
    if !zeros.is_empty() {
        circuit.apply_named("X", &[TargetSpec::List(zeros.clone())], &[])?;
    }
    circuit.apply_named("CCZ", &[TargetSpec::All], &[])?;
    if !zeros.is_empty() {
        circuit.apply_named("X", &[TargetSpec::List(zeros)], &[])?;
    }
    Ok(())
}

/// Inversion about the mean.
fn diffusion(circuit: &mut Circuit) -> Result<(), QubeError> {
    circuit.apply_named("H", &[TargetSpec::All], &[])?;
    circuit.apply_named("X", &[TargetSpec::All], &[])?;
    circuit.apply_named("CCZ", &[TargetSpec::All], &[])?;
    circuit.apply_named("X", &[TargetSpec::All], &[])?;
    circuit.apply_named("H", &[TargetSpec::All], &[])?;
    Ok(())
}

fn main() -> Result<(), QubeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "qube=warn".into()),
        )
        .init();

    let mut circuit = Circuit::with_config(3, SimulatorConfig { seed: Some(11), ..SimulatorConfig::default() })?;
    circuit.apply_named("H", &[TargetSpec::All], &[])?;
    for _ in 0..2 {
        oracle(&mut circuit)?;
        diffusion(&mut circuit)?;
    }

    println!("{}", circuit.draw());
    for (index, p) in circuit.probabilities().iter().enumerate() {
        println!("  P(|{}⟩) = {:.4}", qube::core::state::basis_label(index, 3), p);
    }
    let bits = circuit.measure_joint(&[0, 1, 2])?;
    let found: usize = bits.iter().enumerate().map(|(q, b)| (*b as usize) << q).sum();
    println!("Measured |{}⟩ (marked |{}⟩)", qube::core::state::basis_label(found, 3), qube::core::state::basis_label(MARKED, 3));
    Ok(())
}
