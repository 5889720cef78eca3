// tests/circuit_tests.rs

use qube::{
    Circuit, Gate, QuantumState, QubeError, Simulator, SimulatorConfig, TargetSpec, resolve_targets,
};
use qube::measurement::measure_standalone;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

const TOL: f64 = 1e-9;

// Helper to build a seeded simulator so statistical tests are reproducible
fn seeded_simulator(seed: u64) -> Simulator {
    Simulator::new(SimulatorConfig { seed: Some(seed), ..SimulatorConfig::default() })
}

#[test]
fn test_bell_state_amplitudes() -> Result<(), QubeError> {
    let mut circuit = seeded_simulator(1).create_circuit(2)?;
    circuit.h(0)?.cnot(0, 1)?;

    let v = circuit.state_vector();
    assert!((v[0b00].re - FRAC_1_SQRT_2).abs() < TOL);
    assert!((v[0b11].re - FRAC_1_SQRT_2).abs() < TOL);
    assert!(v[0b01].norm() < TOL);
    assert!(v[0b10].norm() < TOL);
    assert!((circuit.probability_of(0, 0)? - 0.5).abs() < TOL);
    assert!((circuit.probability_of(1, 0)? - 0.5).abs() < TOL);
    Ok(())
}

#[test]
fn test_bit_convention_round_trip() -> Result<(), QubeError> {
    let mut sim = seeded_simulator(2);
    for n in 1..=6 {
        for q in 0..n {
            let mut circuit = sim.create_circuit(n)?;
            circuit.x(q)?;
            assert_eq!(circuit.measure(q)?, 1, "n = {}, q = {}", n, q);
            for other in (0..n).filter(|&o| o != q) {
                assert!((circuit.probability_of(other, 0)? - 1.0).abs() < TOL);
            }
        }
    }
    Ok(())
}

#[test]
fn test_state_display_is_msb_first() -> Result<(), QubeError> {
    let mut circuit = Circuit::new(3)?;
    circuit.x(0)?;
    // qubit 0 is the rightmost character
    assert_eq!(circuit.state().to_string(), "1.000|001⟩");
    Ok(())
}

#[test]
fn test_controlled_z_family_agrees() -> Result<(), QubeError> {
    // all-ones basis state gets a -1, for every arity
    for arity in 2..=6usize {
        let qubits: Vec<usize> = (0..arity).collect();
        let mut by_name = Circuit::new(arity)?;
        let mut generic = Circuit::new(arity)?;
        for c in [&mut by_name, &mut generic] {
            c.apply_named("X", &[TargetSpec::All], &[])?;
        }
        match arity {
            2 => by_name.cz(0, 1)?,
            3 => by_name.ccz(0, 1, 2)?,
            4 => by_name.cccz(0, 1, 2, 3)?,
            _ => by_name.apply_named("CZ", &[TargetSpec::All], &[])?,
        };
        generic.controlled_z_n(&qubits)?;
        let last = (1 << arity) - 1;
        assert!((by_name.state_vector()[last].re + 1.0).abs() < TOL);
        assert_eq!(by_name.state_vector(), generic.state_vector());
    }
    Ok(())
}

#[test]
fn test_ccz_arity_aliases() -> Result<(), QubeError> {
    let mut circuit = Circuit::new(4)?;
    circuit.apply_named("ccz", &[TargetSpec::Range { start: 0, end: 2 }], &[])?;
    circuit.apply_named("CCCZ", &[TargetSpec::AllToTarget(0)], &[])?;
    assert_eq!(circuit.gate_log()[0].name(), "CCZ");
    assert_eq!(
        circuit.gate_log()[1],
        Gate::ControlledZ { controls: vec![1, 2, 3], target: 0 }
    );
    let err = circuit.apply_named("CCZ", &[TargetSpec::All], &[]).unwrap_err();
    assert!(err.to_string().contains("CCZ gate expects exactly 3 qubits, got 4"));
    Ok(())
}

#[test]
fn test_rotation_broadcast() -> Result<(), QubeError> {
    let mut circuit = Circuit::new(3)?;
    circuit.apply_named("RY", &[TargetSpec::All], &[PI])?;
    // RY(π) maps |0⟩ to |1⟩ on every qubit
    assert!((circuit.probabilities()[0b111] - 1.0).abs() < TOL);
    assert!(circuit.is_normalized());
    Ok(())
}

#[test]
fn test_target_resolution_examples() -> Result<(), QubeError> {
    assert_eq!(resolve_targets(&TargetSpec::AllToTarget(2), 4)?.indices(), &[0, 1, 3, 2]);
    assert_eq!(resolve_targets(&TargetSpec::Range { start: 1, end: 3 }, 5)?.indices(), &[1, 2, 3]);
    assert_eq!(resolve_targets(&TargetSpec::All, 3)?.indices(), &[0, 1, 2]);
    Ok(())
}

#[test]
fn test_joint_measurement_bell_statistics() -> Result<(), QubeError> {
    let mut circuit = seeded_simulator(20240601).create_circuit(2)?;
    circuit.h(0)?.cnot(0, 1)?;

    let shots = 10_000;
    let mut zeros = 0;
    for _ in 0..shots {
        let bits = circuit.sample_joint(&[0, 1])?;
        assert!(bits == [0, 0] || bits == [1, 1], "uncorrelated outcome {:?}", bits);
        if bits[0] == 0 {
            zeros += 1;
        }
    }
    let freq = zeros as f64 / shots as f64;
    // 5 sigma for p = 0.5, n = 10_000 is 0.025
    assert!((freq - 0.5).abs() < 0.025, "frequency of [0, 0] was {}", freq);
    Ok(())
}

#[test]
fn test_joint_measurement_request_order() -> Result<(), QubeError> {
    let mut circuit = Circuit::new(3)?;
    circuit.x(2)?;
    assert_eq!(circuit.measure_joint(&[2, 0, 1])?, vec![1, 0, 0]);
    assert_eq!(circuit.measure_joint(&[0, 2])?, vec![0, 1]);
    Ok(())
}

#[test]
fn test_collapsing_joint_measurement_is_repeatable() -> Result<(), QubeError> {
    let mut circuit = seeded_simulator(8).create_circuit(3)?;
    circuit.apply_named("H", &[TargetSpec::All], &[])?;
    let first = circuit.measure_joint(&[0, 1, 2])?;
    for _ in 0..10 {
        assert_eq!(circuit.measure_joint(&[0, 1, 2])?, first);
    }
    Ok(())
}

#[test]
fn test_reuse_rejection() -> Result<(), QubeError> {
    let mut rng = StdRng::seed_from_u64(99);
    let mut value = QuantumState::from_notation("|+⟩")?;
    let bit = measure_standalone(&mut value, 0, &mut rng)?;
    assert!(bit <= 1);
    assert!(matches!(measure_standalone(&mut value, 0, &mut rng), Err(QubeError::Reuse { .. })));
    assert!(matches!(value.apply(&Gate::H(0)), Err(QubeError::Reuse { .. })));
    Ok(())
}

#[test]
fn test_bounds_rejection() -> Result<(), QubeError> {
    let mut sim = Simulator::default();
    assert!(matches!(sim.create_circuit(0), Err(QubeError::Range { .. })));
    assert!(matches!(sim.create_circuit(21), Err(QubeError::Range { .. })));

    let mut circuit = sim.create_circuit(3)?;
    assert!(matches!(circuit.h(3), Err(QubeError::Range { .. })));
    assert!(matches!(
        circuit.apply_named("X", &[TargetSpec::Single(7)], &[]),
        Err(QubeError::Range { .. })
    ));
    assert!(matches!(circuit.cnot(0, 5), Err(QubeError::Range { .. })));
    assert_eq!(circuit.depth(), 0);
    Ok(())
}

#[test]
fn test_tensor_product_then_fidelity() -> Result<(), QubeError> {
    let zero = QuantumState::from_notation("|0⟩")?;
    let one = QuantumState::from_notation("|1⟩")?;
    let combined = one.tensor_product(&zero)?;
    let expected = QuantumState::from_notation("|10⟩")?;
    assert!((qube::fidelity(&combined, &expected)? - 1.0).abs() < TOL);
    Ok(())
}

#[test]
fn test_ghz_matches_preset() -> Result<(), QubeError> {
    let mut circuit = Circuit::new(3)?;
    circuit.h(0)?.cnot(0, 1)?.cnot(1, 2)?;
    let ghz = QuantumState::from_notation("|GHZ⟩")?;
    assert!((qube::fidelity(circuit.state(), &ghz)? - 1.0).abs() < TOL);
    Ok(())
}
