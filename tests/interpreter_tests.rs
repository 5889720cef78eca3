// tests/interpreter_tests.rs

use qube::{
    CircuitDefinition, Interpreter, ProgramBuilder, QubeError, SimulatorConfig, Statement, TargetSpec, Value,
};

fn interpreter() -> Interpreter {
    Interpreter::new(SimulatorConfig { seed: Some(1234), ..SimulatorConfig::default() })
}

fn apply(gate: &str, targets: Vec<TargetSpec>, params: Vec<f64>) -> Statement {
    Statement::Apply { gate: gate.to_string(), targets, params }
}

fn instantiate(circuit: &str, bind: Option<&str>) -> Statement {
    Statement::Instantiate { circuit: circuit.to_string(), bind: bind.map(str::to_string) }
}

#[test]
fn test_bell_definition_measures_correlated_bits() -> Result<(), QubeError> {
    let bell = CircuitDefinition::new("bell", 2)
        .with(apply("H", vec![TargetSpec::Single(0)], vec![]))
        .with(apply("CNOT", vec![TargetSpec::Single(0), TargetSpec::Single(1)], vec![]))
        .with(Statement::QueueMeasure { targets: vec![TargetSpec::All] });
    let program = ProgramBuilder::new()
        .define(bell)
        .add_many((0..50).flat_map(|i| {
            let c = format!("c{}", i);
            let r = format!("r{}", i);
            [instantiate("bell", Some(c.as_str())), Statement::Run { var: c, bind: r }]
        }))
        .build()?;

    let mut interp = interpreter();
    interp.run(&program)?;
    for i in 0..50 {
        let bits = interp.bits(&format!("r{}", i))?;
        assert_eq!(bits.len(), 2);
        assert_eq!(bits[0], bits[1]);
    }
    Ok(())
}

#[test]
fn test_nested_instantiation_restores_outer_circuit() -> Result<(), QubeError> {
    // inner flips its only qubit; outer applies X to q1 before and after
    // instantiating inner, so the outer state must end with q1 = 0
    let inner = CircuitDefinition::new("inner", 1)
        .with(apply("X", vec![TargetSpec::Single(0)], vec![]))
        .with(Statement::Measure { qubit: 0, bind: "shadow".to_string() });
    let outer = CircuitDefinition::new("outer", 2)
        .with(apply("X", vec![TargetSpec::Single(1)], vec![]))
        .with(instantiate("inner", Some("nested")))
        .with(apply("X", vec![TargetSpec::Single(1)], vec![]))
        .with(Statement::MeasureJoint { targets: vec![TargetSpec::All], bind: "m".to_string() })
        .with(Statement::QueueMeasure { targets: vec![TargetSpec::All] });
    let program = ProgramBuilder::new()
        .define(inner)
        .define(outer)
        .pb_add(Statement::Prepare { bind: "shadow".to_string(), notation: "|0⟩".to_string() })
        .pb_add(instantiate("outer", Some("o")))
        .pb_add(Statement::Run { var: "o".to_string(), bind: "r".to_string() })
        .build()?;

    let mut interp = interpreter();
    interp.run(&program)?;

    let outer = interp.circuit("o")?;
    assert_eq!(outer.qubit_count(), 2);
    assert_eq!(outer.depth(), 2);
    assert_eq!(interp.bits("r")?, &[0, 0]);
    // the inner body's binding of `shadow` did not leak out
    assert!(matches!(interp.variable("shadow"), Some(Value::Qubit(_))));
    assert!(interp.variable("nested").is_none());
    Ok(())
}

#[test]
fn test_error_reports_statement_position() -> Result<(), QubeError> {
    let broken = CircuitDefinition::new("broken", 2)
        .with(apply("H", vec![TargetSpec::Single(0)], vec![]))
        .with(apply("RX", vec![TargetSpec::Single(1)], vec![]));
    let program = ProgramBuilder::new()
        .define(broken)
        .pb_add(Statement::Prepare { bind: "keep".to_string(), notation: "|1⟩".to_string() })
        .pb_add(instantiate("broken", Some("b")))
        .build()?;

    let mut interp = interpreter();
    let err = interp.run(&program).unwrap_err();
    match &err {
        QubeError::InCircuit { circuit, statement, source } => {
            assert_eq!(circuit, "broken");
            assert_eq!(*statement, 2);
            assert!(matches!(**source, QubeError::Validation { .. }));
        }
        other => panic!("expected a positioned error, got {:?}", other),
    }
    assert!(err.to_string().contains("RX gate expects 1 parameter, got 0"));
    // the failed instantiation bound nothing and left earlier bindings alone
    assert!(interp.variable("b").is_none());
    assert!(matches!(interp.variable("keep"), Some(Value::Qubit(_))));
    Ok(())
}

#[test]
fn test_nested_error_keeps_both_positions() -> Result<(), QubeError> {
    let leaf = CircuitDefinition::new("leaf", 1).with(apply("FOO", vec![TargetSpec::Single(0)], vec![]));
    let mid = CircuitDefinition::new("mid", 1)
        .with(apply("H", vec![TargetSpec::Single(0)], vec![]))
        .with(apply("H", vec![TargetSpec::Single(0)], vec![]))
        .with(instantiate("leaf", None));
    let program = ProgramBuilder::new()
        .define(leaf)
        .define(mid)
        .pb_add(instantiate("mid", None))
        .build()?;

    let err = interpreter().run(&program).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("'mid' at statement 3"));
    assert!(text.contains("'leaf' at statement 1"));
    assert_eq!(err.root_cause(), &QubeError::UnsupportedGate { name: "FOO".to_string() });
    Ok(())
}

#[test]
fn test_measurements_mark_circuit_qubits() -> Result<(), QubeError> {
    let def = CircuitDefinition::new("pattern", 3)
        .with(apply("X", vec![TargetSpec::Single(0)], vec![]))
        .with(Statement::MeasureJoint {
            targets: vec![TargetSpec::SourceToAll(0)],
            bind: "bits".to_string(),
        })
        .with(Statement::Measure { qubit: 1, bind: "one".to_string() });
    let program = ProgramBuilder::new()
        .define(def)
        .pb_add(instantiate("pattern", Some("p")))
        .build()?;

    let mut interp = interpreter();
    interp.run(&program)?;
    let circuit = interp.circuit("p")?;
    assert_eq!(circuit.measured_qubits().iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert!((circuit.probability_of(0, 1)? - 1.0).abs() < 1e-10);
    Ok(())
}

#[test]
fn test_range_errors_inside_bodies_are_range_errors() -> Result<(), QubeError> {
    let def = CircuitDefinition::new("narrow", 2)
        .with(apply("H", vec![TargetSpec::Range { start: 0, end: 2 }], vec![]));
    let program = ProgramBuilder::new().define(def).pb_add(instantiate("narrow", None)).build()?;
    let err = interpreter().run(&program).unwrap_err();
    assert!(matches!(err.root_cause(), QubeError::Range { .. }));
    assert!(err.is_user_error());
    Ok(())
}
