//! Circuit definitions that instantiate each other, run through the
//! statement interpreter, plus what a failing body reports.

use qube::{
    CircuitDefinition, Interpreter, ProgramBuilder, QubeError, SimulatorConfig, Statement, TargetSpec,
};

fn apply(gate: &str, targets: Vec<TargetSpec>) -> Statement {
    Statement::Apply { gate: gate.to_string(), targets, params: vec![] }
}

fn main() -> Result<(), QubeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "qube=info".into()),
        )
        .init();

    let ghz = CircuitDefinition::new("ghz", 4)
        .with(apply("H", vec![TargetSpec::Single(0)]))
        .with(apply("CNOT", vec![TargetSpec::Range { start: 0, end: 1 }]))
        .with(apply("CNOT", vec![TargetSpec::Range { start: 1, end: 2 }]))
        .with(apply("CNOT", vec![TargetSpec::Range { start: 2, end: 3 }]))
        .with(Statement::QueueMeasure { targets: vec![TargetSpec::All] });
    let wrapper = CircuitDefinition::new("wrapper", 1)
        .with(apply("H", vec![TargetSpec::Single(0)]))
        .with(Statement::Instantiate { circuit: "ghz".into(), bind: Some("inner".into()) })
        .with(Statement::Measure { qubit: 0, bind: "coin".into() });

    let program = ProgramBuilder::new()
        .define(ghz)
        .define(wrapper)
        .pb_add(Statement::Instantiate { circuit: "wrapper".into(), bind: Some("w".into()) })
        .pb_add(Statement::Instantiate { circuit: "ghz".into(), bind: Some("g".into()) })
        .pb_add(Statement::Run { var: "g".into(), bind: "bits".into() })
        .build()?;
    println!("{}", program);

    let mut interpreter = Interpreter::new(SimulatorConfig { seed: Some(3), ..SimulatorConfig::default() });
    interpreter.run(&program)?;
    println!("{}", interpreter.circuit("g")?.draw());
    println!("GHZ read-out: {}", interpreter.variable("bits").map(|v| v.to_string()).unwrap_or_default());

    // CNOT over q0, q1, q0: three qubits where two are expected
    let broken = CircuitDefinition::new("broken", 2)
        .with(apply("H", vec![TargetSpec::All]))
        .with(apply("CNOT", vec![TargetSpec::All, TargetSpec::Single(0)]));
    let failing = ProgramBuilder::new()
        .define(broken)
        .pb_add(Statement::Instantiate { circuit: "broken".into(), bind: None })
        .build()?;
    if let Err(err) = interpreter.run(&failing) {
        println!("Diagnostic: {}", err);
    }
    Ok(())
}
