//! Builds a Bell pair, draws it, and compares joint sampling with a run.
//!
//! `RUST_LOG=qube=debug cargo run --example bell` shows every gate and
//! measurement as it happens.

use qube::{QubeError, Simulator, SimulatorConfig};

fn main() -> Result<(), QubeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "qube=info".into()),
        )
        .with_target(false)
        .init();

    let mut simulator = Simulator::new(SimulatorConfig { seed: Some(7), ..SimulatorConfig::default() });
    let mut circuit = simulator.create_circuit(2)?;
    circuit.h(0)?.cnot(0, 1)?;
    circuit.queue_measure_all();

    println!("{}", circuit.draw());
    println!("State: {}\n", circuit.state());

    let shots = 1000;
    let mut counts = [0usize; 4];
    for _ in 0..shots {
        let bits = circuit.sample_joint(&[0, 1])?;
        counts[((bits[1] as usize) << 1) | bits[0] as usize] += 1;
    }
    println!("Joint sampling over {} shots (q1 q0):", shots);
    for (index, count) in counts.iter().enumerate() {
        println!("  |{}⟩: {}", qube::core::state::basis_label(index, 2), count);
    }

    let result = simulator.run(&mut circuit)?;
    println!("\n{}", result);
    Ok(())
}
