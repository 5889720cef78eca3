//! # Gate Application Benchmarks
//!
//! Strided single-qubit updates, permutation CNOT, the phase-flip CZ family
//! and joint sampling across register widths.
//!
//! Run: `cargo bench --bench apply`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qube::gates::library::{hadamard, rotation_y};
use qube::simulation::embedding::{apply_cnot, apply_controlled_z, apply_single_qubit};
use qube::{Circuit, QuantumState, SimulatorConfig};

const WIDTHS: [usize; 4] = [4, 10, 14, 18];

fn seeded(n: usize) -> Circuit {
    Circuit::with_config(n, SimulatorConfig { seed: Some(1), ..SimulatorConfig::default() }).unwrap()
}

// Gates go straight to the state so the circuit's gate log stays out of
// the measurement.
fn bench_single_qubit(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit");
    let h = hadamard();
    let ry = rotation_y(0.3);
    for n in WIDTHS {
        let mut state = QuantumState::zero(n).unwrap();
        group.bench_with_input(BenchmarkId::new("h_top_qubit", n), &n, |b, &n| {
            b.iter(|| apply_single_qubit(&mut state, black_box(n - 1), &h).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("ry_qubit0", n), &n, |b, _| {
            b.iter(|| apply_single_qubit(&mut state, black_box(0), &ry).unwrap())
        });
    }
    group.finish();
}

fn bench_controlled(c: &mut Criterion) {
    let mut group = c.benchmark_group("controlled");
    for n in WIDTHS {
        let mut state = QuantumState::zero(n).unwrap();
        apply_single_qubit(&mut state, 0, &hadamard()).unwrap();
        let all: Vec<usize> = (0..n).collect();
        group.bench_with_input(BenchmarkId::new("cnot", n), &n, |b, &n| {
            b.iter(|| apply_cnot(&mut state, 0, black_box(n - 1)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("cz_all", n), &n, |b, _| {
            b.iter(|| apply_controlled_z(&mut state, black_box(&all)).unwrap())
        });
    }
    group.finish();
}

fn bench_joint_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_joint");
    for n in WIDTHS {
        let mut circuit = seeded(n);
        for q in 0..n {
            circuit.h(q).unwrap();
        }
        let all: Vec<usize> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| circuit.sample_joint(black_box(&all)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_qubit, bench_controlled, bench_joint_sampling);
criterion_main!(benches);
