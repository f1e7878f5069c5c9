use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use varq_core::operators::{Hamiltonian, QubitOperator};
use varq_core::{Circuit, CircuitBuilder, ParameterResolver};
use varq_sim::{SimulatorConfig, Simulator};

fn hardware_efficient(num_qubits: usize, depth: usize) -> Circuit {
    let mut b = CircuitBuilder::with_qubits(num_qubits);
    for q in 0..num_qubits {
        b.rx(q, ParameterResolver::named(format!("x{}", q)).as_encoder())
            .unwrap();
    }
    for d in 0..depth {
        for q in 0..num_qubits {
            b.ry(q, format!("w{}_{}", d, q).as_str()).unwrap();
        }
        for q in 0..num_qubits - 1 {
            b.cx(q + 1, q).unwrap();
        }
    }
    b.build()
}

fn z_on_each(num_qubits: usize) -> Vec<Hamiltonian> {
    (0..num_qubits)
        .map(|q| {
            let op = QubitOperator::from_term(&format!("Z{}", q), 1.0).unwrap();
            Hamiltonian::from_operator(op).unwrap()
        })
        .collect()
}

fn bench_adjoint_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjoint_gradient");

    for num_qubits in [4, 8, 12] {
        let depth = 3;
        let circuit = hardware_efficient(num_qubits, depth);
        let sim = Simulator::new(num_qubits).unwrap();
        let ops = sim
            .get_expectation_with_grad(z_on_each(num_qubits), &circuit, None, None, None)
            .unwrap();

        let batch: Vec<Vec<f64>> = (0..8)
            .map(|r| (0..num_qubits).map(|q| 0.1 * (r + q) as f64).collect())
            .collect();
        let weights: Vec<f64> = (0..num_qubits * depth).map(|i| 0.05 * i as f64).collect();

        group.bench_with_input(
            BenchmarkId::new("batch8", num_qubits),
            &(batch, weights),
            |b, (batch, weights)| {
                b.iter(|| ops.call_both(black_box(batch), black_box(weights)).unwrap())
            },
        );
    }
    group.finish();
}

fn bench_worker_budget(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_budget");
    let num_qubits = 10;
    let circuit = hardware_efficient(num_qubits, 2);
    let batch: Vec<Vec<f64>> = (0..16).map(|r| vec![0.01 * r as f64; num_qubits]).collect();
    let weights = vec![0.3; num_qubits * 2];

    for workers in [1, 2, 4, 8] {
        let config = SimulatorConfig::default().with_threads(workers);
        let sim = Simulator::with_config(num_qubits, config).unwrap();
        let ops = sim
            .get_expectation_with_grad(z_on_each(num_qubits), &circuit, None, None, None)
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
            b.iter(|| ops.call_both(&batch, &weights).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_adjoint_gradient, bench_worker_budget);
criterion_main!(benches);
