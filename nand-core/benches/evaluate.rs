//! Benchmarks for batch evaluation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nand_core::{Circuit, EvalContext, GateId, Signal};

/// Build a chain of inverters fed by one signal.
fn build_chain(depth: usize) -> (Circuit, Signal, GateId) {
    let mut circuit = Circuit::new();
    let signal = Signal::new(true);

    let mut prev = circuit.create_gate(1).unwrap();
    circuit.connect_signal(&signal, prev, 0).unwrap();
    for _ in 1..depth {
        let next = circuit.create_gate(1).unwrap();
        circuit.connect_gate(prev, next, 0).unwrap();
        prev = next;
    }

    (circuit, signal, prev)
}

/// Build stacked diamonds: each layer's two gates both read the previous
/// layer's pair, so naive recursion would be exponential in `layers`.
fn build_diamonds(layers: usize) -> (Circuit, Signal, GateId) {
    let mut circuit = Circuit::new();
    let signal = Signal::new(false);

    let mut pair = [circuit.create_gate(1).unwrap(), circuit.create_gate(1).unwrap()];
    for &gate in &pair {
        circuit.connect_signal(&signal, gate, 0).unwrap();
    }

    for _ in 0..layers {
        let next = [circuit.create_gate(2).unwrap(), circuit.create_gate(2).unwrap()];
        for &gate in &next {
            circuit.connect_gate(pair[0], gate, 0).unwrap();
            circuit.connect_gate(pair[1], gate, 1).unwrap();
        }
        pair = next;
    }

    (circuit, signal, pair[0])
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    for depth in [10, 100, 1_000, 10_000] {
        let (circuit, signal, root) = build_chain(depth);
        let mut ctx = EvalContext::with_capacity(depth);
        let mut out = [false];

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                signal.toggle();
                circuit
                    .evaluate_with(&mut ctx, black_box(&[Some(root)]), &mut out)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_diamonds(c: &mut Criterion) {
    let mut group = c.benchmark_group("diamonds");

    for layers in [8, 64, 512] {
        let (circuit, _signal, root) = build_diamonds(layers);
        let mut ctx = EvalContext::with_capacity(2 * layers + 2);
        let mut out = [false];

        group.bench_with_input(BenchmarkId::from_parameter(layers), &layers, |b, _| {
            b.iter(|| {
                circuit
                    .evaluate_with(&mut ctx, black_box(&[Some(root)]), &mut out)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_wiring(c: &mut Criterion) {
    c.bench_function("rewire_fan_out_1000", |b| {
        let mut circuit = Circuit::new();
        let source = circuit.create_gate(0).unwrap();
        let other = circuit.create_gate(0).unwrap();
        let consumers: Vec<_> = (0..1_000).map(|_| circuit.create_gate(1).unwrap()).collect();

        b.iter(|| {
            for &consumer in &consumers {
                circuit.connect_gate(source, consumer, 0).unwrap();
            }
            for &consumer in &consumers {
                circuit.connect_gate(other, consumer, 0).unwrap();
            }
        })
    });
}

criterion_group!(benches, bench_chain, bench_diamonds, bench_wiring);
criterion_main!(benches);
