use criterion::*;

use qsynth::decompose::two_level_synthesize;
use qsynth::optimizer::full_optimize;
use qsynth::prelude::*;
use qsynth::zx::{extraction_loop, ExtractConfig};

/// A CNOT ladder across `n_qubits`, giving `full_optimize` a rotation
/// block worth merging and a Clifford tail worth collapsing.
fn ladder_container(n_qubits: usize) -> TableauContainer {
    let mut container = TableauContainer::new(n_qubits);
    let mut rotations = Vec::new();
    for layer in 0..2 {
        for q in 0..n_qubits {
            let paulis: Vec<Pauli> = (0..n_qubits)
                .map(|i| if i == q || i == (q + 1) % n_qubits { Pauli::Z } else { Pauli::I })
                .collect();
            let sign = layer % 2 == 0;
            rotations.push(PauliRotation::new(PauliProduct::from_paulis(&paulis, sign), Phase::new(1, 4)));
        }
    }
    container.push_back(Subtableau::Rotations(rotations));
    container
}

fn bench_full_optimize(c: &mut Criterion) {
    for n_qubits in [4, 8, 16] {
        c.bench_function(&format!("full_optimize_n{n_qubits}"), |b| {
            b.iter_batched(|| ladder_container(black_box(n_qubits)), |mut container| full_optimize(black_box(&mut container)), BatchSize::SmallInput)
        });
    }
}

fn identity_matrix(n_qubits: usize) -> Vec<Vec<num_complex::Complex64>> {
    let dim = 1usize << n_qubits;
    let (zero, one) = (num_complex::Complex64::new(0.0, 0.0), num_complex::Complex64::new(1.0, 0.0));
    (0..dim).map(|i| (0..dim).map(|j| if i == j { one } else { zero }).collect()).collect()
}

fn bench_two_level_synthesize(c: &mut Criterion) {
    for n_qubits in [1, 2, 3] {
        let matrix = identity_matrix(n_qubits);
        c.bench_function(&format!("two_level_synthesize_n{n_qubits}"), |b| b.iter(|| two_level_synthesize(black_box(&matrix)).unwrap()));
    }
}

/// The canonical two-qubit CX diagram, already in extraction-frontier
/// normal form (same shape as `io::zx_text`'s round-trip fixture).
fn cx_diagram() -> ZxGraph {
    let mut g = ZxGraph::new();
    let i0 = g.add_boundary(0, 0, true);
    let i1 = g.add_boundary(1, 0, true);
    let o0 = g.add_boundary(0, 1, false);
    let o1 = g.add_boundary(1, 1, false);
    let z = g.add_spider(qsynth::zx::VertexType::Z, Phase::zero());
    let x = g.add_spider(qsynth::zx::VertexType::X, Phase::zero());
    g.add_edge(i0, z, qsynth::zx::EdgeType::Simple).unwrap();
    g.add_edge(z, o0, qsynth::zx::EdgeType::Simple).unwrap();
    g.add_edge(i1, x, qsynth::zx::EdgeType::Simple).unwrap();
    g.add_edge(x, o1, qsynth::zx::EdgeType::Simple).unwrap();
    g.add_edge(z, x, qsynth::zx::EdgeType::Hadamard).unwrap();
    g
}

fn bench_extraction_loop(c: &mut Criterion) {
    let config = ExtractConfig::default();
    c.bench_function("extraction_loop_cx", |b| {
        b.iter_batched(cx_diagram, |mut g| extraction_loop(black_box(&mut g), &config, 1_000).unwrap(), BatchSize::SmallInput)
    });
}

criterion_group!(benches, bench_full_optimize, bench_two_level_synthesize, bench_extraction_loop);
criterion_main!(benches);
