use criterion::*;

use qsynth::io::{qasm, qc};

const QASM_SOURCE: &str = "\
OPENQASM 2.0;
include \"qelib1.inc\";
qreg q[4];
h q[0];
cx q[0],q[1];
cx q[1],q[2];
cx q[2],q[3];
ccx q[0],q[1],q[2];
mcx q[0],q[1],q[2],q[3];
";

const QC_SOURCE: &str = "\
h q0
cx q0 q1
cx q1 q2
cx q2 q3
mcx q0 q1 q2 q3
";

fn bench_qasm_parse(c: &mut Criterion) {
    c.bench_function("qasm_parse", |b| b.iter(|| qasm::parse(black_box(QASM_SOURCE)).unwrap()));
}

fn bench_qc_parse(c: &mut Criterion) {
    c.bench_function("qc_parse", |b| b.iter(|| qc::parse(black_box(QC_SOURCE)).unwrap()));
}

fn bench_qasm_write(c: &mut Criterion) {
    let circuit = qasm::parse(QASM_SOURCE).unwrap();
    c.bench_function("qasm_write", |b| b.iter(|| qasm::write(black_box(&circuit))));
}

criterion_group!(benches, bench_qasm_parse, bench_qc_parse, bench_qasm_write);
criterion_main!(benches);
