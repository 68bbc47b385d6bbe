//! The QC format: one gate per line, `<gate>
//! <qubit>...[, <qubit>...]`, controls listed before the target for
//! multi-controlled gates. Pared to the same elementary-plus-multi-controlled gate
//! list as [`super::qasm`].
//!
//! Qubits are referenced by bare index (`q0`, `q1`, ...) rather than
//! QASM's `q[n]` register syntax.

use crate::circuit::Circuit;
use crate::decompose::su2::{multi_controlled_u, multi_controlled_x};
use crate::error::{Error, Result};
use crate::phase::Phase;

use super::qasm_shared::{rx_matrix, ry_matrix, rz_matrix, z_matrix};

fn parse_qubit(token: &str) -> Result<usize> {
    let inner = token.strip_prefix('q').ok_or_else(|| Error::Parse(format!("bad qubit token {token:?}")))?;
    inner.parse().map_err(|_| Error::Parse(format!("bad qubit index in {token:?}")))
}

struct Statement<'a> {
    name: &'a str,
    param: Option<Phase>,
    qubits: Vec<usize>,
}

fn parse_statement(line: &str) -> Result<Statement<'_>> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next().ok_or_else(|| Error::Parse("empty line".to_string()))?;

    let (name, param) = match name.split_once('(') {
        Some((head, rest)) => {
            let rest = rest.strip_suffix(')').ok_or_else(|| Error::Parse(format!("unclosed parameter list in {name:?}")))?;
            (head, Some(Phase::from_string(rest)?))
        }
        None => (name, None),
    };

    let qubits = tokens.map(parse_qubit).collect::<Result<Vec<_>>>()?;
    Ok(Statement { name, param, qubits })
}

/// Parse a `.qc` document. The qubit count is taken to be one more than
/// the highest qubit index referenced anywhere in the file.
pub fn parse(text: &str) -> Result<Circuit> {
    let mut statements = Vec::new();
    let mut max_qubit = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let stmt = parse_statement(line)?;
        for &q in &stmt.qubits {
            max_qubit = Some(max_qubit.map_or(q, |m: usize| m.max(q)));
        }
        statements.push(stmt);
    }

    let n_qubits = max_qubit.map_or(0, |m| m + 1);
    let mut circuit = Circuit::new(n_qubits);
    for stmt in &statements {
        apply_statement(&mut circuit, stmt)?;
    }
    Ok(circuit)
}

fn apply_statement(circuit: &mut Circuit, stmt: &Statement) -> Result<()> {
    let q = &stmt.qubits;
    match stmt.name {
        "h" => circuit.h(q[0]).map(|_| ()),
        "x" => circuit.x(q[0]).map(|_| ()),
        "y" => circuit.y(q[0]).map(|_| ()),
        "z" => circuit.z(q[0]).map(|_| ()),
        "s" => circuit.s(q[0]).map(|_| ()),
        "sdg" => circuit.sdg(q[0]).map(|_| ()),
        "t" => circuit.t(q[0]).map(|_| ()),
        "tdg" => circuit.tdg(q[0]).map(|_| ()),
        "rx" => circuit.rx(q[0], require_param(stmt)?).map(|_| ()),
        "ry" => circuit.ry(q[0], require_param(stmt)?).map(|_| ()),
        "rz" => circuit.rz(q[0], require_param(stmt)?).map(|_| ()),
        "p" => circuit.p(q[0], require_param(stmt)?).map(|_| ()),
        "cx" => circuit.cx(q[0], q[1]).map(|_| ()),
        "cz" => circuit.cz(q[0], q[1]).map(|_| ()),
        "swap" => circuit.swap(q[0], q[1]).map(|_| ()),
        "ccx" | "mcx" => {
            let (controls, target) = q.split_at(q.len() - 1);
            multi_controlled_x(circuit, controls, target[0])
        }
        "ccz" | "mcz" => {
            let (controls, target) = q.split_at(q.len() - 1);
            multi_controlled_u(circuit, controls, target[0], &z_matrix())
        }
        "mcrz" => {
            let theta = require_param(stmt)?;
            let (controls, target) = q.split_at(q.len() - 1);
            multi_controlled_u(circuit, controls, target[0], &rz_matrix(theta))
        }
        "mcrx" => {
            let theta = require_param(stmt)?;
            let (controls, target) = q.split_at(q.len() - 1);
            multi_controlled_u(circuit, controls, target[0], &rx_matrix(theta))
        }
        "mcry" => {
            let theta = require_param(stmt)?;
            let (controls, target) = q.split_at(q.len() - 1);
            multi_controlled_u(circuit, controls, target[0], &ry_matrix(theta))
        }
        other => Err(Error::Unsupported(format!("unrecognized gate {other:?}"))),
    }
}

fn require_param(stmt: &Statement) -> Result<Phase> {
    stmt.param.ok_or_else(|| Error::Parse(format!("gate {} requires a phase parameter", stmt.name)))
}

/// Emit the elementary-gate circuit back into `.qc` form.
pub fn write(circuit: &Circuit) -> String {
    use crate::circuit::GateType::*;

    let mut out = String::new();
    for gate in circuit.gates() {
        let line = match &gate.op {
            H => format!("h q{}", gate.qubits[0]),
            X => format!("x q{}", gate.qubits[0]),
            Y => format!("y q{}", gate.qubits[0]),
            Z => format!("z q{}", gate.qubits[0]),
            S => format!("s q{}", gate.qubits[0]),
            Sdg => format!("sdg q{}", gate.qubits[0]),
            V => format!("v q{}", gate.qubits[0]),
            Vdg => format!("vdg q{}", gate.qubits[0]),
            Rx(theta) => format!("rx({theta}) q{}", gate.qubits[0]),
            Ry(theta) => format!("ry({theta}) q{}", gate.qubits[0]),
            Rz(theta) => format!("rz({theta}) q{}", gate.qubits[0]),
            P(theta) => format!("p({theta}) q{}", gate.qubits[0]),
            Cx => format!("cx q{} q{}", gate.qubits[0], gate.qubits[1]),
            Cz => format!("cz q{} q{}", gate.qubits[0], gate.qubits[1]),
            Swap => format!("swap q{} q{}", gate.qubits[0], gate.qubits[1]),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::tensor;
    use num_complex::Complex64;

    #[test]
    fn parses_a_bell_pair_program() {
        let text = "h q0\ncx q0 q1\n";
        let circuit = parse(text).unwrap();
        assert_eq!(circuit.n_qubits(), 2);
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn mcx_lowers_to_a_toffoli_equivalent_statevector() {
        let text = "x q0\nx q1\nmcx q0 q1 q2\n";
        let circuit = parse(text).unwrap();
        let state = tensor::simulate(&circuit).unwrap();
        assert!((state[0b111] - Complex64::new(1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn write_then_parse_round_trips_a_clifford_circuit() {
        let mut circuit = Circuit::new(2);
        circuit.h(0).unwrap();
        circuit.cx(0, 1).unwrap();
        let text = write(&circuit);
        let reparsed = parse(&text).unwrap();
        assert_eq!(reparsed.len(), circuit.len());
    }

    #[test]
    fn unknown_gate_is_rejected() {
        assert!(parse("bogus q0\n").is_err());
    }
}
