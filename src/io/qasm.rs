//! OPENQASM 2.0 + `qelib1.inc` subset, input and output, via a
//! token-driven parser over a deliberately narrow gate list.
//!
//! Gates beyond the elementary set (`ccx`, `ccz`, `mcx`, `mcz`, `mcrz`,
//! `mcrx`, `mcry`, `sx`) are lowered into `H/X/Y/Z/S/Sdg/V/Vdg/Cx/Cz/Swap/
//! Rx/Ry/Rz/P` at parse time via [`crate::decompose::su2`], so nothing
//! downstream ever sees a multi-controlled gate.

use crate::circuit::Circuit;
use crate::decompose::su2::{multi_controlled_u, multi_controlled_x, single_qubit_unitary};
use crate::error::{Error, Result};
use crate::phase::Phase;

use super::qasm_shared::{rx_matrix, ry_matrix, rz_matrix, sx_matrix, z_matrix};

struct Statement<'a> {
    name: &'a str,
    param: Option<&'a str>,
    qubits: Vec<usize>,
}

fn parse_qubit_ref(token: &str) -> Result<usize> {
    let token = token.trim();
    let inner = token.strip_prefix("q[").and_then(|t| t.strip_suffix(']')).ok_or_else(|| Error::Parse(format!("bad qubit reference {token:?}")))?;
    inner.parse().map_err(|_| Error::Parse(format!("bad qubit index in {token:?}")))
}

fn parse_statement(stmt: &str) -> Result<Statement<'_>> {
    let stmt = stmt.trim();
    let (head, args) = stmt.split_once(|c: char| c.is_whitespace()).ok_or_else(|| Error::Parse(format!("malformed statement {stmt:?}")))?;

    let (name, param) = match head.split_once('(') {
        Some((name, rest)) => {
            let rest = rest.strip_suffix(')').ok_or_else(|| Error::Parse(format!("unclosed parameter list in {head:?}")))?;
            (name, Some(rest))
        }
        None => (head, None),
    };

    let qubits = args.split(',').map(parse_qubit_ref).collect::<Result<Vec<_>>>()?;
    Ok(Statement { name, param, qubits })
}

fn phase_param(stmt: &Statement) -> Result<Phase> {
    let raw = stmt.param.ok_or_else(|| Error::Parse(format!("gate {} requires a phase parameter", stmt.name)))?;
    Phase::from_string(raw)
}

/// Parse a QASM document's `qreg`/gate statements into a circuit. Skips
/// `OPENQASM`/`include`/comment lines; requires exactly one `qreg`.
pub fn parse(text: &str) -> Result<Circuit> {
    let mut n_qubits = None;
    let mut circuit = None;

    for raw_stmt in text.split(';') {
        let stmt = raw_stmt.trim();
        if stmt.is_empty() || stmt.starts_with("//") || stmt.starts_with("OPENQASM") || stmt.starts_with("include") {
            continue;
        }
        if let Some(rest) = stmt.strip_prefix("qreg") {
            let rest = rest.trim();
            let inner = rest.strip_prefix("q[").and_then(|t| t.strip_suffix(']')).ok_or_else(|| Error::Parse(format!("malformed qreg declaration {stmt:?}")))?;
            let n: usize = inner.parse().map_err(|_| Error::Parse(format!("bad qreg size in {stmt:?}")))?;
            n_qubits = Some(n);
            circuit = Some(Circuit::new(n));
            continue;
        }

        let circuit = circuit.as_mut().ok_or_else(|| Error::Parse("gate statement before qreg declaration".to_string()))?;
        let parsed = parse_statement(stmt)?;
        apply_statement(circuit, &parsed)?;
    }

    circuit.ok_or_else(|| Error::Parse("document has no qreg declaration".to_string()))
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
        "sx" => single_qubit_unitary(circuit, q[0], &sx_matrix()),
        "rx" => circuit.rx(q[0], phase_param(stmt)?).map(|_| ()),
        "ry" => circuit.ry(q[0], phase_param(stmt)?).map(|_| ()),
        "rz" => circuit.rz(q[0], phase_param(stmt)?).map(|_| ()),
        "p" => circuit.p(q[0], phase_param(stmt)?).map(|_| ()),
        "cx" => circuit.cx(q[0], q[1]).map(|_| ()),
        "cz" => circuit.cz(q[0], q[1]).map(|_| ()),
        "swap" => circuit.swap(q[0], q[1]).map(|_| ()),
        "ccx" => multi_controlled_x(circuit, &q[..2], q[2]),
        "ccz" => multi_controlled_u(circuit, &q[..2], q[2], &z_matrix()),
        "mcx" => {
            let (controls, target) = q.split_at(q.len() - 1);
            multi_controlled_x(circuit, controls, target[0])
        }
        "mcz" => {
            let (controls, target) = q.split_at(q.len() - 1);
            multi_controlled_u(circuit, controls, target[0], &z_matrix())
        }
        "mcrz" => {
            let theta = phase_param(stmt)?;
            let (controls, target) = q.split_at(q.len() - 1);
            multi_controlled_u(circuit, controls, target[0], &rz_matrix(theta))
        }
        "mcrx" => {
            let theta = phase_param(stmt)?;
            let (controls, target) = q.split_at(q.len() - 1);
            multi_controlled_u(circuit, controls, target[0], &rx_matrix(theta))
        }
        "mcry" => {
            let theta = phase_param(stmt)?;
            let (controls, target) = q.split_at(q.len() - 1);
            multi_controlled_u(circuit, controls, target[0], &ry_matrix(theta))
        }
        other => Err(Error::Unsupported(format!("unrecognized gate {other:?}"))),
    }
}

/// Emit the elementary-gate circuit back into the same QASM subset.
pub fn write(circuit: &Circuit) -> String {
    use crate::circuit::GateType::*;

    let mut out = String::new();
    out.push_str("OPENQASM 2.0;\n");
    out.push_str("include \"qelib1.inc\";\n");
    out.push_str(&format!("qreg q[{}];\n", circuit.n_qubits()));

    for gate in circuit.gates() {
        let line = match &gate.op {
            H => format!("h q[{}];", gate.qubits[0]),
            X => format!("x q[{}];", gate.qubits[0]),
            Y => format!("y q[{}];", gate.qubits[0]),
            Z => format!("z q[{}];", gate.qubits[0]),
            S => format!("s q[{}];", gate.qubits[0]),
            Sdg => format!("sdg q[{}];", gate.qubits[0]),
            V => format!("sx q[{}];", gate.qubits[0]),
            Vdg => format!("sxdg q[{}];", gate.qubits[0]),
            Rx(theta) => format!("rx({theta}) q[{}];", gate.qubits[0]),
            Ry(theta) => format!("ry({theta}) q[{}];", gate.qubits[0]),
            Rz(theta) => format!("rz({theta}) q[{}];", gate.qubits[0]),
            P(theta) => format!("p({theta}) q[{}];", gate.qubits[0]),
            Cx => format!("cx q[{}],q[{}];", gate.qubits[0], gate.qubits[1]),
            Cz => format!("cz q[{}],q[{}];", gate.qubits[0], gate.qubits[1]),
            Swap => format!("swap q[{}],q[{}];", gate.qubits[0], gate.qubits[1]),
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
        let text = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[2];\nh q[0];\ncx q[0],q[1];\n";
        let circuit = parse(text).unwrap();
        assert_eq!(circuit.n_qubits(), 2);
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn ccx_lowers_to_a_toffoli_equivalent_statevector() {
        let text = "OPENQASM 2.0;\nqreg q[3];\nx q[0];\nx q[1];\nccx q[0],q[1],q[2];\n";
        let circuit = parse(text).unwrap();
        let state = tensor::simulate(&circuit).unwrap();
        assert!((state[0b111] - Complex64::new(1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn unknown_gate_is_rejected() {
        let text = "OPENQASM 2.0;\nqreg q[1];\nbogus q[0];\n";
        assert!(parse(text).is_err());
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
}
