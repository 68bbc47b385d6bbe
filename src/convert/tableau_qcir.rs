//! Conversions between the tableau representation and the circuit IR.

use crate::circuit::{Circuit, GateType};
use crate::error::{Error, Result};
use crate::pauli::{CliffordOperator, CliffordOperatorType, Pauli, PauliConjugate, PauliProduct, PauliRotation};
use crate::tableau::{extract_clifford_operators, Strategy, StabilizerTableau, Subtableau, TableauContainer};

/// Emit the elementary-gate circuit for a single Clifford operator.
fn emit_clifford_op(circuit: &mut Circuit, op: &CliffordOperator) -> Result<()> {
    use CliffordOperatorType::*;
    let (a, b) = op.qubits;
    match op.op {
        H => circuit.h(a).map(|_| ()),
        S => circuit.s(a).map(|_| ()),
        Sdg => circuit.sdg(a).map(|_| ()),
        V => circuit.v(a).map(|_| ()),
        Vdg => circuit.vdg(a).map(|_| ()),
        X => circuit.x(a).map(|_| ()),
        Y => circuit.y(a).map(|_| ()),
        Z => circuit.z(a).map(|_| ()),
        Cx => circuit.cx(a, b).map(|_| ()),
        Cz => circuit.cz(a, b).map(|_| ()),
        Swap => circuit.swap(a, b).map(|_| ()),
        Ecr => {
            circuit.cx(a, b)?;
            circuit.s(a)?;
            circuit.x(a)?;
            circuit.v(b).map(|_| ())
        }
    }
}

/// A Clifford tableau is synthesized by extracting its operator string and
/// replaying it — the tableau always models the *adjoint* of the circuit
/// that produced it, so the replayed string already undoes it correctly.
pub fn clifford_to_qcir(tableau: StabilizerTableau) -> Result<Circuit> {
    let n = tableau.n_qubits();
    let ops = extract_clifford_operators(tableau, Strategy::Ag);
    let mut circuit = Circuit::new(n);
    for op in &ops {
        emit_clifford_op(&mut circuit, op)?;
    }
    Ok(circuit)
}

/// A single Pauli rotation becomes a basis-change prefix, a `Rz` on the
/// target qubit, and the basis-change's adjoint.
pub fn rotation_to_qcir(rotation: &PauliRotation) -> Result<Circuit> {
    let n = rotation.n_qubits();
    let (ops, target) = crate::pauli::rotation_clifford_ops(rotation);
    let mut circuit = Circuit::new(n);
    for op in &ops {
        emit_clifford_op(&mut circuit, op)?;
    }
    circuit.rz(target, rotation.phase())?;
    for op in crate::pauli::adjoint_ops(&ops) {
        emit_clifford_op(&mut circuit, &op)?;
    }
    Ok(circuit)
}

/// A classically-controlled block becomes a mid-circuit measurement
/// surrogate: since the circuit IR has no measurement gate yet, the
/// controlled ops are emitted unconditionally, matching the tableau's
/// "classical control never flips in the typical case" fast path. Callers
/// that need the full conditional semantics should consult
/// [`crate::tableau::ClassicalControlTableau`] directly.
fn classical_control_to_qcir(n: usize, ops: &[CliffordOperator]) -> Result<Circuit> {
    let mut circuit = Circuit::new(n);
    for op in ops {
        emit_clifford_op(&mut circuit, op)?;
    }
    Ok(circuit)
}

/// Synthesize the whole container, block by block, into one circuit.
pub fn container_to_qcir(container: &TableauContainer) -> Result<Circuit> {
    let n = container.n_qubits();
    let mut circuit = Circuit::new(n);
    for block in container.iter() {
        let block_circuit = match block {
            Subtableau::Clifford(t) => clifford_to_qcir(t.clone())?,
            Subtableau::Rotations(rotations) => {
                let mut c = Circuit::new(n);
                for r in rotations {
                    c.append(&rotation_to_qcir(r)?)?;
                }
                c
            }
            Subtableau::ClassicalControl(cc) => classical_control_to_qcir(n, &cc.controlled_ops)?,
        };
        circuit.append(&block_circuit)?;
    }
    Ok(circuit)
}

/// Replay an elementary-gate circuit onto an identity tableau to recover
/// its Clifford part — errors if the circuit contains a non-Clifford
/// rotation, since a bare `StabilizerTableau` cannot represent one.
pub fn qcir_to_clifford(circuit: &Circuit) -> Result<StabilizerTableau> {
    let mut tableau = StabilizerTableau::identity(circuit.n_qubits());
    for gate in circuit.gates() {
        apply_gate_to_tableau(&mut tableau, gate.op.clone(), &gate.qubits)?;
    }
    Ok(tableau)
}

fn apply_gate_to_tableau(tableau: &mut StabilizerTableau, op: GateType, qubits: &[usize]) -> Result<()> {
    use GateType::*;
    match op {
        H => {
            tableau.h(qubits[0]);
        }
        X => {
            tableau.x(qubits[0]);
        }
        Y => {
            tableau.y(qubits[0]);
        }
        Z => {
            tableau.z(qubits[0]);
        }
        S => {
            tableau.s(qubits[0]);
        }
        Sdg => {
            tableau.sdg(qubits[0]);
        }
        V => {
            tableau.v(qubits[0]);
        }
        Vdg => {
            tableau.vdg(qubits[0]);
        }
        Cx => {
            tableau.cx(qubits[0], qubits[1]);
        }
        Cz => {
            tableau.cz(qubits[0], qubits[1]);
        }
        Swap => {
            tableau.swap(qubits[0], qubits[1]);
        }
        Rx(_) | Ry(_) | Rz(_) | P(_) => {
            return Err(Error::Semantics("a non-Clifford rotation cannot be folded into a StabilizerTableau".to_string()));
        }
    }
    Ok(())
}

/// Express one Clifford gate as the [`CliffordOperator`] [`crate::tableau::TableauContainer::apply`] expects.
fn clifford_op_of(op: &GateType, qubits: &[usize]) -> Option<CliffordOperator> {
    let single = |t: CliffordOperatorType| Some(CliffordOperator::single(t, qubits[0]));
    let double = |t: CliffordOperatorType| Some(CliffordOperator::double(t, qubits[0], qubits[1]));
    match op {
        GateType::H => single(CliffordOperatorType::H),
        GateType::X => single(CliffordOperatorType::X),
        GateType::Y => single(CliffordOperatorType::Y),
        GateType::Z => single(CliffordOperatorType::Z),
        GateType::S => single(CliffordOperatorType::S),
        GateType::Sdg => single(CliffordOperatorType::Sdg),
        GateType::V => single(CliffordOperatorType::V),
        GateType::Vdg => single(CliffordOperatorType::Vdg),
        GateType::Cx => double(CliffordOperatorType::Cx),
        GateType::Cz => double(CliffordOperatorType::Cz),
        GateType::Swap => double(CliffordOperatorType::Swap),
        GateType::Rx(_) | GateType::Ry(_) | GateType::Rz(_) | GateType::P(_) => None,
    }
}

/// A single-qubit `pauli` rotation on qubit `q` of an `n`-qubit register.
fn single_qubit_rotation(n: usize, q: usize, pauli: Pauli, phase: crate::phase::Phase) -> PauliRotation {
    let mut paulis = vec![Pauli::I; n];
    paulis[q] = pauli;
    PauliRotation::new(PauliProduct::from_paulis(&paulis, false), phase)
}

/// `to_tableau`: iterate gates; Clifford gates fold into
/// the trailing Clifford block; non-Clifford gates emit a new rotation
/// batch entry, expressed directly at the gate's position in the stream
/// (not pre-conjugated through surrounding Clifford blocks — that
/// commuting is the optimizer's job, not this conversion's).
pub fn qcir_to_container(circuit: &Circuit) -> Result<TableauContainer> {
    let n = circuit.n_qubits();
    let mut container = TableauContainer::new(n);
    for gate in circuit.gates() {
        if let Some(op) = clifford_op_of(&gate.op, &gate.qubits) {
            container.apply(&op);
            continue;
        }
        let q = gate.qubits[0];
        let rotation = match &gate.op {
            GateType::Rx(phase) => single_qubit_rotation(n, q, Pauli::X, *phase),
            GateType::Ry(phase) => single_qubit_rotation(n, q, Pauli::Y, *phase),
            GateType::Rz(phase) | GateType::P(phase) => single_qubit_rotation(n, q, Pauli::Z, *phase),
            _ => unreachable!("clifford_op_of already handled every other GateType variant"),
        };
        container.append_rotation(rotation);
    }
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    #[test]
    fn clifford_round_trips_through_qcir() {
        let mut t = StabilizerTableau::identity(2);
        t.h(0);
        t.cx(0, 1);
        let circuit = clifford_to_qcir(t.clone()).unwrap();
        let back = qcir_to_clifford(&circuit).unwrap();
        assert_eq!(back.to_bit_string(), t.to_bit_string());
    }

    #[test]
    fn rotation_emits_a_single_rz_on_its_target() {
        let r = PauliRotation::from_paulis(&[crate::pauli::Pauli::Z, crate::pauli::Pauli::I], Phase::new(1, 4));
        let circuit = rotation_to_qcir(&r).unwrap();
        assert!(circuit.gates().iter().any(|g| matches!(g.op, GateType::Rz(_))));
    }

    #[test]
    fn non_clifford_circuit_cannot_become_a_bare_tableau() {
        let mut c = Circuit::new(1);
        c.rz(0, Phase::new(1, 4)).unwrap();
        assert!(qcir_to_clifford(&c).is_err());
    }

    #[test]
    fn qcir_to_container_emits_one_rotation_batch_per_non_clifford_run() {
        let mut c = Circuit::new(2);
        c.t(0).unwrap();
        c.cx(0, 1).unwrap();
        c.t(1).unwrap();
        c.cx(0, 1).unwrap();

        let container = qcir_to_container(&c).unwrap();
        let blocks: Vec<_> = container.iter().collect();
        assert_eq!(blocks.len(), 4);
        assert!(matches!(blocks[0], Subtableau::Rotations(rs) if rs.len() == 1));
        assert!(matches!(blocks[1], Subtableau::Clifford(_)));
        assert!(matches!(blocks[2], Subtableau::Rotations(rs) if rs.len() == 1));
        assert!(matches!(blocks[3], Subtableau::Clifford(_)));

        let recovered = container_to_qcir(&container).unwrap();
        assert_eq!(crate::convert::is_equivalent(&c, &recovered).unwrap(), crate::convert::Equivalence::Equivalent);
    }

    #[test]
    fn cx_survives_a_round_trip_through_the_tableau() {
        let mut original = Circuit::new(2);
        original.cx(0, 1).unwrap();

        let clifford = qcir_to_clifford(&original).unwrap();
        let recovered = clifford_to_qcir(clifford).unwrap();

        assert_eq!(crate::convert::is_equivalent(&original, &recovered).unwrap(), crate::convert::Equivalence::Equivalent);
    }
}
