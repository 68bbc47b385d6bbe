//! The circuit IR: an ordered DAG of elementary gates with per-qubit
//! predecessor/successor pointers maintained on every insertion.
//!
//! Gates in the IR are restricted to the elementary set the rest of the
//! pipeline understands (Clifford generators, `Rx`/`Ry`/`Rz`/`P` rotations).
//! Higher-level gates from the QASM subset (`ccx`, `mcx`, `mcrz`, ...) are
//! decomposed into this elementary set at import time by
//! [`crate::io::qasm`], using the two-level/SU(2) machinery in
//! [`crate::decompose`] — so nothing downstream ever needs to special-case
//! a multi-controlled gate.

mod gate;

pub use gate::GateType;

use crate::error::{Error, Result};
use crate::phase::Phase;

#[derive(Debug, Clone)]
pub struct Gate {
    pub id: usize,
    pub op: GateType,
    pub qubits: Vec<usize>,
    predecessors: Vec<Option<usize>>,
    successors: Vec<Option<usize>>,
}

impl Gate {
    pub fn is_clifford(&self) -> bool {
        self.op.is_clifford()
    }
}

#[derive(Debug, Clone)]
pub struct Circuit {
    n_qubits: usize,
    gates: Vec<Gate>,
    qubit_frontier: Vec<Option<usize>>,
}

impl Circuit {
    pub fn new(n_qubits: usize) -> Self {
        Circuit { n_qubits, gates: Vec::new(), qubit_frontier: vec![None; n_qubits] }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate(&self, id: usize) -> &Gate {
        &self.gates[id]
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Append a gate, wiring per-qubit predecessor/successor pointers to
    /// whatever last touched each of its qubits.
    pub fn add_gate(&mut self, op: GateType, qubits: Vec<usize>) -> Result<usize> {
        for &q in &qubits {
            if q >= self.n_qubits {
                return Err(Error::OutOfRange(format!("qubit {q} out of range for {}-qubit circuit", self.n_qubits)));
            }
        }
        let id = self.gates.len();
        let predecessors: Vec<Option<usize>> = qubits.iter().map(|&q| self.qubit_frontier[q]).collect();
        for &q in &qubits {
            if let Some(prev) = self.qubit_frontier[q] {
                let idx = self.qubit_index(prev, q);
                self.gates[prev].successors[idx] = Some(id);
            }
            self.qubit_frontier[q] = Some(id);
        }
        self.gates.push(Gate { id, op, qubits: qubits.clone(), predecessors, successors: vec![None; qubits.len()] });
        Ok(id)
    }

    fn qubit_index(&self, gate_id: usize, qubit: usize) -> usize {
        self.gates[gate_id].qubits.iter().position(|&q| q == qubit).expect("qubit must belong to gate")
    }

    pub fn predecessor(&self, gate_id: usize, qubit: usize) -> Option<usize> {
        let idx = self.qubit_index(gate_id, qubit);
        self.gates[gate_id].predecessors[idx]
    }

    pub fn successor(&self, gate_id: usize, qubit: usize) -> Option<usize> {
        let idx = self.qubit_index(gate_id, qubit);
        self.gates[gate_id].successors[idx]
    }

    pub fn h(&mut self, q: usize) -> Result<usize> {
        self.add_gate(GateType::H, vec![q])
    }
    pub fn x(&mut self, q: usize) -> Result<usize> {
        self.add_gate(GateType::X, vec![q])
    }
    pub fn y(&mut self, q: usize) -> Result<usize> {
        self.add_gate(GateType::Y, vec![q])
    }
    pub fn z(&mut self, q: usize) -> Result<usize> {
        self.add_gate(GateType::Z, vec![q])
    }
    pub fn s(&mut self, q: usize) -> Result<usize> {
        self.add_gate(GateType::S, vec![q])
    }
    pub fn sdg(&mut self, q: usize) -> Result<usize> {
        self.add_gate(GateType::Sdg, vec![q])
    }
    pub fn v(&mut self, q: usize) -> Result<usize> {
        self.add_gate(GateType::V, vec![q])
    }
    pub fn vdg(&mut self, q: usize) -> Result<usize> {
        self.add_gate(GateType::Vdg, vec![q])
    }
    pub fn t(&mut self, q: usize) -> Result<usize> {
        self.add_gate(GateType::Rz(Phase::new(1, 4)), vec![q])
    }
    pub fn tdg(&mut self, q: usize) -> Result<usize> {
        self.add_gate(GateType::Rz(Phase::new(-1, 4)), vec![q])
    }
    pub fn rx(&mut self, q: usize, theta: Phase) -> Result<usize> {
        self.add_gate(GateType::Rx(theta), vec![q])
    }
    pub fn ry(&mut self, q: usize, theta: Phase) -> Result<usize> {
        self.add_gate(GateType::Ry(theta), vec![q])
    }
    pub fn rz(&mut self, q: usize, theta: Phase) -> Result<usize> {
        self.add_gate(GateType::Rz(theta), vec![q])
    }
    pub fn p(&mut self, q: usize, theta: Phase) -> Result<usize> {
        self.add_gate(GateType::P(theta), vec![q])
    }
    pub fn cx(&mut self, control: usize, target: usize) -> Result<usize> {
        self.add_gate(GateType::Cx, vec![control, target])
    }
    pub fn cz(&mut self, control: usize, target: usize) -> Result<usize> {
        self.add_gate(GateType::Cz, vec![control, target])
    }
    pub fn swap(&mut self, a: usize, b: usize) -> Result<usize> {
        self.add_gate(GateType::Swap, vec![a, b])
    }

    /// The sequence, adjoint: reverse gate order and invert each op.
    pub fn adjoint(&self) -> Circuit {
        let mut out = Circuit::new(self.n_qubits);
        for gate in self.gates.iter().rev() {
            let (op, qubits) = gate.op.adjoint_with_qubits(&gate.qubits);
            out.add_gate(op, qubits).expect("adjoint of a valid circuit is valid");
        }
        out
    }

    /// Concatenate `other` after `self` (same qubit count required).
    pub fn append(&mut self, other: &Circuit) -> Result<()> {
        if other.n_qubits != self.n_qubits {
            return Err(Error::Semantics("qubit count mismatch in circuit append".to_string()));
        }
        for gate in &other.gates {
            self.add_gate(gate.op.clone(), gate.qubits.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predecessor_successor_pointers_track_insertion() {
        let mut c = Circuit::new(2);
        let g0 = c.h(0).unwrap();
        let g1 = c.cx(0, 1).unwrap();
        assert_eq!(c.predecessor(g1, 0), Some(g0));
        assert_eq!(c.predecessor(g1, 1), None);
        assert_eq!(c.successor(g0, 0), Some(g1));
    }

    #[test]
    fn adjoint_reverses_order_and_inverts_ops() {
        let mut c = Circuit::new(1);
        c.h(0).unwrap();
        c.s(0).unwrap();
        let adj = c.adjoint();
        assert_eq!(adj.len(), 2);
        assert!(matches!(adj.gate(0).op, GateType::Sdg));
        assert!(matches!(adj.gate(1).op, GateType::H));
    }

    #[test]
    fn empty_circuit_has_zero_gates() {
        let c = Circuit::new(3);
        assert!(c.is_empty());
    }

    #[test]
    fn out_of_range_qubit_is_rejected() {
        let mut c = Circuit::new(1);
        assert!(c.h(5).is_err());
    }
}
