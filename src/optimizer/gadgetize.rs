//! H-gadgetization: replace an internal `H` that survived
//! minimization with a fresh |+> ancilla, a six-gate gadget, a mid-circuit
//! Z-measurement, and a classically-controlled `X` recorded as a
//! [`ClassicalControlTableau`].

use super::hmin::PendingGadget;
use crate::pauli::{CliffordOperator, CliffordOperatorType, PauliConjugate};
use crate::tableau::{ClassicalControlTableau, StabilizerTableau, Subtableau, TableauContainer};

/// Apply a gadget for every pending position, extending the tableau's
/// qubit count by one ancilla per gadget. `pending` positions reference
/// batch indices into `container` *before* any gadget insertion — they are
/// applied back-to-front so earlier indices stay valid.
pub fn gadgetize(container: &mut TableauContainer, pending: &[PendingGadget]) -> TableauContainer {
    let mut ancilla_base = container.n_qubits();
    let mut new_n = container.n_qubits() + pending.len();
    let mut blocks: Vec<Subtableau> = container.iter().cloned().collect();

    let mut sorted = pending.to_vec();
    sorted.sort_by(|a, b| b.batch_index.cmp(&a.batch_index));

    for gadget in sorted {
        new_n = new_n.max(ancilla_base + 1);
        let ancilla = ancilla_base;
        ancilla_base += 1;

        // S_a S_q CX(q,a) Sdg_a CX(a,q) CX(q,a)
        let six_gate = {
            let mut t = StabilizerTableau::identity(new_n);
            t.apply_op(&CliffordOperator::single(CliffordOperatorType::S, ancilla));
            t.apply_op(&CliffordOperator::single(CliffordOperatorType::S, gadget.qubit));
            t.apply_op(&CliffordOperator::double(CliffordOperatorType::Cx, gadget.qubit, ancilla));
            t.apply_op(&CliffordOperator::single(CliffordOperatorType::Sdg, ancilla));
            t.apply_op(&CliffordOperator::double(CliffordOperatorType::Cx, ancilla, gadget.qubit));
            t.apply_op(&CliffordOperator::double(CliffordOperatorType::Cx, gadget.qubit, ancilla));
            t
        };

        let classical_control =
            ClassicalControlTableau::new(ancilla, vec![CliffordOperator::single(CliffordOperatorType::X, gadget.qubit)]);

        blocks.insert(gadget.batch_index + 1, Subtableau::ClassicalControl(classical_control));
        blocks.insert(gadget.batch_index + 1, Subtableau::Clifford(six_gate));
    }

    let mut out = TableauContainer::new(new_n);
    for block in blocks {
        out.push_back(block);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gadgetize_extends_qubit_count_and_inserts_blocks() {
        let mut c = TableauContainer::new(1);
        c.push_back(Subtableau::Clifford(StabilizerTableau::identity(1)));
        let pending = vec![PendingGadget { batch_index: 0, qubit: 0 }];
        let out = gadgetize(&mut c, &pending);
        assert_eq!(out.n_qubits(), 2);
        assert_eq!(out.len(), 3);
    }
}
