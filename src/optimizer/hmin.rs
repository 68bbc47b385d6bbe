//! Internal-Hadamard minimization (Vandaele et al.): after
//! `collapse`, walk the rotation batches once carrying a *context* tableau
//! (the product of every Clifford block still to come) and look for an
//! already-present diagonal Pauli equivalent to each rotation before paying
//! for a basis-change `H`.

use crate::pauli::{rotation_clifford_ops, PauliConjugate, PauliRotation};
use crate::tableau::{self, Strategy, StabilizerTableau, Subtableau, TableauContainer};

/// A rotation batch position whose basis change could not be avoided and
/// still needs an `H`-gadget (`(batch_index, qubit)`), consumed by
/// [`gadgetize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingGadget {
    pub batch_index: usize,
    pub qubit: usize,
}

/// Returns the positions where a basis-change `H` could not be elided by
/// finding an equivalent diagonal Pauli already present in the context.
pub fn minimize_internal_hadamards(container: &TableauContainer) -> Vec<PendingGadget> {
    let n = container.n_qubits();
    let blocks: Vec<&Subtableau> = container.iter().collect();

    // context_after[i] = product of every Clifford block at index >= i.
    let mut context_after = vec![StabilizerTableau::identity(n); blocks.len() + 1];
    for i in (0..blocks.len()).rev() {
        context_after[i] = context_after[i + 1].clone();
        if let Subtableau::Clifford(c) = blocks[i] {
            let ops = tableau::extract_clifford_operators(c.clone(), Strategy::Ag);
            context_after[i].apply_ops(&ops);
        }
    }

    let mut pending = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        let Subtableau::Rotations(rotations) = block else { continue };
        let context = &context_after[i + 1];

        for r in rotations {
            if r.is_diagonal() {
                continue;
            }
            let (ops, target) = rotation_clifford_ops(r);

            let mut conjugated = context.clone();
            conjugated.apply_ops(&ops);

            let has_equivalent_diagonal =
                (0..n).any(|q| conjugated.stabilizer(q).is_z(target) || conjugated.stabilizer(q).is_i(target));

            if !has_equivalent_diagonal {
                pending.push(PendingGadget { batch_index: i, qubit: target });
            }
        }
    }
    pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauli::PauliProduct;
    use crate::phase::Phase;

    #[test]
    fn diagonal_rotation_needs_no_gadget() {
        let mut c = TableauContainer::new(1);
        let r = PauliRotation::new(PauliProduct::from_string("Z").unwrap(), Phase::new(1, 4));
        c.push_back(Subtableau::Rotations(vec![r]));
        assert!(minimize_internal_hadamards(&c).is_empty());
    }

    #[test]
    fn non_diagonal_rotation_with_no_equivalent_needs_a_gadget() {
        let mut c = TableauContainer::new(1);
        let r = PauliRotation::new(PauliProduct::from_string("X").unwrap(), Phase::new(1, 4));
        c.push_back(Subtableau::Rotations(vec![r]));
        assert_eq!(minimize_internal_hadamards(&c).len(), 1);
    }
}
