//! The tableau optimizer: rotation merging, internal
//! `H` minimization, phase-polynomial term reduction, and matroid
//! partitioning for CNOT-round scheduling.

pub mod gadgetize;
pub mod hmin;
pub mod matroid;
pub mod merge;
pub mod phasepoly;

pub use gadgetize::gadgetize;
pub use hmin::{minimize_internal_hadamards, PendingGadget};
pub use matroid::{naive_greedy_partition, tpar_partition};
pub use merge::{merge_rotations, merge_rotations_into_clifford};
pub use phasepoly::{todd, tohpe};

use crate::pauli::PauliConjugate;
use crate::tableau::{Strategy, StabilizerTableau, Subtableau, TableauContainer};

/// `collapse` + `merge_rotations_into_clifford` on every rotation batch +
/// `minimize_internal_hadamards`/`gadgetize` + phase-polynomial reduction
/// on every diagonal batch — the `full_optimize` pipeline exercised by the
/// equivalence test in `convert`.
pub fn full_optimize(container: &mut TableauContainer) {
    container.collapse();

    let blocks: Vec<Subtableau> = container.iter().cloned().collect();
    let mut rebuilt = TableauContainer::new(container.n_qubits());
    let mut pending_clifford: Option<StabilizerTableau> = None;

    for block in blocks {
        match block {
            Subtableau::Clifford(mut c) => {
                if let Some(prev) = pending_clifford.take() {
                    let ops = crate::tableau::extract_clifford_operators(prev, Strategy::Ag);
                    c.apply_ops(&ops);
                }
                pending_clifford = Some(c);
            }
            Subtableau::Rotations(rotations) => {
                let mut leading = pending_clifford.take().unwrap_or_else(|| StabilizerTableau::identity(container.n_qubits()));
                let remaining = merge_rotations_into_clifford(&mut leading, &rotations);
                rebuilt.push_back(Subtableau::Clifford(leading));

                if !remaining.is_empty() {
                    let diagonal = remaining.iter().all(|r| r.is_diagonal());
                    let reduced = if diagonal { todd(&remaining) } else { remaining };
                    rebuilt.push_back(Subtableau::Rotations(reduced));
                }
            }
            other @ Subtableau::ClassicalControl(_) => rebuilt.push_back(other),
        }
    }
    if let Some(c) = pending_clifford {
        rebuilt.push_back(Subtableau::Clifford(c));
    }

    rebuilt.collapse();
    rebuilt.remove_identities();
    *container = rebuilt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauli::{CliffordOperator, CliffordOperatorType, PauliConjugate, PauliProduct, PauliRotation};
    use crate::phase::Phase;
    use crate::tableau::StabilizerTableau;

    #[test]
    fn full_optimize_on_empty_container_is_empty() {
        let mut c = TableauContainer::new(2);
        full_optimize(&mut c);
        assert!(c.is_empty());
    }

    #[test]
    fn full_optimize_drops_a_canceling_rotation_pair() {
        let mut c = TableauContainer::new(1);
        let r = PauliRotation::new(PauliProduct::from_string("Z").unwrap(), Phase::new(1, 4));
        let r2 = PauliRotation::new(PauliProduct::from_string("Z").unwrap(), Phase::new(-1, 4));
        c.push_back(Subtableau::Rotations(vec![r, r2]));
        full_optimize(&mut c);
        assert!(c.is_empty());
    }

    #[test]
    fn full_optimize_collapses_hh_to_identity() {
        let mut c = TableauContainer::new(1);
        c.apply(&CliffordOperator::single(CliffordOperatorType::H, 0));
        c.apply(&CliffordOperator::single(CliffordOperatorType::H, 0));
        full_optimize(&mut c);
        assert!(c.is_empty());
    }
}
