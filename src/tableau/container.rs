//! The tableau container: an ordered sequence of tagged subtableaux,
//! dispatched through pattern matching rather than a trait-object visitor
//! table.

use super::stabilizer::{self, Strategy, StabilizerTableau};
use crate::pauli::{adjoint_ops, CliffordOperator, CliffordOperatorString, PauliConjugate, PauliRotation};

/// An ancilla-controlled Clifford block, introduced by H-gadgetization:
/// the ops in `controlled_ops` are applied only when the mid-circuit
/// measurement of `ancilla` reads `1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassicalControlTableau {
    pub ancilla: usize,
    pub controlled_ops: CliffordOperatorString,
}

impl ClassicalControlTableau {
    pub fn new(ancilla: usize, controlled_ops: CliffordOperatorString) -> Self {
        ClassicalControlTableau { ancilla, controlled_ops }
    }

    pub fn is_identity(&self) -> bool {
        self.controlled_ops.is_empty()
    }

    /// Conjugate the controlled ops by a surrounding Clifford block's op
    /// string, as required to push this block past it (`commute_classical`).
    fn conjugate_by(&self, clifford_ops: &CliffordOperatorString) -> Self {
        let mut ops = adjoint_ops(clifford_ops);
        ops.extend(self.controlled_ops.iter().copied());
        ops.extend(clifford_ops.iter().copied());
        ClassicalControlTableau { ancilla: self.ancilla, controlled_ops: ops }
    }
}

/// One element of the tableau: a Clifford block, a batch of commuting Pauli
/// rotations, or a classically-controlled Clifford.
#[derive(Debug, Clone, PartialEq)]
pub enum Subtableau {
    Clifford(StabilizerTableau),
    Rotations(Vec<PauliRotation>),
    ClassicalControl(ClassicalControlTableau),
}

impl Subtableau {
    pub fn is_empty_or_identity(&self) -> bool {
        match self {
            Subtableau::Clifford(t) => *t == StabilizerTableau::identity(t.n_qubits()),
            Subtableau::Rotations(rs) => rs.is_empty(),
            Subtableau::ClassicalControl(c) => c.is_identity(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableauContainer {
    n_qubits: usize,
    blocks: Vec<Subtableau>,
}

impl TableauContainer {
    pub fn new(n_qubits: usize) -> Self {
        TableauContainer { n_qubits, blocks: Vec::new() }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subtableau> {
        self.blocks.iter()
    }

    pub fn push_back(&mut self, subtableau: Subtableau) {
        self.blocks.push(subtableau);
    }

    /// Apply a Clifford op: if the trailing block is already a Clifford
    /// block, fold it in; otherwise open a new one.
    pub fn apply(&mut self, op: &CliffordOperator) {
        if let Some(Subtableau::Clifford(t)) = self.blocks.last_mut() {
            t.apply_op(op);
            return;
        }
        let mut t = StabilizerTableau::identity(self.n_qubits);
        t.apply_op(op);
        self.blocks.push(Subtableau::Clifford(t));
    }

    pub fn append_rotation(&mut self, rotation: PauliRotation) {
        if let Some(Subtableau::Rotations(rs)) = self.blocks.last_mut() {
            rs.push(rotation);
            return;
        }
        self.blocks.push(Subtableau::Rotations(vec![rotation]));
    }

    /// Fuse adjacent Clifford blocks by tableau composition, and adjacent
    /// rotation batches by concatenation.
    pub fn collapse(&mut self) {
        let old = std::mem::take(&mut self.blocks);
        for block in old {
            match (self.blocks.last_mut(), block) {
                (Some(Subtableau::Clifford(prev)), Subtableau::Clifford(next)) => {
                    let ops = stabilizer::extract_clifford_operators(next, Strategy::Ag);
                    prev.apply_ops(&ops);
                }
                (Some(Subtableau::Rotations(prev)), Subtableau::Rotations(mut next)) => {
                    prev.append(&mut next);
                }
                (_, block) => self.blocks.push(block),
            }
        }
    }

    /// Drop blocks that have become the identity (empty rotation batches,
    /// identity Clifford blocks, no-op classical-control blocks).
    pub fn remove_identities(&mut self) {
        self.blocks.retain(|b| !b.is_empty_or_identity());
    }

    /// Push every classical-control block as far right as it can go,
    /// conjugating its controlled ops through each Clifford block it hops
    /// over. Used after H-gadgetization to regroup classical control next
    /// to the measurements that feed it.
    pub fn commute_classical(&mut self) {
        let mut i = 0;
        while i + 1 < self.blocks.len() {
            let swap = matches!(
                (&self.blocks[i], &self.blocks[i + 1]),
                (Subtableau::ClassicalControl(_), Subtableau::Clifford(_))
            );
            if !swap {
                i += 1;
                continue;
            }
            let (cc, clifford) = match (self.blocks[i].clone(), self.blocks[i + 1].clone()) {
                (Subtableau::ClassicalControl(cc), Subtableau::Clifford(c)) => (cc, c),
                _ => unreachable!(),
            };
            let clifford_ops = stabilizer::extract_clifford_operators(clifford.clone(), Strategy::Ag);
            let moved = cc.conjugate_by(&clifford_ops);
            self.blocks[i] = Subtableau::Clifford(clifford);
            self.blocks[i + 1] = Subtableau::ClassicalControl(moved);
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauli::CliffordOperatorType;

    #[test]
    fn apply_opens_and_reuses_trailing_clifford_block() {
        let mut c = TableauContainer::new(2);
        c.apply(&CliffordOperator::single(CliffordOperatorType::H, 0));
        c.apply(&CliffordOperator::double(CliffordOperatorType::Cx, 0, 1));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn rotations_batch_together() {
        let mut c = TableauContainer::new(1);
        let r = PauliRotation::from_string("Z", crate::phase::Phase::new(1, 4)).unwrap();
        c.append_rotation(r.clone());
        c.append_rotation(r);
        assert_eq!(c.len(), 1);
        match &c.iter().next().unwrap() {
            Subtableau::Rotations(rs) => assert_eq!(rs.len(), 2),
            _ => panic!("expected a rotation batch"),
        }
    }

    #[test]
    fn collapse_fuses_adjacent_clifford_blocks() {
        let mut c = TableauContainer::new(1);
        c.push_back(Subtableau::Clifford({
            let mut t = StabilizerTableau::identity(1);
            t.h(0);
            t
        }));
        c.push_back(Subtableau::Clifford({
            let mut t = StabilizerTableau::identity(1);
            t.h(0);
            t
        }));
        c.collapse();
        assert_eq!(c.len(), 1);
        match &c.iter().next().unwrap() {
            Subtableau::Clifford(t) => assert_eq!(*t, StabilizerTableau::identity(1)),
            _ => panic!("expected a Clifford block"),
        }
    }

    #[test]
    fn remove_identities_drops_empty_blocks() {
        let mut c = TableauContainer::new(1);
        c.push_back(Subtableau::Rotations(vec![]));
        c.push_back(Subtableau::Clifford(StabilizerTableau::identity(1)));
        c.remove_identities();
        assert!(c.is_empty());
    }

    #[test]
    fn commute_classical_swaps_control_past_clifford() {
        let mut c = TableauContainer::new(1);
        let cc = ClassicalControlTableau::new(0, vec![CliffordOperator::single(CliffordOperatorType::X, 0)]);
        c.push_back(Subtableau::ClassicalControl(cc));
        c.push_back(Subtableau::Clifford({
            let mut t = StabilizerTableau::identity(1);
            t.h(0);
            t
        }));
        c.commute_classical();
        assert!(matches!(c.iter().next().unwrap(), Subtableau::Clifford(_)));
        assert!(matches!(c.iter().nth(1).unwrap(), Subtableau::ClassicalControl(_)));
    }
}
