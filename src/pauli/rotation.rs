use super::{CliffordOperator, CliffordOperatorType, Pauli, PauliConjugate, PauliProduct};
use crate::error::Result;
use crate::phase::Phase;

/// `exp(i * phase * pauli_product)`, always stored with a non-negative
/// Pauli product: if the product's sign bit were set, it is cleared and the
/// phase is negated instead.
#[derive(Debug, Clone, PartialEq)]
pub struct PauliRotation {
    pauli_product: PauliProduct,
    phase: Phase,
}

impl PauliRotation {
    pub fn new(mut pauli_product: PauliProduct, mut phase: Phase) -> Self {
        if pauli_product.is_neg() {
            pauli_product.set_neg(false);
            phase = phase.neg();
        }
        PauliRotation { pauli_product, phase }
    }

    pub fn from_paulis(paulis: &[Pauli], phase: Phase) -> Self {
        Self::new(PauliProduct::from_paulis(paulis, false), phase)
    }

    pub fn from_string(s: &str, phase: Phase) -> Result<Self> {
        Ok(Self::new(PauliProduct::from_string(s)?, phase))
    }

    pub fn n_qubits(&self) -> usize {
        self.pauli_product.n_qubits()
    }

    pub fn pauli_product(&self) -> &PauliProduct {
        &self.pauli_product
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn get_pauli_type(&self, qubit: usize) -> Pauli {
        self.pauli_product.get_pauli_type(qubit)
    }

    pub fn is_diagonal(&self) -> bool {
        (0..self.n_qubits()).all(|i| !matches!(self.get_pauli_type(i), Pauli::X | Pauli::Y))
    }

    fn normalize(&mut self) {
        if self.pauli_product.is_neg() {
            self.pauli_product.set_neg(false);
            self.phase = self.phase.neg();
        }
    }

    pub fn to_string(&self, signedness: char) -> String {
        format!("exp(i * {} * {})", self.phase, self.pauli_product.to_signed_string(signedness))
    }

    pub fn to_bit_string(&self) -> String {
        format!("{} {}", self.pauli_product.to_bit_string(), self.phase)
    }
}

impl PauliConjugate for PauliRotation {
    fn h(&mut self, qubit: usize) -> &mut Self {
        self.pauli_product.h(qubit);
        self.normalize();
        self
    }
    fn s(&mut self, qubit: usize) -> &mut Self {
        self.pauli_product.s(qubit);
        self.normalize();
        self
    }
    fn cx(&mut self, control: usize, target: usize) -> &mut Self {
        self.pauli_product.cx(control, target);
        self.normalize();
        self
    }
}

/// Decompose a rotation into a basis-change Clifford prefix plus the target
/// qubit that carries the (now diagonal) `Z`-rotation, following the same
/// pattern as `extract_clifford_operators`: `H` on every
/// `X`-qubit, `V` on every `Y`-qubit, then a `CX` ladder chaining adjacent
/// non-identity qubits down to the last one (the target).
pub fn extract_clifford_operators(rotation: &PauliRotation) -> (Vec<CliffordOperator>, usize) {
    let mut ops = Vec::new();
    for i in 0..rotation.n_qubits() {
        match rotation.get_pauli_type(i) {
            Pauli::X => ops.push(CliffordOperator::single(CliffordOperatorType::H, i)),
            Pauli::Y => ops.push(CliffordOperator::single(CliffordOperatorType::V, i)),
            _ => {}
        }
    }

    let non_i: Vec<usize> = (0..rotation.n_qubits())
        .filter(|&i| !matches!(rotation.get_pauli_type(i), Pauli::I))
        .collect();

    for pair in non_i.windows(2) {
        ops.push(CliffordOperator::double(CliffordOperatorType::Cx, pair[0], pair[1]));
    }

    let target = *non_i.last().expect("PauliRotation must have at least one non-identity qubit");
    (ops, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_product_flips_into_negated_phase() {
        let mut p = PauliProduct::from_string("X").unwrap();
        p.set_neg(true);
        let r = PauliRotation::new(p, Phase::new(1, 4));
        assert!(!r.pauli_product().is_neg());
        assert_eq!(r.phase(), Phase::new(-1, 4));
    }

    #[test]
    fn extract_clifford_operators_targets_last_non_identity_qubit() {
        let r = PauliRotation::from_paulis(&[Pauli::X, Pauli::I, Pauli::Z], Phase::new(1, 4));
        let (ops, target) = extract_clifford_operators(&r);
        assert_eq!(target, 2);
        assert!(ops.iter().any(|op| op.op == CliffordOperatorType::H && op.qubits.0 == 0));
        assert!(ops.iter().any(|op| op.op == CliffordOperatorType::Cx));
    }

    #[test]
    fn is_diagonal_detects_z_only_products() {
        let r = PauliRotation::from_paulis(&[Pauli::Z, Pauli::I, Pauli::Z], Phase::pi());
        assert!(r.is_diagonal());
        let r2 = PauliRotation::from_paulis(&[Pauli::X], Phase::pi());
        assert!(!r2.is_diagonal());
    }
}
