use crate::phase::Phase;

/// Elementary circuit gate set: the Clifford generators plus the rotation
/// family. Anything outside this set (`ccx`, `mcrz`, ...) is decomposed
/// into it before entering a [`super::Circuit`].
#[derive(Debug, Clone, PartialEq)]
pub enum GateType {
    H,
    X,
    Y,
    Z,
    S,
    Sdg,
    V,
    Vdg,
    Cx,
    Cz,
    Swap,
    Rx(Phase),
    Ry(Phase),
    Rz(Phase),
    P(Phase),
}

impl GateType {
    pub fn is_clifford(&self) -> bool {
        use GateType::*;
        match self {
            H | X | Y | Z | S | Sdg | V | Vdg | Cx | Cz | Swap => true,
            // In lowest terms, a multiple of pi/2 always reduces to
            // denominator 1 or 2.
            Rx(p) | Ry(p) | Rz(p) | P(p) => p.denominator() <= 2,
        }
    }

    pub fn name(&self) -> &'static str {
        use GateType::*;
        match self {
            H => "h",
            X => "x",
            Y => "y",
            Z => "z",
            S => "s",
            Sdg => "sdg",
            V => "sx",
            Vdg => "sxdg",
            Cx => "cx",
            Cz => "cz",
            Swap => "swap",
            Rx(_) => "rx",
            Ry(_) => "ry",
            Rz(_) => "rz",
            P(_) => "p",
        }
    }

    /// Adjoint of this op, together with the (possibly reordered) qubit
    /// tuple it should be re-emitted with. Qubit order never actually
    /// changes for this gate set; the parameter exists so callers can treat
    /// the pair uniformly.
    pub fn adjoint_with_qubits(&self, qubits: &[usize]) -> (GateType, Vec<usize>) {
        use GateType::*;
        let adjoint = match self {
            H => H,
            X => X,
            Y => Y,
            Z => Z,
            S => Sdg,
            Sdg => S,
            V => Vdg,
            Vdg => V,
            Cx => Cx,
            Cz => Cz,
            Swap => Swap,
            Rx(p) => Rx(p.neg()),
            Ry(p) => Ry(p.neg()),
            Rz(p) => Rz(p.neg()),
            P(p) => P(p.neg()),
        };
        (adjoint, qubits.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clifford_classification_matches_angle() {
        assert!(GateType::Rz(Phase::new(1, 2)).is_clifford());
        assert!(GateType::Rz(Phase::pi()).is_clifford());
        assert!(!GateType::Rz(Phase::new(1, 4)).is_clifford());
        assert!(GateType::H.is_clifford());
    }
}
