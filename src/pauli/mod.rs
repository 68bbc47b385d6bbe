//! n-qubit Pauli products, Pauli rotations, and the Clifford operator
//! vocabulary they're built from.

mod product;
mod rotation;

pub use product::{power_of_i, Pauli, PauliProduct};
pub use rotation::{extract_clifford_operators as rotation_clifford_ops, PauliRotation};

/// The elementary Clifford generators, plus the derived gates every
/// `PauliConjugate` implementor gets for free. `Sdg`/`V`/`Vdg` are the only
/// ones with a non-trivial adjoint; every other op is self-adjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CliffordOperatorType {
    H,
    S,
    Cx,
    Sdg,
    V,
    Vdg,
    X,
    Y,
    Z,
    Cz,
    Swap,
    Ecr,
}

impl CliffordOperatorType {
    pub fn adjoint(self) -> Self {
        use CliffordOperatorType::*;
        match self {
            S => Sdg,
            Sdg => S,
            V => Vdg,
            Vdg => V,
            other => other,
        }
    }

    pub fn arity(self) -> usize {
        use CliffordOperatorType::*;
        match self {
            Cx | Cz | Swap | Ecr => 2,
            _ => 1,
        }
    }

    pub fn name(self) -> &'static str {
        use CliffordOperatorType::*;
        match self {
            H => "h",
            S => "s",
            Cx => "cx",
            Sdg => "sdg",
            V => "v",
            Vdg => "vdg",
            X => "x",
            Y => "y",
            Z => "z",
            Cz => "cz",
            Swap => "swap",
            Ecr => "ecr",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        use CliffordOperatorType::*;
        Some(match s {
            "h" => H,
            "s" => S,
            "cx" => Cx,
            "sdg" => Sdg,
            "v" => V,
            "vdg" => Vdg,
            "x" => X,
            "y" => Y,
            "z" => Z,
            "cz" => Cz,
            "swap" => Swap,
            "ecr" => Ecr,
            _ => return None,
        })
    }
}

/// A single Clifford operation: its type plus the qubit(s) it acts on.
/// `qubits.1` is unused (left as `qubits.0`) for single-qubit ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CliffordOperator {
    pub op: CliffordOperatorType,
    pub qubits: (usize, usize),
}

impl CliffordOperator {
    pub fn single(op: CliffordOperatorType, qubit: usize) -> Self {
        CliffordOperator { op, qubits: (qubit, qubit) }
    }

    pub fn double(op: CliffordOperatorType, control: usize, target: usize) -> Self {
        CliffordOperator { op, qubits: (control, target) }
    }

    pub fn adjoint(&self) -> Self {
        CliffordOperator { op: self.op.adjoint(), qubits: self.qubits }
    }
}

pub type CliffordOperatorString = Vec<CliffordOperator>;

/// Reverse the sequence and adjoint each op — undoes a Clifford circuit.
pub fn adjoint_ops(ops: &CliffordOperatorString) -> CliffordOperatorString {
    ops.iter().rev().map(CliffordOperator::adjoint).collect()
}

/// Trait for Pauli-Product-like types: implement `h`/`s`/`cx` and get the
/// rest of the elementary Clifford gate set for free from their
/// conjugation identities.
pub trait PauliConjugate: Sized {
    fn h(&mut self, qubit: usize) -> &mut Self;
    fn s(&mut self, qubit: usize) -> &mut Self;
    fn cx(&mut self, control: usize, target: usize) -> &mut Self;

    fn sdg(&mut self, qubit: usize) -> &mut Self {
        self.s(qubit).s(qubit).s(qubit)
    }
    fn v(&mut self, qubit: usize) -> &mut Self {
        self.h(qubit).s(qubit).h(qubit)
    }
    fn vdg(&mut self, qubit: usize) -> &mut Self {
        self.h(qubit).sdg(qubit).h(qubit)
    }
    fn x(&mut self, qubit: usize) -> &mut Self {
        self.h(qubit).z(qubit).h(qubit)
    }
    fn y(&mut self, qubit: usize) -> &mut Self {
        self.x(qubit).z(qubit)
    }
    fn z(&mut self, qubit: usize) -> &mut Self {
        self.s(qubit).s(qubit)
    }
    fn cz(&mut self, control: usize, target: usize) -> &mut Self {
        self.h(target).cx(control, target).h(target)
    }
    fn swap(&mut self, a: usize, b: usize) -> &mut Self {
        self.cx(a, b).cx(b, a).cx(a, b)
    }
    fn ecr(&mut self, control: usize, target: usize) -> &mut Self {
        self.cx(control, target).s(control).x(control).v(target)
    }

    fn apply_op(&mut self, op: &CliffordOperator) -> &mut Self {
        use CliffordOperatorType::*;
        let (a, b) = op.qubits;
        match op.op {
            H => self.h(a),
            S => self.s(a),
            Cx => self.cx(a, b),
            Sdg => self.sdg(a),
            V => self.v(a),
            Vdg => self.vdg(a),
            X => self.x(a),
            Y => self.y(a),
            Z => self.z(a),
            Cz => self.cz(a, b),
            Swap => self.swap(a, b),
            Ecr => self.ecr(a, b),
        }
    }

    fn apply_ops(&mut self, ops: &[CliffordOperator]) -> &mut Self {
        for op in ops {
            self.apply_op(op);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjoint_reverses_and_inverts() {
        let ops = vec![
            CliffordOperator::single(CliffordOperatorType::H, 0),
            CliffordOperator::single(CliffordOperatorType::S, 0),
        ];
        let adj = adjoint_ops(&ops);
        assert_eq!(adj[0].op, CliffordOperatorType::Sdg);
        assert_eq!(adj[1].op, CliffordOperatorType::H);
    }
}
