//! The stabilizer tableau: `2n` Pauli rows (`n` stabilizers, `n`
//! destabilizers) plus Clifford conjugation and synthesis back to a
//! Clifford operator string.

use crate::pauli::{
    adjoint_ops, CliffordOperator, CliffordOperatorString, CliffordOperatorType, Pauli, PauliConjugate, PauliProduct,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StabilizerTableau {
    /// rows[0..n) = stabilizers, rows[n..2n) = destabilizers.
    rows: Vec<PauliProduct>,
    n_qubits: usize,
}

impl StabilizerTableau {
    /// Identity tableau: `S_i = Z_i`, `D_i = X_i`, no sign.
    pub fn identity(n_qubits: usize) -> Self {
        let mut rows = Vec::with_capacity(2 * n_qubits);
        for i in 0..n_qubits {
            rows.push(PauliProduct::from_paulis(&z_at(n_qubits, i), false));
        }
        for i in 0..n_qubits {
            rows.push(PauliProduct::from_paulis(&x_at(n_qubits, i), false));
        }
        StabilizerTableau { rows, n_qubits }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn stabilizer(&self, i: usize) -> &PauliProduct {
        &self.rows[i]
    }

    pub fn destabilizer(&self, i: usize) -> &PauliProduct {
        &self.rows[self.n_qubits + i]
    }

    fn stabilizer_idx(&self, i: usize) -> usize {
        i
    }

    fn destabilizer_idx(&self, i: usize) -> usize {
        self.n_qubits + i
    }

    pub fn to_string(&self) -> String {
        let mut s = String::new();
        for i in 0..self.n_qubits {
            s += &format!("S{i}  {}\n", self.rows[self.stabilizer_idx(i)].to_signed_string('+'));
        }
        s.push('\n');
        for i in 0..self.n_qubits {
            s += &format!("D{i}  {}\n", self.rows[self.destabilizer_idx(i)].to_signed_string('+'));
        }
        s
    }

    pub fn to_bit_string(&self) -> String {
        let mut s = String::new();
        for i in 0..self.n_qubits {
            s += &format!("S{i}  {}\n", self.rows[self.stabilizer_idx(i)].to_bit_string());
        }
        s.push('\n');
        for i in 0..self.n_qubits {
            s += &format!("D{i}  {}\n", self.rows[self.destabilizer_idx(i)].to_bit_string());
        }
        s
    }
}

impl PauliConjugate for StabilizerTableau {
    fn h(&mut self, qubit: usize) -> &mut Self {
        if qubit >= self.n_qubits {
            return self;
        }
        for row in &mut self.rows {
            row.h(qubit);
        }
        self
    }

    fn s(&mut self, qubit: usize) -> &mut Self {
        if qubit >= self.n_qubits {
            return self;
        }
        for row in &mut self.rows {
            row.s(qubit);
        }
        self
    }

    fn cx(&mut self, control: usize, target: usize) -> &mut Self {
        if control >= self.n_qubits || target >= self.n_qubits {
            return self;
        }
        for row in &mut self.rows {
            row.cx(control, target);
        }
        self
    }
}

fn z_at(n: usize, i: usize) -> Vec<Pauli> {
    let mut v = vec![Pauli::I; n];
    v[i] = Pauli::Z;
    v
}

fn x_at(n: usize, i: usize) -> Vec<Pauli> {
    let mut v = vec![Pauli::I; n];
    v[i] = Pauli::X;
    v
}

/// `adjoint(tableau)`: extract the Clifford op string, reverse & invert it,
/// re-apply to a fresh identity tableau.
pub fn adjoint(tableau: &StabilizerTableau) -> StabilizerTableau {
    let ops = extract_clifford_operators(tableau.clone(), Strategy::Ag);
    let ops = adjoint_ops(&ops);
    let mut ret = StabilizerTableau::identity(tableau.n_qubits());
    ret.apply_ops(&ops);
    ret
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Aaronson-Gottesman: diagonalizes one qubit at a time.
    Ag,
    /// First diagonalizes every stabilizer with a single `H` each, then
    /// runs AG (which now emits zero further `H`s). Bounds total `H` count
    /// by the number of stabilizer rows needing diagonalization.
    HOpt,
}

/// Synthesize a Clifford operator string that prepares `tableau` from the
/// identity tableau.
pub fn extract_clifford_operators(tableau: StabilizerTableau, strategy: Strategy) -> CliffordOperatorString {
    match strategy {
        Strategy::Ag => ag_extract(tableau),
        Strategy::HOpt => hopt_extract(tableau),
    }
}

fn ag_extract(mut copy: StabilizerTableau) -> CliffordOperatorString {
    let n = copy.n_qubits();
    let mut ops: CliffordOperatorString = Vec::new();

    macro_rules! add_cx {
        ($c:expr, $t:expr) => {{
            copy.cx($c, $t);
            ops.push(CliffordOperator::double(CliffordOperatorType::Cx, $c, $t));
        }};
    }
    macro_rules! add_h {
        ($q:expr) => {{
            copy.h($q);
            ops.push(CliffordOperator::single(CliffordOperatorType::H, $q));
        }};
    }
    macro_rules! add_s {
        ($q:expr) => {{
            copy.s($q);
            ops.push(CliffordOperator::single(CliffordOperatorType::S, $q));
        }};
    }
    macro_rules! add_x {
        ($q:expr) => {{
            copy.x($q);
            ops.push(CliffordOperator::single(CliffordOperatorType::X, $q));
        }};
    }
    macro_rules! add_z {
        ($q:expr) => {{
            copy.z($q);
            ops.push(CliffordOperator::single(CliffordOperatorType::Z, $q));
        }};
    }

    for qubit in 0..n {
        // (a) make destabilizer[qubit]'s X-bit at column `qubit` equal 1.
        if !copy.destabilizer(qubit).is_x_set(qubit) {
            let found_x = (qubit + 1..n).find(|&t| copy.destabilizer(qubit).is_x_set(t));
            if let Some(ctrl) = found_x {
                add_cx!(ctrl, qubit);
            } else {
                for ctrl in qubit..n {
                    if copy.destabilizer(qubit).is_z_set(ctrl) {
                        add_h!(ctrl);
                        if ctrl != qubit {
                            add_cx!(ctrl, qubit);
                        }
                        break;
                    }
                }
            }
        }

        // (b) zero all other X bits on the destabilizer row.
        for targ in (qubit + 1)..n {
            if copy.destabilizer(qubit).is_x_set(targ) {
                add_cx!(qubit, targ);
            }
        }

        // (c) if any Z remains on the destabilizer row, clear it through S.
        let some_z = (qubit..n).any(|t| copy.destabilizer(qubit).is_z_set(t));
        if some_z {
            if !copy.destabilizer(qubit).is_z_set(qubit) {
                add_s!(qubit);
            }
            for ctrl in (qubit + 1)..n {
                if copy.destabilizer(qubit).is_z_set(ctrl) {
                    add_cx!(ctrl, qubit);
                }
            }
            add_s!(qubit);
        }

        // (d) zero the stabilizer's Z off-diagonal.
        for ctrl in (qubit + 1)..n {
            if copy.stabilizer(qubit).is_z_set(ctrl) {
                add_cx!(ctrl, qubit);
            }
        }
        let some_x = (qubit..n).any(|t| copy.stabilizer(qubit).is_x_set(t));
        if some_x {
            add_h!(qubit);
            for targ in (qubit + 1)..n {
                if copy.stabilizer(qubit).is_x_set(targ) {
                    add_cx!(qubit, targ);
                }
            }
            if copy.stabilizer(qubit).is_z_set(qubit) {
                add_s!(qubit);
            }
            add_h!(qubit);
        }
    }

    for qubit in 0..n {
        if copy.stabilizer(qubit).is_neg() {
            add_x!(qubit);
        }
        if copy.destabilizer(qubit).is_neg() {
            add_z!(qubit);
        }
    }

    adjoint_ops(&ops)
}

fn hopt_extract(mut copy: StabilizerTableau) -> CliffordOperatorString {
    let n = copy.n_qubits();
    let mut diag_ops: CliffordOperatorString = Vec::new();

    macro_rules! add_cx {
        ($c:expr, $t:expr) => {{
            copy.cx($c, $t);
            diag_ops.push(CliffordOperator::double(CliffordOperatorType::Cx, $c, $t));
        }};
    }
    macro_rules! add_h {
        ($q:expr) => {{
            copy.h($q);
            diag_ops.push(CliffordOperator::single(CliffordOperatorType::H, $q));
        }};
    }
    macro_rules! add_s {
        ($q:expr) => {{
            copy.s($q);
            diag_ops.push(CliffordOperator::single(CliffordOperatorType::S, $q));
        }};
    }

    // Diagonalize every stabilizer with a single H, bringing all X support
    // down to Z, so the subsequent AG pass never needs an H of its own.
    for i in 0..n {
        let ctrl = match (0..n).find(|&t| copy.stabilizer(i).is_x_set(t)) {
            Some(c) => c,
            None => continue,
        };

        for targ in (ctrl + 1)..n {
            if copy.stabilizer(i).is_x_set(targ) {
                add_cx!(ctrl, targ);
            }
        }

        if copy.stabilizer(i).is_z_set(i) {
            add_s!(i);
        }

        add_h!(ctrl);
    }

    let mut ops = ag_extract(copy);
    // diag_ops were applied to `copy` directly (not accumulated via
    // ag_extract's own adjoint convention), so prepend them in application
    // order: ag_extract's output already undoes its own internal copy, we
    // just need the diagonalizing prefix to run first.
    let mut combined = diag_ops;
    combined.append(&mut ops);
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_tableau_has_expected_rows() {
        let t = StabilizerTableau::identity(2);
        assert!(t.stabilizer(0).is_z(0));
        assert!(t.destabilizer(0).is_x(0));
    }

    #[test]
    fn adjoint_of_adjoint_is_identity_ops() {
        let mut t = StabilizerTableau::identity(2);
        t.h(0);
        t.cx(0, 1);
        let adj = adjoint(&t);
        let mut back = adj;
        back.cx(0, 1);
        back.h(0);
        assert_eq!(back, StabilizerTableau::identity(2));
    }

    #[test]
    fn ag_synthesis_round_trips_to_same_tableau() {
        let mut t = StabilizerTableau::identity(3);
        t.h(0);
        t.cx(0, 1);
        t.s(1);
        t.cx(1, 2);

        let ops = extract_clifford_operators(t.clone(), Strategy::Ag);
        let mut replay = StabilizerTableau::identity(3);
        replay.apply_ops(&ops);
        assert_eq!(replay, t);
    }

    #[test]
    fn hopt_synthesis_round_trips_to_same_tableau() {
        let mut t = StabilizerTableau::identity(3);
        t.h(0);
        t.cx(0, 1);
        t.s(1);
        t.cx(1, 2);
        t.h(2);

        let ops = extract_clifford_operators(t.clone(), Strategy::HOpt);
        let mut replay = StabilizerTableau::identity(3);
        replay.apply_ops(&ops);
        assert_eq!(replay, t);
    }

    #[test]
    fn cx_tableau_round_trip_is_equivalent() {
        let mut t = StabilizerTableau::identity(2);
        t.cx(0, 1);
        let ops = extract_clifford_operators(t.clone(), Strategy::Ag);
        let mut replay = StabilizerTableau::identity(2);
        replay.apply_ops(&ops);
        assert_eq!(replay, t);
    }
}
