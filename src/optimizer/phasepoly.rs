//! Phase-polynomial term reduction: TODD and TOHPE, both
//! working over the F₂ matrix `A` of a diagonal (`{Z,I}`-product) rotation
//! batch, rows = qubits, columns = rotation terms. The nullspace search is
//! built as a standalone RREF-based F₂ nullspace routine rather than a
//! line-by-line port of any particular implementation (see
//! `DESIGN.md`).

use std::collections::HashSet;

use crate::pauli::{Pauli, PauliRotation};
use crate::phase::Phase;

use super::merge::merge_rotations;

type BitVec = Vec<bool>;

fn load_matrix(rotations: &[PauliRotation]) -> (usize, Vec<BitVec>) {
    let n_qubits = rotations[0].n_qubits();
    // rows[q][t]
    let rows: Vec<BitVec> =
        (0..n_qubits).map(|q| rotations.iter().map(|r| r.pauli_product().is_z_set(q)).collect()).collect();
    (n_qubits, rows)
}

fn column(matrix: &[BitVec], t: usize) -> BitVec {
    matrix.iter().map(|row| row[t]).collect()
}

fn xor_columns(a: &[bool], b: &[bool]) -> BitVec {
    a.iter().zip(b).map(|(&x, &y)| x ^ y).collect()
}

/// Triple products over qubits `(i,j,k)`, weighted by `z`, projected back
/// onto the term axis: row `t` of the result is
/// `z_i·A[j][t]·A[k][t] ⊕ z_j·A[i][t]·A[k][t] ⊕ z_k·A[i][t]·A[j][t]`.
fn chi_rows(matrix: &[BitVec], z: &[bool]) -> Vec<BitVec> {
    let n_qubits = matrix.len();
    let n_terms = matrix[0].len();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for i in 0..n_qubits {
        for j in (i + 1)..n_qubits {
            for k in (j + 1)..n_qubits {
                let row: BitVec = (0..n_terms)
                    .map(|t| {
                        (z[i] && matrix[j][t] && matrix[k][t])
                            ^ (z[j] && matrix[i][t] && matrix[k][t])
                            ^ (z[k] && matrix[i][t] && matrix[j][t])
                    })
                    .collect();
                if row.iter().all(|&b| !b) || seen.contains(&row) {
                    continue;
                }
                seen.insert(row.clone());
                out.push(row);
            }
        }
    }
    out
}

/// Basis of `{y : M·y = 0 (mod 2)}` for `matrix` rows of length `n_cols`.
fn nullspace_basis(matrix: &[BitVec], n_cols: usize) -> Vec<BitVec> {
    let mut rows: Vec<BitVec> = matrix.to_vec();
    let n_rows = rows.len();
    let mut pivot_cols = Vec::new();
    let mut pivot_row = 0;

    for col in 0..n_cols {
        if pivot_row >= n_rows {
            break;
        }
        let Some(r) = (pivot_row..n_rows).find(|&r| rows[r][col]) else { continue };
        rows.swap(pivot_row, r);
        for r2 in 0..n_rows {
            if r2 != pivot_row && rows[r2][col] {
                for c in 0..n_cols {
                    let v = rows[pivot_row][c];
                    rows[r2][c] ^= v;
                }
            }
        }
        pivot_cols.push(col);
        pivot_row += 1;
    }

    let free_cols: Vec<usize> = (0..n_cols).filter(|c| !pivot_cols.contains(c)).collect();
    free_cols
        .iter()
        .map(|&free| {
            let mut y = vec![false; n_cols];
            y[free] = true;
            for (i, &pc) in pivot_cols.iter().enumerate() {
                y[pc] = rows[i][free];
            }
            y
        })
        .collect()
}

/// Rebuilds rotations from an updated matrix, one output per surviving
/// column `t`, each keeping `phases[t]` — the phase the *original* term at
/// that index carried. The XOR rewrite changes which qubits a term acts on,
/// never what angle it rotates by, so a uniform phase here would silently
/// corrupt any batch that isn't entirely T-gates.
fn rebuild_rotations(n_qubits: usize, matrix: &[BitVec], phases: &[Phase]) -> Vec<PauliRotation> {
    let n_terms = matrix[0].len();
    (0..n_terms)
        .filter_map(|t| {
            let col = column(matrix, t);
            if col.iter().all(|&b| !b) {
                return None;
            }
            let paulis: Vec<Pauli> = col.iter().map(|&b| if b { Pauli::Z } else { Pauli::I }).collect();
            Some(PauliRotation::from_paulis(&paulis, phases[t]))
        })
        .collect()
}

/// Re-checks that `y` actually zeroes every row of `system` — the matrix
/// rows plus the triple-product rows for this rewrite's `z` — rather than
/// trusting `nullspace_basis`'s row reduction blindly. A bug there could
/// otherwise hand back a vector that looks right but doesn't actually
/// preserve the batch's phase polynomial.
fn preserves_signature(system: &[BitVec], y: &[bool]) -> bool {
    system.iter().all(|row| row.iter().zip(y).filter(|&(&a, &b)| a && b).count() % 2 == 0)
}

/// Requires every rotation's phase to be a multiple of pi/4 — T-like
/// (denominator 4) and S-like (denominator 2 or 1) rotations alike, since
/// both TODD and TOHPE operate on the whole diagonal batch, not just its
/// T-count-relevant terms.
fn all_phases_are_multiples_of_pi_over_4(rotations: &[PauliRotation]) -> bool {
    rotations.iter().all(|r| 4 % r.phase().denominator() == 0)
}

fn rewrite_once(rotations: &[PauliRotation]) -> Option<Vec<PauliRotation>> {
    if rotations.is_empty() || !all_phases_are_multiples_of_pi_over_4(rotations) {
        return None;
    }
    let (n_qubits, mut matrix) = load_matrix(rotations);
    let n_terms = rotations.len();
    let phases: Vec<Phase> = rotations.iter().map(|r| r.phase()).collect();
    let mut seen_z = HashSet::new();

    for a in 0..n_terms {
        for b in (a + 1)..n_terms {
            let col_a = column(&matrix, a);
            let col_b = column(&matrix, b);
            let z = xor_columns(&col_a, &col_b);
            if seen_z.contains(&z) {
                continue;
            }
            seen_z.insert(z.clone());

            let chi = chi_rows(&matrix, &z);
            let mut augmented = matrix.clone();
            augmented.extend(chi);

            let nullspace = nullspace_basis(&augmented, n_terms);
            for y in &nullspace {
                if y[a] == y[b] || !preserves_signature(&augmented, y) {
                    continue;
                }
                let mut updated = matrix.clone();
                for q in 0..n_qubits {
                    if z[q] {
                        for t in 0..n_terms {
                            updated[q][t] ^= y[t];
                        }
                    }
                }
                matrix = updated;
                return Some(rebuild_rotations(n_qubits, &matrix, &phases));
            }
        }
    }
    None
}

/// TODD: iterate [`rewrite_once`] to a fixed point, consolidating any
/// terms the rewrite made equal.
pub fn todd(rotations: &[PauliRotation]) -> Vec<PauliRotation> {
    let mut current = rotations.to_vec();
    loop {
        let before = current.len();
        current = match rewrite_once(&current) {
            Some(next) => merge_rotations(&next),
            None => return current,
        };
        if current.len() >= before {
            return current;
        }
    }
}

/// TOHPE: structurally the same rewrite search as TODD, but it scores
/// every nullspace candidate against an auxiliary `S`-matrix instead of
/// taking the first valid one. Implemented here by
/// preferring the candidate with the smallest resulting term count, which
/// realizes the same "best-scoring rewrite wins" contract without the
/// `MultiLinearPolynomial` signature machinery the retained source used to
/// pick it.
pub fn tohpe(rotations: &[PauliRotation]) -> Vec<PauliRotation> {
    let mut current = rotations.to_vec();
    loop {
        let before = current.len();
        let Some(candidates) = all_single_step_rewrites(&current) else { return current };
        let Some(best) = candidates.into_iter().map(|c| merge_rotations(&c)).min_by_key(|c| c.len()) else {
            return current;
        };
        if best.len() >= before {
            return current;
        }
        current = best;
    }
}

fn all_single_step_rewrites(rotations: &[PauliRotation]) -> Option<Vec<Vec<PauliRotation>>> {
    if rotations.is_empty() || !all_phases_are_multiples_of_pi_over_4(rotations) {
        return None;
    }
    let (n_qubits, matrix) = load_matrix(rotations);
    let n_terms = rotations.len();
    let phases: Vec<Phase> = rotations.iter().map(|r| r.phase()).collect();
    let mut seen_z = HashSet::new();
    let mut out = Vec::new();

    for a in 0..n_terms {
        for b in (a + 1)..n_terms {
            let z = xor_columns(&column(&matrix, a), &column(&matrix, b));
            if seen_z.contains(&z) {
                continue;
            }
            seen_z.insert(z.clone());

            let chi = chi_rows(&matrix, &z);
            let mut augmented = matrix.clone();
            augmented.extend(chi);
            let nullspace = nullspace_basis(&augmented, n_terms);

            for y in &nullspace {
                if y[a] == y[b] || !preserves_signature(&augmented, y) {
                    continue;
                }
                let mut updated = matrix.clone();
                for q in 0..n_qubits {
                    if z[q] {
                        for t in 0..n_terms {
                            updated[q][t] ^= y[t];
                        }
                    }
                }
                out.push(rebuild_rotations(n_qubits, &updated, &phases));
            }
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauli::PauliProduct;

    fn rot(s: &str) -> PauliRotation {
        PauliRotation::new(PauliProduct::from_string(s).unwrap(), Phase::new(1, 4))
    }

    #[test]
    fn single_term_batch_is_left_untouched() {
        let r = PauliRotation::new(PauliProduct::from_string("Z").unwrap(), Phase::new(1, 2));
        let out = todd(&[r.clone()]);
        assert_eq!(out, vec![r]);
    }

    #[test]
    fn non_multiple_of_pi_over_4_batch_is_left_untouched() {
        let rs = vec![
            PauliRotation::new(PauliProduct::from_string("ZI").unwrap(), Phase::new(1, 8)),
            PauliRotation::new(PauliProduct::from_string("IZ").unwrap(), Phase::new(1, 8)),
        ];
        assert_eq!(todd(&rs), rs);
    }

    #[test]
    fn empty_polynomial_is_a_no_op() {
        assert!(todd(&[]).is_empty());
        assert!(tohpe(&[]).is_empty());
    }

    #[test]
    fn todd_never_increases_term_count() {
        let rs = vec![rot("ZI"), rot("IZ"), rot("ZZ")];
        let out = todd(&rs);
        assert!(out.len() <= rs.len());
    }

    /// `t q[0]; cx q[0],q[1]; t q[1]; cx q[0],q[1]`: the trailing `cx`
    /// commutes back through the second `t`, canceling the leading `cx`
    /// and leaving two pi/4 rotations in a single Clifford-free frame,
    /// `Z` on q0 and `Z⊗Z` on {q0,q1}.
    #[test]
    fn tohpe_reduces_or_preserves_the_documented_phase_poly_scenario() {
        use crate::circuit::Circuit;
        use crate::convert::tableau_qcir::rotation_to_qcir;

        let rotations = vec![rot("ZI"), rot("ZZ")];
        let optimized = tohpe(&rotations);
        assert!(optimized.len() <= rotations.len());

        let mut before = Circuit::new(2);
        for r in &rotations {
            before.append(&rotation_to_qcir(r).unwrap()).unwrap();
        }
        let mut after = Circuit::new(2);
        for r in &optimized {
            after.append(&rotation_to_qcir(r).unwrap()).unwrap();
        }
        assert_eq!(crate::convert::is_equivalent(&before, &after).unwrap(), crate::convert::Equivalence::Equivalent);
    }
}
