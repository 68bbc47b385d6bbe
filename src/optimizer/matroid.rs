//! Matroid partition: split a diagonal
//! phase polynomial's rotation terms into the fewest groups such that each
//! group's F₂ columns are independent (rank ≥ group size), so each group
//! can be realized by a single round of CNOTs.

use crate::bitmatrix::BitMatrix;
use crate::interrupt;
use crate::pauli::PauliRotation;

fn term_column(rotation: &PauliRotation, n_qubits: usize) -> Vec<u8> {
    (0..n_qubits).map(|q| rotation.pauli_product().is_z_set(q) as u8).collect()
}

fn is_independent(columns: &[Vec<u8>]) -> bool {
    if columns.is_empty() {
        return true;
    }
    let n_qubits = columns[0].len();
    let rows: Vec<Vec<u8>> =
        (0..n_qubits).map(|q| columns.iter().map(|c| c[q]).collect()).collect();
    BitMatrix::from_rows(rows).matrix_rank() == columns.len()
}

/// Naive greedy matroid partition: scan terms in order, place each into
/// the first existing group it stays independent in, else open a new one.
pub fn naive_greedy_partition(rotations: &[PauliRotation], n_qubits: usize) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let columns: Vec<Vec<u8>> = rotations.iter().map(|r| term_column(r, n_qubits)).collect();

    for (idx, col) in columns.iter().enumerate() {
        if interrupt::is_requested() {
            break;
        }
        let mut placed = false;
        for group in &mut groups {
            let mut candidate: Vec<Vec<u8>> = group.iter().map(|&i| columns[i].clone()).collect();
            candidate.push(col.clone());
            if is_independent(&candidate) {
                group.push(idx);
                placed = true;
                break;
            }
        }
        if !placed {
            groups.push(vec![idx]);
        }
    }
    groups
}

/// Tpar's augmenting-path matroid partition: repeatedly try to add the
/// next term to some existing group; if no group admits it directly,
/// search for an augmenting path that frees room by moving a conflicting
/// element to another group.
pub fn tpar_partition(rotations: &[PauliRotation], n_qubits: usize) -> Vec<Vec<usize>> {
    let columns: Vec<Vec<u8>> = rotations.iter().map(|r| term_column(r, n_qubits)).collect();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for idx in 0..columns.len() {
        if interrupt::is_requested() {
            break;
        }
        if try_place(&mut groups, &columns, idx) {
            continue;
        }
        groups.push(vec![idx]);
    }
    groups
}

fn group_is_independent_with(group: &[usize], columns: &[Vec<u8>], candidate: usize) -> bool {
    let mut cols: Vec<Vec<u8>> = group.iter().map(|&i| columns[i].clone()).collect();
    cols.push(columns[candidate].clone());
    is_independent(&cols)
}

/// Direct placement, or a single-level augmenting swap: move some element
/// `e` already in `groups[g]` out to make room for `idx`, if `idx` can sit
/// alongside the rest of `groups[g]` and `e` can start a path elsewhere.
fn try_place(groups: &mut [Vec<usize>], columns: &[Vec<u8>], idx: usize) -> bool {
    for g in groups.iter_mut() {
        if group_is_independent_with(g, columns, idx) {
            g.push(idx);
            return true;
        }
    }
    for gi in 0..groups.len() {
        let members = groups[gi].clone();
        for &e in &members {
            let mut without_e: Vec<usize> = members.iter().copied().filter(|&m| m != e).collect();
            without_e.push(idx);
            if !is_independent(&without_e.iter().map(|&i| columns[i].clone()).collect::<Vec<_>>()) {
                continue;
            }
            for gj in 0..groups.len() {
                if gj == gi {
                    continue;
                }
                if group_is_independent_with(&groups[gj], columns, e) {
                    groups[gi] = without_e;
                    groups[gj].push(e);
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauli::PauliProduct;
    use crate::phase::Phase;

    fn rot(s: &str) -> PauliRotation {
        PauliRotation::new(PauliProduct::from_string(s).unwrap(), Phase::new(1, 4))
    }

    #[test]
    fn independent_columns_share_one_group() {
        let rs = vec![rot("ZI"), rot("IZ")];
        let groups = naive_greedy_partition(&rs, 2);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn duplicate_columns_need_separate_groups() {
        let rs = vec![rot("ZI"), rot("ZI")];
        let groups = naive_greedy_partition(&rs, 2);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn tpar_partition_never_exceeds_greedy_group_count() {
        let rs = vec![rot("ZI"), rot("IZ"), rot("ZI")];
        let greedy = naive_greedy_partition(&rs, 2);
        let tpar = tpar_partition(&rs, 2);
        assert!(tpar.len() <= greedy.len());
    }
}
