//! Two-level unitary decomposition: turning an arbitrary
//! `2^n x 2^n` unitary into a sequence of 2x2 unitaries, each acting on a
//! pair of computational basis states, then each of those into elementary
//! gates via a Gray-code bit-flip path, generalized to dense input
//! matrices from a driver that only
//! handles matrices already close to diagonal (it searches for a
//! `Mii^2+Mji^2=1` pair or a normalized fallback) and is known to be
//! fragile outside that case. The version here runs a full column-by-column
//! Givens elimination followed by a diagonal phase-correction pass, so it
//! terminates for any unitary input.

use num_complex::Complex64;

use super::su2::{conjugate_transpose, multi_controlled_u, multi_controlled_x, Matrix2};
use crate::circuit::Circuit;
use crate::error::{Error, Result};

pub type DenseMatrix = Vec<Vec<Complex64>>;

const ELIMINATION_EPS: f64 = 1e-9;
const UNITARY_CHECK_EPS: f64 = 1e-6;

struct TwoLevelOp {
    i: usize,
    k: usize,
    matrix: Matrix2,
}

fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

fn log2_exact(n: usize) -> usize {
    n.trailing_zeros() as usize
}

fn is_unitary(m: &DenseMatrix) -> bool {
    let dim = m.len();
    for c1 in 0..dim {
        for c2 in 0..dim {
            let inner: Complex64 = (0..dim).map(|r| m[r][c1].conj() * m[r][c2]).sum();
            let expected = if c1 == c2 { 1.0 } else { 0.0 };
            if (inner.norm() - expected).abs() > UNITARY_CHECK_EPS && inner.norm() > UNITARY_CHECK_EPS {
                return false;
            }
        }
    }
    true
}

/// Left-multiply `m` by the 2x2 `matrix` acting on rows `(i, k)`.
fn apply_rows(m: &mut DenseMatrix, i: usize, k: usize, matrix: &Matrix2) {
    let dim = m[0].len();
    for col in 0..dim {
        let (a, b) = (m[i][col], m[k][col]);
        m[i][col] = matrix[0][0] * a + matrix[0][1] * b;
        m[k][col] = matrix[1][0] * a + matrix[1][1] * b;
    }
}

/// Eliminate `m[k][col]` against pivot `m[col][col]`, returning the 2x2
/// unitary that does it (a standard Givens rotation in the `(col, k)`
/// two-dimensional subspace).
fn givens(m: &DenseMatrix, col: usize, k: usize) -> Option<Matrix2> {
    let a = m[col][col];
    let b = m[k][col];
    let r = (a.norm_sqr() + b.norm_sqr()).sqrt();
    if r < ELIMINATION_EPS {
        return None;
    }
    Some([[a.conj() / r, b.conj() / r], [b / r, -a / r]])
}

fn gray_path(i: usize, k: usize) -> Vec<usize> {
    let mut path = vec![i];
    let mut current = i;
    loop {
        let diff = current ^ k;
        if diff == 0 {
            break;
        }
        let bit = diff & diff.wrapping_neg();
        current ^= bit;
        path.push(current);
    }
    path
}

fn with_pattern_sandwich(circuit: &mut Circuit, n_qubits: usize, pattern: usize, exclude: usize, body: impl FnOnce(&mut Circuit, &[usize]) -> Result<()>) -> Result<()> {
    let controls: Vec<usize> = (0..n_qubits).filter(|&q| q != exclude).collect();
    let zero_controls: Vec<usize> = controls.iter().copied().filter(|&q| pattern & (1 << q) == 0).collect();
    for &q in &zero_controls {
        circuit.x(q)?;
    }
    body(circuit, &controls)?;
    for &q in &zero_controls {
        circuit.x(q)?;
    }
    Ok(())
}

fn emit_controlled_x_step(circuit: &mut Circuit, n_qubits: usize, pattern: usize, target: usize) -> Result<()> {
    with_pattern_sandwich(circuit, n_qubits, pattern, target, |circuit, controls| multi_controlled_x(circuit, controls, target))
}

fn emit_controlled_u_step(circuit: &mut Circuit, n_qubits: usize, pattern: usize, target: usize, matrix: &Matrix2) -> Result<()> {
    with_pattern_sandwich(circuit, n_qubits, pattern, target, |circuit, controls| multi_controlled_u(circuit, controls, target, matrix))
}

/// Emit the elementary-gate sequence for a 2x2 `matrix` acting on the
/// two-level subspace spanned by computational basis states `i` and `k`.
/// Walks a single-bit-flip (Gray code) path from `i` to `k`, using every
/// intermediate flip as a plain multi-controlled-X and the final flip as
/// the multi-controlled `matrix`.
fn emit_two_level(circuit: &mut Circuit, n_qubits: usize, i: usize, k: usize, matrix: &Matrix2) -> Result<()> {
    let path = gray_path(i, k);
    let steps = path.len() - 1;
    for idx in 0..steps.saturating_sub(1) {
        let (from, to) = (path[idx], path[idx + 1]);
        let bit = from ^ to;
        emit_controlled_x_step(circuit, n_qubits, from, bit.trailing_zeros() as usize)?;
    }
    let second_last = path[steps - 1];
    let bit = second_last ^ k;
    emit_controlled_u_step(circuit, n_qubits, second_last, bit.trailing_zeros() as usize, matrix)?;
    for idx in (0..steps.saturating_sub(1)).rev() {
        let (from, to) = (path[idx], path[idx + 1]);
        let bit = from ^ to;
        emit_controlled_x_step(circuit, n_qubits, from, bit.trailing_zeros() as usize)?;
    }
    Ok(())
}

/// Decompose a `2^n x 2^n` unitary into elementary gates.
pub fn synthesize(u: &DenseMatrix) -> Result<Circuit> {
    let dim = u.len();
    if dim == 0 || !u.iter().all(|row| row.len() == dim) {
        return Err(Error::Semantics("two-level decomposition requires a square matrix".to_string()));
    }
    if !is_power_of_two(dim) {
        return Err(Error::Semantics("matrix dimension must be a power of two".to_string()));
    }
    if !is_unitary(u) {
        return Err(Error::Semantics("matrix is not unitary".to_string()));
    }
    let n_qubits = log2_exact(dim);
    let mut m = u.clone();
    let mut ops: Vec<TwoLevelOp> = Vec::new();

    for col in 0..dim.saturating_sub(1) {
        for row in (col + 1)..dim {
            if m[row][col].norm() < ELIMINATION_EPS {
                continue;
            }
            let Some(matrix) = givens(&m, col, row) else { continue };
            apply_rows(&mut m, col, row, &matrix);
            ops.push(TwoLevelOp { i: col, k: row, matrix });
        }
    }

    let last = dim - 1;
    for i in 0..last {
        let d_i = m[i][i];
        let d_last = m[last][last];
        if d_i.norm() < ELIMINATION_EPS {
            continue;
        }
        let phase = d_i.conj() * d_last;
        let matrix: Matrix2 = [[phase, Complex64::new(0.0, 0.0)], [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)]];
        apply_rows(&mut m, i, last, &matrix);
        ops.push(TwoLevelOp { i, k: last, matrix });
    }

    let mut circuit = Circuit::new(n_qubits.max(1));
    for op in ops.iter().rev() {
        let adjoint = conjugate_transpose(&op.matrix);
        emit_two_level(&mut circuit, n_qubits.max(1), op.i, op.k, &adjoint)?;
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::tensor;

    fn identity(dim: usize) -> DenseMatrix {
        (0..dim)
            .map(|i| (0..dim).map(|j| if i == j { Complex64::new(1.0, 0.0) } else { Complex64::new(0.0, 0.0) }).collect())
            .collect()
    }

    fn cx_matrix() -> DenseMatrix {
        let z = Complex64::new(0.0, 0.0);
        let o = Complex64::new(1.0, 0.0);
        vec![vec![o, z, z, z], vec![z, o, z, z], vec![z, z, z, o], vec![z, z, o, z]]
    }

    #[test]
    fn identity_matrix_synthesizes_to_an_empty_circuit() {
        let circuit = synthesize(&identity(4)).unwrap();
        assert!(circuit.is_empty());
    }

    #[test]
    fn two_by_two_identity_synthesizes_to_a_single_empty_qubit() {
        let circuit = synthesize(&identity(2)).unwrap();
        assert_eq!(circuit.n_qubits(), 1);
        assert!(circuit.is_empty());
        assert!(crate::io::qasm::write(&circuit).contains("qreg q[1]"));
    }

    #[test]
    fn rejects_non_square_input() {
        let m = vec![vec![Complex64::new(1.0, 0.0)], vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)]];
        assert!(synthesize(&m).is_err());
    }

    #[test]
    fn rejects_non_unitary_input() {
        let mut m = identity(2);
        m[0][0] = Complex64::new(2.0, 0.0);
        assert!(synthesize(&m).is_err());
    }

    #[test]
    fn cx_synthesis_reproduces_the_cx_statevector() {
        let synthesized = synthesize(&cx_matrix()).unwrap();

        let mut prepared = Circuit::new(2);
        prepared.h(0).unwrap();
        prepared.append(&synthesized).unwrap();
        let actual = tensor::simulate(&prepared).unwrap();

        let mut reference = Circuit::new(2);
        reference.h(0).unwrap();
        reference.cx(0, 1).unwrap();
        let expected = tensor::simulate(&reference).unwrap();

        assert!(tensor::states_equivalent(&actual, &expected));
    }
}
