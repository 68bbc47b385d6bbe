//! A dense statevector/tensor simulator used only as the small-qubit
//! equivalence oracle behind [`is_equivalent`] — never as a primary
//! representation. Falls back to direct statevector evolution when tableau
//! reduction alone is inconclusive, since
//! the elementary gate set is fixed and small.

use num_complex::Complex64;

use crate::circuit::{Circuit, GateType};
use crate::error::{Error, Result};
use crate::phase::Phase;

pub type Tensor = Vec<Complex64>;

const EQUIVALENCE_EPS: f64 = 1e-7;

/// The statevector `|0...0>` for `n_qubits`.
pub fn zero_state(n_qubits: usize) -> Tensor {
    let mut state = vec![Complex64::new(0.0, 0.0); 1 << n_qubits];
    state[0] = Complex64::new(1.0, 0.0);
    state
}

fn apply_single(state: &mut Tensor, qubit: usize, matrix: [[Complex64; 2]; 2]) {
    let bit = 1 << qubit;
    let n = state.len();
    for i in 0..n {
        if i & bit == 0 {
            let j = i | bit;
            let (a, b) = (state[i], state[j]);
            state[i] = matrix[0][0] * a + matrix[0][1] * b;
            state[j] = matrix[1][0] * a + matrix[1][1] * b;
        }
    }
}

fn apply_controlled(state: &mut Tensor, control: usize, target: usize, matrix: [[Complex64; 2]; 2]) {
    let cbit = 1 << control;
    let tbit = 1 << target;
    let n = state.len();
    for i in 0..n {
        if i & cbit != 0 && i & tbit == 0 {
            let j = i | tbit;
            let (a, b) = (state[i], state[j]);
            state[i] = matrix[0][0] * a + matrix[0][1] * b;
            state[j] = matrix[1][0] * a + matrix[1][1] * b;
        }
    }
}

fn apply_swap(state: &mut Tensor, a: usize, b: usize) {
    let abit = 1 << a;
    let bbit = 1 << b;
    let n = state.len();
    for i in 0..n {
        let has_a = i & abit != 0;
        let has_b = i & bbit != 0;
        if has_a && !has_b {
            let j = (i & !abit) | bbit;
            if j > i {
                state.swap(i, j);
            }
        } else if has_b && !has_a {
            let j = (i & !bbit) | abit;
            if j > i {
                state.swap(i, j);
            }
        }
    }
}

pub(crate) fn rz_matrix(theta: Phase) -> [[Complex64; 2]; 2] {
    let half = theta.to_f64() / 2.0;
    let e_neg = Complex64::from_polar(1.0, -half);
    let e_pos = Complex64::from_polar(1.0, half);
    [[e_neg, Complex64::new(0.0, 0.0)], [Complex64::new(0.0, 0.0), e_pos]]
}

pub(crate) fn rx_matrix(theta: Phase) -> [[Complex64; 2]; 2] {
    let half = theta.to_f64() / 2.0;
    let (c, s) = (half.cos(), half.sin());
    [[Complex64::new(c, 0.0), Complex64::new(0.0, -s)], [Complex64::new(0.0, -s), Complex64::new(c, 0.0)]]
}

pub(crate) fn ry_matrix(theta: Phase) -> [[Complex64; 2]; 2] {
    let half = theta.to_f64() / 2.0;
    let (c, s) = (half.cos(), half.sin());
    [[Complex64::new(c, 0.0), Complex64::new(-s, 0.0)], [Complex64::new(s, 0.0), Complex64::new(c, 0.0)]]
}

fn p_matrix(theta: Phase) -> [[Complex64; 2]; 2] {
    [[Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)], [Complex64::new(0.0, 0.0), Complex64::from_polar(1.0, theta.to_f64())]]
}

const SQRT1_2: f64 = std::f64::consts::FRAC_1_SQRT_2;

fn h_matrix() -> [[Complex64; 2]; 2] {
    let s = Complex64::new(SQRT1_2, 0.0);
    [[s, s], [s, -s]]
}

fn v_matrix() -> [[Complex64; 2]; 2] {
    let half = Complex64::new(0.5, 0.5);
    let half_conj = Complex64::new(0.5, -0.5);
    [[half, half_conj], [half_conj, half]]
}

fn vdg_matrix() -> [[Complex64; 2]; 2] {
    let half = Complex64::new(0.5, -0.5);
    let half_conj = Complex64::new(0.5, 0.5);
    [[half, half_conj], [half_conj, half]]
}

/// Run `circuit` forward from `|0...0>`, returning the resulting
/// statevector. Only meant for qubit counts small enough that `2^n`
/// amplitudes fit comfortably (the equivalence oracle caps this at
/// 7 qubits).
pub fn simulate(circuit: &Circuit) -> Result<Tensor> {
    if circuit.n_qubits() > 24 {
        return Err(Error::Unsupported("statevector simulation is only offered for small qubit counts".to_string()));
    }
    let mut state = zero_state(circuit.n_qubits());
    for gate in circuit.gates() {
        use GateType::*;
        match &gate.op {
            H => apply_single(&mut state, gate.qubits[0], h_matrix()),
            X => apply_single(&mut state, gate.qubits[0], [[Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)], [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]]),
            Y => apply_single(&mut state, gate.qubits[0], [[Complex64::new(0.0, 0.0), Complex64::new(0.0, -1.0)], [Complex64::new(0.0, 1.0), Complex64::new(0.0, 0.0)]]),
            Z => apply_single(&mut state, gate.qubits[0], [[Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)], [Complex64::new(0.0, 0.0), Complex64::new(-1.0, 0.0)]]),
            S => apply_single(&mut state, gate.qubits[0], p_matrix(Phase::new(1, 2))),
            Sdg => apply_single(&mut state, gate.qubits[0], p_matrix(Phase::new(-1, 2))),
            V => apply_single(&mut state, gate.qubits[0], v_matrix()),
            Vdg => apply_single(&mut state, gate.qubits[0], vdg_matrix()),
            Rx(theta) => apply_single(&mut state, gate.qubits[0], rx_matrix(*theta)),
            Ry(theta) => apply_single(&mut state, gate.qubits[0], ry_matrix(*theta)),
            Rz(theta) => apply_single(&mut state, gate.qubits[0], rz_matrix(*theta)),
            P(theta) => apply_single(&mut state, gate.qubits[0], p_matrix(*theta)),
            Cx => apply_controlled(
                &mut state,
                gate.qubits[0],
                gate.qubits[1],
                [[Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)], [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]],
            ),
            Cz => apply_controlled(
                &mut state,
                gate.qubits[0],
                gate.qubits[1],
                [[Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)], [Complex64::new(0.0, 0.0), Complex64::new(-1.0, 0.0)]],
            ),
            Swap => apply_swap(&mut state, gate.qubits[0], gate.qubits[1]),
        }
    }
    Ok(state)
}

/// Whether two statevectors are equal up to a global phase, within
/// [`EQUIVALENCE_EPS`].
pub fn states_equivalent(a: &Tensor, b: &Tensor) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let inner: Complex64 = a.iter().zip(b).map(|(x, y)| x.conj() * y).sum();
    let norm_a: f64 = a.iter().map(|c| c.norm_sqr()).sum();
    let norm_b: f64 = b.iter().map(|c| c.norm_sqr()).sum();
    (inner.norm_sqr() - norm_a * norm_b).abs() < EQUIVALENCE_EPS
}

/// Circuit equivalence up to global phase, computed by full statevector
/// simulation. The caller (`crate::convert::is_equivalent`) only reaches
/// for this when the tableau-based fast path is inconclusive and the
/// qubit count is small.
pub fn circuits_equivalent(a: &Circuit, b: &Circuit) -> Result<bool> {
    if a.n_qubits() != b.n_qubits() {
        return Ok(false);
    }
    let sa = simulate(a)?;
    let sb = simulate(b)?;
    Ok(states_equivalent(&sa, &sb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h_h_is_identity_up_to_phase() {
        let mut c = Circuit::new(1);
        c.h(0).unwrap();
        c.h(0).unwrap();
        let state = simulate(&c).unwrap();
        assert!(states_equivalent(&state, &zero_state(1)));
    }

    #[test]
    fn cx_entangles_two_qubits() {
        let mut c = Circuit::new(2);
        c.h(0).unwrap();
        c.cx(0, 1).unwrap();
        let state = simulate(&c).unwrap();
        let bell = vec![Complex64::new(SQRT1_2, 0.0), Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0), Complex64::new(SQRT1_2, 0.0)];
        assert!(states_equivalent(&state, &bell));
    }

    #[test]
    fn different_circuits_are_not_equivalent() {
        let mut a = Circuit::new(1);
        a.h(0).unwrap();
        let mut b = Circuit::new(1);
        b.x(0).unwrap();
        assert!(!circuits_equivalent(&a, &b).unwrap());
    }
}
