//! SU(2) synthesis: turning a single 2x2 unitary into elementary gates,
//! plain or (multi-)controlled, via a Bloch-sphere decomposition and the
//! standard controlled-U / multi-controlled-U constructions.
//!
//! The multi-controlled recursion below follows the standard
//! `V = sqrt(U)` identity `C^n(U) = C(V) ; C^{n-1}(X) ; C(V^dagger) ;
//! C^{n-1}(X) ; C^{n-1}(V)` directly, taking care that the third branch's
//! operand is `V`, not `U` or a stray adjoint — a transcription slip that's
//! easy to make in this recursion and breaks the identity silently.

use num_complex::Complex64;

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::phase::Phase;

pub type Matrix2 = [[Complex64; 2]; 2];

/// Angles of a 2x2 unitary's Bloch-sphere decomposition:
/// `U = e^{i*global_phase} * Rz(lambda+mu) * Ry(2*theta) * Rz(lambda-mu)`... -
/// rather, `theta`, `global_phase`, `lambda`, `mu` as read directly off
/// `U00`/`U01`/`det(U)`.
#[derive(Debug, Clone, Copy)]
pub struct Bloch {
    pub theta: f64,
    pub global_phase: f64,
    pub lambda: f64,
    pub mu: f64,
}

const UNITARY_EPS: f64 = 1e-3;
const PHASE_DENOMINATOR: i64 = 1 << 20;

fn det(u: &Matrix2) -> Complex64 {
    u[0][0] * u[1][1] - u[0][1] * u[1][0]
}

pub fn conjugate_transpose(u: &Matrix2) -> Matrix2 {
    [[u[0][0].conj(), u[1][0].conj()], [u[0][1].conj(), u[1][1].conj()]]
}

fn matmul(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    let mut out = [[Complex64::new(0.0, 0.0); 2]; 2];
    for i in 0..2 {
        for j in 0..2 {
            out[i][j] = a[i][0] * b[0][j] + a[i][1] * b[1][j];
        }
    }
    out
}

pub const PAULI_X: Matrix2 = {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    [[zero, one], [one, zero]]
};

/// Decompose `u` into Bloch angles. Errors if `u`'s first row isn't
/// (close to) unit norm, an unambiguous unitarity check.
pub fn to_bloch(u: &Matrix2) -> Result<Bloch> {
    let row_norm = u[0][0].norm_sqr() + u[0][1].norm_sqr();
    if (row_norm - 1.0).abs() > UNITARY_EPS {
        return Err(Error::Semantics("matrix is not unitary to within tolerance".to_string()));
    }
    let theta = u[0][0].norm().clamp(-1.0, 1.0).acos();
    let global_phase = det(u).arg() / 2.0;
    let lambda = u[0][0].arg() - global_phase;
    let mu = u[0][1].arg() - global_phase;
    Ok(Bloch { theta, global_phase, lambda, mu })
}

/// `V` with `V*V == U`, via the closed form `s = sqrt(det U)`,
/// `t = sqrt(tr(U) + 2s)`, `V = (U + s*I) / t`.
pub fn sqrt_su2(u: &Matrix2) -> Matrix2 {
    let s = det(u).sqrt();
    let trace = u[0][0] + u[1][1];
    let t = (trace + 2.0 * s).sqrt();
    [[(u[0][0] + s) / t, u[0][1] / t], [u[1][0] / t, (u[1][1] + s) / t]]
}

/// Synthesize a bare (uncontrolled) single-qubit unitary as `Rz(lambda);
/// Ry(theta); Rz(phi)`, dropping the global phase (every equivalence
/// check in this crate is already up to global phase). Uses `U00`/`U10`
/// directly rather than `to_bloch`'s `U01`-based `mu`, since `U01`'s
/// extra minus sign in the Euler expansion shifts its argument by `pi`
/// relative to `U10`'s — `controlled_u` absorbs that shift inside the
/// CX sandwich, but a bare ZYZ synthesis has no such sandwich to absorb it.
pub fn single_qubit_unitary(circuit: &mut Circuit, qubit: usize, u: &Matrix2) -> Result<()> {
    let row_norm = u[0][0].norm_sqr() + u[0][1].norm_sqr();
    if (row_norm - 1.0).abs() > UNITARY_EPS {
        return Err(Error::Semantics("matrix is not unitary to within tolerance".to_string()));
    }
    let global_phase = det(u).arg() / 2.0;
    let theta = 2.0 * u[0][0].norm().clamp(-1.0, 1.0).acos();
    let phi = u[1][0].arg() - u[0][0].arg();
    let lambda = -u[0][0].arg() - u[1][0].arg() + 2.0 * global_phase;
    circuit.rz(qubit, Phase::approximate(lambda, PHASE_DENOMINATOR))?;
    circuit.ry(qubit, Phase::approximate(theta, PHASE_DENOMINATOR))?;
    circuit.rz(qubit, Phase::approximate(phi, PHASE_DENOMINATOR))?;
    Ok(())
}

/// The fixed 7-gate controlled-U sequence:
/// `Rz(-mu) t; CX c,t; Rz(-lambda) t; Ry(-theta) t; CX c,t; Ry(theta) t; Rz(lambda+mu) t`.
pub fn controlled_u(circuit: &mut Circuit, control: usize, target: usize, u: &Matrix2) -> Result<()> {
    let b = to_bloch(u)?;
    circuit.rz(target, Phase::approximate(-b.mu, PHASE_DENOMINATOR))?;
    circuit.cx(control, target)?;
    circuit.rz(target, Phase::approximate(-b.lambda, PHASE_DENOMINATOR))?;
    circuit.ry(target, Phase::approximate(-b.theta, PHASE_DENOMINATOR))?;
    circuit.cx(control, target)?;
    circuit.ry(target, Phase::approximate(b.theta, PHASE_DENOMINATOR))?;
    circuit.rz(target, Phase::approximate(b.lambda + b.mu, PHASE_DENOMINATOR))?;
    Ok(())
}

/// `C^n(U)` for any number of controls, via the `V = sqrt(U)` recursion:
/// `C(V) ; C^{n-1}(X) ; C(V^dagger) ; C^{n-1}(X) ; C^{n-1}(V)`.
pub fn multi_controlled_u(circuit: &mut Circuit, controls: &[usize], target: usize, u: &Matrix2) -> Result<()> {
    match controls {
        [] => single_qubit_unitary(circuit, target, u),
        [c] => controlled_u(circuit, *c, target, u),
        _ => {
            let (rest, last_slice) = controls.split_at(controls.len() - 1);
            let last = last_slice[0];
            let v = sqrt_su2(u);
            let v_dag = conjugate_transpose(&v);
            controlled_u(circuit, last, target, &v)?;
            multi_controlled_x(circuit, rest, last)?;
            controlled_u(circuit, last, target, &v_dag)?;
            multi_controlled_x(circuit, rest, last)?;
            multi_controlled_u(circuit, rest, target, &v)
        }
    }
}

/// `C^n(X)`, synthesized through the same recursion with `U = X`.
pub fn multi_controlled_x(circuit: &mut Circuit, controls: &[usize], target: usize) -> Result<()> {
    match controls {
        [] => circuit.x(target).map(|_| ()),
        [c] => circuit.cx(*c, target).map(|_| ()),
        _ => multi_controlled_u(circuit, controls, target, &PAULI_X),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::tensor;

    fn hadamard() -> Matrix2 {
        let s = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        [[s, s], [s, -s]]
    }

    #[test]
    fn to_bloch_rejects_non_unitary_input() {
        let m = [[Complex64::new(2.0, 0.0), Complex64::new(0.0, 0.0)], [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)]];
        assert!(to_bloch(&m).is_err());
    }

    #[test]
    fn single_qubit_synthesis_matches_hadamard_statevector() {
        let mut c = Circuit::new(1);
        single_qubit_unitary(&mut c, 0, &hadamard()).unwrap();
        let state = tensor::simulate(&c).unwrap();
        let expected = tensor::simulate(&{
            let mut h = Circuit::new(1);
            h.h(0).unwrap();
            h
        })
        .unwrap();
        assert!(tensor::states_equivalent(&state, &expected));
    }

    #[test]
    fn controlled_hadamard_matches_reference_cx_free_cases() {
        let mut c = Circuit::new(2);
        controlled_u(&mut c, 0, 1, &hadamard()).unwrap();
        // control off: target stays |0>
        let state = tensor::simulate(&c).unwrap();
        assert!((state[0] - Complex64::new(1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn double_controlled_x_matches_toffoli() {
        let mut c = Circuit::new(3);
        c.x(0).unwrap();
        c.x(1).unwrap();
        multi_controlled_x(&mut c, &[0, 1], 2).unwrap();
        let state = tensor::simulate(&c).unwrap();
        let one_one_one = 0b111;
        assert!((state[one_one_one] - Complex64::new(1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn sqrt_su2_squares_back_to_input() {
        let u = hadamard();
        let v = sqrt_su2(&u);
        let vv = matmul(&v, &v);
        assert!((vv[0][0] - u[0][0]).norm() < 1e-6);
        assert!((vv[0][1] - u[0][1]).norm() < 1e-6);
    }
}
