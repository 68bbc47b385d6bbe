//! 2x2 matrix builders shared between the [`super::qasm`] and [`super::qc`]
//! parsers for lowering `ccz`/`mcz`/`mcrz`/`mcrx`/`mcry`/`sx` into
//! elementary gates via [`crate::decompose::su2`].

use num_complex::Complex64;

use crate::decompose::su2::Matrix2;

pub(crate) use crate::convert::tensor::{rx_matrix, ry_matrix, rz_matrix};

pub(crate) fn z_matrix() -> Matrix2 {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    [[one, zero], [zero, Complex64::new(-1.0, 0.0)]]
}

pub(crate) fn sx_matrix() -> Matrix2 {
    let a = Complex64::new(0.5, 0.5);
    let b = Complex64::new(0.5, -0.5);
    [[a, b], [b, a]]
}
