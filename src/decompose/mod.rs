//! Generic unitary synthesis: SU(2)/(multi-)controlled-U gate emission
//! and dense two-level unitary decomposition.
//! Used both standalone and by [`crate::io::qasm`] to lower multi-control
//! gates (`ccx`, `mcx`, `mcrz`, ...) into the elementary gate set.

pub mod su2;
pub mod two_level;

pub use su2::{controlled_u, multi_controlled_u, multi_controlled_x, single_qubit_unitary, sqrt_su2, to_bloch, Matrix2};
pub use two_level::{synthesize as two_level_synthesize, DenseMatrix};
