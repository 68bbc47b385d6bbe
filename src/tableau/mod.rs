//! The stabilizer tableau and the tagged subtableau container built on top
//! of it.

mod container;
mod stabilizer;

pub use container::{ClassicalControlTableau, Subtableau, TableauContainer};
pub use stabilizer::{adjoint, extract_clifford_operators, Strategy};
pub use stabilizer::StabilizerTableau;
