//! Text format input/output for circuits and ZX-diagrams:
//! OPENQASM 2.0, `.qc`, and the ZX text format. Each submodule owns a
//! grammar; this file only wires them together.

mod qasm_shared;

pub mod qasm;
pub mod qc;
pub mod zx_text;
