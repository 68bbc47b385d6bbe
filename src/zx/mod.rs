//! The ZX-calculus representation: a graph of
//! spiders and Hadamard edges, a set of local rewrite rules, and an
//! extractor that turns a graph-like diagram back into a circuit.

pub mod extract;
pub mod graph;
pub mod simplify;
pub mod vertex;

pub use extract::{extraction_loop, ExtractConfig, OptimizeLevel};
pub use graph::ZxGraph;
pub use simplify::{apply, match_fusion, match_hadamard_cancel, match_identity_removal, match_local_complementation, match_pivot, Match, Rule};
pub use vertex::{EdgeType, VertexId, VertexType, ZxVertex};
