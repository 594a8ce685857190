//! Graph data structures: the pedigree graph itself, the per-rank ordering of
//! its vertices and the typed view over person vertices.

pub mod base_graph;
pub mod ordering;
pub mod person;
