//! Translators between external pedigree formats and the graph model.

pub mod builder;
pub mod internal;
pub mod json;
pub mod ped;
