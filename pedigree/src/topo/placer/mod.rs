//! This module contains the placer, the code that assigns X coordinates to
//! all of the vertices of the layered graph. The Y coordinates only depend on
//! the rank and are assigned by the layout.

use crate::adt::base_graph::BaseGraph;
use crate::core::base::VertexId;

mod align_down;
mod center_up;
mod verifier;

pub mod place;
pub mod xcoord;
pub use place::Placer;
pub use xcoord::{LayoutFrame, XCoord};

/// \returns True if \p v is a parentless person with a single relationship.
/// Such a person married into the family and is free to follow its partner.
pub(crate) fn is_married_in(graph: &BaseGraph, v: VertexId) -> bool {
    graph.is_person(v)
        && graph.predecessors(v).is_empty()
        && graph.relationships_of(v).len() == 1
}
