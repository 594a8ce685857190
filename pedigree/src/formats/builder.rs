//! Helpers shared by the importers and by the editing operations for growing
//! a pedigree graph one family at a time.

use crate::adt::base_graph::BaseGraph;
use crate::core::base::{VertexId, VertexType};
use crate::core::error::{PedigreeError, Result};
use crate::core::properties::{Gender, Properties};
use std::collections::HashMap;

pub const DEFAULT_EDGE_WEIGHT: usize = 1;

/// Create a relationship between \p a and \p b together with its childhub.
/// \returns the relationship and the childhub.
pub fn add_relationship(
    graph: &mut BaseGraph,
    a: VertexId,
    b: VertexId,
) -> Result<(VertexId, VertexId)> {
    graph.check_kind(a, VertexType::Person)?;
    graph.check_kind(b, VertexType::Person)?;
    if a == b {
        return Err(PedigreeError::invalid_edge(a, b, "a person can't partner itself"));
    }
    if let Some(rel) = graph.relationship_between(a, b) {
        return Err(PedigreeError::invalid_vertex(
            rel,
            format!("{} and {} already have a relationship", a, b),
        ));
    }

    let rel = graph.add_vertex(None, VertexType::Relationship, Properties::default(), None)?;
    let hub = graph.add_vertex(None, VertexType::Childhub, Properties::default(), None)?;
    graph.add_edge(rel, hub, DEFAULT_EDGE_WEIGHT)?;
    graph.add_edge(a, rel, DEFAULT_EDGE_WEIGHT)?;
    graph.add_edge(b, rel, DEFAULT_EDGE_WEIGHT)?;
    Ok((rel, hub))
}

/// Add a person standing in for a parent that the input does not name.
pub fn add_unknown_parent(graph: &mut BaseGraph, gender: Gender) -> Result<VertexId> {
    let mut props = Properties::with_gender(gender);
    props.comments = Some("unknown".to_string());
    graph.add_vertex(None, VertexType::Person, props, None)
}

/// Remembers the relationship created for each pair of parents, so that all
/// the children of a couple hang from the same childhub.
#[derive(Debug, Default)]
pub struct RelationshipTracker {
    childhubs: HashMap<(VertexId, VertexId), VertexId>,
}

impl RelationshipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// \returns the childhub of the relationship between \p mother and
    /// \p father, creating both if this is the first child of the couple.
    pub fn create_or_get_childhub(
        &mut self,
        graph: &mut BaseGraph,
        mother: VertexId,
        father: VertexId,
    ) -> Result<VertexId> {
        let key = if mother < father {
            (mother, father)
        } else {
            (father, mother)
        };
        if let Some(hub) = self.childhubs.get(&key) {
            return Ok(*hub);
        }
        let (_, hub) = add_relationship(graph, mother, father)?;
        self.childhubs.insert(key, hub);
        Ok(hub)
    }

    /// \returns the number of relationships created so far.
    pub fn len(&self) -> usize {
        self.childhubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.childhubs.is_empty()
    }
}

/// Validate an imported graph, turning structural failures into import
/// errors that a user can act on.
pub fn validate_import(graph: &BaseGraph) -> Result<()> {
    match graph.validate() {
        Ok(()) => Ok(()),
        Err(PedigreeError::GraphInconsistency(msg)) if msg.contains("disconnected component") => {
            Err(PedigreeError::import(
                "some components of the imported pedigree are disconnected from each other",
            ))
        }
        Err(err) => Err(PedigreeError::import(err.to_string())),
    }
}

#[test]
fn test_tracker_reuses_childhub() {
    let mut g = BaseGraph::new();
    let mother = g
        .add_vertex(None, VertexType::Person, Properties::with_gender(Gender::Female), None)
        .unwrap();
    let father = g
        .add_vertex(None, VertexType::Person, Properties::with_gender(Gender::Male), None)
        .unwrap();
    let mut tracker = RelationshipTracker::new();
    let hub = tracker.create_or_get_childhub(&mut g, mother, father).unwrap();
    assert_eq!(tracker.create_or_get_childhub(&mut g, father, mother).unwrap(), hub);
    assert_eq!(tracker.len(), 1);
    assert_eq!(g.num_vertices(), 4);

    let rel = g.single_pred(hub).unwrap();
    assert_eq!(g.relationship_partners(rel), vec![mother, father]);
    assert!(add_relationship(&mut g, mother, father).is_err());
    assert!(add_relationship(&mut g, mother, mother).is_err());
}

#[test]
fn test_disconnected_import_message() {
    let mut g = BaseGraph::new();
    add_unknown_parent(&mut g, Gender::Male).unwrap();
    add_unknown_parent(&mut g, Gender::Female).unwrap();
    let err = validate_import(&g).unwrap_err();
    assert!(err.to_string().contains("disconnected"));
    assert_eq!(g.properties(VertexId::from(0)).comments.as_deref(), Some("unknown"));
}
