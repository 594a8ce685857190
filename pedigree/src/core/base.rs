//! Contains the enums, identifiers and simple data structures that are used
//! across the program.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Used by users to keep track of vertices that are saved in the graph. Ids
/// are dense slot indices and may be recycled after a vertex is removed.
#[derive(
    Copy,
    Clone,
    Default,
    PartialEq,
    PartialOrd,
    Eq,
    Ord,
    Hash,
    Debug,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct VertexId {
    idx: usize,
}

impl VertexId {
    pub fn new(x: usize) -> Self {
        VertexId { idx: x }
    }
    pub fn get_index(&self) -> usize {
        self.idx
    }
}

impl From<usize> for VertexId {
    fn from(idx: usize) -> Self {
        VertexId { idx }
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.idx)
    }
}

/// The kind of a vertex in the pedigree graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexType {
    /// A person, a placeholder or a group of persons.
    Person,
    /// Joins two partners. Has exactly one childhub.
    Relationship,
    /// Fans out from a relationship to all of its children.
    Childhub,
    /// A layout-only node that breaks an edge spanning several ranks.
    VirtualEdge,
}

impl VertexType {
    pub fn is_person(&self) -> bool {
        matches!(self, VertexType::Person)
    }
    pub fn is_relationship(&self) -> bool {
        matches!(self, VertexType::Relationship)
    }
    pub fn is_childhub(&self) -> bool {
        matches!(self, VertexType::Childhub)
    }
    pub fn is_virtual(&self) -> bool {
        matches!(self, VertexType::VirtualEdge)
    }

    /// Relationships and childhubs are the small connector nodes that sit on
    /// the lines between persons.
    pub fn is_relationship_or_childhub(&self) -> bool {
        matches!(self, VertexType::Relationship | VertexType::Childhub)
    }
}

impl fmt::Display for VertexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VertexType::Person => "person",
            VertexType::Relationship => "relationship",
            VertexType::Childhub => "childhub",
            VertexType::VirtualEdge => "virtual",
        };
        write!(f, "{}", name)
    }
}

/// The direction of a sweep over the ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the topmost rank towards the bottom.
    Down,
    /// From the bottom rank towards the top.
    Up,
}

impl Direction {
    pub fn is_down(&self) -> bool {
        matches!(self, Direction::Down)
    }
    pub fn is_up(&self) -> bool {
        matches!(self, Direction::Up)
    }
    pub fn reverse(&self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }
}

/// A position in the drawing plane, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[test]
fn test_vertex_id_roundtrip() {
    let id = VertexId::from(7);
    assert_eq!(id.get_index(), 7);
    assert_eq!(id, VertexId::new(7));
    assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    assert_eq!(format!("{}", id), "7");
}

#[test]
fn test_vertex_type_predicates() {
    assert!(VertexType::Relationship.is_relationship_or_childhub());
    assert!(VertexType::Childhub.is_relationship_or_childhub());
    assert!(!VertexType::Person.is_relationship_or_childhub());
    assert!(VertexType::VirtualEdge.is_virtual());
    assert_eq!(Direction::Down.reverse(), Direction::Up);
}
