//! A typed view over the PERSON vertices of a pedigree. A person vertex is
//! either a regular person, a placeholder for an unknown relative, or a group
//! of several persons drawn as one node. The exporters walk the pedigree
//! through this view.

use crate::adt::base_graph::BaseGraph;
use crate::core::base::{VertexId, VertexType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonNode {
    Person(VertexId),
    PlaceHolder(VertexId),
    PersonGroup { id: VertexId, size: usize },
}

impl PersonNode {
    /// Classify the person vertex \p v.
    pub fn new(graph: &BaseGraph, v: VertexId) -> PersonNode {
        let props = graph.properties(v);
        if props.placeholder {
            PersonNode::PlaceHolder(v)
        } else if props.num_persons > 0 {
            PersonNode::PersonGroup {
                id: v,
                size: props.num_persons,
            }
        } else {
            PersonNode::Person(v)
        }
    }

    pub fn id(&self) -> VertexId {
        match self {
            PersonNode::Person(id) | PersonNode::PlaceHolder(id) => *id,
            PersonNode::PersonGroup { id, .. } => *id,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PersonNode::PlaceHolder(_))
    }

    /// \returns the mother and the father of this node, if it has parents.
    pub fn parents(&self, graph: &BaseGraph) -> Option<(PersonNode, PersonNode)> {
        let rel = graph.producing_relationship(self.id())?;
        let (mother, father) = graph.mother_father(rel)?;
        Some((Self::new(graph, mother), Self::new(graph, father)))
    }

    /// \returns all person vertices of \p graph, classified.
    pub fn all(graph: &BaseGraph) -> Vec<PersonNode> {
        graph
            .vertices_of_type(VertexType::Person)
            .into_iter()
            .map(|v| Self::new(graph, v))
            .collect()
    }

    /// \returns the persons that the exporters write: everything but the
    /// placeholders, in vertex order.
    pub fn exported(graph: &BaseGraph) -> Vec<PersonNode> {
        Self::all(graph)
            .into_iter()
            .filter(|p| !p.is_placeholder())
            .collect()
    }
}

#[test]
fn test_classify() {
    use crate::adt::base_graph::make_trio;
    let (mut g, [father, mother, _, _, child]) = make_trio();
    g.properties_mut(mother).placeholder = true;
    g.properties_mut(child).num_persons = 3;

    assert_eq!(PersonNode::new(&g, father), PersonNode::Person(father));
    assert!(PersonNode::new(&g, mother).is_placeholder());

    let kid = PersonNode::new(&g, child);
    assert_eq!(kid, PersonNode::PersonGroup { id: child, size: 3 });
    assert_eq!(
        kid.parents(&g),
        Some((PersonNode::PlaceHolder(mother), PersonNode::Person(father)))
    );
    assert_eq!(PersonNode::new(&g, father).parents(&g), None);

    assert_eq!(PersonNode::all(&g).len(), 3);
    let exported: Vec<VertexId> = PersonNode::exported(&g).iter().map(|p| p.id()).collect();
    assert_eq!(exported, vec![father, child]);
}
