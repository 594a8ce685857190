//! The serialized form of a pedigree: the vertex/edge list of the graph, the
//! proband and, optionally, the layered layout that was computed for it. This
//! is what the editor stores and what the undo stack snapshots.

use crate::adt::base_graph::BaseGraph;
use crate::adt::ordering::RankType;
use crate::core::base::{VertexId, VertexType};
use crate::core::error::Result;
use crate::core::options::LayoutOptions;
use crate::core::properties::Properties;
use crate::formats::builder::DEFAULT_EDGE_WEIGHT;
use serde::{Deserialize, Serialize};

fn default_weight() -> usize {
    DEFAULT_EDGE_WEIGHT
}

fn is_default_weight(w: &usize) -> bool {
    *w == DEFAULT_EDGE_WEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedEdge {
    pub to: VertexId,
    #[serde(default = "default_weight", skip_serializing_if = "is_default_weight")]
    pub weight: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedVertex {
    pub id: VertexId,
    #[serde(rename = "type")]
    pub kind: VertexType,
    /// Only stored when it differs from the default width of the kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outedges: Vec<SerializedEdge>,
}

/// The layered layout: ranks and coordinates are indexed by the ids of the
/// layered graph, which places its virtual vertices after the real ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedLayout {
    pub ranks: Vec<usize>,
    pub order: RankType,
    pub positions: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedPedigree {
    #[serde(rename = "GG")]
    pub vertices: Vec<SerializedVertex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proband: Option<VertexId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<SerializedLayout>,
}

impl SerializedPedigree {
    /// Describe \p graph. Virtual vertices are not part of the model and are
    /// collapsed first.
    pub fn from_graph(graph: &BaseGraph, proband: Option<VertexId>) -> Self {
        let collapsed;
        let graph = if graph.iter().any(|v| graph.is_virtual(v)) {
            collapsed = graph.collapse_virtual_edges();
            &collapsed
        } else {
            graph
        };

        let vertices = graph
            .iter()
            .map(|v| {
                let kind = graph.kind(v);
                let width = graph.width(v);
                SerializedVertex {
                    id: v,
                    kind,
                    width: (width != graph.default_width(kind)).then_some(width),
                    properties: graph.properties(v).clone(),
                    outedges: graph
                        .out_edges(v)
                        .iter()
                        .map(|e| SerializedEdge {
                            to: e.to,
                            weight: e.weight,
                        })
                        .collect(),
                }
            })
            .collect();

        SerializedPedigree {
            vertices,
            proband,
            layout: None,
        }
    }

    /// Rebuild the graph with the stored ids. Edges are added once all the
    /// vertices exist, so forward references are fine.
    pub fn to_graph(&self, options: &LayoutOptions) -> Result<BaseGraph> {
        let mut graph = BaseGraph::from_options(options);
        for v in &self.vertices {
            graph.add_vertex(Some(v.id), v.kind, v.properties.clone(), v.width)?;
        }
        for v in &self.vertices {
            for e in &v.outedges {
                graph.add_edge(v.id, e.to, e.weight)?;
            }
        }
        Ok(graph)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[test]
fn test_graph_roundtrip() {
    use crate::adt::base_graph::make_trio;
    let (mut g, [_, _, _, hub, child]) = make_trio();
    g.properties_mut(child).first_name = Some("Kid".to_string());
    g.remove_edge(hub, child).unwrap();
    g.add_edge(hub, child, 3).unwrap();

    let data = SerializedPedigree::from_graph(&g, Some(child));
    let text = data.to_json().unwrap();
    assert!(text.contains("\"GG\""));
    assert!(text.contains("\"weight\": 3"));

    let back = SerializedPedigree::from_json(&text).unwrap();
    assert_eq!(back, data);
    let g2 = back.to_graph(&LayoutOptions::default()).unwrap();
    assert_eq!(g2, g);
    assert_eq!(back.proband, Some(child));
}

#[test]
fn test_virtual_vertices_are_not_stored() {
    use crate::adt::base_graph::make_trio;
    let (g, _) = make_trio();
    let ranks = vec![0, 0, 0, 1, 4];
    let (layered, _) = g.split_multi_rank_edges(&ranks).unwrap();
    assert!(layered.num_vertices() > g.num_vertices());
    let data = SerializedPedigree::from_graph(&layered, None);
    assert_eq!(data.vertices.len(), g.num_vertices());
    assert!(data.vertices.iter().all(|v| v.kind != VertexType::VirtualEdge));
}

#[test]
fn test_reject_bad_input() {
    let text = r#"{"GG":[{"id":0,"type":"person"},{"id":0,"type":"person"}]}"#;
    let data = SerializedPedigree::from_json(text).unwrap();
    assert!(data.to_graph(&LayoutOptions::default()).is_err());
    assert!(SerializedPedigree::from_json("{\"GG\": 3}").is_err());
}
