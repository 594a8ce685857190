//! This module assigns every vertex of a pedigree a rank (generation level).
//! Partners and their relationship share a rank, the childhub sits one rank
//! below the relationship and the children one rank below the childhub:
//!
//! ```text
//!   rank 0:   father -- rel -- mother
//!   rank 1:              hub
//!   rank 2:             child
//! ```
//!
//! Persons and relationships therefore always land on even ranks, childhubs
//! on odd ranks. Ranks are computed as longest paths from the roots, which is
//! the smallest assignment keeping every parent above its children. After
//! that, parentless persons that married into the family are pulled down to
//! the rank of their partner. When both partners are pinned by their own
//! ancestry and end up on different ranks, the relationship sits on the rank
//! of the lower partner and the edge from the upper partner is later broken
//! into a chain of virtual nodes.

use crate::adt::base_graph::BaseGraph;
use crate::core::base::VertexId;
use crate::core::error::{PedigreeError, Result};
use crate::core::options::LayoutOptions;

pub struct Ranker<'a> {
    graph: &'a BaseGraph,
    options: &'a LayoutOptions,
}

impl<'a> Ranker<'a> {
    pub fn new(graph: &'a BaseGraph, options: &'a LayoutOptions) -> Self {
        Self { graph, options }
    }

    /// \returns the rank of each vertex, indexed by the vertex id. Free slots
    /// get rank zero.
    pub fn compute(&self) -> Result<Vec<usize>> {
        #[cfg(feature = "log")]
        log::info!("Ranking {} vertices.", self.graph.num_vertices());

        let order = self.topological_sort()?;
        let mut ranks = vec![0; self.graph.len()];
        self.relax(&order, &mut ranks);
        self.sink_parentless_partners(&order, &mut ranks);
        Self::normalize(&mut ranks);
        self.verify(&ranks);

        #[cfg(feature = "log")]
        log::info!(
            "Ranked into {} levels.",
            ranks.iter().max().map_or(0, |r| r + 1)
        );
        Ok(ranks)
    }

    /// The minimal rank distance along the edge \p from -> \p to. A partner
    /// edge is horizontal, every other edge goes one rank down.
    pub fn edge_delta(&self, from: VertexId, to: VertexId) -> usize {
        if self.graph.is_person(from) && self.graph.is_relationship(to) {
            return 0;
        }
        1
    }

    /// Return the topological sort order of the vertices. This is implemented
    /// as the reverse post order scan. Finding an edge back into the current
    /// DFS path means that someone is their own ancestor.
    fn topological_sort(&self) -> Result<Vec<VertexId>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            New,
            InProgress,
            Done,
        }

        let mut order: Vec<VertexId> = Vec::new();
        let mut state = vec![State::New; self.graph.len()];

        // A tuple of handle, and command:
        // true- all children were handled, emit the vertex.
        // false- this is a vertex to visit.
        let mut worklist: Vec<(VertexId, bool)> = Vec::new();
        for v in self.graph.iter() {
            worklist.push((v, false));
        }

        while let Some((current, cmd)) = worklist.pop() {
            if cmd {
                state[current.get_index()] = State::Done;
                order.push(current);
                continue;
            }

            match state[current.get_index()] {
                State::Done => continue,
                // Everything above the emit command of an in-progress vertex
                // was pushed by its own subtree.
                State::InProgress => {
                    #[cfg(feature = "log")]
                    log::warn!("Found a cycle through vertex {}.", current);
                    return Err(PedigreeError::CyclicPedigree { vertex: current });
                }
                State::New => {}
            }

            state[current.get_index()] = State::InProgress;
            worklist.push((current, true));
            for succ in self.graph.successors(current) {
                if state[succ.get_index()] != State::Done {
                    worklist.push((succ, false));
                }
            }
        }

        order.reverse();
        Ok(order)
    }

    /// Raise the ranks in \p ranks until every edge satisfies its minimal
    /// delta, visiting the vertices in topological \p order.
    fn relax(&self, order: &[VertexId], ranks: &mut [usize]) {
        for src in order {
            for dest in self.graph.successors(*src) {
                let delta = self.edge_delta(*src, dest);
                let min = ranks[src.get_index()] + delta;
                if ranks[dest.get_index()] < min {
                    ranks[dest.get_index()] = min;
                }
            }
        }
    }

    /// Move each parentless person with partners down to the highest rank it
    /// can take without pointing a partner edge upwards, which is the lowest
    /// rank of its relationships.
    fn sink_parentless_partners(&self, order: &[VertexId], ranks: &mut [usize]) {
        for _ in 0..self.options.max_rank_iterations {
            let mut changed = false;
            for v in self.graph.iter() {
                if !self.graph.is_person(v) || !self.graph.predecessors(v).is_empty() {
                    continue;
                }
                let target = self
                    .graph
                    .relationships_of(v)
                    .iter()
                    .map(|r| ranks[r.get_index()])
                    .min();
                if let Some(target) = target {
                    if target > ranks[v.get_index()] {
                        ranks[v.get_index()] = target;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
            self.relax(order, ranks);
        }
    }

    /// Shift the ranks so that the topmost rank is zero, preserving parity.
    fn normalize(ranks: &mut [usize]) {
        if let Some(min) = ranks.iter().min().copied() {
            let shift = min - min % 2;
            for r in ranks.iter_mut() {
                *r -= shift;
            }
        }
    }

    fn verify(&self, ranks: &[usize]) {
        for src in self.graph.iter() {
            for dest in self.graph.successors(src) {
                assert!(
                    ranks[dest.get_index()] >= ranks[src.get_index()] + self.edge_delta(src, dest),
                    "Edge {} -> {} violates the rank order",
                    src,
                    dest
                );
            }
        }
    }
}

/// Compute the ranks of \p graph. See Ranker.
pub fn compute_ranks(graph: &BaseGraph, options: &LayoutOptions) -> Result<Vec<usize>> {
    Ranker::new(graph, options).compute()
}

#[cfg(test)]
fn add_person(g: &mut BaseGraph) -> VertexId {
    use crate::core::base::VertexType;
    use crate::core::properties::Properties;
    g.add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap()
}

#[cfg(test)]
fn add_couple(g: &mut BaseGraph, a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    use crate::core::base::VertexType;
    use crate::core::properties::Properties;
    let rel = g
        .add_vertex(None, VertexType::Relationship, Properties::default(), None)
        .unwrap();
    let hub = g
        .add_vertex(None, VertexType::Childhub, Properties::default(), None)
        .unwrap();
    g.add_edge(a, rel, 1).unwrap();
    g.add_edge(b, rel, 1).unwrap();
    g.add_edge(rel, hub, 1).unwrap();
    (rel, hub)
}

#[test]
fn test_trio_ranks() {
    use crate::adt::base_graph::make_trio;
    let (g, [father, mother, rel, hub, child]) = make_trio();
    let ranks = compute_ranks(&g, &LayoutOptions::default()).unwrap();
    assert_eq!(ranks[father.get_index()], 0);
    assert_eq!(ranks[mother.get_index()], 0);
    assert_eq!(ranks[rel.get_index()], 0);
    assert_eq!(ranks[hub.get_index()], 1);
    assert_eq!(ranks[child.get_index()], 2);
}

#[test]
fn test_married_in_partner_is_pulled_down() {
    use crate::adt::base_graph::make_trio;
    let (mut g, [_, _, _, _, child]) = make_trio();
    let spouse = add_person(&mut g);
    let (rel2, hub2) = add_couple(&mut g, child, spouse);
    let grandchild = add_person(&mut g);
    g.add_edge(hub2, grandchild, 1).unwrap();
    g.validate().unwrap();

    let ranks = compute_ranks(&g, &LayoutOptions::default()).unwrap();
    assert_eq!(ranks[spouse.get_index()], 2);
    assert_eq!(ranks[rel2.get_index()], 2);
    assert_eq!(ranks[grandchild.get_index()], 4);
}

#[test]
fn test_partners_pinned_on_different_ranks() {
    use crate::adt::base_graph::make_trio;
    // A half sibling of the child (rank 2) marries the child's own child
    // (rank 4).
    let (mut g, [father, _, _, _, child]) = make_trio();
    let spouse = add_person(&mut g);
    let (_, hub2) = add_couple(&mut g, child, spouse);
    let grandchild = add_person(&mut g);
    g.add_edge(hub2, grandchild, 1).unwrap();

    let other_parent = add_person(&mut g);
    let (_, hub3) = add_couple(&mut g, father, other_parent);
    let half_sibling = add_person(&mut g);
    g.add_edge(hub3, half_sibling, 1).unwrap();
    let (rel4, _) = add_couple(&mut g, half_sibling, grandchild);
    g.validate().unwrap();

    let ranks = compute_ranks(&g, &LayoutOptions::default()).unwrap();
    assert_eq!(ranks[half_sibling.get_index()], 2);
    assert_eq!(ranks[grandchild.get_index()], 4);
    // The relationship sits with the lower partner.
    assert_eq!(ranks[rel4.get_index()], 4);
    // Only the upper partner needs a virtual chain down to it.
    let span = |a: VertexId, b: VertexId| ranks[b.get_index()] - ranks[a.get_index()];
    assert_eq!(span(half_sibling, rel4), 2);
    assert_eq!(span(grandchild, rel4), 0);
}

#[test]
fn test_cycle_is_reported() {
    use crate::adt::base_graph::make_trio;
    let (mut g, [father, _, _, _, child]) = make_trio();
    // The child becomes a parent of its own father.
    let other = add_person(&mut g);
    let (_, hub2) = add_couple(&mut g, child, other);
    g.add_edge(hub2, father, 1).unwrap();

    let res = compute_ranks(&g, &LayoutOptions::default());
    assert!(matches!(res, Err(PedigreeError::CyclicPedigree { .. })));
}
