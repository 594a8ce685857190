//! This module implements the pedigree graph. It's a directed graph whose
//! vertices are persons, relationships, childhubs and virtual nodes, stored
//! in an array of slots indexed by the vertex id. A couple is represented by
//! two edges person -> relationship, the relationship points to exactly one
//! childhub and the childhub points to every child of the couple:
//!
//! ```text
//!   father    mother
//!       \      /
//!     relationship
//!          |
//!       childhub
//!       /     \
//!   child1   child2
//! ```
//!
//! The same structure is used for the layered working graph of the layout,
//! where edges spanning several ranks are broken into chains of virtual nodes.

use crate::core::base::{VertexId, VertexType};
use crate::core::error::{PedigreeError, Result};
use crate::core::options::LayoutOptions;
use crate::core::properties::Properties;
use std::collections::{HashMap, HashSet, VecDeque};

/// A directed, weighted edge. The weight is a hint for the crossing
/// reduction, not a capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: VertexId,
    pub weight: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct Vertex {
    kind: VertexType,
    properties: Properties,
    width: usize,
    // Out edges, in registration order. For childhubs this is the order in
    // which the children were added.
    out_edges: Vec<Edge>,
    in_edges: Vec<VertexId>,
}

/// The pedigree graph.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseGraph {
    slots: Vec<Option<Vertex>>,
    person_width: usize,
    non_person_width: usize,
}

impl Default for BaseGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseGraph {
    pub fn new() -> Self {
        Self::from_options(&LayoutOptions::default())
    }

    pub fn from_options(options: &LayoutOptions) -> Self {
        Self::with_default_widths(options.person_width, options.non_person_width)
    }

    pub fn with_default_widths(person_width: usize, non_person_width: usize) -> Self {
        BaseGraph {
            slots: Vec::new(),
            person_width,
            non_person_width,
        }
    }

    pub fn default_width(&self, kind: VertexType) -> usize {
        if kind.is_person() {
            self.person_width
        } else {
            self.non_person_width
        }
    }

    /// \returns one past the largest vertex id in use.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_vertices() == 0
    }

    pub fn num_vertices(&self) -> usize {
        self.slots.iter().filter(|x| x.is_some()).count()
    }

    pub fn contains(&self, v: VertexId) -> bool {
        matches!(self.slots.get(v.get_index()), Some(Some(_)))
    }

    /// Iterate over the ids of all live vertices, in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| VertexId::from(i))
    }

    pub fn vertices_of_type(&self, kind: VertexType) -> Vec<VertexId> {
        self.iter().filter(|v| self.kind(*v) == kind).collect()
    }

    fn get(&self, v: VertexId) -> &Vertex {
        match self.slots.get(v.get_index()) {
            Some(Some(vertex)) => vertex,
            _ => panic!("Vertex {} is not in the graph", v),
        }
    }

    fn get_mut(&mut self, v: VertexId) -> &mut Vertex {
        match self.slots.get_mut(v.get_index()) {
            Some(Some(vertex)) => vertex,
            _ => panic!("Vertex {} is not in the graph", v),
        }
    }

    /// \returns an error if \p v is not a vertex of the graph.
    pub fn check(&self, v: VertexId) -> Result<()> {
        if self.contains(v) {
            return Ok(());
        }
        Err(PedigreeError::invalid_vertex(v, "no such vertex"))
    }

    /// \returns an error if \p v is not a vertex of kind \p kind.
    pub fn check_kind(&self, v: VertexId, kind: VertexType) -> Result<()> {
        self.check(v)?;
        if self.kind(v) != kind {
            return Err(PedigreeError::invalid_vertex(
                v,
                format!("expected a {}, found a {}", kind, self.kind(v)),
            ));
        }
        Ok(())
    }

    /// Insert a new vertex. If \p id is None the lowest free id is used,
    /// otherwise the explicit id, which must not be occupied. If \p width is
    /// None the default width for the vertex kind is used.
    pub fn add_vertex(
        &mut self,
        id: Option<VertexId>,
        kind: VertexType,
        properties: Properties,
        width: Option<usize>,
    ) -> Result<VertexId> {
        let width = width.unwrap_or_else(|| self.default_width(kind));
        let vertex = Vertex {
            kind,
            properties,
            width,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        };

        let id = match id {
            Some(id) => {
                if self.contains(id) {
                    return Err(PedigreeError::InvalidId(id));
                }
                if id.get_index() >= self.slots.len() {
                    self.slots.resize(id.get_index() + 1, None);
                }
                id
            }
            None => match self.slots.iter().position(|x| x.is_none()) {
                Some(free) => VertexId::from(free),
                None => {
                    self.slots.push(None);
                    VertexId::from(self.slots.len() - 1)
                }
            },
        };

        self.slots[id.get_index()] = Some(vertex);
        Ok(id)
    }

    /// Append a vertex after all existing slots, never recycling an id.
    fn append_vertex(&mut self, kind: VertexType, properties: Properties) -> VertexId {
        let id = VertexId::from(self.slots.len());
        let width = self.default_width(kind);
        self.slots.push(Some(Vertex {
            kind,
            properties,
            width,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        }));
        id
    }

    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: usize) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        if from == to {
            return Err(PedigreeError::invalid_edge(from, to, "self loop"));
        }
        if self.has_edge(from, to) {
            return Err(PedigreeError::invalid_edge(from, to, "duplicate edge"));
        }
        self.get_mut(from).out_edges.push(Edge { to, weight });
        self.get_mut(to).in_edges.push(from);
        Ok(())
    }

    /// Remove the edge from \p from to \p to.
    pub fn remove_edge(&mut self, from: VertexId, to: VertexId) -> Result<()> {
        self.check(from)?;
        self.check(to)?;

        let succ = &mut self.get_mut(from).out_edges;
        let removed_succ = match succ.iter().position(|e| e.to == to) {
            Some(pos) => {
                succ.remove(pos);
                true
            }
            None => false,
        };

        let pred = &mut self.get_mut(to).in_edges;
        let removed_pred = match pred.iter().position(|x| *x == from) {
            Some(pos) => {
                pred.remove(pos);
                true
            }
            None => false,
        };

        // The pred-succ lists must always be up to date.
        assert_eq!(removed_pred, removed_succ);
        if !removed_succ {
            return Err(PedigreeError::invalid_edge(from, to, "no such edge"));
        }
        Ok(())
    }

    /// Remove the vertex \p v together with all of its edges. The id becomes
    /// available for reuse.
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<()> {
        self.check(v)?;
        let succ: Vec<VertexId> = self.successors(v).collect();
        let pred: Vec<VertexId> = self.predecessors(v).to_vec();
        for to in succ {
            self.remove_edge(v, to)?;
        }
        for from in pred {
            self.remove_edge(from, v)?;
        }
        self.slots[v.get_index()] = None;
        while let Some(None) = self.slots.last() {
            self.slots.pop();
        }
        Ok(())
    }

    // Vertex attributes. //

    pub fn kind(&self, v: VertexId) -> VertexType {
        self.get(v).kind
    }

    pub fn is_person(&self, v: VertexId) -> bool {
        self.kind(v).is_person()
    }

    pub fn is_relationship(&self, v: VertexId) -> bool {
        self.kind(v).is_relationship()
    }

    pub fn is_childhub(&self, v: VertexId) -> bool {
        self.kind(v).is_childhub()
    }

    pub fn is_virtual(&self, v: VertexId) -> bool {
        self.kind(v).is_virtual()
    }

    pub fn is_placeholder(&self, v: VertexId) -> bool {
        self.is_person(v) && self.properties(v).placeholder
    }

    pub fn properties(&self, v: VertexId) -> &Properties {
        &self.get(v).properties
    }

    pub fn properties_mut(&mut self, v: VertexId) -> &mut Properties {
        &mut self.get_mut(v).properties
    }

    pub fn set_properties(&mut self, v: VertexId, properties: Properties) -> Result<()> {
        self.check(v)?;
        self.get_mut(v).properties = properties;
        Ok(())
    }

    pub fn width(&self, v: VertexId) -> usize {
        self.get(v).width
    }

    pub fn half_width(&self, v: VertexId) -> i64 {
        (self.get(v).width / 2) as i64
    }

    // Adjacency. //

    pub fn out_edges(&self, v: VertexId) -> &[Edge] {
        &self.get(v).out_edges
    }

    pub fn successors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.get(v).out_edges.iter().map(|e| e.to)
    }

    pub fn predecessors(&self, v: VertexId) -> &[VertexId] {
        &self.get(v).in_edges
    }

    pub fn single_pred(&self, v: VertexId) -> Option<VertexId> {
        match self.get(v).in_edges.as_slice() {
            [p] => Some(*p),
            _ => None,
        }
    }

    pub fn single_succ(&self, v: VertexId) -> Option<VertexId> {
        match self.get(v).out_edges.as_slice() {
            [e] => Some(e.to),
            _ => None,
        }
    }

    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.edge_weight(from, to).is_some()
    }

    pub fn edge_weight(&self, from: VertexId, to: VertexId) -> Option<usize> {
        self.get(from)
            .out_edges
            .iter()
            .find(|e| e.to == to)
            .map(|e| e.weight)
    }

    // Chains of virtual nodes. //

    /// Follow single predecessors while \p v is a virtual node.
    pub fn up_the_chain_until_non_virtual(&self, mut v: VertexId) -> VertexId {
        while self.is_virtual(v) {
            match self.single_pred(v) {
                Some(p) => v = p,
                None => break,
            }
        }
        v
    }

    /// Follow single successors while \p v is a virtual node.
    pub fn down_the_chain_until_non_virtual(&self, mut v: VertexId) -> VertexId {
        while self.is_virtual(v) {
            match self.single_succ(v) {
                Some(s) => v = s,
                None => break,
            }
        }
        v
    }

    /// \returns the paths from the relationship \p rel up to each of its
    /// partners. Each path excludes \p rel and ends with the partner; the
    /// vertices before the partner are the virtual nodes in between.
    pub fn path_to_parents(&self, rel: VertexId) -> Vec<Vec<VertexId>> {
        let mut paths = Vec::new();
        for p in self.predecessors(rel) {
            let mut path = vec![*p];
            let mut curr = *p;
            while self.is_virtual(curr) {
                match self.single_pred(curr) {
                    Some(next) => {
                        path.push(next);
                        curr = next;
                    }
                    None => break,
                }
            }
            paths.push(path);
        }
        paths
    }

    // Family queries. //

    /// \returns the childhub that \p v is a child of.
    pub fn producing_childhub(&self, v: VertexId) -> Option<VertexId> {
        let pred = self.single_pred(v)?;
        let hub = self.up_the_chain_until_non_virtual(pred);
        if self.is_childhub(hub) {
            return Some(hub);
        }
        None
    }

    /// \returns the relationship that \p v is a child of.
    pub fn producing_relationship(&self, v: VertexId) -> Option<VertexId> {
        let hub = self.producing_childhub(v)?;
        let rel = self.single_pred(hub)?;
        if self.is_relationship(rel) {
            return Some(rel);
        }
        None
    }

    /// \returns the two parents of \p v, or an empty list.
    pub fn parents(&self, v: VertexId) -> Vec<VertexId> {
        match self.producing_relationship(v) {
            Some(rel) => self.relationship_partners(rel),
            None => Vec::new(),
        }
    }

    /// \returns the relationships that \p v is a partner in.
    pub fn relationships_of(&self, v: VertexId) -> Vec<VertexId> {
        self.successors(v)
            .map(|s| self.down_the_chain_until_non_virtual(s))
            .filter(|r| self.is_relationship(*r))
            .collect()
    }

    pub fn relationship_partners(&self, rel: VertexId) -> Vec<VertexId> {
        self.predecessors(rel)
            .iter()
            .map(|p| self.up_the_chain_until_non_virtual(*p))
            .collect()
    }

    pub fn partners(&self, v: VertexId) -> Vec<VertexId> {
        let mut res = Vec::new();
        for rel in self.relationships_of(v) {
            for p in self.relationship_partners(rel) {
                if p != v {
                    res.push(p);
                }
            }
        }
        res
    }

    pub fn relationship_between(&self, a: VertexId, b: VertexId) -> Option<VertexId> {
        self.relationships_of(a)
            .into_iter()
            .find(|rel| self.relationship_partners(*rel).contains(&b))
    }

    pub fn relationship_childhub(&self, rel: VertexId) -> Option<VertexId> {
        let hub = self.down_the_chain_until_non_virtual(self.single_succ(rel)?);
        if self.is_childhub(hub) {
            return Some(hub);
        }
        None
    }

    /// \returns the children of \p rel in registration order.
    pub fn relationship_children(&self, rel: VertexId) -> Vec<VertexId> {
        match self.relationship_childhub(rel) {
            Some(hub) => self.childhub_children(hub),
            None => Vec::new(),
        }
    }

    pub fn childhub_children(&self, hub: VertexId) -> Vec<VertexId> {
        self.successors(hub)
            .map(|c| self.down_the_chain_until_non_virtual(c))
            .collect()
    }

    pub fn children(&self, v: VertexId) -> Vec<VertexId> {
        let mut res = Vec::new();
        for rel in self.relationships_of(v) {
            res.extend(self.relationship_children(rel));
        }
        res
    }

    pub fn siblings(&self, v: VertexId) -> Vec<VertexId> {
        match self.producing_childhub(v) {
            Some(hub) => self
                .childhub_children(hub)
                .into_iter()
                .filter(|c| *c != v)
                .collect(),
            None => Vec::new(),
        }
    }

    /// \returns the mother and the father of the relationship \p rel. The
    /// genders decide when they can, otherwise the registration order does
    /// (first partner is the father).
    pub fn mother_father(&self, rel: VertexId) -> Option<(VertexId, VertexId)> {
        use crate::core::properties::Gender;
        let partners = self.relationship_partners(rel);
        if partners.len() != 2 {
            return None;
        }
        let (a, b) = (partners[0], partners[1]);
        let ga = self.properties(a).gender;
        let gb = self.properties(b).gender;
        let a_is_father = match (ga, gb) {
            (Gender::Male, _) => true,
            (_, Gender::Male) => false,
            (Gender::Female, _) => false,
            (_, Gender::Female) => true,
            _ => true,
        };
        if a_is_father {
            Some((b, a))
        } else {
            Some((a, b))
        }
    }

    // Twins. //

    pub fn twin_group_id(&self, v: VertexId) -> Option<usize> {
        if !self.is_person(v) {
            return None;
        }
        self.properties(v).twin_group
    }

    /// \returns True if \p a and \p b are two different children of the same
    /// childhub sharing a twin group.
    pub fn are_twins(&self, a: VertexId, b: VertexId) -> bool {
        if a == b {
            return false;
        }
        let group = match self.twin_group_id(a) {
            Some(g) => g,
            None => return false,
        };
        if self.twin_group_id(b) != Some(group) {
            return false;
        }
        let hub = self.producing_childhub(a);
        hub.is_some() && hub == self.producing_childhub(b)
    }

    /// \returns all twins of \p v including \p v, in registration order.
    pub fn twins(&self, v: VertexId) -> Vec<VertexId> {
        let hub = match (self.twin_group_id(v), self.producing_childhub(v)) {
            (Some(_), Some(hub)) => hub,
            _ => return vec![v],
        };
        self.childhub_children(hub)
            .into_iter()
            .filter(|c| *c == v || self.are_twins(v, *c))
            .collect()
    }

    /// \returns the smallest twin group id not used by the children of \p hub.
    pub fn unused_twin_group_id(&self, hub: VertexId) -> usize {
        let used: HashSet<usize> = self
            .childhub_children(hub)
            .into_iter()
            .filter_map(|c| self.twin_group_id(c))
            .collect();
        (0..).find(|x| !used.contains(x)).unwrap_or(0)
    }

    /// \returns the vertices without in-edges and the vertices without
    /// out-edges (that do have in-edges).
    pub fn leaf_and_parentless(&self) -> (Vec<VertexId>, Vec<VertexId>) {
        let mut parentless = Vec::new();
        let mut leaves = Vec::new();
        for v in self.iter() {
            if self.predecessors(v).is_empty() {
                parentless.push(v);
            } else if self.out_edges(v).is_empty() {
                leaves.push(v);
            }
        }
        (parentless, leaves)
    }

    /// \returns the weakly connected components, each sorted by id, ordered
    /// by their smallest id.
    pub fn weakly_connected_components(&self) -> Vec<Vec<VertexId>> {
        let mut seen = vec![false; self.len()];
        let mut components = Vec::new();
        for start in self.iter() {
            if seen[start.get_index()] {
                continue;
            }
            let mut comp = Vec::new();
            let mut worklist = VecDeque::from([start]);
            seen[start.get_index()] = true;
            while let Some(v) = worklist.pop_front() {
                comp.push(v);
                let neighbours = self.successors(v).chain(self.predecessors(v).iter().copied());
                for n in neighbours {
                    if !seen[n.get_index()] {
                        seen[n.get_index()] = true;
                        worklist.push_back(n);
                    }
                }
            }
            comp.sort();
            components.push(comp);
        }
        components
    }

    /// Check the structural rules of a pedigree.
    pub fn validate(&self) -> Result<()> {
        for v in self.iter() {
            let preds = self.predecessors(v);
            let outs = self.out_edges(v);
            match self.kind(v) {
                VertexType::Person => {
                    if preds.len() > 1 {
                        return Err(PedigreeError::inconsistency(format!(
                            "person {} has {} parent edges",
                            v,
                            preds.len()
                        )));
                    }
                    if !preds.is_empty() && self.producing_childhub(v).is_none() {
                        return Err(PedigreeError::inconsistency(format!(
                            "person {} does not descend from a childhub",
                            v
                        )));
                    }
                    for e in outs {
                        let target = self.down_the_chain_until_non_virtual(e.to);
                        if !self.is_relationship(target) {
                            return Err(PedigreeError::inconsistency(format!(
                                "person {} points to {} which is not a relationship",
                                v, target
                            )));
                        }
                    }
                }
                VertexType::Relationship => {
                    if preds.len() != 2 {
                        return Err(PedigreeError::inconsistency(format!(
                            "relationship {} has {} partners instead of 2",
                            v,
                            preds.len()
                        )));
                    }
                    let partners = self.relationship_partners(v);
                    if partners.iter().any(|p| !self.is_person(*p)) {
                        return Err(PedigreeError::inconsistency(format!(
                            "relationship {} has a partner that is not a person",
                            v
                        )));
                    }
                    if partners[0] == partners[1] {
                        return Err(PedigreeError::inconsistency(format!(
                            "relationship {} joins {} with itself",
                            v, partners[0]
                        )));
                    }
                    if self.are_twins(partners[0], partners[1]) {
                        return Err(PedigreeError::InvalidPedigreeTopology(format!(
                            "relationship {} joins the twins {} and {}",
                            v, partners[0], partners[1]
                        )));
                    }
                    if outs.len() != 1 || self.relationship_childhub(v).is_none() {
                        return Err(PedigreeError::inconsistency(format!(
                            "relationship {} must have exactly one childhub",
                            v
                        )));
                    }
                }
                VertexType::Childhub => {
                    if preds.len() != 1 || !self.is_relationship(preds[0]) {
                        return Err(PedigreeError::inconsistency(format!(
                            "childhub {} must have exactly one relationship",
                            v
                        )));
                    }
                    for e in outs {
                        let target = self.down_the_chain_until_non_virtual(e.to);
                        if !self.is_person(target) {
                            return Err(PedigreeError::inconsistency(format!(
                                "childhub {} points to {} which is not a person",
                                v, target
                            )));
                        }
                    }
                }
                VertexType::VirtualEdge => {
                    if preds.len() != 1 || outs.len() != 1 {
                        return Err(PedigreeError::inconsistency(format!(
                            "virtual node {} must have one in and one out edge",
                            v
                        )));
                    }
                }
            }
        }

        // A couple has at most one relationship.
        let mut couples = HashMap::new();
        for rel in self.vertices_of_type(VertexType::Relationship) {
            let mut key = self.relationship_partners(rel);
            key.sort();
            if let Some(other) = couples.insert(key, rel) {
                return Err(PedigreeError::inconsistency(format!(
                    "relationships {} and {} join the same partners",
                    other, rel
                )));
            }
        }

        if self.is_empty() {
            return Ok(());
        }

        let (parentless, _) = self.leaf_and_parentless();
        if parentless.is_empty() {
            return Err(PedigreeError::inconsistency(
                "every vertex has a parent, the pedigree has no root",
            ));
        }

        let components = self.weakly_connected_components();
        if components.len() > 1 {
            return Err(PedigreeError::inconsistency(format!(
                "disconnected component: the graph has {} components",
                components.len()
            )));
        }
        Ok(())
    }

    // Construction of the layered graph. //

    /// \returns a copy of the graph where every edge that spans more than one
    /// rank (according to \p ranks, indexed by vertex id) is replaced by a
    /// chain of virtual nodes, one per intermediate rank, together with the
    /// ranks extended to the new vertices. Virtual ids are appended after all
    /// existing slots. Partner edges may stay within a rank.
    pub fn split_multi_rank_edges(&self, ranks: &[usize]) -> Result<(BaseGraph, Vec<usize>)> {
        assert!(ranks.len() >= self.len(), "Missing ranks");
        let mut new_graph = self.without_edges();
        let mut new_ranks = ranks[..self.len()].to_vec();

        for src in self.iter() {
            let src_rank = ranks[src.get_index()];
            for edge in self.out_edges(src) {
                let dst = edge.to;
                let dst_rank = ranks[dst.get_index()];
                if dst_rank < src_rank {
                    return Err(PedigreeError::InvalidPedigreeTopology(format!(
                        "edge {} -> {} points upwards (rank {} -> {})",
                        src, dst, src_rank, dst_rank
                    )));
                }
                if dst_rank <= src_rank + 1 {
                    new_graph.add_edge(src, dst, edge.weight)?;
                    continue;
                }

                let mut prev = src;
                for mid_rank in src_rank + 1..dst_rank {
                    let mut props = Properties::default();
                    props.first_name = Some(format!(
                        "_{}->{}_{}",
                        src,
                        dst,
                        mid_rank - src_rank - 1
                    ));
                    let next = new_graph.append_vertex(VertexType::VirtualEdge, props);
                    new_ranks.push(mid_rank);
                    assert_eq!(new_ranks.len(), new_graph.len());
                    new_graph.add_edge(prev, next, edge.weight)?;
                    prev = next;
                }
                new_graph.add_edge(prev, dst, edge.weight)?;
            }
        }

        Ok((new_graph, new_ranks))
    }

    /// Perform the opposite of split_multi_rank_edges(): drop every virtual
    /// node and connect the ends of each chain directly.
    pub fn collapse_virtual_edges(&self) -> BaseGraph {
        let mut new_graph = self.without_edges();
        for v in self.iter() {
            if self.is_virtual(v) {
                new_graph.slots[v.get_index()] = None;
            }
        }
        while let Some(None) = new_graph.slots.last() {
            new_graph.slots.pop();
        }

        for src in self.iter().filter(|v| !self.is_virtual(*v)) {
            for edge in self.out_edges(src) {
                let dst = self.down_the_chain_until_non_virtual(edge.to);
                new_graph.get_mut(src).out_edges.push(Edge {
                    to: dst,
                    weight: edge.weight,
                });
                new_graph.get_mut(dst).in_edges.push(src);
            }
        }
        new_graph
    }

    fn without_edges(&self) -> BaseGraph {
        let mut g = self.clone();
        for vertex in g.slots.iter_mut().flatten() {
            vertex.out_edges.clear();
            vertex.in_edges.clear();
        }
        g
    }
}

#[cfg(test)]
pub(crate) fn make_trio() -> (BaseGraph, [VertexId; 5]) {
    use crate::core::properties::Gender;
    let mut g = BaseGraph::new();
    let father = g
        .add_vertex(None, VertexType::Person, Properties::with_gender(Gender::Male), None)
        .unwrap();
    let mother = g
        .add_vertex(None, VertexType::Person, Properties::with_gender(Gender::Female), None)
        .unwrap();
    let rel = g
        .add_vertex(None, VertexType::Relationship, Properties::default(), None)
        .unwrap();
    let hub = g
        .add_vertex(None, VertexType::Childhub, Properties::default(), None)
        .unwrap();
    let child = g
        .add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    g.add_edge(father, rel, 1).unwrap();
    g.add_edge(mother, rel, 1).unwrap();
    g.add_edge(rel, hub, 1).unwrap();
    g.add_edge(hub, child, 1).unwrap();
    (g, [father, mother, rel, hub, child])
}

#[test]
fn test_simple_construction() {
    let (g, [father, mother, rel, hub, child]) = make_trio();
    g.validate().unwrap();
    assert_eq!(g.num_vertices(), 5);
    assert_eq!(g.width(father), 10);
    assert_eq!(g.half_width(rel), 1);
    assert_eq!(g.parents(child), vec![father, mother]);
    assert_eq!(g.partners(father), vec![mother]);
    assert_eq!(g.relationship_childhub(rel), Some(hub));
    assert_eq!(g.relationship_children(rel), vec![child]);
    assert_eq!(g.producing_relationship(child), Some(rel));
    assert_eq!(g.relationship_between(mother, father), Some(rel));
    assert_eq!(g.mother_father(rel), Some((mother, father)));
    assert_eq!(g.children(mother), vec![child]);
}

#[test]
fn test_add_vertex_ids() {
    let mut g = BaseGraph::new();
    let a = g
        .add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    let b = g
        .add_vertex(Some(VertexId::from(3)), VertexType::Person, Properties::default(), Some(20))
        .unwrap();
    assert_eq!(a, VertexId::from(0));
    assert_eq!(b, VertexId::from(3));
    assert_eq!(g.width(b), 20);

    // Explicit ids must be free.
    let res = g.add_vertex(Some(b), VertexType::Person, Properties::default(), None);
    assert!(matches!(res, Err(PedigreeError::InvalidId(_))));

    // Free slots are reused before the array grows.
    let c = g
        .add_vertex(None, VertexType::Childhub, Properties::default(), None)
        .unwrap();
    assert_eq!(c, VertexId::from(1));

    g.remove_vertex(a).unwrap();
    let d = g
        .add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    assert_eq!(d, a);
}

#[test]
fn test_edge_errors() {
    let (mut g, [father, _, rel, _, child]) = make_trio();
    let missing = VertexId::from(42);
    assert!(matches!(
        g.add_edge(father, missing, 1),
        Err(PedigreeError::InvalidVertex { .. })
    ));
    assert!(matches!(
        g.add_edge(father, rel, 1),
        Err(PedigreeError::InvalidEdge { .. })
    ));
    assert!(g.remove_edge(child, father).is_err());
    g.remove_edge(father, rel).unwrap();
    assert!(!g.has_edge(father, rel));
    assert!(g.predecessors(rel).len() == 1);
}

#[test]
fn test_validate_rejects_broken_relationship() {
    let (mut g, [father, _, rel, _, _]) = make_trio();
    g.remove_edge(father, rel).unwrap();
    // The relationship lost a partner and the father is now disconnected.
    assert!(matches!(
        g.validate(),
        Err(PedigreeError::GraphInconsistency(_))
    ));
}

#[test]
fn test_validate_rejects_disconnected() {
    let (mut g, _) = make_trio();
    g.add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    let err = g.validate().unwrap_err();
    assert!(err.to_string().contains("disconnected"));
    assert_eq!(g.weakly_connected_components().len(), 2);
}

#[test]
fn test_remove_vertex_removes_edges() {
    let (mut g, [father, mother, rel, hub, child]) = make_trio();
    g.remove_vertex(child).unwrap();
    assert!(g.childhub_children(hub).is_empty());
    g.remove_vertex(rel).unwrap();
    assert!(g.relationships_of(father).is_empty());
    assert!(g.relationships_of(mother).is_empty());
    assert!(g.predecessors(hub).is_empty());
    assert_eq!(g.len(), 4);
}

#[test]
fn test_twins() {
    let (mut g, [_, _, _, hub, child]) = make_trio();
    let twin = g
        .add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    let other = g
        .add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    g.add_edge(hub, twin, 1).unwrap();
    g.add_edge(hub, other, 1).unwrap();
    assert_eq!(g.unused_twin_group_id(hub), 0);
    g.properties_mut(child).twin_group = Some(0);
    g.properties_mut(twin).twin_group = Some(0);
    assert!(g.are_twins(child, twin));
    assert!(!g.are_twins(child, other));
    assert_eq!(g.twins(twin), vec![child, twin]);
    assert_eq!(g.twins(other), vec![other]);
    assert_eq!(g.unused_twin_group_id(hub), 1);
}

#[test]
fn test_split_and_collapse() {
    let (g, [father, mother, rel, hub, child]) = make_trio();
    // Pretend the father sits two generations above the mother.
    let mut ranks = vec![0; g.len()];
    ranks[father.get_index()] = 0;
    ranks[mother.get_index()] = 2;
    ranks[rel.get_index()] = 2;
    ranks[hub.get_index()] = 3;
    ranks[child.get_index()] = 4;

    let (layered, new_ranks) = g.split_multi_rank_edges(&ranks).unwrap();
    assert_eq!(layered.num_vertices(), 6);
    assert_eq!(new_ranks.len(), layered.len());
    let virt = VertexId::from(5);
    assert!(layered.is_virtual(virt));
    assert_eq!(new_ranks[5], 1);
    assert!(layered.has_edge(father, virt));
    assert!(layered.has_edge(virt, rel));
    assert_eq!(layered.path_to_parents(rel), vec![vec![virt, father], vec![mother]]);
    assert_eq!(layered.relationship_partners(rel), vec![father, mother]);
    layered.validate().unwrap();

    let collapsed = layered.collapse_virtual_edges();
    assert_eq!(collapsed, g);
}

#[test]
fn test_split_rejects_upward_edges() {
    let (g, [father, ..]) = make_trio();
    let mut ranks = vec![2; g.len()];
    ranks[father.get_index()] = 4;
    assert!(matches!(
        g.split_multi_rank_edges(&ranks),
        Err(PedigreeError::InvalidPedigreeTopology(_))
    ));
}

#[test]
fn test_validate_rejects_twin_partners() {
    let (mut g, [_, _, _, hub, child]) = make_trio();
    let twin = g
        .add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    g.add_edge(hub, twin, 1).unwrap();
    g.properties_mut(child).twin_group = Some(0);
    g.properties_mut(twin).twin_group = Some(0);
    g.validate().unwrap();

    let rel = g
        .add_vertex(None, VertexType::Relationship, Properties::default(), None)
        .unwrap();
    let rel_hub = g
        .add_vertex(None, VertexType::Childhub, Properties::default(), None)
        .unwrap();
    g.add_edge(child, rel, 1).unwrap();
    g.add_edge(twin, rel, 1).unwrap();
    g.add_edge(rel, rel_hub, 1).unwrap();
    assert!(matches!(
        g.validate(),
        Err(PedigreeError::InvalidPedigreeTopology(_))
    ));

    // Siblings that are not twins may be partners.
    g.properties_mut(twin).twin_group = None;
    g.validate().unwrap();
}
