//! The positioned pedigree: a graph together with its layout, and the editing
//! session object that keeps the two in sync.
//!
//! The layout pipeline is:
//!
//! ```text
//!   validate -> rank -> split long edges -> order -> place x -> assign y
//! ```
//!
//! Every edit of a PedigreeLayoutContext runs the whole pipeline on a copy of
//! the graph and only publishes the result if every step succeeded.

use crate::adt::base_graph::BaseGraph;
use crate::adt::ordering::Ordering;
use crate::core::base::{Point, VertexId, VertexType};
use crate::core::error::{PedigreeError, Result};
use crate::core::options::LayoutOptions;
use crate::core::properties::{Gender, Properties};
use crate::formats::builder::{add_relationship, DEFAULT_EDGE_WEIGHT};
use crate::formats::internal::{SerializedLayout, SerializedPedigree};
use crate::topo::optimizer::{compute_order, count_crossings};
use crate::topo::placer::place::place;
use crate::topo::placer::{LayoutFrame, XCoord};
use crate::topo::rank::compute_ranks;
use std::collections::{BTreeMap, HashMap};

/// The layered graph of a pedigree and the coordinates of all of its
/// vertices, virtual ones included.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    graph: BaseGraph,
    ranks: Vec<usize>,
    ordering: Ordering,
    xcoord: Vec<i64>,
    rank_y: Vec<f64>,
}

impl Layout {
    /// Lay out \p graph from scratch. Previous x coordinates in \p hint, keyed
    /// by vertex id, keep the order stable across edits.
    pub fn compute(
        graph: &BaseGraph,
        proband: Option<VertexId>,
        options: &LayoutOptions,
        hint: Option<&HashMap<VertexId, f64>>,
    ) -> Result<Layout> {
        graph.validate()?;

        let ranks = compute_ranks(graph, options)?;
        let (layered, layered_ranks) = graph.split_multi_rank_edges(&ranks)?;

        #[cfg(feature = "log")]
        log::info!(
            "Split long edges: {} virtual vertices.",
            layered.num_vertices() - graph.num_vertices()
        );

        let ordering = compute_order(&layered, &layered_ranks, options, hint, proband);

        #[cfg(feature = "log")]
        log::info!(
            "Ordered {} ranks with {} crossings.",
            ordering.num_ranks(),
            count_crossings(&layered, &layered_ranks, &ordering)
        );

        let xcoord = {
            let frame = LayoutFrame::new(&layered, &layered_ranks, &ordering, options);
            place(&frame)?
        };

        let rank_y = Self::rank_heights(ordering.num_ranks(), options);
        Ok(Layout {
            graph: layered,
            ranks: layered_ranks,
            ordering,
            xcoord,
            rank_y,
        })
    }

    /// Reuse the stored layout \p saved of \p graph. Fails if the stored ranks
    /// or order don't match the graph, or if the coordinates overlap.
    pub fn restore(
        graph: &BaseGraph,
        options: &LayoutOptions,
        saved: &SerializedLayout,
    ) -> Result<Layout> {
        graph.validate()?;
        let ranks = compute_ranks(graph, options)?;
        let (layered, layered_ranks) = graph.split_multi_rank_edges(&ranks)?;
        if layered_ranks != saved.ranks {
            return Err(PedigreeError::inconsistency(
                "the stored ranks don't match the pedigree",
            ));
        }

        let ordering = Ordering::new(saved.order.clone());
        ordering.verify(&layered, &layered_ranks)?;
        let xcoord = {
            let frame = LayoutFrame::new(&layered, &layered_ranks, &ordering, options);
            XCoord::from_coords(&frame, saved.positions.clone())?.into_coords()
        };

        let rank_y = Self::rank_heights(ordering.num_ranks(), options);
        Ok(Layout {
            graph: layered,
            ranks: layered_ranks,
            ordering,
            xcoord,
            rank_y,
        })
    }

    /// Persons sit on even ranks and childhubs on odd ranks; the two kinds of
    /// gaps have different heights.
    fn rank_heights(num_ranks: usize, options: &LayoutOptions) -> Vec<f64> {
        let mut res = Vec::with_capacity(num_ranks);
        let mut y = 0.;
        for rank in 0..num_ranks {
            res.push(y);
            y += if rank % 2 == 0 {
                options.y_distance_node_to_childhub
            } else {
                options.y_distance_childhub_to_node
            };
        }
        res
    }

    /// \returns the layered graph, including the virtual vertices.
    pub fn graph(&self) -> &BaseGraph {
        &self.graph
    }

    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    pub fn ordering(&self) -> &Ordering {
        &self.ordering
    }

    pub fn xcoords(&self) -> &[i64] {
        &self.xcoord
    }

    pub fn x(&self, v: VertexId) -> Option<i64> {
        if !self.graph.contains(v) {
            return None;
        }
        self.xcoord.get(v.get_index()).copied()
    }

    pub fn y(&self, v: VertexId) -> Option<f64> {
        if !self.graph.contains(v) {
            return None;
        }
        let rank = *self.ranks.get(v.get_index())?;
        self.rank_y.get(rank).copied()
    }

    pub fn position(&self, v: VertexId) -> Option<Point> {
        Some(Point::new(self.x(v)? as f64, self.y(v)?))
    }

    pub fn num_crossings(&self) -> usize {
        count_crossings(&self.graph, &self.ranks, &self.ordering)
    }

    pub fn to_serialized(&self) -> SerializedLayout {
        SerializedLayout {
            ranks: self.ranks.clone(),
            order: self.ordering.rows().clone(),
            positions: self.xcoord.clone(),
        }
    }
}

/// An editing session over one pedigree. Owns the graph, the proband, the
/// options and the current layout; there is no other shared state.
#[derive(Debug, Clone)]
pub struct PedigreeLayoutContext {
    graph: BaseGraph,
    proband: Option<VertexId>,
    options: LayoutOptions,
    layout: Layout,
}

impl PedigreeLayoutContext {
    pub fn new(
        graph: BaseGraph,
        proband: Option<VertexId>,
        options: LayoutOptions,
    ) -> Result<Self> {
        options.validate()?;
        if let Some(p) = proband {
            graph.check_kind(p, VertexType::Person)?;
        }
        let layout = Layout::compute(&graph, proband, &options, None)?;
        Ok(Self {
            graph,
            proband,
            options,
            layout,
        })
    }

    /// A pedigree with a single person, the proband.
    pub fn with_single_person(options: LayoutOptions) -> Result<Self> {
        let mut graph = BaseGraph::from_options(&options);
        let me = graph.add_vertex(None, VertexType::Person, Properties::default(), None)?;
        Self::new(graph, Some(me), options)
    }

    // Queries. //

    pub fn graph(&self) -> &BaseGraph {
        &self.graph
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn proband(&self) -> Option<VertexId> {
        self.proband
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// \returns the position of the real vertex \p v.
    pub fn position(&self, v: VertexId) -> Option<Point> {
        if !self.graph.contains(v) {
            return None;
        }
        self.layout.position(v)
    }

    /// \returns the positions of all real vertices.
    pub fn positions(&self) -> BTreeMap<VertexId, Point> {
        self.graph
            .iter()
            .filter_map(|v| self.layout.position(v).map(|p| (v, p)))
            .collect()
    }

    pub fn rank_of(&self, v: VertexId) -> Option<usize> {
        if !self.graph.contains(v) {
            return None;
        }
        self.layout.ranks.get(v.get_index()).copied()
    }

    /// \returns the paths from \p rel up to each partner in the layered
    /// graph. The virtual vertices of a path tell the renderer where the
    /// partner line bends.
    pub fn path_to_parents(&self, rel: VertexId) -> Result<Vec<Vec<VertexId>>> {
        self.graph.check_kind(rel, VertexType::Relationship)?;
        Ok(self.layout.graph.path_to_parents(rel))
    }

    pub fn relationship_children(&self, rel: VertexId) -> Result<Vec<VertexId>> {
        self.graph.check_kind(rel, VertexType::Relationship)?;
        Ok(self.graph.relationship_children(rel))
    }

    pub fn relationship_childhub_position(&self, rel: VertexId) -> Result<Point> {
        self.graph.check_kind(rel, VertexType::Relationship)?;
        let hub = self
            .graph
            .relationship_childhub(rel)
            .ok_or_else(|| PedigreeError::invalid_vertex(rel, "relationship without childhub"))?;
        self.position(hub)
            .ok_or_else(|| PedigreeError::invalid_vertex(hub, "childhub without position"))
    }

    // Edits. //

    /// Run \p edit on a copy of the graph, then lay the copy out. The new
    /// state is committed only if both steps succeed.
    #[cfg_attr(not(feature = "log"), allow(unused_variables))]
    fn apply_edit<T, F>(&mut self, what: &str, edit: F) -> Result<T>
    where
        F: FnOnce(&mut BaseGraph, &mut Option<VertexId>) -> Result<T>,
    {
        let mut graph = self.graph.clone();
        let mut proband = self.proband;
        let hint = self.position_hint();

        let res = edit(&mut graph, &mut proband).and_then(|value| {
            let layout = Layout::compute(&graph, proband, &self.options, Some(&hint))?;
            Ok((value, layout))
        });

        match res {
            Ok((value, layout)) => {
                #[cfg(feature = "log")]
                log::info!("Applied edit '{}'.", what);
                self.graph = graph;
                self.proband = proband;
                self.layout = layout;
                Ok(value)
            }
            Err(err) => {
                #[cfg(feature = "log")]
                log::warn!("Rejected edit '{}': {}", what, err);
                Err(err)
            }
        }
    }

    fn position_hint(&self) -> HashMap<VertexId, f64> {
        self.graph
            .iter()
            .filter_map(|v| self.layout.x(v).map(|x| (v, x as f64)))
            .collect()
    }

    /// Add a new partner of \p person, of the opposite gender when known.
    /// \returns the partner and the new relationship.
    pub fn add_partner(&mut self, person: VertexId) -> Result<(VertexId, VertexId)> {
        self.apply_edit("add partner", |graph, _| {
            graph.check_kind(person, VertexType::Person)?;
            let gender = graph.properties(person).gender.opposite();
            let partner =
                graph.add_vertex(None, VertexType::Person, Properties::with_gender(gender), None)?;
            let (rel, _) = add_relationship(graph, person, partner)?;
            Ok((partner, rel))
        })
    }

    /// Join two existing persons. Twins of the same group can't be partners.
    /// \returns the relationship.
    pub fn add_partnership(&mut self, a: VertexId, b: VertexId) -> Result<VertexId> {
        self.apply_edit("add partnership", |graph, _| {
            if graph.are_twins(a, b) {
                return Err(PedigreeError::InvalidPedigreeTopology(format!(
                    "the twins {} and {} can't be partners",
                    a, b
                )));
            }
            let (rel, _) = add_relationship(graph, a, b)?;
            Ok(rel)
        })
    }

    fn add_child_with(&mut self, rel: VertexId, properties: Properties) -> Result<VertexId> {
        self.apply_edit("add child", |graph, _| {
            graph.check_kind(rel, VertexType::Relationship)?;
            let hub = graph
                .relationship_childhub(rel)
                .ok_or_else(|| PedigreeError::invalid_vertex(rel, "relationship without childhub"))?;
            let child = graph.add_vertex(None, VertexType::Person, properties, None)?;
            graph.add_edge(hub, child, DEFAULT_EDGE_WEIGHT)?;
            Ok(child)
        })
    }

    pub fn add_child(&mut self, rel: VertexId) -> Result<VertexId> {
        self.add_child_with(rel, Properties::default())
    }

    pub fn add_placeholder_child(&mut self, rel: VertexId) -> Result<VertexId> {
        self.add_child_with(rel, Properties::placeholder())
    }

    /// Give the parentless \p person a mother and a father.
    /// \returns the relationship of the new parents.
    pub fn add_parents(&mut self, person: VertexId) -> Result<VertexId> {
        self.apply_edit("add parents", |graph, _| {
            graph.check_kind(person, VertexType::Person)?;
            if !graph.predecessors(person).is_empty() {
                return Err(PedigreeError::invalid_vertex(person, "already has parents"));
            }
            let father = graph.add_vertex(
                None,
                VertexType::Person,
                Properties::with_gender(Gender::Male),
                None,
            )?;
            let mother = graph.add_vertex(
                None,
                VertexType::Person,
                Properties::with_gender(Gender::Female),
                None,
            )?;
            let (rel, hub) = add_relationship(graph, father, mother)?;
            graph.add_edge(hub, person, DEFAULT_EDGE_WEIGHT)?;
            Ok(rel)
        })
    }

    /// Add a twin of \p person. Both end up in the same twin group.
    pub fn add_twin(&mut self, person: VertexId) -> Result<VertexId> {
        self.apply_edit("add twin", |graph, _| {
            graph.check_kind(person, VertexType::Person)?;
            let hub = graph
                .producing_childhub(person)
                .ok_or_else(|| PedigreeError::invalid_vertex(person, "a twin needs parents"))?;
            let group = match graph.twin_group_id(person) {
                Some(group) => group,
                None => {
                    let group = graph.unused_twin_group_id(hub);
                    graph.properties_mut(person).twin_group = Some(group);
                    group
                }
            };

            let source = graph.properties(person);
            let mut props = Properties::with_gender(source.gender);
            props.monozygotic = source.monozygotic;
            props.twin_group = Some(group);
            let twin = graph.add_vertex(None, VertexType::Person, props, None)?;
            graph.add_edge(hub, twin, DEFAULT_EDGE_WEIGHT)?;
            Ok(twin)
        })
    }

    pub fn set_properties(&mut self, v: VertexId, properties: Properties) -> Result<()> {
        self.apply_edit("set properties", |graph, _| graph.set_properties(v, properties))
    }

    /// Remove the person or relationship \p v. Removing a person also removes
    /// its relationships; removing a relationship also removes its childhub.
    /// Everything that is no longer connected to the proband (or, without a
    /// proband, to the largest remaining family) is removed as well.
    /// \returns the removed vertices.
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<Vec<VertexId>> {
        self.apply_edit("remove vertex", |graph, proband| {
            graph.check(v)?;
            let mut doomed = Vec::new();
            match graph.kind(v) {
                VertexType::Person => {
                    for rel in graph.relationships_of(v) {
                        doomed.extend(graph.relationship_childhub(rel));
                        doomed.push(rel);
                    }
                    doomed.push(v);
                }
                VertexType::Relationship => {
                    doomed.extend(graph.relationship_childhub(v));
                    doomed.push(v);
                }
                kind => {
                    return Err(PedigreeError::invalid_vertex(
                        v,
                        format!("a {} can't be removed on its own", kind),
                    ))
                }
            }
            for d in &doomed {
                graph.remove_vertex(*d)?;
            }

            if proband.map_or(false, |p| !graph.contains(p)) {
                *proband = None;
            }
            doomed.extend(Self::prune_detached(graph, *proband)?);
            doomed.sort();
            Ok(doomed)
        })
    }

    /// Remove every component that does not contain \p anchor, or every
    /// component but the largest one if there is no anchor.
    fn prune_detached(graph: &mut BaseGraph, anchor: Option<VertexId>) -> Result<Vec<VertexId>> {
        let components = graph.weakly_connected_components();
        let keep = match anchor {
            Some(a) => components.iter().position(|c| c.contains(&a)),
            None => components
                .iter()
                .enumerate()
                .max_by(|(ia, a), (ib, b)| a.len().cmp(&b.len()).then(ib.cmp(ia)))
                .map(|(i, _)| i),
        };

        let mut removed = Vec::new();
        for (i, comp) in components.iter().enumerate() {
            if Some(i) == keep {
                continue;
            }
            for v in comp {
                graph.remove_vertex(*v)?;
                removed.push(*v);
            }
        }
        Ok(removed)
    }

    /// Replace the placeholder \p placeholder by the real \p person: the
    /// person takes over the parents and the relationships of the placeholder.
    pub fn merge_placeholder(&mut self, placeholder: VertexId, person: VertexId) -> Result<()> {
        self.apply_edit("merge placeholder", |graph, proband| {
            graph.check_kind(placeholder, VertexType::Person)?;
            graph.check_kind(person, VertexType::Person)?;
            if !graph.is_placeholder(placeholder) {
                return Err(PedigreeError::invalid_vertex(placeholder, "not a placeholder"));
            }
            if graph.is_placeholder(person) || person == placeholder {
                return Err(PedigreeError::invalid_vertex(person, "not a real person"));
            }

            if let Some(hub) = graph.single_pred(placeholder) {
                if !graph.predecessors(person).is_empty() {
                    return Err(PedigreeError::invalid_vertex(
                        person,
                        "both the person and the placeholder have parents",
                    ));
                }
                let weight = graph.edge_weight(hub, placeholder).unwrap_or(DEFAULT_EDGE_WEIGHT);
                graph.add_edge(hub, person, weight)?;
            }

            for rel in graph.relationships_of(placeholder) {
                for other in graph.relationship_partners(rel) {
                    if other == placeholder {
                        continue;
                    }
                    if other == person || graph.relationship_between(person, other).is_some() {
                        return Err(PedigreeError::invalid_vertex(
                            rel,
                            format!("{} already has a relationship with {}", person, other),
                        ));
                    }
                }
                graph.add_edge(person, rel, DEFAULT_EDGE_WEIGHT)?;
            }

            graph.remove_vertex(placeholder)?;
            if *proband == Some(placeholder) {
                *proband = Some(person);
            }
            Ok(())
        })
    }

    // Persistence. //

    pub fn serialize(&self) -> SerializedPedigree {
        let mut data = SerializedPedigree::from_graph(&self.graph, self.proband);
        data.layout = Some(self.layout.to_serialized());
        data
    }

    pub fn to_json(&self) -> Result<String> {
        self.serialize().to_json()
    }

    /// Rebuild a session from \p data. The stored layout is reused when it is
    /// still valid for the graph, otherwise the pedigree is laid out again.
    pub fn load(data: &SerializedPedigree, options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        let graph = data.to_graph(&options)?;
        if let Some(p) = data.proband {
            graph.check_kind(p, VertexType::Person)?;
        }

        let restored = data
            .layout
            .as_ref()
            .map(|saved| Layout::restore(&graph, &options, saved));
        let layout = match restored {
            Some(Ok(layout)) => layout,
            #[cfg_attr(not(feature = "log"), allow(unused_variables))]
            Some(Err(err)) => {
                #[cfg(feature = "log")]
                log::info!("Discarding the stored layout: {}", err);
                Layout::compute(&graph, data.proband, &options, None)?
            }
            None => Layout::compute(&graph, data.proband, &options, None)?,
        };

        Ok(Self {
            graph,
            proband: data.proband,
            options,
            layout,
        })
    }

    pub fn from_json(text: &str, options: LayoutOptions) -> Result<Self> {
        Self::load(&SerializedPedigree::from_json(text)?, options)
    }

    /// Replace the whole session state with \p data, keeping the options. The
    /// current state is untouched if \p data can't be loaded.
    pub fn restore(&mut self, data: &SerializedPedigree) -> Result<()> {
        *self = Self::load(data, self.options.clone())?;
        Ok(())
    }
}

#[test]
fn test_rank_heights() {
    let heights = Layout::rank_heights(4, &LayoutOptions::default());
    assert_eq!(heights, vec![0., 21.6, 35.6, 57.2]);
}

#[test]
fn test_trio_positions() {
    use crate::adt::base_graph::make_trio;
    let (g, [father, mother, rel, hub, child]) = make_trio();
    let ctx = PedigreeLayoutContext::new(g, Some(child), LayoutOptions::default()).unwrap();
    let pos = ctx.positions();
    assert_eq!(pos.len(), 5);
    assert_eq!(pos[&rel].y, pos[&father].y);
    assert_eq!(pos[&hub].y, 21.6);
    assert_eq!(pos[&child].y, 35.6);
    let (lo, hi) = if pos[&father].x < pos[&mother].x {
        (pos[&father].x, pos[&mother].x)
    } else {
        (pos[&mother].x, pos[&father].x)
    };
    assert!(lo < pos[&child].x && pos[&child].x < hi);
    assert_eq!(ctx.relationship_childhub_position(rel).unwrap(), pos[&hub]);
    assert_eq!(ctx.relationship_children(rel).unwrap(), vec![child]);
    assert!(ctx.relationship_children(child).is_err());
    assert_eq!(ctx.rank_of(hub), Some(1));
    assert_eq!(ctx.layout().num_crossings(), 0);
}

#[test]
fn test_rejected_edit_keeps_state() {
    let mut ctx = PedigreeLayoutContext::with_single_person(LayoutOptions::default()).unwrap();
    let me = ctx.proband().unwrap();
    let before = ctx.positions();
    // Not a relationship.
    assert!(ctx.add_child(me).is_err());
    // A person can't partner itself.
    assert!(ctx.add_partnership(me, me).is_err());
    assert_eq!(ctx.positions(), before);
    assert_eq!(ctx.graph().num_vertices(), 1);
}

#[test]
fn test_remove_prunes_detached_family() {
    let mut ctx = PedigreeLayoutContext::with_single_person(LayoutOptions::default()).unwrap();
    let me = ctx.proband().unwrap();
    let rel = ctx.add_parents(me).unwrap();
    let (partner, rel2) = ctx.add_partner(me).unwrap();
    let kid = ctx.add_child(rel2).unwrap();
    assert_eq!(ctx.graph().num_vertices(), 9);

    // Removing the proband's partnership leaves the partner and the kid
    // detached from the proband.
    let removed = ctx.remove_vertex(rel2).unwrap();
    assert!(removed.contains(&partner));
    assert!(removed.contains(&kid));
    assert_eq!(ctx.graph().num_vertices(), 5);
    assert_eq!(ctx.relationship_children(rel).unwrap(), vec![me]);
}

#[test]
fn test_merge_placeholder() {
    let mut ctx = PedigreeLayoutContext::with_single_person(LayoutOptions::default()).unwrap();
    let me = ctx.proband().unwrap();
    let (spouse, rel) = ctx.add_partner(me).unwrap();
    let ph = ctx.add_placeholder_child(rel).unwrap();
    let (ph_partner, ph_rel) = ctx.add_partner(ph).unwrap();

    // Both have parents.
    let kid = ctx.add_child(rel).unwrap();
    assert!(ctx.merge_placeholder(ph, kid).is_err());
    assert!(ctx.merge_placeholder(kid, ph).is_err());
    assert!(ctx.graph().contains(ph));

    // A parentless person that married into the family takes the place of
    // the placeholder.
    let in_laws = ctx.add_parents(spouse).unwrap();
    let uncle = ctx.add_child(in_laws).unwrap();
    let (aunt, _) = ctx.add_partner(uncle).unwrap();
    ctx.merge_placeholder(ph, aunt).unwrap();
    assert!(!ctx.graph().contains(ph));
    assert_eq!(ctx.graph().parents(aunt).len(), 2);
    assert!(ctx.graph().relationship_partners(ph_rel).contains(&aunt));
    assert!(ctx.graph().partners(aunt).contains(&ph_partner));
}

#[test]
fn test_serialize_and_load() {
    let mut ctx = PedigreeLayoutContext::with_single_person(LayoutOptions::default()).unwrap();
    let me = ctx.proband().unwrap();
    let (_, rel) = ctx.add_partner(me).unwrap();
    ctx.add_child(rel).unwrap();
    ctx.add_parents(me).unwrap();

    let text = ctx.to_json().unwrap();
    let back = PedigreeLayoutContext::from_json(&text, LayoutOptions::default()).unwrap();
    assert_eq!(back.graph(), ctx.graph());
    assert_eq!(back.positions(), ctx.positions());
    assert_eq!(back.proband(), Some(me));

    // A stored layout with overlapping coordinates is recomputed.
    let mut data = ctx.serialize();
    if let Some(layout) = data.layout.as_mut() {
        for x in layout.positions.iter_mut() {
            *x = 0;
        }
    }
    let fresh = PedigreeLayoutContext::load(&data, LayoutOptions::default()).unwrap();
    fresh.layout().ordering().verify(fresh.layout().graph(), fresh.layout().ranks()).unwrap();
    assert!(fresh.positions().values().any(|p| p.x > 0.));
}

#[test]
fn test_twins_can_not_be_partners() {
    let mut ctx = PedigreeLayoutContext::with_single_person(LayoutOptions::default()).unwrap();
    let me = ctx.proband().unwrap();
    let parents = ctx.add_parents(me).unwrap();
    let twin = ctx.add_twin(me).unwrap();
    let before = ctx.serialize();
    assert!(matches!(
        ctx.add_partnership(me, twin),
        Err(PedigreeError::InvalidPedigreeTopology(_))
    ));
    assert_eq!(ctx.serialize(), before);

    // A sibling outside the twin group can be a partner, and the
    // relationship sits between the two partners.
    let sibling = ctx.add_child(parents).unwrap();
    let rel = ctx.add_partnership(twin, sibling).unwrap();
    let ord = ctx.layout().ordering();
    let (a, b, r) = (
        ord.position_of(twin).unwrap(),
        ord.position_of(sibling).unwrap(),
        ord.position_of(rel).unwrap(),
    );
    assert!(a.min(b) < r && r < a.max(b));
    let x = |v| ctx.position(v).unwrap().x;
    assert!(x(twin).min(x(sibling)) < x(rel) && x(rel) < x(twin).max(x(sibling)));
}
