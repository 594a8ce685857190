//! This module orders the vertices within each rank of the layered graph so
//! that few edges cross each other. It is the classic median heuristic:
//! alternate top-down and bottom-up sweeps that sort each rank by the
//! weighted median position of the neighbours in the rank that was just
//! fixed, followed by a transposition pass that swaps neighbours whenever
//! that strictly reduces the crossings. The best order seen is kept. This is
//! a heuristic with a fixed iteration cap, not an optimal crossing minimizer.
//!
//! Two drawing rules are hard constraints. A relationship must sit between
//! its partners, and twins must stay together in registration order. Both are
//! enforced by construction: the vertices that are tied by these rules form a
//! "unit" that is linearized once, and the optimizer only ever moves or
//! mirrors whole units.

use crate::adt::base_graph::BaseGraph;
use crate::adt::ordering::{Ordering, RankType};
use crate::core::base::{Direction, VertexId};
use crate::core::options::LayoutOptions;
use crate::core::utils::weighted_median;
use std::cmp;
use std::collections::{HashMap, HashSet};

type LayerEdge = (VertexId, VertexId, usize);

/// A sequence of vertices that always stays contiguous in its rank. Each item
/// is atomic: a single vertex or a block of twins in registration order.
#[derive(Debug, Clone, PartialEq)]
struct Unit {
    items: Vec<Vec<VertexId>>,
}

impl Unit {
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.items.iter().flatten().copied()
    }

    fn mirror(&mut self) {
        self.items.reverse();
    }
}

/// Count the weighted crossings between the edges of one layer, given the
/// position of every vertex in its rank. Two crossing edges with weights w1
/// and w2 contribute w1 * w2.
fn count_layer_crossings<F>(edges: &[LayerEdge], pos: F) -> usize
where
    F: Fn(VertexId) -> usize,
{
    let mut sum = 0;
    for i in 0..edges.len() {
        for j in i + 1..edges.len() {
            let (a1, b1, w1) = edges[i];
            let (a2, b2, w2) = edges[j];
            let (pa1, pa2) = (pos(a1), pos(a2));
            let (pb1, pb2) = (pos(b1), pos(b2));
            if (pa1 < pa2 && pb1 > pb2) || (pa1 > pa2 && pb1 < pb2) {
                sum += w1 * w2;
            }
        }
    }
    sum
}

/// Collect the edges from each rank to the next one. Partner edges that stay
/// within a rank do not take part in crossings.
fn layer_edges(graph: &BaseGraph, ranks: &[usize], num_ranks: usize) -> Vec<Vec<LayerEdge>> {
    let mut res = vec![Vec::new(); num_ranks];
    for v in graph.iter() {
        let r = ranks[v.get_index()];
        for e in graph.out_edges(v) {
            if ranks[e.to.get_index()] == r + 1 {
                res[r].push((v, e.to, e.weight));
            }
        }
    }
    res
}

/// \returns the number of weighted edge crossings of \p ordering.
pub fn count_crossings(graph: &BaseGraph, ranks: &[usize], ordering: &Ordering) -> usize {
    let edges = layer_edges(graph, ranks, ordering.num_ranks());
    let pos = |v: VertexId| ordering.position_of(v).unwrap_or(0);
    edges.iter().map(|layer| count_layer_crossings(layer, pos)).sum()
}

/// Computes the order of the vertices of a layered graph (see
/// BaseGraph::split_multi_rank_edges) within their ranks.
pub struct OrderOptimizer<'a> {
    graph: &'a BaseGraph,
    ranks: &'a [usize],
    options: &'a LayoutOptions,
    // Previous x coordinates, used to keep the drawing stable across edits.
    hint: Option<&'a HashMap<VertexId, f64>>,
    proband: Option<VertexId>,
    rows: Vec<Vec<Unit>>,
    // Position of each vertex within its rank, indexed by the vertex id.
    pos: Vec<usize>,
    layers: Vec<Vec<LayerEdge>>,
}

impl<'a> OrderOptimizer<'a> {
    pub fn new(graph: &'a BaseGraph, ranks: &'a [usize], options: &'a LayoutOptions) -> Self {
        assert!(ranks.len() >= graph.len(), "Missing ranks");
        Self {
            graph,
            ranks,
            options,
            hint: None,
            proband: None,
            rows: Vec::new(),
            pos: vec![0; graph.len()],
            layers: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: &'a HashMap<VertexId, f64>) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn with_proband(mut self, proband: Option<VertexId>) -> Self {
        self.proband = proband;
        self
    }

    fn num_ranks(&self) -> usize {
        self.graph
            .iter()
            .map(|v| self.ranks[v.get_index()] + 1)
            .max()
            .unwrap_or(0)
    }

    fn rank(&self, v: VertexId) -> usize {
        self.ranks[v.get_index()]
    }

    pub fn optimize(mut self) -> Ordering {
        let num_ranks = self.num_ranks();
        if num_ranks == 0 {
            return Ordering::default();
        }

        self.layers = layer_edges(self.graph, self.ranks, num_ranks);
        self.rows = self.initial_rows(num_ranks);
        self.reindex_all();

        #[cfg(feature = "log")]
        log::info!("Optimizing edge crossing.");
        let mut best_rows = self.rows.clone();
        let mut best_cnt = self.total_crossings();
        #[cfg(feature = "log")]
        log::info!("Starting with {} crossings.", best_cnt);

        let mut no_change = 0;
        for i in 0..self.options.max_ordering_iterations {
            if best_cnt == 0 {
                break;
            }
            let dir = if i % 2 == 0 {
                Direction::Down
            } else {
                Direction::Up
            };
            self.median_sweep(dir);
            self.transpose();

            let new_cnt = self.total_crossings();
            if new_cnt < best_cnt {
                #[cfg(feature = "log")]
                log::info!("Found an order with {} crossings.", new_cnt);
                best_rows = self.rows.clone();
                best_cnt = new_cnt;
                no_change = 0;
            } else {
                no_change += 1;
                if no_change >= self.options.max_no_change_iterations {
                    break;
                }
            }
        }

        self.rows = best_rows;
        self.reindex_all();
        self.fix_proband_parents();

        let order: RankType = self
            .rows
            .iter()
            .map(|row| row.iter().flat_map(|u| u.vertices()).collect())
            .collect();
        Ordering::new(order)
    }

    fn reindex_row(&mut self, rank: usize) {
        let mut i = 0;
        for unit in self.rows[rank].iter() {
            for v in unit.vertices() {
                self.pos[v.get_index()] = i;
                i += 1;
            }
        }
    }

    fn reindex_all(&mut self) {
        for r in 0..self.rows.len() {
            self.reindex_row(r);
        }
    }

    fn crossings(&self, layer: usize) -> usize {
        count_layer_crossings(&self.layers[layer], |v| self.pos[v.get_index()])
    }

    fn total_crossings(&self) -> usize {
        (0..self.layers.len()).map(|l| self.crossings(l)).sum()
    }

    /// \returns the crossings of the two layers touching rank \p rank.
    fn crossings_around(&self, rank: usize) -> usize {
        let mut sum = self.crossings(rank);
        if rank > 0 {
            sum += self.crossings(rank - 1);
        }
        sum
    }

    // Construction of the units. //

    /// Split every rank into units and sort them by the initial traversal.
    fn initial_rows(&self, num_ranks: usize) -> Vec<Vec<Unit>> {
        let keys = self.initial_keys();
        let mut rows: Vec<Vec<Unit>> = vec![Vec::new(); num_ranks];
        for mut unit in self.build_units() {
            // Keep the orientation of the previous drawing.
            let first = unit.items[0][0];
            let last = unit.vertices().last();
            if let Some(last) = last {
                if keys[first.get_index()].0 > keys[last.get_index()].0 {
                    unit.mirror();
                }
            }
            rows[self.rank(first)].push(unit);
        }
        for row in rows.iter_mut() {
            let key = |u: &Unit| {
                u.vertices()
                    .map(|v| keys[v.get_index()])
                    .fold((f64::INFINITY, usize::MAX), |a, b| {
                        match a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)) {
                            cmp::Ordering::Greater => b,
                            _ => a,
                        }
                    })
            };
            row.sort_by(|a, b| {
                let (ka, kb) = (key(a), key(b));
                ka.0.total_cmp(&kb.0).then(ka.1.cmp(&kb.1))
            });
        }
        rows
    }

    /// \returns a sort key for every vertex: the hinted x coordinate (or the
    /// one inherited from the vertex it was discovered from) and the visit
    /// index of a DFS that starts at the first parentless person and walks
    /// the edges in both directions.
    fn initial_keys(&self) -> Vec<(f64, usize)> {
        let mut keys = vec![(0., usize::MAX); self.graph.len()];
        let mut visited = vec![false; self.graph.len()];
        let mut next_index = 0;

        let (parentless, _) = self.graph.leaf_and_parentless();
        let mut roots: Vec<VertexId> = parentless
            .into_iter()
            .filter(|v| self.graph.is_person(*v))
            .collect();
        roots.extend(self.graph.iter());

        for root in roots {
            if visited[root.get_index()] {
                continue;
            }
            let root_hint = self.hint_of(root).unwrap_or(0.);
            let mut worklist = vec![(root, root_hint)];
            while let Some((v, inherited)) = worklist.pop() {
                if visited[v.get_index()] {
                    continue;
                }
                visited[v.get_index()] = true;
                let hint = self.hint_of(v).unwrap_or(inherited);
                keys[v.get_index()] = (hint, next_index);
                next_index += 1;

                let mut neighbours: Vec<VertexId> = self.graph.successors(v).collect();
                neighbours.extend(self.graph.predecessors(v).iter().copied());
                // Visit the first neighbour first.
                for n in neighbours.into_iter().rev() {
                    if !visited[n.get_index()] {
                        worklist.push((n, hint));
                    }
                }
            }
        }
        keys
    }

    fn hint_of(&self, v: VertexId) -> Option<f64> {
        self.hint.and_then(|h| h.get(&v).copied())
    }

    /// Group the vertices of each rank into units.
    fn build_units(&self) -> Vec<Unit> {
        // Atoms: twin blocks and single vertices.
        let mut atoms: Vec<Vec<VertexId>> = Vec::new();
        let mut atom_of: Vec<usize> = vec![usize::MAX; self.graph.len()];
        for v in self.graph.iter() {
            if atom_of[v.get_index()] != usize::MAX {
                continue;
            }
            let block = self.graph.twins(v);
            for t in block.iter() {
                atom_of[t.get_index()] = atoms.len();
            }
            atoms.push(block);
        }

        // Join atoms along the partner edges that stay within a rank.
        let mut parent: Vec<usize> = (0..atoms.len()).collect();
        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }
        for rel in self.graph.iter().filter(|v| self.graph.is_relationship(*v)) {
            for p in self.same_rank_partners(rel) {
                let a = find(&mut parent, atom_of[p.get_index()]);
                let b = find(&mut parent, atom_of[rel.get_index()]);
                parent[a] = b;
            }
        }

        let mut components: Vec<Vec<usize>> = Vec::new();
        let mut component_of: HashMap<usize, usize> = HashMap::new();
        for atom in 0..atoms.len() {
            let root = find(&mut parent, atom);
            let idx = *component_of.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[idx].push(atom);
        }

        let mut units = Vec::new();
        for comp in components {
            if comp.len() == 1 {
                units.push(Unit {
                    items: vec![atoms[comp[0]].clone()],
                });
                continue;
            }
            units.push(self.linearize(&comp, &atoms, &atom_of));
        }
        units
    }

    /// \returns the partners of \p rel that sit on the same rank as \p rel.
    fn same_rank_partners(&self, rel: VertexId) -> Vec<VertexId> {
        self.graph
            .predecessors(rel)
            .iter()
            .copied()
            .filter(|p| self.graph.is_person(*p) && self.rank(*p) == self.rank(rel))
            .collect()
    }

    /// \returns the relationships on the same rank that the members of the
    /// person atom \p atom take part in, in registration order.
    fn atom_relationships(&self, atom: &[VertexId]) -> Vec<VertexId> {
        let mut res = Vec::new();
        for v in atom {
            if !self.graph.is_person(*v) {
                continue;
            }
            for s in self.graph.successors(*v) {
                if self.graph.is_relationship(s) && self.rank(s) == self.rank(*v) {
                    res.push(s);
                }
            }
        }
        res
    }

    /// Lay out a group of persons and relationships tied by partner edges so
    /// that every relationship sits between its partners. The walk starts at
    /// the person with the fewest relationships and grows to both sides.
    fn linearize(&self, comp: &[usize], atoms: &[Vec<VertexId>], atom_of: &[usize]) -> Unit {
        let person_atoms: Vec<usize> = comp
            .iter()
            .copied()
            .filter(|a| self.graph.is_person(atoms[*a][0]))
            .collect();
        let root = person_atoms
            .iter()
            .copied()
            .min_by_key(|a| (self.atom_relationships(&atoms[*a]).len(), atoms[*a][0]))
            .unwrap_or(comp[0]);

        let mut visited_atoms: HashSet<usize> = HashSet::from([root]);
        let mut visited_rels: HashSet<VertexId> = HashSet::new();

        let rels = self.atom_relationships(&atoms[root]);
        let num_left = if atoms[root].len() > 1 {
            // Spouses of the first twin go to the left of the twin block.
            let first = atoms[root][0];
            rels.iter()
                .take_while(|r| self.graph.predecessors(**r).contains(&first))
                .count()
        } else {
            rels.len() / 2
        };

        let mut left: Vec<Vec<VertexId>> = Vec::new();
        let mut right: Vec<Vec<VertexId>> = Vec::new();
        for (i, rel) in rels.iter().enumerate() {
            if !visited_rels.insert(*rel) {
                continue;
            }
            let mut seq = vec![vec![*rel]];
            seq.extend(self.grow(*rel, root, atoms, atom_of, &mut visited_atoms, &mut visited_rels));
            if i < num_left {
                seq.reverse();
                seq.extend(left);
                left = seq;
            } else {
                right.extend(seq);
            }
        }

        let mut items = left;
        items.push(atoms[root].clone());
        items.extend(right);

        // Anything not reached (which only happens for malformed input)
        // is appended so that every vertex keeps its place in the rank.
        for a in comp {
            for v in atoms[*a].iter() {
                if !items.iter().flatten().any(|x| x == v) {
                    items.push(vec![*v]);
                }
            }
        }
        Unit { items }
    }

    /// \returns the items on the far side of relationship \p rel, seen from
    /// the atom \p from: the other partner followed by everything hanging off
    /// its other relationships.
    fn grow(
        &self,
        rel: VertexId,
        from: usize,
        atoms: &[Vec<VertexId>],
        atom_of: &[usize],
        visited_atoms: &mut HashSet<usize>,
        visited_rels: &mut HashSet<VertexId>,
    ) -> Vec<Vec<VertexId>> {
        let mut items = Vec::new();
        for p in self.same_rank_partners(rel) {
            let atom = atom_of[p.get_index()];
            if atom == from || !visited_atoms.insert(atom) {
                continue;
            }
            items.push(atoms[atom].clone());
            for next in self.atom_relationships(&atoms[atom]) {
                if !visited_rels.insert(next) {
                    continue;
                }
                items.push(vec![next]);
                items.extend(self.grow(next, atom, atoms, atom_of, visited_atoms, visited_rels));
            }
        }
        items
    }

    // Crossing reduction. //

    /// \returns the weighted median position of the neighbours of \p unit in
    /// the adjacent rank in the direction opposite to the sweep.
    fn unit_median(&self, unit: &Unit, rank: usize, dir: Direction) -> Option<f64> {
        let mut positions = Vec::new();
        for v in unit.vertices() {
            if dir.is_down() {
                for p in self.graph.predecessors(v) {
                    if rank > 0 && self.rank(*p) == rank - 1 {
                        positions.push(self.pos[p.get_index()] as f64);
                    }
                }
            } else {
                for s in self.graph.successors(v) {
                    if self.rank(s) == rank + 1 {
                        positions.push(self.pos[s.get_index()] as f64);
                    }
                }
            }
        }
        weighted_median(&positions)
    }

    /// Sort every rank by the median of the neighbours in the previous rank
    /// of the sweep. Units without neighbours keep their slot, ties keep the
    /// previous order.
    fn median_sweep(&mut self, dir: Direction) {
        let num_ranks = self.rows.len();
        let order: Vec<usize> = match dir {
            Direction::Down => (1..num_ranks).collect(),
            Direction::Up => (0..num_ranks.saturating_sub(1)).rev().collect(),
        };

        for rank in order {
            let row = std::mem::take(&mut self.rows[rank]);
            let mut slots: Vec<Option<Unit>> = Vec::new();
            let mut movable: Vec<(f64, usize, Unit)> = Vec::new();
            for (i, unit) in row.into_iter().enumerate() {
                match self.unit_median(&unit, rank, dir) {
                    Some(m) => {
                        movable.push((m, i, unit));
                        slots.push(None);
                    }
                    None => slots.push(Some(unit)),
                }
            }
            movable.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

            let mut sorted = movable.into_iter().map(|(_, _, u)| u);
            let mut new_row = Vec::new();
            for slot in slots {
                match slot {
                    Some(unit) => new_row.push(unit),
                    None => {
                        if let Some(unit) = sorted.next() {
                            new_row.push(unit);
                        }
                    }
                }
            }
            self.rows[rank] = new_row;
            self.reindex_row(rank);
        }
    }

    /// Swap neighbouring units, or mirror a unit, whenever this strictly
    /// reduces the crossings around the rank. Repeat until nothing improves
    /// or the pass cap is reached.
    fn transpose(&mut self) {
        for _ in 0..self.options.max_transpose_passes {
            let mut improved = false;
            for rank in 0..self.rows.len() {
                for i in 0..self.rows[rank].len() {
                    if self.rows[rank][i].items.len() > 1 {
                        let before = self.crossings_around(rank);
                        self.rows[rank][i].mirror();
                        self.reindex_row(rank);
                        if self.crossings_around(rank) < before {
                            improved = true;
                        } else {
                            self.rows[rank][i].mirror();
                            self.reindex_row(rank);
                        }
                    }

                    if i + 1 < self.rows[rank].len() {
                        let before = self.crossings_around(rank);
                        self.rows[rank].swap(i, i + 1);
                        self.reindex_row(rank);
                        if self.crossings_around(rank) < before {
                            improved = true;
                        } else {
                            self.rows[rank].swap(i, i + 1);
                            self.reindex_row(rank);
                        }
                    }
                }
            }
            if !improved {
                break;
            }
        }
    }

    /// Draw the father of the proband to the left of the mother. Mirroring
    /// the whole drawing does not change the number of crossings.
    fn fix_proband_parents(&mut self) {
        let proband = match self.proband {
            Some(p) if self.graph.contains(p) => p,
            _ => return,
        };
        let rel = match self.graph.producing_relationship(proband) {
            Some(rel) => rel,
            None => return,
        };
        let (mother, father) = match self.graph.mother_father(rel) {
            Some(mf) => mf,
            None => return,
        };
        if self.rank(mother) != self.rank(father) {
            return;
        }
        if self.pos[father.get_index()] < self.pos[mother.get_index()] {
            return;
        }

        #[cfg(feature = "log")]
        log::info!("Mirroring the order to place the father on the left.");
        for row in self.rows.iter_mut() {
            row.reverse();
            for unit in row.iter_mut() {
                unit.mirror();
            }
        }
        self.reindex_all();
    }
}

/// Compute the order of the layered \p graph ranked by \p ranks.
pub fn compute_order(
    graph: &BaseGraph,
    ranks: &[usize],
    options: &LayoutOptions,
    hint: Option<&HashMap<VertexId, f64>>,
    proband: Option<VertexId>,
) -> Ordering {
    let mut opt = OrderOptimizer::new(graph, ranks, options).with_proband(proband);
    if let Some(hint) = hint {
        opt = opt.with_hint(hint);
    }
    opt.optimize()
}

#[cfg(test)]
fn layered_trio_with_spouse() -> (BaseGraph, Vec<usize>, Vec<VertexId>) {
    use crate::adt::base_graph::make_trio;
    use crate::core::base::VertexType;
    use crate::core::properties::Properties;
    use crate::topo::rank::compute_ranks;

    let (mut g, [_, _, _, hub, child]) = make_trio();
    let spouse = g
        .add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    let rel = g
        .add_vertex(None, VertexType::Relationship, Properties::default(), None)
        .unwrap();
    let hub2 = g
        .add_vertex(None, VertexType::Childhub, Properties::default(), None)
        .unwrap();
    g.add_edge(child, rel, 1).unwrap();
    g.add_edge(spouse, rel, 1).unwrap();
    g.add_edge(rel, hub2, 1).unwrap();
    let mut twins = Vec::new();
    for _ in 0..3 {
        let t = g
            .add_vertex(None, VertexType::Person, Properties::default(), None)
            .unwrap();
        g.add_edge(hub2, t, 1).unwrap();
        twins.push(t);
    }
    g.properties_mut(twins[0]).twin_group = Some(0);
    g.properties_mut(twins[2]).twin_group = Some(0);
    let sibling = g
        .add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    g.add_edge(hub, sibling, 1).unwrap();
    g.validate().unwrap();

    let ranks = compute_ranks(&g, &LayoutOptions::default()).unwrap();
    let (layered, ranks) = g.split_multi_rank_edges(&ranks).unwrap();
    (layered, ranks, twins)
}

#[test]
fn test_partition_and_constraints() {
    let (g, ranks, twins) = layered_trio_with_spouse();
    let ord = compute_order(&g, &ranks, &LayoutOptions::default(), None, None);
    ord.verify(&g, &ranks).unwrap();

    // Relationships sit between their partners.
    for rel in g.iter().filter(|v| g.is_relationship(*v)) {
        let r = ord.position_of(rel).unwrap();
        let ps: Vec<usize> = g
            .predecessors(rel)
            .iter()
            .map(|p| ord.position_of(*p).unwrap())
            .collect();
        assert!(cmp::min(ps[0], ps[1]) < r && r < cmp::max(ps[0], ps[1]));
    }

    // Twins are contiguous and in registration order.
    let a = ord.position_of(twins[0]).unwrap();
    let b = ord.position_of(twins[2]).unwrap();
    assert_eq!(b, a + 1);
}

#[test]
fn test_crossings_are_removed() {
    use crate::core::base::VertexType;
    use crate::core::properties::Properties;

    // Two couples whose children were registered crosswise.
    let mut g = BaseGraph::new();
    let add = |g: &mut BaseGraph, kind| {
        g.add_vertex(None, kind, Properties::default(), None)
            .unwrap()
    };
    let p: Vec<VertexId> = (0..4).map(|_| add(&mut g, VertexType::Person)).collect();
    let r1 = add(&mut g, VertexType::Relationship);
    let h1 = add(&mut g, VertexType::Childhub);
    let r2 = add(&mut g, VertexType::Relationship);
    let h2 = add(&mut g, VertexType::Childhub);
    g.add_edge(p[0], r1, 1).unwrap();
    g.add_edge(p[1], r1, 1).unwrap();
    g.add_edge(p[2], r2, 1).unwrap();
    g.add_edge(p[3], r2, 1).unwrap();
    g.add_edge(r1, h1, 1).unwrap();
    g.add_edge(r2, h2, 1).unwrap();
    // The child of the second couple marries the child of the first couple.
    let c1 = add(&mut g, VertexType::Person);
    let c2 = add(&mut g, VertexType::Person);
    let c3 = add(&mut g, VertexType::Person);
    g.add_edge(h2, c1, 1).unwrap();
    g.add_edge(h1, c2, 1).unwrap();
    g.add_edge(h1, c3, 1).unwrap();
    let r3 = add(&mut g, VertexType::Relationship);
    let h3 = add(&mut g, VertexType::Childhub);
    g.add_edge(c1, r3, 1).unwrap();
    g.add_edge(c3, r3, 1).unwrap();
    g.add_edge(r3, h3, 1).unwrap();
    g.validate().unwrap();

    let options = LayoutOptions::default();
    let ranks = crate::topo::rank::compute_ranks(&g, &options).unwrap();
    let ord = compute_order(&g, &ranks, &options, None, None);
    ord.verify(&g, &ranks).unwrap();
    assert_eq!(count_crossings(&g, &ranks, &ord), 0);
}

#[test]
fn test_proband_father_on_the_left() {
    use crate::adt::base_graph::make_trio;
    let (g, [father, mother, _, _, child]) = make_trio();
    let options = LayoutOptions::default();
    let ranks = crate::topo::rank::compute_ranks(&g, &options).unwrap();

    // Hint the mother to the left; the proband rule flips it back.
    let mut hint = HashMap::new();
    hint.insert(mother, 0.);
    hint.insert(father, 100.);
    let ord = compute_order(&g, &ranks, &options, Some(&hint), Some(child));
    assert!(ord.position_of(father) < ord.position_of(mother));

    let ord = compute_order(&g, &ranks, &options, Some(&hint), None);
    assert!(ord.position_of(mother) < ord.position_of(father));
}

#[test]
fn test_weighted_crossings() {
    let a = VertexId::from(0);
    let b = VertexId::from(1);
    let c = VertexId::from(2);
    let d = VertexId::from(3);
    // a -> d and b -> c cross.
    let edges = vec![(a, d, 2), (b, c, 3)];
    let pos = |v: VertexId| match v.get_index() {
        0 | 2 => 0,
        _ => 1,
    };
    assert_eq!(count_layer_crossings(&edges, pos), 6);
}
