//! The left-to-right order of the vertices within each rank of the layered
//! graph, with a reverse index from vertex id to (rank, position).

use crate::adt::base_graph::BaseGraph;
use crate::core::base::VertexId;
use crate::core::error::{PedigreeError, Result};

pub type RankType = Vec<Vec<VertexId>>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ordering {
    order: RankType,
    // (rank, position) of every vertex, indexed by the vertex id.
    index: Vec<Option<(usize, usize)>>,
}

impl Ordering {
    pub fn new(order: RankType) -> Self {
        let mut res = Ordering {
            order,
            index: Vec::new(),
        };
        res.reindex();
        res
    }

    fn reindex(&mut self) {
        self.index.clear();
        for rank in 0..self.order.len() {
            self.reindex_row(rank);
        }
    }

    fn reindex_row(&mut self, rank: usize) {
        for (pos, v) in self.order[rank].iter().enumerate() {
            let idx = v.get_index();
            if idx >= self.index.len() {
                self.index.resize(idx + 1, None);
            }
            self.index[idx] = Some((rank, pos));
        }
    }

    /// \returns the number of ranks.
    pub fn num_ranks(&self) -> usize {
        self.order.len()
    }

    /// \returns the number of vertices in all ranks.
    pub fn len(&self) -> usize {
        self.order.iter().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// \return a reference to a row at level \p rank.
    pub fn row(&self, rank: usize) -> &[VertexId] {
        assert!(rank < self.order.len(), "Invalid rank");
        &self.order[rank]
    }

    pub fn rows(&self) -> &RankType {
        &self.order
    }

    /// Replace the row \p rank with \p row, which must hold the same vertices.
    pub fn set_row(&mut self, rank: usize, row: Vec<VertexId>) {
        assert!(rank < self.order.len(), "Invalid rank");
        assert_eq!(row.len(), self.order[rank].len());
        self.order[rank] = row;
        self.reindex_row(rank);
    }

    fn lookup(&self, v: VertexId) -> Option<(usize, usize)> {
        self.index.get(v.get_index()).copied().flatten()
    }

    pub fn rank_of(&self, v: VertexId) -> Option<usize> {
        self.lookup(v).map(|(r, _)| r)
    }

    pub fn position_of(&self, v: VertexId) -> Option<usize> {
        self.lookup(v).map(|(_, p)| p)
    }

    pub fn left_neighbour(&self, v: VertexId) -> Option<VertexId> {
        let (rank, pos) = self.lookup(v)?;
        if pos == 0 {
            return None;
        }
        Some(self.order[rank][pos - 1])
    }

    pub fn right_neighbour(&self, v: VertexId) -> Option<VertexId> {
        let (rank, pos) = self.lookup(v)?;
        self.order[rank].get(pos + 1).copied()
    }

    /// Flip the drawing horizontally.
    pub fn mirror(&mut self) {
        for row in self.order.iter_mut() {
            row.reverse();
        }
        self.reindex();
    }

    /// Check that every vertex of \p graph appears exactly once, in the row
    /// that matches its rank in \p ranks.
    pub fn verify(&self, graph: &BaseGraph, ranks: &[usize]) -> Result<()> {
        let mut seen = vec![false; graph.len()];
        for (rank, row) in self.order.iter().enumerate() {
            for v in row {
                if !graph.contains(*v) {
                    return Err(PedigreeError::invalid_vertex(
                        *v,
                        "ordered vertex is not in the graph",
                    ));
                }
                if seen[v.get_index()] {
                    return Err(PedigreeError::inconsistency(format!(
                        "vertex {} appears twice in the order",
                        v
                    )));
                }
                seen[v.get_index()] = true;
                if ranks.get(v.get_index()) != Some(&rank) {
                    return Err(PedigreeError::inconsistency(format!(
                        "vertex {} is ordered in rank {} but ranked elsewhere",
                        v, rank
                    )));
                }
            }
        }
        if let Some(v) = graph.iter().find(|v| !seen[v.get_index()]) {
            return Err(PedigreeError::inconsistency(format!(
                "vertex {} is missing from the order",
                v
            )));
        }
        Ok(())
    }
}

#[test]
fn test_neighbours() {
    let ids: Vec<VertexId> = (0..5).map(VertexId::from).collect();
    let mut ord = Ordering::new(vec![vec![ids[0], ids[2], ids[1]], vec![ids[4], ids[3]]]);
    assert_eq!(ord.num_ranks(), 2);
    assert_eq!(ord.len(), 5);
    assert_eq!(ord.rank_of(ids[3]), Some(1));
    assert_eq!(ord.position_of(ids[1]), Some(2));
    assert_eq!(ord.left_neighbour(ids[2]), Some(ids[0]));
    assert_eq!(ord.right_neighbour(ids[2]), Some(ids[1]));
    assert_eq!(ord.left_neighbour(ids[0]), None);
    assert_eq!(ord.right_neighbour(ids[1]), None);

    ord.mirror();
    assert_eq!(ord.row(0), &[ids[1], ids[2], ids[0]]);
    assert_eq!(ord.position_of(ids[3]), Some(0));

    ord.set_row(1, vec![ids[4], ids[3]]);
    assert_eq!(ord.position_of(ids[4]), Some(0));
}

#[test]
fn test_verify_partition() {
    use crate::adt::base_graph::make_trio;
    let (g, [father, mother, rel, hub, child]) = make_trio();
    let ranks = vec![0, 0, 0, 1, 2];
    let ord = Ordering::new(vec![vec![father, rel, mother], vec![hub], vec![child]]);
    ord.verify(&g, &ranks).unwrap();

    let missing = Ordering::new(vec![vec![father, rel, mother], vec![hub]]);
    assert!(missing.verify(&g, &ranks).is_err());

    let twice = Ordering::new(vec![vec![father, rel, mother], vec![hub], vec![child, father]]);
    assert!(twice.verify(&g, &ranks).is_err());
}
