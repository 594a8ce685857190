//! Horizontal coordinates of the layered graph. XCoord keeps the x coordinate
//! of the center of every vertex and offers a set of mutators that move
//! vertices without ever breaking the separation invariant: two neighbours
//! in a rank are always at least
//!
//! ```text
//!   half_width(left) + separation(left, right) + half_width(right)
//! ```
//!
//! apart, where the separation depends on the kinds of the two vertices.

use crate::adt::base_graph::BaseGraph;
use crate::adt::ordering::Ordering;
use crate::core::base::VertexId;
use crate::core::error::{PedigreeError, Result};
use crate::core::options::LayoutOptions;
use std::collections::HashSet;

/// The immutable inputs of the coordinate assignment. Coordinate vectors
/// borrow the frame, so copies of an XCoord share it.
#[derive(Debug)]
pub struct LayoutFrame<'a> {
    pub graph: &'a BaseGraph,
    pub ranks: &'a [usize],
    pub ordering: &'a Ordering,
    pub options: &'a LayoutOptions,
    half_width: Vec<i64>,
}

impl<'a> LayoutFrame<'a> {
    pub fn new(
        graph: &'a BaseGraph,
        ranks: &'a [usize],
        ordering: &'a Ordering,
        options: &'a LayoutOptions,
    ) -> Self {
        let mut half_width = vec![0; graph.len()];
        for v in graph.iter() {
            half_width[v.get_index()] = graph.half_width(v);
        }
        Self {
            graph,
            ranks,
            ordering,
            options,
            half_width,
        }
    }

    pub fn half_width(&self, v: VertexId) -> i64 {
        self.half_width[v.get_index()]
    }

    pub fn rank(&self, v: VertexId) -> usize {
        self.ranks[v.get_index()]
    }
}

/// The slack of a set of vertices that moves as a rigid block. None means
/// that the side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slacks {
    pub left: Option<i64>,
    pub right: Option<i64>,
}

fn min_slack(a: Option<i64>, b: Option<i64>) -> Option<i64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

#[derive(Debug, Clone)]
pub struct XCoord<'a> {
    frame: &'a LayoutFrame<'a>,
    xcoord: Vec<i64>,
}

impl<'a> XCoord<'a> {
    /// Pack every rank as far left as possible: the first vertex of a rank
    /// has its left edge at zero, every other vertex is placed at the
    /// minimum separation from its left neighbour.
    pub fn new(frame: &'a LayoutFrame<'a>) -> Self {
        let mut res = XCoord {
            frame,
            xcoord: vec![0; frame.graph.len()],
        };
        for row in frame.ordering.rows() {
            let mut prev: Option<VertexId> = None;
            for v in row {
                let x = match prev {
                    Some(p) => res.xcoord[p.get_index()] + res.min_separation(p, *v),
                    None => frame.half_width(*v),
                };
                res.xcoord[v.get_index()] = x;
                prev = Some(*v);
            }
        }
        res
    }

    /// Use the coordinates \p xcoord, indexed by vertex id. Fails if they
    /// violate the separation invariant.
    pub fn from_coords(frame: &'a LayoutFrame<'a>, xcoord: Vec<i64>) -> Result<Self> {
        if xcoord.len() < frame.graph.len() {
            return Err(PedigreeError::inconsistency(format!(
                "expected {} coordinates, found {}",
                frame.graph.len(),
                xcoord.len()
            )));
        }
        let res = XCoord { frame, xcoord };
        res.validate()?;
        Ok(res)
    }

    /// A copy with its own coordinates, for discardable trial moves.
    pub fn copy(&self) -> XCoord<'a> {
        self.clone()
    }

    pub fn frame(&self) -> &'a LayoutFrame<'a> {
        self.frame
    }

    pub fn x(&self, v: VertexId) -> i64 {
        self.xcoord[v.get_index()]
    }

    pub fn coords(&self) -> &[i64] {
        &self.xcoord
    }

    pub fn into_coords(self) -> Vec<i64> {
        self.xcoord
    }

    /// \returns the minimum gap between the borders of \p v1 and \p v2.
    pub fn separation_by_type(&self, v1: VertexId, v2: VertexId) -> i64 {
        let graph = self.frame.graph;
        let opt = self.frame.options;
        let (k1, k2) = (graph.kind(v1), graph.kind(v2));

        if k1.is_relationship_or_childhub() && k2.is_relationship_or_childhub() {
            return opt.horizontal_rel_rel_separation as i64;
        }
        if k1.is_relationship_or_childhub() || k2.is_relationship_or_childhub() {
            return opt.horizontal_rel_separation as i64;
        }
        if k1.is_virtual() || k2.is_virtual() {
            if graph.has_edge(v1, v2) || graph.has_edge(v2, v1) {
                return opt.horizontal_rel_separation as i64;
            }
            return opt.horizontal_twin_separation as i64;
        }
        if graph.are_twins(v1, v2) {
            return opt.horizontal_twin_separation as i64;
        }
        opt.horizontal_person_separation as i64
    }

    /// \returns the minimum distance between the centers of \p v1 and \p v2.
    pub fn min_separation(&self, v1: VertexId, v2: VertexId) -> i64 {
        self.frame.half_width(v1) + self.separation_by_type(v1, v2) + self.frame.half_width(v2)
    }

    pub fn left_edge(&self, v: VertexId) -> i64 {
        self.x(v) - self.frame.half_width(v)
    }

    pub fn right_edge(&self, v: VertexId) -> i64 {
        self.x(v) + self.frame.half_width(v)
    }

    /// \returns the smallest x that \p v can take without moving its left
    /// neighbour, or None if there is no left neighbour.
    pub fn left_most_no_disturb_position(&self, v: VertexId) -> Option<i64> {
        let left = self.frame.ordering.left_neighbour(v)?;
        Some(self.right_edge(left) + self.separation_by_type(v, left) + self.frame.half_width(v))
    }

    /// \returns the largest x that \p v can take without moving its right
    /// neighbour, or None if there is no right neighbour. With
    /// \p also_move_relationship a relationship to the right counts as
    /// movable and its own slack is added.
    pub fn right_most_no_disturb_position(
        &self,
        v: VertexId,
        also_move_relationship: bool,
    ) -> Option<i64> {
        let right = self.frame.ordering.right_neighbour(v)?;
        let mut boundary =
            self.left_edge(right) - self.separation_by_type(v, right) - self.frame.half_width(v);
        if also_move_relationship && self.frame.graph.is_relationship(right) {
            let right_most = self.right_most_no_disturb_position(right, false)?;
            boundary += right_most - self.x(right);
        }
        Some(boundary)
    }

    pub fn slack_on_the_left(&self, v: VertexId) -> Option<i64> {
        self.left_most_no_disturb_position(v).map(|b| self.x(v) - b)
    }

    pub fn slack_on_the_right(&self, v: VertexId) -> Option<i64> {
        self.right_most_no_disturb_position(v, false)
            .map(|b| b - self.x(v))
    }

    /// Move \p v to the left by at most \p amount, stopping as soon as it gets
    /// as close as allowed to its left neighbour.
    /// \returns the distance actually moved.
    pub fn shift_left_one_vertex(&mut self, v: VertexId, amount: i64) -> i64 {
        let actual = match self.slack_on_the_left(v) {
            Some(slack) => amount.min(slack),
            None => amount,
        };
        self.xcoord[v.get_index()] -= actual;
        actual
    }

    /// Move \p v to the right by at most \p amount, stopping as soon as it
    /// gets as close as allowed to its right neighbour.
    /// \returns the distance actually moved.
    pub fn shift_right_one_vertex(&mut self, v: VertexId, amount: i64) -> i64 {
        let actual = match self.slack_on_the_right(v) {
            Some(slack) => amount.min(slack),
            None => amount,
        };
        self.xcoord[v.get_index()] += actual;
        actual
    }

    /// Move \p v to the right by \p amount and push its right neighbours by
    /// the minimal distance needed to keep the separations. The cascade stops
    /// at the first neighbour whose gap absorbs the shift.
    pub fn shift_right_and_shift_other_if_necessary(&mut self, v: VertexId, amount: i64) -> i64 {
        self.xcoord[v.get_index()] += amount;

        let ordering = self.frame.ordering;
        let (rank, pos) = match (ordering.rank_of(v), ordering.position_of(v)) {
            (Some(r), Some(p)) => (r, p),
            _ => return amount,
        };

        let mut prev = v;
        for right in ordering.row(rank)[pos + 1..].iter().copied() {
            let needed = self.right_edge(prev) + self.separation_by_type(prev, right);
            if self.left_edge(right) >= needed {
                break;
            }
            self.xcoord[right.get_index()] = needed + self.frame.half_width(right);
            prev = right;
        }
        amount
    }

    /// Move \p v towards \p target_x as far as possible without moving any
    /// other vertex. \returns True if \p v moved.
    pub fn move_node_as_close_to_x_as_possible(&mut self, v: VertexId, target_x: i64) -> bool {
        let x = self.x(v);
        let new_x = if x > target_x {
            match self.left_most_no_disturb_position(v) {
                Some(bound) if bound > target_x => bound,
                _ => target_x,
            }
        } else {
            match self.right_most_no_disturb_position(v, false) {
                Some(bound) if bound < target_x => bound,
                _ => target_x,
            }
        };
        self.xcoord[v.get_index()] = new_x;
        new_x != x
    }

    /// Move \p v to \p target_x. Leftward moves stop at the left neighbour,
    /// rightward moves push the right neighbours.
    /// \returns True if \p v moved.
    pub fn move_towards(&mut self, v: VertexId, target_x: i64) -> bool {
        let x = self.x(v);
        if target_x < x {
            return self.move_node_as_close_to_x_as_possible(v, target_x);
        }
        if target_x > x {
            self.shift_right_and_shift_other_if_necessary(v, target_x - x);
            return true;
        }
        false
    }

    /// Move \p block, a contiguous run of one rank in left-to-right order, by
    /// \p amount. Leftward moves are clamped by the slack of the block,
    /// rightward moves push the right neighbours.
    /// \returns the signed distance moved.
    pub fn shift_block(&mut self, block: &[VertexId], amount: i64) -> i64 {
        if amount <= 0 {
            return self.shift_vertex_set(block, amount);
        }
        let (last, rest) = match block.split_last() {
            Some(split) => split,
            None => return 0,
        };
        self.shift_right_and_shift_other_if_necessary(*last, amount);
        for v in rest {
            self.xcoord[v.get_index()] += amount;
        }
        amount
    }

    /// \returns the slack on both sides of \p set, assuming all of its
    /// vertices move at once. Only the vertices whose neighbour on that side
    /// is outside of the set limit the move.
    pub fn find_vertex_set_slacks(&self, set: &HashSet<VertexId>) -> Slacks {
        let ordering = self.frame.ordering;
        let mut left = None;
        let mut right = None;
        for v in set {
            let outside_left = match ordering.left_neighbour(*v) {
                Some(n) => !set.contains(&n),
                None => false,
            };
            if outside_left {
                left = min_slack(left, self.slack_on_the_left(*v));
            }
            let outside_right = match ordering.right_neighbour(*v) {
                Some(n) => !set.contains(&n),
                None => false,
            };
            if outside_right {
                right = min_slack(right, self.slack_on_the_right(*v));
            }
        }
        Slacks { left, right }
    }

    /// Move all of \p set rigidly by \p amount (negative is to the left),
    /// clamped by the slack of the set. \returns the signed distance moved.
    pub fn shift_vertex_set(&mut self, set: &[VertexId], amount: i64) -> i64 {
        let members: HashSet<VertexId> = set.iter().copied().collect();
        let slacks = self.find_vertex_set_slacks(&members);
        let actual = if amount >= 0 {
            match slacks.right {
                Some(s) => amount.min(s.max(0)),
                None => amount,
            }
        } else {
            match slacks.left {
                Some(s) => amount.max(-s.max(0)),
                None => amount,
            }
        };
        for v in members {
            self.xcoord[v.get_index()] += actual;
        }
        actual
    }

    /// Translate everything so that the leftmost left edge is at zero.
    pub fn normalize(&mut self) {
        let graph = self.frame.graph;
        let min_left = graph.iter().map(|v| self.left_edge(v)).min();
        if let Some(shift) = min_left {
            for v in graph.iter() {
                self.xcoord[v.get_index()] -= shift;
            }
        }
    }

    /// Check that every pair of neighbours keeps its minimum separation.
    pub fn validate(&self) -> Result<()> {
        for (rank, row) in self.frame.ordering.rows().iter().enumerate() {
            for pair in row.windows(2) {
                let (left, right) = (pair[0], pair[1]);
                let required = self.min_separation(left, right);
                if self.x(right) < self.x(left) + required {
                    return Err(PedigreeError::LayoutConstraintViolation {
                        rank,
                        left,
                        right,
                        left_x: self.x(left),
                        right_x: self.x(right),
                        required,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
fn trio_frame_parts() -> (BaseGraph, Vec<usize>, Ordering, [VertexId; 5]) {
    use crate::adt::base_graph::make_trio;
    let (g, ids) = make_trio();
    let [father, mother, rel, hub, child] = ids;
    let ranks = vec![0, 0, 0, 1, 2];
    let ord = Ordering::new(vec![vec![father, rel, mother], vec![hub], vec![child]]);
    (g, ranks, ord, ids)
}

#[test]
fn test_init_packing() {
    let (g, ranks, ord, [father, mother, rel, hub, child]) = trio_frame_parts();
    let opt = LayoutOptions::default();
    let frame = LayoutFrame::new(&g, &ranks, &ord, &opt);
    let xc = XCoord::new(&frame);
    assert_eq!(xc.x(father), 5);
    // 5 + 5 + 6 + 1
    assert_eq!(xc.x(rel), 17);
    assert_eq!(xc.x(mother), 29);
    assert_eq!(xc.x(hub), 1);
    assert_eq!(xc.x(child), 5);
    xc.validate().unwrap();
}

#[test]
fn test_separation_table() {
    use crate::core::base::VertexType;
    use crate::core::properties::Properties;
    let (mut g, _, _, [_, _, rel, hub, child]) = trio_frame_parts();
    let twin = g
        .add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    let other = g
        .add_vertex(None, VertexType::Person, Properties::default(), None)
        .unwrap();
    g.add_edge(hub, twin, 1).unwrap();
    g.add_edge(hub, other, 1).unwrap();
    g.properties_mut(child).twin_group = Some(0);
    g.properties_mut(twin).twin_group = Some(0);

    let ranks = vec![0, 0, 0, 1, 2, 2, 2];
    let ord = Ordering::new(vec![vec![rel], vec![hub], vec![child, twin, other]]);
    let opt = LayoutOptions::default();
    let frame = LayoutFrame::new(&g, &ranks, &ord, &opt);
    let xc = XCoord::new(&frame);
    assert_eq!(xc.separation_by_type(rel, hub), 8);
    assert_eq!(xc.separation_by_type(child, hub), 6);
    assert_eq!(xc.separation_by_type(child, twin), 8);
    assert_eq!(xc.separation_by_type(twin, other), 10);
    assert_eq!(xc.min_separation(child, twin), 18);
    assert_eq!(xc.x(twin), 23);
    assert_eq!(xc.x(other), 43);
}

#[test]
fn test_shift_right_is_clipped_by_slack() {
    let (g, ranks, ord, [father, mother, rel, _, _]) = trio_frame_parts();
    let opt = LayoutOptions::default();
    let frame = LayoutFrame::new(&g, &ranks, &ord, &opt);
    let mut xc = XCoord::new(&frame);
    xc.shift_right_one_vertex(mother, 10);
    assert_eq!(xc.x(mother), 39);

    // The relationship has 10 units of slack to the right.
    assert_eq!(xc.slack_on_the_right(rel), Some(10));
    assert_eq!(xc.shift_right_one_vertex(rel, 100), 10);
    assert_eq!(xc.x(rel), 27);
    xc.validate().unwrap();

    // The rightmost vertex of the rank is unbounded.
    assert_eq!(xc.slack_on_the_right(mother), None);
    assert_eq!(xc.shift_right_one_vertex(mother, 100), 100);

    // The leftmost vertex is unbounded to the left, others are clipped.
    assert_eq!(xc.shift_left_one_vertex(rel, 1000), 10);
    assert_eq!(xc.shift_left_one_vertex(father, 3), 3);
    xc.validate().unwrap();
}

#[test]
fn test_shift_and_push() {
    let (g, ranks, ord, [father, mother, rel, _, _]) = trio_frame_parts();
    let opt = LayoutOptions::default();
    let frame = LayoutFrame::new(&g, &ranks, &ord, &opt);
    let mut xc = XCoord::new(&frame);
    assert_eq!(xc.shift_right_and_shift_other_if_necessary(father, 4), 4);
    assert_eq!(xc.x(father), 9);
    assert_eq!(xc.x(rel), 21);
    assert_eq!(xc.x(mother), 33);
    xc.validate().unwrap();

    // Open a gap, then push into it: the cascade stops at the gap.
    xc.shift_right_one_vertex(mother, 20);
    xc.shift_right_and_shift_other_if_necessary(father, 2);
    assert_eq!(xc.x(rel), 23);
    assert_eq!(xc.x(mother), 53);
}

#[test]
fn test_move_close_and_set_slacks() {
    let (g, ranks, ord, [father, mother, rel, _, _]) = trio_frame_parts();
    let opt = LayoutOptions::default();
    let frame = LayoutFrame::new(&g, &ranks, &ord, &opt);
    let mut xc = XCoord::new(&frame);
    xc.shift_right_one_vertex(mother, 20);

    assert!(xc.move_node_as_close_to_x_as_possible(rel, 100));
    assert_eq!(xc.x(rel), 37);
    assert!(!xc.move_node_as_close_to_x_as_possible(rel, 100));
    assert!(xc.move_node_as_close_to_x_as_possible(rel, 20));
    assert_eq!(xc.x(rel), 20);

    let set: HashSet<VertexId> = [father, rel].into_iter().collect();
    let slacks = xc.find_vertex_set_slacks(&set);
    assert_eq!(slacks.left, None);
    assert_eq!(slacks.right, Some(17));

    let trial = xc.copy();
    assert_eq!(xc.shift_vertex_set(&[father, rel], 50), 17);
    assert_eq!(xc.x(father), 22);
    assert_eq!(trial.x(father), 5);
    xc.validate().unwrap();
}

#[test]
fn test_normalize_is_idempotent() {
    let (g, ranks, ord, [father, ..]) = trio_frame_parts();
    let opt = LayoutOptions::default();
    let frame = LayoutFrame::new(&g, &ranks, &ord, &opt);
    let mut xc = XCoord::new(&frame);
    xc.shift_left_one_vertex(father, 30);
    xc.normalize();
    let once = xc.coords().to_vec();
    assert_eq!(g.iter().map(|v| xc.left_edge(v)).min(), Some(0));
    xc.normalize();
    assert_eq!(xc.coords(), &once[..]);
}

#[test]
fn test_from_coords_validates() {
    let (g, ranks, ord, _) = trio_frame_parts();
    let opt = LayoutOptions::default();
    let frame = LayoutFrame::new(&g, &ranks, &ord, &opt);
    let good = XCoord::new(&frame).into_coords();
    assert!(XCoord::from_coords(&frame, good).is_ok());
    let bad = vec![5, 6, 7, 1, 5];
    assert!(matches!(
        XCoord::from_coords(&frame, bad),
        Err(PedigreeError::LayoutConstraintViolation { .. })
    ));
}
