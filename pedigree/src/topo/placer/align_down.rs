//! The top-down placement pass. Walks the ranks from the oldest generation
//! down and pulls every vertex under the vertices that it hangs from:
//!
//! ```text
//!     father -- rel -- mother
//!                |
//!               hub
//!             /  |  \
//!          [ kid kid kid ]   <- centred under the hub as one block
//! ```

use crate::core::base::VertexId;
use crate::topo::placer::is_married_in;
use crate::topo::placer::xcoord::XCoord;

pub fn do_it(xc: &mut XCoord) {
    let ordering = xc.frame().ordering;
    for rank in 0..ordering.num_ranks() {
        if rank > 0 {
            center_sibling_blocks(xc, rank);
            align_single_successors(xc, rank);
        }
        pull_married_in_partners(xc, rank);
        center_relationships(xc, rank);
    }
}

/// Center the run of vertices from the first to the last child of each
/// childhub of the previous rank under that childhub.
fn center_sibling_blocks(xc: &mut XCoord, rank: usize) {
    let frame = xc.frame();
    let ordering = frame.ordering;
    for hub in ordering.row(rank - 1).iter().copied() {
        if !frame.graph.is_childhub(hub) {
            continue;
        }
        let positions: Vec<usize> = frame
            .graph
            .successors(hub)
            .filter(|c| ordering.rank_of(*c) == Some(rank))
            .filter_map(|c| ordering.position_of(c))
            .collect();
        let (first, last) = match (positions.iter().min(), positions.iter().max()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => continue,
        };

        let row = ordering.row(rank);
        let center = (xc.x(row[first]) + xc.x(row[last])).div_euclid(2);
        let block: Vec<VertexId> = row[first..=last].to_vec();
        xc.shift_block(&block, xc.x(hub) - center);
    }
}

/// Put virtual nodes and childhubs right under their only predecessor.
fn align_single_successors(xc: &mut XCoord, rank: usize) {
    let frame = xc.frame();
    for v in frame.ordering.row(rank).iter().copied() {
        if !frame.graph.is_virtual(v) && !frame.graph.is_childhub(v) {
            continue;
        }
        if let Some(pred) = frame.graph.single_pred(v) {
            xc.move_towards(v, xc.x(pred));
        }
    }
}

/// Move a partner that married into the family next to its relationship,
/// which in turn is packed against the other partner.
fn pull_married_in_partners(xc: &mut XCoord, rank: usize) {
    let frame = xc.frame();
    let graph = frame.graph;
    let ordering = frame.ordering;
    for rel in ordering.row(rank).iter().copied() {
        if !graph.is_relationship(rel) {
            continue;
        }
        let partners = graph.predecessors(rel);
        if partners.len() != 2 {
            continue;
        }
        let (p0, p1) = (partners[0], partners[1]);
        let (free, anchor) = match (is_married_in(graph, p0), is_married_in(graph, p1)) {
            (true, false) => (p0, p1),
            (false, true) => (p1, p0),
            _ => continue,
        };

        let (pos_free, pos_rel) = match (ordering.position_of(free), ordering.position_of(rel)) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        let free_on_left = pos_free < pos_rel;
        let anchor_adjacent = ordering.rank_of(anchor) == Some(rank)
            && match ordering.position_of(anchor) {
                Some(pos_anchor) if free_on_left => pos_free + 1 == pos_rel && pos_rel + 1 == pos_anchor,
                Some(pos_anchor) => pos_anchor + 1 == pos_rel && pos_rel + 1 == pos_free,
                None => false,
            };

        if !anchor_adjacent {
            let target = if free_on_left {
                xc.x(rel) - xc.min_separation(free, rel)
            } else {
                xc.x(rel) + xc.min_separation(rel, free)
            };
            xc.move_node_as_close_to_x_as_possible(free, target);
            continue;
        }

        // Pack the relationship against the anchored partner, then the free
        // partner against the relationship.
        if free_on_left {
            xc.move_towards(rel, xc.x(anchor) - xc.min_separation(rel, anchor));
            xc.move_towards(free, xc.x(rel) - xc.min_separation(free, rel));
        } else {
            xc.move_towards(rel, xc.x(anchor) + xc.min_separation(anchor, rel));
            xc.move_towards(free, xc.x(rel) + xc.min_separation(rel, free));
        }
    }
}

/// Move each relationship to the middle of its two partners, without
/// disturbing anyone.
fn center_relationships(xc: &mut XCoord, rank: usize) {
    let frame = xc.frame();
    for rel in frame.ordering.row(rank).iter().copied() {
        if !frame.graph.is_relationship(rel) {
            continue;
        }
        let preds = frame.graph.predecessors(rel);
        if preds.is_empty() {
            continue;
        }
        let sum: i64 = preds.iter().map(|p| xc.x(*p)).sum();
        let target = sum.div_euclid(preds.len() as i64);
        xc.move_node_as_close_to_x_as_possible(rel, target);
    }
}
