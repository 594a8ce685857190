//! The bottom-up placement pass. Walks the ranks from the youngest generation
//! up and centers every parent structure over what hangs below it: childhubs
//! over their children, relationships over their childhub. Partners that
//! married into the family travel with their relationship.

use crate::core::base::VertexId;
use crate::topo::placer::is_married_in;
use crate::topo::placer::xcoord::XCoord;

pub fn do_it(xc: &mut XCoord) {
    let ordering = xc.frame().ordering;
    for rank in (0..ordering.num_ranks().saturating_sub(1)).rev() {
        center_over_successors(xc, rank);
        center_relationships(xc, rank);
    }
}

fn center_over_successors(xc: &mut XCoord, rank: usize) {
    let frame = xc.frame();
    let graph = frame.graph;
    let ordering = frame.ordering;
    for v in ordering.row(rank).iter().copied() {
        if graph.is_childhub(v) {
            let below: Vec<i64> = graph
                .successors(v)
                .filter(|c| ordering.rank_of(*c) == Some(rank + 1))
                .map(|c| xc.x(c))
                .collect();
            if let (Some(lo), Some(hi)) = (below.iter().min(), below.iter().max()) {
                xc.move_towards(v, (lo + hi).div_euclid(2));
            }
        } else if graph.is_virtual(v) {
            if let Some(succ) = graph.single_succ(v) {
                xc.move_towards(v, xc.x(succ));
            }
        }
    }
}

/// Move each relationship over its childhub, together with the partners that
/// married in.
fn center_relationships(xc: &mut XCoord, rank: usize) {
    let frame = xc.frame();
    let graph = frame.graph;
    for rel in frame.ordering.row(rank).iter().copied() {
        if !graph.is_relationship(rel) {
            continue;
        }
        let hub = match graph.single_succ(rel) {
            Some(hub) => hub,
            None => continue,
        };
        let delta = xc.x(hub) - xc.x(rel);
        if delta == 0 {
            continue;
        }

        let mut set: Vec<VertexId> = vec![rel];
        for p in graph.predecessors(rel) {
            if frame.ordering.rank_of(*p) == Some(rank) && is_married_in(graph, *p) {
                set.push(*p);
            }
        }
        if set.len() == 1 {
            xc.move_node_as_close_to_x_as_possible(rel, xc.x(hub));
        } else {
            xc.shift_vertex_set(&set, delta);
        }
    }
}
