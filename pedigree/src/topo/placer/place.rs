//! This module contains the implementation of the placer, which assigns the
//! final x coordinates to all of the vertices in the layered graph.

use crate::core::error::Result;
use crate::topo::placer::align_down;
use crate::topo::placer::center_up;
use crate::topo::placer::verifier;
use crate::topo::placer::xcoord::{LayoutFrame, XCoord};

pub struct Placer<'a> {
    frame: &'a LayoutFrame<'a>,
}

impl<'a> Placer<'a> {
    pub fn new(frame: &'a LayoutFrame<'a>) -> Self {
        Self { frame }
    }

    pub fn place(&self) -> Result<XCoord<'a>> {
        #[cfg(feature = "log")]
        log::info!(
            "Placing {} vertices in {} ranks.",
            self.frame.ordering.len(),
            self.frame.ordering.num_ranks()
        );

        // Pack every rank to the left.
        let mut xc = XCoord::new(self.frame);
        verifier::do_it(&xc)?;

        for _ in 0..self.frame.options.max_xcoord_iterations {
            let before = xc.coords().to_vec();
            align_down::do_it(&mut xc);
            center_up::do_it(&mut xc);
            if xc.coords() == &before[..] {
                break;
            }
        }

        // Children hang under their parents in the final drawing, so the last
        // word belongs to the top-down pass.
        align_down::do_it(&mut xc);
        xc.normalize();

        verifier::do_it(&xc)?;
        Ok(xc)
    }
}

/// Place the layered graph described by \p frame. See Placer.
pub fn place(frame: &LayoutFrame) -> Result<Vec<i64>> {
    Ok(Placer::new(frame).place()?.into_coords())
}

#[cfg(test)]
use crate::{adt::base_graph::BaseGraph, adt::ordering::Ordering, core::base::VertexId};

#[cfg(test)]
fn add(g: &mut BaseGraph, kind: crate::core::base::VertexType) -> VertexId {
    g.add_vertex(None, kind, crate::core::properties::Properties::default(), None)
        .unwrap()
}

#[test]
fn test_child_between_parents() {
    use crate::adt::base_graph::make_trio;
    use crate::core::options::LayoutOptions;
    let (g, [father, mother, rel, hub, child]) = make_trio();
    let ranks = vec![0, 0, 0, 1, 2];
    let ord = Ordering::new(vec![vec![father, rel, mother], vec![hub], vec![child]]);
    let opt = LayoutOptions::default();
    let frame = LayoutFrame::new(&g, &ranks, &ord, &opt);
    let xc = Placer::new(&frame).place().unwrap();

    assert_eq!(xc.x(father), 5);
    assert_eq!(xc.x(rel), 17);
    assert_eq!(xc.x(mother), 29);
    assert_eq!(xc.x(hub), 17);
    assert_eq!(xc.x(child), 17);
}

#[test]
fn test_married_in_partner_stays_close() {
    use crate::adt::base_graph::make_trio;
    use crate::core::base::VertexType;
    use crate::core::options::LayoutOptions;
    let (mut g, [father, mother, rel, hub, child]) = make_trio();
    let sibling = add(&mut g, VertexType::Person);
    g.add_edge(hub, sibling, 1).unwrap();
    let spouse = add(&mut g, VertexType::Person);
    let rel2 = add(&mut g, VertexType::Relationship);
    let hub2 = add(&mut g, VertexType::Childhub);
    g.add_edge(child, rel2, 1).unwrap();
    g.add_edge(spouse, rel2, 1).unwrap();
    g.add_edge(rel2, hub2, 1).unwrap();
    let grandchild = add(&mut g, VertexType::Person);
    g.add_edge(hub2, grandchild, 1).unwrap();
    g.validate().unwrap();

    let ranks = vec![0, 0, 0, 1, 2, 2, 2, 2, 3, 4];
    let ord = Ordering::new(vec![
        vec![father, rel, mother],
        vec![hub],
        vec![sibling, child, rel2, spouse],
        vec![hub2],
        vec![grandchild],
    ]);
    let opt = LayoutOptions::default();
    let frame = LayoutFrame::new(&g, &ranks, &ord, &opt);
    let xc = Placer::new(&frame).place().unwrap();
    xc.validate().unwrap();

    // The spouse is packed against the relationship, which is packed
    // against the child.
    assert_eq!(xc.x(rel2) - xc.x(child), xc.min_separation(child, rel2));
    assert_eq!(xc.x(spouse) - xc.x(rel2), xc.min_separation(rel2, spouse));
    // Grandchild hangs under its parents' relationship.
    assert_eq!(xc.x(hub2), xc.x(rel2));
    assert_eq!(xc.x(grandchild), xc.x(hub2));
    // Both siblings are centred under their parents.
    assert_eq!(xc.x(hub), xc.x(rel));
    assert_eq!(
        (xc.x(sibling) + xc.x(child)).div_euclid(2),
        xc.x(hub)
    );
    assert!(xc.x(father) < xc.x(rel) && xc.x(rel) < xc.x(mother));
    assert_eq!(g.iter().map(|v| xc.left_edge(v)).min(), Some(0));
}
