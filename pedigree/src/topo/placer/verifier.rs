use crate::core::error::{PedigreeError, Result};
use crate::topo::placer::xcoord::XCoord;

pub fn do_it(xc: &XCoord) -> Result<()> {
    let frame = xc.frame();
    frame.ordering.verify(frame.graph, frame.ranks)?;
    verify_order_in_rank(xc)
}

/// Check that the spatial order of the vertices matches the order in the rank
/// and that no two neighbours overlap.
fn verify_order_in_rank(xc: &XCoord) -> Result<()> {
    xc.validate()?;
    for (rank, row) in xc.frame().ordering.rows().iter().enumerate() {
        for pair in row.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if xc.right_edge(left) >= xc.left_edge(right) {
                return Err(PedigreeError::LayoutConstraintViolation {
                    rank,
                    left,
                    right,
                    left_x: xc.x(left),
                    right_x: xc.x(right),
                    required: xc.min_separation(left, right),
                });
            }
        }
    }
    Ok(())
}

#[test]
fn test_touching_neighbours_are_reported() {
    use crate::adt::base_graph::make_trio;
    use crate::adt::ordering::Ordering;
    use crate::core::options::LayoutOptions;
    use crate::topo::placer::xcoord::LayoutFrame;

    let (g, [father, mother, rel, hub, child]) = make_trio();
    let ranks = vec![0, 0, 0, 1, 2];
    let ord = Ordering::new(vec![vec![father, rel, mother], vec![hub], vec![child]]);
    // Options built in code skip validation. Touching borders are an error.
    let opt = LayoutOptions {
        horizontal_person_separation: 0,
        horizontal_rel_separation: 0,
        ..LayoutOptions::default()
    };
    let frame = LayoutFrame::new(&g, &ranks, &ord, &opt);
    let xc = XCoord::new(&frame);
    let res = do_it(&xc);
    assert!(matches!(
        res,
        Err(PedigreeError::LayoutConstraintViolation { rank: 0, .. })
    ));
}
