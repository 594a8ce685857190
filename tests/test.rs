#[cfg(test)]
mod tests {

    use pedigree::adt::base_graph::BaseGraph;
    use pedigree::core::base::{VertexId, VertexType};
    use pedigree::core::error::PedigreeError;
    use pedigree::core::options::LayoutOptions;
    use pedigree::core::properties::{Gender, Properties};
    use pedigree::edit::undo::UndoRedoManager;
    use pedigree::formats::builder::{add_relationship, DEFAULT_EDGE_WEIGHT};
    use pedigree::formats::json::{export_simple_json, import_simple_json, JsonPrivacy};
    use pedigree::formats::ped::{import_ped, PedImportOptions};
    use pedigree::topo::layout::{Layout, PedigreeLayoutContext};
    use pedigree::topo::placer::{LayoutFrame, XCoord};
    use pedigree::topo::rank::compute_ranks;

    fn person(g: &mut BaseGraph, gender: Gender) -> VertexId {
        g.add_vertex(None, VertexType::Person, Properties::with_gender(gender), None)
            .unwrap()
    }

    /// Three generations: grandparents, the proband with a twin and a
    /// sibling, a married-in partner and two grandchildren.
    fn get_sample_family() -> PedigreeLayoutContext {
        let mut ctx = PedigreeLayoutContext::with_single_person(LayoutOptions::default()).unwrap();
        let me = ctx.proband().unwrap();
        let parents = ctx.add_parents(me).unwrap();
        ctx.add_child(parents).unwrap();
        ctx.add_twin(me).unwrap();
        ctx.add_child(parents).unwrap();
        let (_, rel) = ctx.add_partner(me).unwrap();
        ctx.add_child(rel).unwrap();
        ctx.add_child(rel).unwrap();
        ctx
    }

    /// Check the structural guarantees of a finished layout.
    fn check_layout(layout: &Layout) {
        let g = layout.graph();
        let ranks = layout.ranks();

        // Every vertex sits in exactly one place of the ordering.
        layout.ordering().verify(g, ranks).unwrap();
        assert_eq!(layout.ordering().len(), g.num_vertices());

        // Edges go down by at most one rank.
        for v in g.iter() {
            for s in g.successors(v) {
                let (from, to) = (ranks[v.get_index()], ranks[s.get_index()]);
                assert!(from == to || from + 1 == to, "{} -> {} spans ranks", v, s);
            }
        }

        // Neighbours don't overlap.
        let options = LayoutOptions::default();
        let frame = LayoutFrame::new(g, ranks, layout.ordering(), &options);
        XCoord::from_coords(&frame, layout.xcoords().to_vec()).unwrap();
    }

    #[test]
    fn partnership_with_one_child() {
        let mut g = BaseGraph::new();
        let father = person(&mut g, Gender::Male);
        let mother = person(&mut g, Gender::Female);
        let (rel, hub) = add_relationship(&mut g, father, mother).unwrap();
        let child = person(&mut g, Gender::Unknown);
        g.add_edge(hub, child, DEFAULT_EDGE_WEIGHT).unwrap();

        let ctx = PedigreeLayoutContext::new(g, Some(child), LayoutOptions::default()).unwrap();
        let rank = |v| ctx.rank_of(v).unwrap();
        assert_eq!(rank(rel), rank(father));
        assert_eq!(rank(rel), rank(mother));
        assert_eq!(rank(hub), rank(rel) + 1);
        assert_eq!(rank(child), rank(hub) + 1);

        let x = |v| ctx.position(v).unwrap().x;
        let (lo, hi) = (x(father).min(x(mother)), x(father).max(x(mother)));
        assert!(lo < x(child) && x(child) < hi);
        assert!(lo < x(rel) && x(rel) < hi);
        check_layout(ctx.layout());
    }

    #[test]
    fn import_ped_trio() {
        let text = "\
            # family of three\n\
            fam1 father 0 0 1 1\n\
            fam1 mother 0 0 2 1\n\
            fam1 child father mother 2 2\n";
        let imported = import_ped(text, &PedImportOptions::default()).unwrap();
        let g = &imported.graph;
        assert_eq!(g.vertices_of_type(VertexType::Relationship).len(), 1);
        assert_eq!(g.vertices_of_type(VertexType::Childhub).len(), 1);
        assert_eq!(g.num_vertices(), 5);
        g.validate().unwrap();
        assert_eq!(g.weakly_connected_components().len(), 1);

        let ctx =
            PedigreeLayoutContext::new(imported.graph, imported.proband, LayoutOptions::default())
                .unwrap();
        check_layout(ctx.layout());
    }

    #[test]
    fn shift_is_clipped_by_the_slack() {
        let ctx = get_sample_family();
        let layout = ctx.layout();
        let options = LayoutOptions::default();
        let frame = LayoutFrame::new(layout.graph(), layout.ranks(), layout.ordering(), &options);
        let mut xc = XCoord::from_coords(&frame, layout.xcoords().to_vec()).unwrap();

        let row = layout.ordering().row(layout.ranks()[ctx.proband().unwrap().get_index()]);
        assert!(row.len() > 1);
        let v = row[row.len() - 2];
        let slack = xc.slack_on_the_right(v).unwrap();
        let before = xc.x(v);
        assert_eq!(xc.shift_right_one_vertex(v, slack + 100), slack);
        assert_eq!(xc.x(v), before + slack);
        xc.validate().unwrap();
    }

    #[test]
    fn cycles_are_rejected() {
        let mut g = BaseGraph::new();
        let a = person(&mut g, Gender::Male);
        let b = person(&mut g, Gender::Female);
        let (_, hub) = add_relationship(&mut g, a, b).unwrap();
        let c = person(&mut g, Gender::Male);
        g.add_edge(hub, c, DEFAULT_EDGE_WEIGHT).unwrap();
        // c becomes the father of its own mother.
        let d = person(&mut g, Gender::Female);
        let (_, hub2) = add_relationship(&mut g, c, d).unwrap();
        g.add_edge(hub2, b, DEFAULT_EDGE_WEIGHT).unwrap();

        let res = compute_ranks(&g, &LayoutOptions::default());
        assert!(matches!(res, Err(PedigreeError::CyclicPedigree { .. })));
        let res = PedigreeLayoutContext::new(g, Some(a), LayoutOptions::default());
        assert!(matches!(res, Err(PedigreeError::CyclicPedigree { .. })));
    }

    #[test]
    fn sample_family_layout() {
        let ctx = get_sample_family();
        check_layout(ctx.layout());

        // Persons and relationships sit on even ranks, childhubs on odd ones.
        let g = ctx.graph();
        for v in g.iter() {
            let rank = ctx.rank_of(v).unwrap();
            match g.kind(v) {
                VertexType::Childhub => assert_eq!(rank % 2, 1),
                VertexType::Person | VertexType::Relationship => assert_eq!(rank % 2, 0),
                VertexType::VirtualEdge => {}
            }
        }

        // Children sit below the childhub, which sits below the relationship.
        for rel in g.vertices_of_type(VertexType::Relationship) {
            let hub = ctx.relationship_childhub_position(rel).unwrap();
            let rel_pos = ctx.position(rel).unwrap();
            assert!(hub.y > rel_pos.y);
            for child in ctx.relationship_children(rel).unwrap() {
                assert!(ctx.position(child).unwrap().y > hub.y);
            }
        }
    }

    #[test]
    fn twins_are_contiguous() {
        let ctx = get_sample_family();
        let g = ctx.graph();
        let layout = ctx.layout();
        let me = ctx.proband().unwrap();
        let twins = g.twins(me);
        assert_eq!(twins.len(), 2);

        let pos: Vec<usize> = twins
            .iter()
            .map(|t| layout.ordering().position_of(*t).unwrap())
            .collect();
        assert_eq!(pos[0].abs_diff(pos[1]), 1);
    }

    #[test]
    fn normalized_coordinates() {
        let ctx = get_sample_family();
        let layout = ctx.layout();
        let min = layout
            .graph()
            .iter()
            .map(|v| layout.x(v).unwrap() - layout.graph().half_width(v))
            .min()
            .unwrap();
        assert_eq!(min, 0);

        // Without a hint the layout only depends on the pedigree.
        let g = ctx.serialize().to_graph(&LayoutOptions::default()).unwrap();
        let opt = LayoutOptions::default();
        let first = Layout::compute(&g, ctx.proband(), &opt, None).unwrap();
        let second = Layout::compute(&g, ctx.proband(), &opt, None).unwrap();
        assert_eq!(first.xcoords(), second.xcoords());
        check_layout(&first);
    }

    #[test]
    fn serialize_and_reload() {
        let ctx = get_sample_family();
        let text = ctx.to_json().unwrap();
        let back = PedigreeLayoutContext::from_json(&text, LayoutOptions::default()).unwrap();
        assert_eq!(back.positions(), ctx.positions());
        assert_eq!(back.graph(), ctx.graph());
        assert_eq!(back.proband(), ctx.proband());
    }

    #[test]
    fn rejected_edits_are_atomic() {
        let mut ctx = get_sample_family();
        let before = ctx.serialize();
        let me = ctx.proband().unwrap();

        // A person is not a relationship, and already has parents.
        assert!(ctx.add_child(me).is_err());
        assert!(ctx.add_parents(me).is_err());
        assert!(ctx.remove_vertex(VertexId::from(999)).is_err());
        assert_eq!(ctx.serialize(), before);
    }

    #[test]
    fn remove_and_undo() {
        let mut ctx = get_sample_family();
        let mut history = UndoRedoManager::default();
        let before = ctx.serialize();
        let me = ctx.proband().unwrap();
        let (_, rel) = ctx.add_partner(me).unwrap();
        let partner = ctx
            .graph()
            .relationship_partners(rel)
            .into_iter()
            .find(|p| *p != me)
            .unwrap();
        history
            .snapshot_edit(&mut ctx, "remove partner", |ctx| ctx.remove_vertex(partner))
            .unwrap();
        assert!(ctx.position(partner).is_none());
        assert!(ctx.position(rel).is_none());

        history.undo(&mut ctx).unwrap();
        assert!(ctx.position(partner).is_some());
        let removed = ctx.remove_vertex(partner).unwrap();
        assert!(removed.contains(&rel));
        assert_eq!(ctx.graph().num_vertices(), before.vertices.len());
    }

    #[test]
    fn import_simple_json_family() {
        let text = r#"[
            { "name": "grandma", "sex": "F" },
            { "name": "grandpa", "sex": "M" },
            { "name": "mum", "sex": "F", "mother": "grandma", "father": "grandpa" },
            { "name": "aunt", "sex": "F", "mother": "grandma", "father": "grandpa" },
            { "name": "dad", "sex": "M" },
            { "name": "kid", "sex": "M", "mother": "mum", "father": "dad", "proband": true }
        ]"#;
        let imported = import_simple_json(text).unwrap();
        assert_eq!(imported.proband, Some(VertexId::from(5)));
        let ctx =
            PedigreeLayoutContext::new(imported.graph, imported.proband, LayoutOptions::default())
                .unwrap();
        check_layout(ctx.layout());

        let kid = VertexId::from(5);
        let mum = VertexId::from(2);
        assert_eq!(ctx.rank_of(kid), Some(4));
        assert_eq!(ctx.rank_of(mum), Some(2));
        assert_eq!(ctx.graph().properties(kid).first_name.as_deref(), Some("kid"));
    }

    #[test]
    fn export_simple_json_and_lay_out_again() {
        let ctx = get_sample_family();
        let text = export_simple_json(ctx.graph(), ctx.proband(), JsonPrivacy::All).unwrap();
        let imported = import_simple_json(&text).unwrap();
        let g = &imported.graph;
        let persons = |g: &BaseGraph| g.vertices_of_type(VertexType::Person).len();
        assert_eq!(persons(g), persons(ctx.graph()));
        assert_eq!(
            g.vertices_of_type(VertexType::Relationship).len(),
            ctx.graph().vertices_of_type(VertexType::Relationship).len()
        );

        let again =
            PedigreeLayoutContext::new(imported.graph, imported.proband, LayoutOptions::default())
                .unwrap();
        check_layout(again.layout());
        let proband = again.proband().unwrap();
        assert_eq!(again.graph().twins(proband).len(), 2);
    }
}
