/*!
This crate implements automatic layout of pedigree (family tree) graphs. A
pedigree is modelled as a directed graph of persons, relationships (one per
couple), childhubs (one per relationship, fanning out to the children) and
layout-only virtual nodes. The layout assigns every vertex a generation rank,
an order within the rank and a horizontal coordinate, following the usual
genealogical drawing conventions: parents above children, partners next to
each other with the relationship node between them, twins grouped, and a
minimum spacing that depends on the kind of the neighbouring nodes.

The crate also ships translators from PED/LINKAGE text and from a simple JSON
person list, a serialized form that can be stored and reloaded, and an
undo/redo command stack.

# Example: lay out a PED file

```rust
    use pedigree::formats::ped::{import_ped, PedImportOptions};
    use pedigree::topo::layout::PedigreeLayoutContext;
    use pedigree::core::options::LayoutOptions;

    let text = "fam dad 0 0 1 1\nfam mom 0 0 2 1\nfam kid dad mom 2 2\n";
    let imported = import_ped(text, &PedImportOptions::default()).unwrap();
    let ctx = PedigreeLayoutContext::new(
        imported.graph,
        imported.proband,
        LayoutOptions::default(),
    )
    .unwrap();

    for (id, pos) in ctx.positions() {
        println!("{} -> ({}, {})", id, pos.x, pos.y);
    }
```

# Example: edit a pedigree

Every edit re-runs the layout and is applied atomically: when an edit is
rejected the previous graph and coordinates stay in place.

```rust
    use pedigree::topo::layout::PedigreeLayoutContext;
    use pedigree::core::options::LayoutOptions;

    let mut ctx = PedigreeLayoutContext::with_single_person(LayoutOptions::default()).unwrap();
    let me = ctx.proband().unwrap();
    let (_partner, rel) = ctx.add_partner(me).unwrap();
    let child = ctx.add_child(rel).unwrap();
    assert!(ctx.position(child).is_some());
```
*/

pub mod adt;
pub mod core;
pub mod edit;
pub mod formats;
pub mod topo;
