//! PED/LINKAGE pedigree files.
//!
//! Pre-makeped files have at least six whitespace separated columns:
//!
//! ```text
//!   family  individual  father  mother  sex  phenotype
//! ```
//!
//! Post-makeped (LINKAGE) files have at least ten:
//!
//! ```text
//!   family individual father mother first-offspring next-paternal-sibling
//!   next-maternal-sibling sex proband phenotype ...
//! ```
//!
//! Sex is 1 (male), 2 (female) or anything else (unknown). A parent id of 0
//! means that the parent is not given.

use crate::adt::base_graph::BaseGraph;
use crate::adt::person::PersonNode;
use crate::core::base::{VertexId, VertexType};
use crate::core::error::{PedigreeError, Result};
use crate::core::properties::{Gender, Properties};
use crate::formats::builder::{
    add_unknown_parent, validate_import, RelationshipTracker, DEFAULT_EDGE_WEIGHT,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write;

#[derive(Debug, Clone, Default)]
pub struct PedImportOptions {
    /// Treat phenotype codes other than -9/0/1/2 as distinct disorders.
    pub accept_other_phenotypes: bool,
    /// Mark every person with a known phenotype as evaluated.
    pub mark_evaluated: bool,
    /// Keep the individual id of the file as the external id of the person.
    pub save_id_as_external_id: bool,
    /// Use the -9/0/1 phenotype scheme, where 1 means affected.
    pub affected_code_one: bool,
    /// Disorder names by phenotype code. Overrides the generated names.
    pub disorder_names: Option<BTreeMap<String, String>>,
}

/// The result of an import: a validated graph and the proband, if known.
#[derive(Debug, Clone)]
pub struct ImportedPedigree {
    pub graph: BaseGraph,
    pub proband: Option<VertexId>,
}

struct PedRow<'a> {
    family: &'a str,
    id: &'a str,
    father: &'a str,
    mother: &'a str,
    sex: &'a str,
    proband: bool,
    phenotype: &'a str,
}

/// Replace everything but letters, digits and `_.-*` by spaces.
fn sanitize(line: &str) -> String {
    line.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() || "_.-*".contains(c) {
                c
            } else {
                ' '
            }
        })
        .collect()
}

fn is_missing_parent(id: &str) -> bool {
    id == "0"
}

fn parse_row(line: &str, post_makeped: bool) -> Result<PedRow<'_>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 6 || (post_makeped && parts.len() < 10) {
        return Err(PedigreeError::import(format!(
            "input line has not enough columns: [{}]",
            line
        )));
    }
    if post_makeped {
        return Ok(PedRow {
            family: parts[0],
            id: parts[1],
            father: parts[2],
            mother: parts[3],
            sex: parts[7],
            proband: parts[8] == "1",
            phenotype: parts[9],
        });
    }
    Ok(PedRow {
        family: parts[0],
        id: parts[1],
        father: parts[2],
        mother: parts[3],
        sex: parts[4],
        proband: false,
        phenotype: parts[5],
    })
}

/// How the phenotype column is read.
struct PhenotypeScheme {
    affected: HashSet<String>,
    unaffected: HashSet<String>,
    disorder_names: BTreeMap<String, String>,
}

impl PhenotypeScheme {
    fn new(rows: &[PedRow<'_>], opts: &PedImportOptions) -> Result<Self> {
        let standard = ["-9", "0", "1", "2"];
        let extended = opts.accept_other_phenotypes
            && rows.iter().any(|r| !standard.contains(&r.phenotype));

        let set = |codes: &[&str]| codes.iter().map(|c| c.to_string()).collect::<HashSet<_>>();
        let (mut affected, unaffected) = if opts.affected_code_one {
            if extended || rows.iter().any(|r| r.phenotype == "2") {
                return Err(PedigreeError::import(
                    "phenotypes with codes other than 0 or 1 were found",
                ));
            }
            (set(&["1"]), set(&["0"]))
        } else {
            (set(&["2"]), set(&["1"]))
        };

        let disorder_names = match &opts.disorder_names {
            Some(names) => names.clone(),
            None => {
                let mut names = BTreeMap::new();
                if extended {
                    for r in rows {
                        if !["-9", "0", "1"].contains(&r.phenotype) {
                            names.insert(
                                r.phenotype.to_string(),
                                format!("affected (phenotype {})", r.phenotype),
                            );
                            affected.insert(r.phenotype.to_string());
                        }
                    }
                }
                names
            }
        };

        Ok(Self {
            affected,
            unaffected,
            disorder_names,
        })
    }

    /// Record the phenotype \p code in \p props. Missing and unsupported
    /// codes leave the person unevaluated.
    fn apply(&self, code: &str, props: &mut Properties, mark_evaluated: bool) {
        if self.affected.contains(code) {
            let disorder = self
                .disorder_names
                .get(code)
                .cloned()
                .unwrap_or_else(|| "affected".to_string());
            props.carrier_status = Some("affected".to_string());
            props.disorders = vec![disorder];
        } else if self.unaffected.contains(code) {
            props.carrier_status = Some(String::new());
        } else {
            return;
        }
        if mark_evaluated {
            props.evaluated = true;
        }
    }
}

/// Build a pedigree from the PED text \p text.
pub fn import_ped(text: &str, opts: &PedImportOptions) -> Result<ImportedPedigree> {
    let raw: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .collect();
    let first = match raw.first() {
        Some(first) => first,
        None => return Err(PedigreeError::import("no data")),
    };
    let post_makeped = first.contains("Ped:") && first.contains("Per:");

    let lines: Vec<String> = raw.iter().map(|l| sanitize(l).trim().to_string()).collect();
    let rows = lines
        .iter()
        .map(|l| parse_row(l, post_makeped))
        .collect::<Result<Vec<_>>>()?;

    let mut graph = BaseGraph::new();
    let mut name_to_id: HashMap<&str, VertexId> = HashMap::new();
    let mut row_ids = Vec::with_capacity(rows.len());

    // First pass: one vertex per row.
    for row in &rows {
        if row.family != rows[0].family {
            return Err(PedigreeError::import(
                "multiple families detected within the same pedigree",
            ));
        }
        if name_to_id.contains_key(row.id) {
            return Err(PedigreeError::import(format!(
                "multiple persons with the same ID [{}]",
                row.id
            )));
        }
        let gender = match row.sex {
            "1" => Gender::Male,
            "2" => Gender::Female,
            _ => Gender::Unknown,
        };
        let mut props = Properties::with_gender(gender);
        if opts.save_id_as_external_id {
            props.external_id = Some(row.id.to_string());
        }
        let v = graph.add_vertex(None, VertexType::Person, props, None)?;
        name_to_id.insert(row.id, v);
        row_ids.push(v);
    }

    let scheme = PhenotypeScheme::new(&rows, opts)?;
    let mut tracker = RelationshipTracker::new();

    // Second pass: phenotypes and parents.
    for (row, v) in rows.iter().zip(row_ids.iter().copied()) {
        scheme.apply(row.phenotype, graph.properties_mut(v), opts.mark_evaluated);

        if is_missing_parent(row.father) && is_missing_parent(row.mother) {
            continue;
        }
        let father = resolve_parent(&mut graph, &name_to_id, row.father, Gender::Male, row.id)?;
        let mother = resolve_parent(&mut graph, &name_to_id, row.mother, Gender::Female, row.id)?;
        if father == v || mother == v {
            return Err(PedigreeError::import(format!(
                "[{}] is declared to be their own parent",
                row.id
            )));
        }
        let hub = tracker.create_or_get_childhub(&mut graph, mother, father)?;
        graph.add_edge(hub, v, DEFAULT_EDGE_WEIGHT)?;
    }

    validate_import(&graph)?;

    let proband = if post_makeped {
        rows.iter()
            .position(|r| r.proband)
            .map(|i| row_ids[i])
            .or_else(|| row_ids.last().copied())
    } else {
        row_ids.first().copied()
    };

    #[cfg(feature = "log")]
    log::info!(
        "Imported {} persons and {} relationships from PED.",
        rows.len(),
        tracker.len()
    );

    Ok(ImportedPedigree { graph, proband })
}

/// \returns the vertex of the parent named \p name, creating an unknown
/// parent of \p gender if the file doesn't name one.
fn resolve_parent(
    graph: &mut BaseGraph,
    name_to_id: &HashMap<&str, VertexId>,
    name: &str,
    gender: Gender,
    child: &str,
) -> Result<VertexId> {
    if is_missing_parent(name) {
        return add_unknown_parent(graph, gender);
    }
    let v = match name_to_id.get(name) {
        Some(v) => *v,
        None => {
            return Err(PedigreeError::import(format!(
                "[{}] is not a valid parent reference for [{}]",
                name, child
            )))
        }
    };
    if graph.properties(v).gender == gender.opposite() {
        return Err(PedigreeError::import(format!(
            "a person declared as {} [{}] is also declared as being a {} for [{}]",
            if gender == Gender::Male { "female" } else { "male" },
            name,
            if gender == Gender::Male { "father" } else { "mother" },
            child
        )));
    }
    Ok(v)
}

/// Where the exported individual ids come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PedIdSource {
    /// 1, 2, 3, ...
    #[default]
    Sequential,
    /// The external id, when the person has one.
    External,
    /// The first name, when the person has one.
    Name,
}

/// Assign a unique PED id to every exported person.
fn create_new_ids(graph: &BaseGraph, source: PedIdSource) -> HashMap<VertexId, String> {
    let mut res = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut next_unused = 1;

    for node in PersonNode::exported(graph) {
        let v = node.id();
        let props = graph.properties(v);
        let preferred = match source {
            PedIdSource::Sequential => None,
            PedIdSource::External => props.external_id.as_ref(),
            PedIdSource::Name => props.first_name.as_ref(),
        };
        let base = match preferred {
            Some(text) => text.split_whitespace().collect::<Vec<_>>().join("_"),
            None => {
                next_unused += 1;
                (next_unused - 1).to_string()
            }
        };

        let mut id = base.clone();
        let mut num_similar = 2;
        while used.contains(&id) {
            id = format!("{}{}", base, num_similar);
            num_similar += 1;
        }
        used.insert(id.clone());
        res.insert(v, id);
    }
    res
}

/// Write the persons of \p graph as a pre-makeped PED file of the family
/// \p family_id. Placeholders are skipped.
pub fn export_ped(graph: &BaseGraph, family_id: &str, source: PedIdSource) -> String {
    let ids = create_new_ids(graph, source);
    let ped_id = |v: VertexId| ids.get(&v).cloned().unwrap_or_else(|| "0".to_string());
    let mut output = String::new();

    for node in PersonNode::exported(graph) {
        let (father, mother) = match node.parents(graph) {
            Some((mother, father)) => (ped_id(father.id()), ped_id(mother.id())),
            None => ("0".to_string(), "0".to_string()),
        };

        let v = node.id();
        let props = graph.properties(v);
        let sex = match props.gender {
            Gender::Male => 1,
            Gender::Female => 2,
            Gender::Unknown => 3,
        };
        let status = match &props.carrier_status {
            Some(_) if props.is_affected() => 2,
            Some(_) => 1,
            None => -9,
        };
        let _ = writeln!(
            output,
            "{} {} {} {} {} {}",
            family_id,
            ped_id(v),
            father,
            mother,
            sex,
            status
        );
    }
    output
}

#[test]
fn test_import_trio() {
    let text = "fam dad 0 0 1 1\nfam mom 0 0 2 1\nfam kid dad mom 2 2\n";
    let res = import_ped(text, &PedImportOptions::default()).unwrap();
    let g = &res.graph;
    assert_eq!(g.vertices_of_type(VertexType::Relationship).len(), 1);
    assert_eq!(g.vertices_of_type(VertexType::Childhub).len(), 1);
    assert_eq!(g.num_vertices(), 5);
    g.validate().unwrap();

    let kid = VertexId::from(2);
    assert_eq!(res.proband, Some(VertexId::from(0)));
    assert_eq!(g.parents(kid).len(), 2);
    assert_eq!(g.properties(kid).gender, Gender::Female);
    assert_eq!(g.properties(kid).carrier_status.as_deref(), Some("affected"));
    assert_eq!(g.properties(kid).disorders, vec!["affected".to_string()]);
    assert_eq!(g.properties(VertexId::from(0)).carrier_status.as_deref(), Some(""));
}

#[test]
fn test_import_missing_parent_and_comments() {
    let text = "# a comment\nf1 a 0 0 1 0\n\nf1 b a 0 2 -9\n";
    let opts = PedImportOptions {
        save_id_as_external_id: true,
        ..Default::default()
    };
    let res = import_ped(text, &opts).unwrap();
    let g = &res.graph;
    let b = VertexId::from(1);
    let parents = g.parents(b);
    assert_eq!(parents.len(), 2);
    let unknown = parents.iter().find(|p| **p != VertexId::from(0)).unwrap();
    assert_eq!(g.properties(*unknown).gender, Gender::Female);
    assert_eq!(g.properties(*unknown).comments.as_deref(), Some("unknown"));
    assert_eq!(g.properties(b).external_id.as_deref(), Some("b"));
    assert_eq!(g.properties(b).carrier_status, None);
}

#[test]
fn test_import_errors() {
    let opts = PedImportOptions::default();
    let cases = [
        "",
        "f a 0 0 1\n",
        "f a 0 0 1 1\ng b 0 0 1 1\n",
        "f a 0 0 1 1\nf a 0 0 1 1\n",
        "f a 0 0 1 1\nf b x 0 1 1\n",
        "f a 0 0 2 1\nf b a 0 1 1\n",
        "f a 0 0 1 1\nf b 0 0 1 1\n",
    ];
    for text in cases {
        assert!(
            matches!(import_ped(text, &opts), Err(PedigreeError::Import(_))),
            "{:?} should be rejected",
            text
        );
    }
}

#[test]
fn test_phenotype_schemes() {
    let text = "f a 0 0 1 1\nf b 0 0 2 0\nf c a b 1 3\n";
    let one = PedImportOptions {
        affected_code_one: true,
        mark_evaluated: true,
        ..Default::default()
    };
    let g = import_ped(text, &one).unwrap().graph;
    let (a, b, c) = (VertexId::from(0), VertexId::from(1), VertexId::from(2));
    assert!(g.properties(a).is_affected());
    assert!(g.properties(a).evaluated);
    assert_eq!(g.properties(b).carrier_status.as_deref(), Some(""));
    assert_eq!(g.properties(c).carrier_status, None);
    assert!(!g.properties(c).evaluated);

    let extended = PedImportOptions {
        accept_other_phenotypes: true,
        ..Default::default()
    };
    let g = import_ped(text, &extended).unwrap().graph;
    assert_eq!(g.properties(c).disorders, vec!["affected (phenotype 3)".to_string()]);
    assert_eq!(g.properties(a).carrier_status.as_deref(), Some(""));

    let both = PedImportOptions {
        accept_other_phenotypes: true,
        affected_code_one: true,
        ..Default::default()
    };
    assert!(import_ped(text, &both).is_err());
}

#[test]
fn test_post_makeped_proband() {
    let text = "1 1 0 0 3 0 0 1 0 1 Ped: 1 Per: 1\n\
                1 2 0 0 3 0 0 2 0 1 Ped: 1 Per: 2\n\
                1 3 1 2 0 0 0 1 1 2 Ped: 1 Per: 3\n";
    let res = import_ped(text, &PedImportOptions::default()).unwrap();
    assert_eq!(res.proband, Some(VertexId::from(2)));
    assert!(res.graph.properties(VertexId::from(2)).is_affected());
}

#[test]
fn test_export() {
    let text = "fam dad 0 0 1 1\nfam mom 0 0 2 1\nfam kid mom dad 3 2\n";
    let err = import_ped(text, &PedImportOptions::default());
    assert!(err.is_err());

    let text = "fam dad 0 0 1 1\nfam mom 0 0 2 0\nfam kid dad mom 3 2\n";
    let opts = PedImportOptions {
        save_id_as_external_id: true,
        ..Default::default()
    };
    let mut g = import_ped(text, &opts).unwrap().graph;
    let out = export_ped(&g, "fam", PedIdSource::External);
    assert_eq!(out, "fam dad 0 0 1 1\nfam mom 0 0 2 -9\nfam kid dad mom 3 2\n");

    let out = export_ped(&g, "x", PedIdSource::Sequential);
    assert_eq!(out, "x 1 0 0 1 1\nx 2 0 0 2 -9\nx 3 1 2 3 2\n");

    g.properties_mut(VertexId::from(1)).placeholder = true;
    let out = export_ped(&g, "x", PedIdSource::Name);
    assert_eq!(out, "x 1 0 0 1 1\nx 2 1 0 3 2\n");
}
