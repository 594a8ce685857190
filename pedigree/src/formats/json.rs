//! The "simple JSON" pedigree format: an array of person objects, e.g.
//!
//! ```json
//! [ { "name": "f11", "sex": "female", "lifeStatus": "deceased" },
//!   { "name": "m11", "sex": "male" },
//!   { "name": "ch1", "sex": "female", "mother": "f11", "father": "m11",
//!     "disorders": [603235], "proband": true } ]
//! ```
//!
//! Keys are case insensitive. Every person needs at least one of `id`,
//! `name`, `firstName` or `externalId`; `mother` and `father` refer to other
//! persons by id, external id or name. The first person flagged as proband
//! is the proband, otherwise the first person is.
//!
//! The exporter writes the same format back, with the vertex index of every
//! person as its id.

use crate::adt::base_graph::BaseGraph;
use crate::adt::person::PersonNode;
use crate::core::base::{VertexId, VertexType};
use crate::core::error::{PedigreeError, Result};
use crate::core::properties::{Gender, Properties};
use crate::formats::builder::{
    add_unknown_parent, validate_import, RelationshipTracker, DEFAULT_EDGE_WEIGHT,
};
use crate::formats::ped::ImportedPedigree;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// The supported keys of the format and the property names of the model.
const PROPERTY_KEYS: &[(&str, &str)] = &[
    ("lastName", "lName"),
    ("lastNameAtBirth", "lNameAtB"),
    ("comments", "comments"),
    ("twinGroup", "twinGroup"),
    ("monozygotic", "monozygotic"),
    ("adoptedStatus", "adoptedStatus"),
    ("evaluated", "evaluated"),
    ("birthDate", "dob"),
    ("deathDate", "dod"),
    ("gestationAge", "gestationAge"),
    ("lifeStatus", "lifeStatus"),
    ("disorders", "disorders"),
    ("hpoTerms", "hpoTerms"),
    ("candidateGenes", "candidateGenes"),
    ("ethnicities", "ethnicities"),
    ("carrierStatus", "carrierStatus"),
    ("externalId", "externalID"),
    ("numPersons", "numPersons"),
    ("lostContact", "lostContact"),
    ("nodeNumber", "nodeNumber"),
    ("cancers", "cancers"),
];

/// Maps a key of the input, in any case, to the property name of the model.
fn convert_property(key: &str) -> Option<&'static str> {
    PROPERTY_KEYS
        .iter()
        .find(|(external, _)| external.eq_ignore_ascii_case(key))
        .map(|(_, name)| *name)
}

/// \returns the text of a reference, which may be a string or a number.
fn reference_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().map_or(false, |x| x != 0.),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Resolves the parent references of the input.
#[derive(Default)]
struct References {
    by_id: HashMap<String, VertexId>,
    by_name: HashMap<String, VertexId>,
    ambiguous: HashSet<String>,
    has_id: HashSet<VertexId>,
}

impl References {
    fn add_id(&mut self, key: String, v: VertexId) -> Result<()> {
        if self.by_id.contains_key(&key) {
            return Err(PedigreeError::import(format!(
                "multiple persons with the same ID [{}]",
                key
            )));
        }
        if self.by_name.get(&key).map_or(false, |n| *n != v) {
            self.by_name.remove(&key);
            self.ambiguous.insert(key);
        } else {
            self.by_id.insert(key, v);
            self.has_id.insert(v);
        }
        Ok(())
    }

    fn add_name(&mut self, key: String, v: VertexId) {
        if self.by_name.get(&key).map_or(false, |n| *n != v) {
            self.by_name.remove(&key);
            self.ambiguous.insert(key);
        } else if self.by_id.get(&key).map_or(false, |n| *n != v) {
            self.by_id.remove(&key);
            self.ambiguous.insert(key);
        } else {
            self.by_name.insert(key, v);
        }
    }

    fn find(&self, reference: &str, what: &str) -> Result<VertexId> {
        if self.ambiguous.contains(reference) {
            return Err(PedigreeError::import(format!(
                "ambiguous reference to [{}]",
                reference
            )));
        }
        if let Some(v) = self.by_id.get(reference).or_else(|| self.by_name.get(reference)) {
            return Ok(*v);
        }
        Err(PedigreeError::import(format!(
            "[{}] is not a valid {} reference (does not correspond to a name or an ID of another person)",
            reference, what
        )))
    }
}

/// Turn the collected raw properties into the typed record, applying the
/// defaults that depend on several keys.
fn finish_properties(mut raw: Map<String, Value>) -> Result<Properties> {
    if let Some(Value::Array(disorders)) = raw.get_mut("disorders") {
        for d in disorders.iter_mut() {
            if let Some(text) = reference_text(d) {
                *d = Value::String(text);
            }
        }
    }
    let has_disorders = matches!(raw.get("disorders"), Some(Value::Array(d)) if !d.is_empty());
    let status_unset = matches!(raw.get("carrierStatus"), None | Some(Value::Null))
        || raw.get("carrierStatus") == Some(&Value::String(String::new()));
    if has_disorders && status_unset {
        raw.insert("carrierStatus".to_string(), Value::from("affected"));
    }

    if raw.contains_key("dod") {
        let alive = matches!(raw.get("lifeStatus"), None)
            || raw.get("lifeStatus") == Some(&Value::from("alive"));
        if alive {
            raw.insert("lifeStatus".to_string(), Value::from("deceased"));
        }
    }

    if let Some(ext) = raw.get("externalID").and_then(reference_text) {
        raw.insert("externalID".to_string(), Value::String(ext));
    }

    serde_json::from_value(Value::Object(raw))
        .map_err(|err| PedigreeError::import(format!("unsupported property value: {}", err)))
}

/// Build a pedigree from the simple JSON document \p text.
pub fn import_simple_json(text: &str) -> Result<ImportedPedigree> {
    let input: Value = serde_json::from_str(text).map_err(|err| {
        PedigreeError::import(format!("input is not a valid JSON string {}", err))
    })?;
    let persons = match input {
        Value::Array(persons) => persons,
        _ => {
            return Err(PedigreeError::import(
                "JSON does not represent an array of objects",
            ))
        }
    };
    if persons.is_empty() {
        return Err(PedigreeError::import("input is empty"));
    }

    let mut graph = BaseGraph::new();
    let mut refs = References::default();
    let mut proband = None;
    let mut rows: Vec<(VertexId, Map<String, Value>)> = Vec::with_capacity(persons.len());

    // First pass: create the vertices and collect the references.
    for person in persons {
        let person = match person {
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect::<Map<String, Value>>(),
            _ => {
                return Err(PedigreeError::import(
                    "JSON does not represent an array of objects",
                ))
            }
        };
        if !["id", "name", "firstname", "externalid"]
            .iter()
            .any(|k| person.contains_key(*k))
        {
            return Err(PedigreeError::import("a node with no ID or name is found"));
        }

        let v = graph.add_vertex(None, VertexType::Person, Properties::default(), None)?;
        let mut raw = Map::new();
        raw.insert("gender".to_string(), Value::from("U"));

        for (key, value) in &person {
            match key.as_str() {
                "mother" | "father" => {}
                "proband" => {
                    if proband.is_none() && is_truthy(value) {
                        proband = Some(v);
                    }
                }
                "sex" => {
                    let gender = value.as_str().map_or(Gender::Unknown, Gender::parse);
                    raw.insert("gender".to_string(), serde_json::to_value(gender)?);
                }
                "id" => {
                    if let Some(key) = reference_text(value) {
                        refs.add_id(key, v)?;
                    }
                }
                "name" | "firstname" => {
                    if let Some(name) = reference_text(value) {
                        raw.insert("fName".to_string(), Value::String(name.clone()));
                        refs.add_name(name, v);
                    }
                }
                other => {
                    if let Some(name) = convert_property(other) {
                        raw.insert(name.to_string(), value.clone());
                    }
                }
            }
        }

        // The external id is only a reference when there is no id.
        if !refs.has_id.contains(&v) {
            if let Some(ext) = person.get("externalid").and_then(reference_text) {
                refs.by_id.insert(ext, v);
                refs.has_id.insert(v);
            }
        }

        graph.set_properties(v, finish_properties(raw)?)?;
        rows.push((v, person));
    }

    // Second pass: connect the parents.
    let mut tracker = RelationshipTracker::new();
    for (v, person) in &rows {
        let link = |key: &str| person.get(key).filter(|l| !l.is_null()).and_then(reference_text);
        let (mother_link, father_link) = (link("mother"), link("father"));
        if mother_link.is_none() && father_link.is_none() {
            continue;
        }

        let father = match &father_link {
            Some(link) => {
                let father = refs.find(link, "father")?;
                if graph.properties(father).gender == Gender::Female {
                    return Err(PedigreeError::import(format!(
                        "a person declared as female is also declared as being a father ({})",
                        link
                    )));
                }
                father
            }
            None => add_unknown_parent(&mut graph, Gender::Male)?,
        };
        let mother = match &mother_link {
            Some(link) => {
                let mother = refs.find(link, "mother")?;
                if graph.properties(mother).gender == Gender::Male {
                    return Err(PedigreeError::import(format!(
                        "a person declared as male is also declared as being a mother ({})",
                        link
                    )));
                }
                mother
            }
            None => add_unknown_parent(&mut graph, Gender::Female)?,
        };
        if father == *v || mother == *v {
            return Err(PedigreeError::import(
                "a person is declared to be their own parent",
            ));
        }

        let hub = tracker.create_or_get_childhub(&mut graph, mother, father)?;
        graph.add_edge(hub, *v, DEFAULT_EDGE_WEIGHT)?;
    }

    validate_import(&graph)?;

    #[cfg(feature = "log")]
    log::info!("Imported {} persons from simple JSON.", rows.len());

    Ok(ImportedPedigree {
        graph,
        proband: proband.or_else(|| rows.first().map(|(v, _)| *v)),
    })
}

/// Which personal details the exporter leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonPrivacy {
    #[default]
    All,
    /// No names and no birth date.
    NoPersonalInfo,
    /// Like NoPersonalInfo, and no comments either.
    Minimal,
}

impl JsonPrivacy {
    fn hides(&self, name: &str) -> bool {
        match self {
            JsonPrivacy::All => false,
            _ if matches!(name, "fName" | "lName" | "lNameAtB" | "dob") => true,
            JsonPrivacy::Minimal => name == "comments",
            JsonPrivacy::NoPersonalInfo => false,
        }
    }
}

/// Write the persons of \p graph as a simple JSON document that
/// import_simple_json reads back. Placeholders are written as persons so
/// that the families stay connected.
pub fn export_simple_json(
    graph: &BaseGraph,
    proband: Option<VertexId>,
    privacy: JsonPrivacy,
) -> Result<String> {
    let mut persons = Vec::new();

    for node in PersonNode::all(graph) {
        let v = node.id();
        let mut person = Map::new();
        person.insert("id".to_string(), Value::from(v.get_index()));

        if let Some((mother, father)) = node.parents(graph) {
            person.insert("father".to_string(), Value::from(father.id().get_index()));
            person.insert("mother".to_string(), Value::from(mother.id().get_index()));
        }

        let props = graph.properties(v);
        let sex = match props.gender {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        };
        person.insert("sex".to_string(), Value::from(sex));
        if let Some(name) = props.first_name.as_ref().filter(|_| !privacy.hides("fName")) {
            person.insert("firstName".to_string(), Value::from(name.as_str()));
        }

        let stored = match serde_json::to_value(props)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, name) in PROPERTY_KEYS {
            if privacy.hides(name) {
                continue;
            }
            if let Some(value) = stored.get(*name) {
                person.insert(key.to_string(), value.clone());
            }
        }

        if proband == Some(v) {
            person.insert("proband".to_string(), Value::Bool(true));
        }
        persons.push(Value::Object(person));
    }

    #[cfg(feature = "log")]
    log::info!("Exported {} persons as simple JSON.", persons.len());

    Ok(serde_json::to_string(&Value::Array(persons))?)
}

#[test]
fn test_import_family() {
    let text = r#"[
        { "name": "f11", "sex": "female", "lifeStatus": "deceased" },
        { "name": "m11", "sex": "male" },
        { "name": "f12", "sex": "female", "disorders": [603235, "custom disorder"] },
        { "name": "m12", "sex": "male" },
        { "name": "m21", "sex": "male", "mother": "f11", "father": "m11" },
        { "name": "f21", "sex": "female", "mother": "f12", "father": "m12" },
        { "name": "ch1", "sex": "female", "mother": "f21", "father": "m21",
          "proband": true, "twinGroup": 0, "birthDate": "1990-01-01" }
    ]"#;
    let res = import_simple_json(text).unwrap();
    let g = &res.graph;
    assert_eq!(g.vertices_of_type(VertexType::Relationship).len(), 3);
    assert_eq!(g.num_vertices(), 13);

    let ch1 = VertexId::from(6);
    assert_eq!(res.proband, Some(ch1));
    let props = g.properties(ch1);
    assert_eq!(props.first_name.as_deref(), Some("ch1"));
    assert_eq!(props.gender, Gender::Female);
    assert_eq!(props.twin_group, Some(0));
    assert_eq!(props.extra.get("dob"), Some(&Value::from("1990-01-01")));

    let f12 = g.properties(VertexId::from(2));
    assert_eq!(f12.disorders, vec!["603235".to_string(), "custom disorder".to_string()]);
    assert_eq!(f12.carrier_status.as_deref(), Some("affected"));
}

#[test]
fn test_ids_and_missing_parents() {
    let text = r#"[
        { "id": 1, "name": "dad", "sex": "m", "externalId": "P-1" },
        { "id": 2, "mother": 3, "deathDate": "2001" },
        { "externalId": "ext", "sex": "M" },
        { "id": 3, "sex": "F", "father": 1 },
        { "id": 4, "mother": 3, "father": "ext" }
    ]"#;
    let res = import_simple_json(text).unwrap();
    let g = &res.graph;
    assert_eq!(res.proband, Some(VertexId::from(0)));
    assert_eq!(g.properties(VertexId::from(0)).external_id.as_deref(), Some("P-1"));

    let second = VertexId::from(1);
    assert_eq!(
        g.properties(second).life_status,
        Some(crate::core::properties::LifeStatus::Deceased)
    );
    // The missing father of the second person is a new unknown male.
    let (mother, father) = g
        .mother_father(g.producing_relationship(second).unwrap())
        .unwrap();
    assert_eq!(mother, VertexId::from(3));
    assert_eq!(g.properties(father).comments.as_deref(), Some("unknown"));
    assert_eq!(g.properties(father).gender, Gender::Male);

    // A person without an id is found through the external id.
    let fourth = VertexId::from(4);
    let (mother, father) = g
        .mother_father(g.producing_relationship(fourth).unwrap())
        .unwrap();
    assert_eq!((mother, father), (VertexId::from(3), VertexId::from(2)));
}

#[test]
fn test_import_errors() {
    let cases = [
        "{",
        "{}",
        "[]",
        "[3]",
        r#"[{"sex": "m"}]"#,
        r#"[{"id": "a"}, {"id": "a"}]"#,
        r#"[{"name": "a"}, {"name": "a"}, {"name": "b", "mother": "a"}]"#,
        r#"[{"name": "a"}, {"name": "b", "mother": "zz"}]"#,
        r#"[{"name": "a", "sex": "m"}, {"name": "b", "mother": "a"}]"#,
        r#"[{"name": "a", "sex": "f", "mother": "a"}]"#,
        r#"[{"name": "a"}, {"name": "b"}]"#,
        r#"[{"name": "a", "twinGroup": "x"}]"#,
    ];
    for text in cases {
        assert!(
            matches!(import_simple_json(text), Err(PedigreeError::Import(_))),
            "{} should be rejected",
            text
        );
    }
}

#[test]
fn test_export_and_import_again() {
    let text = r#"[
        { "name": "f11", "sex": "female", "lifeStatus": "deceased", "comments": "aunt Jo" },
        { "name": "m11", "sex": "male", "externalId": "P-7" },
        { "name": "f12", "sex": "female", "disorders": [603235] },
        { "name": "m12", "sex": "male", "lastName": "Smith" },
        { "name": "m21", "sex": "male", "mother": "f11", "father": "m11" },
        { "name": "f21", "sex": "female", "mother": "f12", "father": "m12" },
        { "name": "ch1", "sex": "unknown", "mother": "f21", "father": "m21",
          "twinGroup": 0, "birthDate": "1990-01-01" },
        { "name": "ch2", "sex": "male", "mother": "f21", "father": "m21",
          "twinGroup": 0, "proband": true }
    ]"#;
    let first = import_simple_json(text).unwrap();
    let out = export_simple_json(&first.graph, first.proband, JsonPrivacy::All).unwrap();
    let second = import_simple_json(&out).unwrap();
    assert_eq!(second.graph, first.graph);
    assert_eq!(second.proband, first.proband);
    assert_eq!(second.proband, Some(VertexId::from(7)));

    let ch1 = VertexId::from(6);
    assert_eq!(second.graph.twins(ch1).len(), 2);
    let props = second.graph.properties(ch1);
    assert_eq!(props.first_name.as_deref(), Some("ch1"));
    assert_eq!(props.extra.get("dob"), Some(&Value::from("1990-01-01")));
}

#[test]
fn test_export_privacy() {
    let text = r#"[
        { "name": "mum", "sex": "F", "lastName": "Doe", "comments": "note" },
        { "name": "dad", "sex": "M", "birthDate": "1950" },
        { "name": "kid", "mother": "mum", "father": "dad" }
    ]"#;
    let res = import_simple_json(text).unwrap();

    let out = export_simple_json(&res.graph, None, JsonPrivacy::NoPersonalInfo).unwrap();
    for hidden in ["mum", "Doe", "1950"] {
        assert!(!out.contains(hidden), "{} is in {}", hidden, out);
    }
    assert!(out.contains("note"));
    let back = import_simple_json(&out).unwrap();
    assert_eq!(back.graph.properties(VertexId::from(0)).first_name, None);
    let (mother, father) = back
        .graph
        .mother_father(back.graph.producing_relationship(VertexId::from(2)).unwrap())
        .unwrap();
    assert_eq!((mother, father), (VertexId::from(0), VertexId::from(1)));

    let out = export_simple_json(&res.graph, None, JsonPrivacy::Minimal).unwrap();
    assert!(!out.contains("note"));
}
