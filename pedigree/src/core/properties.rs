//! The payload attached to pedigree vertices. The layout only looks at a few
//! of these fields (twin group, placeholder flag, gender for the proband's
//! parents); the rest is carried along for the editor and the exporters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "U")]
    Unknown,
}

impl Gender {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Gender::Unknown)
    }

    /// The gender a new partner of a person with this gender gets.
    pub fn opposite(&self) -> Gender {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
            Gender::Unknown => Gender::Unknown,
        }
    }

    /// Parse the free-form spellings used by the importers.
    pub fn parse(text: &str) -> Gender {
        match text.to_lowercase().as_str() {
            "m" | "male" | "1" => Gender::Male,
            "f" | "female" | "2" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeStatus {
    Alive,
    Deceased,
    Aborted,
    Miscarriage,
    Stillborn,
    Unborn,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Properties {
    #[serde(skip_serializing_if = "Gender::is_unknown")]
    pub gender: Gender,

    #[serde(rename = "fName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(rename = "lName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(rename = "lNameAtB", skip_serializing_if = "Option::is_none")]
    pub last_name_at_birth: Option<String>,

    #[serde(rename = "externalID", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    /// Siblings with the same childhub and the same twin group are twins.
    #[serde(rename = "twinGroup", skip_serializing_if = "Option::is_none")]
    pub twin_group: Option<usize>,

    #[serde(skip_serializing_if = "is_false")]
    pub monozygotic: bool,

    /// Marks a person-like vertex standing for an unknown relative.
    #[serde(skip_serializing_if = "is_false")]
    pub placeholder: bool,

    /// When non-zero the vertex stands for a group of persons.
    #[serde(rename = "numPersons", skip_serializing_if = "is_zero")]
    pub num_persons: usize,

    #[serde(rename = "lifeStatus", skip_serializing_if = "Option::is_none")]
    pub life_status: Option<LifeStatus>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disorders: Vec<String>,

    #[serde(rename = "carrierStatus", skip_serializing_if = "Option::is_none")]
    pub carrier_status: Option<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub evaluated: bool,

    #[serde(rename = "adoptedStatus", skip_serializing_if = "Option::is_none")]
    pub adopted_status: Option<String>,

    /// Everything else is kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero(v: &usize) -> bool {
    *v == 0
}

impl Properties {
    pub fn with_gender(gender: Gender) -> Self {
        Self {
            gender,
            ..Default::default()
        }
    }

    pub fn placeholder() -> Self {
        Self {
            placeholder: true,
            ..Default::default()
        }
    }

    /// Counts as affected for the PED status column.
    pub fn is_affected(&self) -> bool {
        matches!(
            self.carrier_status.as_deref(),
            Some("affected") | Some("carrier") | Some("presymptomatic")
        )
    }

    /// The best human readable name of the vertex, if any.
    pub fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
            (Some(f), None) => Some(f.clone()),
            (None, Some(l)) => Some(l.clone()),
            (None, None) => self.external_id.clone(),
        }
    }
}

#[test]
fn test_properties_serde() {
    let text = r#"{"gender":"F","fName":"Ann","twinGroup":1,"dob":"1970"}"#;
    let p: Properties = serde_json::from_str(text).unwrap();
    assert_eq!(p.gender, Gender::Female);
    assert_eq!(p.first_name.as_deref(), Some("Ann"));
    assert_eq!(p.twin_group, Some(1));
    assert_eq!(p.extra.get("dob"), Some(&serde_json::json!("1970")));

    // Default values are not written back.
    let back = serde_json::to_value(&p).unwrap();
    assert!(back.get("placeholder").is_none());
    assert_eq!(back.get("dob"), Some(&serde_json::json!("1970")));
}

#[test]
fn test_gender() {
    assert_eq!(Gender::parse("Male"), Gender::Male);
    assert_eq!(Gender::parse("2"), Gender::Female);
    assert_eq!(Gender::parse("x"), Gender::Unknown);
    assert_eq!(Gender::Male.opposite(), Gender::Female);
}
