//! Tunable constants of the layout engine.

use crate::core::error::{PedigreeError, Result};
use serde::{Deserialize, Serialize};

/// Layout configuration. Every field has a default, so a JSON document only
/// needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Number of median/transpose sweeps of the crossing reduction. This is
    /// the cap that bounds the ordering time on large inputs.
    pub max_ordering_iterations: usize,
    /// Stop the crossing reduction after this many sweeps without progress.
    pub max_no_change_iterations: usize,
    /// Cap on the number of transposition passes after each sweep.
    pub max_transpose_passes: usize,
    /// Number of (top-down, bottom-up) coordinate refinement rounds.
    pub max_xcoord_iterations: usize,
    /// Cap on the partner-sinking passes of the ranker.
    pub max_rank_iterations: usize,

    pub person_width: usize,
    pub non_person_width: usize,

    pub horizontal_person_separation: usize,
    pub horizontal_twin_separation: usize,
    pub horizontal_rel_rel_separation: usize,
    pub horizontal_rel_separation: usize,

    /// Vertical distance from a person rank to the childhub rank below it.
    pub y_distance_node_to_childhub: f64,
    /// Vertical distance from a childhub rank to the person rank below it.
    pub y_distance_childhub_to_node: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_ordering_iterations: 24,
            max_no_change_iterations: 6,
            max_transpose_passes: 32,
            max_xcoord_iterations: 4,
            max_rank_iterations: 64,
            person_width: 10,
            non_person_width: 2,
            horizontal_person_separation: 10,
            horizontal_twin_separation: 8,
            horizontal_rel_rel_separation: 8,
            horizontal_rel_separation: 6,
            y_distance_node_to_childhub: 21.6,
            y_distance_childhub_to_node: 14.,
        }
    }
}

impl LayoutOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        let options: LayoutOptions = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject configurations that cannot produce a drawing.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("person_width", self.person_width),
            ("non_person_width", self.non_person_width),
            ("horizontal_person_separation", self.horizontal_person_separation),
            ("horizontal_twin_separation", self.horizontal_twin_separation),
            ("horizontal_rel_rel_separation", self.horizontal_rel_rel_separation),
            ("horizontal_rel_separation", self.horizontal_rel_separation),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(PedigreeError::InvalidOptions(format!(
                    "{} must be positive",
                    name
                )));
            }
        }
        let heights = [
            ("y_distance_node_to_childhub", self.y_distance_node_to_childhub),
            ("y_distance_childhub_to_node", self.y_distance_childhub_to_node),
        ];
        for (name, value) in heights {
            if !value.is_finite() || value <= 0. {
                return Err(PedigreeError::InvalidOptions(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.max_ordering_iterations == 0 {
            return Err(PedigreeError::InvalidOptions(
                "max_ordering_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[test]
fn test_partial_override() {
    let opt =
        LayoutOptions::from_json(r#"{"horizontal_person_separation": 20}"#)
            .unwrap();
    assert_eq!(opt.horizontal_person_separation, 20);
    assert_eq!(opt.max_ordering_iterations, 24);
    assert_eq!(opt.person_width, 10);
}

#[test]
fn test_invalid_options() {
    let res = LayoutOptions::from_json(r#"{"y_distance_node_to_childhub": 0}"#);
    assert!(matches!(res, Err(PedigreeError::InvalidOptions(_))));
    let res = LayoutOptions::from_json(r#"{"person_width": 0}"#);
    assert!(res.is_err());
}

#[test]
fn test_zero_separation_is_rejected() {
    let res = LayoutOptions::from_json(
        r#"{"horizontal_person_separation": 0, "person_width": 1}"#,
    );
    assert!(matches!(res, Err(PedigreeError::InvalidOptions(_))));
    let res = LayoutOptions::from_json(r#"{"horizontal_rel_separation": 0}"#);
    assert!(matches!(res, Err(PedigreeError::InvalidOptions(_))));
    // Narrow vertices are fine as long as they are kept apart.
    assert!(LayoutOptions::from_json(r#"{"person_width": 1}"#).is_ok());
}
