//! Program and course records.

use super::raw::{lenient_count, lenient_string, null_as_default};
use super::requirement::{NormalizedRequirement, RawRequirement};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Credit block attached to each program requirement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credits {
    /// Required amount for the requirement.
    #[serde(deserialize_with = "lenient_count")]
    pub required_credits: Option<f64>,
}

/// One entry of a program's `detailAssessments`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAssessment {
    /// Bracketed key, e.g. `"(Req3)"`.
    #[serde(deserialize_with = "lenient_string")]
    pub short_identifier: String,
    /// Credit block; its `requiredCredits` becomes the requirement count.
    #[serde(deserialize_with = "null_as_default")]
    pub credits: Credits,
    /// The requirement itself.
    #[serde(deserialize_with = "null_as_default")]
    pub requirement: RawRequirement,
}

/// A program record as delivered by the acquisition layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProgram {
    /// Program title.
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    /// Requirements in display order.
    #[serde(deserialize_with = "null_as_default")]
    pub detail_assessments: Vec<RawAssessment>,
}

impl RawProgram {
    /// Returns the keyed requirement nodes, taking each count from its
    /// credit block.
    #[must_use]
    pub fn requirement_nodes(&self) -> Vec<(String, RawRequirement)> {
        self.detail_assessments
            .iter()
            .map(|assessment| {
                let mut requirement = assessment.requirement.clone();
                requirement.count = assessment.credits.required_credits;
                (strip_brackets(&assessment.short_identifier), requirement)
            })
            .collect()
    }
}

/// One entry of a course's `prerequisites`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPrerequisite {
    /// Bracketed key, e.g. `"(P1)"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub short_identifier: String,
    /// Requirement fields, inlined.
    #[serde(flatten)]
    pub requirement: RawRequirement,
}

/// A course record as delivered by the acquisition layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCourse {
    /// Course title.
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    /// Prerequisites in display order.
    #[serde(deserialize_with = "null_as_default")]
    pub prerequisites: Vec<RawPrerequisite>,
}

impl RawCourse {
    /// Returns the keyed prerequisite nodes.
    #[must_use]
    pub fn requirement_nodes(&self) -> Vec<(String, RawRequirement)> {
        self.prerequisites
            .iter()
            .map(|p| (strip_brackets(&p.short_identifier), p.requirement.clone()))
            .collect()
    }
}

/// Strips one pair of surrounding brackets: `"(Req3)"` becomes `"Req3"`.
#[must_use]
pub fn strip_brackets(identifier: &str) -> String {
    let trimmed = identifier.trim();
    trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed)
        .to_string()
}

/// Normalized requirements of one owner, in source order.
///
/// Serializes as a JSON object keyed by requirement key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequirementSet {
    entries: Vec<(String, NormalizedRequirement)>,
}

impl RequirementSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a requirement. A repeated key replaces the earlier entry in place.
    pub fn insert(&mut self, key: impl Into<String>, requirement: NormalizedRequirement) {
        let key = key.into();
        if let Some(slot) = self.get_mut(&key) {
            *slot = requirement;
        } else {
            self.entries.push((key, requirement));
        }
    }

    /// Looks up a requirement by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&NormalizedRequirement> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    /// Looks up a requirement by key for mutation.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut NormalizedRequirement> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, r)| r)
    }

    /// Iterates entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NormalizedRequirement)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Number of requirements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no requirements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RequirementSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, requirement) in &self.entries {
            map.serialize_entry(key, requirement)?;
        }
        map.end()
    }
}

/// A normalized program: title plus keyed requirements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProgram {
    /// Program title.
    pub title: String,
    /// Requirements keyed by short identifier.
    pub detail_assessments: RequirementSet,
}

/// A normalized course: title plus keyed prerequisites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedCourse {
    /// Course title.
    pub title: String,
    /// Prerequisites keyed by short identifier.
    pub prerequisites: RequirementSet,
}
