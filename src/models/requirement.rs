//! Requirement types, raw and normalized.
//!
//! A raw requirement is one entry of a program's `detailAssessments` or a
//! course's `prerequisites`. Classification maps its `(type, countType)` pair
//! onto the closed [`RequirementKind`] taxonomy and keeps only the fields that
//! kind needs.

use super::raw::{lenient_count, lenient_string, null_as_default};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// The raw `type` of a requirement node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawType {
    /// Free text, no constraint.
    Note,
    /// At least `count` of something.
    Minimum,
    /// Every listed course.
    List,
    /// The referenced requirements may not share courses.
    NoReuse,
    /// Constrains how sibling requirements combine, lower bound.
    GroupMinimum,
    /// Constrains how sibling requirements combine, upper bound.
    GroupMaximum,
    /// Evaluated by hand upstream.
    Complex,
    /// Courses may be reused across requirements.
    Reuse,
    /// Anything the planner adds later.
    Other(String),
}

impl RawType {
    /// Parses a raw type string. Unknown values are kept verbatim.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOTE" => Self::Note,
            "MINIMUM" => Self::Minimum,
            "LIST" => Self::List,
            "NO_REUSE" => Self::NoReuse,
            "GROUPMINIMUM" => Self::GroupMinimum,
            "GROUPMAXIMUM" => Self::GroupMaximum,
            "COMPLEX" => Self::Complex,
            "REUSE" => Self::Reuse,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    /// Returns the planner's spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Note => "NOTE",
            Self::Minimum => "MINIMUM",
            Self::List => "LIST",
            Self::NoReuse => "NO_REUSE",
            Self::GroupMinimum => "GROUPMINIMUM",
            Self::GroupMaximum => "GROUPMAXIMUM",
            Self::Complex => "COMPLEX",
            Self::Reuse => "REUSE",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a requirement's `count` is measured in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CountType {
    /// Number of courses.
    Courses,
    /// Full-course equivalents (credits).
    Fces,
    /// Number of programs.
    SubjectPosts,
    /// Number of sibling requirements.
    Requisites,
    /// Grade point average.
    Gpa,
    /// Year of study.
    Yos,
    /// Course average.
    Average,
    /// Field missing or blank.
    Unspecified,
    /// Anything else.
    Other(String),
}

impl CountType {
    /// Parses a raw count type string. Unknown values are kept verbatim.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "" => Self::Unspecified,
            "COURSES" => Self::Courses,
            "FCES" => Self::Fces,
            "SUBJECT_POSTS" => Self::SubjectPosts,
            "REQUISITES" => Self::Requisites,
            "GPA" => Self::Gpa,
            "YOS" => Self::Yos,
            "AVERAGE" => Self::Average,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    /// Returns the planner's spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Courses => "COURSES",
            Self::Fces => "FCES",
            Self::SubjectPosts => "SUBJECT_POSTS",
            Self::Requisites => "REQUISITES",
            Self::Gpa => "GPA",
            Self::Yos => "YOS",
            Self::Average => "AVERAGE",
            Self::Unspecified => "",
            Self::Other(s) => s,
        }
    }

    /// Grade- or standing-based constraints that course data cannot check.
    #[must_use]
    pub const fn is_standing(&self) -> bool {
        matches!(self, Self::Gpa | Self::Yos | Self::Average)
    }
}

impl fmt::Display for CountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requisite item. The planner sends objects with a `code`; already
/// flattened payloads send bare strings. Both decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequisiteItem(pub String);

impl<'de> Deserialize<'de> for RequisiteItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Object(mut map) => match map.remove("code") {
                Some(Value::String(s)) => s,
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            },
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        Ok(Self(code))
    }
}

impl RequisiteItem {
    /// The item's code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

/// A requirement node as delivered by the acquisition layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRequirement {
    /// Raw `type` string, see [`RawType`].
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub kind: String,
    /// Raw `countType` string, see [`CountType`].
    #[serde(deserialize_with = "lenient_string")]
    pub count_type: String,
    /// Required amount, in units of `countType`.
    #[serde(deserialize_with = "lenient_count")]
    pub count: Option<f64>,
    /// Text shown before the item list.
    #[serde(deserialize_with = "lenient_string")]
    pub display_prefix: String,
    /// Text joining adjacent items, e.g. `"or"`.
    #[serde(alias = "connector", deserialize_with = "lenient_string")]
    pub sub_item_connector_string: String,
    /// Text shown after the item list.
    #[serde(deserialize_with = "lenient_string")]
    pub display_suffix: String,
    /// Referenced codes.
    #[serde(deserialize_with = "null_as_default")]
    pub requisite_items: Vec<RequisiteItem>,
}

impl RawRequirement {
    /// Parsed `type`.
    #[must_use]
    pub fn raw_type(&self) -> RawType {
        RawType::parse(&self.kind)
    }

    /// Parsed `countType`.
    #[must_use]
    pub fn count_type(&self) -> CountType {
        CountType::parse(&self.count_type)
    }

    /// Iterates the requisite codes in order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.requisite_items.iter().map(RequisiteItem::code)
    }
}

/// The closed taxonomy of normalized requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    /// Informational text.
    Note,
    /// Always satisfied.
    Complete,
    /// Cannot be checked from course data.
    Unverifiable,
    /// At least `count` of the referenced sibling requirements.
    RequirementsMin,
    /// At least `count` courses from explicit courses and categories.
    CoursesMin,
    /// At least `count` courses, drawn from categories only.
    CategoriesCoursesMin,
    /// At least `count` credits from courses and categories.
    FcesMin,
    /// At least `count` of the listed programs.
    ProgramMin,
    /// Every listed course.
    CoursesList,
    /// The referenced requirements may not share courses.
    RequirementsNoReuse,
    /// Lower bound across referenced sibling requirements.
    GroupMin,
    /// Upper bound across referenced sibling requirements.
    GroupMax,
}

impl RequirementKind {
    /// Returns the serialized name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "NOTE",
            Self::Complete => "COMPLETE",
            Self::Unverifiable => "UNVERIFIABLE",
            Self::RequirementsMin => "REQUIREMENTS_MIN",
            Self::CoursesMin => "COURSES_MIN",
            Self::CategoriesCoursesMin => "CATEGORIES_COURSES_MIN",
            Self::FcesMin => "FCES_MIN",
            Self::ProgramMin => "PROGRAM_MIN",
            Self::CoursesList => "COURSES_LIST",
            Self::RequirementsNoReuse => "REQUIREMENTS_NO_REUSE",
            Self::GroupMin => "GROUP_MIN",
            Self::GroupMax => "GROUP_MAX",
        }
    }

    /// Returns true for the kinds resolved in the group pass.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::GroupMin | Self::GroupMax)
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suffix appended to the serialized type of a requirement that a group
/// constraint refers to.
pub const RECURS_MARKER: &str = "_RECURS";

/// A classified requirement.
///
/// Only the fields meaningful for `kind` are `Some`; the rest stay `None` and
/// are left out of the serialized form.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequirement {
    /// Normalized kind.
    pub kind: RequirementKind,
    /// Set when a group constraint refers to this requirement.
    pub recurs: bool,
    /// Whitespace-collapsed human description.
    pub description: String,
    /// Required amount.
    pub count: Option<f64>,
    /// Raw count type, kept for kinds that cannot be checked.
    pub count_type: Option<String>,
    /// Explicit course codes.
    pub courses: Option<Vec<String>>,
    /// Category codes.
    pub categories: Option<Vec<String>>,
    /// Program codes.
    pub programs: Option<Vec<String>>,
    /// Sibling requirements this one depends on.
    pub dependent_reqs: Option<Vec<String>>,
    /// Sibling requirements a group constraint applies to.
    pub recurs_reqs: Option<Vec<String>>,
}

impl NormalizedRequirement {
    /// A requirement of `kind` with only a description.
    #[must_use]
    pub fn bare(kind: RequirementKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            recurs: false,
            description: description.into(),
            count: None,
            count_type: None,
            courses: None,
            categories: None,
            programs: None,
            dependent_reqs: None,
            recurs_reqs: None,
        }
    }

    /// An unverifiable requirement keeping its raw count type.
    #[must_use]
    pub fn unverifiable(description: impl Into<String>, count_type: impl Into<String>) -> Self {
        Self {
            count_type: Some(count_type.into()),
            ..Self::bare(RequirementKind::Unverifiable, description)
        }
    }

    /// The serialized type, including the recurs marker when set.
    #[must_use]
    pub fn type_name(&self) -> String {
        if self.recurs {
            format!("{}{RECURS_MARKER}", self.kind.as_str())
        } else {
            self.kind.as_str().to_string()
        }
    }

    /// Marks this requirement as taking part in a group constraint.
    pub fn mark_recurs(&mut self) {
        self.recurs = true;
    }
}

impl Serialize for NormalizedRequirement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.type_name())?;
        map.serialize_entry("description", &self.description)?;
        if let Some(count) = self.count {
            map.serialize_entry("count", &count)?;
        }
        if let Some(ref count_type) = self.count_type {
            map.serialize_entry("countType", count_type)?;
        }
        if let Some(ref courses) = self.courses {
            map.serialize_entry("courses", courses)?;
        }
        if let Some(ref categories) = self.categories {
            map.serialize_entry("categories", categories)?;
        }
        if let Some(ref programs) = self.programs {
            map.serialize_entry("programs", programs)?;
        }
        if let Some(ref dependent_reqs) = self.dependent_reqs {
            map.serialize_entry("dependentReqs", dependent_reqs)?;
        }
        if let Some(ref recurs_reqs) = self.recurs_reqs {
            map.serialize_entry("recursReqs", recurs_reqs)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_type_parse() {
        assert_eq!(RawType::parse("MINIMUM"), RawType::Minimum);
        assert_eq!(RawType::parse(" groupminimum "), RawType::GroupMinimum);
        assert_eq!(
            RawType::parse("WEIGHTED"),
            RawType::Other("WEIGHTED".to_string())
        );
        assert_eq!(RawType::Other("WEIGHTED".to_string()).as_str(), "WEIGHTED");
    }

    #[test]
    fn test_count_type_parse() {
        assert_eq!(CountType::parse("FCES"), CountType::Fces);
        assert_eq!(CountType::parse(""), CountType::Unspecified);
        assert!(CountType::parse("gpa").is_standing());
        assert!(!CountType::parse("COURSES").is_standing());
    }

    #[test]
    fn test_raw_requirement_accepts_objects_and_strings() {
        let raw: RawRequirement = serde_json::from_str(
            r#"{
                "type": "MINIMUM",
                "countType": "COURSES",
                "count": "1",
                "displayPrefix": "Completion of",
                "subItemConnectorString": "or",
                "displaySuffix": null,
                "requisiteItems": [{"code": "CSC236H1", "display": "x"}, "CSC*"]
            }"#,
        )
        .unwrap();
        assert_eq!(raw.raw_type(), RawType::Minimum);
        assert_eq!(raw.count_type(), CountType::Courses);
        assert_eq!(raw.count, Some(1.0));
        assert_eq!(raw.display_suffix, "");
        assert_eq!(raw.codes().collect::<Vec<_>>(), vec!["CSC236H1", "CSC*"]);
    }

    #[test]
    fn test_connector_alias() {
        let raw: RawRequirement =
            serde_json::from_str(r#"{"type": "LIST", "connector": "and"}"#).unwrap();
        assert_eq!(raw.sub_item_connector_string, "and");
    }

    #[test]
    fn test_type_name_with_recurs() {
        let mut req = NormalizedRequirement::bare(RequirementKind::CoursesMin, "x");
        assert_eq!(req.type_name(), "COURSES_MIN");
        req.mark_recurs();
        assert_eq!(req.type_name(), "COURSES_MIN_RECURS");
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let req = NormalizedRequirement::unverifiable("Minimum GPA 3.0", "GPA");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "UNVERIFIABLE",
                "description": "Minimum GPA 3.0",
                "countType": "GPA"
            })
        );
    }
}
