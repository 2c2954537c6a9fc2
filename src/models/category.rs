//! Category records, raw and compiled.

use super::raw::{lenient_bool, lenient_string, null_as_default};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One entry of a category's include or exclude list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryItem {
    /// The referenced code.
    #[serde(deserialize_with = "lenient_string")]
    pub code: String,
    /// Whether the code is itself a category that resolves to another record.
    #[serde(deserialize_with = "lenient_bool")]
    pub category_entity: bool,
    /// Whether the code names a single course.
    #[serde(deserialize_with = "lenient_bool")]
    pub course_entity: bool,
}

impl CategoryItem {
    /// An item pointing at another category record.
    #[must_use]
    pub fn category(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            category_entity: true,
            course_entity: false,
        }
    }

    /// A terminal item: a course code or a wildcard shorthand.
    #[must_use]
    pub fn terminal(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            category_entity: false,
            course_entity: false,
        }
    }
}

/// A category record as delivered by the acquisition layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCategory {
    /// The category code.
    #[serde(deserialize_with = "lenient_string")]
    pub code: String,
    /// Human-readable name.
    #[serde(deserialize_with = "lenient_string")]
    pub display: String,
    /// Items whose courses belong to the category.
    #[serde(deserialize_with = "null_as_default")]
    pub include_items: Vec<CategoryItem>,
    /// Items whose courses are removed from the category.
    #[serde(deserialize_with = "null_as_default")]
    pub exclude_items: Vec<CategoryItem>,
}

/// The compiled form of one category.
///
/// The pattern is shared: every lookup of the same code within a run hands
/// back the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCategory {
    /// Regex source recognizing the category's course codes. Empty when
    /// nothing resolved.
    pub pattern: Arc<str>,
    /// False if any referenced item failed to resolve.
    pub resolvable: bool,
}

impl CompiledCategory {
    /// A compiled category.
    #[must_use]
    pub fn new(pattern: impl Into<Arc<str>>, resolvable: bool) -> Self {
        Self {
            pattern: pattern.into(),
            resolvable,
        }
    }

    /// The result for a code that could not be resolved.
    #[must_use]
    pub fn unresolved() -> Self {
        Self::new("", false)
    }

    /// Returns true if the pattern is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

/// Aggregated output for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// The compiled regex source.
    pub regex: String,
    /// `"<code>: <display>"`, trimmed.
    pub display: String,
    /// Whether every referenced item resolved.
    pub validatable: bool,
}

impl CategoryEntry {
    /// Builds the output entry from a raw record and its compiled form.
    #[must_use]
    pub fn new(raw: &RawCategory, compiled: &CompiledCategory) -> Self {
        Self {
            regex: compiled.pattern.to_string(),
            display: format!("{}: {}", raw.code, raw.display).trim().to_string(),
            validatable: compiled.resolvable,
        }
    }
}
