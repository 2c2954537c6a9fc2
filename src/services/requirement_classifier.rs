//! Requirement classifier.
//!
//! Maps each raw requirement node onto the closed [`RequirementKind`]
//! taxonomy in two passes over one owner's requirements:
//!
//! 1. Every node is classified on its own. The requisite codes are split by
//!    kind, then the `(type, countType)` pair is matched against an ordered
//!    rule table. The first matching rule decides the kind and which fields
//!    survive.
//! 2. Group constraints (`GROUP_MIN`, `GROUP_MAX`) are applied to the siblings
//!    they name. A sibling may come later in source order than the group, so
//!    this pass only starts once every node has been classified.
//!
//! # Rule Table
//!
//! | Raw type | Condition | Kind |
//! |----------|-----------|------|
//! | NOTE | | `NOTE` |
//! | REUSE | | `COMPLETE` |
//! | COMPLEX | | `UNVERIFIABLE` |
//! | MINIMUM | GPA, YOS, AVERAGE, or a grade-worded prefix | `UNVERIFIABLE` |
//! | MINIMUM | sibling references present | `REQUIREMENTS_MIN` |
//! | MINIMUM | COURSES | `COURSES_MIN` / `CATEGORIES_COURSES_MIN` |
//! | MINIMUM | FCES | `FCES_MIN` |
//! | MINIMUM | SUBJECT_POSTS | `PROGRAM_MIN` |
//! | LIST | | `COURSES_LIST` |
//! | NO_REUSE | | `REQUIREMENTS_NO_REUSE` |
//! | GROUPMINIMUM | | `GROUP_MIN` |
//! | GROUPMAXIMUM | | `GROUP_MAX` |
//!
//! Anything else is `UNVERIFIABLE` and reported.

use crate::models::code::dependent_refs_in;
use crate::models::{
    CodePartition, CountType, DiagnosticKind, Diagnostics, NormalizedRequirement, RawRequirement,
    RawType, RequirementKind, RequirementSet,
};
use crate::services::description::describe;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Everything a rule may look at for one node.
pub struct RuleInput<'a> {
    /// The node being classified.
    pub raw: &'a RawRequirement,
    /// Parsed `type`.
    pub raw_type: RawType,
    /// Parsed `countType`.
    pub count_type: CountType,
    /// Requisite codes split by kind.
    pub partition: CodePartition,
    /// Collapsed description.
    pub description: String,
}

/// One row of the classification table.
pub struct ClassificationRule {
    /// Short name used in logs.
    pub name: &'static str,
    /// Whether this row applies.
    pub matches: fn(&RuleInput<'_>) -> bool,
    /// Builds the normalized node.
    pub build: fn(&RuleInput<'_>) -> NormalizedRequirement,
}

/// The classification table, in priority order.
pub static CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "note",
        matches: |input| input.raw_type == RawType::Note,
        build: |input| NormalizedRequirement::bare(RequirementKind::Note, &input.description),
    },
    ClassificationRule {
        name: "reuse",
        matches: |input| input.raw_type == RawType::Reuse,
        build: |input| NormalizedRequirement::bare(RequirementKind::Complete, &input.description),
    },
    ClassificationRule {
        name: "complex",
        matches: |input| input.raw_type == RawType::Complex,
        build: unverifiable,
    },
    ClassificationRule {
        name: "minimum_standing",
        matches: |input| {
            input.raw_type == RawType::Minimum
                && (input.count_type.is_standing()
                    || input.raw.display_prefix.to_lowercase().contains("grade"))
        },
        build: unverifiable,
    },
    ClassificationRule {
        name: "minimum_requirements",
        matches: |input| {
            input.raw_type == RawType::Minimum && !input.partition.dependents.is_empty()
        },
        build: |input| NormalizedRequirement {
            count: input.raw.count,
            dependent_reqs: Some(input.partition.dependents.clone()),
            ..NormalizedRequirement::bare(RequirementKind::RequirementsMin, &input.description)
        },
    },
    ClassificationRule {
        name: "minimum_courses",
        matches: |input| {
            input.raw_type == RawType::Minimum && input.count_type == CountType::Courses
        },
        build: |input| {
            let kind = if input.partition.courses.is_empty()
                && !input.partition.categories.is_empty()
            {
                RequirementKind::CategoriesCoursesMin
            } else {
                RequirementKind::CoursesMin
            };
            with_courses(kind, input)
        },
    },
    ClassificationRule {
        name: "minimum_fces",
        matches: |input| input.raw_type == RawType::Minimum && input.count_type == CountType::Fces,
        build: |input| with_courses(RequirementKind::FcesMin, input),
    },
    ClassificationRule {
        name: "minimum_programs",
        matches: |input| {
            input.raw_type == RawType::Minimum && input.count_type == CountType::SubjectPosts
        },
        build: |input| NormalizedRequirement {
            count: input.raw.count,
            programs: Some(input.partition.programs.clone()),
            ..NormalizedRequirement::bare(RequirementKind::ProgramMin, &input.description)
        },
    },
    ClassificationRule {
        name: "list",
        matches: |input| input.raw_type == RawType::List,
        build: |input| NormalizedRequirement {
            courses: Some(input.partition.courses.clone()),
            ..NormalizedRequirement::bare(RequirementKind::CoursesList, &input.description)
        },
    },
    ClassificationRule {
        name: "no_reuse",
        matches: |input| input.raw_type == RawType::NoReuse,
        build: |input| NormalizedRequirement {
            dependent_reqs: Some(input.partition.dependents.clone()),
            ..NormalizedRequirement::bare(RequirementKind::RequirementsNoReuse, &input.description)
        },
    },
    ClassificationRule {
        name: "group_minimum",
        matches: |input| input.raw_type == RawType::GroupMinimum,
        build: |input| group(RequirementKind::GroupMin, input),
    },
    ClassificationRule {
        name: "group_maximum",
        matches: |input| input.raw_type == RawType::GroupMaximum,
        build: |input| group(RequirementKind::GroupMax, input),
    },
];

fn unverifiable(input: &RuleInput<'_>) -> NormalizedRequirement {
    NormalizedRequirement::unverifiable(&input.description, input.raw.count_type.as_str())
}

fn with_courses(kind: RequirementKind, input: &RuleInput<'_>) -> NormalizedRequirement {
    NormalizedRequirement {
        count: input.raw.count,
        courses: Some(input.partition.courses.clone()),
        categories: Some(input.partition.categories.clone()),
        ..NormalizedRequirement::bare(kind, &input.description)
    }
}

fn group(kind: RequirementKind, input: &RuleInput<'_>) -> NormalizedRequirement {
    NormalizedRequirement {
        recurs_reqs: Some(dependent_refs_in(&input.description)),
        ..with_courses(kind, input)
    }
}

/// Classifies raw requirement nodes.
///
/// Stateless apart from its rule table; one classifier can serve a whole batch.
#[derive(Clone, Copy)]
pub struct RequirementClassifier {
    rules: &'static [ClassificationRule],
}

impl Default for RequirementClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementClassifier {
    /// Creates a classifier over the standard rule table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: CLASSIFICATION_RULES,
        }
    }

    /// Classifies one node in isolation.
    ///
    /// Never fails. An unmatched `(type, countType)` pair, or a requisite code
    /// that fits no code kind, yields `UNVERIFIABLE` and a diagnostic.
    pub fn classify(
        &self,
        owner: &str,
        key: &str,
        raw: &RawRequirement,
        diagnostics: &mut Diagnostics,
    ) -> NormalizedRequirement {
        let input = RuleInput {
            raw,
            raw_type: raw.raw_type(),
            count_type: raw.count_type(),
            partition: CodePartition::from_codes(raw.codes()),
            description: describe(raw),
        };

        let mut normalized = match self.rules.iter().find(|rule| (rule.matches)(&input)) {
            Some(rule) => {
                debug!(owner, key, rule = rule.name, "classified requirement");
                (rule.build)(&input)
            },
            None => {
                diagnostics.push(
                    owner,
                    Some(key),
                    DiagnosticKind::UnmatchedCombination {
                        raw_type: input.raw_type.to_string(),
                        count_type: input.count_type.to_string(),
                    },
                );
                unverifiable(&input)
            },
        };

        if !input.partition.unclassifiable.is_empty() {
            for code in &input.partition.unclassifiable {
                diagnostics.push(
                    owner,
                    Some(key),
                    DiagnosticKind::UnclassifiableCode { code: code.clone() },
                );
            }
            normalized = unverifiable(&input);
        }

        metrics::counter!("requirements_classified_total", "kind" => normalized.kind.as_str())
            .increment(1);
        normalized
    }

    /// Classifies every node of one owner, then applies group constraints.
    ///
    /// Returns the normalized set, in source order, and any diagnostics.
    #[instrument(skip(self, nodes), fields(nodes = nodes.len()))]
    pub fn classify_all(
        &self,
        owner: &str,
        nodes: &[(String, RawRequirement)],
    ) -> (RequirementSet, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let mut set = RequirementSet::new();
        let mut raws: HashMap<&str, &RawRequirement> = HashMap::with_capacity(nodes.len());

        for (key, raw) in nodes {
            let normalized = self.classify(owner, key, raw, &mut diagnostics);
            raws.insert(key.as_str(), raw);
            set.insert(key.clone(), normalized);
        }

        apply_group_constraints(owner, &mut set, &raws, &mut diagnostics);
        (set, diagnostics)
    }
}

/// Second pass: mark every sibling a group constraint refers to.
///
/// A group whose references include a REUSE or NO_REUSE sibling is downgraded
/// to `UNVERIFIABLE` and marks nothing. References to keys the owner does not
/// have are reported and skipped.
fn apply_group_constraints(
    owner: &str,
    set: &mut RequirementSet,
    raws: &HashMap<&str, &RawRequirement>,
    diagnostics: &mut Diagnostics,
) {
    let groups: Vec<(String, Vec<String>)> = set
        .iter()
        .filter(|(_, requirement)| requirement.kind.is_group())
        .map(|(key, requirement)| {
            (
                key.to_string(),
                requirement.recurs_reqs.clone().unwrap_or_default(),
            )
        })
        .collect();

    for (group_key, references) in groups {
        let over_reuse: Vec<&String> = references
            .iter()
            .filter(|r| {
                raws.get(r.as_str()).is_some_and(|raw| {
                    matches!(raw.raw_type(), RawType::Reuse | RawType::NoReuse)
                })
            })
            .collect();

        if !over_reuse.is_empty() {
            for reference in over_reuse {
                diagnostics.push(
                    owner,
                    Some(&group_key),
                    DiagnosticKind::GroupOverReuse {
                        code: reference.clone(),
                    },
                );
            }
            let count_type = raws
                .get(group_key.as_str())
                .map(|raw| raw.count_type.clone())
                .unwrap_or_default();
            if let Some(group) = set.get_mut(&group_key) {
                *group = NormalizedRequirement::unverifiable(group.description.clone(), count_type);
            }
            continue;
        }

        for reference in references.iter().filter(|r| **r != group_key) {
            match set.get_mut(reference) {
                Some(sibling) => {
                    debug!(owner, group = %group_key, sibling = %reference, "marking recurs");
                    sibling.mark_recurs();
                },
                None => diagnostics.push(
                    owner,
                    Some(&group_key),
                    DiagnosticKind::DanglingReference {
                        code: reference.clone(),
                    },
                ),
            }
        }
    }
}
