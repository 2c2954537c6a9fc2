//! Per-record diagnostics surfaced to the aggregation layer.
//!
//! Nothing in the classification core aborts a batch. Anything that had to be
//! repaired locally is recorded here so a reviewer can see which outputs are
//! approximate.

use serde::Serialize;
use std::fmt;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A category code had no record, or its record failed to load.
    UnresolvedCategory {
        /// The code.
        code: String,
    },
    /// A terminal category item matched no row of the pattern table.
    UnknownPattern {
        /// The code.
        code: String,
    },
    /// A requisite code matched none of the code kinds.
    UnclassifiableCode {
        /// The code.
        code: String,
    },
    /// A `(type, countType)` pair outside the taxonomy.
    UnmatchedCombination {
        /// Raw type.
        raw_type: String,
        /// Raw count type.
        count_type: String,
    },
    /// A group constraint names a requirement the owner does not have.
    DanglingReference {
        /// The missing key.
        code: String,
    },
    /// A group constraint names a requirement classified from REUSE or NO_REUSE.
    GroupOverReuse {
        /// The referenced key.
        code: String,
    },
    /// A whole input record could not be decoded.
    MalformedRecord {
        /// Decoder message.
        cause: String,
    },
}

impl DiagnosticKind {
    /// Short label used as a metrics tag.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UnresolvedCategory { .. } => "unresolved_category",
            Self::UnknownPattern { .. } => "unknown_pattern",
            Self::UnclassifiableCode { .. } => "unclassifiable_code",
            Self::UnmatchedCombination { .. } => "unmatched_combination",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::GroupOverReuse { .. } => "group_over_reuse",
            Self::MalformedRecord { .. } => "malformed_record",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedCategory { code } => write!(f, "category '{code}' did not resolve"),
            Self::UnknownPattern { code } => write!(f, "no pattern rule for '{code}'"),
            Self::UnclassifiableCode { code } => write!(f, "unclassifiable code '{code}'"),
            Self::UnmatchedCombination {
                raw_type,
                count_type,
            } => write!(f, "unmatched combination ({raw_type}, {count_type})"),
            Self::DanglingReference { code } => {
                write!(f, "group references missing requirement '{code}'")
            },
            Self::GroupOverReuse { code } => {
                write!(f, "group references reuse requirement '{code}'")
            },
            Self::MalformedRecord { cause } => write!(f, "malformed record: {cause}"),
        }
    }
}

/// One diagnostic, located by owner and requirement key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Owning program, course, or category code.
    pub owner: String,
    /// Requirement key within the owner, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// What went wrong.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            Some(ref key) => write!(f, "{}/{}: {}", self.owner, key, self.kind),
            None => write!(f, "{}: {}", self.owner, self.kind),
        }
    }
}

/// Collected diagnostics for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Records a diagnostic, logging it and bumping its counter.
    pub fn push(&mut self, owner: impl Into<String>, key: Option<&str>, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            owner: owner.into(),
            key: key.map(ToString::to_string),
            kind,
        };
        tracing::warn!(
            owner = %diagnostic.owner,
            key = diagnostic.key.as_deref().unwrap_or(""),
            kind = diagnostic.kind.label(),
            "{}",
            diagnostic.kind
        );
        metrics::counter!("requirement_diagnostics_total", "kind" => diagnostic.kind.label())
            .increment(1);
        self.items.push(diagnostic);
    }

    /// Appends every diagnostic from another list.
    pub fn extend(&mut self, other: Self) {
        self.items.extend(other.items);
    }

    /// Iterates diagnostics in the order recorded.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Returns diagnostics for one owner.
    pub fn for_owner<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.items.iter().filter(move |d| d.owner == owner)
    }

    /// Number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
