//! Code classification vocabulary.
//!
//! Every requisite item and category item carries a code string. The fixed
//! patterns below sort a code into exactly one [`CodeKind`]. Both the
//! category compiler and the requirement classifier depend on this table.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Any undergraduate or graduate course code, e.g. `CSC236H1` or `PHL2000H`.
pub static COURSE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{3}[A-Z0-9][0-9]{2,3}[HY][0-9]?$").expect("static regex: course code")
});

/// Program codes: major, specialist, minor, focus, certificate.
pub static PROGRAM_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^AS(MAJ|SPE|MIN|FOC|CER)([0-9]{4}).?$").expect("static regex: program code")
});

/// References to a sibling requirement inside a program (`Req12`).
pub static REQUIREMENT_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Req[0-9]{1,3}$").expect("static regex: requirement ref"));

/// References to a sibling prerequisite inside a course (`P3`).
pub static PREREQUISITE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^P[0-9]{1,3}$").expect("static regex: prerequisite ref"));

/// Unanchored requirement references, for scanning description text.
pub static REQUIREMENT_REF_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(Req[0-9]{1,3}|P[0-9]{1,3})\b").expect("static regex: requirement ref scan")
});

/// St. George campus undergraduate courses only.
pub static ST_GEORGE_COURSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{3}[0-9]{3}[HY][01]$").expect("static regex: st george course")
});

/// The four disjoint kinds of code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    /// A single course, e.g. `CSC236H1`.
    Course,
    /// A program of study, e.g. `ASMAJ1689`.
    Program,
    /// A named or wildcard grouping of courses, e.g. `CSC*` or `BR=1`.
    Category,
    /// A reference to another requirement of the same owner, e.g. `Req3`.
    Dependent,
}

impl CodeKind {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Program => "program",
            Self::Category => "category",
            Self::Dependent => "dependent",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a code could not be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unclassifiable {
    /// The code is empty or whitespace only.
    Empty,
    /// The code matches none of the four kinds.
    Unknown(String),
}

/// Classifies a code against the fixed vocabulary.
///
/// Dependent references are tested first, then programs, then courses. Any
/// remaining code that starts and ends with a visible character and carries
/// no control characters is a category.
///
/// # Errors
///
/// Returns [`Unclassifiable::Empty`] for blank codes and
/// [`Unclassifiable::Unknown`] for codes with surrounding whitespace or
/// control characters.
pub fn classify(code: &str) -> Result<CodeKind, Unclassifiable> {
    if code.trim().is_empty() {
        return Err(Unclassifiable::Empty);
    }
    if is_dependent_ref(code) {
        return Ok(CodeKind::Dependent);
    }
    if PROGRAM_CODE.is_match(code) {
        return Ok(CodeKind::Program);
    }
    if COURSE_CODE.is_match(code) {
        return Ok(CodeKind::Course);
    }
    if is_category_shape(code) {
        return Ok(CodeKind::Category);
    }
    Err(Unclassifiable::Unknown(code.to_string()))
}

/// Returns true if the code references a sibling requirement or prerequisite.
pub fn is_dependent_ref(code: &str) -> bool {
    REQUIREMENT_REF.is_match(code) || PREREQUISITE_REF.is_match(code)
}

/// Returns true for St. George undergraduate course codes.
pub fn is_st_george_course(code: &str) -> bool {
    ST_GEORGE_COURSE.is_match(code)
}

/// Extracts the 4-digit study area of a program code.
pub fn program_area(code: &str) -> Option<&str> {
    PROGRAM_CODE
        .captures(code)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Collects every dependent-requirement code mentioned in free text, in order
/// of first appearance.
pub fn dependent_refs_in(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in REQUIREMENT_REF_IN_TEXT.find_iter(text) {
        if !found.iter().any(|f| f == m.as_str()) {
            found.push(m.as_str().to_string());
        }
    }
    found
}

fn is_category_shape(code: &str) -> bool {
    let starts_visible = code.chars().next().is_some_and(|c| !c.is_whitespace());
    let ends_visible = code.chars().last().is_some_and(|c| !c.is_whitespace());
    starts_visible && ends_visible && !code.chars().any(char::is_control)
}

/// Codes from one requisite list, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodePartition {
    /// Course codes.
    pub courses: Vec<String>,
    /// Program codes.
    pub programs: Vec<String>,
    /// Category codes.
    pub categories: Vec<String>,
    /// Sibling requirement references.
    pub dependents: Vec<String>,
    /// Non-empty codes that matched no kind.
    pub unclassifiable: Vec<String>,
}

impl CodePartition {
    /// Partitions codes by kind, preserving order. Empty codes are skipped.
    pub fn from_codes<'a, I>(codes: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut partition = Self::default();
        for code in codes {
            match classify(code) {
                Ok(CodeKind::Course) => partition.courses.push(code.to_string()),
                Ok(CodeKind::Program) => partition.programs.push(code.to_string()),
                Ok(CodeKind::Category) => partition.categories.push(code.to_string()),
                Ok(CodeKind::Dependent) => partition.dependents.push(code.to_string()),
                Err(Unclassifiable::Empty) => {},
                Err(Unclassifiable::Unknown(code)) => partition.unclassifiable.push(code),
            }
        }
        partition
    }

    /// Returns true if every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
            && self.programs.is_empty()
            && self.categories.is_empty()
            && self.dependents.is_empty()
            && self.unclassifiable.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("CSC236H1", CodeKind::Course ; "st george half course")]
    #[test_case("MAT137Y1", CodeKind::Course ; "full year course")]
    #[test_case("PHL2000H", CodeKind::Course ; "graduate course")]
    #[test_case("ASMAJ1689", CodeKind::Program ; "major")]
    #[test_case("ASSPE1689A", CodeKind::Program ; "specialist with suffix")]
    #[test_case("ASCER0010", CodeKind::Program ; "certificate")]
    #[test_case("Req3", CodeKind::Dependent ; "program requirement")]
    #[test_case("P12", CodeKind::Dependent ; "course prerequisite")]
    #[test_case("CSC*", CodeKind::Category ; "department wildcard")]
    #[test_case("*3*", CodeKind::Category ; "level wildcard")]
    #[test_case("BR=1", CodeKind::Category ; "breadth category")]
    #[test_case("* (GR)", CodeKind::Category ; "graduate wildcard")]
    fn test_classify(code: &str, expected: CodeKind) {
        assert_eq!(classify(code), Ok(expected));
    }

    #[test]
    fn test_classify_rejects_blank_and_padded() {
        assert_eq!(classify(""), Err(Unclassifiable::Empty));
        assert_eq!(classify("   "), Err(Unclassifiable::Empty));
        assert_eq!(
            classify(" CSC*"),
            Err(Unclassifiable::Unknown(" CSC*".to_string()))
        );
        assert_eq!(
            classify("CSC\u{7}*"),
            Err(Unclassifiable::Unknown("CSC\u{7}*".to_string()))
        );
    }

    #[test]
    fn test_partition_preserves_order_and_skips_empty() {
        let partition = CodePartition::from_codes([
            "CSC236H1", "", "CSC*", "Req2", "ASMIN1689", "CSC207H1", "Req5",
        ]);
        assert_eq!(partition.courses, vec!["CSC236H1", "CSC207H1"]);
        assert_eq!(partition.categories, vec!["CSC*"]);
        assert_eq!(partition.programs, vec!["ASMIN1689"]);
        assert_eq!(partition.dependents, vec!["Req2", "Req5"]);
        assert!(partition.unclassifiable.is_empty());
    }

    #[test]
    fn test_partition_empty_input() {
        let partition = CodePartition::from_codes(std::iter::empty());
        assert!(partition.is_empty());
    }

    #[test]
    fn test_dependent_refs_in_text() {
        let refs = dependent_refs_in("No more than 1.0 FCE from Req3, Req7 and Req3 combined");
        assert_eq!(refs, vec!["Req3", "Req7"]);
        assert!(dependent_refs_in("Requirement 3").is_empty());
    }

    #[test]
    fn test_program_area_and_campus() {
        assert_eq!(program_area("ASMAJ1689"), Some("1689"));
        assert_eq!(program_area("CSC236H1"), None);
        assert!(is_st_george_course("CSC236H1"));
        assert!(!is_st_george_course("CSCA08H3"));
    }
}
