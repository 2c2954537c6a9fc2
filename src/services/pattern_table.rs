//! Top-level category shorthands and the regexes they expand to.
//!
//! Terminal category items are either an exact course code or one of a few
//! wildcard shapes (`CSC*`, `*3*`, `PHL* (GR)`, ...). Rules are tried in
//! order and the first match wins.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

/// One row of the pattern table.
pub struct PatternRule {
    /// Recognizes the shorthand.
    pub matcher: Regex,
    /// Builds the course-code regex from the shorthand's captures.
    pub generate: fn(&Captures<'_>) -> String,
    /// Human-readable description of the row.
    pub description: &'static str,
}

fn group<'a>(caps: &'a Captures<'_>, index: usize) -> &'a str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// The ordered pattern table.
pub static PATTERN_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule {
            matcher: Regex::new(r"^\*([0-9A-Z])\*$").expect("static regex: level wildcard"),
            generate: |caps| format!("[A-Z][A-Z][A-Z]{}[0-9][0-9][HY]1", group(caps, 1)),
            description: "*L*: undergraduate course at level L, any department",
        },
        PatternRule {
            matcher: Regex::new(r"^([A-Z]{3})\*$").expect("static regex: department wildcard"),
            generate: |caps| format!("{}[0-9][0-9][0-9][HY]1", group(caps, 1)),
            description: "DDD*: undergraduate course in department DDD",
        },
        PatternRule {
            matcher: Regex::new(r"^([A-Z]{3}[0-9A-Z])\*$")
                .expect("static regex: department level wildcard"),
            generate: |caps| format!("{}[0-9][0-9][HY]1", group(caps, 1)),
            description: "DDDL*: undergraduate course in department DDD at level L",
        },
        PatternRule {
            matcher: Regex::new(r"^([A-Z]{3})\* \(GR\)$")
                .expect("static regex: graduate department wildcard"),
            generate: |caps| format!("{}[0-9][0-9][0-9][0-9][HY]", group(caps, 1)),
            description: "DDD* (GR): graduate course in department DDD",
        },
        PatternRule {
            matcher: Regex::new(r"^\*$").expect("static regex: anything"),
            generate: |_| ".*".to_string(),
            description: "*: anything",
        },
        PatternRule {
            matcher: Regex::new(r"^\* \(GR\)$").expect("static regex: any graduate course"),
            generate: |_| "[A-Z][A-Z][A-Z][0-9][0-9][0-9][0-9][HY]".to_string(),
            description: "* (GR): any graduate course",
        },
        PatternRule {
            matcher: Regex::new(r"^[A-Z][A-Z][A-Z][A-Z0-9][0-9][0-9][HY][0-9]$")
                .expect("static regex: exact course"),
            generate: |caps| group(caps, 0).to_string(),
            description: "exact course code",
        },
    ]
});

/// Returns the first rule that recognizes `code`.
pub fn matching_rule(code: &str) -> Option<&'static PatternRule> {
    PATTERN_RULES.iter().find(|rule| rule.matcher.is_match(code))
}

/// Expands a terminal shorthand into a course-code regex.
///
/// Returns `None` when no rule matches.
pub fn expand(code: &str) -> Option<String> {
    let rule = matching_rule(code)?;
    let caps = rule.matcher.captures(code)?;
    debug!(code, rule = rule.description, "expanded shorthand");
    Some((rule.generate)(&caps))
}
