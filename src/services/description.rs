//! Requirement description assembly.

use crate::models::RawRequirement;

/// Builds the human-readable description of a requirement.
///
/// `displayPrefix`, the requisite codes joined by the connector, and
/// `displaySuffix`, separated by single spaces, with all runs of whitespace
/// collapsed and the ends trimmed.
#[must_use]
pub fn describe(raw: &RawRequirement) -> String {
    let connector = format!(" {} ", raw.sub_item_connector_string);
    let items = raw
        .requisite_items
        .iter()
        .map(|item| item.code())
        .collect::<Vec<_>>()
        .join(&connector);
    collapse_whitespace(&format!(
        "{} {} {}",
        raw.display_prefix, items, raw.display_suffix
    ))
}

/// Collapses every whitespace run to one space and trims both ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequisiteItem;

    fn raw(prefix: &str, connector: &str, suffix: &str, codes: &[&str]) -> RawRequirement {
        RawRequirement {
            display_prefix: prefix.to_string(),
            sub_item_connector_string: connector.to_string(),
            display_suffix: suffix.to_string(),
            requisite_items: codes
                .iter()
                .map(|c| RequisiteItem((*c).to_string()))
                .collect(),
            ..RawRequirement::default()
        }
    }

    #[test]
    fn test_describe_joins_with_connector() {
        let req = raw("1.0 credit from", "or", "", &["CSC236H1", "CSC*"]);
        assert_eq!(describe(&req), "1.0 credit from CSC236H1 or CSC*");
    }

    #[test]
    fn test_describe_collapses_whitespace() {
        let req = raw("  Completion of\n", " and ", "\t(with 70%) ", &["CSC148H1", "CSC165H1"]);
        assert_eq!(
            describe(&req),
            "Completion of CSC148H1 and CSC165H1 (with 70%)"
        );
    }

    #[test]
    fn test_describe_without_items() {
        let req = raw("Note:", "", "Consult the department.", &[]);
        assert_eq!(describe(&req), "Note: Consult the department.");
        assert_eq!(describe(&RawRequirement::default()), "");
    }
}
