//! Property-based tests for the code vocabulary and both compilers.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Exact course codes compile to themselves
//! - Exclude-only categories have no include group
//! - Every non-empty code lands in exactly one kind, or none
//! - Descriptions never carry runs of whitespace
//! - Group constraints never change the group itself

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use dxnorm::io::InMemoryCategories;
use dxnorm::models::code::{COURSE_CODE, PROGRAM_CODE, is_dependent_ref};
use dxnorm::models::{
    CategoryItem, CodeKind, RawCategory, RawRequirement, RequirementKind, RequisiteItem, classify,
};
use dxnorm::services::description::describe;
use dxnorm::services::pattern_table;
use dxnorm::{CategoryCompiler, RequirementClassifier};
use proptest::prelude::*;

fn st_george_course() -> impl Strategy<Value = String> {
    "[A-Z]{3}[0-9]{3}[HY][01]"
}

proptest! {
    /// Property: an exact course code expands to itself.
    #[test]
    fn prop_exact_course_is_identity(code in "[A-Z]{3}[A-Z0-9][0-9]{2}[HY][0-9]") {
        prop_assert_eq!(pattern_table::expand(&code), Some(code.clone()));
    }

    /// Property: a category with only excludes compiles to a bare lookahead.
    #[test]
    fn prop_excludes_only_shape(codes in prop::collection::vec(st_george_course(), 1..6)) {
        let store = InMemoryCategories::from_records(vec![RawCategory {
            code: "EXCL".to_string(),
            exclude_items: codes.iter().map(CategoryItem::terminal).collect(),
            ..RawCategory::default()
        }]);
        let mut compiler = CategoryCompiler::new(&store);
        let compiled = compiler.compile("EXCL");

        prop_assert_eq!(&*compiled.pattern, format!("(?!{})", codes.join("|")));
        prop_assert!(compiled.resolvable);
    }

    /// Property: a second compile returns the same allocation.
    #[test]
    fn prop_compile_is_memoized(dept in "[A-Z]{3}") {
        let store = InMemoryCategories::from_records(vec![RawCategory {
            code: "DEPT".to_string(),
            include_items: vec![CategoryItem::terminal(format!("{dept}*"))],
            ..RawCategory::default()
        }]);
        let mut compiler = CategoryCompiler::new(&store);
        let first = compiler.compile("DEPT");
        let second = compiler.compile("DEPT");

        prop_assert!(std::sync::Arc::ptr_eq(&first.pattern, &second.pattern));
        prop_assert_eq!(compiler.cache_len(), 1);
    }

    /// Property: classification agrees with the vocabulary patterns and is
    /// exclusive.
    #[test]
    fn prop_classify_is_exclusive(code in "[A-Za-z0-9*=() ]{1,12}") {
        match classify(&code) {
            Ok(CodeKind::Dependent) => prop_assert!(is_dependent_ref(&code)),
            Ok(CodeKind::Program) => {
                prop_assert!(PROGRAM_CODE.is_match(&code));
                prop_assert!(!is_dependent_ref(&code));
            },
            Ok(CodeKind::Course) => {
                prop_assert!(COURSE_CODE.is_match(&code));
                prop_assert!(!PROGRAM_CODE.is_match(&code));
            },
            Ok(CodeKind::Category) => {
                prop_assert!(!COURSE_CODE.is_match(&code));
                prop_assert!(!code.starts_with(' ') && !code.ends_with(' '));
            },
            Err(_) => prop_assert!(code.starts_with(' ') || code.ends_with(' ')),
        }
    }

    /// Property: descriptions are trimmed and single-spaced.
    #[test]
    fn prop_description_collapsed(
        prefix in "[ a-z\t\n]{0,20}",
        connector in "[ a-z]{0,5}",
        suffix in "[ a-z\n]{0,20}",
        codes in prop::collection::vec(st_george_course(), 0..4),
    ) {
        let raw = RawRequirement {
            display_prefix: prefix,
            sub_item_connector_string: connector,
            display_suffix: suffix,
            requisite_items: codes.into_iter().map(RequisiteItem).collect(),
            ..RawRequirement::default()
        };
        let description = describe(&raw);

        prop_assert_eq!(description.trim(), description.as_str());
        prop_assert!(!description.contains("  "));
        prop_assert!(!description.contains(['\t', '\n']));
    }

    /// Property: a group marks its sibling and keeps its own kind.
    #[test]
    fn prop_group_marks_sibling_only(index in 1u32..200, later in any::<bool>()) {
        let sibling_key = format!("Req{index}");
        let sibling = (
            sibling_key.clone(),
            RawRequirement {
                kind: "LIST".to_string(),
                requisite_items: vec![RequisiteItem("CSC148H1".to_string())],
                ..RawRequirement::default()
            },
        );
        let group = (
            "Req0".to_string(),
            RawRequirement {
                kind: "GROUPMINIMUM".to_string(),
                display_suffix: format!("from {sibling_key}"),
                ..RawRequirement::default()
            },
        );
        let nodes = if later { vec![group, sibling] } else { vec![sibling, group] };

        let (set, diagnostics) = RequirementClassifier::new().classify_all("ASMAJ1689", &nodes);
        prop_assert!(diagnostics.is_empty());
        prop_assert!(set.get(&sibling_key).unwrap().recurs);
        let group = set.get("Req0").unwrap();
        prop_assert_eq!(group.kind, RequirementKind::GroupMin);
        prop_assert!(!group.recurs);
    }
}
