// tests/property/path_roundtrip_test.rs

//! Property-based tests for attribute paths
//! Tests that printing a parsed path and parsing it again preserves its segments,
//! and that the parser never panics on arbitrary input.

use beangate::core::path::{PathExpression, PathSegment, resolve};
use beangate::core::value::Value;
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = PathSegment> {
    prop_oneof![
        "[a-zA-Z0-9_.\\[\\]\\\\ -]{1,12}".prop_map(PathSegment::Field),
        "[a-zA-Z0-9_.\\[\\]\\\\ -]{0,12}".prop_map(PathSegment::Selector),
    ]
}

fn path_strategy() -> impl Strategy<Value = PathExpression> {
    (
        "[a-zA-Z0-9_.\\[\\]\\\\]{1,12}",
        prop::collection::vec(segment_strategy(), 0..6),
    )
        .prop_map(|(attribute, rest)| {
            let mut segments = vec![PathSegment::Field(attribute)];
            segments.extend(rest);
            PathExpression::from_segments(segments).unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_path_display_parse_roundtrip(path in path_strategy()) {
        let printed = path.to_string();
        let reparsed = PathExpression::parse(&printed).unwrap();
        prop_assert_eq!(reparsed, path);
    }

    #[test]
    fn test_parse_never_panics(input in ".{0,64}") {
        if let Ok(path) = PathExpression::parse(&input) {
            prop_assert!(matches!(path.segments()[0], PathSegment::Field(_)));
            prop_assert!(!path.attribute().is_empty());
        }
    }

    #[test]
    fn test_null_root_always_resolves_to_null(path in path_strategy()) {
        prop_assert_eq!(resolve(&Value::Null, path.rest()).unwrap(), Value::Null);
    }

    #[test]
    fn test_sequence_index_within_bounds(len in 1usize..20, index in 0usize..40) {
        let root = Value::sequence((0..len as i64).map(Value::from));
        let path = PathExpression::parse(&format!("Items[{index}]")).unwrap();
        let result = resolve(&root, path.rest());
        if index < len {
            prop_assert_eq!(result.unwrap(), Value::from(index as i64));
        } else {
            prop_assert!(result.is_err());
        }
    }
}
