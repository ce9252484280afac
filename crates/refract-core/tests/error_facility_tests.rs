#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use refract_core::{
    render, structural_compare, structural_diff, structural_equals, DiffOptions,
    EqualityOptions, ErrorKind, HashBuilder, OrderingOptions, RefractError, RenderBuilder,
    RenderOptions, JSON_STYLE,
};

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ErrorKind::Access, "ERR_ACCESS"),
        (ErrorKind::TypeMismatch, "ERR_TYPE_MISMATCH"),
        (ErrorKind::Usage, "ERR_USAGE"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_access_error_names_the_innermost_field() {
    let outer = node(1);
    let inner = node(2);
    *outer.next.borrow_mut() = Some(inner.clone());
    let other = node(1);
    *other.next.borrow_mut() = Some(node(2));

    let _held = inner.next.borrow_mut();
    let err = structural_equals(&*outer, &*other, &EqualityOptions::default()).unwrap_err();
    assert_eq!(err.code(), "ERR_ACCESS");
    match &err {
        RefractError::Access { field, reason, .. } => {
            assert_eq!(field, "next");
            assert!(reason.contains("borrowed"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().starts_with("cannot read field 'next'"));
}

#[test]
fn test_type_mismatch_names_both_types() {
    let a = animal("fern", 0);
    let p = Plant {
        name: "fern".to_string(),
        legs: 0,
    };
    let err = structural_compare(&a, &p, &OrderingOptions::default()).unwrap_err();
    match err {
        RefractError::TypeMismatch { left, right } => {
            assert!(left.ends_with("::Animal"));
            assert!(right.ends_with("::Plant"));
        }
        other => panic!("unexpected error: {other}"),
    }
    let err = structural_diff(&a, &p, &DiffOptions::default()).unwrap_err();
    assert_eq!(err.code(), "ERR_TYPE_MISMATCH");
}

#[test]
fn test_usage_errors_from_json_style() {
    let r = record(1, "a", true);
    let err = RenderBuilder::new(&r, &JSON_STYLE)
        .append_unnamed(&r.x)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);

    let err = render(&account(1, "x"), &JSON_STYLE, &RenderOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[test]
fn test_builders_keep_the_first_error() {
    let g = poisoned(1);
    let err = HashBuilder::new()
        .append(&1)
        .reflection_append(&g)
        .append("later")
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        RefractError::access(
            refract_core::Reflect::type_info(&g).name(),
            "value",
            "lock is poisoned"
        )
    );
}
