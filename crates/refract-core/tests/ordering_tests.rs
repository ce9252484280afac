#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::cmp::Ordering;

use common::*;
use refract_core::{
    structural_compare, Comparator, CompareBuilder, ErrorKind, OrderingOptions, SelectOptions,
    Value,
};

fn compare<L: refract_core::Inspect + ?Sized, R: refract_core::Inspect + ?Sized>(
    lhs: &L,
    rhs: &R,
) -> i32 {
    structural_compare(lhs, rhs, &OrderingOptions::default()).unwrap()
}

#[test]
fn test_record_scenario_true_sorts_after_false() {
    assert_eq!(compare(&record(1, "a", true), &record(1, "a", false)), 1);
    assert_eq!(compare(&record(1, "a", false), &record(1, "a", true)), -1);
    assert_eq!(compare(&record(1, "a", true), &record(1, "a", true)), 0);
}

#[test]
fn test_first_differing_field_decides() {
    assert_eq!(compare(&record(1, "z", false), &record(2, "a", true)), -1);
    assert_eq!(compare(&record(2, "a", true), &record(2, "b", false)), -1);
}

#[test]
fn test_shorter_array_sorts_first() {
    assert_eq!(compare(&vec![1, 2], &vec![1, 2, 3]), -1);
    assert_eq!(compare(&vec![9], &vec![1, 2]), -1);
    assert_eq!(compare(&vec![1, 3], &vec![1, 2]), 1);
}

#[test]
fn test_absent_sorts_first() {
    assert_eq!(compare(&None::<i32>, &Some(0)), -1);
    assert_eq!(compare(&Some(0), &None::<i32>), 1);
    assert_eq!(compare(&None::<i32>, &None::<i32>), 0);
}

#[test]
fn test_unrelated_types_are_a_mismatch() {
    let d = dog("rex", "lab", None);
    let p = Plant {
        name: "rex".to_string(),
        legs: 4,
    };
    let err = structural_compare(&d, &p, &OrderingOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn test_different_kinds_are_a_mismatch() {
    let err = structural_compare(&1i32, &"1", &OrderingOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    let err = structural_compare(&vec![1i32], &vec![1i64], &OrderingOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn test_related_types_compare_common_fields() {
    let pet = Pet {
        base: animal("tom", 4),
    };
    assert_eq!(compare(&pet, &animal("tom", 4)), 0);
    assert_eq!(compare(&pet, &animal("tom", 5)), -1);

    // Dog's own fields are outside the common type
    let d = dog("rex", "lab", None);
    assert_eq!(compare(&d, &animal("rex", 4)), 0);
}

#[test]
fn test_nested_objects_compare_field_by_field() {
    assert_eq!(compare(&line(0, 0, 1, 1), &line(0, 0, 1, 2)), -1);
    assert_eq!(compare(&line(0, 1, 0, 0), &line(0, 0, 9, 9)), 1);
}

#[test]
fn test_excluded_fields_do_not_order() {
    let options = OrderingOptions::from(SelectOptions::default().excluding(["x"]));
    let order = structural_compare(&record(1, "a", true), &record(2, "a", true), &options).unwrap();
    assert_eq!(order, 0);
}

#[test]
fn test_comparator_replaces_scalar_rule() {
    let reversed = Comparator::new(|l, r| match (l, r) {
        (Value::I32(a), Value::I32(b)) => b.cmp(&a),
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    });
    let options = OrderingOptions::default().with_comparator(reversed);
    let order = structural_compare(&record(1, "a", true), &record(2, "a", true), &options).unwrap();
    assert_eq!(order, 1);
}

#[test]
fn test_builder_chain() {
    let (a, b) = (record(1, "a", true), record(1, "a", false));
    let order = CompareBuilder::new()
        .append(&a.x, &b.x)
        .append(&a.y, &b.y)
        .append(&a.z, &b.z)
        .build()
        .unwrap();
    assert_eq!(order, 1);

    let order = CompareBuilder::new()
        .append_super(-7)
        .reflection_append(&a, &b)
        .build()
        .unwrap();
    assert_eq!(order, -1);

    let case_blind = Comparator::new(|l, r| match (l, r) {
        (Value::Str(a), Value::Str(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        _ => Ordering::Less,
    });
    let order = CompareBuilder::new()
        .append_with("ABC", "abc", &case_blind)
        .append(&1, &2)
        .build()
        .unwrap();
    assert_eq!(order, -1);
}
