#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use refract_core::diff::summary::DIFFERS_FROM;
use refract_core::{
    structural_diff, DiffOptions, ErrorKind, OwnedValue, SelectOptions, JSON_STYLE,
    SHORT_PREFIX_STYLE,
};

fn short() -> DiffOptions {
    DiffOptions::default().with_style(SHORT_PREFIX_STYLE.clone())
}

#[test]
fn test_record_scenario_has_one_entry() {
    let (a, b) = (record(1, "a", true), record(1, "a", false));
    let diff = structural_diff(&a, &b, &DiffOptions::default()).unwrap();
    assert_eq!(diff.len(), 1);
    let entry = &diff.entries()[0];
    assert_eq!(entry.path, "z");
    assert_eq!(entry.left, OwnedValue::Bool(true));
    assert_eq!(entry.right, OwnedValue::Bool(false));
}

#[test]
fn test_text_shows_only_differing_fields() {
    let (a, b) = (record(1, "a", true), record(2, "a", false));
    let diff = structural_diff(&a, &b, &short()).unwrap();
    assert_eq!(
        diff.to_text().unwrap(),
        format!("Record[x=1,z=true] {DIFFERS_FROM} Record[x=2,z=false]")
    );
    assert_eq!(diff.to_string(), diff.to_text().unwrap());
}

#[test]
fn test_text_in_json_style() {
    let (a, b) = (record(1, "a", true), record(1, "b", true));
    let options = DiffOptions::default().with_style(JSON_STYLE.clone());
    let diff = structural_diff(&a, &b, &options).unwrap();
    assert_eq!(
        diff.to_text().unwrap(),
        r#"{"y":"a"} differs from {"y":"b"}"#
    );
}

#[test]
fn test_display_lists_entries_when_style_cannot_render() {
    let (a, b) = (record(1, "a", true), record(2, "a", true));
    let mut style = JSON_STYLE.clone();
    style.default_full_detail = false;
    let diff = structural_diff(&a, &b, &DiffOptions::default().with_style(style)).unwrap();

    assert_eq!(diff.to_text().unwrap_err().kind(), ErrorKind::Usage);
    assert_eq!(diff.to_string(), "Record differs from Record (x: 1 -> 2)");
}

#[test]
fn test_equal_objects_have_empty_diff_and_text() {
    let (a, b) = (record(1, "a", true), record(1, "a", true));
    let diff = structural_diff(&a, &b, &DiffOptions::default()).unwrap();
    assert!(diff.is_empty());
    assert_eq!(diff.to_text().unwrap(), "");

    let diff = structural_diff(&a, &a, &DiffOptions::default()).unwrap();
    assert!(diff.is_empty());
}

#[test]
fn test_trivial_check_does_not_change_the_entries() {
    let (a, b) = (sample(), sample());
    let diff = structural_diff(&a, &b, &DiffOptions::default().without_trivial_check()).unwrap();
    assert!(diff.is_empty());

    let (a, b) = (record(1, "a", true), record(1, "b", false));
    let checked = structural_diff(&a, &b, &DiffOptions::default()).unwrap();
    let unchecked = structural_diff(&a, &b, &DiffOptions::default().without_trivial_check()).unwrap();
    assert_eq!(checked.entries(), unchecked.entries());
}

#[test]
fn test_composite_field_is_one_entry_by_default() {
    let (a, b) = (line(0, 0, 1, 1), line(0, 0, 1, 2));
    let diff = structural_diff(&a, &b, &short()).unwrap();
    assert_eq!(diff.len(), 1);
    let entry = diff.get("end").unwrap();
    assert_eq!(
        entry.left,
        OwnedValue::Object {
            type_name: "Point".to_string(),
            text: "Point[x=1,y=1]".to_string(),
        }
    );
    assert_eq!(
        diff.to_text().unwrap(),
        "Line[end=Point[x=1,y=1]] differs from Line[end=Point[x=1,y=2]]"
    );
}

#[test]
fn test_nested_diff_uses_dotted_paths() {
    let (a, b) = (line(0, 0, 1, 1), line(5, 0, 1, 2));
    let diff = structural_diff(&a, &b, &short().nested()).unwrap();
    let paths: Vec<_> = diff.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["start.x", "end.y"]);
    assert_eq!(diff.get("end.y").unwrap().right, OwnedValue::I32(2));
}

#[test]
fn test_field_missing_on_one_side_is_always_reported() {
    let d = dog("rex", "lab", None);
    let a = animal("rex", 4);
    let diff = structural_diff(&d, &a, &DiffOptions::default()).unwrap();
    assert_eq!(diff.len(), 1);
    let entry = diff.get("breed").unwrap();
    assert_eq!(entry.left, OwnedValue::Str("lab".to_string()));
    assert!(entry.right.is_null());

    let diff = structural_diff(&a, &d, &DiffOptions::default()).unwrap();
    assert!(diff.get("breed").unwrap().left.is_null());
}

#[test]
fn test_subtype_without_own_fields_diffs_parent_fields() {
    let pet = Pet {
        base: animal("tom", 4),
    };
    let lame = animal("tom", 3);
    let diff = structural_diff(&pet, &lame, &DiffOptions::default()).unwrap();
    let paths: Vec<_> = diff.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["legs"]);
}

#[test]
fn test_unrelated_roots_are_a_mismatch() {
    let a = animal("fern", 0);
    let p = Plant {
        name: "fern".to_string(),
        legs: 0,
    };
    let err = structural_diff(&a, &p, &DiffOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn test_selection_options_apply() {
    let (a, b) = (account(1, "a"), account(1, "b"));
    assert!(structural_diff(&a, &b, &DiffOptions::default())
        .unwrap()
        .is_empty());

    let mut options = DiffOptions::default();
    options.select = SelectOptions::default().excluding(["z"]);
    let (a, b) = (record(1, "a", true), record(1, "a", false));
    let diff = structural_diff(&a, &b, &options).unwrap();
    assert!(diff.is_empty());
}

#[test]
fn test_every_value_shape_in_entries() {
    let a = sample();
    let mut b = sample();
    b.scores.push(3);
    b.labels.insert("n".to_string(), 2);
    b.missing = Some(4);
    let diff = structural_diff(&a, &b, &DiffOptions::default()).unwrap();
    let paths: Vec<_> = diff.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["scores", "labels", "missing"]);
    assert_eq!(diff.get("scores").unwrap().to_string(), "scores: {1,2} -> {1,2,3}");
    assert_eq!(diff.get("labels").unwrap().to_string(), "labels: {k=1} -> {k=1, n=2}");
    assert_eq!(diff.get("missing").unwrap().to_string(), "missing: <null> -> 4");
}

#[test]
fn test_entries_outlive_the_objects() {
    let entries = {
        let (a, b) = (record(1, "a", true), record(1, "b", true));
        structural_diff(&a, &b, &DiffOptions::default())
            .unwrap()
            .into_entries()
    };
    let json = serde_json::to_string(&entries).unwrap();
    assert!(json.contains(r#""path":"y""#));
}
