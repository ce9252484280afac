#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::rc::Rc;

use common::*;
use refract_core::{
    render, structural_compare, structural_diff, structural_equals, structural_hash, Describe,
    DiffOptions, EqualityOptions, HashOptions, OrderingOptions, RenderOptions,
    SHORT_PREFIX_STYLE,
};

fn identity(n: &Rc<Node>) -> String {
    format!("{}@{:x}", Node::describe().name(), Rc::as_ptr(n) as usize)
}

#[test]
fn test_self_loop_renders_identity_placeholder() {
    let n = self_loop(1);
    let out = render(&*n, &SHORT_PREFIX_STYLE, &RenderOptions::default()).unwrap();
    assert_eq!(out, format!("Node[value=1,next={}]", identity(&n)));
    unlink(&[n]);
}

#[test]
fn test_ring_renders_until_it_closes() {
    let nodes = ring(3);
    let out = render(&*nodes[0], &SHORT_PREFIX_STYLE, &RenderOptions::default()).unwrap();
    assert_eq!(
        out,
        format!(
            "Node[value=0,next=Node[value=1,next=Node[value=2,next={}]]]",
            identity(&nodes[0])
        )
    );
    unlink(&nodes);
}

#[test]
fn test_equality_terminates_on_cycles() {
    let (a, b) = (self_loop(1), self_loop(1));
    assert!(structural_equals(&*a, &*a, &EqualityOptions::default()).unwrap());
    // the back edges are distinct objects, compared by identity
    assert!(!structural_equals(&*a, &*b, &EqualityOptions::default()).unwrap());

    let (x, y) = (ring(4), ring(4));
    assert!(!structural_equals(&*x[0], &*y[0], &EqualityOptions::default()).unwrap());
    unlink(&[a, b]);
    unlink(&x);
    unlink(&y);
}

#[test]
fn test_hash_terminates_on_cycles() {
    let n = self_loop(1);
    let first = structural_hash(&*n, 17, 37, &HashOptions::default()).unwrap();
    let second = structural_hash(&*n, 17, 37, &HashOptions::default()).unwrap();
    assert_eq!(first, second);

    let nodes = ring(5);
    structural_hash(&*nodes[2], 17, 37, &HashOptions::default()).unwrap();
    unlink(&[n]);
    unlink(&nodes);
}

#[test]
fn test_compare_terminates_on_cycles() {
    let (a, b) = (self_loop(1), self_loop(1));
    assert_eq!(
        structural_compare(&*a, &*a, &OrderingOptions::default()).unwrap(),
        0
    );
    let ab = structural_compare(&*a, &*b, &OrderingOptions::default()).unwrap();
    let ba = structural_compare(&*b, &*a, &OrderingOptions::default()).unwrap();
    assert_eq!(ab, -ba);
    assert_ne!(ab, 0);
    unlink(&[a, b]);
}

#[test]
fn test_diff_terminates_on_cycles() {
    let (a, b) = (self_loop(1), self_loop(1));
    let diff = structural_diff(&*a, &*b, &DiffOptions::default()).unwrap();
    let paths: Vec<_> = diff.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["next"]);

    let diff = structural_diff(&*a, &*b, &DiffOptions::default().nested()).unwrap();
    assert_eq!(diff.len(), 1);
    assert!(structural_diff(&*a, &*a, &DiffOptions::default()).unwrap().is_empty());
    unlink(&[a, b]);
}

#[test]
fn test_visited_set_is_released_between_calls() {
    let n = self_loop(3);
    let style = &SHORT_PREFIX_STYLE;
    let first = render(&*n, style, &RenderOptions::default()).unwrap();
    let second = render(&*n, style, &RenderOptions::default()).unwrap();
    assert_eq!(first, second);

    // a failed call must not leave anything behind either
    let held = n.next.borrow_mut();
    assert!(render(&*n, style, &RenderOptions::default()).is_err());
    drop(held);
    assert_eq!(render(&*n, style, &RenderOptions::default()).unwrap(), first);
    unlink(&[n]);
}
