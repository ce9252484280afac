#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Mutex;

use refract_core::reflect;

/// The three-field record used across scenarios
#[derive(Debug)]
pub struct Record {
    pub x: i32,
    pub y: String,
    pub z: bool,
}
reflect!(Record { x, y, z });

pub fn record(x: i32, y: &str, z: bool) -> Record {
    Record {
        x,
        y: y.to_string(),
        z,
    }
}

pub struct Animal {
    pub name: String,
    pub legs: i32,
}
reflect!(Animal { name, legs });

/// Subtype of `Animal` with a transient field
pub struct Dog {
    pub base: Animal,
    pub breed: String,
    pub mood: Option<String>,
}
reflect!(Dog extends Animal => base { breed, #[transient] mood });

/// Subtype of `Animal` that adds nothing
pub struct Pet {
    pub base: Animal,
}
reflect!(Pet extends Animal => base {});

/// Unrelated to `Animal`
pub struct Plant {
    pub name: String,
    pub legs: i32,
}
reflect!(Plant { name, legs });

pub fn animal(name: &str, legs: i32) -> Animal {
    Animal {
        name: name.to_string(),
        legs,
    }
}

pub fn dog(name: &str, breed: &str, mood: Option<&str>) -> Dog {
    Dog {
        base: animal(name, 4),
        breed: breed.to_string(),
        mood: mood.map(str::to_string),
    }
}

/// Field markers and a type-level value
pub struct Account {
    pub id: i64,
    pub owner: String,
    pub password: String,
    pub history: Vec<i32>,
    pub cache: Option<i32>,
    pub note: Option<String>,
}
reflect! {
    Account {
        id,
        owner,
        #[exclude] password,
        #[summary] history,
        #[transient] cache,
        note,
    }
    static {
        VERSION = 3i32,
    }
}

pub fn account(id: i64, password: &str) -> Account {
    Account {
        id,
        owner: "ann".to_string(),
        password: password.to_string(),
        history: vec![1, 2, 3],
        cache: None,
        note: None,
    }
}

#[derive(Debug)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}
reflect!(Point { x, y });

#[derive(Debug)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}
reflect!(Line { start, end });

pub fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> Line {
    Line {
        start: Point { x: x1, y: y1 },
        end: Point { x: x2, y: y2 },
    }
}

/// Every value shape in one object
pub struct Sample {
    pub flag: bool,
    pub ratio: f64,
    pub scores: Vec<i32>,
    pub names: Vec<String>,
    pub labels: BTreeMap<String, i32>,
    pub letter: char,
    pub missing: Option<i32>,
}
reflect!(Sample { flag, ratio, scores, names, labels, letter, missing });

pub fn sample() -> Sample {
    Sample {
        flag: true,
        ratio: 0.5,
        scores: vec![1, 2],
        names: vec!["a".to_string(), "b\"c".to_string()],
        labels: BTreeMap::from([("k".to_string(), 1)]),
        letter: 'q',
        missing: None,
    }
}

/// Linked node; cycles are built by pointing `next` back up the chain
pub struct Node {
    pub value: i32,
    pub next: RefCell<Option<Rc<Node>>>,
}
reflect!(Node { value, next });

pub fn node(value: i32) -> Rc<Node> {
    Rc::new(Node {
        value,
        next: RefCell::new(None),
    })
}

/// A node whose `next` is itself
pub fn self_loop(value: i32) -> Rc<Node> {
    let n = node(value);
    *n.next.borrow_mut() = Some(Rc::clone(&n));
    n
}

/// `len` nodes linked in a ring, first node returned first
pub fn ring(len: usize) -> Vec<Rc<Node>> {
    let nodes: Vec<_> = (0..len as i32).map(node).collect();
    for (i, n) in nodes.iter().enumerate() {
        *n.next.borrow_mut() = Some(Rc::clone(&nodes[(i + 1) % len]));
    }
    nodes
}

/// Drop the back edge so the ring can be freed
pub fn unlink(nodes: &[Rc<Node>]) {
    for n in nodes {
        n.next.borrow_mut().take();
    }
}

/// Field behind a lock
pub struct Guarded {
    pub value: Mutex<i32>,
}
reflect!(Guarded { value });

/// A `Guarded` whose lock was poisoned by a panicking writer
pub fn poisoned(value: i32) -> Guarded {
    let g = Guarded {
        value: Mutex::new(value),
    };
    std::thread::scope(|s| {
        let _ = s
            .spawn(|| {
                let _guard = g.value.lock().unwrap();
                panic!("writer failed");
            })
            .join();
    });
    g
}
