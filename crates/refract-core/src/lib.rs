//! refract core - reflective structural traversal
//!
//! This crate drives five structural algorithms from one field introspection
//! model:
//! - Equality (`structural_equals`, `EqualsBuilder`)
//! - Three-way ordering (`structural_compare`, `CompareBuilder`)
//! - Hashing consistent with equality (`structural_hash`, `HashBuilder`)
//! - Field-level diffs (`structural_diff`, `DiffBuilder`)
//! - Text rendering through pluggable styles (`render`, `RenderBuilder`)
//!
//! Types opt in with the [`reflect!`] macro. Every top-level call owns its
//! own visited set, so self-referential graphs terminate and concurrent
//! calls never interfere.

pub mod diff;
pub mod equality;
pub mod errors;
pub mod hashing;
pub mod logging_facility;
pub mod model;
pub mod options;
pub mod ordering;
pub mod render;
pub mod traversal;

// Re-export commonly used types
pub use refract_core_types::{schema, Algorithm, FieldInfo, TypeInfo};

pub use diff::{structural_diff, DiffBuilder, DiffEntry, DiffResult, OwnedArray, OwnedValue};
pub use equality::{structural_equals, EqualsBuilder};
pub use errors::{ErrorKind, RefractError, Result};
pub use hashing::{structural_hash, HashBuilder};
pub use model::{
    same_object, Array, Describe, Elements, Entries, Inspect, Items, Mapping, Reflect, Sequence,
    Value, Visit,
};
pub use options::{
    Comparator, DiffOptions, EqualityOptions, HashOptions, OrderingOptions, RenderOptions,
    SelectOptions, DEFAULT_MULTIPLIER, DEFAULT_SEED,
};
pub use ordering::{structural_compare, CompareBuilder};
pub use render::{
    render, Dialect, RenderBuilder, RenderStyle, StylePreset, DEFAULT_STYLE, JSON_STYLE,
    MULTI_LINE_STYLE, NO_CLASS_NAME_STYLE, NO_FIELD_NAMES_STYLE, SHORT_PREFIX_STYLE, SIMPLE_STYLE,
};
