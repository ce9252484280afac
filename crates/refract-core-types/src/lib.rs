//! Core types shared across the refract traversal engines
//!
//! This crate holds the behaviour-free half of the introspection model:
//!
//! - **Type descriptors**: `TypeInfo`, `FieldInfo`, the field table a type
//!   exposes to the structural algorithms
//! - **Algorithms**: `Algorithm`, used to scope per-algorithm exclusion markers
//! - **Schema constants**: Canonical field keys and event names for logging

pub mod descriptor;
pub mod schema;

pub use descriptor::{Algorithm, FieldInfo, TypeInfo};
