//! Structural diff
//!
//! ## Entry point
//!
//! ```
//! use refract_core::{reflect, structural_diff, DiffOptions};
//!
//! pub struct Record {
//!     x: i32,
//!     y: String,
//!     z: bool,
//! }
//! reflect!(Record { x, y, z });
//!
//! let a = Record { x: 1, y: "a".into(), z: true };
//! let b = Record { x: 1, y: "a".into(), z: false };
//! let diff = structural_diff(&a, &b, &DiffOptions::default()).unwrap();
//! assert_eq!(diff.len(), 1);
//! assert_eq!(diff.entries()[0].path, "z");
//! ```
//!
//! ## Guarantees
//!
//! - A diff is empty exactly when the two objects are structurally equal
//!   under the same field selection.
//! - Entries follow field selection order: nearest type level first, each
//!   level in declaration order.
//! - No partial results: any read failure fails the whole diff.

pub mod engine;
pub mod model;
pub mod summary;

pub use engine::{structural_diff, DiffBuilder};
pub use model::{DiffEntry, DiffResult, OwnedArray, OwnedValue};
pub use summary::{render_diff_text, DIFFERS_FROM};
