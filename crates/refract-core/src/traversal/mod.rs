//! Traversal primitives shared by every structural algorithm
//!
//! - [`selector`]: which fields of a type participate, in what order
//! - [`guard`]: per-call visited sets that make cyclic graphs terminate
//! - [`dispatch`]: the closed switch over array element kinds

pub mod dispatch;
pub mod guard;
pub mod selector;

pub use dispatch::ArrayPair;
pub use guard::{TraversalContext, VisitKey};
pub use selector::{exclusion, select_fields, Exclusion, FieldDescriptor};
