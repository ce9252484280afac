//! Introspection model: borrowed value views and the traits that produce them

mod inspect;
mod reflect;
mod value;

pub use inspect::{Elements, Inspect};
pub use reflect::{same_object, Describe, Reflect};
pub use value::{Array, Entries, Items, Mapping, Sequence, Value, Visit};

pub(crate) use value::{canonical_f32, canonical_f64, f32_bits, f64_bits};
