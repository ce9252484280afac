//! Borrowed value views
//!
//! A `Value` is what a field lends to an engine for the duration of one
//! callback. Nothing is copied out of the object graph except primitive
//! scalars.

use std::fmt;

use super::inspect::Inspect;
use super::reflect::Reflect;
use crate::errors::Result;

/// Callback receiving a borrowed view of one value
pub type Visit<'v> = dyn FnMut(Value<'_>) -> Result<()> + 'v;

/// Elements of a collection, in order
pub type Items<'a> = Box<dyn Iterator<Item = &'a dyn Inspect> + 'a>;

/// Key/value entries of a map, in key order
pub type Entries<'a> = Box<dyn Iterator<Item = (&'a dyn Inspect, &'a dyn Inspect)> + 'a>;

/// Closed set of value shapes the structural algorithms dispatch on
#[derive(Clone, Copy)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(&'a str),
    Array(Array<'a>),
    /// Ordered collection; compared and rendered like an array
    Seq(&'a dyn Sequence),
    Map(&'a dyn Mapping),
    /// Composite value with its own field table
    Object(&'a dyn Reflect),
}

impl<'a> Value<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the value's kind as shown in summaries: the short type name
    /// for objects, the Rust type name for scalars
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Char(_) => "char",
            Value::Str(_) => "String",
            Value::Array(array) => array.type_name(),
            Value::Seq(_) => "Seq",
            Value::Map(_) => "Map",
            Value::Object(object) => object.type_info().short_name(),
        }
    }

    /// Element count for arrays, collections and maps
    pub fn size(&self) -> Option<usize> {
        match self {
            Value::Array(array) => Some(array.len()),
            Value::Seq(seq) => Some(seq.len()),
            Value::Map(map) => Some(map.len()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&'a dyn Reflect> {
        match *self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::I8(v) => write!(f, "I8({v})"),
            Value::I16(v) => write!(f, "I16({v})"),
            Value::I32(v) => write!(f, "I32({v})"),
            Value::I64(v) => write!(f, "I64({v})"),
            Value::F32(v) => write!(f, "F32({v:?})"),
            Value::F64(v) => write!(f, "F64({v:?})"),
            Value::Char(v) => write!(f, "Char({v:?})"),
            Value::Str(v) => write!(f, "Str({v:?})"),
            Value::Array(array) => write!(f, "Array({}, len={})", array.type_name(), array.len()),
            Value::Seq(seq) => write!(f, "Seq(len={})", seq.len()),
            Value::Map(map) => write!(f, "Map(len={})", map.len()),
            Value::Object(object) => write!(
                f,
                "Object({}@{:x})",
                object.type_info().short_name(),
                object.address()
            ),
        }
    }
}

/// Array view: the eight primitive element kinds, or any other element type
#[derive(Clone, Copy)]
pub enum Array<'a> {
    I8(&'a [i8]),
    I16(&'a [i16]),
    I32(&'a [i32]),
    I64(&'a [i64]),
    F32(&'a [f32]),
    F64(&'a [f64]),
    Bool(&'a [bool]),
    Char(&'a [char]),
    Object(&'a dyn Sequence),
}

impl Array<'_> {
    pub fn len(&self) -> usize {
        match self {
            Array::I8(items) => items.len(),
            Array::I16(items) => items.len(),
            Array::I32(items) => items.len(),
            Array::I64(items) => items.len(),
            Array::F32(items) => items.len(),
            Array::F64(items) => items.len(),
            Array::Bool(items) => items.len(),
            Array::Char(items) => items.len(),
            Array::Object(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Array::I8(_) => "[i8]",
            Array::I16(_) => "[i16]",
            Array::I32(_) => "[i32]",
            Array::I64(_) => "[i64]",
            Array::F32(_) => "[f32]",
            Array::F64(_) => "[f64]",
            Array::Bool(_) => "[bool]",
            Array::Char(_) => "[char]",
            Array::Object(_) => "[object]",
        }
    }
}

/// Ordered collection of inspectable elements
///
/// Traversals walk the items once, front to back; two-sided algorithms zip
/// the items of both collections.
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn items(&self) -> Items<'_>;
}

/// Ordered key/value collection
pub trait Mapping {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Entries<'_>;
}

const CANONICAL_NAN_F32: u32 = 0x7fc0_0000;
const CANONICAL_NAN_F64: u64 = 0x7ff8_0000_0000_0000;

/// Bit pattern used for float equality and hashing; every NaN maps to the
/// canonical quiet NaN so that NaN equals itself
pub(crate) fn f32_bits(v: f32) -> u32 {
    if v.is_nan() {
        CANONICAL_NAN_F32
    } else {
        v.to_bits()
    }
}

pub(crate) fn f64_bits(v: f64) -> u64 {
    if v.is_nan() {
        CANONICAL_NAN_F64
    } else {
        v.to_bits()
    }
}

/// Same value with any NaN replaced by the canonical positive NaN, for use
/// with `total_cmp`
pub(crate) fn canonical_f32(v: f32) -> f32 {
    f32::from_bits(f32_bits(v))
}

pub(crate) fn canonical_f64(v: f64) -> f64 {
    f64::from_bits(f64_bits(v))
}
