//! Array dispatch
//!
//! A closed switch over the nine array kinds. Primitive kinds are walked as
//! slices and each element is lifted to a scalar `Value`; object arrays are
//! walked through their `Sequence` so elements get full recursive dispatch.

use crate::errors::Result;
use crate::model::{Array, Inspect, Sequence, Value};

/// Two arrays of the same element kind
#[derive(Clone, Copy)]
pub enum ArrayPair<'a> {
    I8(&'a [i8], &'a [i8]),
    I16(&'a [i16], &'a [i16]),
    I32(&'a [i32], &'a [i32]),
    I64(&'a [i64], &'a [i64]),
    F32(&'a [f32], &'a [f32]),
    F64(&'a [f64], &'a [f64]),
    Bool(&'a [bool], &'a [bool]),
    Char(&'a [char], &'a [char]),
    Object(&'a dyn Sequence, &'a dyn Sequence),
}

impl<'a> ArrayPair<'a> {
    /// Pair two arrays, or `None` when their element kinds differ
    pub fn of(left: Array<'a>, right: Array<'a>) -> Option<Self> {
        let pair = match (left, right) {
            (Array::I8(l), Array::I8(r)) => ArrayPair::I8(l, r),
            (Array::I16(l), Array::I16(r)) => ArrayPair::I16(l, r),
            (Array::I32(l), Array::I32(r)) => ArrayPair::I32(l, r),
            (Array::I64(l), Array::I64(r)) => ArrayPair::I64(l, r),
            (Array::F32(l), Array::F32(r)) => ArrayPair::F32(l, r),
            (Array::F64(l), Array::F64(r)) => ArrayPair::F64(l, r),
            (Array::Bool(l), Array::Bool(r)) => ArrayPair::Bool(l, r),
            (Array::Char(l), Array::Char(r)) => ArrayPair::Char(l, r),
            (Array::Object(l), Array::Object(r)) => ArrayPair::Object(l, r),
            _ => return None,
        };
        Some(pair)
    }

    pub fn lengths(&self) -> (usize, usize) {
        match self {
            ArrayPair::I8(l, r) => (l.len(), r.len()),
            ArrayPair::I16(l, r) => (l.len(), r.len()),
            ArrayPair::I32(l, r) => (l.len(), r.len()),
            ArrayPair::I64(l, r) => (l.len(), r.len()),
            ArrayPair::F32(l, r) => (l.len(), r.len()),
            ArrayPair::F64(l, r) => (l.len(), r.len()),
            ArrayPair::Bool(l, r) => (l.len(), r.len()),
            ArrayPair::Char(l, r) => (l.len(), r.len()),
            ArrayPair::Object(l, r) => (l.len(), r.len()),
        }
    }

    /// Visit element pairs index by index over the common prefix. `each`
    /// returns whether to continue.
    ///
    /// # Errors
    ///
    /// Propagates element read failures and errors from `each`.
    pub fn zip(&self, each: &mut dyn FnMut(Value<'_>, Value<'_>) -> Result<bool>) -> Result<()> {
        match *self {
            ArrayPair::I8(l, r) => zip_slices(l, r, Value::I8, each),
            ArrayPair::I16(l, r) => zip_slices(l, r, Value::I16, each),
            ArrayPair::I32(l, r) => zip_slices(l, r, Value::I32, each),
            ArrayPair::I64(l, r) => zip_slices(l, r, Value::I64, each),
            ArrayPair::F32(l, r) => zip_slices(l, r, Value::F32, each),
            ArrayPair::F64(l, r) => zip_slices(l, r, Value::F64, each),
            ArrayPair::Bool(l, r) => zip_slices(l, r, Value::Bool, each),
            ArrayPair::Char(l, r) => zip_slices(l, r, Value::Char, each),
            ArrayPair::Object(l, r) => zip_sequences(l, r, each),
        }
    }
}

fn zip_slices<T: Copy>(
    left: &[T],
    right: &[T],
    lift: fn(T) -> Value<'static>,
    each: &mut dyn FnMut(Value<'_>, Value<'_>) -> Result<bool>,
) -> Result<()> {
    for (l, r) in left.iter().zip(right) {
        if !each(lift(*l), lift(*r))? {
            break;
        }
    }
    Ok(())
}

/// Element-pair walk over two sequences of possibly different lengths
pub(crate) fn zip_sequences(
    left: &dyn Sequence,
    right: &dyn Sequence,
    each: &mut dyn FnMut(Value<'_>, Value<'_>) -> Result<bool>,
) -> Result<()> {
    for (l, r) in left.items().zip(right.items()) {
        let mut go_on = true;
        lend_pair(l, r, &mut |l, r| {
            go_on = each(l, r)?;
            Ok(())
        })?;
        if !go_on {
            break;
        }
    }
    Ok(())
}

/// Lend the views of two values to `each` at once
pub(crate) fn lend_pair(
    left: &dyn Inspect,
    right: &dyn Inspect,
    each: &mut dyn FnMut(Value<'_>, Value<'_>) -> Result<()>,
) -> Result<()> {
    left.inspect(&mut |l| right.inspect(&mut |r| each(l, r)))
}

impl Array<'_> {
    /// Visit elements in order. `each` returns whether to continue.
    ///
    /// # Errors
    ///
    /// Propagates element read failures and errors from `each`.
    pub fn for_each(&self, each: &mut dyn FnMut(Value<'_>) -> Result<bool>) -> Result<()> {
        match *self {
            Array::I8(items) => each_slice(items, Value::I8, each),
            Array::I16(items) => each_slice(items, Value::I16, each),
            Array::I32(items) => each_slice(items, Value::I32, each),
            Array::I64(items) => each_slice(items, Value::I64, each),
            Array::F32(items) => each_slice(items, Value::F32, each),
            Array::F64(items) => each_slice(items, Value::F64, each),
            Array::Bool(items) => each_slice(items, Value::Bool, each),
            Array::Char(items) => each_slice(items, Value::Char, each),
            Array::Object(items) => each_element(items, each),
        }
    }
}

fn each_slice<T: Copy>(
    items: &[T],
    lift: fn(T) -> Value<'static>,
    each: &mut dyn FnMut(Value<'_>) -> Result<bool>,
) -> Result<()> {
    for item in items {
        if !each(lift(*item))? {
            break;
        }
    }
    Ok(())
}

/// Element walk over a sequence
pub(crate) fn each_element(
    items: &dyn Sequence,
    each: &mut dyn FnMut(Value<'_>) -> Result<bool>,
) -> Result<()> {
    for item in items.items() {
        let mut go_on = true;
        item.inspect(&mut |v| {
            go_on = each(v)?;
            Ok(())
        })?;
        if !go_on {
            break;
        }
    }
    Ok(())
}
