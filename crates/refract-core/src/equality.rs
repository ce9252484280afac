//! Structural equality
//!
//! Equality is total: absent values, mismatched kinds and unrelated types all
//! resolve to `false`, never to an error. Errors only come from fields that
//! cannot be read.

use std::borrow::Cow;
use std::time::Instant;

use refract_core_types::{Algorithm, TypeInfo};

use crate::errors::{RefractError, Result};
use crate::model::{
    f32_bits, f64_bits, same_object, Array, Inspect, Mapping, Reflect, Sequence, Value,
};
use crate::options::EqualityOptions;
use crate::traversal::dispatch::{lend_pair, zip_sequences};
use crate::traversal::{select_fields, ArrayPair, TraversalContext, VisitKey};
use crate::{log_op_end, log_op_error, log_op_start};

/// Compare two values field by field
///
/// Identical objects are equal without reading any field. Objects of related
/// types are compared over the more-derived type's fields; a field whose
/// declaring level is missing on one side makes them unequal. Unrelated types
/// are unequal.
///
/// # Errors
///
/// Returns an access error when a participating field cannot be read.
pub fn structural_equals<L, R>(lhs: &L, rhs: &R, options: &EqualityOptions) -> Result<bool>
where
    L: Inspect + ?Sized,
    R: Inspect + ?Sized,
{
    log_op_start!("structural_equals");
    let start = Instant::now();

    let equal = EqualsBuilder::with_options(options)
        .append(lhs, rhs)
        .build()
        .map_err(|e| {
            log_op_error!(
                "structural_equals",
                e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "structural_equals",
        duration_ms = start.elapsed().as_millis() as u64,
        equal = equal
    );
    Ok(equal)
}

/// Equality of two values under `options`, with a fresh visited set
pub(crate) fn values_equal(left: Value<'_>, right: Value<'_>, options: &EqualityOptions) -> Result<bool> {
    Equality::new(options).values(left, right)
}

/// Type whose fields decide equality of two objects, or `None` when the
/// types are unrelated
pub(crate) fn test_type(left: &dyn Reflect, right: &dyn Reflect) -> Option<&'static TypeInfo> {
    let (lt, rt) = (left.type_info(), right.type_info());
    if rt.is_a(lt) {
        Some(rt)
    } else if lt.is_a(rt) {
        Some(lt)
    } else {
        None
    }
}

/// Per-kind equality rules with a pair-keyed visited set
pub(crate) struct Equality<'o> {
    options: &'o EqualityOptions,
    ctx: TraversalContext,
}

impl<'o> Equality<'o> {
    pub(crate) fn new(options: &'o EqualityOptions) -> Self {
        Self {
            options,
            ctx: TraversalContext::new(),
        }
    }

    pub(crate) fn values(&mut self, left: Value<'_>, right: Value<'_>) -> Result<bool> {
        match (left, right) {
            (Value::Null, Value::Null) => return Ok(true),
            (Value::Null, _) | (_, Value::Null) => return Ok(false),
            (Value::Array(l), Value::Array(r)) => return self.arrays(l, r),
            (Value::Array(_), _) | (_, Value::Array(_)) => return Ok(false),
            _ => {}
        }
        match (left, right) {
            (Value::Seq(l), Value::Seq(r)) => self.sequences(l, r),
            (Value::Map(l), Value::Map(r)) => self.maps(l, r),
            (Value::Object(l), Value::Object(r)) => self.objects(l, r),
            (Value::Seq(_) | Value::Map(_) | Value::Object(_), _)
            | (_, Value::Seq(_) | Value::Map(_) | Value::Object(_)) => Ok(false),
            _ => Ok(self.scalars(left, right)),
        }
    }

    /// A comparator, when given, replaces the per-kind scalar rule
    fn scalars(&self, left: Value<'_>, right: Value<'_>) -> bool {
        if let Some(comparator) = &self.options.comparator {
            return comparator.compare(left, right).is_eq();
        }
        match (left, right) {
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::I8(l), Value::I8(r)) => l == r,
            (Value::I16(l), Value::I16(r)) => l == r,
            (Value::I32(l), Value::I32(r)) => l == r,
            (Value::I64(l), Value::I64(r)) => l == r,
            (Value::F32(l), Value::F32(r)) => f32_bits(l) == f32_bits(r),
            (Value::F64(l), Value::F64(r)) => f64_bits(l) == f64_bits(r),
            (Value::Char(l), Value::Char(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            _ => false,
        }
    }

    fn arrays(&mut self, left: Array<'_>, right: Array<'_>) -> Result<bool> {
        let Some(pair) = ArrayPair::of(left, right) else {
            return Ok(false);
        };
        let (l, r) = pair.lengths();
        if l != r {
            return Ok(false);
        }
        let mut equal = true;
        pair.zip(&mut |l, r| {
            equal = self.values(l, r)?;
            Ok(equal)
        })?;
        Ok(equal)
    }

    fn sequences(&mut self, left: &dyn Sequence, right: &dyn Sequence) -> Result<bool> {
        if left.len() != right.len() {
            return Ok(false);
        }
        let mut equal = true;
        zip_sequences(left, right, &mut |l, r| {
            equal = self.values(l, r)?;
            Ok(equal)
        })?;
        Ok(equal)
    }

    fn maps(&mut self, left: &dyn Mapping, right: &dyn Mapping) -> Result<bool> {
        if left.len() != right.len() {
            return Ok(false);
        }
        for ((lk, lv), (rk, rv)) in left.entries().zip(right.entries()) {
            let mut equal = false;
            lend_pair(lk, rk, &mut |lk, rk| {
                equal = self.values(lk, rk)?;
                Ok(())
            })?;
            if equal {
                lend_pair(lv, rv, &mut |lv, rv| {
                    equal = self.values(lv, rv)?;
                    Ok(())
                })?;
            }
            if !equal {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Objects already being compared higher up fall back to identity
    pub(crate) fn objects(&mut self, left: &dyn Reflect, right: &dyn Reflect) -> Result<bool> {
        if same_object(left, right) {
            return Ok(true);
        }
        let (lk, rk) = (VisitKey::of(left), VisitKey::of(right));
        if !self.ctx.enter_pair(lk, rk) {
            return Ok(false);
        }
        let result = self.fields(left, right);
        self.ctx.leave_pair(lk, rk);
        result
    }

    fn fields(&mut self, left: &dyn Reflect, right: &dyn Reflect) -> Result<bool> {
        let Some(test) = test_type(left, right) else {
            return Ok(false);
        };
        for field in select_fields(test, &self.options.select, Algorithm::Equals) {
            if !field.is_present_in(left) || !field.is_present_in(right) {
                return Ok(false);
            }
            let mut equal = false;
            field.read(left, &mut |l| {
                field.read(right, &mut |r| {
                    equal = self.values(l, r)?;
                    Ok(())
                })
            })?;
            if !equal {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Accumulating equality test for hand-written comparisons
///
/// Once a pair compares unequal, later appends are skipped. The first read
/// error is kept and returned by [`build`](Self::build).
///
/// ```
/// use refract_core::EqualsBuilder;
///
/// let equal = EqualsBuilder::new()
///     .append(&1, &1)
///     .append("a", "a")
///     .append(&[1.0f64, f64::NAN], &[1.0f64, f64::NAN])
///     .build()
///     .unwrap();
/// assert!(equal);
/// ```
pub struct EqualsBuilder<'o> {
    equals: bool,
    error: Option<RefractError>,
    options: Cow<'o, EqualityOptions>,
}

impl Default for EqualsBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'o> EqualsBuilder<'o> {
    pub fn new() -> Self {
        Self {
            equals: true,
            error: None,
            options: Cow::Owned(EqualityOptions::default()),
        }
    }

    pub fn with_options(options: &'o EqualityOptions) -> Self {
        Self {
            equals: true,
            error: None,
            options: Cow::Borrowed(options),
        }
    }

    fn is_open(&self) -> bool {
        self.equals && self.error.is_none()
    }

    fn record(&mut self, outcome: Result<bool>) {
        match outcome {
            Ok(equal) => self.equals = equal,
            Err(e) => self.error = Some(e),
        }
    }

    /// Compare two values with the per-kind rules
    pub fn append<L, R>(mut self, lhs: &L, rhs: &R) -> Self
    where
        L: Inspect + ?Sized,
        R: Inspect + ?Sized,
    {
        if !self.is_open() {
            return self;
        }
        let mut engine = Equality::new(&self.options);
        let mut equal = false;
        let outcome = lhs
            .inspect(&mut |l| {
                rhs.inspect(&mut |r| {
                    equal = engine.values(l, r)?;
                    Ok(())
                })
            })
            .map(|()| equal);
        self.record(outcome);
        self
    }

    /// Fold in the result of an ancestor's own equality test
    pub fn append_super(mut self, super_equals: bool) -> Self {
        if self.is_open() {
            self.equals = super_equals;
        }
        self
    }

    /// Compare two objects field by field
    pub fn reflection_append(mut self, lhs: &dyn Reflect, rhs: &dyn Reflect) -> Self {
        if !self.is_open() {
            return self;
        }
        let outcome = Equality::new(&self.options).objects(lhs, rhs);
        self.record(outcome);
        self
    }

    pub fn set_equals(mut self, equals: bool) -> Self {
        self.equals = equals;
        self
    }

    /// Back to "equal so far", dropping any kept error
    pub fn reset(mut self) -> Self {
        self.equals = true;
        self.error = None;
        self
    }

    /// # Errors
    ///
    /// Returns the first error raised by an append.
    pub fn build(self) -> Result<bool> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.equals),
        }
    }
}
