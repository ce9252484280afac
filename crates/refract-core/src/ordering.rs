//! Structural ordering
//!
//! Results are normalised to -1, 0 or 1. The first nonzero comparison wins.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::time::Instant;

use refract_core_types::{Algorithm, TypeInfo};

use crate::errors::{RefractError, Result};
use crate::model::{
    canonical_f32, canonical_f64, same_object, Array, Inspect, Mapping, Reflect, Sequence, Value,
};
use crate::options::{Comparator, OrderingOptions};
use crate::traversal::dispatch::{lend_pair, zip_sequences};
use crate::traversal::{select_fields, ArrayPair, TraversalContext, VisitKey};
use crate::{log_op_end, log_op_error, log_op_start};

/// Three-way comparison of two values, field by field
///
/// Absent values sort first. Arrays and collections sort by length, then
/// elementwise. Objects of related types are compared over the fields of the
/// less-derived type.
///
/// # Errors
///
/// Returns a type mismatch error when the values are of different kinds or
/// of unrelated types, and an access error when a field cannot be read.
pub fn structural_compare<L, R>(lhs: &L, rhs: &R, options: &OrderingOptions) -> Result<i32>
where
    L: Inspect + ?Sized,
    R: Inspect + ?Sized,
{
    log_op_start!("structural_compare");
    let start = Instant::now();

    let comparison = CompareBuilder::with_options(options)
        .append(lhs, rhs)
        .build()
        .map_err(|e| {
            log_op_error!(
                "structural_compare",
                e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "structural_compare",
        duration_ms = start.elapsed().as_millis() as u64,
        comparison = comparison
    );
    Ok(comparison)
}

fn sign(ordering: Ordering) -> i32 {
    ordering as i32
}

/// Common type whose fields order two objects
fn common_type(left: &dyn Reflect, right: &dyn Reflect) -> Result<&'static TypeInfo> {
    let (lt, rt) = (left.type_info(), right.type_info());
    if rt.is_a(lt) {
        Ok(lt)
    } else if lt.is_a(rt) {
        Ok(rt)
    } else {
        Err(RefractError::type_mismatch(lt.name(), rt.name()))
    }
}

struct Comparison<'o> {
    options: &'o OrderingOptions,
    ctx: TraversalContext,
}

impl<'o> Comparison<'o> {
    fn new(options: &'o OrderingOptions) -> Self {
        Self {
            options,
            ctx: TraversalContext::new(),
        }
    }

    fn values(&mut self, left: Value<'_>, right: Value<'_>) -> Result<i32> {
        match (left, right) {
            (Value::Null, Value::Null) => return Ok(0),
            (Value::Null, _) => return Ok(-1),
            (_, Value::Null) => return Ok(1),
            (Value::Array(l), Value::Array(r)) => return self.arrays(l, r),
            (Value::Array(_), _) | (_, Value::Array(_)) => return Err(kind_mismatch(left, right)),
            _ => {}
        }
        match (left, right) {
            (Value::Seq(l), Value::Seq(r)) => self.sequences(l, r),
            (Value::Map(l), Value::Map(r)) => self.maps(l, r),
            (Value::Object(l), Value::Object(r)) => self.objects(l, r),
            (Value::Seq(_) | Value::Map(_) | Value::Object(_), _)
            | (_, Value::Seq(_) | Value::Map(_) | Value::Object(_)) => {
                Err(kind_mismatch(left, right))
            }
            _ => self.scalars(left, right),
        }
    }

    /// A comparator, when given, replaces the per-kind scalar rule
    fn scalars(&self, left: Value<'_>, right: Value<'_>) -> Result<i32> {
        if let Some(comparator) = &self.options.comparator {
            return Ok(sign(comparator.compare(left, right)));
        }
        let ordering = match (left, right) {
            (Value::Bool(l), Value::Bool(r)) => l.cmp(&r),
            (Value::I8(l), Value::I8(r)) => l.cmp(&r),
            (Value::I16(l), Value::I16(r)) => l.cmp(&r),
            (Value::I32(l), Value::I32(r)) => l.cmp(&r),
            (Value::I64(l), Value::I64(r)) => l.cmp(&r),
            (Value::F32(l), Value::F32(r)) => canonical_f32(l).total_cmp(&canonical_f32(r)),
            (Value::F64(l), Value::F64(r)) => canonical_f64(l).total_cmp(&canonical_f64(r)),
            (Value::Char(l), Value::Char(r)) => l.cmp(&r),
            // UTF-16 code unit order, the same units the string hash reads
            (Value::Str(l), Value::Str(r)) => l.encode_utf16().cmp(r.encode_utf16()),
            _ => return Err(kind_mismatch(left, right)),
        };
        Ok(sign(ordering))
    }

    fn arrays(&mut self, left: Array<'_>, right: Array<'_>) -> Result<i32> {
        let pair = ArrayPair::of(left, right).ok_or_else(|| {
            RefractError::type_mismatch(left.type_name(), right.type_name())
        })?;
        let (l, r) = pair.lengths();
        if l != r {
            return Ok(sign(l.cmp(&r)));
        }
        let mut comparison = 0;
        pair.zip(&mut |l, r| {
            comparison = self.values(l, r)?;
            Ok(comparison == 0)
        })?;
        Ok(comparison)
    }

    fn sequences(&mut self, left: &dyn Sequence, right: &dyn Sequence) -> Result<i32> {
        if left.len() != right.len() {
            return Ok(sign(left.len().cmp(&right.len())));
        }
        let mut comparison = 0;
        zip_sequences(left, right, &mut |l, r| {
            comparison = self.values(l, r)?;
            Ok(comparison == 0)
        })?;
        Ok(comparison)
    }

    fn maps(&mut self, left: &dyn Mapping, right: &dyn Mapping) -> Result<i32> {
        if left.len() != right.len() {
            return Ok(sign(left.len().cmp(&right.len())));
        }
        for ((lk, lv), (rk, rv)) in left.entries().zip(right.entries()) {
            let mut comparison = 0;
            lend_pair(lk, rk, &mut |lk, rk| {
                comparison = self.values(lk, rk)?;
                Ok(())
            })?;
            if comparison == 0 {
                lend_pair(lv, rv, &mut |lv, rv| {
                    comparison = self.values(lv, rv)?;
                    Ok(())
                })?;
            }
            if comparison != 0 {
                return Ok(comparison);
            }
        }
        Ok(0)
    }

    /// Objects already being compared higher up are ordered by address
    fn objects(&mut self, left: &dyn Reflect, right: &dyn Reflect) -> Result<i32> {
        if same_object(left, right) {
            return Ok(0);
        }
        let (lk, rk) = (VisitKey::of(left), VisitKey::of(right));
        if !self.ctx.enter_pair(lk, rk) {
            return Ok(sign(lk.address().cmp(&rk.address())));
        }
        let result = self.fields(left, right);
        self.ctx.leave_pair(lk, rk);
        result
    }

    fn fields(&mut self, left: &dyn Reflect, right: &dyn Reflect) -> Result<i32> {
        let common = common_type(left, right)?;
        for field in select_fields(common, &self.options.select, Algorithm::Compare) {
            let mut comparison = 0;
            field.read(left, &mut |l| {
                field.read(right, &mut |r| {
                    comparison = self.values(l, r)?;
                    Ok(())
                })
            })?;
            if comparison != 0 {
                return Ok(comparison);
            }
        }
        Ok(0)
    }
}

fn kind_mismatch(left: Value<'_>, right: Value<'_>) -> RefractError {
    RefractError::type_mismatch(left.type_name(), right.type_name())
}

/// Accumulating three-way comparison for hand-written orderings
///
/// Each append only runs while the result so far is 0.
///
/// ```
/// use refract_core::CompareBuilder;
///
/// let comparison = CompareBuilder::new()
///     .append(&1, &1)
///     .append(&[1, 2], &[1, 2, 3])
///     .append("z", "a")
///     .build()
///     .unwrap();
/// assert_eq!(comparison, -1);
/// ```
pub struct CompareBuilder<'o> {
    comparison: i32,
    error: Option<RefractError>,
    options: Cow<'o, OrderingOptions>,
}

impl Default for CompareBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'o> CompareBuilder<'o> {
    pub fn new() -> Self {
        Self {
            comparison: 0,
            error: None,
            options: Cow::Owned(OrderingOptions::default()),
        }
    }

    pub fn with_options(options: &'o OrderingOptions) -> Self {
        Self {
            comparison: 0,
            error: None,
            options: Cow::Borrowed(options),
        }
    }

    fn is_open(&self) -> bool {
        self.comparison == 0 && self.error.is_none()
    }

    fn record(&mut self, outcome: Result<i32>) {
        match outcome {
            Ok(comparison) => self.comparison = comparison,
            Err(e) => self.error = Some(e),
        }
    }

    pub fn append<L, R>(mut self, lhs: &L, rhs: &R) -> Self
    where
        L: Inspect + ?Sized,
        R: Inspect + ?Sized,
    {
        if !self.is_open() {
            return self;
        }
        let mut engine = Comparison::new(&self.options);
        let mut comparison = 0;
        let outcome = lhs
            .inspect(&mut |l| {
                rhs.inspect(&mut |r| {
                    comparison = engine.values(l, r)?;
                    Ok(())
                })
            })
            .map(|()| comparison);
        self.record(outcome);
        self
    }

    /// Compare with `comparator` instead of the per-kind rules. Arrays are
    /// still compared elementwise, with the comparator applied to elements.
    pub fn append_with<L, R>(mut self, lhs: &L, rhs: &R, comparator: &Comparator) -> Self
    where
        L: Inspect + ?Sized,
        R: Inspect + ?Sized,
    {
        if !self.is_open() {
            return self;
        }
        let options = OrderingOptions {
            select: self.options.select.clone(),
            comparator: Some(comparator.clone()),
        };
        let mut engine = Comparison::new(&options);
        let mut comparison = 0;
        let outcome = lhs
            .inspect(&mut |l| {
                rhs.inspect(&mut |r| {
                    comparison = engine.values(l, r)?;
                    Ok(())
                })
            })
            .map(|()| comparison);
        self.record(outcome);
        self
    }

    /// Fold in the result of an ancestor's own comparison
    pub fn append_super(mut self, super_compare: i32) -> Self {
        if self.is_open() {
            self.comparison = super_compare.signum();
        }
        self
    }

    /// Compare two objects field by field
    pub fn reflection_append(mut self, lhs: &dyn Reflect, rhs: &dyn Reflect) -> Self {
        if !self.is_open() {
            return self;
        }
        let outcome = Comparison::new(&self.options).objects(lhs, rhs);
        self.record(outcome);
        self
    }

    /// # Errors
    ///
    /// Returns the first error raised by an append.
    pub fn build(self) -> Result<i32> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.comparison),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn compare<L: Inspect + ?Sized, R: Inspect + ?Sized>(l: &L, r: &R) -> i32 {
        CompareBuilder::new().append(l, r).build().unwrap()
    }

    #[test]
    fn test_absence_sorts_first() {
        assert_eq!(compare(&None::<i32>, &Some(0)), -1);
        assert_eq!(compare(&Some(0), &None::<i32>), 1);
        assert_eq!(compare(&None::<i32>, &None::<i32>), 0);
    }

    #[test]
    fn test_shorter_array_sorts_first() {
        assert_eq!(compare(&[1, 2], &[1, 2, 3]), -1);
        assert_eq!(compare(&vec![9], &vec![1, 2]), -1);
        assert_eq!(compare(&[1, 3], &[1, 2]), 1);
    }

    #[test]
    fn test_false_before_true() {
        assert_eq!(compare(&false, &true), -1);
        assert_eq!(compare(&true, &false), 1);
    }

    #[test]
    fn test_float_total_order() {
        assert_eq!(compare(&-0.0f64, &0.0f64), -1);
        assert_eq!(compare(&f64::NAN, &f64::INFINITY), 1);
        assert_eq!(compare(&f64::NAN, &-f64::NAN), 0);
        assert_eq!(compare(&1.5f32, &1.5f32), 0);
    }

    #[test]
    fn test_strings_order_by_utf16_units() {
        // U+1F600 is a surrogate pair starting 0xD83D, below U+FF61
        assert_eq!(compare("\u{1F600}", "\u{FF61}"), -1);
        assert_eq!(compare("\u{FF61}", "\u{1F600}"), 1);
        assert_eq!(compare("ab", "abc"), -1);
        assert_eq!(compare("b", "abc"), 1);
    }

    #[test]
    fn test_btree_maps_compare_entry_by_entry() {
        use std::collections::BTreeMap;
        let a = BTreeMap::from([(1, "a"), (2, "b")]);
        let b = BTreeMap::from([(1, "a"), (2, "c")]);
        let c = BTreeMap::from([(1, "a"), (3, "a")]);
        assert_eq!(compare(&a, &a), 0);
        assert_eq!(compare(&a, &b), -1);
        assert_eq!(compare(&c, &a), 1);
    }

    #[test]
    fn test_kind_mismatch_is_an_error() {
        let err = CompareBuilder::new().append(&1i32, "1").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = CompareBuilder::new().append(&[1i32], &[1i64]).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_first_nonzero_wins() {
        let comparison = CompareBuilder::new()
            .append(&2, &1)
            .append(&1i32, "not reached")
            .build()
            .unwrap();
        assert_eq!(comparison, 1);
    }

    #[test]
    fn test_append_with_comparator() {
        let reverse = Comparator::new(|l, r| match (l, r) {
            (Value::I32(a), Value::I32(b)) => b.cmp(&a),
            _ => Ordering::Equal,
        });
        let comparison = CompareBuilder::new()
            .append_with(&1, &2, &reverse)
            .build()
            .unwrap();
        assert_eq!(comparison, 1);
        assert_eq!(CompareBuilder::new().append_super(-42).build().unwrap(), -1);
    }
}
