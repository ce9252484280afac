//! Structural hashing
//!
//! A running total starts at the seed and every participating value folds in
//! as `total * multiplier + contribution`, with wrapping 32-bit arithmetic.
//! Unlike equality and ordering there is no short-circuit: every field is
//! visited, in selector order, so equal values always hash alike.

use std::borrow::Cow;
use std::time::Instant;

use refract_core_types::Algorithm;

use crate::errors::{RefractError, Result};
use crate::model::{f32_bits, f64_bits, Array, Inspect, Mapping, Reflect, Sequence, Value};
use crate::options::{HashOptions, DEFAULT_MULTIPLIER, DEFAULT_SEED};
use crate::traversal::{select_fields, TraversalContext, VisitKey};
use crate::{log_op_end, log_op_error, log_op_start};

/// Hash a value field by field
///
/// An object root hashes its fields directly into the seeded total; any
/// other root is appended as a single value.
///
/// # Errors
///
/// Returns a usage error when `seed` or `multiplier` is even, and an access
/// error when a participating field cannot be read.
pub fn structural_hash<T>(value: &T, seed: i32, multiplier: i32, options: &HashOptions) -> Result<i32>
where
    T: Inspect + ?Sized,
{
    log_op_start!("structural_hash", seed = seed, multiplier = multiplier);
    let start = Instant::now();

    let hash = hash_root(value, seed, multiplier, options).map_err(|e| {
        log_op_error!(
            "structural_hash",
            e,
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "structural_hash",
        duration_ms = start.elapsed().as_millis() as u64,
        hash = hash
    );
    Ok(hash)
}

fn hash_root<T>(value: &T, seed: i32, multiplier: i32, options: &HashOptions) -> Result<i32>
where
    T: Inspect + ?Sized,
{
    let mut builder = HashBuilder::with_seed(seed, multiplier)?.with_options(options);
    value.inspect(&mut |v| match v.as_object() {
        Some(object) => builder.reflect_into(object),
        None => builder.value(v),
    })?;
    builder.build()
}

/// 32-bit fold of a 64-bit value
fn fold(v: i64) -> i32 {
    (v ^ (v >> 32)) as i32
}

/// 31-polynomial over UTF-16 code units
fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

fn scalar_hash(v: Value<'_>) -> Option<i32> {
    let hash = match v {
        Value::Bool(b) => i32::from(!b),
        Value::I8(n) => i32::from(n),
        Value::I16(n) => i32::from(n),
        Value::I32(n) => n,
        Value::I64(n) => fold(n),
        Value::F32(f) => f32_bits(f) as i32,
        Value::F64(f) => fold(f64_bits(f) as i64),
        Value::Char(c) => c as i32,
        Value::Str(s) => string_hash(s),
        _ => return None,
    };
    Some(hash)
}

/// Accumulating hash for hand-written per-type hashing
///
/// ```
/// use refract_core::HashBuilder;
///
/// let hash = HashBuilder::new().append(&true).build().unwrap();
/// assert_eq!(hash, 17 * 37);
///
/// assert!(HashBuilder::with_seed(2, 37).is_err());
/// ```
pub struct HashBuilder<'o> {
    total: i32,
    seed: i32,
    multiplier: i32,
    options: Cow<'o, HashOptions>,
    ctx: TraversalContext,
    error: Option<RefractError>,
}

impl Default for HashBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'o> HashBuilder<'o> {
    /// Seed 17, multiplier 37
    pub fn new() -> Self {
        Self {
            total: DEFAULT_SEED,
            seed: DEFAULT_SEED,
            multiplier: DEFAULT_MULTIPLIER,
            options: Cow::Owned(HashOptions::default()),
            ctx: TraversalContext::new(),
            error: None,
        }
    }

    /// # Errors
    ///
    /// Returns a usage error when either number is even.
    pub fn with_seed(seed: i32, multiplier: i32) -> Result<Self> {
        if seed % 2 == 0 {
            return Err(RefractError::usage("HashBuilder", "seed must be odd"));
        }
        if multiplier % 2 == 0 {
            return Err(RefractError::usage("HashBuilder", "multiplier must be odd"));
        }
        Ok(Self {
            total: seed,
            seed,
            multiplier,
            ..Self::new()
        })
    }

    pub fn with_options(mut self, options: &'o HashOptions) -> Self {
        self.options = Cow::Borrowed(options);
        self
    }

    fn step(&mut self, contribution: i32) {
        self.total = self.total.wrapping_mul(self.multiplier).wrapping_add(contribution);
    }

    pub fn append<T: Inspect + ?Sized>(mut self, value: &T) -> Self {
        if self.error.is_none() {
            let outcome = value.inspect(&mut |v| self.value(v));
            self.record(outcome);
        }
        self
    }

    fn record(&mut self, outcome: Result<()>) {
        if let Err(e) = outcome {
            self.error = Some(e);
        }
    }

    /// Fold in an ancestor's own hash
    pub fn append_super(mut self, super_hash: i32) -> Self {
        self.step(super_hash);
        self
    }

    /// Hash the fields of `object` straight into the running total
    pub fn reflection_append(mut self, object: &dyn Reflect) -> Self {
        if self.error.is_none() {
            let outcome = self.reflect_into(object);
            self.record(outcome);
        }
        self
    }

    fn reflect_into(&mut self, object: &dyn Reflect) -> Result<()> {
        let key = VisitKey::of(object);
        if !self.ctx.enter(key) {
            self.step(fold(key.address() as i64));
            return Ok(());
        }
        let result = self.fields(object);
        self.ctx.leave(key);
        result
    }

    /// # Errors
    ///
    /// Returns the first error raised by an append.
    pub fn build(self) -> Result<i32> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.total),
        }
    }

    fn value(&mut self, value: Value<'_>) -> Result<()> {
        if let Some(hash) = scalar_hash(value) {
            self.step(hash);
            return Ok(());
        }
        match value {
            Value::Null => {
                self.step(0);
                Ok(())
            }
            Value::Array(array) => self.array(array),
            Value::Seq(seq) => {
                let hash = self.nested(|b| b.sequence(seq))?;
                self.step(hash);
                Ok(())
            }
            Value::Map(map) => {
                let hash = self.nested(|b| b.mapping(map))?;
                self.step(hash);
                Ok(())
            }
            Value::Object(object) => {
                let hash = self.object_hash(object)?;
                self.step(hash);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn array(&mut self, array: Array<'_>) -> Result<()> {
        array.for_each(&mut |v| {
            self.value(v)?;
            Ok(true)
        })
    }

    fn sequence(&mut self, seq: &dyn Sequence) -> Result<()> {
        for item in seq.items() {
            item.inspect(&mut |v| self.value(v))?;
        }
        Ok(())
    }

    fn mapping(&mut self, map: &dyn Mapping) -> Result<()> {
        for (key, value) in map.entries() {
            key.inspect(&mut |k| self.value(k))?;
            value.inspect(&mut |v| self.value(v))?;
        }
        Ok(())
    }

    /// Run `fill` against a fresh seeded total and return what it produced,
    /// leaving the running total untouched
    fn nested(&mut self, fill: impl FnOnce(&mut Self) -> Result<()>) -> Result<i32> {
        let outer = std::mem::replace(&mut self.total, self.seed);
        let result = fill(self);
        let inner = std::mem::replace(&mut self.total, outer);
        result.map(|()| inner)
    }

    /// Hash of a composite field value; an object already in progress
    /// contributes its folded address
    fn object_hash(&mut self, object: &dyn Reflect) -> Result<i32> {
        let key = VisitKey::of(object);
        if !self.ctx.enter(key) {
            return Ok(fold(key.address() as i64));
        }
        let result = self.nested(|b| b.fields(object));
        self.ctx.leave(key);
        result
    }

    fn fields(&mut self, object: &dyn Reflect) -> Result<()> {
        for field in select_fields(object.type_info(), &self.options.select, Algorithm::Hash) {
            field.read(object, &mut |v| self.value(v))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn hash<T: Inspect + ?Sized>(value: &T) -> i32 {
        HashBuilder::new().append(value).build().unwrap()
    }

    #[test]
    fn test_string_hash_matches_utf16_polynomial() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 97 * 31 + 98);
        // one supplementary character is two code units
        assert_eq!(string_hash("\u{1F600}"), 0xD83D * 31 + 0xDE00);
    }

    #[test]
    fn test_boolean_contribution_is_inverted() {
        assert_eq!(hash(&true), 17 * 37);
        assert_eq!(hash(&false), 17 * 37 + 1);
    }

    #[test]
    fn test_wide_values_fold() {
        assert_eq!(fold(1 << 32), 1);
        assert_eq!(hash(&(1i64 << 32)), 17 * 37 + 1);
        assert_eq!(fold(-1), 0);
    }

    #[test]
    fn test_absent_value_only_multiplies() {
        assert_eq!(hash(&None::<i32>), 17 * 37);
    }

    #[test]
    fn test_arrays_are_flattened() {
        let flattened = HashBuilder::new().append(&1).append(&2).build().unwrap();
        assert_eq!(hash(&[1, 2]), flattened);
        assert_eq!(hash(&vec![1, 2]), flattened);
    }

    #[test]
    fn test_all_nans_hash_alike() {
        assert_eq!(hash(&f64::NAN), hash(&-f64::NAN));
        assert_eq!(hash(&f32::NAN), hash(&(f32::NAN * 0.5)));
        assert_ne!(hash(&0.0f64), hash(&-0.0f64));
    }

    #[test]
    fn test_even_seed_or_multiplier_is_rejected() {
        let err = HashBuilder::with_seed(16, 37).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(HashBuilder::with_seed(17, 36).is_err());
        assert!(HashBuilder::with_seed(-3, 7).is_ok());
    }

    #[test]
    fn test_arithmetic_wraps() {
        let hash = HashBuilder::with_seed(i32::MAX, 37)
            .unwrap()
            .append(&i32::MAX)
            .build()
            .unwrap();
        assert_eq!(hash, i32::MAX.wrapping_mul(37).wrapping_add(i32::MAX));
    }
}
