//! Diff engine
//!
//! Walks the fields of two related objects and records one entry per field
//! whose values are not structurally equal. Arrays and collections are
//! always one entry. Objects are one entry unless a nested diff is asked
//! for, in which case their own fields are walked under a dotted path.

use std::borrow::Cow;
use std::time::Instant;

use refract_core_types::{Algorithm, TypeInfo};

use super::model::{DiffEntry, DiffResult, OwnedValue};
use crate::equality::{test_type, values_equal, Equality};
use crate::errors::{RefractError, Result};
use crate::model::{same_object, Inspect, Reflect, Value};
use crate::options::{DiffOptions, EqualityOptions};
use crate::render::RenderStyle;
use crate::traversal::{select_fields, TraversalContext, VisitKey};
use crate::{log_op_end, log_op_error, log_op_start};

/// Diff two objects of related types field by field
///
/// The result is empty exactly when the two objects are structurally equal
/// under the same field selection. A field declared by a level that one side
/// lacks is always reported, with `Null` on the missing side.
///
/// # Errors
///
/// Returns a type mismatch error when neither type is an ancestor of the
/// other, and an access error when a participating field cannot be read.
pub fn structural_diff<'a>(
    lhs: &'a dyn Reflect,
    rhs: &'a dyn Reflect,
    options: &DiffOptions,
) -> Result<DiffResult<'a>> {
    log_op_start!(
        "structural_diff",
        left_type = lhs.type_info().name(),
        right_type = rhs.type_info().name()
    );
    let start = Instant::now();

    let diff = diff_objects(lhs, rhs, options).map_err(|e| {
        log_op_error!(
            "structural_diff",
            e,
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "structural_diff",
        duration_ms = start.elapsed().as_millis() as u64,
        entries = diff.len()
    );
    Ok(diff)
}

fn diff_objects<'a>(
    lhs: &'a dyn Reflect,
    rhs: &'a dyn Reflect,
    options: &DiffOptions,
) -> Result<DiffResult<'a>> {
    let test = test_type(lhs, rhs).ok_or_else(|| {
        RefractError::type_mismatch(lhs.type_info().name(), rhs.type_info().name())
    })?;
    let mut builder = DiffBuilder::with_style(lhs, rhs, Cow::Owned(options.style.clone()))
        .with_equality(EqualityOptions::from(options.select.clone()))
        .with_trivial_check(options.test_trivially_equal);
    if !builder.is_trivially_equal() {
        let mut walker = Walker {
            options,
            ctx: TraversalContext::new(),
        };
        let (lk, rk) = (VisitKey::of(lhs), VisitKey::of(rhs));
        walker.ctx.enter_pair(lk, rk);
        let result = walker.fields("", lhs, rhs, test, &mut builder);
        walker.ctx.leave_pair(lk, rk);
        result?;
    }
    builder.build()
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Reflective field walk feeding a `DiffBuilder`
struct Walker<'o> {
    options: &'o DiffOptions,
    ctx: TraversalContext,
}

impl Walker<'_> {
    fn fields(
        &mut self,
        prefix: &str,
        lhs: &dyn Reflect,
        rhs: &dyn Reflect,
        test: &'static TypeInfo,
        builder: &mut DiffBuilder<'_>,
    ) -> Result<()> {
        for field in select_fields(test, &self.options.select, Algorithm::Diff) {
            let path = join(prefix, field.name());
            match (field.is_present_in(lhs), field.is_present_in(rhs)) {
                (true, true) => field.read(lhs, &mut |l| {
                    field.read(rhs, &mut |r| self.pair(&path, l, r, builder))
                })?,
                (true, false) => {
                    field.read(lhs, &mut |l| builder.record_missing(&path, l, Value::Null))?
                }
                (false, true) => {
                    field.read(rhs, &mut |r| builder.record_missing(&path, Value::Null, r))?
                }
                (false, false) => {}
            }
        }
        Ok(())
    }

    fn pair(
        &mut self,
        path: &str,
        left: Value<'_>,
        right: Value<'_>,
        builder: &mut DiffBuilder<'_>,
    ) -> Result<()> {
        match (left, right) {
            (Value::Object(l), Value::Object(r)) if self.options.nested => {
                self.nested(path, l, r, builder)
            }
            _ => builder.record(path, left, right),
        }
    }

    /// Objects already being diffed higher up, and unrelated types, are
    /// reported whole
    fn nested(
        &mut self,
        path: &str,
        lhs: &dyn Reflect,
        rhs: &dyn Reflect,
        builder: &mut DiffBuilder<'_>,
    ) -> Result<()> {
        if same_object(lhs, rhs) {
            return Ok(());
        }
        let Some(test) = test_type(lhs, rhs) else {
            return builder.record(path, Value::Object(lhs), Value::Object(rhs));
        };
        let (lk, rk) = (VisitKey::of(lhs), VisitKey::of(rhs));
        if !self.ctx.enter_pair(lk, rk) {
            return builder.record(path, Value::Object(lhs), Value::Object(rhs));
        }
        let result = self.fields(path, lhs, rhs, test, builder);
        self.ctx.leave_pair(lk, rk);
        result
    }
}

/// Accumulating diff for hand-written per-type diffs
///
/// ```
/// use refract_core::{reflect, DiffBuilder, DEFAULT_STYLE};
///
/// pub struct Flag {
///     on: bool,
/// }
/// reflect!(Flag { on });
///
/// let (a, b) = (Flag { on: true }, Flag { on: false });
/// let diff = DiffBuilder::new(&a, &b, &DEFAULT_STYLE)
///     .append("on", &a.on, &b.on)
///     .build()
///     .unwrap();
/// assert_eq!(diff.len(), 1);
/// assert_eq!(diff.entries()[0].path, "on");
/// ```
pub struct DiffBuilder<'a> {
    left: &'a dyn Reflect,
    right: &'a dyn Reflect,
    style: Cow<'a, RenderStyle>,
    equality: EqualityOptions,
    test_trivially_equal: bool,
    trivially_equal: Option<bool>,
    entries: Vec<DiffEntry>,
    error: Option<RefractError>,
}

impl<'a> DiffBuilder<'a> {
    /// Differences are rendered with `style`. The trivially-equal check is
    /// on: when the two objects are the same object or structurally equal,
    /// every append is skipped.
    pub fn new(lhs: &'a dyn Reflect, rhs: &'a dyn Reflect, style: &'a RenderStyle) -> Self {
        Self::with_style(lhs, rhs, Cow::Borrowed(style))
    }

    fn with_style(lhs: &'a dyn Reflect, rhs: &'a dyn Reflect, style: Cow<'a, RenderStyle>) -> Self {
        Self {
            left: lhs,
            right: rhs,
            style,
            equality: EqualityOptions::default(),
            test_trivially_equal: true,
            trivially_equal: None,
            entries: Vec::new(),
            error: None,
        }
    }

    fn with_equality(mut self, equality: EqualityOptions) -> Self {
        self.equality = equality;
        self
    }

    pub fn with_trivial_check(mut self, check: bool) -> Self {
        self.test_trivially_equal = check;
        self
    }

    /// Decided once, on first use
    fn is_trivially_equal(&mut self) -> bool {
        if !self.test_trivially_equal {
            return false;
        }
        if let Some(equal) = self.trivially_equal {
            return equal;
        }
        let equal = same_object(self.left, self.right)
            || match Equality::new(&self.equality).objects(self.left, self.right) {
                Ok(equal) => equal,
                Err(e) => {
                    self.error = Some(e);
                    false
                }
            };
        self.trivially_equal = Some(equal);
        equal
    }

    fn is_open(&mut self) -> bool {
        let trivial = self.is_trivially_equal();
        self.error.is_none() && !trivial
    }

    fn push(&mut self, path: &str, left: Value<'_>, right: Value<'_>) -> Result<()> {
        self.entries.push(DiffEntry {
            path: path.to_string(),
            left: OwnedValue::capture(left, &self.style)?,
            right: OwnedValue::capture(right, &self.style)?,
        });
        Ok(())
    }

    /// Add an entry unless the two values are structurally equal
    fn record(&mut self, path: &str, left: Value<'_>, right: Value<'_>) -> Result<()> {
        if values_equal(left, right, &self.equality)? {
            return Ok(());
        }
        self.push(path, left, right)
    }

    /// A field one side does not have differs whatever its value
    fn record_missing(&mut self, path: &str, left: Value<'_>, right: Value<'_>) -> Result<()> {
        self.push(path, left, right)
    }

    pub fn append<L, R>(mut self, field: &str, lhs: &L, rhs: &R) -> Self
    where
        L: Inspect + ?Sized,
        R: Inspect + ?Sized,
    {
        if !self.is_open() {
            return self;
        }
        let outcome = lhs.inspect(&mut |l| rhs.inspect(&mut |r| self.record(field, l, r)));
        if let Err(e) = outcome {
            self.error = Some(e);
        }
        self
    }

    /// Add every entry of a nested diff under `field.`
    pub fn append_diff(mut self, field: &str, diff: &DiffResult<'_>) -> Self {
        if !self.is_open() {
            return self;
        }
        self.entries.extend(diff.iter().map(|entry| DiffEntry {
            path: join(field, &entry.path),
            left: entry.left.clone(),
            right: entry.right.clone(),
        }));
        self
    }

    /// # Errors
    ///
    /// Returns the first error raised by an append or by the
    /// trivially-equal check.
    pub fn build(self) -> Result<DiffResult<'a>> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(DiffResult {
            left: self.left,
            right: self.right,
            entries: self.entries,
            style: self.style,
        })
    }
}
