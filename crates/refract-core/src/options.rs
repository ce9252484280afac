//! Per-call configuration of the structural algorithms
//!
//! All option types are plain serde values so they can be loaded from any
//! configuration source. Runtime-only parts (the ancestor stop type and
//! custom comparators) are skipped by serde.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::Value;
use crate::render::RenderStyle;
use refract_core_types::TypeInfo;

/// Default initial accumulator of the hash engine
pub const DEFAULT_SEED: i32 = 17;

/// Default multiplier of the hash engine
pub const DEFAULT_MULTIPLIER: i32 = 37;

/// Which fields participate in a traversal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOptions {
    /// Field names excluded at every level of the type chain
    pub exclude_fields: Vec<String>,
    /// Include fields marked transient
    pub include_transient: bool,
    /// Include type-level (static) fields
    pub include_static: bool,
    /// Last ancestor whose fields are visited; the whole chain when unset or
    /// when the type is not an ancestor of the traversed value
    #[serde(skip)]
    pub stop_at: Option<&'static TypeInfo>,
}

impl SelectOptions {
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_fields.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_transients(mut self) -> Self {
        self.include_transient = true;
        self
    }

    pub fn with_statics(mut self) -> Self {
        self.include_static = true;
        self
    }

    pub fn up_to(mut self, ancestor: &'static TypeInfo) -> Self {
        self.stop_at = Some(ancestor);
        self
    }

    pub(crate) fn is_excluded_name(&self, name: &str) -> bool {
        self.exclude_fields.iter().any(|excluded| excluded == name)
    }
}

type CompareFn = dyn Fn(Value<'_>, Value<'_>) -> Ordering + Send + Sync;

/// Caller-supplied ordering of two non-array values
///
/// Used by equality (equal when the ordering is `Equal`) and by ordering in
/// place of the built-in per-kind rule.
#[derive(Clone)]
pub struct Comparator(Arc<CompareFn>);

impl Comparator {
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(Value<'_>, Value<'_>) -> Ordering + Send + Sync + 'static,
    {
        Self(Arc::new(compare))
    }

    pub fn compare(&self, left: Value<'_>, right: Value<'_>) -> Ordering {
        (self.0)(left, right)
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(..)")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualityOptions {
    #[serde(flatten)]
    pub select: SelectOptions,
    #[serde(skip)]
    pub comparator: Option<Comparator>,
}

impl EqualityOptions {
    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = Some(comparator);
        self
    }
}

impl From<SelectOptions> for EqualityOptions {
    fn from(select: SelectOptions) -> Self {
        Self {
            select,
            comparator: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingOptions {
    #[serde(flatten)]
    pub select: SelectOptions,
    #[serde(skip)]
    pub comparator: Option<Comparator>,
}

impl OrderingOptions {
    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = Some(comparator);
        self
    }
}

impl From<SelectOptions> for OrderingOptions {
    fn from(select: SelectOptions) -> Self {
        Self {
            select,
            comparator: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashOptions {
    #[serde(flatten)]
    pub select: SelectOptions,
}

impl From<SelectOptions> for HashOptions {
    fn from(select: SelectOptions) -> Self {
        Self { select }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    #[serde(flatten)]
    pub select: SelectOptions,
    /// Return an empty result without reading fields when the roots are
    /// structurally equal
    pub test_trivially_equal: bool,
    /// Diff composite field values field by field instead of reporting the
    /// whole value as one entry
    pub nested: bool,
    /// Style used to render the result
    pub style: RenderStyle,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            select: SelectOptions::default(),
            test_trivially_equal: true,
            nested: false,
            style: RenderStyle::default(),
        }
    }
}

impl DiffOptions {
    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }

    pub fn without_trivial_check(mut self) -> Self {
        self.test_trivially_equal = false;
        self
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    #[serde(flatten)]
    pub select: SelectOptions,
    /// Skip fields whose value is absent
    pub exclude_null_values: bool,
    /// Override the style's default detail level for every field
    pub full_detail: Option<bool>,
}

impl From<SelectOptions> for RenderOptions {
    fn from(select: SelectOptions) -> Self {
        Self {
            select,
            ..Self::default()
        }
    }
}
