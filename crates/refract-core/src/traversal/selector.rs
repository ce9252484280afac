//! Field participation
//!
//! Fields are enumerated from the runtime type upward through its ancestors,
//! each level in declaration order. A field is dropped by the first matching
//! rule, in this precedence:
//!
//! 1. an exclusion marker for the algorithm (or for all algorithms)
//! 2. its name is in the caller's exclusion list
//! 3. it is synthetic (marked, or its name contains `$`)
//! 4. it is static, unless statics are requested
//! 5. it is transient, unless transients are requested

use refract_core_types::{Algorithm, FieldInfo, TypeInfo};

use crate::errors::Result;
use crate::log_decision;
use crate::model::{Reflect, Visit};
use crate::options::SelectOptions;
use crate::schema::DECISION_EXCLUDE;

/// A participating field, bound to the ancestor level that declares it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    declaring: &'static TypeInfo,
    field: &'static FieldInfo,
}

impl FieldDescriptor {
    pub fn new(declaring: &'static TypeInfo, field: &'static FieldInfo) -> Self {
        Self { declaring, field }
    }

    pub fn declaring(&self) -> &'static TypeInfo {
        self.declaring
    }

    pub fn name(&self) -> &'static str {
        self.field.name()
    }

    pub fn info(&self) -> &'static FieldInfo {
        self.field
    }

    pub fn is_summary(&self) -> bool {
        self.field.is_summary()
    }

    /// True when `object`'s type carries this field's declaring level
    pub fn is_present_in(&self, object: &dyn Reflect) -> bool {
        object.type_info().is_a(self.declaring)
    }

    /// Read this field of `object`
    ///
    /// # Errors
    ///
    /// Returns an access error naming the declaring type and field when the
    /// value cannot be read; errors from `visit` pass through unchanged.
    pub fn read(&self, object: &dyn Reflect, visit: &mut Visit<'_>) -> Result<()> {
        object
            .read_field(self.declaring, self.field.name(), visit)
            .map_err(|e| e.in_field(self.declaring.name(), self.field.name()))
    }
}

/// Why a field does not participate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Marker,
    Named,
    Synthetic,
    Static,
    Transient,
}

impl Exclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exclusion::Marker => "marker",
            Exclusion::Named => "named",
            Exclusion::Synthetic => "synthetic",
            Exclusion::Static => "static",
            Exclusion::Transient => "transient",
        }
    }
}

/// First exclusion rule matching `field`, or `None` when it participates
pub fn exclusion(
    field: &FieldInfo,
    options: &SelectOptions,
    algorithm: Algorithm,
) -> Option<Exclusion> {
    if field.is_excluded_from(algorithm) {
        Some(Exclusion::Marker)
    } else if options.is_excluded_name(field.name()) {
        Some(Exclusion::Named)
    } else if field.is_synthetic() {
        Some(Exclusion::Synthetic)
    } else if field.is_static() && !options.include_static {
        Some(Exclusion::Static)
    } else if field.is_transient() && !options.include_transient {
        Some(Exclusion::Transient)
    } else {
        None
    }
}

/// Participating fields of `ty` and its ancestors, nearest level first
///
/// The walk stops after `options.stop_at` when that type is in the chain,
/// otherwise at the root.
pub fn select_fields(
    ty: &'static TypeInfo,
    options: &SelectOptions,
    algorithm: Algorithm,
) -> Vec<FieldDescriptor> {
    let mut selected = Vec::new();
    for level in ty.ancestors() {
        for field in level.fields() {
            match exclusion(field, options, algorithm) {
                None => selected.push(FieldDescriptor::new(level, field)),
                Some(reason) => log_decision!(
                    DECISION_EXCLUDE,
                    level.name(),
                    field_name = field.name(),
                    algorithm = algorithm.as_str(),
                    reason = reason.as_str(),
                ),
            }
        }
        if options.stop_at.is_some_and(|stop| stop == level) {
            break;
        }
    }
    selected
}
