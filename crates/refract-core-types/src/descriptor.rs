//! Type and field descriptors
//!
//! A `TypeInfo` is the runtime description of one composite type: its name,
//! the ordered table of fields it declares itself, and an optional link to the
//! ancestor type whose fields it also carries. Descriptors are immutable and
//! normally live in `static` items, so the field table of a type is computed
//! once and is identical on every call.

use std::fmt;
use std::hash::{Hash, Hasher};

/// The structural algorithms a field can be excluded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Equals,
    Hash,
    Compare,
    Diff,
    Render,
}

impl Algorithm {
    /// All algorithms, in a stable order
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Equals,
        Algorithm::Hash,
        Algorithm::Compare,
        Algorithm::Diff,
        Algorithm::Render,
    ];

    /// Stable lowercase name, used as a logging field value
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Equals => "equals",
            Algorithm::Hash => "hash",
            Algorithm::Compare => "compare",
            Algorithm::Diff => "diff",
            Algorithm::Render => "render",
        }
    }

    const fn exclusion_bit(self) -> u16 {
        match self {
            Algorithm::Equals => EXCLUDE_EQUALS,
            Algorithm::Hash => EXCLUDE_HASH,
            Algorithm::Compare => EXCLUDE_COMPARE,
            Algorithm::Diff => EXCLUDE_DIFF,
            Algorithm::Render => EXCLUDE_RENDER,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TRANSIENT: u16 = 1 << 0;
const SYNTHETIC: u16 = 1 << 1;
const STATIC: u16 = 1 << 2;
const SUMMARY: u16 = 1 << 3;
const EXCLUDE_EQUALS: u16 = 1 << 8;
const EXCLUDE_HASH: u16 = 1 << 9;
const EXCLUDE_COMPARE: u16 = 1 << 10;
const EXCLUDE_DIFF: u16 = 1 << 11;
const EXCLUDE_RENDER: u16 = 1 << 12;
const EXCLUDE_ALL: u16 =
    EXCLUDE_EQUALS | EXCLUDE_HASH | EXCLUDE_COMPARE | EXCLUDE_DIFF | EXCLUDE_RENDER;

/// One declared field: its name and marker flags
///
/// Markers are attached with the `const` builder methods, so field tables can
/// be written directly in `static` initializers:
///
/// ```
/// use refract_core_types::{Algorithm, FieldInfo};
///
/// const CACHE: FieldInfo = FieldInfo::new("cache").transient().exclude_render();
/// assert!(CACHE.is_transient());
/// assert!(CACHE.is_excluded_from(Algorithm::Render));
/// assert!(!CACHE.is_excluded_from(Algorithm::Equals));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldInfo {
    name: &'static str,
    markers: u16,
}

impl FieldInfo {
    pub const fn new(name: &'static str) -> Self {
        Self { name, markers: 0 }
    }

    const fn mark(self, bit: u16) -> Self {
        Self {
            name: self.name,
            markers: self.markers | bit,
        }
    }

    /// Skipped by every algorithm unless the caller opts in to transients
    pub const fn transient(self) -> Self {
        self.mark(TRANSIENT)
    }

    /// Compiler- or macro-generated field; never participates
    pub const fn synthetic(self) -> Self {
        self.mark(SYNTHETIC)
    }

    /// Type-level value rather than per-instance state
    pub const fn declared_static(self) -> Self {
        self.mark(STATIC)
    }

    /// Rendered as a size/type summary instead of full detail
    pub const fn summary(self) -> Self {
        self.mark(SUMMARY)
    }

    /// Excluded from every algorithm
    pub const fn exclude(self) -> Self {
        self.mark(EXCLUDE_ALL)
    }

    pub const fn exclude_equals(self) -> Self {
        self.mark(EXCLUDE_EQUALS)
    }

    pub const fn exclude_hash(self) -> Self {
        self.mark(EXCLUDE_HASH)
    }

    pub const fn exclude_compare(self) -> Self {
        self.mark(EXCLUDE_COMPARE)
    }

    pub const fn exclude_diff(self) -> Self {
        self.mark(EXCLUDE_DIFF)
    }

    pub const fn exclude_render(self) -> Self {
        self.mark(EXCLUDE_RENDER)
    }

    /// Exclude from a single algorithm chosen at runtime
    pub const fn excluded_from(self, algorithm: Algorithm) -> Self {
        self.mark(algorithm.exclusion_bit())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_transient(&self) -> bool {
        self.markers & TRANSIENT != 0
    }

    /// True for marked fields and for names following the generated-name
    /// pattern (containing `$`)
    pub fn is_synthetic(&self) -> bool {
        self.markers & SYNTHETIC != 0 || self.name.contains('$')
    }

    pub fn is_static(&self) -> bool {
        self.markers & STATIC != 0
    }

    pub fn is_summary(&self) -> bool {
        self.markers & SUMMARY != 0
    }

    pub fn is_excluded_from(&self, algorithm: Algorithm) -> bool {
        self.markers & algorithm.exclusion_bit() != 0
    }
}

/// Runtime description of a composite type
///
/// Identity is the fully-qualified `name`: two descriptors with the same name
/// describe the same type.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    name: &'static str,
    short_name: &'static str,
    parent: Option<fn() -> &'static TypeInfo>,
    fields: &'static [FieldInfo],
}

impl TypeInfo {
    pub const fn new(
        name: &'static str,
        short_name: &'static str,
        fields: &'static [FieldInfo],
    ) -> Self {
        Self {
            name,
            short_name,
            parent: None,
            fields,
        }
    }

    /// Link the ancestor type whose fields this type also carries
    pub const fn with_parent(self, parent: fn() -> &'static TypeInfo) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    /// Fully-qualified name (module path included)
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name without the module path
    pub fn short_name(&self) -> &'static str {
        self.short_name
    }

    /// Fields declared by this type itself, in declaration order
    pub fn fields(&self) -> &'static [FieldInfo] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn parent(&self) -> Option<&'static TypeInfo> {
        self.parent.map(|parent| parent())
    }

    /// This type followed by each ancestor, nearest first
    pub fn ancestors(&'static self) -> Ancestors {
        Ancestors { next: Some(self) }
    }

    /// True when `other` is this type or one of its ancestors, i.e. a value
    /// of this type is an instance of `other`
    pub fn is_a(&self, other: &TypeInfo) -> bool {
        if self == other {
            return true;
        }
        let mut current = self.parent();
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.parent();
        }
        false
    }

    /// Number of ancestor links between this type and the root of its chain
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(ty) = current {
            depth += 1;
            current = ty.parent();
        }
        depth
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Iterator over a type and its ancestors
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<&'static TypeInfo>,
}

impl Iterator for Ancestors {
    type Item = &'static TypeInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
