//! Field-level introspection of composite values

use super::value::Visit;
use crate::errors::Result;
use refract_core_types::TypeInfo;

/// A composite value whose fields the structural algorithms can read
///
/// Object-safe: engines only ever see `&dyn Reflect`. Implementations are
/// normally generated by [`reflect!`](crate::reflect).
pub trait Reflect {
    /// Descriptor of the value's runtime type
    fn type_info(&self) -> &'static TypeInfo;

    /// Lend the value of field `name`, declared by `declaring` (this type or
    /// one of its ancestors), to `visit`
    ///
    /// # Errors
    ///
    /// Returns an access error when no such field is declared at that level
    /// or the field cannot be read, and propagates errors from `visit`.
    fn read_field(&self, declaring: &TypeInfo, name: &str, visit: &mut Visit<'_>) -> Result<()>;

    /// Reference identity of this value
    fn address(&self) -> usize {
        (self as *const Self).cast::<()>() as usize
    }
}

/// Static access to a type's descriptor
pub trait Describe {
    fn describe() -> &'static TypeInfo;
}

/// True when both views refer to the same object of the same type
pub fn same_object(left: &dyn Reflect, right: &dyn Reflect) -> bool {
    left.address() == right.address() && left.type_info() == right.type_info()
}

/// Declare `Describe`, `Reflect` and `Inspect` for a struct
///
/// Fields are listed in the order the algorithms visit them. Markers are
/// written as bare attributes in front of a field name: `#[transient]`,
/// `#[synthetic]`, `#[summary]`, `#[exclude]`, and the per-algorithm
/// `#[exclude_equals]`, `#[exclude_hash]`, `#[exclude_compare]`,
/// `#[exclude_diff]` and `#[exclude_render]`.
///
/// An ancestor type is embedded by composition and named with
/// `extends Parent => field`; the embedding field itself is not listed.
/// Type-level values go in a trailing `static { NAME = expr }` block.
///
/// ```
/// use refract_core::{reflect, Describe};
///
/// pub struct Shape {
///     id: i32,
/// }
///
/// pub struct Circle {
///     base: Shape,
///     radius: f64,
///     cached_area: Option<f64>,
/// }
///
/// reflect!(Shape { id });
/// reflect! {
///     Circle extends Shape => base {
///         radius,
///         #[transient] cached_area,
///     }
///     static {
///         SIDES = 0i32,
///     }
/// }
///
/// let info = Circle::describe();
/// assert_eq!(info.short_name(), "Circle");
/// assert_eq!(info.parent().map(|p| p.short_name()), Some("Shape"));
/// assert!(info.field("cached_area").is_some_and(|f| f.is_transient()));
/// assert!(info.field("SIDES").is_some_and(|f| f.is_static()));
/// ```
#[macro_export]
macro_rules! reflect {
    (
        $ty:ident $(extends $parent:ty => $base:ident)? {
            $( $(#[$marker:ident])* $field:ident ),* $(,)?
        }
        $( static {
            $( $(#[$smarker:ident])* $sname:ident = $sexpr:expr ),* $(,)?
        } )?
    ) => {
        impl $crate::Describe for $ty {
            fn describe() -> &'static $crate::TypeInfo {
                const FIELDS: &[$crate::FieldInfo] = &[
                    $( $crate::FieldInfo::new(stringify!($field)) $(.$marker())* , )*
                    $($(
                        $crate::FieldInfo::new(stringify!($sname))
                            .declared_static() $(.$smarker())* ,
                    )*)?
                ];
                static INFO: $crate::TypeInfo = $crate::TypeInfo::new(
                    concat!(module_path!(), "::", stringify!($ty)),
                    stringify!($ty),
                    FIELDS,
                ) $(.with_parent(<$parent as $crate::Describe>::describe))?;
                &INFO
            }
        }

        impl $crate::Reflect for $ty {
            fn type_info(&self) -> &'static $crate::TypeInfo {
                <Self as $crate::Describe>::describe()
            }

            fn read_field(
                &self,
                declaring: &$crate::TypeInfo,
                name: &str,
                visit: &mut $crate::Visit<'_>,
            ) -> $crate::Result<()> {
                if declaring == <Self as $crate::Describe>::describe() {
                    $(
                        if name == stringify!($field) {
                            return $crate::Inspect::inspect(&self.$field, visit);
                        }
                    )*
                    $($(
                        if name == stringify!($sname) {
                            return $crate::Inspect::inspect(&$sexpr, visit);
                        }
                    )*)?
                    return Err($crate::RefractError::no_such_field(declaring.name(), name));
                }
                let base: Option<&dyn $crate::Reflect> =
                    None $(.or(Some(&self.$base as &dyn $crate::Reflect)))?;
                match base {
                    Some(base) => base.read_field(declaring, name, visit),
                    None => Err($crate::RefractError::no_such_field(declaring.name(), name)),
                }
            }
        }

        impl $crate::Inspect for $ty {
            fn inspect(&self, visit: &mut $crate::Visit<'_>) -> $crate::Result<()> {
                visit($crate::Value::Object(self))
            }
        }
    };
}
