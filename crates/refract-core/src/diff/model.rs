//! Diff output types
//!
//! Entries own their values: a `DiffResult` stays valid, and comparable,
//! after the fields it was computed from have changed. Composite values are
//! captured as their rendered text.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::summary::DIFFERS_FROM;
use crate::errors::Result;
use crate::model::{Array, Elements, Entries, Inspect, Mapping, Reflect, Value, Visit};
use crate::render::{RenderStyle, Renderer, DEFAULT_STYLE, NO_OPTIONS};

/// Owned copy of a `Value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OwnedValue {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
    Array(OwnedArray),
    Seq(Vec<OwnedValue>),
    Map(Vec<(OwnedValue, OwnedValue)>),
    /// An object, kept as its rendering in the diff's style
    Object { type_name: String, text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum OwnedArray {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Char(Vec<char>),
    Object(Vec<OwnedValue>),
}

impl OwnedValue {
    /// Copy `value`, rendering any object it holds with `style`
    ///
    /// # Errors
    ///
    /// Returns an access error when an element or entry cannot be read, and
    /// any error raised while rendering an object.
    pub fn capture(value: Value<'_>, style: &RenderStyle) -> Result<Self> {
        let owned = match value {
            Value::Null => OwnedValue::Null,
            Value::Bool(b) => OwnedValue::Bool(b),
            Value::I8(n) => OwnedValue::I8(n),
            Value::I16(n) => OwnedValue::I16(n),
            Value::I32(n) => OwnedValue::I32(n),
            Value::I64(n) => OwnedValue::I64(n),
            Value::F32(f) => OwnedValue::F32(f),
            Value::F64(f) => OwnedValue::F64(f),
            Value::Char(c) => OwnedValue::Char(c),
            Value::Str(s) => OwnedValue::Str(s.to_string()),
            Value::Array(array) => OwnedValue::Array(OwnedArray::capture(array, style)?),
            Value::Seq(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for item in seq.items() {
                    item.inspect(&mut |v| {
                        items.push(Self::capture(v, style)?);
                        Ok(())
                    })?;
                }
                OwnedValue::Seq(items)
            }
            Value::Map(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, value) in map.entries() {
                    let mut entry = (OwnedValue::Null, OwnedValue::Null);
                    key.inspect(&mut |k| {
                        entry.0 = Self::capture(k, style)?;
                        Ok(())
                    })?;
                    value.inspect(&mut |v| {
                        entry.1 = Self::capture(v, style)?;
                        Ok(())
                    })?;
                    entries.push(entry);
                }
                OwnedValue::Map(entries)
            }
            Value::Object(object) => {
                let mut text = String::new();
                Renderer::new(style, &NO_OPTIONS).root(&mut text, object)?;
                OwnedValue::Object {
                    type_name: object.type_info().short_name().to_string(),
                    text,
                }
            }
        };
        Ok(owned)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, OwnedValue::Null)
    }
}

impl OwnedArray {
    fn capture(array: Array<'_>, style: &RenderStyle) -> Result<Self> {
        let owned = match array {
            Array::I8(items) => OwnedArray::I8(items.to_vec()),
            Array::I16(items) => OwnedArray::I16(items.to_vec()),
            Array::I32(items) => OwnedArray::I32(items.to_vec()),
            Array::I64(items) => OwnedArray::I64(items.to_vec()),
            Array::F32(items) => OwnedArray::F32(items.to_vec()),
            Array::F64(items) => OwnedArray::F64(items.to_vec()),
            Array::Bool(items) => OwnedArray::Bool(items.to_vec()),
            Array::Char(items) => OwnedArray::Char(items.to_vec()),
            Array::Object(_) => {
                let mut items = Vec::with_capacity(array.len());
                array.for_each(&mut |v| {
                    items.push(OwnedValue::capture(v, style)?);
                    Ok(true)
                })?;
                OwnedArray::Object(items)
            }
        };
        Ok(owned)
    }
}

struct OwnedEntries<'a>(&'a [(OwnedValue, OwnedValue)]);

impl Mapping for OwnedEntries<'_> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn entries(&self) -> Entries<'_> {
        Box::new(
            self.0
                .iter()
                .map(|(key, value)| (key as &dyn Inspect, value as &dyn Inspect)),
        )
    }
}

/// Captured objects read back as their text
impl Inspect for OwnedValue {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        match self {
            OwnedValue::Null => visit(Value::Null),
            OwnedValue::Bool(b) => visit(Value::Bool(*b)),
            OwnedValue::I8(n) => visit(Value::I8(*n)),
            OwnedValue::I16(n) => visit(Value::I16(*n)),
            OwnedValue::I32(n) => visit(Value::I32(*n)),
            OwnedValue::I64(n) => visit(Value::I64(*n)),
            OwnedValue::F32(f) => visit(Value::F32(*f)),
            OwnedValue::F64(f) => visit(Value::F64(*f)),
            OwnedValue::Char(c) => visit(Value::Char(*c)),
            OwnedValue::Str(s) => visit(Value::Str(s)),
            OwnedValue::Array(array) => array.inspect(visit),
            OwnedValue::Seq(items) => visit(Value::Seq(&Elements(items))),
            OwnedValue::Map(entries) => visit(Value::Map(&OwnedEntries(entries))),
            OwnedValue::Object { text, .. } => visit(Value::Str(text)),
        }
    }
}

impl Inspect for OwnedArray {
    fn inspect(&self, visit: &mut Visit<'_>) -> Result<()> {
        let array = match self {
            OwnedArray::I8(items) => Array::I8(items),
            OwnedArray::I16(items) => Array::I16(items),
            OwnedArray::I32(items) => Array::I32(items),
            OwnedArray::I64(items) => Array::I64(items),
            OwnedArray::F32(items) => Array::F32(items),
            OwnedArray::F64(items) => Array::F64(items),
            OwnedArray::Bool(items) => Array::Bool(items),
            OwnedArray::Char(items) => Array::Char(items),
            OwnedArray::Object(items) => return visit(Value::Array(Array::Object(&Elements(items)))),
        };
        visit(Value::Array(array))
    }
}

/// Rendered with the DEFAULT style
impl fmt::Display for OwnedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let OwnedValue::Object { text, .. } = self {
            return f.write_str(text);
        }
        let mut renderer = Renderer::new(&DEFAULT_STYLE, &NO_OPTIONS);
        let mut text = String::new();
        self.inspect(&mut |v| renderer.value(&mut text, v, true))
            .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// One differing field: its dotted path and both sides' values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub path: String,
    pub left: OwnedValue,
    pub right: OwnedValue,
}

impl fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.path, self.left, self.right)
    }
}

/// Differences between two objects, in field order
///
/// Displays as `"<left> differs from <right>"` where each side is rendered
/// with the result's style and only the differing fields, or as the empty
/// string when there is no difference.
pub struct DiffResult<'a> {
    pub(crate) left: &'a dyn Reflect,
    pub(crate) right: &'a dyn Reflect,
    pub(crate) entries: Vec<DiffEntry>,
    pub(crate) style: Cow<'a, RenderStyle>,
}

impl<'a> DiffResult<'a> {
    pub fn left(&self) -> &'a dyn Reflect {
        self.left
    }

    pub fn right(&self) -> &'a dyn Reflect {
        self.right
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DiffEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffEntry> {
        self.entries.iter()
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Entry at a dotted path
    pub fn get(&self, path: &str) -> Option<&DiffEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// # Errors
    ///
    /// Returns any error raised while rendering either side.
    pub fn to_text(&self) -> Result<String> {
        super::summary::render_diff_text(self)
    }
}

impl<'r, 'a> IntoIterator for &'r DiffResult<'a> {
    type Item = &'r DiffEntry;
    type IntoIter = std::slice::Iter<'r, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Debug for DiffResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffResult")
            .field("left", &self.left.type_info().name())
            .field("right", &self.right.type_info().name())
            .field("entries", &self.entries)
            .finish()
    }
}

/// Falls back to listing the entries when the style cannot render the two
/// sides, such as a JSON style set to summary detail
impl fmt::Display for DiffResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(text) => f.write_str(&text),
            Err(_) => {
                write!(
                    f,
                    "{} {DIFFERS_FROM} {} (",
                    self.left.type_info().short_name(),
                    self.right.type_info().short_name()
                )?;
                for (index, entry) in self.entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{entry}")?;
                }
                f.write_str(")")
            }
        }
    }
}
