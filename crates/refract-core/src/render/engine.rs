//! Rendering engine
//!
//! Layout of one object: type name, identity marker, content start, each
//! field as name, separator and value, field separators between fields, and
//! content end. Everything style-specific comes from the `RenderStyle`.

use std::time::Instant;

use refract_core_types::Algorithm;

use super::style::RenderStyle;
use crate::errors::{RefractError, Result};
use crate::model::{Array, Inspect, Mapping, Reflect, Sequence, Value};
use crate::options::{RenderOptions, SelectOptions};
use crate::traversal::{select_fields, TraversalContext, VisitKey};
use crate::{log_op_end, log_op_error, log_op_start};

/// Options of builder-driven rendering, where the caller picks the fields
pub(crate) static NO_OPTIONS: RenderOptions = RenderOptions {
    select: SelectOptions {
        exclude_fields: Vec::new(),
        include_transient: false,
        include_static: false,
        stop_at: None,
    },
    exclude_null_values: false,
    full_detail: None,
};

/// Render a value as text
///
/// Objects are rendered field by field; any other value is rendered in full
/// detail on its own. An object reached again while it is still being
/// rendered prints as `full::Type@hex` instead of recursing.
///
/// # Errors
///
/// Returns a usage error when the JSON style meets a summary-mode field, and
/// an access error when a participating field cannot be read.
pub fn render<T>(value: &T, style: &RenderStyle, options: &RenderOptions) -> Result<String>
where
    T: Inspect + ?Sized,
{
    log_op_start!("render");
    let start = Instant::now();

    let mut renderer = Renderer::new(style, options);
    let mut out = String::new();
    value
        .inspect(&mut |v| match v.as_object() {
            Some(object) => renderer.root(&mut out, object),
            None => renderer.value(&mut out, v, true),
        })
        .map_err(|e| {
            log_op_error!("render", e, duration_ms = start.elapsed().as_millis() as u64);
            e
        })?;

    log_op_end!(
        "render",
        duration_ms = start.elapsed().as_millis() as u64,
        len = out.len()
    );
    Ok(out)
}

/// `full::Type@hex`, the text of an object that cannot be expanded
pub(crate) fn identity_text(object: &dyn Reflect) -> String {
    format!("{}@{:x}", object.type_info().name(), object.address())
}

fn quoted(text: &str) -> Result<String> {
    serde_json::to_string(text).map_err(|e| RefractError::usage("JSON_STYLE", e.to_string()))
}

pub(crate) fn f64_text(v: f64) -> String {
    float_text(v, v.to_string(), format!("{v:e}"))
}

pub(crate) fn f32_text(v: f32) -> String {
    float_text(f64::from(v), v.to_string(), format!("{v:e}"))
}

/// Plain decimals between 10^-3 and 10^7, computerized scientific notation
/// outside, always with a fractional part: `1.0`, `0.001`, `1.0E7`, `2.5E-4`
fn float_text(v: f64, plain: String, scientific: String) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = v.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        };
    }
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{mantissa}E{exponent}")
    } else {
        format!("{mantissa}.0E{exponent}")
    }
}

/// One rendering pass: a style, the reflective options and a visited set
pub(crate) struct Renderer<'s> {
    style: &'s RenderStyle,
    options: &'s RenderOptions,
    ctx: TraversalContext,
}

impl<'s> Renderer<'s> {
    pub(crate) fn new(style: &'s RenderStyle, options: &'s RenderOptions) -> Self {
        Self {
            style,
            options,
            ctx: TraversalContext::new(),
        }
    }

    pub(crate) fn style(&self) -> &'s RenderStyle {
        self.style
    }

    /// Mark the object being rendered so references back to it are not
    /// expanded. Returns false when it already is.
    pub(crate) fn register(&mut self, object: &dyn Reflect) -> bool {
        self.ctx.enter(VisitKey::of(object))
    }

    pub(crate) fn unregister(&mut self, object: &dyn Reflect) {
        self.ctx.leave(VisitKey::of(object));
    }

    /// Render `object` and all its participating fields
    pub(crate) fn root(&mut self, buf: &mut String, object: &dyn Reflect) -> Result<()> {
        if !self.register(object) {
            buf.push_str(&identity_text(object));
            return Ok(());
        }
        let result = self.object(buf, object);
        self.unregister(object);
        result
    }

    pub(crate) fn start(&self, buf: &mut String, object: &dyn Reflect) {
        let style = self.style;
        if style.use_class_name {
            let info = object.type_info();
            buf.push_str(if style.use_short_class_name {
                info.short_name()
            } else {
                info.name()
            });
        }
        if style.use_identity_hash_code {
            buf.push_str(&format!("@{:x}", object.address()));
        }
        buf.push_str(&style.content_start);
        if style.field_separator_at_start {
            buf.push_str(&style.field_separator);
        }
    }

    pub(crate) fn end(&self, buf: &mut String) {
        if !self.style.field_separator_at_end {
            self.remove_last_field_separator(buf);
        }
        buf.push_str(&self.style.content_end);
    }

    pub(crate) fn remove_last_field_separator(&self, buf: &mut String) {
        let separator: &str = &self.style.field_separator;
        if !separator.is_empty() && buf.ends_with(separator) {
            buf.truncate(buf.len() - separator.len());
        }
    }

    fn object(&mut self, buf: &mut String, object: &dyn Reflect) -> Result<()> {
        self.start(buf, object);
        let fields = select_fields(object.type_info(), &self.options.select, Algorithm::Render);
        for field in fields {
            field.read(object, &mut |v| {
                if v.is_null() && self.options.exclude_null_values {
                    return Ok(());
                }
                let detail = self.options.full_detail.unwrap_or(!field.is_summary());
                self.field(buf, Some(field.name()), v, Some(detail))
            })?;
        }
        self.end(buf);
        Ok(())
    }

    fn check_json(&self, name: Option<&str>, detail: bool) -> Result<()> {
        if !self.style.is_json() {
            return Ok(());
        }
        if name.is_none() {
            return Err(RefractError::usage(
                "JSON_STYLE",
                "field names are mandatory",
            ));
        }
        if !detail {
            return Err(RefractError::usage(
                "JSON_STYLE",
                "full detail is required",
            ));
        }
        Ok(())
    }

    fn field_start(&self, buf: &mut String, name: Option<&str>) -> Result<()> {
        if let (true, Some(name)) = (self.style.use_field_names, name) {
            if self.style.is_json() {
                buf.push_str(&quoted(name)?);
            } else {
                buf.push_str(name);
            }
            buf.push_str(&self.style.field_name_value_separator);
        }
        Ok(())
    }

    /// Append one field; `full` overrides the style's default detail level
    pub(crate) fn field(
        &mut self,
        buf: &mut String,
        name: Option<&str>,
        value: Value<'_>,
        full: Option<bool>,
    ) -> Result<()> {
        let detail = full.unwrap_or(self.style.default_full_detail);
        self.check_json(name, detail)?;
        self.field_start(buf, name)?;
        self.value(buf, value, detail)?;
        buf.push_str(&self.style.field_separator);
        Ok(())
    }

    /// Append a field whose value is already rendered text
    pub(crate) fn field_text(&self, buf: &mut String, name: Option<&str>, text: &str) -> Result<()> {
        self.check_json(name, true)?;
        self.field_start(buf, name)?;
        buf.push_str(text);
        buf.push_str(&self.style.field_separator);
        Ok(())
    }

    pub(crate) fn value(&mut self, buf: &mut String, value: Value<'_>, detail: bool) -> Result<()> {
        let style = self.style;
        match value {
            Value::Null => buf.push_str(&style.null_text),
            Value::Object(object) => self.nested_object(buf, object, detail)?,
            Value::Array(array) if detail => self.array(buf, array)?,
            Value::Seq(seq) if detail => self.sequence(buf, seq)?,
            Value::Map(map) if detail => self.mapping(buf, map)?,
            Value::Array(_) | Value::Seq(_) | Value::Map(_) => {
                let size = value.size().unwrap_or_default();
                buf.push_str(&style.size_start_text);
                buf.push_str(&size.to_string());
                buf.push_str(&style.size_end_text);
            }
            _ if !detail => self.summary(buf, value.type_name()),
            scalar => self.scalar(buf, scalar)?,
        }
        Ok(())
    }

    fn summary(&self, buf: &mut String, type_name: &str) {
        buf.push_str(&self.style.summary_object_start_text);
        buf.push_str(type_name);
        buf.push_str(&self.style.summary_object_end_text);
    }

    fn scalar(&self, buf: &mut String, value: Value<'_>) -> Result<()> {
        let json = self.style.is_json();
        match value {
            Value::Bool(b) => buf.push_str(if b { "true" } else { "false" }),
            Value::I8(n) => buf.push_str(&n.to_string()),
            Value::I16(n) => buf.push_str(&n.to_string()),
            Value::I32(n) => buf.push_str(&n.to_string()),
            Value::I64(n) => buf.push_str(&n.to_string()),
            Value::F32(f) => buf.push_str(&f32_text(f)),
            Value::F64(f) => buf.push_str(&f64_text(f)),
            Value::Char(c) if json => buf.push_str(&quoted(c.encode_utf8(&mut [0; 4]))?),
            Value::Char(c) => buf.push(c),
            Value::Str(s) if json => buf.push_str(&quoted(s)?),
            Value::Str(s) => buf.push_str(s),
            _ => {}
        }
        Ok(())
    }

    /// Cyclic references print their identity, summaries their short type
    /// name; anything else is expanded into its own buffer
    fn nested_object(&mut self, buf: &mut String, object: &dyn Reflect, detail: bool) -> Result<()> {
        if self.ctx.is_visiting(VisitKey::of(object)) {
            let identity = identity_text(object);
            if self.style.is_json() {
                buf.push_str(&quoted(&identity)?);
            } else {
                buf.push_str(&identity);
            }
            return Ok(());
        }
        if !detail {
            self.summary(buf, object.type_info().short_name());
            return Ok(());
        }
        let mut nested = String::new();
        self.root(&mut nested, object)?;
        buf.push_str(&nested);
        Ok(())
    }

    fn element(&mut self, buf: &mut String, value: Value<'_>, detail: bool) -> Result<()> {
        self.value(buf, value, detail)
    }

    fn array(&mut self, buf: &mut String, array: Array<'_>) -> Result<()> {
        let style = self.style;
        let detail = style.array_content_detail;
        buf.push_str(&style.array_start);
        let mut first = true;
        array.for_each(&mut |v| {
            if !first {
                buf.push_str(&style.array_separator);
            }
            first = false;
            self.element(buf, v, detail)?;
            Ok(true)
        })?;
        buf.push_str(&style.array_end);
        Ok(())
    }

    fn sequence(&mut self, buf: &mut String, seq: &dyn Sequence) -> Result<()> {
        let style = self.style;
        buf.push_str(&style.collection_start);
        for (index, item) in seq.items().enumerate() {
            if index > 0 {
                buf.push_str(&style.collection_separator);
            }
            item.inspect(&mut |v| self.element(buf, v, true))?;
        }
        buf.push_str(&style.collection_end);
        Ok(())
    }

    fn mapping(&mut self, buf: &mut String, map: &dyn Mapping) -> Result<()> {
        let style = self.style;
        buf.push_str(&style.map_start);
        for (index, (key, value)) in map.entries().enumerate() {
            if index > 0 {
                buf.push_str(&style.map_separator);
            }
            key.inspect(&mut |k| self.map_key(buf, k))?;
            buf.push_str(&style.map_key_value_separator);
            value.inspect(&mut |v| self.element(buf, v, true))?;
        }
        buf.push_str(&style.map_end);
        Ok(())
    }

    /// JSON object keys are always strings
    fn map_key(&mut self, buf: &mut String, key: Value<'_>) -> Result<()> {
        if !self.style.is_json() || matches!(key, Value::Str(_) | Value::Char(_)) {
            return self.element(buf, key, true);
        }
        let mut text = String::new();
        self.element(&mut text, key, true)?;
        buf.push_str(&quoted(&text)?);
        Ok(())
    }
}
