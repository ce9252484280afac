use super::engine::{identity_text, Renderer, NO_OPTIONS};
use super::style::RenderStyle;
use crate::errors::{RefractError, Result};
use crate::model::{Inspect, Reflect};

/// Field-by-field rendering for hand-written `Display` impls
///
/// The object itself is marked as in progress for the builder's lifetime,
/// so a field that leads back to it prints as its identity.
///
/// ```
/// use refract_core::{reflect, RenderBuilder, SHORT_PREFIX_STYLE};
///
/// pub struct Point {
///     x: i32,
///     y: i32,
/// }
/// reflect!(Point { x, y });
///
/// let p = Point { x: 1, y: 2 };
/// let text = RenderBuilder::new(&p, &SHORT_PREFIX_STYLE)
///     .append("x", &p.x)
///     .append_summary("y", &p.y)
///     .build()
///     .unwrap();
/// assert_eq!(text, "Point[x=1,y=<i32>]");
/// ```
pub struct RenderBuilder<'a> {
    object: &'a dyn Reflect,
    renderer: Renderer<'a>,
    buf: String,
    error: Option<RefractError>,
}

impl<'a> RenderBuilder<'a> {
    pub fn new(object: &'a dyn Reflect, style: &'a RenderStyle) -> Self {
        let mut renderer = Renderer::new(style, &NO_OPTIONS);
        renderer.register(object);
        let mut buf = String::new();
        renderer.start(&mut buf, object);
        Self {
            object,
            renderer,
            buf,
            error: None,
        }
    }

    fn push<T: Inspect + ?Sized>(mut self, name: Option<&str>, value: &T, full: Option<bool>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let (renderer, buf) = (&mut self.renderer, &mut self.buf);
        let outcome = value.inspect(&mut |v| renderer.field(buf, name, v, full));
        if let Err(e) = outcome {
            self.error = Some(e);
        }
        self
    }

    /// Append a named field at the style's default detail level
    pub fn append<T: Inspect + ?Sized>(self, name: &str, value: &T) -> Self {
        self.push(Some(name), value, None)
    }

    /// Append a value without a field name. Fails the build under the JSON
    /// style.
    pub fn append_unnamed<T: Inspect + ?Sized>(self, value: &T) -> Self {
        self.push(None, value, None)
    }

    /// Append a field as its size or type summary
    pub fn append_summary<T: Inspect + ?Sized>(self, name: &str, value: &T) -> Self {
        self.push(Some(name), value, Some(false))
    }

    pub fn append_detail<T: Inspect + ?Sized>(self, name: &str, value: &T, full: bool) -> Self {
        self.push(Some(name), value, Some(full))
    }

    /// Splice in the content of an ancestor's own rendering
    pub fn append_super(self, super_text: &str) -> Self {
        self.append_to_string(super_text)
    }

    /// Splice in the content between the first content start and the last
    /// content end of `text`, as if its fields had been appended here
    pub fn append_to_string(mut self, text: &str) -> Self {
        let style = self.renderer.style();
        let (open, close): (&str, &str) = (&style.content_start, &style.content_end);
        let start = text.find(open).map(|at| at + open.len());
        let end = text.rfind(close);
        if let (Some(start), Some(end)) = (start, end) {
            if start < end {
                if style.field_separator_at_start {
                    self.renderer.remove_last_field_separator(&mut self.buf);
                }
                self.buf.push_str(&text[start..end]);
                self.buf.push_str(&style.field_separator);
            }
        }
        self
    }

    /// Append `full::Type@hex` for `object`, with no field name or separator
    pub fn append_as_object_to_string(mut self, object: &dyn Reflect) -> Self {
        self.buf.push_str(&identity_text(object));
        self
    }

    /// Append a field whose value is already rendered
    pub(crate) fn append_text(mut self, name: &str, text: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.renderer.field_text(&mut self.buf, Some(name), text) {
                self.error = Some(e);
            }
        }
        self
    }

    /// # Errors
    ///
    /// Returns the first error raised by an append.
    pub fn build(mut self) -> Result<String> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.renderer.end(&mut self.buf);
        self.renderer.unregister(self.object);
        Ok(self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::render::style::{DEFAULT_STYLE, JSON_STYLE, MULTI_LINE_STYLE, NO_CLASS_NAME_STYLE};

    struct Pair {
        a: i32,
        b: Option<String>,
    }
    crate::reflect!(Pair { a, b });

    fn pair() -> Pair {
        Pair { a: 1, b: None }
    }

    #[test]
    fn test_default_layout_with_identity() {
        let p = pair();
        let text = RenderBuilder::new(&p, &DEFAULT_STYLE)
            .append("a", &p.a)
            .append("b", &p.b)
            .build()
            .unwrap();
        let name = <Pair as crate::Describe>::describe().name();
        let expected = format!("{name}@{:x}[a=1,b=<null>]", p.address());
        assert_eq!(text, expected);
    }

    #[test]
    fn test_splice_parent_text() {
        let p = pair();
        let text = RenderBuilder::new(&p, &NO_CLASS_NAME_STYLE)
            .append_super("Parent[id=7,tag=x]")
            .append("a", &p.a)
            .build()
            .unwrap();
        assert_eq!(text, "[id=7,tag=x,a=1]");

        let text = RenderBuilder::new(&p, &NO_CLASS_NAME_STYLE)
            .append_to_string("no delimiters here")
            .append("a", &p.a)
            .build()
            .unwrap();
        assert_eq!(text, "[a=1]");
    }

    #[test]
    fn test_multi_line_splice_drops_leading_separator() {
        let p = pair();
        let text = RenderBuilder::new(&p, &MULTI_LINE_STYLE)
            .append_to_string("X[\n  id=7\n]")
            .build()
            .unwrap();
        assert!(text.ends_with("[\n  id=7\n]"), "{text}");
    }

    #[test]
    fn test_json_unnamed_append_fails_build() {
        let p = pair();
        let err = RenderBuilder::new(&p, &JSON_STYLE)
            .append_unnamed(&p.a)
            .append("a", &p.a)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn test_identity_append() {
        let p = pair();
        let text = RenderBuilder::new(&p, &NO_CLASS_NAME_STYLE)
            .append_as_object_to_string(&p)
            .build()
            .unwrap();
        assert_eq!(text, format!("[{}]", identity_text(&p)));
    }
}
