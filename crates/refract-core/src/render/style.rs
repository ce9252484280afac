//! Render styles
//!
//! A style is an immutable bundle of delimiters and flags. The named presets
//! are statics; a custom style is built by cloning one and changing fields,
//! or deserialized from JSON (missing keys take the DEFAULT values).

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Output dialect, which decides how scalar text is escaped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    Plain,
    /// Strings quoted and escaped, field names mandatory, full detail only
    Json,
}

type Text = Cow<'static, str>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub use_field_names: bool,
    pub use_class_name: bool,
    pub use_short_class_name: bool,
    pub use_identity_hash_code: bool,
    pub content_start: Text,
    pub content_end: Text,
    pub field_name_value_separator: Text,
    pub field_separator: Text,
    pub field_separator_at_start: bool,
    pub field_separator_at_end: bool,
    pub array_start: Text,
    pub array_separator: Text,
    pub array_end: Text,
    /// Render array elements rather than the size summary
    pub array_content_detail: bool,
    /// Detail level of fields appended without an explicit one
    pub default_full_detail: bool,
    pub null_text: Text,
    pub size_start_text: Text,
    pub size_end_text: Text,
    pub summary_object_start_text: Text,
    pub summary_object_end_text: Text,
    pub collection_start: Text,
    pub collection_separator: Text,
    pub collection_end: Text,
    pub map_start: Text,
    pub map_key_value_separator: Text,
    pub map_separator: Text,
    pub map_end: Text,
    pub dialect: Dialect,
}

impl Default for RenderStyle {
    fn default() -> Self {
        DEFAULT_STYLE.clone()
    }
}

/// Named presets, addressable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    Default,
    MultiLine,
    NoFieldNames,
    ShortPrefix,
    Simple,
    NoClassName,
    Json,
}

impl RenderStyle {
    pub fn preset(preset: StylePreset) -> &'static RenderStyle {
        match preset {
            StylePreset::Default => &DEFAULT_STYLE,
            StylePreset::MultiLine => &MULTI_LINE_STYLE,
            StylePreset::NoFieldNames => &NO_FIELD_NAMES_STYLE,
            StylePreset::ShortPrefix => &SHORT_PREFIX_STYLE,
            StylePreset::Simple => &SIMPLE_STYLE,
            StylePreset::NoClassName => &NO_CLASS_NAME_STYLE,
            StylePreset::Json => &JSON_STYLE,
        }
    }

    pub fn is_json(&self) -> bool {
        self.dialect == Dialect::Json
    }
}

/// Const-friendly mirror of `RenderStyle`
#[derive(Clone, Copy)]
struct Preset {
    use_field_names: bool,
    use_class_name: bool,
    use_short_class_name: bool,
    use_identity_hash_code: bool,
    content_start: &'static str,
    content_end: &'static str,
    field_name_value_separator: &'static str,
    field_separator: &'static str,
    field_separator_at_start: bool,
    field_separator_at_end: bool,
    array_start: &'static str,
    array_separator: &'static str,
    array_end: &'static str,
    array_content_detail: bool,
    default_full_detail: bool,
    null_text: &'static str,
    size_start_text: &'static str,
    size_end_text: &'static str,
    summary_object_start_text: &'static str,
    summary_object_end_text: &'static str,
    collection_start: &'static str,
    collection_separator: &'static str,
    collection_end: &'static str,
    map_start: &'static str,
    map_key_value_separator: &'static str,
    map_separator: &'static str,
    map_end: &'static str,
    dialect: Dialect,
}

impl Preset {
    const fn build(self) -> RenderStyle {
        RenderStyle {
            use_field_names: self.use_field_names,
            use_class_name: self.use_class_name,
            use_short_class_name: self.use_short_class_name,
            use_identity_hash_code: self.use_identity_hash_code,
            content_start: Cow::Borrowed(self.content_start),
            content_end: Cow::Borrowed(self.content_end),
            field_name_value_separator: Cow::Borrowed(self.field_name_value_separator),
            field_separator: Cow::Borrowed(self.field_separator),
            field_separator_at_start: self.field_separator_at_start,
            field_separator_at_end: self.field_separator_at_end,
            array_start: Cow::Borrowed(self.array_start),
            array_separator: Cow::Borrowed(self.array_separator),
            array_end: Cow::Borrowed(self.array_end),
            array_content_detail: self.array_content_detail,
            default_full_detail: self.default_full_detail,
            null_text: Cow::Borrowed(self.null_text),
            size_start_text: Cow::Borrowed(self.size_start_text),
            size_end_text: Cow::Borrowed(self.size_end_text),
            summary_object_start_text: Cow::Borrowed(self.summary_object_start_text),
            summary_object_end_text: Cow::Borrowed(self.summary_object_end_text),
            collection_start: Cow::Borrowed(self.collection_start),
            collection_separator: Cow::Borrowed(self.collection_separator),
            collection_end: Cow::Borrowed(self.collection_end),
            map_start: Cow::Borrowed(self.map_start),
            map_key_value_separator: Cow::Borrowed(self.map_key_value_separator),
            map_separator: Cow::Borrowed(self.map_separator),
            map_end: Cow::Borrowed(self.map_end),
            dialect: self.dialect,
        }
    }
}

const BASE: Preset = Preset {
    use_field_names: true,
    use_class_name: true,
    use_short_class_name: false,
    use_identity_hash_code: true,
    content_start: "[",
    content_end: "]",
    field_name_value_separator: "=",
    field_separator: ",",
    field_separator_at_start: false,
    field_separator_at_end: false,
    array_start: "{",
    array_separator: ",",
    array_end: "}",
    array_content_detail: true,
    default_full_detail: true,
    null_text: "<null>",
    size_start_text: "<size=",
    size_end_text: ">",
    summary_object_start_text: "<",
    summary_object_end_text: ">",
    collection_start: "[",
    collection_separator: ", ",
    collection_end: "]",
    map_start: "{",
    map_key_value_separator: "=",
    map_separator: ", ",
    map_end: "}",
    dialect: Dialect::Plain,
};

/// `full::Type@1f2e[a=1,b=<null>]`
pub static DEFAULT_STYLE: RenderStyle = BASE.build();

/// One field per line, indented by one space
pub static MULTI_LINE_STYLE: RenderStyle = Preset {
    content_start: "[",
    field_separator: "\n ",
    field_separator_at_start: true,
    content_end: "\n]",
    ..BASE
}
.build();

/// `full::Type@1f2e[1,<null>]`
pub static NO_FIELD_NAMES_STYLE: RenderStyle = Preset {
    use_field_names: false,
    ..BASE
}
.build();

/// `Type[a=1,b=<null>]`
pub static SHORT_PREFIX_STYLE: RenderStyle = Preset {
    use_short_class_name: true,
    use_identity_hash_code: false,
    ..BASE
}
.build();

/// `1,<null>`
pub static SIMPLE_STYLE: RenderStyle = Preset {
    use_class_name: false,
    use_identity_hash_code: false,
    use_field_names: false,
    content_start: "",
    content_end: "",
    ..BASE
}
.build();

/// `[a=1,b=<null>]`
pub static NO_CLASS_NAME_STYLE: RenderStyle = Preset {
    use_class_name: false,
    use_identity_hash_code: false,
    ..BASE
}
.build();

/// `{"a":1,"b":null}`
pub static JSON_STYLE: RenderStyle = Preset {
    use_class_name: false,
    use_identity_hash_code: false,
    content_start: "{",
    content_end: "}",
    array_start: "[",
    array_end: "]",
    field_separator: ",",
    field_name_value_separator: ":",
    null_text: "null",
    summary_object_start_text: "\"<",
    summary_object_end_text: ">\"",
    size_start_text: "\"<size=",
    size_end_text: ">\"",
    collection_start: "[",
    collection_separator: ",",
    collection_end: "]",
    map_start: "{",
    map_key_value_separator: ":",
    map_separator: ",",
    map_end: "}",
    dialect: Dialect::Json,
    ..BASE
}
.build();
