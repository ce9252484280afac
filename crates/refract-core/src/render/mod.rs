//! Text rendering of values and objects
//!
//! - `style`: the delimiter presets
//! - `engine`: reflective rendering through a style
//! - `builder`: hand-written rendering with the same layout rules

mod builder;
mod engine;
mod style;

pub use builder::RenderBuilder;
pub use engine::render;
pub use style::{
    Dialect, RenderStyle, StylePreset, DEFAULT_STYLE, JSON_STYLE, MULTI_LINE_STYLE,
    NO_CLASS_NAME_STYLE, NO_FIELD_NAMES_STYLE, SHORT_PREFIX_STYLE, SIMPLE_STYLE,
};

pub(crate) use engine::{Renderer, NO_OPTIONS};
