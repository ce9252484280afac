//! Text form of a diff

use super::model::{DiffResult, OwnedValue};
use crate::errors::Result;
use crate::render::RenderBuilder;

/// Connective between the two renderings
pub const DIFFERS_FROM: &str = "differs from";

/// Render both sides of `diff` with only the differing fields, joined as
/// `"<left> differs from <right>"`. An empty diff renders as `""`.
///
/// # Errors
///
/// Returns any error raised while rendering either side, such as a JSON
/// style meeting a field it cannot express.
pub fn render_diff_text(diff: &DiffResult<'_>) -> Result<String> {
    if diff.is_empty() {
        return Ok(String::new());
    }
    let mut lhs = RenderBuilder::new(diff.left(), diff.style());
    let mut rhs = RenderBuilder::new(diff.right(), diff.style());
    for entry in diff {
        lhs = side(lhs, &entry.path, &entry.left);
        rhs = side(rhs, &entry.path, &entry.right);
    }
    Ok(format!("{} {DIFFERS_FROM} {}", lhs.build()?, rhs.build()?))
}

/// Captured objects are spliced in as already-rendered text
fn side<'a>(builder: RenderBuilder<'a>, path: &str, value: &OwnedValue) -> RenderBuilder<'a> {
    match value {
        OwnedValue::Object { text, .. } => builder.append_text(path, text),
        other => builder.append(path, other),
    }
}
