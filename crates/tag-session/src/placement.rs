//! Where to draw the suggestion list relative to the caret.

use unicode_width::UnicodeWidthStr;

/// Pixels above the field's bottom edge used by the fallback anchor.
const FALLBACK_LIFT: f32 = 8.0;

/// Page-space geometry of a text field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGeometry {
    pub left: f32,
    pub top: f32,
    pub bottom: f32,
    pub width: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub line_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub left: f32,
    pub top: f32,
}

pub trait TextMeasure {
    /// Rendered width of `text` in pixels.
    fn width(&self, text: &str) -> f32;
}

/// Fixed-width measurement by display columns (wide CJK glyphs count twice).
pub struct MonospaceMeasure {
    pub cell_width: f32,
}

impl TextMeasure for MonospaceMeasure {
    fn width(&self, text: &str) -> f32 {
        text.width() as f32 * self.cell_width
    }
}

/// Anchor under the caret, or under the field's bottom-left corner when the
/// caret position would fall outside the field's width.
pub fn anchor(
    text: &str,
    caret: usize,
    field: &FieldGeometry,
    measure: &dyn TextMeasure,
) -> Anchor {
    let caret = caret.min(text.len());
    let before = text.get(..caret).unwrap_or(text);

    let line = match before.rfind('\n') {
        Some(i) => &before[i + 1..],
        None => before,
    };
    let line_count = before.matches('\n').count() + 1;

    let x = field.left + field.scroll_x + measure.width(line);
    let y = field.top + field.scroll_y + line_count as f32 * field.line_height;

    if x < field.width {
        Anchor { left: x, top: y }
    } else {
        Anchor {
            left: field.left + field.scroll_x,
            top: field.bottom - FALLBACK_LIFT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> FieldGeometry {
        FieldGeometry {
            left: 10.0,
            top: 100.0,
            bottom: 200.0,
            width: 300.0,
            scroll_x: 0.0,
            scroll_y: 20.0,
            line_height: 16.0,
        }
    }

    const MONO: MonospaceMeasure = MonospaceMeasure { cell_width: 7.0 };

    #[test]
    fn anchors_under_caret_on_first_line() {
        let a = anchor("1girl, smi", 10, &field(), &MONO);
        assert_eq!(a, Anchor { left: 80.0, top: 136.0 });
    }

    #[test]
    fn counts_lines_before_caret() {
        let a = anchor("solo\nred eyes\nbl", 16, &field(), &MONO);
        assert_eq!(a.left, 24.0);
        assert_eq!(a.top, 100.0 + 20.0 + 3.0 * 16.0);
    }

    #[test]
    fn falls_back_when_past_field_width() {
        let long = "x".repeat(60);
        let a = anchor(&long, 60, &field(), &MONO);
        assert_eq!(a, Anchor { left: 10.0, top: 192.0 });
    }

    #[test]
    fn wide_glyphs_take_two_cells() {
        assert_eq!(MONO.width("猫a"), 21.0);
    }

    #[test]
    fn caret_inside_char_does_not_panic() {
        let a = anchor("猫", 1, &field(), &MONO);
        assert_eq!(a.left, 10.0 + 14.0);
    }
}
