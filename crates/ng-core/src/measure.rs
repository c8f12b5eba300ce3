//! Text measurement: deterministic `(text, style, config) → (w, h)`.
//!
//! The layout model is a fixed-pitch grid: a half-width character
//! occupies `font_size / 2` px, a full-width character `font_size` px.
//! Physical lines (split on `\n`) wider than the configured maximum wrap
//! into `ceil(width / max)` visual lines. The result is ceil-snapped to
//! the grid unit with a `2 × base_unit` floor, so a node is never smaller
//! than a 2×2 grid cell.

use crate::model::{GridConfig, NodeStyle};

/// Width in px of one character cell at the given font size.
///
/// "Full-width" is the historical heuristic `code point > 255`: it
/// matches CJK and fullwidth forms but also misclassifies Latin-extended
/// characters. Kept as-is so sizing agrees with documents produced under
/// the original rule; see DESIGN.md.
pub fn char_cell_width(c: char, font_size: f32) -> f32 {
    if (c as u32) > 255 {
        font_size
    } else {
        font_size / 2.0
    }
}

/// Pixel width of a run of characters, ignoring wrapping.
pub fn line_width(line: &str, font_size: f32) -> f32 {
    line.chars().map(|c| char_cell_width(c, font_size)).sum()
}

/// Size of a node's content box, snapped to the grid.
pub fn calculate_node_size(text: &str, style: &NodeStyle, config: &GridConfig) -> (f32, f32) {
    let max_allowed_width = config.max_node_width();

    let mut max_line_width: f32 = 0.0;
    let mut visual_lines: u32 = 0;

    // split('\n') yields at least one (possibly empty) physical line,
    // so empty text still measures as one visual line.
    for line in text.split('\n') {
        let width = line_width(line, style.font_size);
        if width > max_allowed_width {
            visual_lines += (width / max_allowed_width).ceil() as u32;
            max_line_width = max_allowed_width;
        } else {
            visual_lines += 1;
            max_line_width = max_line_width.max(width);
        }
    }
    visual_lines = visual_lines.max(1);

    let content_width = max_line_width + config.padding_x * 2.0;
    let content_height = visual_lines as f32 * config.line_height + config.padding_y * 2.0;

    let snapped_width = (content_width / config.base_unit).ceil() * config.base_unit;
    let snapped_height = (content_height / config.base_unit).ceil() * config.base_unit;

    let floor = config.base_unit * 2.0;
    (snapped_width.max(floor), snapped_height.max(floor))
}
