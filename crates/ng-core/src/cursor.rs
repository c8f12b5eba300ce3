//! Text-cursor location: click point → character offset.
//!
//! The inverse of `measure`: replays the same half/full-width character
//! widths and wrap limit to segment the node's text into visual lines,
//! picks the line under the click, then the character boundary nearest
//! the click's x. Offsets are in characters, clamped to `[0, len]`.

use crate::model::{GridConfig, NodeData, Point};
use smallvec::SmallVec;

use crate::measure::char_cell_width;

/// Greedy visual-line segmentation: each entry is a line's length in
/// characters. A line ends when the next character would exceed the wrap
/// width, or just after a `\n` (the newline is counted in the line it
/// terminates). A line that *starts* with `\n` is recorded as empty.
fn wrap_segments(chars: &[char], font_size: f32, max_width: f32) -> SmallVec<[usize; 8]> {
    let mut lines: SmallVec<[usize; 8]> = SmallVec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        let mut w = 0.0;
        while i < chars.len() {
            let c = chars[i];
            let cw = char_cell_width(c, font_size);
            if c == '\n' {
                i += 1;
                break;
            }
            if w + cw > max_width {
                break;
            }
            w += cw;
            i += 1;
        }
        let mut len = i - start;
        if chars[start] == '\n' {
            len = 0;
        }
        lines.push(len);
    }
    if lines.is_empty() {
        lines.push(0);
    }
    lines
}

/// Character offset under a canvas-space click inside `node`.
///
/// Uses the node's own `font_size` (styles vary per node) but the shared
/// config for padding, line height, and the wrap limit.
pub fn char_index_at_position(node: &NodeData, click: Point, config: &GridConfig) -> usize {
    let local_x = click.x - node.x - config.padding_x;
    let local_y = click.y - node.y - config.padding_y;

    let chars: Vec<char> = node.text.chars().collect();
    let lines = wrap_segments(&chars, node.style.font_size, config.max_node_width());

    let mut line_index = (local_y / config.line_height).floor() as i64;
    if line_index < 0 {
        line_index = 0;
    }
    if line_index as usize >= lines.len() {
        line_index = lines.len() as i64 - 1;
    }
    let line_index = line_index as usize;

    let x_target = local_x.max(0.0);
    let start_offset: usize = lines[..line_index].iter().sum();

    let mut within = 0;
    let mut acc = 0.0;
    for k in 0..lines[line_index] {
        let cw = char_cell_width(chars[start_offset + k], node.style.font_size);
        if acc + cw / 2.0 >= x_target {
            within = k;
            break;
        }
        acc += cw;
        within = k + 1;
    }

    (start_offset + within).min(chars.len())
}
